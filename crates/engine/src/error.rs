//! The module contains the errors the engine can throw.
//!
//! Each component has its own error type so callers can tell a rejected
//! notation from a rejected amount or a refused edit:
//!
//! - [`ParseError`] when a notation string cannot be classified.
//! - [`ExpandError`] when the amount token cannot be resolved for an atom.
//! - [`ReconcileError`] when an edit to a group is refused.
//!
//! [`EngineError`] wraps all of them for callers that just want `?`.
use thiserror::Error;

/// Notation parser errors. The whole input is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty notation")]
    EmptyInput,
    #[error("unrecognized atom \"{atom}\": {reason}")]
    UnrecognizedAtom { atom: String, reason: String },
}

impl ParseError {
    pub(crate) fn unrecognized(atom: &str, reason: impl Into<String>) -> Self {
        Self::UnrecognizedAtom {
            atom: atom.to_string(),
            reason: reason.into(),
        }
    }
}

/// Expansion errors. Nothing is generated when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpandError {
    #[error("invalid amount: \"{0}\"")]
    InvalidAmount(String),
    #[error("amount must be > 0")]
    AmountRequiresPositive,
    #[error("paired amount \"{0}\" is only allowed with a reverse pattern")]
    PairedAmountUnsupported(String),
    #[error("\"{0}\" generates no numbers")]
    EmptyExpansion(String),
}

/// Reconciliation errors. No diff is produced when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("slip already has finalized entries, edit refused")]
    LockedSlip,
    #[error("entry group not found")]
    UnknownGroup,
    #[error("invalid number: \"{0}\"")]
    InvalidNumber(String),
    #[error("amount must be > 0")]
    AmountRequiresPositive,
}

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Expand(#[from] ExpandError),
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
    #[error("invalid width: {0}")]
    InvalidWidth(String),
    #[error("invalid number: {0}")]
    InvalidNumber(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
}
