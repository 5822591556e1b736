//! Bet-notation expansion and group reconciliation for 2D/3D lottery slips.
//!
//! The engine is pure and synchronous:
//!
//! - [`parse`] splits a clerk's shorthand into classified [`Atom`]s;
//! - [`expand`] turns an atom and an amount token into [`BetEntry`]s;
//! - [`reconcile`] decides how an edit to one entry propagates to its group
//!   and returns a [`ReconcileDiff`] for the store to apply.
//!
//! [`BetLedger`] is an owned store of entries for callers that want one.
//! Identifiers come from an [`IdGenerator`], so tests can use
//! [`SequentialIds`].

pub use amount::{AmountSpec, resolve_amount};
pub use digits::{Digit, DigitWidth, Number};
pub use entry::{BetEntry, EntryId, EntryIdentity, ExternalId, GroupId};
pub use error::{EngineError, ExpandError, ParseError, ReconcileError};
pub use expand::{build_group, expand, expand_notation, members};
pub use family::{Family, FamilySource, family_of, infer_from_summary};
pub use ids::{IdGenerator, RandomIds, SequentialIds};
pub use ledger::BetLedger;
pub use notation::{AliasSet, Atom, PatternKind, WildSlot, classify, parse};
pub use reconcile::{EditRequest, ReconcileDiff, ReconcileRoute, Reconciler, reconcile};

mod amount;
mod digits;
mod entry;
mod error;
mod expand;
mod family;
mod ids;
mod ledger;
mod notation;
mod reconcile;

pub type ResultEngine<T> = Result<T, EngineError>;
