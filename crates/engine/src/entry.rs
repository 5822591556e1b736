//! The module contains `BetEntry`, a single wager on one number, and the
//! identifiers attached to it.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Number, PatternKind};

/// Identifier shared by every entry produced from one atom expansion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub Uuid);

/// Local identifier of a single entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub Uuid);

/// Identifier of the record in the external slip store, when persisted.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalId(pub String);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A wager entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetEntry {
    pub id: EntryId,
    pub number: Number,
    pub amount: u32,
    /// Display label of the originating pattern (e.g. `12R`, `5ပါ`).
    pub summary: String,
    /// Only the first entry of an expansion is primary.
    pub is_primary: bool,
    pub group_id: GroupId,
    pub external_id: Option<ExternalId>,
    /// Originating pattern. `None` on records persisted before the pattern
    /// was stored; reconciliation then falls back to the summary text.
    #[serde(default)]
    pub pattern: Option<PatternKind>,
    /// Set by the store once the entry has been finalized on the slip.
    #[serde(default)]
    pub finalized: bool,
}

impl BetEntry {
    /// Persisted identity of the entry, reused positionally on regeneration.
    #[must_use]
    pub fn identity(&self) -> EntryIdentity {
        EntryIdentity {
            id: self.id,
            external_id: self.external_id.clone(),
        }
    }
}

/// What the store needs to find an entry again.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryIdentity {
    pub id: EntryId,
    pub external_id: Option<ExternalId>,
}
