//! The module contains `BetLedger`, the ordered collection of entries of one
//! slip.
//!
//! The ledger owns its entries. Expansion appends whole groups atomically,
//! reconciliation borrows a group snapshot and the resulting diff is applied
//! back with [`BetLedger::apply`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    BetEntry, DigitWidth, EditRequest, EntryId, ExternalId, GroupId, IdGenerator, ReconcileDiff,
    ReconcileError, Reconciler, ResultEngine, expand::expand_notation,
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetLedger {
    entries: Vec<BetEntry>,
}

impl BetLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_entries(entries: Vec<BetEntry>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[BetEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entry(&self, id: EntryId) -> Option<&BetEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Live members of a group, in ledger order.
    #[must_use]
    pub fn group(&self, group_id: GroupId) -> Vec<BetEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.group_id == group_id)
            .cloned()
            .collect()
    }

    /// Sum of every entry amount.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|entry| u64::from(entry.amount)).sum()
    }

    /// `true` once any entry of the slip has been finalized.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.entries.iter().any(|entry| entry.finalized)
    }

    pub fn append(&mut self, entries: Vec<BetEntry>) {
        self.entries.extend(entries);
    }

    /// Parses and expands `raw`, appending every generated entry.
    ///
    /// Nothing is appended if any atom or the amount is rejected.
    pub fn add(
        &mut self,
        raw: &str,
        amount_token: &str,
        width: DigitWidth,
        ids: &dyn IdGenerator,
    ) -> ResultEngine<&[BetEntry]> {
        let entries = expand_notation(raw, amount_token, width, ids)?;
        let start = self.entries.len();
        self.append(entries);
        Ok(&self.entries[start..])
    }

    /// Records the store id of a persisted entry.
    pub fn set_external_id(&mut self, id: EntryId, external_id: ExternalId) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.external_id = Some(external_id);
                true
            }
            None => false,
        }
    }

    pub fn mark_finalized(&mut self, id: EntryId) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.finalized = true;
                true
            }
            None => false,
        }
    }

    /// Reconciles `edit` against the target's group and applies the diff.
    pub fn edit(
        &mut self,
        edit: &EditRequest,
        ids: &dyn IdGenerator,
    ) -> ResultEngine<ReconcileDiff> {
        let group_id = self
            .entry(edit.target)
            .map(|entry| entry.group_id)
            .ok_or(ReconcileError::UnknownGroup)?;
        let members = self.group(group_id);
        let diff = Reconciler::new(ids).reconcile(edit, &members, self.is_locked())?;
        self.apply(&diff);
        Ok(diff)
    }

    /// Applies a diff: updates kept entries in place, removes deleted ones and
    /// inserts created ones right after the last kept entry.
    pub fn apply(&mut self, diff: &ReconcileDiff) {
        for kept in &diff.keep {
            if let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == kept.id) {
                *entry = kept.clone();
            }
        }

        let before = self.entries.len();
        self.entries
            .retain(|entry| !diff.delete.iter().any(|identity| identity.id == entry.id));
        let deleted = before - self.entries.len();

        let at = diff
            .keep
            .iter()
            .filter_map(|kept| self.entries.iter().position(|entry| entry.id == kept.id))
            .max()
            .map_or(self.entries.len(), |index| index + 1);
        self.entries.splice(at..at, diff.create.iter().cloned());
        debug!(
            kept = diff.keep.len(),
            created = diff.create.len(),
            deleted,
            "applied diff"
        );
    }
}
