//! Group reconciliation.
//!
//! When a clerk edits one entry of a group produced by a shorthand, the
//! reconciler decides whether to regenerate the whole group, or to detach
//! the entry and edit it alone. It never touches the store: it returns a
//! [`ReconcileDiff`] the caller applies.
//!
//! Routes:
//! - amount-only edit on a multi-member regenerable group: every member gets
//!   the new amount, identities and group id are kept;
//! - amount-only edit otherwise: the entry alone gets the new amount and a
//!   fresh group id;
//! - number edit touching only the family's parameter positions: the family
//!   is rebuilt around the new number under a fresh group id, old identities
//!   and finalized flags are reused positionally, surplus old members are
//!   deleted and extra new ones created. The rebuilt set must contain the
//!   typed number;
//! - any other number edit: the entry alone is replaced by the literal number.
//!
//! A detached primary entry hands the primary flag to the next member left
//! in its old group; that member is returned in `keep` as well.
//!
//! A 3D reverse/permutation group on a locked slip is never edited.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    BetEntry, DigitWidth, EntryId, EntryIdentity, IdGenerator, Number, PatternKind,
    ReconcileError, expand::members, family::family_of,
};

/// The sole input to reconciliation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRequest {
    pub target: EntryId,
    pub new_number: String,
    pub new_amount: u32,
}

/// Which route the reconciler took.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileRoute {
    /// The whole group was regenerated.
    Regenerated,
    /// Only the target entry changed amount and left its group.
    SingleItem,
    /// The target entry was replaced by the literal new number.
    Replaced,
}

/// Instructions for the store.
///
/// `keep` entries reuse an existing identity and must be updated in place,
/// `create` entries are new, `delete` lists identities to remove.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileDiff {
    pub route: ReconcileRoute,
    pub keep: Vec<BetEntry>,
    pub create: Vec<BetEntry>,
    pub delete: Vec<EntryIdentity>,
}

pub struct Reconciler<'a> {
    ids: &'a dyn IdGenerator,
}

impl<'a> Reconciler<'a> {
    pub fn new(ids: &'a dyn IdGenerator) -> Self {
        Self { ids }
    }

    /// Computes the diff for `edit` against the current members of its group.
    ///
    /// `group` must hold every live member of the target's group, in ledger
    /// order. `slip_locked` is `true` when the slip has finalized entries.
    pub fn reconcile(
        &self,
        edit: &EditRequest,
        group: &[BetEntry],
        slip_locked: bool,
    ) -> Result<ReconcileDiff, ReconcileError> {
        let target = group
            .iter()
            .find(|entry| entry.id == edit.target)
            .ok_or(ReconcileError::UnknownGroup)?;
        if group.iter().any(|entry| entry.group_id != target.group_id) {
            return Err(ReconcileError::UnknownGroup);
        }
        if edit.new_amount == 0 {
            return Err(ReconcileError::AmountRequiresPositive);
        }
        let width = target.number.width();
        let new_number = Number::parse_with_width(&edit.new_number, width)
            .ok_or_else(|| ReconcileError::InvalidNumber(edit.new_number.clone()))?;

        let derived = family_of(group);
        let family = derived.map(|(family, _)| family);
        if width == DigitWidth::Three && slip_locked && family.is_some_and(|f| f.is_reverse()) {
            warn!(group = %target.group_id, "edit refused: slip is locked");
            return Err(ReconcileError::LockedSlip);
        }
        let regenerable = group.len() > 1 && family.is_some();

        if new_number == target.number {
            if regenerable {
                debug!(
                    group = %target.group_id,
                    members = group.len(),
                    source = ?derived.map(|(_, source)| source),
                    "regenerating amounts"
                );
                return Ok(self.regenerate_amounts(group, edit.new_amount));
            }
            debug!(entry = %target.id, "single item amount edit");
            return Ok(self.single_amount(group, target, edit.new_amount));
        }

        if regenerable
            && let Some(kind) = family.and_then(|f| f.retarget(target.number, new_number))
        {
            let numbers = members(&kind, width);
            if numbers.contains(&new_number) {
                debug!(
                    group = %target.group_id,
                    summary = %kind.summary(),
                    source = ?derived.map(|(_, source)| source),
                    old = group.len(),
                    new = numbers.len(),
                    "regenerating group"
                );
                return Ok(self.regenerate(group, &kind, numbers, edit.new_amount));
            }
        }

        debug!(entry = %target.id, number = %new_number, "replacing single item");
        Ok(self.replace(group, target, new_number, edit.new_amount))
    }

    fn regenerate_amounts(&self, group: &[BetEntry], amount: u32) -> ReconcileDiff {
        let keep = group
            .iter()
            .map(|entry| BetEntry {
                amount,
                ..entry.clone()
            })
            .collect();
        ReconcileDiff {
            route: ReconcileRoute::Regenerated,
            keep,
            create: Vec::new(),
            delete: Vec::new(),
        }
    }

    fn single_amount(&self, group: &[BetEntry], target: &BetEntry, amount: u32) -> ReconcileDiff {
        let entry = BetEntry {
            amount,
            is_primary: true,
            group_id: self.ids.group_id(),
            ..target.clone()
        };
        ReconcileDiff {
            route: ReconcileRoute::SingleItem,
            keep: detach(group, target, entry),
            create: Vec::new(),
            delete: Vec::new(),
        }
    }

    fn regenerate(
        &self,
        group: &[BetEntry],
        kind: &PatternKind,
        numbers: Vec<Number>,
        amount: u32,
    ) -> ReconcileDiff {
        let group_id = self.ids.group_id();
        let summary = kind.summary();
        let mut keep = Vec::new();
        let mut create = Vec::new();

        for (index, number) in numbers.into_iter().enumerate() {
            let (id, external_id, finalized) = match group.get(index) {
                Some(old) => (old.id, old.external_id.clone(), old.finalized),
                None => (self.ids.entry_id(), None, false),
            };
            let entry = BetEntry {
                id,
                number,
                amount,
                summary: summary.clone(),
                is_primary: index == 0,
                group_id,
                external_id,
                pattern: Some(kind.clone()),
                finalized,
            };
            if index < group.len() {
                keep.push(entry);
            } else {
                create.push(entry);
            }
        }
        let delete = group
            .iter()
            .skip(keep.len())
            .map(BetEntry::identity)
            .collect();

        ReconcileDiff {
            route: ReconcileRoute::Regenerated,
            keep,
            create,
            delete,
        }
    }

    fn replace(
        &self,
        group: &[BetEntry],
        target: &BetEntry,
        number: Number,
        amount: u32,
    ) -> ReconcileDiff {
        let entry = BetEntry {
            number,
            amount,
            summary: number.to_string(),
            is_primary: true,
            group_id: self.ids.group_id(),
            pattern: Some(PatternKind::Bare { number }),
            ..target.clone()
        };
        ReconcileDiff {
            route: ReconcileRoute::Replaced,
            keep: detach(group, target, entry),
            create: Vec::new(),
            delete: Vec::new(),
        }
    }
}

/// The detached entry, followed by the member that takes over as primary of
/// the old group when the detached entry was its primary.
fn detach(group: &[BetEntry], target: &BetEntry, detached: BetEntry) -> Vec<BetEntry> {
    let successor = target
        .is_primary
        .then(|| group.iter().find(|entry| entry.id != target.id))
        .flatten()
        .map(|entry| BetEntry {
            is_primary: true,
            ..entry.clone()
        });
    std::iter::once(detached).chain(successor).collect()
}

/// Shorthand for [`Reconciler::reconcile`].
pub fn reconcile(
    edit: &EditRequest,
    group: &[BetEntry],
    slip_locked: bool,
    ids: &dyn IdGenerator,
) -> Result<ReconcileDiff, ReconcileError> {
    Reconciler::new(ids).reconcile(edit, group, slip_locked)
}
