//! Identifier generation port.
//!
//! The expander and the reconciler never mint ids themselves; they ask an
//! [`IdGenerator`]. Production code uses [`RandomIds`], tests use
//! [`SequentialIds`] to get stable, predictable values.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

use crate::{EntryId, GroupId};

pub trait IdGenerator: Send + Sync {
    fn group_id(&self) -> GroupId;
    fn entry_id(&self) -> EntryId;
}

/// Random v4 UUIDs.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn group_id(&self) -> GroupId {
        GroupId(Uuid::new_v4())
    }

    fn entry_id(&self) -> EntryId {
        EntryId(Uuid::new_v4())
    }
}

/// Deterministic ids built from a counter shared by groups and entries.
///
/// Group ids keep the high bit set so they never collide with entry ids.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    const GROUP_TAG: u128 = 1 << 127;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&self) -> u128 {
        u128::from(self.next.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

impl IdGenerator for SequentialIds {
    fn group_id(&self) -> GroupId {
        GroupId(Uuid::from_u128(Self::GROUP_TAG | self.bump()))
    }

    fn entry_id(&self) -> EntryId {
        EntryId(Uuid::from_u128(self.bump()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_are_unique_and_ordered() {
        let ids = SequentialIds::new();
        let a = ids.entry_id();
        let g = ids.group_id();
        let b = ids.entry_id();
        assert_eq!(a.0, Uuid::from_u128(1));
        assert_eq!(b.0, Uuid::from_u128(3));
        assert_ne!(g.0, Uuid::from_u128(2));
        assert_ne!(a, b);
    }

    #[test]
    fn random_ids_differ() {
        assert_ne!(RandomIds.group_id(), RandomIds.group_id());
    }
}
