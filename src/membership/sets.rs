/// Membership sets: server-confirmed members, server-confirmed pending
/// invites, and the client-only staged selection.
///
/// - `existing` and `pending` are replaced wholesale on every refetch.
/// - `selected` is ordered by first add, so chips render in the order the user
///   picked them.
/// - An id in `existing ∪ pending` can never enter `selected` through
///   `toggle_selected`; `initialize` clears `selected`, so the invariant holds
///   across refetches too.

use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

use crate::ids::UserID;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why an id cannot be staged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockReason {
    AlreadyMember,
    AlreadyPending,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockReason::AlreadyMember => write!(f, "already a member"),
            BlockReason::AlreadyPending => write!(f, "already invited"),
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("User {id} cannot be selected: {reason}")]
pub struct BlockedError {
    pub id: UserID,
    pub reason: BlockReason,
}

// ---------------------------------------------------------------------------
// SelectionChange
// ---------------------------------------------------------------------------

/// Resulting membership of an id in `selected` after a toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionChange {
    Added,
    Removed,
}

// ---------------------------------------------------------------------------
// MembershipSets
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default)]
pub struct MembershipSets {
    existing: BTreeSet<UserID>,
    pending: BTreeSet<UserID>,
    /// Insertion-ordered; never contains duplicates.
    selected: Vec<UserID>,
}

impl MembershipSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build sets straight from a server response.
    pub fn from_server<E, P>(existing: E, pending: P) -> Self
    where
        E: IntoIterator<Item = UserID>,
        P: IntoIterator<Item = UserID>,
    {
        let mut sets = Self::new();
        sets.initialize(existing, pending);
        sets
    }

    /// Replace `existing` and `pending` wholesale and clear `selected`.
    pub fn initialize<E, P>(&mut self, existing: E, pending: P)
    where
        E: IntoIterator<Item = UserID>,
        P: IntoIterator<Item = UserID>,
    {
        self.existing = existing.into_iter().collect();
        self.pending = pending.into_iter().collect();
        self.selected.clear();
    }

    /// True iff `id ∈ existing ∪ pending`.
    pub fn is_blocked(&self, id: UserID) -> bool {
        self.block_reason(id).is_some()
    }

    /// Membership takes precedence when the backend reports an id in both sets.
    pub fn block_reason(&self, id: UserID) -> Option<BlockReason> {
        if self.existing.contains(&id) {
            Some(BlockReason::AlreadyMember)
        } else if self.pending.contains(&id) {
            Some(BlockReason::AlreadyPending)
        } else {
            None
        }
    }

    pub fn is_existing(&self, id: UserID) -> bool {
        self.existing.contains(&id)
    }

    pub fn is_pending(&self, id: UserID) -> bool {
        self.pending.contains(&id)
    }

    pub fn is_selected(&self, id: UserID) -> bool {
        self.selected.contains(&id)
    }

    /// Stage or unstage `id`. Blocked ids are rejected and `selected` is left
    /// untouched.
    pub fn toggle_selected(&mut self, id: UserID) -> Result<SelectionChange, BlockedError> {
        if let Some(reason) = self.block_reason(id) {
            return Err(BlockedError { id, reason });
        }

        match self.selected.iter().position(|s| *s == id) {
            Some(idx) => {
                self.selected.remove(idx);
                Ok(SelectionChange::Removed)
            }
            None => {
                self.selected.push(id);
                Ok(SelectionChange::Added)
            }
        }
    }

    /// Unconditionally unstage `id`. No-op if it was not staged.
    pub fn remove_from_selection(&mut self, id: UserID) {
        self.selected.retain(|s| *s != id);
    }

    /// Unstage everything; `existing` and `pending` are kept.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Staged ids in the order they were first added.
    pub fn selected_ids(&self) -> Vec<UserID> {
        self.selected.clone()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
