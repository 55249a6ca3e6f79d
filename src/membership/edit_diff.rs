/// Group edit diff: the minimal remove-list for an edit-group submission.
///
/// Two conceptual states per roster entry:
/// - `Kept`: still selected, or protected (creator / acting user)
/// - `Removed`: in the original roster, unchecked, and not protected
///
/// The edit flow only ever removes. It cannot add members; new members go
/// through the add-members or invite flows.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::ids::UserID;

// ---------------------------------------------------------------------------
// EditMemberEntry / RemovalPayload
// ---------------------------------------------------------------------------

/// One row of the edit-group roster, loaded once from the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditMemberEntry {
    pub id: UserID,
    pub is_creator: bool,
}

/// `{ "user_id": <id>, "remove": true }`, one element of the edit request's
/// `members` array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalPayload {
    pub user_id: UserID,
    pub remove: bool,
}

impl RemovalPayload {
    pub fn new(user_id: UserID) -> Self {
        RemovalPayload {
            user_id,
            remove: true,
        }
    }
}

/// Compute removals in original roster order.
///
/// Creators and `acting_user_id` are never emitted, whatever `selected` holds.
pub fn compute_removals(
    original: &[EditMemberEntry],
    selected: &BTreeSet<UserID>,
    acting_user_id: UserID,
) -> Vec<RemovalPayload> {
    original
        .iter()
        .filter(|entry| !entry.is_creator)
        .filter(|entry| entry.id != acting_user_id)
        .filter(|entry| !selected.contains(&entry.id))
        .map(|entry| RemovalPayload::new(entry.id))
        .collect()
}

// ---------------------------------------------------------------------------
// EditSelection
// ---------------------------------------------------------------------------

/// Outcome of tapping a row's checkmark on the edit screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditToggle {
    /// Row is checked; the member stays.
    Kept,
    /// Row is unchecked; the member will be removed on submit.
    Unchecked,
    /// Creator or acting user; the tap is ignored.
    Protected,
    /// Id is not in the roster.
    NotInRoster,
}

/// Checkmark state for the edit-group roster.
///
/// Seeded with every roster id: the default is "everyone stays" and removal
/// is opt-out.
#[derive(Clone, Debug)]
pub struct EditSelection {
    original: Vec<EditMemberEntry>,
    selected: BTreeSet<UserID>,
    acting_user_id: UserID,
}

impl EditSelection {
    pub fn new(original: Vec<EditMemberEntry>, acting_user_id: UserID) -> Self {
        let selected = original.iter().map(|e| e.id).collect();
        EditSelection {
            original,
            selected,
            acting_user_id,
        }
    }

    pub fn original(&self) -> &[EditMemberEntry] {
        &self.original
    }

    pub fn selected(&self) -> &BTreeSet<UserID> {
        &self.selected
    }

    pub fn acting_user_id(&self) -> UserID {
        self.acting_user_id
    }

    pub fn is_checked(&self, id: UserID) -> bool {
        self.selected.contains(&id)
    }

    /// True for the creator and the acting user.
    pub fn is_protected(&self, entry: &EditMemberEntry) -> bool {
        entry.is_creator || entry.id == self.acting_user_id
    }

    pub fn toggle(&mut self, id: UserID) -> EditToggle {
        let Some(entry) = self.original.iter().find(|e| e.id == id).copied() else {
            return EditToggle::NotInRoster;
        };
        if self.is_protected(&entry) {
            return EditToggle::Protected;
        }
        if self.selected.remove(&id) {
            EditToggle::Unchecked
        } else {
            self.selected.insert(id);
            EditToggle::Kept
        }
    }

    pub fn removals(&self) -> Vec<RemovalPayload> {
        compute_removals(&self.original, &self.selected, self.acting_user_id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, is_creator: bool) -> EditMemberEntry {
        EditMemberEntry {
            id: UserID(id),
            is_creator,
        }
    }

    fn set(raw: &[i64]) -> BTreeSet<UserID> {
        raw.iter().copied().map(UserID).collect()
    }

    #[test]
    fn test_scenario_d_protects_creator_and_self() {
        let original = vec![entry(10, true), entry(11, false), entry(12, false)];
        let removals = compute_removals(&original, &set(&[10]), UserID(11));
        assert_eq!(removals, vec![RemovalPayload::new(UserID(12))]);
    }

    #[test]
    fn test_creator_never_removed_even_when_unchecked() {
        let original = vec![entry(1, true), entry(2, false)];
        let removals = compute_removals(&original, &set(&[]), UserID(99));
        assert_eq!(removals, vec![RemovalPayload::new(UserID(2))]);
    }

    #[test]
    fn test_removals_follow_original_order() {
        let original = vec![entry(30, false), entry(10, false), entry(20, false), entry(5, true)];
        let removals = compute_removals(&original, &set(&[10]), UserID(5));
        let order: Vec<UserID> = removals.iter().map(|r| r.user_id).collect();
        assert_eq!(order, vec![UserID(30), UserID(20)]);
    }

    #[test]
    fn test_everyone_selected_means_no_removals() {
        let original = vec![entry(1, true), entry(2, false), entry(3, false)];
        let removals = compute_removals(&original, &set(&[1, 2, 3]), UserID(2));
        assert!(removals.is_empty());
    }

    #[test]
    fn test_removal_payload_json_shape() {
        let json = serde_json::to_string(&RemovalPayload::new(UserID(12))).unwrap();
        assert_eq!(json, r#"{"user_id":12,"remove":true}"#);
    }

    #[test]
    fn test_edit_selection_seeds_everyone() {
        let sel = EditSelection::new(vec![entry(1, true), entry(2, false)], UserID(1));
        assert!(sel.is_checked(UserID(1)));
        assert!(sel.is_checked(UserID(2)));
        assert!(sel.removals().is_empty());
    }

    #[test]
    fn test_edit_selection_toggle() {
        let mut sel = EditSelection::new(
            vec![entry(10, true), entry(11, false), entry(12, false)],
            UserID(11),
        );
        assert_eq!(sel.toggle(UserID(10)), EditToggle::Protected);
        assert_eq!(sel.toggle(UserID(11)), EditToggle::Protected);
        assert_eq!(sel.toggle(UserID(12)), EditToggle::Unchecked);
        assert_eq!(sel.toggle(UserID(42)), EditToggle::NotInRoster);
        assert!(sel.is_checked(UserID(10)));
        assert!(sel.is_checked(UserID(11)));
        assert_eq!(sel.removals(), vec![RemovalPayload::new(UserID(12))]);

        assert_eq!(sel.toggle(UserID(12)), EditToggle::Kept);
        assert!(sel.removals().is_empty());
    }
}
