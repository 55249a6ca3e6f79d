/// Group permissions: which group-screen actions the acting user may take.
///
/// Only the creator manages a group (add, invite, edit, delete). Everyone
/// else may leave it. Nicknames are private to the viewer, so anyone may set
/// them.

use std::fmt;
use thiserror::Error;

use crate::ids::UserID;
use crate::membership::edit_diff::EditMemberEntry;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroupAction {
    AddMembers,
    InviteMembers,
    EditGroup,
    DeleteGroup,
    ExitGroup,
    SetNickname,
}

impl GroupAction {
    pub const ALL: [GroupAction; 6] = [
        GroupAction::AddMembers,
        GroupAction::InviteMembers,
        GroupAction::EditGroup,
        GroupAction::DeleteGroup,
        GroupAction::ExitGroup,
        GroupAction::SetNickname,
    ];
}

impl fmt::Display for GroupAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GroupAction::AddMembers => "add members",
            GroupAction::InviteMembers => "invite members",
            GroupAction::EditGroup => "edit the group",
            GroupAction::DeleteGroup => "delete the group",
            GroupAction::ExitGroup => "exit the group",
            GroupAction::SetNickname => "set nicknames",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionError {
    #[error("Only the group creator can {0}.")]
    CreatorOnly(GroupAction),

    #[error("The group creator cannot exit the group.")]
    CreatorCannotExit,
}

// ---------------------------------------------------------------------------
// GroupPermissions
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupPermissions {
    acting_user_id: UserID,
    is_creator: bool,
}

impl GroupPermissions {
    /// Creator status is read from the acting user's own roster entry. A user
    /// missing from the roster is treated as a plain member.
    pub fn from_members(members: &[EditMemberEntry], acting_user_id: UserID) -> Self {
        let is_creator = members
            .iter()
            .find(|m| m.id == acting_user_id)
            .map_or(false, |m| m.is_creator);
        GroupPermissions {
            acting_user_id,
            is_creator,
        }
    }

    pub fn acting_user_id(&self) -> UserID {
        self.acting_user_id
    }

    pub fn is_creator(&self) -> bool {
        self.is_creator
    }

    pub fn check(&self, action: GroupAction) -> Result<(), PermissionError> {
        match (action, self.is_creator) {
            (GroupAction::SetNickname, _) => Ok(()),
            (GroupAction::ExitGroup, true) => Err(PermissionError::CreatorCannotExit),
            (GroupAction::ExitGroup, false) => Ok(()),
            (_, true) => Ok(()),
            (action, false) => Err(PermissionError::CreatorOnly(action)),
        }
    }

    pub fn allows(&self, action: GroupAction) -> bool {
        self.check(action).is_ok()
    }

    /// Actions to show on the group screen, in button order.
    pub fn allowed_actions(&self) -> Vec<GroupAction> {
        GroupAction::ALL
            .into_iter()
            .filter(|a| self.allows(*a))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<EditMemberEntry> {
        vec![
            EditMemberEntry { id: UserID(10), is_creator: true },
            EditMemberEntry { id: UserID(11), is_creator: false },
        ]
    }

    #[test]
    fn test_creator_manages_but_cannot_exit() {
        let p = GroupPermissions::from_members(&roster(), UserID(10));
        assert!(p.is_creator());
        assert_eq!(
            p.allowed_actions(),
            vec![
                GroupAction::AddMembers,
                GroupAction::InviteMembers,
                GroupAction::EditGroup,
                GroupAction::DeleteGroup,
                GroupAction::SetNickname,
            ]
        );
        assert_eq!(
            p.check(GroupAction::ExitGroup),
            Err(PermissionError::CreatorCannotExit)
        );
    }

    #[test]
    fn test_member_may_only_exit_and_set_nicknames() {
        let p = GroupPermissions::from_members(&roster(), UserID(11));
        assert!(!p.is_creator());
        assert_eq!(
            p.allowed_actions(),
            vec![GroupAction::ExitGroup, GroupAction::SetNickname]
        );
        let err = p.check(GroupAction::DeleteGroup).unwrap_err();
        assert_eq!(err.to_string(), "Only the group creator can delete the group.");
    }

    #[test]
    fn test_unknown_user_is_not_creator() {
        let p = GroupPermissions::from_members(&roster(), UserID(99));
        assert!(!p.allows(GroupAction::AddMembers));
        assert!(p.allows(GroupAction::ExitGroup));
    }
}
