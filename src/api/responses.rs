/// Response bodies returned by the Connectly backend.
///
/// The backend is lax about nulls: every field is optional here and rows
/// without a `user_id` are dropped during conversion instead of failing the
/// whole decode.

use serde::Deserialize;

use crate::api::requests::ReinviteRequest;
use crate::ids::{GroupID, InviteID, UserID};
use crate::membership::{Candidate, EditMemberEntry, GroupPermissions};

/// Common wrapper: `{ success, status_code, message, data }`.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Explicit failure: `success: false` without a 200 status.
    pub fn is_rejected(&self) -> bool {
        self.success == Some(false) && self.status_code != Some(200)
    }
}

// ---------------------------------------------------------------------------
// Group details: GET groups/{id}
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct GroupMember {
    #[serde(default)]
    pub user_id: Option<UserID>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub is_creator: Option<bool>,
    /// Viewer-private nickname, if the acting user set one.
    #[serde(default)]
    pub nickname: Option<String>,
}

impl GroupMember {
    /// Nickname when set, display name otherwise.
    pub fn shown_name(&self) -> &str {
        self.nickname
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.display_name.as_deref())
            .unwrap_or_default()
    }

    pub fn to_candidate(&self) -> Option<Candidate> {
        Some(Candidate {
            id: self.user_id?,
            display_name: self.display_name.clone().unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
            avatar_ref: self.profile_image.clone().filter(|p| !p.is_empty()),
        })
    }

    pub fn to_edit_entry(&self) -> Option<EditMemberEntry> {
        Some(EditMemberEntry {
            id: self.user_id?,
            is_creator: self.is_creator.unwrap_or(false),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct GroupDetails {
    #[serde(default)]
    pub group_id: Option<GroupID>,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub group_description: Option<String>,
    #[serde(default)]
    pub group_icon: Option<String>,
    #[serde(default)]
    pub members: Vec<GroupMember>,
    #[serde(default)]
    pub pending_members: Vec<GroupMember>,
}

impl GroupDetails {
    pub fn existing_ids(&self) -> Vec<UserID> {
        self.members.iter().filter_map(|m| m.user_id).collect()
    }

    pub fn pending_ids(&self) -> Vec<UserID> {
        self.pending_members.iter().filter_map(|m| m.user_id).collect()
    }

    pub fn member_candidates(&self) -> Vec<Candidate> {
        self.members.iter().filter_map(GroupMember::to_candidate).collect()
    }

    pub fn edit_entries(&self) -> Vec<EditMemberEntry> {
        self.members.iter().filter_map(GroupMember::to_edit_entry).collect()
    }

    /// What `acting_user_id` may do on this group's screen.
    pub fn permissions_for(&self, acting_user_id: UserID) -> GroupPermissions {
        GroupPermissions::from_members(&self.edit_entries(), acting_user_id)
    }
}

// ---------------------------------------------------------------------------
// Member search: GET groups/{id}/search-members?q=
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub user_id: Option<UserID>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

impl SearchResult {
    pub fn to_candidate(&self) -> Option<Candidate> {
        Some(Candidate {
            id: self.user_id?,
            display_name: self.name.clone().unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
            avatar_ref: self.profile_image.clone().filter(|p| !p.is_empty()),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

impl SearchResults {
    pub fn candidates(&self) -> Vec<Candidate> {
        self.results.iter().filter_map(SearchResult::to_candidate).collect()
    }
}

// ---------------------------------------------------------------------------
// Pending invites: GET groups/{id}/pending-invites
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PendingInvite {
    #[serde(default)]
    pub invite_id: Option<InviteID>,
    #[serde(default)]
    pub email: Option<String>,
}

impl PendingInvite {
    /// Invites without an id cannot be re-sent.
    pub fn reinvite(&self, group_id: GroupID) -> Option<ReinviteRequest> {
        Some(ReinviteRequest {
            group_id,
            invite_id: self.invite_id?,
        })
    }
}
