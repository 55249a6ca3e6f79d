/// Request bodies sent to the Connectly backend.
///
/// Constructors validate their form input; a request that exists is a request
/// that may be sent.

use base64::{engine::general_purpose::STANDARD as B64, Engine as _};
use serde::Serialize;

use crate::api::Endpoint;
use crate::ids::{GroupID, InviteID, UserID};
use crate::membership::RemovalPayload;
use crate::validation::{
    validate_email, validate_group_description, validate_group_name, validate_nickname, FormError,
};

/// Base64-encode image bytes for the `group_icon_base64` field.
pub fn encode_icon(bytes: &[u8]) -> String {
    B64.encode(bytes)
}

// ---------------------------------------------------------------------------
// POST groups/add-members
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AddMembersRequest {
    pub group_id: GroupID,
    /// Staged ids in the order the user picked them.
    pub user_ids: Vec<UserID>,
}

impl AddMembersRequest {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::AddMembers
    }
}

// ---------------------------------------------------------------------------
// PUT groups/edit
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EditGroupRequest {
    pub group_id: GroupID,
    pub group_name: String,
    pub group_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_icon_base64: Option<String>,
    /// Removals only; omitted entirely when nobody is removed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<RemovalPayload>,
}

impl EditGroupRequest {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::EditGroup
    }
}

// ---------------------------------------------------------------------------
// POST groups/create
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreateGroupRequest {
    pub group_name: String,
    pub group_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_icon_base64: Option<String>,
}

impl CreateGroupRequest {
    pub fn new(name: &str, description: &str, icon: Option<&[u8]>) -> Result<Self, FormError> {
        Ok(CreateGroupRequest {
            group_name: validate_group_name(name)?,
            group_description: validate_group_description(description)?,
            group_icon_base64: icon.filter(|b| !b.is_empty()).map(encode_icon),
        })
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint::CreateGroup
    }
}

// ---------------------------------------------------------------------------
// POST groups/invite-member, POST groups/reinvite
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InviteMemberRequest {
    pub group_id: GroupID,
    pub email: String,
}

impl InviteMemberRequest {
    pub fn new(group_id: GroupID, email: &str) -> Result<Self, FormError> {
        Ok(InviteMemberRequest {
            group_id,
            email: validate_email(email)?,
        })
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint::InviteMember
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ReinviteRequest {
    pub group_id: GroupID,
    pub invite_id: InviteID,
}

impl ReinviteRequest {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::Reinvite
    }
}

// ---------------------------------------------------------------------------
// POST groups/exit
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ExitGroupRequest {
    pub group_id: GroupID,
}

impl ExitGroupRequest {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::ExitGroup
    }
}

// ---------------------------------------------------------------------------
// POST notifications/accept, POST notifications/reject
// ---------------------------------------------------------------------------

/// Answer to a group invitation received by the acting user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InviteDecision {
    Accept,
    Reject,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct InviteResponseRequest {
    #[serde(skip)]
    pub decision: InviteDecision,
    pub invite_id: InviteID,
}

impl InviteResponseRequest {
    pub fn accept(invite_id: InviteID) -> Self {
        InviteResponseRequest {
            decision: InviteDecision::Accept,
            invite_id,
        }
    }

    pub fn reject(invite_id: InviteID) -> Self {
        InviteResponseRequest {
            decision: InviteDecision::Reject,
            invite_id,
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        match self.decision {
            InviteDecision::Accept => Endpoint::AcceptInvite,
            InviteDecision::Reject => Endpoint::RejectInvite,
        }
    }

    /// Shown when the backend answers without a message.
    pub fn fallback_message(&self, success: bool) -> &'static str {
        match (self.decision, success) {
            (InviteDecision::Accept, true) => "Accepted successfully",
            (InviteDecision::Accept, false) => "Failed to accept",
            (InviteDecision::Reject, true) => "Rejected successfully",
            (InviteDecision::Reject, false) => "Failed to reject",
        }
    }
}

// ---------------------------------------------------------------------------
// POST users/nickname
// ---------------------------------------------------------------------------

/// Private display name for another member, visible only to the acting user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NicknameRequest {
    pub target_user_id: UserID,
    pub nickname: String,
}

impl NicknameRequest {
    pub fn new(target_user_id: UserID, nickname: &str) -> Result<Self, FormError> {
        Ok(NicknameRequest {
            target_user_id,
            nickname: validate_nickname(nickname)?,
        })
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint::SetNickname
    }
}

// ---------------------------------------------------------------------------
// GET groups/{id}/search-members
// ---------------------------------------------------------------------------

/// Query-string parameters for a member search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchMembersQuery {
    pub q: String,
}
