/// Backend contract: endpoint table plus request and response bodies.
///
/// The crate never performs HTTP itself. A host's network layer asks an
/// `Endpoint` for its path and method, serializes a request from `requests`,
/// and hands the raw response body to `decode_response`.
///
/// # Module structure
/// - `requests`: serializable request bodies (add, edit, create, invite, reinvite)
/// - `responses`: envelope and data bodies (group details, search, pending invites)
pub mod requests;
pub mod responses;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::ids::GroupID;
use crate::membership::UserFacingError;

pub use requests::{
    encode_icon, AddMembersRequest, CreateGroupRequest, EditGroupRequest, ExitGroupRequest,
    InviteDecision, InviteMemberRequest, InviteResponseRequest, NicknameRequest, ReinviteRequest,
    SearchMembersQuery,
};
pub use responses::{
    ApiEnvelope, GroupDetails, GroupMember, PendingInvite, SearchResult, SearchResults,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Response decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Response carried no data")]
    MissingData,
}

impl From<ApiError> for UserFacingError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Decode(_) => UserFacingError::Upstream("Invalid server response.".into()),
            ApiError::Rejected(message) => UserFacingError::Upstream(message),
            ApiError::MissingData => UserFacingError::Upstream("Empty server response.".into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// Endpoints used by the membership flows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    GroupDetails(GroupID),
    SearchMembers(GroupID),
    PendingInvites(GroupID),
    AddMembers,
    EditGroup,
    CreateGroup,
    DeleteGroup(GroupID),
    ExitGroup,
    InviteMember,
    Reinvite,
    AcceptInvite,
    RejectInvite,
    SetNickname,
}

impl Endpoint {
    /// Path relative to the API base URL.
    pub fn path(&self) -> String {
        match self {
            Endpoint::GroupDetails(id) => format!("groups/{}", id),
            Endpoint::SearchMembers(id) => format!("groups/{}/search-members", id),
            Endpoint::PendingInvites(id) => format!("groups/{}/pending-invites", id),
            Endpoint::AddMembers => "groups/add-members".to_string(),
            Endpoint::EditGroup => "groups/edit".to_string(),
            Endpoint::CreateGroup => "groups/create".to_string(),
            Endpoint::DeleteGroup(id) => format!("groups/{}", id),
            Endpoint::ExitGroup => "groups/exit".to_string(),
            Endpoint::InviteMember => "groups/invite-member".to_string(),
            Endpoint::Reinvite => "groups/reinvite".to_string(),
            Endpoint::AcceptInvite => "notifications/accept".to_string(),
            Endpoint::RejectInvite => "notifications/reject".to_string(),
            Endpoint::SetNickname => "users/nickname".to_string(),
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Endpoint::GroupDetails(_) | Endpoint::SearchMembers(_) | Endpoint::PendingInvites(_) => {
                Method::Get
            }
            Endpoint::EditGroup => Method::Put,
            Endpoint::DeleteGroup(_) => Method::Delete,
            Endpoint::AddMembers
            | Endpoint::CreateGroup
            | Endpoint::ExitGroup
            | Endpoint::InviteMember
            | Endpoint::Reinvite
            | Endpoint::AcceptInvite
            | Endpoint::RejectInvite
            | Endpoint::SetNickname => Method::Post,
        }
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode a response envelope. An explicit `success: false` becomes
/// `ApiError::Rejected` carrying the server's message.
pub fn decode_response<T: DeserializeOwned>(body: &[u8]) -> Result<ApiEnvelope<T>, ApiError> {
    let envelope: ApiEnvelope<T> = serde_json::from_slice(body)?;
    if envelope.is_rejected() {
        let message = envelope
            .message
            .clone()
            .unwrap_or_else(|| "Something went wrong.".to_string());
        log::warn!("Backend rejected request: {}", message);
        return Err(ApiError::Rejected(message));
    }
    Ok(envelope)
}

/// Decode a response envelope and require its `data` field.
pub fn decode_data<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    decode_response::<T>(body)?.data.ok_or(ApiError::MissingData)
}
