/// Screen-session drivers for the group, add-members and edit-group flows.
///
/// A session is created when a screen opens and dropped when it closes; it
/// owns all membership state for that visit. Network results are fed in as
/// decoded values, and every entry point runs synchronously on the caller's
/// thread. Each session carries a random id that tags its log lines.

use uuid::Uuid;

use crate::api::{
    encode_icon, AddMembersRequest, EditGroupRequest, Endpoint, ExitGroupRequest, GroupDetails,
    InviteMemberRequest, NicknameRequest, SearchMembersQuery, SearchResults,
};
use crate::config::ClientConfig;
use crate::ids::{GroupID, UserID};
use crate::membership::{
    Candidate, ChipRemoval, EditMemberEntry, EditSelection, EditToggle, GroupAction,
    GroupPermissions, MembershipSets, PermissionError, RowState, SelectionReconciler,
    ToggleOutcome, UserFacingError,
};
use crate::validation::{validate_group_description, validate_group_name, FormError};

// ---------------------------------------------------------------------------
// Group screen
// ---------------------------------------------------------------------------

/// The group overview screen. Decides which actions the acting user sees and
/// opens the add-members and edit-group sessions behind them.
#[derive(Debug)]
pub struct GroupSession {
    session_id: Uuid,
    group_id: GroupID,
    details: GroupDetails,
    permissions: GroupPermissions,
}

impl GroupSession {
    pub fn from_details(group_id: GroupID, details: GroupDetails, acting_user_id: UserID) -> Self {
        let session_id = Uuid::new_v4();
        let permissions = details.permissions_for(acting_user_id);
        log::debug!(
            "[{}] group {} opened by {} (creator: {})",
            session_id,
            group_id,
            acting_user_id,
            permissions.is_creator()
        );
        GroupSession {
            session_id,
            group_id,
            details,
            permissions,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn details(&self) -> &GroupDetails {
        &self.details
    }

    pub fn permissions(&self) -> &GroupPermissions {
        &self.permissions
    }

    /// Buttons to show, in display order.
    pub fn visible_actions(&self) -> Vec<GroupAction> {
        self.permissions.allowed_actions()
    }

    fn require(&self, action: GroupAction) -> Result<(), PermissionError> {
        self.permissions.check(action).map_err(|e| {
            log::warn!("[{}] {}", self.session_id, e);
            e
        })
    }

    pub fn open_add_members(
        &self,
        config: &ClientConfig,
    ) -> Result<AddMembersSession, PermissionError> {
        self.require(GroupAction::AddMembers)?;
        let mut session = AddMembersSession::new(self.group_id, config);
        session.apply_group_details(&self.details);
        Ok(session)
    }

    pub fn open_edit(&self) -> Result<EditGroupSession, PermissionError> {
        self.require(GroupAction::EditGroup)?;
        Ok(EditGroupSession::from_details(
            self.group_id,
            &self.details,
            self.permissions.acting_user_id(),
        ))
    }

    pub fn invite(&self, email: &str) -> Result<InviteMemberRequest, UserFacingError> {
        self.require(GroupAction::InviteMembers)?;
        Ok(InviteMemberRequest::new(self.group_id, email)?)
    }

    /// Endpoint to call once the user confirms deletion.
    pub fn delete(&self) -> Result<Endpoint, PermissionError> {
        self.require(GroupAction::DeleteGroup)?;
        log::info!("[{}] deleting group {}", self.session_id, self.group_id);
        Ok(Endpoint::DeleteGroup(self.group_id))
    }

    pub fn exit(&self) -> Result<ExitGroupRequest, PermissionError> {
        self.require(GroupAction::ExitGroup)?;
        log::info!("[{}] leaving group {}", self.session_id, self.group_id);
        Ok(ExitGroupRequest {
            group_id: self.group_id,
        })
    }

    pub fn set_nickname(
        &self,
        target_user_id: UserID,
        nickname: &str,
    ) -> Result<NicknameRequest, UserFacingError> {
        self.require(GroupAction::SetNickname)?;
        Ok(NicknameRequest::new(target_user_id, nickname)?)
    }

    /// Record a nickname the backend accepted.
    pub fn apply_nickname(&mut self, request: &NicknameRequest) {
        if let Some(member) = self
            .details
            .members
            .iter_mut()
            .find(|m| m.user_id == Some(request.target_user_id))
        {
            member.nickname = Some(request.nickname.clone());
        }
    }
}

// ---------------------------------------------------------------------------
// Add members
// ---------------------------------------------------------------------------

/// What the host should do after the search text changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryAction {
    /// Query is blank; the roster was reset to the group's member list.
    ShowBaseRoster,
    /// Run a remote search, then call `apply_search_results`.
    FetchRemote {
        endpoint: Endpoint,
        query: SearchMembersQuery,
    },
}

#[derive(Debug)]
pub struct AddMembersSession {
    session_id: Uuid,
    group_id: GroupID,
    reconciler: SelectionReconciler,
    /// Roster shown when the search box is blank.
    base_roster: Vec<Candidate>,
    config: ClientConfig,
}

impl AddMembersSession {
    pub fn new(group_id: GroupID, config: &ClientConfig) -> Self {
        let session_id = Uuid::new_v4();
        log::debug!("[{}] add-members session opened for group {}", session_id, group_id);
        AddMembersSession {
            session_id,
            group_id,
            reconciler: SelectionReconciler::new(MembershipSets::new())
                .with_max_selection(config.max_selection_limit),
            base_roster: Vec::new(),
            config: config.clone(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn group_id(&self) -> GroupID {
        self.group_id
    }

    pub fn reconciler(&self) -> &SelectionReconciler {
        &self.reconciler
    }

    /// Endpoint to fetch when the screen opens.
    pub fn details_endpoint(&self) -> Endpoint {
        Endpoint::GroupDetails(self.group_id)
    }

    /// Rebuild membership from a fresh group-details response. Discards any
    /// staged selection.
    pub fn apply_group_details(&mut self, details: &GroupDetails) {
        self.reconciler
            .reset_membership(details.existing_ids(), details.pending_ids());
        self.base_roster = self.config.resolve_avatars(details.member_candidates());
        self.reconciler.replace_roster(self.base_roster.clone());
        log::info!(
            "[{}] group {} loaded: {} members, {} pending",
            self.session_id,
            self.group_id,
            details.members.len(),
            details.pending_members.len()
        );
    }

    /// React to a change of the search text.
    pub fn apply_query(&mut self, query: &str) -> QueryAction {
        let query = query.trim();
        if query.is_empty() {
            self.reconciler.replace_roster(self.base_roster.clone());
            return QueryAction::ShowBaseRoster;
        }
        log::debug!("[{}] searching {:?}", self.session_id, query);
        QueryAction::FetchRemote {
            endpoint: Endpoint::SearchMembers(self.group_id),
            query: SearchMembersQuery {
                q: query.to_string(),
            },
        }
    }

    /// Replace the roster with search results. The staged selection is kept.
    pub fn apply_search_results(&mut self, results: &SearchResults) {
        self.reconciler
            .replace_roster(self.config.resolve_avatars(results.candidates()));
    }

    pub fn rows(&self) -> Vec<RowState<'_>> {
        self.reconciler.rows()
    }

    pub fn toggle(&mut self, candidate: &Candidate) -> Result<ToggleOutcome, UserFacingError> {
        let result = self.reconciler.on_toggle_requested(candidate);
        if let Err(e) = &result {
            log::debug!("[{}] toggle of {} refused: {}", self.session_id, candidate.id, e);
        }
        result
    }

    pub fn remove_chip(&mut self, id: UserID) -> ChipRemoval {
        self.reconciler.remove_chip(id)
    }

    pub fn chips(&self) -> Vec<Candidate> {
        self.reconciler.chips()
    }

    /// Validate and build the add-members request.
    pub fn submit(&self) -> Result<AddMembersRequest, UserFacingError> {
        let user_ids = self.reconciler.submit()?;
        log::info!(
            "[{}] submitting {} member(s) to group {}",
            self.session_id,
            user_ids.len(),
            self.group_id
        );
        Ok(AddMembersRequest {
            group_id: self.group_id,
            user_ids,
        })
    }
}

// ---------------------------------------------------------------------------
// Edit group
// ---------------------------------------------------------------------------

/// One row of the edit-group member list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditRow {
    pub entry: EditMemberEntry,
    pub is_checked: bool,
    /// Creator badge or the acting user's own row; the checkmark is inert.
    pub is_protected: bool,
}

#[derive(Debug)]
pub struct EditGroupSession {
    session_id: Uuid,
    group_id: GroupID,
    name: String,
    description: String,
    icon_base64: Option<String>,
    selection: EditSelection,
}

impl EditGroupSession {
    pub fn from_details(group_id: GroupID, details: &GroupDetails, acting_user_id: UserID) -> Self {
        let session_id = Uuid::new_v4();
        let selection = EditSelection::new(details.edit_entries(), acting_user_id);
        log::debug!(
            "[{}] edit session opened for group {} with {} members",
            session_id,
            group_id,
            selection.original().len()
        );
        EditGroupSession {
            session_id,
            group_id,
            name: details.group_name.clone().unwrap_or_default(),
            description: details.group_description.clone().unwrap_or_default(),
            icon_base64: None,
            selection,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    /// Attach a newly picked icon (already-encoded image bytes).
    pub fn set_icon(&mut self, bytes: &[u8]) {
        self.icon_base64 = (!bytes.is_empty()).then(|| encode_icon(bytes));
    }

    pub fn rows(&self) -> Vec<EditRow> {
        self.selection
            .original()
            .iter()
            .map(|entry| EditRow {
                entry: *entry,
                is_checked: self.selection.is_checked(entry.id),
                is_protected: self.selection.is_protected(entry),
            })
            .collect()
    }

    pub fn toggle(&mut self, id: UserID) -> EditToggle {
        let outcome = self.selection.toggle(id);
        log::debug!("[{}] edit toggle {}: {:?}", self.session_id, id, outcome);
        outcome
    }

    /// Validate the form and build the edit request.
    pub fn submit(&self) -> Result<EditGroupRequest, FormError> {
        let group_name = validate_group_name(&self.name)?;
        let group_description = validate_group_description(&self.description)?;
        let members = self.selection.removals();
        log::info!(
            "[{}] editing group {}: {} removal(s)",
            self.session_id,
            self.group_id,
            members.len()
        );
        Ok(EditGroupRequest {
            group_id: self.group_id,
            group_name,
            group_description,
            group_icon_base64: self.icon_base64.clone(),
            members,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::decode_data;
    use crate::api::Method;
    use crate::membership::{RemovalPayload, SelectionResult, ValidationError};

    const DETAILS: &[u8] = br#"{
        "success": true,
        "data": {
            "group_id": 8,
            "group_name": "Runners",
            "group_description": "Sunday runs",
            "members": [
                {"user_id": 10, "display_name": "Creator", "is_creator": true},
                {"user_id": 11, "display_name": "Me"},
                {"user_id": 12, "display_name": "Pat"}
            ],
            "pending_members": [{"user_id": 13}]
        }
    }"#;

    const SEARCH: &[u8] = br#"{
        "data": {"results": [
            {"user_id": 12, "name": "Pat", "email": "pat@x.io"},
            {"user_id": 13, "name": "Quinn", "email": "quinn@x.io"},
            {"user_id": 14, "name": "Rae", "email": "rae@x.io", "profile_image": "/media/rae.png"},
            {"user_id": 15, "name": "Sol", "email": "sol@x.io"}
        ]}
    }"#;

    fn details() -> GroupDetails {
        decode_data(DETAILS).unwrap()
    }

    fn search() -> SearchResults {
        decode_data(SEARCH).unwrap()
    }

    #[test]
    fn test_add_members_flow() {
        let mut session = AddMembersSession::new(GroupID(8), &ClientConfig::default());
        session.apply_group_details(&details());
        assert_eq!(session.rows().len(), 3);
        // Every base-roster row is an existing member.
        assert!(session
            .rows()
            .iter()
            .all(|r| r.result == SelectionResult::AlreadyMember));

        let action = session.apply_query("  ra ");
        assert_eq!(
            action,
            QueryAction::FetchRemote {
                endpoint: Endpoint::SearchMembers(GroupID(8)),
                query: SearchMembersQuery { q: "ra".into() },
            }
        );
        session.apply_search_results(&search());

        let rows: Vec<Candidate> = session.rows().iter().map(|r| r.candidate.clone()).collect();
        assert_eq!(
            session.toggle(&rows[0]).unwrap_err().to_string(),
            "User already a group member."
        );
        assert_eq!(
            session.toggle(&rows[1]).unwrap_err().to_string(),
            "User already invited."
        );
        session.toggle(&rows[3]).unwrap();
        let outcome = session.toggle(&rows[2]).unwrap();
        assert_eq!(outcome.row, Some(2));

        let request = session.submit().unwrap();
        assert_eq!(request.group_id, GroupID(8));
        assert_eq!(request.user_ids, vec![UserID(15), UserID(14)]);
    }

    #[test]
    fn test_blank_query_restores_base_roster_and_keeps_selection() {
        let mut session = AddMembersSession::new(GroupID(8), &ClientConfig::default());
        session.apply_group_details(&details());
        session.apply_search_results(&search());
        let rae = session.rows()[2].candidate.clone();
        session.toggle(&rae).unwrap();

        assert_eq!(session.apply_query("   "), QueryAction::ShowBaseRoster);
        assert_eq!(session.rows().len(), 3);
        assert_eq!(session.chips(), vec![rae]);
    }

    #[test]
    fn test_add_members_submit_errors() {
        let mut session = AddMembersSession::new(GroupID(8), &ClientConfig::default());
        assert_eq!(
            session.submit().unwrap_err(),
            UserFacingError::Validation(ValidationError::NoCandidates)
        );
        session.apply_group_details(&details());
        assert_eq!(
            session.submit().unwrap_err(),
            UserFacingError::Validation(ValidationError::NoSelection)
        );
    }

    #[test]
    fn test_refetch_clears_selection() {
        let mut session = AddMembersSession::new(GroupID(8), &ClientConfig::default());
        session.apply_group_details(&details());
        session.apply_search_results(&search());
        let sol = session.rows()[3].candidate.clone();
        session.toggle(&sol).unwrap();
        session.apply_group_details(&details());
        assert!(session.chips().is_empty());
    }

    #[test]
    fn test_config_limit_applies() {
        let config = ClientConfig {
            max_selection_limit: Some(1),
            ..ClientConfig::default()
        };
        let mut session = AddMembersSession::new(GroupID(8), &config);
        session.apply_group_details(&details());
        session.apply_search_results(&search());
        let rows: Vec<Candidate> = session.rows().iter().map(|r| r.candidate.clone()).collect();
        session.toggle(&rows[2]).unwrap();
        assert_eq!(
            session.toggle(&rows[3]).unwrap_err(),
            UserFacingError::SelectionLimitReached(1)
        );
    }

    #[test]
    fn test_remove_chip_from_session() {
        let mut session = AddMembersSession::new(GroupID(8), &ClientConfig::default());
        session.apply_group_details(&details());
        session.apply_search_results(&search());
        let rae = session.rows()[2].candidate.clone();
        session.toggle(&rae).unwrap();
        let removal = session.remove_chip(rae.id);
        assert_eq!(removal.row, Some(2));
        assert!(removal.chips.is_empty());
    }

    #[test]
    fn test_edit_group_flow() {
        let mut session = EditGroupSession::from_details(GroupID(8), &details(), UserID(11));
        assert_eq!(session.name(), "Runners");
        assert!(session.rows().iter().all(|r| r.is_checked));
        assert!(session.rows()[0].is_protected);
        assert!(session.rows()[1].is_protected);
        assert!(!session.rows()[2].is_protected);

        assert_eq!(session.toggle(UserID(10)), EditToggle::Protected);
        assert_eq!(session.toggle(UserID(11)), EditToggle::Protected);
        assert_eq!(session.toggle(UserID(12)), EditToggle::Unchecked);

        session.set_name("  Runners Club ");
        let request = session.submit().unwrap();
        assert_eq!(request.group_name, "Runners Club");
        assert_eq!(request.group_description, "Sunday runs");
        assert_eq!(request.members, vec![RemovalPayload::new(UserID(12))]);
        assert_eq!(request.group_icon_base64, None);
    }

    #[test]
    fn test_edit_group_requires_name() {
        let mut session = EditGroupSession::from_details(GroupID(8), &details(), UserID(11));
        session.set_name("   ");
        assert_eq!(session.submit().unwrap_err(), FormError::GroupNameRequired);
    }

    #[test]
    fn test_edit_group_untouched_sends_no_members() {
        let mut session = EditGroupSession::from_details(GroupID(8), &details(), UserID(11));
        session.set_icon(b"png");
        let request = session.submit().unwrap();
        assert!(request.members.is_empty());
        assert_eq!(request.group_icon_base64.as_deref(), Some("cG5n"));
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("members").is_none());
    }

    #[test]
    fn test_zero_limit_config_does_not_block_adds() {
        let config = ClientConfig {
            max_selection_limit: Some(0),
            ..ClientConfig::default()
        };
        let mut session = AddMembersSession::new(GroupID(8), &config);
        session.apply_group_details(&details());
        session.apply_search_results(&search());
        let rae = session.rows()[2].candidate.clone();
        assert!(session.toggle(&rae).is_ok());
    }

    #[test]
    fn test_search_avatars_are_resolved() {
        let mut session = AddMembersSession::new(GroupID(8), &ClientConfig::default());
        session.apply_search_results(&search());
        let rows = session.rows();
        assert_eq!(
            rows[2].candidate.avatar_ref.as_deref(),
            Some("http://192.168.5.39:8000/media/rae.png")
        );
        assert_eq!(rows[3].candidate.avatar_ref, None);
    }

    #[test]
    fn test_group_session_creator() {
        let session = GroupSession::from_details(GroupID(8), details(), UserID(10));
        assert!(!session.visible_actions().contains(&GroupAction::ExitGroup));
        assert_eq!(session.delete().unwrap(), Endpoint::DeleteGroup(GroupID(8)));
        assert_eq!(session.delete().unwrap().method(), Method::Delete);
        assert_eq!(session.exit().unwrap_err(), PermissionError::CreatorCannotExit);

        let add = session.open_add_members(&ClientConfig::default()).unwrap();
        assert_eq!(add.rows().len(), 3);
        let edit = session.open_edit().unwrap();
        assert_eq!(edit.name(), "Runners");

        let invite = session.invite(" new@x.io ").unwrap();
        assert_eq!(invite.email, "new@x.io");
        assert_eq!(
            session.invite("nope").unwrap_err().to_string(),
            "Please enter a valid email address."
        );
    }

    #[test]
    fn test_group_session_member_can_only_exit() {
        let session = GroupSession::from_details(GroupID(8), details(), UserID(11));
        assert_eq!(
            session.visible_actions(),
            vec![GroupAction::ExitGroup, GroupAction::SetNickname]
        );
        assert_eq!(
            session.exit().unwrap(),
            ExitGroupRequest { group_id: GroupID(8) }
        );
        assert_eq!(
            session.delete().unwrap_err(),
            PermissionError::CreatorOnly(GroupAction::DeleteGroup)
        );
        assert!(session.open_add_members(&ClientConfig::default()).is_err());
        assert!(session.open_edit().is_err());
        assert_eq!(
            session.invite("a@b.co").unwrap_err().to_string(),
            "Only the group creator can invite members."
        );
    }

    #[test]
    fn test_group_session_nickname() {
        let mut session = GroupSession::from_details(GroupID(8), details(), UserID(11));
        assert_eq!(
            session.set_nickname(UserID(12), "  ").unwrap_err(),
            UserFacingError::Form(FormError::NicknameRequired)
        );
        let request = session.set_nickname(UserID(12), " Patty ").unwrap();
        assert_eq!(request.endpoint(), Endpoint::SetNickname);
        session.apply_nickname(&request);
        assert_eq!(session.details().members[2].shown_name(), "Patty");
    }
}
