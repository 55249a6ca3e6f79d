/// Selection reconciler. Binds a roster of candidates to `MembershipSets`.
///
/// Produces per-row display state for a search/list screen and applies
/// toggles with validation. The roster is replaced wholesale on every fetch;
/// the staged selection survives re-filtering for the life of the reconciler.

use std::collections::HashMap;
use thiserror::Error;

use crate::ids::UserID;
use crate::limits::{check_selection_limit, effective_selection_limit, SelectionLimitStatus};
use crate::membership::permissions::PermissionError;
use crate::membership::sets::{BlockReason, BlockedError, MembershipSets, SelectionChange};
use crate::validation::FormError;

/// Shown in place of the roster when it is empty.
pub const EMPTY_ROSTER_MESSAGE: &str = "No user found yet.";

/// Shown in place of the chip strip when nothing is staged.
pub const EMPTY_SELECTION_MESSAGE: &str = "No member selected. Please select a member!";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Submission preconditions. Never sent to the network.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No user found.")]
    NoCandidates,

    #[error("Please select at least one member.")]
    NoSelection,
}

/// Errors handed to the presentation collaborator. `Display` is the exact
/// alert text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UserFacingError {
    #[error("User already a group member.")]
    AlreadyMember,

    #[error("User already invited.")]
    AlreadyPending,

    #[error("You can select at most {0} members.")]
    SelectionLimitReached(usize),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Form(#[from] FormError),

    #[error("{0}")]
    Permission(#[from] PermissionError),

    /// Message supplied by the network collaborator, passed through untouched.
    #[error("{0}")]
    Upstream(String),
}

impl From<BlockedError> for UserFacingError {
    fn from(e: BlockedError) -> Self {
        match e.reason {
            BlockReason::AlreadyMember => UserFacingError::AlreadyMember,
            BlockReason::AlreadyPending => UserFacingError::AlreadyPending,
        }
    }
}

// ---------------------------------------------------------------------------
// Candidate / row state
// ---------------------------------------------------------------------------

/// A searchable user row. Immutable; rosters are replaced wholesale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub id: UserID,
    pub display_name: String,
    pub email: String,
    pub avatar_ref: Option<String>,
}

/// Per-row classification, independent of whether the row is checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionResult {
    Selectable,
    AlreadyMember,
    AlreadyPending,
}

/// Everything a list cell needs to render one roster row.
#[derive(Clone, Copy, Debug)]
pub struct RowState<'a> {
    pub candidate: &'a Candidate,
    pub result: SelectionResult,
    pub is_checked: bool,
}

/// Result of a successful toggle: the chip strip to render and the single
/// roster row to redraw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub change: SelectionChange,
    pub row: Option<usize>,
    pub chips: Vec<Candidate>,
}

/// Result of unstaging a chip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChipRemoval {
    pub row: Option<usize>,
    pub chips: Vec<Candidate>,
}

// ---------------------------------------------------------------------------
// SelectionReconciler
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default)]
pub struct SelectionReconciler {
    sets: MembershipSets,
    roster: Vec<Candidate>,
    /// Details of staged candidates, kept so chips still render after the
    /// candidate drops out of a filtered roster.
    staged: HashMap<UserID, Candidate>,
    max_selection: Option<usize>,
}

impl SelectionReconciler {
    /// Take ownership of `sets`. Any ids already staged on them are dropped:
    /// chips can only be rendered for candidates toggled through the
    /// reconciler.
    pub fn new(mut sets: MembershipSets) -> Self {
        if sets.has_selection() {
            log::debug!(
                "Dropping {} id(s) staged before the reconciler existed",
                sets.selected_count()
            );
            sets.clear_selection();
        }
        SelectionReconciler {
            sets,
            roster: Vec::new(),
            staged: HashMap::new(),
            max_selection: None,
        }
    }

    /// Cap the number of ids that may be staged at once.
    pub fn with_max_selection(mut self, limit: Option<usize>) -> Self {
        self.max_selection = limit;
        self
    }

    pub fn sets(&self) -> &MembershipSets {
        &self.sets
    }

    pub fn roster(&self) -> &[Candidate] {
        &self.roster
    }

    /// Rebuild the sets from a fresh server response. Clears the staged
    /// selection along with its chip details.
    pub fn reset_membership<E, P>(&mut self, existing: E, pending: P)
    where
        E: IntoIterator<Item = UserID>,
        P: IntoIterator<Item = UserID>,
    {
        self.sets.initialize(existing, pending);
        self.staged.clear();
    }

    /// Replace the roster wholesale. The staged selection is kept.
    pub fn replace_roster(&mut self, roster: Vec<Candidate>) {
        log::debug!(
            "Roster replaced: {} candidates, {} staged",
            roster.len(),
            self.sets.selected_count()
        );
        self.roster = roster;
    }

    pub fn classify(&self, candidate: &Candidate) -> SelectionResult {
        match self.sets.block_reason(candidate.id) {
            Some(BlockReason::AlreadyMember) => SelectionResult::AlreadyMember,
            Some(BlockReason::AlreadyPending) => SelectionResult::AlreadyPending,
            None => SelectionResult::Selectable,
        }
    }

    pub fn is_checked(&self, candidate: &Candidate) -> bool {
        self.sets.is_selected(candidate.id)
    }

    /// Row states for the whole roster, in roster order.
    pub fn rows(&self) -> Vec<RowState<'_>> {
        self.roster
            .iter()
            .map(|c| RowState {
                candidate: c,
                result: self.classify(c),
                is_checked: self.is_checked(c),
            })
            .collect()
    }

    /// Apply a user tap on `candidate`'s checkmark.
    pub fn on_toggle_requested(
        &mut self,
        candidate: &Candidate,
    ) -> Result<ToggleOutcome, UserFacingError> {
        let id = candidate.id;

        let adding = !self.sets.is_selected(id) && !self.sets.is_blocked(id);
        if adding {
            if let SelectionLimitStatus::LimitReached =
                check_selection_limit(self.sets.selected_count(), self.max_selection)
            {
                log::warn!("Selection limit reached, rejecting {}", id);
                return Err(UserFacingError::SelectionLimitReached(
                    effective_selection_limit(self.max_selection),
                ));
            }
        }

        let change = self.sets.toggle_selected(id).map_err(|e| {
            log::warn!("{}", e);
            UserFacingError::from(e)
        })?;

        match change {
            SelectionChange::Added => {
                self.staged.insert(id, candidate.clone());
            }
            SelectionChange::Removed => {
                self.staged.remove(&id);
            }
        }
        log::debug!("Toggled {}: {:?}", id, change);

        Ok(ToggleOutcome {
            change,
            row: self.row_of(id),
            chips: self.chips(),
        })
    }

    /// Unstage `id` from the chip strip. Never fails.
    pub fn remove_chip(&mut self, id: UserID) -> ChipRemoval {
        self.sets.remove_from_selection(id);
        self.staged.remove(&id);
        log::debug!("Chip removed: {}", id);
        ChipRemoval {
            row: self.row_of(id),
            chips: self.chips(),
        }
    }

    /// Staged candidates in first-add order.
    pub fn chips(&self) -> Vec<Candidate> {
        self.sets
            .selected_ids()
            .into_iter()
            .filter_map(|id| self.staged.get(&id).cloned())
            .collect()
    }

    pub fn empty_roster_message(&self) -> Option<&'static str> {
        self.roster.is_empty().then_some(EMPTY_ROSTER_MESSAGE)
    }

    pub fn empty_selection_message(&self) -> Option<&'static str> {
        (!self.sets.has_selection()).then_some(EMPTY_SELECTION_MESSAGE)
    }

    /// Check submission preconditions and return the ordered selection.
    pub fn submit(&self) -> Result<Vec<UserID>, ValidationError> {
        if self.roster.is_empty() {
            return Err(ValidationError::NoCandidates);
        }
        if !self.sets.has_selection() {
            return Err(ValidationError::NoSelection);
        }
        Ok(self.sets.selected_ids())
    }

    fn row_of(&self, id: UserID) -> Option<usize> {
        self.roster.iter().position(|c| c.id == id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [UserID; 0] = [];

    fn candidate(id: i64) -> Candidate {
        Candidate {
            id: UserID(id),
            display_name: format!("User {}", id),
            email: format!("user{}@example.com", id),
            avatar_ref: None,
        }
    }

    fn roster(raw: &[i64]) -> Vec<Candidate> {
        raw.iter().copied().map(candidate).collect()
    }

    /// existing = {1,2}, pending = {3}, roster = [1..5]
    fn scenario_a() -> SelectionReconciler {
        let sets = MembershipSets::from_server([UserID(1), UserID(2)], [UserID(3)]);
        let mut r = SelectionReconciler::new(sets);
        r.replace_roster(roster(&[1, 2, 3, 4, 5]));
        r
    }

    #[test]
    fn test_scenario_a_classification() {
        let r = scenario_a();
        let results: Vec<SelectionResult> = r.rows().iter().map(|row| row.result).collect();
        assert_eq!(
            results,
            vec![
                SelectionResult::AlreadyMember,
                SelectionResult::AlreadyMember,
                SelectionResult::AlreadyPending,
                SelectionResult::Selectable,
                SelectionResult::Selectable,
            ]
        );
    }

    #[test]
    fn test_classify_ignores_checked_state() {
        let mut r = scenario_a();
        let c4 = candidate(4);
        r.on_toggle_requested(&c4).unwrap();
        assert_eq!(r.classify(&c4), SelectionResult::Selectable);
        assert!(r.is_checked(&c4));
    }

    #[test]
    fn test_scenario_b_chips_follow_selection() {
        let mut r = scenario_a();
        r.on_toggle_requested(&candidate(4)).unwrap();
        r.on_toggle_requested(&candidate(5)).unwrap();
        let outcome = r.on_toggle_requested(&candidate(4)).unwrap();
        assert_eq!(outcome.change, SelectionChange::Removed);
        assert_eq!(outcome.row, Some(3));
        assert_eq!(outcome.chips, vec![candidate(5)]);
        assert_eq!(r.sets().selected_ids(), vec![UserID(5)]);
    }

    #[test]
    fn test_scenario_e_blocked_member_message() {
        let mut r = scenario_a();
        let err = r.on_toggle_requested(&candidate(1)).unwrap_err();
        assert_eq!(err, UserFacingError::AlreadyMember);
        assert_eq!(err.to_string(), "User already a group member.");
        assert!(r.sets().selected_ids().is_empty());
    }

    #[test]
    fn test_blocked_pending_message() {
        let mut r = scenario_a();
        let err = r.on_toggle_requested(&candidate(3)).unwrap_err();
        assert_eq!(err.to_string(), "User already invited.");
    }

    #[test]
    fn test_scenario_c_submit_preconditions() {
        let mut r = SelectionReconciler::new(MembershipSets::new());
        assert_eq!(r.submit(), Err(ValidationError::NoCandidates));

        r.replace_roster(roster(&[4]));
        assert_eq!(r.submit(), Err(ValidationError::NoSelection));

        r.on_toggle_requested(&candidate(4)).unwrap();
        assert_eq!(r.submit(), Ok(vec![UserID(4)]));
    }

    #[test]
    fn test_selection_survives_refilter() {
        let mut r = scenario_a();
        r.on_toggle_requested(&candidate(4)).unwrap();
        r.replace_roster(roster(&[5, 6]));
        assert_eq!(r.sets().selected_ids(), vec![UserID(4)]);
        // Chip for 4 still renders although 4 is no longer in the roster.
        assert_eq!(r.chips(), vec![candidate(4)]);

        let outcome = r.on_toggle_requested(&candidate(6)).unwrap();
        assert_eq!(outcome.row, Some(1));
        assert_eq!(outcome.chips, vec![candidate(4), candidate(6)]);
    }

    #[test]
    fn test_remove_chip() {
        let mut r = scenario_a();
        r.on_toggle_requested(&candidate(4)).unwrap();
        r.on_toggle_requested(&candidate(5)).unwrap();
        let removal = r.remove_chip(UserID(4));
        assert_eq!(removal.row, Some(3));
        assert_eq!(removal.chips, vec![candidate(5)]);

        // Unknown / already removed ids are fine.
        let removal = r.remove_chip(UserID(99));
        assert_eq!(removal.row, None);
        assert_eq!(removal.chips, vec![candidate(5)]);
    }

    #[test]
    fn test_selection_limit() {
        let sets = MembershipSets::new();
        let mut r = SelectionReconciler::new(sets).with_max_selection(Some(1));
        r.replace_roster(roster(&[4, 5]));
        r.on_toggle_requested(&candidate(4)).unwrap();

        let err = r.on_toggle_requested(&candidate(5)).unwrap_err();
        assert_eq!(err, UserFacingError::SelectionLimitReached(1));
        assert_eq!(err.to_string(), "You can select at most 1 members.");
        assert_eq!(r.sets().selected_ids(), vec![UserID(4)]);

        // Removal is always allowed at the limit.
        let outcome = r.on_toggle_requested(&candidate(4)).unwrap();
        assert_eq!(outcome.change, SelectionChange::Removed);
    }

    #[test]
    fn test_blocked_reported_before_limit() {
        let sets = MembershipSets::from_server([UserID(1)], NONE);
        let mut r = SelectionReconciler::new(sets).with_max_selection(Some(1));
        r.replace_roster(roster(&[1, 4]));
        r.on_toggle_requested(&candidate(4)).unwrap();
        let err = r.on_toggle_requested(&candidate(1)).unwrap_err();
        assert_eq!(err, UserFacingError::AlreadyMember);
    }

    #[test]
    fn test_reset_membership_clears_chips() {
        let mut r = scenario_a();
        r.on_toggle_requested(&candidate(4)).unwrap();
        r.reset_membership([UserID(4)], NONE);
        assert!(r.chips().is_empty());
        assert_eq!(r.classify(&candidate(4)), SelectionResult::AlreadyMember);
    }

    #[test]
    fn test_empty_state_messages() {
        let mut r = SelectionReconciler::new(MembershipSets::new());
        assert_eq!(r.empty_roster_message(), Some(EMPTY_ROSTER_MESSAGE));
        assert_eq!(r.empty_selection_message(), Some(EMPTY_SELECTION_MESSAGE));
        r.replace_roster(roster(&[4]));
        r.on_toggle_requested(&candidate(4)).unwrap();
        assert_eq!(r.empty_roster_message(), None);
        assert_eq!(r.empty_selection_message(), None);
    }

    #[test]
    fn test_new_drops_ids_staged_on_the_sets() {
        let mut sets = MembershipSets::from_server([UserID(1)], NONE);
        sets.toggle_selected(UserID(4)).unwrap();
        let mut r = SelectionReconciler::new(sets);
        r.replace_roster(roster(&[4, 5]));

        assert!(r.sets().selected_ids().is_empty());
        assert!(r.chips().is_empty());
        assert_eq!(r.submit(), Err(ValidationError::NoSelection));
        assert!(r.sets().is_existing(UserID(1)));

        // Chips and staged ids stay in lockstep from here on.
        let outcome = r.on_toggle_requested(&candidate(4)).unwrap();
        assert_eq!(outcome.chips, vec![candidate(4)]);
        assert_eq!(r.submit(), Ok(vec![UserID(4)]));
    }

    #[test]
    fn test_zero_limit_falls_back_to_hard_cap() {
        let mut r = SelectionReconciler::new(MembershipSets::new()).with_max_selection(Some(0));
        r.replace_roster(roster(&[4, 5]));
        r.on_toggle_requested(&candidate(4)).unwrap();
        r.on_toggle_requested(&candidate(5)).unwrap();
        assert_eq!(r.sets().selected_count(), 2);
    }

    #[test]
    fn test_validation_messages() {
        let e: UserFacingError = ValidationError::NoSelection.into();
        assert_eq!(e.to_string(), "Please select at least one member.");
        assert_eq!(ValidationError::NoCandidates.to_string(), "No user found.");
    }
}
