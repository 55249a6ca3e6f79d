/// Group membership selection: the client-side reconciliation core.
///
/// Every add, invite and edit screen stages a selection of user ids against
/// what the server already knows about the group. This module keeps that
/// staging consistent.
///
/// # Module structure
/// - `sets`: MembershipSets: existing members, pending invites, staged selection
/// - `reconciler`: SelectionReconciler: row classification, validated toggles, chips
/// - `edit_diff`: compute_removals and the opt-out EditSelection for edit-group
/// - `permissions`: creator-gated group actions
pub mod edit_diff;
pub mod permissions;
pub mod reconciler;
pub mod sets;

pub use edit_diff::{compute_removals, EditMemberEntry, EditSelection, EditToggle, RemovalPayload};
pub use permissions::{GroupAction, GroupPermissions, PermissionError};
pub use reconciler::{
    Candidate, ChipRemoval, RowState, SelectionReconciler, SelectionResult, ToggleOutcome,
    UserFacingError, ValidationError, EMPTY_ROSTER_MESSAGE, EMPTY_SELECTION_MESSAGE,
};
pub use sets::{BlockReason, BlockedError, MembershipSets, SelectionChange};
