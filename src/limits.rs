/// Client-side guardrails for group forms and member selection.
///
/// These constants bound what the client is willing to stage or submit
/// before the backend ever sees it.

/// Minimum password length accepted by the change/reset password forms.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Max group name length (characters, after trimming).
pub const MAX_GROUP_NAME_LEN: usize = 100;

/// Max group description length (characters).
pub const MAX_GROUP_DESCRIPTION_LEN: usize = 1_000;

/// Max ids accepted in a single add-members request, regardless of the
/// configured per-screen selection limit.
pub const HARD_CAP_SELECTION: usize = 500;

/// Selection limit status for a staged selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionLimitStatus {
    /// Room for at least one more selection.
    Ok,
    /// Limit reached; further additions are rejected, removals still allowed.
    LimitReached,
}

/// Limit actually enforced for a configured per-screen limit.
///
/// `None` and `Some(0)` both mean "no configured limit"; the hard cap always
/// applies.
pub fn effective_selection_limit(limit: Option<usize>) -> usize {
    match limit {
        Some(l) if l > 0 => l.min(HARD_CAP_SELECTION),
        _ => HARD_CAP_SELECTION,
    }
}

/// Check whether one more id may be added to a selection of `selected_count`.
pub fn check_selection_limit(selected_count: usize, limit: Option<usize>) -> SelectionLimitStatus {
    if selected_count >= effective_selection_limit(limit) {
        SelectionLimitStatus::LimitReached
    } else {
        SelectionLimitStatus::Ok
    }
}
