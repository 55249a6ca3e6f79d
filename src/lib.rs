//! # Connectly Core
//!
//! **Client-side group membership reconciliation for Connectly.**
//!
//! Connectly's add-members, invite and edit-group screens all stage a set of
//! user ids against what the backend already knows about a group. This crate
//! owns that staging so every screen agrees on:
//!
//! - who is already a member or has a pending invite (and cannot be picked again)
//! - which candidates are staged, in the order they were picked
//! - which members an edit removes (never the creator, never the acting user)
//! - which group actions the acting user may take (only the creator manages)
//! - the exact alert text shown when something is refused
//!
//! The crate performs no I/O. A host feeds it decoded server responses and
//! sends the request bodies it builds.
//!
//! ## Quick Start
//!
//! ```rust
//! use connectly_core::api::{decode_data, GroupDetails};
//! use connectly_core::{AddMembersSession, ClientConfig, GroupID};
//!
//! let body = br#"{"success": true, "data": {"members": [{"user_id": 1}], "pending_members": []}}"#;
//! let details: GroupDetails = decode_data(body).unwrap();
//!
//! let mut session = AddMembersSession::new(GroupID(7), &ClientConfig::default());
//! session.apply_group_details(&details);
//! assert_eq!(session.rows().len(), 1);
//! assert!(session.submit().is_err());
//! ```
//!
//! ## Architecture
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`ids`] | Newtype ids for users, groups and invites |
//! | [`limits`] | Selection cap and form-length guardrails |
//! | [`membership`] | MembershipSets, SelectionReconciler, edit-group removal diff, permissions |
//! | [`validation`] | Form checks: group name, email, password change |
//! | [`config`] | Client configuration (base URL, selection limit) |
//! | [`api`] | Endpoint table, request bodies, response envelope decoding |
//! | [`session`] | Per-screen drivers for the group screen, add-members and edit-group |

#![allow(
    clippy::empty_line_after_doc_comments,
    clippy::doc_lazy_continuation,
    clippy::new_without_default
)]

// ── Public modules ──────────────────────────────────────────────────────────

/// Strongly typed identifiers.
pub mod ids;

/// Guardrail constants.
pub mod limits;

/// Membership sets, selection reconciliation and the edit-group diff.
pub mod membership;

/// Form validation with user-facing alert text.
pub mod validation;

/// Client configuration.
pub mod config;

/// Backend contract: endpoints, request and response bodies.
pub mod api;

/// Screen-session drivers.
pub mod session;

// ── Re-exports for convenience ──────────────────────────────────────────────

pub use ids::{GroupID, InviteID, UserID};

pub use membership::{
    compute_removals, BlockReason, BlockedError, Candidate, EditMemberEntry, EditSelection,
    EditToggle, GroupAction, GroupPermissions, MembershipSets, PermissionError, RemovalPayload,
    SelectionChange, SelectionReconciler, SelectionResult, UserFacingError, ValidationError,
};

pub use validation::FormError;

pub use config::{ClientConfig, ConfigError};

pub use api::ApiError;

pub use session::{AddMembersSession, EditGroupSession, GroupSession, QueryAction};

// ── Library metadata ────────────────────────────────────────────────────────

/// Connectly core version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version string.
pub fn version() -> &'static str {
    VERSION
}

// ── Tests ───────────────────────────────────────────────────────────────────
