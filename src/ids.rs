/// Core identity types for the Connectly group system.
///
/// - `UserID`: backend-assigned integer user identity
/// - `GroupID`: backend-assigned integer group identity
/// - `InviteID`: identity of a pending invitation (used for re-invites)
///
/// All three serialize as bare integers so they drop straight into request
/// bodies and decode straight out of responses.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// UserID
// ---------------------------------------------------------------------------

/// Opaque user identity. Unique per user, stable for the process lifetime.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserID(pub i64);

impl UserID {
    /// Return the raw backend value.
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for UserID {
    fn from(raw: i64) -> Self {
        UserID(raw)
    }
}

impl fmt::Debug for UserID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserID({})", self.0)
    }
}

impl fmt::Display for UserID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// GroupID
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupID(pub i64);

impl GroupID {
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for GroupID {
    fn from(raw: i64) -> Self {
        GroupID(raw)
    }
}

impl fmt::Debug for GroupID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupID({})", self.0)
    }
}

impl fmt::Display for GroupID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// InviteID
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InviteID(pub i64);

impl fmt::Debug for InviteID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InviteID({})", self.0)
    }
}

impl fmt::Display for InviteID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
