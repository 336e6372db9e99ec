//! Console role enum.

use serde::{Deserialize, Serialize};

/// Role of a signed-in console user.
///
/// Role storage and permission checks live in the backend; this type only
/// labels the session context so callers can route to the right dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full visibility across all departments.
    Supervisor,
    HumanResources,
    Sales,
    Finance,
    It,
    SocialMedia,
}
