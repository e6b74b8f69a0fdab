use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A member's role within an organization.
///
/// Variants are declared in ascending order of privilege, so the derived
/// `Ord` gives `Member < Admin < Owner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub enum UserRole {
    Member,
    Admin,
    Owner,
}

impl UserRole {
    /// Look up a role by its wire name. Matching is exact and case-sensitive;
    /// anything else yields `None`.
    pub fn from_wire(role: &str) -> Option<Self> {
        match role {
            "Member" => Some(UserRole::Member),
            "Admin" => Some(UserRole::Admin),
            "Owner" => Some(UserRole::Owner),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Member => "Member",
            UserRole::Admin => "Admin",
            UserRole::Owner => "Owner",
        }
    }

    /// True if this role grants at least the privileges of `other`.
    pub fn is_at_least(&self, other: UserRole) -> bool {
        *self >= other
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The caller's membership in one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct OrgMemberInfo {
    pub org_id: String,
    pub org_name: String,
    // Absent when the service reports a role this client doesn't know.
    #[serde(
        default,
        deserialize_with = "deserialize_role",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_role: Option<UserRole>,
}

/// Any value that isn't a known role name becomes `None`.
fn deserialize_role<'de, D>(deserializer: D) -> Result<Option<UserRole>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_str)
        .and_then(UserRole::from_wire))
}

impl OrgMemberInfo {
    pub fn role_display(&self) -> &'static str {
        match self.user_role {
            Some(role) => role.as_str(),
            None => "Unknown",
        }
    }

    pub fn has_role_at_least(&self, role: UserRole) -> bool {
        self.user_role.map(|r| r.is_at_least(role)).unwrap_or(false)
    }
}
