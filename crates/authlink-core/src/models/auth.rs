use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

use super::{OrgMemberInfo, User};

/// Org id → the caller's membership in that org.
pub type OrgIdToOrgMemberInfo = BTreeMap<String, OrgMemberInfo>;

/// Result of a successful refresh: a fresh access token plus who it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct AuthenticationInfo {
    pub access_token: String,
    #[cfg_attr(feature = "ts", ts(type = "number"))]
    #[serde(deserialize_with = "deserialize_epoch_seconds")]
    pub expires_at_seconds: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id_to_org_member_info: Option<OrgIdToOrgMemberInfo>,
    pub user: User,
}

/// Whole seconds since epoch. The service may send them as `100` or `100.0`;
/// fractional or out-of-range values are rejected.
fn deserialize_epoch_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;
    if let Some(secs) = number.as_i64() {
        return Ok(secs);
    }
    match number.as_f64() {
        Some(secs) if secs.fract() == 0.0 && secs >= i64::MIN as f64 && secs < i64::MAX as f64 => {
            Ok(secs as i64)
        }
        _ => Err(D::Error::custom(format!(
            "expected whole seconds since epoch, got {}",
            number
        ))),
    }
}

impl AuthenticationInfo {
    /// All org memberships, empty if the service sent none.
    pub fn orgs(&self) -> impl Iterator<Item = &OrgMemberInfo> {
        self.org_id_to_org_member_info
            .iter()
            .flat_map(|orgs| orgs.values())
    }

    pub fn org(&self, org_id: &str) -> Option<&OrgMemberInfo> {
        self.org_id_to_org_member_info
            .as_ref()
            .and_then(|orgs| orgs.get(org_id))
    }

    pub fn org_by_name(&self, org_name: &str) -> Option<&OrgMemberInfo> {
        self.orgs().find(|org| org.org_name == org_name)
    }

    /// Expiry as a timestamp. `None` only if the service sent an out-of-range value.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expires_at_seconds, 0)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.expires_at_seconds
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn seconds_until_expiry_at(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at_seconds - now.timestamp()).max(0)
    }
}

/// Body of a successful logout.
///
/// The field name is taken from the wire as-is; unlike `AuthenticationInfo`
/// this type is not run through the key translator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct LogoutResponse {
    pub redirect_to: String,
}
