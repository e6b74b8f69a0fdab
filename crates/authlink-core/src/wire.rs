//! Translation from the service's snake_case wire format to camelCase.
//!
//! The service answers with keys like `access_token` and `org_id`; the
//! models use `accessToken` and `orgId`. Translation runs over a generic
//! `serde_json::Value` tree before the typed models are built, so it applies
//! at every nesting depth regardless of where a key appears.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{AuthenticationInfo, UserRole};

/// Wire key → application key. Keys outside this table are left alone.
const KEY_RENAMES: &[(&str, &str)] = &[
    ("org_id", "orgId"),
    ("org_name", "orgName"),
    ("user_role", "userRole"),
    ("access_token", "accessToken"),
    ("expires_at_seconds", "expiresAtSeconds"),
    ("org_id_to_org_member_info", "orgIdToOrgMemberInfo"),
    ("user_id", "userId"),
];

const USER_ROLE_KEY: &str = "user_role";

#[derive(Error, Debug)]
pub enum WireError {
    #[error("Malformed JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("Unexpected response shape: {0}")]
    Shape(#[source] serde_json::Error),
}

fn renamed_key(key: &str) -> Option<&'static str> {
    KEY_RENAMES
        .iter()
        .find(|(wire, _)| *wire == key)
        .map(|(_, app)| *app)
}

/// Map a wire role onto its canonical name. Non-strings and unknown roles
/// have no mapping.
fn role_value(value: &Value) -> Option<Value> {
    value
        .as_str()
        .and_then(UserRole::from_wire)
        .map(|role| Value::String(role.as_str().to_string()))
}

/// Rewrite every known snake_case key in `value` to its camelCase form.
///
/// Children are converted before their parent, so a renamed key always
/// carries an already-converted value. A `user_role` whose value is not a
/// known role leaves `userRole` absent instead of failing.
pub fn convert_snake_to_camel(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(convert_object(map)),
        Value::Array(items) => Value::Array(items.into_iter().map(convert_snake_to_camel).collect()),
        other => other,
    }
}

fn convert_object(map: Map<String, Value>) -> Map<String, Value> {
    // Application keys whose wire twin is also present; the wire value wins.
    let shadowed: Vec<&'static str> = KEY_RENAMES
        .iter()
        .filter(|(wire, _)| map.contains_key(*wire))
        .map(|(_, app)| *app)
        .collect();

    let mut converted = Map::with_capacity(map.len());

    for (key, value) in map {
        let value = convert_snake_to_camel(value);

        match renamed_key(&key) {
            Some(app_key) if key == USER_ROLE_KEY => {
                if let Some(role) = role_value(&value) {
                    converted.insert(app_key.to_string(), role);
                }
            }
            Some(app_key) => {
                converted.insert(app_key.to_string(), value);
            }
            None if shadowed.iter().any(|app| *app == key) => {}
            None => {
                converted.insert(key, value);
            }
        }
    }

    converted
}

fn parse_value(raw: Value) -> Result<AuthenticationInfo, WireError> {
    serde_json::from_value(convert_snake_to_camel(raw)).map_err(WireError::Shape)
}

/// Parse a refresh response body into `AuthenticationInfo`, translating
/// keys on the way.
pub fn parse_json_converting_snake_to_camel(text: &str) -> Result<AuthenticationInfo, WireError> {
    let raw: Value = serde_json::from_str(text).map_err(WireError::Malformed)?;
    parse_value(raw)
}

/// Like [`parse_json_converting_snake_to_camel`], but a body of `null`
/// means there is no session.
pub fn parse_refresh_response(text: &str) -> Result<Option<AuthenticationInfo>, WireError> {
    match serde_json::from_str(text).map_err(WireError::Malformed)? {
        Value::Null => Ok(None),
        raw => parse_value(raw).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_renames_every_key_in_table() {
        let wire = json!({
            "org_id": "o1",
            "org_name": "Acme",
            "user_role": "Admin",
            "access_token": "abc",
            "expires_at_seconds": 100,
            "org_id_to_org_member_info": {},
            "user_id": "u1"
        });

        let converted = convert_snake_to_camel(wire);
        assert_eq!(
            converted,
            json!({
                "orgId": "o1",
                "orgName": "Acme",
                "userRole": "Admin",
                "accessToken": "abc",
                "expiresAtSeconds": 100,
                "orgIdToOrgMemberInfo": {},
                "userId": "u1"
            })
        );
    }

    #[test]
    fn test_other_keys_and_values_untouched() {
        let wire = json!({
            "email": "ada@example.com",
            "first_name": "Ada",
            "picture_url": null,
            "mfa_enabled": false,
            "legacy_ids": [1, 2, 3]
        });

        assert_eq!(convert_snake_to_camel(wire.clone()), wire);
    }

    #[test]
    fn test_renames_at_every_depth() {
        let wire = json!({
            "access_token": "abc",
            "org_id_to_org_member_info": {
                "org_1": {"org_id": "org_1", "org_name": "Acme", "user_role": "Owner"}
            },
            "user": {"user_id": "u1", "email": "ada@example.com"},
            "extra": [{"org_id": "nested-in-array"}]
        });

        let converted = convert_snake_to_camel(wire);
        // Map keys such as "org_1" are not in the table and stay as-is.
        let org = &converted["orgIdToOrgMemberInfo"]["org_1"];
        assert_eq!(org["orgId"], "org_1");
        assert_eq!(org["orgName"], "Acme");
        assert_eq!(org["userRole"], "Owner");
        assert!(org.get("org_id").is_none());
        assert_eq!(converted["user"]["userId"], "u1");
        assert_eq!(converted["user"]["email"], "ada@example.com");
        assert_eq!(converted["extra"][0]["orgId"], "nested-in-array");
    }

    #[test]
    fn test_unknown_role_is_absent() {
        let converted = convert_snake_to_camel(json!({
            "org_id": "o1",
            "user_role": "SuperAdmin"
        }));
        assert_eq!(converted, json!({"orgId": "o1"}));

        let converted = convert_snake_to_camel(json!({"user_role": 7}));
        assert_eq!(converted, json!({}));
    }

    #[test]
    fn test_idempotent_on_camel_case() {
        let app = json!({
            "accessToken": "abc",
            "expiresAtSeconds": 100,
            "orgIdToOrgMemberInfo": {
                "o1": {"orgId": "o1", "orgName": "Acme", "userRole": "Member"}
            },
            "user": {"userId": "u1", "email": "ada@example.com"}
        });

        assert_eq!(convert_snake_to_camel(app.clone()), app);

        let once = convert_snake_to_camel(json!({"user_id": "u1", "org_name": "Acme"}));
        assert_eq!(convert_snake_to_camel(once.clone()), once);
    }

    #[test]
    fn test_parse_authentication_info() {
        let body = r#"{
            "access_token": "abc",
            "expires_at_seconds": 100,
            "org_id_to_org_member_info": {
                "o1": {"org_id": "o1", "org_name": "Acme", "user_role": "Admin"},
                "o2": {"org_id": "o2", "org_name": "Globex", "user_role": "Intern"}
            },
            "user": {"user_id": "u1", "email": "ada@example.com", "username": "ada"}
        }"#;

        let info = parse_json_converting_snake_to_camel(body).expect("parse auth info");
        assert_eq!(info.access_token, "abc");
        assert_eq!(info.expires_at_seconds, 100);
        assert_eq!(info.user.user_id, "u1");
        assert_eq!(info.user.username.as_deref(), Some("ada"));
        assert_eq!(info.org("o1").and_then(|o| o.user_role), Some(UserRole::Admin));
        assert_eq!(info.org("o2").map(|o| o.org_name.as_str()), Some("Globex"));
        assert_eq!(info.org("o2").and_then(|o| o.user_role), None);
    }

    #[test]
    fn test_parse_without_orgs() {
        let body = r#"{"access_token":"abc","expires_at_seconds":100,"user":{"user_id":"u1","email":"a@b.c"}}"#;
        let info = parse_json_converting_snake_to_camel(body).expect("parse auth info");
        assert!(info.org_id_to_org_member_info.is_none());
        assert!(info.user.username.is_none());
    }

    #[test]
    fn test_wire_key_beats_application_twin() {
        let converted = convert_snake_to_camel(json!({
            "orgId": "stale",
            "org_id": "fresh",
            "userRole": "Owner",
            "user_role": "Member"
        }));
        assert_eq!(converted, json!({"orgId": "fresh", "userRole": "Member"}));

        // An unknown wire role still shadows its twin, leaving the role absent
        let converted = convert_snake_to_camel(json!({
            "userRole": "Owner",
            "user_role": "Intern"
        }));
        assert_eq!(converted, json!({}));
    }

    #[test]
    fn test_parse_camel_case_with_unknown_role() {
        let body = r#"{
            "accessToken": "a",
            "expiresAtSeconds": 1,
            "orgIdToOrgMemberInfo": {"o": {"orgId": "o", "orgName": "n", "userRole": "Intern"}},
            "user": {"userId": "u1", "email": "a@b.c"}
        }"#;
        let info = parse_json_converting_snake_to_camel(body).expect("parse camelCase body");
        assert_eq!(info.org("o").map(|o| o.org_name.as_str()), Some("n"));
        assert_eq!(info.org("o").and_then(|o| o.user_role), None);
    }

    #[test]
    fn test_parse_float_expiry() {
        let body = r#"{"access_token":"abc","expires_at_seconds":100.0,"user":{"user_id":"u1","email":"a@b.c"}}"#;
        let info = parse_json_converting_snake_to_camel(body).expect("parse float expiry");
        assert_eq!(info.expires_at_seconds, 100);
    }

    #[test]
    fn test_parse_refresh_response() {
        assert!(matches!(parse_refresh_response("null"), Ok(None)));
        assert!(matches!(parse_refresh_response(" null \n"), Ok(None)));

        let body = r#"{"access_token":"abc","expires_at_seconds":100,"user":{"user_id":"u1","email":"a@b.c"}}"#;
        let info = parse_refresh_response(body).expect("parse").expect("session present");
        assert_eq!(info.access_token, "abc");

        assert!(matches!(parse_refresh_response("{oops"), Err(WireError::Malformed(_))));
        assert!(matches!(parse_refresh_response("[]"), Err(WireError::Shape(_))));
    }

    #[test]
    fn test_parse_errors() {
        let err = parse_json_converting_snake_to_camel("{not json").unwrap_err();
        assert!(matches!(err, WireError::Malformed(_)));

        let err = parse_json_converting_snake_to_camel(r#"{"access_token":"abc"}"#).unwrap_err();
        assert!(matches!(err, WireError::Shape(_)));
    }
}
