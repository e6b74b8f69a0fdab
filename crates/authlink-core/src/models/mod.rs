//! Data models for the authentication service.
//!
//! All types are plain values built from a single response and handed to
//! the caller. They serialize in camelCase, except `LogoutResponse` which
//! keeps the service's field name.
//!
//! - `AuthenticationInfo`: access token, expiry, org memberships and user
//! - `User`: the authenticated account
//! - `OrgMemberInfo`, `UserRole`: membership in an organization
//! - `LogoutResponse`: where to send the browser after logout

pub mod auth;
pub mod organization;
pub mod user;

pub use auth::{AuthenticationInfo, LogoutResponse, OrgIdToOrgMemberInfo};
pub use organization::{OrgMemberInfo, UserRole};
pub use user::User;
