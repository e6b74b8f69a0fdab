//! authlink-core - client library for a hosted authentication service.
//!
//! Fetches the current session (access token, expiry, user and org
//! memberships) and performs logout. The service speaks snake_case JSON;
//! the [`wire`] module translates it into the camelCase models in
//! [`models`].

pub mod api;
pub mod config;
pub mod models;
pub mod wire;

pub use api::{fetch_authentication_info, logout, ApiError, AuthClient, AuthClientBuilder};
pub use config::ClientConfig;
pub use models::{AuthenticationInfo, LogoutResponse, OrgMemberInfo, User, UserRole};
