//! Client for the remote authentication service.
//!
//! Two calls: `fetch_authentication_info` (GET `/api/v1/refresh_token`)
//! and `logout` (POST `/api/v1/logout`). Every failure is an `ApiError`
//! carrying a numeric status and a message.

pub mod client;
pub mod error;

pub use client::{fetch_authentication_info, logout, AuthClient, AuthClientBuilder};
pub use error::ApiError;
