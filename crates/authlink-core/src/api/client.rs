//! HTTP client for the authentication service.
//!
//! Both calls send whatever cookies the client holds for the auth domain,
//! the way a browser sends credentials with a cross-origin request. The
//! cookie jar also keeps cookies the service sets, so a client that fetched
//! a session can log it out.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, error};

use crate::config::{ClientConfig, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::models::{AuthenticationInfo, LogoutResponse};
use crate::wire;

use super::ApiError;

/// Refresh endpoint; answers with the current session or 401.
const REFRESH_TOKEN_PATH: &str = "/api/v1/refresh_token";

const LOGOUT_PATH: &str = "/api/v1/logout";

/// Builder for [`AuthClient`].
#[derive(Debug, Clone)]
pub struct AuthClientBuilder {
    auth_url: String,
    timeout: Duration,
    cookies: Vec<String>,
}

impl AuthClientBuilder {
    pub fn new(auth_url: impl Into<String>) -> Self {
        Self {
            auth_url: auth_url.into(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            cookies: Vec::new(),
        }
    }

    /// Total time allowed per request, body included.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Seed a cookie (`name=value`, optionally with attributes) for the auth URL.
    pub fn cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookies.push(cookie.into());
        self
    }

    pub fn cookies<I, S>(mut self, cookies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cookies.extend(cookies.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Result<AuthClient, ApiError> {
        let auth_url = self.auth_url.trim().trim_end_matches('/').to_string();
        let cookie_url: Url = auth_url
            .parse()
            .map_err(|e| ApiError::Client(format!("invalid auth URL {:?}: {}", auth_url, e)))?;

        let jar = Arc::new(Jar::default());
        for cookie in &self.cookies {
            jar.add_cookie_str(cookie, &cookie_url);
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(AuthClient { client, auth_url })
    }
}

/// Client for one auth service.
/// Clone is cheap - clones share the connection handle and cookie jar.
#[derive(Clone, Debug)]
pub struct AuthClient {
    client: Client,
    auth_url: String,
}

impl AuthClient {
    /// Create a client for `auth_url` with default settings
    pub fn new(auth_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::builder(auth_url).build()
    }

    pub fn builder(auth_url: impl Into<String>) -> AuthClientBuilder {
        AuthClientBuilder::new(auth_url)
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        config.client_builder().build()
    }

    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.auth_url, path)
    }

    /// Fetch the current session.
    ///
    /// Returns `Ok(None)` when the service answers 401: there is no
    /// logged-in user, which is not an error.
    pub async fn fetch_authentication_info(&self) -> Result<Option<AuthenticationInfo>, ApiError> {
        let url = self.endpoint(REFRESH_TOKEN_PATH);
        debug!(url = %url, "Fetching authentication info");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            match wire::parse_refresh_response(&body) {
                Ok(info) => Ok(info),
                Err(e) => {
                    error!(error = %e, "Unable to process authentication response");
                    Err(ApiError::UnprocessableResponse)
                }
            }
        } else if status == StatusCode::UNAUTHORIZED {
            debug!("No active session");
            Ok(None)
        } else {
            Err(ApiError::from_status(status, body))
        }
    }

    /// Log out of the current session.
    ///
    /// The response body is read with its wire field names; no key
    /// translation is applied here.
    pub async fn logout(&self) -> Result<LogoutResponse, ApiError> {
        let url = self.endpoint(LOGOUT_PATH);
        debug!(url = %url, "Logging out");

        let response = self.client.post(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| {
                error!(error = %e, "Unable to process logout response");
                ApiError::UnprocessableLogoutResponse
            })
        } else {
            error!(
                status = status.as_u16(),
                body = %body,
                "Logout error"
            );
            Err(ApiError::from_status(status, body))
        }
    }
}

/// Fetch the current session from `auth_url` using a default client.
pub async fn fetch_authentication_info(auth_url: &str) -> Result<Option<AuthenticationInfo>, ApiError> {
    AuthClient::new(auth_url)?.fetch_authentication_info().await
}

/// Log out at `auth_url` using a default client.
pub async fn logout(auth_url: &str) -> Result<LogoutResponse, ApiError> {
    AuthClient::new(auth_url)?.logout().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = AuthClient::new("https://auth.example.com/").expect("client");
        assert_eq!(client.auth_url(), "https://auth.example.com");
        assert_eq!(
            client.endpoint(REFRESH_TOKEN_PATH),
            "https://auth.example.com/api/v1/refresh_token"
        );
        assert_eq!(client.endpoint(LOGOUT_PATH), "https://auth.example.com/api/v1/logout");
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = AuthClient::new("not a url").unwrap_err();
        assert!(matches!(err, ApiError::Client(_)));
        assert_eq!(err.status(), 0);
    }

    #[test]
    fn test_from_config() {
        let config = ClientConfig::new("https://auth.example.com//");
        let client = AuthClient::from_config(&config).expect("client");
        assert_eq!(client.auth_url(), "https://auth.example.com");
    }
}
