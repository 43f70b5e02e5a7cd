//! Client for the Auth0 Management API v2.
//!
//! Endpoints are grouped by resource (`users()`, `clients()`, ...); every
//! call carries the Management API bearer token and goes through the shared
//! transport, so rate-limit retries and error mapping behave the same as the
//! authentication client.

pub mod clients;
pub mod connections;
pub mod device_credentials;
pub mod logs;
pub mod resource_servers;
pub mod roles;
pub mod tickets;
pub mod users;

use std::time::Duration;

use url::Url;

use crate::authentication::{AuthenticationClient, ClientCredentialsTokenRequest};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::RestClient;
use crate::retry::RetryPolicy;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Typed client for the Auth0 Management API v2.
///
/// Requires a Management API access token; obtain one with
/// [`ManagementClient::from_client_credentials`] or supply your own.
#[derive(Clone)]
pub struct ManagementClient {
    rest: RestClient,
    token: String,
}

// The token never appears in logs.
impl std::fmt::Debug for ManagementClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagementClient")
            .field("rest", &self.rest)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl ManagementClient {
    /// Build a client for `https://{domain}/api/v2/` with an existing token.
    pub fn new(domain: &str, token: impl Into<String>) -> Result<Self> {
        let rest = RestClient::for_domain(domain, DEFAULT_TIMEOUT, RetryPolicy::default())?;
        Ok(Self {
            rest,
            token: token.into(),
        })
    }

    /// Build a client against an explicit base URL.
    ///
    /// Intended for tenants with custom domains and for tests pointing at a
    /// local mock server.
    pub fn with_base_url(base: Url, token: impl Into<String>) -> Result<Self> {
        let rest = RestClient::for_base_url(base, DEFAULT_TIMEOUT, RetryPolicy::default())?;
        Ok(Self {
            rest,
            token: token.into(),
        })
    }

    /// Obtain a Management API token via the Client Credentials grant and
    /// build a client with it.
    ///
    /// The audience defaults to the tenant's Management API identifier,
    /// `https://{domain}/api/v2/`.
    pub async fn from_client_credentials(config: ClientConfig) -> Result<Self> {
        let base = Url::parse(&format!("https://{}/", config.domain()))
            .map_err(|err| crate::error::Error::Configuration(err.to_string()))?;
        Self::from_client_credentials_at(config, base).await
    }

    /// Same as [`ManagementClient::from_client_credentials`], but both the
    /// token request and the Management API calls go to `base` instead of
    /// `https://{domain}/`. The audience stays the tenant's Management API
    /// identifier.
    pub async fn from_client_credentials_at(config: ClientConfig, base: Url) -> Result<Self> {
        let audience = format!("https://{}/api/v2/", config.domain());
        let auth = AuthenticationClient::with_base_url(config.clone(), base.clone())?;
        let token = auth
            .client_credentials_token(ClientCredentialsTokenRequest::new(audience))
            .await?;

        let rest = RestClient::for_base_url(base, config.timeout(), config.retry().clone())?;
        Ok(Self {
            rest,
            token: token.access_token,
        })
    }

    pub fn users(&self) -> users::Users<'_> {
        users::Users::new(self)
    }

    pub fn clients(&self) -> clients::Clients<'_> {
        clients::Clients::new(self)
    }

    pub fn connections(&self) -> connections::Connections<'_> {
        connections::Connections::new(self)
    }

    pub fn roles(&self) -> roles::Roles<'_> {
        roles::Roles::new(self)
    }

    pub fn resource_servers(&self) -> resource_servers::ResourceServers<'_> {
        resource_servers::ResourceServers::new(self)
    }

    pub fn device_credentials(&self) -> device_credentials::DeviceCredentials<'_> {
        device_credentials::DeviceCredentials::new(self)
    }

    pub fn logs(&self) -> logs::Logs<'_> {
        logs::Logs::new(self)
    }

    pub fn tickets(&self) -> tickets::Tickets<'_> {
        tickets::Tickets::new(self)
    }

    /// Absolute URL for a path under `/api/v2/`.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut all = Vec::with_capacity(segments.len() + 2);
        all.push("api");
        all.push("v2");
        all.extend_from_slice(segments);
        self.rest.endpoint(&all)
    }

    pub(crate) fn rest(&self) -> &RestClient {
        &self.rest
    }

    pub(crate) fn token(&self) -> &str {
        &self.token
    }
}
