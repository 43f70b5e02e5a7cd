use std::time::Duration;

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECTION: &str = "Username-Password-Authentication";
const DEFAULT_JWKS_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Tenant configuration shared by the authentication and management clients.
///
/// Build one with [`ClientConfig::builder`]:
///
/// ```no_run
/// use auth0_client::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .domain("tenant.auth0.com")
///     .client_id("abc123")
///     .client_secret("shh")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    pub(crate) domain: String,
    pub(crate) client_id: String,
    pub(crate) client_secret: Option<String>,
    pub(crate) connection: String,
    pub(crate) timeout: Duration,
    pub(crate) retry: RetryPolicy,
    pub(crate) jwks_cache_ttl: Duration,
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Tenant domain, e.g. `tenant.auth0.com`.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Application client ID.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Default database connection used by signup when none is given.
    pub fn connection(&self) -> &str {
        &self.connection
    }

    /// Request timeout applied to every HTTP call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Retry policy for rate-limited and transient failures.
    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Tenant issuer URL, `https://{domain}/`.
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain)
    }

    /// Client secret, required for confidential-client grants.
    pub(crate) fn require_secret(&self) -> Result<&str> {
        self.client_secret.as_deref().ok_or_else(|| {
            Error::Configuration("client secret is required for this grant".to_string())
        })
    }
}

// The secret never appears in logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("domain", &self.domain)
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("connection", &self.connection)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("jwks_cache_ttl", &self.jwks_cache_ttl)
            .finish()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    domain: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    connection: Option<String>,
    timeout: Option<Duration>,
    retry: Option<RetryPolicy>,
    jwks_cache_ttl: Option<Duration>,
}

impl ClientConfigBuilder {
    /// Tenant domain. A leading scheme and trailing slash are stripped, so
    /// `https://tenant.auth0.com/` and `tenant.auth0.com` are equivalent.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Default database connection for signup and change-password.
    pub fn connection(mut self, connection: impl Into<String>) -> Self {
        self.connection = Some(connection.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Time-to-live for cached JWKS signing keys.
    pub fn jwks_cache_ttl(mut self, ttl: Duration) -> Self {
        self.jwks_cache_ttl = Some(ttl);
        self
    }

    pub fn build(self) -> Result<ClientConfig> {
        let domain = normalize_domain(self.domain.as_deref().unwrap_or(""));
        if domain.is_empty() {
            return Err(Error::Configuration(
                "domain is required (e.g. tenant.auth0.com)".to_string(),
            ));
        }

        let client_id = self.client_id.unwrap_or_default();
        if client_id.trim().is_empty() {
            return Err(Error::Configuration("client_id is required".to_string()));
        }

        Ok(ClientConfig {
            domain,
            client_id,
            client_secret: self.client_secret.filter(|s| !s.is_empty()),
            connection: self
                .connection
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_CONNECTION.to_string()),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            retry: self.retry.unwrap_or_default(),
            jwks_cache_ttl: self.jwks_cache_ttl.unwrap_or(DEFAULT_JWKS_CACHE_TTL),
        })
    }
}

fn normalize_domain(raw: &str) -> String {
    raw.trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
        .to_string()
}
