//! ID-token validation against the tenant's JWKS.
//!
//! Signing keys come from `https://{domain}/.well-known/jwks.json` and are
//! cached as ready-to-use decoding keys. [`JwksProvider`] is the seam for
//! supplying keys in tests without a network round trip.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{ApiRequest, RestClient};
use crate::retry::RetryPolicy;

/// One signing key from the JWKS document.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    pub kid: String,
    pub n: String,
    pub e: String,
    pub kty: String,
    #[serde(default)]
    pub alg: Option<String>,
    #[serde(rename = "use", default)]
    pub use_: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Jwks {
    pub keys: Vec<Jwk>,
}

/// Resolves a token's `kid` to a decoding key. Implemented by [`JwksClient`];
/// implement it yourself to validate against fixed keys in tests.
#[async_trait]
pub trait JwksProvider: Send + Sync {
    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey>;
}

/// Fetches and caches the tenant's signing keys.
///
/// The fetch goes through the shared transport, so the configured timeout
/// and the rate-limit retry policy apply to key refreshes like any other
/// call.
pub struct JwksClient {
    rest: RestClient,
    jwks_url: Url,
    cache: Cache<String, DecodingKey>,
}

impl JwksClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let jwks_url = format!("https://{}/.well-known/jwks.json", config.domain());
        Self::with_jwks_url(
            jwks_url,
            config.timeout(),
            config.retry().clone(),
            config.jwks_cache_ttl,
        )
    }

    /// Point at an explicit JWKS URL, for custom domains and tests.
    pub fn with_jwks_url(
        jwks_url: impl AsRef<str>,
        timeout: Duration,
        retry: RetryPolicy,
        cache_ttl: Duration,
    ) -> Result<Self> {
        let jwks_url = Url::parse(jwks_url.as_ref()).map_err(|e| {
            Error::Configuration(format!("invalid jwks url {:?}: {e}", jwks_url.as_ref()))
        })?;
        let rest = RestClient::for_base_url(jwks_url.clone(), timeout, retry)?;

        let cache = Cache::builder()
            .time_to_live(cache_ttl)
            .max_capacity(16)
            .build();

        Ok(Self {
            rest,
            jwks_url,
            cache,
        })
    }

    async fn fetch_jwks(&self) -> Result<Jwks> {
        let api = ApiRequest::get(self.jwks_url.clone());
        self.rest.json(&api).await.map_err(|e| {
            error!(error = %e, url = %self.jwks_url, "failed to fetch jwks");
            e
        })
    }

    fn jwk_to_decoding_key(jwk: &Jwk) -> Result<DecodingKey> {
        DecodingKey::from_rsa_components(&jwk.n, &jwk.e).map_err(|e| {
            error!(error = %e, kid = %jwk.kid, "failed to build rsa decoding key");
            Error::InvalidToken(format!("unusable signing key {}: {e}", jwk.kid))
        })
    }
}

#[async_trait]
impl JwksProvider for JwksClient {
    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey> {
        if let Some(key) = self.cache.get(kid).await {
            return Ok(key);
        }

        let jwks = self.fetch_jwks().await?;
        let jwk = jwks.keys.iter().find(|k| k.kid == kid).ok_or_else(|| {
            warn!(
                kid = %kid,
                available_kids = ?jwks.keys.iter().map(|k| &k.kid).collect::<Vec<_>>(),
                "token signed with unknown key id"
            );
            Error::InvalidToken(format!("unknown signing key {kid}"))
        })?;

        let key = Self::jwk_to_decoding_key(jwk)?;
        self.cache.insert(kid.to_string(), key.clone()).await;
        Ok(key)
    }
}

/// The `aud` claim: a single value or a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    pub fn contains(&self, expected: &str) -> bool {
        match self {
            Audience::Single(s) => s == expected,
            Audience::Multiple(v) => v.iter().any(|s| s == expected),
        }
    }
}

/// Claims of a validated ID token. Namespaced custom claims land in
/// `custom_claims`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdTokenClaims {
    pub iss: String,
    pub sub: String,
    pub aud: Audience,
    pub exp: u64,
    pub iat: u64,
    #[serde(default)]
    pub nonce: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(flatten)]
    pub custom_claims: HashMap<String, serde_json::Value>,
}

/// Validate an RS256 ID token: signature against the provider's keys, plus
/// issuer, audience, and expiry.
pub async fn validate_id_token(
    token: &str,
    provider: &dyn JwksProvider,
    issuer: &str,
    audience: &str,
) -> Result<IdTokenClaims> {
    let header = decode_header(token).map_err(|e| {
        warn!(error = %e, "failed to decode token header");
        Error::InvalidToken("malformed token header".to_string())
    })?;

    let kid = header.kid.ok_or_else(|| {
        warn!("token header missing kid");
        Error::InvalidToken("token header missing kid".to_string())
    })?;

    let decoding_key = provider.decoding_key(&kid).await?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_issuer(&[issuer]);
    validation.set_audience(&[audience]);

    let token_data = decode::<IdTokenClaims>(token, &decoding_key, &validation).map_err(|e| {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                warn!("id token has expired");
                Error::TokenExpired
            }
            jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                warn!(expected_issuer = %issuer, "id token has wrong issuer");
                Error::InvalidToken("wrong issuer".to_string())
            }
            jsonwebtoken::errors::ErrorKind::InvalidAudience => {
                warn!(expected_audience = %audience, "id token has wrong audience");
                Error::InvalidToken("wrong audience".to_string())
            }
            jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                warn!("id token has invalid signature");
                Error::InvalidToken("invalid signature".to_string())
            }
            _ => {
                warn!(error = %e, "id token validation failed");
                Error::InvalidToken(e.to_string())
            }
        }
    })?;

    Ok(token_data.claims)
}
