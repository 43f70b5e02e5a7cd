use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};
use url::Url;

const VERIFIER_LENGTH: usize = 64;

/// PKCE verifier/challenge pair for the Authorization Code + PKCE flow.
///
/// The challenge goes into the `/authorize` URL; the verifier is sent with
/// the matching token exchange.
#[derive(Debug, Clone)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

impl PkcePair {
    /// Generate a random verifier and its S256 challenge.
    pub fn generate() -> Self {
        let verifier: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(VERIFIER_LENGTH)
            .map(char::from)
            .collect();
        Self::from_verifier(verifier)
    }

    /// Derive the S256 challenge for an existing verifier.
    pub fn from_verifier(verifier: impl Into<String>) -> Self {
        let verifier = verifier.into();
        let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));
        Self {
            verifier,
            challenge,
        }
    }
}

/// Builder for the tenant `/authorize` URL.
///
/// Query parameters are appended in the order the setters run.
#[derive(Debug, Clone)]
pub struct AuthorizeUrlBuilder {
    url: Url,
}

impl AuthorizeUrlBuilder {
    pub(crate) fn new(mut base: Url, client_id: &str) -> Self {
        base.set_path("authorize");
        base.query_pairs_mut()
            .append_pair("client_id", client_id)
            .append_pair("response_type", "code");
        Self { url: base }
    }

    fn append(mut self, key: &str, value: &str) -> Self {
        self.url.query_pairs_mut().append_pair(key, value);
        self
    }

    /// Override the default `code` response type.
    pub fn with_response_type(mut self, response_type: &str) -> Self {
        let pairs: Vec<(String, String)> = self
            .url
            .query_pairs()
            .map(|(k, v)| {
                if k == "response_type" {
                    (k.to_string(), response_type.to_string())
                } else {
                    (k.to_string(), v.to_string())
                }
            })
            .collect();
        self.url.query_pairs_mut().clear().extend_pairs(pairs);
        self
    }

    pub fn with_redirect_uri(self, redirect_uri: &str) -> Self {
        self.append("redirect_uri", redirect_uri)
    }

    pub fn with_scope(self, scope: &str) -> Self {
        self.append("scope", scope)
    }

    pub fn with_audience(self, audience: &str) -> Self {
        self.append("audience", audience)
    }

    pub fn with_state(self, state: &str) -> Self {
        self.append("state", state)
    }

    pub fn with_nonce(self, nonce: &str) -> Self {
        self.append("nonce", nonce)
    }

    pub fn with_connection(self, connection: &str) -> Self {
        self.append("connection", connection)
    }

    pub fn with_organization(self, organization: &str) -> Self {
        self.append("organization", organization)
    }

    pub fn with_invitation(self, invitation: &str) -> Self {
        self.append("invitation", invitation)
    }

    /// Attach a PKCE challenge (S256).
    pub fn with_pkce(self, pkce: &PkcePair) -> Self {
        self.append("code_challenge", &pkce.challenge)
            .append("code_challenge_method", "S256")
    }

    pub fn build(self) -> Url {
        self.url
    }
}

/// Builder for the tenant `/v2/logout` URL.
#[derive(Debug, Clone)]
pub struct LogoutUrlBuilder {
    url: Url,
}

impl LogoutUrlBuilder {
    pub(crate) fn new(mut base: Url) -> Self {
        base.set_path("v2/logout");
        Self { url: base }
    }

    fn append(mut self, key: &str, value: &str) -> Self {
        self.url.query_pairs_mut().append_pair(key, value);
        self
    }

    pub fn with_client_id(self, client_id: &str) -> Self {
        self.append("client_id", client_id)
    }

    pub fn with_return_to(self, return_to: &str) -> Self {
        self.append("returnTo", return_to)
    }

    /// Also log out of the upstream identity provider.
    pub fn with_federated(mut self) -> Self {
        self.url.query_pairs_mut().append_key_only("federated");
        self
    }

    pub fn build(self) -> Url {
        self.url
    }
}
