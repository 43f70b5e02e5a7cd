use serde::Serialize;

use crate::config::ClientConfig;

pub(crate) const PASSWORD_REALM_GRANT: &str = "http://auth0.com/oauth/grant-type/password-realm";
pub(crate) const PASSWORDLESS_OTP_GRANT: &str =
    "http://auth0.com/oauth/grant-type/passwordless/otp";

/// Request body for `POST /dbconnections/signup`.
///
/// `client_id` and `connection` fall back to the [`ClientConfig`] values when
/// left unset.
#[derive(Debug, Serialize, Clone)]
pub struct SignupRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_metadata: Option<serde_json::Value>,
}

impl SignupRequest {
    /// Create a minimal signup request with just email and password.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            client_id: None,
            email: email.into(),
            password: password.into(),
            connection: None,
            username: None,
            given_name: None,
            family_name: None,
            name: None,
            user_metadata: None,
        }
    }

    pub fn with_connection(mut self, connection: impl Into<String>) -> Self {
        self.connection = Some(connection.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_given_name(mut self, given_name: impl Into<String>) -> Self {
        self.given_name = Some(given_name.into());
        self
    }

    pub fn with_family_name(mut self, family_name: impl Into<String>) -> Self {
        self.family_name = Some(family_name.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.user_metadata = Some(metadata);
        self
    }

    pub(crate) fn with_defaults(mut self, config: &ClientConfig) -> Self {
        if self.client_id.is_none() {
            self.client_id = Some(config.client_id.clone());
        }
        if self.connection.is_none() {
            self.connection = Some(config.connection.clone());
        }
        self
    }
}

/// Request body for `POST /dbconnections/change_password`.
///
/// Auth0 answers with a plain-text confirmation message, not JSON.
#[derive(Debug, Serialize, Clone)]
pub struct ChangePasswordRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

impl ChangePasswordRequest {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            client_id: None,
            email: email.into(),
            connection: None,
            organization: None,
        }
    }

    pub fn with_connection(mut self, connection: impl Into<String>) -> Self {
        self.connection = Some(connection.into());
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub(crate) fn with_defaults(mut self, config: &ClientConfig) -> Self {
        if self.client_id.is_none() {
            self.client_id = Some(config.client_id.clone());
        }
        if self.connection.is_none() {
            self.connection = Some(config.connection.clone());
        }
        self
    }
}

/// Resource Owner Password grant for `POST /oauth/token`.
///
/// Setting a realm switches the grant type to Auth0's password-realm
/// extension grant.
#[derive(Debug, Serialize, Clone)]
pub struct ResourceOwnerTokenRequest {
    pub grant_type: String,
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

impl ResourceOwnerTokenRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            grant_type: "password".to_string(),
            username: username.into(),
            password: password.into(),
            realm: None,
            audience: None,
            scope: None,
            client_id: None,
            client_secret: None,
        }
    }

    /// Authenticate against a specific connection (realm).
    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = Some(realm.into());
        self.grant_type = PASSWORD_REALM_GRANT.to_string();
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub(crate) fn with_defaults(mut self, config: &ClientConfig) -> Self {
        if self.client_id.is_none() {
            self.client_id = Some(config.client_id.clone());
        }
        if self.client_secret.is_none() {
            self.client_secret = config.client_secret.clone();
        }
        self
    }
}

/// Authorization Code grant for `POST /oauth/token`.
#[derive(Debug, Serialize, Clone)]
pub struct AuthorizationCodeTokenRequest {
    pub grant_type: String,
    pub code: String,
    pub redirect_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

impl AuthorizationCodeTokenRequest {
    pub fn new(code: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            grant_type: "authorization_code".to_string(),
            code: code.into(),
            redirect_uri: redirect_uri.into(),
            client_id: None,
            client_secret: None,
        }
    }

    pub(crate) fn with_defaults(mut self, config: &ClientConfig) -> Self {
        if self.client_id.is_none() {
            self.client_id = Some(config.client_id.clone());
        }
        if self.client_secret.is_none() {
            self.client_secret = config.client_secret.clone();
        }
        self
    }
}

/// Authorization Code + PKCE grant for `POST /oauth/token`.
///
/// Public clients send the verifier instead of a client secret.
#[derive(Debug, Serialize, Clone)]
pub struct AuthorizationCodePkceTokenRequest {
    pub grant_type: String,
    pub code: String,
    pub redirect_uri: String,
    pub code_verifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

impl AuthorizationCodePkceTokenRequest {
    pub fn new(
        code: impl Into<String>,
        redirect_uri: impl Into<String>,
        code_verifier: impl Into<String>,
    ) -> Self {
        Self {
            grant_type: "authorization_code".to_string(),
            code: code.into(),
            redirect_uri: redirect_uri.into(),
            code_verifier: code_verifier.into(),
            client_id: None,
        }
    }

    pub(crate) fn with_defaults(mut self, config: &ClientConfig) -> Self {
        if self.client_id.is_none() {
            self.client_id = Some(config.client_id.clone());
        }
        self
    }
}

/// Client Credentials grant for `POST /oauth/token`.
#[derive(Debug, Serialize, Clone)]
pub struct ClientCredentialsTokenRequest {
    pub grant_type: String,
    pub audience: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

impl ClientCredentialsTokenRequest {
    pub fn new(audience: impl Into<String>) -> Self {
        Self {
            grant_type: "client_credentials".to_string(),
            audience: audience.into(),
            scope: None,
            organization: None,
            client_id: None,
            client_secret: None,
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }
}

/// Refresh Token grant for `POST /oauth/token`.
#[derive(Debug, Serialize, Clone)]
pub struct RefreshTokenRequest {
    pub grant_type: String,
    pub refresh_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

impl RefreshTokenRequest {
    pub fn new(refresh_token: impl Into<String>) -> Self {
        Self {
            grant_type: "refresh_token".to_string(),
            refresh_token: refresh_token.into(),
            scope: None,
            client_id: None,
            client_secret: None,
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub(crate) fn with_defaults(mut self, config: &ClientConfig) -> Self {
        if self.client_id.is_none() {
            self.client_id = Some(config.client_id.clone());
        }
        if self.client_secret.is_none() {
            self.client_secret = config.client_secret.clone();
        }
        self
    }
}

/// Request body for `POST /oauth/revoke`.
#[derive(Debug, Serialize, Clone)]
pub struct RevokeRefreshTokenRequest {
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

impl RevokeRefreshTokenRequest {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            client_id: None,
            client_secret: None,
        }
    }

    pub(crate) fn with_defaults(mut self, config: &ClientConfig) -> Self {
        if self.client_id.is_none() {
            self.client_id = Some(config.client_id.clone());
        }
        if self.client_secret.is_none() {
            self.client_secret = config.client_secret.clone();
        }
        self
    }
}

/// Delivery style for a passwordless email.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PasswordlessEmailType {
    Link,
    Code,
}

/// Request body for `POST /passwordless/start` with the `email` connection.
#[derive(Debug, Serialize, Clone)]
pub struct PasswordlessEmailRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    pub connection: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send: Option<PasswordlessEmailType>,
    #[serde(rename = "authParams", skip_serializing_if = "Option::is_none")]
    pub auth_params: Option<serde_json::Value>,
}

impl PasswordlessEmailRequest {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            client_id: None,
            client_secret: None,
            connection: "email".to_string(),
            email: email.into(),
            send: None,
            auth_params: None,
        }
    }

    pub fn with_send(mut self, send: PasswordlessEmailType) -> Self {
        self.send = Some(send);
        self
    }

    pub fn with_auth_params(mut self, auth_params: serde_json::Value) -> Self {
        self.auth_params = Some(auth_params);
        self
    }

    pub(crate) fn with_defaults(mut self, config: &ClientConfig) -> Self {
        if self.client_id.is_none() {
            self.client_id = Some(config.client_id.clone());
        }
        if self.client_secret.is_none() {
            self.client_secret = config.client_secret.clone();
        }
        self
    }
}

/// Request body for `POST /passwordless/start` with the `sms` connection.
#[derive(Debug, Serialize, Clone)]
pub struct PasswordlessSmsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    pub connection: String,
    pub phone_number: String,
}

impl PasswordlessSmsRequest {
    pub fn new(phone_number: impl Into<String>) -> Self {
        Self {
            client_id: None,
            client_secret: None,
            connection: "sms".to_string(),
            phone_number: phone_number.into(),
        }
    }

    pub(crate) fn with_defaults(mut self, config: &ClientConfig) -> Self {
        if self.client_id.is_none() {
            self.client_id = Some(config.client_id.clone());
        }
        if self.client_secret.is_none() {
            self.client_secret = config.client_secret.clone();
        }
        self
    }
}

/// Passwordless OTP exchange via `POST /oauth/token`.
///
/// `realm` is `email` or `sms`, matching the channel the code went out on.
#[derive(Debug, Serialize, Clone)]
pub struct PasswordlessOtpTokenRequest {
    pub grant_type: String,
    pub otp: String,
    pub realm: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

impl PasswordlessOtpTokenRequest {
    pub fn new(
        otp: impl Into<String>,
        realm: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            grant_type: PASSWORDLESS_OTP_GRANT.to_string(),
            otp: otp.into(),
            realm: realm.into(),
            username: username.into(),
            audience: None,
            scope: None,
            client_id: None,
            client_secret: None,
        }
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub(crate) fn with_defaults(mut self, config: &ClientConfig) -> Self {
        if self.client_id.is_none() {
            self.client_id = Some(config.client_id.clone());
        }
        if self.client_secret.is_none() {
            self.client_secret = config.client_secret.clone();
        }
        self
    }
}

/// Request body for `POST /oauth/device/code`.
#[derive(Debug, Serialize, Clone)]
pub struct DeviceCodeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl DeviceCodeRequest {
    pub fn new() -> Self {
        Self {
            client_id: None,
            audience: None,
            scope: None,
        }
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub(crate) fn with_defaults(mut self, config: &ClientConfig) -> Self {
        if self.client_id.is_none() {
            self.client_id = Some(config.client_id.clone());
        }
        self
    }
}

impl Default for DeviceCodeRequest {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientConfig;

    fn config() -> ClientConfig {
        ClientConfig::builder()
            .domain("tenant.auth0.com")
            .client_id("default-client")
            .client_secret("default-secret")
            .build()
            .expect("config should build")
    }

    #[test]
    fn signup_request_builder_sets_optional_fields() {
        let request = SignupRequest::new("test@example.com", "password123")
            .with_connection("Username-Password-Authentication")
            .with_username("testuser")
            .with_name("Test User");

        assert_eq!(request.email, "test@example.com");
        assert_eq!(
            request.connection.as_deref(),
            Some("Username-Password-Authentication")
        );
        assert_eq!(request.username.as_deref(), Some("testuser"));
        assert_eq!(request.name.as_deref(), Some("Test User"));
    }

    #[test]
    fn signup_request_serialization_omits_unset_fields() {
        let request = SignupRequest::new("test@example.com", "password123");
        let json = serde_json::to_value(request).expect("request should serialize");

        assert_eq!(json["email"], "test@example.com");
        assert!(json.get("client_id").is_none());
        assert!(json.get("username").is_none());
        assert!(json.get("user_metadata").is_none());
    }

    #[test]
    fn signup_defaults_fill_client_id_and_connection() {
        let request = SignupRequest::new("a@b.c", "pw").with_defaults(&config());
        assert_eq!(request.client_id.as_deref(), Some("default-client"));
        assert_eq!(
            request.connection.as_deref(),
            Some("Username-Password-Authentication")
        );

        let explicit = SignupRequest::new("a@b.c", "pw")
            .with_connection("custom-db")
            .with_defaults(&config());
        assert_eq!(explicit.connection.as_deref(), Some("custom-db"));
    }

    #[test]
    fn resource_owner_realm_switches_grant_type() {
        let plain = ResourceOwnerTokenRequest::new("user@example.com", "pw");
        assert_eq!(plain.grant_type, "password");

        let realm = ResourceOwnerTokenRequest::new("user@example.com", "pw")
            .with_realm("Username-Password-Authentication");
        assert_eq!(realm.grant_type, PASSWORD_REALM_GRANT);
        assert_eq!(
            realm.realm.as_deref(),
            Some("Username-Password-Authentication")
        );
    }

    #[test]
    fn resource_owner_serialization_with_optional_fields() {
        let request = ResourceOwnerTokenRequest::new("user@example.com", "pw")
            .with_audience("https://api.example.com")
            .with_scope("openid profile")
            .with_defaults(&config());
        let json = serde_json::to_value(request).expect("request should serialize");

        assert_eq!(json["grant_type"], "password");
        assert_eq!(json["audience"], "https://api.example.com");
        assert_eq!(json["scope"], "openid profile");
        assert_eq!(json["client_id"], "default-client");
        assert_eq!(json["client_secret"], "default-secret");
    }

    #[test]
    fn pkce_request_never_carries_a_secret() {
        let request =
            AuthorizationCodePkceTokenRequest::new("code", "https://app/callback", "verifier")
                .with_defaults(&config());
        let json = serde_json::to_value(request).expect("request should serialize");

        assert_eq!(json["grant_type"], "authorization_code");
        assert_eq!(json["code_verifier"], "verifier");
        assert!(json.get("client_secret").is_none());
    }

    #[test]
    fn refresh_token_request_serializes_grant() {
        let request = RefreshTokenRequest::new("rt-123")
            .with_scope("openid")
            .with_defaults(&config());
        let json = serde_json::to_value(request).expect("request should serialize");

        assert_eq!(json["grant_type"], "refresh_token");
        assert_eq!(json["refresh_token"], "rt-123");
        assert_eq!(json["scope"], "openid");
    }

    #[test]
    fn passwordless_email_request_uses_email_connection() {
        let request = PasswordlessEmailRequest::new("user@example.com")
            .with_send(PasswordlessEmailType::Code)
            .with_defaults(&config());
        let json = serde_json::to_value(request).expect("request should serialize");

        assert_eq!(json["connection"], "email");
        assert_eq!(json["send"], "code");
        assert_eq!(json["client_id"], "default-client");
    }

    #[test]
    fn passwordless_sms_request_uses_sms_connection() {
        let request = PasswordlessSmsRequest::new("+14155551234").with_defaults(&config());
        let json = serde_json::to_value(request).expect("request should serialize");

        assert_eq!(json["connection"], "sms");
        assert_eq!(json["phone_number"], "+14155551234");
    }

    #[test]
    fn passwordless_otp_request_uses_extension_grant() {
        let request = PasswordlessOtpTokenRequest::new("123456", "email", "user@example.com");
        assert_eq!(request.grant_type, PASSWORDLESS_OTP_GRANT);
    }

    #[test]
    fn change_password_request_fills_defaults() {
        let request = ChangePasswordRequest::new("user@example.com").with_defaults(&config());
        assert_eq!(request.client_id.as_deref(), Some("default-client"));
        assert_eq!(
            request.connection.as_deref(),
            Some("Username-Password-Authentication")
        );
    }
}
