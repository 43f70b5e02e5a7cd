//! Client for the Auth0 Authentication API.
//!
//! Covers database-connection signup and password reset, the `/oauth/token`
//! grant types (authorization code, PKCE, client credentials, refresh token,
//! resource-owner password, passwordless OTP), passwordless flow starts,
//! token revocation, `/userinfo`, the device authorization flow, and the
//! `/authorize` and `/v2/logout` URL builders.

mod authorize;
mod requests;
mod responses;

pub use authorize::{AuthorizeUrlBuilder, LogoutUrlBuilder, PkcePair};
pub use requests::{
    AuthorizationCodePkceTokenRequest, AuthorizationCodeTokenRequest, ChangePasswordRequest,
    ClientCredentialsTokenRequest, DeviceCodeRequest, PasswordlessEmailRequest,
    PasswordlessEmailType, PasswordlessOtpTokenRequest, PasswordlessSmsRequest,
    RefreshTokenRequest, ResourceOwnerTokenRequest, RevokeRefreshTokenRequest, SignupRequest,
};
pub use responses::{
    DeviceCodeResponse, PasswordlessEmailResponse, PasswordlessSmsResponse, SignupResponse,
    TokenResponse, UserInfo,
};

use serde::Serialize;
use url::Url;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{ApiRequest, RestClient};

/// Typed client for the Auth0 Authentication API.
///
/// Cheap to clone; the underlying HTTP connection pool is shared.
#[derive(Debug, Clone)]
pub struct AuthenticationClient {
    rest: RestClient,
    config: ClientConfig,
}

impl AuthenticationClient {
    /// Build a client talking to `https://{domain}`.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let rest =
            RestClient::for_domain(&config.domain, config.timeout, config.retry.clone())?;
        Ok(Self { rest, config })
    }

    /// Build a client against an explicit base URL.
    ///
    /// Intended for tenants with custom domains and for tests pointing at a
    /// local mock server.
    pub fn with_base_url(config: ClientConfig, base: Url) -> Result<Self> {
        let rest = RestClient::for_base_url(base, config.timeout, config.retry.clone())?;
        Ok(Self { rest, config })
    }

    /// Start building the tenant `/authorize` URL for this application.
    pub fn authorize_url(&self) -> AuthorizeUrlBuilder {
        AuthorizeUrlBuilder::new(self.rest.endpoint(&[]), &self.config.client_id)
    }

    /// Start building the tenant `/v2/logout` URL.
    pub fn logout_url(&self) -> LogoutUrlBuilder {
        LogoutUrlBuilder::new(self.rest.endpoint(&[]))
    }

    /// Create a database-connection user via `POST /dbconnections/signup`.
    pub async fn signup(&self, request: SignupRequest) -> Result<SignupResponse> {
        let request = request.with_defaults(&self.config);
        let api = ApiRequest::post(self.rest.endpoint(&["dbconnections", "signup"]))
            .json(&request)?;
        self.rest.json(&api).await
    }

    /// Trigger a password-reset email via `POST /dbconnections/change_password`.
    ///
    /// Auth0 answers with a plain-text confirmation message, which is passed
    /// through unmodified.
    pub async fn change_password(&self, request: ChangePasswordRequest) -> Result<String> {
        let request = request.with_defaults(&self.config);
        let api = ApiRequest::post(self.rest.endpoint(&["dbconnections", "change_password"]))
            .json(&request)?;
        self.rest.text(&api).await
    }

    /// Exchange resource-owner credentials for tokens.
    pub async fn resource_owner_token(
        &self,
        request: ResourceOwnerTokenRequest,
    ) -> Result<TokenResponse> {
        self.oauth_token(&request.with_defaults(&self.config)).await
    }

    /// Exchange an authorization code for tokens (confidential client).
    pub async fn authorization_code_token(
        &self,
        request: AuthorizationCodeTokenRequest,
    ) -> Result<TokenResponse> {
        // Confidential exchange; the tenant rejects it without a secret.
        self.config.require_secret()?;
        self.oauth_token(&request.with_defaults(&self.config)).await
    }

    /// Exchange an authorization code for tokens using PKCE (public client).
    pub async fn authorization_code_pkce_token(
        &self,
        request: AuthorizationCodePkceTokenRequest,
    ) -> Result<TokenResponse> {
        self.oauth_token(&request.with_defaults(&self.config)).await
    }

    /// Obtain a machine-to-machine token via the Client Credentials grant.
    pub async fn client_credentials_token(
        &self,
        request: ClientCredentialsTokenRequest,
    ) -> Result<TokenResponse> {
        let mut request = request;
        if request.client_id.is_none() {
            request.client_id = Some(self.config.client_id.clone());
        }
        if request.client_secret.is_none() {
            request.client_secret = Some(self.config.require_secret()?.to_string());
        }
        self.oauth_token(&request).await
    }

    /// Exchange a refresh token for a new access token.
    pub async fn refresh_token(&self, request: RefreshTokenRequest) -> Result<TokenResponse> {
        self.oauth_token(&request.with_defaults(&self.config)).await
    }

    /// Complete a passwordless flow by exchanging the one-time code.
    pub async fn passwordless_otp_token(
        &self,
        request: PasswordlessOtpTokenRequest,
    ) -> Result<TokenResponse> {
        self.oauth_token(&request.with_defaults(&self.config)).await
    }

    /// Revoke a refresh token via `POST /oauth/revoke`.
    pub async fn revoke_refresh_token(&self, request: RevokeRefreshTokenRequest) -> Result<()> {
        let request = request.with_defaults(&self.config);
        let api = ApiRequest::post(self.rest.endpoint(&["oauth", "revoke"])).json(&request)?;
        self.rest.empty(&api).await
    }

    /// Start a passwordless email flow via `POST /passwordless/start`.
    pub async fn start_passwordless_email(
        &self,
        request: PasswordlessEmailRequest,
    ) -> Result<PasswordlessEmailResponse> {
        let request = request.with_defaults(&self.config);
        let api = ApiRequest::post(self.rest.endpoint(&["passwordless", "start"]))
            .json(&request)?;
        self.rest.json(&api).await
    }

    /// Start a passwordless SMS flow via `POST /passwordless/start`.
    pub async fn start_passwordless_sms(
        &self,
        request: PasswordlessSmsRequest,
    ) -> Result<PasswordlessSmsResponse> {
        let request = request.with_defaults(&self.config);
        let api = ApiRequest::post(self.rest.endpoint(&["passwordless", "start"]))
            .json(&request)?;
        self.rest.json(&api).await
    }

    /// Fetch the profile behind an access token via `GET /userinfo`.
    pub async fn user_info(&self, access_token: &str) -> Result<UserInfo> {
        let api = ApiRequest::get(self.rest.endpoint(&["userinfo"])).bearer(access_token);
        self.rest.json(&api).await
    }

    /// Start the device authorization flow via `POST /oauth/device/code`.
    pub async fn device_code(&self, request: DeviceCodeRequest) -> Result<DeviceCodeResponse> {
        let request = request.with_defaults(&self.config);
        let api = ApiRequest::post(self.rest.endpoint(&["oauth", "device", "code"]))
            .json(&request)?;
        self.rest.json(&api).await
    }

    async fn oauth_token<B: Serialize>(&self, payload: &B) -> Result<TokenResponse> {
        let api = ApiRequest::post(self.rest.endpoint(&["oauth", "token"])).json(payload)?;
        self.rest.json(&api).await
    }
}
