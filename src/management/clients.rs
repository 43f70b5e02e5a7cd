//! `/api/v2/clients` endpoint group (applications).

use serde::{Deserialize, Serialize};

use super::ManagementClient;
use crate::error::Result;
use crate::http::ApiRequest;
use crate::page::{Page, PageParams};

/// An Auth0 application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub client_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub app_type: Option<String>,
    #[serde(default)]
    pub callbacks: Vec<String>,
    #[serde(default)]
    pub allowed_logout_urls: Vec<String>,
    #[serde(default)]
    pub web_origins: Vec<String>,
    #[serde(default)]
    pub grant_types: Vec<String>,
    #[serde(default)]
    pub token_endpoint_auth_method: Option<String>,
    #[serde(default)]
    pub is_first_party: Option<bool>,
    #[serde(default)]
    pub oidc_conformant: Option<bool>,
}

/// Body for `POST /api/v2/clients`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateClientRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callbacks: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_logout_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_origins: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grant_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oidc_conformant: Option<bool>,
}

impl CreateClientRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            app_type: None,
            callbacks: None,
            allowed_logout_urls: None,
            web_origins: None,
            grant_types: None,
            oidc_conformant: None,
        }
    }

    /// `spa`, `native`, `regular_web`, or `non_interactive`.
    pub fn with_app_type(mut self, app_type: impl Into<String>) -> Self {
        self.app_type = Some(app_type.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_callbacks(mut self, callbacks: Vec<String>) -> Self {
        self.callbacks = Some(callbacks);
        self
    }

    pub fn with_grant_types(mut self, grant_types: Vec<String>) -> Self {
        self.grant_types = Some(grant_types);
        self
    }

    pub fn with_oidc_conformant(mut self, oidc_conformant: bool) -> Self {
        self.oidc_conformant = Some(oidc_conformant);
        self
    }
}

/// Body for `PATCH /api/v2/clients/{id}`. Only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateClientRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callbacks: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_logout_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_origins: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grant_types: Option<Vec<String>>,
}

impl UpdateClientRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_callbacks(mut self, callbacks: Vec<String>) -> Self {
        self.callbacks = Some(callbacks);
        self
    }
}

/// Accessor for the clients endpoint group.
pub struct Clients<'a> {
    client: &'a ManagementClient,
}

impl<'a> Clients<'a> {
    pub(super) fn new(client: &'a ManagementClient) -> Self {
        Self { client }
    }

    /// `GET /api/v2/clients` with totals included.
    pub async fn list(&self, params: PageParams) -> Result<Page<Client>> {
        let mut query = params.to_query();
        query.push(("include_totals", "true".to_string()));
        let api = ApiRequest::get(self.client.endpoint(&["clients"]))
            .bearer(self.client.token())
            .query(&query);
        self.client.rest().json(&api).await
    }

    /// `GET /api/v2/clients/{id}`.
    pub async fn get(&self, client_id: &str) -> Result<Client> {
        let api = ApiRequest::get(self.client.endpoint(&["clients", client_id]))
            .bearer(self.client.token());
        self.client.rest().json(&api).await
    }

    /// `POST /api/v2/clients`.
    pub async fn create(&self, request: CreateClientRequest) -> Result<Client> {
        let api = ApiRequest::post(self.client.endpoint(&["clients"]))
            .bearer(self.client.token())
            .json(&request)?;
        self.client.rest().json(&api).await
    }

    /// `PATCH /api/v2/clients/{id}`.
    pub async fn update(&self, client_id: &str, request: UpdateClientRequest) -> Result<Client> {
        let api = ApiRequest::patch(self.client.endpoint(&["clients", client_id]))
            .bearer(self.client.token())
            .json(&request)?;
        self.client.rest().json(&api).await
    }

    /// `DELETE /api/v2/clients/{id}`.
    pub async fn delete(&self, client_id: &str) -> Result<()> {
        let api = ApiRequest::delete(self.client.endpoint(&["clients", client_id]))
            .bearer(self.client.token());
        self.client.rest().empty(&api).await
    }

    /// `POST /api/v2/clients/{id}/rotate-secret`. The returned client carries
    /// the new secret.
    pub async fn rotate_secret(&self, client_id: &str) -> Result<Client> {
        let api = ApiRequest::post(self.client.endpoint(&["clients", client_id, "rotate-secret"]))
            .bearer(self.client.token());
        self.client.rest().json(&api).await
    }
}
