//! `/api/v2/connections` endpoint group.

use serde::{Deserialize, Serialize};

use super::ManagementClient;
use crate::error::Result;
use crate::http::ApiRequest;
use crate::page::{Page, PageParams};

/// An identity-provider connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub id: String,
    pub name: String,
    pub strategy: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub enabled_clients: Vec<String>,
    #[serde(default)]
    pub realms: Vec<String>,
    #[serde(default)]
    pub is_domain_connection: Option<bool>,
    #[serde(default)]
    pub options: Option<serde_json::Value>,
}

/// Filters for [`Connections::list`].
#[derive(Debug, Clone, Default)]
pub struct ConnectionListParams {
    page: PageParams,
    strategy: Option<String>,
    name: Option<String>,
}

impl ConnectionListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: PageParams) -> Self {
        self.page = page;
        self
    }

    /// Filter by strategy, e.g. `auth0`, `google-oauth2`, `samlp`.
    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.page.to_query();
        pairs.push(("include_totals", "true".to_string()));
        if let Some(strategy) = &self.strategy {
            pairs.push(("strategy", strategy.clone()));
        }
        if let Some(name) = &self.name {
            pairs.push(("name", name.clone()));
        }
        pairs
    }
}

/// Body for `POST /api/v2/connections`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateConnectionRequest {
    pub name: String,
    pub strategy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_clients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<serde_json::Value>,
}

impl CreateConnectionRequest {
    pub fn new(name: impl Into<String>, strategy: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            strategy: strategy.into(),
            display_name: None,
            enabled_clients: None,
            options: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_enabled_clients(mut self, enabled_clients: Vec<String>) -> Self {
        self.enabled_clients = Some(enabled_clients);
        self
    }

    pub fn with_options(mut self, options: serde_json::Value) -> Self {
        self.options = Some(options);
        self
    }
}

/// Body for `PATCH /api/v2/connections/{id}`. The strategy and name cannot
/// change after creation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateConnectionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_clients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<serde_json::Value>,
}

impl UpdateConnectionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_enabled_clients(mut self, enabled_clients: Vec<String>) -> Self {
        self.enabled_clients = Some(enabled_clients);
        self
    }

    pub fn with_options(mut self, options: serde_json::Value) -> Self {
        self.options = Some(options);
        self
    }
}

/// Accessor for the connections endpoint group.
pub struct Connections<'a> {
    client: &'a ManagementClient,
}

impl<'a> Connections<'a> {
    pub(super) fn new(client: &'a ManagementClient) -> Self {
        Self { client }
    }

    /// `GET /api/v2/connections` with totals included.
    pub async fn list(&self, params: ConnectionListParams) -> Result<Page<Connection>> {
        let api = ApiRequest::get(self.client.endpoint(&["connections"]))
            .bearer(self.client.token())
            .query(&params.to_query());
        self.client.rest().json(&api).await
    }

    /// `GET /api/v2/connections/{id}`.
    pub async fn get(&self, connection_id: &str) -> Result<Connection> {
        let api = ApiRequest::get(self.client.endpoint(&["connections", connection_id]))
            .bearer(self.client.token());
        self.client.rest().json(&api).await
    }

    /// `POST /api/v2/connections`.
    pub async fn create(&self, request: CreateConnectionRequest) -> Result<Connection> {
        let api = ApiRequest::post(self.client.endpoint(&["connections"]))
            .bearer(self.client.token())
            .json(&request)?;
        self.client.rest().json(&api).await
    }

    /// `PATCH /api/v2/connections/{id}`.
    pub async fn update(
        &self,
        connection_id: &str,
        request: UpdateConnectionRequest,
    ) -> Result<Connection> {
        let api = ApiRequest::patch(self.client.endpoint(&["connections", connection_id]))
            .bearer(self.client.token())
            .json(&request)?;
        self.client.rest().json(&api).await
    }

    /// `DELETE /api/v2/connections/{id}`.
    pub async fn delete(&self, connection_id: &str) -> Result<()> {
        let api = ApiRequest::delete(self.client.endpoint(&["connections", connection_id]))
            .bearer(self.client.token());
        self.client.rest().empty(&api).await
    }

    /// `DELETE /api/v2/connections/{id}/users?email=...` — remove a database
    /// user by email.
    pub async fn delete_user(&self, connection_id: &str, email: &str) -> Result<()> {
        let api = ApiRequest::delete(self.client.endpoint(&["connections", connection_id, "users"]))
            .bearer(self.client.token())
            .query(&[("email", email.to_string())]);
        self.client.rest().empty(&api).await
    }
}
