//! `/api/v2/resource-servers` endpoint group (APIs).

use serde::{Deserialize, Serialize};

use super::ManagementClient;
use crate::error::Result;
use crate::http::ApiRequest;
use crate::page::{Page, PageParams};

/// An API registered with the tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceServer {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub identifier: String,
    #[serde(default)]
    pub scopes: Vec<ResourceServerScope>,
    #[serde(default)]
    pub signing_alg: Option<String>,
    #[serde(default)]
    pub token_lifetime: Option<u64>,
    #[serde(default)]
    pub allow_offline_access: Option<bool>,
    #[serde(default)]
    pub skip_consent_for_verifiable_first_party_clients: Option<bool>,
}

/// One scope (permission) exposed by an API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceServerScope {
    pub value: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body for `POST /api/v2/resource-servers`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateResourceServerRequest {
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<ResourceServerScope>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_alg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_lifetime: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_offline_access: Option<bool>,
}

impl CreateResourceServerRequest {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: None,
            scopes: None,
            signing_alg: None,
            token_lifetime: None,
            allow_offline_access: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_scopes(mut self, scopes: Vec<ResourceServerScope>) -> Self {
        self.scopes = Some(scopes);
        self
    }

    pub fn with_token_lifetime(mut self, token_lifetime: u64) -> Self {
        self.token_lifetime = Some(token_lifetime);
        self
    }

    pub fn with_allow_offline_access(mut self, allow: bool) -> Self {
        self.allow_offline_access = Some(allow);
        self
    }
}

/// Body for `PATCH /api/v2/resource-servers/{id}`. The identifier cannot
/// change after creation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateResourceServerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<ResourceServerScope>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_lifetime: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_offline_access: Option<bool>,
}

impl UpdateResourceServerRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_scopes(mut self, scopes: Vec<ResourceServerScope>) -> Self {
        self.scopes = Some(scopes);
        self
    }

    pub fn with_token_lifetime(mut self, token_lifetime: u64) -> Self {
        self.token_lifetime = Some(token_lifetime);
        self
    }
}

/// Accessor for the resource-servers endpoint group.
pub struct ResourceServers<'a> {
    client: &'a ManagementClient,
}

impl<'a> ResourceServers<'a> {
    pub(super) fn new(client: &'a ManagementClient) -> Self {
        Self { client }
    }

    /// `GET /api/v2/resource-servers` with totals included.
    pub async fn list(&self, params: PageParams) -> Result<Page<ResourceServer>> {
        let mut query = params.to_query();
        query.push(("include_totals", "true".to_string()));
        let api = ApiRequest::get(self.client.endpoint(&["resource-servers"]))
            .bearer(self.client.token())
            .query(&query);
        self.client.rest().json(&api).await
    }

    /// `GET /api/v2/resource-servers/{id}` — accepts the ID or the audience
    /// identifier.
    pub async fn get(&self, id: &str) -> Result<ResourceServer> {
        let api = ApiRequest::get(self.client.endpoint(&["resource-servers", id]))
            .bearer(self.client.token());
        self.client.rest().json(&api).await
    }

    /// `POST /api/v2/resource-servers`.
    pub async fn create(&self, request: CreateResourceServerRequest) -> Result<ResourceServer> {
        let api = ApiRequest::post(self.client.endpoint(&["resource-servers"]))
            .bearer(self.client.token())
            .json(&request)?;
        self.client.rest().json(&api).await
    }

    /// `PATCH /api/v2/resource-servers/{id}`.
    pub async fn update(
        &self,
        id: &str,
        request: UpdateResourceServerRequest,
    ) -> Result<ResourceServer> {
        let api = ApiRequest::patch(self.client.endpoint(&["resource-servers", id]))
            .bearer(self.client.token())
            .json(&request)?;
        self.client.rest().json(&api).await
    }

    /// `DELETE /api/v2/resource-servers/{id}`.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let api = ApiRequest::delete(self.client.endpoint(&["resource-servers", id]))
            .bearer(self.client.token());
        self.client.rest().empty(&api).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_server_deserializes() {
        let server: ResourceServer = serde_json::from_str(
            r#"{
                "id": "rs_123",
                "name": "My API",
                "identifier": "https://api.example.com",
                "scopes": [{"value": "read:items", "description": "Read items"}],
                "signing_alg": "RS256",
                "token_lifetime": 86400
            }"#,
        )
        .expect("resource server should deserialize");

        assert_eq!(server.identifier, "https://api.example.com");
        assert_eq!(
            server.scopes,
            vec![ResourceServerScope {
                value: "read:items".to_string(),
                description: Some("Read items".to_string()),
            }]
        );
    }

    #[test]
    fn create_request_serializes_scopes() {
        let request = CreateResourceServerRequest::new("https://api.example.com").with_scopes(
            vec![ResourceServerScope {
                value: "write:items".to_string(),
                description: None,
            }],
        );
        let json = serde_json::to_value(request).expect("request serializes");

        assert_eq!(json["identifier"], "https://api.example.com");
        assert_eq!(json["scopes"][0]["value"], "write:items");
    }
}
