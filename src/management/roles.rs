//! `/api/v2/roles` endpoint group.

use serde::{Deserialize, Serialize};

use super::ManagementClient;
use crate::error::Result;
use crate::http::ApiRequest;
use crate::page::{Page, PageParams};

/// An RBAC role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A user as returned by `GET /api/v2/roles/{id}/users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleUser {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

/// Filters for [`Roles::list`].
#[derive(Debug, Clone, Default)]
pub struct RoleListParams {
    page: PageParams,
    name_filter: Option<String>,
}

impl RoleListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: PageParams) -> Self {
        self.page = page;
        self
    }

    /// Case-insensitive substring match on the role name.
    pub fn with_name_filter(mut self, name_filter: impl Into<String>) -> Self {
        self.name_filter = Some(name_filter.into());
        self
    }

    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.page.to_query();
        pairs.push(("include_totals", "true".to_string()));
        if let Some(name_filter) = &self.name_filter {
            pairs.push(("name_filter", name_filter.clone()));
        }
        pairs
    }
}

/// Body for `POST /api/v2/roles` and `PATCH /api/v2/roles/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct RoleRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RoleRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Serialize)]
struct AssignUsersBody<'a> {
    users: &'a [String],
}

/// Accessor for the roles endpoint group.
pub struct Roles<'a> {
    client: &'a ManagementClient,
}

impl<'a> Roles<'a> {
    pub(super) fn new(client: &'a ManagementClient) -> Self {
        Self { client }
    }

    /// `GET /api/v2/roles` with totals included.
    pub async fn list(&self, params: RoleListParams) -> Result<Page<Role>> {
        let api = ApiRequest::get(self.client.endpoint(&["roles"]))
            .bearer(self.client.token())
            .query(&params.to_query());
        self.client.rest().json(&api).await
    }

    /// `GET /api/v2/roles/{id}`.
    pub async fn get(&self, role_id: &str) -> Result<Role> {
        let api = ApiRequest::get(self.client.endpoint(&["roles", role_id]))
            .bearer(self.client.token());
        self.client.rest().json(&api).await
    }

    /// `POST /api/v2/roles`.
    pub async fn create(&self, request: RoleRequest) -> Result<Role> {
        let api = ApiRequest::post(self.client.endpoint(&["roles"]))
            .bearer(self.client.token())
            .json(&request)?;
        self.client.rest().json(&api).await
    }

    /// `PATCH /api/v2/roles/{id}`.
    pub async fn update(&self, role_id: &str, request: RoleRequest) -> Result<Role> {
        let api = ApiRequest::patch(self.client.endpoint(&["roles", role_id]))
            .bearer(self.client.token())
            .json(&request)?;
        self.client.rest().json(&api).await
    }

    /// `DELETE /api/v2/roles/{id}`.
    pub async fn delete(&self, role_id: &str) -> Result<()> {
        let api = ApiRequest::delete(self.client.endpoint(&["roles", role_id]))
            .bearer(self.client.token());
        self.client.rest().empty(&api).await
    }

    /// `GET /api/v2/roles/{id}/users` with totals included.
    pub async fn users(&self, role_id: &str, params: PageParams) -> Result<Page<RoleUser>> {
        let mut query = params.to_query();
        query.push(("include_totals", "true".to_string()));
        let api = ApiRequest::get(self.client.endpoint(&["roles", role_id, "users"]))
            .bearer(self.client.token())
            .query(&query);
        self.client.rest().json(&api).await
    }

    /// `POST /api/v2/roles/{id}/users` — assign users to the role.
    pub async fn assign_users(&self, role_id: &str, user_ids: &[String]) -> Result<()> {
        let api = ApiRequest::post(self.client.endpoint(&["roles", role_id, "users"]))
            .bearer(self.client.token())
            .json(&AssignUsersBody { users: user_ids })?;
        self.client.rest().empty(&api).await
    }
}
