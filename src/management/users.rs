//! `/api/v2/users` endpoint group.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ManagementClient;
use crate::error::Result;
use crate::http::ApiRequest;
use crate::page::{Page, PageParams};

/// An Auth0 user profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub blocked: Option<bool>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub logins_count: Option<u64>,
    #[serde(default)]
    pub identities: Vec<Identity>,
    #[serde(default)]
    pub user_metadata: Option<serde_json::Value>,
    #[serde(default)]
    pub app_metadata: Option<serde_json::Value>,
}

/// One identity linked to a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub provider: String,
    pub user_id: String,
    pub connection: String,
    #[serde(rename = "isSocial", default)]
    pub is_social: bool,
    #[serde(rename = "profileData", default)]
    pub profile_data: Option<serde_json::Value>,
}

impl Identity {
    /// The `provider|user_id` form used in user IDs.
    pub fn qualified_id(&self) -> String {
        format!("{}|{}", self.provider, self.user_id)
    }
}

/// Filters for [`Users::list`].
#[derive(Debug, Clone, Default)]
pub struct UserListParams {
    page: PageParams,
    q: Option<String>,
    sort: Option<String>,
    connection: Option<String>,
}

impl UserListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: PageParams) -> Self {
        self.page = page;
        self
    }

    /// Lucene query, e.g. `email:"jane@example.com"`.
    pub fn with_query(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    /// Sort field and order, e.g. `created_at:-1`.
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn with_connection(mut self, connection: impl Into<String>) -> Self {
        self.connection = Some(connection.into());
        self
    }

    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.page.to_query();
        pairs.push(("include_totals", "true".to_string()));
        if let Some(q) = &self.q {
            pairs.push(("q", q.clone()));
            pairs.push(("search_engine", "v3".to_string()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }
        if let Some(connection) = &self.connection {
            pairs.push(("connection", connection.clone()));
        }
        pairs
    }
}

/// Body for `POST /api/v2/users`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateUserRequest {
    pub connection: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_email: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_metadata: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_metadata: Option<serde_json::Value>,
}

impl CreateUserRequest {
    pub fn new(connection: impl Into<String>) -> Self {
        Self {
            connection: connection.into(),
            email: None,
            phone_number: None,
            password: None,
            username: None,
            name: None,
            email_verified: None,
            verify_email: None,
            user_metadata: None,
            app_metadata: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email_verified(mut self, verified: bool) -> Self {
        self.email_verified = Some(verified);
        self
    }

    pub fn with_user_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.user_metadata = Some(metadata);
        self
    }

    pub fn with_app_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.app_metadata = Some(metadata);
        self
    }
}

/// Body for `PATCH /api/v2/users/{id}`. Only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_metadata: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_metadata: Option<serde_json::Value>,
}

impl UpdateUserRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_blocked(mut self, blocked: bool) -> Self {
        self.blocked = Some(blocked);
        self
    }

    /// Required by Auth0 when changing email, password, or username.
    pub fn with_connection(mut self, connection: impl Into<String>) -> Self {
        self.connection = Some(connection.into());
        self
    }

    pub fn with_user_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.user_metadata = Some(metadata);
        self
    }

    pub fn with_app_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.app_metadata = Some(metadata);
        self
    }
}

/// Body for `POST /api/v2/users/{id}/identities`.
#[derive(Debug, Clone, Serialize)]
pub struct LinkIdentityRequest {
    pub provider: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
}

impl LinkIdentityRequest {
    pub fn new(provider: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            user_id: user_id.into(),
            connection_id: None,
        }
    }

    pub fn with_connection_id(mut self, connection_id: impl Into<String>) -> Self {
        self.connection_id = Some(connection_id.into());
        self
    }
}

/// Accessor for the users endpoint group.
pub struct Users<'a> {
    client: &'a ManagementClient,
}

impl<'a> Users<'a> {
    pub(super) fn new(client: &'a ManagementClient) -> Self {
        Self { client }
    }

    /// `GET /api/v2/users` with totals included.
    pub async fn list(&self, params: UserListParams) -> Result<Page<User>> {
        let api = ApiRequest::get(self.client.endpoint(&["users"]))
            .bearer(self.client.token())
            .query(&params.to_query());
        self.client.rest().json(&api).await
    }

    /// `GET /api/v2/users/{id}`.
    pub async fn get(&self, user_id: &str) -> Result<User> {
        let api = ApiRequest::get(self.client.endpoint(&["users", user_id]))
            .bearer(self.client.token());
        self.client.rest().json(&api).await
    }

    /// `POST /api/v2/users`.
    pub async fn create(&self, request: CreateUserRequest) -> Result<User> {
        let api = ApiRequest::post(self.client.endpoint(&["users"]))
            .bearer(self.client.token())
            .json(&request)?;
        self.client.rest().json(&api).await
    }

    /// `PATCH /api/v2/users/{id}`.
    pub async fn update(&self, user_id: &str, request: UpdateUserRequest) -> Result<User> {
        let api = ApiRequest::patch(self.client.endpoint(&["users", user_id]))
            .bearer(self.client.token())
            .json(&request)?;
        self.client.rest().json(&api).await
    }

    /// `DELETE /api/v2/users/{id}`.
    pub async fn delete(&self, user_id: &str) -> Result<()> {
        let api = ApiRequest::delete(self.client.endpoint(&["users", user_id]))
            .bearer(self.client.token());
        self.client.rest().empty(&api).await
    }

    /// Link a secondary identity to `primary_user_id`. Returns the merged
    /// identity list.
    pub async fn link_identity(
        &self,
        primary_user_id: &str,
        request: LinkIdentityRequest,
    ) -> Result<Vec<Identity>> {
        let api = ApiRequest::post(self.client.endpoint(&["users", primary_user_id, "identities"]))
            .bearer(self.client.token())
            .json(&request)?;
        self.client.rest().json(&api).await
    }

    /// Unlink an identity. Returns the identities remaining on the primary
    /// user.
    pub async fn unlink_identity(
        &self,
        primary_user_id: &str,
        provider: &str,
        secondary_user_id: &str,
    ) -> Result<Vec<Identity>> {
        let api = ApiRequest::delete(self.client.endpoint(&[
            "users",
            primary_user_id,
            "identities",
            provider,
            secondary_user_id,
        ]))
        .bearer(self.client.token());
        self.client.rest().json(&api).await
    }
}
