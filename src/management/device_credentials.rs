//! `/api/v2/device-credentials` endpoint group.

use serde::{Deserialize, Serialize};

use super::ManagementClient;
use crate::error::Result;
use crate::http::ApiRequest;

/// A device credential (public key or refresh-token handle).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceCredential {
    pub id: String,
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(rename = "type", default)]
    pub credential_type: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Filters for [`DeviceCredentials::list`]. The endpoint returns a plain
/// array, not a totals envelope.
#[derive(Debug, Clone, Default)]
pub struct DeviceCredentialListParams {
    user_id: Option<String>,
    client_id: Option<String>,
    credential_type: Option<String>,
}

impl DeviceCredentialListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// `public_key` or `refresh_token`.
    pub fn with_type(mut self, credential_type: impl Into<String>) -> Self {
        self.credential_type = Some(credential_type.into());
        self
    }

    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(user_id) = &self.user_id {
            pairs.push(("user_id", user_id.clone()));
        }
        if let Some(client_id) = &self.client_id {
            pairs.push(("client_id", client_id.clone()));
        }
        if let Some(credential_type) = &self.credential_type {
            pairs.push(("type", credential_type.clone()));
        }
        pairs
    }
}

/// Accessor for the device-credentials endpoint group.
pub struct DeviceCredentials<'a> {
    client: &'a ManagementClient,
}

impl<'a> DeviceCredentials<'a> {
    pub(super) fn new(client: &'a ManagementClient) -> Self {
        Self { client }
    }

    /// `GET /api/v2/device-credentials`.
    pub async fn list(
        &self,
        params: DeviceCredentialListParams,
    ) -> Result<Vec<DeviceCredential>> {
        let api = ApiRequest::get(self.client.endpoint(&["device-credentials"]))
            .bearer(self.client.token())
            .query(&params.to_query());
        self.client.rest().json(&api).await
    }

    /// `DELETE /api/v2/device-credentials/{id}`.
    pub async fn delete(&self, credential_id: &str) -> Result<()> {
        let api = ApiRequest::delete(self.client.endpoint(&["device-credentials", credential_id]))
            .bearer(self.client.token());
        self.client.rest().empty(&api).await
    }
}
