//! `/api/v2/tickets` endpoint group.

use serde::{Deserialize, Serialize};

use super::ManagementClient;
use crate::error::Result;
use crate::http::ApiRequest;

/// A single-use ticket URL returned by both ticket endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket: String,
}

/// Body for `POST /api/v2/tickets/email-verification`.
#[derive(Debug, Clone, Serialize)]
pub struct EmailVerificationTicketRequest {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_sec: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

impl EmailVerificationTicketRequest {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            result_url: None,
            ttl_sec: None,
            client_id: None,
        }
    }

    /// Where the browser lands after verification.
    pub fn with_result_url(mut self, result_url: impl Into<String>) -> Self {
        self.result_url = Some(result_url.into());
        self
    }

    pub fn with_ttl_sec(mut self, ttl_sec: u32) -> Self {
        self.ttl_sec = Some(ttl_sec);
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }
}

/// Body for `POST /api/v2/tickets/password-change`.
///
/// Identify the user either by `user_id` or by `email` plus
/// `connection_id`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PasswordChangeTicketRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_sec: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_email_as_verified: Option<bool>,
}

impl PasswordChangeTicketRequest {
    pub fn for_user_id(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    pub fn for_email(email: impl Into<String>, connection_id: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            connection_id: Some(connection_id.into()),
            ..Self::default()
        }
    }

    pub fn with_result_url(mut self, result_url: impl Into<String>) -> Self {
        self.result_url = Some(result_url.into());
        self
    }

    pub fn with_ttl_sec(mut self, ttl_sec: u32) -> Self {
        self.ttl_sec = Some(ttl_sec);
        self
    }

    pub fn with_mark_email_as_verified(mut self, mark: bool) -> Self {
        self.mark_email_as_verified = Some(mark);
        self
    }
}

/// Accessor for the tickets endpoint group.
pub struct Tickets<'a> {
    client: &'a ManagementClient,
}

impl<'a> Tickets<'a> {
    pub(super) fn new(client: &'a ManagementClient) -> Self {
        Self { client }
    }

    /// `POST /api/v2/tickets/email-verification`.
    pub async fn email_verification(
        &self,
        request: EmailVerificationTicketRequest,
    ) -> Result<Ticket> {
        let api = ApiRequest::post(self.client.endpoint(&["tickets", "email-verification"]))
            .bearer(self.client.token())
            .json(&request)?;
        self.client.rest().json(&api).await
    }

    /// `POST /api/v2/tickets/password-change`.
    pub async fn password_change(&self, request: PasswordChangeTicketRequest) -> Result<Ticket> {
        let api = ApiRequest::post(self.client.endpoint(&["tickets", "password-change"]))
            .bearer(self.client.token())
            .json(&request)?;
        self.client.rest().json(&api).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_verification_request_serializes() {
        let request = EmailVerificationTicketRequest::new("auth0|507f")
            .with_result_url("https://app.example.com/verified")
            .with_ttl_sec(86400);
        let json = serde_json::to_value(request).expect("request serializes");

        assert_eq!(json["user_id"], "auth0|507f");
        assert_eq!(json["result_url"], "https://app.example.com/verified");
        assert_eq!(json["ttl_sec"], 86400);
        assert!(json.get("client_id").is_none());
    }

    #[test]
    fn password_change_by_email_requires_connection() {
        let request =
            PasswordChangeTicketRequest::for_email("jane@example.com", "con_123");
        let json = serde_json::to_value(request).expect("request serializes");

        assert_eq!(json["email"], "jane@example.com");
        assert_eq!(json["connection_id"], "con_123");
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn ticket_deserializes() {
        let ticket: Ticket = serde_json::from_str(
            r#"{"ticket":"https://tenant.auth0.com/lo/reset?ticket=abc#"}"#,
        )
        .expect("ticket should deserialize");
        assert!(ticket.ticket.contains("reset"));
    }
}
