//! Async client for Auth0's Authentication API and Management API v2.
//!
//! Two entry points share one transport layer: [`AuthenticationClient`] for
//! tenant-facing flows (signup, token grants, passwordless, `/userinfo`) and
//! [`ManagementClient`] for the bearer-token Management API (users, clients,
//! connections, roles, and the rest). Rate-limited and transient failures are
//! retried with exponential backoff, honoring `Retry-After`.
//!
//! ```no_run
//! use auth0_client::authentication::ResourceOwnerTokenRequest;
//! use auth0_client::{AuthenticationClient, ClientConfig};
//!
//! # async fn run() -> auth0_client::Result<()> {
//! let config = ClientConfig::builder()
//!     .domain("tenant.auth0.com")
//!     .client_id("abc123")
//!     .client_secret("shh")
//!     .build()?;
//!
//! let auth = AuthenticationClient::new(config)?;
//! let tokens = auth
//!     .resource_owner_token(
//!         ResourceOwnerTokenRequest::new("jane@example.com", "hunter2!")
//!             .with_scope("openid profile"),
//!     )
//!     .await?;
//! println!("access token: {}", tokens.access_token);
//! # Ok(())
//! # }
//! ```

pub mod authentication;
pub mod config;
pub mod error;
mod http;
pub mod jwks;
pub mod management;
pub mod page;
pub mod retry;

pub use authentication::AuthenticationClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, Result};
pub use management::ManagementClient;
pub use page::{CheckpointPage, CheckpointParams, Page, PageParams};
pub use retry::RetryPolicy;
