//! End-to-end tests for the management client against a mock tenant.

mod common;

use auth0_client::management::tickets::PasswordChangeTicketRequest;
use auth0_client::management::users::{CreateUserRequest, UserListParams};
use auth0_client::management::ManagementClient;
use auth0_client::{CheckpointParams, ClientConfig, Error, PageParams};

use common::{json_response, rate_limited_response, spawn_server};

const TOKEN: &str = "mgmt-token";

#[tokio::test]
async fn list_users_requests_totals_and_parses_page() {
    let (base, server) = spawn_server(vec![json_response(
        "200 OK",
        r#"{"start":0,"limit":2,"length":2,"total":5,"users":[
            {"user_id":"auth0|1","email":"a@example.com"},
            {"user_id":"auth0|2","email":"b@example.com"}
        ]}"#,
    )])
    .await;

    let client = ManagementClient::with_base_url(base, TOKEN).expect("client should build");
    let page = client
        .users()
        .list(UserListParams::new().with_page(PageParams::new().with_page(0).with_per_page(2)))
        .await
        .expect("list should succeed");

    assert_eq!(page.total, 5);
    assert_eq!(page.items.len(), 2);
    assert!(page.has_more());
    assert_eq!(page.items[0].user_id, "auth0|1");

    let requests = server.await.expect("server should finish");
    let request = requests[0].to_ascii_lowercase();
    assert!(request.starts_with("get /api/v2/users?"));
    assert!(request.contains("include_totals=true"));
    assert!(request.contains("per_page=2"));
    assert!(request.contains(&format!("authorization: bearer {TOKEN}")));
}

#[tokio::test]
async fn get_user_percent_encodes_the_id() {
    let (base, server) = spawn_server(vec![json_response(
        "200 OK",
        r#"{"user_id":"auth0|507f","email":"jane@example.com"}"#,
    )])
    .await;

    let client = ManagementClient::with_base_url(base, TOKEN).expect("client should build");
    let user = client
        .users()
        .get("auth0|507f")
        .await
        .expect("get should succeed");

    assert_eq!(user.user_id, "auth0|507f");

    let requests = server.await.expect("server should finish");
    assert!(requests[0].starts_with("GET /api/v2/users/auth0%7C507f HTTP/1.1"));
}

#[tokio::test]
async fn create_user_posts_connection_and_credentials() {
    let (base, server) = spawn_server(vec![json_response(
        "201 Created",
        r#"{"user_id":"auth0|new","email":"new@example.com","email_verified":false}"#,
    )])
    .await;

    let client = ManagementClient::with_base_url(base, TOKEN).expect("client should build");
    let user = client
        .users()
        .create(
            CreateUserRequest::new("Username-Password-Authentication")
                .with_email("new@example.com")
                .with_password("hunter2!"),
        )
        .await
        .expect("create should succeed");

    assert_eq!(user.user_id, "auth0|new");

    let requests = server.await.expect("server should finish");
    assert!(requests[0].starts_with("POST /api/v2/users HTTP/1.1"));
    assert!(requests[0].contains(r#""connection":"Username-Password-Authentication""#));
    assert!(requests[0].contains(r#""email":"new@example.com""#));
}

#[tokio::test]
async fn duplicate_user_maps_to_api_error() {
    let (base, server) = spawn_server(vec![json_response(
        "409 Conflict",
        r#"{"statusCode":409,"code":"user_exists","description":"The user already exists."}"#,
    )])
    .await;

    let client = ManagementClient::with_base_url(base, TOKEN).expect("client should build");
    let result = client
        .users()
        .create(CreateUserRequest::new("Username-Password-Authentication")
            .with_email("dup@example.com"))
        .await;

    assert!(matches!(
        result,
        Err(Error::Api { status: 409, ref code, .. }) if code == "user_exists"
    ));
    server.await.expect("server should finish");
}

#[tokio::test]
async fn rate_limited_list_is_retried() {
    let (base, server) = spawn_server(vec![
        rate_limited_response(r#"{"error":"too_many_requests","error_description":"limit"}"#),
        json_response(
            "200 OK",
            r#"{"start":0,"limit":50,"length":0,"total":0,"users":[]}"#,
        ),
    ])
    .await;

    let client = ManagementClient::with_base_url(base, TOKEN).expect("client should build");
    let page = client
        .users()
        .list(UserListParams::new())
        .await
        .expect("retried list should succeed");

    assert!(page.items.is_empty());

    let requests = server.await.expect("server should finish");
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn rotate_secret_posts_to_the_rotation_endpoint() {
    let (base, server) = spawn_server(vec![json_response(
        "200 OK",
        r#"{"client_id":"abc123","name":"My App","client_secret":"fresh-secret"}"#,
    )])
    .await;

    let client = ManagementClient::with_base_url(base, TOKEN).expect("client should build");
    let rotated = client
        .clients()
        .rotate_secret("abc123")
        .await
        .expect("rotation should succeed");

    assert_eq!(rotated.client_secret.as_deref(), Some("fresh-secret"));

    let requests = server.await.expect("server should finish");
    assert!(requests[0].starts_with("POST /api/v2/clients/abc123/rotate-secret HTTP/1.1"));
}

#[tokio::test]
async fn checkpoint_log_export_returns_plain_batch() {
    let (base, server) = spawn_server(vec![json_response(
        "200 OK",
        r#"[{"log_id":"log_1","type":"s"},{"log_id":"log_2","type":"f"}]"#,
    )])
    .await;

    let client = ManagementClient::with_base_url(base, TOKEN).expect("client should build");
    let batch = client
        .logs()
        .list_checkpoint(CheckpointParams::new().with_from("log_0").with_take(2))
        .await
        .expect("checkpoint export should succeed");

    assert_eq!(batch.items.len(), 2);
    assert_eq!(batch.items[1].event_type.as_deref(), Some("f"));
    assert_eq!(batch.next.as_deref(), Some("log_2"));

    let requests = server.await.expect("server should finish");
    let request = requests[0].to_ascii_lowercase();
    assert!(request.starts_with("get /api/v2/logs?"));
    assert!(request.contains("from=log_0"));
    assert!(request.contains("take=2"));
}

#[tokio::test]
async fn delete_user_sends_delete_and_tolerates_empty_body() {
    let (base, server) =
        spawn_server(vec![common::response_with_headers("204 No Content", "", "")]).await;

    let client = ManagementClient::with_base_url(base, TOKEN).expect("client should build");
    client
        .users()
        .delete("auth0|507f")
        .await
        .expect("delete should succeed");

    let requests = server.await.expect("server should finish");
    assert!(requests[0].starts_with("DELETE /api/v2/users/auth0%7C507f HTTP/1.1"));
}

#[tokio::test]
async fn client_credentials_bootstrap_fetches_a_token_then_uses_it() {
    let (base, server) = spawn_server(vec![
        json_response(
            "200 OK",
            r#"{"access_token":"mgmt-at","token_type":"Bearer","expires_in":86400}"#,
        ),
        json_response(
            "200 OK",
            r#"{"start":0,"limit":50,"length":0,"total":0,"users":[]}"#,
        ),
    ])
    .await;

    let config = ClientConfig::builder()
        .domain("tenant.auth0.com")
        .client_id("abc123")
        .client_secret("shh")
        .build()
        .expect("config should build");

    let client = ManagementClient::from_client_credentials_at(config, base)
        .await
        .expect("bootstrap should succeed");
    let page = client
        .users()
        .list(UserListParams::new())
        .await
        .expect("list should succeed");

    assert!(page.items.is_empty());

    let requests = server.await.expect("server should finish");
    assert!(requests[0].starts_with("POST /oauth/token HTTP/1.1"));
    assert!(requests[0].contains(r#""grant_type":"client_credentials""#));
    assert!(requests[0].contains(r#""audience":"https://tenant.auth0.com/api/v2/""#));
    assert!(requests[0].contains(r#""client_secret":"shh""#));
    assert!(requests[1]
        .to_ascii_lowercase()
        .contains("authorization: bearer mgmt-at"));
}

#[tokio::test]
async fn password_change_ticket_round_trip() {
    let (base, server) = spawn_server(vec![json_response(
        "201 Created",
        r#"{"ticket":"https://tenant.auth0.com/lo/reset?ticket=abc#"}"#,
    )])
    .await;

    let client = ManagementClient::with_base_url(base, TOKEN).expect("client should build");
    let ticket = client
        .tickets()
        .password_change(
            PasswordChangeTicketRequest::for_user_id("auth0|507f")
                .with_result_url("https://app.example.com/done")
                .with_ttl_sec(3600),
        )
        .await
        .expect("ticket creation should succeed");

    assert!(ticket.ticket.contains("ticket=abc"));

    let requests = server.await.expect("server should finish");
    assert!(requests[0].starts_with("POST /api/v2/tickets/password-change HTTP/1.1"));
    assert!(requests[0].contains(r#""user_id":"auth0|507f""#));
    assert!(requests[0].contains(r#""ttl_sec":3600"#));
}
