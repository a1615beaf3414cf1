//! Integration tests for the Zammad API client against a mock server.

use std::time::Duration;

use pretty_assertions::assert_eq;
use url::Url;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use notify_zammad::config::{AuthMethod, Config};
use notify_zammad::error::NotifyError;
use notify_zammad::models::{Article, NewTicket, Ticket, TicketState};
use notify_zammad::zammad_client::ZammadClient;

fn config_for(server: &MockServer, auth: AuthMethod) -> Config {
    Config {
        base_url: Url::parse(&server.uri()).unwrap(),
        auth,
        ca_file: None,
        cert_file: None,
        key_file: None,
        insecure: false,
        timeout: Duration::from_secs(5),
    }
}

fn client_for(server: &MockServer) -> ZammadClient {
    ZammadClient::new(&config_for(server, AuthMethod::Token("secret".to_string()))).unwrap()
}

fn ticket_json(id: u64, host: &str, service: &str, created_at: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": format!("[Problem] State: Down for Host: {}", host),
        "state": "open",
        "icinga_host": host,
        "icinga_service": service,
        "created_at": created_at,
        "article_ids": [1]
    })
}

fn existing_ticket(id: u64) -> Ticket {
    serde_json::from_value(ticket_json(id, "MyHost", "", "2025-05-05T09:38:25.350Z")).unwrap()
}

#[tokio::test]
async fn search_sends_query_and_token_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/tickets/search"))
        .and(query_param(
            "query",
            "icinga_host: MyHost AND (state.name: new OR state.name: open)",
        ))
        .and(query_param("sort_by", "created_at"))
        .and(query_param("order_by", "desc"))
        .and(query_param("expand", "true"))
        .and(header("Authorization", "Token token=secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            ticket_json(13, "MyHost", "", "2025-05-05T09:38:25.350Z")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let tickets = client.search_tickets("MyHost", None).await.unwrap();

    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].id, 13);
    assert_eq!(tickets[0].icinga_host, "MyHost");
}

#[tokio::test]
async fn search_without_service_returns_all_host_tickets() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/tickets/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            ticket_json(16, "MyHost", "http", "2025-05-05T13:46:37.651Z"),
            ticket_json(13, "MyHost", "", "2025-05-05T09:38:25.350Z"),
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let tickets = client.search_tickets("MyHost", None).await.unwrap();

    // No service filter: both tickets of the host match, newest first
    assert_eq!(tickets.len(), 2);
    assert_eq!(tickets[0].id, 16);
}

#[tokio::test]
async fn search_with_service_matches_exactly() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/tickets/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            ticket_json(15, "MyHost", "NoSuchService", "2025-05-05T12:52:36.650Z"),
            ticket_json(16, "MyHost", "MyService", "2025-05-05T13:46:37.651Z"),
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let tickets = client.search_tickets("MyHost", Some("MyService")).await.unwrap();

    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].icinga_service, "MyService");
}

#[tokio::test]
async fn search_with_unmatched_service_returns_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/tickets/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            ticket_json(15, "MyHost", "NoSuchService", "2025-05-05T12:52:36.650Z"),
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let tickets = client.search_tickets("MyHost", Some("MyService")).await.unwrap();

    assert!(tickets.is_empty());
}

#[tokio::test]
async fn search_parses_asset_map_response() {
    let server = MockServer::start().await;

    // Non-expanded responses wrap tickets in an assets map keyed by ID
    Mock::given(method("GET"))
        .and(path("/api/v1/tickets/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "tickets": [13, 16],
            "tickets_count": 2,
            "assets": {
                "Ticket": {
                    "13": ticket_json(13, "MyHost", "", "2025-05-05T09:38:25.350Z"),
                    "16": ticket_json(16, "MyHost", "", "2025-05-05T13:46:37.651Z"),
                }
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let tickets = client.search_tickets("MyHost", None).await.unwrap();

    assert_eq!(tickets.len(), 2);
    // Ordering restored from created_at, newest first
    assert_eq!(tickets[0].id, 16);
    assert_eq!(tickets[1].id, 13);
}

#[tokio::test]
async fn search_unauthorized_names_the_host() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/tickets/search"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.search_tickets("MyHost", None).await.unwrap_err();

    assert!(matches!(err, NotifyError::Authentication { .. }));
    assert!(err.to_string().contains("authentication failed"));
    assert!(err.to_string().contains("127.0.0.1"));
}

#[tokio::test]
async fn search_rejects_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/tickets/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.search_tickets("MyHost", None).await.unwrap_err();

    assert!(matches!(err, NotifyError::ParseResponse(_)));
}

#[tokio::test]
async fn create_ticket_posts_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/tickets"))
        .and(body_partial_json(serde_json::json!({
            "title": "MyNewTicket",
            "group": "Users",
            "icinga_host": "MyHost",
            "article": { "subject": "Problem", "type": "web" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let ticket = NewTicket {
        title: "MyNewTicket".to_string(),
        group: "Users".to_string(),
        customer: "jon.snow@zammad".to_string(),
        icinga_host: "MyHost".to_string(),
        icinga_service: String::new(),
        article: Article::web("Problem", "<h3>Problem</h3>"),
    };

    client.create_ticket(&ticket).await.unwrap();
}

#[tokio::test]
async fn create_ticket_surfaces_error_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/tickets"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_string(r#"{"error":"Customer could not be found"}"#),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let ticket = NewTicket {
        title: "MyNewTicket".to_string(),
        group: "Users".to_string(),
        customer: "nobody@zammad".to_string(),
        icinga_host: "MyHost".to_string(),
        icinga_service: String::new(),
        article: Article::web("Problem", "body"),
    };

    let err = client.create_ticket(&ticket).await.unwrap_err();
    assert!(matches!(err, NotifyError::HttpStatus { .. }));
    assert!(err.to_string().contains("422"));
    assert!(err.to_string().contains("Customer could not be found"));
}

#[tokio::test]
async fn add_article_posts_to_ticket() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/ticket_articles"))
        .and(body_partial_json(serde_json::json!({
            "ticket_id": 1337,
            "subject": "Acknowledgement",
            "internal": true,
            "sender": "Agent"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let article = Article::web("Acknowledgement", "<h3>Acknowledgement</h3>").for_ticket(1337);

    client.add_article_to_ticket(&article).await.unwrap();
}

#[tokio::test]
async fn update_state_puts_state_name() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/tickets/42"))
        .and(body_json(serde_json::json!({ "state": "closed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let ticket = existing_ticket(42);

    client
        .update_ticket_state(&ticket, TicketState::Closed)
        .await
        .unwrap();
}

#[tokio::test]
async fn update_state_surfaces_error_body() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/tickets/42"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let ticket = existing_ticket(42);

    let err = client
        .update_ticket_state(&ticket, TicketState::Open)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("500"));
    assert!(err.to_string().contains("internal error"));
}

#[tokio::test]
async fn bearer_auth_sets_authorization_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/tickets/search"))
        .and(header("Authorization", "Bearer my-oauth-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, AuthMethod::Bearer("my-oauth-token".to_string()));
    let client = ZammadClient::new(&config).unwrap();

    let tickets = client.search_tickets("MyHost", None).await.unwrap();
    assert!(tickets.is_empty());
}

#[tokio::test]
async fn basic_auth_sets_authorization_header() {
    let server = MockServer::start().await;

    // "user:pass" base64-encoded
    Mock::given(method("GET"))
        .and(path("/api/v1/tickets/search"))
        .and(header("Authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(
        &server,
        AuthMethod::Basic {
            username: "user".to_string(),
            password: "pass".to_string(),
        },
    );
    let client = ZammadClient::new(&config).unwrap();

    client.search_tickets("MyHost", None).await.unwrap();
}

#[tokio::test]
async fn transport_error_carries_failing_url() {
    // Unroutable port, nothing is listening
    let config = Config {
        base_url: Url::parse("http://127.0.0.1:9").unwrap(),
        auth: AuthMethod::Token("secret".to_string()),
        ca_file: None,
        cert_file: None,
        key_file: None,
        insecure: false,
        timeout: Duration::from_secs(1),
    };
    let client = ZammadClient::new(&config).unwrap();

    let err = client.search_tickets("MyHost", None).await.unwrap_err();
    match err {
        NotifyError::Transport { ref url, .. } => {
            assert!(url.contains("/api/v1/tickets/search"));
        }
        NotifyError::Timeout { .. } => {} // CI may drop instead of refuse
        other => panic!("expected transport error, got: {other}"),
    }
}
