//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: settings → connector → HTTP requests → records

use clap::Parser;
use flowlink::cli::{Cli, Runner};
use flowlink::connectors::jobber::{self, ClientNode};
use flowlink::connectors::DocumentSource;
use flowlink::error::Error;
use flowlink::http::{HttpClient, HttpClientConfig};
use flowlink::{CursorPaginator, GraphQlClient, JsonValue, PaginationRequest, Settings};
use futures::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JOBS_QUERY: &str = "query Jobs($first: Int, $after: String) {
  jobs(first: $first, after: $after) { nodes { id } pageInfo { hasNextPage endCursor } }
}";

fn jobs_page(start: usize, count: usize, next: Option<&str>) -> JsonValue {
    let nodes: Vec<JsonValue> = (start..start + count)
        .map(|i| json!({ "id": format!("job-{i}") }))
        .collect();
    json!({
        "data": {
            "jobs": {
                "nodes": nodes,
                "pageInfo": { "hasNextPage": next.is_some(), "endCursor": next }
            }
        }
    })
}

/// Mount a three-page connection (10, 10, 4 records) at `/graphql`
async fn mount_jobs(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({ "variables": { "after": "cursor-1" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(jobs_page(10, 10, Some("cursor-2"))))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({ "variables": { "after": "cursor-2" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(jobs_page(20, 4, None)))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jobs_page(0, 10, Some("cursor-1"))))
        .expect(1)
        .mount(server)
        .await;
}

fn graphql_client(server: &MockServer) -> GraphQlClient {
    let http = HttpClient::with_config(HttpClientConfig::builder().base_url(server.uri()).build())
        .unwrap();
    GraphQlClient::new(http, "/graphql")
}

fn settings_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{content}").unwrap();
    file
}

// ============================================================================
// Cursor Pagination
// ============================================================================

#[tokio::test]
async fn test_paginate_collects_all_pages() {
    let server = MockServer::start().await;
    mount_jobs(&server).await;

    let client = graphql_client(&server);
    let records: Vec<JsonValue> = CursorPaginator::new(&client)
        .collect_all(PaginationRequest::new(JOBS_QUERY, "jobs", 100))
        .await
        .unwrap();

    assert_eq!(records.len(), 24);
    assert_eq!(records[0]["id"], "job-0");
    assert_eq!(records[23]["id"], "job-23");

    let requests = server.received_requests().await.unwrap();
    let variables: Vec<JsonValue> = requests
        .iter()
        .map(|r| r.body_json::<JsonValue>().unwrap()["variables"].clone())
        .collect();
    assert_eq!(
        variables,
        vec![
            json!({ "first": 10 }),
            json!({ "after": "cursor-1", "first": 10 }),
            json!({ "after": "cursor-2", "first": 10 }),
        ]
    );
}

#[tokio::test]
async fn test_paginate_cap_is_checked_between_pages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jobs_page(0, 10, Some("cursor-1"))))
        .expect(1)
        .mount(&server)
        .await;

    let client = graphql_client(&server);
    let records: Vec<JsonValue> = CursorPaginator::new(&client)
        .collect_all(PaginationRequest::new(JOBS_QUERY, "jobs", 5))
        .await
        .unwrap();

    // the whole first page is kept even though it exceeds the cap
    assert_eq!(records.len(), 10);
}

#[tokio::test]
async fn test_paginate_stream_is_lazy() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jobs_page(0, 10, Some("cursor-1"))))
        .mount(&server)
        .await;

    let client = graphql_client(&server);
    let paginator = CursorPaginator::new(&client);
    let first_three: Vec<JsonValue> = paginator
        .paginate::<JsonValue>(PaginationRequest::new(JOBS_QUERY, "jobs", 100))
        .take(3)
        .map(Result::unwrap)
        .collect()
        .await;

    assert_eq!(first_three.len(), 3);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_paginate_graphql_error_ends_stream() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({ "variables": { "after": "cursor-1" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{ "message": "Throttled" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jobs_page(0, 10, Some("cursor-1"))))
        .expect(1)
        .mount(&server)
        .await;

    let client = graphql_client(&server);
    let paginator = CursorPaginator::new(&client);
    let stream = paginator.paginate::<JsonValue>(PaginationRequest::new(JOBS_QUERY, "jobs", 100));
    let items: Vec<_> = stream.collect().await;

    assert_eq!(items.len(), 11);
    assert!(items[..10].iter().all(Result::is_ok));
    match &items[10] {
        Err(Error::GraphQl { message }) => assert_eq!(message, "Throttled"),
        other => panic!("expected GraphQL error, got {other:?}"),
    }
}

// ============================================================================
// Connectors via Settings
// ============================================================================

#[tokio::test]
async fn test_jobber_from_settings() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("Authorization", "Bearer settings-token"))
        .and(header(jobber::GRAPHQL_VERSION_HEADER, jobber::DEFAULT_GRAPHQL_VERSION))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "clients": {
                    "nodes": [
                        { "id": "c1", "firstName": "Ada", "lastName": "Lovelace", "companyName": null },
                        { "id": "c2", "firstName": null, "lastName": null, "companyName": "Acme" }
                    ],
                    "pageInfo": { "hasNextPage": false, "endCursor": "c-end" }
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = Settings::from_yaml_str(&format!(
        "http:\n  timeout_secs: 5\njobber:\n  access_token: settings-token\n  base_url: {}\n",
        server.uri()
    ))
    .unwrap();
    let app = settings.jobber_app().unwrap();

    let clients = app.list_clients(50).await.unwrap();
    let labels: Vec<String> = clients.iter().map(ClientNode::label).collect();
    assert_eq!(labels, vec!["Ada Lovelace", "Acme"]);
}

#[tokio::test]
async fn test_reform_from_settings() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/extract-text"))
        .and(header("Authorization", "Bearer reform-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "invoice_number": "42" })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = Settings::from_yaml_str(&format!(
        "reform:\n  api_key: reform-key\n  base_url: {}\n",
        server.uri()
    ))
    .unwrap();
    let app = settings.reform_app().unwrap();

    let result = app
        .extract_data_from_text("Invoice #42", &[json!({ "name": "invoice_number" })])
        .await
        .unwrap();
    assert_eq!(result, json!({ "invoice_number": "42" }));
}

#[tokio::test]
async fn test_reform_missing_document_sends_nothing() {
    let server = MockServer::start().await;

    let settings = Settings::from_yaml_str(&format!(
        "reform:\n  api_key: reform-key\n  base_url: {}\n",
        server.uri()
    ))
    .unwrap();
    let app = settings.reform_app().unwrap();

    let err = app
        .extract_data_from_document(
            &DocumentSource::Path("/definitely/missing.pdf".into()),
            &[json!({ "name": "total" })],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::FileNotFound { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ============================================================================
// CLI
// ============================================================================

#[tokio::test]
async fn test_cli_jobber_query() {
    let server = MockServer::start().await;
    mount_jobs(&server).await;

    let settings = settings_file(&format!(
        "jobber:\n  access_token: cli-token\n  base_url: {}\n",
        server.uri()
    ));
    let query = settings_file(JOBS_QUERY);

    let cli = Cli::try_parse_from([
        "flowlink",
        "-C",
        settings.path().to_str().unwrap(),
        "jobber",
        "query",
        "--query-file",
        query.path().to_str().unwrap(),
        "--resource-key",
        "jobs",
    ])
    .unwrap();

    Runner::new(cli).run().await.unwrap();
}

#[tokio::test]
async fn test_cli_reform_extract_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/extract-text"))
        .and(body_partial_json(json!({
            "fields_to_extract": [{ "name": "total", "type": "number" }, { "name": "vendor" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total": 10 })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings_file(&format!(
        "reform:\n  api_key: cli-key\n  base_url: {}\n",
        server.uri()
    ));

    let cli = Cli::try_parse_from([
        "flowlink",
        "-C",
        settings.path().to_str().unwrap(),
        "-f",
        "pretty",
        "reform",
        "extract-text",
        "--text",
        "Total: 10 from Acme",
        "--field",
        r#"{"name": "total", "type": "number"}"#,
        "--field",
        "vendor",
    ])
    .unwrap();

    Runner::new(cli).run().await.unwrap();
}

#[tokio::test]
async fn test_cli_missing_credentials() {
    let settings = settings_file("http:\n  timeout_secs: 5\n");

    let cli = Cli::try_parse_from([
        "flowlink",
        "-C",
        settings.path().to_str().unwrap(),
        "reform",
        "extract-text",
        "--text",
        "x",
        "--field",
        "total",
    ])
    .unwrap();

    if std::env::var("FLOWLINK_REFORM_API_KEY").is_err() {
        let err = Runner::new(cli).run().await.unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { .. }));
    }
}

#[tokio::test]
async fn test_cli_missing_settings_file() {
    let cli = Cli::try_parse_from(["flowlink", "-C", "/no/such/settings.yaml", "jobber", "clients"])
        .unwrap();

    let err = Runner::new(cli).run().await.unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

#[tokio::test]
async fn test_cli_list() {
    let cli = Cli::try_parse_from(["flowlink", "list"]).unwrap();
    Runner::new(cli).run().await.unwrap();
}
