use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use verso_api::filter::{Filter, FilterOrder};
use verso_api::resources::Deployment;
use verso_api::GetServiceRequest;
use verso_client::{ClientConfig, ClientError, ConsulClient, SearchSemantics, VersoClient};
use verso_table::{FetchOutcome, TableState};

fn config_for(base_url: &str) -> ClientConfig {
    ClientConfig {
        verso_base_url: base_url.to_string(),
        consul_base_url: base_url.to_string(),
        request_timeout_ms: 5_000,
        default_limit: 20,
        search_semantics: SearchSemantics::Conjunctive,
    }
}

async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn expected_pairs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

async fn deployments_handler(
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let expected = expected_pairs(&[
        ("q[status]", "active"),
        ("l", "20"),
        ("p", "1"),
        ("o[deployedAt]", "desc"),
    ]);
    if params != expected {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "status": "error",
                "message": format!("unexpected query: {:?}", params)
            })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "data": [
                {"id": 1, "deployedAt": "2024-03-01T10:00:00Z", "version": "1.2.0",
                 "service": 4, "installation": "acme-prod"},
                {"id": 2, "deployedAt": "2024-02-28T09:00:00Z", "version": null,
                 "service": null, "installation": "acme-staging"}
            ],
            "meta": {"pagination": {"page": 1, "total": 45}}
        })),
    )
}

#[tokio::test]
async fn deployments_flow_from_context_to_rows() {
    let app = Router::new().route("/api/v1/deployments", get(deployments_handler));
    let base_url = spawn_server(app).await;
    let client = VersoClient::new(&config_for(&base_url)).unwrap();

    let mut state: TableState<Deployment> = TableState::new(20);
    state.fetcher.set_field("status", "active");
    state.fetcher.sorted_by("deployedAt", FilterOrder::Desc);

    let outcome = state
        .load_with(|filter| async move { client.get_deployments(&filter).await })
        .await
        .unwrap();

    assert_eq!(outcome, FetchOutcome::Applied);
    assert_eq!(state.rows.len(), 2);
    assert_eq!(state.rows[0].id, Some(1));
    assert_eq!(state.rows[1].version, None);
    assert!(!state.loading);

    let pagination = state.pagination.unwrap();
    assert_eq!(pagination.page, 1, "metadata page matches the requested page");
    assert_eq!(pagination.total, 45);

    assert!(state.has_next_page());
    assert!(!state.has_previous_page());
    assert_eq!(state.total_pages(), Some(3));
    assert_eq!(state.next_page().unwrap(), 2);
}

#[tokio::test]
async fn backend_error_body_is_surfaced() {
    async fn not_found() -> (StatusCode, Json<Value>) {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"status": "error", "message": "no such page"})),
        )
    }
    let app = Router::new().route("/api/v1/releases", get(not_found));
    let base_url = spawn_server(app).await;
    let client = VersoClient::new(&config_for(&base_url)).unwrap();

    let err = client.get_releases(&Filter::new()).await.unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "no such page");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn unstructured_error_body_is_passed_through() {
    async fn teapot() -> (StatusCode, String) {
        (StatusCode::IM_A_TEAPOT, "out of tea".to_string())
    }
    let app = Router::new().route("/api/v1/features", get(teapot));
    let base_url = spawn_server(app).await;
    let client = VersoClient::new(&config_for(&base_url)).unwrap();

    let err = client.get_features(&Filter::new()).await.unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 418);
            assert_eq!(message, "out of tea");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn contract_mismatch_is_a_schema_error() {
    async fn wrong_shape() -> Json<Value> {
        Json(json!({"data": 5, "meta": {"pagination": {"page": 1, "total": 0}}}))
    }
    let app = Router::new().route("/api/v1/services", get(wrong_shape));
    let base_url = spawn_server(app).await;
    let client = VersoClient::new(&config_for(&base_url)).unwrap();

    let err = client.get_services(&Filter::new()).await.unwrap_err();
    match err {
        ClientError::Schema { endpoint, .. } => {
            assert_eq!(endpoint, "/api/v1/services");
        }
        other => panic!("expected Schema error, got {:?}", other),
    }
}

#[tokio::test]
async fn customization_record_survives_the_full_path() {
    async fn customizations() -> Json<Value> {
        Json(json!({
            "data": [{
                "id": 42,
                "code": "CX-42",
                "name": "Custom invoice layout",
                "createdAt": "2023-11-05T09:00:00Z",
                "updatedAt": "2024-01-20T16:45:00Z",
                "notes": null,
                "state": "in_progress",
                "epic": {"id": 9},
                "category": null,
                "product": "erp",
                "deadline": "2024-06-01",
                "updates": [],
                "old_code": "LEGACY-42",
                "installation": {"code": "acme-prod"}
            }],
            "meta": {"pagination": {"page": 1, "total": 1}}
        }))
    }
    let app = Router::new().route("/api/v1/customizations", get(customizations));
    let base_url = spawn_server(app).await;
    let client = VersoClient::new(&config_for(&base_url)).unwrap();

    let envelope = client.get_customizations(&Filter::new()).await.unwrap();
    assert_eq!(envelope.data.len(), 1);
    let record = &envelope.data[0];
    assert_eq!(record.code.as_deref(), Some("CX-42"));
    assert_eq!(record.created_at, "2023-11-05T09:00:00Z");
    assert_eq!(record.old_code, json!("LEGACY-42"));
    assert_eq!(record.installation.code, "acme-prod");
}

#[tokio::test]
async fn consul_lookup_returns_opaque_json() {
    async fn service(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
        let expected = expected_pairs(&[
            ("id", "web-1"),
            ("installation", "acme-prod"),
            ("service", "web"),
            ("dc", "eu-1"),
        ]);
        if params != expected {
            return (StatusCode::BAD_REQUEST, Json(json!({"status": "error"})));
        }
        (
            StatusCode::OK,
            Json(json!([{"Node": "n1", "ServiceName": "web", "ServicePort": 8080}])),
        )
    }
    let app = Router::new().route("/v1/catalog/service", get(service));
    let base_url = spawn_server(app).await;
    let client = ConsulClient::new(&config_for(&base_url)).unwrap();

    let lookup = GetServiceRequest {
        id: "web-1".to_string(),
        installation: "acme-prod".to_string(),
        service: "web".to_string(),
        dc: "eu-1".to_string(),
    };
    let value = client.get_service(&lookup).await.unwrap();
    assert_eq!(value[0]["ServiceName"], "web");
    assert_eq!(value[0]["ServicePort"], 8080);
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    // Bind to learn a free port, then drop the listener so nothing answers.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = VersoClient::new(&config_for(&format!("http://{}", addr))).unwrap();
    let err = client.get_installations(&Filter::new()).await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}

#[test]
fn config_loads_from_a_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("verso.toml");
    std::fs::write(
        &path,
        r#"
            verso_base_url = "https://verso.example.com"
            consul_base_url = "https://consul.example.com"
            request_timeout_ms = 10000
            default_limit = 25
            search_semantics = "conjunctive"
        "#,
    )
    .unwrap();

    let config = ClientConfig::from_path(&path).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.verso_base_url, "https://verso.example.com");
    assert_eq!(config.default_limit, 25);
    assert_eq!(config.search_semantics, SearchSemantics::Conjunctive);
}
