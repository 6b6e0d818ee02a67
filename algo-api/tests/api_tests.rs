//! Integration tests for the Algorithm API handlers.
//!
//! Uses `tower::ServiceExt::oneshot` to call handlers without binding a real
//! TCP port — every test gets a fresh state and its own log directory.

use algo_api::{AppState, build_router};
use algo_core::config::LoggingConfig;
use algo_observability::TransactionLogger;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt; // .oneshot()

// ── Helper ────────────────────────────────────────────────────

struct TestApp {
    state: Arc<AppState>,
    config: LoggingConfig,
    _dir: TempDir,
}

impl TestApp {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig::in_dir(dir.path().join("logs"));
        let logger = TransactionLogger::new(&config).unwrap();
        Self {
            state: Arc::new(AppState::new(logger)),
            config,
            _dir: dir,
        }
    }

    async fn call(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = build_router(Arc::clone(&self.state))
            .oneshot(req)
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(json_post(uri, body)).await
    }

    fn transaction_path(&self) -> PathBuf {
        self.config.transaction_path()
    }

    fn transactions(&self) -> Vec<Value> {
        std::fs::read_to_string(self.transaction_path())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }
}

fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn raw_post(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn get_req(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// ── Health ────────────────────────────────────────────────────

#[tokio::test]
async fn health_check_reports_online_and_endpoints() {
    let app = TestApp::new();
    let (status, body) = app.call(get_req("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "online");
    assert_eq!(body["message"], "Algorithm API is running");
    assert_eq!(
        body["endpoints"],
        json!([
            "/binary-search",
            "/quick-sort",
            "/bfs",
            "/api/binary-search",
            "/api/quick-sort",
            "/api/bfs"
        ])
    );
}

#[tokio::test]
async fn health_check_is_unaffected_by_prior_calls() {
    let app = TestApp::new();
    app.post("/quick-sort", json!({"array": [2, 1]})).await;
    app.post("/bfs", json!({})).await;

    let (status, body) = app.call(get_req("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "online");
    assert_eq!(body["endpoints"].as_array().unwrap().len(), 6);
    // Health checks are not transactions.
    assert_eq!(app.transactions().len(), 2);
}

// ── Binary search ─────────────────────────────────────────────

#[tokio::test]
async fn binary_search_sorts_then_finds_target() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/binary-search", json!({"array": [5, 3, 1, 4, 2], "target": 3}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["original_array"], json!([5, 3, 1, 4, 2]));
    assert_eq!(body["sorted_array"], json!([1, 2, 3, 4, 5]));
    assert_eq!(body["target"], json!(3));
    assert_eq!(body["found"], json!(true));
    assert_eq!(body["position"], json!(2));
    assert!(body["execution_time_ms"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn binary_search_absent_target_has_null_position() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/api/binary-search", json!({"array": [10, 20, 30], "target": 25}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["found"], json!(false));
    assert!(body["position"].is_null());
}

#[tokio::test]
async fn binary_search_distinguishes_integers_beyond_f64_precision() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/binary-search",
            json!({"array": [9007199254740993u64], "target": 9007199254740992u64}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["found"], json!(false));
    assert!(body["position"].is_null());

    let (_, body) = app
        .post(
            "/binary-search",
            json!({"array": [9007199254740993u64, 9007199254740992u64], "target": 9007199254740993u64}),
        )
        .await;
    assert_eq!(body["sorted_array"], json!([9007199254740992u64, 9007199254740993u64]));
    assert_eq!(body["position"], json!(1));
}

#[tokio::test]
async fn binary_search_with_duplicates_returns_matching_index() {
    let app = TestApp::new();
    let (_, body) = app
        .post("/binary-search", json!({"array": [2, 2, 1, 2], "target": 2}))
        .await;

    let position = body["position"].as_u64().unwrap() as usize;
    assert_eq!(body["sorted_array"][position], json!(2));
}

#[tokio::test]
async fn binary_search_over_strings() {
    let app = TestApp::new();
    let (_, body) = app
        .post(
            "/binary-search",
            json!({"array": ["pear", "apple", "fig"], "target": "pear"}),
        )
        .await;

    assert_eq!(body["sorted_array"], json!(["apple", "fig", "pear"]));
    assert_eq!(body["position"], json!(2));
}

#[tokio::test]
async fn binary_search_empty_array_is_not_found() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/binary-search", json!({"array": [], "target": 1}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["found"], json!(false));
    assert_eq!(body["sorted_array"], json!([]));
}

#[tokio::test]
async fn binary_search_missing_target_is_400_and_logged() {
    let app = TestApp::new();
    let (status, body) = app.post("/binary-search", json!({"array": [1, 2, 3]})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(
        body["message"],
        "Missing required fields: array and target required"
    );

    let entries = app.transactions();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["algorithm"], "binary_search");
    assert_eq!(entries[0]["request"], json!({"array": [1, 2, 3]}));
    assert_eq!(entries[0]["response"], body);
    assert!(entries[0]["execution_time_ms"].is_null());
}

#[tokio::test]
async fn binary_search_mismatched_target_kind_is_server_error() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/binary-search", json!({"array": [1, 2, 3], "target": "2"}))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().starts_with("Algorithm failed:"));

    let entries = app.transactions();
    assert_eq!(entries.len(), 1);
    assert!(entries[0]["execution_time_ms"].is_null());

    let operational = std::fs::read_to_string(app.config.operational_path()).unwrap();
    assert!(operational.contains(" - ERROR - binary_search failed: "));
}

// ── Quick sort ───────────────────────────────────────────────

#[tokio::test]
async fn quick_sort_sorts_array() {
    let app = TestApp::new();
    let (status, body) = app.post("/quick-sort", json!({"array": [5, 3, 8, 1]})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["original_array"], json!([5, 3, 8, 1]));
    assert_eq!(body["sorted_array"], json!([1, 3, 5, 8]));
    assert!(body["execution_time_ms"].is_number());
}

#[tokio::test]
async fn quick_sort_keeps_duplicates_and_number_forms() {
    let app = TestApp::new();
    let (_, body) = app
        .post("/api/quick-sort", json!({"array": [3, 1.5, 3, -2, 1.5]}))
        .await;

    assert_eq!(body["sorted_array"], json!([-2, 1.5, 1.5, 3, 3]));
}

#[tokio::test]
async fn quick_sort_missing_array_is_400() {
    let app = TestApp::new();
    let (status, body) = app.post("/quick-sort", json!({"items": [1]})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required field: array");
    assert_eq!(app.transactions().len(), 1);
}

#[tokio::test]
async fn quick_sort_non_array_field_is_400() {
    let app = TestApp::new();
    let (status, body) = app.post("/quick-sort", json!({"array": "nope"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request payload:")
    );
}

#[tokio::test]
async fn quick_sort_mixed_types_is_server_error() {
    let app = TestApp::new();
    let (status, _) = app.post("/quick-sort", json!({"array": [1, "a", true]})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(app.transactions().len(), 1);
}

// ── BFS ──────────────────────────────────────────────────────

#[tokio::test]
async fn bfs_returns_level_order() {
    let app = TestApp::new();
    let graph = json!({"A": ["B", "C"], "B": ["D"], "C": [], "D": []});
    let (status, body) = app
        .post("/bfs", json!({"graph": graph, "start_node": "A"}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["graph"], graph);
    assert_eq!(body["start_node"], "A");
    assert_eq!(body["traversal_path"], json!(["A", "B", "C", "D"]));
    assert!(body["execution_time_ms"].is_number());
}

#[tokio::test]
async fn bfs_echo_preserves_graph_key_order() {
    let app = TestApp::new();
    let (_, body) = app
        .call(raw_post(
            "/api/bfs",
            r#"{"graph":{"Z":["A"],"A":[]},"start_node":"Z"}"#,
        ))
        .await;

    let keys: Vec<&String> = body["graph"].as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["Z", "A"]);
    assert_eq!(body["traversal_path"], json!(["Z", "A"]));
}

#[tokio::test]
async fn bfs_unknown_start_node_is_empty_traversal() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/bfs", json!({"graph": {"A": ["B"]}, "start_node": "Q"}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["traversal_path"], json!([]));
}

#[tokio::test]
async fn bfs_numeric_start_node_does_not_match_string_key() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/bfs", json!({"graph": {"A": ["B"]}, "start_node": 1}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["start_node"], json!(1));
    assert_eq!(body["traversal_path"], json!([]));
}

#[tokio::test]
async fn bfs_keeps_numeric_neighbor_ids() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/bfs", json!({"graph": {"1": [2, 3]}, "start_node": "1"}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["traversal_path"], json!(["1", 2, 3]));
    assert_eq!(app.transactions()[0]["response"]["traversal_path"], json!(["1", 2, 3]));
}

#[tokio::test]
async fn bfs_container_node_id_is_400() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/bfs", json!({"graph": {"A": [["B"]]}, "start_node": "A"}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid request payload:"));
}

#[tokio::test]
async fn bfs_missing_start_node_is_400() {
    let app = TestApp::new();
    let (status, body) = app.post("/bfs", json!({"graph": {"A": []}})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Missing required fields: graph and start_node required"
    );
}

// ── Malformed bodies ─────────────────────────────────────────

#[tokio::test]
async fn invalid_json_is_400_and_logged_with_null_request() {
    let app = TestApp::new();
    let (status, body) = app.call(raw_post("/quick-sort", "not-valid-json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Request body must be a JSON object");

    let entries = app.transactions();
    assert_eq!(entries.len(), 1);
    assert!(entries[0]["request"].is_null());
    assert!(entries[0]["execution_time_ms"].is_null());
}

#[tokio::test]
async fn empty_body_is_400() {
    let app = TestApp::new();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/binary-search")
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.call(req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(app.transactions().len(), 1);
}

#[tokio::test]
async fn json_array_body_is_400() {
    let app = TestApp::new();
    let (status, _) = app.post("/bfs", json!([1, 2, 3])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Routing ──────────────────────────────────────────────────

#[tokio::test]
async fn api_alias_matches_bare_path() {
    let app = TestApp::new();
    let payload = json!({"array": [9, 7, 8]});
    let (s1, b1) = app.post("/quick-sort", payload.clone()).await;
    let (s2, b2) = app.post("/api/quick-sort", payload).await;

    assert_eq!(s1, s2);
    assert_eq!(b1["sorted_array"], b2["sorted_array"]);
}

#[tokio::test]
async fn get_on_algorithm_endpoint_is_method_not_allowed() {
    let app = TestApp::new();
    let resp = build_router(Arc::clone(&app.state))
        .oneshot(get_req("/bfs"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ── Transaction log ──────────────────────────────────────────

#[tokio::test]
async fn every_call_produces_exactly_one_entry() {
    let app = TestApp::new();
    app.post("/binary-search", json!({"array": [1, 2], "target": 2})).await;
    app.post("/binary-search", json!({"array": [1, 2]})).await;
    app.post("/quick-sort", json!({"array": [2, 1]})).await;
    app.post("/api/bfs", json!({"graph": {"A": []}, "start_node": "A"})).await;
    app.call(raw_post("/bfs", "{")).await;

    let entries = app.transactions();
    assert_eq!(entries.len(), 5);
    let algorithms: Vec<&str> = entries
        .iter()
        .map(|e| e["algorithm"].as_str().unwrap())
        .collect();
    assert_eq!(
        algorithms,
        vec!["binary_search", "binary_search", "quick_sort", "bfs", "bfs"]
    );
    assert!(entries[0]["execution_time_ms"].is_number());
    assert!(entries[1]["execution_time_ms"].is_null());
}

#[tokio::test]
async fn logged_response_matches_returned_body() {
    let app = TestApp::new();
    let (_, body) = app.post("/quick-sort", json!({"array": [4, 2]})).await;

    let entry = &app.transactions()[0];
    assert_eq!(entry["response"], body);
    assert_eq!(entry["execution_time_ms"], body["execution_time_ms"]);
}
