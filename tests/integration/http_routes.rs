use crate::support::{memory_server, projects_url, sled_server};
use playground::api::{LoadResponse, MessageResponse, SaveResponse};
use playground::types::ProjectSummary;
use serde_json::{json, Value};

async fn post(url: &str, body: Value) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(url)
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

fn message(body: &Value) -> &str {
    body["message"].as_str().unwrap_or_default()
}

#[tokio::test]
async fn welcome_route() {
    let server = memory_server().await;
    let body: MessageResponse = reqwest::get(server.base_url())
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body.message, "Welcome to the Playground API");
    server.stop().await.unwrap();
}

#[tokio::test]
async fn composite_key_scenario() {
    let server = memory_server().await;
    let base = projects_url(&server);

    let u1_files = json!({"/App.js": {"code": "x"}});
    let config = json!({"dependenciesJson": "{}"});
    let (status, body) = post(
        &format!("{base}/save"),
        json!({"projectId": "p1", "userId": "u1", "files": u1_files, "config": config}),
    )
    .await;
    assert_eq!(status, 200);
    let saved: SaveResponse = serde_json::from_value(body).unwrap();
    assert_eq!(saved.message, "Project saved successfully");
    assert_eq!(saved.project.project_id, "p1");

    let (status, body) = post(
        &format!("{base}/load"),
        json!({"projectId": "p1", "userId": "u1"}),
    )
    .await;
    assert_eq!(status, 200);
    let loaded: LoadResponse = serde_json::from_value(body).unwrap();
    assert_eq!(loaded.files, u1_files);
    assert_eq!(loaded.config, config);

    let u2_files = json!({"/App.js": {"code": "y"}});
    let (status, _) = post(
        &format!("{base}/save"),
        json!({"projectId": "p1", "userId": "u2", "files": u2_files, "config": config}),
    )
    .await;
    assert_eq!(status, 200);

    let (_, body) = post(
        &format!("{base}/load"),
        json!({"projectId": "p1", "userId": "u1"}),
    )
    .await;
    assert_eq!(body["files"], u1_files);
    let (_, body) = post(
        &format!("{base}/load"),
        json!({"projectId": "p1", "userId": "u2"}),
    )
    .await;
    assert_eq!(body["files"], u2_files);

    for user in ["u1", "u2"] {
        let (status, body) = post(&format!("{base}/list"), json!({ "userId": user })).await;
        assert_eq!(status, 200);
        let list: Vec<ProjectSummary> = serde_json::from_value(body).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].project_id, "p1");
    }
    server.stop().await.unwrap();
}

#[tokio::test]
async fn nested_tree_round_trips_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let server = sled_server(dir.path()).await;
    let base = projects_url(&server);

    let files = json!({
        "/App.js": {"code": "import x from './src/lib/x';", "hidden": false},
        "/src/lib/x.js": {"code": "export default 1;", "readOnly": true},
        "/src/lib/deep/y.js": {"code": "export const y = \"quoted\\n\";"},
        "/public/index.html": {"code": "<div id=\"root\"></div>", "hidden": true}
    });
    let config = json!({
        "dependenciesJson": "{\"react\": \"^18.2.0\", \"lodash\": \"latest\"}",
        "options": {"showConsole": true, "showTabs": false}
    });
    let (status, _) = post(
        &format!("{base}/save"),
        json!({"projectId": "nested", "userId": "u1", "files": files, "config": config}),
    )
    .await;
    assert_eq!(status, 200);

    let (status, body) = post(
        &format!("{base}/load"),
        json!({"projectId": "nested", "userId": "u1"}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["files"], files);
    assert_eq!(body["config"], config);
    server.stop().await.unwrap();
}

#[tokio::test]
async fn validation_and_identity_errors() {
    let server = memory_server().await;
    let base = projects_url(&server);

    let (status, body) = post(
        &format!("{base}/save"),
        json!({"projectId": "p1", "files": {"/App.js": {"code": "x"}}}),
    )
    .await;
    assert_eq!(status, 401);
    assert_eq!(message(&body), "Authentication context (userId) required.");

    let (status, body) = post(
        &format!("{base}/save"),
        json!({"projectId": "p1", "userId": "u1", "files": {}}),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(message(&body), "Missing required fields: projectId, userId, files.");

    let (status, body) = post(&format!("{base}/load"), json!({"userId": "u1"})).await;
    assert_eq!(status, 400);
    assert_eq!(message(&body), "Missing required field: projectId.");

    let (status, _) = post(&format!("{base}/list"), json!({})).await;
    assert_eq!(status, 401);

    let (status, body) = post(&format!("{base}/delete"), json!({"userId": "u1"})).await;
    assert_eq!(status, 400);
    assert_eq!(message(&body), "Missing required field: projectId.");
    server.stop().await.unwrap();
}

#[tokio::test]
async fn missing_records_are_not_found() {
    let server = memory_server().await;
    let base = projects_url(&server);

    let (status, body) = post(
        &format!("{base}/load"),
        json!({"projectId": "ghost", "userId": "u1"}),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(message(&body), "Project not found.");

    let (status, body) = post(
        &format!("{base}/delete"),
        json!({"projectId": "ghost", "userId": "u1"}),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(message(&body), "Project not found or not owned by user.");
    server.stop().await.unwrap();
}

#[tokio::test]
async fn delete_is_scoped_to_owner() {
    let server = memory_server().await;
    let base = projects_url(&server);
    post(
        &format!("{base}/save"),
        json!({"projectId": "p1", "userId": "u1", "files": {"/App.js": {"code": "x"}}}),
    )
    .await;

    let (status, _) = post(
        &format!("{base}/delete"),
        json!({"projectId": "p1", "userId": "u2"}),
    )
    .await;
    assert_eq!(status, 404);

    let (status, body) = post(
        &format!("{base}/delete"),
        json!({"projectId": "p1", "userId": "u1"}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(message(&body), "Project deleted successfully.");

    let (status, _) = post(
        &format!("{base}/delete"),
        json!({"projectId": "p1", "userId": "u1"}),
    )
    .await;
    assert_eq!(status, 404);
    server.stop().await.unwrap();
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let server = memory_server().await;
    let response = reqwest::Client::new()
        .post(format!("{}/save", projects_url(&server)))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: MessageResponse = response.json().await.unwrap();
    assert!(body.message.starts_with("Invalid request body"));
    server.stop().await.unwrap();
}
