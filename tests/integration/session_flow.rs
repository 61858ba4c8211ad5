use crate::support::{memory_server, projects_url};
use playground::config::SessionConfig;
use playground::defaults::{default_files, DEFAULT_PROJECT_ID};
use playground::error::{ClientError, SessionError};
use playground::session::{
    Action, HttpProjectClient, ProjectClient, SessionController, SessionSettings, StatusKind,
};
use playground::tree::NodeKind;
use std::sync::Arc;
use std::time::Duration;

fn settings(autosave_ms: u64) -> SessionSettings {
    SessionSettings {
        default_project_id: DEFAULT_PROJECT_ID.to_string(),
        autosave_interval: Duration::from_millis(autosave_ms),
        status_ttl: Duration::from_secs(3),
    }
}

#[tokio::test]
async fn http_client_reports_server_messages() {
    let server = memory_server().await;
    let client = HttpProjectClient::new(projects_url(&server), "u1");

    match client.load("missing").await {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Project not found.");
        }
        other => panic!("unexpected: {:?}", other),
    }

    let anonymous = HttpProjectClient::new(projects_url(&server), "");
    match anonymous.list().await {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Authentication context (userId) required.");
        }
        other => panic!("unexpected: {:?}", other),
    }
    server.stop().await.unwrap();
}

#[tokio::test]
async fn session_edits_save_and_reload_over_http() {
    let server = memory_server().await;
    let client = Arc::new(HttpProjectClient::new(projects_url(&server), "u1"));
    let session = SessionController::new(client.clone(), settings(5000));

    // Nothing saved yet: mount falls back to the built-in project.
    assert!(session.mount().await.is_err());
    assert_eq!(session.snapshot().await.tree().entries(), &default_files());

    session
        .dispatch(Action::Create {
            path: "/src/hooks".to_string(),
            kind: NodeKind::Folder,
        })
        .await
        .unwrap();
    session
        .dispatch(Action::Edit {
            path: "/src/hooks/README.md".to_string(),
            code: "# hooks".to_string(),
        })
        .await
        .unwrap();
    session
        .dispatch(Action::UpdateDependencies(r#"{"zustand": "^4.5.0"}"#.to_string()))
        .await
        .unwrap();
    let summary = session.save_project().await.unwrap();
    assert_eq!(summary.project_id, DEFAULT_PROJECT_ID);

    let fresh = SessionController::new(client, settings(5000));
    fresh.mount().await.unwrap();
    let state = fresh.snapshot().await;
    assert_eq!(state.tree().get("/src/hooks/README.md").unwrap().code, "# hooks");
    assert_eq!(state.config().dependencies()["zustand"], "^4.5.0");
    assert_eq!(state.status().unwrap().kind, StatusKind::Success);
    assert!(!state.is_dirty());
    server.stop().await.unwrap();
}

#[tokio::test]
async fn autosave_persists_dirty_session() {
    let server = memory_server().await;
    let client = Arc::new(HttpProjectClient::new(projects_url(&server), "u1"));
    let session = SessionController::new(client.clone(), settings(25));

    session.set_autosave(true).await.unwrap();
    session
        .dispatch(Action::Edit {
            path: "/App.js".to_string(),
            code: "export default () => null;".to_string(),
        })
        .await
        .unwrap();

    let mut saved = false;
    for _ in 0..40 {
        tokio::time::sleep(Duration::from_millis(25)).await;
        if !session.snapshot().await.is_dirty() {
            saved = true;
            break;
        }
    }
    assert!(saved, "autosave never ran");

    let loaded = client.load(DEFAULT_PROJECT_ID).await.unwrap();
    assert_eq!(loaded.files["/App.js"].code, "export default () => null;");

    drop(session);
    server.stop().await.unwrap();
}

#[tokio::test]
async fn load_failure_surfaces_error_status() {
    let server = memory_server().await;
    let client = Arc::new(HttpProjectClient::new(projects_url(&server), "u1"));
    let session = SessionController::new(client, settings(5000));

    let err = session.load_project("nope").await.unwrap_err();
    assert!(matches!(err, SessionError::Client(ClientError::Api { status: 404, .. })));
    let status = session.visible_status().await.unwrap();
    assert_eq!(status.kind, StatusKind::Error);
    assert_eq!(status.text, "Project not found.");
    assert_eq!(session.snapshot().await.project_id(), DEFAULT_PROJECT_ID);
    server.stop().await.unwrap();
}

#[tokio::test]
async fn connect_uses_configured_endpoint_and_user() {
    let server = memory_server().await;
    let config = SessionConfig {
        api_base: projects_url(&server),
        user_id: "configured-user".to_string(),
        ..SessionConfig::default()
    };
    let session = SessionController::connect(&config);
    session.save_project().await.unwrap();

    let client = HttpProjectClient::new(projects_url(&server), "configured-user");
    let projects = client.list().await.unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].project_id, DEFAULT_PROJECT_ID);
    server.stop().await.unwrap();
}
