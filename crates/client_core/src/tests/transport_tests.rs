use super::*;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response as AxumResponse},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use shared::{domain::TaskStatus, protocol::ActionKind};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct ServerState {
    posted: Arc<Mutex<Vec<Value>>>,
}

async fn list_tasks() -> Json<Value> {
    Json(json!([
        {"_id": "b2", "description": "segunda", "start_date": "2025-07-03", "status": "completed",
         "created_at": "2025-07-01T09:00:00.000001"},
        {"_id": "a1", "description": "primera", "start_date": null, "status": "pending",
         "created_at": "2025-07-01T08:00:00"}
    ]))
}

async fn accept_command(
    State(state): State<ServerState>,
    Json(payload): Json<Value>,
) -> Json<Value> {
    state.posted.lock().await.push(payload);
    Json(json!({
        "llm_interpretation": {"action": "create", "task_id": null, "description": "realizar app",
                               "start_date": "2025-07-03", "status": "pending", "message": null},
        "action_result": {"status": "success", "message": "Tarea 'realizar app' creada con ID: c3", "task_id": "c3"}
    }))
}

async fn llm_timeout() -> AxumResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"detail": "LLM timeout"})),
    )
        .into_response()
}

async fn bare_bad_gateway() -> AxumResponse {
    (StatusCode::BAD_GATEWAY, "upstream down").into_response()
}

async fn not_json() -> &'static str {
    "<html>hola</html>"
}

async fn spawn_task_server(router: Router<ServerState>) -> (String, ServerState) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let state = ServerState::default();
    let app = router.with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), state)
}

#[tokio::test]
async fn fetch_tasks_keeps_store_order_and_aliases() {
    let (url, _) = spawn_task_server(Router::new().route("/tasks", get(list_tasks))).await;
    let service = HttpTaskService::new(&url).expect("service");

    let tasks = service.fetch_tasks().await.expect("tasks");

    let ids: Vec<_> = tasks.iter().map(|task| task.id.as_str()).collect();
    assert_eq!(ids, ["b2", "a1"]);
    assert_eq!(tasks[0].status, TaskStatus::Completed);
    assert!(tasks[1].start_date.is_none());
    assert!(tasks[0].created_at.is_some());
}

#[tokio::test]
async fn submit_command_posts_raw_text_and_decodes_response() {
    let (url, state) =
        spawn_task_server(Router::new().route("/command", post(accept_command))).await;
    let service = HttpTaskService::new(&format!("{url}/")).expect("service");

    let response = service
        .submit_command("  crear la tarea \"realizar app\" ")
        .await
        .expect("response");

    assert_eq!(response.interpretation.action, ActionKind::Create);
    assert_eq!(
        response.action_result.message,
        "Tarea 'realizar app' creada con ID: c3"
    );
    let posted = state.posted.lock().await.clone();
    assert_eq!(
        posted,
        vec![json!({"command": "  crear la tarea \"realizar app\" "})]
    );
}

#[tokio::test]
async fn error_detail_is_extracted_from_rejections() {
    let (url, _) = spawn_task_server(Router::new().route("/command", post(llm_timeout))).await;
    let service = HttpTaskService::new(&url).expect("service");

    let err = service.submit_command("hola").await.expect_err("must fail");

    match &err {
        ServiceError::Rejected { status, detail, .. } => {
            assert_eq!(*status, 500);
            assert_eq!(detail.as_deref(), Some("LLM timeout"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.diagnostic(), "LLM timeout");
}

#[tokio::test]
async fn rejection_without_detail_falls_back_to_status_text() {
    let (url, _) = spawn_task_server(Router::new().route("/tasks", get(bare_bad_gateway))).await;
    let service = HttpTaskService::new(&url).expect("service");

    let err = service.fetch_tasks().await.expect_err("must fail");

    let diagnostic = err.diagnostic();
    assert!(
        diagnostic.contains("502"),
        "unexpected diagnostic: {diagnostic}"
    );
    assert!(matches!(err, ServiceError::Rejected { detail: None, .. }));
}

#[tokio::test]
async fn non_json_success_body_is_a_decode_error() {
    let (url, _) = spawn_task_server(Router::new().route("/tasks", get(not_json))).await;
    let service = HttpTaskService::new(&url).expect("service");

    let err = service.fetch_tasks().await.expect_err("must fail");

    assert!(matches!(err, ServiceError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let service = HttpTaskService::new(&format!("http://{addr}")).expect("service");

    let err = service.fetch_tasks().await.expect_err("must fail");

    assert!(matches!(err, ServiceError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn base_url_path_prefix_is_preserved() {
    let (url, _) = spawn_task_server(Router::new().route("/api/tasks", get(list_tasks))).await;
    let service = HttpTaskService::new(&format!("{url}/api/")).expect("service");

    assert_eq!(service.fetch_tasks().await.expect("tasks").len(), 2);
}

#[test]
fn base_url_must_be_absolute_http() {
    for bad in ["localhost:8000", "ftp://example.com", "not a url", "http://h/?q=1"] {
        assert!(
            matches!(
                parse_base_url(bad),
                Err(ServiceError::InvalidBaseUrl { .. })
            ),
            "{bad} should be rejected"
        );
    }
    assert!(parse_base_url(" https://tasks.example.com/api ").is_ok());
}
