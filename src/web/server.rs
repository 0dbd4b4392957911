//! Web server for the dashboard pages and JSON endpoints

use axum::{
    Form, Json, Router,
    extract::{OriginalUri, Path as AxumPath, Query, State},
    http::{Method, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::pages;
use crate::api::{ChatRequest, DashboardApi, Fetched, TaskFilters};
use crate::models::{NewTask, Priority, RiskType, Severity, TaskStatus, parse_timestamp};
use crate::shell::Route;
use crate::views::{
    ChatSession, DashboardView, Filter, ReportView, RiskBoard, TaskBoard, TimeRange,
};
use crate::{Error, Result};

/// Shared application state: the facade plus one state holder per page.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<DashboardApi>,
    pub dashboard: Arc<Mutex<DashboardView>>,
    pub tasks: Arc<Mutex<TaskBoard>>,
    pub risks: Arc<Mutex<RiskBoard>>,
    pub reports: Arc<Mutex<ReportView>>,
    pub chat: Arc<Mutex<ChatSession>>,
}

impl AppState {
    pub fn new(api: DashboardApi) -> Self {
        Self {
            api: Arc::new(api),
            dashboard: Arc::new(Mutex::new(DashboardView::new())),
            tasks: Arc::new(Mutex::new(TaskBoard::new())),
            risks: Arc::new(Mutex::new(RiskBoard::new())),
            reports: Arc::new(Mutex::new(ReportView::new())),
            chat: Arc::new(Mutex::new(ChatSession::new())),
        }
    }
}

/// Build the router. Split from [`start_server`] so tests can drive it.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/dashboard", get(dashboard_page))
        .route("/tasks", get(tasks_page).post(create_task))
        .route("/tasks/assistant", post(ask_task_assistant))
        .route("/tasks/:id/advance", post(advance_task))
        .route("/tasks/:id/delete", post(delete_task))
        .route("/risks", get(risks_page))
        .route("/risks/report", post(generate_risk_report))
        .route("/risks/:id/resolve", post(resolve_risk))
        .route("/reports", get(reports_page))
        .route("/reports/query", post(query_reports))
        .route("/chat", get(chat_page).post(send_chat))
        .route("/chat/clear", post(clear_chat))
        .route("/chat/export", get(export_chat))
        .route("/api/tasks", get(api_tasks))
        .route("/api/risks", get(api_risks))
        .route("/api/reports/health", get(api_health_report))
        .route("/api/dashboard", get(api_dashboard))
        .route("/api/chat", post(api_chat))
        .fallback(not_found)
        .with_state(state)
}

/// Start the web server and serve until the process is stopped.
pub async fn start_server(api: DashboardApi, port: u16, host: &str) -> Result<()> {
    let app = router(AppState::new(api));

    let host_addr: std::net::IpAddr = host
        .parse()
        .map_err(|e| Error::InvalidInput(format!("Invalid host address '{}': {}", host, e)))?;
    let addr = SocketAddr::from((host_addr, port));
    println!("Starting bearing dashboard at http://{}", addr);
    println!("Press Ctrl+C to stop");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "web server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// HTTP status for an action that failed.
fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::Api(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// A query flag such as `refresh=1` or a checked box (`resolved=on`).
fn flag_set(flag: &Option<String>) -> bool {
    flag.as_deref().is_some_and(|v| !v.is_empty() && v != "0")
}

fn html(status: StatusCode, body: String) -> Response {
    (status, Html(body)).into_response()
}

/// Render a page after a rejected action.
fn rejected(error: &Error, render: impl FnOnce(&str) -> String) -> Response {
    tracing::warn!(error = %error, "action rejected");
    html(status_for(error), render(&error.to_string()))
}

fn json_error(error: &Error) -> Response {
    (status_for(error), Json(json!({ "error": error.to_string() }))).into_response()
}

fn json_fetched<T: serde::Serialize>(result: Result<Fetched<T>>) -> Response {
    match result {
        Ok(fetched) => Json(fetched).into_response(),
        Err(e) => json_error(&e),
    }
}

#[derive(Debug, Default, Deserialize)]
struct RefreshQuery {
    refresh: Option<String>,
}

async fn dashboard_page(
    State(state): State<AppState>,
    Query(query): Query<RefreshQuery>,
) -> Response {
    let mut view = state.dashboard.lock().await;
    if !view.status.is_loaded() || flag_set(&query.refresh) {
        if let Err(e) = view.load(&state.api).await {
            return rejected(&e, |_| pages::dashboard(&view));
        }
    }
    html(StatusCode::OK, pages::dashboard(&view))
}

#[derive(Debug, Default, Deserialize)]
struct TaskQuery {
    refresh: Option<String>,
    search: Option<String>,
    status: Option<String>,
}

async fn tasks_page(State(state): State<AppState>, Query(query): Query<TaskQuery>) -> Response {
    let mut board = state.tasks.lock().await;
    if let Some(search) = query.search {
        board.search = search;
    }
    let mut error = None;
    if let Some(raw) = query.status.as_deref() {
        match Filter::<TaskStatus>::parse(raw) {
            Ok(filter) => board.status_filter = filter,
            Err(e) => error = Some(Error::InvalidInput(e)),
        }
    }
    if !board.status.is_loaded() || flag_set(&query.refresh) {
        if let Err(e) = board.load(&state.api).await {
            error = Some(e);
        }
    }
    match error {
        Some(e) => rejected(&e, |msg| pages::tasks(&board, Some(msg))),
        None => html(StatusCode::OK, pages::tasks(&board, None)),
    }
}

#[derive(Debug, Deserialize)]
struct TaskForm {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    priority: String,
    #[serde(default)]
    assignee: String,
    #[serde(default)]
    due_date: String,
}

impl TaskForm {
    fn into_new_task(self) -> Result<NewTask> {
        let priority = if self.priority.trim().is_empty() {
            Priority::default()
        } else {
            self.priority.parse().map_err(Error::InvalidInput)?
        };
        let due_date = match self.due_date.trim() {
            "" => None,
            raw => Some(
                parse_timestamp(raw)
                    .ok_or_else(|| Error::InvalidInput(format!("invalid due date: {}", raw)))?,
            ),
        };
        Ok(NewTask {
            title: self.title,
            description: self.description,
            priority,
            assignee: self.assignee.trim().to_string(),
            due_date,
        })
    }
}

async fn create_task(State(state): State<AppState>, Form(form): Form<TaskForm>) -> Response {
    let mut board = state.tasks.lock().await;
    let result = match form.into_new_task() {
        Ok(new) => board.create(&state.api, new).await.map(|_| ()),
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => Redirect::to("/tasks").into_response(),
        Err(e) => rejected(&e, |msg| pages::tasks(&board, Some(msg))),
    }
}

async fn advance_task(State(state): State<AppState>, AxumPath(id): AxumPath<String>) -> Response {
    let mut board = state.tasks.lock().await;
    match board.advance(&state.api, &id).await {
        Ok(_) => Redirect::to("/tasks").into_response(),
        Err(e) => rejected(&e, |msg| pages::tasks(&board, Some(msg))),
    }
}

async fn delete_task(State(state): State<AppState>, AxumPath(id): AxumPath<String>) -> Response {
    let mut board = state.tasks.lock().await;
    match board.delete(&state.api, &id).await {
        Ok(()) => Redirect::to("/tasks").into_response(),
        Err(e) => rejected(&e, |msg| pages::tasks(&board, Some(msg))),
    }
}

#[derive(Debug, Deserialize)]
struct MessageForm {
    #[serde(default)]
    message: String,
}

async fn ask_task_assistant(
    State(state): State<AppState>,
    Form(form): Form<MessageForm>,
) -> Response {
    let mut board = state.tasks.lock().await;
    match board.ask_assistant(&state.api, &form.message).await.map(|_| ()) {
        Ok(()) => Redirect::to("/tasks").into_response(),
        Err(e) => rejected(&e, |msg| pages::tasks(&board, Some(msg))),
    }
}

#[derive(Debug, Default, Deserialize)]
struct RiskQuery {
    refresh: Option<String>,
    search: Option<String>,
    severity: Option<String>,
    kind: Option<String>,
    resolved: Option<String>,
}

async fn risks_page(State(state): State<AppState>, Query(query): Query<RiskQuery>) -> Response {
    let mut board = state.risks.lock().await;
    let mut error = None;
    // A submitted filter form always carries `search`.
    if let Some(search) = query.search {
        board.search = search;
        board.show_resolved = flag_set(&query.resolved);
    }
    if let Some(raw) = query.severity.as_deref() {
        match Filter::<Severity>::parse(raw) {
            Ok(filter) => board.severity = filter,
            Err(e) => error = Some(Error::InvalidInput(e)),
        }
    }
    if let Some(raw) = query.kind.as_deref() {
        match Filter::<RiskType>::parse(raw) {
            Ok(filter) => board.kind = filter,
            Err(e) => error = Some(Error::InvalidInput(e)),
        }
    }
    if !board.status.is_loaded() || flag_set(&query.refresh) {
        if let Err(e) = board.load(&state.api).await {
            error = Some(e);
        }
    }
    match error {
        Some(e) => rejected(&e, |msg| pages::risks(&board, Some(msg))),
        None => html(StatusCode::OK, pages::risks(&board, None)),
    }
}

async fn resolve_risk(State(state): State<AppState>, AxumPath(id): AxumPath<String>) -> Response {
    let mut board = state.risks.lock().await;
    match board.resolve(&state.api, &id).await {
        Ok(()) => Redirect::to("/risks").into_response(),
        Err(e) => rejected(&e, |msg| pages::risks(&board, Some(msg))),
    }
}

async fn generate_risk_report(State(state): State<AppState>) -> Response {
    let mut board = state.risks.lock().await;
    match board.generate_report(&state.api).await.map(|_| ()) {
        Ok(()) => Redirect::to("/risks").into_response(),
        Err(e) => rejected(&e, |msg| pages::risks(&board, Some(msg))),
    }
}

#[derive(Debug, Default, Deserialize)]
struct ReportQuery {
    refresh: Option<String>,
    range: Option<String>,
}

async fn reports_page(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Response {
    let mut view = state.reports.lock().await;
    let mut reload = !view.status.is_loaded() || flag_set(&query.refresh);
    if let Some(raw) = query.range.as_deref() {
        match ReportView::parse_range(raw) {
            Ok(range) => {
                reload |= range != view.range;
                view.range = range;
            }
            Err(e) => return rejected(&e, |msg| pages::reports(&view, Some(msg))),
        }
    }
    if reload {
        if let Err(e) = view.load(&state.api).await {
            return rejected(&e, |msg| pages::reports(&view, Some(msg)));
        }
    }
    html(StatusCode::OK, pages::reports(&view, None))
}

#[derive(Debug, Deserialize)]
struct QueryForm {
    #[serde(default)]
    query: String,
}

async fn query_reports(State(state): State<AppState>, Form(form): Form<QueryForm>) -> Response {
    let mut view = state.reports.lock().await;
    match view.ask(&state.api, &form.query).await.map(|_| ()) {
        Ok(()) => Redirect::to("/reports").into_response(),
        Err(e) => rejected(&e, |msg| pages::reports(&view, Some(msg))),
    }
}

async fn chat_page(State(state): State<AppState>) -> Response {
    let session = state.chat.lock().await;
    html(StatusCode::OK, pages::chat(&session, None))
}

async fn send_chat(State(state): State<AppState>, Form(form): Form<MessageForm>) -> Response {
    let mut session = state.chat.lock().await;
    match session.send(&state.api, &form.message).await.map(|_| ()) {
        Ok(()) => Redirect::to("/chat").into_response(),
        Err(e) => rejected(&e, |msg| pages::chat(&session, Some(msg))),
    }
}

async fn clear_chat(State(state): State<AppState>) -> Response {
    state.chat.lock().await.clear();
    Redirect::to("/chat").into_response()
}

async fn export_chat(State(state): State<AppState>) -> Response {
    let transcript = state.chat.lock().await.export(Utc::now());
    let disposition = format!("attachment; filename=\"{}\"", transcript.filename);
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        transcript.content,
    )
        .into_response()
}

#[derive(Debug, Default, Deserialize)]
struct TaskFilterQuery {
    status: Option<String>,
    assignee: Option<String>,
    search: Option<String>,
}

async fn api_tasks(
    State(state): State<AppState>,
    Query(query): Query<TaskFilterQuery>,
) -> Response {
    let status = match query.status.as_deref().map(str::parse::<TaskStatus>) {
        None => None,
        Some(Ok(status)) => Some(status),
        Some(Err(e)) => return json_error(&Error::InvalidInput(e)),
    };
    let filters = TaskFilters {
        status,
        assignee: query.assignee,
        search: query.search,
    };
    json_fetched(state.api.tasks().list(&filters).await)
}

async fn api_risks(State(state): State<AppState>) -> Response {
    json_fetched(state.api.risks().alerts().await)
}

#[derive(Debug, Default, Deserialize)]
struct HealthQuery {
    range: Option<String>,
    query: Option<String>,
}

async fn api_health_report(
    State(state): State<AppState>,
    Query(params): Query<HealthQuery>,
) -> Response {
    let text = match (params.query, params.range.as_deref()) {
        (Some(q), _) if !q.trim().is_empty() => q,
        (_, Some(raw)) => match ReportView::parse_range(raw) {
            Ok(range) => range.query(),
            Err(e) => return json_error(&e),
        },
        _ => TimeRange::default().query(),
    };
    json_fetched(state.api.reports().health_report(&text).await)
}

async fn api_dashboard(State(state): State<AppState>) -> Response {
    json_fetched(state.api.dashboard().overview().await)
}

#[derive(Debug, Deserialize)]
struct ChatBody {
    message: String,
    context: Option<String>,
    conversation_id: Option<String>,
}

async fn api_chat(State(state): State<AppState>, Json(body): Json<ChatBody>) -> Response {
    let mut request = ChatRequest::new(&body.message).conversation(body.conversation_id.as_deref());
    if let Some(context) = body.context.as_deref() {
        request = request.context(context);
    }
    match state.api.chat().send(request).await {
        Ok(outcome) => Json(json!({
            "answered": outcome.is_answered(),
            "error": outcome.error().map(|e| e.kind()),
            "reply": outcome.reply(),
        }))
        .into_response(),
        Err(e) => json_error(&e),
    }
}

/// Page paths with a trailing slash redirect to the page; anything else is 404.
async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> Response {
    match Route::from_path(uri.path()) {
        Route::NotFound => html(StatusCode::NOT_FOUND, pages::not_found(uri.path())),
        route if method == Method::GET => Redirect::permanent(route.href()).into_response(),
        _ => html(StatusCode::NOT_FOUND, pages::not_found(uri.path())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FallbackPolicy;
    use crate::test_utils::{StubReply, StubServer, test_api, unreachable_base_url};
    use serde_json::Value;

    async fn spawn(state: AppState) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn no_redirects() -> reqwest::Client {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_unknown_path_renders_404() {
        let api = test_api(&unreachable_base_url(), FallbackPolicy::Mock);
        let base = spawn(AppState::new(api)).await;
        let resp = reqwest::get(format!("{}/settings", base)).await.unwrap();
        assert_eq!(resp.status(), 404);
        let body = resp.text().await.unwrap();
        assert!(body.contains("Not found"));
    }

    #[test]
    fn test_flag_set() {
        assert!(flag_set(&Some("1".to_string())));
        assert!(flag_set(&Some("on".to_string())));
        assert!(!flag_set(&Some("0".to_string())));
        assert!(!flag_set(&Some(String::new())));
        assert!(!flag_set(&None));
    }

    #[tokio::test]
    async fn test_trailing_slash_redirects_to_page() {
        let api = test_api(&unreachable_base_url(), FallbackPolicy::Mock);
        let base = spawn(AppState::new(api)).await;
        let client = no_redirects();

        let resp = client.get(format!("{}/tasks/", base)).send().await.unwrap();
        assert_eq!(resp.status(), 308);
        assert_eq!(resp.headers()[header::LOCATION], "/tasks");

        let resp = client.post(format!("{}/chat/", base)).send().await.unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_tasks_page_marks_sample_data() {
        let api = test_api(&unreachable_base_url(), FallbackPolicy::Mock);
        let base = spawn(AppState::new(api)).await;
        let body = reqwest::get(format!("{}/tasks", base))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(body.contains("Showing sample data"));
        assert!(body.contains("TASK-001"));
        assert!(body.contains("class=\"current\""));
    }

    #[tokio::test]
    async fn test_dashboard_failure_shows_error_banner_not_data() {
        let api = test_api(&unreachable_base_url(), FallbackPolicy::Off);
        let base = spawn(AppState::new(api)).await;
        let body = reqwest::get(format!("{}/", base))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(body.contains("Could not load data"));
        assert!(body.contains("?refresh=1"));
        assert!(!body.contains("Upcoming deadlines"));
    }

    #[tokio::test]
    async fn test_advance_and_delete_task() {
        let api = test_api(&unreachable_base_url(), FallbackPolicy::Mock);
        let state = AppState::new(api);
        let base = spawn(state.clone()).await;
        let client = no_redirects();

        client.get(format!("{}/tasks", base)).send().await.unwrap();
        let resp = client
            .post(format!("{}/tasks/TASK-001/advance", base))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 303);
        let status = state.tasks.lock().await.get("TASK-001").unwrap().status;
        assert_eq!(status, TaskStatus::Done);

        let resp = client
            .post(format!("{}/tasks/TASK-001/advance", base))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);

        client
            .post(format!("{}/tasks/TASK-002/delete", base))
            .send()
            .await
            .unwrap();
        assert!(state.tasks.lock().await.get("TASK-002").is_none());

        let resp = client
            .post(format!("{}/tasks/NOPE/delete", base))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_task_ids_are_encoded_in_form_actions() {
        let stub = StubServer::start(|_, body| {
            if body["inputs"]["action"] == "list_tasks" {
                StubReply::Outputs(json!({"tasks": [{"id": "A/1?x", "title": "Odd id"}]}))
            } else {
                StubReply::Outputs(json!({"task": {
                    "id": body["inputs"]["task_id"],
                    "status": "IN_PROGRESS"
                }}))
            }
        })
        .await;
        let api = test_api(&stub.base_url, FallbackPolicy::Off);
        let state = AppState::new(api);
        let base = spawn(state.clone()).await;
        let client = no_redirects();

        let body = client
            .get(format!("{}/tasks", base))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(body.contains("action=\"/tasks/A%2F1%3Fx/advance\""));
        assert!(body.contains("action=\"/tasks/A%2F1%3Fx/delete\""));

        let resp = client
            .post(format!("{}/tasks/A%2F1%3Fx/advance", base))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 303);
        assert_eq!(stub.last_request().body["inputs"]["task_id"], "A/1?x");
        let status = state.tasks.lock().await.get("A/1?x").unwrap().status;
        assert_eq!(status, TaskStatus::InProgress);
    }

    #[tokio::test]
    async fn test_create_task_rejects_blank_title() {
        let api = test_api(&unreachable_base_url(), FallbackPolicy::Mock);
        let base = spawn(AppState::new(api)).await;
        let resp = no_redirects()
            .post(format!("{}/tasks", base))
            .form(&[("title", "  "), ("priority", "HIGH")])
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        assert!(resp.text().await.unwrap().contains("must not be empty"));
    }

    #[tokio::test]
    async fn test_chat_send_and_export() {
        let stub =
            StubServer::start(|_, _| StubReply::Outputs(json!({"answer": "All on track."}))).await;
        let api = test_api(&stub.base_url, FallbackPolicy::Mock);
        let base = spawn(AppState::new(api)).await;
        let client = no_redirects();

        client
            .post(format!("{}/chat", base))
            .form(&[("message", "How are we doing?")])
            .send()
            .await
            .unwrap();

        let resp = client.get(format!("{}/chat/export", base)).send().await.unwrap();
        let disposition = resp.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
        assert!(disposition.contains("assistant-transcript_"));
        let text = resp.text().await.unwrap();
        assert_eq!(text.split("\n\n[").count(), 3);
        assert!(text.contains("] User: How are we doing?"));
        assert!(text.contains("] Assistant: All on track."));
    }

    #[tokio::test]
    async fn test_api_tasks_reports_origin() {
        let api = test_api(&unreachable_base_url(), FallbackPolicy::Mock);
        let base = spawn(AppState::new(api)).await;
        let body: Value = reqwest::get(format!("{}/api/tasks", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["origin"]["source"], "fallback");
        assert_eq!(body["origin"]["cause"], "transport");
        assert!(!body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_api_dashboard_policy_off_is_error() {
        let api = test_api(&unreachable_base_url(), FallbackPolicy::Off);
        let base = spawn(AppState::new(api)).await;
        let resp = reqwest::get(format!("{}/api/dashboard", base)).await.unwrap();
        assert_eq!(resp.status(), 502);
        let body: Value = resp.json().await.unwrap();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_api_chat_unauthorized_diagnostic() {
        let stub = StubServer::always_status(401, json!({"message": "bad key"})).await;
        let api = test_api(&stub.base_url, FallbackPolicy::Mock);
        let base = spawn(AppState::new(api)).await;
        let body: Value = reqwest::Client::new()
            .post(format!("{}/api/chat", base))
            .json(&json!({"message": "hello"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["answered"], false);
        assert_eq!(body["error"], "unauthorized");
        assert!(body["reply"]["answer"].as_str().unwrap().contains("401"));
    }
}
