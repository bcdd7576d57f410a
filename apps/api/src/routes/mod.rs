pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::chat::handlers;
use crate::explain::handlers::handle_explain;
use crate::sections::handlers::handle_parse_sections;
use crate::state::AppState;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Section classifier
        .route("/api/v1/resume/sections", post(handle_parse_sections))
        // Advisory chat
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route("/api/v1/sessions/:id/resume", put(handlers::handle_attach_resume))
        .route(
            "/api/v1/sessions/:id/resume/upload",
            post(handlers::handle_upload_resume).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/v1/sessions/:id/ask", post(handlers::handle_ask))
        // Career-fit explanation
        .route("/api/v1/explain", post(handle_explain))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::transport::mock::MockTransport;
    use crate::llm_client::LlmClient;
    use crate::sections::KeywordLineClassifier;

    fn state(transport: &Arc<MockTransport>, key: Option<&str>) -> AppState {
        let config = Config::from_lookup(|_| None).unwrap();
        let llm = LlmClient::new(
            key.map(String::from),
            &config.deepseek_api_base,
            transport.clone(),
        );
        AppState::new(&config, llm, Arc::new(KeywordLineClassifier))
    }

    fn app(transport: &Arc<MockTransport>, key: Option<&str>) -> Router {
        build_router(state(transport, key))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn create_session(app: &Router) -> String {
        let (status, body) = send(app, Method::POST, "/api/v1/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        body["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(&Arc::new(MockTransport::new()), None);
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_parse_sections_endpoint() {
        let app = app(&Arc::new(MockTransport::new()), None);
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/resume/sections",
            Some(json!({ "text": "EDUCATION\nBS Computer Science\nSKILLS\nPython, Go" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sections"]["Education"], json!(["BS Computer Science"]));
        assert_eq!(body["sections"]["Skills & Interests"], json!(["Python, Go"]));
        assert_eq!(body["sections"]["Work Experience"], json!([]));
        assert_eq!(body["warnings"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_ask_without_credential_returns_config_message() {
        let transport = Arc::new(MockTransport::new());
        let app = app(&transport, None);
        let id = create_session(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/ask"),
            Some(json!({ "question": "What jobs suit me?" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["reply"].as_str().unwrap().contains("not configured"));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_resume_then_ask_records_exchange() {
        let transport = Arc::new(MockTransport::new().reply("Consider ML engineering."));
        let app = app(&transport, Some("k"));
        let id = create_session(&app).await;

        let (status, report) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/sessions/{id}/resume"),
            Some(json!({ "text": "Research Experience\nNLP lab" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["sections"]["Research Experience"], json!(["NLP lab"]));

        let (_, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/ask"),
            Some(json!({ "question": "Next step?" })),
        )
        .await;
        assert_eq!(body["reply"], "Consider ML engineering.");

        let (_, snapshot) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(snapshot["has_resume"], true);
        assert_eq!(snapshot["history"].as_array().unwrap().len(), 2);
        assert_eq!(snapshot["history"][0]["speaker"], "User");
        assert!(snapshot["memory_notes"]
            .as_str()
            .unwrap()
            .starts_with("User asked: Next step?"));
    }

    #[tokio::test]
    async fn test_blank_question_is_rejected() {
        let app = app(&Arc::new(MockTransport::new()), Some("k"));
        let id = create_session(&app).await;
        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/ask"),
            Some(json!({ "question": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_and_deleted_sessions_are_not_found() {
        let app = app(&Arc::new(MockTransport::new()), None);
        let (status, _) = send(
            &app,
            Method::GET,
            "/api/v1/sessions/00000000-0000-0000-0000-000000000000",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let id = create_session(&app).await;
        let uri = format!("/api/v1/sessions/{id}");
        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_idle_session_expires_and_active_one_survives() {
        let transport = Arc::new(MockTransport::new().reply("Keep going."));
        let state = state(&transport, Some("k"));
        let app = build_router(state.clone());

        let idle = create_session(&app).await;
        let active = create_session(&app).await;

        // Backdate both, then bring one back to life with a question.
        let two_hours_ago = chrono::Utc::now() - chrono::Duration::hours(2);
        for id in [&idle, &active] {
            let handle = state.sessions.get(id.parse().unwrap()).await.unwrap();
            handle.lock().await.last_active = two_hours_ago;
        }
        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{active}/ask"),
            Some(json!({ "question": "Anything else?" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(state.sessions.sweep_idle(chrono::Utc::now()).await, 1);

        let (status, body) =
            send(&app, Method::GET, &format!("/api/v1/sessions/{idle}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        let (status, _) =
            send(&app, Method::GET, &format!("/api/v1/sessions/{active}"), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_explain_endpoint() {
        let transport = Arc::new(MockTransport::new().reply(" Great fit. "));
        let app = app(&transport, Some("k"));
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/explain",
            Some(json!({ "resume_text": "SKILLS\nRust", "job_title": "Systems Engineer" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["explanation"], "Great fit.");
    }

    #[tokio::test]
    async fn test_text_upload_attaches_resume() {
        let app = app(&Arc::new(MockTransport::new()), None);
        let id = create_session(&app).await;

        let boundary = "resubot-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"cv.txt\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             WORK EXPERIENCE\nEngineer at Acme\r\n\
             --{boundary}--\r\n"
        );
        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/api/v1/sessions/{id}/resume/upload"))
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let report: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(report["sections"]["Work Experience"], json!(["Engineer at Acme"]));

        let (_, snapshot) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(snapshot["has_resume"], true);
    }
}
