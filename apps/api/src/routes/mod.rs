pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::prompt::handlers as prompt;
use crate::sources::handlers as sources;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Article prompts
        .route("/api/v1/prompts/build", post(prompt::handle_build_prompts))
        .route("/api/v1/articles/enhance", post(prompt::handle_enhance))
        .route("/api/v1/articles/score", post(prompt::handle_score))
        // Media sources
        .route(
            "/api/v1/sources",
            get(sources::handle_list_sources).post(sources::handle_add_source),
        )
        .route("/api/v1/sources/:id", delete(sources::handle_remove_source))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::llm_client::MockChatModel;
    use crate::sources::SourceStore;

    fn test_router(dir: &tempfile::TempDir, replies: &[&str]) -> Router {
        build_router(AppState {
            llm: Arc::new(MockChatModel::new(replies.iter().copied())),
            sources: SourceStore::new(dir.path().join("media-sources.json")),
        })
    }

    async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = send(test_router(&dir, &[]), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_build_prompts_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let body = json!({"title": "Title", "body_text": "lorem ".repeat(2800)});
        let (status, bundle) =
            send(test_router(&dir, &[]), "POST", "/api/v1/prompts/build", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bundle["bullets"].as_array().unwrap().len(), 3);
        assert_eq!(bundle["chunks"].as_array().unwrap().len(), 2);
        assert!(bundle["summary"].as_str().unwrap().starts_with("Title. "));
    }

    #[tokio::test]
    async fn test_build_prompts_rejects_missing_body_text() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = send(
            test_router(&dir, &[]),
            "POST",
            "/api/v1/prompts/build",
            Some(json!({"title": "Kun titel"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_score_endpoint_uses_model() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = send(
            test_router(&dir, &[r#"{"score": 72, "reasons": ["Aktuelt"]}"#]),
            "POST",
            "/api/v1/articles/score",
            Some(json!({"body_text": "Kort nyhed om Aarhus Havn i 2025."})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"]["score"].as_f64(), Some(72.0));
        assert_eq!(body["model"], "mock-model");
    }

    #[tokio::test]
    async fn test_sources_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(&dir, &[]);

        let (status, created) = send(
            router.clone(),
            "POST",
            "/api/v1/sources",
            Some(json!({"name": "Information", "url": "https://www.information.dk"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, listed) = send(router.clone(), "GET", "/api/v1/sources", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let uri = format!("/api/v1/sources/{id}");
        let (status, _) = send(router.clone(), "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(router, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_add_source_with_missing_field_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = send(
            test_router(&dir, &[]),
            "POST",
            "/api/v1/sources",
            Some(json!({"name": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"].as_str().unwrap().contains("url"));
    }
}
