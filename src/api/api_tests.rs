#[cfg(test)]
mod handler_tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{HeaderMap, Request, StatusCode},
    };
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::api::{app_state::AppState, create_router};
    use crate::config::config::SnapshotStrategy;
    use crate::error::AppError;
    use crate::storage::factory::StorageFactory;
    use crate::storage::goal::GoalRepository;
    use crate::storage::mirror::SnapshotMirror;
    use crate::storage::repository::MockSnapshotRepository;
    use crate::storage::sqlite::SqliteDb;

    struct TestApp {
        _dir: TempDir,
        router: Router,
        mirror: SnapshotMirror,
    }

    fn test_app(strategy: SnapshotStrategy) -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let db = SqliteDb::at_path(dir.path().join("api.db"));
        let mirror = SnapshotMirror::new();
        let snapshots = StorageFactory::snapshot_repository(db.clone(), strategy, mirror.clone());
        let state = AppState::new(snapshots, GoalRepository::new(db), mirror.clone());

        TestApp {
            _dir: dir,
            router: create_router(state),
            mirror,
        }
    }

    async fn send(
        router: &Router,
        method: &str,
        uri: &str,
        body: &str,
    ) -> (StatusCode, HeaderMap, Value) {
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, headers, value)
    }

    #[tokio::test]
    async fn test_get_subjects_initially_all_null() {
        let app = test_app(SnapshotStrategy::Blob);

        let (status, _, body) = send(&app.router, "GET", "/api/subjects", "").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([null, null, null, null, null]));
    }

    #[rstest]
    #[case(SnapshotStrategy::Blob)]
    #[case(SnapshotStrategy::Rows)]
    #[tokio::test]
    async fn test_post_then_get_subjects(#[case] strategy: SnapshotStrategy) {
        let app = test_app(strategy);
        let payload = json!([
            {"subject": " Math ", "current": "B", "target": "A "},
            null,
            {"subject": "Physics"},
            null,
            {}
        ]);

        let (status, _, body) =
            send(&app.router, "POST", "/api/subjects", &payload.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
        assert_eq!(app.mirror.occupied(), 3);

        let (status, _, body) = send(&app.router, "GET", "/api/subjects", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {"subject": "Math", "current": "B", "target": "A"},
                null,
                {"subject": "Physics", "current": "", "target": ""},
                null,
                {"subject": "", "current": "", "target": ""}
            ])
        );
    }

    #[rstest]
    #[case(r#"{"subject": "Math"}"#, "Payload must be a list.")]
    #[case("not json at all", "Payload must be a list.")]
    #[case("", "Payload must be a list.")]
    #[case("[null, null]", "Expected 5 slots, got 2.")]
    #[case(r#"[null, 7, null, null, null]"#, "slot 1 must be an object or null.")]
    #[tokio::test]
    async fn test_post_subjects_rejects_bad_payload(#[case] body: &str, #[case] message: &str) {
        let app = test_app(SnapshotStrategy::Blob);

        let (status, _, response) = send(&app.router, "POST", "/api/subjects", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({"error": message}));
    }

    #[tokio::test]
    async fn test_rejected_post_leaves_snapshot_untouched() {
        let app = test_app(SnapshotStrategy::Blob);
        let valid = json!([{"subject": "Math"}, null, null, null, null]).to_string();
        send(&app.router, "POST", "/api/subjects", &valid).await;

        let (status, _, _) = send(&app.router, "POST", "/api/subjects", "[{}]").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, _, body) = send(&app.router, "GET", "/api/subjects", "").await;
        assert_eq!(body[0]["subject"], "Math");
        assert_eq!(app.mirror.occupied(), 1);
    }

    #[tokio::test]
    async fn test_goal_round_trip() {
        let app = test_app(SnapshotStrategy::Blob);

        let (status, _, body) = send(&app.router, "GET", "/api/goal", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"goal": ""}));

        let (status, _, body) =
            send(&app.router, "POST", "/api/goal", r#"{"goal": "Finish calculus"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));

        let (_, _, body) = send(&app.router, "GET", "/api/goal", "").await;
        assert_eq!(body, json!({"goal": "Finish calculus"}));
    }

    #[rstest]
    #[case(r#"["goal"]"#)]
    #[case(r#"{"target": "x"}"#)]
    #[case("{broken")]
    #[tokio::test]
    async fn test_post_goal_rejects_bad_payload(#[case] body: &str) {
        let app = test_app(SnapshotStrategy::Blob);

        let (status, _, response) = send(&app.router, "POST", "/api/goal", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response,
            json!({"error": "Payload must be a dict with 'goal' key."})
        );
    }

    #[rstest]
    #[case("GET", "/api/subjects", "")]
    #[case("POST", "/api/subjects", "{}")]
    #[case("OPTIONS", "/api/subjects", "")]
    #[case("OPTIONS", "/api/goal", "")]
    #[case("DELETE", "/api/goal", "")]
    #[tokio::test]
    async fn test_every_response_has_cors_headers(
        #[case] method: &str,
        #[case] uri: &str,
        #[case] body: &str,
    ) {
        let app = test_app(SnapshotStrategy::Blob);

        let (_, headers, _) = send(&app.router, method, uri, body).await;

        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-allow-headers"], "Content-Type");
        assert_eq!(headers["access-control-allow-methods"], "GET, POST, OPTIONS");
    }

    #[tokio::test]
    async fn test_preflight_returns_200() {
        let app = test_app(SnapshotStrategy::Blob);

        let (status, _, _) = send(&app.router, "OPTIONS", "/api/goal", "").await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_storage_failure_returns_500() {
        let dir = tempfile::tempdir().unwrap();
        let mut snapshots = MockSnapshotRepository::new();
        snapshots
            .expect_save_snapshot()
            .times(1)
            .returning(|_| Err(AppError::Database("disk I/O error".into())));
        snapshots
            .expect_strategy()
            .return_const(SnapshotStrategy::Blob);

        let state = AppState::new(
            Arc::new(snapshots),
            GoalRepository::new(SqliteDb::at_path(dir.path().join("api.db"))),
            SnapshotMirror::new(),
        );
        let router = create_router(state);
        let payload = json!([null, null, null, null, null]).to_string();

        let (status, headers, body) = send(&router, "POST", "/api/subjects", &payload).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(body, json!({"error": "数据库错误: disk I/O error"}));
    }
}
