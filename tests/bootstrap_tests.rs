mod common;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use common::{insert_user, temp_database_url, test_config, test_db};
use rolsa::app::{build_state, create_app, reset_database};
use tower::ServiceExt;

#[tokio::test]
async fn create_app_builds_schema_and_serves_greeting() {
    let (database_url, path) = temp_database_url("bootstrap-app");
    let cfg = test_config(&database_url);

    let app = create_app(&cfg).await.expect("app");
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    assert_eq!(&body[..], b"Welcome to Rolsa Technologies");

    let state = build_state(&cfg).await.expect("state");
    insert_user(&state.storage, "a@x.com").await;

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn production_bootstrap_keeps_existing_rows() {
    let db = test_db("bootstrap-keep").await;
    insert_user(&db.storage, "a@x.com").await;

    let state = build_state(&test_config(&db.database_url))
        .await
        .expect("state");
    assert!(
        state
            .storage
            .get_user_by_email("a@x.com")
            .await
            .expect("query")
            .is_some()
    );
}

#[tokio::test]
async fn development_reset_wipes_all_rows() {
    let db = test_db("bootstrap-reset").await;
    let user = insert_user(&db.storage, "a@x.com").await;

    let storage = reset_database(&test_config(&db.database_url))
        .await
        .expect("reset");
    assert!(storage.get_user(user.id).await.expect("query").is_none());

    // The fresh schema accepts the same email again.
    insert_user(&storage, "a@x.com").await;
}

#[tokio::test]
async fn drop_all_then_queries_fail_until_recreated() {
    let db = test_db("bootstrap-drop").await;
    db.storage.drop_all().await.expect("drop");
    assert!(matches!(
        db.storage.get_user(1).await,
        Err(rolsa::RolsaError::Storage(_))
    ));
    db.storage.create_all().await.expect("create");
    db.storage.create_all().await.expect("create is idempotent");
    assert!(db.storage.get_user(1).await.expect("query").is_none());
}
