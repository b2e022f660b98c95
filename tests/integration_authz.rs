//! Authorization gate behavior across the role-protected routes: a caller
//! with no credential gets 401, a caller with a valid credential but a
//! disallowed role gets 403, and the two are distinguishable by status.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::util::ServiceExt;

use common::{test_app, token_for_role};
use maktab::modules::accounts::model::Role;

fn post(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    builder.body(Body::from("{}")).unwrap()
}

#[tokio::test]
async fn test_missing_credential_is_unauthenticated() {
    for uri in [
        "/api/accounts",
        "/api/notifications/class",
        "/api/notifications/direct",
    ] {
        let response = test_app().oneshot(post(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "uri: {}", uri);
    }
}

#[tokio::test]
async fn test_garbage_credential_is_unauthenticated() {
    let response = test_app()
        .oneshot(post("/api/accounts", Some("not.a.token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_students_and_parents_are_forbidden_everywhere() {
    for role in [Role::Student, Role::Parent] {
        let token = token_for_role(role);
        for uri in [
            "/api/accounts",
            "/api/notifications/class",
            "/api/notifications/direct",
        ] {
            let response = test_app()
                .oneshot(post(uri, Some(&token)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::FORBIDDEN, "uri: {}", uri);
        }
    }
}

#[tokio::test]
async fn test_teacher_cannot_provision_accounts() {
    let token = token_for_role(Role::Teacher);

    let response = test_app()
        .oneshot(post("/api/accounts", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_forbidden_response_carries_error_body() {
    let token = token_for_role(Role::Student);

    let response = test_app()
        .oneshot(post("/api/accounts", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_me_echoes_claims_without_touching_the_database() {
    let token = token_for_role(Role::Teacher);

    let request = Request::builder()
        .method("GET")
        .uri("/api/auth/me")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["role"], "teacher");
}
