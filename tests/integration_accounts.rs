//! Provisioning through the real router and database: the transaction
//! writes the full record set, and duplicate identifiers are rejected
//! without a second account appearing.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::util::ServiceExt;

use common::{app_with_pool, token_for_role};
use maktab::modules::accounts::model::Role;

fn admin_post(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(
            header::AUTHORIZATION,
            format!("Bearer {}", token_for_role(Role::Admin)),
        )
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_provision_student_creates_full_record_set(pool: PgPool) {
    let response = app_with_pool(pool.clone())
        .oneshot(admin_post(
            "/api/accounts",
            &json!({ "full_name": "Hamza Ali", "role": "student" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    let student_code = body["student_code"].as_str().unwrap();
    assert!(student_code.starts_with("stu"));
    let login = body["account"]["email"].as_str().unwrap();
    assert!(login.starts_with(student_code));

    let role: String = sqlx::query_scalar(
        "SELECT r.role FROM role_grants r
         JOIN accounts a ON a.id = r.account_id
         WHERE a.email = $1",
    )
    .bind(login)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(role, "student");

    let students: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE student_code = $1")
        .bind(student_code)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(students, 1);

    let profiles: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles WHERE full_name = $1")
        .bind("Hamza Ali")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(profiles, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reprovisioning_same_cnic_does_not_create_second_account(pool: PgPool) {
    let request = json!({
        "full_name": "Abdul Rauf",
        "role": "parent",
        "father_cnic": "34101-1234567-1"
    });

    let first = app_with_pool(pool.clone())
        .oneshot(admin_post("/api/accounts", &request))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app_with_pool(pool.clone())
        .oneshot(admin_post("/api/accounts", &request))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body = json_body(second).await;
    assert!(body["error"].as_str().unwrap().contains("already exists"));

    let accounts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(accounts, 1);

    let parents: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM parents WHERE father_cnic = $1")
        .bind("34101-1234567-1")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(parents, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_staff_email_rejected_by_unique_constraint(pool: PgPool) {
    // Staff emails skip the allocator pre-check, so the second insert is
    // stopped by the unique constraint inside the transaction.
    let first = app_with_pool(pool.clone())
        .oneshot(admin_post(
            "/api/accounts",
            &json!({
                "full_name": "Sir Tariq",
                "role": "teacher",
                "email": "tariq@maktab.edu.pk"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app_with_pool(pool.clone())
        .oneshot(admin_post(
            "/api/accounts",
            &json!({
                "full_name": "Another Tariq",
                "role": "admin",
                "email": "tariq@maktab.edu.pk"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body = json_body(second).await;
    assert!(body["error"].as_str().unwrap().contains("already exists"));

    let accounts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE email = $1")
        .bind("tariq@maktab.edu.pk")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(accounts, 1);

    // The failed admin provisioning must leave no partial rows behind.
    let grants: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM role_grants")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(grants, 1);
}
