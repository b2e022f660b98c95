use std::collections::HashSet;
use std::sync::Mutex;

use maktab::modules::accounts::identifier::{
    MAX_GENERATION_ATTEMPTS, ProvisioningDirectory, allocate_employee_code, allocate_parent_login,
    allocate_student_login,
};
use maktab::utils::errors::AppError;

const DOMAIN: &str = "accounts.maktab.local";

/// In-memory stand-in for the accounts/teachers tables.
#[derive(Default)]
struct FakeDirectory {
    logins: Mutex<HashSet<String>>,
    employee_codes: Mutex<HashSet<String>>,
    login_checks: Mutex<usize>,
}

impl FakeDirectory {
    fn with_login(login: &str) -> Self {
        let dir = Self::default();
        dir.logins.lock().unwrap().insert(login.to_string());
        dir
    }

    fn login_checks(&self) -> usize {
        *self.login_checks.lock().unwrap()
    }
}

impl ProvisioningDirectory for FakeDirectory {
    async fn login_exists(&self, login: &str) -> Result<bool, AppError> {
        *self.login_checks.lock().unwrap() += 1;
        Ok(self.logins.lock().unwrap().contains(login))
    }

    async fn employee_code_exists(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.employee_codes.lock().unwrap().contains(code))
    }
}

/// Every identifier is already taken, as if the namespace were exhausted.
#[derive(Default)]
struct SaturatedDirectory {
    login_checks: Mutex<usize>,
    code_checks: Mutex<usize>,
}

impl ProvisioningDirectory for SaturatedDirectory {
    async fn login_exists(&self, _login: &str) -> Result<bool, AppError> {
        *self.login_checks.lock().unwrap() += 1;
        Ok(true)
    }

    async fn employee_code_exists(&self, _code: &str) -> Result<bool, AppError> {
        *self.code_checks.lock().unwrap() += 1;
        Ok(true)
    }
}

#[tokio::test]
async fn test_student_candidate_is_normalized() {
    let dir = FakeDirectory::default();

    let allocation = allocate_student_login(&dir, Some("  STU240001 "), DOMAIN)
        .await
        .unwrap();

    assert_eq!(allocation.student_code, "stu240001");
    assert_eq!(allocation.login, "stu240001@accounts.maktab.local");
}

#[tokio::test]
async fn test_student_candidate_conflict_is_an_error_not_a_substitute() {
    let dir = FakeDirectory::with_login("stu240001@accounts.maktab.local");

    let err = allocate_student_login(&dir, Some("stu240001"), DOMAIN)
        .await
        .unwrap_err();

    // The caller asked for this specific code; silently handing back a
    // different one would be wrong.
    assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    assert!(err.error.to_string().contains("already exists"));
}

#[tokio::test]
async fn test_student_synthesis_returns_unused_login() {
    let dir = FakeDirectory::default();

    let allocation = allocate_student_login(&dir, None, DOMAIN).await.unwrap();

    assert!(allocation.student_code.starts_with("stu"));
    assert!(allocation.login.ends_with("@accounts.maktab.local"));
    assert!(
        !dir.logins
            .lock()
            .unwrap()
            .contains(&allocation.login)
    );
}

#[tokio::test]
async fn test_student_synthesis_stops_at_retry_bound() {
    let dir = SaturatedDirectory::default();

    let err = allocate_student_login(&dir, None, DOMAIN).await.unwrap_err();

    assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(*dir.login_checks.lock().unwrap(), MAX_GENERATION_ATTEMPTS);
    assert!(err.error.to_string().contains("Exhausted"));
}

#[tokio::test]
async fn test_parent_login_strips_cnic_separators() {
    let dir = FakeDirectory::default();

    let login = allocate_parent_login(&dir, "12345-6789012-3", DOMAIN)
        .await
        .unwrap();

    assert_eq!(login, "1234567890123@accounts.maktab.local");
    // One pre-check, no retries.
    assert_eq!(dir.login_checks(), 1);
}

#[tokio::test]
async fn test_parent_reprovisioning_same_cnic_conflicts() {
    let dir = FakeDirectory::with_login("1234567890123@accounts.maktab.local");

    let err = allocate_parent_login(&dir, "12345-6789012-3", DOMAIN)
        .await
        .unwrap_err();

    assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    assert!(err.error.to_string().contains("already exists"));
}

#[tokio::test]
async fn test_parent_cnic_without_digits_is_rejected() {
    let dir = FakeDirectory::default();

    let err = allocate_parent_login(&dir, "---", DOMAIN).await.unwrap_err();

    assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_employee_code_candidate_conflict() {
    let dir = FakeDirectory::default();
    dir.employee_codes
        .lock()
        .unwrap()
        .insert("tch240042".to_string());

    let err = allocate_employee_code(&dir, Some("TCH240042"))
        .await
        .unwrap_err();

    assert!(err.error.to_string().contains("already exists"));
}

#[tokio::test]
async fn test_employee_code_synthesis_stops_at_retry_bound() {
    let dir = SaturatedDirectory::default();

    let err = allocate_employee_code(&dir, None).await.unwrap_err();

    assert_eq!(*dir.code_checks.lock().unwrap(), MAX_GENERATION_ATTEMPTS);
    assert!(err.error.to_string().contains("Exhausted"));
}
