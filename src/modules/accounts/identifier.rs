//! Login identifier allocation.
//!
//! Students and parents authenticate with synthesized, email-shaped
//! identifiers under the configured login domain. The existence checks here
//! are a UX short-circuit only; the unique constraint on `accounts.email`
//! is the authoritative duplicate detector, since two concurrent requests
//! can both pass the pre-check.

use chrono::{Datelike, Utc};
use rand::Rng;
use sqlx::PgPool;
use tracing::instrument;

use crate::utils::errors::AppError;

/// Retry bound when synthesizing a code with a random suffix.
pub const MAX_GENERATION_ATTEMPTS: usize = 10;

/// Uniqueness lookups the allocator needs. Implemented on [`PgPool`] for
/// production and on in-memory doubles in tests.
#[allow(async_fn_in_trait)]
pub trait ProvisioningDirectory {
    async fn login_exists(&self, login: &str) -> Result<bool, AppError>;
    async fn employee_code_exists(&self, code: &str) -> Result<bool, AppError>;
}

impl ProvisioningDirectory for PgPool {
    async fn login_exists(&self, login: &str) -> Result<bool, AppError> {
        let found: Option<(bool,)> =
            sqlx::query_as("SELECT TRUE FROM accounts WHERE email = $1")
                .bind(login)
                .fetch_optional(self)
                .await
                .map_err(|e| {
                    AppError::database(anyhow::anyhow!(
                        "Failed to check login identifier: {}",
                        e
                    ))
                })?;
        Ok(found.is_some())
    }

    async fn employee_code_exists(&self, code: &str) -> Result<bool, AppError> {
        let found: Option<(bool,)> =
            sqlx::query_as("SELECT TRUE FROM teachers WHERE employee_code = $1")
                .bind(code)
                .fetch_optional(self)
                .await
                .map_err(|e| {
                    AppError::database(anyhow::anyhow!("Failed to check employee code: {}", e))
                })?;
        Ok(found.is_some())
    }
}

/// Outcome of student allocation: the student code plus the login derived
/// from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentAllocation {
    pub student_code: String,
    pub login: String,
}

/// Allocates a student login identifier.
///
/// A caller-supplied code is normalized and must be free; collisions fail
/// rather than silently substituting a different value, because the caller
/// asked for that specific code. Without a candidate, `stu{yy}{nnnn}` codes
/// are tried up to [`MAX_GENERATION_ATTEMPTS`] times.
#[instrument(skip(dir))]
pub async fn allocate_student_login<D: ProvisioningDirectory>(
    dir: &D,
    candidate: Option<&str>,
    login_domain: &str,
) -> Result<StudentAllocation, AppError> {
    if let Some(candidate) = candidate {
        let student_code = candidate.trim().to_lowercase();
        if student_code.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "student_code must not be empty"
            )));
        }

        let login = format!("{}@{}", student_code, login_domain);
        if dir.login_exists(&login).await? {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Account with login {} already exists",
                login
            )));
        }

        return Ok(StudentAllocation {
            student_code,
            login,
        });
    }

    for _ in 0..MAX_GENERATION_ATTEMPTS {
        let student_code = synthesize_code("stu");
        let login = format!("{}@{}", student_code, login_domain);
        if !dir.login_exists(&login).await? {
            return Ok(StudentAllocation {
                student_code,
                login,
            });
        }
    }

    Err(AppError::bad_request(anyhow::anyhow!(
        "Exhausted {} attempts generating a unique student code",
        MAX_GENERATION_ATTEMPTS
    )))
}

/// Allocates a parent login identifier from the father's CNIC.
///
/// Separators are stripped and the digits become the local part. No retry
/// on collision: the same family re-entering the same CNIC must see the
/// conflict, not get a regenerated identifier they cannot predict.
#[instrument(skip(dir))]
pub async fn allocate_parent_login<D: ProvisioningDirectory>(
    dir: &D,
    father_cnic: &str,
    login_domain: &str,
) -> Result<String, AppError> {
    let digits: String = father_cnic.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(AppError::bad_request(anyhow::anyhow!(
            "father_cnic must contain digits"
        )));
    }

    let login = format!("{}@{}", digits, login_domain);
    if dir.login_exists(&login).await? {
        return Err(AppError::bad_request(anyhow::anyhow!(
            "Account with login {} already exists",
            login
        )));
    }

    Ok(login)
}

/// Allocates an employee code for a teacher when the caller did not supply
/// one, with the same retry bound as student codes.
#[instrument(skip(dir))]
pub async fn allocate_employee_code<D: ProvisioningDirectory>(
    dir: &D,
    candidate: Option<&str>,
) -> Result<String, AppError> {
    if let Some(candidate) = candidate {
        let code = candidate.trim().to_lowercase();
        if code.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "employee_code must not be empty"
            )));
        }
        if dir.employee_code_exists(&code).await? {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Employee code {} already exists",
                code
            )));
        }
        return Ok(code);
    }

    for _ in 0..MAX_GENERATION_ATTEMPTS {
        let code = synthesize_code("tch");
        if !dir.employee_code_exists(&code).await? {
            return Ok(code);
        }
    }

    Err(AppError::bad_request(anyhow::anyhow!(
        "Exhausted {} attempts generating a unique employee code",
        MAX_GENERATION_ATTEMPTS
    )))
}

fn synthesize_code(prefix: &str) -> String {
    let year = Utc::now().year() % 100;
    let suffix: u32 = rand::thread_rng().gen_range(0..10_000);
    format!("{}{:02}{:04}", prefix, year, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesized_code_shape() {
        let code = synthesize_code("stu");
        assert_eq!(code.len(), 9);
        assert!(code.starts_with("stu"));
        assert!(code[3..].chars().all(|c| c.is_ascii_digit()));
    }
}
