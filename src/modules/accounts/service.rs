use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::config::identity::IdentityConfig;
use crate::modules::accounts::identifier::{
    allocate_employee_code, allocate_parent_login, allocate_student_login,
};
use crate::modules::accounts::model::{CreateAccountRequest, Role, RoleDetails, StatusAction};
use crate::utils::errors::AppError;
use crate::utils::password::{generate_temporary_password, hash_password};

#[derive(Debug)]
pub struct ProvisionedAccount {
    pub id: Uuid,
    pub login: String,
    pub role: Role,
    pub student_code: Option<String>,
}

pub struct AccountService;

impl AccountService {
    /// Provisions one account: auth record, profile, role grant, and the
    /// role-specific record, all inside a single transaction so a failure
    /// at any step leaves no partially provisioned login behind.
    ///
    /// The allocator's pre-checks run against the pool before the
    /// transaction; the unique constraint on `accounts.email` remains the
    /// authoritative guard against concurrent allocation of the same
    /// identifier.
    #[instrument(skip(db, identity, req), fields(role = %req.details.role()))]
    pub async fn provision(
        db: &PgPool,
        identity: &IdentityConfig,
        req: CreateAccountRequest,
    ) -> Result<ProvisionedAccount, AppError> {
        let role = req.details.role();

        let (login, student_code, employee_code) = match &req.details {
            RoleDetails::Student { student_code, .. } => {
                let allocation =
                    allocate_student_login(db, student_code.as_deref(), &identity.login_domain)
                        .await?;
                (allocation.login, Some(allocation.student_code), None)
            }
            RoleDetails::Teacher {
                email,
                employee_code,
                ..
            } => {
                require_email(email)?;
                let code = allocate_employee_code(db, employee_code.as_deref()).await?;
                (email.trim().to_lowercase(), None, Some(code))
            }
            RoleDetails::Parent { father_cnic, .. } => {
                let login = allocate_parent_login(db, father_cnic, &identity.login_domain).await?;
                (login, None, None)
            }
            RoleDetails::Admin { email } => {
                require_email(email)?;
                (email.trim().to_lowercase(), None, None)
            }
        };

        let password = req
            .password
            .clone()
            .unwrap_or_else(generate_temporary_password);
        let hashed_password = hash_password(&password)?;

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin provisioning transaction")
            .map_err(AppError::database)?;

        let account_id: Uuid = sqlx::query_scalar(
            "INSERT INTO accounts (email, password, confirmed)
             VALUES ($1, $2, TRUE)
             RETURNING id",
        )
        .bind(&login)
        .bind(&hashed_password)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| unique_violation(e, format!("Account with login {} already exists", login)))?;

        // Contact email for notifications: staff log in with a real mailbox,
        // students and parents have none.
        let contact_email = match role {
            Role::Teacher | Role::Admin => Some(login.as_str()),
            Role::Student | Role::Parent => None,
        };

        sqlx::query(
            "INSERT INTO profiles (account_id, full_name, email, phone)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (account_id) DO UPDATE
             SET full_name = EXCLUDED.full_name,
                 email = EXCLUDED.email,
                 phone = EXCLUDED.phone,
                 updated_at = NOW()",
        )
        .bind(account_id)
        .bind(&req.full_name)
        .bind(contact_email)
        .bind(&req.phone)
        .execute(&mut *tx)
        .await
        .context("Failed to upsert profile")
        .map_err(AppError::database)?;

        sqlx::query(
            "INSERT INTO role_grants (account_id, role)
             VALUES ($1, $2)
             ON CONFLICT (account_id) DO UPDATE SET role = EXCLUDED.role",
        )
        .bind(account_id)
        .bind(role.as_str())
        .execute(&mut *tx)
        .await
        .context("Failed to upsert role grant")
        .map_err(AppError::database)?;

        match &req.details {
            RoleDetails::Student { class_id, .. } => {
                let code = student_code
                    .as_deref()
                    .ok_or_else(|| AppError::internal(anyhow::anyhow!("Missing student code")))?;
                sqlx::query(
                    "INSERT INTO students (account_id, student_code, class_id)
                     VALUES ($1, $2, $3)",
                )
                .bind(account_id)
                .bind(code)
                .bind(class_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    unique_violation(e, format!("Student code {} already exists", code))
                })?;
            }
            RoleDetails::Teacher { department, .. } => {
                let code = employee_code
                    .as_deref()
                    .ok_or_else(|| AppError::internal(anyhow::anyhow!("Missing employee code")))?;
                sqlx::query(
                    "INSERT INTO teachers (account_id, employee_code, department)
                     VALUES ($1, $2, $3)",
                )
                .bind(account_id)
                .bind(code)
                .bind(department)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    unique_violation(e, format!("Employee code {} already exists", code))
                })?;
            }
            RoleDetails::Parent {
                father_cnic,
                student_account_ids,
            } => {
                sqlx::query("INSERT INTO parents (account_id, father_cnic) VALUES ($1, $2)")
                    .bind(account_id)
                    .bind(father_cnic)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| {
                        unique_violation(
                            e,
                            format!("Parent with CNIC {} already exists", father_cnic),
                        )
                    })?;

                if let Some(student_ids) = student_account_ids {
                    for student_id in student_ids {
                        sqlx::query(
                            "INSERT INTO student_parents (student_account_id, parent_account_id)
                             VALUES ($1, $2)
                             ON CONFLICT DO NOTHING",
                        )
                        .bind(student_id)
                        .bind(account_id)
                        .execute(&mut *tx)
                        .await
                        .map_err(|e| {
                            if let sqlx::Error::Database(db_err) = &e {
                                if db_err.is_foreign_key_violation() {
                                    return AppError::bad_request(anyhow::anyhow!(
                                        "Unknown student account {}",
                                        student_id
                                    ));
                                }
                            }
                            AppError::database(anyhow::Error::from(e))
                        })?;
                    }
                }
            }
            RoleDetails::Admin { .. } => {}
        }

        tx.commit()
            .await
            .context("Failed to commit provisioning transaction")
            .map_err(AppError::database)?;

        Ok(ProvisionedAccount {
            id: account_id,
            login,
            role,
            student_code,
        })
    }

    /// Ban, unban, or delete an account. Ban is modeled as a far-future
    /// `banned_until`; delete cascades to the role rows.
    #[instrument(skip(db))]
    pub async fn set_status(
        db: &PgPool,
        account_id: Uuid,
        action: StatusAction,
    ) -> Result<(), AppError> {
        let query = match action {
            StatusAction::Ban => {
                "UPDATE accounts
                 SET banned_until = NOW() + INTERVAL '100 years', updated_at = NOW()
                 WHERE id = $1"
            }
            StatusAction::Unban => {
                "UPDATE accounts SET banned_until = NULL, updated_at = NOW() WHERE id = $1"
            }
            StatusAction::Delete => "DELETE FROM accounts WHERE id = $1",
        };

        let result = sqlx::query(query)
            .bind(account_id)
            .execute(db)
            .await
            .context("Failed to update account status")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Account not found")));
        }

        Ok(())
    }
}

fn require_email(email: &str) -> Result<(), AppError> {
    if email.trim().is_empty() {
        return Err(AppError::bad_request(anyhow::anyhow!(
            "email is required for staff accounts"
        )));
    }
    Ok(())
}

fn unique_violation(e: sqlx::Error, message: String) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::bad_request(anyhow::anyhow!(message));
        }
    }
    AppError::database(anyhow::Error::from(e))
}
