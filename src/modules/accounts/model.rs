use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// The single role an account holds. Every account carries exactly one
/// role grant; portals refuse accounts without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Teacher,
    Student,
    Parent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Parent => "parent",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            "parent" => Ok(Role::Parent),
            other => Err(format!("Invalid role: {}", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role-specific payload for provisioning, tagged by role so each variant
/// carries exactly the fields that role requires.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleDetails {
    Student {
        /// Caller-supplied student code. When absent one is synthesized.
        student_code: Option<String>,
        class_id: Option<Uuid>,
    },
    Teacher {
        /// Staff log in with a real email address.
        email: String,
        employee_code: Option<String>,
        department: Option<String>,
    },
    Parent {
        /// Father's CNIC; the login identifier is derived from its digits.
        father_cnic: String,
        /// Students this parent is linked to, if already provisioned.
        student_account_ids: Option<Vec<Uuid>>,
    },
    Admin {
        email: String,
    },
}

impl RoleDetails {
    pub fn role(&self) -> Role {
        match self {
            RoleDetails::Student { .. } => Role::Student,
            RoleDetails::Teacher { .. } => Role::Teacher,
            RoleDetails::Parent { .. } => Role::Parent,
            RoleDetails::Admin { .. } => Role::Admin,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAccountRequest {
    /// Initial credential; a temporary one is generated when absent.
    pub password: Option<String>,
    #[validate(length(min = 1, message = "full_name must not be empty"))]
    pub full_name: String,
    pub phone: Option<String>,
    #[serde(flatten)]
    pub details: RoleDetails,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccountSummary {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateAccountResponse {
    pub success: bool,
    pub account: AccountSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_code: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StatusAction {
    Ban,
    Unban,
    Delete,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AccountStatusRequest {
    pub action: StatusAction,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccountStatusResponse {
    pub success: bool,
    pub action: StatusAction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Admin, Role::Teacher, Role::Student, Role::Parent] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("headmaster".parse::<Role>().is_err());
    }

    #[test]
    fn test_create_request_role_tag() {
        let req: CreateAccountRequest = serde_json::from_str(
            r#"{
                "full_name": "Ayesha Khan",
                "role": "parent",
                "father_cnic": "12345-6789012-3"
            }"#,
        )
        .unwrap();

        assert_eq!(req.details.role(), Role::Parent);
        match req.details {
            RoleDetails::Parent { father_cnic, .. } => {
                assert_eq!(father_cnic, "12345-6789012-3");
            }
            other => panic!("unexpected details: {:?}", other),
        }
    }

    #[test]
    fn test_create_request_rejects_missing_role_fields() {
        // A teacher without an email must not deserialize.
        let result = serde_json::from_str::<CreateAccountRequest>(
            r#"{"full_name": "Sir Tariq", "role": "teacher"}"#,
        );
        assert!(result.is_err());
    }
}
