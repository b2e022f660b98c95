use maktab::config::jwt::JwtConfig;
use maktab::modules::accounts::model::Role;
use maktab::utils::jwt::{create_access_token, verify_token};
use uuid::Uuid;

fn get_test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        access_token_expiry: 3600,
    }
}

#[test]
fn test_create_access_token_all_roles() {
    let jwt_config = get_test_jwt_config();
    let account_id = Uuid::new_v4();

    for role in [Role::Admin, Role::Teacher, Role::Student, Role::Parent] {
        let result = create_access_token(account_id, "test@example.com", &role, &jwt_config);
        assert!(result.is_ok());
        assert!(!result.unwrap().is_empty());
    }
}

#[test]
fn test_verify_token_round_trip() {
    let jwt_config = get_test_jwt_config();
    let account_id = Uuid::new_v4();

    let token =
        create_access_token(account_id, "teacher@maktab.edu.pk", &Role::Teacher, &jwt_config)
            .unwrap();
    let claims = verify_token(&token, &jwt_config).unwrap();

    assert_eq!(claims.sub, account_id.to_string());
    assert_eq!(claims.email, "teacher@maktab.edu.pk");
    assert_eq!(claims.role, "teacher");
}

#[test]
fn test_verify_token_invalid() {
    let jwt_config = get_test_jwt_config();

    let result = verify_token("invalid.token.here", &jwt_config);

    assert!(result.is_err());
}

#[test]
fn test_verify_token_wrong_secret() {
    let jwt_config = get_test_jwt_config();
    let account_id = Uuid::new_v4();

    let token =
        create_access_token(account_id, "test@example.com", &Role::Student, &jwt_config).unwrap();

    let other_config = JwtConfig {
        secret: "a_completely_different_secret".to_string(),
        access_token_expiry: 3600,
    };

    assert!(verify_token(&token, &other_config).is_err());
}
