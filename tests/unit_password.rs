use maktab::utils::password::{generate_temporary_password, hash_password, verify_password};

#[test]
fn test_hash_and_verify_password() {
    let password = "correct horse battery staple";
    let hashed = hash_password(password).unwrap();

    assert_ne!(hashed, password);
    assert!(verify_password(password, &hashed).unwrap());
    assert!(!verify_password("wrong password", &hashed).unwrap());
}

#[test]
fn test_hashes_are_salted() {
    let password = "same input";
    let first = hash_password(password).unwrap();
    let second = hash_password(password).unwrap();

    assert_ne!(first, second);
}

#[test]
fn test_temporary_password_shape() {
    let password = generate_temporary_password();

    assert_eq!(password.len(), 12);
    assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));

    // Vanishingly unlikely to collide.
    assert_ne!(password, generate_temporary_password());
}
