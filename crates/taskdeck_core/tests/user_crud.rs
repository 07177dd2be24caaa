use taskdeck_core::db::open_db_in_memory;
use taskdeck_core::{
    Argon2Hasher, NewUser, RepoError, SqliteUserRepository, UserChanges, UserRepository,
    UserService,
};

#[test]
fn register_and_read_roundtrip_normalizes_email() {
    let conn = open_db_in_memory().unwrap();
    let hasher = Argon2Hasher;
    let repo = SqliteUserRepository::new(&conn, &hasher);

    let created = repo
        .register_user(&new_user("Alice", " Alice@Example.com ", "Passw0rd1"))
        .unwrap();
    assert_eq!(created.name, "Alice");
    assert_eq!(created.email, "alice@example.com");

    let loaded = repo.get_user(created.id).unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn public_projection_never_serializes_credential_material() {
    let conn = open_db_in_memory().unwrap();
    let hasher = Argon2Hasher;
    let repo = SqliteUserRepository::new(&conn, &hasher);

    let user = repo
        .register_user(&new_user("Alice", "alice@example.com", "Passw0rd1"))
        .unwrap();

    let json = serde_json::to_value(&user).unwrap();
    let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys.len(), 3);
    assert!(keys.contains(&"id"));
    assert!(keys.contains(&"name"));
    assert!(keys.contains(&"email"));
}

#[test]
fn register_rejects_weak_password_and_empty_name() {
    let conn = open_db_in_memory().unwrap();
    let hasher = Argon2Hasher;
    let repo = SqliteUserRepository::new(&conn, &hasher);

    let weak = repo
        .register_user(&new_user("Alice", "alice@example.com", "password"))
        .unwrap_err();
    assert_eq!(weak.kind(), "validation_error");

    let unnamed = repo
        .register_user(&new_user("   ", "alice@example.com", "Passw0rd1"))
        .unwrap_err();
    match unnamed {
        RepoError::Validation(message) => assert!(message.contains("name")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn duplicate_email_is_a_conflict_naming_the_field() {
    let conn = open_db_in_memory().unwrap();
    let hasher = Argon2Hasher;
    let repo = SqliteUserRepository::new(&conn, &hasher);

    repo.register_user(&new_user("Alice", "alice@example.com", "Passw0rd1"))
        .unwrap();
    // Same address after normalization.
    let err = repo
        .register_user(&new_user("Also Alice", " ALICE@example.com", "Passw0rd2"))
        .unwrap_err();
    match err {
        RepoError::Conflict { field, .. } => assert_eq!(field, "email"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn login_accepts_correct_credentials_and_hides_which_part_failed() {
    let conn = open_db_in_memory().unwrap();
    let hasher = Argon2Hasher;
    let repo = SqliteUserRepository::new(&conn, &hasher);
    let service = UserService::new(repo);

    let registered = service
        .register(&new_user("Alice", "alice@example.com", "Passw0rd1"))
        .unwrap();

    let logged_in = service.login(" Alice@Example.com ", "Passw0rd1").unwrap();
    assert_eq!(logged_in.id, registered.id);

    let wrong_password = service
        .login("alice@example.com", "Passw0rd2")
        .unwrap_err();
    assert!(matches!(wrong_password, RepoError::InvalidCredential));

    let unknown_email = service.login("nobody@example.com", "Passw0rd1").unwrap_err();
    assert!(matches!(unknown_email, RepoError::InvalidCredential));
}

#[test]
fn update_applies_only_present_fields() {
    let conn = open_db_in_memory().unwrap();
    let hasher = Argon2Hasher;
    let repo = SqliteUserRepository::new(&conn, &hasher);

    let user = repo
        .register_user(&new_user("Alice", "alice@example.com", "Passw0rd1"))
        .unwrap();

    let updated = repo
        .update_user(
            user.id,
            &UserChanges {
                name: Some("  Alice Cooper  ".to_string()),
                ..UserChanges::default()
            },
        )
        .unwrap();
    assert_eq!(updated.name, "Alice Cooper");
    assert_eq!(updated.email, "alice@example.com");
}

#[test]
fn update_with_no_effective_fields_is_a_validation_error() {
    let conn = open_db_in_memory().unwrap();
    let hasher = Argon2Hasher;
    let repo = SqliteUserRepository::new(&conn, &hasher);

    let user = repo
        .register_user(&new_user("Alice", "alice@example.com", "Passw0rd1"))
        .unwrap();

    let empty = repo
        .update_user(user.id, &UserChanges::default())
        .unwrap_err();
    match empty {
        RepoError::Validation(message) => assert!(message.contains("no fields")),
        other => panic!("unexpected error: {other}"),
    }

    // A lone current_password is not a permitted field; it behaves exactly
    // like an empty payload.
    let only_current = repo
        .update_user(
            user.id,
            &UserChanges {
                current_password: Some("Passw0rd1".to_string()),
                ..UserChanges::default()
            },
        )
        .unwrap_err();
    match only_current {
        RepoError::Validation(message) => assert!(message.contains("no fields")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn update_present_but_empty_name_fails_validation() {
    let conn = open_db_in_memory().unwrap();
    let hasher = Argon2Hasher;
    let repo = SqliteUserRepository::new(&conn, &hasher);

    let user = repo
        .register_user(&new_user("Alice", "alice@example.com", "Passw0rd1"))
        .unwrap();

    let err = repo
        .update_user(
            user.id,
            &UserChanges {
                name: Some("   ".to_string()),
                ..UserChanges::default()
            },
        )
        .unwrap_err();
    match err {
        RepoError::Validation(message) => assert!(message.contains("name")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn update_email_to_taken_address_is_a_conflict() {
    let conn = open_db_in_memory().unwrap();
    let hasher = Argon2Hasher;
    let repo = SqliteUserRepository::new(&conn, &hasher);

    repo.register_user(&new_user("Alice", "alice@example.com", "Passw0rd1"))
        .unwrap();
    let bob = repo
        .register_user(&new_user("Bob", "bob@example.com", "Passw0rd1"))
        .unwrap();

    let err = repo
        .update_user(
            bob.id,
            &UserChanges {
                email: Some("alice@example.com".to_string()),
                ..UserChanges::default()
            },
        )
        .unwrap_err();
    match err {
        RepoError::Conflict { field, .. } => assert_eq!(field, "email"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn password_rotation_requires_correct_current_password() {
    let conn = open_db_in_memory().unwrap();
    let hasher = Argon2Hasher;
    let repo = SqliteUserRepository::new(&conn, &hasher);

    let user = repo
        .register_user(&new_user("Alice", "alice@example.com", "Passw0rd1"))
        .unwrap();

    let denied = repo
        .update_user(
            user.id,
            &UserChanges {
                new_password: Some("NewPassw0rd".to_string()),
                current_password: Some("WrongPassw0rd".to_string()),
                ..UserChanges::default()
            },
        )
        .unwrap_err();
    assert!(matches!(denied, RepoError::InvalidCredential));

    // The stored hash is unchanged: the old password still logs in.
    repo.login_user("alice@example.com", "Passw0rd1").unwrap();
}

#[test]
fn password_rotation_without_current_password_fails_validation() {
    let conn = open_db_in_memory().unwrap();
    let hasher = Argon2Hasher;
    let repo = SqliteUserRepository::new(&conn, &hasher);

    let user = repo
        .register_user(&new_user("Alice", "alice@example.com", "Passw0rd1"))
        .unwrap();

    let err = repo
        .update_user(
            user.id,
            &UserChanges {
                new_password: Some("NewPassw0rd1".to_string()),
                ..UserChanges::default()
            },
        )
        .unwrap_err();
    match err {
        RepoError::Validation(message) => assert!(message.contains("current password")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn successful_password_rotation_swaps_the_accepted_secret() {
    let conn = open_db_in_memory().unwrap();
    let hasher = Argon2Hasher;
    let repo = SqliteUserRepository::new(&conn, &hasher);

    let user = repo
        .register_user(&new_user("Alice", "alice@example.com", "Passw0rd1"))
        .unwrap();

    repo.update_user(
        user.id,
        &UserChanges {
            new_password: Some("NewPassw0rd1".to_string()),
            current_password: Some("Passw0rd1".to_string()),
            ..UserChanges::default()
        },
    )
    .unwrap();

    let old_secret = repo
        .login_user("alice@example.com", "Passw0rd1")
        .unwrap_err();
    assert!(matches!(old_secret, RepoError::InvalidCredential));
    repo.login_user("alice@example.com", "NewPassw0rd1").unwrap();
}

#[test]
fn delete_is_gated_on_the_current_password() {
    let conn = open_db_in_memory().unwrap();
    let hasher = Argon2Hasher;
    let repo = SqliteUserRepository::new(&conn, &hasher);
    let service = UserService::new(repo);

    let user = service
        .register(&new_user("Alice", "alice@example.com", "Passw0rd1"))
        .unwrap();

    let denied = service.delete_account(user.id, "WrongPassw0rd").unwrap_err();
    assert!(matches!(denied, RepoError::InvalidCredential));
    service.profile(user.id).unwrap();

    service.delete_account(user.id, "Passw0rd1").unwrap();
    let gone = service.profile(user.id).unwrap_err();
    assert!(matches!(gone, RepoError::NotFound(_)));
}

#[test]
fn delete_twice_reports_not_found_the_second_time() {
    let conn = open_db_in_memory().unwrap();
    let hasher = Argon2Hasher;
    let repo = SqliteUserRepository::new(&conn, &hasher);

    let user = repo
        .register_user(&new_user("Alice", "alice@example.com", "Passw0rd1"))
        .unwrap();

    repo.delete_user(user.id, "Passw0rd1").unwrap();
    let err = repo.delete_user(user.id, "Passw0rd1").unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));

    let update_after = repo
        .update_user(
            user.id,
            &UserChanges {
                name: Some("Ghost".to_string()),
                ..UserChanges::default()
            },
        )
        .unwrap_err();
    assert!(matches!(update_after, RepoError::NotFound(_)));
}

fn new_user(name: &str, email: &str, password: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    }
}
