use taskdeck_core::{Argon2Hasher, CredentialHasher};

#[test]
fn hash_and_verify_roundtrip() {
    let hasher = Argon2Hasher;

    let digest = hasher.hash("Passw0rd1").unwrap();
    assert!(hasher.verify("Passw0rd1", &digest).unwrap());
    assert!(!hasher.verify("Passw0rd2", &digest).unwrap());
}

#[test]
fn digests_are_salted_and_opaque() {
    let hasher = Argon2Hasher;

    let first = hasher.hash("Passw0rd1").unwrap();
    let second = hasher.hash("Passw0rd1").unwrap();
    assert_ne!(first, second);
    assert!(!first.contains("Passw0rd1"));
}

#[test]
fn verify_rejects_unreadable_digests() {
    let hasher = Argon2Hasher;

    assert!(hasher.verify("Passw0rd1", "not-a-phc-string").is_err());
}
