use attendly::auth::jwt::{generate_token, verify_token};
use attendly::auth::password::{hash_password, verify_password};
use attendly::model::role::Role;
use attendly::models::Claims;
use jsonwebtoken::{EncodingKey, Header, encode};

const SECRET: &str = "test-secret-not-for-production";

#[test]
fn token_roundtrip_preserves_claims() {
    let token = generate_token(42, "alice@company.com", Role::Employee.as_id(), SECRET, 3600)
        .expect("token generation");
    assert!(!token.is_empty());

    let claims = verify_token(&token, SECRET).expect("token verification");
    assert_eq!(claims.user_id, 42);
    assert_eq!(claims.sub, "alice@company.com");
    assert_eq!(Role::from_id(claims.role), Some(Role::Employee));
    assert!(!claims.jti.is_empty());
}

#[test]
fn wrong_secret_is_rejected() {
    let token = generate_token(1, "bob@company.com", Role::Manager.as_id(), SECRET, 3600)
        .expect("token generation");
    assert!(verify_token(&token, "some-other-secret").is_err());
}

#[test]
fn expired_token_is_rejected() {
    // Well past the default 60s validation leeway
    let claims = Claims {
        user_id: 1,
        sub: "bob@company.com".to_owned(),
        role: Role::Employee.as_id(),
        exp: 1_000,
        jti: "test".to_owned(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("encode");

    assert!(verify_token(&token, SECRET).is_err());
}

#[test]
fn tokens_are_unique_per_issue() {
    let a = generate_token(1, "a@company.com", 1, SECRET, 3600).unwrap();
    let b = generate_token(1, "a@company.com", 1, SECRET, 3600).unwrap();
    // jti is a fresh uuid each time
    assert_ne!(a, b);
}

#[test]
fn password_hash_verifies() {
    let hash = hash_password("employee123").expect("hashing");
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("employee123", &hash).is_ok());
    assert!(verify_password("wrong-password", &hash).is_err());
}

#[test]
fn hashes_are_salted() {
    let a = hash_password("employee123").unwrap();
    let b = hash_password("employee123").unwrap();
    assert_ne!(a, b);
}

#[test]
fn unknown_role_id_does_not_authenticate() {
    let token = generate_token(1, "x@company.com", 99, SECRET, 3600).unwrap();
    let claims = verify_token(&token, SECRET).unwrap();
    assert_eq!(Role::from_id(claims.role), None);
}
