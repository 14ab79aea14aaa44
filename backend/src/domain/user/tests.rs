//! Regression coverage for user value types.

use super::*;
use rstest::rstest;

fn sample_user() -> User {
    User::new(NewUser {
        id: UserId::random(),
        name: UserName::new("  Ada Lovelace ").expect("valid name"),
        email: EmailAddress::new("Ada@Example.com").expect("valid email"),
        password_hash: PasswordHash::new("salt$digest").expect("valid hash"),
        phone_number: PhoneNumber::new("+44 20 7946 0000").expect("valid phone"),
    })
}

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
#[case("not-a-uuid", UserValidationError::InvalidId)]
fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw).expect_err("invalid id"), expected);
}

#[rstest]
fn user_id_round_trips_through_serde() {
    let id = UserId::random();
    let json = serde_json::to_string(&id).expect("serialises");
    let decoded: UserId = serde_json::from_str(&json).expect("deserialises");
    assert_eq!(decoded, id);
}

#[rstest]
#[case("ada@example.com", "ada@example.com")]
#[case("  ADA@Example.COM ", "ada@example.com")]
fn email_is_normalised(#[case] raw: &str, #[case] expected: &str) {
    let email = EmailAddress::new(raw).expect("valid email");
    assert_eq!(email.as_ref(), expected);
}

#[rstest]
#[case("")]
#[case("ada")]
#[case("ada@")]
#[case("@example.com")]
#[case("a b@example.com")]
#[case("a@b@c")]
fn email_rejects_malformed_addresses(#[case] raw: &str) {
    assert_eq!(
        EmailAddress::new(raw).expect_err("invalid email"),
        UserValidationError::InvalidEmail
    );
}

#[rstest]
fn name_is_trimmed_and_required() {
    assert_eq!(UserName::new("  Ada ").expect("valid").as_ref(), "Ada");
    assert_eq!(
        UserName::new("   ").expect_err("blank"),
        UserValidationError::EmptyName
    );
}

#[rstest]
#[case(0.0)]
#[case(2.5)]
#[case(5.0)]
fn rating_accepts_closed_range(#[case] value: f64) {
    assert_eq!(Rating::new(value).expect("in range").value(), value);
}

#[rstest]
#[case(-0.1)]
#[case(5.01)]
#[case(f64::NAN)]
#[case(f64::INFINITY)]
fn rating_rejects_out_of_range(#[case] value: f64) {
    assert_eq!(
        Rating::new(value).expect_err("out of range"),
        UserValidationError::RatingOutOfRange
    );
}

#[rstest]
fn new_user_starts_with_empty_track_record() {
    let user = sample_user();
    assert_eq!(user.rating().value(), 0.0);
    assert_eq!(user.completed_jobs(), 0);
    assert_eq!(user.created_jobs(), 0);
    assert_eq!(user.revision(), 1);
    assert_eq!(user.name().as_ref(), "Ada Lovelace");
    assert_eq!(user.email().as_ref(), "ada@example.com");
}

#[rstest]
fn profile_omits_password_hash() {
    let user = sample_user();
    let value = serde_json::to_value(user.profile()).expect("serialises");
    assert!(value.get("passwordHash").is_none());
    assert_eq!(
        value.get("email").and_then(serde_json::Value::as_str),
        Some("ada@example.com")
    );
}

#[rstest]
fn password_hash_debug_is_redacted() {
    let hash = PasswordHash::new("secret-digest").expect("valid hash");
    assert_eq!(format!("{hash:?}"), "PasswordHash(..)");
}
