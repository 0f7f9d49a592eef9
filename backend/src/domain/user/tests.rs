//! Validation coverage for account value types.

use super::*;
use rstest::rstest;

#[rstest]
#[case("", UserValidationError::EmptyLoginId)]
#[case("   ", UserValidationError::EmptyLoginId)]
#[case("ada lovelace", UserValidationError::LoginIdWhitespace)]
fn login_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(LoginId::new(raw), Err(expected));
}

#[rstest]
fn login_id_is_trimmed() {
    let id = LoginId::new("  rosalind\t").expect("valid login id");
    assert_eq!(id.as_ref(), "rosalind");
}

#[rstest]
fn login_id_rejects_overlong_input() {
    let raw = "a".repeat(ACCOUNT_FIELD_MAX + 1);
    assert_eq!(
        LoginId::new(raw),
        Err(UserValidationError::TooLong {
            field: "login id",
            max: ACCOUNT_FIELD_MAX
        })
    );
}

#[rstest]
fn login_id_accepts_max_length() {
    let raw = "é".repeat(ACCOUNT_FIELD_MAX);
    assert!(LoginId::new(raw).is_ok());
}

#[rstest]
#[case("", "first name")]
#[case("  ", "last name")]
fn person_name_rejects_blank(#[case] raw: &str, #[case] field: &'static str) {
    assert_eq!(
        PersonName::new(raw, field),
        Err(UserValidationError::EmptyName { field })
    );
}

#[rstest]
fn person_name_keeps_inner_spaces() {
    let name = PersonName::new(" Mary Ann ", "first name").expect("valid name");
    assert_eq!(name.as_ref(), "Mary Ann");
}

#[rstest]
#[case("not-a-uuid")]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6")]
fn user_id_rejects_malformed_values(#[case] raw: &str) {
    assert_eq!(UserId::new(raw), Err(UserValidationError::InvalidId));
}

#[rstest]
fn user_id_round_trips_display() {
    let raw = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
    assert_eq!(UserId::new(raw).expect("valid id").to_string(), raw);
}

#[rstest]
fn signup_requires_password() {
    assert_eq!(
        SignUp::try_from_parts("rosalind", "Rosalind", "Franklin", ""),
        Err(SignUpValidationError::EmptyPassword)
    );
}

#[rstest]
fn signup_surfaces_field_errors() {
    assert_eq!(
        SignUp::try_from_parts("rosalind", "", "Franklin", "pw"),
        Err(SignUpValidationError::Field(UserValidationError::EmptyName {
            field: "first name"
        }))
    );
}

#[rstest]
fn signup_keeps_password_whitespace() {
    let signup =
        SignUp::try_from_parts("rosalind", "Rosalind", "Franklin", " pw ").expect("valid signup");
    assert_eq!(signup.password(), " pw ");
    assert_eq!(signup.first_name().as_ref(), "Rosalind");
    assert_eq!(signup.last_name().as_ref(), "Franklin");
}
