//! Authentication primitives: login credentials and registration requests.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::{EmailAddress, PhoneNumber, UserName, UserValidationError};

/// Shortest password accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased and non-empty. It is not checked for
///   shape so that a malformed address fails as an unknown account.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use marketplace::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ada@Example.com ", "password").unwrap();
/// assert_eq!(creds.email(), "ada@example.com");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalised = email.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalised,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email suitable for user lookups.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validation failures for registration payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    /// A user field failed its own validation.
    User(UserValidationError),
    /// Password shorter than [`MIN_PASSWORD_LEN`] characters.
    PasswordTooShort,
}

impl RegistrationValidationError {
    /// Payload field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::User(UserValidationError::EmptyName) => "name",
            Self::User(UserValidationError::InvalidEmail) => "email",
            Self::User(UserValidationError::EmptyPhoneNumber) => "phoneNumber",
            Self::User(_) => "user",
            Self::PasswordTooShort => "password",
        }
    }
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(err) => err.fmt(f),
            Self::PasswordTooShort => write!(
                f,
                "password must be at least {MIN_PASSWORD_LEN} characters"
            ),
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

impl From<UserValidationError> for RegistrationValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::User(value)
    }
}

/// Validated sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    name: UserName,
    email: EmailAddress,
    password: Zeroizing<String>,
    phone_number: PhoneNumber,
}

impl RegistrationRequest {
    /// Validate raw registration inputs.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
        phone_number: &str,
    ) -> Result<Self, RegistrationValidationError> {
        let name = UserName::new(name)?;
        let email = EmailAddress::new(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(RegistrationValidationError::PasswordTooShort);
        }
        let phone_number = PhoneNumber::new(phone_number)?;

        Ok(Self {
            name,
            email,
            password: Zeroizing::new(password.to_owned()),
            phone_number,
        })
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn phone_number(&self) -> &PhoneNumber {
        &self.phone_number
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyEmail)]
    #[case("   ", "pw", LoginValidationError::EmptyEmail)]
    #[case("ada@example.com", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  ada@example.com  ", " secret ")]
    #[case("ADA@EXAMPLE.COM", "correct horse battery staple")]
    fn valid_credentials_normalise_email(#[case] email: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(email, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.email(), "ada@example.com");
        assert_eq!(creds.password(), password);
    }

    #[rstest]
    #[case("", "ada@example.com", "secret", "555", "name")]
    #[case("Ada", "ada", "secret", "555", "email")]
    #[case("Ada", "ada@example.com", "12345", "555", "password")]
    #[case("Ada", "ada@example.com", "secret", " ", "phoneNumber")]
    fn registration_rejects_invalid_fields(
        #[case] name: &str,
        #[case] email: &str,
        #[case] password: &str,
        #[case] phone: &str,
        #[case] field: &str,
    ) {
        let err = RegistrationRequest::try_from_parts(name, email, password, phone)
            .expect_err("invalid registration");
        assert_eq!(err.field(), field);
    }

    #[rstest]
    fn registration_accepts_six_character_password() {
        let request =
            RegistrationRequest::try_from_parts(" Ada ", "Ada@Example.com", "123456", "555")
                .expect("valid registration");
        assert_eq!(request.name().as_ref(), "Ada");
        assert_eq!(request.email().as_ref(), "ada@example.com");
        assert_eq!(request.password(), "123456");
    }
}
