//! User data model.
//!
//! Users are owned by the account subsystem. The job lifecycle only reads a
//! user's identity and track record, and writes the track record when a
//! completion is approved.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyName,
    InvalidEmail,
    EmptyPhoneNumber,
    EmptyPasswordHash,
    RatingOutOfRange,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyPhoneNumber => write!(f, "phone number must not be empty"),
            Self::EmptyPasswordHash => write!(f, "password hash must not be empty"),
            Self::RatingOutOfRange => write!(f, "rating must be a number between 0 and 5"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
///
/// Authorisation checks compare identifiers only; no populated user object is
/// ever compared against a raw id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

macro_rules! trimmed_text {
    ($(#[$meta:meta])* $name:ident, $error:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Trim and validate the input.
            pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(UserValidationError::$error);
                }
                Ok(Self(trimmed.to_owned()))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_ref())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = UserValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

trimmed_text!(
    /// Display name shown alongside jobs and ratings.
    UserName,
    EmptyName
);

trimmed_text!(
    /// Contact phone number; stored as entered, minus surrounding whitespace.
    PhoneNumber,
    EmptyPhoneNumber
);

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Unique, case-insensitive email address used as the login name.
///
/// Stored trimmed and lower-cased so lookups compare normalised values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalise and validate an email address.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = value.as_ref().trim().to_lowercase();
        if !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Opaque password digest produced by a [`crate::domain::ports::PasswordHasher`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded digest.
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(UserValidationError::EmptyPasswordHash);
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

impl From<PasswordHash> for String {
    fn from(value: PasswordHash) -> Self {
        value.0
    }
}

impl TryFrom<String> for PasswordHash {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Lowest rating a creator may award.
pub const RATING_MIN: f64 = 0.0;
/// Highest rating a creator may award.
pub const RATING_MAX: f64 = 5.0;

/// Star rating in the closed range `[0, 5]`.
///
/// Used both for the score a creator awards on approval and for a user's
/// running average.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rating(f64);

impl Rating {
    /// Validate a rating, rejecting non-finite and out-of-range values.
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::Rating;
    ///
    /// assert!(Rating::new(4.5).is_ok());
    /// assert!(Rating::new(5.5).is_err());
    /// assert!(Rating::new(f64::NAN).is_err());
    /// ```
    pub fn new(value: f64) -> Result<Self, UserValidationError> {
        if !value.is_finite() || !(RATING_MIN..=RATING_MAX).contains(&value) {
            return Err(UserValidationError::RatingOutOfRange);
        }
        Ok(Self(value))
    }

    /// Clamp an arbitrary finite value into range.
    pub(crate) fn saturating(value: f64) -> Self {
        if value.is_nan() {
            return Self(RATING_MIN);
        }
        Self(value.clamp(RATING_MIN, RATING_MAX))
    }

    /// Numeric value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<Rating> for f64 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl TryFrom<f64> for Rating {
    type Error = UserValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Input for creating a brand-new user record.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: UserId,
    pub name: UserName,
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
    pub phone_number: PhoneNumber,
}

/// Application user.
///
/// ## Invariants
/// - `rating` stays within `[0, 5]`.
/// - `revision` increases by one on every persisted change; adapters use it
///   for compare-and-swap writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    name: UserName,
    email: EmailAddress,
    password_hash: PasswordHash,
    phone_number: PhoneNumber,
    rating: Rating,
    completed_jobs: u32,
    created_jobs: u32,
    revision: u32,
}

impl User {
    /// Build a fresh user with an empty track record.
    pub fn new(new_user: NewUser) -> Self {
        let NewUser {
            id,
            name,
            email,
            password_hash,
            phone_number,
        } = new_user;
        Self {
            id,
            name,
            email,
            password_hash,
            phone_number,
            rating: Rating::default(),
            completed_jobs: 0,
            created_jobs: 0,
            revision: 1,
        }
    }

    /// Replace the rating and completed-job count.
    #[must_use]
    pub fn with_track_record(mut self, rating: Rating, completed_jobs: u32) -> Self {
        self.rating = rating;
        self.completed_jobs = completed_jobs;
        self
    }

    /// Set the storage revision. Intended for persistence adapters.
    #[must_use]
    pub fn with_revision(mut self, revision: u32) -> Self {
        self.revision = revision;
        self
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn phone_number(&self) -> &PhoneNumber {
        &self.phone_number
    }

    /// Running average of approved completions.
    pub fn rating(&self) -> Rating {
        self.rating
    }

    /// Number of approved completions.
    pub fn completed_jobs(&self) -> u32 {
        self.completed_jobs
    }

    /// Number of jobs posted. Maintained by the account subsystem.
    pub fn created_jobs(&self) -> u32 {
        self.created_jobs
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Public projection without credentials.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            rating: self.rating,
            completed_jobs: self.completed_jobs,
            created_jobs: self.created_jobs,
        }
    }
}

/// User fields safe to return to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: UserName,
    pub email: EmailAddress,
    pub phone_number: PhoneNumber,
    pub rating: Rating,
    pub completed_jobs: u32,
    pub created_jobs: u32,
}

#[cfg(test)]
mod tests;
