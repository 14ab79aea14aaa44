//! Driving port for account registration, login and profile reads.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing (or importing) the backing
//! infrastructure. HTTP handler tests substitute the generated mock instead
//! of wiring persistence.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, RegistrationRequest, UserId, UserProfile};

/// Domain use-case port for accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create an account; `conflict` when the email is already registered.
    async fn register(&self, request: &RegistrationRequest) -> Result<UserProfile, Error>;

    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;

    /// Return the public profile for `user_id`.
    async fn profile(&self, user_id: &UserId) -> Result<UserProfile, Error>;
}
