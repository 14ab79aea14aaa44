//! Account domain service: registration, login and profile reads.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountService, PasswordHasher, PasswordHasherError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    EmailAddress, Error, LoginCredentials, NewUser, RegistrationRequest, User, UserId,
    UserProfile,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

fn map_user_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => {
            Error::conflict("an account with this email already exists")
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(format!("password hasher failed: {error}"))
}

/// Account service implementing [`AccountService`].
#[derive(Clone)]
pub struct UserAccountService<U, H> {
    user_repo: Arc<U>,
    hasher: Arc<H>,
}

impl<U, H> UserAccountService<U, H> {
    pub fn new(user_repo: Arc<U>, hasher: Arc<H>) -> Self {
        Self { user_repo, hasher }
    }
}

#[async_trait]
impl<U, H> AccountService for UserAccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, request: &RegistrationRequest) -> Result<UserProfile, Error> {
        let existing = self
            .user_repo
            .find_by_email(request.email())
            .await
            .map_err(map_user_repository_error)?;
        if existing.is_some() {
            return Err(Error::conflict("an account with this email already exists"));
        }

        let password_hash = self
            .hasher
            .hash(request.password())
            .map_err(map_hasher_error)?;
        let user = User::new(NewUser {
            id: UserId::random(),
            name: request.name().clone(),
            email: request.email().clone(),
            password_hash,
            phone_number: request.phone_number().clone(),
        });
        self.user_repo
            .insert(&user)
            .await
            .map_err(map_user_repository_error)?;

        info!(user_id = %user.id(), "account registered");
        Ok(user.profile())
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        // Malformed addresses cannot belong to an account.
        let Ok(email) = EmailAddress::new(credentials.email()) else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let Some(user) = self
            .user_repo
            .find_by_email(&email)
            .await
            .map_err(map_user_repository_error)?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let verified = self
            .hasher
            .verify(credentials.password(), user.password_hash())
            .map_err(map_hasher_error)?;
        if !verified {
            warn!(user_id = %user.id(), "password mismatch");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        Ok(user.id().clone())
    }

    async fn profile(&self, user_id: &UserId) -> Result<UserProfile, Error> {
        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(map_user_repository_error)?
            .map(|user| user.profile())
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))
    }
}
