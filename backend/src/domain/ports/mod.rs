//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_service;
mod job_command;
mod job_query;
mod job_repository;
mod password_hasher;
mod user_repository;

#[cfg(test)]
pub use account_service::MockAccountService;
pub use account_service::AccountService;
#[cfg(test)]
pub use job_command::MockJobCommand;
pub use job_command::JobCommand;
#[cfg(test)]
pub use job_query::MockJobQuery;
pub use job_query::JobQuery;
#[cfg(test)]
pub use job_repository::MockJobRepository;
pub use job_repository::{JobRepository, JobRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
