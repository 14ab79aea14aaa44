//! Port for password digest creation and verification.

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hasher adapters.
    pub enum PasswordHasherError {
        /// A digest could not be produced or parsed.
        MalformedHash { message: String } => "password hash is malformed: {message}",
    }
}

/// One-way password digests.
///
/// Hashing is CPU-bound and synchronous; callers run it inline.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted digest for `password`.
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError>;

    /// Check `password` against a digest produced by [`PasswordHasher::hash`].
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError>;
}
