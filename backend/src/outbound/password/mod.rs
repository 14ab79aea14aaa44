//! Salted SHA-256 implementation of the `PasswordHasher` port.
//!
//! Digests are encoded as `sha256$<salt-hex>$<digest-hex>`. The scheme tag
//! lets a slower key-derivation adapter replace this one without breaking
//! stored hashes it does not understand; they surface as `MalformedHash`.

use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

const SCHEME: &str = "sha256";
const SALT_BYTES: usize = 16;

/// Salted SHA-256 password hasher.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256PasswordHasher;

fn digest(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

impl PasswordHasher for Sha256PasswordHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError> {
        let mut salt = [0_u8; SALT_BYTES];
        rand::thread_rng().fill_bytes(&mut salt);
        PasswordHash::new(format!(
            "{SCHEME}${}${}",
            hex::encode(salt),
            hex::encode(digest(&salt, password))
        ))
        .map_err(|err| PasswordHasherError::malformed_hash(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError> {
        let mut parts = hash.as_ref().splitn(3, '$');
        let (Some(scheme), Some(salt_hex), Some(expected)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(PasswordHasherError::malformed_hash(
                "expected three `$`-separated parts",
            ));
        };
        if scheme != SCHEME {
            return Err(PasswordHasherError::malformed_hash(format!(
                "unsupported scheme `{scheme}`"
            )));
        }
        let salt = hex::decode(salt_hex)
            .map_err(|err| PasswordHasherError::malformed_hash(format!("salt: {err}")))?;
        let expected = hex::decode(expected)
            .map_err(|err| PasswordHasherError::malformed_hash(format!("digest: {err}")))?;

        // Slice `ct_eq` is constant time for equal lengths and false otherwise.
        Ok(bool::from(digest(&salt, password)[..].ct_eq(&expected)))
    }
}
