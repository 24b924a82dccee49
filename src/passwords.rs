//! # Credential Handling
//!
//! Credentials are bcrypt-hashed at rest and verified against the hash only;
//! plaintext is held just long enough to hash it, or to hand a generated
//! initial password back once from a create response.

use rand::Rng;
use rand::distributions::Alphanumeric;
use thiserror::Error;

/// Default bcrypt cost when the config does not override it.
pub const DEFAULT_COST: u32 = 12;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to hash credential: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// Hashes a plaintext credential with the given bcrypt cost.
pub fn hash(plaintext: &str, cost: u32) -> Result<String, PasswordError> {
    Ok(bcrypt::hash(plaintext, cost)?)
}

/// Verifies a plaintext credential against a stored hash. A malformed hash
/// verifies as false rather than erroring, so a corrupted row cannot be used
/// to log in.
pub fn verify(plaintext: &str, hashed: &str) -> bool {
    bcrypt::verify(plaintext, hashed).unwrap_or(false)
}

/// Initial portal password generated at customer intake: the lowercased
/// alphabetic characters of the name followed by "123".
pub fn generate_initial(first_name: &str, last_name: &str) -> String {
    let mut password: String = first_name
        .chars()
        .chain(last_name.chars())
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    password.push_str("123");
    password
}

/// Random password for the bootstrap admin account when none is configured.
pub fn generate_random(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
