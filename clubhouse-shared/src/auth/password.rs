/// Argon2id password hashing
///
/// Stored values are PHC strings (`$argon2id$v=19$m=...`), so each hash
/// carries its own salt and cost parameters. Hashes written with older
/// parameters keep verifying after the constants below change.
///
/// ```
/// use clubhouse_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), clubhouse_shared::auth::password::PasswordError> {
/// let stored = hash_password("correct horse battery")?;
/// assert!(verify_password("correct horse battery", &stored)?);
/// assert!(!verify_password("Correct horse battery", &stored)?);
/// # Ok(())
/// # }
/// ```

use argon2::password_hash::{
    self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};

const MEMORY_COST_KIB: u32 = 19_456;
const ITERATIONS: u32 = 2;
const LANES: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Hashing itself failed (bad parameters, RNG failure)
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// The stored value is not a PHC string this crate can check
    #[error("Stored password hash is unusable: {0}")]
    MalformedHash(String),
}

fn argon2id() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(MEMORY_COST_KIB, ITERATIONS, LANES, None)
        .map_err(|e| PasswordError::Hashing(e.to_string()))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes `password` under a fresh salt
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    argon2id()?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hashing(e.to_string()))
}

/// `Ok(false)` is a wrong password; `Err` means `stored` cannot be checked
pub fn verify_password(password: &str, stored: &str) -> Result<bool, PasswordError> {
    let hash = PasswordHash::new(stored).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

    // Parameters come from the PHC string, not from the constants
    match Argon2::default().verify_password(password.as_bytes(), &hash) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::MalformedHash(e.to_string())),
    }
}
