/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: HS256 bearer tokens carrying the user id
///
/// # Example
///
/// ```no_run
/// use clubhouse_shared::auth::password::{hash_password, verify_password};
/// use clubhouse_shared::auth::jwt::{create_token, validate_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let token = create_token(&Claims::new(42), "a-secret-key-of-at-least-32-bytes")?;
/// let claims = validate_token(&token, "a-secret-key-of-at-least-32-bytes")?;
/// assert_eq!(claims.user_id()?, 42);
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod password;
