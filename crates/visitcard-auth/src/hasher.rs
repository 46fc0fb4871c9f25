//! Password hashing

use crate::error::{AuthError, AuthResult};
use argon2::Argon2;
use password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use rand::RngCore;

/// Password hashing algorithm
pub trait PasswordHasher: Send + Sync {
	/// Hash `password` into a self-describing string
	fn hash(&self, password: &str) -> AuthResult<String>;

	/// Whether `password` matches `hash`. A malformed hash is an error.
	fn verify(&self, password: &str, hash: &str) -> AuthResult<bool>;
}

/// Argon2id with default parameters, stored as a PHC string
///
/// # Examples
///
/// ```
/// use visitcard_auth::hasher::{Argon2Hasher, PasswordHasher};
///
/// let hasher = Argon2Hasher::new();
/// let hash = hasher.hash("s3cret").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// assert!(hasher.verify("s3cret", &hash).unwrap());
/// assert!(!hasher.verify("wrong", &hash).unwrap());
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Hasher;

impl Argon2Hasher {
	pub fn new() -> Self {
		Self
	}
}

impl PasswordHasher for Argon2Hasher {
	fn hash(&self, password: &str) -> AuthResult<String> {
		let mut salt_bytes = [0u8; 16];
		rand::thread_rng().fill_bytes(&mut salt_bytes);
		let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| AuthError::Hash(e.to_string()))?;

		Argon2::default()
			.hash_password(password.as_bytes(), &salt)
			.map(|hash| hash.to_string())
			.map_err(|e| AuthError::Hash(e.to_string()))
	}

	fn verify(&self, password: &str, hash: &str) -> AuthResult<bool> {
		let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Hash(e.to_string()))?;
		Ok(Argon2::default()
			.verify_password(password.as_bytes(), &parsed)
			.is_ok())
	}
}

/// Marker stored for users who cannot log in with a password
pub const UNUSABLE_PASSWORD_PREFIX: &str = "!";

pub fn make_password(password: &str) -> AuthResult<String> {
	Argon2Hasher.hash(password)
}

/// Check `password` against a stored hash; unusable or malformed hashes
/// never match
pub fn check_password(password: &str, stored: &str) -> bool {
	if stored.is_empty() || stored.starts_with(UNUSABLE_PASSWORD_PREFIX) {
		return false;
	}
	match Argon2Hasher.verify(password, stored) {
		Ok(matches) => matches,
		Err(e) => {
			tracing::warn!(error = %e, "stored password hash is malformed");
			false
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_hashes_are_salted() {
		let first = make_password("same").unwrap();
		let second = make_password("same").unwrap();

		assert_ne!(first, second);
		assert!(check_password("same", &first));
		assert!(check_password("same", &second));
	}

	#[rstest]
	#[case("")]
	#[case("!unusable")]
	#[case("plaintext")]
	fn test_unusable_hashes_never_match(#[case] stored: &str) {
		assert!(!check_password("plaintext", stored));
	}

	#[rstest]
	fn test_verify_malformed_hash_is_error() {
		assert!(matches!(
			Argon2Hasher.verify("x", "not-a-phc-string"),
			Err(AuthError::Hash(_))
		));
	}
}
