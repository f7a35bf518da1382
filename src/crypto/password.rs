use crate::error::{AppError, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder,
};
use std::sync::OnceLock;
use zeroize::Zeroize;

/// The memory cost for Argon2 in MB.
const ARGON2_MEMORY_MB: u32 = 19;
/// The number of iterations for Argon2.
const ARGON2_ITERATIONS: u32 = 3;
/// The parallelism factor for Argon2.
const ARGON2_PARALLELISM: u32 = 4;

fn argon2() -> Result<Argon2<'static>> {
    Ok(Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        ParamsBuilder::new()
            .m_cost(ARGON2_MEMORY_MB * 1024)
            .t_cost(ARGON2_ITERATIONS)
            .p_cost(ARGON2_PARALLELISM)
            .build()
            .map_err(|e| AppError::Encryption(format!("Argon2 params: {}", e)))?,
    ))
}

/// Hashes a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let mut password_bytes = password.as_bytes().to_vec();
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = argon2()?
        .hash_password(&password_bytes, &salt)
        .map_err(|e| AppError::Encryption(format!("Argon2 hash error: {}", e)))?
        .to_string();

    password_bytes.zeroize();
    Ok(password_hash)
}

/// Verifies a password against a stored PHC hash string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let mut password_bytes = password.as_bytes().to_vec();
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Encryption(format!("Hash parse error: {}", e)))?;

    let result = Argon2::default()
        .verify_password(&password_bytes, &parsed_hash)
        .is_ok();

    password_bytes.zeroize();
    Ok(result)
}

static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// Burns the same amount of work as a real verification when no account
/// matches the submitted email, keeping login timing uniform.
pub fn dummy_verify(password: &str) {
    let hash = DUMMY_HASH.get_or_init(|| {
        hash_password("utopia-timing-equalizer").unwrap_or_default()
    });
    if !hash.is_empty() {
        let _ = verify_password(password, hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).unwrap());
        assert!(!verify_password("wrong password", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn stored_hash_is_argon2id_phc() {
        let hash = hash_password("pw-for-format-check").unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn dummy_verify_does_not_panic() {
        dummy_verify("anything");
        dummy_verify("");
    }
}
