//! scrypt password hashing
//!
//! Stored form is `<hex hash>.<hex salt>`. scrypt is salted with the hex
//! text of the salt, not the raw bytes.

use rand::RngCore;

use super::{from_hex, to_hex};
use crate::error::{ApiError, ApiResult};

const SALT_BYTES: usize = 16;
const KEY_BYTES: usize = 64;
/// N = 2^14
const LOG_N: u8 = 14;
const R: u32 = 8;
const P: u32 = 1;

fn derive(password: &[u8], salt: &[u8]) -> ApiResult<[u8; KEY_BYTES]> {
    let params = scrypt::Params::new(LOG_N, R, P, KEY_BYTES)
        .map_err(|e| ApiError::Internal(format!("Invalid scrypt parameters: {}", e)))?;

    let mut key = [0u8; KEY_BYTES];
    scrypt::scrypt(password, salt, &params, &mut key)
        .map_err(|e| ApiError::Internal(format!("scrypt failed: {}", e)))?;
    Ok(key)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn hash_blocking(password: &str) -> ApiResult<String> {
    let mut salt = [0u8; SALT_BYTES];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt_hex = to_hex(&salt);

    let key = derive(password.as_bytes(), salt_hex.as_bytes())?;
    Ok(format!("{}.{}", to_hex(&key), salt_hex))
}

fn verify_blocking(password: &str, stored: &str) -> ApiResult<bool> {
    let Some((hash_hex, salt_hex)) = stored.split_once('.') else {
        return Ok(false);
    };
    let Some(expected) = from_hex(hash_hex) else {
        return Ok(false);
    };

    let key = derive(password.as_bytes(), salt_hex.as_bytes())?;
    Ok(constant_time_eq(&key, &expected))
}

/// Hash on the blocking pool
pub async fn hash_password(password: String) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || hash_blocking(&password))
        .await
        .map_err(|e| ApiError::Internal(format!("Hashing task failed: {}", e)))?
}

/// Check `password` against a stored `<hash>.<salt>`.
/// Malformed stored values never match.
pub async fn verify_password(password: String, stored: String) -> ApiResult<bool> {
    tokio::task::spawn_blocking(move || verify_blocking(&password, &stored))
        .await
        .map_err(|e| ApiError::Internal(format!("Verification task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_then_verify() {
        let stored = hash_password("beats4days".to_string()).await.unwrap();
        let (hash, salt) = stored.split_once('.').unwrap();
        assert_eq!(hash.len(), KEY_BYTES * 2);
        assert_eq!(salt.len(), SALT_BYTES * 2);

        assert!(verify_password("beats4days".to_string(), stored.clone()).await.unwrap());
        assert!(!verify_password("beats4dayz".to_string(), stored).await.unwrap());
    }

    #[tokio::test]
    async fn test_salts_differ() {
        let a = hash_password("same-pass1".to_string()).await.unwrap();
        let b = hash_password("same-pass1".to_string()).await.unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_stored_value_never_matches() {
        assert!(!verify_blocking("x", "no-dot-here").unwrap());
        assert!(!verify_blocking("x", "nothex.abcd").unwrap());
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
    }
}
