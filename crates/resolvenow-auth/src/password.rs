// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id password hashing in PHC string format.

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use resolvenow_core::ResolveError;
use ring::rand::{SecureRandom, SystemRandom};

/// Well-formed Argon2id hash with default parameters that no password
/// matches. Verified against when a login names an unknown account.
pub const UNMATCHED_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$fRw67RvaGInxxskgyHQHBg$tPg8+uURT0AkGSXm87FDCJS0bTmU7Jq7pXmrg59k7RE";

/// Hash `password` with Argon2id and a fresh 16-byte salt.
pub fn hash_password(password: &str) -> Result<String, ResolveError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; 16];
    rng.fill(&mut salt)
        .map_err(|_| ResolveError::Internal("failed to generate random salt".to_string()))?;
    let salt = SaltString::encode_b64(&salt)
        .map_err(|e| ResolveError::Internal(format!("salt encoding failed: {e}")))?;

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ResolveError::Internal(format!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Check `password` against a stored PHC string. A malformed hash never matches.
pub fn verify_password(password: &str, phc: &str) -> bool {
    match PasswordHash::new(phc) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
