//! One-way password hashing for seeded users.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::SeedError;

/// Default work factor (Argon2 iterations).
pub const DEFAULT_HASH_COST: u32 = 3;

fn hasher(cost: u32) -> Result<Argon2<'static>, SeedError> {
    let params = Params::new(
        Params::DEFAULT_M_COST,
        cost,
        Params::DEFAULT_P_COST,
        None,
    )
    .map_err(|e| SeedError::PasswordHash(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes `password` with a fresh salt at the given work factor.
pub fn hash_password(password: &str, cost: u32) -> Result<String, SeedError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher(cost)?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| SeedError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Checks `password` against a PHC hash string. The cost is read from the hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, SeedError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| SeedError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
