//! Argon2id key derivation and salt generation.
//!
//! Derivation is deliberately CPU- and memory-expensive. There is no internal
//! cancellation point: a call runs to completion or fails.

use argon2::{Algorithm, Argon2, Params, Version};
use getrandom::fill;
use zeroize::Zeroizing;

use crate::Error;
use crate::record::SALT_LEN;

/// Ceiling for the lane count picked up from the host CPU count.
pub const MAX_PARALLELISM: u32 = 8;

/// Cost parameters for a single derivation.
///
/// Immutable once a record is created; changing the defaults affects only
/// newly created records, never re-derivation of stored ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    mem_cost_kib: u32,
    time_cost: u32,
    parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            // default memory cost
            mem_cost_kib: 32 * 1024, // 32 MiB
            // default number of passes
            time_cost: 1,
            // default number of lanes, capped at MAX_PARALLELISM
            parallelism: default_parallelism(),
        }
    }
}

impl KdfParams {
    pub fn new(mem_cost_kib: u32, time_cost: u32, parallelism: u32) -> Result<Self, Error> {
        let params = Self {
            mem_cost_kib,
            time_cost,
            parallelism,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn mem_cost_kib(&self) -> u32 {
        self.mem_cost_kib
    }

    pub fn time_cost(&self) -> u32 {
        self.time_cost
    }

    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.mem_cost_kib < 8 {
            return Err(Error::Kdf("memory cost too low".into()));
        }
        if self.time_cost < 1 {
            return Err(Error::Kdf("time cost must be >= 1".into()));
        }
        if self.parallelism < 1 {
            return Err(Error::Kdf("parallelism must be >= 1".into()));
        }
        if self.mem_cost_kib < 8 * self.parallelism {
            return Err(Error::Kdf(
                "memory cost must be at least 8 * parallelism".into(),
            ));
        }
        Ok(())
    }
}

/// Lane count for new records: the machine's CPU count, capped.
fn default_parallelism() -> u32 {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    u32::try_from(cores).unwrap_or(1).min(MAX_PARALLELISM)
}

/// Fill buffer with cryptographically secure random bytes
fn secure_random(buf: &mut [u8]) -> Result<(), Error> {
    fill(buf).map_err(|_| Error::RandomSource)
}

/// Generate a fresh salt, unique per record and independent of the secret.
pub(crate) fn generate_salt() -> Result<[u8; SALT_LEN], Error> {
    let mut salt = [0u8; SALT_LEN];
    secure_random(&mut salt)?;
    Ok(salt)
}

/// Derive `key_len` bytes from `secret` and `salt` with Argon2id.
pub(crate) fn derive_key(
    secret: &str,
    salt: &[u8],
    kdf: KdfParams,
    key_len: usize,
) -> Result<Zeroizing<Vec<u8>>, Error> {
    kdf.validate()?;

    let params = Params::new(
        kdf.mem_cost_kib,
        kdf.time_cost,
        kdf.parallelism,
        Some(key_len),
    )
    .map_err(|e| Error::Kdf(e.to_string()))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new(vec![0u8; key_len]);
    argon2
        .hash_password_into(secret.as_bytes(), salt, &mut key)
        .map_err(|e| Error::Kdf(e.to_string()))?;

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kdf_is_deterministic() {
        let salt = [42u8; 16];
        let kdf = KdfParams::new(1024, 1, 1).unwrap();

        let k1 = derive_key("password", &salt, kdf, 32).unwrap();
        let k2 = derive_key("password", &salt, kdf, 32).unwrap();

        assert_eq!(k1, k2);
    }

    #[test]
    fn kdf_params_affect_output() {
        let salt = [7u8; 16];

        let kdf1 = KdfParams::new(1024, 1, 1).unwrap();
        let kdf2 = KdfParams::new(2048, 1, 1).unwrap();

        let k1 = derive_key("pw", &salt, kdf1, 32).unwrap();
        let k2 = derive_key("pw", &salt, kdf2, 32).unwrap();

        assert_ne!(k1, k2);
    }

    #[test]
    fn key_length_follows_request() {
        let salt = [3u8; 16];
        let kdf = KdfParams::new(1024, 1, 1).unwrap();

        let key = derive_key("pw", &salt, kdf, 24).unwrap();
        assert_eq!(key.len(), 24);
    }

    #[test]
    fn kdf_invalid_params_fail_gracefully() {
        assert!(KdfParams::new(0, 0, 0).is_err());
        assert!(KdfParams::new(16, 1, 4).is_err()); // mem < 8 * parallelism
    }

    #[test]
    fn default_parallelism_is_bounded() {
        let kdf = KdfParams::default();
        assert!(kdf.parallelism() >= 1);
        assert!(kdf.parallelism() <= MAX_PARALLELISM);
    }

    #[test]
    fn generated_salts_differ() {
        let s1 = generate_salt().unwrap();
        let s2 = generate_salt().unwrap();
        assert_ne!(s1, s2);
    }
}
