//! Credential hashing built on Argon2id.
//!
//! A secret is hashed into one self-describing text record:
//! ```text
//! $argon2id$v=19$m=<memKiB>,t=<passes>,p=<lanes>$<base64(salt)>$<base64(key)>
//! ```
//! The record embeds everything needed to verify a candidate later, so stored
//! records stay verifiable even after the cost defaults change. Verification
//! re-derives the key with the record's own parameters and compares it to the
//! stored key in fixed time; the secret is never recoverable from the record.
//!
//! Both operations are pure functions over their inputs (hashing additionally
//! draws a fresh salt from the OS random generator) and safe to run
//! concurrently. Derivation is deliberately expensive, blocking CPU/memory
//! work — callers inside an async runtime should offload it to a blocking
//! worker.
//!
//! ```no_run
//! let record = passlock::hash("securepassword123")?;
//! assert!(passlock::verify(&record, "securepassword123")?);
//! assert!(!passlock::verify(&record, "wrongpassword")?);
//! # Ok::<(), passlock::Error>(())
//! ```

mod compare;
mod error;
mod hasher;
mod kdf;
mod observe;
mod record;

pub use crate::error::Error;
pub use crate::hasher::Hasher;
pub use crate::kdf::{KdfParams, MAX_PARALLELISM};
pub use crate::observe::{Observer, Operation, Outcome};
pub use crate::record::{ALGORITHM, HashRecord, KEY_LEN, MIN_KEY_LEN, SALT_LEN, VERSION};

/// Hashes `secret` with the default parameters. See [`Hasher::hash`].
pub fn hash(secret: &str) -> Result<String, Error> {
    Hasher::new().hash(secret)
}

/// Verifies `candidate` against a stored record. See [`Hasher::verify`].
pub fn verify(record: &str, candidate: &str) -> Result<bool, Error> {
    Hasher::new().verify(record, candidate)
}

/// Checks `candidate` against a stored record, failing with
/// [`Error::Mismatch`] when it is wrong. See [`Hasher::check`].
pub fn check(record: &str, candidate: &str) -> Result<(), Error> {
    Hasher::new().check(record, candidate)
}
