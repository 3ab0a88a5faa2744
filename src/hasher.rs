//! Hashing and verification over the stored record format.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::Error;
use crate::compare::fixed_time_eq;
use crate::kdf::{self, KdfParams};
use crate::observe::{Observer, Operation, Outcome};
use crate::record::{HashRecord, KEY_LEN};

/// Hashes secrets into self-describing records and verifies candidates
/// against stored records.
///
/// Stateless apart from its configuration: methods take `&self`, hold no
/// locks, and are safe to call from any number of threads. Derivation is
/// blocking CPU/memory work; inside a cooperative runtime, offload calls to a
/// blocking worker (e.g. `spawn_blocking`) instead of running them inline.
#[derive(Clone, Default)]
pub struct Hasher {
    params: KdfParams,
    observer: Option<Arc<dyn Observer>>,
}

impl Hasher {
    /// Creates a hasher with the default cost parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a hasher with explicit cost parameters for new records.
    /// Stored records are always verified with their own embedded parameters.
    pub fn with_params(params: KdfParams) -> Self {
        Self {
            params,
            observer: None,
        }
    }

    /// Registers an observer for call outcomes.
    pub fn observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Returns the parameters used for new records.
    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    /// Hashes `secret` into a new record with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySecret`] for empty input (before any entropy is
    /// consumed), [`Error::RandomSource`] if the OS random generator fails,
    /// or [`Error::Kdf`] if derivation rejects its inputs.
    pub fn hash(&self, secret: &str) -> Result<String, Error> {
        let start = Instant::now();
        let result = self.hash_record(secret);

        let outcome = match &result {
            Ok(_) => Outcome::Succeeded,
            Err(_) => Outcome::Errored,
        };
        self.observe(Operation::Hash, outcome, start.elapsed());

        result
    }

    fn hash_record(&self, secret: &str) -> Result<String, Error> {
        if secret.is_empty() {
            return Err(Error::EmptySecret);
        }

        let salt = kdf::generate_salt()?;
        let key = kdf::derive_key(secret, &salt, self.params, KEY_LEN)?;

        Ok(HashRecord::new(self.params, salt.to_vec(), key.to_vec()).encode())
    }

    /// Checks `candidate` against a stored record, failing with
    /// [`Error::Mismatch`] when the candidate is wrong.
    ///
    /// The key is re-derived with the parameters embedded in the record and a
    /// key length equal to the stored key's decoded length, then compared in
    /// fixed time.
    ///
    /// # Errors
    ///
    /// [`Error::Mismatch`] for a wrong candidate; the structural variants
    /// ([`Error::MalformedRecord`], [`Error::UnsupportedAlgorithm`],
    /// [`Error::UnsupportedVersion`], [`Error::ParameterParse`],
    /// [`Error::Encoding`]) for an unreadable record.
    pub fn check(&self, record: &str, candidate: &str) -> Result<(), Error> {
        let start = Instant::now();
        let result = self.check_record(record, candidate);

        let outcome = match &result {
            Ok(()) => Outcome::Succeeded,
            Err(Error::Mismatch) => Outcome::Rejected,
            Err(_) => Outcome::Errored,
        };
        self.observe(Operation::Verify, outcome, start.elapsed());

        result
    }

    fn check_record(&self, record: &str, candidate: &str) -> Result<(), Error> {
        let parsed = HashRecord::parse(record)?;

        // key length follows the stored key, never the current default
        let derived = kdf::derive_key(
            candidate,
            parsed.salt(),
            *parsed.params(),
            parsed.key().len(),
        )?;

        if !fixed_time_eq(parsed.key(), &derived) {
            return Err(Error::Mismatch);
        }
        Ok(())
    }

    /// [`check`](Self::check) with the wrong-candidate case folded into the
    /// boolean. Structural failures still surface as errors, so callers can
    /// tell "wrong secret" from "corrupted record".
    pub fn verify(&self, record: &str, candidate: &str) -> Result<bool, Error> {
        match self.check(record, candidate) {
            Ok(()) => Ok(true),
            Err(Error::Mismatch) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn observe(&self, operation: Operation, outcome: Outcome, elapsed: Duration) {
        if let Some(observer) = &self.observer {
            observer.observe(operation, outcome, elapsed);
        }
    }
}
