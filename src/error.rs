//! Error taxonomy for hashing and verification.
//!
//! [`Error::Mismatch`] is the one variant that represents a valid negative
//! outcome (wrong secret). Callers mapping errors to user-visible messages
//! must present it identically to the structural variants, while logging the
//! two classes differently on their side.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// The secret to hash was empty. Rejected before any entropy is
    /// consumed or derivation work starts.
    #[error("secret cannot be empty")]
    EmptySecret,

    /// The OS random generator was unavailable. Never retried with a
    /// weaker source.
    #[error("OS random generator unavailable")]
    RandomSource,

    /// The record does not match the expected six-field grammar.
    #[error("malformed hash record")]
    MalformedRecord,

    /// The record carries an algorithm tag other than `argon2id`.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The record carries a format version this build does not know.
    #[error("unsupported record version: {0}")]
    UnsupportedVersion(u32),

    /// The cost-parameter field was unparsable or carried degenerate values.
    #[error("invalid cost parameters")]
    ParameterParse,

    /// Base64 decoding of the salt or key field failed.
    #[error("invalid base64 in salt or key field")]
    Encoding,

    /// The derivation engine rejected its inputs.
    #[error("key derivation failed: {0}")]
    Kdf(String),

    /// The candidate secret does not match the record. A well-formed
    /// comparison result, not a structural failure.
    #[error("secret does not match record")]
    Mismatch,
}
