//! Stored record format for hashed secrets.
//!
//! Record grammar (splitting on `$` yields exactly six fields, the first
//! empty):
//! ```text
//! $argon2id$v=19$m=<memKiB>,t=<passes>,p=<lanes>$<base64(salt)>$<base64(key)>
//! ```
//!
//! Binary fields use the unpadded standard base64 alphabet. Every parameter
//! needed to re-derive the key is embedded in the record, so old records stay
//! verifiable after the defaults change.
//!
//! Parsing is strict: any deviation from the grammar above is a hard error,
//! never a best-effort scan, since a silently misparsed cost parameter would
//! silently weaken verification.

use argon2::Version;
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};

use crate::{Error, KdfParams};

/// Algorithm tag carried in every record.
pub const ALGORITHM: &str = "argon2id";
/// Format version, the Argon2 revision in use (0x13).
pub const VERSION: u32 = Version::V0x13 as u32;
/// Length of the salt (16 bytes).
pub const SALT_LEN: usize = 16;
/// Length of newly derived keys (32 bytes / 256 bits).
pub const KEY_LEN: usize = 32;
/// Smallest stored key accepted on verification; shorter keys mark a
/// degenerate record.
pub const MIN_KEY_LEN: usize = 16;

const FIELD_COUNT: usize = 6;

/// A parsed hash record: version, cost parameters, salt, and derived key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashRecord {
    version: u32,
    params: KdfParams,
    salt: Vec<u8>,
    key: Vec<u8>,
}

impl HashRecord {
    pub(crate) fn new(params: KdfParams, salt: Vec<u8>, key: Vec<u8>) -> Self {
        Self {
            version: VERSION,
            params,
            salt,
            key,
        }
    }

    /// Returns the record format version.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Returns the cost parameters the key was derived with.
    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    /// Returns the salt.
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// Returns the stored derived key.
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Serializes the record into its single-line text form.
    pub fn encode(&self) -> String {
        format!(
            "${ALGORITHM}$v={}$m={},t={},p={}${}${}",
            self.version,
            self.params.mem_cost_kib(),
            self.params.time_cost(),
            self.params.parallelism(),
            STANDARD_NO_PAD.encode(&self.salt),
            STANDARD_NO_PAD.encode(&self.key),
        )
    }

    /// Parses a stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The field count is wrong ([`Error::MalformedRecord`])
    /// - The algorithm tag or version is foreign
    ///   ([`Error::UnsupportedAlgorithm`], [`Error::UnsupportedVersion`])
    /// - The cost-parameter field deviates from `m=..,t=..,p=..`
    ///   ([`Error::ParameterParse`])
    /// - A binary field is not valid unpadded base64 ([`Error::Encoding`])
    /// - The decoded salt or key length is degenerate
    ///   ([`Error::MalformedRecord`])
    pub fn parse(record: &str) -> Result<Self, Error> {
        let fields: Vec<&str> = record.split('$').collect();
        if fields.len() != FIELD_COUNT || !fields[0].is_empty() {
            return Err(Error::MalformedRecord);
        }

        if fields[1] != ALGORITHM {
            return Err(Error::UnsupportedAlgorithm(fields[1].to_string()));
        }

        let version = parse_version(fields[2])?;
        if version != VERSION {
            return Err(Error::UnsupportedVersion(version));
        }

        let params = parse_params(fields[3])?;

        let salt = STANDARD_NO_PAD
            .decode(fields[4])
            .map_err(|_| Error::Encoding)?;
        let key = STANDARD_NO_PAD
            .decode(fields[5])
            .map_err(|_| Error::Encoding)?;

        if salt.len() != SALT_LEN {
            return Err(Error::MalformedRecord);
        }
        if key.len() < MIN_KEY_LEN {
            return Err(Error::MalformedRecord);
        }

        Ok(Self {
            version,
            params,
            salt,
            key,
        })
    }
}

fn parse_version(field: &str) -> Result<u32, Error> {
    let digits = field.strip_prefix("v=").ok_or(Error::MalformedRecord)?;
    parse_number(digits).ok_or(Error::MalformedRecord)
}

/// Parses the `m=..,t=..,p=..` field, rejecting reordered, missing, or
/// trailing entries.
fn parse_params(field: &str) -> Result<KdfParams, Error> {
    let mut parts = field.split(',');

    let mem_cost_kib = cost_value(parts.next(), "m=")?;
    let time_cost = cost_value(parts.next(), "t=")?;
    let parallelism = cost_value(parts.next(), "p=")?;

    if parts.next().is_some() {
        return Err(Error::ParameterParse);
    }

    KdfParams::new(mem_cost_kib, time_cost, parallelism).map_err(|_| Error::ParameterParse)
}

fn cost_value(part: Option<&str>, prefix: &str) -> Result<u32, Error> {
    part.and_then(|p| p.strip_prefix(prefix))
        .and_then(parse_number)
        .ok_or(Error::ParameterParse)
}

/// Digits-only `u32` parse; rejects signs, whitespace, and empty input.
fn parse_number(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HashRecord {
        HashRecord::new(
            KdfParams::new(1024, 2, 1).unwrap(),
            vec![1u8; SALT_LEN],
            vec![2u8; KEY_LEN],
        )
    }

    #[test]
    fn encode_parse_roundtrip() {
        let record = sample();
        let encoded = record.encode();
        let parsed = HashRecord::parse(&encoded).unwrap();

        assert_eq!(parsed, record);
        assert_eq!(parsed.version(), VERSION);
        assert_eq!(parsed.params().mem_cost_kib(), 1024);
        assert_eq!(parsed.params().time_cost(), 2);
        assert_eq!(parsed.params().parallelism(), 1);
    }

    #[test]
    fn encoded_form_is_unpadded() {
        let encoded = sample().encode();
        assert!(encoded.starts_with("$argon2id$v=19$m=1024,t=2,p=1$"));

        let fields: Vec<&str> = encoded.split('$').collect();
        assert!(!fields[4].contains('='), "salt field must be unpadded");
        assert!(!fields[5].contains('='), "key field must be unpadded");
    }

    #[test]
    fn encoded_form_has_six_fields() {
        let encoded = sample().encode();
        assert_eq!(encoded.split('$').count(), 6);
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert_eq!(
            HashRecord::parse("not-a-valid-record"),
            Err(Error::MalformedRecord)
        );
        let extra = format!("{}$extra", sample().encode());
        assert_eq!(HashRecord::parse(&extra), Err(Error::MalformedRecord));
    }

    #[test]
    fn rejects_foreign_algorithm_and_version() {
        let encoded = sample().encode();

        let foreign_alg = encoded.replacen("argon2id", "argon2i", 1);
        assert_eq!(
            HashRecord::parse(&foreign_alg),
            Err(Error::UnsupportedAlgorithm("argon2i".to_string()))
        );

        let foreign_version = encoded.replacen("v=19", "v=16", 1);
        assert_eq!(
            HashRecord::parse(&foreign_version),
            Err(Error::UnsupportedVersion(16))
        );

        let junk_version = encoded.replacen("v=19", "v=nineteen", 1);
        assert_eq!(HashRecord::parse(&junk_version), Err(Error::MalformedRecord));
    }

    #[test]
    fn rejects_cost_field_deviations() {
        let encoded = sample().encode();

        for bad in [
            "m=1024,t=2",          // missing entry
            "m=1024,t=2,p=1,x=9",  // trailing entry
            "t=2,m=1024,p=1",      // reordered
            "m=abc,t=2,p=1",       // non-numeric
            "m=+1024,t=2,p=1",     // signed
            "m=1024,t=2,p=0",      // degenerate value
            "m= 1024,t=2,p=1",     // whitespace
        ] {
            let tampered = encoded.replacen("m=1024,t=2,p=1", bad, 1);
            assert_eq!(
                HashRecord::parse(&tampered),
                Err(Error::ParameterParse),
                "expected rejection of {bad:?}"
            );
        }
    }

    #[test]
    fn rejects_padded_base64() {
        // 17-byte salt encodes to a padded 24-char group in strict base64
        let padded = format!(
            "$argon2id$v=19$m=1024,t=2,p=1${}=${}",
            "A".repeat(23),
            "B".repeat(43)
        );
        assert_eq!(HashRecord::parse(&padded), Err(Error::Encoding));
    }

    #[test]
    fn rejects_degenerate_lengths() {
        let short_salt = HashRecord {
            version: VERSION,
            params: KdfParams::new(1024, 2, 1).unwrap(),
            salt: vec![1u8; 8],
            key: vec![2u8; KEY_LEN],
        };
        assert_eq!(
            HashRecord::parse(&short_salt.encode()),
            Err(Error::MalformedRecord)
        );

        let short_key = HashRecord {
            version: VERSION,
            params: KdfParams::new(1024, 2, 1).unwrap(),
            salt: vec![1u8; SALT_LEN],
            key: vec![2u8; MIN_KEY_LEN - 1],
        };
        assert_eq!(
            HashRecord::parse(&short_key.encode()),
            Err(Error::MalformedRecord)
        );
    }
}
