//! SHA-256 digests for downloaded release archives.

use crate::error::{InstallerError, Result};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// A lowercase, 64-character hex SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn from_hasher(hasher: Sha256) -> Self {
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn of_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self::from_hasher(hasher)
    }
}

impl FromStr for Sha256Digest {
    type Err = InstallerError;

    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim().to_ascii_lowercase();
        if value.len() != 64 || !value.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(InstallerError::InvalidChecksum {
                value: s.to_string(),
            });
        }
        Ok(Self(value))
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compare a computed digest against the expected one.
pub fn verify(expected: &Sha256Digest, actual: &Sha256Digest) -> Result<()> {
    if expected != actual {
        return Err(InstallerError::ChecksumMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    #[test]
    fn test_of_bytes_matches_known_digest() {
        assert_eq!(Sha256Digest::of_bytes(b"hello").as_str(), HELLO);
    }

    #[test]
    fn test_parse_normalizes_case() {
        let digest: Sha256Digest = HELLO.to_uppercase().parse().unwrap();
        assert_eq!(digest.as_str(), HELLO);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("abc".parse::<Sha256Digest>().is_err());
        assert!("z".repeat(64).parse::<Sha256Digest>().is_err());
    }

    #[test]
    fn test_verify_mismatch() {
        let expected: Sha256Digest = HELLO.parse().unwrap();
        let actual = Sha256Digest::of_bytes(b"world");
        assert!(matches!(
            verify(&expected, &actual),
            Err(InstallerError::ChecksumMismatch { .. })
        ));
        assert!(verify(&expected, &Sha256Digest::of_bytes(b"hello")).is_ok());
    }
}
