//! Digest selection for the signing string.

use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::error::SecureTokenError;

/// Hash algorithm applied to the signing string.
///
/// The numeric codes (`1`, `2`, `3`) are the ones media servers use in their
/// own configuration, so both forms are accepted when parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    /// Numeric code of the algorithm.
    pub fn code(self) -> u8 {
        match self {
            HashAlgorithm::Sha256 => 1,
            HashAlgorithm::Sha384 => 2,
            HashAlgorithm::Sha512 => 3,
        }
    }

    /// Size of the raw digest in bytes.
    pub fn digest_len(self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }

    /// Hash `input` and return the raw digest.
    pub fn digest(self, input: &[u8]) -> Vec<u8> {
        match self {
            HashAlgorithm::Sha256 => Sha256::digest(input).to_vec(),
            HashAlgorithm::Sha384 => Sha384::digest(input).to_vec(),
            HashAlgorithm::Sha512 => Sha512::digest(input).to_vec(),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
        };
        f.write_str(name)
    }
}

impl TryFrom<u8> for HashAlgorithm {
    type Error = SecureTokenError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(HashAlgorithm::Sha256),
            2 => Ok(HashAlgorithm::Sha384),
            3 => Ok(HashAlgorithm::Sha512),
            other => Err(SecureTokenError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = SecureTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "");
        match normalized.as_str() {
            "sha256" | "1" => Ok(HashAlgorithm::Sha256),
            "sha384" | "2" => Ok(HashAlgorithm::Sha384),
            "sha512" | "3" => Ok(HashAlgorithm::Sha512),
            _ => Err(SecureTokenError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sha256() {
        assert_eq!(HashAlgorithm::default(), HashAlgorithm::Sha256);
    }

    #[test]
    fn test_digest_sizes() {
        for alg in [
            HashAlgorithm::Sha256,
            HashAlgorithm::Sha384,
            HashAlgorithm::Sha512,
        ] {
            assert_eq!(alg.digest(b"live/stream1?abc123").len(), alg.digest_len());
        }
    }

    #[test]
    fn test_parse_names_and_codes() {
        assert_eq!("SHA-384".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha384);
        assert_eq!("sha512".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha512);
        assert_eq!("1".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!(HashAlgorithm::try_from(2).unwrap(), HashAlgorithm::Sha384);
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        assert!(matches!(
            "md5".parse::<HashAlgorithm>(),
            Err(SecureTokenError::UnsupportedAlgorithm(_))
        ));
        assert!(matches!(
            HashAlgorithm::try_from(4),
            Err(SecureTokenError::UnsupportedAlgorithm(_))
        ));
    }
}
