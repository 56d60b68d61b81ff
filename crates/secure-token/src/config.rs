//! Generator configuration: parameter prefix, shared secret and hash algorithm.

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::algorithm::HashAlgorithm;
use crate::error::{Result, SecureTokenError};

static PREFIX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_%.~-]*$").expect("prefix pattern is valid"));
static SECRET_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("secret pattern is valid"));

/// Namespace tag prepended to custom parameter names and to the `hash` parameter.
///
/// May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prefix(String);

impl Prefix {
    pub fn new(prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        if !PREFIX_PATTERN.is_match(&prefix) {
            return Err(SecureTokenError::InvalidPrefix(prefix));
        }
        Ok(Self(prefix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Secret shared with the verifying media server.
///
/// Cleared from memory when dropped and never printed by `Debug`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret(String);

impl SharedSecret {
    pub fn new(secret: impl Into<String>) -> Result<Self> {
        let secret = secret.into();
        if !SECRET_PATTERN.is_match(&secret) {
            return Err(SecureTokenError::InvalidSecret);
        }
        Ok(Self(secret))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(<redacted>)")
    }
}

/// Configuration shared by every token a generator produces.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub prefix: Prefix,
    pub secret: SharedSecret,
    pub algorithm: HashAlgorithm,
}

/// Algorithm as written in a configuration file: a name or a numeric code.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AlgorithmSetting {
    Code(u8),
    Name(String),
}

/// On-disk shape of [`GeneratorConfig`] before validation.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    prefix: String,
    #[serde(alias = "secret")]
    shared_secret: String,
    #[serde(default)]
    algorithm: Option<AlgorithmSetting>,
}

impl GeneratorConfig {
    /// Create a config with the default algorithm (SHA-256).
    pub fn new(prefix: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        Ok(Self {
            prefix: Prefix::new(prefix)?,
            secret: SharedSecret::new(secret)?,
            algorithm: HashAlgorithm::default(),
        })
    }

    /// Set the hash algorithm.
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Parse a YAML document of the form:
    ///
    /// ```yaml
    /// prefix: wowzatoken
    /// shared_secret: abc123
    /// algorithm: sha256
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let mut raw: RawConfig = serde_yaml::from_str(yaml)?;
        let algorithm = match raw.algorithm.take() {
            None => HashAlgorithm::default(),
            Some(AlgorithmSetting::Code(code)) => HashAlgorithm::try_from(code)?,
            Some(AlgorithmSetting::Name(name)) => name.parse()?,
        };
        let secret = std::mem::take(&mut raw.shared_secret);
        Ok(Self::new(raw.prefix, secret)?.with_algorithm(algorithm))
    }

    /// Read and parse a YAML configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&contents)?;
        log::info!(
            "Loaded token generator config from {} (prefix '{}', {})",
            path.display(),
            config.prefix,
            config.algorithm
        );
        Ok(config)
    }
}
