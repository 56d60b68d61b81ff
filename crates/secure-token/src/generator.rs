//! Mutable generator for callers that configure a token step by step.
//!
//! Each setter validates before it stores, so a failed call leaves the
//! generator as it was. Computation snapshots the current state into a
//! [`TokenRequest`] and runs the pure functions in [`crate::token`].
//!
//! A `TokenGenerator` is not meant to be shared between concurrent requests;
//! create one per request (construction is cheap) or build a
//! [`TokenRequest`] directly.

use serde_yaml::Value;

use crate::algorithm::HashAlgorithm;
use crate::config::GeneratorConfig;
use crate::error::{Result, SecureTokenError};
use crate::params::{ExtraParams, normalize_params};
use crate::request::{TokenRequest, url_path, validate_client_ip};
use crate::token::{compute_full_url, compute_token};

#[derive(Debug, Clone)]
pub struct TokenGenerator {
    config: GeneratorConfig,
    client_ip: Option<String>,
    url: Option<String>,
    url_path: Option<String>,
    params: ExtraParams,
}

impl TokenGenerator {
    /// Create a generator, validating prefix and secret.
    pub fn new(prefix: impl Into<String>, shared_secret: impl Into<String>) -> Result<Self> {
        Ok(Self::from_config(GeneratorConfig::new(prefix, shared_secret)?))
    }

    pub fn from_config(config: GeneratorConfig) -> Self {
        Self {
            config,
            client_ip: None,
            url: None,
            url_path: None,
            params: ExtraParams::new(),
        }
    }

    pub fn set_client_ip(&mut self, ip: impl Into<String>) -> Result<()> {
        let ip = ip.into();
        if let Err(e) = validate_client_ip(&ip) {
            log::warn!("Rejected client IP: {}", e);
            return Err(e);
        }
        self.client_ip = Some(ip);
        Ok(())
    }

    pub fn set_url(&mut self, url: impl Into<String>) -> Result<()> {
        let url = url.into();
        let path = url_path(&url).inspect_err(|e| log::warn!("Rejected URL: {}", e))?;
        self.url = Some(url);
        self.url_path = Some(path);
        Ok(())
    }

    pub fn set_hash_algorithm(&mut self, algorithm: HashAlgorithm) {
        self.config.algorithm = algorithm;
    }

    /// Select the algorithm by numeric code (1 = SHA-256, 2 = SHA-384, 3 = SHA-512).
    pub fn set_hash_method(&mut self, code: u8) -> Result<()> {
        self.config.algorithm = HashAlgorithm::try_from(code)?;
        Ok(())
    }

    /// Replace the extra parameters; keys gain the prefix unless they already have it.
    pub fn set_extra_params(&mut self, params: ExtraParams) -> Result<()> {
        self.params = normalize_params(&self.config.prefix, params)
            .inspect_err(|e| log::warn!("Rejected extra parameters: {}", e))?;
        Ok(())
    }

    /// Replace the extra parameters from an untyped value, e.g. a section of a
    /// YAML document. Anything but a flat mapping of scalars is rejected.
    pub fn set_extra_params_value(&mut self, value: Value) -> Result<()> {
        let params = ExtraParams::try_from(value)
            .inspect_err(|e| log::warn!("Rejected extra parameters: {}", e))?;
        self.set_extra_params(params)
    }

    pub fn client_ip(&self) -> Option<&str> {
        self.client_ip.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn hash_method(&self) -> HashAlgorithm {
        self.config.algorithm
    }

    pub fn params(&self) -> &ExtraParams {
        &self.params
    }

    pub fn shared_secret(&self) -> &str {
        self.config.secret.expose()
    }

    pub fn prefix(&self) -> &str {
        self.config.prefix.as_str()
    }

    /// Snapshot the current state as an immutable request.
    pub fn request(&self) -> Result<TokenRequest> {
        let url = self
            .url
            .clone()
            .ok_or_else(|| SecureTokenError::InvalidUrl("no URL supplied".to_string()))?;
        let mut builder = TokenRequest::builder(self.config.clone()).url(url)?;
        if let Some(ip) = &self.client_ip {
            builder = builder.client_ip(ip.clone())?;
        }
        builder.params(self.params.clone())?.build()
    }

    pub fn compute_token(&self) -> Result<String> {
        compute_token(&self.request()?)
    }

    pub fn compute_full_url(&self) -> Result<String> {
        compute_full_url(&self.request()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> TokenGenerator {
        let mut generator = TokenGenerator::new("wowza", "abc123").unwrap();
        generator
            .set_url("https://host/live/stream1/playlist.m3u8")
            .unwrap();
        generator
    }

    #[test]
    fn test_construction_defaults() {
        let generator = TokenGenerator::new("wowza", "abc123").unwrap();
        assert_eq!(generator.prefix(), "wowza");
        assert_eq!(generator.shared_secret(), "abc123");
        assert_eq!(generator.hash_method(), HashAlgorithm::Sha256);
        assert!(generator.params().is_empty());
        assert_eq!(generator.client_ip(), None);
        assert_eq!(generator.url(), None);
    }

    #[test]
    fn test_construction_rejects_bad_config() {
        assert!(matches!(
            TokenGenerator::new("bad prefix", "abc123"),
            Err(SecureTokenError::InvalidPrefix(_))
        ));
        assert!(matches!(
            TokenGenerator::new("wowza", ""),
            Err(SecureTokenError::InvalidSecret)
        ));
    }

    #[test]
    fn test_failed_setters_leave_state_unchanged() {
        let mut generator = generator();
        generator.set_client_ip("10.0.0.1").unwrap();

        assert!(generator.set_client_ip("10.0.0").is_err());
        assert!(generator.set_url("rtmp://host").is_err());
        assert!(generator.set_hash_method(9).is_err());
        assert!(
            generator
                .set_extra_params_value(Value::String("flat".into()))
                .is_err()
        );

        assert_eq!(generator.client_ip(), Some("10.0.0.1"));
        assert_eq!(
            generator.url(),
            Some("https://host/live/stream1/playlist.m3u8")
        );
        assert_eq!(generator.hash_method(), HashAlgorithm::Sha256);
        assert!(generator.params().is_empty());
    }

    #[test]
    fn test_compute_token_matches_fixture() {
        assert_eq!(
            generator().compute_token().unwrap(),
            "eelTcYTvP9UOoQinQro20NdY0SbcFOJrAnBynlUUNUQ="
        );
    }

    #[test]
    fn test_compute_without_url() {
        let generator = TokenGenerator::new("wowza", "abc123").unwrap();
        assert!(matches!(
            generator.compute_token(),
            Err(SecureTokenError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_set_extra_params_prefixes_keys() {
        let mut generator = generator();
        let params: ExtraParams = [("endtime", "1"), ("wowzastarttime", "0")]
            .into_iter()
            .collect();
        generator.set_extra_params(params).unwrap();
        assert_eq!(generator.params().get("wowzaendtime"), Some("1"));
        assert_eq!(generator.params().get("wowzastarttime"), Some("0"));
    }

    #[test]
    fn test_set_url_without_path_keeps_previous_url() {
        let mut generator = generator();
        assert!(matches!(
            generator.set_url("https://host"),
            Err(SecureTokenError::InvalidUrl(_))
        ));
        assert_eq!(
            generator.url(),
            Some("https://host/live/stream1/playlist.m3u8")
        );
    }

    #[test]
    fn test_colliding_params_keep_previous_params() {
        let mut generator = generator();
        generator
            .set_extra_params([("endtime", "1")].into_iter().collect())
            .unwrap();

        let colliding: ExtraParams = [("endtime", "2"), ("wowzaendtime", "3")]
            .into_iter()
            .collect();
        assert!(matches!(
            generator.set_extra_params(colliding),
            Err(SecureTokenError::InvalidParams(_))
        ));
        assert_eq!(generator.params().get("wowzaendtime"), Some("1"));
        assert_eq!(generator.params().len(), 1);
    }

    #[test]
    fn test_hash_method_by_code() {
        let mut generator = generator();
        generator.set_hash_method(3).unwrap();
        assert_eq!(generator.hash_method(), HashAlgorithm::Sha512);
    }
}
