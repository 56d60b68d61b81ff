//! Immutable description of one token request.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::config::GeneratorConfig;
use crate::error::{Result, SecureTokenError};
use crate::params::{ExtraParams, normalize_params};

static CLIENT_IP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9]{1,3}\.){3}[0-9]{1,3}$").expect("client IP pattern is valid")
});

/// Check that `ip` looks like a dotted quad. Octet ranges are not checked.
pub fn validate_client_ip(ip: &str) -> Result<()> {
    if !CLIENT_IP_PATTERN.is_match(ip) {
        return Err(SecureTokenError::InvalidClientIp(ip.to_string()));
    }
    Ok(())
}

/// Schemes whose last path segment may carry `;params`, which are not part
/// of the path.
const SCHEMES_WITH_PARAMS: [&str; 16] = [
    "ftp", "hdl", "prospero", "http", "imap", "https", "shttp", "rtsp", "rtsps", "rtspu", "sip",
    "sips", "mms", "sftp", "tel", "",
];

/// Extract the path component of an absolute URL, exactly as written.
///
/// The URL is parsed only to validate it. The signed path is the raw text
/// between the authority and the first `?` or `#`, so it is neither
/// percent-encoded nor dot-segment resolved.
pub fn url_path(url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| SecureTokenError::InvalidUrl(e.to_string()))?;
    if parsed.cannot_be_a_base() {
        return Err(SecureTokenError::InvalidUrl(format!("'{url}' is not hierarchical")));
    }

    let path = raw_path(url.trim(), parsed.scheme());
    if path.is_empty() {
        return Err(SecureTokenError::InvalidUrl(format!("no path in '{url}'")));
    }
    Ok(path.to_string())
}

fn raw_path<'a>(url: &'a str, scheme: &str) -> &'a str {
    let mut rest = url.split_once(':').map_or(url, |(_, rest)| rest);
    if let Some(after_slashes) = rest.strip_prefix("//") {
        rest = after_slashes
            .find(['/', '?', '#'])
            .map_or("", |end| &after_slashes[end..]);
    }

    let mut path = rest.find(['?', '#']).map_or(rest, |end| &rest[..end]);
    if SCHEMES_WITH_PARAMS.iter().any(|s| *s == scheme) {
        let last_segment = path.rfind('/').unwrap_or(0);
        if let Some(semi) = path[last_segment..].find(';') {
            path = &path[..last_segment + semi];
        }
    }
    path
}

/// Everything needed to compute one token.
///
/// Values are validated when the request is built, so every `TokenRequest`
/// holds a well-formed prefix, secret, URL and client IP.
#[derive(Debug, Clone)]
pub struct TokenRequest {
    config: GeneratorConfig,
    url: String,
    url_path: String,
    client_ip: Option<String>,
    params: ExtraParams,
}

impl TokenRequest {
    /// Start building a request for the given generator configuration.
    pub fn builder(config: GeneratorConfig) -> TokenRequestBuilder {
        TokenRequestBuilder {
            config,
            url: None,
            client_ip: None,
            params: ExtraParams::new(),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// The URL exactly as supplied.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn url_path(&self) -> &str {
        &self.url_path
    }

    pub fn client_ip(&self) -> Option<&str> {
        self.client_ip.as_deref()
    }

    /// Extra parameters, already carrying the configured prefix.
    pub fn params(&self) -> &ExtraParams {
        &self.params
    }
}

/// Builder for [`TokenRequest`]. Each step validates its input.
#[derive(Debug, Clone)]
pub struct TokenRequestBuilder {
    config: GeneratorConfig,
    url: Option<(String, String)>,
    client_ip: Option<String>,
    params: ExtraParams,
}

impl TokenRequestBuilder {
    /// Set the stream URL.
    pub fn url(mut self, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let path = url_path(&url)?;
        self.url = Some((url, path));
        Ok(self)
    }

    /// Bind the token to a client IP.
    pub fn client_ip(mut self, ip: impl Into<String>) -> Result<Self> {
        let ip = ip.into();
        validate_client_ip(&ip)?;
        self.client_ip = Some(ip);
        Ok(self)
    }

    /// Set the extra parameters. Keys are normalized with the configured prefix.
    pub fn params(mut self, params: ExtraParams) -> Result<Self> {
        self.params = normalize_params(&self.config.prefix, params)?;
        Ok(self)
    }

    pub fn build(self) -> Result<TokenRequest> {
        let (url, url_path) = self
            .url
            .ok_or_else(|| SecureTokenError::InvalidUrl("no URL supplied".to_string()))?;
        Ok(TokenRequest {
            config: self.config,
            url,
            url_path,
            client_ip: self.client_ip,
            params: self.params,
        })
    }
}
