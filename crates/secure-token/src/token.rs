//! Token computation.

use data_encoding::BASE64;

use crate::error::{Result, SecureTokenError};
use crate::params::signed_query;
use crate::path::canonical_path;
use crate::request::TokenRequest;

/// Build the exact string that is hashed: `<canonical path>?<sorted query>`.
///
/// The result contains the shared secret and must not be logged or sent.
pub fn signing_string(request: &TokenRequest) -> Result<String> {
    let config = request.config();
    let secret = config.secret.expose();
    if secret.is_empty() {
        return Err(SecureTokenError::MissingSecret);
    }

    let query = signed_query(request.params(), request.client_ip(), secret);
    let path = canonical_path(request.url_path())?;
    Ok(format!("{path}?{query}"))
}

/// Compute the URL-safe base64 token for a request.
///
/// Padding is kept; only `+` and `/` are substituted.
pub fn compute_token(request: &TokenRequest) -> Result<String> {
    let signing = signing_string(request)?;
    let algorithm = request.config().algorithm;
    let digest = algorithm.digest(signing.as_bytes());

    log::debug!(
        "Computed {} token for path {}",
        algorithm,
        request.url_path()
    );

    Ok(BASE64.encode(&digest).replace('+', "-").replace('/', "_"))
}

/// Build the playable URL:
/// `<url>?<params>&<prefix>hash=<token>&type=m3u8`.
pub fn compute_full_url(request: &TokenRequest) -> Result<String> {
    let token = compute_token(request)?;
    Ok(format!(
        "{}?{}&{}hash={}&type=m3u8",
        request.url(),
        request.params().to_url_query(),
        request.config().prefix,
        token
    ))
}
