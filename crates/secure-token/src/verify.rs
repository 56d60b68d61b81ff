//! Token verification with constant-time comparison.

use subtle::ConstantTimeEq;

use crate::error::Result;
use crate::request::TokenRequest;
use crate::token::compute_token;

/// Verify a presented token against the request it claims to sign.
///
/// This mirrors what the media server does: recompute the token from the
/// request and compare the two strings in constant time.
///
/// # Returns
/// * `Ok(true)` if the token matches
/// * `Ok(false)` if it does not
/// * `Err` if no token can be computed for the request (e.g. invalid path)
pub fn verify(request: &TokenRequest, presented: &str) -> Result<bool> {
    let expected = compute_token(request)?;
    let matches = tokens_equal(expected.as_bytes(), presented.as_bytes());
    if !matches {
        log::debug!("Token mismatch for path {}", request.url_path());
    }
    Ok(matches)
}

/// Constant-time comparison of two tokens.
fn tokens_equal(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
