//! Signed access tokens for streaming-media URLs.
//!
//! A token lets a media server check, without a round trip, that a playback
//! URL was issued by someone holding the shared secret. The server recomputes
//! the same token from the request, so every byte of the signed string is a
//! fixed contract:
//!
//! 1. Extra parameters, the client IP (as a bare key) and the shared secret
//!    (as a bare key) are sorted and rendered as a query string.
//! 2. The URL path loses its leading slashes and, when the first segment
//!    contains `m3u8` or `redirect`, that segment.
//! 3. `<path>?<query>` is hashed with SHA-256, SHA-384 or SHA-512.
//! 4. The digest is base64 encoded with `+` and `/` replaced by `-` and `_`.
//!
//! # Example
//!
//! ```rust
//! use secure_token::{ExtraParams, GeneratorConfig, TokenRequest, compute_full_url, verify};
//!
//! let config = GeneratorConfig::new("wowzatoken", "abc123").unwrap();
//! let params: ExtraParams = [("endtime", "1700000000")].into_iter().collect();
//!
//! let request = TokenRequest::builder(config)
//!     .url("https://media.example.com/live/stream1/playlist.m3u8").unwrap()
//!     .client_ip("192.168.1.2").unwrap()
//!     .params(params).unwrap()
//!     .build()
//!     .unwrap();
//!
//! let url = compute_full_url(&request).unwrap();
//! assert!(url.contains("wowzatokenendtime=1700000000"));
//! assert!(url.ends_with("&type=m3u8"));
//!
//! let token = secure_token::compute_token(&request).unwrap();
//! assert!(verify(&request, &token).unwrap());
//! ```

mod algorithm;
mod config;
mod error;
mod generator;
mod params;
mod path;
mod request;
mod token;
mod verify;

// Public re-exports
pub use algorithm::HashAlgorithm;
pub use config::{GeneratorConfig, Prefix, SharedSecret};
pub use error::{Result, SecureTokenError};
pub use generator::TokenGenerator;
pub use params::{ExtraParams, normalize_params, signed_query};
pub use path::canonical_path;
pub use request::{TokenRequest, TokenRequestBuilder, url_path, validate_client_ip};
pub use token::{compute_full_url, compute_token, signing_string};
pub use verify::verify;
