//! Extra query parameters and the canonical query strings built from them.

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_yaml::Value;

use crate::config::Prefix;
use crate::error::{Result, SecureTokenError};

/// Bytes escaped in signed values: everything but `A-Za-z0-9_.-~/`.
const SIGNED_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// Bytes escaped in the emitted URL: as above, and `/` too.
const URL_COMPONENT: &AsciiSet = &SIGNED_VALUE.add(b'/');

/// Extra parameters keyed by name, kept in byte order of the key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraParams(BTreeMap<String, String>);

impl ExtraParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render as `key=value` pairs with keys and values percent-encoded.
    ///
    /// This is the query string appended to the playable URL; it is not signed.
    pub fn to_url_query(&self) -> String {
        self.iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(k, URL_COMPONENT),
                    utf8_percent_encode(v, URL_COMPONENT)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K, V> FromIterator<(K, V)> for ExtraParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl TryFrom<Value> for ExtraParams {
    type Error = SecureTokenError;

    /// Accept only a flat mapping of scalar names to scalar values.
    fn try_from(value: Value) -> Result<Self> {
        let mapping = match value {
            Value::Mapping(mapping) => mapping,
            other => {
                return Err(SecureTokenError::InvalidParams(format!(
                    "expected a mapping, got {}",
                    kind(&other)
                )));
            }
        };

        let mut params = ExtraParams::new();
        for (key, value) in mapping {
            let key = scalar_to_string(&key).ok_or_else(|| {
                SecureTokenError::InvalidParams(format!("key must be a scalar, got {}", kind(&key)))
            })?;
            let value = scalar_to_string(&value).ok_or_else(|| {
                SecureTokenError::InvalidParams(format!(
                    "value of '{}' must be a scalar, got {}",
                    key,
                    kind(&value)
                ))
            })?;
            params.insert(key, value);
        }
        Ok(params)
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Prefix every key that does not already start with `prefix`.
///
/// Idempotent: normalizing twice gives the same mapping. Values are untouched.
/// Two keys that end up with the same name (`endtime` and `<prefix>endtime`)
/// are rejected, since either value could be meant.
pub fn normalize_params(prefix: &Prefix, params: ExtraParams) -> Result<ExtraParams> {
    let prefix = prefix.as_str();
    let mut normalized = BTreeMap::new();
    for (key, value) in params.0 {
        let key = if key.starts_with(prefix) {
            key
        } else {
            format!("{prefix}{key}")
        };
        if normalized.contains_key(&key) {
            return Err(SecureTokenError::InvalidParams(format!(
                "parameter '{key}' is given both with and without the prefix"
            )));
        }
        normalized.insert(key, value);
    }
    Ok(ExtraParams(normalized))
}

/// Build the query part of the signing string.
///
/// The client IP and the secret join the parameter set as bare keys. Keys are
/// sorted byte-wise; empty values render as the bare key.
pub fn signed_query(params: &ExtraParams, client_ip: Option<&str>, secret: &str) -> String {
    let mut signed: BTreeMap<&str, &str> = params.iter().collect();
    if let Some(ip) = client_ip {
        signed.insert(ip, "");
    }
    signed.insert(secret, "");

    signed
        .into_iter()
        .map(|(key, value)| {
            if value.is_empty() {
                key.to_string()
            } else {
                format!("{}={}", key, utf8_percent_encode(value, SIGNED_VALUE))
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}
