//! RPC-style request signing (signature version 1.0)

use crate::error::{AliyunError, Result};
use base64::Engine;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha1::Sha1;
use std::collections::BTreeMap;

type HmacSha1 = Hmac<Sha1>;

/// ECS API version
pub const API_VERSION: &str = "2014-05-26";
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";
pub const SIGNATURE_VERSION: &str = "1.0";

/// Everything except RFC 3986 unreserved characters
const RFC3986: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub fn percent_encode(value: &str) -> String {
    utf8_percent_encode(value, RFC3986).to_string()
}

/// `k=v` pairs joined by `&`, both sides encoded, in key order
pub fn canonical_query(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn string_to_sign(method: &str, canonical_query: &str) -> String {
    format!(
        "{}&{}&{}",
        method,
        percent_encode("/"),
        percent_encode(canonical_query)
    )
}

/// Base64 HMAC-SHA1 of `string_to_sign`, keyed with `<secret>&`
pub fn sign(access_key_secret: &str, string_to_sign: &str) -> Result<String> {
    let key = format!("{}&", access_key_secret);
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| AliyunError::Signature(e.to_string()))?;
    mac.update(string_to_sign.as_bytes());
    Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

/// Signs GET requests for one key pair
pub struct Signer {
    access_key_id: String,
    access_key_secret: String,
}

impl Signer {
    pub fn new(access_key_id: impl Into<String>, access_key_secret: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
        }
    }

    /// Add the common parameters to `params` and return the signed query string
    pub fn signed_query(
        &self,
        action: &str,
        mut params: BTreeMap<String, String>,
        nonce: &str,
        timestamp: &str,
    ) -> Result<String> {
        let common = [
            ("Action", action),
            ("Format", "JSON"),
            ("Version", API_VERSION),
            ("AccessKeyId", self.access_key_id.as_str()),
            ("SignatureMethod", SIGNATURE_METHOD),
            ("SignatureVersion", SIGNATURE_VERSION),
            ("SignatureNonce", nonce),
            ("Timestamp", timestamp),
        ];
        for (k, v) in common {
            params.insert(k.to_string(), v.to_string());
        }

        let canonical = canonical_query(&params);
        let signature = sign(&self.access_key_secret, &string_to_sign("GET", &canonical))?;
        Ok(format!(
            "{}&Signature={}",
            canonical,
            percent_encode(&signature)
        ))
    }
}
