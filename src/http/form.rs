//! URL-encoded form handling for POST forwarding.
//!
//! # Responsibilities
//! - Decide from the content type whether the body is a form
//! - Parse body and query strictly (bad escapes and `;` separators fail)
//! - Re-encode the merged form for the outbound body
//!
//! # Design Decisions
//! - Body pairs come before query pairs for the same key
//! - Encoding sorts keys so the outbound body is deterministic

use std::collections::BTreeMap;

use axum::http::{header, HeaderMap};
use url::form_urlencoded;

use crate::error::ProxyError;

const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";
const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// Parsed form values, keyed by name, values in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    values: BTreeMap<String, Vec<String>>,
}

impl Form {
    /// Append pairs from a raw url-encoded string.
    pub fn extend_from_encoded(&mut self, raw: &[u8]) -> Result<(), ProxyError> {
        validate_encoding(raw)?;
        for (key, value) in form_urlencoded::parse(raw) {
            self.values
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }
        Ok(())
    }

    /// Encode as `application/x-www-form-urlencoded`, keys sorted.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.values {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }

    /// `key:[v1 v2]` entries joined with `; `, for trace logging.
    pub fn describe(&self) -> String {
        self.values
            .iter()
            .map(|(key, values)| format!("{}:[{}]", key, values.join(" ")))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Whether the declared content type carries a url-encoded form body.
///
/// A missing content type counts as `application/octet-stream`.
pub fn is_form_body(headers: &HeaderMap) -> Result<bool, ProxyError> {
    let content_type = match headers.get(header::CONTENT_TYPE) {
        Some(value) => value
            .to_str()
            .map_err(|_| ProxyError::FormParse("content type is not valid text".into()))?,
        None => DEFAULT_MEDIA_TYPE,
    };

    let media_type = content_type.split(';').next().unwrap_or_default().trim();
    match media_type.split_once('/') {
        Some((kind, subtype)) if is_token(kind) && is_token(subtype) => {
            Ok(media_type.eq_ignore_ascii_case(FORM_MEDIA_TYPE))
        }
        _ => Err(ProxyError::FormParse(format!(
            "malformed media type '{}'",
            content_type
        ))),
    }
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
        })
}

/// Reject `;` separators and `%` escapes that are not followed by two hex digits.
fn validate_encoding(raw: &[u8]) -> Result<(), ProxyError> {
    let mut i = 0;
    while i < raw.len() {
        match raw[i] {
            b';' => {
                return Err(ProxyError::FormParse("invalid semicolon separator".into()));
            }
            b'%' => {
                let escape = raw.get(i + 1..i + 3);
                match escape {
                    Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => i += 3,
                    _ => {
                        let end = (i + 3).min(raw.len());
                        return Err(ProxyError::FormParse(format!(
                            "invalid URL escape '{}'",
                            String::from_utf8_lossy(&raw[i..end])
                        )));
                    }
                }
            }
            _ => i += 1,
        }
    }
    Ok(())
}
