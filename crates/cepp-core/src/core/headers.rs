// crates/cepp-core/src/core/headers.rs
// ============================================================================
// Module: CEPP Header Extraction
// Description: Collects CEPP header values from mail header lists.
// Purpose: Detect absent or duplicated CEPP headers before parsing.
// Dependencies: none
// ============================================================================

//! ## Overview
//! A message carries its certificate in the `CEPP-Data` and `CEPP-Signature`
//! headers. Header names match case-insensitively. Every occurrence is kept so
//! verification can fail closed when a header is repeated.
//!
//! [`CeppHeaders::from_message`] reads the header block of a raw RFC 5322
//! message (up to the first blank line) and unfolds continuation lines.

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header carrying the canonical certificate record.
pub const DATA_HEADER: &str = "CEPP-Data";
/// Header carrying the signature over the data header.
pub const SIGNATURE_HEADER: &str = "CEPP-Signature";
/// Header carrying the sender address.
pub const FROM_HEADER: &str = "From";

// ============================================================================
// SECTION: Header Set
// ============================================================================

/// CEPP header values collected from one message.
///
/// # Invariants
/// - Values are kept verbatim apart from unfolding and trimming the single
///   space after the colon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CeppHeaders {
    /// Every `CEPP-Data` value in message order.
    data: Vec<String>,
    /// Every `CEPP-Signature` value in message order.
    signature: Vec<String>,
    /// First `From` value, when present.
    from: Option<String>,
}

impl CeppHeaders {
    /// Builds a header set from at most one value per CEPP header.
    #[must_use]
    pub fn new(data: Option<String>, signature: Option<String>) -> Self {
        Self {
            data: data.into_iter().collect(),
            signature: signature.into_iter().collect(),
            from: None,
        }
    }

    /// Collects CEPP headers from `(name, value)` pairs.
    pub fn from_pairs<I, N, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<String>,
    {
        let mut headers = Self::default();
        for (name, value) in pairs {
            headers.push(name.as_ref(), value.into());
        }
        headers
    }

    /// Collects CEPP headers from the header block of a raw message.
    #[must_use]
    pub fn from_message(raw: &str) -> Self {
        let mut headers = Self::default();
        let mut current: Option<(String, String)> = None;
        for line in raw.lines() {
            if line.is_empty() {
                break;
            }
            if line.starts_with([' ', '\t']) {
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(line);
                }
                continue;
            }
            if let Some((name, value)) = current.take() {
                headers.push(&name, value);
            }
            if let Some((name, value)) = line.split_once(':') {
                let value = value.strip_prefix(' ').unwrap_or(value);
                current = Some((name.trim().to_string(), value.to_string()));
            }
        }
        if let Some((name, value)) = current {
            headers.push(&name, value);
        }
        headers
    }

    /// Records one header occurrence.
    fn push(&mut self, name: &str, value: String) {
        if name.eq_ignore_ascii_case(DATA_HEADER) {
            self.data.push(value);
        } else if name.eq_ignore_ascii_case(SIGNATURE_HEADER) {
            self.signature.push(value);
        } else if name.eq_ignore_ascii_case(FROM_HEADER) && self.from.is_none() {
            self.from = Some(value);
        }
    }

    /// Returns the data and signature values when each appears exactly once.
    #[must_use]
    pub fn single_pair(&self) -> Option<(&str, &str)> {
        match (self.data.as_slice(), self.signature.as_slice()) {
            ([data], [signature]) => Some((data.as_str(), signature.as_str())),
            _ => None,
        }
    }

    /// Returns every `CEPP-Data` value.
    #[must_use]
    pub fn data_values(&self) -> &[String] {
        &self.data
    }

    /// Returns every `CEPP-Signature` value.
    #[must_use]
    pub fn signature_values(&self) -> &[String] {
        &self.signature
    }

    /// Returns the first `From` header value.
    #[must_use]
    pub fn from(&self) -> Option<&str> {
        self.from.as_deref()
    }
}
