//! High-entropy client hints.
//!
//! Mirrors the object a browser returns from
//! `navigator.userAgentData.getHighEntropyValues(["fullVersionList", "bitness"])`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Hint names this tool asks for.
pub const REQUESTED_HINTS: [&str; 2] = ["fullVersionList", "bitness"];

static CHROME_BRAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Chrom(e|ium)").expect("brand pattern is valid"));

/// One `{brand, version}` entry of `fullVersionList`. Either side may be
/// missing or `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandVersion {
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// The subset of high-entropy values the detector reads. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighEntropyValues {
    #[serde(default)]
    pub full_version_list: Vec<BrandVersion>,
    #[serde(default)]
    pub bitness: Option<String>,
}

impl HighEntropyValues {
    /// Version of the first Chrome or Chromium brand in the list.
    pub fn chrome_version(&self) -> Option<String> {
        self.full_version_list
            .iter()
            .find(|entry| {
                entry
                    .brand
                    .as_deref()
                    .is_some_and(|brand| CHROME_BRAND.is_match(brand))
            })
            .and_then(|entry| entry.version.clone())
            .filter(|version| !version.is_empty())
    }

    /// The reported bitness, as given. Empty counts as absent.
    pub fn bitness(&self) -> Option<String> {
        self.bitness.clone().filter(|bitness| !bitness.is_empty())
    }
}

/// Something that can answer a high-entropy client hints request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientHintsSource: Send + Sync {
    /// Resolves [`REQUESTED_HINTS`]. May fail; callers treat failure as "no hints".
    async fn high_entropy_values(&self) -> Result<HighEntropyValues>;
}

/// Client hints captured elsewhere and handed over as JSON text.
///
/// Parsing is deferred to the request so that malformed input behaves like a
/// rejected browser call.
#[derive(Debug, Clone)]
pub struct JsonClientHints {
    raw: String,
}

impl JsonClientHints {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }
}

#[async_trait]
impl ClientHintsSource for JsonClientHints {
    async fn high_entropy_values(&self) -> Result<HighEntropyValues> {
        serde_json::from_str(&self.raw).context("Failed to parse client hints JSON")
    }
}
