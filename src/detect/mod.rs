//! Best-effort detection of the visitor's Chrome version and bitness.
//!
//! Detection is tiered: the structured client hints are asked first, then the
//! User-Agent string is parsed. Each tier is a provider returning `Option`; the
//! first `Some` wins. Nothing here returns an error. A source that is missing,
//! fails or returns junk simply leaves the corresponding field absent.

mod hints;
mod user_agent;

use log::debug;
use serde::Serialize;

pub use hints::{
    BrandVersion, ClientHintsSource, HighEntropyValues, JsonClientHints, REQUESTED_HINTS,
};

#[cfg(test)]
pub use hints::MockClientHintsSource;

/// What detection found. Either field may be absent independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetectionResult {
    pub version: Option<String>,
    pub bitness: Option<String>,
}

impl DetectionResult {
    pub fn is_empty(&self) -> bool {
        self.version.is_none() && self.bitness.is_none()
    }

    /// One-line description, e.g. `Version: 131.0.6778.140 • Platform: 64-bit`.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(version) = &self.version {
            parts.push(format!("Version: {}", version));
        }
        if let Some(bitness) = &self.bitness {
            parts.push(format!("Platform: {}-bit", bitness));
        }
        parts.join(" • ")
    }
}

/// Raw signals gathered from the environment before the providers run.
#[derive(Debug, Clone, Default)]
pub struct Signals {
    pub high_entropy: Option<HighEntropyValues>,
    pub user_agent: Option<String>,
}

type Provider = fn(&Signals) -> Option<String>;

const VERSION_PROVIDERS: &[Provider] = &[version_from_hints, version_from_user_agent];
const BITNESS_PROVIDERS: &[Provider] = &[bitness_from_hints, bitness_from_user_agent];

fn version_from_hints(signals: &Signals) -> Option<String> {
    signals.high_entropy.as_ref()?.chrome_version()
}

fn version_from_user_agent(signals: &Signals) -> Option<String> {
    user_agent::chrome_version(signals.user_agent.as_deref()?)
}

fn bitness_from_hints(signals: &Signals) -> Option<String> {
    signals.high_entropy.as_ref()?.bitness()
}

fn bitness_from_user_agent(signals: &Signals) -> Option<String> {
    user_agent::bitness(signals.user_agent.as_deref()?).map(str::to_string)
}

fn first_success(providers: &[Provider], signals: &Signals) -> Option<String> {
    providers.iter().find_map(|provider| provider(signals))
}

/// Runs the provider chains over already-gathered signals.
pub fn detect_from_signals(signals: &Signals) -> DetectionResult {
    DetectionResult {
        version: first_success(VERSION_PROVIDERS, signals),
        bitness: first_success(BITNESS_PROVIDERS, signals),
    }
}

/// Gathers signals and runs detection.
///
/// `client_hints` is `None` when the environment has no high-entropy API.
/// A failing source is logged at debug level and treated the same as a
/// missing one.
#[tracing::instrument(skip(client_hints))]
pub async fn detect_environment(
    client_hints: Option<&dyn ClientHintsSource>,
    user_agent: Option<&str>,
) -> DetectionResult {
    let high_entropy = match client_hints {
        Some(source) => {
            debug!("Requesting client hints {:?}", REQUESTED_HINTS);
            match source.high_entropy_values().await {
                Ok(values) => Some(values),
                Err(e) => {
                    debug!("Client hints unavailable, falling back to User-Agent: {:#}", e);
                    None
                }
            }
        }
        None => None,
    };

    let signals = Signals {
        high_entropy,
        user_agent: user_agent.map(str::to_string),
    };

    let result = detect_from_signals(&signals);
    debug!("Detection result: {:?}", result);
    result
}
