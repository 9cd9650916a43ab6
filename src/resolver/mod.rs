//! Version/platform selection and download URL resolution.
//!
//! The [`Resolver`] keeps the current selection, classifies it as
//! [`ValidationState::Ready`] or [`ValidationState::Invalid`] on every change,
//! and hands out a download URL only in the ready state.

mod platform;
mod url;
mod version;

use log::debug;

use crate::detect::DetectionResult;

pub use platform::Platform;
pub use url::{
    CATALOG_URL, DEFAULT_BASE_URL, derive_download_url, derive_download_url_with_base,
    url_template,
};
pub use version::is_valid_version;

/// Readiness of the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationState {
    #[default]
    Invalid,
    Ready,
}

impl ValidationState {
    pub fn of(version: &str) -> Self {
        if is_valid_version(version) {
            ValidationState::Ready
        } else {
            ValidationState::Invalid
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ValidationState::Ready)
    }
}

/// Current version/platform selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolver {
    version: String,
    platform: Platform,
    state: ValidationState,
    error: Option<String>,
}

impl Resolver {
    /// Empty version, default platform, not ready.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn state(&self) -> ValidationState {
        self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Stores the trimmed input whether or not it is well-formed.
    pub fn set_version(&mut self, raw: &str) -> ValidationState {
        self.version = raw.trim().to_string();
        self.error = None;
        self.revalidate()
    }

    pub fn set_platform(&mut self, platform: Platform) -> ValidationState {
        self.platform = platform;
        self.error = None;
        self.revalidate()
    }

    /// Copies a detection result into the selection.
    ///
    /// A detected version replaces the current one only if it is well-formed.
    /// A detected bitness always picks a platform (`"64"` is win64, anything
    /// else win32).
    pub fn apply_detected_info(&mut self, result: &DetectionResult) -> ValidationState {
        if let Some(version) = result.version.as_deref()
            && is_valid_version(version)
        {
            debug!("Applying detected version {}", version);
            self.version = version.to_string();
        }

        if let Some(bitness) = result.bitness.as_deref() {
            self.platform = Platform::from_bitness(bitness);
            debug!("Applying detected bitness {} as {}", bitness, self.platform);
        }

        self.error = None;
        self.revalidate()
    }

    /// The download URL, or `None` while the version is not well-formed.
    pub fn download_url(&self) -> Option<String> {
        self.state
            .is_ready()
            .then(|| derive_download_url(&self.version, self.platform))
    }

    /// Like [`Resolver::download_url`] with a different bucket root.
    pub fn download_url_with_base(&self, base_url: &str) -> Option<String> {
        self.state
            .is_ready()
            .then(|| derive_download_url_with_base(base_url, &self.version, self.platform))
    }

    /// Suggested local file name for the archive: `{version}_{platform}.zip`.
    pub fn archive_file_name(&self) -> String {
        format!("{}_{}.zip", self.version, self.platform)
    }

    /// Records a failure of a user-triggered action. Cleared by the next change.
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn revalidate(&mut self) -> ValidationState {
        self.state = ValidationState::of(&self.version);
        self.state
    }
}
