//! Command implementations behind the CLI.
//!
//! Commands print results to stdout and report user-facing outcomes through
//! a [`NoticeSink`]. A selection that is not ready yields [`NotReady`]; a
//! failure already shown as a notice carries [`Reported`]. The binary maps
//! both to a non-zero exit without repeating the notice.

pub mod config;
mod copy;
mod detect;
mod download;
mod url;

use std::fmt;

use crate::{
    notice::{Notice, NoticeSink},
    resolver::{CATALOG_URL, Platform, Resolver, url_template},
};

pub use copy::copy;
pub use detect::detect;
pub use download::{DownloadRequest, download};
pub use url::url;

/// The selected version is not a dotted-quad, so there is no URL to present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotReady {
    pub version: String,
}

impl fmt::Display for NotReady {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            write!(f, "No Chrome version given")
        } else {
            write!(
                f,
                "'{}' is not a Chrome version like 131.0.6778.140",
                self.version
            )
        }
    }
}

impl std::error::Error for NotReady {}

/// Marks a failure that has already been shown as a notice.
///
/// Attached as context so the cause chain stays inspectable; the binary exits
/// non-zero without printing it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reported;

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failure already reported")
    }
}

/// The resolver's URL under `base_url`, or a "Version not ready" notice and
/// a [`NotReady`] error.
pub(crate) fn require_url(
    resolver: &Resolver,
    base_url: &str,
    sink: &dyn NoticeSink,
) -> Result<String, NotReady> {
    resolver.download_url_with_base(base_url).ok_or_else(|| {
        let err = NotReady {
            version: resolver.version().to_string(),
        };
        sink.show(&Notice::destructive("Version not ready", err.to_string()));
        err
    })
}

/// Prints the URL template and where to look up published versions.
pub fn template() {
    println!("{}", url_template());
    println!();
    println!("Replace ${{v}} with a Chrome version and ${{p}} with a platform:");
    for platform in Platform::ALL {
        println!("  {:<6} {}", platform.as_str(), platform.label());
    }
    println!("Published versions: {}", CATALOG_URL);
}
