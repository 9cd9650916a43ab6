//! Archive extraction.
//!
//! ChromeDriver is published as a zip with one top-level directory
//! (`chromedriver-win64/`); extraction drops that directory so the driver
//! lands directly in the target.

mod zip;

pub use zip::ZipExtractor;
