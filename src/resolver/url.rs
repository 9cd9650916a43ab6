//! Download URL derivation for the Chrome for Testing bucket.

use super::Platform;

/// Root of the public Chrome for Testing bucket.
pub const DEFAULT_BASE_URL: &str = "https://storage.googleapis.com/chrome-for-testing-public";

/// Human-browsable list of published Chrome for Testing versions.
pub const CATALOG_URL: &str = "https://googlechromelabs.github.io/chrome-for-testing/";

/// Builds the ChromeDriver archive URL for a version and platform.
///
/// Pure and total. The caller is responsible for only presenting the result
/// once the version has validated; nothing is escaped or re-checked here.
pub fn derive_download_url(version: &str, platform: Platform) -> String {
    derive_download_url_with_base(DEFAULT_BASE_URL, version, platform)
}

/// Same layout as [`derive_download_url`] under a different bucket root.
pub fn derive_download_url_with_base(base_url: &str, version: &str, platform: Platform) -> String {
    format!(
        "{}/{}/{}/chromedriver-{}.zip",
        base_url.trim_end_matches('/'),
        version,
        platform,
        platform
    )
}

/// The URL with `${v}` and `${p}` placeholders, for users who fill it in by hand.
pub fn url_template() -> String {
    format!("{}/${{v}}/${{p}}/chromedriver-${{p}}.zip", DEFAULT_BASE_URL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_download_url_win64() {
        assert_eq!(
            derive_download_url("131.0.6778.140", Platform::Win64),
            "https://storage.googleapis.com/chrome-for-testing-public/131.0.6778.140/win64/chromedriver-win64.zip"
        );
    }

    #[test]
    fn test_derive_download_url_win32() {
        assert_eq!(
            derive_download_url("120.0.0.1", Platform::Win32),
            "https://storage.googleapis.com/chrome-for-testing-public/120.0.0.1/win32/chromedriver-win32.zip"
        );
    }

    #[test]
    fn test_derive_does_not_revalidate() {
        // Total function: garbage in, garbage out
        assert_eq!(
            derive_download_url("abc", Platform::Win64),
            "https://storage.googleapis.com/chrome-for-testing-public/abc/win64/chromedriver-win64.zip"
        );
    }

    #[test]
    fn test_derive_with_base_trims_trailing_slash() {
        assert_eq!(
            derive_download_url_with_base("http://127.0.0.1:1234/", "1.2.3.4", Platform::Win32),
            "http://127.0.0.1:1234/1.2.3.4/win32/chromedriver-win32.zip"
        );
    }

    #[test]
    fn test_url_template() {
        assert_eq!(
            url_template(),
            "https://storage.googleapis.com/chrome-for-testing-public/${v}/${p}/chromedriver-${p}.zip"
        );
    }
}
