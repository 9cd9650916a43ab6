//! Heuristics over the free-text User-Agent string.

use once_cell::sync::Lazy;
use regex::Regex;

static CHROME_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Chrome/([0-9.]+)").expect("chrome token pattern is valid"));

static SIXTY_FOUR_BIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)WOW64|Win64|x64").expect("64-bit pattern is valid"));

static THIRTY_TWO_BIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Win32|i686|x86").expect("32-bit pattern is valid"));

/// Digits and dots following the first `Chrome/` token.
///
/// Not validated here; `Chrome/120.0` yields `"120.0"`.
pub fn chrome_version(user_agent: &str) -> Option<String> {
    CHROME_TOKEN
        .captures(user_agent)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// `"64"` or `"32"` from architecture markers, 64-bit markers winning.
pub fn bitness(user_agent: &str) -> Option<&'static str> {
    if SIXTY_FOUR_BIT.is_match(user_agent) {
        Some("64")
    } else if THIRTY_TWO_BIT.is_match(user_agent) {
        Some("32")
    } else {
        None
    }
}
