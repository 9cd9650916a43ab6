//! Dotted-quad version validation.

use once_cell::sync::Lazy;
use regex::Regex;

// ASCII digits only; `\d` would also accept other Unicode digit classes.
static DOTTED_QUAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+\.[0-9]+$").expect("dotted-quad pattern is valid")
});

/// Returns true when `version` is exactly four dot-separated integers.
///
/// No trimming and no range checks: `"0.0.0.0"` and
/// `"99999999999.1.2.3"` are both well-formed, `" 1.2.3.4"` is not.
pub fn is_valid_version(version: &str) -> bool {
    DOTTED_QUAD.is_match(version)
}
