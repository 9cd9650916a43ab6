use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ChromeDriver build platform.
///
/// The value (`win64`, `win32`) is the identifier used in bucket paths; the
/// label is what a user sees when picking one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Win64,
    Win32,
}

impl Platform {
    /// Every selectable platform, in display order. The first entry is the default.
    pub const ALL: [Platform; 2] = [Platform::Win64, Platform::Win32];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Win64 => "win64",
            Platform::Win32 => "win32",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Platform::Win64 => "Win64",
            Platform::Win32 => "Win32",
        }
    }

    /// Maps a detected bitness onto a platform: `"64"` is win64, anything else win32.
    pub fn from_bitness(bitness: &str) -> Self {
        if bitness == "64" {
            Platform::Win64
        } else {
            Platform::Win32
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "win64" => Ok(Platform::Win64),
            "win32" => Ok(Platform::Win32),
            _ => anyhow::bail!("Unknown platform: {}. Expected win64 or win32.", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_first_platform() {
        assert_eq!(Platform::default(), Platform::ALL[0]);
        assert_eq!(Platform::default(), Platform::Win64);
    }

    #[test]
    fn test_display_uses_url_identifier() {
        assert_eq!(Platform::Win64.to_string(), "win64");
        assert_eq!(Platform::Win32.to_string(), "win32");
        assert_eq!(Platform::Win64.label(), "Win64");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("win64".parse::<Platform>().unwrap(), Platform::Win64);
        assert_eq!("WIN32".parse::<Platform>().unwrap(), Platform::Win32);
        assert!("linux64".parse::<Platform>().is_err());
    }

    #[test]
    fn test_from_bitness() {
        assert_eq!(Platform::from_bitness("64"), Platform::Win64);
        assert_eq!(Platform::from_bitness("32"), Platform::Win32);
        // Anything that is not exactly "64" falls back to the 32-bit build
        assert_eq!(Platform::from_bitness("arm"), Platform::Win32);
        assert_eq!(Platform::from_bitness(""), Platform::Win32);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Platform::Win32).unwrap();
        assert_eq!(json, "\"win32\"");
        let parsed: Platform = serde_json::from_str("\"win64\"").unwrap();
        assert_eq!(parsed, Platform::Win64);
    }
}
