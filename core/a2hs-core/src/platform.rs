//! Platform family detection from the user-agent string.
//!
//! Only used to pick which manual-install instructions to show, so the
//! classification is deliberately coarse.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static RE_IOS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(iPhone|iPad|iPod)\b").unwrap());
static RE_ANDROID: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bAndroid\b").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformFamily {
    Ios,
    Android,
    Other,
}

impl PlatformFamily {
    /// Classifies a user-agent string. iOS wins over Android when both match.
    pub fn detect(user_agent: &str) -> Self {
        if RE_IOS.is_match(user_agent) {
            PlatformFamily::Ios
        } else if RE_ANDROID.is_match(user_agent) {
            PlatformFamily::Android
        } else {
            PlatformFamily::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Ios => "iOS",
            Self::Android => "Android",
            Self::Other => "Desktop",
        }
    }
}

impl fmt::Display for PlatformFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1";
    const IPAD: &str = "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Mobile/15E148 Safari/604.1";
    const PIXEL: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Mobile Safari/537.36";
    const DESKTOP: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

    #[test]
    fn test_detect_iphone() {
        assert_eq!(PlatformFamily::detect(IPHONE), PlatformFamily::Ios);
    }

    #[test]
    fn test_detect_ipad() {
        assert_eq!(PlatformFamily::detect(IPAD), PlatformFamily::Ios);
    }

    #[test]
    fn test_detect_android() {
        assert_eq!(PlatformFamily::detect(PIXEL), PlatformFamily::Android);
    }

    #[test]
    fn test_detect_desktop() {
        assert_eq!(PlatformFamily::detect(DESKTOP), PlatformFamily::Other);
    }

    #[test]
    fn test_detect_empty_is_other() {
        assert_eq!(PlatformFamily::detect(""), PlatformFamily::Other);
    }

    #[test]
    fn test_detect_ignores_substrings() {
        assert_eq!(PlatformFamily::detect("Androidish/1.0"), PlatformFamily::Other);
    }
}
