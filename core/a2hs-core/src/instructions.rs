//! Manual install instructions for platforms without a native prompt.

use std::fmt;

use serde::Serialize;

use crate::platform::PlatformFamily;

/// A fixed three-step instruction block for one platform family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InstallInstructions {
    pub family: PlatformFamily,
    pub title: &'static str,
    pub steps: [&'static str; 3],
}

const IOS: InstallInstructions = InstallInstructions {
    family: PlatformFamily::Ios,
    title: "Install on iPhone or iPad",
    steps: [
        "Tap the Share button in Safari's toolbar.",
        "Scroll down and tap \"Add to Home Screen\".",
        "Tap \"Add\" in the top-right corner to confirm.",
    ],
};

const ANDROID: InstallInstructions = InstallInstructions {
    family: PlatformFamily::Android,
    title: "Install on Android",
    steps: [
        "Tap the browser menu (three dots) in the top-right corner.",
        "Tap \"Install app\" or \"Add to Home screen\".",
        "Tap \"Install\" to confirm.",
    ],
};

const DESKTOP: InstallInstructions = InstallInstructions {
    family: PlatformFamily::Other,
    title: "Install on this computer",
    steps: [
        "Look for the install icon at the right end of the address bar.",
        "Or open the browser menu and choose \"Install app\".",
        "Confirm the installation when prompted.",
    ],
};

/// Instructions for `family`. Pure and deterministic.
pub fn instructions_for(family: PlatformFamily) -> InstallInstructions {
    match family {
        PlatformFamily::Ios => IOS,
        PlatformFamily::Android => ANDROID,
        PlatformFamily::Other => DESKTOP,
    }
}

impl InstallInstructions {
    /// Numbered text block, one step per line.
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.steps.len() + 1);
        lines.push(self.title.to_string());
        for (index, step) in self.steps.iter().enumerate() {
            lines.push(format!("{}. {}", index + 1, step));
        }
        lines.join("\n")
    }
}

impl fmt::Display for InstallInstructions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
