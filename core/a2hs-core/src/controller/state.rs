//! Lifecycle states of the install prompt.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControllerState {
    Idle,
    AlreadyInstalled,
    DismissedPersisted,
    AwaitingSignal,
    PromptAvailable,
    Prompting,
    Accepted,
    FallbackAvailable,
    Installed,
}

impl ControllerState {
    pub const ALL: [ControllerState; 9] = [
        Self::Idle,
        Self::AlreadyInstalled,
        Self::DismissedPersisted,
        Self::AwaitingSignal,
        Self::PromptAvailable,
        Self::Prompting,
        Self::Accepted,
        Self::FallbackAvailable,
        Self::Installed,
    ];

    /// No user action or installability signal changes this state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::AlreadyInstalled | Self::DismissedPersisted | Self::Accepted | Self::Installed
        )
    }

    /// The install-completion signal still moves this state to `installed`.
    /// `accepted` is included: completion is the authoritative install fact.
    pub fn accepts_completion(&self) -> bool {
        !matches!(
            self,
            Self::AlreadyInstalled | Self::DismissedPersisted | Self::Installed
        )
    }

    /// Something install-related should be rendered.
    pub fn is_actionable(&self) -> bool {
        matches!(self, Self::PromptAvailable | Self::FallbackAvailable)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AlreadyInstalled => "alreadyInstalled",
            Self::DismissedPersisted => "dismissedPersisted",
            Self::AwaitingSignal => "awaitingSignal",
            Self::PromptAvailable => "promptAvailable",
            Self::Prompting => "prompting",
            Self::Accepted => "accepted",
            Self::FallbackAvailable => "fallbackAvailable",
            Self::Installed => "installed",
        }
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
