use std::fmt;
use std::time::Duration;

use serde::Serialize;

use super::state::ControllerState;

/// What caused a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionCause {
    Standalone,
    StoredDismissal,
    Armed,
    Signal,
    FallbackTimer,
    Trigger,
    PromptAccepted,
    PromptDeclined,
    Dismiss,
    InstallCompleted,
}

impl TransitionCause {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Standalone => "standalone",
            Self::StoredDismissal => "stored_dismissal",
            Self::Armed => "armed",
            Self::Signal => "signal",
            Self::FallbackTimer => "fallback_timer",
            Self::Trigger => "trigger",
            Self::PromptAccepted => "prompt_accepted",
            Self::PromptDeclined => "prompt_declined",
            Self::Dismiss => "dismiss",
            Self::InstallCompleted => "install_completed",
        }
    }
}

impl fmt::Display for TransitionCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: ControllerState,
    pub to: ControllerState,
    pub cause: TransitionCause,
    pub at_ms: u64,
}

impl Transition {
    pub(crate) fn new(
        from: ControllerState,
        to: ControllerState,
        cause: TransitionCause,
        at: Duration,
    ) -> Self {
        Self {
            from,
            to,
            cause,
            at_ms: at.as_millis() as u64,
        }
    }
}

pub fn format_transition_trace(transitions: &[Transition]) -> String {
    if transitions.is_empty() {
        return "PromptTrace (no transitions)".to_string();
    }

    transitions
        .iter()
        .map(|t| {
            format!(
                "PromptTrace t={}ms {} -> {} cause={}",
                t.at_ms, t.from, t.to, t.cause
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
