//! Virtual-time scenario runner.
//!
//! Replays a script of timed events against a controller on a [`ManualClock`].
//! Each distinct instant is one cooperative tick: host signals first
//! (`installable`, `installed`), then the fallback timer, then user-side events
//! (`trigger`, `accept`, `decline`, `dismiss`) in script order. So
//! `1000:trigger` followed by `1000:accept` answers the prompt just shown.
//! Used by the CLI `simulate` command.
//!
//! Script steps parse from `<ms>:<event>`, e.g. `500:installable`.

use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::clock::{Clock, ManualClock};
use crate::controller::{
    ControllerState, HostEvent, InstallController, InstallSignal, PromptOutcome,
    RecordingPrompt, Transition, TriggerOutcome,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptedEvent {
    /// Host fires the installability signal.
    Installable,
    /// Host fires the install-completion signal.
    Installed,
    /// User answers the native prompt with accept.
    Accept,
    /// User answers the native prompt with decline.
    Decline,
    /// User presses the install button.
    Trigger,
    /// User closes the install card.
    Dismiss,
}

impl ScriptedEvent {
    fn is_host_event(&self) -> bool {
        matches!(self, Self::Installable | Self::Installed)
    }
}

impl FromStr for ScriptedEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "installable" | "signal" => Ok(Self::Installable),
            "installed" => Ok(Self::Installed),
            "accept" => Ok(Self::Accept),
            "decline" => Ok(Self::Decline),
            "trigger" => Ok(Self::Trigger),
            "dismiss" => Ok(Self::Dismiss),
            other => Err(format!("Unknown scripted event: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptStep {
    pub at: Duration,
    pub event: ScriptedEvent,
}

impl FromStr for ScriptStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (at, event) = s
            .split_once(':')
            .ok_or_else(|| format!("Expected <ms>:<event>, got {}", s))?;
        let ms: u64 = at
            .trim()
            .parse()
            .map_err(|e| format!("Invalid time {}: {}", at, e))?;
        Ok(Self {
            at: Duration::from_millis(ms),
            event: event.parse()?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scenario {
    steps: Vec<ScriptStep>,
}

impl Scenario {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at_ms(mut self, ms: u64, event: ScriptedEvent) -> Self {
        self.steps.push(ScriptStep {
            at: Duration::from_millis(ms),
            event,
        });
        self
    }

    pub fn from_steps(steps: Vec<ScriptStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TriggerRecord {
    pub at_ms: u64,
    pub outcome: TriggerOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub states: Vec<ControllerState>,
    pub transitions: Vec<Transition>,
    pub triggers: Vec<TriggerRecord>,
    pub native_prompts: usize,
    pub final_state: ControllerState,
}

/// Runs `scenario` against `controller` until `until` (inclusive).
pub fn run_scenario(
    controller: &mut InstallController,
    clock: &ManualClock,
    scenario: &Scenario,
    until: Duration,
) -> ScenarioReport {
    let mut steps = scenario.steps.clone();
    // Stable: same-instant steps keep script order.
    steps.sort_by_key(|s| s.at);
    let mut pending = steps.into_iter().peekable();

    let prompt = RecordingPrompt::new();
    let mut triggers = Vec::new();

    loop {
        let next_step = pending.peek().map(|s| s.at);
        let next_timer = controller.next_deadline();
        let at = match (next_step, next_timer) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (None, None) => break,
        };
        if at > until {
            break;
        }
        clock.set(at);

        let mut batch = Vec::new();
        while let Some(step) = pending.next_if(|s| s.at == at) {
            batch.push(step.event);
        }
        debug!(at_ms = at.as_millis() as u64, events = ?batch, "Scenario tick");

        let host_events = batch.iter().filter(|e| e.is_host_event()).map(|e| match e {
            ScriptedEvent::Installable => HostEvent::Installable(InstallSignal::new(prompt.clone())),
            _ => HostEvent::Installed,
        });
        controller.tick(host_events);

        for event in batch.iter().filter(|e| !e.is_host_event()) {
            match event {
                ScriptedEvent::Trigger => triggers.push(TriggerRecord {
                    at_ms: clock.now().as_millis() as u64,
                    outcome: controller.trigger(),
                }),
                ScriptedEvent::Accept => controller.on_prompt_outcome(PromptOutcome::Accepted),
                ScriptedEvent::Decline => controller.on_prompt_outcome(PromptOutcome::Dismissed),
                _ => controller.dismiss(),
            }
        }
    }

    ScenarioReport {
        states: controller.state_sequence(),
        transitions: controller.transitions().to_vec(),
        triggers,
        native_prompts: prompt.prompt_calls(),
        final_state: controller.state(),
    }
}
