//! Install-Prompt Lifecycle Controller
//!
//! Arbitrates between the host's installability signal and a fallback path,
//! persists dismissal, and exposes its state for rendering.
//!
//! ```text
//! idle ─┬─ standalone ──────────────▶ alreadyInstalled
//!       ├─ stored dismissal ────────▶ dismissedPersisted
//!       └─ arm listener + timer ────▶ awaitingSignal
//!
//! awaitingSignal ── signal ─────────▶ promptAvailable ── trigger ──▶ prompting
//! awaitingSignal ── timer expiry ───▶ fallbackAvailable
//! fallbackAvailable ── late signal ─▶ promptAvailable
//! prompting ── accepted ────────────▶ accepted
//! prompting ── declined ────────────▶ promptAvailable (fresh handle) | fallbackAvailable
//! any live state ── dismiss ────────▶ dismissedPersisted
//! any live state ── completion ─────▶ installed
//! ```
//!
//! # Event Model
//!
//! Single-threaded and cooperative. The embedding runtime pushes host events in
//! with [`InstallController::on_install_signal`] / [`InstallController::on_installed`]
//! and drives the fallback timer with [`InstallController::poll`]. Use
//! [`InstallController::tick`] when several events become ready together: host
//! events are applied before the timer is checked, so a signal always beats
//! a timer expiring in the same tick.
//!
//! Stale events (outcome with nothing outstanding, signals after a terminal
//! state, a second trigger on a consumed handle) are ignored, never faults.

mod signal;
mod state;
mod timer;
mod trace;

pub use signal::{DeferredPrompt, InstallSignal, PromptOutcome, RecordingPrompt};
pub use state::ControllerState;
pub use timer::FallbackTimer;
pub use trace::{format_transition_trace, Transition, TransitionCause};

use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::{FallbackMode, PromptConfig};
use crate::dismissal::DismissalStore;
use crate::host::PlatformHost;
use crate::instructions::{instructions_for, InstallInstructions};
use crate::platform::PlatformFamily;

/// Event delivered by the host platform.
#[derive(Debug)]
pub enum HostEvent {
    Installable(InstallSignal),
    Installed,
    Outcome(PromptOutcome),
}

/// Result of a user-initiated trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggerOutcome {
    /// The native prompt was shown; its answer arrives as a [`PromptOutcome`].
    NativePrompt,
    /// No native prompt exists; show these steps instead.
    ManualInstructions { instructions: InstallInstructions },
    /// Nothing to trigger in the current state.
    Unavailable,
}

pub struct InstallController {
    config: PromptConfig,
    host: Rc<dyn PlatformHost>,
    store: DismissalStore,
    clock: Rc<dyn Clock>,
    family: PlatformFamily,
    state: ControllerState,
    signal: Option<InstallSignal>,
    timer: FallbackTimer,
    listening: bool,
    signal_received_at: Option<Duration>,
    transitions: Vec<Transition>,
}

impl InstallController {
    /// Builds the controller and resolves its initial state immediately.
    pub fn new(
        config: PromptConfig,
        host: Rc<dyn PlatformHost>,
        store: DismissalStore,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let family = PlatformFamily::detect(&host.user_agent());
        let mut controller = Self {
            config,
            host,
            store,
            clock,
            family,
            state: ControllerState::Idle,
            signal: None,
            timer: FallbackTimer::default(),
            listening: false,
            signal_received_at: None,
            transitions: Vec::new(),
        };
        controller.initialize();
        controller
    }

    fn initialize(&mut self) {
        if self.host.is_standalone() {
            self.transition(ControllerState::AlreadyInstalled, TransitionCause::Standalone);
            return;
        }

        if self.store.has(self.config.dismissal_scope) {
            self.transition(
                ControllerState::DismissedPersisted,
                TransitionCause::StoredDismissal,
            );
            return;
        }

        self.host.attach_install_listeners();
        self.listening = true;
        if let Some(timeout) = self.config.fallback_timeout() {
            self.timer.arm(self.clock.now(), timeout);
        }
        self.transition(ControllerState::AwaitingSignal, TransitionCause::Armed);
        info!(
            family = %self.family,
            scope = %self.config.dismissal_scope,
            fallback_ms = ?self.config.fallback_timeout().map(|d| d.as_millis()),
            "Install prompt armed"
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read surface
    // ─────────────────────────────────────────────────────────────────────────

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn family(&self) -> PlatformFamily {
        self.family
    }

    pub fn config(&self) -> &PromptConfig {
        &self.config
    }

    /// An installability signal has been accepted at least once.
    pub fn signal_received(&self) -> bool {
        self.signal_received_at.is_some()
    }

    /// Clock time of the first accepted installability signal.
    pub fn signal_received_at(&self) -> Option<Duration> {
        self.signal_received_at
    }

    pub fn has_signal(&self) -> bool {
        self.signal.is_some()
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn timer_armed(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timer.deadline()
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// States visited so far, starting with `idle`.
    pub fn state_sequence(&self) -> Vec<ControllerState> {
        std::iter::once(ControllerState::Idle)
            .chain(self.transitions.iter().map(|t| t.to))
            .collect()
    }

    pub fn trace(&self) -> String {
        format_transition_trace(&self.transitions)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Host events
    // ─────────────────────────────────────────────────────────────────────────

    /// Applies `events` in order, then checks the fallback timer.
    pub fn tick(&mut self, events: impl IntoIterator<Item = HostEvent>) {
        for event in events {
            match event {
                HostEvent::Installable(signal) => {
                    self.on_install_signal(signal);
                }
                HostEvent::Installed => self.on_installed(),
                HostEvent::Outcome(outcome) => self.on_prompt_outcome(outcome),
            }
        }
        self.poll();
    }

    /// Installability signal. Returns whether the handle was captured.
    pub fn on_install_signal(&mut self, mut signal: InstallSignal) -> bool {
        if !self.listening {
            debug!(state = %self.state, "Ignoring installability signal, not listening");
            return false;
        }

        match self.state {
            ControllerState::AwaitingSignal
            | ControllerState::PromptAvailable
            | ControllerState::FallbackAvailable => {
                signal.suppress_default();
                if self.signal.replace(signal).is_some() {
                    debug!("Replaced previous install handle");
                }
                self.timer.cancel();
                self.mark_signal_received();
                if self.state != ControllerState::PromptAvailable {
                    self.transition(ControllerState::PromptAvailable, TransitionCause::Signal);
                }
                true
            }
            ControllerState::Prompting => {
                // Kept for a retry if the outstanding prompt is declined.
                signal.suppress_default();
                self.signal = Some(signal);
                self.mark_signal_received();
                true
            }
            _ => {
                debug!(state = %self.state, "Ignoring installability signal");
                false
            }
        }
    }

    /// Install-completion signal.
    pub fn on_installed(&mut self) {
        if !self.listening || !self.state.accepts_completion() {
            debug!(state = %self.state, "Ignoring install-completion signal");
            return;
        }

        self.release();
        self.transition(ControllerState::Installed, TransitionCause::InstallCompleted);
        info!("App installed");
    }

    /// Fires the fallback timer if it is due.
    pub fn poll(&mut self) {
        if !self.timer.fire_if_due(self.clock.now()) {
            return;
        }

        if self.state == ControllerState::AwaitingSignal {
            self.transition(
                ControllerState::FallbackAvailable,
                TransitionCause::FallbackTimer,
            );
        } else {
            debug!(state = %self.state, "Fallback timer fired after the prompt resolved");
        }
    }

    /// The user's answer to the native prompt.
    pub fn on_prompt_outcome(&mut self, outcome: PromptOutcome) {
        if self.state != ControllerState::Prompting {
            debug!(state = %self.state, outcome = ?outcome, "Ignoring stale prompt outcome");
            return;
        }

        match outcome {
            PromptOutcome::Accepted => {
                self.signal = None;
                self.transition(ControllerState::Accepted, TransitionCause::PromptAccepted);
            }
            PromptOutcome::Dismissed if self.signal.is_some() => {
                self.transition(
                    ControllerState::PromptAvailable,
                    TransitionCause::PromptDeclined,
                );
            }
            PromptOutcome::Dismissed => {
                self.transition(
                    ControllerState::FallbackAvailable,
                    TransitionCause::PromptDeclined,
                );
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // User actions
    // ─────────────────────────────────────────────────────────────────────────

    pub fn trigger(&mut self) -> TriggerOutcome {
        match self.state {
            ControllerState::PromptAvailable => match self.signal.take() {
                Some(signal) => {
                    self.transition(ControllerState::Prompting, TransitionCause::Trigger);
                    signal.trigger();
                    TriggerOutcome::NativePrompt
                }
                None => {
                    warn!("promptAvailable without a handle");
                    TriggerOutcome::Unavailable
                }
            },
            ControllerState::FallbackAvailable => self.manual_instructions(),
            ControllerState::AwaitingSignal
                if self.config.fallback_mode == FallbackMode::OnDemand =>
            {
                self.manual_instructions()
            }
            _ => {
                debug!(state = %self.state, "Trigger ignored");
                TriggerOutcome::Unavailable
            }
        }
    }

    pub fn dismiss(&mut self) {
        if self.state.is_terminal() || self.state == ControllerState::Idle {
            debug!(state = %self.state, "Dismiss ignored");
            return;
        }

        self.store.set(self.config.dismissal_scope);
        self.release();
        self.transition(ControllerState::DismissedPersisted, TransitionCause::Dismiss);
    }

    /// Cancels the timer, detaches listeners, and drops any held handle.
    /// Safe to call more than once; also runs on drop.
    pub fn dispose(&mut self) {
        self.release();
    }

    fn manual_instructions(&self) -> TriggerOutcome {
        TriggerOutcome::ManualInstructions {
            instructions: instructions_for(self.family),
        }
    }

    fn mark_signal_received(&mut self) {
        if self.signal_received_at.is_none() {
            self.signal_received_at = Some(self.clock.now());
        }
    }

    fn release(&mut self) {
        self.timer.cancel();
        self.signal = None;
        if self.listening {
            self.host.detach_install_listeners();
            self.listening = false;
        }
    }

    fn transition(&mut self, to: ControllerState, cause: TransitionCause) {
        let from = self.state;
        debug!(from = %from, to = %to, cause = %cause, "Install prompt transition");
        self.transitions
            .push(Transition::new(from, to, cause, self.clock.now()));
        self.state = to;
    }
}

impl Drop for InstallController {
    fn drop(&mut self) {
        self.dispose();
    }
}
