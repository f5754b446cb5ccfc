//! Developer-facing install diagnostics.
//!
//! Samples the host's capability facts once, then appends the service-worker
//! registration lookup and a verdict on whether an installability signal was
//! seen. Reads the controller, never changes it.

use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::controller::InstallController;
use crate::host::{CapabilitySnapshot, PlatformHost, RegistrationLookup};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticStatus {
    Pass,
    Fail,
}

impl DiagnosticStatus {
    fn from_bool(ok: bool) -> Self {
        if ok {
            Self::Pass
        } else {
            Self::Fail
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            Self::Pass => "✓",
            Self::Fail => "✗",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticEntry {
    pub label: String,
    pub status: DiagnosticStatus,
    pub detail: String,
    pub at_ms: u64,
}

pub struct DiagnosticProbe {
    clock: Rc<dyn Clock>,
    started_at: Duration,
    signal_timeout: Duration,
    capabilities: CapabilitySnapshot,
    entries: Vec<DiagnosticEntry>,
    registration_reported: bool,
    signal_verdict: Option<bool>,
}

impl DiagnosticProbe {
    pub fn new(host: &dyn PlatformHost, clock: Rc<dyn Clock>, signal_timeout: Duration) -> Self {
        let capabilities = CapabilitySnapshot::sample(host);
        let mut probe = Self {
            started_at: clock.now(),
            clock,
            signal_timeout,
            capabilities,
            entries: Vec::new(),
            registration_reported: false,
            signal_verdict: None,
        };

        let facts = [
            ("Secure context (HTTPS)", capabilities.secure_context),
            ("Install API supported", capabilities.install_api),
            ("Manifest linked", capabilities.manifest),
            ("Running standalone", capabilities.standalone),
            ("Service worker active", capabilities.active_worker),
        ];
        for (label, ok) in facts {
            probe.push(label, DiagnosticStatus::from_bool(ok), yes_no(ok));
        }
        probe
    }

    pub fn capabilities(&self) -> CapabilitySnapshot {
        self.capabilities
    }

    pub fn entries(&self) -> &[DiagnosticEntry] {
        &self.entries
    }

    /// Both asynchronous results have been appended.
    pub fn is_complete(&self) -> bool {
        self.registration_reported && self.signal_verdict.is_some()
    }

    /// `Some(true)` once a signal that arrived by the deadline was seen,
    /// `Some(false)` once the deadline passed without one.
    pub fn signal_verdict(&self) -> Option<bool> {
        self.signal_verdict
    }

    /// When the signal verdict falls due if nothing arrives first.
    pub fn verdict_deadline(&self) -> Duration {
        self.started_at + self.signal_timeout
    }

    /// Appends whichever pending results have become available.
    pub fn poll(&mut self, host: &dyn PlatformHost, controller: &InstallController) {
        if !self.registration_reported {
            if let Some(lookup) = host.poll_registration_lookup() {
                self.report_registration(&lookup);
                self.registration_reported = true;
            }
        }

        if self.signal_verdict.is_none() {
            let deadline = self.verdict_deadline();
            let in_time = controller
                .signal_received_at()
                .is_some_and(|at| at <= deadline);
            if in_time {
                self.signal_verdict = Some(true);
                info!("Installability signal observed");
                self.push("Installability signal", DiagnosticStatus::Pass, "RECEIVED");
            } else if self.clock.now() >= deadline {
                self.signal_verdict = Some(false);
                warn!(
                    timeout_ms = self.signal_timeout.as_millis() as u64,
                    "No installability signal within timeout"
                );
                self.push(
                    "Installability signal",
                    DiagnosticStatus::Fail,
                    "NOT RECEIVED",
                );
            }
        }
    }

    fn report_registration(&mut self, lookup: &RegistrationLookup) {
        match lookup {
            RegistrationLookup::Registered { scope } => self.push(
                "Service worker registration",
                DiagnosticStatus::Pass,
                &format!("registered (scope {})", scope),
            ),
            RegistrationLookup::NotRegistered => self.push(
                "Service worker registration",
                DiagnosticStatus::Fail,
                "not registered",
            ),
            RegistrationLookup::Failed { reason } => self.push(
                "Service worker registration",
                DiagnosticStatus::Fail,
                &format!("lookup failed: {}", reason),
            ),
        }
    }

    fn push(&mut self, label: &str, status: DiagnosticStatus, detail: &str) {
        let elapsed = self.clock.now().saturating_sub(self.started_at);
        self.entries.push(DiagnosticEntry {
            label: label.to_string(),
            status,
            detail: detail.to_string(),
            at_ms: elapsed.as_millis() as u64,
        });
    }

    /// One line per entry, e.g. `✓ Manifest linked: yes`.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{} {}: {}", e.status.marker(), e.label, e.detail))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::PromptConfig;
    use crate::controller::{HostEvent, InstallSignal, RecordingPrompt};
    use crate::dismissal::DismissalStore;
    use crate::host::StaticHost;

    fn setup() -> (Rc<StaticHost>, ManualClock, InstallController, DiagnosticProbe) {
        let host = Rc::new(StaticHost::browser("Mozilla/5.0 (X11; Linux x86_64)"));
        let clock = ManualClock::new();
        let controller = InstallController::new(
            PromptConfig::default(),
            host.clone(),
            DismissalStore::in_memory(),
            Rc::new(clock.clone()),
        );
        let probe = DiagnosticProbe::new(
            &*host,
            Rc::new(clock.clone()),
            Duration::from_secs(5),
        );
        (host, clock, controller, probe)
    }

    #[test]
    fn test_samples_five_facts_at_construction() {
        let (_, _, _, probe) = setup();
        assert_eq!(probe.entries().len(), 5);
        assert!(probe
            .entries()
            .iter()
            .any(|e| e.label == "Running standalone" && e.status == DiagnosticStatus::Fail));
    }

    #[test]
    fn test_not_received_appended_exactly_once() {
        let (host, clock, controller, mut probe) = setup();

        clock.advance_ms(4999);
        probe.poll(&*host, &controller);
        assert_eq!(probe.signal_verdict(), None);

        clock.advance_ms(1);
        probe.poll(&*host, &controller);
        clock.advance_ms(10_000);
        probe.poll(&*host, &controller);

        let not_received = probe
            .entries()
            .iter()
            .filter(|e| e.detail == "NOT RECEIVED")
            .count();
        assert_eq!(not_received, 1);
        assert_eq!(probe.signal_verdict(), Some(false));
    }

    #[test]
    fn test_received_signal_reported() {
        let (host, clock, mut controller, mut probe) = setup();
        clock.advance_ms(500);
        controller.on_install_signal(InstallSignal::new(RecordingPrompt::new()));

        probe.poll(&*host, &controller);
        assert_eq!(probe.signal_verdict(), Some(true));
        assert!(probe.render().contains("✓ Installability signal: RECEIVED"));

        clock.advance_ms(10_000);
        probe.poll(&*host, &controller);
        assert!(!probe.render().contains("NOT RECEIVED"));
    }

    #[test]
    fn test_late_signal_reported_not_received() {
        let (host, clock, mut controller, mut probe) = setup();
        clock.advance_ms(7000);
        controller.tick([HostEvent::Installable(InstallSignal::new(
            RecordingPrompt::new(),
        ))]);
        assert!(controller.signal_received());

        probe.poll(&*host, &controller);
        probe.poll(&*host, &controller);

        assert_eq!(probe.signal_verdict(), Some(false));
        let verdicts: Vec<_> = probe
            .entries()
            .iter()
            .filter(|e| e.label == "Installability signal")
            .map(|e| e.detail.as_str())
            .collect();
        assert_eq!(verdicts, vec!["NOT RECEIVED"]);
    }

    #[test]
    fn test_signal_at_deadline_counts_as_received() {
        let (host, clock, mut controller, mut probe) = setup();
        clock.advance_ms(5000);
        controller.on_install_signal(InstallSignal::new(RecordingPrompt::new()));
        clock.advance_ms(100);

        probe.poll(&*host, &controller);
        assert_eq!(probe.signal_verdict(), Some(true));
    }

    #[test]
    fn test_registration_appended_when_lookup_resolves() {
        let (host, _, controller, mut probe) = setup();
        probe.poll(&*host, &controller);
        assert!(!probe.is_complete());
        assert_eq!(probe.entries().len(), 5);

        host.set_registration(RegistrationLookup::Registered {
            scope: "/".to_string(),
        });
        probe.poll(&*host, &controller);
        probe.poll(&*host, &controller);

        let registrations = probe
            .entries()
            .iter()
            .filter(|e| e.label == "Service worker registration")
            .count();
        assert_eq!(registrations, 1);
    }

    #[test]
    fn test_probe_does_not_change_controller() {
        let (host, clock, controller, mut probe) = setup();
        let before = controller.state();
        clock.advance_ms(1000);
        probe.poll(&*host, &controller);
        assert_eq!(controller.state(), before);
    }
}
