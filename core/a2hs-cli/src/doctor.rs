//! `a2hs doctor`: capability checks and signal verdict for a described environment.

use std::rc::Rc;
use std::time::Duration;

use a2hs_core::{
    ControllerState, DiagnosticProbe, DismissalStore, HostEvent, InstallController,
    InstallSignal, ManualClock, PromptConfig, RecordingPrompt, RegistrationLookup, Result,
};

use crate::simulate::build_host;
use crate::EnvironmentArgs;

pub struct DoctorOptions {
    pub config: PromptConfig,
    pub env: EnvironmentArgs,
    pub insecure: bool,
    pub no_manifest: bool,
    pub no_worker: bool,
    pub signal_at_ms: Option<u64>,
}

pub struct Diagnosis {
    pub probe: DiagnosticProbe,
    pub state: ControllerState,
}

pub fn run(options: DoctorOptions) -> Result<()> {
    let diagnosis = diagnose(&options);

    println!("── Install Diagnostics ───────────────────────────────────");
    println!("{}", diagnosis.probe.render());
    println!();
    println!("Controller state: {}", diagnosis.state);
    Ok(())
}

/// Runs the probe on virtual time until both the signal verdict deadline and
/// the optional signal delivery have passed.
pub fn diagnose(options: &DoctorOptions) -> Diagnosis {
    let host = Rc::new(build_host(&options.env));
    host.secure_context.set(!options.insecure);
    host.manifest.set(!options.no_manifest);
    host.active_worker.set(!options.no_worker);
    host.set_registration(if options.no_worker {
        RegistrationLookup::NotRegistered
    } else {
        RegistrationLookup::Registered {
            scope: "/".to_string(),
        }
    });

    let clock = ManualClock::new();
    let mut controller = InstallController::new(
        options.config.clone(),
        host.clone(),
        DismissalStore::in_memory(),
        Rc::new(clock.clone()),
    );
    let mut probe = DiagnosticProbe::new(
        &*host,
        Rc::new(clock.clone()),
        options.config.diagnostic_timeout(),
    );
    probe.poll(&*host, &controller);

    let deadline = probe.verdict_deadline();
    let signal_at = options.signal_at_ms.map(Duration::from_millis);

    if let Some(at) = signal_at.filter(|at| *at <= deadline) {
        clock.set(at);
        controller.tick([HostEvent::Installable(InstallSignal::new(
            RecordingPrompt::new(),
        ))]);
        probe.poll(&*host, &controller);
    }

    clock.set(deadline);
    controller.poll();
    probe.poll(&*host, &controller);

    if let Some(at) = signal_at.filter(|at| *at > deadline) {
        clock.set(at);
        controller.tick([HostEvent::Installable(InstallSignal::new(
            RecordingPrompt::new(),
        ))]);
        probe.poll(&*host, &controller);
    }

    Diagnosis {
        probe,
        state: controller.state(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(signal_at_ms: Option<u64>) -> DoctorOptions {
        DoctorOptions {
            config: PromptConfig::default(),
            env: EnvironmentArgs {
                user_agent: "Mozilla/5.0 (Linux; Android 14)".to_string(),
                standalone: false,
                no_install_api: false,
            },
            insecure: false,
            no_manifest: false,
            no_worker: false,
            signal_at_ms,
        }
    }

    #[test]
    fn test_signal_within_timeout_is_received() {
        let diagnosis = diagnose(&options(Some(500)));
        assert_eq!(diagnosis.probe.signal_verdict(), Some(true));
        assert_eq!(diagnosis.state, ControllerState::PromptAvailable);
        assert!(diagnosis.probe.is_complete());
    }

    #[test]
    fn test_no_signal_is_not_received() {
        let diagnosis = diagnose(&options(None));
        assert_eq!(diagnosis.probe.signal_verdict(), Some(false));
        assert_eq!(diagnosis.state, ControllerState::FallbackAvailable);
    }

    #[test]
    fn test_late_signal_is_not_received() {
        let diagnosis = diagnose(&options(Some(7000)));
        assert_eq!(diagnosis.probe.signal_verdict(), Some(false));
        assert!(diagnosis.probe.render().contains("✗ Installability signal: NOT RECEIVED"));
        // The controller still upgrades to the native prompt.
        assert_eq!(diagnosis.state, ControllerState::PromptAvailable);
    }

    #[test]
    fn test_flags_reach_capability_facts() {
        let mut opts = options(None);
        opts.insecure = true;
        opts.no_manifest = true;
        opts.no_worker = true;

        let diagnosis = diagnose(&opts);
        let caps = diagnosis.probe.capabilities();
        assert!(!caps.secure_context);
        assert!(!caps.manifest);
        assert!(!caps.active_worker);
        assert!(diagnosis
            .probe
            .render()
            .contains("✗ Service worker registration: not registered"));
    }
}
