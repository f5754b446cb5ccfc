//! End-to-end controller scenarios over the public API.

use std::rc::Rc;
use std::time::Duration;

use a2hs_core::{
    run_scenario, ControllerState, DismissalScope, DismissalStore, HostEvent, InstallController,
    InstallSignal, ManualClock, PlatformFamily, PromptConfig, PromptOutcome, RecordingPrompt,
    Scenario, ScriptedEvent, StaticHost, StorageConfig, TriggerOutcome,
};

const DESKTOP_UA: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/537.36 Chrome/124.0 Safari/537.36";

fn build(
    host: &Rc<StaticHost>,
    store: &DismissalStore,
    clock: &ManualClock,
    config: PromptConfig,
) -> InstallController {
    InstallController::new(config, host.clone(), store.clone(), Rc::new(clock.clone()))
}

#[test]
fn test_signal_at_500ms_never_falls_back() {
    let host = Rc::new(StaticHost::browser(DESKTOP_UA));
    let store = DismissalStore::in_memory();
    let clock = ManualClock::new();
    let mut controller = build(&host, &store, &clock, PromptConfig::timed(3000));

    clock.advance_ms(500);
    controller.tick([HostEvent::Installable(InstallSignal::new(RecordingPrompt::new()))]);
    clock.advance_ms(10_000);
    controller.poll();

    assert_eq!(
        controller.state_sequence(),
        vec![
            ControllerState::Idle,
            ControllerState::AwaitingSignal,
            ControllerState::PromptAvailable
        ]
    );
}

#[test]
fn test_no_signal_falls_back_at_3000ms_with_platform_text() {
    let host = Rc::new(StaticHost::browser(DESKTOP_UA));
    let store = DismissalStore::in_memory();
    let clock = ManualClock::new();
    let mut controller = build(&host, &store, &clock, PromptConfig::timed(3000));

    let report = run_scenario(
        &mut controller,
        &clock,
        &Scenario::new().at_ms(3000, ScriptedEvent::Trigger),
        Duration::from_secs(5),
    );

    assert_eq!(
        report.states,
        vec![
            ControllerState::Idle,
            ControllerState::AwaitingSignal,
            ControllerState::FallbackAvailable
        ]
    );
    assert_eq!(report.transitions[1].at_ms, 3000);
    match &report.triggers[0].outcome {
        TriggerOutcome::ManualInstructions { instructions } => {
            assert_eq!(instructions.family, PlatformFamily::Other);
            assert_eq!(instructions.steps.len(), 3);
        }
        other => panic!("expected manual instructions, got {:?}", other),
    }
    assert_eq!(report.native_prompts, 0);
    assert_eq!(controller.state(), ControllerState::FallbackAvailable);
}

#[test]
fn test_dismiss_then_reconstruct_same_scope() {
    let host = Rc::new(StaticHost::browser(DESKTOP_UA));
    let store = DismissalStore::in_memory();
    let clock = ManualClock::new();

    {
        let mut controller = build(&host, &store, &clock, PromptConfig::default());
        controller.on_install_signal(InstallSignal::new(RecordingPrompt::new()));
        assert_eq!(controller.state(), ControllerState::PromptAvailable);
        controller.dismiss();
        assert_eq!(controller.state(), ControllerState::DismissedPersisted);
    }

    let attach_calls = host.attach_calls();
    let controller = build(&host, &store, &clock, PromptConfig::default());
    assert_eq!(controller.state(), ControllerState::DismissedPersisted);
    assert_eq!(host.attach_calls(), attach_calls);
    assert!(!controller.timer_armed());
}

#[test]
fn test_session_dismissal_does_not_survive_new_session() {
    let host = Rc::new(StaticHost::browser(DESKTOP_UA));
    let clock = ManualClock::new();
    let temp = tempfile::tempdir().unwrap();
    let storage = StorageConfig::with_root(temp.path().to_path_buf());
    let config = PromptConfig::default().with_scope(DismissalScope::Session);

    let first_session = DismissalStore::with_storage(&storage);
    build(&host, &first_session, &clock, config.clone()).dismiss();
    assert_eq!(
        build(&host, &first_session, &clock, config.clone()).state(),
        ControllerState::DismissedPersisted
    );

    let second_session = DismissalStore::with_storage(&storage);
    assert_eq!(
        build(&host, &second_session, &clock, config).state(),
        ControllerState::AwaitingSignal
    );
}

#[test]
fn test_permanent_dismissal_survives_new_session() {
    let host = Rc::new(StaticHost::browser(DESKTOP_UA));
    let clock = ManualClock::new();
    let temp = tempfile::tempdir().unwrap();
    let storage = StorageConfig::with_root(temp.path().to_path_buf());

    build(
        &host,
        &DismissalStore::with_storage(&storage),
        &clock,
        PromptConfig::default(),
    )
    .dismiss();

    let controller = build(
        &host,
        &DismissalStore::with_storage(&storage),
        &clock,
        PromptConfig::default(),
    );
    assert_eq!(controller.state(), ControllerState::DismissedPersisted);
    assert!(storage.dismissals_file().exists());
}

#[test]
fn test_standalone_arms_nothing() {
    let host = Rc::new(StaticHost::browser(DESKTOP_UA).standalone());
    let store = DismissalStore::in_memory();
    let clock = ManualClock::new();
    let controller = build(&host, &store, &clock, PromptConfig::default());

    assert_eq!(controller.state(), ControllerState::AlreadyInstalled);
    assert!(!controller.is_listening());
    assert!(!controller.timer_armed());
    assert_eq!(host.attach_calls(), 0);
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Signal,
    Completion,
    Dismiss,
    TimerExpiry,
    Trigger,
    Accept,
    Decline,
}

const STEPS: [Step; 7] = [
    Step::Signal,
    Step::Completion,
    Step::Dismiss,
    Step::TimerExpiry,
    Step::Trigger,
    Step::Accept,
    Step::Decline,
];

fn apply(controller: &mut InstallController, clock: &ManualClock, step: Step) {
    match step {
        Step::Signal => {
            controller.on_install_signal(InstallSignal::new(RecordingPrompt::new()));
        }
        Step::Completion => controller.on_installed(),
        Step::Dismiss => controller.dismiss(),
        Step::TimerExpiry => {
            clock.advance_ms(3000);
            controller.poll();
        }
        Step::Trigger => {
            controller.trigger();
        }
        Step::Accept => controller.on_prompt_outcome(PromptOutcome::Accepted),
        Step::Decline => controller.on_prompt_outcome(PromptOutcome::Dismissed),
    }
}

/// Every sequence of three events, from both a fresh and a dismissed start.
#[test]
fn test_invariants_hold_for_all_short_sequences() {
    for pre_dismissed in [false, true] {
        for a in STEPS {
            for b in STEPS {
                for c in STEPS {
                    let host = Rc::new(StaticHost::browser(DESKTOP_UA));
                    let store = DismissalStore::in_memory();
                    if pre_dismissed {
                        store.set(DismissalScope::Permanent);
                    }
                    let clock = ManualClock::new();
                    let mut controller = build(&host, &store, &clock, PromptConfig::default());
                    let mut installed = false;

                    for step in [a, b, c] {
                        apply(&mut controller, &clock, step);
                        let state = controller.state();
                        let sequence = [a, b, c];

                        assert!(ControllerState::ALL.contains(&state));
                        if installed {
                            assert_eq!(state, ControllerState::Installed, "{:?}", sequence);
                        }
                        installed = state == ControllerState::Installed;

                        if pre_dismissed {
                            assert_eq!(state, ControllerState::DismissedPersisted, "{:?}", sequence);
                        }
                        if state == ControllerState::DismissedPersisted {
                            assert!(!controller.has_signal());
                            assert!(!controller.is_listening());
                        }
                        if state.is_terminal() {
                            assert!(!controller.timer_armed(), "{:?}", sequence);
                        }
                        assert!(host.attached_listeners() <= 1);
                    }

                    drop(controller);
                    assert_eq!(host.attached_listeners(), 0);
                }
            }
        }
    }
}
