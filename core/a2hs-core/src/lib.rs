//! # a2hs-core
//!
//! Install-prompt lifecycle for add-to-home-screen flows: captures the host's
//! deferred installability signal, falls back to manual instructions when the
//! signal never comes, and remembers when the user said no.
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime dependency. The embedding event loop
//!   pushes host events in and drives the fallback timer with `poll()`.
//! - **Single-threaded**: Shared handles are `Rc`; one event is processed at a time.
//! - **Graceful degradation**: Storage failures read as "not dismissed",
//!   stale events are ignored. Nothing here surfaces an error to the UI.
//! - **Injectable**: Host, clock, and storage all come in through the constructor.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use a2hs_core::{InstallController, PromptConfig, DismissalStore, StaticHost, SystemClock};
//! use std::rc::Rc;
//!
//! let mut controller = InstallController::new(
//!     PromptConfig::default(),
//!     Rc::new(StaticHost::browser(user_agent)),
//!     DismissalStore::with_storage(&StorageConfig::default()),
//!     Rc::new(SystemClock::new()),
//! );
//! controller.on_install_signal(signal);
//! let outcome = controller.trigger();
//! ```

pub mod clock;
pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod dismissal;
pub mod error;
pub mod host;
pub mod instructions;
pub mod platform;
pub mod scenario;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{load_prompt_config, DismissalScope, FallbackMode, PromptConfig};
pub use controller::{
    ControllerState, DeferredPrompt, HostEvent, InstallController, InstallSignal,
    PromptOutcome, RecordingPrompt, Transition, TransitionCause, TriggerOutcome,
};
pub use diagnostics::{DiagnosticEntry, DiagnosticProbe, DiagnosticStatus};
pub use dismissal::{DismissalRecord, DismissalStore};
pub use error::{A2hsError, Result};
pub use host::{CapabilitySnapshot, PlatformHost, RegistrationLookup, StaticHost};
pub use instructions::{instructions_for, InstallInstructions};
pub use platform::PlatformFamily;
pub use scenario::{run_scenario, Scenario, ScenarioReport, ScriptStep, ScriptedEvent};
pub use storage::StorageConfig;
