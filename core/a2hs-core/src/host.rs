//! Host platform boundary: environment queries and listener registration.
//!
//! The controller never reads ambient globals. Everything it learns about the
//! runtime comes through [`PlatformHost`]; the signals themselves are pushed in
//! by whoever owns the event loop.

use std::cell::{Cell, RefCell};

use serde::{Deserialize, Serialize};

/// Environment facts and listener plumbing supplied by the embedding runtime.
///
/// Implementors should answer every query without panicking; an unknown fact
/// is `false`.
pub trait PlatformHost {
    /// Origin is served over a secure transport (https or localhost).
    fn is_secure_context(&self) -> bool;

    /// The deferred install API exists in this runtime.
    fn has_install_api(&self) -> bool;

    /// A web app manifest is declared by the document.
    fn has_manifest(&self) -> bool;

    /// Display mode is standalone (already running as an installed app).
    fn is_standalone(&self) -> bool;

    /// A background service worker currently controls the page.
    fn has_active_worker(&self) -> bool;

    /// User-agent-equivalent identifying string.
    fn user_agent(&self) -> String;

    /// Result of the asynchronous registration lookup; `None` while pending.
    fn poll_registration_lookup(&self) -> Option<RegistrationLookup> {
        None
    }

    /// Start delivering installability and install-completion signals.
    fn attach_install_listeners(&self);

    /// Stop delivering signals. Called once per attach.
    fn detach_install_listeners(&self);
}

/// Outcome of looking up the service worker registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RegistrationLookup {
    Registered { scope: String },
    NotRegistered,
    Failed { reason: String },
}

/// The five capability facts sampled at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySnapshot {
    pub secure_context: bool,
    pub install_api: bool,
    pub manifest: bool,
    pub standalone: bool,
    pub active_worker: bool,
}

impl CapabilitySnapshot {
    pub fn sample(host: &dyn PlatformHost) -> Self {
        Self {
            secure_context: host.is_secure_context(),
            install_api: host.has_install_api(),
            manifest: host.has_manifest(),
            standalone: host.is_standalone(),
            active_worker: host.has_active_worker(),
        }
    }
}

/// Host with fixed, settable facts. Used by tests and the CLI harness.
#[derive(Debug)]
pub struct StaticHost {
    pub secure_context: Cell<bool>,
    pub install_api: Cell<bool>,
    pub manifest: Cell<bool>,
    pub standalone: Cell<bool>,
    pub active_worker: Cell<bool>,
    user_agent: RefCell<String>,
    registration: RefCell<Option<RegistrationLookup>>,
    attached: Cell<usize>,
    attach_calls: Cell<usize>,
}

impl StaticHost {
    /// A capable browser: secure, manifest present, worker active, not standalone.
    pub fn browser(user_agent: &str) -> Self {
        Self {
            secure_context: Cell::new(true),
            install_api: Cell::new(true),
            manifest: Cell::new(true),
            standalone: Cell::new(false),
            active_worker: Cell::new(true),
            user_agent: RefCell::new(user_agent.to_string()),
            registration: RefCell::new(None),
            attached: Cell::new(0),
            attach_calls: Cell::new(0),
        }
    }

    pub fn standalone(self) -> Self {
        self.standalone.set(true);
        self
    }

    pub fn without_install_api(self) -> Self {
        self.install_api.set(false);
        self
    }

    pub fn set_registration(&self, lookup: RegistrationLookup) {
        *self.registration.borrow_mut() = Some(lookup);
    }

    /// Listener registrations currently live.
    pub fn attached_listeners(&self) -> usize {
        self.attached.get()
    }

    /// Total number of times listeners were attached.
    pub fn attach_calls(&self) -> usize {
        self.attach_calls.get()
    }
}

impl PlatformHost for StaticHost {
    fn is_secure_context(&self) -> bool {
        self.secure_context.get()
    }

    fn has_install_api(&self) -> bool {
        self.install_api.get()
    }

    fn has_manifest(&self) -> bool {
        self.manifest.get()
    }

    fn is_standalone(&self) -> bool {
        self.standalone.get()
    }

    fn has_active_worker(&self) -> bool {
        self.active_worker.get()
    }

    fn user_agent(&self) -> String {
        self.user_agent.borrow().clone()
    }

    fn poll_registration_lookup(&self) -> Option<RegistrationLookup> {
        self.registration.borrow().clone()
    }

    fn attach_install_listeners(&self) {
        self.attached.set(self.attached.get() + 1);
        self.attach_calls.set(self.attach_calls.get() + 1);
    }

    fn detach_install_listeners(&self) {
        self.attached.set(self.attached.get().saturating_sub(1));
    }
}
