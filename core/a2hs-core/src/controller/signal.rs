//! The deferred install prompt as a single-use capability token.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Native side of a captured installability event.
pub trait DeferredPrompt {
    /// Stop the platform from showing its own install UI.
    fn prevent_default(&mut self);

    /// Show the native install UI. The user's answer arrives later as a
    /// [`PromptOutcome`].
    fn prompt(&mut self);
}

/// The user's answer to the native install UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptOutcome {
    Accepted,
    Dismissed,
}

/// Owned handle captured from an installability signal.
///
/// [`InstallSignal::trigger`] consumes the handle, so a triggered prompt can
/// never be triggered again. Dropping it releases the handle untriggered.
pub struct InstallSignal {
    prompt: Box<dyn DeferredPrompt>,
    suppressed: bool,
}

impl InstallSignal {
    pub fn new(prompt: impl DeferredPrompt + 'static) -> Self {
        Self {
            prompt: Box::new(prompt),
            suppressed: false,
        }
    }

    pub(crate) fn suppress_default(&mut self) {
        if !self.suppressed {
            self.prompt.prevent_default();
            self.suppressed = true;
        }
    }

    pub(crate) fn trigger(mut self) {
        self.prompt.prompt();
    }
}

impl fmt::Debug for InstallSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstallSignal")
            .field("suppressed", &self.suppressed)
            .finish_non_exhaustive()
    }
}

/// Prompt double that counts calls. Clones share counters.
#[derive(Debug, Clone, Default)]
pub struct RecordingPrompt {
    prevented: Rc<Cell<usize>>,
    prompted: Rc<Cell<usize>>,
}

impl RecordingPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default_calls(&self) -> usize {
        self.prevented.get()
    }

    pub fn prompt_calls(&self) -> usize {
        self.prompted.get()
    }
}

impl DeferredPrompt for RecordingPrompt {
    fn prevent_default(&mut self) {
        self.prevented.set(self.prevented.get() + 1);
    }

    fn prompt(&mut self) {
        self.prompted.set(self.prompted.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suppress_default_once() {
        let prompt = RecordingPrompt::new();
        let mut signal = InstallSignal::new(prompt.clone());
        signal.suppress_default();
        signal.suppress_default();
        assert_eq!(prompt.prevent_default_calls(), 1);
    }

    #[test]
    fn test_trigger_prompts() {
        let prompt = RecordingPrompt::new();
        InstallSignal::new(prompt.clone()).trigger();
        assert_eq!(prompt.prompt_calls(), 1);
    }

    #[test]
    fn test_drop_releases_without_prompt() {
        let prompt = RecordingPrompt::new();
        drop(InstallSignal::new(prompt.clone()));
        assert_eq!(prompt.prompt_calls(), 0);
    }
}
