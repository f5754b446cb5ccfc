//! Scoped dismissal facade.

use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::backend::{DismissalBackend, FileBackend, MemoryBackend};
use crate::config::DismissalScope;
use crate::storage::StorageConfig;

/// Marker written when the user dismisses the prompt. Presence means dismissed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DismissalRecord {
    pub dismissed: bool,
    pub scope: DismissalScope,
    pub dismissed_at: DateTime<Utc>,
}

impl DismissalRecord {
    pub fn new(scope: DismissalScope) -> Self {
        Self {
            dismissed: true,
            scope,
            dismissed_at: Utc::now(),
        }
    }
}

/// Dismissal persistence over a session backend and a permanent backend.
///
/// Never fails: storage errors are logged and read as "not dismissed".
/// Clones share the same backends.
#[derive(Clone)]
pub struct DismissalStore {
    session: Rc<dyn DismissalBackend>,
    permanent: Rc<dyn DismissalBackend>,
}

impl DismissalStore {
    pub fn new(session: Rc<dyn DismissalBackend>, permanent: Rc<dyn DismissalBackend>) -> Self {
        Self { session, permanent }
    }

    /// Both scopes in process memory.
    pub fn in_memory() -> Self {
        Self::new(Rc::new(MemoryBackend::new()), Rc::new(MemoryBackend::new()))
    }

    /// Session scope in memory, permanent scope in `dismissals.json`.
    pub fn with_storage(storage: &StorageConfig) -> Self {
        Self::new(
            Rc::new(MemoryBackend::new()),
            Rc::new(FileBackend::new(&storage.dismissals_file())),
        )
    }

    fn backend(&self, scope: DismissalScope) -> &dyn DismissalBackend {
        match scope {
            DismissalScope::Session => self.session.as_ref(),
            DismissalScope::Permanent => self.permanent.as_ref(),
        }
    }

    pub fn record(&self, scope: DismissalScope) -> Option<DismissalRecord> {
        match self.backend(scope).read(scope.key()) {
            Ok(record) => record.filter(|r| r.dismissed),
            Err(err) => {
                warn!(error = %err, scope = %scope, "Dismissal lookup failed, treating as not dismissed");
                None
            }
        }
    }

    pub fn has(&self, scope: DismissalScope) -> bool {
        self.record(scope).is_some()
    }

    pub fn set(&self, scope: DismissalScope) {
        match self
            .backend(scope)
            .write(scope.key(), &DismissalRecord::new(scope))
        {
            Ok(()) => debug!(scope = %scope, "Dismissal recorded"),
            Err(err) => warn!(error = %err, scope = %scope, "Failed to persist dismissal"),
        }
    }

    pub fn clear(&self, scope: DismissalScope) {
        if let Err(err) = self.backend(scope).remove(scope.key()) {
            warn!(error = %err, scope = %scope, "Failed to clear dismissal");
        }
    }
}

impl std::fmt::Debug for DismissalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DismissalStore").finish_non_exhaustive()
    }
}
