//! `a2hs dismissal`: maintenance for stored dismissal records.
//!
//! Only the permanent scope outlives this process. The session scope lives in
//! the memory of whichever process owns the controller, so it is never touched here.

use a2hs_core::{A2hsError, DismissalScope, DismissalStore, Result, StorageConfig};
use tracing::info;

pub fn show(storage: &StorageConfig) -> Result<()> {
    let store = DismissalStore::with_storage(storage);
    println!("Dismissal file: {}", storage.dismissals_file().display());
    match store.record(DismissalScope::Permanent) {
        Some(record) => println!(
            "  permanent: dismissed at {}",
            record.dismissed_at.to_rfc3339()
        ),
        None => println!("  permanent: not dismissed"),
    }
    Ok(())
}

pub fn clear(storage: &StorageConfig, scope: DismissalScope) -> Result<()> {
    if scope != DismissalScope::Permanent {
        return Err(A2hsError::ScopeNotPersisted(scope.to_string()));
    }

    let store = DismissalStore::with_storage(storage);
    store.clear(scope);
    info!(scope = %scope, "Dismissal cleared");
    println!("Cleared {} dismissal", scope);
    Ok(())
}
