//! Dismissal persistence.
//!
//! # Module Structure
//!
//! - [`backend`]: key/value backends (process memory, JSON file, unavailable)
//! - [`store`]: the scoped facade the controller talks to
//!
//! The controller only ever sees [`DismissalStore`]. Backends report failures;
//! the store swallows them so a broken storage layer reads as "not dismissed".

mod backend;
mod store;

pub use backend::{DismissalBackend, FileBackend, MemoryBackend, UnavailableBackend};
pub use store::{DismissalRecord, DismissalStore};
