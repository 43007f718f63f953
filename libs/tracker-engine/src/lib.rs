//! Local-first persistence and gamification engine for the study tracker.
//!
//! The store persists everything to a local SQLite cache and mirrors
//! mutations to a remote document store through a fire-and-forget queue;
//! the gamification engine derives XP, levels, streaks and badges from the
//! tracked activity. UI layers embed this crate and receive celebration
//! callbacks through [`hooks::PresentationHooks`].

pub mod db;
pub mod gamification;
pub mod hooks;
pub mod store;
pub mod sync;

pub use db::{DbError, KvStore};
pub use gamification::{GamificationEngine, RevisionOutcome, XpAward};
pub use hooks::{NoopHooks, PresentationHooks, ToastSeverity};
pub use store::{local_today, TrackerStore};
pub use sync::{HttpRemoteStore, MemoryRemoteStore, RemoteStore, SyncError, SyncHandle};

use std::path::PathBuf;

/// Default location of the local cache, under the platform data directory.
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dsa-tracker")
        .join("tracker.db")
}
