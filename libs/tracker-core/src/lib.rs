//! Core study-tracker library shared by the persistence engine.
//!
//! Provides:
//! - Shared entity types (Question, UserStats, Syllabus, ...)
//! - XP/level curve and streak state machine
//! - Static badge catalog with idempotent unlock scanning
//! - Last-writer-wins merge resolver for replica reconciliation
//! - Modified SM-2 spaced revision scheduler
//! - Versioned export/import snapshot schema

pub mod badges;
pub mod error;
pub mod level;
pub mod merge;
pub mod revision;
pub mod snapshot;
pub mod streak;
pub mod types;

pub use badges::{Badge, CATALOG};
pub use error::SnapshotError;
pub use level::{level_from_total_xp, xp_for_level, LevelInfo};
pub use merge::{merge_by_updated_at, MergeRecord};
pub use revision::{revision_xp, update_ease_factor, RevisionScheduler};
pub use snapshot::{Snapshot, SNAPSHOT_VERSION};
pub use streak::StreakUpdate;
pub use types::{
    ActivityEntry, ActivityKind, CalendarEntries, CalendarEntry, DailyEntry, DailyKind, DailyLog,
    Difficulty, NewQuestion, Question, QuestionStatus, RevisionEntry, Settings, Syllabus, Topic,
    UserStats,
};
