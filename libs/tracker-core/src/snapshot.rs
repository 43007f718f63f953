//! Versioned export/import document.

use crate::error::SnapshotError;
use crate::types::{
    ActivityEntry, CalendarEntries, DailyLog, Question, Settings, Syllabus, UserStats,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current snapshot schema version.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// Full-state export document.
///
/// Every entity family is optional on import: a family that is present
/// wholesale-replaces the local one, a missing family is left untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<Question>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_stats: Option<UserStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_log: Option<Vec<ActivityEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_log: Option<DailyLog>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_entries: Option<CalendarEntries>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syllabi: Option<Vec<Syllabus>>,
}

impl Snapshot {
    /// Empty snapshot stamped with the current schema version.
    pub fn new(exported_at: DateTime<Utc>) -> Self {
        Self {
            version: SNAPSHOT_VERSION.to_string(),
            exported_at,
            questions: None,
            user_stats: None,
            activity_log: None,
            settings: None,
            daily_log: None,
            calendar_entries: None,
            syllabi: None,
        }
    }

    /// Reject snapshots written by an incompatible schema.
    ///
    /// Versions share a major component ("1.x" reads "1.0"); anything else
    /// is an error so import can fail without touching state.
    pub fn validate_version(&self) -> Result<(), SnapshotError> {
        let major = self.version.split('.').next().unwrap_or("");
        let supported = SNAPSHOT_VERSION.split('.').next().unwrap_or("");
        if major == supported {
            Ok(())
        } else {
            Err(SnapshotError::UnsupportedVersion(self.version.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_version_validates() {
        let snapshot = Snapshot::new(Utc::now());
        assert!(snapshot.validate_version().is_ok());
    }

    #[test]
    fn same_major_validates() {
        let mut snapshot = Snapshot::new(Utc::now());
        snapshot.version = "1.7".to_string();
        assert!(snapshot.validate_version().is_ok());
    }

    #[test]
    fn other_major_is_rejected() {
        let mut snapshot = Snapshot::new(Utc::now());
        snapshot.version = "2.0".to_string();
        assert!(matches!(
            snapshot.validate_version(),
            Err(SnapshotError::UnsupportedVersion(v)) if v == "2.0"
        ));
    }
}
