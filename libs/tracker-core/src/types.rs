//! Core types for the study tracker.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Question difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

impl Difficulty {
    /// XP awarded for first solving a question of this difficulty.
    pub fn solve_xp(self) -> u32 {
        match self {
            Self::Easy => 5,
            Self::Medium => 10,
            Self::Hard => 15,
        }
    }

    /// Base XP for one revision of a question of this difficulty.
    pub fn revision_base_xp(self) -> u32 {
        match self {
            Self::Easy => 10,
            Self::Medium => 15,
            Self::Hard => 25,
        }
    }
}

/// Question lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStatus {
    Solved,
    InProgress,
    NeedsRevision,
    Mastered,
}

impl Default for QuestionStatus {
    fn default() -> Self {
        Self::Solved
    }
}

/// One completed revision of a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionEntry {
    pub date: NaiveDate,
    /// Recall quality, 1 (blackout) to 5 (perfect).
    pub quality: u8,
    /// Minutes spent on the revision.
    pub time_taken: u32,
    #[serde(default)]
    pub notes: String,
    /// Cycle number this revision was attempted at (1-based).
    pub cycle: u32,
}

/// A tracked question with its spaced-revision state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub difficulty: Difficulty,
    pub status: QuestionStatus,
    /// Minutes taken to solve originally.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_taken: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: String,
    /// Completed revision cycles, 0 for a freshly solved question.
    pub revision_cycle: u32,
    #[serde(default)]
    pub revision_history: Vec<RevisionEntry>,
    /// Spaced-repetition difficulty weight, 2.5 for new questions.
    pub ease_factor: f64,
    /// Consecutive successful revisions of this question.
    pub streak: u32,
    pub xp_earned: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_solved: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_revision_date: Option<NaiveDate>,
    /// None once the question is mastered (no further revisions scheduled).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_revision_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new question; the store fills in the rest.
#[derive(Debug, Clone, Default)]
pub struct NewQuestion {
    pub name: String,
    pub subject: String,
    pub difficulty: Difficulty,
    pub status: QuestionStatus,
    pub time_taken: Option<u32>,
    pub tags: Vec<String>,
    pub notes: String,
    pub date_solved: Option<NaiveDate>,
}

/// Singleton per-user progress record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_xp: u32,
    pub level: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_active_date: Option<NaiveDate>,
    /// Unlocked badge ids. Set semantics, no duplicates.
    #[serde(default)]
    pub badges: Vec<String>,
    pub total_revisions: u32,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            total_xp: 0,
            level: 1,
            current_streak: 0,
            longest_streak: 0,
            last_active_date: None,
            badges: Vec::new(),
            total_revisions: 0,
        }
    }
}

/// Kind tag for audit-trail entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Add,
    Delete,
    Revision,
    Reset,
    LevelUp,
    Streak,
    StreakLost,
    Badge,
    Import,
}

/// One entry in the append-only activity log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: String,
    pub kind: ActivityKind,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Per-day activity counters feeding streak and heatmap computations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub solved: u32,
    pub revised: u32,
    pub xp_earned: u32,
}

/// Which counter a daily-log update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailyKind {
    Solved,
    Revised,
}

pub type DailyLog = BTreeMap<NaiveDate, DailyEntry>;

/// Planner entry attached to a calendar day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub important: bool,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tasks: Vec<String>,
    pub last_modified: DateTime<Utc>,
}

impl CalendarEntry {
    /// An entry with no content is deleted rather than stored.
    pub fn is_empty(&self) -> bool {
        !self.important && self.notes.is_empty() && self.tasks.is_empty()
    }
}

pub type CalendarEntries = BTreeMap<NaiveDate, CalendarEntry>;

/// One topic/chapter inside a syllabus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub name: String,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<NaiveDate>,
}

impl Topic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            completed: false,
            completed_date: None,
        }
    }
}

/// A course syllabus with its ordered topic list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Syllabus {
    pub id: String,
    pub name: String,
    pub stream: String,
    pub topics: Vec<Topic>,
}

impl Syllabus {
    pub fn completed_count(&self) -> usize {
        self.topics.iter().filter(|t| t.completed).count()
    }
}

/// Domain settings, persisted as their own entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Revision cycles before a question counts as mastered.
    pub total_cycles: u32,
    pub daily_goal: u32,
    /// Day offsets per revision cycle; extrapolated past the end.
    pub base_intervals: Vec<u32>,
    pub notifications_enabled: bool,
    pub overdue_alerts: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            total_cycles: 15,
            daily_goal: 5,
            base_intervals: vec![0, 1, 3, 7, 14, 21, 30, 45, 60, 90, 120, 150, 180, 210, 240],
            notifications_enabled: false,
            overdue_alerts: true,
        }
    }
}
