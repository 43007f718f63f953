//! Local-first record store.
//!
//! Owns every persisted entity family. Mutations write to the local cache
//! first, return synchronously, and schedule a whole-record remote push;
//! the store never waits on the network. Lookup misses come back as `None`
//! rather than errors.

use crate::db::KvStore;
use crate::sync::{RemoteStore, SyncHandle};
use chrono::{Local, NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracker_core::merge::merge_by_updated_at;
use tracker_core::revision::{RevisionScheduler, INITIAL_EASE};
use tracker_core::snapshot::Snapshot;
use tracker_core::types::{
    ActivityEntry, ActivityKind, CalendarEntries, CalendarEntry, DailyEntry, DailyKind, DailyLog,
    NewQuestion, Question, Settings, Syllabus, Topic, UserStats,
};
use uuid::Uuid;

/// Local cache keys, one entry per entity family.
mod keys {
    pub const QUESTIONS: &str = "questions";
    pub const USER_STATS: &str = "user_stats";
    pub const ACTIVITY_LOG: &str = "activity_log";
    pub const SETTINGS: &str = "settings";
    pub const DAILY_LOG: &str = "daily_log";
    pub const CALENDAR_ENTRIES: &str = "calendar_entries";
    pub const SYLLABI: &str = "syllabi";

    pub const ALL: &[&str] = &[
        QUESTIONS,
        USER_STATS,
        ACTIVITY_LOG,
        SETTINGS,
        DAILY_LOG,
        CALENDAR_ENTRIES,
        SYLLABI,
    ];
}

/// Remote collection names, one document per entity instance.
pub mod collections {
    pub const QUESTIONS: &str = "questions";
    pub const USER_STATS: &str = "user_stats";
    pub const SETTINGS: &str = "settings";
    pub const ACTIVITY_LOG: &str = "activity_log";
    pub const DAILY_LOG: &str = "daily_log";
}

/// Document id for singleton records (stats, settings).
pub const SINGLETON_ID: &str = "current";

/// The activity log keeps only this many newest entries.
pub const MAX_ACTIVITY_ENTRIES: usize = 200;

/// Today per the local wall clock; day boundaries follow the user's clock,
/// not UTC.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(DIGITS[(value % 36) as usize] as char);
        value /= 36;
    }
    digits.iter().rev().collect()
}

/// Time-based prefix plus random suffix. Uniqueness is by convention only;
/// collision probability is negligible but not zero.
fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let uuid = Uuid::new_v4().simple().to_string();
    format!("{}{}", to_base36(millis), &uuid[..6])
}

/// Local-first domain repository.
pub struct TrackerStore {
    kv: KvStore,
    sync: SyncHandle,
    remote: Option<Arc<dyn RemoteStore>>,
}

impl TrackerStore {
    /// Build the store. With a remote configured this spawns the sync
    /// worker, so it must run inside a tokio runtime; without one, every
    /// remote operation becomes a logged no-op.
    pub fn new(kv: KvStore, remote: Option<Arc<dyn RemoteStore>>) -> Self {
        let sync = match &remote {
            Some(remote) => SyncHandle::spawn(Arc::clone(remote)),
            None => SyncHandle::disabled(),
        };
        Self { kv, sync, remote }
    }

    /// Drain outstanding sync tasks and shut the worker down.
    pub async fn close(self) {
        self.sync.close().await;
    }

    fn push_doc<T: Serialize>(&self, collection: &'static str, id: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(data) => self.sync.push_item(collection, id, data),
            Err(error) => {
                tracing::warn!(collection, id, %error, "skipping remote push of unserializable value");
            }
        }
    }

    // ── Questions ──

    pub fn questions(&self) -> Vec<Question> {
        self.kv.load(keys::QUESTIONS, Vec::new)
    }

    pub fn question_by_id(&self, id: &str) -> Option<Question> {
        self.questions().into_iter().find(|q| q.id == id)
    }

    /// Create a question: assigns an id, stamps timestamps, seeds the
    /// revision state and schedules the first revision.
    pub fn add_question(&self, new: NewQuestion) -> Question {
        let now = Utc::now();
        let today = local_today();
        let scheduler = RevisionScheduler::from_settings(&self.settings());

        let mut question = Question {
            id: generate_id(),
            name: new.name,
            subject: new.subject,
            difficulty: new.difficulty,
            status: new.status,
            time_taken: new.time_taken,
            tags: new.tags,
            notes: new.notes,
            revision_cycle: 0,
            revision_history: Vec::new(),
            ease_factor: INITIAL_EASE,
            streak: 0,
            xp_earned: 0,
            date_solved: new.date_solved.or(Some(today)),
            last_revision_date: None,
            next_revision_date: None,
            created_at: now,
            updated_at: now,
        };
        question.next_revision_date = scheduler.next_date(&question, today);

        let mut list = self.questions();
        list.push(question.clone());
        self.kv.save(keys::QUESTIONS, &list);

        self.push_doc(collections::QUESTIONS, &question.id, &question);
        self.add_activity(
            ActivityKind::Add,
            format!("Added \"{}\" ({})", question.name, question.subject),
        );
        question
    }

    /// Apply a mutation to one question. Re-stamps `updated_at` and pushes
    /// the whole updated record. `None` for an unknown id.
    pub fn update_question<F>(&self, id: &str, apply: F) -> Option<Question>
    where
        F: FnOnce(&mut Question),
    {
        let mut list = self.questions();
        let question = list.iter_mut().find(|q| q.id == id)?;
        apply(question);
        question.updated_at = Utc::now();
        let updated = question.clone();
        self.kv.save(keys::QUESTIONS, &list);

        self.push_doc(collections::QUESTIONS, &updated.id, &updated);
        Some(updated)
    }

    pub fn delete_question(&self, id: &str) {
        let mut list = self.questions();
        let before = list.len();
        list.retain(|q| q.id != id);
        if list.len() == before {
            return;
        }
        self.kv.save(keys::QUESTIONS, &list);

        self.sync.delete_item(collections::QUESTIONS, id);
        self.add_activity(ActivityKind::Delete, "Deleted a question");
    }

    // ── User stats ──

    pub fn user_stats(&self) -> UserStats {
        self.kv.load(keys::USER_STATS, UserStats::default)
    }

    pub fn save_user_stats(&self, stats: &UserStats) {
        self.kv.save(keys::USER_STATS, stats);
        self.push_doc(collections::USER_STATS, SINGLETON_ID, stats);
    }

    pub fn update_user_stats<F>(&self, apply: F) -> UserStats
    where
        F: FnOnce(&mut UserStats),
    {
        let mut stats = self.user_stats();
        apply(&mut stats);
        self.save_user_stats(&stats);
        stats
    }

    // ── Settings ──

    pub fn settings(&self) -> Settings {
        self.kv.load(keys::SETTINGS, Settings::default)
    }

    pub fn save_settings(&self, settings: &Settings) {
        self.kv.save(keys::SETTINGS, settings);
        self.push_doc(collections::SETTINGS, SINGLETON_ID, settings);
    }

    // ── Activity log ──

    pub fn activity_log(&self) -> Vec<ActivityEntry> {
        self.kv.load(keys::ACTIVITY_LOG, Vec::new)
    }

    /// Prepend an entry (most recent first) and evict past the cap.
    pub fn add_activity(&self, kind: ActivityKind, text: impl Into<String>) {
        let entry = ActivityEntry {
            id: generate_id(),
            kind,
            text: text.into(),
            timestamp: Utc::now(),
        };
        self.push_doc(collections::ACTIVITY_LOG, &entry.id, &entry);

        let mut log = self.activity_log();
        log.insert(0, entry);
        log.truncate(MAX_ACTIVITY_ENTRIES);
        self.kv.save(keys::ACTIVITY_LOG, &log);
    }

    // ── Daily log ──

    pub fn daily_log(&self) -> DailyLog {
        self.kv.load(keys::DAILY_LOG, DailyLog::new)
    }

    /// Bump the solved/revised counter for a day, creating the entry lazily.
    pub fn log_daily_activity(&self, date: NaiveDate, kind: DailyKind) {
        let mut log = self.daily_log();
        let entry = log.entry(date).or_default();
        match kind {
            DailyKind::Solved => entry.solved += 1,
            DailyKind::Revised => entry.revised += 1,
        }
        let snapshot: DailyEntry = entry.clone();
        self.kv.save(keys::DAILY_LOG, &log);
        self.push_doc(collections::DAILY_LOG, &date.to_string(), &snapshot);
    }

    pub fn add_daily_xp(&self, date: NaiveDate, amount: u32) {
        let mut log = self.daily_log();
        let entry = log.entry(date).or_default();
        entry.xp_earned += amount;
        let snapshot: DailyEntry = entry.clone();
        self.kv.save(keys::DAILY_LOG, &log);
        self.push_doc(collections::DAILY_LOG, &date.to_string(), &snapshot);
    }

    // ── Calendar entries (local only) ──

    pub fn calendar_entries(&self) -> CalendarEntries {
        self.kv.load(keys::CALENDAR_ENTRIES, CalendarEntries::new)
    }

    pub fn calendar_entry(&self, date: NaiveDate) -> Option<CalendarEntry> {
        self.calendar_entries().remove(&date)
    }

    /// Store an entry under a day, stamping `last_modified`. An entry whose
    /// fields are all empty deletes the day instead and returns `None`.
    pub fn save_calendar_entry(
        &self,
        date: NaiveDate,
        mut entry: CalendarEntry,
    ) -> Option<CalendarEntry> {
        let mut entries = self.calendar_entries();
        if entry.is_empty() {
            entries.remove(&date);
            self.kv.save(keys::CALENDAR_ENTRIES, &entries);
            return None;
        }
        entry.last_modified = Utc::now();
        entries.insert(date, entry.clone());
        self.kv.save(keys::CALENDAR_ENTRIES, &entries);
        Some(entry)
    }

    pub fn delete_calendar_entry(&self, date: NaiveDate) {
        let mut entries = self.calendar_entries();
        if entries.remove(&date).is_some() {
            self.kv.save(keys::CALENDAR_ENTRIES, &entries);
        }
    }

    // ── Syllabi (local only) ──

    pub fn syllabi(&self) -> Vec<Syllabus> {
        self.kv.load(keys::SYLLABI, Vec::new)
    }

    pub fn add_syllabus(
        &self,
        name: impl Into<String>,
        stream: impl Into<String>,
        topic_names: Vec<String>,
    ) -> Syllabus {
        let syllabus = Syllabus {
            id: generate_id(),
            name: name.into(),
            stream: stream.into(),
            topics: topic_names.into_iter().map(Topic::new).collect(),
        };
        let mut list = self.syllabi();
        list.push(syllabus.clone());
        self.kv.save(keys::SYLLABI, &list);
        syllabus
    }

    pub fn delete_syllabus(&self, id: &str) {
        let mut list = self.syllabi();
        let before = list.len();
        list.retain(|s| s.id != id);
        if list.len() != before {
            self.kv.save(keys::SYLLABI, &list);
        }
    }

    /// Flip a topic's completion, stamping or clearing its completion date.
    pub fn toggle_topic(&self, syllabus_id: &str, index: usize) -> Option<Topic> {
        let mut list = self.syllabi();
        let syllabus = list.iter_mut().find(|s| s.id == syllabus_id)?;
        let topic = syllabus.topics.get_mut(index)?;
        topic.completed = !topic.completed;
        topic.completed_date = topic.completed.then(local_today);
        let updated = topic.clone();
        self.kv.save(keys::SYLLABI, &list);
        Some(updated)
    }

    pub fn add_topic(&self, syllabus_id: &str, name: impl Into<String>) -> Option<Syllabus> {
        let mut list = self.syllabi();
        let syllabus = list.iter_mut().find(|s| s.id == syllabus_id)?;
        syllabus.topics.push(Topic::new(name));
        let updated = syllabus.clone();
        self.kv.save(keys::SYLLABI, &list);
        Some(updated)
    }

    pub fn delete_topic(&self, syllabus_id: &str, index: usize) -> Option<Syllabus> {
        let mut list = self.syllabi();
        let syllabus = list.iter_mut().find(|s| s.id == syllabus_id)?;
        if index >= syllabus.topics.len() {
            return None;
        }
        syllabus.topics.remove(index);
        let updated = syllabus.clone();
        self.kv.save(keys::SYLLABI, &list);
        Some(updated)
    }

    // ── Export / import ──

    /// Serialize the full local state as a versioned JSON document.
    pub fn export_snapshot(&self) -> String {
        let mut snapshot = Snapshot::new(Utc::now());
        snapshot.questions = Some(self.questions());
        snapshot.user_stats = Some(self.user_stats());
        snapshot.activity_log = Some(self.activity_log());
        snapshot.settings = Some(self.settings());
        snapshot.daily_log = Some(self.daily_log());
        snapshot.calendar_entries = Some(self.calendar_entries());
        snapshot.syllabi = Some(self.syllabi());

        serde_json::to_string_pretty(&snapshot).unwrap_or_else(|error| {
            tracing::warn!(%error, "snapshot export failed");
            String::from("{}")
        })
    }

    /// Import a snapshot. All-or-nothing per entity family: parsing and
    /// version validation happen before any write, each family present in
    /// the document wholesale-replaces the local one, and imported
    /// questions are re-pushed remotely. Malformed input returns `false`
    /// with state untouched.
    pub fn import_snapshot(&self, raw: &str) -> bool {
        let snapshot: Snapshot = match serde_json::from_str(raw) {
            Ok(snapshot) => snapshot,
            Err(error) => {
                tracing::warn!(%error, "rejecting malformed snapshot");
                return false;
            }
        };
        if let Err(error) = snapshot.validate_version() {
            tracing::warn!(%error, "rejecting snapshot");
            return false;
        }

        if let Some(questions) = snapshot.questions {
            self.kv.save(keys::QUESTIONS, &questions);
            for question in &questions {
                self.push_doc(collections::QUESTIONS, &question.id, question);
            }
        }
        if let Some(stats) = snapshot.user_stats {
            self.kv.save(keys::USER_STATS, &stats);
        }
        if let Some(log) = snapshot.activity_log {
            self.kv.save(keys::ACTIVITY_LOG, &log);
        }
        if let Some(settings) = snapshot.settings {
            self.kv.save(keys::SETTINGS, &settings);
        }
        if let Some(daily) = snapshot.daily_log {
            self.kv.save(keys::DAILY_LOG, &daily);
        }
        if let Some(entries) = snapshot.calendar_entries {
            self.kv.save(keys::CALENDAR_ENTRIES, &entries);
        }
        if let Some(syllabi) = snapshot.syllabi {
            self.kv.save(keys::SYLLABI, &syllabi);
        }

        self.add_activity(ActivityKind::Import, "Imported data snapshot");
        true
    }

    /// Clear every local family and schedule a remote wipe of the question
    /// collection.
    pub fn reset_all(&self) {
        for key in keys::ALL {
            self.kv.remove(key);
        }
        self.sync.wipe(collections::QUESTIONS);
        tracing::info!("local state reset");
    }

    // ── Startup pull ──

    /// One-shot pull-and-merge of the question collection, run once at
    /// startup. An empty remote is bootstrapped from local data; otherwise
    /// the merged superset is persisted locally and re-pushed so both sides
    /// converge. Never raises: every failure is logged and reported as
    /// `false`.
    pub async fn sync_from_remote(&self) -> bool {
        let Some(remote) = &self.remote else {
            tracing::debug!("no remote configured, skipping startup pull");
            return false;
        };

        let documents = match remote.fetch_all(collections::QUESTIONS).await {
            Ok(documents) => documents,
            Err(error) => {
                tracing::warn!(%error, "startup pull failed, staying on local data");
                return false;
            }
        };

        let local = self.questions();
        if documents.is_empty() {
            if !local.is_empty() {
                tracing::info!(count = local.len(), "remote empty, bootstrapping from local");
                for question in &local {
                    self.push_doc(collections::QUESTIONS, &question.id, question);
                }
            }
            return false;
        }

        let mut remote_questions = Vec::with_capacity(documents.len());
        for document in documents {
            match serde_json::from_value::<Question>(document) {
                Ok(question) => remote_questions.push(question),
                Err(error) => tracing::warn!(%error, "skipping undecodable remote question"),
            }
        }

        let merged = merge_by_updated_at(local, remote_questions);
        tracing::info!(count = merged.len(), "merged remote questions");
        self.kv.save(keys::QUESTIONS, &merged);
        for question in &merged {
            self.push_doc(collections::QUESTIONS, &question.id, question);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::MemoryRemoteStore;
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tracker_core::types::Difficulty;

    fn test_store() -> TrackerStore {
        TrackerStore::new(KvStore::open_in_memory().unwrap(), None)
    }

    fn new_question(name: &str, subject: &str) -> NewQuestion {
        NewQuestion {
            name: name.into(),
            subject: subject.into(),
            difficulty: Difficulty::Medium,
            ..Default::default()
        }
    }

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, n).unwrap()
    }

    /// Question with fixed timestamps, for seeding the cache directly when
    /// a test must control what is local before the store goes online.
    fn question_fixture(id: &str, name: &str, stamp_offset_secs: i64) -> Question {
        use chrono::TimeZone;
        let stamp = chrono::Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()
            + Duration::seconds(stamp_offset_secs);
        Question {
            id: id.into(),
            name: name.into(),
            subject: "arrays".into(),
            difficulty: Difficulty::Medium,
            status: Default::default(),
            time_taken: None,
            tags: Vec::new(),
            notes: String::new(),
            revision_cycle: 0,
            revision_history: Vec::new(),
            ease_factor: 2.5,
            streak: 0,
            xp_earned: 0,
            date_solved: Some(day(1)),
            last_revision_date: None,
            next_revision_date: Some(day(2)),
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[test]
    fn add_question_seeds_revision_state() {
        let store = test_store();
        let question = store.add_question(new_question("two sum", "arrays"));

        assert!(!question.id.is_empty());
        assert_eq!(question.revision_cycle, 0);
        assert_eq!(question.ease_factor, 2.5);
        assert!(question.next_revision_date.is_some());
        assert!(question.date_solved.is_some());

        assert_eq!(store.questions().len(), 1);
        assert_eq!(store.question_by_id(&question.id).unwrap().name, "two sum");
        assert_eq!(store.activity_log()[0].kind, ActivityKind::Add);
    }

    #[test]
    fn generated_ids_are_unique() {
        let store = test_store();
        let a = store.add_question(new_question("a", "s"));
        let b = store.add_question(new_question("b", "s"));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn update_restamps_updated_at() {
        let store = test_store();
        let question = store.add_question(new_question("two sum", "arrays"));

        let updated = store.update_question(&question.id, |q| q.streak = 3).unwrap();
        assert_eq!(updated.streak, 3);
        assert!(updated.updated_at >= question.updated_at);
        assert_eq!(store.question_by_id(&question.id).unwrap().streak, 3);
    }

    #[test]
    fn update_unknown_id_is_none() {
        let store = test_store();
        assert!(store.update_question("missing", |q| q.streak = 1).is_none());
        assert!(store.question_by_id("missing").is_none());
    }

    #[test]
    fn delete_removes_and_logs() {
        let store = test_store();
        let question = store.add_question(new_question("two sum", "arrays"));
        store.delete_question(&question.id);

        assert!(store.questions().is_empty());
        assert_eq!(store.activity_log()[0].kind, ActivityKind::Delete);
    }

    #[test]
    fn activity_log_keeps_newest_200() {
        let store = test_store();
        for i in 0..205 {
            store.add_activity(ActivityKind::Add, format!("entry {i}"));
        }

        let log = store.activity_log();
        assert_eq!(log.len(), MAX_ACTIVITY_ENTRIES);
        assert_eq!(log[0].text, "entry 204");
        assert_eq!(log[199].text, "entry 5");
    }

    #[test]
    fn daily_log_creates_entries_lazily() {
        let store = test_store();
        store.log_daily_activity(day(3), DailyKind::Solved);
        store.log_daily_activity(day(3), DailyKind::Solved);
        store.log_daily_activity(day(3), DailyKind::Revised);
        store.add_daily_xp(day(3), 25);

        let log = store.daily_log();
        assert_eq!(log.len(), 1);
        let entry = &log[&day(3)];
        assert_eq!(entry.solved, 2);
        assert_eq!(entry.revised, 1);
        assert_eq!(entry.xp_earned, 25);
    }

    #[test]
    fn empty_calendar_entry_is_deleted() {
        let store = test_store();
        let entry = CalendarEntry {
            important: true,
            notes: "mock exam".into(),
            ..Default::default()
        };
        assert!(store.save_calendar_entry(day(9), entry).is_some());
        assert!(store.calendar_entry(day(9)).is_some());

        let cleared = CalendarEntry::default();
        assert!(store.save_calendar_entry(day(9), cleared).is_none());
        assert!(store.calendar_entries().is_empty());

        store.save_calendar_entry(
            day(10),
            CalendarEntry {
                notes: "revision day".into(),
                ..Default::default()
            },
        );
        store.delete_calendar_entry(day(10));
        assert!(store.calendar_entries().is_empty());
    }

    #[test]
    fn syllabus_topic_lifecycle() {
        let store = test_store();
        let syllabus =
            store.add_syllabus("Operating Systems", "CS", vec!["paging".into(), "scheduling".into()]);

        let toggled = store.toggle_topic(&syllabus.id, 0).unwrap();
        assert!(toggled.completed);
        assert!(toggled.completed_date.is_some());

        let untoggled = store.toggle_topic(&syllabus.id, 0).unwrap();
        assert!(!untoggled.completed);
        assert!(untoggled.completed_date.is_none());

        let with_topic = store.add_topic(&syllabus.id, "deadlocks").unwrap();
        assert_eq!(with_topic.topics.len(), 3);

        let trimmed = store.delete_topic(&syllabus.id, 2).unwrap();
        assert_eq!(trimmed.topics.len(), 2);
        assert!(store.delete_topic(&syllabus.id, 9).is_none());
        assert!(store.toggle_topic("missing", 0).is_none());

        store.delete_syllabus(&syllabus.id);
        assert!(store.syllabi().is_empty());
    }

    #[test]
    fn export_import_round_trips_every_family() {
        let store = test_store();
        store.add_question(new_question("two sum", "arrays"));
        store.add_question(new_question("dfs", "graphs"));
        store.update_user_stats(|s| {
            s.total_xp = 120;
            s.current_streak = 3;
        });
        store.save_settings(&Settings {
            daily_goal: 8,
            ..Default::default()
        });
        store.log_daily_activity(day(2), DailyKind::Solved);
        store.save_calendar_entry(
            day(4),
            CalendarEntry {
                important: true,
                ..Default::default()
            },
        );
        store.add_syllabus("OS", "CS", vec!["paging".into()]);

        let exported = store.export_snapshot();
        let other = test_store();
        assert!(other.import_snapshot(&exported));

        assert_eq!(other.questions(), store.questions());
        assert_eq!(other.user_stats(), store.user_stats());
        assert_eq!(other.settings(), store.settings());
        assert_eq!(other.daily_log(), store.daily_log());
        assert_eq!(other.calendar_entries(), store.calendar_entries());
        assert_eq!(other.syllabi(), store.syllabi());

        // The import itself is the newest audit entry; the rest round-trips.
        let imported_log = other.activity_log();
        assert_eq!(imported_log[0].kind, ActivityKind::Import);
        assert_eq!(imported_log[1..], store.activity_log()[..]);
    }

    #[test]
    fn malformed_import_leaves_state_untouched() {
        let store = test_store();
        store.add_question(new_question("two sum", "arrays"));

        assert!(!store.import_snapshot("definitely not json"));
        assert!(!store.import_snapshot(
            r#"{"version":"9.0","exported_at":"2026-01-01T00:00:00Z","questions":[]}"#
        ));
        assert_eq!(store.questions().len(), 1);
    }

    #[tokio::test]
    async fn mutations_push_whole_records() {
        let remote = Arc::new(MemoryRemoteStore::new());
        let store = TrackerStore::new(KvStore::open_in_memory().unwrap(), Some(remote.clone()));

        let question = store.add_question(new_question("two sum", "arrays"));
        store.update_question(&question.id, |q| q.streak = 2);
        store.close().await;

        let doc = remote.get(collections::QUESTIONS, &question.id).await.unwrap();
        assert_eq!(doc["name"], "two sum");
        assert_eq!(doc["streak"], 2);
    }

    #[tokio::test]
    async fn empty_remote_is_bootstrapped_from_local() {
        let remote = Arc::new(MemoryRemoteStore::new());
        let kv = KvStore::open_in_memory().unwrap();
        kv.save(keys::QUESTIONS, &vec![question_fixture("q1", "two sum", 0)]);
        let store = TrackerStore::new(kv, Some(remote.clone()));

        assert!(!store.sync_from_remote().await);
        store.close().await;

        assert_eq!(remote.len(collections::QUESTIONS).await, 1);
    }

    #[tokio::test]
    async fn pull_merges_newer_remote_and_keeps_local_only() {
        let remote = Arc::new(MemoryRemoteStore::new());
        let newer = question_fixture("q1", "two sum (remote edit)", 30);
        remote
            .seed(
                collections::QUESTIONS,
                "q1",
                serde_json::to_value(&newer).unwrap(),
            )
            .await;

        let kv = KvStore::open_in_memory().unwrap();
        kv.save(
            keys::QUESTIONS,
            &vec![
                question_fixture("q1", "two sum", 0),
                question_fixture("q2", "dfs", 0),
            ],
        );
        let store = TrackerStore::new(kv, Some(remote.clone()));

        assert!(store.sync_from_remote().await);

        assert_eq!(store.questions().len(), 2);
        assert_eq!(
            store.question_by_id("q1").unwrap().name,
            "two sum (remote edit)"
        );
        assert!(store.question_by_id("q2").is_some());
        store.close().await;
    }

    #[tokio::test]
    async fn stale_remote_copy_loses_the_merge() {
        let remote = Arc::new(MemoryRemoteStore::new());
        let stale = question_fixture("q1", "old name", -60);
        remote
            .seed(
                collections::QUESTIONS,
                "q1",
                serde_json::to_value(&stale).unwrap(),
            )
            .await;

        let kv = KvStore::open_in_memory().unwrap();
        kv.save(keys::QUESTIONS, &vec![question_fixture("q1", "two sum", 0)]);
        let store = TrackerStore::new(kv, Some(remote.clone()));

        assert!(store.sync_from_remote().await);

        assert_eq!(store.question_by_id("q1").unwrap().name, "two sum");
        store.close().await;
    }

    #[tokio::test]
    async fn undecodable_remote_documents_are_skipped() {
        let remote = Arc::new(MemoryRemoteStore::new());
        let store = TrackerStore::new(KvStore::open_in_memory().unwrap(), Some(remote.clone()));
        remote
            .seed(collections::QUESTIONS, "junk", json!({"garbage": true}))
            .await;

        assert!(store.sync_from_remote().await);
        assert!(store.questions().is_empty());
        store.close().await;
    }

    #[tokio::test]
    async fn reset_all_clears_local_and_wipes_remote() {
        let remote = Arc::new(MemoryRemoteStore::new());
        let store = TrackerStore::new(KvStore::open_in_memory().unwrap(), Some(remote.clone()));

        store.add_question(new_question("two sum", "arrays"));
        store.reset_all();

        assert!(store.questions().is_empty());
        assert!(store.activity_log().is_empty());
        assert_eq!(remote.len(collections::QUESTIONS).await, 0);
        store.close().await;
    }
}
