//! Gamification engine: XP, levels, streaks, badges.
//!
//! Owns no state of its own; every read and write goes through the store.
//! Celebratory side effects go through the injected presentation hooks.

use crate::hooks::{PresentationHooks, ToastSeverity};
use crate::store::TrackerStore;
use chrono::NaiveDate;
use std::sync::Arc;
use tracker_core::badges::{self, Badge};
use tracker_core::level::{level_from_total_xp, LevelInfo};
use tracker_core::revision::{self, revision_xp, update_ease_factor, RevisionScheduler};
use tracker_core::streak;
use tracker_core::types::{ActivityKind, DailyKind, Question, QuestionStatus, RevisionEntry};

/// XP granted per unlocked badge.
const BADGE_XP: u32 = 30;

/// Result of an XP award.
#[derive(Debug, Clone)]
pub struct XpAward {
    pub amount: u32,
    pub reason: String,
    pub new_total: u32,
    pub level: LevelInfo,
    pub leveled_up: bool,
}

/// Result of completing a revision.
#[derive(Debug, Clone)]
pub struct RevisionOutcome {
    pub question: Question,
    pub xp_earned: u32,
    pub new_cycle: u32,
    pub total_cycles: u32,
    pub mastered: bool,
}

pub struct GamificationEngine {
    store: Arc<TrackerStore>,
    hooks: Arc<dyn PresentationHooks>,
}

impl GamificationEngine {
    pub fn new(store: Arc<TrackerStore>, hooks: Arc<dyn PresentationHooks>) -> Self {
        Self { store, hooks }
    }

    // ── XP and levels ──

    /// Add XP to the stats record and recompute the level.
    ///
    /// One read-modify-write on the single stats record, with no suspension
    /// point between read and write. Anyone introducing real concurrency
    /// here must add a per-record lock around this sequence.
    pub fn award_xp(&self, amount: u32, reason: &str) -> XpAward {
        let mut stats = self.store.user_stats();
        stats.total_xp += amount;
        let level = level_from_total_xp(stats.total_xp);
        let previous_level = stats.level.max(1);
        stats.level = level.level;
        self.store.save_user_stats(&stats);

        let leveled_up = level.level > previous_level;
        if leveled_up {
            self.on_level_up(level.level);
        }

        XpAward {
            amount,
            reason: reason.to_string(),
            new_total: stats.total_xp,
            level,
            leveled_up,
        }
    }

    fn on_level_up(&self, level: u32) {
        self.store.add_activity(
            ActivityKind::LevelUp,
            format!("Leveled up to Level {level}!"),
        );
        self.hooks.on_confetti();
        self.hooks.on_toast(
            &format!("Level up! You're now Level {level}!"),
            ToastSeverity::Success,
        );
    }

    // ── Streaks ──

    /// Record activity for `today` and apply the streak transition.
    ///
    /// Idempotent within a day; consecutive days increment; a gap resets to
    /// one. Milestone lengths grant their bonus exactly once, at the
    /// transition that first reaches them.
    pub fn record_activity(&self, today: NaiveDate) -> u32 {
        let stats = self.store.user_stats();
        let update = streak::advance(stats.last_active_date, stats.current_streak, today);
        if !update.changed {
            return stats.current_streak;
        }

        let count = update.count;
        self.store.update_user_stats(|s| {
            s.current_streak = count;
            s.last_active_date = Some(today);
            s.longest_streak = s.longest_streak.max(count);
        });

        if let Some(bonus) = update.milestone_bonus {
            self.award_xp(bonus, &format!("{count}-day streak bonus"));
            self.store.add_activity(
                ActivityKind::Streak,
                format!("{count}-day streak! +{bonus} XP bonus"),
            );
            self.hooks.on_toast(
                &format!("{count}-day streak achieved! +{bonus} XP!"),
                ToastSeverity::Success,
            );
        }

        count
    }

    /// Passive decay check, e.g. on app open: a streak whose last activity
    /// is neither today nor yesterday is lost.
    pub fn check_streak(&self, today: NaiveDate) -> u32 {
        let stats = self.store.user_stats();
        if stats.current_streak > 0 && streak::is_broken(stats.last_active_date, today) {
            self.store.add_activity(
                ActivityKind::StreakLost,
                format!("Streak of {} days lost", stats.current_streak),
            );
            self.store.update_user_stats(|s| s.current_streak = 0);
            return 0;
        }
        stats.current_streak
    }

    // ── Badges ──

    /// Scan the catalog for newly satisfied badges. Safe to call
    /// arbitrarily often: unlocked badges never re-fire.
    pub fn check_badges(&self) -> Vec<&'static Badge> {
        let stats = self.store.user_stats();
        let questions = self.store.questions();
        let unlocked = badges::newly_satisfied(&stats, &questions);
        if unlocked.is_empty() {
            return unlocked;
        }

        // Persist membership first so the XP awards below can never
        // re-trigger the same badges.
        self.store.update_user_stats(|s| {
            for badge in &unlocked {
                if !s.badges.iter().any(|id| id == badge.id) {
                    s.badges.push(badge.id.to_string());
                }
            }
        });

        for badge in &unlocked {
            self.award_xp(BADGE_XP, &format!("Badge: {}", badge.name));
            self.store.add_activity(
                ActivityKind::Badge,
                format!("Earned badge: \"{}\"", badge.name),
            );
            self.hooks.on_toast(
                &format!("{} Badge unlocked: {}!", badge.icon, badge.name),
                ToastSeverity::Success,
            );
        }

        unlocked
    }

    // ── Solves and revisions ──

    /// Full bookkeeping for a newly solved question: solve XP, daily
    /// counter, streak transition, badge scan.
    pub fn record_solve(&self, question: &Question, today: NaiveDate) -> XpAward {
        let xp = question.difficulty.solve_xp();
        self.store.log_daily_activity(today, DailyKind::Solved);
        let award = self.award_xp(xp, "New question added");
        self.record_activity(today);
        self.check_badges();
        award
    }

    /// Process a completed revision of quality 1-5.
    ///
    /// Updates ease factor, history, cycle (a failed recall regresses one
    /// cycle), per-question streak, status and next date, then feeds XP,
    /// daily counters, the user streak and the badge scan. `None` for an
    /// unknown question id.
    pub fn complete_revision(
        &self,
        question_id: &str,
        quality: u8,
        time_taken: u32,
        notes: &str,
        today: NaiveDate,
    ) -> Option<RevisionOutcome> {
        let settings = self.store.settings();
        let scheduler = RevisionScheduler::from_settings(&settings);
        let question = self.store.question_by_id(question_id)?;

        let quality = quality.clamp(1, 5);
        let new_ease = update_ease_factor(question.ease_factor, quality);
        let attempted_cycle = question.revision_cycle + 1;
        let new_cycle = if quality < 3 {
            question.revision_cycle.saturating_sub(1)
        } else {
            attempted_cycle.min(settings.total_cycles)
        };
        let mastered = new_cycle >= settings.total_cycles;
        let xp = revision_xp(quality, question.difficulty, new_cycle);

        let entry = RevisionEntry {
            date: today,
            quality,
            time_taken,
            notes: notes.to_string(),
            cycle: attempted_cycle,
        };

        let updated = self.store.update_question(question_id, |q| {
            q.ease_factor = new_ease;
            q.revision_cycle = new_cycle;
            q.revision_history.push(entry);
            q.last_revision_date = Some(today);
            q.streak = if quality >= 3 { q.streak + 1 } else { 0 };
            if mastered {
                q.status = QuestionStatus::Mastered;
            } else if quality < 3 {
                q.status = QuestionStatus::NeedsRevision;
            }
            q.xp_earned += xp;
            q.next_revision_date = scheduler.next_date(q, today);
        })?;

        self.store.log_daily_activity(today, DailyKind::Revised);
        self.store.add_daily_xp(today, xp);
        self.store.add_activity(
            ActivityKind::Revision,
            format!(
                "Revised \"{}\" (cycle {}/{}, quality {}/5)",
                updated.name, new_cycle, settings.total_cycles, quality
            ),
        );
        self.store.update_user_stats(|s| s.total_revisions += 1);

        self.award_xp(xp, "Revision completed");
        self.record_activity(today);
        self.check_badges();

        if mastered {
            self.hooks.on_toast(
                &format!("\"{}\" mastered! +{xp} XP", updated.name),
                ToastSeverity::Success,
            );
        }

        Some(RevisionOutcome {
            question: updated,
            xp_earned: xp,
            new_cycle,
            total_cycles: settings.total_cycles,
            mastered,
        })
    }

    /// Send a question back to cycle zero with fresh revision state.
    pub fn reset_revision_cycle(&self, question_id: &str, today: NaiveDate) -> Option<Question> {
        let updated = self.store.update_question(question_id, |q| {
            q.revision_cycle = 0;
            q.ease_factor = revision::INITIAL_EASE;
            q.streak = 0;
            q.status = QuestionStatus::NeedsRevision;
            q.next_revision_date = Some(today);
        })?;
        self.store.add_activity(
            ActivityKind::Reset,
            format!("Reset revisions for \"{}\"", updated.name),
        );
        Some(updated)
    }

    // ── Revision queries ──

    /// Update the pending-revision indicator and report its state.
    pub fn refresh_notification_dot(&self, today: NaiveDate) -> bool {
        let questions = self.store.questions();
        let has_pending = !revision::due_today(&questions, today).is_empty();
        self.hooks.on_notification_dot(has_pending);
        has_pending
    }
}
