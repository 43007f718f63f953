//! Spaced revision scheduling.
//!
//! Modified SM-2: a fixed base-interval table per revision cycle, scaled by
//! the question's ease factor and extrapolated past the end of the table.

use crate::types::{Difficulty, Question, QuestionStatus, Settings};
use chrono::{Duration, NaiveDate};

/// Growth factor for intervals beyond the configured table.
const EXTRAPOLATION_GROWTH: f64 = 1.5;

/// Minimum ease factor, as in SM-2.
pub const MINIMUM_EASE: f64 = 1.3;

/// Ease factor assigned to new questions.
pub const INITIAL_EASE: f64 = 2.5;

/// Interval scheduler configured from domain settings.
#[derive(Debug, Clone)]
pub struct RevisionScheduler {
    pub total_cycles: u32,
    pub base_intervals: Vec<u32>,
}

impl RevisionScheduler {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            total_cycles: settings.total_cycles,
            base_intervals: settings.base_intervals.clone(),
        }
    }

    /// Next revision date for a question, or `None` once every cycle is
    /// done and the question no longer needs scheduling.
    ///
    /// The interval is `base_interval[cycle] * ease / 2.5`, at least one
    /// day, counted from the last revision (falling back to the solve date,
    /// then to `today`).
    pub fn next_date(&self, question: &Question, today: NaiveDate) -> Option<NaiveDate> {
        if question.revision_cycle >= self.total_cycles {
            return None;
        }

        let cycle = question.revision_cycle as usize;
        let base = match self.base_intervals.get(cycle) {
            Some(&interval) => f64::from(interval),
            None => {
                let last = self.base_intervals.last().copied().unwrap_or(1);
                let past_end = (cycle - self.base_intervals.len() + 1) as i32;
                (f64::from(last) * EXTRAPOLATION_GROWTH.powi(past_end)).round()
            }
        };

        let adjusted = (base * question.ease_factor / INITIAL_EASE).round().max(1.0);
        let from = question
            .last_revision_date
            .or(question.date_solved)
            .unwrap_or(today);
        Some(from + Duration::days(adjusted as i64))
    }
}

impl Default for RevisionScheduler {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// SM-2 ease update: `ef' = ef + (0.1 - (5-q) * (0.08 + (5-q) * 0.02))`,
/// rounded to two decimals and clamped to [`MINIMUM_EASE`].
pub fn update_ease_factor(current: f64, quality: u8) -> f64 {
    let q = f64::from(quality.clamp(1, 5));
    let next = current + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02));
    ((next * 100.0).round() / 100.0).max(MINIMUM_EASE)
}

/// XP earned for one revision: difficulty base, quality bonus of
/// `3 * (q - 3)`, progression bonus of `2 * cycle/3`, never below 5.
pub fn revision_xp(quality: u8, difficulty: Difficulty, cycle: u32) -> u32 {
    let base = i64::from(difficulty.revision_base_xp());
    let quality_bonus = (i64::from(quality.clamp(1, 5)) - 3) * 3;
    let progression_bonus = i64::from(cycle / 3) * 2;
    (base + quality_bonus + progression_bonus).max(5) as u32
}

fn needs_revision(question: &Question) -> bool {
    question.status != QuestionStatus::Mastered && question.next_revision_date.is_some()
}

/// Questions due on or before `today`, mastered ones excluded.
pub fn due_today(questions: &[Question], today: NaiveDate) -> Vec<&Question> {
    questions
        .iter()
        .filter(|q| needs_revision(q) && q.next_revision_date <= Some(today))
        .collect()
}

/// Questions whose due date has already passed.
pub fn overdue(questions: &[Question], today: NaiveDate) -> Vec<&Question> {
    questions
        .iter()
        .filter(|q| needs_revision(q) && matches!(q.next_revision_date, Some(d) if d < today))
        .collect()
}

/// Questions due within the next `days` days (today excluded), soonest first.
pub fn upcoming(questions: &[Question], today: NaiveDate, days: u32) -> Vec<&Question> {
    let horizon = today + Duration::days(i64::from(days));
    let mut due: Vec<&Question> = questions
        .iter()
        .filter(|q| {
            needs_revision(q)
                && matches!(q.next_revision_date, Some(d) if d > today && d <= horizon)
        })
        .collect();
    due.sort_by_key(|q| q.next_revision_date);
    due
}

/// Urgency score for revision ordering: overdue days dominate, then low
/// ease, low per-question streak, and difficulty.
pub fn priority_score(question: &Question, today: NaiveDate) -> i64 {
    let mut score = 0.0;

    if let Some(due) = question.next_revision_date {
        let days_overdue = (today - due).num_days();
        if days_overdue > 0 {
            score += days_overdue as f64 * 10.0;
        }
    }

    score += (3.0 - question.ease_factor) * 20.0;
    score += f64::from(5u32.saturating_sub(question.streak)) * 3.0;
    let difficulty_weight = match question.difficulty {
        Difficulty::Easy => 1.0,
        Difficulty::Medium => 2.0,
        Difficulty::Hard => 3.0,
    };
    score += difficulty_weight * 2.0;

    score.round() as i64
}
