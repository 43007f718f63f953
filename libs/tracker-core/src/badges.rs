//! Static badge catalog and idempotent unlock scanning.

use crate::types::{Difficulty, Question, QuestionStatus, UserStats};
use std::collections::HashSet;

/// A one-time-unlockable achievement.
///
/// The predicate is pure; unlock state lives in `UserStats::badges`.
pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub check: fn(&UserStats, &[Question]) -> bool,
}

fn mastered_count(questions: &[Question]) -> usize {
    questions
        .iter()
        .filter(|q| q.status == QuestionStatus::Mastered)
        .count()
}

fn subject_count(questions: &[Question]) -> usize {
    questions
        .iter()
        .map(|q| q.subject.as_str())
        .collect::<HashSet<_>>()
        .len()
}

pub static CATALOG: &[Badge] = &[
    Badge {
        id: "first_question",
        name: "First Step",
        icon: "🌱",
        description: "Log your first question",
        check: |_, q| !q.is_empty(),
    },
    Badge {
        id: "ten_questions",
        name: "Getting Started",
        icon: "📝",
        description: "Log 10 questions",
        check: |_, q| q.len() >= 10,
    },
    Badge {
        id: "fifty_questions",
        name: "Committed",
        icon: "💪",
        description: "Log 50 questions",
        check: |_, q| q.len() >= 50,
    },
    Badge {
        id: "hundred_questions",
        name: "Centurion",
        icon: "🏛️",
        description: "Log 100 questions",
        check: |_, q| q.len() >= 100,
    },
    Badge {
        id: "five_hundred",
        name: "DSA Warrior",
        icon: "⚔️",
        description: "Log 500 questions",
        check: |_, q| q.len() >= 500,
    },
    Badge {
        id: "first_revision",
        name: "Revisor",
        icon: "🔄",
        description: "Complete first revision",
        check: |s, _| s.total_revisions >= 1,
    },
    Badge {
        id: "fifty_revisions",
        name: "Diligent",
        icon: "📖",
        description: "Complete 50 revisions",
        check: |s, _| s.total_revisions >= 50,
    },
    Badge {
        id: "two_hundred_rev",
        name: "Review Master",
        icon: "🎓",
        description: "Complete 200 revisions",
        check: |s, _| s.total_revisions >= 200,
    },
    Badge {
        id: "first_mastered",
        name: "First Mastery",
        icon: "⭐",
        description: "Master your first question",
        check: |_, q| mastered_count(q) >= 1,
    },
    Badge {
        id: "ten_mastered",
        name: "Scholar",
        icon: "🏅",
        description: "Master 10 questions",
        check: |_, q| mastered_count(q) >= 10,
    },
    Badge {
        id: "fifty_mastered",
        name: "Grandmaster",
        icon: "👑",
        description: "Master 50 questions",
        check: |_, q| mastered_count(q) >= 50,
    },
    Badge {
        id: "streak_7",
        name: "Week Warrior",
        icon: "🔥",
        description: "7-day streak",
        check: |s, _| s.longest_streak >= 7,
    },
    Badge {
        id: "streak_30",
        name: "Monthly Dedication",
        icon: "🌟",
        description: "30-day streak",
        check: |s, _| s.longest_streak >= 30,
    },
    Badge {
        id: "streak_100",
        name: "Unstoppable",
        icon: "💎",
        description: "100-day streak",
        check: |s, _| s.longest_streak >= 100,
    },
    Badge {
        id: "level_5",
        name: "Rising Star",
        icon: "🌠",
        description: "Reach Level 5",
        check: |s, _| s.level >= 5,
    },
    Badge {
        id: "level_10",
        name: "Veteran",
        icon: "🏆",
        description: "Reach Level 10",
        check: |s, _| s.level >= 10,
    },
    Badge {
        id: "level_25",
        name: "Legend",
        icon: "🐉",
        description: "Reach Level 25",
        check: |s, _| s.level >= 25,
    },
    Badge {
        id: "all_subjects",
        name: "Well-Rounded",
        icon: "🌐",
        description: "Solve from 5+ subjects",
        check: |_, q| subject_count(q) >= 5,
    },
    Badge {
        id: "hard_master",
        name: "Hard Hitter",
        icon: "🥊",
        description: "Master 5 Hard questions",
        check: |_, q| {
            q.iter()
                .filter(|x| {
                    x.difficulty == Difficulty::Hard && x.status == QuestionStatus::Mastered
                })
                .count()
                >= 5
        },
    },
    Badge {
        id: "speed_demon",
        name: "Speed Demon",
        icon: "⚡",
        description: "Solve 5 questions in <15min each",
        check: |_, q| {
            q.iter()
                .filter(|x| matches!(x.time_taken, Some(t) if t <= 15))
                .count()
                >= 5
        },
    },
];

/// Badges whose predicate now holds but which are not yet unlocked.
///
/// Safe to call arbitrarily often; already-unlocked badges never reappear.
pub fn newly_satisfied(stats: &UserStats, questions: &[Question]) -> Vec<&'static Badge> {
    CATALOG
        .iter()
        .filter(|badge| {
            !stats.badges.iter().any(|id| id == badge.id) && (badge.check)(stats, questions)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn question(subject: &str, status: QuestionStatus) -> Question {
        let now = Utc::now();
        Question {
            id: subject.to_string(),
            name: "two sum".into(),
            subject: subject.into(),
            difficulty: Difficulty::Hard,
            status,
            time_taken: Some(12),
            tags: Vec::new(),
            notes: String::new(),
            revision_cycle: 0,
            revision_history: Vec::new(),
            ease_factor: 2.5,
            streak: 0,
            xp_earned: 0,
            date_solved: None,
            last_revision_date: None,
            next_revision_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn first_question_unlocks() {
        let stats = UserStats::default();
        let questions = vec![question("arrays", QuestionStatus::Solved)];
        let unlocked = newly_satisfied(&stats, &questions);
        assert!(unlocked.iter().any(|b| b.id == "first_question"));
    }

    #[test]
    fn unlocked_badges_never_refire() {
        let questions = vec![question("arrays", QuestionStatus::Solved)];
        let mut stats = UserStats::default();

        let first = newly_satisfied(&stats, &questions);
        for badge in &first {
            stats.badges.push(badge.id.to_string());
        }

        assert!(newly_satisfied(&stats, &questions).is_empty());
    }

    #[test]
    fn catalog_ids_are_unique() {
        let ids: HashSet<_> = CATALOG.iter().map(|b| b.id).collect();
        assert_eq!(ids.len(), CATALOG.len());
    }

    #[test]
    fn mastery_badge_counts_only_mastered() {
        let stats = UserStats::default();
        let questions = vec![
            question("arrays", QuestionStatus::Solved),
            question("graphs", QuestionStatus::Mastered),
        ];
        let unlocked = newly_satisfied(&stats, &questions);
        assert!(unlocked.iter().any(|b| b.id == "first_mastered"));
        assert!(!unlocked.iter().any(|b| b.id == "ten_mastered"));
    }
}
