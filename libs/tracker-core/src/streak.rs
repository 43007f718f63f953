//! Daily streak state machine.

use chrono::{Duration, NaiveDate};

/// Result of applying an activity to the streak state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreakUpdate {
    pub count: u32,
    /// False when the day was already counted (same-day activity is a no-op).
    pub changed: bool,
    /// One-time bonus XP if this transition first reached a milestone.
    pub milestone_bonus: Option<u32>,
}

/// Transition on "activity recorded today".
///
/// Same day: no-op. Consecutive day: increment. Anything else (gap of two
/// or more days, or first-ever activity): reset to 1.
pub fn advance(last_active: Option<NaiveDate>, current: u32, today: NaiveDate) -> StreakUpdate {
    if last_active == Some(today) {
        return StreakUpdate {
            count: current,
            changed: false,
            milestone_bonus: None,
        };
    }
    let count = if last_active == Some(today - Duration::days(1)) {
        current + 1
    } else {
        1
    };
    StreakUpdate {
        count,
        changed: true,
        milestone_bonus: milestone_bonus(count),
    }
}

/// Bonus XP awarded the first time a streak reaches the given length.
pub fn milestone_bonus(count: u32) -> Option<u32> {
    match count {
        7 => Some(50),
        14 => Some(100),
        30 => Some(200),
        60 => Some(400),
        100 => Some(800),
        _ => None,
    }
}

/// Passive decay check: true when the last activity is neither today nor
/// yesterday, so a running streak should be zeroed.
pub fn is_broken(last_active: Option<NaiveDate>, today: NaiveDate) -> bool {
    match last_active {
        Some(date) => date != today && date != today - Duration::days(1),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, n).unwrap()
    }

    #[test]
    fn same_day_is_idempotent() {
        let update = advance(Some(day(10)), 4, day(10));
        assert_eq!(update.count, 4);
        assert!(!update.changed);
        assert_eq!(update.milestone_bonus, None);
    }

    #[test]
    fn consecutive_days_increment() {
        let update = advance(Some(day(9)), 4, day(10));
        assert_eq!(update.count, 5);
        assert!(update.changed);
    }

    #[test]
    fn gap_resets_to_one() {
        let update = advance(Some(day(7)), 9, day(10));
        assert_eq!(update.count, 1);
        assert!(update.changed);
    }

    #[test]
    fn first_activity_starts_at_one() {
        let update = advance(None, 0, day(10));
        assert_eq!(update.count, 1);
        assert!(update.changed);
    }

    #[test]
    fn milestone_fires_only_at_threshold() {
        assert_eq!(advance(Some(day(9)), 6, day(10)).milestone_bonus, Some(50));
        assert_eq!(advance(Some(day(9)), 7, day(10)).milestone_bonus, None);
        assert_eq!(milestone_bonus(100), Some(800));
        assert_eq!(milestone_bonus(101), None);
    }

    #[test]
    fn broken_detection() {
        assert!(!is_broken(None, day(10)));
        assert!(!is_broken(Some(day(10)), day(10)));
        assert!(!is_broken(Some(day(9)), day(10)));
        assert!(is_broken(Some(day(8)), day(10)));
    }
}
