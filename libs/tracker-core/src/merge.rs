//! Conflict resolution between local and remote record sets.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A record that can participate in last-writer-wins merging.
pub trait MergeRecord {
    fn merge_id(&self) -> &str;
    fn merge_updated_at(&self) -> Option<DateTime<Utc>>;
}

impl MergeRecord for crate::types::Question {
    fn merge_id(&self) -> &str {
        &self.id
    }

    fn merge_updated_at(&self) -> Option<DateTime<Utc>> {
        Some(self.updated_at)
    }
}

/// Merge two record sets, whole-record last-writer-wins.
///
/// The map is seeded from `local`; a remote record replaces the local one
/// iff no local record shares its id, or both carry an updated-at and the
/// remote timestamp is strictly greater. Records present only locally are
/// always preserved (deletes never propagate through merge). Result order
/// is unspecified.
pub fn merge_by_updated_at<T: MergeRecord>(local: Vec<T>, remote: Vec<T>) -> Vec<T> {
    let mut map: HashMap<String, T> = local
        .into_iter()
        .map(|record| (record.merge_id().to_string(), record))
        .collect();

    for record in remote {
        let replace = match map.get(record.merge_id()) {
            None => true,
            Some(existing) => matches!(
                (record.merge_updated_at(), existing.merge_updated_at()),
                (Some(remote_at), Some(local_at)) if remote_at > local_at
            ),
        };
        if replace {
            map.insert(record.merge_id().to_string(), record);
        }
    }

    map.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq, PartialOrd, Ord, Eq)]
    struct Rec {
        id: &'static str,
        stamp: i64,
        body: &'static str,
    }

    impl MergeRecord for Rec {
        fn merge_id(&self) -> &str {
            self.id
        }

        fn merge_updated_at(&self) -> Option<DateTime<Utc>> {
            Some(Utc.timestamp_opt(self.stamp, 0).unwrap())
        }
    }

    fn rec(id: &'static str, stamp: i64, body: &'static str) -> Rec {
        Rec { id, stamp, body }
    }

    fn sorted(mut records: Vec<Rec>) -> Vec<Rec> {
        records.sort();
        records
    }

    #[test]
    fn newer_remote_wins_regardless_of_side() {
        let older = rec("a", 100, "old");
        let newer = rec("a", 200, "new");

        let forward = merge_by_updated_at(vec![older.clone()], vec![newer.clone()]);
        assert_eq!(forward, vec![newer.clone()]);

        let reversed = merge_by_updated_at(vec![newer.clone()], vec![older]);
        assert_eq!(reversed, vec![newer]);
    }

    #[test]
    fn local_only_records_survive() {
        let merged = merge_by_updated_at(vec![rec("a", 1, "x"), rec("b", 1, "y")], vec![]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn remote_only_records_are_adopted() {
        let merged = merge_by_updated_at(vec![rec("a", 1, "x")], vec![rec("b", 1, "y")]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn equal_timestamps_keep_local() {
        let merged = merge_by_updated_at(vec![rec("a", 5, "local")], vec![rec("a", 5, "remote")]);
        assert_eq!(merged[0].body, "local");
    }

    #[test]
    fn merge_is_idempotent() {
        let local = vec![rec("a", 10, "la"), rec("b", 30, "lb"), rec("c", 1, "lc")];
        let remote = vec![rec("a", 20, "ra"), rec("b", 5, "rb"), rec("d", 9, "rd")];

        let once = merge_by_updated_at(local, remote.clone());
        let twice = merge_by_updated_at(once.clone(), remote);
        assert_eq!(sorted(once), sorted(twice));
    }
}
