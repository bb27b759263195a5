//! One-to-one join of two independently fetched collections on a natural key.
//!
//! A key produces a pair only when it occurs exactly once on each side.
//! Keys that are missing from either side, or that occur more than once on
//! either side, are dropped: an ambiguous match is treated the same as no
//! match at all.

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Two records joined by a shared natural key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paired<A, B> {
    pub left: A,
    pub right: B,
}

/// Counters describing what a join kept and dropped.
///
/// `unmatched` and `ambiguous` count distinct keys, not records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinStats {
    pub left: usize,
    pub right: usize,
    pub paired: usize,
    /// Keys present on one side only, exactly once.
    pub unmatched: usize,
    /// Keys present more than once on at least one side.
    pub ambiguous: usize,
}

/// Joins `left` and `right` on the keys extracted by `key_left`/`key_right`.
///
/// Output order follows `left`. See the module docs for the exclusion policy.
pub fn pair_by_key<A, B, K, FA, FB>(
    left: Vec<A>,
    right: Vec<B>,
    key_left: FA,
    key_right: FB,
) -> Vec<Paired<A, B>>
where
    K: Eq + Hash,
    FA: Fn(&A) -> K,
    FB: Fn(&B) -> K,
{
    pair_by_key_with_stats(left, right, key_left, key_right).0
}

/// Same as [`pair_by_key`], also returning [`JoinStats`] for logging.
pub fn pair_by_key_with_stats<A, B, K, FA, FB>(
    left: Vec<A>,
    right: Vec<B>,
    key_left: FA,
    key_right: FB,
) -> (Vec<Paired<A, B>>, JoinStats)
where
    K: Eq + Hash,
    FA: Fn(&A) -> K,
    FB: Fn(&B) -> K,
{
    let mut stats = JoinStats {
        left: left.len(),
        right: right.len(),
        ..JoinStats::default()
    };

    // key -> (occurrences, index of the last occurrence)
    let mut right_index: HashMap<K, (usize, usize)> = HashMap::with_capacity(right.len());
    for (idx, item) in right.iter().enumerate() {
        let entry = right_index.entry(key_right(item)).or_insert((0, idx));
        entry.0 += 1;
        entry.1 = idx;
    }

    let left_keys: Vec<K> = left.iter().map(&key_left).collect();
    let mut left_counts: HashMap<&K, usize> = HashMap::with_capacity(left_keys.len());
    for key in &left_keys {
        *left_counts.entry(key).or_insert(0) += 1;
    }

    for (key, &count) in &left_counts {
        match right_index.get(*key) {
            Some(&(right_count, _)) if count == 1 && right_count == 1 => {}
            Some(_) => stats.ambiguous += 1,
            None if count > 1 => stats.ambiguous += 1,
            None => stats.unmatched += 1,
        }
    }
    for (key, &(count, _)) in &right_index {
        if !left_counts.contains_key(key) {
            if count > 1 {
                stats.ambiguous += 1;
            } else {
                stats.unmatched += 1;
            }
        }
    }

    let pairable: Vec<bool> = left_keys
        .iter()
        .map(|key| {
            left_counts.get(key).copied() == Some(1)
                && matches!(right_index.get(key), Some(&(1, _)))
        })
        .collect();
    let right_positions: Vec<Option<usize>> = left_keys
        .iter()
        .zip(&pairable)
        .map(|(key, &ok)| {
            if ok {
                right_index.get(key).map(|&(_, idx)| idx)
            } else {
                None
            }
        })
        .collect();
    drop(left_counts);

    let mut right_slots: Vec<Option<B>> = right.into_iter().map(Some).collect();
    let mut pairs = Vec::new();
    for (item, position) in left.into_iter().zip(right_positions) {
        if let Some(other) = position.and_then(|idx| right_slots[idx].take()) {
            pairs.push(Paired {
                left: item,
                right: other,
            });
        }
    }

    stats.paired = pairs.len();
    (pairs, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Rec {
        key: &'static str,
        val: &'static str,
    }

    fn rec(key: &'static str, val: &'static str) -> Rec {
        Rec { key, val }
    }

    fn join(a: Vec<Rec>, b: Vec<Rec>) -> (Vec<Paired<Rec, Rec>>, JoinStats) {
        pair_by_key_with_stats(a, b, |r| r.key, |r| r.key)
    }

    #[test]
    fn exact_match_produces_one_pair() {
        let (pairs, stats) = join(vec![rec("1", "a")], vec![rec("1", "b")]);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].left.val, "a");
        assert_eq!(pairs[0].right.val, "b");
        assert_eq!(stats.paired, 1);
        assert_eq!(stats.unmatched, 0);
        assert_eq!(stats.ambiguous, 0);
    }

    #[test]
    fn no_shared_key_produces_no_pair() {
        let (pairs, stats) = join(vec![rec("1", "a")], vec![rec("2", "b")]);
        assert!(pairs.is_empty());
        assert_eq!(stats.unmatched, 2);
    }

    #[test]
    fn duplicate_key_on_right_is_dropped() {
        let (pairs, stats) = join(
            vec![rec("1", "a")],
            vec![rec("1", "b"), rec("1", "c")],
        );
        assert!(pairs.is_empty(), "ambiguous match must be excluded");
        assert_eq!(stats.ambiguous, 1);
    }

    #[test]
    fn duplicate_key_on_left_is_dropped() {
        let (pairs, stats) = join(
            vec![rec("1", "a"), rec("1", "z")],
            vec![rec("1", "b")],
        );
        assert!(pairs.is_empty());
        assert_eq!(stats.ambiguous, 1);
    }

    #[test]
    fn output_follows_left_order() {
        let left = vec![rec("3", "c"), rec("1", "a"), rec("2", "b")];
        let right = vec![rec("1", "x"), rec("2", "y"), rec("3", "z")];
        let pairs = pair_by_key(left, right, |r| r.key, |r| r.key);
        let order: Vec<&str> = pairs.iter().map(|p| p.left.key).collect();
        assert_eq!(order, vec!["3", "1", "2"]);
        assert_eq!(pairs[0].right.val, "z");
    }

    #[test]
    fn ambiguous_keys_do_not_affect_other_pairs() {
        let left = vec![rec("1", "a"), rec("2", "b")];
        let right = vec![rec("2", "x"), rec("1", "y"), rec("1", "w")];
        let (pairs, stats) = join(left, right);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].left.key, "2");
        assert_eq!(pairs[0].right.val, "x");
        assert_eq!(stats.left, 2);
        assert_eq!(stats.right, 3);
        assert_eq!(stats.ambiguous, 1);
    }

    #[test]
    fn empty_inputs_produce_nothing() {
        let (pairs, stats) = join(Vec::new(), Vec::new());
        assert!(pairs.is_empty());
        assert_eq!(stats, JoinStats::default());
    }
}
