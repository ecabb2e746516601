//! Community leaderboards and the filter/sort/rank pass the dashboard applies to them.

use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub name: String,
    pub value: f64,
}

impl LeaderboardEntry {
    pub fn new(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub rank: usize,
    pub name: String,
    pub value: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboards<T> {
    pub top_chatters: Vec<T>,
    pub top_donors: Vec<T>,
    pub top_subs: Vec<T>,
}

impl Leaderboards<LeaderboardEntry> {
    /// The canned boards served in demo mode.
    pub fn demo() -> Self {
        Self {
            top_chatters: vec![
                LeaderboardEntry::new("poneytv", 12931.0),
                LeaderboardEntry::new("alice__", 11002.0),
                LeaderboardEntry::new("bobinator", 9988.0),
            ],
            top_donors: vec![
                LeaderboardEntry::new("kind_whale", 420.5),
                LeaderboardEntry::new("alice__", 180.0),
            ],
            top_subs: vec![
                LeaderboardEntry::new("poneytv", 28.0),
                LeaderboardEntry::new("luna", 21.0),
            ],
        }
    }

    pub fn ranked(&self, filter: Option<&str>, limit: Option<usize>) -> Leaderboards<RankedEntry> {
        Leaderboards {
            top_chatters: rank_entries(&self.top_chatters, filter, limit),
            top_donors: rank_entries(&self.top_donors, filter, limit),
            top_subs: rank_entries(&self.top_subs, filter, limit),
        }
    }
}

/// Keeps entries whose name contains `filter` (case-insensitive), sorts them by
/// value descending, numbers them from 1 and truncates to `limit`.
///
/// Ties keep their input order.
pub fn rank_entries(
    entries: &[LeaderboardEntry],
    filter: Option<&str>,
    limit: Option<usize>,
) -> Vec<RankedEntry> {
    let needle = filter
        .map(|f| f.trim().to_lowercase())
        .filter(|f| !f.is_empty());

    let mut kept: Vec<&LeaderboardEntry> = entries
        .iter()
        .filter(|e| match &needle {
            Some(n) => e.name.to_lowercase().contains(n.as_str()),
            None => true,
        })
        .collect();
    kept.sort_by(|a, b| b.value.total_cmp(&a.value));

    kept.into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .enumerate()
        .map(|(i, e)| RankedEntry {
            rank: i + 1,
            name: e.name.clone(),
            value: e.value,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Vec<LeaderboardEntry> {
        vec![
            LeaderboardEntry::new("luna", 21.0),
            LeaderboardEntry::new("PoneyTV", 28.0),
            LeaderboardEntry::new("alice__", 21.0),
            LeaderboardEntry::new("bob", 3.5),
        ]
    }

    #[test]
    fn sorts_descending_and_keeps_tie_order() {
        let ranked = rank_entries(&board(), None, None);
        let names: Vec<_> = ranked.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["PoneyTV", "luna", "alice__", "bob"]);
        let ranks: Vec<_> = ranked.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, [1, 2, 3, 4]);
    }

    #[test]
    fn filter_is_case_insensitive_and_ranks_restart() {
        let ranked = rank_entries(&board(), Some("TV"), None);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].name, "PoneyTV");
        assert_eq!(ranked[0].rank, 1);

        assert_eq!(rank_entries(&board(), Some("   "), None).len(), 4);
    }

    #[test]
    fn limit_truncates_after_sorting() {
        let ranked = rank_entries(&board(), None, Some(2));
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[1].name, "luna");
        assert!(rank_entries(&board(), None, Some(0)).is_empty());
    }
}
