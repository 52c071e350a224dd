//! High score ranking
//!
//! A top-N list sorted by descending score, persisted as a plain JSON array of
//! `{name, score, date}` records under one storage key.

use serde::{Deserialize, Serialize};

use crate::config::RankingConfig;
use crate::error::StorageError;
use crate::persistence::KeyValueStore;

/// A single ranking entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub name: String,
    pub score: u64,
    /// Display date, recorded when the score was saved
    pub date: String,
}

/// Sorted top-N list (descending by score, earlier entries win ties)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rankings {
    entries: Vec<RankingEntry>,
    max_entries: usize,
}

impl Rankings {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries,
        }
    }

    /// Adopt entries from storage, restoring order and size limits
    pub fn from_entries(mut entries: Vec<RankingEntry>, max_entries: usize) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(max_entries);
        Self {
            entries,
            max_entries,
        }
    }

    pub fn top(&self) -> &[RankingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if the list has room or `score` beats the current lowest entry
    pub fn is_high_score(&self, score: u64) -> bool {
        if self.entries.len() < self.max_entries {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Insert, keep sorted, truncate. Returns the 1-based rank, or `None`
    /// when the entry fell off the end.
    pub fn save(&mut self, name: &str, score: u64, date: &str) -> Option<usize> {
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());

        if pos >= self.max_entries {
            return None;
        }

        self.entries.insert(
            pos,
            RankingEntry {
                name: name.to_string(),
                score,
                date: date.to_string(),
            },
        );
        self.entries.truncate(self.max_entries);
        Some(pos + 1)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Rankings bound to a persistent store
pub struct RankingStore<S: KeyValueStore> {
    store: S,
    key: String,
    rankings: Rankings,
}

impl<S: KeyValueStore> RankingStore<S> {
    /// Load from `store`. Missing, unreadable or malformed data all start an
    /// empty list rather than failing.
    pub fn load(store: S, config: &RankingConfig) -> Self {
        let entries = match store.get(&config.storage_key) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<RankingEntry>>(&json) {
                Ok(entries) => {
                    log::info!("Loaded {} ranking entries", entries.len());
                    entries
                }
                Err(e) => {
                    log::warn!("Ignoring malformed ranking data: {e}");
                    Vec::new()
                }
            },
            Ok(None) => {
                log::info!("No rankings found, starting fresh");
                Vec::new()
            }
            Err(e) => {
                log::warn!("Could not read rankings: {e}");
                Vec::new()
            }
        };

        Self {
            store,
            key: config.storage_key.clone(),
            rankings: Rankings::from_entries(entries, config.max_entries),
        }
    }

    pub fn top(&self) -> &[RankingEntry] {
        self.rankings.top()
    }

    pub fn rankings(&self) -> &Rankings {
        &self.rankings
    }

    pub fn is_high_score(&self, score: u64) -> bool {
        self.rankings.is_high_score(score)
    }

    /// Record a score and persist the list
    pub fn save(&mut self, name: &str, score: u64, date: &str) -> Result<Option<usize>, StorageError> {
        let rank = self.rankings.save(name, score, date);
        if rank.is_some() {
            self.persist()?;
            log::info!("Saved score {score} for {name} at rank {rank:?}");
        }
        Ok(rank)
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.rankings.clear();
        self.store.remove(&self.key)?;
        log::info!("Rankings cleared");
        Ok(())
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        let json = serde_json::to_string(self.rankings.top())?;
        self.store.set(&self.key, &json)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    fn filled(scores: &[u64]) -> Rankings {
        let mut r = Rankings::new(10);
        for (i, &s) in scores.iter().enumerate() {
            r.save(&format!("P{i}"), s, "2026/1/1");
        }
        r
    }

    #[test]
    fn test_save_returns_rank() {
        let mut r = Rankings::new(10);
        assert_eq!(r.save("A", 500, "d"), Some(1));
        assert_eq!(r.save("B", 900, "d"), Some(1));
        assert_eq!(r.save("C", 700, "d"), Some(2));
        let scores: Vec<u64> = r.top().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![900, 700, 500]);
    }

    #[test]
    fn test_ties_rank_below_existing() {
        let mut r = filled(&[300, 200]);
        assert_eq!(r.save("Late", 200, "d"), Some(3));
        assert_eq!(r.top()[1].name, "P1");
        assert_eq!(r.top()[2].name, "Late");
    }

    #[test]
    fn test_eleventh_low_entry_dropped() {
        let mut r = filled(&[1000, 900, 800, 700, 600, 500, 400, 300, 200, 100]);
        let before = r.clone();
        assert_eq!(r.save("Low", 50, "d"), None);
        assert_eq!(r, before);
        assert_eq!(r.len(), 10);
    }

    #[test]
    fn test_high_entry_pushes_out_lowest() {
        let mut r = filled(&[1000, 900, 800, 700, 600, 500, 400, 300, 200, 100]);
        assert_eq!(r.save("New", 650, "d"), Some(5));
        assert_eq!(r.len(), 10);
        assert_eq!(r.top().last().map(|e| e.score), Some(200));
    }

    #[test]
    fn test_is_high_score() {
        let mut r = Rankings::new(3);
        assert!(r.is_high_score(0));
        r.save("A", 100, "d");
        r.save("B", 200, "d");
        r.save("C", 300, "d");
        assert!(!r.is_high_score(100));
        assert!(r.is_high_score(101));
    }

    #[test]
    fn test_store_persists_and_reloads() {
        let config = RankingConfig::default();
        let mut ranking = RankingStore::load(MemoryStore::new(), &config);
        assert!(ranking.top().is_empty());
        assert_eq!(ranking.save("Ace", 4200, "2026/10/18").unwrap(), Some(1));

        let reloaded = RankingStore::load(ranking.store().clone(), &config);
        assert_eq!(reloaded.top().len(), 1);
        assert_eq!(reloaded.top()[0].name, "Ace");
        assert_eq!(reloaded.top()[0].date, "2026/10/18");
    }

    #[test]
    fn test_stored_format_is_plain_records() {
        let config = RankingConfig::default();
        let mut ranking = RankingStore::load(MemoryStore::new(), &config);
        ranking.save("Ace", 10, "d").unwrap();
        let raw = ranking.store().get(&config.storage_key).unwrap().unwrap();
        assert_eq!(raw, r#"[{"name":"Ace","score":10,"date":"d"}]"#);
    }

    #[test]
    fn test_malformed_data_loads_empty() {
        let config = RankingConfig::default();
        let mut store = MemoryStore::new();
        store.set(&config.storage_key, "{oops").unwrap();
        let ranking = RankingStore::load(store, &config);
        assert!(ranking.top().is_empty());
        assert!(ranking.is_high_score(0));
    }

    #[test]
    fn test_unsorted_storage_is_normalized() {
        let config = RankingConfig {
            max_entries: 2,
            ..RankingConfig::default()
        };
        let mut store = MemoryStore::new();
        store
            .set(
                &config.storage_key,
                r#"[{"name":"a","score":1,"date":""},{"name":"b","score":3,"date":""},{"name":"c","score":2,"date":""}]"#,
            )
            .unwrap();
        let ranking = RankingStore::load(store, &config);
        let names: Vec<&str> = ranking.top().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn test_clear_removes_key() {
        let config = RankingConfig::default();
        let mut ranking = RankingStore::load(MemoryStore::new(), &config);
        ranking.save("Ace", 10, "d").unwrap();
        ranking.clear().unwrap();
        assert!(ranking.top().is_empty());
        assert_eq!(ranking.store().get(&config.storage_key).unwrap(), None);
    }

    proptest! {
        #[test]
        fn prop_save_keeps_sorted_and_bounded(scores in proptest::collection::vec(0u64..10_000, 0..40)) {
            let mut r = Rankings::new(10);
            for s in &scores {
                let rank = r.save("p", *s, "d");
                if let Some(rank) = rank {
                    prop_assert!(rank >= 1 && rank <= 10);
                    prop_assert_eq!(r.top()[rank - 1].score, *s);
                }
                prop_assert!(r.len() <= 10);
                prop_assert!(r.top().windows(2).all(|w| w[0].score >= w[1].score));
            }

            let mut expected = scores.clone();
            expected.sort_unstable_by(|a, b| b.cmp(a));
            expected.truncate(10);
            let kept: Vec<u64> = r.top().iter().map(|e| e.score).collect();
            prop_assert_eq!(kept, expected);
        }
    }
}
