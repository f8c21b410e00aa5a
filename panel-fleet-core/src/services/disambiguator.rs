//! Ranking of multi-server matches

use std::cmp::Reverse;

use crate::config::RankingStrategy;
use crate::types::MatchResult;

/// Ranked matches with the chosen canonical one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disambiguation {
    pub canonical: Option<MatchResult>,
    pub candidates: Vec<MatchResult>,
    pub ambiguous: bool,
}

/// Picks a canonical match deterministically.
///
/// Reachable matches rank first. Among reachable ones, `NumericDesc` puts
/// purely numeric server ids first, highest first; everything else keeps
/// scan order.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchDisambiguator {
    ranking: RankingStrategy,
}

fn numeric_id(id: &str) -> Option<u128> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    id.parse().ok()
}

impl MatchDisambiguator {
    #[must_use]
    pub fn new(ranking: RankingStrategy) -> Self {
        Self { ranking }
    }

    pub fn disambiguate(&self, mut matches: Vec<MatchResult>) -> Disambiguation {
        matches.sort_by_key(|m| m.scan_index);

        if matches.len() > 1 {
            let numeric = self.ranking == RankingStrategy::NumericDesc;
            matches.sort_by_key(|m| {
                let rank = if m.reachable && numeric {
                    Reverse(numeric_id(&m.server.id))
                } else {
                    Reverse(None)
                };
                (!m.reachable, rank)
            });
            log::info!(
                "Domain found on {} servers, selected server {}",
                matches.len(),
                matches[0].server.id
            );
        }

        Disambiguation {
            canonical: matches.first().cloned(),
            ambiguous: matches.len() > 1,
            candidates: matches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{account, server};
    use crate::types::DomainRecord;

    fn hit(server_id: &str, scan_index: usize, reachable: bool) -> MatchResult {
        let acc = account(server_id, "alice", "example.com");
        let mut m = MatchResult::new(server(server_id), DomainRecord::main(&acc), scan_index);
        m.reachable = reachable;
        m
    }

    fn ids(d: &Disambiguation) -> Vec<&str> {
        d.candidates.iter().map(|m| m.server.id.as_str()).collect()
    }

    #[test]
    fn zero_matches() {
        let d = MatchDisambiguator::default().disambiguate(Vec::new());
        assert!(d.canonical.is_none());
        assert!(!d.ambiguous);
    }

    #[test]
    fn single_match_is_canonical() {
        let d = MatchDisambiguator::default().disambiguate(vec![hit("7", 0, true)]);
        assert_eq!(d.canonical.map(|m| m.server.id), Some("7".to_string()));
        assert!(!d.ambiguous);
    }

    #[test]
    fn highest_numeric_wins_regardless_of_scan_order() {
        let forward =
            MatchDisambiguator::default().disambiguate(vec![hit("2", 0, true), hit("10", 1, true)]);
        let backward =
            MatchDisambiguator::default().disambiguate(vec![hit("10", 0, true), hit("2", 1, true)]);
        assert_eq!(ids(&forward), vec!["10", "2"]);
        assert_eq!(ids(&backward), vec!["10", "2"]);
        assert!(forward.ambiguous);
    }

    #[test]
    fn unreachable_ranks_last() {
        let d = MatchDisambiguator::default()
            .disambiguate(vec![hit("2", 0, true), hit("10", 1, false)]);
        assert_eq!(d.canonical.map(|m| m.server.id), Some("2".to_string()));
        assert!(d.ambiguous);
    }

    #[test]
    fn non_numeric_ids_follow_numeric_in_scan_order() {
        let d = MatchDisambiguator::default().disambiguate(vec![
            hit("web-b", 0, true),
            hit("3", 1, true),
            hit("web-a", 2, true),
            hit("12", 3, true),
        ]);
        assert_eq!(ids(&d), vec!["12", "3", "web-b", "web-a"]);
    }

    #[test]
    fn scan_order_strategy_ignores_ids() {
        let d = MatchDisambiguator::new(RankingStrategy::ScanOrder)
            .disambiguate(vec![hit("10", 1, true), hit("2", 0, true), hit("99", 2, false)]);
        assert_eq!(ids(&d), vec!["2", "10", "99"]);
    }

    #[test]
    fn all_unreachable_keeps_scan_order() {
        let d = MatchDisambiguator::default()
            .disambiguate(vec![hit("10", 1, false), hit("2", 0, false)]);
        assert_eq!(ids(&d), vec!["2", "10"]);
    }
}
