//! Substring and fuzzy scoring of candidate file names.

use std::collections::HashMap;

use crate::core::config;
use crate::drive::FileRecord;
use crate::fuzzy;

/// A candidate with the score that admitted it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    pub score: f64,
    pub record: FileRecord,
}

/// Term parts used for partial hits: split on whitespace and hyphens, at least two chars.
pub fn term_parts(term_lower: &str) -> Vec<String> {
    term_lower
        .replace('-', " ")
        .split_whitespace()
        .filter(|p| p.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

/// Full-term substring hits score 100, any term-part hit scores 60.
///
/// Records are de-duplicated by [`FileRecord::dedup_key`] keeping the highest
/// score; the result is sorted by score, ties in first-seen order.
pub fn substring_scores(term: &str, items: &[FileRecord]) -> Vec<ScoredRecord> {
    let term_lower = term.trim().to_lowercase();
    let parts = term_parts(&term_lower);
    let exact = f64::from(config::search::EXACT_SCORE);
    let partial = f64::from(config::search::PARTIAL_SCORE);

    let mut scored: Vec<ScoredRecord> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for item in items {
        let name = item.name.to_lowercase();
        let score = if name.contains(&term_lower) {
            exact
        } else if parts.iter().any(|p| name.contains(p.as_str())) {
            partial
        } else {
            continue;
        };

        match slots.get(item.dedup_key()) {
            Some(&slot) => {
                if scored[slot].score < score {
                    scored[slot] = ScoredRecord {
                        score,
                        record: item.clone(),
                    };
                }
            }
            None => {
                slots.insert(item.dedup_key(), scored.len());
                scored.push(ScoredRecord {
                    score,
                    record: item.clone(),
                });
            }
        }
    }

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Weighted-ratio hits at or above `min_score`, best first, de-duplicated.
pub fn fuzzy_scores(term: &str, items: &[FileRecord], min_score: f64) -> Vec<ScoredRecord> {
    let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
    let mut seen = std::collections::HashSet::new();
    fuzzy::extract(term, &names, min_score)
        .into_iter()
        .filter(|m| seen.insert(items[m.index].dedup_key()))
        .map(|m| ScoredRecord {
            score: m.score,
            record: items[m.index].clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rec(name: &str, link: &str) -> FileRecord {
        FileRecord {
            id: String::new(),
            name: name.to_string(),
            link: link.to_string(),
            size: 0,
            kind: None,
            level: None,
        }
    }

    #[test]
    fn test_term_parts() {
        assert_eq!(term_parts("ae-301 x fluids"), vec!["ae", "301", "fluids"]);
        assert!(term_parts("a - b").is_empty());
    }

    #[test]
    fn test_full_term_beats_partial() {
        let items = vec![rec("Fluid Notes", "u1"), rec("Fluid Mechanics Notes", "u2")];
        let scored = substring_scores("fluid mechanics", &items);
        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].record.link, "u2");
        assert_eq!(scored[0].score, 100.0);
        assert_eq!(scored[1].score, 60.0);
    }

    #[test]
    fn test_unmatched_records_are_dropped() {
        let items = vec![rec("Marine Engines", "u1")];
        assert!(substring_scores("thermo", &items).is_empty());
    }

    #[test]
    fn test_duplicates_keep_highest_score_at_first_position() {
        let items = vec![
            rec("Thermo part", "same"),
            rec("Other thing thermo-x", "u9"),
            rec("Thermodynamics full", "same"),
        ];
        let scored = substring_scores("thermo", &items);
        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].record.link, "same");
        assert_eq!(scored[1].record.link, "u9");
    }

    #[test]
    fn test_dedup_upgrades_partial_hit() {
        let items = vec![rec("Heat notes", "same"), rec("Heat Transfer notes", "same")];
        let scored = substring_scores("heat transfer", &items);
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].score, 100.0);
        assert_eq!(scored[0].record.name, "Heat Transfer notes");
    }

    #[test]
    fn test_ties_stay_in_index_order() {
        let items = vec![rec("B Fluids", "1"), rec("A Fluids", "2"), rec("C Fluids", "3")];
        let links: Vec<String> = substring_scores("fluids", &items)
            .into_iter()
            .map(|s| s.record.link)
            .collect();
        assert_eq!(links, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_fuzzy_scores_dedup_and_threshold() {
        let items = vec![
            rec("Thermodynamics", "u1"),
            rec("Thermodynamics", "u1"),
            rec("Marine Engines", "u3"),
        ];
        let scored = fuzzy_scores("thermodinamics", &items, 60.0);
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].record.link, "u1");
        assert!(scored[0].score >= 60.0);
    }
}
