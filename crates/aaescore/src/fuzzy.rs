//! Weighted-ratio string similarity on a 0–100 scale.
//!
//! Scores follow the usual Indel-based family: `ratio` is
//! `2 * LCS / (len_a + len_b) * 100`, `partial_ratio` is the best `ratio`
//! of the shorter string against any equally long window of the longer one,
//! and the token variants compare sorted / set-split word lists. `wratio`
//! picks the best of those, scaled down when the strings differ a lot in
//! length. Inputs are lower-cased and every non-alphanumeric character is
//! turned into a space before scoring.

use itertools::Itertools;
use std::collections::BTreeSet;

const UNBASE_SCALE: f64 = 0.95;

/// A ranked candidate returned by [`extract`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    /// Position of the candidate in the input slice.
    pub index: usize,
    pub score: f64,
}

/// Lower-cases, replaces non-alphanumerics with spaces and trims.
pub fn normalize(s: &str) -> String {
    let mapped: String = s
        .chars()
        .flat_map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().collect::<Vec<_>>()
            } else {
                vec![' ']
            }
        })
        .collect();
    mapped.trim().to_string()
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            cur[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                cur[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_len(a, b) as f64 / total as f64
}

fn indel_distance(a: &[char], b: &[char]) -> usize {
    a.len() + b.len() - 2 * lcs_len(a, b)
}

/// Plain Indel similarity of two already-processed strings.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b)
}

/// Best `ratio` of the shorter string against every window of the longer one.
///
/// Windows include the partial prefixes and suffixes of the longer string so
/// a match hanging over either edge still counts. Equal-length inputs are
/// scored both ways and the better direction wins.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    match a.len().cmp(&b.len()) {
        std::cmp::Ordering::Less => windowed_ratio(&a, &b),
        std::cmp::Ordering::Greater => windowed_ratio(&b, &a),
        std::cmp::Ordering::Equal => windowed_ratio(&a, &b).max(windowed_ratio(&b, &a)),
    }
}

fn windowed_ratio(short: &[char], long: &[char]) -> f64 {
    if short.is_empty() {
        return if long.is_empty() { 100.0 } else { 0.0 };
    }
    let m = short.len();
    let n = long.len();
    let mut best: f64 = 0.0;
    for end in 1..m.min(n) {
        best = best.max(ratio_chars(short, &long[..end]));
    }
    for start in 0..=(n - m) {
        best = best.max(ratio_chars(short, &long[start..start + m]));
        if best >= 100.0 {
            return 100.0;
        }
    }
    for start in (n - m + 1)..n {
        best = best.max(ratio_chars(short, &long[start..]));
    }
    best
}

fn sorted_tokens(s: &str) -> String {
    s.split_whitespace().sorted().join(" ")
}

/// `ratio` over the alphabetically sorted word lists.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

struct TokenSets {
    intersection: String,
    diff_ab: String,
    diff_ba: String,
}

fn token_sets(a: &str, b: &str) -> Option<TokenSets> {
    let ta: BTreeSet<&str> = a.split_whitespace().collect();
    let tb: BTreeSet<&str> = b.split_whitespace().collect();
    if ta.is_empty() || tb.is_empty() {
        return None;
    }
    Some(TokenSets {
        intersection: ta.intersection(&tb).join(" "),
        diff_ab: ta.difference(&tb).join(" "),
        diff_ba: tb.difference(&ta).join(" "),
    })
}

/// Set-based token comparison: shared words count as a perfect match.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let Some(sets) = token_sets(a, b) else {
        return 0.0;
    };
    if !sets.intersection.is_empty() && (sets.diff_ab.is_empty() || sets.diff_ba.is_empty()) {
        return 100.0;
    }

    let diff_ab: Vec<char> = sets.diff_ab.chars().collect();
    let diff_ba: Vec<char> = sets.diff_ba.chars().collect();
    let sect_len = sets.intersection.chars().count();
    let joiner = usize::from(sect_len != 0);
    let sect_ab_len = sect_len + joiner + diff_ab.len();
    let sect_ba_len = sect_len + joiner + diff_ba.len();

    let dist = indel_distance(&diff_ab, &diff_ba);
    let total = sect_ab_len + sect_ba_len;
    let mut result = if total == 0 {
        0.0
    } else {
        100.0 - 100.0 * dist as f64 / total as f64
    };
    if sect_len == 0 {
        return result;
    }

    let sect_ab_ratio = 100.0 - 100.0 * (joiner + diff_ab.len()) as f64 / (sect_len + sect_ab_len) as f64;
    let sect_ba_ratio = 100.0 - 100.0 * (joiner + diff_ba.len()) as f64 / (sect_len + sect_ba_len) as f64;
    result = result.max(sect_ab_ratio).max(sect_ba_ratio);
    result
}

fn token_ratio(a: &str, b: &str) -> f64 {
    token_sort_ratio(a, b).max(token_set_ratio(a, b))
}

fn partial_token_ratio(a: &str, b: &str) -> f64 {
    let Some(sets) = token_sets(a, b) else {
        return 0.0;
    };
    if !sets.intersection.is_empty() {
        return 100.0;
    }
    partial_ratio(&sorted_tokens(a), &sorted_tokens(b)).max(partial_ratio(&sets.diff_ab, &sets.diff_ba))
}

/// Weighted ratio of two raw strings, normalized first.
pub fn wratio(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    wratio_processed(&a, &b)
}

fn wratio_processed(a: &str, b: &str) -> f64 {
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    if len_a == 0 || len_b == 0 {
        return 0.0;
    }

    let len_ratio = len_a.max(len_b) as f64 / len_a.min(len_b) as f64;
    let mut end_ratio = ratio(a, b);

    if len_ratio < 1.5 {
        return end_ratio.max(token_ratio(a, b) * UNBASE_SCALE);
    }

    let partial_scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
    end_ratio = end_ratio.max(partial_ratio(a, b) * partial_scale);
    end_ratio.max(partial_token_ratio(a, b) * UNBASE_SCALE * partial_scale)
}

/// Scores `query` against every candidate and returns them best first.
///
/// Ties keep candidate order. Candidates below `min_score` are dropped.
pub fn extract<S: AsRef<str>>(query: &str, candidates: &[S], min_score: f64) -> Vec<Match> {
    let query = normalize(query);
    candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| Match {
            index,
            score: wratio_processed(&query, &normalize(candidate.as_ref())),
        })
        .filter(|m| m.score >= min_score)
        .sorted_by(|x, y| y.score.total_cmp(&x.score))
        .collect()
}

/// The single best candidate, if any reaches `min_score`.
pub fn extract_one<S: AsRef<str>>(query: &str, candidates: &[S], min_score: f64) -> Option<Match> {
    extract(query, candidates, min_score).into_iter().next()
}
