//! Fuzzy station lookup.
//!
//! Names are compared with a token-set ratio: both sides are lowercased,
//! stripped of punctuation and split into words, and the shared words
//! count for more than their order. `"centrale milano"` matches
//! `MILANO CENTRALE` perfectly.

use std::collections::BTreeSet;

use crate::domain::{EneeCode, StationRecord};

/// Margin by which the best match must beat the runner-up to stand alone.
const CLEAR_WINNER_MARGIN: f64 = 5.0;

/// A search hit with its similarity score in `0.0..=100.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct StationMatch {
    pub record: StationRecord,
    pub score: f64,
}

/// Lowercase, replace non-alphanumerics with spaces, trim.
fn preprocess(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                ' '
            }
        })
        .collect();
    cleaned.trim().to_string()
}

fn ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b) * 100.0
}

fn join(tokens: &BTreeSet<&str>) -> String {
    tokens.iter().copied().collect::<Vec<_>>().join(" ")
}

/// Token-set similarity of two strings, `0.0..=100.0`.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let a = preprocess(a);
    let b = preprocess(b);
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let common: BTreeSet<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let only_a: BTreeSet<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let only_b: BTreeSet<&str> = tokens_b.difference(&tokens_a).copied().collect();

    // One side's words are all in the other
    if !common.is_empty() && (only_a.is_empty() || only_b.is_empty()) {
        return 100.0;
    }

    let base = join(&common);
    let with = |rest: &BTreeSet<&str>| {
        if base.is_empty() {
            join(rest)
        } else {
            format!("{} {}", base, join(rest))
        }
    };
    let combined_a = with(&only_a);
    let combined_b = with(&only_b);

    let mut best = ratio(&combined_a, &combined_b);
    if !base.is_empty() {
        best = best
            .max(ratio(&base, &combined_a))
            .max(ratio(&base, &combined_b));
    }
    best
}

/// In-memory station list with lookup by code and by fuzzy name.
#[derive(Debug, Clone, Default)]
pub struct StationIndex {
    records: Vec<StationRecord>,
}

impl StationIndex {
    pub fn new(records: Vec<StationRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[StationRecord] {
        &self.records
    }

    pub fn get(&self, code: EneeCode) -> Option<&StationRecord> {
        self.records.iter().find(|r| r.enee_code == code)
    }

    /// Best matches for `query`, at most `limit`.
    ///
    /// Scores the top `limit + 1` names; when the best beats the second by
    /// at least 5 points only the best is returned. Names with no shared
    /// character content score 0 and are never returned.
    pub fn search(&self, query: &str, limit: usize) -> Vec<StationMatch> {
        if limit == 0 {
            return Vec::new();
        }

        let mut matches: Vec<StationMatch> = self
            .records
            .iter()
            .map(|record| StationMatch {
                score: token_set_ratio(query, &record.long_name),
                record: record.clone(),
            })
            .filter(|m| m.score > 0.0)
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.record.long_name.cmp(&b.record.long_name))
        });
        matches.truncate(limit + 1);

        if matches.len() > 1 && matches[0].score >= matches[1].score + CLEAR_WINNER_MARGIN {
            matches.truncate(1);
        }
        matches.truncate(limit);
        matches
    }
}
