use super::decoder::{EncodedColumn, decode_column};
use super::utils::round_to;
use crate::models::{GenreScore, RegionRow};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Cumulative score per genre, kept in first-seen genre order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenreScores {
    entries: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl GenreScores {
    /// Add a cell value to a genre's total; missing (non-finite) values count as 0
    pub fn add(&mut self, genre: &str, value: f64) {
        let value = if value.is_finite() { value } else { 0.0 };
        match self.index.get(genre) {
            Some(&position) => self.entries[position].1 += value,
            None => {
                self.index.insert(genre.to_string(), self.entries.len());
                self.entries.push((genre.to_string(), value));
            }
        }
    }

    #[cfg(test)]
    pub fn get(&self, genre: &str) -> Option<f64> {
        self.index.get(genre).map(|&position| self.entries[position].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<(String, f64)> {
        self.entries
    }
}

/// Score accumulation and ranking for genre popularity reports
pub struct GenreScoring;

impl GenreScoring {
    /// Sum every encoded column of the given rows into per-genre totals.
    /// With an age filter, only columns of that age band are counted.
    pub fn accumulate<'a>(
        rows: impl IntoIterator<Item = &'a RegionRow>,
        columns: &[String],
        age_filter: Option<&str>,
    ) -> GenreScores {
        let selected: Vec<(usize, EncodedColumn<'_>)> = columns
            .iter()
            .enumerate()
            .filter_map(|(position, name)| decode_column(name).map(|decoded| (position, decoded)))
            .filter(|(_, decoded)| age_filter.is_none_or(|age| decoded.age_band == age))
            .collect();

        let mut scores = GenreScores::default();
        for row in rows {
            for (position, decoded) in &selected {
                let value = row.values.get(*position).copied().unwrap_or(f64::NAN);
                scores.add(decoded.genre, value);
            }
        }
        scores
    }

    /// Rank genres by score, rescale against the top score onto 0-10 and keep at most `limit`
    pub fn rank(scores: GenreScores, limit: Option<usize>) -> Vec<GenreScore> {
        let mut entries = scores.into_entries();
        // Stable: ties keep first-seen order
        entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        let max_score = match entries.first() {
            Some(&(_, top)) if top > 0.0 => top,
            _ => 1.0,
        };

        if let Some(limit) = limit {
            entries.truncate(limit);
        }

        entries
            .into_iter()
            .map(|(genre, raw_score)| GenreScore {
                genre,
                normalized_score: Self::normalize(raw_score, max_score),
                raw_score,
            })
            .collect()
    }

    /// Rescale a score against the top score, one decimal, within [0, 10]
    pub fn normalize(score: f64, max_score: f64) -> f64 {
        round_to(score / max_score * 10.0, 1).clamp(0.0, 10.0)
    }
}
