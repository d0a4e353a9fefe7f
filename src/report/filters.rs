use crate::error::ReportError;
use crate::models::{ListCell, ListColumn, Track};

/// List-membership filtering over track list columns
pub struct TrackFilters;

impl TrackFilters {
    /// Check if a cell holds a token: exact membership for token lists, substring for text
    pub fn cell_contains(cell: &ListCell, token: &str) -> bool {
        match cell {
            ListCell::Tokens(tokens) => tokens.iter().any(|candidate| candidate == token),
            ListCell::Text(text) => text.contains(token),
        }
    }

    /// Check if a track's list column holds a token
    pub fn matches(track: &Track, column: ListColumn, token: &str) -> bool {
        Self::cell_contains(track.list_cell(column), token)
    }

    /// Keep the tracks whose column holds the token; fails when none do
    pub fn filter<'a, I>(tracks: I, column: ListColumn, token: &str) -> Result<Vec<&'a Track>, ReportError>
    where
        I: IntoIterator<Item = &'a Track>,
    {
        let matching: Vec<&Track> = tracks
            .into_iter()
            .filter(|track| Self::matches(track, column, token))
            .collect();

        if matching.is_empty() {
            return Err(ReportError::NoMatchFound {
                token: token.to_string(),
                column: column.name().to_string(),
            });
        }
        Ok(matching)
    }

    /// Apply an optional filter; without a token every track is kept
    pub fn filter_optional<'a, I>(
        tracks: I,
        column: ListColumn,
        token: Option<&str>,
    ) -> Result<Vec<&'a Track>, ReportError>
    where
        I: IntoIterator<Item = &'a Track>,
    {
        match token {
            Some(token) => Self::filter(tracks, column, token),
            None => Ok(tracks.into_iter().collect()),
        }
    }
}
