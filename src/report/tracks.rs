use super::filters::TrackFilters;
use super::utils::format_duration;
use crate::error::ReportError;
use crate::models::{ListColumn, Track, TrackListing, TrackSummary, TrackTable};

/// List the tracks tagged with a genre and recommended for a region.
/// Genre is applied first; each given filter must match at least one track.
pub fn tracks_by_genre_and_region(
    table: &TrackTable,
    genre: Option<&str>,
    region: Option<&str>,
) -> Result<TrackListing, ReportError> {
    if table.is_empty() {
        return Err(ReportError::DataNotLoaded);
    }

    let tracks = TrackFilters::filter_optional(&table.tracks, ListColumn::AllGenres, genre)?;
    let tracks = TrackFilters::filter_optional(tracks, ListColumn::RecommendedRegions, region)?;

    Ok(TrackListing {
        tracks: tracks.into_iter().map(summarize).collect(),
    })
}

fn summarize(track: &Track) -> TrackSummary {
    TrackSummary {
        title: track.title.clone(),
        artist_name: track.artist_name.clone(),
        duration: track
            .duration
            .filter(|seconds| seconds.is_finite())
            .map(format_duration),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListCell;

    fn create_test_track(title: &str, genres: &[&str], regions: &str, duration: Option<f64>) -> Track {
        Track {
            title: title.to_string(),
            artist_name: format!("{title} Artist"),
            duration,
            all_genres: ListCell::Tokens(genres.iter().map(|g| g.to_string()).collect()),
            regions_recommandees: ListCell::Text(regions.to_string()),
            ..Default::default()
        }
    }

    fn create_test_table() -> TrackTable {
        TrackTable {
            tracks: vec![
                create_test_track("Vague", &["rock", "pop"], "Bretagne, Normandie", Some(137.0)),
                create_test_track("Maquis", &["rock"], "Corse", Some(245.0)),
                create_test_track("Néon", &["electro"], "Bretagne", None),
            ],
            metric_columns: Vec::new(),
        }
    }

    #[test]
    fn test_filters_by_genre_then_region() {
        let listing = tracks_by_genre_and_region(&create_test_table(), Some("rock"), Some("Bretagne")).unwrap();
        assert_eq!(
            listing.tracks,
            vec![TrackSummary {
                title: "Vague".into(),
                artist_name: "Vague Artist".into(),
                duration: Some("2:17".into()),
            }]
        );
    }

    #[test]
    fn test_without_filters_lists_everything() {
        let listing = tracks_by_genre_and_region(&create_test_table(), None, None).unwrap();
        assert_eq!(listing.tracks.len(), 3);
        assert_eq!(listing.tracks[1].duration.as_deref(), Some("4:05"));
        assert_eq!(listing.tracks[2].duration, None);
    }

    #[test]
    fn test_unknown_genre_fails_before_region() {
        let err = tracks_by_genre_and_region(&create_test_table(), Some("jazz"), Some("Nowhere")).unwrap_err();
        assert_eq!(
            err,
            ReportError::NoMatchFound {
                token: "jazz".into(),
                column: "all_genres".into(),
            }
        );
    }

    #[test]
    fn test_region_must_match_within_genre() {
        // Corse exists, but not among electro tracks
        let err = tracks_by_genre_and_region(&create_test_table(), Some("electro"), Some("Corse")).unwrap_err();
        assert!(matches!(err, ReportError::NoMatchFound { ref column, .. } if column == "regions_recommandees"));
    }

    #[test]
    fn test_empty_table() {
        let err = tracks_by_genre_and_region(&TrackTable::default(), None, None).unwrap_err();
        assert_eq!(err, ReportError::DataNotLoaded);
    }
}
