use super::utils::round_to;
use crate::error::ReportError;
use crate::models::{ListColumn, MetricReport, Track, TrackTable};
use std::collections::BTreeMap;
use tracing::debug;

/// Grouped metric means over an exploded list column
pub struct MetricAggregator;

impl MetricAggregator {
    /// Requested metric columns that exist on the table, in request order
    pub fn valid_metrics(table: &TrackTable, requested: &[String]) -> Result<Vec<String>, ReportError> {
        let valid: Vec<String> = requested
            .iter()
            .filter(|metric| table.has_column(metric))
            .cloned()
            .collect();

        if valid.is_empty() {
            return Err(ReportError::NoValidMetrics);
        }
        Ok(valid)
    }

    /// One row per element of the list column, paired with its track
    pub fn explode(tracks: &[Track], column: ListColumn) -> Vec<(&str, &Track)> {
        tracks
            .iter()
            .flat_map(|track| {
                track
                    .list_cell(column)
                    .elements()
                    .into_iter()
                    .map(move |key| (key, track))
            })
            .collect()
    }

    /// Mean of each metric over the group's rows, 2 decimals, 0 when undefined
    pub fn group_means(rows: &[&Track], metrics: &[String]) -> BTreeMap<String, f64> {
        metrics
            .iter()
            .map(|metric| {
                let values: Vec<f64> = rows.iter().filter_map(|track| track.metric(metric)).collect();
                let mean = if values.is_empty() {
                    0.0
                } else {
                    round_to(values.iter().sum::<f64>() / values.len() as f64, 2)
                };
                (metric.clone(), mean)
            })
            .collect()
    }

    /// Explode `column`, group by its elements and average `metrics` per group.
    /// With a group key, every track with an element containing the key forms a single report,
    /// each track counted once however many of its elements match.
    pub fn aggregate(
        table: &TrackTable,
        column: ListColumn,
        group_key: Option<&str>,
        metrics: &[String],
    ) -> Result<Vec<MetricReport>, ReportError> {
        if table.is_empty() {
            return Err(ReportError::DataNotLoaded);
        }
        let metrics = Self::valid_metrics(table, metrics)?;
        let exploded = Self::explode(&table.tracks, column);
        debug!(
            "Exploded {} tracks on {} into {} rows",
            table.tracks.len(),
            column.name(),
            exploded.len()
        );

        if let Some(group_key) = group_key {
            let mut rows: Vec<&Track> = Vec::new();
            for &(key, track) in &exploded {
                if key.contains(group_key) && !rows.iter().any(|seen| std::ptr::eq(*seen, track)) {
                    rows.push(track);
                }
            }

            if rows.is_empty() {
                return Err(ReportError::NoDataForKey(group_key.to_string()));
            }
            return Ok(vec![MetricReport {
                key: group_key.to_string(),
                track_count: rows.len(),
                metrics: Self::group_means(&rows, &metrics),
            }]);
        }

        let mut groups: Vec<(&str, Vec<&Track>)> = Vec::new();
        for (key, track) in exploded {
            match groups.iter_mut().find(|(existing, _)| *existing == key) {
                Some((_, rows)) => rows.push(track),
                None => groups.push((key, vec![track])),
            }
        }

        Ok(groups
            .into_iter()
            .map(|(key, rows)| MetricReport {
                key: key.to_string(),
                track_count: rows.len(),
                metrics: Self::group_means(&rows, &metrics),
            })
            .collect())
    }
}
