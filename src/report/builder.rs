use super::ReportMode;
use super::scoring::GenreScoring;
use crate::error::ReportError;
use crate::models::{GenreRegionAgeTable, RegionReport, RegionReports};
use tracing::debug;

/// Builds genre popularity reports per region, optionally for one age band
pub struct RegionReportBuilder<'a> {
    table: Option<&'a GenreRegionAgeTable>,
    limit: Option<usize>,
}

impl<'a> RegionReportBuilder<'a> {
    pub fn new(table: Option<&'a GenreRegionAgeTable>, mode: ReportMode, top_k: usize) -> Self {
        Self {
            table,
            limit: mode.limit(top_k),
        }
    }

    /// One report for the requested region, or one per distinct region when none is given
    pub fn build(&self, region: Option<&str>, age_band: Option<&str>) -> Result<RegionReports, ReportError> {
        let table = match self.table {
            Some(table) if !table.is_empty() => table,
            _ => return Err(ReportError::DataNotLoaded),
        };

        match region {
            Some(region) => {
                if !table.contains_region(region) {
                    return Err(ReportError::RegionNotFound(region.to_string()));
                }
                Ok(RegionReports::Single(self.build_region(table, region, age_band)))
            }
            None => Ok(RegionReports::All(
                table
                    .region_names()
                    .into_iter()
                    .map(|name| self.build_region(table, name, age_band))
                    .collect(),
            )),
        }
    }

    fn build_region(&self, table: &GenreRegionAgeTable, region: &str, age_band: Option<&str>) -> RegionReport {
        let scores = GenreScoring::accumulate(table.rows_for_region(region), &table.columns, age_band);
        debug!(
            "Region '{}': {} genres scored (age band {:?})",
            region,
            scores.len(),
            age_band
        );
        if scores.is_empty() {
            debug!("Region '{}' has no encoded column for age band {:?}", region, age_band);
        }

        RegionReport {
            region: region.to_string(),
            genres: GenreScoring::rank(scores, self.limit),
            age_group: age_band.map(str::to_string),
        }
    }
}
