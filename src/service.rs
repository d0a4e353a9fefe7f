use crate::error::{ErrorPayload, ReportError};
use crate::loader::DataContext;
use crate::models::{ListColumn, MetricReport, RegionReports, Role, TrackListing, TrackTable};
use crate::report::{MetricAggregator, RegionReportBuilder, ReportConfig, ReportMode, tracks};
use crate::stats::{GrowthReport, Period, UserStatistics, UserStatisticsService};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

/// Status and JSON body handed to whatever serves the reports
#[derive(Debug, Clone, PartialEq)]
pub struct ReportResponse {
    pub status: u16,
    pub body: Value,
}

impl ReportResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// An empty parameter is the same as no parameter
fn present(param: Option<&str>) -> Option<&str> {
    param.filter(|value| !value.is_empty())
}

/// Report operations over a shared data context, shaped by the caller's role
pub struct MusicService<'a> {
    data: &'a DataContext,
    config: &'a ReportConfig,
    role: Role,
}

impl<'a> MusicService<'a> {
    pub fn new(data: &'a DataContext, config: &'a ReportConfig, role: Role) -> Self {
        Self { data, config, role }
    }

    fn region_builder(&self) -> RegionReportBuilder<'a> {
        RegionReportBuilder::new(
            self.data.genre_table.as_ref(),
            ReportMode::for_role(self.role),
            self.config.top_k,
        )
    }

    fn track_table(&self) -> Result<&'a TrackTable, ReportError> {
        self.data
            .tracks
            .as_ref()
            .filter(|table| !table.is_empty())
            .ok_or(ReportError::DataNotLoaded)
    }

    pub fn genres_by_region(&self, region: Option<&str>) -> Result<RegionReports, ReportError> {
        let region = present(region);
        info!("Genre popularity for {:?} ({:?})", region, self.role);
        self.region_builder().build(region, None)
    }

    pub fn genres_by_region_and_age(
        &self,
        region: Option<&str>,
        age: Option<&str>,
    ) -> Result<RegionReports, ReportError> {
        let (region, age) = (present(region), present(age));
        info!("Genre popularity for {:?}, age band {:?} ({:?})", region, age, self.role);
        self.region_builder().build(region, age)
    }

    pub fn tracks_by_genre_and_region(
        &self,
        region: Option<&str>,
        genre: Option<&str>,
    ) -> Result<TrackListing, ReportError> {
        let (region, genre) = (present(region), present(genre));
        info!("Tracks for genre {:?} in region {:?}", genre, region);
        tracks::tracks_by_genre_and_region(self.track_table()?, genre, region)
    }

    pub fn metrics_by_genre(&self, genre: Option<&str>) -> Result<Vec<MetricReport>, ReportError> {
        let genre = present(genre);
        info!("Track metrics by genre {:?}", genre);
        MetricAggregator::aggregate(
            self.track_table()?,
            ListColumn::AllGenres,
            genre,
            &self.config.metric_columns,
        )
    }

    pub fn metrics_by_region(&self, region: Option<&str>) -> Result<Vec<MetricReport>, ReportError> {
        let region = present(region);
        info!("Track metrics by region {:?}", region);
        MetricAggregator::aggregate(
            self.track_table()?,
            ListColumn::RecommendedRegions,
            region,
            &self.config.metric_columns,
        )
    }

    pub fn user_statistics(&self) -> Result<UserStatistics, ReportError> {
        UserStatisticsService::statistics(self.data.users.as_deref())
    }

    pub fn user_growth(&self, period: Option<&str>) -> Result<GrowthReport, ReportError> {
        let period = Period::from_param(period);
        info!("User growth per {:?}", period);
        UserStatisticsService::growth(self.data.users.as_deref(), period)
    }

    /// Success is a 200 with the report as body; any report error is a 400 with `{"error": ...}`
    pub fn respond<T: Serialize>(result: Result<T, ReportError>) -> ReportResponse {
        let (status, body) = match result {
            Ok(report) => (200, serde_json::to_value(report)),
            Err(e) => {
                debug!("Report failed: {e}");
                (400, serde_json::to_value(ErrorPayload::from(&e)))
            }
        };

        match body {
            Ok(body) => ReportResponse { status, body },
            Err(e) => ReportResponse {
                status: 500,
                body: serde_json::json!({ "error": e.to_string() }),
            },
        }
    }
}
