use crate::error::ReportError;
use crate::models::{Role, UserRecord};
use crate::report::utils::round_to;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Granularity of the user growth report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
}

impl Period {
    /// Parse a period parameter; anything unrecognized means `Month`
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(str::trim) {
            Some("day") => Period::Day,
            Some("week") => Period::Week,
            Some("year") => Period::Year,
            _ => Period::Month,
        }
    }

    /// First day of the period containing `date`; weeks start on Monday
    pub fn truncate(self, date: NaiveDate) -> NaiveDate {
        match self {
            Period::Day => date,
            Period::Week => date - chrono::Days::new(u64::from(date.weekday().num_days_from_monday())),
            Period::Month => date.with_day(1).unwrap_or(date),
            Period::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStatistics {
    pub total_users: usize,
    pub total_artists: usize,
    pub total_listeners: usize,
    pub artist_percentage: f64,
    pub listener_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthPoint {
    pub period: NaiveDate,
    pub user_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthReport {
    pub period: Period,
    pub growth_data: Vec<GrowthPoint>,
}

/// Account statistics over the loaded user list
pub struct UserStatisticsService;

impl UserStatisticsService {
    pub fn statistics(users: Option<&[UserRecord]>) -> Result<UserStatistics, ReportError> {
        let users = users.ok_or(ReportError::DataNotLoaded)?;
        let count = |role: Role| users.iter().filter(|user| user.role == role).count();

        let total_users = users.len();
        let total_artists = count(Role::Artist);
        let total_listeners = count(Role::Listener);
        let percentage = |part: usize| {
            if total_users > 0 {
                round_to(part as f64 / total_users as f64 * 100.0, 2)
            } else {
                0.0
            }
        };

        Ok(UserStatistics {
            total_users,
            total_artists,
            total_listeners,
            artist_percentage: percentage(total_artists),
            listener_percentage: percentage(total_listeners),
        })
    }

    /// New users per period, ordered by period start
    pub fn growth(users: Option<&[UserRecord]>, period: Period) -> Result<GrowthReport, ReportError> {
        let users = users.ok_or(ReportError::DataNotLoaded)?;

        let mut starts: Vec<NaiveDate> = users
            .iter()
            .map(|user| period.truncate(user.date_joined.date_naive()))
            .collect();
        starts.sort_unstable();

        let mut growth_data: Vec<GrowthPoint> = Vec::new();
        for start in starts {
            match growth_data.last_mut() {
                Some(point) if point.period == start => point.user_count += 1,
                _ => growth_data.push(GrowthPoint {
                    period: start,
                    user_count: 1,
                }),
            }
        }

        Ok(GrowthReport { period, growth_data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn user(role: Role, joined: &str) -> UserRecord {
        UserRecord {
            role,
            date_joined: joined.parse::<DateTime<Utc>>().unwrap(),
        }
    }

    fn create_test_users() -> Vec<UserRecord> {
        vec![
            user(Role::Artist, "2024-01-03T09:00:00Z"),  // Wednesday
            user(Role::Listener, "2024-01-07T18:30:00Z"), // Sunday, same week
            user(Role::Listener, "2024-01-08T08:00:00Z"), // Monday, next week
            user(Role::Admin, "2024-02-14T12:00:00Z"),
            user(Role::Listener, "2025-06-01T00:00:00Z"),
            user(Role::Listener, "2024-01-03T23:00:00Z"),
        ]
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_from_param_defaults_to_month() {
        assert_eq!(Period::from_param(Some("day")), Period::Day);
        assert_eq!(Period::from_param(Some("week")), Period::Week);
        assert_eq!(Period::from_param(Some("year")), Period::Year);
        assert_eq!(Period::from_param(Some("month")), Period::Month);
        assert_eq!(Period::from_param(Some("fortnight")), Period::Month);
        assert_eq!(Period::from_param(None), Period::Month);
    }

    #[test]
    fn test_period_truncation() {
        let wednesday = date(2024, 1, 3);
        assert_eq!(Period::Day.truncate(wednesday), wednesday);
        assert_eq!(Period::Week.truncate(wednesday), date(2024, 1, 1));
        assert_eq!(Period::Week.truncate(date(2024, 1, 7)), date(2024, 1, 1));
        assert_eq!(Period::Month.truncate(date(2024, 2, 29)), date(2024, 2, 1));
        assert_eq!(Period::Year.truncate(date(2024, 12, 31)), date(2024, 1, 1));
    }

    #[test]
    fn test_statistics() {
        let users = create_test_users();
        let stats = UserStatisticsService::statistics(Some(users.as_slice())).unwrap();

        assert_eq!(stats.total_users, 6);
        assert_eq!(stats.total_artists, 1);
        assert_eq!(stats.total_listeners, 4);
        assert_eq!(stats.artist_percentage, 16.67);
        assert_eq!(stats.listener_percentage, 66.67);
    }

    #[test]
    fn test_statistics_without_users() {
        let stats = UserStatisticsService::statistics(Some(&[][..])).unwrap();
        assert_eq!(stats.total_users, 0);
        assert_eq!(stats.artist_percentage, 0.0);
        assert_eq!(UserStatisticsService::statistics(None).unwrap_err(), ReportError::DataNotLoaded);
    }

    #[test]
    fn test_growth_by_week() {
        let users = create_test_users();
        let report = UserStatisticsService::growth(Some(users.as_slice()), Period::Week).unwrap();

        assert_eq!(report.period, Period::Week);
        assert_eq!(
            report.growth_data,
            vec![
                GrowthPoint { period: date(2024, 1, 1), user_count: 3 },
                GrowthPoint { period: date(2024, 1, 8), user_count: 1 },
                GrowthPoint { period: date(2024, 2, 12), user_count: 1 },
                GrowthPoint { period: date(2025, 5, 26), user_count: 1 },
            ]
        );
    }

    #[test]
    fn test_growth_by_year_serializes_dates() {
        let users = create_test_users();
        let report = UserStatisticsService::growth(Some(users.as_slice()), Period::Year).unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["period"], "year");
        assert_eq!(json["growth_data"][0]["period"], "2024-01-01");
        assert_eq!(json["growth_data"][0]["user_count"], 5);
        assert_eq!(json["growth_data"][1]["period"], "2025-01-01");
    }
}
