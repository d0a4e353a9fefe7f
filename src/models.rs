use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

/// Genre popularity table: one row per region, encoded `<genre>_<ageband>` numeric columns
#[derive(Debug, Clone, Default)]
pub struct GenreRegionAgeTable {
    /// Encoded column names, in table order
    pub columns: Vec<String>,
    pub rows: Vec<RegionRow>,
}

/// A single region row; `values` is aligned with the table's `columns`
#[derive(Debug, Clone)]
pub struct RegionRow {
    pub region: String,
    pub values: Vec<f64>, // NaN marks a missing cell
}

impl GenreRegionAgeTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains_region(&self, region: &str) -> bool {
        self.rows.iter().any(|row| row.region == region)
    }

    /// Distinct region names in first-seen order
    pub fn region_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !names.contains(&row.region.as_str()) {
                names.push(&row.region);
            }
        }
        names
    }

    pub fn rows_for_region<'a>(&'a self, region: &'a str) -> impl Iterator<Item = &'a RegionRow> + 'a {
        self.rows.iter().filter(move |row| row.region == region)
    }
}

/// A list-valued cell, typed when the table is built
#[derive(Debug, Clone, PartialEq)]
pub enum ListCell {
    /// A real collection of tokens; membership is exact
    Tokens(Vec<String>),
    /// A scalar string; membership is substring containment
    Text(String),
}

impl Default for ListCell {
    fn default() -> Self {
        ListCell::Tokens(Vec::new())
    }
}

impl ListCell {
    /// Build a cell from free text, parsing bracketed list literals such as `['rock', 'pop']`
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        let Some(inner) = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        else {
            return ListCell::Text(text.to_string());
        };

        let tokens = inner
            .split(',')
            .map(|token| token.trim().trim_matches(|c: char| c == '\'' || c == '"').trim())
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect();
        ListCell::Tokens(tokens)
    }

    /// Elements of the cell once exploded; a scalar explodes to itself
    pub fn elements(&self) -> Vec<&str> {
        match self {
            ListCell::Tokens(tokens) => tokens.iter().map(String::as_str).collect(),
            ListCell::Text(text) => vec![text.as_str()],
        }
    }
}

impl<'de> Deserialize<'de> for ListCell {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawCell {
            Tokens(Vec<String>),
            Text(String),
        }

        Ok(match Option::<RawCell>::deserialize(deserializer)? {
            Some(RawCell::Tokens(tokens)) => ListCell::Tokens(tokens),
            Some(RawCell::Text(text)) => ListCell::from_text(&text),
            None => ListCell::default(),
        })
    }
}

/// Our Track structure with the fixed columns plus any numeric metric columns
#[derive(Debug, Clone, Default)]
pub struct Track {
    pub title: String,
    pub artist_name: String,
    pub duration: Option<f64>, // seconds
    pub all_genres: ListCell,
    pub regions_recommandees: ListCell,
    pub metrics: HashMap<String, f64>, // NaN marks a missing cell
}

/// The list-valued track columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListColumn {
    AllGenres,
    RecommendedRegions,
}

impl ListColumn {
    pub fn name(self) -> &'static str {
        match self {
            ListColumn::AllGenres => "all_genres",
            ListColumn::RecommendedRegions => "regions_recommandees",
        }
    }
}

impl Track {
    pub fn list_cell(&self, column: ListColumn) -> &ListCell {
        match column {
            ListColumn::AllGenres => &self.all_genres,
            ListColumn::RecommendedRegions => &self.regions_recommandees,
        }
    }

    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied().filter(|value| value.is_finite())
    }
}

/// Track table with the metric columns it declares, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct TrackTable {
    pub tracks: Vec<Track>,
    pub metric_columns: Vec<String>,
}

impl TrackTable {
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.metric_columns.iter().any(|column| column == name)
    }
}

/// A genre's cumulative score and its 0-10 rescaling within one report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreScore {
    pub genre: String,
    #[serde(rename = "score", serialize_with = "serialize_out_of_ten")]
    pub normalized_score: f64,
    pub raw_score: f64,
}

fn serialize_out_of_ten<S>(score: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{score:.1}/10"))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionReport {
    pub region: String,
    pub genres: Vec<GenreScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_group: Option<String>,
}

/// One report when a region was requested, one per region otherwise
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RegionReports {
    Single(RegionReport),
    All(Vec<RegionReport>),
}

#[cfg(test)]
impl RegionReports {
    pub fn reports(&self) -> &[RegionReport] {
        match self {
            RegionReports::Single(report) => std::slice::from_ref(report),
            RegionReports::All(reports) => reports,
        }
    }
}

/// Mean metric values for one genre or region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricReport {
    pub key: String,
    pub track_count: usize,
    pub metrics: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSummary {
    pub title: String,
    pub artist_name: String,
    pub duration: Option<String>, // "m:ss"
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackListing {
    pub tracks: Vec<TrackSummary>,
}

/// Account roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Artist,
    Listener,
    Admin,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    #[serde(default = "default_role")]
    pub role: Role,
    pub date_joined: DateTime<Utc>,
}

fn default_role() -> Role {
    Role::Listener
}
