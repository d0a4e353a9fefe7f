use crate::config::Config;
use crate::error::LoadError;
use crate::models::{GenreRegionAgeTable, ListCell, RegionRow, Track, TrackTable, UserRecord};
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Where the report tables come from
#[cfg_attr(test, mockall::automock)]
pub trait TableSource {
    fn load_genre_table(&self) -> Result<GenreRegionAgeTable, LoadError>;
    fn load_tracks(&self) -> Result<TrackTable, LoadError>;
    fn load_users(&self) -> Result<Vec<UserRecord>, LoadError>;
}

/// Reads every table from JSON files in one data directory
pub struct JsonDirectorySource {
    data_dir: PathBuf,
    genre_table_file: String,
    tracks_file: String,
    users_file: String,
    region_column: String,
}

impl JsonDirectorySource {
    pub fn new(config: &Config) -> Self {
        JsonDirectorySource {
            data_dir: config.data_dir.clone(),
            genre_table_file: config.genre_table_file.clone(),
            tracks_file: config.tracks_file.clone(),
            users_file: config.users_file.clone(),
            region_column: config.region_column.clone(),
        }
    }

    fn read(&self, file: &str) -> Result<String, LoadError> {
        let path = self.data_dir.join(file);
        debug!("Reading {}", path.display());
        std::fs::read_to_string(&path).map_err(|source| LoadError::Io { path, source })
    }
}

impl TableSource for JsonDirectorySource {
    fn load_genre_table(&self) -> Result<GenreRegionAgeTable, LoadError> {
        parse_genre_table(&self.read(&self.genre_table_file)?, &self.region_column)
    }

    fn load_tracks(&self) -> Result<TrackTable, LoadError> {
        parse_tracks(&self.read(&self.tracks_file)?)
    }

    fn load_users(&self) -> Result<Vec<UserRecord>, LoadError> {
        Ok(serde_json::from_str(&self.read(&self.users_file)?)?)
    }
}

/// Parse a genre table: the region column is text, every other column is an encoded number
pub fn parse_genre_table(json: &str, region_column: &str) -> Result<GenreRegionAgeTable, LoadError> {
    let Value::Array(raw_rows) = serde_json::from_str::<Value>(json)? else {
        return Err(LoadError::NotATable);
    };

    let mut objects = Vec::with_capacity(raw_rows.len());
    for (row, value) in raw_rows.into_iter().enumerate() {
        match value {
            Value::Object(map) => objects.push(map),
            _ => return Err(LoadError::NotARow { row }),
        }
    }

    // Column order is the order of first appearance across all rows
    let mut columns: Vec<String> = Vec::new();
    for object in &objects {
        for key in object.keys() {
            if key != region_column && !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let mut rows = Vec::with_capacity(objects.len());
    for (row, object) in objects.iter().enumerate() {
        let region = object
            .get(region_column)
            .and_then(Value::as_str)
            .ok_or_else(|| LoadError::MissingColumn {
                row,
                column: region_column.to_string(),
            })?
            .to_string();

        let values = columns
            .iter()
            .map(|column| parse_number(object.get(column), row, column))
            .collect::<Result<Vec<_>, _>>()?;

        rows.push(RegionRow { region, values });
    }

    Ok(GenreRegionAgeTable { columns, rows })
}

fn parse_number(cell: Option<&Value>, row: usize, column: &str) -> Result<f64, LoadError> {
    let not_numeric = || LoadError::NotNumeric {
        row,
        column: column.to_string(),
    };
    match cell {
        None | Some(Value::Null) => Ok(f64::NAN),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(f64::NAN),
        Some(Value::Number(number)) => number.as_f64().ok_or_else(not_numeric),
        Some(Value::String(text)) => text.trim().parse().map_err(|_| not_numeric()),
        Some(_) => Err(not_numeric()),
    }
}

#[derive(Deserialize)]
struct RawTrack {
    #[serde(default)]
    title: String,
    #[serde(default)]
    artist_name: String,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    all_genres: ListCell,
    #[serde(default)]
    regions_recommandees: ListCell,
    #[serde(flatten)]
    extra: serde_json::Map<String, Value>,
}

/// Parse a track table; numeric (or null) extra columns become metric columns
pub fn parse_tracks(json: &str) -> Result<TrackTable, LoadError> {
    let raw_tracks: Vec<RawTrack> = serde_json::from_str(json)?;

    let mut metric_columns: Vec<String> = Vec::new();
    let mut tracks = Vec::with_capacity(raw_tracks.len());
    for raw in raw_tracks {
        let mut metrics = std::collections::HashMap::new();
        for (column, value) in raw.extra {
            let number = match value {
                Value::Number(number) => number.as_f64().unwrap_or(f64::NAN),
                Value::Null => f64::NAN,
                _ => continue,
            };
            if !metric_columns.contains(&column) {
                metric_columns.push(column.clone());
            }
            metrics.insert(column, number);
        }

        tracks.push(Track {
            title: raw.title,
            artist_name: raw.artist_name,
            duration: raw.duration,
            all_genres: raw.all_genres,
            regions_recommandees: raw.regions_recommandees,
            metrics,
        });
    }

    Ok(TrackTable {
        tracks,
        metric_columns,
    })
}

/// Immutable tables shared by every report; a table that failed to load is absent
#[derive(Debug, Default)]
pub struct DataContext {
    pub genre_table: Option<GenreRegionAgeTable>,
    pub tracks: Option<TrackTable>,
    pub users: Option<Vec<UserRecord>>,
}

impl DataContext {
    /// Load every table once; failures are logged and kept as absences
    pub fn load(source: &dyn TableSource) -> Self {
        let genre_table = keep_or_warn("genre table", source.load_genre_table());
        if let Some(table) = &genre_table {
            info!("Loaded {} regions ({} encoded columns)", table.rows.len(), table.columns.len());
        }

        let tracks = keep_or_warn("track table", source.load_tracks());
        if let Some(table) = &tracks {
            info!("Loaded {} tracks ({} metric columns)", table.tracks.len(), table.metric_columns.len());
        }

        let users = keep_or_warn("user list", source.load_users());
        if let Some(users) = &users {
            info!("Loaded {} users", users.len());
        }

        DataContext {
            genre_table,
            tracks,
            users,
        }
    }
}

fn keep_or_warn<T>(what: &str, result: Result<T, LoadError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Failed to load {what}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    const GENRE_JSON: &str = r#"[
        {"region_name": "North", "rock_young": 10, "rock_old": 4, "pop_young": 8},
        {"region_name": "South", "rock_young": 1, "pop_young": null, "jazz_old": "2.5"}
    ]"#;

    #[test]
    fn test_genre_table_keeps_column_order() {
        let table = parse_genre_table(GENRE_JSON, "region_name").unwrap();
        assert_eq!(table.columns, vec!["rock_young", "rock_old", "pop_young", "jazz_old"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].region, "North");
        assert_eq!(table.rows[0].values[..3], [10.0, 4.0, 8.0]);
        assert!(table.rows[0].values[3].is_nan()); // absent in North
        assert!(table.rows[1].values[2].is_nan()); // null in South
        assert_eq!(table.rows[1].values[3], 2.5);
    }

    #[test]
    fn test_genre_table_blank_cells_are_missing() {
        let json = r#"[{"region_name": "North", "rock_young": "", "rock_old": "  ", "pop_young": " 3 "}]"#;
        let table = parse_genre_table(json, "region_name").unwrap();

        assert!(table.rows[0].values[0].is_nan());
        assert!(table.rows[0].values[1].is_nan());
        assert_eq!(table.rows[0].values[2], 3.0);
        assert!(matches!(
            parse_genre_table(r#"[{"region_name": "N", "rock_young": "lots"}]"#, "region_name"),
            Err(LoadError::NotNumeric { row: 0, .. })
        ));
    }

    #[test]
    fn test_genre_table_rejects_bad_shapes() {
        assert!(matches!(parse_genre_table("{}", "region_name"), Err(LoadError::NotATable)));
        assert!(matches!(
            parse_genre_table(r#"[{"rock_young": 1}]"#, "region_name"),
            Err(LoadError::MissingColumn { row: 0, .. })
        ));
        assert!(matches!(
            parse_genre_table(r#"[{"region_name": "N", "rock_young": true}]"#, "region_name"),
            Err(LoadError::NotNumeric { row: 0, .. })
        ));
    }

    #[test]
    fn test_tracks_type_list_cells_and_metrics() {
        let json = r#"[
            {"title": "A", "artist_name": "X", "duration": 137, "all_genres": ["rock", "pop"],
             "regions_recommandees": "['Bretagne', 'Corse']", "energy": 0.5, "album": "LP"},
            {"title": "B", "artist_name": "Y", "all_genres": "rock", "energy": null, "valence": 0.1}
        ]"#;
        let table = parse_tracks(json).unwrap();

        assert_eq!(table.metric_columns, vec!["energy", "valence"]);
        let first = &table.tracks[0];
        assert_eq!(first.duration, Some(137.0));
        assert_eq!(first.all_genres, ListCell::Tokens(vec!["rock".into(), "pop".into()]));
        assert_eq!(
            first.regions_recommandees,
            ListCell::Tokens(vec!["Bretagne".into(), "Corse".into()])
        );
        assert_eq!(first.metric("energy"), Some(0.5));

        let second = &table.tracks[1];
        assert_eq!(second.all_genres, ListCell::Text("rock".into()));
        assert_eq!(second.regions_recommandees, ListCell::default());
        assert_eq!(second.metric("energy"), None);
    }

    #[test]
    fn test_context_keeps_failed_tables_absent() {
        let mut source = MockTableSource::new();
        source
            .expect_load_genre_table()
            .returning(|| parse_genre_table(GENRE_JSON, "region_name"));
        source.expect_load_tracks().returning(|| Err(LoadError::NotATable));
        source.expect_load_users().returning(|| Ok(Vec::new()));

        let context = DataContext::load(&source);
        assert_eq!(context.genre_table.map(|t| t.rows.len()), Some(2));
        assert!(context.tracks.is_none());
        assert_eq!(context.users.map(|u| u.len()), Some(0));
    }

    #[test]
    fn test_json_directory_source_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("genre_region_age.json"), GENRE_JSON).unwrap();
        std::fs::write(
            dir.path().join("users.json"),
            r#"[{"username": "ana", "role": "artist", "date_joined": "2024-03-05T10:00:00Z"}]"#,
        )
        .unwrap();

        let config = Config {
            data_dir: dir.path().to_path_buf(),
            ..Config::from_lookup(|_| None)
        };
        let context = DataContext::load(&JsonDirectorySource::new(&config));

        assert_eq!(context.genre_table.map(|t| t.rows.len()), Some(2));
        assert!(context.tracks.is_none()); // tracks.json missing
        let users = context.users.unwrap();
        assert_eq!(users[0].role, Role::Artist);
    }
}
