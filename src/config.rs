use anyhow::Result;
use std::path::PathBuf;

/// Configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub genre_table_file: String,
    pub tracks_file: String,
    pub users_file: String,
    pub region_column: String,
}

impl Config {
    /// Build the configuration from a key lookup, falling back to defaults for absent keys
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        Config {
            data_dir: PathBuf::from(get("DATA_DIR", "data")),
            genre_table_file: get("GENRE_TABLE_FILE", "genre_region_age.json"),
            tracks_file: get("TRACKS_FILE", "tracks.json"),
            users_file: get("USERS_FILE", "users.json"),
            region_column: get("REGION_COLUMN", "region_name"),
        }
    }
}

/// Load configuration from `.env` and environment
pub fn load_config() -> Result<Config> {
    // Load `.env` file if present
    dotenv::dotenv().ok();
    Ok(Config::from_lookup(|key| std::env::var(key).ok()))
}
