use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::{info, warn};

use crate::google::Credentials;

const SECRETS_DIR: &str = "/run/secrets";
const ACCESS_TOKEN: &str = "GOOGLE_ACCESS_TOKEN";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid {key} value: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub spreadsheet_id: String,
    pub sheet_name: String,
    pub drive_folder_id: Option<String>,
    pub share_uploads: bool,
    pub cors_origin: String,
    pub max_upload_bytes: usize,
    pub request_timeout: Duration,
    pub sheets_url: String,
    pub drive_url: String,
    pub credentials: Credentials,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let max_upload_mb: usize = try_load("MAX_UPLOAD_MB", "25")?;
        let timeout_secs: u64 = try_load("REQUEST_TIMEOUT_SECS", "30")?;

        Ok(Self {
            port: try_load("RUST_PORT", "5000")?,
            spreadsheet_id: require("SPREADSHEET_ID")?,
            sheet_name: try_load("SHEET_NAME", "Sheet1")?,
            drive_folder_id: var("DRIVE_FOLDER_ID").ok(),
            share_uploads: try_load("SHARE_UPLOADS", "true")?,
            cors_origin: try_load("CORS_ORIGIN", "*")?,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            request_timeout: Duration::from_secs(timeout_secs),
            sheets_url: try_load("SHEETS_API_URL", "https://sheets.googleapis.com")?,
            drive_url: try_load("DRIVE_API_URL", "https://www.googleapis.com")?,
            credentials: load_credentials(),
        })
    }

    /// Columns the numbering reads, dispatch number through file type.
    pub fn numbers_range(&self) -> String {
        format!("{}!A:D", self.sheet_name)
    }

    /// Full register row.
    pub fn entries_range(&self) -> String {
        format!("{}!A:F", self.sheet_name)
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        info!("Environment variable {key} not found");
    })
}

fn require(key: &'static str) -> Result<String, ConfigError> {
    var(key).map_err(|_| ConfigError::Missing(key))
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key,
                reason: e.to_string(),
            }
        })
}

fn load_credentials() -> Credentials {
    match var(ACCESS_TOKEN) {
        Ok(token) => Credentials::Fixed(token.trim().to_string()),
        Err(_) => {
            let path = PathBuf::from(SECRETS_DIR).join(ACCESS_TOKEN);
            info!("Reading access token from {}", path.display());

            Credentials::Secret(path)
        }
    }
}
