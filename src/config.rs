use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::ClientError;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub data_dir: PathBuf,
    /// `None` = sin timeout (una petición colgada deja el selector en "Loading...").
    pub timeout: Option<Duration>,
}

// carga .env si existe
fn load_dotenv() {
    let _ = dotenv::dotenv();
}

impl Config {
    /// Lee la configuración desde el entorno (y `.env` si existe).
    /// Respeta PORTAL_API_URL / PORTAL_DATA_DIR / PORTAL_TIMEOUT_SECS.
    pub fn load() -> Result<Self, ClientError> {
        load_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `load` pero con una fuente de variables inyectable (tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = var_or(&lookup, "PORTAL_API_URL", DEFAULT_API_URL);
        let data_dir = PathBuf::from(var_or(&lookup, "PORTAL_DATA_DIR", DEFAULT_DATA_DIR));
        let timeout = try_parse::<u64, _>(&lookup, "PORTAL_TIMEOUT_SECS")?.map(Duration::from_secs);

        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ClientError::Config(format!(
                "PORTAL_API_URL must be an http(s) URL, got '{api_url}'"
            )));
        }

        Ok(Self { api_url, data_dir, timeout })
    }
}

fn var_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(v) => v.trim().to_string(),
        None => {
            info!("{key} not set, using default: {default}");
            default.to_string()
        }
    }
}

fn try_parse<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ClientError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key).filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };

    raw.trim().parse::<T>().map(Some).map_err(|e| {
        warn!("Invalid {key} value: {e}");
        ClientError::Config(format!("invalid {key} '{raw}': {e}"))
    })
}
