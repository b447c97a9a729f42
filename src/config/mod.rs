use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{FeederError, FeederResult};
use crate::services::DEFAULT_MAX_CONCURRENT_FETCHES;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub max_concurrent_fetches: usize,
    pub aggregate_timeout: Option<Duration>,
    pub log_level: String,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> FeederResult<Self> {
        let exe_dir = Self::exe_dir();

        // Try to load .env from executable's directory first
        if let Some(ref dir) = exe_dir {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok(), exe_dir)
    }

    /// Build the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F, exe_dir: Option<PathBuf>) -> FeederResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Default db_path is relative to executable directory
        let db_path = lookup("FEEDLINE_DB_PATH").unwrap_or_else(|| {
            exe_dir
                .map(|d| d.join("feedline.db").to_string_lossy().into_owned())
                .unwrap_or_else(|| "./feedline.db".to_string())
        });

        let max_concurrent_fetches = match lookup("FEEDLINE_MAX_CONCURRENT_FETCHES") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(FeederError::Config(format!(
                        "FEEDLINE_MAX_CONCURRENT_FETCHES must be a positive integer, got '{}'",
                        raw
                    )))
                }
            },
            None => DEFAULT_MAX_CONCURRENT_FETCHES,
        };

        let aggregate_timeout = lookup("FEEDLINE_AGGREGATE_TIMEOUT_SECS")
            .map(|raw| {
                raw.trim().parse::<u64>().map(Duration::from_secs).map_err(|_| {
                    FeederError::Config(format!(
                        "FEEDLINE_AGGREGATE_TIMEOUT_SECS must be a number of seconds, got '{}'",
                        raw
                    ))
                })
            })
            .transpose()?;

        let log_level = lookup("FEEDLINE_LOG_LEVEL").unwrap_or_else(|| "warn".to_string());

        Ok(Self {
            db_path,
            max_concurrent_fetches,
            aggregate_timeout,
            log_level,
        })
    }
}
