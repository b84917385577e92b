use log::LevelFilter;
use reqwest::Url;
use std::collections::HashMap;
use std::time::Duration;

use crate::data::models::ConfigError;
use crate::features::view::ViewLimits;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000/";
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:5000";

#[derive(Debug, Clone)]
pub struct Settings {
    pub backend_url: Url,
    pub listen_addr: String,
    /// No timeout unless configured; the HTTP client default applies.
    pub backend_timeout: Option<Duration>,
    pub templates_glob: String,
    pub static_dir: String,
    pub session_idle_days: i64,
    /// Upper bound on concurrently mounted views.
    pub view_capacity: usize,
    pub view_sweep_interval: Duration,
    pub log_level: LevelFilter,
}

impl Settings {
    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_vars(&std::env::vars().collect())
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let backend_url = get("SEARCH_BACKEND_URL").unwrap_or(DEFAULT_BACKEND_URL);
        let backend_url = Url::parse(backend_url).map_err(|e| ConfigError::InvalidUrl {
            key: "SEARCH_BACKEND_URL",
            reason: e.to_string(),
        })?;
        if !matches!(backend_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                key: "SEARCH_BACKEND_URL",
                reason: format!("unsupported scheme {:?}", backend_url.scheme()),
            });
        }

        let backend_timeout = get("BACKEND_TIMEOUT_SECS")
            .map(|v| positive("BACKEND_TIMEOUT_SECS", v))
            .transpose()?
            .map(|secs| Duration::from_secs(secs as u64));

        let session_idle_days = get("SESSION_IDLE_DAYS")
            .map(|v| positive("SESSION_IDLE_DAYS", v))
            .transpose()?
            .unwrap_or(1);

        let view_capacity = get("VIEW_CAPACITY")
            .map(|v| positive("VIEW_CAPACITY", v))
            .transpose()?
            .unwrap_or(1024) as usize;

        let view_sweep_interval = get("VIEW_SWEEP_SECS")
            .map(|v| positive("VIEW_SWEEP_SECS", v))
            .transpose()?
            .map(|secs| Duration::from_secs(secs as u64))
            .unwrap_or(Duration::from_secs(60));

        let log_level = match get("RUST_LOG_LEVEL") {
            Some(v) => v.parse::<LevelFilter>().map_err(|_| ConfigError::InvalidLogLevel {
                key: "RUST_LOG_LEVEL",
                value: v.to_string(),
            })?,
            None => LevelFilter::Info,
        };

        Ok(Settings {
            backend_url,
            listen_addr: get("LISTEN_ADDR").unwrap_or(DEFAULT_LISTEN_ADDR).to_string(),
            backend_timeout,
            templates_glob: get("TEMPLATES_GLOB").unwrap_or("templates/**/*.html").to_string(),
            static_dir: get("STATIC_DIR").unwrap_or("static").to_string(),
            session_idle_days,
            view_capacity,
            view_sweep_interval,
            log_level,
        })
    }

    /// Views are unmounted once idle as long as their session would be.
    pub fn view_limits(&self) -> ViewLimits {
        ViewLimits {
            idle: Duration::from_secs(self.session_idle_days as u64 * 24 * 60 * 60),
            capacity: self.view_capacity,
        }
    }
}

fn positive(key: &'static str, value: &str) -> Result<i64, ConfigError> {
    match value.parse::<i64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            key,
            value: value.to_string(),
        }),
    }
}
