use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use chrono::NaiveTime;

use crate::error::AppError;
use crate::models::slot::parse_time_of_day;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Target of every proxied call, without a trailing slash.
    pub backend_base_url: String,
    pub bind_addr: SocketAddr,
    /// Include the upstream reason phrase in error messages.
    pub verbose_upstream_errors: bool,
    pub upstream_timeout: Duration,
    pub closing_time: NaiveTime,
    /// `None` means any later slot before closing counts as upcoming.
    pub upcoming_window: Option<chrono::Duration>,
    pub empty_state_message: String,
    /// `None` disables the background refresh.
    pub poll_interval: Option<Duration>,
}

impl AppConfig {
    pub fn new(backend_base_url: &str) -> Self {
        Self {
            backend_base_url: normalize_base_url(backend_base_url),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            verbose_upstream_errors: true,
            upstream_timeout: Duration::from_secs(10),
            closing_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or_default(),
            upcoming_window: None,
            empty_state_message: "Data not available".to_string(),
            poll_interval: None,
        }
    }

    pub fn new_from_env() -> Result<Self, AppError> {
        let backend_base_url = env::var("BACKEND_BASE_URL")
            .map_err(|_| AppError::Config("BACKEND_BASE_URL is not set".to_string()))?;
        let mut config = Self::new(&backend_base_url);

        if let Ok(addr) = env::var("BIND_ADDR") {
            config.bind_addr = addr
                .parse()
                .map_err(|e| AppError::Config(format!("BIND_ADDR is invalid: {}", e)))?;
        }
        if let Ok(flag) = env::var("VERBOSE_UPSTREAM_ERRORS") {
            config.verbose_upstream_errors = parse_flag("VERBOSE_UPSTREAM_ERRORS", &flag)?;
        }
        if let Ok(secs) = env::var("UPSTREAM_TIMEOUT_SECS") {
            config.upstream_timeout = Duration::from_secs(parse_number("UPSTREAM_TIMEOUT_SECS", &secs)?);
        }
        if let Ok(closing) = env::var("CLOSING_TIME") {
            config.closing_time = parse_time_of_day(&closing)
                .ok_or_else(|| AppError::Config(format!("CLOSING_TIME is invalid: {}", closing)))?;
        }
        if let Ok(mins) = env::var("UPCOMING_WINDOW_MINS") {
            config.upcoming_window = match parse_number("UPCOMING_WINDOW_MINS", &mins)? {
                0 => None,
                mins => Some(chrono::Duration::minutes(mins as i64)),
            };
        }
        if let Ok(message) = env::var("EMPTY_STATE_MESSAGE") {
            config.empty_state_message = message;
        }
        if let Ok(secs) = env::var("POLL_INTERVAL_SECS") {
            config.poll_interval = match parse_number("POLL_INTERVAL_SECS", &secs)? {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            };
        }

        Ok(config)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.backend_base_url, path)
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_flag(key: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AppError::Config(format!("{} is not a boolean: {}", key, other))),
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64, AppError> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{} is not a number: {}", key, value)))
}
