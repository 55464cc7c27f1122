use crate::error::{config_error, env_error, BookingResult};
use crate::utils::time::parse_date;
use chrono::NaiveDate;
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

/// Default API base URL
pub const DEFAULT_API_URL: &str = "https://api.gocab.tech/api";

/// Default bound for a single API request, in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default location of the optional booking config file
pub const DEFAULT_CONFIG_FILE: &str = "config/booking.toml";

/// Main configuration structure for the booking client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the booking API, without a trailing slash
    pub api_base_url: String,
    /// Bearer token of the authenticated employee session
    #[serde(skip_serializing)]
    pub auth_token: String,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Timezone used to decide what "today" is
    pub timezone: String,
    /// Locale for user-facing messages
    pub locale: String,
    /// Dates that are not bookable besides weekends
    pub holidays: Vec<NaiveDate>,
}

/// Shape of `config/booking.toml`
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    holidays: Vec<String>,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> BookingResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let auth_token = env::var("GOCAB_AUTH_TOKEN").map_err(|_| env_error("GOCAB_AUTH_TOKEN"))?;

        let api_base_url = env::var("GOCAB_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let request_timeout_secs = match env::var("GOCAB_REQUEST_TIMEOUT_SECS") {
            Ok(value) => value
                .parse::<u64>()
                .map_err(|_| config_error("Invalid GOCAB_REQUEST_TIMEOUT_SECS format"))?,
            Err(_) => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let timezone = env::var("TIMEZONE").unwrap_or_else(|_| String::from("UTC"));
        let locale = env::var("BOOKING_LOCALE").unwrap_or_else(|_| String::from("en"));

        let config_file =
            env::var("GOCAB_CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let holidays = Self::load_holidays(Path::new(&config_file))?;

        let config = Config {
            api_base_url,
            auth_token,
            request_timeout_secs,
            timezone,
            locale,
            holidays,
        };
        config.validate()?;

        Ok(config)
    }

    /// Read holiday dates from the config file, if there is one
    fn load_holidays(path: &Path) -> BookingResult<Vec<NaiveDate>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let file_config: FileConfig = toml::from_str(&content)?;
        file_config
            .holidays
            .iter()
            .map(|raw| {
                parse_date(raw)
                    .ok_or_else(|| config_error(&format!("Invalid holiday date: {}", raw)))
            })
            .collect()
    }

    /// Check values that cannot be verified by their type alone
    pub fn validate(&self) -> BookingResult<()> {
        if self.auth_token.trim().is_empty() {
            return Err(env_error("GOCAB_AUTH_TOKEN"));
        }
        if self.request_timeout_secs == 0 {
            return Err(config_error("Request timeout must be at least one second"));
        }
        url::Url::parse(&self.api_base_url)
            .map_err(|e| config_error(&format!("Invalid API URL {}: {}", self.api_base_url, e)))?;
        self.tz()?;
        Ok(())
    }

    /// Parsed timezone
    pub fn tz(&self) -> BookingResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Unknown timezone: {}", self.timezone)))
    }

    /// Request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
