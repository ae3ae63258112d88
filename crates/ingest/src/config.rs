use std::env;
use std::time::Duration;

/// Runtime configuration, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    /// `KIA_QUERY_INTERVAL`, minutes between probe offsets. Default 5.
    pub query_interval_minutes: i64,
    /// `KIA_QUERY_AMOUNT`, the `Q` in the `2Q+1` probe fan-out. Default 2.
    pub query_amount: i64,
    pub db_path: String,
    pub input_dir: String,
    pub bind_host: String,
    pub bind_port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("KIA_BMTC_API_URL")
                .unwrap_or_else(|_| "https://bmtcmobileapi.karnataka.gov.in/WebAPI".to_owned()),
            query_interval_minutes: parse_env("KIA_QUERY_INTERVAL", 5),
            query_amount: parse_env("KIA_QUERY_AMOUNT", 2),
            db_path: env::var("KIA_DB_PATH").unwrap_or_else(|_| "./kia-live.sqlite3".to_owned()),
            input_dir: env::var("KIA_INPUT_DIR").unwrap_or_else(|_| "./in".to_owned()),
            bind_host: env::var("KIA_BIND_HOST").unwrap_or_else(|_| "0.0.0.0".to_owned()),
            bind_port: parse_env("KIA_BIND_PORT", 59966),
        }
    }

    pub fn query_interval(&self) -> Duration {
        Duration::from_secs((self.query_interval_minutes * 60).max(0) as u64)
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name).ok().and_then(|value| value.parse().ok()).unwrap_or(default)
}
