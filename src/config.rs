use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub api_base_url: String,
    pub status_ttl: Duration,
    pub request_timeout: Duration,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", 8080),
            api_base_url: try_load("ACTIVITIES_API_URL", DEFAULT_API_URL.to_string()),
            status_ttl: Duration::from_millis(try_load("STATUS_TTL_MS", 5000)),
            request_timeout: Duration::from_millis(try_load("REQUEST_TIMEOUT_MS", 10_000)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            api_base_url: DEFAULT_API_URL.to_string(),
            status_ttl: Duration::from_millis(5000),
            request_timeout: Duration::from_millis(10_000),
        }
    }
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|err| {
            warn!("invalid {key} value {raw:?}: {err}, using default: {default}");
            default
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_on_unparseable_value() {
        // SAFETY: the variable name is unique to this test.
        unsafe { env::set_var("ACTIVITY_PORTAL_TEST_PORT", "not-a-port") };
        let port: u16 = try_load("ACTIVITY_PORTAL_TEST_PORT", 8080);
        assert_eq!(port, 8080);
    }

    #[test]
    fn falls_back_when_unset() {
        let ttl: u64 = try_load("ACTIVITY_PORTAL_TEST_UNSET_TTL", 5000);
        assert_eq!(ttl, 5000);
    }
}
