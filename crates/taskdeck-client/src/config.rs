use tracing::warn;

pub const BASE_URL_ENV_VAR: &str = "TASKDECK_BASE_URL";
pub const DEBOUNCE_ENV_VAR: &str = "TASKDECK_DEBOUNCE_MS";
pub const TIMEOUT_ENV_VAR: &str = "TASKDECK_TIMEOUT_SECS";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_DEBOUNCE_MS: u64 = 300;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub debounce_ms: u64,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Resolve from environment variables, falling back to defaults.
    /// Unparsable values are ignored with a warning rather than failing
    /// startup.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var(BASE_URL_ENV_VAR) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                config.base_url = trimmed.trim_end_matches('/').to_string();
            }
        }

        if let Some(value) = parse_env_u64(DEBOUNCE_ENV_VAR) {
            config.debounce_ms = value;
        }
        if let Some(value) = parse_env_u64(TIMEOUT_ENV_VAR) {
            config.timeout_secs = value;
        }

        config
    }
}

fn parse_env_u64(var: &str) -> Option<u64> {
    let raw = std::env::var(var).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(var, raw = %raw, %error, "ignoring unparsable env override");
            None
        }
    }
}
