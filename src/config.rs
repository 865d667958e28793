// Configuration loading. The config file carries the search API credentials
// and the word lists that drive category selection and the spin narrative.

use crate::error::{Result, WheelError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up in the working directory when no path is given.
pub const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_SEARCH_URL: &str = "https://api.yelp.com/v2/search";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// OAuth1 credentials for the search API. Field names mirror the keys in
/// `config.json`.
#[derive(Deserialize, Clone)]
pub struct Credentials {
    #[serde(rename = "CONSUMER_KEY")]
    pub consumer_key: String,
    #[serde(rename = "CONSUMER_SECRET")]
    pub consumer_secret: String,
    #[serde(rename = "TOKEN")]
    pub token: String,
    #[serde(rename = "TOKEN_SECRET")]
    pub token_secret: String,
}

// Secrets stay out of debug logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("token", &self.token)
            .field("token_secret", &"<redacted>")
            .finish()
    }
}

/// Everything read from `config.json`. Built once in `main` and passed
/// around by reference.
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(flatten)]
    pub credentials: Credentials,
    pub categories: Vec<String>,
    pub adjectives: Vec<String>,
    pub foods: Vec<String>,
    #[serde(default = "default_search_url")]
    pub search_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_search_url() -> String {
    DEFAULT_SEARCH_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Config {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json).map_err(|e| WheelError::Config {
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Read and parse the config file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading configuration");
        let raw = std::fs::read_to_string(path).map_err(|e| WheelError::Config {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_json(&raw)
    }

    /// Outbound request timeout. A `timeout_secs` of 0 falls back to the
    /// default rather than failing every request immediately.
    pub fn timeout(&self) -> Duration {
        match self.timeout_secs {
            0 => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }
}

/// Pick the config file to load. An explicit path always wins; otherwise
/// `./config.json` is used if present, then the per-user config directory.
/// Falls back to `./config.json` so the error names the expected location.
pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(user) = dirs::config_dir().map(|d| d.join("wheel-of-food").join(CONFIG_FILE_NAME)) {
        if user.exists() {
            return user;
        }
    }
    local
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "CONSUMER_KEY": "ck",
        "CONSUMER_SECRET": "cs",
        "TOKEN": "tok",
        "TOKEN_SECRET": "ts",
        "categories": ["Mexican", "GO HUNGRY"],
        "adjectives": ["mighty"],
        "foods": ["tacos", "ramen"]
    }"#;

    #[test]
    fn parses_credentials_and_lists() {
        let config = Config::from_json(SAMPLE).unwrap();
        assert_eq!(config.credentials.consumer_key, "ck");
        assert_eq!(config.credentials.token_secret, "ts");
        assert_eq!(config.categories, vec!["Mexican", "GO HUNGRY"]);
        assert_eq!(config.search_url, DEFAULT_SEARCH_URL);
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn zero_timeout_falls_back_to_default() {
        let json = SAMPLE.replacen("\"CONSUMER_KEY\"", "\"timeout_secs\": 0, \"CONSUMER_KEY\"", 1);
        let config = Config::from_json(&json).unwrap();
        assert_eq!(config.timeout_secs, 0);
        assert_eq!(config.timeout(), Duration::from_secs(10));

        let json = SAMPLE.replacen("\"CONSUMER_KEY\"", "\"timeout_secs\": 3, \"CONSUMER_KEY\"", 1);
        assert_eq!(Config::from_json(&json).unwrap().timeout(), Duration::from_secs(3));
    }

    #[test]
    fn missing_credential_is_a_config_error() {
        let err = Config::from_json(r#"{"CONSUMER_KEY": "ck"}"#).unwrap_err();
        assert!(matches!(err, WheelError::Config { .. }));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = Config::from_json(SAMPLE).unwrap();
        let dbg = format!("{:?}", config.credentials);
        assert!(dbg.contains("ck"));
        assert!(!dbg.contains("\"cs\""));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn loads_from_file_and_resolves_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let path = resolve_path(Some(file.path()));
        assert_eq!(path, file.path());
        let config = Config::load(&path).unwrap();
        assert_eq!(config.foods.len(), 2);
    }

    #[test]
    fn unreadable_file_names_the_path() {
        let err = Config::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
