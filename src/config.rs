use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const CONFIG_PATH_ENV: &str = "SPOTIFY_DRIVER_CONFIG";

const PLACEHOLDER_CLIENT_ID: &str = "your_spotify_client_id";
const PLACEHOLDER_CLIENT_SECRET: &str = "your_spotify_client_secret";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Configuration file not found. A default '{0}' has been created. Please update it with your credentials.")]
    Created(String),

    #[error("missing Spotify setting: {0}")]
    Missing(&'static str),
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub spotify: SpotifyConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    #[serde(default = "default_token_cache")]
    pub token_cache: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_accounts_base_url")]
    pub accounts_base_url: String,
}

fn default_scopes() -> Vec<String> {
    [
        "user-read-private",
        "playlist-read-private",
        "playlist-read-collaborative",
        "playlist-modify-private",
        "playlist-modify-public",
    ]
    .iter()
    .map(|scope| scope.to_string())
    .collect()
}

fn default_token_cache() -> String {
    "spotify_tokens.json".to_string()
}

fn default_api_base_url() -> String {
    "https://api.spotify.com/v1".to_string()
}

fn default_accounts_base_url() -> String {
    "https://accounts.spotify.com".to_string()
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        SpotifyConfig {
            client_id: PLACEHOLDER_CLIENT_ID.to_string(),
            client_secret: PLACEHOLDER_CLIENT_SECRET.to_string(),
            redirect_uri: "http://localhost:8080".to_string(),
            scopes: default_scopes(),
            token_cache: default_token_cache(),
            api_base_url: default_api_base_url(),
            accounts_base_url: default_accounts_base_url(),
        }
    }
}

impl Config {
    pub fn from_toml_str(contents: &str) -> Result<Config, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Replaces credentials with `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET`
    /// and `SPOTIFY_REDIRECT_URI` when they are set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let targets = [
            ("SPOTIFY_CLIENT_ID", &mut self.spotify.client_id),
            ("SPOTIFY_CLIENT_SECRET", &mut self.spotify.client_secret),
            ("SPOTIFY_REDIRECT_URI", &mut self.spotify.redirect_uri),
        ];
        for (key, target) in targets {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                debug!("Using {} from environment", key);
                *target = value;
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let spotify = &self.spotify;
        if spotify.client_id.is_empty() || spotify.client_id == PLACEHOLDER_CLIENT_ID {
            return Err(ConfigError::Missing("client_id"));
        }
        if spotify.client_secret.is_empty() || spotify.client_secret == PLACEHOLDER_CLIENT_SECRET {
            return Err(ConfigError::Missing("client_secret"));
        }
        if spotify.redirect_uri.is_empty() {
            return Err(ConfigError::Missing("redirect_uri"));
        }
        Ok(())
    }
}

/// Loads `config.toml` (or the file named by `SPOTIFY_DRIVER_CONFIG`), then
/// applies `.env` and environment overrides.
pub fn load_config() -> Result<Config, ConfigError> {
    dotenv::dotenv().ok();
    let config_path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let mut config = load_config_from(Path::new(&config_path))?;
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Reads the config at `config_path`, writing a default one first if it does not exist.
pub fn load_config_from(config_path: &Path) -> Result<Config, ConfigError> {
    if !config_path.exists() {
        let default_config = Config {
            spotify: SpotifyConfig::default(),
        };

        let toml_string = toml::to_string_pretty(&default_config)?;

        let mut file = fs::File::create(config_path)?;
        file.write_all(toml_string.as_bytes())?;

        info!("Wrote default configuration to {}", config_path.display());
        return Err(ConfigError::Created(config_path.display().to_string()));
    }

    let config_str = fs::read_to_string(config_path)?;
    Config::from_toml_str(&config_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const MINIMAL: &str = r#"
        [spotify]
        client_id = "abc"
        client_secret = "shh"
        redirect_uri = "http://localhost:9000/callback"
    "#;

    #[test]
    fn minimal_file_gets_defaults() {
        let config = Config::from_toml_str(MINIMAL).unwrap();
        assert_eq!(config.spotify.client_id, "abc");
        assert_eq!(config.spotify.token_cache, "spotify_tokens.json");
        assert_eq!(config.spotify.api_base_url, "https://api.spotify.com/v1");
        assert_eq!(config.spotify.accounts_base_url, "https://accounts.spotify.com");
        assert!(config.spotify.scopes.contains(&"playlist-modify-public".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn explicit_scopes_replace_defaults() {
        let config = Config::from_toml_str(
            r#"
            [spotify]
            client_id = "abc"
            client_secret = "shh"
            redirect_uri = "http://localhost:8080"
            scopes = ["playlist-read-private"]
            "#,
        )
        .unwrap();
        assert_eq!(config.spotify.scopes, vec!["playlist-read-private".to_string()]);
    }

    #[test]
    fn missing_section_is_a_parse_error() {
        assert!(matches!(
            Config::from_toml_str("[tidal]\nclient_id = \"x\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn placeholders_fail_validation() {
        let config = Config {
            spotify: SpotifyConfig::default(),
        };
        assert!(matches!(config.validate(), Err(ConfigError::Missing("client_id"))));
    }

    #[test]
    fn overrides_replace_only_set_values() {
        let mut config = Config::from_toml_str(MINIMAL).unwrap();
        let env: HashMap<&str, &str> = [("SPOTIFY_CLIENT_SECRET", "from-env"), ("SPOTIFY_CLIENT_ID", "")]
            .into_iter()
            .collect();

        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.spotify.client_id, "abc");
        assert_eq!(config.spotify.client_secret, "from-env");
    }

    #[test]
    fn missing_file_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Created(_)));

        let written = load_config_from(&path).unwrap();
        assert_eq!(written.spotify, SpotifyConfig::default());
    }
}
