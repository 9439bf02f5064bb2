use log::{debug, info, warn};
use oauth2::basic::{BasicClient, BasicTokenResponse};
use oauth2::reqwest::async_http_client;
use oauth2::url::Url;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, PkceCodeChallenge,
    PkceCodeVerifier, RedirectUrl, RefreshToken, Scope, TokenResponse, TokenUrl,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

use crate::config::SpotifyConfig;

/// Tokens are treated as expired this many seconds before Spotify says they are.
const EXPIRY_MARGIN_SECS: u64 = 60;
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("invalid OAuth URL: {0}")]
    InvalidUrl(#[from] oauth2::url::ParseError),

    #[error("token request failed: {0}")]
    TokenRequest(String),

    #[error("redirect URL has no authorization code")]
    MissingCode,

    #[error("redirect URL state does not match the authorization request")]
    StateMismatch,

    #[error("no refresh token available")]
    MissingRefreshToken,

    #[error("token cache IO error: {0}")]
    Io(#[from] io::Error),

    #[error("token cache format error: {0}")]
    CacheFormat(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: u64,
}

impl StoredToken {
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now_secs())
    }

    fn is_expired_at(&self, now: u64) -> bool {
        now + EXPIRY_MARGIN_SECS >= self.expires_at
    }

    fn from_response(response: &BasicTokenResponse, previous_refresh: Option<&str>) -> Self {
        let lifetime = response.expires_in().unwrap_or(DEFAULT_TOKEN_LIFETIME);
        StoredToken {
            access_token: response.access_token().secret().to_string(),
            refresh_token: response
                .refresh_token()
                .map(|token| token.secret().to_string())
                .or_else(|| previous_refresh.map(str::to_string)),
            expires_at: now_secs() + lifetime.as_secs(),
        }
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

fn store_tokens(path: &Path, token: &StoredToken) -> Result<(), AuthError> {
    let json = serde_json::to_string_pretty(token)?;
    fs::write(path, json)?;
    Ok(())
}

fn read_tokens(path: &Path) -> Result<StoredToken, AuthError> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Pulls the authorization code out of the URL Spotify redirected the browser to.
fn extract_code(redirected: &str, expected_state: &str) -> Result<String, AuthError> {
    let url = Url::parse(redirected.trim())?;
    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            _ => {}
        }
    }

    if state.as_deref() != Some(expected_state) {
        return Err(AuthError::StateMismatch);
    }
    code.filter(|c| !c.is_empty()).ok_or(AuthError::MissingCode)
}

/// Runs the authorization code flow (with PKCE) against Spotify's account
/// service and keeps the resulting token in a JSON cache file.
#[derive(Debug, Clone)]
pub struct Authenticator {
    client: BasicClient,
    scopes: Vec<String>,
    cache_path: PathBuf,
}

impl Authenticator {
    pub fn new(config: &SpotifyConfig) -> Result<Self, AuthError> {
        let accounts = config.accounts_base_url.trim_end_matches('/');
        let client = BasicClient::new(
            ClientId::new(config.client_id.clone()),
            Some(ClientSecret::new(config.client_secret.clone())),
            AuthUrl::new(format!("{}/authorize", accounts))?,
            Some(TokenUrl::new(format!("{}/api/token", accounts))?),
        )
        .set_redirect_uri(RedirectUrl::new(config.redirect_uri.clone())?);

        Ok(Authenticator {
            client,
            scopes: config.scopes.clone(),
            cache_path: PathBuf::from(&config.token_cache),
        })
    }

    /// Returns a usable token: the cached one, a refreshed one, or one from
    /// the interactive browser flow, in that order.
    pub async fn authenticate(&self) -> Result<StoredToken, AuthError> {
        match read_tokens(&self.cache_path) {
            Ok(token) if !token.is_expired() => {
                info!("Using cached Spotify token from {}", self.cache_path.display());
                return Ok(token);
            }
            Ok(token) => {
                if let Some(refresh_token) = token.refresh_token.as_deref() {
                    match self.refresh(refresh_token).await {
                        Ok(token) => return Ok(token),
                        Err(e) => warn!("Refreshing cached Spotify token failed: {}", e),
                    }
                }
            }
            Err(e) => debug!("No usable token cache at {}: {}", self.cache_path.display(), e),
        }

        self.authorize_interactively().await
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<StoredToken, AuthError> {
        info!("Refreshing Spotify access token");
        let response = self
            .client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
            .request_async(async_http_client)
            .await
            .map_err(|e| AuthError::TokenRequest(e.to_string()))?;

        let token = StoredToken::from_response(&response, Some(refresh_token));
        store_tokens(&self.cache_path, &token)?;
        Ok(token)
    }

    fn authorize_url(&self) -> (Url, CsrfToken, PkceCodeVerifier) {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();
        let (auth_url, csrf_token) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(self.scopes.iter().cloned().map(Scope::new))
            .set_pkce_challenge(pkce_challenge)
            .url();
        (auth_url, csrf_token, pkce_verifier)
    }

    async fn authorize_interactively(&self) -> Result<StoredToken, AuthError> {
        let (auth_url, csrf_token, pkce_verifier) = self.authorize_url();

        println!("Open this URL in your browser:\n{}", auth_url);
        print!("Enter the URL you were redirected to: ");
        io::stdout().flush()?;
        let mut input_url = String::new();
        io::stdin().read_line(&mut input_url)?;
        let auth_code = extract_code(&input_url, csrf_token.secret())?;

        let response = self
            .client
            .exchange_code(AuthorizationCode::new(auth_code))
            .set_pkce_verifier(pkce_verifier)
            .request_async(async_http_client)
            .await
            .map_err(|e| AuthError::TokenRequest(e.to_string()))?;

        let token = StoredToken::from_response(&response, None);
        store_tokens(&self.cache_path, &token)?;
        info!("Stored Spotify token in {}", self.cache_path.display());
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(cache: &Path) -> SpotifyConfig {
        SpotifyConfig {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://localhost:8080/callback".to_string(),
            scopes: vec!["playlist-read-private".to_string(), "playlist-modify-public".to_string()],
            token_cache: cache.display().to_string(),
            ..SpotifyConfig::default()
        }
    }

    #[test]
    fn extract_code_checks_state() {
        let url = "http://localhost:8080/callback?code=AQD123&state=xyz";
        assert_eq!(extract_code(url, "xyz").unwrap(), "AQD123");
        assert!(matches!(extract_code(url, "other"), Err(AuthError::StateMismatch)));
    }

    #[test]
    fn extract_code_without_code_fails() {
        let url = "http://localhost:8080/callback?error=access_denied&state=xyz\n";
        assert!(matches!(extract_code(url, "xyz"), Err(AuthError::MissingCode)));
    }

    #[test]
    fn extract_code_rejects_garbage() {
        assert!(matches!(extract_code("not a url", "xyz"), Err(AuthError::InvalidUrl(_))));
    }

    #[test]
    fn expiry_has_margin() {
        let token = StoredToken {
            access_token: "a".to_string(),
            refresh_token: None,
            expires_at: 1_000,
        };
        assert!(!token.is_expired_at(900));
        assert!(token.is_expired_at(950));
        assert!(token.is_expired_at(2_000));
    }

    #[test]
    fn token_cache_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        let token = StoredToken {
            access_token: "access".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at: 42,
        };

        store_tokens(&path, &token).unwrap();
        assert_eq!(read_tokens(&path).unwrap(), token);
    }

    #[test]
    fn corrupt_cache_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        fs::write(&path, "access\nrefresh\n42").unwrap();
        assert!(matches!(read_tokens(&path), Err(AuthError::CacheFormat(_))));
    }

    #[test]
    fn authorize_url_carries_scopes_and_pkce() {
        let dir = tempfile::tempdir().unwrap();
        let auth = Authenticator::new(&config(&dir.path().join("t.json"))).unwrap();

        let (url, csrf, _verifier) = auth.authorize_url();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let get = |key: &str| pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone());

        assert!(url.as_str().starts_with("https://accounts.spotify.com/authorize?"));
        assert_eq!(get("client_id").as_deref(), Some("id"));
        assert_eq!(get("scope").as_deref(), Some("playlist-read-private playlist-modify-public"));
        assert_eq!(get("code_challenge_method").as_deref(), Some("S256"));
        assert_eq!(get("state").as_deref(), Some(csrf.secret().as_str()));
    }

    #[test]
    fn bad_redirect_uri_fails_construction() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(&dir.path().join("t.json"));
        config.redirect_uri = "localhost without scheme".to_string();
        assert!(matches!(Authenticator::new(&config), Err(AuthError::InvalidUrl(_))));
    }
}
