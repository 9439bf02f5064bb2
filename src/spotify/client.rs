use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::spotify::api::SpotifyApi;
use crate::spotify::auth::{AuthError, Authenticator, StoredToken};
use crate::spotify::data::{
    AddItemsRequest, CreatePlaylistRequest, ErrorBody, Paging, Snapshot, SpotifyPlaylist,
    SpotifyPlaylistItem, SpotifyUser,
};
use crate::spotify::error::{Result, SpotifyError};

/// Authenticated Spotify Web API client.
///
/// Holds the session token and refreshes it on the first request after it
/// expires.
pub struct SpotifyClient {
    http: Client,
    base_url: String,
    authenticator: Authenticator,
    token: Mutex<StoredToken>,
}

impl SpotifyClient {
    pub fn new(authenticator: Authenticator, token: StoredToken, base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            authenticator,
            token: Mutex::new(token),
        }
    }

    async fn access_token(&self) -> Result<String> {
        let mut token = self.token.lock().await;
        if token.is_expired() {
            let refresh_token = token
                .refresh_token
                .clone()
                .ok_or(AuthError::MissingRefreshToken)?;
            *token = self.authenticator.refresh(&refresh_token).await?;
        }
        Ok(token.access_token.clone())
    }

    /// Base URL with `segments` appended; each segment is percent-encoded,
    /// so ids containing `/`, `?` or `#` stay inside their own segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| SpotifyError::Url(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| SpotifyError::Url(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T> {
        let request = self.http.get(self.endpoint(segments)?).query(query);
        self.send(request).await
    }

    async fn post<B, T>(&self, segments: &[&str], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = self.http.post(self.endpoint(segments)?).json(body);
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let token = self.access_token().await?;
        let response = request.bearer_auth(token).send().await?;
        let status = response.status();
        debug!("Spotify responded {} for {}", status, response.url());

        let body = response.text().await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl SpotifyApi for SpotifyClient {
    async fn current_user_playlists(&self, limit: u32) -> Result<Paging<SpotifyPlaylist>> {
        self.get(&["me", "playlists"], &[("limit", limit.to_string())]).await
    }

    async fn playlist_tracks(
        &self,
        playlist_id: &str,
        limit: u32,
    ) -> Result<Paging<SpotifyPlaylistItem>> {
        let id = spotify_id("playlist", playlist_id);
        self.get(
            &["playlists", id.as_str(), "tracks"],
            &[("limit", limit.to_string()), ("additional_types", "track".to_string())],
        )
        .await
    }

    async fn user_playlist_create(&self, user_id: &str, name: &str) -> Result<SpotifyPlaylist> {
        let request_body = CreatePlaylistRequest {
            name,
            public: true,
            collaborative: false,
            description: "",
        };
        self.post(&["users", user_id, "playlists"], &request_body).await
    }

    async fn me(&self) -> Result<SpotifyUser> {
        self.get(&["me"], &[]).await
    }

    async fn playlist_add_items(&self, playlist_id: &str, items: &[String]) -> Result<Snapshot> {
        let id = spotify_id("playlist", playlist_id);
        let uris: Vec<String> = items.iter().map(|item| spotify_uri("track", item)).collect();
        self.post(&["playlists", id.as_str(), "tracks"], &AddItemsRequest { uris: &uris }).await
    }

    async fn playlist(&self, playlist_id: &str) -> Result<SpotifyPlaylist> {
        let id = spotify_id("playlist", playlist_id);
        self.get(&["playlists", id.as_str()], &[("additional_types", "track".to_string())]).await
    }
}

/// Turns a non-success response into `SpotifyError::Api`, preferring the
/// message from Spotify's error object over the raw body.
pub(crate) fn api_error(status: StatusCode, body: &str) -> SpotifyError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => SpotifyError::Api {
            status: parsed.error.status,
            message: parsed.error.message,
            reason: parsed.error.reason,
        },
        Err(_) => {
            let body = body.trim();
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                body.to_string()
            };
            SpotifyError::Api {
                status: status.as_u16(),
                message,
                reason: None,
            }
        }
    }
}

/// Bare id from an id, a `spotify:<kind>:<id>` URI or an open.spotify.com URL.
pub fn spotify_id(kind: &str, input: &str) -> String {
    let input = input.trim();

    if let Some(rest) = input.strip_prefix("spotify:") {
        let parts: Vec<&str> = rest.split(':').collect();
        if let Some(pos) = parts.iter().position(|part| *part == kind) {
            if let Some(id) = parts.get(pos + 1) {
                return id.to_string();
            }
        }
    } else if input.starts_with("http://") || input.starts_with("https://") {
        if let Ok(url) = Url::parse(input) {
            let segments: Vec<&str> = url.path_segments().map(|s| s.collect()).unwrap_or_default();
            if let Some(pos) = segments.iter().position(|segment| *segment == kind) {
                if let Some(id) = segments.get(pos + 1) {
                    return id.to_string();
                }
            }
        }
    }

    input.to_string()
}

/// `spotify:<kind>:<id>` for anything [`spotify_id`] accepts; URIs pass through.
pub fn spotify_uri(kind: &str, input: &str) -> String {
    let input = input.trim();
    if input.starts_with("spotify:") {
        input.to_string()
    } else {
        format!("spotify:{}:{}", kind, spotify_id(kind, input))
    }
}
