use async_trait::async_trait;
use log::{debug, info};

use crate::config::Config;
use crate::driver::{ServiceDriver, DEFAULT_PLAYLIST_LIMIT, DEFAULT_TRACK_LIMIT};
use crate::error::{DriverError, DriverResult};
use crate::models::{Playlist, Track};
use crate::spotify::api::SpotifyApi;
use crate::spotify::auth::{AuthError, Authenticator};
use crate::spotify::client::SpotifyClient;
use crate::spotify::data::SpotifyPlaylist;
use crate::spotify::error::SpotifyError;
use crate::spotify::mapper::SpotifyMapper;

pub const SERVICE_NAME: &str = "spotify";

/// Layered text kept in every mapped error: what Spotify said, or what went
/// wrong on our side of the request.
fn describe(error: &SpotifyError) -> String {
    match error {
        SpotifyError::Api { message, .. } => format!("Spotify (API) said: {}", message),
        other => format!("Spotify (client) said: {}", other),
    }
}

/// Vendor-reported failures become `specific`, everything else `fallback`.
fn map_error<F, G>(error: SpotifyError, specific: F, fallback: G) -> DriverError
where
    F: FnOnce(String) -> DriverError,
    G: FnOnce(String) -> DriverError,
{
    debug!("Spotify call failed: {:?}", error);
    let message = describe(&error);
    if error.is_api() {
        specific(message)
    } else {
        fallback(message)
    }
}

pub struct SpotifyDriver<A = SpotifyClient> {
    api: A,
    mapper: SpotifyMapper,
}

impl SpotifyDriver<SpotifyClient> {
    /// Runs the credential flow for `config` and returns a driver bound to
    /// the resulting session. Credential failures are returned as-is.
    pub async fn connect(config: &Config) -> Result<Self, AuthError> {
        let authenticator = Authenticator::new(&config.spotify)?;
        let token = authenticator.authenticate().await?;
        info!("Authenticated with Spotify");
        let client = SpotifyClient::new(authenticator, token, &config.spotify.api_base_url);
        Ok(Self::with_api(client))
    }
}

impl<A: SpotifyApi> SpotifyDriver<A> {
    pub fn with_api(api: A) -> Self {
        Self {
            api,
            mapper: SpotifyMapper,
        }
    }

    fn tagged_playlist(&self, playlist: &SpotifyPlaylist) -> Playlist {
        let mut mapped = self.mapper.map_playlist(playlist);
        mapped.tag(SERVICE_NAME);
        mapped
    }
}

#[async_trait]
impl<A: SpotifyApi> ServiceDriver for SpotifyDriver<A> {
    fn service_name(&self) -> &str {
        SERVICE_NAME
    }

    async fn get_user_playlists(&self, limit: Option<u32>) -> DriverResult<Vec<Playlist>> {
        let limit = limit.unwrap_or(DEFAULT_PLAYLIST_LIMIT);
        let response = self
            .api
            .current_user_playlists(limit)
            .await
            .map_err(|e| map_error(e, DriverError::ServiceDriver, DriverError::ServiceDriver))?;

        let playlists: Vec<Playlist> = response
            .items
            .iter()
            .map(|playlist| self.tagged_playlist(playlist))
            .collect();
        debug!("Fetched {} playlists", playlists.len());
        Ok(playlists)
    }

    async fn get_playlist_tracks(
        &self,
        playlist_id: &str,
        limit: Option<u32>,
    ) -> DriverResult<Vec<Track>> {
        let limit = limit.unwrap_or(DEFAULT_TRACK_LIMIT);
        let response = self
            .api
            .playlist_tracks(playlist_id, limit)
            .await
            .map_err(|e| map_error(e, DriverError::PlaylistNotFound, DriverError::NotFound))?;

        let mut tracks = self.mapper.map_items(&response.items);
        for track in &mut tracks {
            track.service_name = SERVICE_NAME.to_string();
        }
        debug!("Fetched {} tracks from playlist {}", tracks.len(), playlist_id);
        Ok(tracks)
    }

    async fn create_playlist(&self, name: &str) -> DriverResult<Playlist> {
        // Any failure here, the identity lookup included, is a driver error.
        let wrap = |e: SpotifyError| DriverError::ServiceDriver(describe(&e));

        let user = self.api.me().await.map_err(wrap)?;
        let created = self
            .api
            .user_playlist_create(&user.id, name)
            .await
            .map_err(wrap)?;

        info!("Created playlist {} ({})", created.name, created.id);
        Ok(self.tagged_playlist(&created))
    }

    async fn add_tracks_to_playlist(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> DriverResult<()> {
        let snapshot = self
            .api
            .playlist_add_items(playlist_id, track_ids)
            .await
            .map_err(|e| {
                map_error(e, DriverError::PlaylistNotFound, DriverError::ServiceDriver)
            })?;

        debug!(
            "Added {} tracks to playlist {} (snapshot {})",
            track_ids.len(),
            playlist_id,
            snapshot.snapshot_id
        );
        Ok(())
    }

    async fn get_random_track(&self) -> DriverResult<Option<Track>> {
        Err(DriverError::UnsupportedFeature(
            "Spotify does not support fetching a random track.".to_string(),
        ))
    }

    async fn get_playlist(&self, playlist_id: &str) -> DriverResult<Playlist> {
        let response = self
            .api
            .playlist(playlist_id)
            .await
            .map_err(|e| map_error(e, DriverError::PlaylistNotFound, DriverError::NotFound))?;

        Ok(self.tagged_playlist(&response))
    }
}
