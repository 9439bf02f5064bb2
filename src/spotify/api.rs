use async_trait::async_trait;

use crate::spotify::data::{Paging, Snapshot, SpotifyPlaylist, SpotifyPlaylistItem, SpotifyUser};
use crate::spotify::error::Result;

/// Spotify Web API calls the driver depends on.
///
/// `SpotifyClient` is the production implementation; tests use the
/// generated `MockSpotifyApi`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpotifyApi: Send + Sync {
    async fn current_user_playlists(&self, limit: u32) -> Result<Paging<SpotifyPlaylist>>;

    async fn playlist_tracks(
        &self,
        playlist_id: &str,
        limit: u32,
    ) -> Result<Paging<SpotifyPlaylistItem>>;

    async fn user_playlist_create(&self, user_id: &str, name: &str) -> Result<SpotifyPlaylist>;

    async fn me(&self) -> Result<SpotifyUser>;

    async fn playlist_add_items(&self, playlist_id: &str, items: &[String]) -> Result<Snapshot>;

    async fn playlist(&self, playlist_id: &str) -> Result<SpotifyPlaylist>;
}
