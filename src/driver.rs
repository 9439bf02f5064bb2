use async_trait::async_trait;

use crate::error::DriverResult;
use crate::models::{Playlist, Track};

pub const DEFAULT_PLAYLIST_LIMIT: u32 = 25;
pub const DEFAULT_TRACK_LIMIT: u32 = 100;

/// Capabilities the aggregation layer expects from every playlist service.
///
/// Callers hold drivers as `Box<dyn ServiceDriver>` so they never see which
/// backend they talk to. Every `Playlist` and `Track` handed back is tagged
/// with [`ServiceDriver::service_name`].
#[async_trait]
pub trait ServiceDriver: Send + Sync {
    fn service_name(&self) -> &str;

    /// Playlists of the authenticated user; `None` means [`DEFAULT_PLAYLIST_LIMIT`].
    async fn get_user_playlists(&self, limit: Option<u32>) -> DriverResult<Vec<Playlist>>;

    /// Tracks of a playlist in service order; `None` means [`DEFAULT_TRACK_LIMIT`].
    async fn get_playlist_tracks(
        &self,
        playlist_id: &str,
        limit: Option<u32>,
    ) -> DriverResult<Vec<Track>>;

    async fn create_playlist(&self, name: &str) -> DriverResult<Playlist>;

    async fn add_tracks_to_playlist(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> DriverResult<()>;

    async fn get_random_track(&self) -> DriverResult<Option<Track>>;

    async fn get_playlist(&self, playlist_id: &str) -> DriverResult<Playlist>;
}
