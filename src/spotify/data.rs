//! Response shapes of the Spotify Web API endpoints the driver uses.
//!
//! Only the fields the mapper reads are declared; everything else in the
//! payloads is ignored by serde.

use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Clone)]
pub struct Paging<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SpotifyUser {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Playlist object as returned by `/me/playlists`, `/playlists/{id}` and playlist creation.
///
/// Listing endpoints only carry a `{href, total}` reference under `tracks`;
/// the single playlist endpoint embeds the first page of items.
#[derive(Deserialize, Debug, Clone)]
pub struct SpotifyPlaylist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tracks: Option<PlaylistTracks>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct PlaylistTracks {
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub items: Vec<SpotifyPlaylistItem>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SpotifyPlaylistItem {
    #[serde(default)]
    pub added_at: Option<String>,
    // null for tracks that were removed from the catalogue
    #[serde(default)]
    pub track: Option<SpotifyTrack>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SpotifyTrack {
    // local files have no id
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
    #[serde(default)]
    pub album: Option<SpotifyAlbum>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub external_ids: Option<ExternalIds>,
    #[serde(rename = "type", default = "default_item_type")]
    pub type_: String,
}

fn default_item_type() -> String {
    "track".to_string()
}

#[derive(Deserialize, Debug, Clone)]
pub struct SpotifyArtist {
    pub name: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SpotifyAlbum {
    pub name: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ExternalIds {
    #[serde(default)]
    pub isrc: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Snapshot {
    pub snapshot_id: String,
}

#[derive(Serialize)]
pub(crate) struct CreatePlaylistRequest<'a> {
    pub name: &'a str,
    pub public: bool,
    pub collaborative: bool,
    pub description: &'a str,
}

#[derive(Serialize)]
pub(crate) struct AddItemsRequest<'a> {
    pub uris: &'a [String],
}

/// `{"error": {"status": 404, "message": "..."}}` body Spotify sends on failures.
#[derive(Deserialize, Debug)]
pub(crate) struct ErrorBody {
    pub error: ErrorObject,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ErrorObject {
    pub status: u16,
    pub message: String,
    #[serde(default)]
    pub reason: Option<String>,
}
