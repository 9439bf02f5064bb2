use log::debug;

use crate::models::{Playlist, Track};
use crate::spotify::data::{SpotifyPlaylist, SpotifyPlaylistItem, SpotifyTrack};

/// Converts Spotify response objects into model values.
///
/// Mapped values carry an empty `service_name`; the driver tags them.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpotifyMapper;

impl SpotifyMapper {
    pub fn map_playlist(&self, playlist: &SpotifyPlaylist) -> Playlist {
        let tracks = playlist
            .tracks
            .as_ref()
            .map(|tracks| self.map_items(&tracks.items))
            .unwrap_or_default();

        Playlist {
            id: playlist.id.clone(),
            name: playlist.name.clone(),
            description: playlist.description.clone().filter(|d| !d.is_empty()),
            tracks,
            service_name: String::new(),
        }
    }

    /// `None` for items that cannot be addressed by id: local files and non-track entries.
    pub fn map_track(&self, track: &SpotifyTrack) -> Option<Track> {
        if track.type_ != "track" {
            debug!("Skipping playlist item of type {}", track.type_);
            return None;
        }
        let Some(id) = track.id.clone() else {
            debug!("Skipping track without id: {}", track.name);
            return None;
        };

        Some(Track {
            id,
            title: track.name.clone(),
            artists: track.artists.iter().map(|artist| artist.name.clone()).collect(),
            album: track.album.as_ref().map(|album| album.name.clone()),
            isrc: track.external_ids.as_ref().and_then(|ids| ids.isrc.clone()),
            duration_ms: track.duration_ms,
            service_name: String::new(),
        })
    }

    pub fn map_items(&self, items: &[SpotifyPlaylistItem]) -> Vec<Track> {
        items
            .iter()
            .filter_map(|item| item.track.as_ref())
            .filter_map(|track| self.map_track(track))
            .collect()
    }
}
