use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artists: Vec<String>,
    pub album: Option<String>,
    pub isrc: Option<String>,
    pub duration_ms: Option<u64>,
    /// Name of the service that produced this track, set by the driver.
    pub service_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub tracks: Vec<Track>,
    /// Name of the service that produced this playlist, set by the driver.
    pub service_name: String,
}

impl Playlist {
    /// Tags the playlist and every track it carries with `service_name`.
    pub fn tag(&mut self, service_name: &str) {
        self.service_name = service_name.to_string();
        for track in &mut self.tracks {
            track.service_name = service_name.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            title: "Song".to_string(),
            artists: vec!["A".to_string(), "B".to_string()],
            album: None,
            isrc: None,
            duration_ms: None,
            service_name: String::new(),
        }
    }

    #[test]
    fn tag_reaches_nested_tracks() {
        let mut playlist = Playlist {
            id: "p1".to_string(),
            name: "Mix".to_string(),
            description: None,
            tracks: vec![track("t1"), track("t2")],
            service_name: "other".to_string(),
        };

        playlist.tag("spotify");

        assert_eq!(playlist.service_name, "spotify");
        assert!(playlist.tracks.iter().all(|t| t.service_name == "spotify"));
    }
}
