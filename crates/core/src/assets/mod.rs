use serde::{Deserialize, Serialize};

use crate::{FreqVizError, Result};

/// Metadata for one playable track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackInfo {
    pub key: String,
    pub path: String,
    pub name: String,
    pub artist: String,
    pub genre: String,
}

impl TrackInfo {
    /// `"{name} - {artist}"`, as shown while the track plays.
    pub fn display_label(&self) -> String {
        format!("{} - {}", self.name, self.artist)
    }
}

/// Fixed registry of tracks the player can load, in display order.
#[derive(Debug, Default, Clone)]
pub struct TrackCatalog {
    tracks: Vec<TrackInfo>,
}

impl TrackCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The two tracks bundled with the player.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for index in 1..=2 {
            catalog.register(TrackInfo {
                key: format!("track{index}"),
                path: format!("tracks/track{index}.mp3"),
                name: format!("Track {index}"),
                artist: "Unknown Artist".to_string(),
                genre: "UK Underground".to_string(),
            });
        }
        catalog
    }

    /// Adds a track, replacing any previous entry with the same key.
    pub fn register(&mut self, track: TrackInfo) {
        match self.tracks.iter_mut().find(|existing| existing.key == track.key) {
            Some(existing) => *existing = track,
            None => self.tracks.push(track),
        }
    }

    pub fn resolve(&self, key: &str) -> Result<&TrackInfo> {
        self.tracks
            .iter()
            .find(|track| track.key == key)
            .ok_or_else(|| FreqVizError::UnknownTrack(key.to_string()))
    }

    pub fn tracks(&self) -> &[TrackInfo] {
        &self.tracks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_builtin_tracks() {
        let catalog = TrackCatalog::builtin();
        let track = catalog.resolve("track2").unwrap();

        assert_eq!(track.path, "tracks/track2.mp3");
        assert_eq!(track.display_label(), "Track 2 - Unknown Artist");
        assert_eq!(catalog.tracks().len(), 2);
    }

    #[test]
    fn errors_on_missing_tracks() {
        let catalog = TrackCatalog::builtin();
        let err = catalog.resolve("track9").unwrap_err();
        assert!(format!("{err}").contains("track9"));
    }

    #[test]
    fn registering_an_existing_key_replaces_it() {
        let mut catalog = TrackCatalog::builtin();
        let mut track = catalog.resolve("track1").unwrap().clone();
        track.artist = "Somebody".to_string();
        catalog.register(track);

        assert_eq!(catalog.tracks().len(), 2);
        assert_eq!(catalog.resolve("track1").unwrap().artist, "Somebody");
    }
}
