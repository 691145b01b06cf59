use serde::{Deserialize, Serialize};
use std::fmt;

/// Zone identifier assigned by the Roon core
pub type ZoneId = String;

/// Seek position in seconds
pub type SeekSeconds = i64;

/// Playback state of a zone
///
/// Passed through from the core untouched; states this crate does not know
/// about deserialize as [`ZoneState::Unknown`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ZoneState {
    Playing,
    Paused,
    Stopped,
    Loading,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ZoneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ZoneState::Playing => "playing",
            ZoneState::Paused => "paused",
            ZoneState::Stopped => "stopped",
            ZoneState::Loading => "loading",
            ZoneState::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// A playback zone as reported by the core
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Zone {
    pub zone_id: ZoneId,

    #[serde(default)]
    pub display_name: String,

    /// Unique identifier-safe name, assigned by the zone store
    #[serde(skip)]
    pub slug_name: String,

    #[serde(default)]
    pub state: ZoneState,

    #[serde(default)]
    pub now_playing: Option<NowPlaying>,
}

/// The active track of a zone
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NowPlaying {
    #[serde(default)]
    pub seek_position: Option<SeekSeconds>,

    /// Track length in seconds
    #[serde(default)]
    pub length: Option<u32>,

    #[serde(default)]
    pub one_line: OneLine,

    #[serde(default)]
    pub two_line: TwoLine,

    #[serde(default)]
    pub three_line: ThreeLine,
}

impl NowPlaying {
    /// Seek position in seconds, 0 when the core did not report one
    pub fn seek_seconds(&self) -> SeekSeconds {
        self.seek_position.unwrap_or(0)
    }

    /// Track length in seconds, 0 when unknown (e.g. radio streams)
    pub fn length_seconds(&self) -> u32 {
        self.length.unwrap_or(0)
    }

    pub fn title(&self) -> &str {
        &self.two_line.line1
    }

    pub fn artist(&self) -> &str {
        &self.two_line.line2
    }

    pub fn album(&self) -> &str {
        &self.three_line.line3
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OneLine {
    #[serde(default)]
    pub line1: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TwoLine {
    #[serde(default)]
    pub line1: String,
    #[serde(default)]
    pub line2: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ThreeLine {
    #[serde(default)]
    pub line1: String,
    #[serde(default)]
    pub line2: String,
    #[serde(default)]
    pub line3: String,
}

/// Position-only update for one zone
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeekUpdate {
    pub zone_id: ZoneId,
    #[serde(default)]
    pub seek_position: Option<SeekSeconds>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zone_parses_core_shape() {
        let zone: Zone = serde_json::from_value(json!({
            "zone_id": "1601",
            "display_name": "Kitchen",
            "state": "playing",
            "now_playing": {
                "seek_position": 12,
                "length": 240,
                "one_line": { "line1": "Song - Artist" },
                "two_line": { "line1": "Song", "line2": "Artist" },
                "three_line": { "line1": "Song", "line2": "Artist", "line3": "Album" }
            }
        }))
        .unwrap();

        assert_eq!(zone.state, ZoneState::Playing);
        assert!(zone.slug_name.is_empty());
        let np = zone.now_playing.unwrap();
        assert_eq!(np.seek_seconds(), 12);
        assert_eq!(np.length_seconds(), 240);
        assert_eq!(np.title(), "Song");
        assert_eq!(np.artist(), "Artist");
        assert_eq!(np.album(), "Album");
    }

    #[test]
    fn unknown_state_and_missing_fields_default() {
        let zone: Zone = serde_json::from_value(json!({
            "zone_id": "1602",
            "state": "buffering",
            "now_playing": { "two_line": { "line1": "Radio" } }
        }))
        .unwrap();

        assert_eq!(zone.state, ZoneState::Unknown);
        assert_eq!(zone.display_name, "");
        let np = zone.now_playing.unwrap();
        assert_eq!(np.seek_seconds(), 0);
        assert_eq!(np.length_seconds(), 0);
        assert_eq!(np.artist(), "");
    }

    #[test]
    fn zone_without_id_is_rejected() {
        let parsed = serde_json::from_value::<Zone>(json!({ "display_name": "Den" }));
        assert!(parsed.is_err());
    }
}
