use crate::frame::{DisplayFrame, PROGRESS_RESOLUTION};
use serde::{Deserialize, Serialize};

/// Display engine endpoint names
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    GameMetadata,
    BindGameEvent,
    GameEvent,
    RemoveGame,
}

impl Endpoint {
    /// URL path segment for this endpoint
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::GameMetadata => "game_metadata",
            Endpoint::BindGameEvent => "bind_game_event",
            Endpoint::GameEvent => "game_event",
            Endpoint::RemoveGame => "remove_game",
        }
    }
}

/// Icon shown next to the event on devices with an icon slot (music note)
pub const NOW_PLAYING_ICON: u32 = 23;

/// Text shown by the liveness probe
pub const LOADING_TEXT: &str = "Loading....";

/// Who we are to the display engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameIdentity {
    /// Game id, upper-case letters, digits, `-` and `_` only
    pub game: String,
    /// Event id within the game
    pub event: String,
    pub display_name: String,
    pub developer: String,
}

/// `game_metadata` request body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameMetadata {
    pub game: String,
    pub game_display_name: String,
    pub developer: String,
}

/// `bind_game_event` request body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BindGameEvent {
    pub game: String,
    pub event: String,
    pub icon_id: u32,
    pub value_optional: bool,
    pub min_value: u32,
    pub max_value: u32,
    pub handlers: Vec<Handler>,
}

/// Screen handler bound to an event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Handler {
    #[serde(rename = "device-type")]
    pub device_type: String,
    pub mode: String,
    pub zone: String,
    pub datas: Vec<ScreenData>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScreenData {
    pub lines: Vec<LineSpec>,
}

/// One line of a screen layout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LineSpec {
    #[serde(rename = "has-text", skip_serializing_if = "Option::is_none")]
    pub has_text: Option<bool>,

    #[serde(rename = "context-frame-key", skip_serializing_if = "Option::is_none")]
    pub context_frame_key: Option<String>,

    #[serde(rename = "has-progress-bar", skip_serializing_if = "Option::is_none")]
    pub has_progress_bar: Option<bool>,
}

impl LineSpec {
    fn text(key: &str) -> Self {
        Self {
            has_text: Some(true),
            context_frame_key: Some(key.to_string()),
            ..Default::default()
        }
    }

    fn progress_bar() -> Self {
        Self {
            has_progress_bar: Some(true),
            ..Default::default()
        }
    }
}

/// `game_event` request body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameEvent {
    pub game: String,
    pub event: String,
    pub data: EventData,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventData {
    pub value: u8,
    pub frame: EventFrame,
}

/// Context frame, keyed the way the bound screen layout expects
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventFrame {
    pub artists: String,
    pub songtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
}

/// `remove_game` request body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoveGame {
    pub game: String,
}

impl GameIdentity {
    /// Game registration payload
    pub fn metadata(&self) -> GameMetadata {
        GameMetadata {
            game: self.game.clone(),
            game_display_name: self.display_name.clone(),
            developer: self.developer.clone(),
        }
    }

    /// Title line, artist line and progress bar on the first screen zone
    pub fn bind_now_playing(&self) -> BindGameEvent {
        BindGameEvent {
            game: self.game.clone(),
            event: self.event.clone(),
            icon_id: NOW_PLAYING_ICON,
            value_optional: true,
            min_value: 0,
            max_value: PROGRESS_RESOLUTION,
            handlers: vec![Handler {
                device_type: "screened".to_string(),
                mode: "screen".to_string(),
                zone: "one".to_string(),
                datas: vec![ScreenData {
                    lines: vec![
                        LineSpec::text("songtitle"),
                        LineSpec::text("artists"),
                        LineSpec::progress_bar(),
                    ],
                }],
            }],
        }
    }

    /// Event payload carrying one display frame
    pub fn frame_event(&self, frame: &DisplayFrame) -> GameEvent {
        GameEvent {
            game: self.game.clone(),
            event: self.event.clone(),
            data: EventData {
                value: frame.progress,
                frame: EventFrame {
                    artists: frame.artist.clone(),
                    songtitle: frame.title.clone(),
                    album: Some(frame.album.clone()),
                },
            },
        }
    }

    /// Placeholder event used to probe that the game is registered
    pub fn loading_event(&self) -> GameEvent {
        GameEvent {
            game: self.game.clone(),
            event: self.event.clone(),
            data: EventData {
                value: 0,
                frame: EventFrame {
                    artists: String::new(),
                    songtitle: LOADING_TEXT.to_string(),
                    album: None,
                },
            },
        }
    }

    pub fn remove(&self) -> RemoveGame {
        RemoveGame {
            game: self.game.clone(),
        }
    }
}
