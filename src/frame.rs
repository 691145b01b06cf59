use crate::scroll::ScrollEngine;
use crate::types::{SeekSeconds, Zone};
use serde::Serialize;

/// GameSense progress bars always run from 0 to 100
pub const PROGRESS_RESOLUTION: u32 = 100;

/// How long the "now playing" splash stays up at the start of a track
pub const SPLASH_SECONDS: SeekSeconds = 4;

/// One screenful for the display engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayFrame {
    /// Track progress, 0..=100
    pub progress: u8,
    pub title: String,
    pub artist: String,
    pub album: String,
}

/// Builds display frames from zone state
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    splash_seconds: SeekSeconds,
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self::new(SPLASH_SECONDS)
    }
}

impl FrameBuilder {
    pub fn new(splash_seconds: SeekSeconds) -> Self {
        Self { splash_seconds }
    }

    /// Build the frame for `zone`, or `None` if nothing is playing there.
    ///
    /// During the first `splash_seconds` of a track the title line reads
    /// "<slug> now playing:" and the artist line carries the plain title.
    /// The splash leaves the scroll cursor where it is.
    pub fn build(&self, zone: &Zone, scroll: &mut ScrollEngine) -> Option<DisplayFrame> {
        let now_playing = zone.now_playing.as_ref()?;
        let seek = now_playing.seek_seconds().max(0);
        let title = now_playing.title();

        let progress = progress_percent(seek, now_playing.length_seconds());

        if seek < self.splash_seconds {
            return Some(DisplayFrame {
                progress,
                title: format!("{} now playing:", zone.slug_name),
                artist: title.to_string(),
                album: now_playing.album().to_string(),
            });
        }

        Some(DisplayFrame {
            progress,
            title: scroll.next(title),
            artist: now_playing.artist().to_string(),
            album: now_playing.album().to_string(),
        })
    }
}

/// Floored percentage of `length` covered by `seek`, clamped to 0..=100.
///
/// A zero length (live streams, unknown tracks) reports 0.
pub fn progress_percent(seek: SeekSeconds, length: u32) -> u8 {
    if length == 0 || seek <= 0 {
        return 0;
    }
    let percent = (seek as u64).saturating_mul(PROGRESS_RESOLUTION as u64) / length as u64;
    percent.min(PROGRESS_RESOLUTION as u64) as u8
}
