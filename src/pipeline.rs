use crate::config::BridgeConfig;
use crate::frame::{DisplayFrame, FrameBuilder};
use crate::scroll::ScrollEngine;
use crate::seek::SeekTracker;
use crate::subscription::ZoneEvent;
use crate::types::Zone;
use crate::zone_store::ZoneStore;
use tokio::sync::mpsc;

/// Destination for finished frames
///
/// `submit` must not block: delivery happens elsewhere and its outcome never
/// flows back into the pipeline.
pub trait FrameSink {
    fn submit(&self, frame: DisplayFrame);
}

impl FrameSink for mpsc::UnboundedSender<DisplayFrame> {
    fn submit(&self, frame: DisplayFrame) {
        if self.send(frame).is_err() {
            tracing::debug!("Frame receiver dropped, discarding frame");
        }
    }
}

/// Turns zone events into display frames for one configured zone
///
/// Owns the zone store and the scroll state. Events must be fed in arrival
/// order from a single task; nothing here is shared.
pub struct DisplayPipeline<S> {
    store: ZoneStore,
    seek: SeekTracker,
    scroll: ScrollEngine,
    frames: FrameBuilder,
    sink: S,
}

impl<S: FrameSink> DisplayPipeline<S> {
    /// Create a pipeline mirroring the zone slugged `publish_zone` into `sink`
    pub fn new(
        publish_zone: impl Into<String>,
        scroll: ScrollEngine,
        frames: FrameBuilder,
        sink: S,
    ) -> Self {
        Self {
            store: ZoneStore::new(),
            seek: SeekTracker::new(publish_zone),
            scroll,
            frames,
            sink,
        }
    }

    /// Create a pipeline from the bridge configuration
    pub fn from_config(config: &BridgeConfig, sink: S) -> Self {
        Self::new(
            config.publish_zone.clone(),
            ScrollEngine::new(config.display_width)
                .with_reset_on_track_change(config.reset_scroll_on_track_change),
            FrameBuilder::new(config.splash_seconds),
            sink,
        )
    }

    /// Apply one event. Returns how many frames were submitted.
    ///
    /// Zone snapshots only update the store; frames go out on seek updates
    /// for the publish zone, so the title scrolls once per position tick.
    pub fn handle(&mut self, event: ZoneEvent) -> usize {
        match event {
            ZoneEvent::Subscribed { zones } => {
                tracing::info!("Subscribed to zone feed ({} zones)", zones.len());
                self.store.apply_snapshot(zones);
                0
            }
            ZoneEvent::Changed {
                zones_changed,
                zones_seek_changed,
                zones_removed,
            } => {
                if !zones_changed.is_empty() {
                    tracing::info!("Zones changed ({})", zones_changed.len());
                    self.store.apply_snapshot(zones_changed);
                }
                if !zones_removed.is_empty() {
                    self.store.remove_zones(&zones_removed);
                }

                let updated = self
                    .seek
                    .apply_seek_updates(&mut self.store, &zones_seek_changed);
                let mut published = 0;
                for zone in &updated {
                    if self.publish(zone) {
                        published += 1;
                    }
                }
                published
            }
            ZoneEvent::Other(response) => {
                tracing::warn!("Unhandled subscription response \"{}\"", response);
                0
            }
        }
    }

    /// Render the publish zone as it stands now, if it exists and is playing
    pub fn publish_current(&mut self) -> bool {
        match self.store.find_by_slug(self.seek.publish_zone()) {
            Some(zone) => self.publish(&zone),
            None => false,
        }
    }

    fn publish(&mut self, zone: &Zone) -> bool {
        match self.frames.build(zone, &mut self.scroll) {
            Some(frame) => {
                tracing::trace!("Frame for {}: {:?}", zone.slug_name, frame);
                self.sink.submit(frame);
                true
            }
            None => false,
        }
    }

    /// Zones seen so far
    pub fn store(&self) -> &ZoneStore {
        &self.store
    }

    /// Title scroller state
    pub fn scroll(&self) -> &ScrollEngine {
        &self.scroll
    }

    /// Slug of the mirrored zone
    pub fn publish_zone(&self) -> &str {
        self.seek.publish_zone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NowPlaying, SeekUpdate, TwoLine, ZoneState};

    fn zone(id: &str, name: &str, seek: i64, title: &str) -> Zone {
        Zone {
            zone_id: id.into(),
            display_name: name.into(),
            slug_name: String::new(),
            state: ZoneState::Playing,
            now_playing: Some(NowPlaying {
                seek_position: Some(seek),
                length: Some(200),
                two_line: TwoLine {
                    line1: title.into(),
                    line2: "Artist".into(),
                },
                ..Default::default()
            }),
        }
    }

    fn seek(id: &str, pos: i64) -> ZoneEvent {
        ZoneEvent::Changed {
            zones_changed: vec![],
            zones_seek_changed: vec![SeekUpdate {
                zone_id: id.into(),
                seek_position: Some(pos),
            }],
            zones_removed: vec![],
        }
    }

    fn pipeline() -> (
        DisplayPipeline<mpsc::UnboundedSender<DisplayFrame>>,
        mpsc::UnboundedReceiver<DisplayFrame>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let pipeline = DisplayPipeline::new(
            "kitchen",
            ScrollEngine::default(),
            FrameBuilder::default(),
            tx,
        );
        (pipeline, rx)
    }

    #[test]
    fn snapshots_do_not_publish() {
        let (mut pipeline, mut rx) = pipeline();
        let published = pipeline.handle(ZoneEvent::Subscribed {
            zones: vec![zone("a", "Kitchen", 10, "Song")],
        });

        assert_eq!(published, 0);
        assert!(rx.try_recv().is_err());
        assert_eq!(pipeline.store().len(), 1);
    }

    #[test]
    fn seek_on_publish_zone_emits_frame() {
        let (mut pipeline, mut rx) = pipeline();
        pipeline.handle(ZoneEvent::Subscribed {
            zones: vec![zone("a", "Kitchen", 0, "Long Song Title Here")],
        });

        assert_eq!(pipeline.handle(seek("a", 2)), 1);
        let splash = rx.try_recv().unwrap();
        assert_eq!(splash.title, "kitchen now playing:");
        assert_eq!(splash.artist, "Long Song Title Here");
        assert_eq!(splash.progress, 1);

        assert_eq!(pipeline.handle(seek("a", 10)), 1);
        let scrolled = rx.try_recv().unwrap();
        assert_eq!(scrolled.progress, 5);
        assert_eq!(scrolled.title, "Long Song Title Here  | ");
    }

    #[test]
    fn seek_on_other_zone_is_silent() {
        let (mut pipeline, mut rx) = pipeline();
        pipeline.handle(ZoneEvent::Subscribed {
            zones: vec![zone("a", "Kitchen", 0, "Song"), zone("b", "Den", 0, "Song")],
        });

        assert_eq!(pipeline.handle(seek("b", 30)), 0);
        assert_eq!(pipeline.handle(seek("unknown", 30)), 0);
        assert!(rx.try_recv().is_err());
        assert_eq!(pipeline.store().len(), 2);
    }

    #[test]
    fn removed_zone_stops_publishing() {
        let (mut pipeline, mut rx) = pipeline();
        pipeline.handle(ZoneEvent::Subscribed {
            zones: vec![zone("a", "Kitchen", 0, "Song")],
        });
        pipeline.handle(ZoneEvent::Changed {
            zones_changed: vec![],
            zones_seek_changed: vec![],
            zones_removed: vec!["a".into()],
        });

        assert_eq!(pipeline.handle(seek("a", 30)), 0);
        assert!(rx.try_recv().is_err());
        assert!(pipeline.store().is_empty());
    }

    #[test]
    fn other_responses_are_ignored() {
        let (mut pipeline, _rx) = pipeline();
        assert_eq!(pipeline.handle(ZoneEvent::Other("Unsubscribed".into())), 0);
    }

    #[test]
    fn publish_current_uses_stored_state() {
        let (mut pipeline, mut rx) = pipeline();
        assert!(!pipeline.publish_current());

        pipeline.handle(ZoneEvent::Subscribed {
            zones: vec![zone("a", "Kitchen", 100, "Song")],
        });
        assert!(pipeline.publish_current());
        assert_eq!(rx.try_recv().unwrap().progress, 50);
    }
}
