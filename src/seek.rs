use crate::types::{SeekUpdate, Zone};
use crate::zone_store::ZoneStore;

/// Applies position-only updates to zones already in the store
///
/// Only `now_playing.seek_position` is ever written. Updates for zones the
/// store does not know, or for zones with nothing playing, are dropped.
#[derive(Debug, Clone)]
pub struct SeekTracker {
    publish_zone: String,
}

impl SeekTracker {
    /// Create a tracker that reports updates for the zone slugged `publish_zone`
    pub fn new(publish_zone: impl Into<String>) -> Self {
        Self {
            publish_zone: publish_zone.into(),
        }
    }

    /// Slug of the zone whose updates are reported
    pub fn publish_zone(&self) -> &str {
        &self.publish_zone
    }

    /// Apply `updates` in order.
    ///
    /// Returns a snapshot of the publish zone after each update that touched
    /// it, in the order the updates were applied.
    pub fn apply_seek_updates(&self, store: &mut ZoneStore, updates: &[SeekUpdate]) -> Vec<Zone> {
        let mut to_publish = Vec::new();

        for update in updates {
            let Some(zone) = store.get_mut(&update.zone_id) else {
                tracing::trace!("Seek update for unknown zone {}", update.zone_id);
                continue;
            };
            let Some(now_playing) = zone.now_playing.as_mut() else {
                continue;
            };

            now_playing.seek_position = update.seek_position;

            if zone.slug_name == self.publish_zone {
                to_publish.push(zone.clone());
            }
        }

        to_publish
    }
}
