use crate::types::{Zone, ZoneId, ZoneState};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Slug used when a display name has nothing slug-worthy in it
pub const PLACEHOLDER_SLUG: &str = "zone";

const SEPARATOR: char = '-';

/// Turn a display name into a lower-case, identifier-safe slug.
///
/// Runs of anything other than ASCII letters and digits collapse into a
/// single `-`; leading and trailing separators are dropped. Names with no
/// usable characters map to [`PLACEHOLDER_SLUG`].
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push(SEPARATOR);
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    if slug.is_empty() {
        PLACEHOLDER_SLUG.to_string()
    } else {
        slug
    }
}

/// Authoritative set of known zones, keyed by zone id
///
/// Every zone held by the store carries a slug name that is unique across
/// the store. Reads hand out clones; the only ways in are
/// [`ZoneStore::apply_snapshot`], [`ZoneStore::remove_zones`] and the
/// crate-internal seek path.
#[derive(Debug, Default)]
pub struct ZoneStore {
    zones: BTreeMap<ZoneId, Zone>,
}

impl ZoneStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or replace every zone in `zones`, assigning slug names.
    ///
    /// Within the batch the first zone with a given base slug keeps it and
    /// the Nth gets `_N` appended. Zones not in the batch are left alone, and
    /// their slugs are never handed out to a zone in the batch.
    pub fn apply_snapshot(&mut self, zones: Vec<Zone>) {
        let batch_ids: HashSet<&str> = zones.iter().map(|z| z.zone_id.as_str()).collect();
        let mut taken: HashSet<String> = self
            .zones
            .values()
            .filter(|z| !batch_ids.contains(z.zone_id.as_str()))
            .map(|z| z.slug_name.clone())
            .collect();

        let mut occurrences: HashMap<String, u32> = HashMap::new();
        let mut named = Vec::with_capacity(zones.len());

        for mut zone in zones {
            let base = slugify(&zone.display_name);
            let count = occurrences.entry(base.clone()).or_insert(0);
            let slug = loop {
                *count += 1;
                let candidate = if *count == 1 {
                    base.clone()
                } else {
                    format!("{}_{}", base, count)
                };
                if !taken.contains(&candidate) {
                    break candidate;
                }
            };
            taken.insert(slug.clone());
            zone.slug_name = slug;
            named.push(zone);
        }

        for zone in named {
            log_zone_status(&zone);
            self.zones.insert(zone.zone_id.clone(), zone);
        }

        tracing::debug!("Current zones: {:?}", self.slugs());
    }

    /// Forget the given zones. Unknown ids are ignored.
    pub fn remove_zones(&mut self, zone_ids: &[ZoneId]) {
        for zone_id in zone_ids {
            if let Some(zone) = self.zones.remove(zone_id) {
                tracing::info!("Zone removed: {} ({})", zone.display_name, zone.slug_name);
            }
        }
    }

    /// Copy of the zone with this id
    pub fn get(&self, zone_id: &str) -> Option<Zone> {
        self.zones.get(zone_id).cloned()
    }

    /// Find the first zone whose slug name matches
    pub fn find_by_slug(&self, slug_name: &str) -> Option<Zone> {
        self.zones
            .values()
            .find(|z| z.slug_name == slug_name)
            .cloned()
    }

    /// Independent copy of every zone
    pub fn snapshot_all(&self) -> HashMap<ZoneId, Zone> {
        self.zones
            .iter()
            .map(|(id, zone)| (id.clone(), zone.clone()))
            .collect()
    }

    /// Number of known zones
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Whether no zones are known
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub(crate) fn get_mut(&mut self, zone_id: &str) -> Option<&mut Zone> {
        self.zones.get_mut(zone_id)
    }

    fn slugs(&self) -> Vec<&str> {
        self.zones.values().map(|z| z.slug_name.as_str()).collect()
    }
}

fn log_zone_status(zone: &Zone) {
    match (&zone.state, &zone.now_playing) {
        (ZoneState::Playing, Some(np)) => {
            tracing::info!("{} is playing song {}", zone.display_name, np.one_line.line1);
        }
        (state, _) => tracing::info!("{} is {}", zone.display_name, state),
    }
}
