use serde::Deserialize;

use foundation::math::Vec3;

use crate::rotation::Rotation;
use crate::solid::FacetedSolid;

/// One external navigation target with its short display label.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinkEntry {
    pub url: String,
    pub label: String,
}

impl LinkEntry {
    pub fn new(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            label: label.into(),
        }
    }
}

/// Immutable startup configuration: which corner of the solid carries which
/// link. Pairing is positional: `vertex_indices[i]` goes with `links[i]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShowcaseConfig {
    pub links: Vec<LinkEntry>,
    pub vertex_indices: Vec<u32>,
    pub marker_radius: f64,
    pub label_offset: f64,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            links: vec![
                LinkEntry::new("https://example.org/projects/lumen", "Lumen"),
                LinkEntry::new("https://example.org/projects/circuit", "Circuit"),
                LinkEntry::new("https://example.org/projects/rover", "Rover"),
                LinkEntry::new("https://example.org/projects/moon", "Moon"),
                LinkEntry::new("https://example.org/projects/handset", "Handset"),
                LinkEntry::new("https://example.org/projects/speaker", "Speaker"),
                LinkEntry::new("https://example.org/projects/glider", "Glider"),
                LinkEntry::new("https://example.org/projects/drone", "Drone"),
            ],
            vertex_indices: vec![0, 120, 180, 240, 300, 360, 420, 480],
            marker_radius: 0.04,
            label_offset: 1.1,
        }
    }
}

impl ShowcaseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.links.is_empty() {
            return Err(ConfigError::NoLinks);
        }
        for (i, link) in self.links.iter().enumerate() {
            if link.url.trim().is_empty() {
                return Err(ConfigError::EmptyUrl(i));
            }
            if link.label.trim().is_empty() {
                return Err(ConfigError::EmptyLabel(i));
            }
        }
        if !(self.marker_radius > 0.0 && self.marker_radius.is_finite()) {
            return Err(ConfigError::BadMarkerRadius(self.marker_radius));
        }
        if !(self.label_offset > 0.0 && self.label_offset.is_finite()) {
            return Err(ConfigError::BadLabelOffset(self.label_offset));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NoLinks,
    EmptyUrl(usize),
    EmptyLabel(usize),
    BadMarkerRadius(f64),
    BadLabelOffset(f64),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NoLinks => write!(f, "link list is empty"),
            ConfigError::EmptyUrl(i) => write!(f, "link {i} has an empty url"),
            ConfigError::EmptyLabel(i) => write!(f, "link {i} has an empty label"),
            ConfigError::BadMarkerRadius(r) => write!(f, "marker radius {r} is not positive"),
            ConfigError::BadLabelOffset(o) => write!(f, "label offset {o} is not positive"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HotspotId(pub u32);

/// A clickable marker bound to one link, positioned at one solid corner.
///
/// Positions are solid-local; world placement goes through the solid's
/// rotation. `visited` is the only mutable field and flips at most once per
/// hotspot state (repeated clicks are idempotent).
#[derive(Debug, Clone, PartialEq)]
pub struct Hotspot {
    pub id: HotspotId,
    pub local_position: Vec3,
    pub label_anchor: Vec3,
    pub url: String,
    pub label: String,
    pub visited: bool,
}

/// Pair configured vertex indices with link entries.
///
/// Mismatched list lengths truncate to the shorter list; indices past the
/// solid's vertex count are skipped. Neither case is an error.
pub fn build_hotspots(solid: &FacetedSolid, config: &ShowcaseConfig) -> Vec<Hotspot> {
    let mut out = Vec::new();

    for (link, &vertex_index) in config.links.iter().zip(&config.vertex_indices) {
        let Some(position) = solid.vertex(vertex_index) else {
            continue;
        };

        out.push(Hotspot {
            id: HotspotId(out.len() as u32),
            local_position: position,
            label_anchor: position.scale(config.label_offset),
            url: link.url.clone(),
            label: link.label.clone(),
            visited: false,
        });
    }

    out
}

/// The scene root: the solid, its orientation, and the hotspots attached to
/// it. Strict tree ownership; everything else borrows.
#[derive(Debug, Clone, PartialEq)]
pub struct Showcase {
    pub solid: FacetedSolid,
    pub rotation: Rotation,
    pub marker_radius: f64,
    hotspots: Vec<Hotspot>,
}

impl Showcase {
    pub fn from_config(solid: FacetedSolid, config: &ShowcaseConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let hotspots = build_hotspots(&solid, config);
        Ok(Self {
            solid,
            rotation: Rotation::identity(),
            marker_radius: config.marker_radius,
            hotspots,
        })
    }

    pub fn hotspots(&self) -> &[Hotspot] {
        &self.hotspots
    }

    pub fn hotspot(&self, id: HotspotId) -> Option<&Hotspot> {
        self.hotspots.get(id.0 as usize)
    }

    pub fn hotspot_world_position(&self, id: HotspotId) -> Option<Vec3> {
        Some(self.rotation.apply(self.hotspot(id)?.local_position))
    }

    pub fn label_anchor_world(&self, id: HotspotId) -> Option<Vec3> {
        Some(self.rotation.apply(self.hotspot(id)?.label_anchor))
    }

    /// Returns true when the flag actually flipped.
    pub fn mark_visited(&mut self, id: HotspotId) -> bool {
        match self.hotspots.get_mut(id.0 as usize) {
            Some(h) if !h.visited => {
                h.visited = true;
                true
            }
            _ => false,
        }
    }

    pub fn advance_rotation(&mut self, step_rad: f64) {
        self.rotation = self.rotation.advanced(step_rad);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{HotspotId, LinkEntry, Showcase, ShowcaseConfig, build_hotspots};
    use crate::rotation::Rotation;
    use crate::solid::FacetedSolid;

    fn config_with(links: Vec<LinkEntry>, indices: Vec<u32>) -> ShowcaseConfig {
        ShowcaseConfig {
            links,
            vertex_indices: indices,
            ..ShowcaseConfig::default()
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert_eq!(ShowcaseConfig::default().validate(), Ok(()));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: ShowcaseConfig = serde_json::from_str(
            r#"{
                "links": [{ "url": "https://example.org/a", "label": "A" }],
                "vertex_indices": [7]
            }"#,
        )
        .unwrap();
        assert_eq!(config.links.len(), 1);
        assert_eq!(config.vertex_indices, vec![7]);
        assert_eq!(config.marker_radius, 0.04);
        assert_eq!(config.label_offset, 1.1);
    }

    #[test]
    fn validation_rejects_bad_configs() {
        let mut config = ShowcaseConfig::default();
        config.links[2].label = "  ".into();
        assert!(config.validate().is_err());

        let mut config = ShowcaseConfig::default();
        config.marker_radius = 0.0;
        assert!(config.validate().is_err());

        let config = config_with(vec![], vec![0]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn mismatched_lists_truncate_to_the_shorter() {
        let solid = FacetedSolid::icosahedron(1.0, 2);

        // Eight links, five indices: exactly five hotspots.
        let config = config_with(
            ShowcaseConfig::default().links,
            vec![0, 120, 180, 240, 300],
        );
        assert_eq!(build_hotspots(&solid, &config).len(), 5);

        // Three links, eight indices: exactly three.
        let config = config_with(
            ShowcaseConfig::default().links[..3].to_vec(),
            ShowcaseConfig::default().vertex_indices,
        );
        assert_eq!(build_hotspots(&solid, &config).len(), 3);
    }

    #[test]
    fn out_of_range_indices_are_skipped() {
        // Detail 0: 60 corners. Indices 120+ fall off the end.
        let solid = FacetedSolid::icosahedron(1.0, 0);
        let config = ShowcaseConfig::default();
        let hotspots = build_hotspots(&solid, &config);
        assert_eq!(hotspots.len(), 1);
        assert_eq!(hotspots[0].label, "Lumen");
    }

    #[test]
    fn two_hotspots_at_configured_corners() {
        // Indices [0, 120] with labels A and B on a solid with at least
        // 121 corners.
        let solid = FacetedSolid::icosahedron(1.0, 2);
        assert!(solid.vertex_count() >= 121);
        let config = config_with(
            vec![
                LinkEntry::new("https://example.org/a", "A"),
                LinkEntry::new("https://example.org/b", "B"),
            ],
            vec![0, 120],
        );

        let showcase = Showcase::from_config(solid.clone(), &config).unwrap();
        let hotspots = showcase.hotspots();
        assert_eq!(hotspots.len(), 2);
        assert_eq!(hotspots[0].local_position, solid.vertex(0).unwrap());
        assert_eq!(hotspots[1].local_position, solid.vertex(120).unwrap());
        assert!(!hotspots[0].visited);
        assert!(!hotspots[1].visited);
    }

    #[test]
    fn label_anchor_sits_outside_the_surface() {
        let solid = FacetedSolid::icosahedron(1.0, 2);
        let showcase = Showcase::from_config(solid, &ShowcaseConfig::default()).unwrap();
        for h in showcase.hotspots() {
            let ratio = h.label_anchor.length() / h.local_position.length();
            assert!((ratio - 1.1).abs() < 1e-12);
        }
    }

    #[test]
    fn world_position_follows_the_rotation() {
        let solid = FacetedSolid::icosahedron(1.0, 2);
        let mut showcase = Showcase::from_config(solid, &ShowcaseConfig::default()).unwrap();
        let id = HotspotId(0);
        let local = showcase.hotspot(id).unwrap().local_position;

        assert_eq!(showcase.hotspot_world_position(id).unwrap(), local);

        showcase.rotation = Rotation {
            x_rad: 0.0,
            y_rad: std::f64::consts::FRAC_PI_2,
        };
        let world = showcase.hotspot_world_position(id).unwrap();
        let expected = showcase.rotation.apply(local);
        assert!((world - expected).length() < 1e-12);
        // A quarter turn actually moves the marker.
        assert!((world - local).length() > 1e-3);
    }

    #[test]
    fn mark_visited_is_idempotent() {
        let solid = FacetedSolid::icosahedron(1.0, 2);
        let mut showcase = Showcase::from_config(solid, &ShowcaseConfig::default()).unwrap();
        assert!(showcase.mark_visited(HotspotId(1)));
        assert!(!showcase.mark_visited(HotspotId(1)));
        assert!(showcase.hotspot(HotspotId(1)).unwrap().visited);
        assert!(!showcase.mark_visited(HotspotId(99)));
    }
}
