use foundation::math::Vec3;
use scene::hotspot::{HotspotId, Showcase};

#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    pub font_size_px: f32,
    pub color: &'static str,
    pub background: &'static str,
    pub padding_px: [f32; 2],
    pub border_radius_px: f32,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font_size_px: 14.0,
            color: "white",
            background: "rgba(0, 0, 0, 0.6)",
            padding_px: [4.0, 8.0],
            border_radius_px: 5.0,
        }
    }
}

/// Maps a world-space point to screen pixels.
///
/// `None` means "not projectable" (behind the camera). Keeping this a trait
/// lets label placement run in unit tests without a live display.
pub trait LabelProjector {
    fn project(&self, world: Vec3) -> Option<[f32; 2]>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLabel {
    pub id: HotspotId,
    pub text: String,
    pub screen_px: [f32; 2],
    pub visited: bool,
}

/// Screen positions for every hotspot label, recomputed from the 3D anchors.
///
/// Called once per frame so labels stay glued to their markers through the
/// solid's rotation. Labels that project behind the camera, to non-finite
/// coordinates, or entirely outside the viewport are dropped for that frame.
pub fn place_labels<P: LabelProjector>(
    showcase: &Showcase,
    projector: &P,
    viewport_px: [f32; 2],
) -> Vec<PlacedLabel> {
    let mut out = Vec::with_capacity(showcase.hotspots().len());

    for hotspot in showcase.hotspots() {
        let anchor = showcase.rotation.apply(hotspot.label_anchor);
        let Some(screen) = projector.project(anchor) else {
            continue;
        };
        if !screen[0].is_finite() || !screen[1].is_finite() {
            continue;
        }

        let margin = estimate_text_width(&hotspot.label);
        if screen[0] + margin < 0.0
            || screen[1] + margin < 0.0
            || screen[0] - margin > viewport_px[0]
            || screen[1] - margin > viewport_px[1]
        {
            continue;
        }

        out.push(PlacedLabel {
            id: hotspot.id,
            text: hotspot.label.clone(),
            screen_px: screen,
            visited: hotspot.visited,
        });
    }

    out
}

fn estimate_text_width(text: &str) -> f32 {
    let style = LabelStyle::default();
    style.font_size_px * 0.6 * text.chars().count().max(1) as f32
}
