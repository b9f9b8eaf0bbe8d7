use foundation::math::Vec3;
use scene::hotspot::{HotspotId, Showcase};
use scene::rotation::Rotation;

/// Scale applied to the wireframe twin so it sits just off the facets.
pub const WIREFRAME_SCALE: f64 = 1.001;

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    DrawSolid {
        rotation: Rotation,
    },
    DrawWireframe {
        rotation: Rotation,
        scale: f64,
    },
    DrawMarker {
        id: HotspotId,
        position: Vec3,
        radius: f64,
        visited: bool,
    },
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderFrame {
    pub commands: Vec<RenderCommand>,
}

/// Display-free command collection.
///
/// The wasm surface consumes this; tests assert on it directly, so the draw
/// order and marker placement are pinned without a GPU in the loop.
pub struct Renderer;

impl Renderer {
    pub fn collect(showcase: &Showcase) -> RenderFrame {
        let mut frame = RenderFrame::default();

        frame.commands.push(RenderCommand::DrawSolid {
            rotation: showcase.rotation,
        });
        frame.commands.push(RenderCommand::DrawWireframe {
            rotation: showcase.rotation,
            scale: WIREFRAME_SCALE,
        });

        for hotspot in showcase.hotspots() {
            frame.commands.push(RenderCommand::DrawMarker {
                id: hotspot.id,
                position: showcase.rotation.apply(hotspot.local_position),
                radius: showcase.marker_radius,
                visited: hotspot.visited,
            });
        }

        frame
    }
}
