use std::cell::RefCell;

use console_error_panic_hook::set_once;
use gloo_net::http::Request;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use foundation::math::Vec3;
use gpu::{OrbitCamera, RenderCommand, Renderer, WIREFRAME_SCALE, project_to_screen};
use overlay::{LabelProjector, LabelStyle, PlacedLabel, place_labels};
use runtime::{EventBus, EventKind, Frame};
use scene::hotspot::{ConfigError, Showcase, ShowcaseConfig};
use scene::interaction::{Activation, Cursor, InteractionState, PointerSample};
use scene::picking::{hover_solid, pick_hotspot};
use scene::rotation::Rotation;
use scene::solid::FacetedSolid;

mod wgpu;
use wgpu::{
    LineVertex, MarkerVertex, SolidVertex, WgpuContext, init_wgpu_from_canvas, render_showcase,
    resize_wgpu, set_marker_points,
};

const SOLID_RADIUS: f64 = 1.0;
const SOLID_DETAIL: u32 = 2;
const FRAME_DT_S: f64 = 1.0 / 60.0;

const MARKER_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
const VISITED_COLOR: [f32; 3] = [1.0, 0.0, 0.0];

/// DOM handles created by `init`. Only touched on the wasm side.
struct Dom {
    container: web_sys::HtmlElement,
    canvas: web_sys::HtmlCanvasElement,
    label_layer: web_sys::HtmlElement,
    /// One node per hotspot, indexed by `HotspotId`.
    label_nodes: Vec<web_sys::HtmlElement>,
}

pub struct ViewerState {
    pub showcase: Showcase,
    pub interaction: InteractionState,
    pub camera: OrbitCamera,
    pub frame: Frame,
    pub events: EventBus,
    pub viewport_px: [f64; 2],
    pub wgpu: Option<WgpuContext>,
    dom: Option<Dom>,
}

impl ViewerState {
    pub fn new(config: &ShowcaseConfig) -> Result<Self, ConfigError> {
        let solid = FacetedSolid::icosahedron(SOLID_RADIUS, SOLID_DETAIL);
        Ok(Self {
            showcase: Showcase::from_config(solid, config)?,
            interaction: InteractionState::new(),
            camera: OrbitCamera::new(),
            frame: Frame::new(0, FRAME_DT_S),
            events: EventBus::new(),
            viewport_px: [1280.0, 720.0],
            wgpu: None,
            dom: None,
        })
    }

    fn aspect(&self) -> f64 {
        let [w, h] = self.viewport_px;
        if h > 0.0 { w / h } else { 1.0 }
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_px = [width.max(1.0), height.max(1.0)];
    }

    fn sample_at(&self, x_px: f64, y_px: f64) -> PointerSample {
        let Some(ray) = self.camera.screen_ray(x_px, y_px, self.viewport_px) else {
            return PointerSample::miss();
        };
        PointerSample {
            over_solid: hover_solid(&self.showcase, ray),
            hotspot: pick_hotspot(&self.showcase, ray).map(|hit| hit.id),
        }
    }

    pub fn pointer_moved(&mut self, x_px: f64, y_px: f64) -> Cursor {
        let sample = self.sample_at(x_px, y_px);
        self.interaction.on_pointer_move(sample, self.frame.time);
        self.interaction.cursor
    }

    /// Clicks re-derive their own ray, so a click with no preceding move
    /// still lands on the right marker.
    pub fn clicked(&mut self, x_px: f64, y_px: f64) -> Option<Activation> {
        let ray = self.camera.screen_ray(x_px, y_px, self.viewport_px)?;
        let hit = pick_hotspot(&self.showcase, ray);
        let hotspot = hit.and_then(|hit| self.showcase.hotspot(hit.id));
        let activation = self.interaction.on_click(hotspot, self.frame.time)?;
        self.showcase.mark_visited(activation.id);
        self.events
            .emit(self.frame, EventKind::Activate, activation.url.clone());
        Some(activation)
    }

    /// One fixed-timestep frame: auto-rotation (unless paused) and camera
    /// easing. Drawing happens separately in `present`.
    pub fn advance(&mut self) {
        self.frame = self.frame.next();
        scene::tick::advance(&mut self.showcase, &mut self.interaction, self.frame);
        self.camera.ease();
    }

    pub fn placed_labels(&self) -> Vec<PlacedLabel> {
        let projector = ScreenProjector {
            view_proj: self.camera.view_proj(self.aspect()),
            viewport_px: self.viewport_px,
        };
        place_labels(
            &self.showcase,
            &projector,
            [self.viewport_px[0] as f32, self.viewport_px[1] as f32],
        )
    }
}

thread_local! {
    static STATE: RefCell<Option<ViewerState>> = const { RefCell::new(None) };
}

fn with_state<R>(f: impl FnOnce(&mut ViewerState) -> R) -> Option<R> {
    STATE.with(|state| state.borrow_mut().as_mut().map(f))
}

/// Projects label anchors through the live camera.
struct ScreenProjector {
    view_proj: [[f32; 4]; 4],
    viewport_px: [f64; 2],
}

impl LabelProjector for ScreenProjector {
    fn project(&self, world: Vec3) -> Option<[f32; 2]> {
        project_to_screen(self.view_proj, self.viewport_px, world)
    }
}

/// Column-major model matrix matching `Rotation::apply` (X axis, then Y).
fn model_matrix(rotation: Rotation) -> [[f32; 4]; 4] {
    let (sx, cx) = rotation.x_rad.sin_cos();
    let (sy, cy) = rotation.y_rad.sin_cos();
    [
        [cy as f32, 0.0, -sy as f32, 0.0],
        [(sx * sy) as f32, cx as f32, (sx * cy) as f32, 0.0],
        [(cx * sy) as f32, -sx as f32, (cx * cy) as f32, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Flat-shaded triangle soup in solid-local space. The per-face normal is
/// repeated on all three corners so every facet reads as a plane.
fn solid_vertices(solid: &FacetedSolid) -> Vec<SolidVertex> {
    let mut out = Vec::with_capacity(solid.vertex_count());
    for [a, b, c] in solid.faces() {
        let mut n = (b - a)
            .cross(c - a)
            .normalize()
            .unwrap_or(Vec3::new(0.0, 1.0, 0.0));
        if n.dot(a) < 0.0 {
            n = n.scale(-1.0);
        }
        for p in [a, b, c] {
            out.push(SolidVertex {
                position: [p.x as f32, p.y as f32, p.z as f32],
                normal: [n.x as f32, n.y as f32, n.z as f32],
            });
        }
    }
    out
}

fn wireframe_vertices(solid: &FacetedSolid) -> Vec<LineVertex> {
    let mut out = Vec::new();
    for (a, b) in solid.wireframe_edges() {
        for p in [a.scale(WIREFRAME_SCALE), b.scale(WIREFRAME_SCALE)] {
            out.push(LineVertex {
                position: [p.x as f32, p.y as f32, p.z as f32],
            });
        }
    }
    out
}

/// Marker points in world space, colored by visited state.
fn marker_points(showcase: &Showcase) -> Vec<MarkerVertex> {
    Renderer::collect(showcase)
        .commands
        .iter()
        .filter_map(|command| match command {
            RenderCommand::DrawMarker {
                position, visited, ..
            } => Some(MarkerVertex {
                position: [position.x as f32, position.y as f32, position.z as f32],
                color: if *visited { VISITED_COLOR } else { MARKER_COLOR },
            }),
            _ => None,
        })
        .collect()
}

fn cursor_css(cursor: Cursor) -> &'static str {
    match cursor {
        Cursor::Default => "default",
        Cursor::Pointer => "pointer",
    }
}

fn style_label_node(node: &web_sys::HtmlElement, style: &LabelStyle) -> Result<(), JsValue> {
    let css = node.style();
    css.set_property("position", "absolute")?;
    css.set_property("display", "none")?;
    css.set_property("transform", "translate(-50%, -50%)")?;
    css.set_property("white-space", "nowrap")?;
    css.set_property("pointer-events", "none")?;
    css.set_property("font-size", &format!("{}px", style.font_size_px))?;
    css.set_property("color", style.color)?;
    css.set_property("background", style.background)?;
    css.set_property(
        "padding",
        &format!("{}px {}px", style.padding_px[0], style.padding_px[1]),
    )?;
    css.set_property("border-radius", &format!("{}px", style.border_radius_px))?;
    Ok(())
}

fn rebuild_label_nodes(dom: &mut Dom, showcase: &Showcase) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document missing"))?;

    dom.label_layer.set_inner_html("");
    dom.label_nodes.clear();

    let style = LabelStyle::default();
    for hotspot in showcase.hotspots() {
        let node = document
            .create_element("div")?
            .dyn_into::<web_sys::HtmlElement>()?;
        node.set_text_content(Some(&hotspot.label));
        style_label_node(&node, &style)?;
        dom.label_layer.append_child(&node)?;
        dom.label_nodes.push(node);
    }
    Ok(())
}

fn position_label_nodes(dom: &Dom, labels: &[PlacedLabel]) -> Result<(), JsValue> {
    for node in &dom.label_nodes {
        node.style().set_property("display", "none")?;
    }
    for label in labels {
        let Some(node) = dom.label_nodes.get(label.id.0 as usize) else {
            continue;
        };
        let css = node.style();
        css.set_property("display", "block")?;
        css.set_property("left", &format!("{:.1}px", label.screen_px[0]))?;
        css.set_property("top", &format!("{:.1}px", label.screen_px[1]))?;
    }
    Ok(())
}

fn present(s: &mut ViewerState) -> Result<(), JsValue> {
    let view_proj = s.camera.view_proj(s.aspect());
    let model = model_matrix(s.showcase.rotation);
    if let Some(ctx) = &mut s.wgpu {
        set_marker_points(ctx, &marker_points(&s.showcase));
        render_showcase(ctx, view_proj, model)?;
    }

    let labels = s.placed_labels();
    if let Some(dom) = &s.dom {
        position_label_nodes(dom, &labels)?;
    }
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Builds the viewer inside the element with `container_id`: a canvas plus
/// an overlay layer for the floating link labels. Fails loudly when the
/// container is missing, so a typo in the host page surfaces immediately.
#[wasm_bindgen]
pub fn init(container_id: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window missing"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("document missing"))?;
    let container = document
        .get_element_by_id(container_id)
        .ok_or_else(|| JsValue::from_str(&format!("container element '{container_id}' not found")))?
        .dyn_into::<web_sys::HtmlElement>()?;

    let width = f64::from(container.client_width().max(1));
    let height = f64::from(container.client_height().max(1));

    let canvas = document
        .create_element("canvas")?
        .dyn_into::<web_sys::HtmlCanvasElement>()?;
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);
    canvas.style().set_property("display", "block")?;
    container.append_child(&canvas)?;

    let label_layer = document
        .create_element("div")?
        .dyn_into::<web_sys::HtmlElement>()?;
    {
        let css = label_layer.style();
        css.set_property("position", "absolute")?;
        css.set_property("left", "0")?;
        css.set_property("top", "0")?;
        css.set_property("width", &format!("{width}px"))?;
        css.set_property("height", &format!("{height}px"))?;
        css.set_property("overflow", "hidden")?;
        css.set_property("pointer-events", "none")?;
    }
    container.append_child(&label_layer)?;

    let mut state = ViewerState::new(&ShowcaseConfig::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    state.set_viewport(width, height);

    let mut dom = Dom {
        container,
        canvas: canvas.clone(),
        label_layer,
        label_nodes: Vec::new(),
    };
    rebuild_label_nodes(&mut dom, &state.showcase)?;
    state.dom = Some(dom);

    let solid = solid_vertices(&state.showcase.solid);
    let wires = wireframe_vertices(&state.showcase.solid);

    STATE.with(|cell| {
        *cell.borrow_mut() = Some(state);
    });

    spawn_local(async move {
        if let Err(err) = init_wgpu_inner(canvas, solid, wires).await {
            web_sys::console::log_1(&JsValue::from_str(&format!("wgpu init error: {:?}", err)));
        }
    });

    Ok(())
}

async fn init_wgpu_inner(
    canvas: web_sys::HtmlCanvasElement,
    solid: Vec<SolidVertex>,
    wires: Vec<LineVertex>,
) -> Result<(), JsValue> {
    let ctx = init_wgpu_from_canvas(canvas, &solid, &wires).await?;
    with_state(|s| {
        s.wgpu = Some(ctx);
    });
    Ok(())
}

/// Replaces the link set from a JSON config fetched at `url`.
///
/// Invalid configs are logged and dropped; the current scene keeps running.
#[wasm_bindgen]
pub fn load_links(url: String) {
    spawn_local(async move {
        match fetch_links(&url).await {
            Ok(config) => {
                if let Err(err) = apply_links(&config) {
                    web_sys::console::log_1(&JsValue::from_str(&format!(
                        "link config rejected: {:?}",
                        err
                    )));
                }
            }
            Err(err) => {
                web_sys::console::log_1(&JsValue::from_str(&format!(
                    "failed to fetch link config: {:?}",
                    err
                )));
            }
        }
    });
}

async fn fetch_links(url: &str) -> Result<ShowcaseConfig, JsValue> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let text = resp
        .text()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn apply_links(config: &ShowcaseConfig) -> Result<(), JsValue> {
    with_state(|s| {
        let solid = FacetedSolid::icosahedron(SOLID_RADIUS, SOLID_DETAIL);
        s.showcase =
            Showcase::from_config(solid, config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        s.interaction = InteractionState::new();
        s.events.emit(
            s.frame,
            EventKind::ConfigLoaded,
            format!("{} links", s.showcase.hotspots().len()),
        );
        if let Some(dom) = &mut s.dom {
            rebuild_label_nodes(dom, &s.showcase)?;
        }
        Ok(())
    })
    .unwrap_or(Ok(()))
}

/// Host-driven resize in CSS pixels; resizes the canvas backing store, the
/// label layer, and the swapchain together.
#[wasm_bindgen]
pub fn on_resize(width: f64, height: f64) -> Result<(), JsValue> {
    with_state(|s| {
        s.set_viewport(width, height);
        let [w, h] = s.viewport_px;
        if let Some(dom) = &s.dom {
            dom.canvas.set_width(w as u32);
            dom.canvas.set_height(h as u32);
            let css = dom.label_layer.style();
            css.set_property("width", &format!("{w}px"))?;
            css.set_property("height", &format!("{h}px"))?;
        }
        if let Some(ctx) = &mut s.wgpu {
            resize_wgpu(ctx, w as u32, h as u32);
        }
        Ok(())
    })
    .unwrap_or(Ok(()))
}

/// Feeds one pointer position in canvas-local pixels.
#[wasm_bindgen]
pub fn pointer_move(x_px: f64, y_px: f64) -> Result<(), JsValue> {
    with_state(|s| {
        let cursor = s.pointer_moved(x_px, y_px);
        if let Some(dom) = &s.dom {
            dom.container
                .style()
                .set_property("cursor", cursor_css(cursor))?;
        }
        Ok(())
    })
    .unwrap_or(Ok(()))
}

/// A click on a marker opens its link in a new tab, marks it visited, and
/// starts the navigation cooldown.
#[wasm_bindgen]
pub fn pointer_click(x_px: f64, y_px: f64) -> Result<(), JsValue> {
    let activation = with_state(|s| s.clicked(x_px, y_px)).flatten();
    let Some(activation) = activation else {
        return Ok(());
    };

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window missing"))?;
    // A blocked popup returns Ok(None); the visited mark already happened.
    let _ = window.open_with_url_and_target(&activation.url, "_blank")?;
    Ok(())
}

/// Orbit command from pointer-drag deltas in pixels. The camera eases toward
/// the commanded orientation over the following frames.
#[wasm_bindgen]
pub fn camera_orbit(delta_x_px: f64, delta_y_px: f64) -> Result<(), JsValue> {
    with_state(|s| {
        let speed = 0.005;
        s.camera
            .command_orbit(delta_x_px * speed, delta_y_px * speed);
    });
    Ok(())
}

/// Dolly in/out from wheel deltaY.
#[wasm_bindgen]
pub fn camera_zoom(wheel_delta_y: f64) -> Result<(), JsValue> {
    with_state(|s| {
        let zoom = (wheel_delta_y * 0.0015).exp();
        let next = (s.camera.distance * zoom).clamp(1.2, 8.0);
        s.camera.command_distance(next);
    });
    Ok(())
}

/// Advances one fixed-timestep frame, then draws and repositions labels.
#[wasm_bindgen]
pub fn advance_frame() -> Result<(), JsValue> {
    with_state(|s| {
        s.advance();
        present(s)
    })
    .unwrap_or(Ok(()))
}

/// Drains pending interaction events, one line per event.
#[wasm_bindgen]
pub fn drain_events() -> String {
    with_state(|s| {
        s.events
            .drain()
            .into_iter()
            .map(|e| format!("[{}] {}: {}", e.frame_index, e.kind, e.detail))
            .collect::<Vec<_>>()
            .join("\n")
    })
    .unwrap_or_default()
}
