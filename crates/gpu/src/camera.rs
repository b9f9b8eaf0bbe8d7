use foundation::math::Vec3;
use scene::picking::Ray;

/// Per-frame easing factor toward the commanded orientation (damped follow).
pub const DAMPING_FACTOR: f64 = 0.03;

const WORLD_UP: Vec3 = Vec3 {
    x: 0.0,
    y: 1.0,
    z: 0.0,
};

/// Orbit camera with damped follow.
///
/// The current orientation eases toward the commanded one every frame, so
/// pointer-driven orbit commands land smoothly. The camera keeps easing even
/// while the solid's auto-rotation is paused.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitCamera {
    pub yaw_rad: f64,
    pub pitch_rad: f64,
    pub distance: f64,
    pub target: Vec3,
    pub fov_y_rad: f64,
    pub near: f64,
    pub far: f64,
    commanded_yaw_rad: f64,
    commanded_pitch_rad: f64,
    commanded_distance: f64,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        // Start where the scene reads best: eye near (1, 1.2, 1.2) looking
        // at the origin, 75 degree vertical field of view.
        let eye = Vec3::new(1.0, 1.2, 1.2);
        let distance = eye.length();
        let pitch_rad = (eye.y / distance).asin();
        let yaw_rad = eye.z.atan2(eye.x);

        Self {
            yaw_rad,
            pitch_rad,
            distance,
            target: Vec3::ZERO,
            fov_y_rad: 75f64.to_radians(),
            near: 0.1,
            far: 10.0,
            commanded_yaw_rad: yaw_rad,
            commanded_pitch_rad: pitch_rad,
            commanded_distance: distance,
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Command a new orbit orientation; `ease` moves toward it over frames.
    pub fn command_orbit(&mut self, delta_yaw_rad: f64, delta_pitch_rad: f64) {
        self.commanded_yaw_rad += delta_yaw_rad;
        self.commanded_pitch_rad =
            (self.commanded_pitch_rad + delta_pitch_rad).clamp(-1.55, 1.55);
    }

    pub fn command_distance(&mut self, distance: f64) {
        self.commanded_distance = distance.clamp(self.near * 2.0, self.far * 0.9);
    }

    /// One damped-follow step. Runs every frame regardless of hover state.
    pub fn ease(&mut self) {
        self.yaw_rad += (self.commanded_yaw_rad - self.yaw_rad) * DAMPING_FACTOR;
        self.pitch_rad += (self.commanded_pitch_rad - self.pitch_rad) * DAMPING_FACTOR;
        self.distance += (self.commanded_distance - self.distance) * DAMPING_FACTOR;
    }

    pub fn eye_position(&self) -> Vec3 {
        let dir = Vec3::new(
            self.pitch_rad.cos() * self.yaw_rad.cos(),
            self.pitch_rad.sin(),
            self.pitch_rad.cos() * self.yaw_rad.sin(),
        );
        self.target + dir.scale(self.distance)
    }

    /// Column-major view-projection, RH, depth range [0, 1].
    pub fn view_proj(&self, aspect: f64) -> [[f32; 4]; 4] {
        let aspect = aspect.max(1e-6);
        let eye = self.eye_position();
        let view = mat4_look_at_rh(eye, self.target, WORLD_UP);
        let proj = mat4_perspective_rh_z0(self.fov_y_rad, aspect, self.near, self.far);
        mat4_mul(proj, view)
    }

    /// Ray from the eye through a viewport pixel.
    ///
    /// Pixel coordinates are relative to the container, origin top-left.
    /// Degenerate viewports or camera bases yield `None` (fail-open, like
    /// the rest of the pointer path).
    pub fn screen_ray(&self, x_px: f64, y_px: f64, viewport_px: [f64; 2]) -> Option<Ray> {
        let [w, h] = viewport_px;
        if !(w > 0.0 && h > 0.0) {
            return None;
        }

        let ndc_x = (2.0 * x_px) / w - 1.0;
        let ndc_y = 1.0 - (2.0 * y_px) / h;

        let eye = self.eye_position();
        let forward = (self.target - eye).normalize()?;
        let right = forward.cross(WORLD_UP).normalize()?;
        let up = right.cross(forward);

        let half_h = (self.fov_y_rad * 0.5).tan();
        let half_w = half_h * (w / h);

        let dir = (forward + right.scale(ndc_x * half_w) + up.scale(ndc_y * half_h)).normalize()?;
        Some(Ray::new(eye, dir))
    }
}

/// World point to screen pixels through a view-projection matrix.
///
/// `None` when the point is at or behind the camera plane.
pub fn project_to_screen(
    view_proj: [[f32; 4]; 4],
    viewport_px: [f64; 2],
    world: Vec3,
) -> Option<[f32; 2]> {
    let [w, h] = viewport_px;
    if !(w > 0.0 && h > 0.0) {
        return None;
    }

    let p = [world.x as f32, world.y as f32, world.z as f32, 1.0];
    let mut clip = [0.0f32; 4];
    for (row, out) in clip.iter_mut().enumerate() {
        *out = view_proj[0][row] * p[0]
            + view_proj[1][row] * p[1]
            + view_proj[2][row] * p[2]
            + view_proj[3][row] * p[3];
    }

    if clip[3] <= 0.0 {
        return None;
    }
    let ndc_x = clip[0] / clip[3];
    let ndc_y = clip[1] / clip[3];

    Some([
        (ndc_x + 1.0) * 0.5 * w as f32,
        (1.0 - ndc_y) * 0.5 * h as f32,
    ])
}

fn mat4_mul(a: [[f32; 4]; 4], b: [[f32; 4]; 4]) -> [[f32; 4]; 4] {
    // Column-major matrix multiply: c = a * b
    let mut c = [[0.0f32; 4]; 4];
    for col in 0..4 {
        for row in 0..4 {
            c[col][row] = a[0][row] * b[col][0]
                + a[1][row] * b[col][1]
                + a[2][row] * b[col][2]
                + a[3][row] * b[col][3];
        }
    }
    c
}

fn mat4_perspective_rh_z0(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> [[f32; 4]; 4] {
    let f = 1.0 / (0.5 * fov_y_rad).tan();
    let m00 = (f / aspect) as f32;
    let m11 = f as f32;
    let m22 = (far / (near - far)) as f32;
    let m23 = ((near * far) / (near - far)) as f32;

    [
        [m00, 0.0, 0.0, 0.0],
        [0.0, m11, 0.0, 0.0],
        [0.0, 0.0, m22, -1.0],
        [0.0, 0.0, m23, 0.0],
    ]
}

fn mat4_look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> [[f32; 4]; 4] {
    let f = (target - eye).normalize().unwrap_or(Vec3::new(0.0, 0.0, -1.0));
    let s = f.cross(up).normalize().unwrap_or(Vec3::new(1.0, 0.0, 0.0));
    let u = s.cross(f);

    let ex = -s.dot(eye);
    let ey = -u.dot(eye);
    let ez = f.dot(eye);

    [
        [s.x as f32, u.x as f32, (-f.x) as f32, 0.0],
        [s.y as f32, u.y as f32, (-f.y) as f32, 0.0],
        [s.z as f32, u.z as f32, (-f.z) as f32, 0.0],
        [ex as f32, ey as f32, ez as f32, 1.0],
    ]
}
