use foundation::math::Vec3;

/// Tumbling orientation of the solid: rotation about X, then about Y.
///
/// Hotspot markers and label anchors are stored solid-local and transformed
/// through this on demand, so they track the solid's orientation without
/// per-frame recomputation of their own state.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rotation {
    pub x_rad: f64,
    pub y_rad: f64,
}

impl Rotation {
    pub fn identity() -> Self {
        Self {
            x_rad: 0.0,
            y_rad: 0.0,
        }
    }

    /// Both axes advanced by the same fixed step, producing the tumble.
    pub fn advanced(self, step_rad: f64) -> Self {
        Self {
            x_rad: self.x_rad + step_rad,
            y_rad: self.y_rad + step_rad,
        }
    }

    /// Solid-local point to world space.
    pub fn apply(self, v: Vec3) -> Vec3 {
        let (sx, cx) = self.x_rad.sin_cos();
        let (sy, cy) = self.y_rad.sin_cos();

        // Rotate about X.
        let rx = Vec3::new(v.x, v.y * cx - v.z * sx, v.y * sx + v.z * cx);
        // Then about Y.
        Vec3::new(rx.x * cy + rx.z * sy, rx.y, -rx.x * sy + rx.z * cy)
    }
}

#[cfg(test)]
mod tests {
    use super::Rotation;
    use foundation::math::Vec3;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-12, "{a:?} != {b:?}");
    }

    #[test]
    fn identity_is_a_no_op() {
        let v = Vec3::new(0.3, -1.2, 2.0);
        assert_close(Rotation::identity().apply(v), v);
    }

    #[test]
    fn quarter_turn_about_y() {
        let r = Rotation {
            x_rad: 0.0,
            y_rad: std::f64::consts::FRAC_PI_2,
        };
        assert_close(r.apply(Vec3::new(1.0, 0.0, 0.0)), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn quarter_turn_about_x() {
        let r = Rotation {
            x_rad: std::f64::consts::FRAC_PI_2,
            y_rad: 0.0,
        };
        assert_close(r.apply(Vec3::new(0.0, 1.0, 0.0)), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn advanced_steps_both_axes() {
        let r = Rotation::identity().advanced(0.003).advanced(0.003);
        assert!((r.x_rad - 0.006).abs() < 1e-15);
        assert!((r.y_rad - 0.006).abs() < 1e-15);
    }

    #[test]
    fn rotation_preserves_length() {
        let r = Rotation {
            x_rad: 0.7,
            y_rad: -1.3,
        };
        let v = Vec3::new(0.5, -2.0, 1.5);
        assert!((r.apply(v).length() - v.length()).abs() < 1e-12);
    }
}
