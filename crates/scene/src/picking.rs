use foundation::math::Vec3;
use foundation::math::precision::stable_total_cmp_f64;

use crate::hotspot::{HotspotId, Showcase};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HotspotHit {
    pub id: HotspotId,
    pub distance: f64,
    pub point: Vec3,
}

/// True iff the ray hits any face of the rotated solid.
///
/// This drives the rotation pause. Fail-open: a degenerate ray is "no
/// hover", never an error.
pub fn hover_solid(showcase: &Showcase, ray: Ray) -> bool {
    let Some(dir) = ray.dir.normalize() else {
        return false;
    };
    let ray = Ray::new(ray.origin, dir);

    showcase.faces_world().any(|[a, b, c]| {
        ray_triangle(ray, a, b, c).is_some()
    })
}

/// Nearest hotspot marker under the ray, if any.
///
/// Ordering contract:
/// - Closest hit along the (normalized) ray wins.
/// - Equal distances tie-break on the lower `HotspotId`, so picking is
///   deterministic.
pub fn pick_hotspot(showcase: &Showcase, ray: Ray) -> Option<HotspotHit> {
    let dir = ray.dir.normalize()?;
    let ray = Ray::new(ray.origin, dir);

    let mut best: Option<(f64, HotspotId)> = None;
    for hotspot in showcase.hotspots() {
        let center = showcase.rotation.apply(hotspot.local_position);
        let Some(t) = ray_sphere(ray, center, showcase.marker_radius) else {
            continue;
        };

        best = match best {
            None => Some((t, hotspot.id)),
            Some((bt, bid)) => {
                let ord = stable_total_cmp_f64(t, bt).then_with(|| hotspot.id.cmp(&bid));
                if ord.is_lt() {
                    Some((t, hotspot.id))
                } else {
                    Some((bt, bid))
                }
            }
        };
    }

    let (t, id) = best?;
    Some(HotspotHit {
        id,
        distance: t,
        point: ray.origin + dir.scale(t),
    })
}

/// Entry distance of a ray (unit direction) into a sphere.
///
/// An origin inside the sphere reports the exit distance, clamped to zero.
pub fn ray_sphere(ray: Ray, center: Vec3, radius: f64) -> Option<f64> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }

    let sqrt_disc = disc.sqrt();
    let t_near = -b - sqrt_disc;
    let t_far = -b + sqrt_disc;
    if t_far < 0.0 {
        return None;
    }
    Some(t_near.max(0.0))
}

/// Moeller-Trumbore, both winding orders, unit ray direction.
pub fn ray_triangle(ray: Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f64> {
    const EPS: f64 = 1e-12;

    let ab = b - a;
    let ac = c - a;
    let p = ray.dir.cross(ac);
    let det = ab.dot(p);
    if det.abs() < EPS {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(ab);
    let v = ray.dir.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = ac.dot(q) * inv_det;
    if t < EPS {
        return None;
    }
    Some(t)
}

impl Showcase {
    /// Faces of the solid transformed by the current rotation.
    pub fn faces_world(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        let rotation = self.rotation;
        self.solid
            .faces()
            .map(move |[a, b, c]| [rotation.apply(a), rotation.apply(b), rotation.apply(c)])
    }
}

#[cfg(test)]
mod tests {
    use super::{Ray, hover_solid, pick_hotspot, ray_sphere, ray_triangle};
    use crate::hotspot::{HotspotId, LinkEntry, Showcase, ShowcaseConfig};
    use crate::rotation::Rotation;
    use crate::solid::FacetedSolid;
    use foundation::math::Vec3;

    fn showcase() -> Showcase {
        let solid = FacetedSolid::icosahedron(1.0, 2);
        Showcase::from_config(solid, &ShowcaseConfig::default()).unwrap()
    }

    #[test]
    fn ray_through_center_hovers_the_solid() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(hover_solid(&showcase(), ray));
    }

    #[test]
    fn ray_far_off_axis_misses_everything() {
        let s = showcase();
        let ray = Ray::new(Vec3::new(5.0, 5.0, 3.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(!hover_solid(&s, ray));
        assert!(pick_hotspot(&s, ray).is_none());
    }

    #[test]
    fn degenerate_ray_is_fail_open() {
        let s = showcase();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO);
        assert!(!hover_solid(&s, ray));
        assert!(pick_hotspot(&s, ray).is_none());
    }

    #[test]
    fn hover_tracks_the_rotated_solid() {
        let mut s = showcase();
        s.rotation = Rotation {
            x_rad: 1.1,
            y_rad: -0.4,
        };
        // Rotation cannot move a sphere-shaped solid off a center ray.
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(hover_solid(&s, ray));
    }

    #[test]
    fn picks_a_marker_aimed_at_directly() {
        let s = showcase();
        let target = s.hotspot_world_position(HotspotId(0)).unwrap();
        let origin = Vec3::new(0.0, 0.0, 4.0);
        let ray = Ray::new(origin, target - origin);

        let hit = pick_hotspot(&s, ray).expect("hit");
        assert_eq!(hit.id, HotspotId(0));
        assert!((hit.point - target).length() <= s.marker_radius + 1e-9);
    }

    #[test]
    fn nearest_marker_wins() {
        // Two markers on the same diameter; the ray from +Z must pick the
        // closer (front) one.
        let solid = FacetedSolid::icosahedron(1.0, 2);
        let front = solid.vertex(0).unwrap();
        let front_index = 0u32;
        // Find a corner close to the antipode of corner 0.
        let mut back_index = 0u32;
        let mut best = f64::MAX;
        for i in 0..solid.vertex_count() as u32 {
            let d = (solid.vertex(i).unwrap() + front).length();
            if d < best {
                best = d;
                back_index = i;
            }
        }

        let config = ShowcaseConfig {
            links: vec![
                LinkEntry::new("https://example.org/back", "Back"),
                LinkEntry::new("https://example.org/front", "Front"),
            ],
            vertex_indices: vec![back_index, front_index],
            marker_radius: 0.2,
            ..ShowcaseConfig::default()
        };
        let s = Showcase::from_config(solid, &config).unwrap();

        let origin = front.scale(4.0);
        let ray = Ray::new(origin, front.scale(-1.0));
        let hit = pick_hotspot(&s, ray).expect("hit");
        assert_eq!(hit.id, HotspotId(1), "front marker should win");
    }

    #[test]
    fn equal_distances_tie_break_on_lower_id() {
        // Both links at the same corner: identical spheres, identical
        // distances.
        let solid = FacetedSolid::icosahedron(1.0, 2);
        let config = ShowcaseConfig {
            links: vec![
                LinkEntry::new("https://example.org/a", "A"),
                LinkEntry::new("https://example.org/b", "B"),
            ],
            vertex_indices: vec![3, 3],
            ..ShowcaseConfig::default()
        };
        let s = Showcase::from_config(solid, &config).unwrap();

        let target = s.hotspot_world_position(HotspotId(0)).unwrap();
        let origin = target.scale(4.0);
        let ray = Ray::new(origin, target - origin);
        let hit = pick_hotspot(&s, ray).expect("hit");
        assert_eq!(hit.id, HotspotId(0));
    }

    #[test]
    fn sphere_intersection_from_inside_clamps_to_zero() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let t = ray_sphere(ray, Vec3::ZERO, 1.0).unwrap();
        assert_eq!(t, 0.0);
    }

    #[test]
    fn triangle_hit_reports_distance() {
        let ray = Ray::new(Vec3::new(0.1, 0.1, 2.0), Vec3::new(0.0, 0.0, -1.0));
        let t = ray_triangle(
            ray,
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
        .expect("hit");
        assert!((t - 2.0).abs() < 1e-12);
    }
}
