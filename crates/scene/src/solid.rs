use std::collections::HashSet;

use foundation::math::Vec3;

/// Subdivided icosahedron, stored face-flattened.
///
/// Each face contributes three independent position entries (no index
/// sharing). That gives the renderer per-face normals for the faceted look,
/// and it makes hotspot vertex indices address per-corner entries, which is
/// how the link configuration is expressed.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetedSolid {
    radius: f64,
    positions: Vec<Vec3>,
}

impl FacetedSolid {
    /// Build an icosahedron of `radius`, subdivided `detail` times.
    ///
    /// Every subdivision level splits each face into four; midpoints are
    /// re-projected onto the sphere. Face count is `20 * 4^detail`, vertex
    /// count three times that.
    pub fn icosahedron(radius: f64, detail: u32) -> Self {
        let radius = radius.abs().max(f64::EPSILON);
        let mut faces = base_icosahedron_faces();

        for _ in 0..detail {
            let mut next = Vec::with_capacity(faces.len() * 4);
            for [a, b, c] in faces {
                let ab = midpoint_on_unit_sphere(a, b);
                let bc = midpoint_on_unit_sphere(b, c);
                let ca = midpoint_on_unit_sphere(c, a);
                next.push([a, ab, ca]);
                next.push([ab, b, bc]);
                next.push([ca, bc, c]);
                next.push([ab, bc, ca]);
            }
            faces = next;
        }

        let mut positions = Vec::with_capacity(faces.len() * 3);
        for [a, b, c] in faces {
            positions.push(a.scale(radius));
            positions.push(b.scale(radius));
            positions.push(c.scale(radius));
        }

        Self { radius, positions }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Position entry at `index`, or `None` past the end. Never panics; the
    /// hotspot builder relies on this to skip out-of-range configuration.
    pub fn vertex(&self, index: u32) -> Option<Vec3> {
        self.positions.get(index as usize).copied()
    }

    /// Faces as corner triples, in storage order.
    pub fn faces(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.positions.chunks_exact(3).map(|c| [c[0], c[1], c[2]])
    }

    /// Deduplicated undirected edges, as position pairs.
    ///
    /// Adjacent faces do not share storage, so edges are deduplicated by
    /// quantized endpoint coordinates rather than by index.
    pub fn wireframe_edges(&self) -> Vec<(Vec3, Vec3)> {
        let mut seen: HashSet<(QuantizedPoint, QuantizedPoint)> = HashSet::new();
        let mut edges = Vec::new();

        for face in self.faces() {
            for (a, b) in [(face[0], face[1]), (face[1], face[2]), (face[2], face[0])] {
                let (qa, qb) = (quantize(a), quantize(b));
                let key = if qa <= qb { (qa, qb) } else { (qb, qa) };
                if seen.insert(key) {
                    edges.push((a, b));
                }
            }
        }

        edges
    }
}

type QuantizedPoint = (i64, i64, i64);

fn quantize(p: Vec3) -> QuantizedPoint {
    const SCALE: f64 = 1.0e9;
    (
        (p.x * SCALE).round() as i64,
        (p.y * SCALE).round() as i64,
        (p.z * SCALE).round() as i64,
    )
}

fn midpoint_on_unit_sphere(a: Vec3, b: Vec3) -> Vec3 {
    let mid = (a + b).scale(0.5);
    // Base vertices are unit-length and never antipodal within a face, so
    // the midpoint cannot be degenerate.
    mid.normalize().unwrap_or(mid)
}

/// The 20 faces of a unit icosahedron, wound consistently.
fn base_icosahedron_faces() -> Vec<[Vec3; 3]> {
    let t = (1.0 + 5.0_f64.sqrt()) / 2.0;

    let raw = [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ];
    let verts: Vec<Vec3> = raw
        .iter()
        .map(|v| v.normalize().unwrap_or(*v))
        .collect();

    const FACE_INDICES: [[usize; 3]; 20] = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    FACE_INDICES
        .iter()
        .map(|&[a, b, c]| [verts[a], verts[b], verts[c]])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::FacetedSolid;

    #[test]
    fn base_icosahedron_has_sixty_corners() {
        let solid = FacetedSolid::icosahedron(1.0, 0);
        assert_eq!(solid.face_count(), 20);
        assert_eq!(solid.vertex_count(), 60);
    }

    #[test]
    fn detail_two_matches_face_flattened_counts() {
        let solid = FacetedSolid::icosahedron(1.0, 2);
        assert_eq!(solid.face_count(), 320);
        assert_eq!(solid.vertex_count(), 960);
    }

    #[test]
    fn all_vertices_lie_on_the_sphere() {
        let solid = FacetedSolid::icosahedron(2.5, 2);
        for i in 0..solid.vertex_count() as u32 {
            let v = solid.vertex(i).unwrap();
            assert!((v.length() - 2.5).abs() < 1e-9, "vertex {i} off sphere");
        }
    }

    #[test]
    fn vertex_out_of_range_is_none() {
        let solid = FacetedSolid::icosahedron(1.0, 0);
        assert!(solid.vertex(59).is_some());
        assert!(solid.vertex(60).is_none());
        assert!(solid.vertex(u32::MAX).is_none());
    }

    #[test]
    fn wireframe_edges_are_deduplicated() {
        // An icosahedron has 30 distinct edges; flattened faces list 60.
        let solid = FacetedSolid::icosahedron(1.0, 0);
        assert_eq!(solid.wireframe_edges().len(), 30);
    }
}
