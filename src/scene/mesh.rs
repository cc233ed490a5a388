//! Tesselatie van vormprimitieven naar polygoon-meshes.

use std::f64::consts::PI;

use serde::Serialize;

use super::primitive::Primitive;

/// Kleinste aantal segmenten dat nog een gesloten ronde vorm geeft.
pub const MIN_SEGMENTS: usize = 3;

/// Bovengrens op het aantal segmenten; vertex-indices blijven ruim binnen `u32`.
pub const MAX_SEGMENTS: usize = 256;

/// Polygoon-mesh: vertices plus faces als vertex-indices (driehoeken of
/// vierhoeken, kappen als n-hoeken).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Mesh {
    pub vertices: Vec<[f64; 3]>,
    pub faces: Vec<Vec<u32>>,
}

impl Mesh {
    /// Past `transform` toe op elke vertex.
    #[must_use]
    pub fn map_vertices<F>(mut self, transform: F) -> Self
    where
        F: Fn([f64; 3]) -> [f64; 3],
    {
        for vertex in &mut self.vertices {
            *vertex = transform(*vertex);
        }
        self
    }

    fn push_vertex(&mut self, vertex: [f64; 3]) -> u32 {
        self.vertices.push(vertex);
        (self.vertices.len() - 1) as u32
    }
}

impl Primitive {
    /// Tesselleert de primitief rond de oorsprong. `segments` is het aantal
    /// onderverdelingen van ronde omtrekken en wordt begrensd tot
    /// [`MIN_SEGMENTS`]..=[`MAX_SEGMENTS`].
    #[must_use]
    pub fn tessellate(&self, segments: usize) -> Mesh {
        let segments = segments.clamp(MIN_SEGMENTS, MAX_SEGMENTS);
        match *self {
            Self::Cube {
                width,
                height,
                length,
            } => cube(width, height, length),
            Self::Sphere { diameter } => sphere(diameter / 2.0, segments, (segments / 2).max(2)),
            Self::Cylinder { diameter, height } => prism(diameter / 2.0, height, segments),
            Self::HexagonalPrism { diameter, height } => prism(diameter / 2.0, height, 6),
            Self::TriangularPrism { diameter, height } => prism(diameter / 2.0, height, 3),
            Self::Cone { diameter, height } => cone(diameter / 2.0, height, segments),
            Self::Torus {
                diameter,
                thickness,
            } => torus(
                diameter / 2.0,
                thickness / 2.0,
                segments,
                segments.div_ceil(2).max(MIN_SEGMENTS),
            ),
            Self::Disc { diameter } => disc(diameter / 2.0, segments),
            Self::Triangle { length, height } => Mesh {
                vertices: vec![
                    [-length / 2.0, -height / 2.0, 0.0],
                    [length / 2.0, -height / 2.0, 0.0],
                    [0.0, height / 2.0, 0.0],
                ],
                faces: vec![vec![0, 1, 2]],
            },
            Self::Rectangle { width, height } => Mesh {
                vertices: vec![
                    [-width / 2.0, -height / 2.0, 0.0],
                    [width / 2.0, -height / 2.0, 0.0],
                    [width / 2.0, height / 2.0, 0.0],
                    [-width / 2.0, height / 2.0, 0.0],
                ],
                faces: vec![vec![0, 1, 2, 3]],
            },
        }
    }
}

fn cube(width: f64, height: f64, length: f64) -> Mesh {
    let (x, y, z) = (width / 2.0, height / 2.0, length / 2.0);
    Mesh {
        vertices: vec![
            [-x, -y, -z],
            [x, -y, -z],
            [x, y, -z],
            [-x, y, -z],
            [-x, -y, z],
            [x, -y, z],
            [x, y, z],
            [-x, y, z],
        ],
        faces: vec![
            vec![0, 3, 2, 1], // -z
            vec![4, 5, 6, 7], // +z
            vec![0, 1, 5, 4], // -y
            vec![3, 7, 6, 2], // +y
            vec![1, 2, 6, 5], // +x
            vec![0, 4, 7, 3], // -x
        ],
    }
}

/// Punt op een cirkel met straal `radius` in het XZ-vlak op hoogte `y`.
fn ring_point(radius: f64, index: usize, count: usize, y: f64) -> [f64; 3] {
    let theta = 2.0 * PI * index as f64 / count as f64;
    [radius * theta.cos(), y, -radius * theta.sin()]
}

fn sphere(radius: f64, u_count: usize, v_count: usize) -> Mesh {
    let mut mesh = Mesh::default();

    let top = mesh.push_vertex([0.0, radius, 0.0]);
    for i in 1..v_count {
        let phi = PI * i as f64 / v_count as f64;
        for j in 0..u_count {
            mesh.push_vertex(ring_point(radius * phi.sin(), j, u_count, radius * phi.cos()));
        }
    }
    let bottom = mesh.push_vertex([0.0, -radius, 0.0]);

    let ring = |index: usize, j: usize| (1 + index * u_count + j % u_count) as u32;

    for j in 0..u_count {
        mesh.faces.push(vec![top, ring(0, j), ring(0, j + 1)]);
    }
    for i in 0..(v_count - 2) {
        for j in 0..u_count {
            mesh.faces
                .push(vec![ring(i, j), ring(i + 1, j), ring(i + 1, j + 1), ring(i, j + 1)]);
        }
    }
    let last = v_count - 2;
    for j in 0..u_count {
        mesh.faces.push(vec![bottom, ring(last, j + 1), ring(last, j)]);
    }

    mesh
}

fn prism(radius: f64, height: f64, sides: usize) -> Mesh {
    let mut mesh = Mesh::default();
    let half = height / 2.0;

    for j in 0..sides {
        mesh.push_vertex(ring_point(radius, j, sides, -half));
    }
    for j in 0..sides {
        mesh.push_vertex(ring_point(radius, j, sides, half));
    }

    let sides_u32 = sides as u32;
    for j in 0..sides_u32 {
        let next = (j + 1) % sides_u32;
        mesh.faces
            .push(vec![j, next, sides_u32 + next, sides_u32 + j]);
    }
    mesh.faces.push((0..sides_u32).rev().collect());
    mesh.faces.push((sides_u32..2 * sides_u32).collect());

    mesh
}

fn cone(radius: f64, height: f64, sides: usize) -> Mesh {
    let mut mesh = Mesh::default();
    let half = height / 2.0;

    for j in 0..sides {
        mesh.push_vertex(ring_point(radius, j, sides, -half));
    }
    let apex = mesh.push_vertex([0.0, half, 0.0]);

    let sides_u32 = sides as u32;
    for j in 0..sides_u32 {
        mesh.faces.push(vec![j, (j + 1) % sides_u32, apex]);
    }
    mesh.faces.push((0..sides_u32).rev().collect());

    mesh
}

fn torus(major_radius: f64, minor_radius: f64, u_count: usize, v_count: usize) -> Mesh {
    let mut mesh = Mesh::default();

    for i in 0..u_count {
        let theta = 2.0 * PI * i as f64 / u_count as f64;
        for j in 0..v_count {
            let phi = 2.0 * PI * j as f64 / v_count as f64;
            let distance = major_radius + minor_radius * phi.cos();
            mesh.push_vertex([
                distance * theta.cos(),
                minor_radius * phi.sin(),
                -distance * theta.sin(),
            ]);
        }
    }

    let index = |i: usize, j: usize| ((i % u_count) * v_count + j % v_count) as u32;
    for i in 0..u_count {
        for j in 0..v_count {
            mesh.faces.push(vec![
                index(i, j),
                index(i + 1, j),
                index(i + 1, j + 1),
                index(i, j + 1),
            ]);
        }
    }

    mesh
}

fn disc(radius: f64, sides: usize) -> Mesh {
    let mut mesh = Mesh::default();
    let center = mesh.push_vertex([0.0, 0.0, 0.0]);
    for j in 0..sides {
        mesh.push_vertex(ring_point(radius, j, sides, 0.0));
    }

    let sides_u32 = sides as u32;
    for j in 0..sides_u32 {
        mesh.faces.push(vec![center, 1 + j, 1 + (j + 1) % sides_u32]);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_indices_valid(mesh: &Mesh) {
        let count = mesh.vertices.len() as u32;
        for face in &mesh.faces {
            assert!(face.len() >= 3, "face {face:?} is degenerate");
            assert!(face.iter().all(|index| *index < count), "face {face:?} out of range");
        }
    }

    fn extent(mesh: &Mesh, axis: usize) -> f64 {
        let values = mesh.vertices.iter().map(|vertex| vertex[axis]);
        let max = values.clone().fold(f64::NEG_INFINITY, f64::max);
        let min = values.fold(f64::INFINITY, f64::min);
        max - min
    }

    #[test]
    fn cube_has_eight_vertices_and_six_quads() {
        let mesh = Primitive::Cube {
            width: 2.0,
            height: 4.0,
            length: 6.0,
        }
        .tessellate(16);
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.faces.len(), 6);
        assert_indices_valid(&mesh);
        assert_eq!(extent(&mesh, 0), 2.0);
        assert_eq!(extent(&mesh, 1), 4.0);
        assert_eq!(extent(&mesh, 2), 6.0);
    }

    #[test]
    fn sphere_counts_follow_rings() {
        let mesh = Primitive::Sphere { diameter: 10.0 }.tessellate(8);
        // u = 8, v = 4: drie ringen plus twee polen.
        assert_eq!(mesh.vertices.len(), 8 * 3 + 2);
        assert_eq!(mesh.faces.len(), 8 * 2 + 2 * 8);
        assert_indices_valid(&mesh);
        assert!((extent(&mesh, 1) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn prisms_use_fixed_side_counts() {
        let hex = Primitive::HexagonalPrism {
            diameter: 2.0,
            height: 1.0,
        }
        .tessellate(32);
        assert_eq!(hex.vertices.len(), 12);
        assert_eq!(hex.faces.len(), 6 + 2);
        assert_indices_valid(&hex);

        let tri = Primitive::TriangularPrism {
            diameter: 2.0,
            height: 1.0,
        }
        .tessellate(32);
        assert_eq!(tri.vertices.len(), 6);
        assert_eq!(tri.faces.len(), 3 + 2);
    }

    #[test]
    fn cylinder_uses_requested_segments() {
        let mesh = Primitive::Cylinder {
            diameter: 2.0,
            height: 3.0,
        }
        .tessellate(12);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.faces.len(), 14);
        assert!((extent(&mesh, 1) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn segment_count_is_capped() {
        let mesh = Primitive::Cylinder {
            diameter: 2.0,
            height: 3.0,
        }
        .tessellate(usize::MAX);
        assert_eq!(mesh.vertices.len(), 2 * MAX_SEGMENTS);
        assert_indices_valid(&mesh);
    }

    #[test]
    fn cone_has_apex_and_base() {
        let mesh = Primitive::Cone {
            diameter: 2.0,
            height: 3.0,
        }
        .tessellate(10);
        assert_eq!(mesh.vertices.len(), 11);
        assert_eq!(mesh.faces.len(), 11);
        assert_eq!(mesh.vertices[10], [0.0, 1.5, 0.0]);
        assert_indices_valid(&mesh);
    }

    #[test]
    fn torus_is_a_closed_grid() {
        let mesh = Primitive::Torus {
            diameter: 10.0,
            thickness: 2.0,
        }
        .tessellate(8);
        assert_eq!(mesh.vertices.len(), 8 * 4);
        assert_eq!(mesh.faces.len(), 8 * 4);
        assert_indices_valid(&mesh);
        assert!((extent(&mesh, 0) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn disc_is_a_triangle_fan() {
        let mesh = Primitive::Disc { diameter: 4.0 }.tessellate(6);
        assert_eq!(mesh.vertices.len(), 7);
        assert_eq!(mesh.faces.len(), 6);
        assert_indices_valid(&mesh);
    }

    #[test]
    fn low_segment_counts_are_raised() {
        let mesh = Primitive::Disc { diameter: 4.0 }.tessellate(1);
        assert_eq!(mesh.faces.len(), MIN_SEGMENTS);
    }

    #[test]
    fn flat_shapes_have_single_face() {
        let triangle = Primitive::Triangle {
            length: 2.0,
            height: 1.0,
        }
        .tessellate(8);
        assert_eq!(triangle.faces, vec![vec![0, 1, 2]]);

        let rectangle = Primitive::Rectangle {
            width: 2.0,
            height: 1.0,
        }
        .tessellate(8);
        assert_eq!(rectangle.vertices.len(), 4);
        assert_eq!(rectangle.faces.len(), 1);
    }

    #[test]
    fn map_vertices_translates() {
        let mesh = Primitive::Rectangle {
            width: 2.0,
            height: 2.0,
        }
        .tessellate(4)
        .map_vertices(|[x, y, z]| [x + 1.0, y, z]);
        assert_eq!(mesh.vertices[0], [0.0, -1.0, 0.0]);
    }
}
