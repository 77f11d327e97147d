//! Grass mesh baking
//!
//! Turns a generated blade field into flat vertex/index buffers. Each blade
//! contributes 5 vertices and a 3-triangle fan. The mesh is baked once in
//! rest pose; all per-frame deformation (growth scaling, wind) happens in the
//! vertex shader.

use glam::Vec2;

use super::vertex::GrassVertex;
use crate::consts::*;
use crate::sim::BladeField;

/// Vertices per blade
pub const BLADE_VERTS: usize = 5;
/// Indices per blade (3 triangles)
pub const BLADE_INDICES: usize = 9;

/// Height fraction of the mid vertices
const MID_FRACTION: f32 = 0.55;
/// Width taper at the mid vertices
const MID_TAPER: f32 = 0.6;

#[derive(Debug, Clone, Default)]
pub struct GrassMesh {
    pub vertices: Vec<GrassVertex>,
    pub indices: Vec<u32>,
}

/// Bake the field into GPU-ready buffers.
///
/// Blade layout (fan rooted at vertex 0):
/// 0 base-left, 1 base-right, 2 mid-right, 3 tip, 4 mid-left,
/// triangles (0,1,2) (0,2,3) (0,3,4). UVs come from the blade root mapped
/// over the field's bounding rectangle.
pub fn build_grass_mesh(field: &BladeField) -> GrassMesh {
    let (min, max) = field.extent.bounding_rect();
    let span = (max - min).max(Vec2::splat(f32::EPSILON));

    let mut vertices = Vec::with_capacity(field.blades.len() * BLADE_VERTS);
    let mut indices = Vec::with_capacity(field.blades.len() * BLADE_INDICES);

    for blade in &field.blades {
        let side = Vec2::new(blade.yaw.cos(), blade.yaw.sin());
        let uv = (blade.root - min) / span;
        let root = [blade.root.x, blade.root.y];

        let mid_y = blade.height * MID_FRACTION;
        let mid_lean = blade.lean * MID_FRACTION;
        let base_l = blade.root - side * BLADE_HALF_WIDTH;
        let base_r = blade.root + side * BLADE_HALF_WIDTH;
        let mid_r = blade.root + side * (BLADE_HALF_WIDTH * MID_TAPER) + mid_lean;
        let tip = blade.root + blade.lean;
        let mid_l = blade.root - side * (BLADE_HALF_WIDTH * MID_TAPER) + mid_lean;

        let corners = [
            (base_l, 0.0),
            (base_r, 0.0),
            (mid_r, mid_y),
            (tip, blade.height),
            (mid_l, mid_y),
        ];
        for (ground, y) in corners {
            vertices.push(GrassVertex {
                position: [ground.x, y, ground.y],
                root,
                uv: [uv.x, uv.y],
                height: blade.height,
            });
        }

        let base = blade.index * BLADE_VERTS as u32;
        indices.extend_from_slice(&[
            base,
            base + 1,
            base + 2,
            base,
            base + 2,
            base + 3,
            base,
            base + 3,
            base + 4,
        ]);
    }

    GrassMesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::FieldExtent;

    fn mesh() -> (BladeField, GrassMesh) {
        let field = BladeField::generate(
            FieldExtent::Rect {
                width: 10.0,
                length: 10.0,
            },
            64,
            9,
        );
        let mesh = build_grass_mesh(&field);
        (field, mesh)
    }

    #[test]
    fn test_topology_counts() {
        let (field, mesh) = mesh();
        assert_eq!(mesh.vertices.len(), field.blades.len() * BLADE_VERTS);
        assert_eq!(mesh.indices.len(), field.blades.len() * BLADE_INDICES);
        let max_index = *mesh.indices.iter().max().unwrap();
        assert!((max_index as usize) < mesh.vertices.len());
    }

    #[test]
    fn test_roots_pinned_and_tips_at_height() {
        let (field, mesh) = mesh();
        for (i, blade) in field.blades.iter().enumerate() {
            let verts = &mesh.vertices[i * BLADE_VERTS..(i + 1) * BLADE_VERTS];
            // Base pair on the ground, tip at rest height
            assert_eq!(verts[0].position[1], 0.0);
            assert_eq!(verts[1].position[1], 0.0);
            assert_eq!(verts[3].position[1], blade.height);
            // Every vertex of the blade shares the root
            for v in verts {
                assert_eq!(v.root, [blade.root.x, blade.root.y]);
            }
        }
    }

    #[test]
    fn test_uvs_in_unit_square() {
        let (_, mesh) = mesh();
        for v in &mesh.vertices {
            assert!((0.0..=1.0).contains(&v.uv[0]));
            assert!((0.0..=1.0).contains(&v.uv[1]));
        }
    }
}
