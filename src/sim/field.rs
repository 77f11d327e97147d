//! Blade field generation
//!
//! Lays out grass blade instances over a rectangular or polygonal ground
//! patch. Placement is uniform random from a seeded RNG so a field is fully
//! reproducible from its seed. Per-blade yaw/lean/height jitter is cosmetic;
//! only placement count and bounds membership are load-bearing.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::consts::*;

/// Planar region the field covers. Rectangles are centered on the origin;
/// polygons are an ordered boundary loop in world (x,z) coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FieldExtent {
    Rect { width: f32, length: f32 },
    Polygon { boundary: Vec<Vec2> },
}

impl FieldExtent {
    /// Axis-aligned bounding rectangle as (min, max) corners
    pub fn bounding_rect(&self) -> (Vec2, Vec2) {
        match self {
            FieldExtent::Rect { width, length } => {
                let half = Vec2::new(width / 2.0, length / 2.0);
                (-half, half)
            }
            FieldExtent::Polygon { boundary } => {
                let mut min = Vec2::splat(f32::MAX);
                let mut max = Vec2::splat(f32::MIN);
                for p in boundary {
                    min = min.min(*p);
                    max = max.max(*p);
                }
                (min, max)
            }
        }
    }

    /// Check whether a ground point lies inside the field
    pub fn contains(&self, p: Vec2) -> bool {
        match self {
            FieldExtent::Rect { width, length } => {
                p.x.abs() <= width / 2.0 && p.y.abs() <= length / 2.0
            }
            FieldExtent::Polygon { boundary } => point_in_polygon(p, boundary),
        }
    }
}

/// Even-odd (ray casting) point-in-polygon test against an ordered boundary
pub fn point_in_polygon(p: Vec2, boundary: &[Vec2]) -> bool {
    if boundary.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = boundary.len() - 1;
    for i in 0..boundary.len() {
        let a = boundary[i];
        let b = boundary[j];
        if (a.y > p.y) != (b.y > p.y) {
            let cross_x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// One grass blade. Immutable after generation; `index` addresses its
/// vertices in the baked mesh.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BladeInstance {
    pub index: u32,
    /// Base position on the ground plane (x,z)
    pub root: Vec2,
    /// Facing rotation (radians)
    pub yaw: f32,
    /// Planar bend direction * strength applied to upper vertices
    pub lean: Vec2,
    /// Rest height of the blade tip
    pub height: f32,
}

/// A generated field of blades
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BladeField {
    pub extent: FieldExtent,
    pub blades: Vec<BladeInstance>,
    /// Seed the field was generated from, kept for reproducibility
    pub seed: u64,
}

impl BladeField {
    /// Generate `blade_count` blades inside `extent`.
    ///
    /// Rectangular extents always fill exactly. Polygonal extents sample the
    /// bounding rectangle and keep points that pass the even-odd test, giving
    /// up after 2x the requested count of attempts; the result may then hold
    /// fewer blades than asked for, which callers treat as a smaller field
    /// rather than an error.
    pub fn generate(extent: FieldExtent, blade_count: usize, seed: u64) -> Self {
        let (min, max) = extent.bounding_rect();
        // Empty or inverted bounds (empty boundary loop, negative rect
        // dimensions): nothing can be placed, degrade to an empty field
        if min.x > max.x || min.y > max.y {
            log::debug!("degenerate extent, generating empty field");
            return Self {
                extent,
                blades: Vec::new(),
                seed,
            };
        }

        let mut rng = Pcg32::seed_from_u64(seed);
        let mut blades = Vec::with_capacity(blade_count);

        let max_attempts = blade_count.saturating_mul(2);
        let mut attempts = 0;
        while blades.len() < blade_count && attempts < max_attempts {
            attempts += 1;
            let root = Vec2::new(
                rng.random_range(min.x..=max.x),
                rng.random_range(min.y..=max.y),
            );
            if !extent.contains(root) {
                continue;
            }

            let yaw = rng.random_range(0.0..TAU);
            let lean_angle = rng.random_range(0.0..TAU);
            let lean_strength = rng.random_range(0.0..0.25);
            let height = BLADE_BASE_HEIGHT + rng.random_range(0.0..BLADE_HEIGHT_VARIATION);

            blades.push(BladeInstance {
                index: blades.len() as u32,
                root,
                yaw,
                lean: Vec2::new(lean_angle.cos(), lean_angle.sin()) * lean_strength,
                height,
            });
        }

        if blades.len() < blade_count {
            log::debug!(
                "field under-filled: {} of {} blades placed",
                blades.len(),
                blade_count
            );
        }

        Self {
            extent,
            blades,
            seed,
        }
    }

    /// Check whether a ground point lies inside the field
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        self.extent.contains(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_extent() -> FieldExtent {
        FieldExtent::Rect {
            width: 20.0,
            length: 10.0,
        }
    }

    #[test]
    fn test_rect_fills_exactly() {
        let field = BladeField::generate(rect_extent(), 500, 42);
        assert_eq!(field.blades.len(), 500);
        for blade in &field.blades {
            assert!(blade.root.x.abs() <= 10.0);
            assert!(blade.root.y.abs() <= 5.0);
            assert!(blade.height >= BLADE_BASE_HEIGHT);
        }
    }

    #[test]
    fn test_generate_is_deterministic() {
        let a = BladeField::generate(rect_extent(), 100, 7);
        let b = BladeField::generate(rect_extent(), 100, 7);
        for (ba, bb) in a.blades.iter().zip(&b.blades) {
            assert_eq!(ba.root, bb.root);
            assert_eq!(ba.height, bb.height);
        }
    }

    #[test]
    fn test_blade_indices_are_stable() {
        let field = BladeField::generate(rect_extent(), 50, 3);
        for (i, blade) in field.blades.iter().enumerate() {
            assert_eq!(blade.index, i as u32);
        }
    }

    /// L-shaped (concave) boundary
    fn concave_extent() -> FieldExtent {
        FieldExtent::Polygon {
            boundary: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(10.0, 0.0),
                Vec2::new(10.0, 4.0),
                Vec2::new(4.0, 4.0),
                Vec2::new(4.0, 10.0),
                Vec2::new(0.0, 10.0),
            ],
        }
    }

    #[test]
    fn test_point_in_polygon_concave() {
        let FieldExtent::Polygon { boundary } = concave_extent() else {
            unreachable!()
        };
        // Inside the horizontal bar of the L
        assert!(point_in_polygon(Vec2::new(8.0, 2.0), &boundary));
        // Inside the vertical bar
        assert!(point_in_polygon(Vec2::new(2.0, 8.0), &boundary));
        // In the concave notch (inside the bounding rect, outside the L)
        assert!(!point_in_polygon(Vec2::new(8.0, 8.0), &boundary));
        // Clearly outside
        assert!(!point_in_polygon(Vec2::new(-1.0, 5.0), &boundary));
    }

    #[test]
    fn test_polygon_blades_pass_membership() {
        let extent = concave_extent();
        let field = BladeField::generate(extent.clone(), 400, 11);
        assert!(!field.blades.is_empty());
        for blade in &field.blades {
            assert!(extent.contains(blade.root), "blade outside boundary");
        }
    }

    #[test]
    fn test_polygon_attempts_are_bounded() {
        // Thin diagonal sliver across a 100x100 bounding box: ~0.25% of the
        // sampled rect lands inside, so generation must stop at the attempt
        // cap and under-fill.
        let extent = FieldExtent::Polygon {
            boundary: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(100.0, 100.0),
                Vec2::new(100.0, 99.5),
            ],
        };
        let field = BladeField::generate(extent, 200, 5);
        assert!(field.blades.len() < 200);
    }

    #[test]
    fn test_empty_polygon_yields_empty_field() {
        let extent = FieldExtent::Polygon { boundary: vec![] };
        let field = BladeField::generate(extent, 100, 1);
        assert!(field.blades.is_empty());
    }

    #[test]
    fn test_inverted_rect_yields_empty_field() {
        let extent = FieldExtent::Rect {
            width: -10.0,
            length: 5.0,
        };
        let field = BladeField::generate(extent, 100, 1);
        assert!(field.blades.is_empty());
    }
}
