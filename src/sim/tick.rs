//! Fixed timestep update
//!
//! Advances the avatar and records cuts deterministically. Input arrives as an
//! explicit per-tick struct filled by the platform shell; the sim never reads
//! global key state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::GrassState;
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Movement axis, -1..1 (strafe left/right)
    pub move_x: f32,
    /// Movement axis, -1..1 (forward/back)
    pub move_z: f32,
    /// Mower engaged (held key/button)
    pub cutting: bool,
    /// Camera orbit deltas from mouse drag (radians)
    pub orbit_dx: f32,
    pub orbit_dy: f32,
}

/// The controllable mower avatar
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Avatar {
    /// Ground position (x,z)
    pub pos: Vec2,
    /// Facing angle, radians; derived from the last movement direction
    pub heading: f32,
}

impl Default for Avatar {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            heading: 0.0,
        }
    }
}

/// Advance one fixed timestep: move the avatar, keep it on the field, and
/// record a cut under it while the mower is engaged. Ledger pruning happens
/// once per frame in `GrassState::advance`, not per substep.
pub fn tick(state: &mut GrassState, avatar: &mut Avatar, input: &TickInput, dt: f32, now: f32) {
    let axis = Vec2::new(input.move_x, input.move_z);
    if axis.length_squared() > 0.0 {
        let dir = axis.normalize();
        avatar.pos += dir * AVATAR_SPEED * dt;
        avatar.heading = dir.y.atan2(dir.x);

        // Keep the avatar on the field's bounding rectangle
        let (min, max) = state.config.extent.bounding_rect();
        avatar.pos = avatar.pos.clamp(min, max);
    }

    if input.cutting {
        let radius = state.config.cut_radius;
        state.record_cut_at(avatar.pos, radius, now);
    }
}
