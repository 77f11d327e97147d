//! Field state and configuration
//!
//! `GrassState` owns the generated blade field and the cut ledger, and is the
//! single place cuts enter and expire. It is pure simulation: no rendering or
//! platform dependencies, all randomness from the configured seed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::field::{BladeField, FieldExtent};
use super::growth::{GrowthCurve, growth_stage};
use super::ledger::{CutGpu, CutLedger};
use crate::consts::*;

/// Everything needed to build and run one field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    pub extent: FieldExtent,
    pub blade_count: usize,
    pub seed: u64,
    /// Radius of a recorded cut disc
    pub cut_radius: f32,
    /// Minimum seconds between recorded cuts
    pub cut_cooldown: f32,
    /// Seconds for a cut patch to fully regrow
    pub regrow_duration: f32,
    pub growth_curve: GrowthCurve,
    pub ledger_capacity: usize,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            extent: FieldExtent::Rect {
                width: FIELD_WIDTH,
                length: FIELD_LENGTH,
            },
            blade_count: BLADE_COUNT,
            seed: 0,
            cut_radius: CUT_RADIUS,
            cut_cooldown: CUT_COOLDOWN,
            regrow_duration: REGROW_DURATION,
            growth_curve: GrowthCurve::Stepped {
                stages: GROWTH_STAGES,
            },
            ledger_capacity: LEDGER_CAPACITY,
        }
    }
}

/// A live grass field: blades, cut ledger and the cut-rate gate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrassState {
    pub config: FieldConfig,
    pub field: BladeField,
    ledger: CutLedger,
    /// Timestamp of the last accepted cut, for the cooldown gate
    last_cut_time: Option<f32>,
}

impl GrassState {
    pub fn new(mut config: FieldConfig) -> Self {
        // The transport staging array and the shader's cut array are sized
        // for LEDGER_CAPACITY entries; a larger ledger would report active
        // entries the shader never sees
        if config.ledger_capacity > LEDGER_CAPACITY {
            log::warn!(
                "ledger capacity {} exceeds transport capacity, clamping to {}",
                config.ledger_capacity,
                LEDGER_CAPACITY
            );
            config.ledger_capacity = LEDGER_CAPACITY;
        }
        let field = BladeField::generate(config.extent.clone(), config.blade_count, config.seed);
        let ledger = CutLedger::new(config.ledger_capacity, config.regrow_duration);
        Self {
            config,
            field,
            ledger,
            last_cut_time: None,
        }
    }

    #[inline]
    pub fn ledger(&self) -> &CutLedger {
        &self.ledger
    }

    /// Record a cut at a world position. Silently ignored when the position
    /// is outside the field, the radius is invalid, or the cooldown gate is
    /// still closed. Returns whether a cut was recorded.
    pub fn record_cut_at(&mut self, pos: Vec2, radius: f32, now: f32) -> bool {
        if !self.field.contains(pos) {
            return false;
        }
        if let Some(last) = self.last_cut_time
            && now - last < self.config.cut_cooldown
        {
            return false;
        }
        if self.ledger.record(pos, radius, now) {
            self.last_cut_time = Some(now);
            true
        } else {
            false
        }
    }

    /// Per-frame upkeep: prune fully regrown cuts. Runs before the transport
    /// buffer resync so the active count sent to the shader only covers live
    /// entries.
    pub fn advance(&mut self, now: f32) {
        self.ledger.prune_expired(now);
    }

    /// Whether the transport buffer needs rewriting before the next draw
    #[inline]
    pub fn transport_dirty(&self) -> bool {
        self.ledger.is_dirty()
    }

    /// Serialize the ledger into `out` and return the active entry count
    pub fn write_transport(&mut self, out: &mut [CutGpu]) -> u32 {
        self.ledger.write_transport(out)
    }

    /// CPU-side growth stage at a ground point (reference for the shader;
    /// the renderer never calls this per vertex)
    pub fn growth_at(&self, pos: Vec2, now: f32) -> f32 {
        growth_stage(
            pos,
            self.ledger.events(),
            now,
            self.config.regrow_duration,
            self.config.growth_curve,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck::Zeroable;

    fn state() -> GrassState {
        GrassState::new(FieldConfig {
            blade_count: 100,
            ..Default::default()
        })
    }

    #[test]
    fn test_out_of_bounds_cut_rejected() {
        let mut state = state();
        // Field is 60x60 centered at origin
        assert!(!state.record_cut_at(Vec2::new(31.0, 0.0), 1.0, 0.0));
        assert!(!state.record_cut_at(Vec2::new(0.0, -30.5), 1.0, 0.0));
        assert_eq!(state.ledger().len(), 0);

        assert!(state.record_cut_at(Vec2::new(29.9, 0.0), 1.0, 0.0));
        assert_eq!(state.ledger().len(), 1);
    }

    #[test]
    fn test_cooldown_gates_cut_rate() {
        let mut state = state();
        assert!(state.record_cut_at(Vec2::ZERO, 1.0, 0.0));
        // Within the 100ms gate: dropped
        assert!(!state.record_cut_at(Vec2::new(1.0, 0.0), 1.0, 0.05));
        assert_eq!(state.ledger().len(), 1);
        // Gate reopens
        assert!(state.record_cut_at(Vec2::new(1.0, 0.0), 1.0, 0.11));
        assert_eq!(state.ledger().len(), 2);
    }

    #[test]
    fn test_rejected_cut_does_not_touch_cooldown() {
        let mut state = state();
        assert!(state.record_cut_at(Vec2::ZERO, 1.0, 0.0));
        // Out-of-bounds attempt mid-cooldown must not extend the gate
        assert!(!state.record_cut_at(Vec2::new(100.0, 0.0), 1.0, 0.09));
        assert!(state.record_cut_at(Vec2::ZERO, 1.0, 0.11));
    }

    #[test]
    fn test_advance_prunes_before_resync() {
        let mut state = state();
        state.record_cut_at(Vec2::ZERO, 1.0, 0.0);
        let mut out = [CutGpu::zeroed(); LEDGER_CAPACITY];
        assert_eq!(state.write_transport(&mut out), 1);

        state.advance(REGROW_DURATION + 1.0);
        assert!(state.transport_dirty());
        assert_eq!(state.write_transport(&mut out), 0);
    }

    #[test]
    fn test_ledger_capacity_clamped_to_transport() {
        let mut state = GrassState::new(FieldConfig {
            blade_count: 10,
            ledger_capacity: 64,
            ..Default::default()
        });
        assert_eq!(state.config.ledger_capacity, LEDGER_CAPACITY);
        assert_eq!(state.ledger().capacity(), LEDGER_CAPACITY);

        // Overfill well past the transport size; the active count must
        // never exceed the slots actually written
        for i in 0..40 {
            state.record_cut_at(Vec2::ZERO, 1.0, i as f32);
        }
        let mut out = [CutGpu::zeroed(); LEDGER_CAPACITY];
        let count = state.write_transport(&mut out) as usize;
        assert_eq!(count, LEDGER_CAPACITY);
    }

    #[test]
    fn test_growth_at_reflects_ledger() {
        let mut state = state();
        state.record_cut_at(Vec2::ZERO, 2.0, 0.0);
        assert_eq!(state.growth_at(Vec2::ZERO, 0.0), 0.0);
        assert_eq!(state.growth_at(Vec2::new(10.0, 0.0), 0.0), 1.0);
        // Fully regrown again afterwards
        assert_eq!(state.growth_at(Vec2::ZERO, REGROW_DURATION), 1.0);
    }
}
