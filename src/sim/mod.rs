//! Deterministic simulation module
//!
//! All field logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! The one GPU-facing concern is the transport buffer format in `ledger`,
//! which the shader consumes byte-for-byte.

pub mod field;
pub mod growth;
pub mod ledger;
pub mod state;
pub mod tick;

pub use field::{BladeField, BladeInstance, FieldExtent, point_in_polygon};
pub use growth::{GrowthCurve, growth_stage};
pub use ledger::{CUT_STRIDE, CutEvent, CutGpu, CutLedger};
pub use state::{FieldConfig, GrassState};
pub use tick::{Avatar, TickInput, tick};
