//! Mow Meadow - a 3D grass field you can mow
//!
//! Core modules:
//! - `sim`: Deterministic simulation (blade field, cut ledger, growth stages)
//! - `renderer`: WebGPU rendering pipeline for the grass field
//! - `settings`: Quality presets persisted in LocalStorage

pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{QualityPreset, Settings};

/// Demo configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz is plenty for mowing)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Field dimensions (world units)
    pub const FIELD_WIDTH: f32 = 60.0;
    pub const FIELD_LENGTH: f32 = 60.0;
    /// Default blade count for the demo field
    pub const BLADE_COUNT: usize = 6000;

    /// Blade geometry defaults
    pub const BLADE_BASE_HEIGHT: f32 = 0.8;
    pub const BLADE_HEIGHT_VARIATION: f32 = 0.5;
    pub const BLADE_HALF_WIDTH: f32 = 0.06;

    /// Cutting defaults
    pub const CUT_RADIUS: f32 = 1.4;
    /// Minimum interval between recorded cuts (seconds)
    pub const CUT_COOLDOWN: f32 = 0.1;
    /// Time for a cut patch to fully regrow (seconds)
    pub const REGROW_DURATION: f32 = 30.0;
    /// Discrete growth stages when stepped regrowth is enabled
    pub const GROWTH_STAGES: u32 = 5;
    /// Maximum cut events the ledger retains (also the shader loop bound)
    pub const LEDGER_CAPACITY: usize = 20;

    /// Avatar movement speed (world units per second)
    pub const AVATAR_SPEED: f32 = 8.0;
}
