//! Cut event ledger
//!
//! Bounded, insertion-ordered record of mowing cuts. The ledger enforces two
//! limits: a fixed capacity (oldest entry evicted first on overflow) and a
//! maximum age (fully regrown entries are pruned every frame). Its contents
//! are serialized into a fixed-stride transport buffer the grass shader
//! iterates each vertex, so capacity is also the shader's loop bound.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// f32 slots per transport entry: x, y(=0), z, radius, cut_time, 3 reserved
pub const CUT_STRIDE: usize = 8;

/// One transport slot, layout-matched to the shader's cut array
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CutGpu {
    /// World position of the cut center; y is always 0 (ground plane)
    pub pos: [f32; 3],
    pub radius: f32,
    /// Seconds timestamp the cut was recorded at
    pub cut_time: f32,
    /// Reserved for future use
    pub _pad: [f32; 3],
}

/// A recorded cut. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutEvent {
    /// Center on the ground plane (x,z)
    pub pos: Vec2,
    pub radius: f32,
    /// Seconds timestamp the cut happened at
    pub cut_time: f32,
}

impl CutEvent {
    /// Age of this cut at `now`, clamped so clock jitter never goes negative
    #[inline]
    pub fn age(&self, now: f32) -> f32 {
        (now - self.cut_time).max(0.0)
    }
}

/// Bounded FIFO of cut events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutLedger {
    events: Vec<CutEvent>,
    capacity: usize,
    regrow_duration: f32,
    /// Set on any mutation; cleared when the transport buffer is rewritten
    #[serde(skip)]
    dirty: bool,
}

impl CutLedger {
    pub fn new(capacity: usize, regrow_duration: f32) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
            capacity,
            regrow_duration,
            dirty: true,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn regrow_duration(&self) -> f32 {
        self.regrow_duration
    }

    /// Retained events, oldest first
    #[inline]
    pub fn events(&self) -> &[CutEvent] {
        &self.events
    }

    /// Transport buffer needs rewriting before the next draw
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record a cut at `pos`. Evicts the oldest entry first when full.
    /// A non-positive radius is rejected as a no-op. Returns whether the
    /// event was recorded.
    pub fn record(&mut self, pos: Vec2, radius: f32, now: f32) -> bool {
        if radius <= 0.0 {
            return false;
        }
        if self.events.len() == self.capacity {
            self.events.remove(0);
        }
        self.events.push(CutEvent {
            pos,
            radius,
            cut_time: now,
        });
        self.dirty = true;
        true
    }

    /// Drop every event whose patch has fully regrown (age >= regrow
    /// duration). Returns the number removed.
    pub fn prune_expired(&mut self, now: f32) -> usize {
        let before = self.events.len();
        let regrow = self.regrow_duration;
        self.events.retain(|e| e.age(now) < regrow);
        let removed = before - self.events.len();
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    /// Serialize into a fixed-size transport buffer. `out` must span the full
    /// ledger capacity; trailing slots are zeroed and excluded from shader
    /// iteration by the returned active count. Clears the dirty flag.
    pub fn write_transport(&mut self, out: &mut [CutGpu]) -> u32 {
        debug_assert!(out.len() >= self.capacity);
        for slot in out.iter_mut() {
            *slot = CutGpu::zeroed();
        }
        for (slot, event) in out.iter_mut().zip(&self.events) {
            *slot = CutGpu {
                pos: [event.pos.x, 0.0, event.pos.y],
                radius: event.radius,
                cut_time: event.cut_time,
                _pad: [0.0; 3],
            };
        }
        self.dirty = false;
        self.events.len() as u32
    }
}
