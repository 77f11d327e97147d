//! Growth stage evaluation
//!
//! Maps a ground position, the cut ledger and the current time to a scalar in
//! [0,1]: 0 = just mowed, 1 = fully grown. No per-blade growth state is ever
//! stored; the value is derived on demand from the O(ledger) event list, and
//! the vertex shader in `renderer/grass_shader.wgsl` evaluates the exact same
//! function per blade. Any change here must be mirrored there.
//!
//! Per point the derived life cycle is:
//! FullyGrown -> (covering cut) -> Cut(0) -> Regrowing(0..1) -> FullyGrown.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ledger::CutEvent;

/// Shape of the regrowth ramp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthCurve {
    /// Continuous ramp from 0 to 1 over the regrow duration
    Smooth,
    /// Step function with `stages` discrete plateaus. Each plateau owns its
    /// right endpoint: with regrow 10s and 5 stages, ages 2/4/6/8/10s read
    /// 0, 0.25, 0.5, 0.75, 1.0.
    Stepped { stages: u32 },
}

impl GrowthCurve {
    /// Regrowth progress for a covered point of the given age
    pub fn progress(&self, age: f32, regrow_duration: f32) -> f32 {
        match *self {
            GrowthCurve::Smooth => (age / regrow_duration).clamp(0.0, 1.0),
            GrowthCurve::Stepped { stages } => {
                if stages < 2 {
                    return (age / regrow_duration).clamp(0.0, 1.0);
                }
                let step = regrow_duration / stages as f32;
                let index = ((age / step).ceil() - 1.0).max(0.0);
                (index / (stages - 1) as f32).clamp(0.0, 1.0)
            }
        }
    }
}

/// Evaluate the growth stage at `pos`.
///
/// Starts fully grown and takes the minimum progress over every active cut
/// disc covering the point, so the most recent overlapping cut dominates.
/// Events whose age has reached the regrow duration are inert even if the
/// ledger has not pruned them yet, which keeps this function and the pruning
/// policy independently safe.
pub fn growth_stage(
    pos: Vec2,
    events: &[CutEvent],
    now: f32,
    regrow_duration: f32,
    curve: GrowthCurve,
) -> f32 {
    let mut stage = 1.0_f32;
    for event in events {
        let age = now - event.cut_time;
        if age < 0.0 || age >= regrow_duration {
            continue;
        }
        if pos.distance(event.pos) < event.radius {
            stage = stage.min(curve.progress(age, regrow_duration));
        }
    }
    stage
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cut(x: f32, z: f32, radius: f32, t: f32) -> CutEvent {
        CutEvent {
            pos: Vec2::new(x, z),
            radius,
            cut_time: t,
        }
    }

    #[test]
    fn test_fully_grown_outside_all_cuts() {
        let events = [cut(0.0, 0.0, 2.0, 0.0), cut(10.0, 0.0, 1.0, 5.0)];
        let stage = growth_stage(Vec2::new(5.0, 0.0), &events, 6.0, 30.0, GrowthCurve::Smooth);
        assert_eq!(stage, 1.0);
    }

    #[test]
    fn test_fresh_cut_is_zero() {
        let events = [cut(0.0, 0.0, 2.0, 10.0)];
        let smooth = growth_stage(Vec2::ZERO, &events, 10.0, 30.0, GrowthCurve::Smooth);
        assert_eq!(smooth, 0.0);
        let stepped = growth_stage(
            Vec2::ZERO,
            &events,
            10.0,
            30.0,
            GrowthCurve::Stepped { stages: 5 },
        );
        assert_eq!(stepped, 0.0);
    }

    #[test]
    fn test_stepped_plateau_table() {
        // Cut at t=0, regrow 10s, 5 stages: queried at 2/4/6/8/10s
        let events = [cut(0.0, 0.0, 1.0, 0.0)];
        let curve = GrowthCurve::Stepped { stages: 5 };
        let expected = [(2.0, 0.0), (4.0, 0.25), (6.0, 0.5), (8.0, 0.75), (10.0, 1.0)];
        for (now, want) in expected {
            let got = growth_stage(Vec2::ZERO, &events, now, 10.0, curve);
            assert!(
                (got - want).abs() < 1e-6,
                "at t={now}: got {got}, want {want}"
            );
        }
        // Just past a boundary the next plateau starts
        let got = growth_stage(Vec2::ZERO, &events, 2.001, 10.0, curve);
        assert!((got - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_overlapping_cuts_take_minimum() {
        // Two cuts covering the origin: progress 0.3 and 0.7 at t=10
        let events = [cut(0.0, 0.0, 2.0, 7.0), cut(0.5, 0.0, 2.0, 3.0)];
        let stage = growth_stage(Vec2::ZERO, &events, 10.0, 10.0, GrowthCurve::Smooth);
        assert!((stage - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_expired_events_are_inert() {
        // Unpruned but fully regrown: must not affect the result
        let events = [cut(0.0, 0.0, 2.0, 0.0)];
        let stage = growth_stage(Vec2::ZERO, &events, 30.0, 30.0, GrowthCurve::Smooth);
        assert_eq!(stage, 1.0);
    }

    #[test]
    fn test_boundary_point_is_outside() {
        // The disc is open: distance == radius counts as uncovered
        let events = [cut(0.0, 0.0, 2.0, 0.0)];
        let stage = growth_stage(Vec2::new(2.0, 0.0), &events, 1.0, 30.0, GrowthCurve::Smooth);
        assert_eq!(stage, 1.0);
    }

    proptest! {
        #[test]
        fn prop_stage_in_unit_range(
            px in -50.0_f32..50.0,
            pz in -50.0_f32..50.0,
            cx in -50.0_f32..50.0,
            cz in -50.0_f32..50.0,
            radius in 0.1_f32..20.0,
            cut_t in 0.0_f32..100.0,
            dt in 0.0_f32..100.0,
        ) {
            let events = [cut(cx, cz, radius, cut_t)];
            for curve in [GrowthCurve::Smooth, GrowthCurve::Stepped { stages: 5 }] {
                let stage = growth_stage(Vec2::new(px, pz), &events, cut_t + dt, 30.0, curve);
                prop_assert!((0.0..=1.0).contains(&stage));
            }
        }

        #[test]
        fn prop_stage_monotone_in_time(
            px in -10.0_f32..10.0,
            pz in -10.0_f32..10.0,
            t1 in 0.0_f32..40.0,
            t2 in 0.0_f32..40.0,
        ) {
            let events = [
                cut(0.0, 0.0, 5.0, 0.0),
                cut(3.0, 3.0, 4.0, 1.0),
                cut(-2.0, 1.0, 3.0, 2.5),
            ];
            let (early, late) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            let pos = Vec2::new(px, pz);
            for curve in [GrowthCurve::Smooth, GrowthCurve::Stepped { stages: 5 }] {
                // Fixed ledger: regrowth only ever moves forward
                let a = growth_stage(pos, &events, 3.0 + early, 30.0, curve);
                let b = growth_stage(pos, &events, 3.0 + late, 30.0, curve);
                prop_assert!(b >= a - 1e-6);
            }
        }

        #[test]
        fn prop_stepped_never_ahead_of_smooth_next_plateau(
            age in 0.0_f32..30.0,
        ) {
            // Each stepped plateau sits within one stage-width of the smooth
            // ramp, which pins the shader's step function to the same clock.
            let stages = 5_u32;
            let events = [cut(0.0, 0.0, 2.0, 0.0)];
            let smooth = growth_stage(Vec2::ZERO, &events, age, 30.0, GrowthCurve::Smooth);
            let stepped = growth_stage(
                Vec2::ZERO,
                &events,
                age,
                30.0,
                GrowthCurve::Stepped { stages },
            );
            let plateau = 1.0 / (stages - 1) as f32;
            prop_assert!(stepped <= smooth * stages as f32 / (stages - 1) as f32 + 1e-6);
            prop_assert!(stepped + plateau + 1e-6 >= smooth);
        }
    }
}
