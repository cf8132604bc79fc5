//! Parametric drop motion
//!
//! An item falls from the ceiling along a closed-form path: the fallen
//! distance is a function of time alone, and the horizontal sway is a
//! function of fallen distance alone. Nothing here holds state, so the same
//! inputs always give the same position.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{ZIGZAG_AMPLITUDE, ZIGZAG_HALF_PERIOD};

/// Horizontal sway applied as a function of fallen distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShiftKind {
    /// Straight down
    #[default]
    None,
    /// `sin(radians(d))`, a gentle one-unit wobble
    Sine,
    /// Triangle wave in `[-A/2, A/2]`, reversing every half-period
    Zigzag,
}

impl ShiftKind {
    /// All variants, in selection order
    pub const ALL: [ShiftKind; 3] = [ShiftKind::None, ShiftKind::Sine, ShiftKind::Zigzag];

    /// Horizontal offset for a fallen distance `d`
    pub fn offset(self, d: f32) -> f32 {
        match self {
            ShiftKind::None => 0.0,
            ShiftKind::Sine => d.to_radians().sin(),
            ShiftKind::Zigzag => zigzag(d, ZIGZAG_HALF_PERIOD, ZIGZAG_AMPLITUDE),
        }
    }
}

/// Triangle wave: ramps up across even half-periods, down across odd ones
#[inline]
pub fn zigzag(d: f32, half_period: f32, amplitude: f32) -> f32 {
    let phase = d.rem_euclid(half_period);
    let sign = if (d / half_period).floor().rem_euclid(2.0) == 0.0 {
        1.0
    } else {
        -1.0
    };
    -sign * amplitude / 2.0 + sign * amplitude * (phase / half_period)
}

/// Motion parameters of one falling item. Fixed once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropProfile {
    /// Initial fall speed (units/sec)
    pub speed: f32,
    /// Constant acceleration (units/sec², 0 for uniform motion)
    pub acceleration: f32,
    /// Sway applied along the way
    pub shift: ShiftKind,
}

impl DropProfile {
    pub fn new(speed: f32, acceleration: f32, shift: ShiftKind) -> Self {
        Self {
            speed,
            acceleration,
            shift,
        }
    }

    /// Whether the profile can drive an item (finite, non-negative values)
    pub fn is_usable(&self) -> bool {
        self.speed.is_finite()
            && self.speed >= 0.0
            && self.acceleration.is_finite()
            && self.acceleration >= 0.0
    }

    /// Distance fallen after `elapsed` seconds
    pub fn fallen_distance(&self, elapsed: f32) -> f32 {
        if self.acceleration == 0.0 {
            self.speed * elapsed
        } else {
            self.speed * elapsed + 0.5 * self.acceleration * elapsed * elapsed
        }
    }

    /// World position after `elapsed` seconds, for an item released at
    /// `origin_x` from `drop_height`
    pub fn position(&self, elapsed: f32, origin_x: f32, drop_height: f32) -> Vec2 {
        let d = self.fallen_distance(elapsed);
        Vec2::new(self.shift.offset(d) + origin_x, drop_height - d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_uniform_drop_position() {
        let profile = DropProfile::new(30.0, 0.0, ShiftKind::None);
        let pos = profile.position(2.0, 0.0, 500.0);
        assert_eq!(pos.y, 440.0);
        assert_eq!(pos.x, 0.0);
    }

    #[test]
    fn test_accelerated_drop_distance() {
        let profile = DropProfile::new(30.0, 50.0, ShiftKind::None);
        // 30*2 + 0.5*50*4
        assert!((profile.fallen_distance(2.0) - 160.0).abs() < 1e-4);
    }

    #[test]
    fn test_sine_shift() {
        assert!(ShiftKind::Sine.offset(0.0).abs() < 1e-6);
        assert!((ShiftKind::Sine.offset(90.0) - 1.0).abs() < 1e-6);
        assert!(ShiftKind::Sine.offset(180.0).abs() < 1e-5);
    }

    #[test]
    fn test_zigzag_corners() {
        assert_eq!(ShiftKind::Zigzag.offset(0.0), -75.0);
        assert_eq!(ShiftKind::Zigzag.offset(50.0), 0.0);
        // Continuous at the half-period: rising ramp ends where falling ramp starts
        assert!((ShiftKind::Zigzag.offset(99.999) - 75.0).abs() < 0.01);
        assert_eq!(ShiftKind::Zigzag.offset(100.0), 75.0);
        assert_eq!(ShiftKind::Zigzag.offset(150.0), 0.0);
        assert_eq!(ShiftKind::Zigzag.offset(200.0), -75.0);
    }

    #[test]
    fn test_unusable_profiles() {
        assert!(!DropProfile::new(-1.0, 0.0, ShiftKind::None).is_usable());
        assert!(!DropProfile::new(f32::NAN, 0.0, ShiftKind::None).is_usable());
        assert!(!DropProfile::new(30.0, f32::INFINITY, ShiftKind::None).is_usable());
        assert!(DropProfile::new(0.0, 0.0, ShiftKind::None).is_usable());
    }

    proptest! {
        #[test]
        fn prop_uniform_distance_is_linear(speed in 0.0f32..200.0, t in 0.0f32..60.0) {
            let profile = DropProfile::new(speed, 0.0, ShiftKind::Sine);
            prop_assert_eq!(profile.fallen_distance(t), speed * t);
        }

        #[test]
        fn prop_accelerated_distance(speed in 0.0f32..200.0, a in 0.1f32..100.0, t in 0.0f32..60.0) {
            let profile = DropProfile::new(speed, a, ShiftKind::None);
            let expected = speed * t + 0.5 * a * t * t;
            prop_assert!((profile.fallen_distance(t) - expected).abs() <= expected.abs() * 1e-5 + 1e-4);
        }

        #[test]
        fn prop_zigzag_bounded(d in 0.0f32..100_000.0) {
            let x = ShiftKind::Zigzag.offset(d);
            prop_assert!((-75.0..=75.0).contains(&x));
        }

        #[test]
        fn prop_zigzag_mirrors_each_half_period(d in 0.0f32..10_000.0) {
            let a = ShiftKind::Zigzag.offset(d);
            let b = ShiftKind::Zigzag.offset(d + 100.0);
            let c = ShiftKind::Zigzag.offset(d + 200.0);
            prop_assert!((a + b).abs() < 0.05);
            prop_assert!((a - c).abs() < 0.05);
        }

        #[test]
        fn prop_no_shift_keeps_origin(origin in -500.0f32..500.0, t in 0.0f32..60.0) {
            let profile = DropProfile::new(45.0, 50.0, ShiftKind::None);
            prop_assert_eq!(profile.position(t, origin, 1000.0).x, origin);
        }
    }
}
