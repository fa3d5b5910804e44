//! Squash-and-stretch fire animation
//!
//! A small state machine driven by a per-entity frame timer. Each step
//! reports the current phase, the render scale, and whether the shot should
//! happen on this exact frame - the caller performs the side effects, which
//! keeps the timing unit-testable without a render or audio stack.

use glam::Vec2;

use crate::consts::{ANIM_RECOVER_FRAMES, ANIM_SQUASH_FRAMES, ANIM_STRETCH_FRAMES, ANIM_TOTAL_FRAMES};

/// Phase of the fire animation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FirePhase {
    /// Not animating; scale is (1, 1)
    #[default]
    Idle,
    /// Compressing down before the shot
    Squash,
    /// Recoil stretch; the shot fires on the first frame of this phase
    Stretch,
    /// Easing back to rest
    Recover,
}

/// One step of the animation: current phase, render scale, and the
/// single-frame fire signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireFrame {
    pub phase: FirePhase,
    pub scale: Vec2,
    /// True exactly once per cycle, at local timer 16
    pub fire_now: bool,
}

/// Per-entity animation state
#[derive(Debug, Clone, Default)]
pub struct FireAnimation {
    active: bool,
    timer: u32,
    scale: Vec2,
}

impl FireAnimation {
    /// Start a new cycle. The caller resets its fire cooldown here, not at
    /// the moment the shot fires.
    pub fn begin(&mut self) {
        self.active = true;
        self.timer = 0;
    }

    pub fn active(&self) -> bool {
        self.active
    }

    /// Current render scale (x, y); (1, 1) while idle
    pub fn scale(&self) -> Vec2 {
        if self.active { self.scale } else { Vec2::ONE }
    }

    /// Advance one frame
    pub fn step(&mut self) -> FireFrame {
        if !self.active {
            self.scale = Vec2::ONE;
            return FireFrame {
                phase: FirePhase::Idle,
                scale: Vec2::ONE,
                fire_now: false,
            };
        }

        self.timer += 1;
        let t = self.timer;
        let mut fire_now = false;

        let phase = if t <= ANIM_SQUASH_FRAMES {
            let progress = t as f32 / ANIM_SQUASH_FRAMES as f32;
            // Compress to 90% height, widen to 110%
            self.scale = Vec2::new(1.0 + 0.1 * progress, 1.0 - 0.1 * progress);
            FirePhase::Squash
        } else if t == ANIM_SQUASH_FRAMES + 1 {
            // The one authoritative shot moment; scale holds at squash peak
            fire_now = true;
            FirePhase::Stretch
        } else if t <= ANIM_SQUASH_FRAMES + ANIM_STRETCH_FRAMES {
            let progress = (t - ANIM_SQUASH_FRAMES) as f32 / ANIM_STRETCH_FRAMES as f32;
            // From 90% height up to 110%, width the mirror image
            self.scale = Vec2::new(1.1 - 0.2 * progress, 0.9 + 0.2 * progress);
            FirePhase::Stretch
        } else if t < ANIM_TOTAL_FRAMES {
            let progress =
                (t - ANIM_SQUASH_FRAMES - ANIM_STRETCH_FRAMES) as f32 / ANIM_RECOVER_FRAMES as f32;
            self.scale = Vec2::new(0.9 + 0.1 * progress, 1.1 - 0.1 * progress);
            FirePhase::Recover
        } else {
            self.active = false;
            self.timer = 0;
            self.scale = Vec2::ONE;
            FirePhase::Idle
        };

        FireFrame {
            phase,
            scale: self.scale(),
            fire_now,
        }
    }

    /// Reset to idle (level restart)
    pub fn reset(&mut self) {
        self.active = false;
        self.timer = 0;
        self.scale = Vec2::ONE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_exactly_once_at_frame_16() {
        let mut anim = FireAnimation::default();
        anim.begin();

        let mut fire_frames = Vec::new();
        for frame in 1..=ANIM_TOTAL_FRAMES {
            if anim.step().fire_now {
                fire_frames.push(frame);
            }
        }
        assert_eq!(fire_frames, vec![ANIM_SQUASH_FRAMES + 1]);
        assert!(!anim.active(), "cycle should be over after 45 steps");
    }

    #[test]
    fn squash_interpolates_toward_wide_and_short() {
        let mut anim = FireAnimation::default();
        anim.begin();

        let first = anim.step();
        assert_eq!(first.phase, FirePhase::Squash);
        assert!(first.scale.x > 1.0 && first.scale.y < 1.0);

        for _ in 1..ANIM_SQUASH_FRAMES {
            anim.step();
        }
        let scale = anim.scale();
        assert!((scale.x - 1.1).abs() < 1e-5);
        assert!((scale.y - 0.9).abs() < 1e-5);
    }

    #[test]
    fn stretch_peaks_tall_then_recovers_to_rest() {
        let mut anim = FireAnimation::default();
        anim.begin();
        for _ in 0..(ANIM_SQUASH_FRAMES + ANIM_STRETCH_FRAMES) {
            anim.step();
        }
        let peak = anim.scale();
        assert!((peak.y - 1.1).abs() < 1e-5);
        assert!((peak.x - 0.9).abs() < 1e-5);

        for _ in 0..ANIM_RECOVER_FRAMES {
            anim.step();
        }
        assert!(!anim.active());
        assert_eq!(anim.scale(), Vec2::ONE);
    }

    #[test]
    fn idle_steps_are_inert() {
        let mut anim = FireAnimation::default();
        let frame = anim.step();
        assert_eq!(frame.phase, FirePhase::Idle);
        assert!(!frame.fire_now);
        assert_eq!(frame.scale, Vec2::ONE);
    }

    #[test]
    fn restarting_a_cycle_fires_again() {
        let mut anim = FireAnimation::default();
        for _ in 0..2 {
            anim.begin();
            let fired = (1..=ANIM_TOTAL_FRAMES)
                .filter(|_| anim.step().fire_now)
                .count();
            assert_eq!(fired, 1);
        }
    }
}
