//! Tuning for the carousel engine
//!
//! Values are unit-agnostic pixels per event / per frame, matching how the
//! engine integrates drag and momentum: velocity is a displacement applied
//! once per frame, not a per-second rate.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_AUTO_ADVANCE_MS: u64 = 4_000;
pub const DEFAULT_DRAG_GAIN: f32 = 1.5;
pub const DEFAULT_DECAY: f32 = 0.95;
pub const DEFAULT_MIN_VELOCITY: f32 = 0.5;
/// ~60fps frame pacing for the momentum loop.
pub const DEFAULT_FRAME_MS: u64 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Period (ms) of the auto-advance timer.
    pub auto_advance_ms: u64,
    /// Multiplier from pointer displacement to scroll displacement.
    pub drag_gain: f32,
    /// Per-frame multiplicative velocity decay during momentum, in (0, 1).
    pub decay: f32,
    /// Momentum stops once |velocity| drops to or below this value.
    pub min_velocity: f32,
    /// Frame interval (ms) for schedulers without a native frame clock.
    pub frame_ms: u64,
    /// When set, auto-advance only runs while the mounted viewport is at most
    /// this wide. `None` runs it at every width.
    pub auto_advance_max_viewport: Option<f32>,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            auto_advance_ms: DEFAULT_AUTO_ADVANCE_MS,
            drag_gain: DEFAULT_DRAG_GAIN,
            decay: DEFAULT_DECAY,
            min_velocity: DEFAULT_MIN_VELOCITY,
            frame_ms: DEFAULT_FRAME_MS,
            auto_advance_max_viewport: None,
        }
    }
}

impl CarouselConfig {
    pub fn auto_advance_interval(&self) -> Duration {
        Duration::from_millis(self.auto_advance_ms.max(1))
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }

    /// Whether auto-advance is allowed for a viewport of the given width.
    pub fn auto_advance_enabled_for(&self, viewport_extent: f32) -> bool {
        match self.auto_advance_max_viewport {
            Some(max) => viewport_extent <= max,
            None => true,
        }
    }

    /// Upper bound on momentum frames for an initial velocity `v0`.
    ///
    /// Returns 0 when `v0` is already at or under the stop threshold.
    pub fn momentum_step_bound(&self, v0: f32) -> u32 {
        let v0 = v0.abs();
        if v0 <= self.min_velocity {
            return 0;
        }
        let steps = ((self.min_velocity / v0).ln() / self.decay.ln()).ceil();
        steps.max(1.0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_values() {
        let cfg = CarouselConfig::default();
        assert_eq!(cfg.auto_advance_interval(), Duration::from_millis(4_000));
        assert_eq!(cfg.drag_gain, 1.5);
        assert_eq!(cfg.decay, 0.95);
        assert_eq!(cfg.min_velocity, 0.5);
        assert!(cfg.auto_advance_enabled_for(4096.0));
    }

    #[test]
    fn viewport_gate_only_applies_when_configured() {
        let cfg = CarouselConfig {
            auto_advance_max_viewport: Some(768.0),
            ..Default::default()
        };
        assert!(cfg.auto_advance_enabled_for(375.0));
        assert!(cfg.auto_advance_enabled_for(768.0));
        assert!(!cfg.auto_advance_enabled_for(1280.0));
    }

    #[test]
    fn step_bound_for_reference_fling() {
        let cfg = CarouselConfig::default();
        // ln(0.05) / ln(0.95) = 58.4..
        assert_eq!(cfg.momentum_step_bound(10.0), 59);
        assert_eq!(cfg.momentum_step_bound(-10.0), 59);
        assert_eq!(cfg.momentum_step_bound(0.4), 0);
    }
}
