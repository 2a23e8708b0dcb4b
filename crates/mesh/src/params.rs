//! User-tunable parameters and their slider mappings.
//!
//! Every control is a slider in `[0, 1]` mapped linearly onto a physical
//! range. Slider input is clamped before mapping.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SLIDER;

/// Linear mapping from slider space `[0, 1]` onto `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Map a slider value; out-of-range input is clamped.
    #[inline]
    pub fn map(&self, slider: f32) -> f32 {
        let t = if slider.is_nan() { DEFAULT_SLIDER } else { slider.clamp(0.0, 1.0) };
        self.min + (self.max - self.min) * t
    }

    /// Inverse of [`ParamRange::map`].
    #[inline]
    pub fn slider(&self, value: f32) -> f32 {
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn midpoint(&self) -> f32 {
        self.map(DEFAULT_SLIDER)
    }
}

/// Strength of the pull back to rest position.
pub const HOME_SPEED_RANGE: ParamRange = ParamRange::new(0.00001, 0.0260);
/// Per-tick velocity multiplier.
pub const DAMPING_RANGE: ParamRange = ParamRange::new(0.79, 0.995);

pub const BRIGHTNESS_RANGE: ParamRange = ParamRange::new(-0.5, 0.5);
pub const CONTRAST_RANGE: ParamRange = ParamRange::new(0.5, 1.5);
pub const SATURATION_RANGE: ParamRange = ParamRange::new(0.0, 2.0);
/// Colour levels per channel.
pub const POSTERIZE_RANGE: ParamRange = ParamRange::new(2.0, 32.0);

/// Physics parameters read by the stepper every tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimParams {
    pub home_speed: f32,
    pub damping: f32,
    /// When set the stepper does nothing; touches and sliders stay live.
    pub frozen: bool,
}

impl SimParams {
    pub fn set_home_speed(&mut self, slider: f32) {
        self.home_speed = HOME_SPEED_RANGE.map(slider);
    }

    pub fn set_damping(&mut self, slider: f32) {
        self.damping = DAMPING_RANGE.map(slider);
    }
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            home_speed: HOME_SPEED_RANGE.midpoint(),
            damping: DAMPING_RANGE.midpoint(),
            frozen: false,
        }
    }
}

/// Per-frame colour adjustments applied by the renderer. The simulation
/// only carries them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageAdjustments {
    pub effects_enabled: bool,
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub posterize: f32,
}

impl ImageAdjustments {
    pub fn set_brightness(&mut self, slider: f32) {
        self.brightness = BRIGHTNESS_RANGE.map(slider);
    }

    pub fn set_contrast(&mut self, slider: f32) {
        self.contrast = CONTRAST_RANGE.map(slider);
    }

    pub fn set_saturation(&mut self, slider: f32) {
        self.saturation = SATURATION_RANGE.map(slider);
    }

    pub fn set_posterize(&mut self, slider: f32) {
        self.posterize = POSTERIZE_RANGE.map(slider).round();
    }
}

impl Default for ImageAdjustments {
    fn default() -> Self {
        Self {
            effects_enabled: false,
            brightness: BRIGHTNESS_RANGE.midpoint(),
            contrast: CONTRAST_RANGE.midpoint(),
            saturation: SATURATION_RANGE.midpoint(),
            posterize: POSTERIZE_RANGE.midpoint(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_endpoints() {
        assert_eq!(HOME_SPEED_RANGE.map(0.0), 0.00001);
        assert!((HOME_SPEED_RANGE.map(1.0) - 0.0260).abs() < 1e-7);
        assert_eq!(DAMPING_RANGE.map(0.0), 0.79);
        assert!((DAMPING_RANGE.map(1.0) - 0.995).abs() < 1e-6);
    }

    #[test]
    fn test_slider_input_is_clamped() {
        assert_eq!(DAMPING_RANGE.map(-3.0), DAMPING_RANGE.map(0.0));
        assert_eq!(DAMPING_RANGE.map(7.0), DAMPING_RANGE.map(1.0));
        assert_eq!(DAMPING_RANGE.map(f32::NAN), DAMPING_RANGE.midpoint());
    }

    #[test]
    fn test_slider_inverse() {
        let v = DAMPING_RANGE.map(0.3);
        assert!((DAMPING_RANGE.slider(v) - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_defaults_are_midpoints() {
        let params = SimParams::default();
        assert!((params.home_speed - 0.013005).abs() < 1e-6);
        assert!((params.damping - 0.8925).abs() < 1e-6);
        assert!(!params.frozen);

        let adj = ImageAdjustments::default();
        assert!(!adj.effects_enabled);
        assert!(adj.brightness.abs() < 1e-6);
        assert!((adj.contrast - 1.0).abs() < 1e-6);
        assert!((adj.saturation - 1.0).abs() < 1e-6);
        assert_eq!(adj.posterize, 17.0);
    }

    #[test]
    fn test_posterize_levels_are_whole() {
        let mut adj = ImageAdjustments::default();
        adj.set_posterize(0.33);
        assert_eq!(adj.posterize, adj.posterize.round());
    }
}
