//! Reinhard color transfer tuned for fabric swatches
//!
//! The classic transfer maps each LAB channel of the source onto the target as
//! `μt + (x - μs) · σt/σs`. A solid target color has no spread of its own, so the target
//! spread is derived from the source instead, which keeps the weave visible. On top of that
//! the fine lightness detail is reapplied, shadows are darkened and desaturated, and chroma
//! is reduced so the result reads as dyed cloth rather than paint.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::stats::{AdaptiveMetrics, LabStats};
use crate::Result;
use crate::color::{self, LabColor, RgbColor};

/// Tuning knobs of the transfer
///
/// Values outside their nominal ranges are applied as given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReinhardConfig {
    /// Chroma multiplier, nominally 0.5 to 1.5
    pub saturation_multiplier: f64,
    /// Extra lightness spread, nominally 0 to 0.5
    pub contrast_boost: f64,
    /// Weight of the reapplied fine detail, nominally 0.5 to 2
    pub detail_amount: f64,
    /// Strength of the lightness S-curve, 0 disables it
    pub luminance_s_curve: f64,
    /// Lightness subtracted from every pixel, nominally 0 to 15
    pub darken_amount: f64,
    /// How much chroma shadows lose, nominally 0 to 1
    pub shadow_desaturation: f64,
    /// Rotation of the a-b plane in degrees
    pub hue_shift: f64,
}

impl Default for ReinhardConfig {
    fn default() -> Self {
        Self {
            saturation_multiplier: 0.85,
            contrast_boost: 0.15,
            detail_amount: 1.15,
            luminance_s_curve: 0.0,
            darken_amount: 5.0,
            shadow_desaturation: 0.6,
            hue_shift: 0.0,
        }
    }
}

impl ReinhardConfig {
    /// Load a preset from a JSON file, missing fields keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Color to dye with, either picked on screen or measured
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetColor {
    Lab(LabColor),
    Rgb(RgbColor),
}

impl TargetColor {
    /// LAB values are used as they are, RGB is converted
    pub fn to_lab(self) -> LabColor {
        match self {
            TargetColor::Lab(lab) => lab,
            TargetColor::Rgb(rgb) => color::rgb_to_lab(rgb),
        }
    }
}

impl From<LabColor> for TargetColor {
    fn from(lab: LabColor) -> Self {
        TargetColor::Lab(lab)
    }
}

impl From<RgbColor> for TargetColor {
    fn from(rgb: RgbColor) -> Self {
        TargetColor::Rgb(rgb)
    }
}

/// A transfer prepared for one source image and one target color
#[derive(Debug, Clone)]
pub struct ReinhardTransfer {
    source: LabStats,
    target: LabColor,
    target_std: [f64; 3],
    config: ReinhardConfig,
    /// Chroma boost for light sources dyed dark
    dark_boost: f64,
}

impl ReinhardTransfer {
    pub fn new(
        source: LabStats,
        metrics: &AdaptiveMetrics,
        target: LabColor,
        config: &ReinhardConfig,
    ) -> Self {
        let target_std = [
            (source.std_l * 0.8).max(5.0),
            (source.std_a * 0.3).max(0.1),
            (source.std_b * 0.3).max(0.1),
        ];
        let dark_boost = if metrics.is_light_image && target.l < 50.0 {
            1.0 + 0.3 * (50.0 - target.l) / 50.0
        } else {
            1.0
        };
        Self {
            source,
            target,
            target_std,
            config: *config,
            dark_boost,
        }
    }

    /// Map one source pixel, given its high-frequency lightness detail
    pub fn apply(&self, lab: LabColor, detail: f64) -> LabColor {
        let ReinhardConfig {
            saturation_multiplier,
            contrast_boost,
            detail_amount,
            luminance_s_curve,
            darken_amount,
            shadow_desaturation,
            hue_shift,
        } = self.config;
        let source = &self.source;
        let target = self.target;

        let mut l = target.l
            + (lab.l - source.mean_l)
                * (self.target_std[0] / source.std_l)
                * (1.0 + contrast_boost);
        if luminance_s_curve > 0.0 {
            let t = (l - target.l) / 50.0;
            l = target.l + 50.0 * t / (1.0 + t.abs() * luminance_s_curve);
        }
        // Less texture in the shadows
        l += detail * detail_amount * (l / 100.0).max(0.3);
        l -= darken_amount;

        let mut a = (target.a + (lab.a - source.mean_a) * (self.target_std[1] / source.std_a))
            * saturation_multiplier;
        let mut b = (target.b + (lab.b - source.mean_b) * (self.target_std[2] / source.std_b))
            * saturation_multiplier;

        if hue_shift != 0.0 {
            let (sin, cos) = hue_shift.to_radians().sin_cos();
            (a, b) = (a * cos - b * sin, a * sin + b * cos);
        }

        a *= self.dark_boost;
        b *= self.dark_boost;

        let l = l.clamp(color::L_RANGE.0, color::L_RANGE.1);
        if shadow_desaturation > 0.0 && l < 50.0 {
            let factor = 1.0 - (50.0 - l) / 50.0 * shadow_desaturation;
            a *= factor;
            b *= factor;
        }

        LabColor::new(l, a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mid_gray_source() -> (LabStats, AdaptiveMetrics) {
        let stats = LabStats::from_samples(&[
            LabColor::new(50.0, 0.0, 0.0),
            LabColor::new(60.0, 2.0, -2.0),
        ]);
        let metrics = AdaptiveMetrics::measure(&stats, &[]);
        (stats, metrics)
    }

    fn plain_config() -> ReinhardConfig {
        ReinhardConfig {
            saturation_multiplier: 1.0,
            contrast_boost: 0.0,
            detail_amount: 1.0,
            luminance_s_curve: 0.0,
            darken_amount: 0.0,
            shadow_desaturation: 0.0,
            hue_shift: 0.0,
        }
    }

    #[test]
    fn default_config_values() {
        let config = ReinhardConfig::default();
        assert_eq!(config.saturation_multiplier, 0.85);
        assert_eq!(config.contrast_boost, 0.15);
        assert_eq!(config.detail_amount, 1.15);
        assert_eq!(config.luminance_s_curve, 0.0);
        assert_eq!(config.darken_amount, 5.0);
        assert_eq!(config.shadow_desaturation, 0.6);
        assert_eq!(config.hue_shift, 0.0);
    }

    #[test]
    fn preset_json_fills_missing_fields() {
        let config: ReinhardConfig =
            serde_json::from_str(r#"{"saturationMultiplier": 1.2, "hueShift": -15}"#).unwrap();
        assert_eq!(config.saturation_multiplier, 1.2);
        assert_eq!(config.hue_shift, -15.0);
        assert_eq!(config.darken_amount, 5.0);
    }

    #[test]
    fn target_color_accepts_both_notations() {
        let lab: TargetColor = serde_json::from_str(r#"{"L": 40.0, "a": 10.0, "b": 5.0}"#).unwrap();
        assert_eq!(lab.to_lab(), LabColor::new(40.0, 10.0, 5.0));
        let rgb: TargetColor = serde_json::from_str(r#"{"r": 255, "g": 255, "b": 255}"#).unwrap();
        assert_eq!(rgb, TargetColor::Rgb(RgbColor::new(255, 255, 255)));
        assert!((rgb.to_lab().l - 100.0).abs() < 1e-6);
    }

    #[test]
    fn mean_pixel_lands_on_target() {
        let (stats, metrics) = mid_gray_source();
        let target = LabColor::new(45.0, 30.0, -20.0);
        let transfer = ReinhardTransfer::new(stats, &metrics, target, &plain_config());
        let mean = LabColor::new(stats.mean_l, stats.mean_a, stats.mean_b);
        let result = transfer.apply(mean, 0.0);
        assert!((result.l - 45.0).abs() < 1e-9);
        assert!((result.a - 30.0).abs() < 1e-9);
        assert!((result.b - -20.0).abs() < 1e-9);
    }

    #[test]
    fn darkens_and_desaturates_by_default() {
        let (stats, metrics) = mid_gray_source();
        let target = LabColor::new(60.0, 40.0, 20.0);
        let transfer = ReinhardTransfer::new(stats, &metrics, target, &ReinhardConfig::default());
        let mean = LabColor::new(stats.mean_l, stats.mean_a, stats.mean_b);
        let result = transfer.apply(mean, 0.0);
        assert!((result.l - 55.0).abs() < 1e-9);
        assert!((result.a - 34.0).abs() < 1e-9);
        assert!((result.b - 17.0).abs() < 1e-9);
    }

    #[test]
    fn shadows_lose_chroma() {
        let (stats, metrics) = mid_gray_source();
        let config = ReinhardConfig {
            shadow_desaturation: 0.5,
            ..plain_config()
        };
        let target = LabColor::new(25.0, 40.0, 0.0);
        let transfer = ReinhardTransfer::new(stats, &metrics, target, &config);
        let mean = LabColor::new(stats.mean_l, stats.mean_a, stats.mean_b);
        let result = transfer.apply(mean, 0.0);
        // (50 - 25) / 50 * 0.5 = 0.25 of the chroma is removed
        assert!((result.a - 30.0).abs() < 1e-9);
    }

    #[test]
    fn hue_shift_rotates_the_ab_plane() {
        let (stats, metrics) = mid_gray_source();
        let config = ReinhardConfig {
            hue_shift: 90.0,
            ..plain_config()
        };
        let transfer =
            ReinhardTransfer::new(stats, &metrics, LabColor::new(60.0, 30.0, 0.0), &config);
        let mean = LabColor::new(stats.mean_l, stats.mean_a, stats.mean_b);
        let result = transfer.apply(mean, 0.0);
        assert!(result.a.abs() < 1e-9);
        assert!((result.b - 30.0).abs() < 1e-9);
    }

    #[test]
    fn light_sources_dyed_dark_gain_chroma() {
        let stats = LabStats::from_samples(&[
            LabColor::new(80.0, 0.0, 0.0),
            LabColor::new(90.0, 0.0, 0.0),
        ]);
        let metrics = AdaptiveMetrics::measure(&stats, &[]);
        let transfer = ReinhardTransfer::new(
            stats,
            &metrics,
            LabColor::new(25.0, 20.0, 10.0),
            &plain_config(),
        );
        let mean = LabColor::new(stats.mean_l, stats.mean_a, stats.mean_b);
        let result = transfer.apply(mean, 0.0);
        assert!((result.a - 23.0).abs() < 1e-9);
        assert!((result.b - 11.5).abs() < 1e-9);
    }

    #[test]
    fn lightness_is_clamped() {
        let (stats, metrics) = mid_gray_source();
        let transfer = ReinhardTransfer::new(
            stats,
            &metrics,
            LabColor::new(98.0, 0.0, 0.0),
            &plain_config(),
        );
        let result = transfer.apply(LabColor::new(60.0, 0.0, 0.0), 40.0);
        assert_eq!(result.l, 100.0);
        let result = transfer.apply(LabColor::new(0.0, 0.0, 0.0), -400.0);
        assert_eq!(result.l, 0.0);
    }

    #[test]
    fn detail_follows_the_texture() {
        let (stats, metrics) = mid_gray_source();
        let transfer = ReinhardTransfer::new(
            stats,
            &metrics,
            LabColor::new(50.0, 0.0, 0.0),
            &plain_config(),
        );
        let mean = LabColor::new(stats.mean_l, stats.mean_a, stats.mean_b);
        let flat = transfer.apply(mean, 0.0);
        let raised = transfer.apply(mean, 4.0);
        // Detail is weighted by max(0.3, L / 100)
        assert!((raised.l - flat.l - 2.0).abs() < 1e-9);
    }
}
