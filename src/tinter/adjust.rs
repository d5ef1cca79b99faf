use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::color::{self, LabColor, RgbColor};

/// Midpoint the contrast adjustment pivots around
const CONTRAST_PIVOT: f64 = 128.0;

/// Manual corrections applied on top of a tinted color
///
/// Hue is in degrees (nominally -180 to 180), the others in percent (nominally -100 to 100).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Adjustments {
    pub hue: f64,
    pub saturation: f64,
    pub brightness: f64,
    pub contrast: f64,
}

impl Adjustments {
    pub fn is_identity(&self) -> bool {
        self.hue == 0.0 && self.saturation == 0.0 && self.brightness == 0.0 && self.contrast == 0.0
    }
}

/// Convert a LAB color for display with the manual corrections applied
///
/// Without corrections this is exactly [`color::lab_to_rgb`].
pub fn apply_adjustments(lab: LabColor, adjustments: &Adjustments) -> RgbColor {
    let rgb = color::lab_to_rgb(lab);
    if adjustments.is_identity() {
        return rgb;
    }
    adjust_rgb(rgb, adjustments)
}

/// Shift hue and saturation in HSL, then scale brightness and contrast per channel
pub fn adjust_rgb(rgb: RgbColor, adjustments: &Adjustments) -> RgbColor {
    let mut hsl = color::rgb_to_hsl(rgb);
    hsl.h = (hsl.h + adjustments.hue).rem_euclid(360.0);
    hsl.s = (hsl.s + adjustments.saturation).clamp(0.0, 100.0);
    let shifted = color::hsl_to_rgb(hsl);

    let brightness = 1.0 + adjustments.brightness / 100.0;
    let contrast = (100.0 + adjustments.contrast) / 100.0;
    let channel = |value: u8| {
        let value = (f64::from(value) * brightness).clamp(0.0, 255.0);
        let value = (CONTRAST_PIVOT + (value - CONTRAST_PIVOT) * contrast).clamp(0.0, 255.0);
        value.round() as u8
    };

    RgbColor::new(channel(shifted.r), channel(shifted.g), channel(shifted.b))
}

/// Apply the corrections to every visible pixel of an image in place
pub fn adjust_image(image: &mut RgbaImage, adjustments: &Adjustments) {
    if adjustments.is_identity() {
        return;
    }
    for pixel in image.pixels_mut().filter(|pixel| pixel[3] != 0) {
        *pixel = adjust_rgb(RgbColor::from(*pixel), adjustments).to_rgba(pixel[3]);
    }
}
