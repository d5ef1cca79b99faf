use std::fmt;

use image::Rgba;
use palette::white_point::D65;
use serde::{Deserialize, Serialize};

pub use self::colorimeter::{Capture, PacketError};
pub use self::conversion::{
    chroma, hex_to_rgb, hsl_to_rgb, hue_angle, lab_to_hex, lab_to_rgb, rgb_to_hex, rgb_to_hsl,
    rgb_to_lab,
};
pub use self::difference::delta_e_2000;
pub(crate) use self::difference::lightness_weight;

pub mod colorimeter;
mod conversion;
mod difference;

/// Valid lightness range of a LAB color
pub const L_RANGE: (f64, f64) = (0.0, 100.0);
/// Valid range of the a and b axes of a LAB color
pub const AB_RANGE: (f64, f64) = (-128.0, 127.0);

/// CIE L*a*b* color relative to the D65 white point
///
/// Values outside [`L_RANGE`] and [`AB_RANGE`] are tolerated and stand for out-of-gamut colors.
/// Conversions back to RGB clamp the final channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabColor {
    #[serde(rename = "L", alias = "l")]
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl LabColor {
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Clamp all three channels into the valid LAB ranges
    pub fn clamped(self) -> Self {
        Self {
            l: self.l.clamp(L_RANGE.0, L_RANGE.1),
            a: self.a.clamp(AB_RANGE.0, AB_RANGE.1),
            b: self.b.clamp(AB_RANGE.0, AB_RANGE.1),
        }
    }

    /// Check whether all three channels are within the valid LAB ranges
    pub fn is_in_range(&self) -> bool {
        (L_RANGE.0..=L_RANGE.1).contains(&self.l)
            && (AB_RANGE.0..=AB_RANGE.1).contains(&self.a)
            && (AB_RANGE.0..=AB_RANGE.1).contains(&self.b)
    }
}

impl fmt::Display for LabColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L={:.2} a={:.2} b={:.2}", self.l, self.a, self.b)
    }
}

/// Interop with `palette`, part of the public API for callers using its color types
impl From<LabColor> for palette::Lab<D65, f64> {
    fn from(color: LabColor) -> Self {
        palette::Lab::new(color.l, color.a, color.b)
    }
}

impl From<palette::Lab<D65, f64>> for LabColor {
    fn from(color: palette::Lab<D65, f64>) -> Self {
        LabColor::new(color.l, color.a, color.b)
    }
}

/// 8-bit sRGB device color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Turn into an image pixel with the given alpha
    pub fn to_rgba(self, alpha: u8) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, alpha])
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl From<Rgba<u8>> for RgbColor {
    fn from(pixel: Rgba<u8>) -> Self {
        RgbColor::new(pixel[0], pixel[1], pixel[2])
    }
}

impl From<RgbColor> for Rgba<u8> {
    fn from(color: RgbColor) -> Self {
        color.to_rgba(u8::MAX)
    }
}

/// Interop with `palette`, part of the public API for callers using its color types
impl From<RgbColor> for palette::Srgb<u8> {
    fn from(color: RgbColor) -> Self {
        palette::Srgb::new(color.r, color.g, color.b)
    }
}

impl From<palette::Srgb<u8>> for RgbColor {
    fn from(color: palette::Srgb<u8>) -> Self {
        RgbColor::new(color.red, color.green, color.blue)
    }
}

/// Hue in degrees [0, 360), saturation and lightness in percent [0, 100]
///
/// Only used as an intermediate for manual adjustments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HslColor {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl HslColor {
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }
}

impl fmt::Display for HslColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({:.1}, {:.1}%, {:.1}%)", self.h, self.s, self.l)
    }
}
