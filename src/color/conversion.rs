//! Conversions between sRGB, CIE LAB (D65) and HSL, plus the `#RRGGBB` codec
//!
//! The constants follow the classic CIE formulation (break point 0.008856, linear slope 7.787)
//! rather than the exact rational ones, so that values agree with colors already stored in
//! the catalog.

use super::{HslColor, LabColor, RgbColor};

/// D65 reference white in XYZ, scaled to Y = 100
const D65_WHITE: [f64; 3] = [95.047, 100.0, 108.883];

/// Break point of the piecewise LAB transfer function
const LAB_EPSILON: f64 = 0.008856;
/// Slope of the linear segment of the LAB transfer function
const LAB_SLOPE: f64 = 7.787;
const LAB_OFFSET: f64 = 16.0 / 116.0;

/// Linear sRGB to XYZ (D65)
const RGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.1191920, 0.9503041],
];

/// XYZ (D65) to linear sRGB
const XYZ_TO_RGB: [[f64; 3]; 3] = [
    [3.2406, -1.5372, -0.4986],
    [-0.9689, 1.8758, 0.0415],
    [0.0557, -0.2040, 1.0570],
];

/// Parse a strict `#RRGGBB` string (either case)
///
/// Returns `None` when the leading `#` is missing, the length is not exactly seven characters
/// or any digit pair is not hexadecimal.
pub fn hex_to_rgb(hex: &str) -> Option<RgbColor> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |start: usize| u8::from_str_radix(&digits[start..start + 2], 16).ok();
    Some(RgbColor::new(channel(0)?, channel(2)?, channel(4)?))
}

/// Format as uppercase `#RRGGBB`
pub fn rgb_to_hex(rgb: RgbColor) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb.r, rgb.g, rgb.b)
}

/// Convert LAB to sRGB, clamping the gamma-encoded channels into [0, 255]
pub fn lab_to_rgb(lab: LabColor) -> RgbColor {
    let fy = (lab.l + 16.0) / 116.0;
    let fx = lab.a / 500.0 + fy;
    let fz = fy - lab.b / 200.0;

    let xyz = [
        lab_f_inverse(fx) * D65_WHITE[0] / 100.0,
        lab_f_inverse(fy) * D65_WHITE[1] / 100.0,
        lab_f_inverse(fz) * D65_WHITE[2] / 100.0,
    ];
    let [r, g, b] = multiply(&XYZ_TO_RGB, xyz).map(gamma_encode);

    RgbColor::new(to_channel(r), to_channel(g), to_channel(b))
}

/// Convert sRGB to LAB, clamping the result into the valid LAB ranges
pub fn rgb_to_lab(rgb: RgbColor) -> LabColor {
    let linear = [rgb.r, rgb.g, rgb.b].map(|channel| gamma_decode(f64::from(channel) / 255.0));
    let [x, y, z] = multiply(&RGB_TO_XYZ, linear);

    let fx = lab_f(x / (D65_WHITE[0] / 100.0));
    let fy = lab_f(y / (D65_WHITE[1] / 100.0));
    let fz = lab_f(z / (D65_WHITE[2] / 100.0));

    LabColor::new(116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz)).clamped()
}

/// Convert LAB straight to `#RRGGBB`
pub fn lab_to_hex(lab: LabColor) -> String {
    rgb_to_hex(lab_to_rgb(lab))
}

/// Hue angle of the a-b plane in degrees [0, 360)
///
/// 0° is red (+a), 90° yellow (+b), 180° green (-a) and 270° blue (-b).
pub fn hue_angle(lab: LabColor) -> f64 {
    let degrees = lab.b.atan2(lab.a).to_degrees().rem_euclid(360.0);
    // A tiny negative angle rounds up to a full turn
    if degrees >= 360.0 { 0.0 } else { degrees }
}

/// Chroma, the distance from the neutral axis in the a-b plane
pub fn chroma(lab: LabColor) -> f64 {
    lab.a.hypot(lab.b)
}

pub fn rgb_to_hsl(rgb: RgbColor) -> HslColor {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    if max == min {
        return HslColor::new(0.0, 0.0, l * 100.0);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let sector = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    HslColor::new(sector * 60.0, s * 100.0, l * 100.0)
}

pub fn hsl_to_rgb(hsl: HslColor) -> RgbColor {
    let h = hsl.h / 360.0;
    let s = hsl.s / 100.0;
    let l = hsl.l / 100.0;

    // Achromatic, the hue is meaningless
    if s == 0.0 {
        let gray = to_channel(l);
        return RgbColor::new(gray, gray, gray);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    RgbColor::new(
        to_channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
        to_channel(hue_to_rgb(p, q, h)),
        to_channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
    )
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn lab_f(t: f64) -> f64 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        LAB_SLOPE * t + LAB_OFFSET
    }
}

fn lab_f_inverse(t: f64) -> f64 {
    let cube = t * t * t;
    if cube > LAB_EPSILON {
        cube
    } else {
        (t - LAB_OFFSET) / LAB_SLOPE
    }
}

fn gamma_encode(linear: f64) -> f64 {
    if linear > 0.0031308 {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    } else {
        12.92 * linear
    }
}

fn gamma_decode(encoded: f64) -> f64 {
    if encoded > 0.04045 {
        ((encoded + 0.055) / 1.055).powf(2.4)
    } else {
        encoded / 12.92
    }
}

fn multiply(matrix: &[[f64; 3]; 3], vector: [f64; 3]) -> [f64; 3] {
    matrix.map(|row| row[0] * vector[0] + row[1] * vector[1] + row[2] * vector[2])
}

/// Scale a unit value to 0-255, rounding first and clamping after
fn to_channel(unit: f64) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}
