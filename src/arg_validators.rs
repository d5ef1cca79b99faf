use ::color::{AlphaColor, ParseError};

use crate::color::{LabColor, RgbColor};
use crate::tinter::TargetColor;

pub(crate) fn validate_threshold(value: &str) -> Result<f64, String> {
    let num = value
        .parse::<f64>()
        .map_err(|_| "Not a valid floating point number".to_string())?;
    if !num.is_finite() || num < 0.0 {
        return Err("Number must be finite and not negative".to_string());
    }
    Ok(num)
}

pub(crate) fn validate_max_size(value: &str) -> Result<u32, String> {
    let num = value
        .parse::<u32>()
        .map_err(|_| "Not a valid whole number".to_string())?;
    if num == 0 {
        return Err("Number must be greater than 0".to_string());
    }
    Ok(num)
}

/// Either an `L,a,b` triple or any CSS color
pub(crate) fn validate_color(value: &str) -> Result<TargetColor, String> {
    if value.contains(',') && !value.contains('(') {
        return validate_lab_color(value).map(TargetColor::Lab);
    }
    validate_rgb_color(value).map(TargetColor::Rgb)
}

pub(crate) fn validate_rgb_color(value: &str) -> Result<RgbColor, String> {
    match parse_color(value) {
        Ok(color) => Ok(color),
        Err(e) => Err(e.to_string()),
    }
}

pub(crate) fn validate_lab_color(value: &str) -> Result<LabColor, String> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| "LAB values must be numbers".to_string())?;
    match parts[..] {
        [l, a, b] if parts.iter().all(|part| part.is_finite()) => Ok(LabColor::new(l, a, b)),
        [_, _, _] => Err("LAB values must be finite".to_string()),
        _ => Err("Expected three values like 52.1,-3.4,18".to_string()),
    }
}

/// A run of bytes given as hex on the command line
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HexBytes(pub(crate) Vec<u8>);

/// Bytes written as hex, optionally separated by spaces or colons
pub(crate) fn validate_hex_bytes(value: &str) -> Result<HexBytes, String> {
    let digits: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    if !digits.is_ascii() {
        return Err("Hex bytes may only contain the digits 0-9 and A-F".to_string());
    }
    if digits.len() % 2 != 0 {
        return Err("Hex bytes need an even number of digits".to_string());
    }
    (0..digits.len())
        .step_by(2)
        .map(|start| {
            u8::from_str_radix(&digits[start..start + 2], 16).map_err(|e| e.to_string())
        })
        .collect::<Result<Vec<u8>, String>>()
        .map(HexBytes)
}

/// Parse a CSS color string, like #RRGGBB or rgb(r, g, b)
fn parse_color(color: &str) -> Result<RgbColor, ParseError> {
    let color = ::color::parse_color(color)?;
    let color: AlphaColor<::color::Srgb> = color.to_alpha_color();
    let [r, g, b, _] = color.to_rgba8().to_u8_array();
    Ok(RgbColor::new(r, g, b))
}
