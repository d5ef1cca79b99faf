//! Linshang LS173 colorimeter support
//!
//! The LS173 reads slightly dark and green-blue against a calibrated white tile. The offsets
//! below are the bias measured for that device and are added to every raw reading. Support for
//! another device means another named set of offsets, not a fitted transform.

use derive_more::Display;

use super::{LabColor, lab_to_hex};

/// Lightness bias of the LS173 white point
pub const L_OFFSET: f64 = 2.6;
/// Red-green bias of the LS173 white point
pub const A_OFFSET: f64 = 0.69;
/// Yellow-blue bias of the LS173 white point
pub const B_OFFSET: f64 = 0.30;

/// Header of an LS173 measurement notification
pub const PACKET_HEADER: [u8; 2] = [0xAB, 0x44];
/// Bytes needed to reach the last LAB field
pub const PACKET_MIN_LEN: usize = 14;
/// Bytes of one L, a, b triple
const TRIPLE_LEN: usize = 6;
/// Readings at or below this on every axis are taken as empty bytes
const NOISE_FLOOR: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Display)]
pub enum PacketError {
    #[display("packet has {_0} bytes, at least 14 are needed")]
    TooShort(usize),
    #[display("packet header {_0:02X} {_1:02X} is not a measurement")]
    BadHeader(u8, u8),
    #[display("measurement {_0} is outside the LAB range")]
    OutOfRange(LabColor),
    #[display("no LAB measurement found in {_0} bytes")]
    NoMeasurement(usize),
}

impl std::error::Error for PacketError {}

/// A measurement taken with the colorimeter
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    /// Compensated value, the one to store and compare
    pub lab: LabColor,
    /// Value as reported by the device
    pub raw: LabColor,
    pub hex: String,
}

/// Add the fixed LS173 calibration offsets and clamp into the LAB ranges
///
/// Not idempotent: compensating twice shifts twice.
pub fn compensate(lab: LabColor) -> LabColor {
    LabColor::new(lab.l + L_OFFSET, lab.a + A_OFFSET, lab.b + B_OFFSET).clamped()
}

/// Decode the raw LAB reading from an LS173 notification
///
/// L is an unsigned and a, b are signed little-endian 16-bit values in hundredths, at offsets
/// 8, 10 and 12.
pub fn decode_packet(bytes: &[u8]) -> Result<LabColor, PacketError> {
    if bytes.len() < PACKET_MIN_LEN {
        return Err(PacketError::TooShort(bytes.len()));
    }
    if bytes[..2] != PACKET_HEADER {
        return Err(PacketError::BadHeader(bytes[0], bytes[1]));
    }

    let l = f64::from(u16::from_le_bytes([bytes[8], bytes[9]])) / 100.0;
    let a = f64::from(i16::from_le_bytes([bytes[10], bytes[11]])) / 100.0;
    let b = f64::from(i16::from_le_bytes([bytes[12], bytes[13]])) / 100.0;

    let lab = LabColor::new(l, a, b);
    if !lab.is_in_range() {
        return Err(PacketError::OutOfRange(lab));
    }
    Ok(LabColor::new(hundredths(l), hundredths(a), hundredths(b)))
}

/// Look for the first plausible L, a, b triple at any byte offset
///
/// Used for notifications that do not carry the LS173 header. The same little-endian layout is
/// assumed, a and b may reach 128, and an all-near-zero triple is skipped.
pub fn scan_measurement(bytes: &[u8]) -> Option<LabColor> {
    bytes.windows(TRIPLE_LEN).find_map(|window| {
        let l = f64::from(u16::from_le_bytes([window[0], window[1]])) / 100.0;
        let a = f64::from(i16::from_le_bytes([window[2], window[3]])) / 100.0;
        let b = f64::from(i16::from_le_bytes([window[4], window[5]])) / 100.0;

        let plausible = (0.0..=100.0).contains(&l)
            && (-128.0..=128.0).contains(&a)
            && (-128.0..=128.0).contains(&b);
        let empty = l <= NOISE_FLOOR && a.abs() <= NOISE_FLOOR && b.abs() <= NOISE_FLOOR;
        (plausible && !empty).then(|| LabColor::new(hundredths(l), hundredths(a), hundredths(b)))
    })
}

/// Decode an LS173 notification, falling back to [`scan_measurement`] when it does not parse
pub fn read_measurement(bytes: &[u8]) -> Result<LabColor, PacketError> {
    decode_packet(bytes)
        .or_else(|_| scan_measurement(bytes).ok_or(PacketError::NoMeasurement(bytes.len())))
}

/// Read a notification and compensate it
pub fn capture(bytes: &[u8]) -> Result<Capture, PacketError> {
    let raw = read_measurement(bytes)?;
    let lab = compensate(raw);
    Ok(Capture {
        lab,
        raw,
        hex: lab_to_hex(lab),
    })
}

fn hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
