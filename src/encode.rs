//! Coordinate packing for the device.
//!
//! Three modes:
//! - integers, in the narrowest exact fixed-width array
//! - 32-bit floats
//! - a plain decimal list (3 places)
//!
//! Packed buffers are little-endian and carried with an explicit
//! [`ElementType`] tag, so a reader never has to guess the layout.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::config::NumberFormat;
use crate::error::ConvertError;

/// Element layout of an [`EncodedBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    F32,
}

/// Integer layouts in selection priority order, with their ranges.
const INTEGER_TYPES: [(ElementType, f64, f64); 6] = [
    (ElementType::U8, 0.0, u8::MAX as f64),
    (ElementType::I8, i8::MIN as f64, i8::MAX as f64),
    (ElementType::U16, 0.0, u16::MAX as f64),
    (ElementType::I16, i16::MIN as f64, i16::MAX as f64),
    (ElementType::U32, 0.0, u32::MAX as f64),
    (ElementType::I32, i32::MIN as f64, i32::MAX as f64),
];

impl ElementType {
    /// Typed-array constructor used to rebuild the buffer on the device.
    pub fn array_name(self) -> &'static str {
        match self {
            ElementType::U8 => "Uint8Array",
            ElementType::I8 => "Int8Array",
            ElementType::U16 => "Uint16Array",
            ElementType::I16 => "Int16Array",
            ElementType::U32 => "Uint32Array",
            ElementType::I32 => "Int32Array",
            ElementType::F32 => "Float32Array",
        }
    }

    pub fn byte_width(self) -> usize {
        match self {
            ElementType::U8 | ElementType::I8 => 1,
            ElementType::U16 | ElementType::I16 => 2,
            ElementType::U32 | ElementType::I32 | ElementType::F32 => 4,
        }
    }

    /// First integer layout whose range holds `[min, max]`.
    fn narrowest_integer(min: f64, max: f64) -> Option<ElementType> {
        INTEGER_TYPES
            .iter()
            .find(|&&(_, lo, hi)| min >= lo && max <= hi)
            .map(|&(ty, _, _)| ty)
    }
}

/// Raw little-endian bytes plus the layout needed to read them back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBuffer {
    element_type: ElementType,
    bytes: Vec<u8>,
}

impl EncodedBuffer {
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of encoded values.
    pub fn len(&self) -> usize {
        self.bytes.len() / self.element_type.byte_width()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// Expression that rebuilds this buffer on the device, e.g.
    /// `new Uint8Array(E.toArrayBuffer(atob("AAE=")))`.
    pub fn to_expression(&self) -> String {
        format!(
            "new {}(E.toArrayBuffer(atob(\"{}\")))",
            self.element_type.array_name(),
            self.to_base64()
        )
    }

    /// Read the values back according to the element tag.
    pub fn decode(&self) -> Vec<f64> {
        let bytes = &self.bytes;
        match self.element_type {
            ElementType::U8 => bytes.iter().map(|&b| b as f64).collect(),
            ElementType::I8 => bytes.iter().map(|&b| b as i8 as f64).collect(),
            ElementType::U16 => bytes
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]) as f64)
                .collect(),
            ElementType::I16 => bytes
                .chunks_exact(2)
                .map(|c| i16::from_le_bytes([c[0], c[1]]) as f64)
                .collect(),
            ElementType::U32 => bytes
                .chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]) as f64)
                .collect(),
            ElementType::I32 => bytes
                .chunks_exact(4)
                .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]) as f64)
                .collect(),
            ElementType::F32 => bytes
                .chunks_exact(4)
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]) as f64)
                .collect(),
        }
    }
}

// ── Encoders ─────────────────────────────────────────────

/// Round half toward +∞, matching the device tooling's rounding.
/// Shared by the integer and decimal modes.
fn round_half_up(v: f64) -> f64 {
    let floor = v.floor();
    if v - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Round to integers and pack into the narrowest exact layout.
///
/// Values that round outside the signed 32-bit range (or are not finite)
/// give [`ConvertError::RangeExceeded`].
pub fn encode_integers(values: &[f64]) -> Result<EncodedBuffer, ConvertError> {
    let rounded: Vec<f64> = values.iter().map(|&v| round_half_up(v)).collect();
    let (min, max) = rounded
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if rounded.is_empty() {
        return Ok(EncodedBuffer {
            element_type: ElementType::U8,
            bytes: Vec::new(),
        });
    }
    if rounded.iter().any(|v| !v.is_finite()) {
        return Err(ConvertError::RangeExceeded { min, max });
    }
    let element_type = ElementType::narrowest_integer(min, max)
        .ok_or(ConvertError::RangeExceeded { min, max })?;

    let mut bytes = Vec::with_capacity(rounded.len() * element_type.byte_width());
    for &v in &rounded {
        let v = v as i64;
        match element_type {
            ElementType::U8 => bytes.push(v as u8),
            ElementType::I8 => bytes.push(v as i8 as u8),
            ElementType::U16 => bytes.extend_from_slice(&(v as u16).to_le_bytes()),
            ElementType::I16 => bytes.extend_from_slice(&(v as i16).to_le_bytes()),
            ElementType::U32 => bytes.extend_from_slice(&(v as u32).to_le_bytes()),
            ElementType::I32 => bytes.extend_from_slice(&(v as i32).to_le_bytes()),
            ElementType::F32 => unreachable!("float layout is never chosen for integers"),
        }
    }
    Ok(EncodedBuffer {
        element_type,
        bytes,
    })
}

/// Pack as 32-bit floats.
pub fn encode_floats(values: &[f64]) -> EncodedBuffer {
    EncodedBuffer {
        element_type: ElementType::F32,
        bytes: values
            .iter()
            .flat_map(|&v| (v as f32).to_le_bytes())
            .collect(),
    }
}

/// Decimal list with 3 places, e.g. `[1.5,-2,0.333]`.
/// Non-finite values are written as `null`.
pub fn encode_decimal(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(|&v| format_decimal(v)).collect();
    format!("[{}]", items.join(","))
}

/// Above this magnitude an f64 has no fractional digits left to round.
const DECIMAL_EXACT_LIMIT: f64 = 1e15;

fn format_decimal(v: f64) -> String {
    if !v.is_finite() {
        return "null".to_string();
    }
    let rounded = if v.abs() < DECIMAL_EXACT_LIMIT {
        round_half_up(v * 1000.0) / 1000.0
    } else {
        v
    };
    if rounded == 0.0 {
        // Avoid "-0".
        return "0".to_string();
    }
    rounded.to_string()
}

/// Text form of `values` in the requested format.
pub fn encode_points(values: &[f64], format: NumberFormat) -> Result<String, ConvertError> {
    Ok(match format {
        NumberFormat::Int => encode_integers(values)?.to_expression(),
        NumberFormat::Float => encode_floats(values).to_expression(),
        NumberFormat::Decimal => encode_decimal(values),
    })
}
