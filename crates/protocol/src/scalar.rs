//! Fixed-size scalar codec: typed decode-to-text and encode-from-value for
//! the widths the wire format recognizes.

use crate::error::WireError;
use crate::field::{FieldDesc, TypeTag, WireValue};
use crate::reader::ChunkReader;
use crate::writer::ChunkWriter;

/// Reads one fixed-width scalar described by `desc` and renders it as text.
///
/// Unsigned 8-byte values render as full unsigned decimals; the character
/// kind reads one byte and strips the top bit before display.
pub(crate) fn decode(reader: &mut ChunkReader<'_>, desc: &FieldDesc) -> Result<String, WireError> {
    let rendered = match (desc.tag(), desc.width()) {
        (TypeTag::Signed, 1) => reader.read_i8()?.to_string(),
        (TypeTag::Signed, 2) => reader.read_i16()?.to_string(),
        (TypeTag::Signed, 4) => reader.read_i32()?.to_string(),
        (TypeTag::Signed, 8) => reader.read_i64()?.to_string(),
        (TypeTag::Unsigned, 1) => reader.read_u8()?.to_string(),
        (TypeTag::Unsigned, 2) => reader.read_u16()?.to_string(),
        (TypeTag::Unsigned, 4) => reader.read_u32()?.to_string(),
        (TypeTag::Unsigned, 8) => reader.read_u64()?.to_string(),
        (TypeTag::Float, 4) => reader.read_f32()?.to_string(),
        (TypeTag::Float, 8) => reader.read_f64()?.to_string(),
        (TypeTag::Char, 0 | 1) => {
            let byte = reader.read_u8()? & 0x7f;
            format!("'{}'", char::from(byte))
        }
        (tag, width) => return Err(WireError::InvalidField { tag, width }),
    };
    Ok(rendered)
}

fn signed_out_of_range(value: i64, width: u8) -> WireError {
    WireError::OutOfRange {
        value: value.to_string(),
        width,
    }
}

fn unsigned_out_of_range(value: u64, width: u8) -> WireError {
    WireError::OutOfRange {
        value: value.to_string(),
        width,
    }
}

/// Packs one typed value into its fixed-width wire form.
pub(crate) fn encode(writer: &mut ChunkWriter, value: &WireValue) -> Result<(), WireError> {
    match *value {
        WireValue::Signed { width, value } => match width {
            1 => writer.put_i8(
                i8::try_from(value).map_err(|_| signed_out_of_range(value, width))?,
            ),
            2 => writer.put_i16(
                i16::try_from(value).map_err(|_| signed_out_of_range(value, width))?,
            ),
            4 => writer.put_i32(
                i32::try_from(value).map_err(|_| signed_out_of_range(value, width))?,
            ),
            8 => writer.put_i64(value),
            _ => {
                return Err(WireError::InvalidField {
                    tag: TypeTag::Signed,
                    width,
                });
            }
        },
        WireValue::Unsigned { width, value } => match width {
            1 => writer.put_u8(
                u8::try_from(value).map_err(|_| unsigned_out_of_range(value, width))?,
            ),
            2 => writer.put_u16(
                u16::try_from(value).map_err(|_| unsigned_out_of_range(value, width))?,
            ),
            4 => writer.put_u32(
                u32::try_from(value).map_err(|_| unsigned_out_of_range(value, width))?,
            ),
            8 => writer.put_u64(value),
            _ => {
                return Err(WireError::InvalidField {
                    tag: TypeTag::Unsigned,
                    width,
                });
            }
        },
        WireValue::Float32 { value } => writer.put_f32(value),
        WireValue::Float64 { value } => writer.put_f64(value),
        WireValue::Char { value } => {
            // Only the low 7 bits travel on the wire.
            writer.put_u8((u32::from(value) & 0x7f) as u8);
        }
        WireValue::Text { .. } | WireValue::Opaque { .. } => {
            let tag = if matches!(value, WireValue::Text { .. }) {
                TypeTag::Text
            } else {
                TypeTag::Opaque
            };
            // Variable-length kinds belong to the varlen codec.
            return Err(WireError::InvalidField { tag, width: 0 });
        }
    }
    Ok(())
}
