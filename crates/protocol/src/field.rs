use core::fmt;

use crate::error::WireError;

/// One-character type tags carried by the DMR schema for serialized fields.
///
/// Variable-length kinds ([`Text`](Self::Text) and [`Opaque`](Self::Opaque))
/// always travel at width 0 and are length-prefixed on the wire; the fixed
/// kinds carry their byte width in the field descriptor.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeTag {
    /// Signed integer, width 1, 2, 4, or 8.
    #[cfg_attr(feature = "serde", serde(rename = "S"))]
    Signed,
    /// Unsigned integer, width 1, 2, 4, or 8.
    #[cfg_attr(feature = "serde", serde(rename = "U"))]
    Unsigned,
    /// IEEE 754 float, width 4 or 8.
    #[cfg_attr(feature = "serde", serde(rename = "F"))]
    Float,
    /// 7-bit ASCII character, width 0 or 1 (both read one byte).
    #[cfg_attr(feature = "serde", serde(rename = "C"))]
    Char,
    /// Length-prefixed UTF-8 text, width 0.
    #[cfg_attr(feature = "serde", serde(rename = "T"))]
    Text,
    /// Length-prefixed binary blob, width 0.
    #[cfg_attr(feature = "serde", serde(rename = "O"))]
    Opaque,
}

impl TypeTag {
    /// Returns the single-character form used in schema listings.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Signed => 'S',
            Self::Unsigned => 'U',
            Self::Float => 'F',
            Self::Char => 'C',
            Self::Text => 'T',
            Self::Opaque => 'O',
        }
    }

    /// Returns `true` for the length-prefixed kinds.
    #[must_use]
    pub const fn is_variable(self) -> bool {
        matches!(self, Self::Text | Self::Opaque)
    }

    const fn accepts_width(self, width: u8) -> bool {
        match self {
            Self::Signed | Self::Unsigned => matches!(width, 1 | 2 | 4 | 8),
            Self::Float => matches!(width, 4 | 8),
            Self::Char => matches!(width, 0 | 1),
            Self::Text | Self::Opaque => width == 0,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Descriptor for one expected field in a chunk, as supplied by the command
/// script that mirrors the DMR schema.
///
/// Construction validates the tag/width combination up front so an invalid
/// schema fails before any stream bytes are consumed.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawFieldDesc", into = "RawFieldDesc")
)]
pub struct FieldDesc {
    tag: TypeTag,
    width: u8,
    index: Option<Vec<u64>>,
}

impl FieldDesc {
    /// Creates a descriptor for `tag` at `width`.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidField`] when the combination is not one the
    /// codec recognizes (see [`TypeTag`] for the accepted widths).
    pub fn new(tag: TypeTag, width: u8) -> Result<Self, WireError> {
        if tag.accepts_width(width) {
            Ok(Self {
                tag,
                width,
                index: None,
            })
        } else {
            Err(WireError::InvalidField { tag, width })
        }
    }

    /// Attaches a multi-dimensional index tuple used to annotate dump output
    /// for array elements. The tuple has no effect on the wire layout.
    #[must_use]
    pub fn with_index(mut self, index: Vec<u64>) -> Self {
        self.index = Some(index);
        self
    }

    /// Returns the type tag.
    #[must_use]
    pub const fn tag(&self) -> TypeTag {
        self.tag
    }

    /// Returns the declared byte width (0 for the variable-length kinds).
    #[must_use]
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Returns the display index tuple, if any.
    #[must_use]
    pub fn index(&self) -> Option<&[u64]> {
        self.index.as_deref()
    }
}

/// Unvalidated mirror of [`FieldDesc`] used for serde conversions.
#[cfg(feature = "serde")]
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
struct RawFieldDesc {
    tag: TypeTag,
    width: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    index: Option<Vec<u64>>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawFieldDesc> for FieldDesc {
    type Error = WireError;

    fn try_from(raw: RawFieldDesc) -> Result<Self, Self::Error> {
        let mut desc = Self::new(raw.tag, raw.width)?;
        desc.index = raw.index;
        Ok(desc)
    }
}

#[cfg(feature = "serde")]
impl From<FieldDesc> for RawFieldDesc {
    fn from(desc: FieldDesc) -> Self {
        Self {
            tag: desc.tag,
            width: desc.width,
            index: desc.index,
        }
    }
}

/// One step of a decode pass. A script is an ordered list of these commands,
/// mirroring the field layout the DMR schema declared for the response.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "op", rename_all = "snake_case")
)]
pub enum DumpCmd {
    /// Open a new chunk: reset the running digest.
    StartChunk,
    /// Read an 8-byte element count (fed to the digest) and print it.
    Count,
    /// Read and print one field.
    Field(FieldDesc),
    /// Read the 4 trailing checksum bytes and verify them against the digest.
    Checksum,
}

/// A typed value to be encoded by the synthesizer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum WireValue {
    /// Signed integer packed into `width` bytes.
    Signed {
        /// Wire width: 1, 2, 4, or 8.
        width: u8,
        /// Value to encode; must fit the declared width.
        value: i64,
    },
    /// Unsigned integer packed into `width` bytes.
    Unsigned {
        /// Wire width: 1, 2, 4, or 8.
        width: u8,
        /// Value to encode; must fit the declared width.
        value: u64,
    },
    /// IEEE 754 single-precision float (4 bytes).
    Float32 {
        /// Value to encode.
        value: f32,
    },
    /// IEEE 754 double-precision float (8 bytes).
    Float64 {
        /// Value to encode.
        value: f64,
    },
    /// Single byte, masked to 7 bits on the wire.
    Char {
        /// Character to encode; only the low 7 bits survive.
        value: char,
    },
    /// Length-prefixed UTF-8 text.
    Text {
        /// Payload; encoded as an 8-byte count plus the UTF-8 bytes.
        value: String,
    },
    /// Length-prefixed binary blob.
    Opaque {
        /// Payload; encoded as an 8-byte count plus the raw bytes.
        value: Vec<u8>,
    },
}

/// One step of an encode pass, mirroring [`DumpCmd`] for the writing side.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "op", rename_all = "snake_case")
)]
pub enum SynthCmd {
    /// Open a new chunk: reset the running digest.
    StartChunk,
    /// Write an 8-byte element count (fed to the digest).
    Count {
        /// Count value to encode.
        value: u64,
    },
    /// Encode one typed value.
    Value(WireValue),
    /// Append the chunk's 4-byte CRC32 trailer (no-op when checksumming is
    /// disabled for the stream).
    Checksum,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_documented_widths() {
        for width in [1u8, 2, 4, 8] {
            assert!(FieldDesc::new(TypeTag::Signed, width).is_ok());
            assert!(FieldDesc::new(TypeTag::Unsigned, width).is_ok());
        }
        assert!(FieldDesc::new(TypeTag::Float, 4).is_ok());
        assert!(FieldDesc::new(TypeTag::Float, 8).is_ok());
        assert!(FieldDesc::new(TypeTag::Char, 0).is_ok());
        assert!(FieldDesc::new(TypeTag::Char, 1).is_ok());
        assert!(FieldDesc::new(TypeTag::Text, 0).is_ok());
        assert!(FieldDesc::new(TypeTag::Opaque, 0).is_ok());
    }

    #[test]
    fn rejects_unrecognized_combinations() {
        let err = FieldDesc::new(TypeTag::Float, 2).expect_err("float at width 2 must fail");
        assert_eq!(
            err,
            WireError::InvalidField {
                tag: TypeTag::Float,
                width: 2
            }
        );

        assert!(FieldDesc::new(TypeTag::Signed, 3).is_err());
        assert!(FieldDesc::new(TypeTag::Signed, 0).is_err());
        assert!(FieldDesc::new(TypeTag::Text, 8).is_err());
        assert!(FieldDesc::new(TypeTag::Char, 2).is_err());
    }

    #[test]
    fn index_tuple_is_display_only() {
        let plain = FieldDesc::new(TypeTag::Unsigned, 4).unwrap();
        let indexed = plain.clone().with_index(vec![2, 3]);
        assert_eq!(plain.tag(), indexed.tag());
        assert_eq!(plain.width(), indexed.width());
        assert_eq!(indexed.index(), Some(&[2, 3][..]));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn field_desc_deserialization_validates() {
        let desc: FieldDesc = serde_json::from_str(r#"{"tag":"S","width":4}"#).unwrap();
        assert_eq!(desc.tag(), TypeTag::Signed);
        assert_eq!(desc.width(), 4);

        let err = serde_json::from_str::<FieldDesc>(r#"{"tag":"F","width":1}"#)
            .expect_err("invalid width must fail deserialization");
        assert!(err.to_string().contains("unrecognized field"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn dump_script_round_trips_through_json() {
        let script = vec![
            DumpCmd::StartChunk,
            DumpCmd::Count,
            DumpCmd::Field(FieldDesc::new(TypeTag::Signed, 4).unwrap()),
            DumpCmd::Checksum,
        ];

        let json = serde_json::to_string(&script).unwrap();
        let back: Vec<DumpCmd> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, script);
    }
}
