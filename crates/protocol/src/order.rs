use core::fmt;
use core::str::FromStr;

/// Byte order a serialized stream was encoded with.
///
/// DAP4 responses declare their endianness once per response; the order is
/// fixed when a reader or writer is constructed and threaded through every
/// fixed-width access for the life of that stream.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ByteOrder {
    /// Most significant byte first (network order).
    Big,
    /// Least significant byte first. The default, matching the common
    /// server-native encoding of DAP4 responses.
    #[default]
    Little,
}

macro_rules! order_conversions {
    ($($from:ident, $to:ident => $ty:ty, $n:literal;)*) => {
        $(
            /// Reinterprets a byte array in this order.
            #[must_use]
            pub const fn $from(self, bytes: [u8; $n]) -> $ty {
                match self {
                    Self::Big => <$ty>::from_be_bytes(bytes),
                    Self::Little => <$ty>::from_le_bytes(bytes),
                }
            }

            /// Packs a value into bytes in this order.
            #[must_use]
            pub const fn $to(self, value: $ty) -> [u8; $n] {
                match self {
                    Self::Big => value.to_be_bytes(),
                    Self::Little => value.to_le_bytes(),
                }
            }
        )*
    };
}

impl ByteOrder {
    order_conversions! {
        u16_from, u16_bytes => u16, 2;
        u32_from, u32_bytes => u32, 4;
        u64_from, u64_bytes => u64, 8;
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Big => f.write_str("big"),
            Self::Little => f.write_str("little"),
        }
    }
}

/// Error returned when a byte-order name is not recognized.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown byte order {input:?}, expected \"big\" or \"little\"")]
pub struct ParseByteOrderError {
    input: String,
}

impl FromStr for ByteOrder {
    type Err = ParseByteOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "big" | "be" => Ok(Self::Big),
            "little" | "le" => Ok(Self::Little),
            other => Err(ParseByteOrderError {
                input: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_respect_order() {
        assert_eq!(ByteOrder::Big.u32_from([0, 0, 0, 1]), 1);
        assert_eq!(ByteOrder::Little.u32_from([1, 0, 0, 0]), 1);
        assert_eq!(ByteOrder::Big.u32_bytes(1), [0, 0, 0, 1]);
        assert_eq!(ByteOrder::Little.u32_bytes(1), [1, 0, 0, 0]);
    }

    #[test]
    fn same_bytes_differ_across_orders() {
        let bytes = ByteOrder::Big.u32_bytes(1);
        assert_ne!(ByteOrder::Little.u32_from(bytes), 1);
        assert_eq!(ByteOrder::Little.u32_from(bytes), 1 << 24);
    }

    #[test]
    fn parses_known_names() {
        assert_eq!("big".parse::<ByteOrder>(), Ok(ByteOrder::Big));
        assert_eq!("le".parse::<ByteOrder>(), Ok(ByteOrder::Little));
        assert!("middle".parse::<ByteOrder>().is_err());
    }
}
