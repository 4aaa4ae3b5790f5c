//! Read-only state inspection.

use std::fmt;

/// A dynamically-typed state value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    String(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::U8(byte) => write!(f, "{byte:#04X}"),
            Self::U16(word) => write!(f, "{word:#06X}"),
            Self::U32(long) => write!(f, "{long:#010X}"),
            Self::U64(count) => write!(f, "{count}"),
            Self::String(text) => f.write_str(text),
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

value_from!(bool => Bool, u8 => U8, u16 => U16, u32 => U32, u64 => U64);

impl From<&str> for Value {
    fn from(name: &str) -> Self {
        Self::String(name.to_owned())
    }
}

/// A component whose state can be queried by dotted path, e.g.
/// `beam.row` or `palette.index`.
///
/// Queries never change emulation state.
pub trait Observable {
    /// Look up one property. `None` if the path is unknown.
    fn query(&self, path: &str) -> Option<Value>;

    /// Every path `query` understands. Parametrised segments are written
    /// in angle brackets.
    fn query_paths(&self) -> &'static [&'static str];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_hex_by_width() {
        assert_eq!(Value::U8(0xE3).to_string(), "0xE3");
        assert_eq!(Value::U16(0x1FF).to_string(), "0x01FF");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::from("blend").to_string(), "blend");
    }
}
