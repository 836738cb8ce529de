// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Explicit byte order for multi-byte key and row fields.
//!
//! The storage engine reads partition/type words, tag ids, edge types and row
//! scalars in its own on-disk order. That order is a fixed property of the
//! engine, so it is configured here rather than taken from the host CPU. The
//! only exception is the edge rank, which is always big-endian (see
//! [`rank`](crate::rank)).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Byte order used for the integer and float fields of keys and rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    /// Least significant byte first. The engine's order on x86-64 and aarch64.
    #[default]
    Little,
    /// Most significant byte first.
    Big,
}

macro_rules! to_bytes {
    ($($name:ident: $ty:ty => $n:literal),* $(,)?) => {
        $(
            #[doc = concat!("Serialize a `", stringify!($ty), "` in this order.")]
            #[inline]
            pub fn $name(self, value: $ty) -> [u8; $n] {
                match self {
                    Self::Little => value.to_le_bytes(),
                    Self::Big => value.to_be_bytes(),
                }
            }
        )*
    };
}

macro_rules! from_bytes {
    ($($name:ident: $ty:ty => $n:literal),* $(,)?) => {
        $(
            #[doc = concat!("Parse a `", stringify!($ty), "` written in this order.")]
            #[inline]
            pub fn $name(self, bytes: [u8; $n]) -> $ty {
                match self {
                    Self::Little => <$ty>::from_le_bytes(bytes),
                    Self::Big => <$ty>::from_be_bytes(bytes),
                }
            }
        )*
    };
}

impl ByteOrder {
    to_bytes! {
        i16_bytes: i16 => 2,
        u32_bytes: u32 => 4,
        i32_bytes: i32 => 4,
        i64_bytes: i64 => 8,
        f32_bytes: f32 => 4,
        f64_bytes: f64 => 8,
    }

    from_bytes! {
        read_u32: u32 => 4,
        read_i32: i32 => 4,
        read_i64: i64 => 8,
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Little => "little",
            Self::Big => "big",
        })
    }
}

impl FromStr for ByteOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "little" | "le" => Ok(Self::Little),
            "big" | "be" => Ok(Self::Big),
            other => Err(format!("unknown byte order `{other}` (expected little|big)")),
        }
    }
}

/// Append-only buffer that writes integers in a fixed [`ByteOrder`].
#[derive(Debug)]
pub(crate) struct OrderedWriter {
    buf: Vec<u8>,
    order: ByteOrder,
}

impl OrderedWriter {
    pub(crate) fn with_capacity(order: ByteOrder, capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            order,
        }
    }

    pub(crate) fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub(crate) fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&self.order.u32_bytes(value));
    }

    pub(crate) fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&self.order.i32_bytes(value));
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Write `bytes` followed by zeros up to `width`. Callers check the length.
    pub(crate) fn write_zero_padded(&mut self, bytes: &[u8], width: usize) {
        debug_assert!(bytes.len() <= width);
        self.buf.extend_from_slice(bytes);
        self.buf.resize(self.buf.len() + width.saturating_sub(bytes.len()), 0);
    }

    pub(crate) fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn orders_reverse_each_other() {
        let le = ByteOrder::Little.u32_bytes(0x0102_0304);
        let be = ByteOrder::Big.u32_bytes(0x0102_0304);
        assert_eq!(le, [0x04, 0x03, 0x02, 0x01]);
        assert_eq!(be, [0x01, 0x02, 0x03, 0x04]);
        assert_eq!(ByteOrder::Little.read_u32(le), 0x0102_0304);
        assert_eq!(ByteOrder::Big.read_u32(be), 0x0102_0304);
    }

    #[test]
    fn parses_from_str() {
        assert_eq!("LE".parse::<ByteOrder>().unwrap(), ByteOrder::Little);
        assert_eq!("big".parse::<ByteOrder>().unwrap(), ByteOrder::Big);
        assert!("native".parse::<ByteOrder>().is_err());
        assert!("middle".parse::<ByteOrder>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&ByteOrder::Big).unwrap();
        assert_eq!(json, "\"big\"");
        let back: ByteOrder = serde_json::from_str("\"little\"").unwrap();
        assert_eq!(back, ByteOrder::Little);
    }

    #[test]
    fn writer_pads_with_zeros() {
        let mut w = OrderedWriter::with_capacity(ByteOrder::Big, 8);
        w.write_u8(7);
        w.write_zero_padded(b"ab", 5);
        w.write_i32(-1);
        assert_eq!(
            w.into_vec(),
            vec![7, b'a', b'b', 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }
}
