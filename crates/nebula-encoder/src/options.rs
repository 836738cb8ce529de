// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Encoder configuration.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::byte_order::ByteOrder;

/// Knobs that must match the storage engine reading the output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncoderOptions {
    /// Order of the 4-byte key fields and of row scalars.
    pub byte_order: ByteOrder,
    /// Trailer written after each row's string heap.
    pub row_timestamp: RowTimestamp,
}

impl EncoderOptions {
    /// Options with the given byte order.
    pub fn with_byte_order(byte_order: ByteOrder) -> Self {
        Self {
            byte_order,
            ..Self::default()
        }
    }

    /// Replace the row timestamp policy.
    pub fn with_row_timestamp(mut self, row_timestamp: RowTimestamp) -> Self {
        self.row_timestamp = row_timestamp;
        self
    }

    /// Parse options from a JSON document. Missing fields take defaults.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Policy for the 8-byte write timestamp the engine keeps after a row.
///
/// The engine's readers locate fields through the header, the schema offsets
/// and the string slots, so the trailer is never needed to decode a row. It
/// is omitted by default to keep output a pure function of the input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowTimestamp {
    /// No trailer.
    #[default]
    Omit,
    /// Wall-clock microseconds since the Unix epoch, taken per row.
    Now,
    /// A caller-chosen microsecond value.
    Fixed(i64),
}

impl RowTimestamp {
    /// Microseconds to append, or `None` for [`RowTimestamp::Omit`].
    pub fn resolve(self) -> Option<i64> {
        match self {
            Self::Omit => None,
            Self::Now => Some(
                SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map_or(0, |d| i64::try_from(d.as_micros()).unwrap_or(i64::MAX)),
            ),
            Self::Fixed(micros) => Some(micros),
        }
    }
}

impl fmt::Display for RowTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Omit => f.write_str("omit"),
            Self::Now => f.write_str("now"),
            Self::Fixed(micros) => write!(f, "{micros}"),
        }
    }
}

impl FromStr for RowTimestamp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "omit" => Ok(Self::Omit),
            "now" => Ok(Self::Now),
            other => other.parse().map(Self::Fixed).map_err(|_| {
                format!("unknown row timestamp `{other}` (expected omit|now|<microseconds>)")
            }),
        }
    }
}
