// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Schema-driven row writer.
//!
//! ```text
//! ┌────────────────────────────────┐
//! │ header: 0x08 | n               │  1 byte
//! │ schema version, little-endian  │  n bytes (0..=7)
//! ├────────────────────────────────┤
//! │ null flags, one bit per        │  ceil(nullable / 8) bytes
//! │ nullable field, MSB first      │
//! ├────────────────────────────────┤
//! │ fixed section                  │  SchemaDescriptor::fixed_size()
//! │   scalars in the row ByteOrder │
//! │   STRING → u32 offset, u32 len │
//! ├────────────────────────────────┤
//! │ string heap                    │  appended in set order
//! ├────────────────────────────────┤
//! │ write timestamp (optional)     │  8 bytes, row ByteOrder
//! └────────────────────────────────┘
//! ```
//!
//! String offsets are measured from the start of the row.

use crate::byte_order::ByteOrder;
use crate::error::RowError;
use crate::meta::PropertyType;
use crate::schema::{FieldDescriptor, SchemaDescriptor};
use crate::value::Value;

/// Low nibble base of the header byte; the version width is OR-ed in.
pub const ROW_HEADER_BASE: u8 = 0x08;

/// Bytes needed to store `version` in a row header.
pub fn version_width(version: i64) -> usize {
    (64 - version.leading_zeros()).div_ceil(8) as usize
}

/// Bytes of null flags needed for `num_nullable` nullable fields.
pub fn null_flag_bytes(num_nullable: usize) -> usize {
    if num_nullable == 0 {
        0
    } else {
        ((num_nullable - 1) >> 3) + 1
    }
}

/// Writes one row for a [`SchemaDescriptor`].
///
/// Each field may be set once. [`finish`](RowWriter::finish) flags unset
/// nullable fields as null and rejects unset non-nullable ones; declared
/// defaults are never substituted.
#[derive(Debug)]
pub struct RowWriter<'a> {
    schema: &'a SchemaDescriptor,
    order: ByteOrder,
    buf: Vec<u8>,
    null_base: usize,
    fixed_base: usize,
    is_set: Vec<bool>,
    timestamp: Option<i64>,
}

impl<'a> RowWriter<'a> {
    /// Start a row; header, version and a zeroed fixed section are laid out
    /// immediately.
    pub fn new(schema: &'a SchemaDescriptor, order: ByteOrder) -> Self {
        let version = schema.version();
        let width = version_width(version);
        let null_base = 1 + width;
        let fixed_base = null_base + null_flag_bytes(schema.num_nullable_fields());

        let mut buf = Vec::with_capacity(fixed_base + schema.fixed_size());
        // width <= 7 for any version SchemaDescriptor accepts
        buf.push(ROW_HEADER_BASE | u8::try_from(width).unwrap_or(0x07));
        buf.extend_from_slice(&version.to_le_bytes()[..width]);
        buf.resize(fixed_base + schema.fixed_size(), 0);

        Self {
            schema,
            order,
            buf,
            null_base,
            fixed_base,
            is_set: vec![false; schema.len()],
            timestamp: None,
        }
    }

    /// Append `micros` as the row's 8-byte write timestamp on
    /// [`finish`](RowWriter::finish).
    pub fn with_timestamp(mut self, micros: i64) -> Self {
        self.timestamp = Some(micros);
        self
    }

    /// Store `value` into field `name`.
    pub fn set_value(&mut self, name: &str, value: &Value) -> Result<(), RowError> {
        let schema = self.schema;
        let index = schema
            .field_index(name)
            .ok_or_else(|| RowError::UnknownField { field: name.into() })?;
        if self.is_set[index] {
            return Err(RowError::FieldAlreadySet { field: name.into() });
        }
        self.write_field(&schema.fields()[index], value)?;
        self.is_set[index] = true;
        Ok(())
    }

    /// Finalize the row.
    pub fn finish(mut self) -> Result<Vec<u8>, RowError> {
        let schema = self.schema;
        for (field, set) in schema.fields().iter().zip(self.is_set.clone()) {
            if set {
                continue;
            }
            if let Some(slot) = field.null_slot() {
                self.set_null(slot);
            } else if field.has_default() {
                return Err(RowError::DefaultValueUnsupported {
                    field: field.name().into(),
                });
            } else {
                return Err(RowError::MissingRequiredField {
                    field: field.name().into(),
                });
            }
        }
        if let Some(micros) = self.timestamp {
            let bytes = self.order.i64_bytes(micros);
            self.buf.extend_from_slice(&bytes);
        }
        Ok(self.buf)
    }

    fn write_field(&mut self, field: &FieldDescriptor, value: &Value) -> Result<(), RowError> {
        let at = self.fixed_base + field.offset();
        let ty = field.property_type();
        let out_of_range = || RowError::ValueOutOfRange {
            field: field.name().into(),
            expected: ty,
        };

        match (ty, value) {
            (_, Value::Null) => {
                let slot = field.null_slot().ok_or_else(|| RowError::NotNullable {
                    field: field.name().into(),
                })?;
                self.set_null(slot);
            }
            (PropertyType::Bool, Value::Bool(b)) => self.put(at, &[u8::from(*b)]),
            (PropertyType::Int8, Value::Int(v)) => {
                let v = i8::try_from(*v).map_err(|_| out_of_range())?;
                self.put(at, &v.to_ne_bytes());
            }
            (PropertyType::Int16, Value::Int(v)) => {
                let v = i16::try_from(*v).map_err(|_| out_of_range())?;
                self.put(at, &self.order.i16_bytes(v));
            }
            (PropertyType::Int32, Value::Int(v)) => {
                let v = i32::try_from(*v).map_err(|_| out_of_range())?;
                self.put(at, &self.order.i32_bytes(v));
            }
            (PropertyType::Int64 | PropertyType::Timestamp, Value::Int(v)) => {
                self.put(at, &self.order.i64_bytes(*v));
            }
            (PropertyType::Float, Value::Int(v)) => {
                self.put(at, &self.order.f32_bytes(int_to_f32(*v)));
            }
            (PropertyType::Float, Value::Float(v)) => {
                let v = narrow_f32(*v).ok_or_else(out_of_range)?;
                self.put(at, &self.order.f32_bytes(v));
            }
            (PropertyType::Double, Value::Int(v)) => {
                self.put(at, &self.order.f64_bytes(int_to_f64(*v)));
            }
            (PropertyType::Double, Value::Float(v)) => {
                self.put(at, &self.order.f64_bytes(*v));
            }
            (PropertyType::String, Value::Str(s)) => self.put_heap_string(field, at, s)?,
            (PropertyType::FixedString, Value::Str(s)) => {
                let width = field.size();
                let bytes = &s.as_bytes()[..s.len().min(width)];
                // slot is already zeroed; shorter strings stay padded
                self.put(at, bytes);
            }
            (PropertyType::Date, Value::Date(d)) => {
                self.put(at, &self.order.i16_bytes(d.year));
                self.put(at + 2, &[d.month, d.day]);
            }
            (PropertyType::Time, Value::Time(t)) => {
                self.put(at, &[t.hour, t.minute, t.sec]);
                self.put(at + 3, &self.order.u32_bytes(t.microsec));
            }
            (PropertyType::DateTime, Value::DateTime(dt)) => {
                self.put(at, &self.order.i16_bytes(dt.year));
                self.put(at + 2, &[dt.month, dt.day, dt.hour, dt.minute, dt.sec]);
                self.put(at + 7, &self.order.u32_bytes(dt.microsec));
            }
            (expected, actual) => {
                return Err(RowError::TypeMismatch {
                    field: field.name().into(),
                    expected,
                    actual: actual.kind(),
                });
            }
        }
        Ok(())
    }

    fn put_heap_string(
        &mut self,
        field: &FieldDescriptor,
        at: usize,
        s: &str,
    ) -> Result<(), RowError> {
        let too_long = || RowError::StringTooLong {
            field: field.name().into(),
        };
        let offset = u32::try_from(self.buf.len()).map_err(|_| too_long())?;
        let len = u32::try_from(s.len()).map_err(|_| too_long())?;
        offset.checked_add(len).ok_or_else(too_long)?;

        self.buf.extend_from_slice(s.as_bytes());
        self.put(at, &self.order.u32_bytes(offset));
        self.put(at + 4, &self.order.u32_bytes(len));
        Ok(())
    }

    fn put(&mut self, at: usize, bytes: &[u8]) {
        self.buf[at..at + bytes.len()].copy_from_slice(bytes);
    }

    fn set_null(&mut self, slot: usize) {
        self.buf[self.null_base + (slot >> 3)] |= 0x80 >> (slot & 7);
    }
}

#[allow(clippy::cast_possible_truncation)]
fn narrow_f32(v: f64) -> Option<f32> {
    if v.is_finite() && v.abs() > f64::from(f32::MAX) {
        None
    } else {
        Some(v as f32)
    }
}

#[allow(clippy::cast_precision_loss)]
fn int_to_f32(v: i64) -> f32 {
    v as f32
}

#[allow(clippy::cast_precision_loss)]
fn int_to_f64(v: i64) -> f64 {
    v as f64
}
