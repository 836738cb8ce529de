// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error taxonomy for key and row encoding.
//!
//! Every failure is surfaced to the caller as a typed error; nothing is
//! retried and no partial bytes are ever returned. Messages carry a bracketed
//! code so log lines can be grepped without parsing the prose.

use thiserror::Error;

use crate::meta::PropertyType;

/// Errors produced by [`NebulaEncoder`](crate::NebulaEncoder) and the key codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The named space is unknown to the metadata accessor.
    #[error("[SPACE_NOT_FOUND] space `{space}` does not exist")]
    SpaceNotFound {
        /// Requested space name.
        space: String,
    },
    /// The space has no (or an empty) partition allocation.
    #[error("[PARTS_NOT_FOUND] no partition allocation for space `{space}`")]
    PartsNotFound {
        /// Requested space name.
        space: String,
    },
    /// The named tag is unknown in the space.
    #[error("[TAG_NOT_FOUND] tag `{tag}` does not exist in space `{space}`")]
    TagNotFound {
        /// Space that was searched.
        space: String,
        /// Requested tag name.
        tag: String,
    },
    /// The named edge type is unknown in the space.
    #[error("[EDGE_NOT_FOUND] edge `{edge}` does not exist in space `{space}`")]
    EdgeNotFound {
        /// Space that was searched.
        space: String,
        /// Requested edge name.
        edge: String,
    },
    /// A vertex identifier is longer than the space's fixed vid length.
    #[error("[VID_TOO_LONG] vid of {actual} bytes exceeds configured length {vid_len}")]
    VidTooLong {
        /// Length of the offending identifier.
        actual: usize,
        /// Configured fixed vid length.
        vid_len: usize,
    },
    /// Property names and values differ in count.
    #[error("[ARITY_MISMATCH] {names} property names but {values} values")]
    ArityMismatch {
        /// Number of names supplied.
        names: usize,
        /// Number of values supplied.
        values: usize,
    },
    /// Any other malformed argument.
    #[error("[INVALID_ARGUMENT] {0}")]
    InvalidArgument(String),
    /// The space identifies vertices with something other than a fixed string.
    #[error("[UNSUPPORTED_VID_TYPE] space `{space}` uses {vid_type} vids; only FIXED_STRING is supported")]
    UnsupportedVidType {
        /// Space whose vid type was rejected.
        space: String,
        /// Name of the rejected vid type.
        vid_type: String,
    },
    /// Metadata that this encoder cannot represent.
    #[error("[UNSUPPORTED_CONFIG] {0}")]
    UnsupportedConfiguration(String),
    /// Failure reported by the row writer, passed through unchanged.
    #[error(transparent)]
    Row(#[from] RowError),
}

impl EncodeError {
    /// `true` for the space/partition/tag/edge lookup failures.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SpaceNotFound { .. }
                | Self::PartsNotFound { .. }
                | Self::TagNotFound { .. }
                | Self::EdgeNotFound { .. }
        )
    }

    /// `true` for length and arity violations in caller input.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::VidTooLong { .. } | Self::ArityMismatch { .. } | Self::InvalidArgument(_)
        )
    }

    /// `true` when the metadata describes something this encoder does not support.
    pub fn is_unsupported_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedVidType { .. } | Self::UnsupportedConfiguration(_)
        )
    }
}

/// Errors produced by [`RowWriter`](crate::RowWriter).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// No field with this name exists in the schema.
    #[error("[UNKNOWN_FIELD] `{field}` is not part of the schema")]
    UnknownField {
        /// Requested field name.
        field: String,
    },
    /// The field was already given a value in this row.
    #[error("[FIELD_ALREADY_SET] `{field}` was set more than once")]
    FieldAlreadySet {
        /// Field name.
        field: String,
    },
    /// The value kind cannot be stored in the field's property type.
    #[error("[TYPE_MISMATCH] field `{field}` of type {expected} cannot hold a {actual} value")]
    TypeMismatch {
        /// Field name.
        field: String,
        /// Declared property type.
        expected: PropertyType,
        /// Kind of the supplied value.
        actual: &'static str,
    },
    /// The value does not fit the field's width.
    #[error("[VALUE_OUT_OF_RANGE] value for `{field}` does not fit in {expected}")]
    ValueOutOfRange {
        /// Field name.
        field: String,
        /// Declared property type.
        expected: PropertyType,
    },
    /// Null written to a non-nullable field.
    #[error("[NOT_NULLABLE] field `{field}` does not accept null")]
    NotNullable {
        /// Field name.
        field: String,
    },
    /// A non-nullable field without a default was never set.
    #[error("[MISSING_REQUIRED_FIELD] field `{field}` was not set")]
    MissingRequiredField {
        /// Field name.
        field: String,
    },
    /// A non-nullable field with a declared default was never set.
    ///
    /// Default substitution is not implemented; callers must pass the value.
    #[error("[DEFAULT_VALUE_UNSUPPORTED] field `{field}` was not set and default values are not substituted")]
    DefaultValueUnsupported {
        /// Field name.
        field: String,
    },
    /// The string heap grew past what a 32-bit offset can address.
    #[error("[STRING_TOO_LONG] string for `{field}` overflows the row's 32-bit offsets")]
    StringTooLong {
        /// Field name.
        field: String,
    },
}
