//! BSON Specification Version 1.0
//!
//! Element type tags per <http://bsonspec.org/spec.html>. The transcoder
//! dispatches on the raw tag bytes; the [`ElementType`] enum covers the
//! complete enumeration so that a tag outside the JSON-compatible subset
//! can be classified as a known-but-unsupported type rather than garbage.

pub const ELEMENT_TYPE_DOUBLE: u8 = 0x01;
pub const ELEMENT_TYPE_STRING: u8 = 0x02;
pub const ELEMENT_TYPE_EMBEDDED_DOCUMENT: u8 = 0x03;
pub const ELEMENT_TYPE_ARRAY: u8 = 0x04;
pub const ELEMENT_TYPE_BINARY: u8 = 0x05;
pub const ELEMENT_TYPE_UNDEFINED: u8 = 0x06; // Deprecated
pub const ELEMENT_TYPE_OBJECT_ID: u8 = 0x07;
pub const ELEMENT_TYPE_BOOLEAN: u8 = 0x08;
pub const ELEMENT_TYPE_DATETIME: u8 = 0x09;
pub const ELEMENT_TYPE_NULL: u8 = 0x0A;
pub const ELEMENT_TYPE_REGULAR_EXPRESSION: u8 = 0x0B;
pub const ELEMENT_TYPE_DBPOINTER: u8 = 0x0C; // Deprecated
pub const ELEMENT_TYPE_JAVASCRIPT_CODE: u8 = 0x0D;
pub const ELEMENT_TYPE_SYMBOL: u8 = 0x0E; // Deprecated
pub const ELEMENT_TYPE_JAVASCRIPT_CODE_WITH_SCOPE: u8 = 0x0F; // Deprecated
pub const ELEMENT_TYPE_INT32: u8 = 0x10;
pub const ELEMENT_TYPE_TIMESTAMP: u8 = 0x11;
pub const ELEMENT_TYPE_INT64: u8 = 0x12;
pub const ELEMENT_TYPE_DECIMAL128: u8 = 0x13;
pub const ELEMENT_TYPE_MIN_KEY: u8 = 0xFF;
pub const ELEMENT_TYPE_MAX_KEY: u8 = 0x7F;

/// All BSON element types.
///
/// Only a subset has a JSON rendering; see [`ElementType::json_compatible`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ElementType {
    Double = ELEMENT_TYPE_DOUBLE,
    String = ELEMENT_TYPE_STRING,
    EmbeddedDocument = ELEMENT_TYPE_EMBEDDED_DOCUMENT,
    Array = ELEMENT_TYPE_ARRAY,
    Binary = ELEMENT_TYPE_BINARY,
    Undefined = ELEMENT_TYPE_UNDEFINED,
    ObjectId = ELEMENT_TYPE_OBJECT_ID,
    Boolean = ELEMENT_TYPE_BOOLEAN,
    DateTime = ELEMENT_TYPE_DATETIME,
    Null = ELEMENT_TYPE_NULL,
    RegularExpression = ELEMENT_TYPE_REGULAR_EXPRESSION,
    DbPointer = ELEMENT_TYPE_DBPOINTER,
    JavaScriptCode = ELEMENT_TYPE_JAVASCRIPT_CODE,
    Symbol = ELEMENT_TYPE_SYMBOL,
    JavaScriptCodeWithScope = ELEMENT_TYPE_JAVASCRIPT_CODE_WITH_SCOPE,
    Int32 = ELEMENT_TYPE_INT32,
    Timestamp = ELEMENT_TYPE_TIMESTAMP,
    Int64 = ELEMENT_TYPE_INT64,
    Decimal128 = ELEMENT_TYPE_DECIMAL128,
    MinKey = ELEMENT_TYPE_MIN_KEY,
    MaxKey = ELEMENT_TYPE_MAX_KEY,
}

impl ElementType {
    /// Converts a tag byte to an element type, returning `None` for bytes
    /// outside the BSON enumeration.
    #[inline]
    pub fn from(tag: u8) -> Option<ElementType> {
        use self::ElementType::*;
        Some(match tag {
            ELEMENT_TYPE_DOUBLE => Double,
            ELEMENT_TYPE_STRING => String,
            ELEMENT_TYPE_EMBEDDED_DOCUMENT => EmbeddedDocument,
            ELEMENT_TYPE_ARRAY => Array,
            ELEMENT_TYPE_BINARY => Binary,
            ELEMENT_TYPE_UNDEFINED => Undefined,
            ELEMENT_TYPE_OBJECT_ID => ObjectId,
            ELEMENT_TYPE_BOOLEAN => Boolean,
            ELEMENT_TYPE_DATETIME => DateTime,
            ELEMENT_TYPE_NULL => Null,
            ELEMENT_TYPE_REGULAR_EXPRESSION => RegularExpression,
            ELEMENT_TYPE_DBPOINTER => DbPointer,
            ELEMENT_TYPE_JAVASCRIPT_CODE => JavaScriptCode,
            ELEMENT_TYPE_SYMBOL => Symbol,
            ELEMENT_TYPE_JAVASCRIPT_CODE_WITH_SCOPE => JavaScriptCodeWithScope,
            ELEMENT_TYPE_INT32 => Int32,
            ELEMENT_TYPE_TIMESTAMP => Timestamp,
            ELEMENT_TYPE_INT64 => Int64,
            ELEMENT_TYPE_DECIMAL128 => Decimal128,
            ELEMENT_TYPE_MIN_KEY => MinKey,
            ELEMENT_TYPE_MAX_KEY => MaxKey,
            _ => return None,
        })
    }

    /// Whether values of this type have a JSON rendering.
    ///
    /// `Undefined` is considered compatible: it transcodes to nothing.
    #[inline]
    pub fn json_compatible(self) -> bool {
        use self::ElementType::*;
        matches!(
            self,
            Double
                | String
                | EmbeddedDocument
                | Array
                | Undefined
                | ObjectId
                | Boolean
                | DateTime
                | Null
                | Int32
                | Int64
        )
    }
}
