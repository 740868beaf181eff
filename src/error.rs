use thiserror::Error;

/// Alias for `Result<T, bson2json::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur while transcoding BSON to JSON.
///
/// Errors are fatal to the operation that raised them: no partial output is
/// returned, and the output buffer is released before the error surfaces.
#[derive(Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The top-level input is smaller than the smallest possible document.
    #[error("input buffer must have length >= 5")]
    InputTooShort,

    /// A document header declared a size below 5 or past the end of input.
    #[error("BSON document size {size} is invalid")]
    BadDocumentSize { size: i32 },

    /// A string header declared a non-positive length or one past the end of
    /// input.
    #[error("bad string length {len}")]
    BadStringLength { len: i32 },

    /// A fixed-width value extends past the end of input.
    #[error("truncated BSON (in {context})")]
    TruncatedValue { context: &'static str },

    /// An object key's NUL terminator was not found before the end of input.
    #[error("key terminator not found")]
    TruncatedKey,

    /// The byte that ended an embedded array was not the document terminator.
    #[error("invalid array terminator byte")]
    BadArrayTerminator,

    /// The element type has no JSON rendering (Binary, Decimal128, Regexp,
    /// Symbol, Timestamp, MinKey, MaxKey, Code, CodeWithScope, DBPointer).
    #[error("BSON type {tag:#04x} is incompatible with JSON")]
    UnsupportedType { tag: u8 },

    /// The element type byte is outside the BSON enumeration.
    #[error("unknown BSON type {tag:#04x}")]
    UnknownType { tag: u8 },

    /// Growing the output buffer failed.
    #[error("output buffer allocation failure")]
    AllocationFailure,

    /// Document nesting exceeded the recursion limit.
    #[error("document nesting exceeds depth limit")]
    DepthLimitExceeded,

    /// A datetime value cannot be represented as a civil date.
    #[error("date value {millis}ms is out of range")]
    DateOutOfRange { millis: i64 },

    /// The streaming consumer disconnected before the walk finished.
    #[error("stream consumer disconnected")]
    StreamClosed,

    /// A document supplied to the populate index has no `_id`.
    #[error("populate item has no _id")]
    MissingId,

    /// A populate path was referenced before being registered.
    #[error("unknown populate path: {path}")]
    UnknownPath { path: String },

    /// An ObjectId could not be parsed from its hex form.
    #[error("invalid ObjectId: {message}")]
    InvalidObjectId { message: String },
}
