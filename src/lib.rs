//! Direct BSON-to-JSON transcoding.
//!
//! This crate turns a byte slice holding one BSON document into JSON text
//! bytes in a single streaming pass: no intermediate tree of typed values
//! is ever built. String bytes are copied with escaping as they are
//! scanned, integers and doubles go through specialized formatters, and
//! 12-byte ObjectIds are hex-encoded straight into the output.
//!
//! ```
//! use bson2json::Transcoder;
//!
//! // {"hello": "world"}
//! let bytes = b"\x16\x00\x00\x00\x02hello\x00\x06\x00\x00\x00world\x00\x00";
//! let json = Transcoder::new().transcode(bytes, false)?;
//! assert_eq!(json, b"{\"hello\":\"world\"}");
//! # Ok::<(), bson2json::Error>(())
//! ```
//!
//! ## Output format
//!
//! RFC 8259-compatible UTF-8 with these choices: key order preserved;
//! numbers per ECMAScript `Number::toString` (64-bit integers at full
//! precision, non-finite doubles as `null`); datetimes as quoted ISO-8601
//! UTC strings with millisecond precision; ObjectIds as quoted 24-character
//! lowercase hex; deprecated `undefined` elements omitted entirely. BSON
//! types with no JSON rendering (Binary, Decimal128, regular expressions,
//! and friends) are errors.
//!
//! ## Client-side joins
//!
//! A [`PopulateInfo`] replaces ids at nominated dotted paths with
//! pre-transcoded JSON fragments and collects the ids it has no fragment
//! for, so a caller can fetch referenced documents and re-run:
//!
//! ```
//! use bson2json::{PopulateInfo, Transcoder};
//!
//! // {"author": ObjectId(633e…)} with a fragment registered for that id.
//! let author = b"\x16\x00\x00\x00\x07_id\x00\
//!     \x63\x3e\x85\x4c\x01\x02\x03\x04\x05\x06\x07\x08\
//!     \x00";
//! let post = b"\x19\x00\x00\x00\x07author\x00\
//!     \x63\x3e\x85\x4c\x01\x02\x03\x04\x05\x06\x07\x08\
//!     \x00";
//!
//! let mut populate = PopulateInfo::new();
//! populate.add_items("author", [author.as_slice()])?;
//!
//! let json = Transcoder::with_populate(&populate).transcode(post, false)?;
//! assert_eq!(
//!     std::str::from_utf8(&json).unwrap(),
//!     r#"{"author":{"_id":"633e854c0102030405060708"}}"#,
//! );
//! # Ok::<(), bson2json::Error>(())
//! ```
//!
//! ## Streaming
//!
//! [`JsonStream`] runs the same walk on a background thread against a
//! fixed-size buffer and yields output chunks as the caller pulls them;
//! memory stays bounded by the chunk size no matter how large the output
//! is.

mod buffer;
mod escape;
mod fmt;
mod reader;
mod scan;

pub mod error;
pub mod oid;
pub mod populate;
pub mod spec;
pub mod stream;
pub mod transcode;

#[doc(inline)]
pub use self::{
    error::{Error, Result},
    oid::ObjectId,
    populate::PopulateInfo,
    stream::{JsonStream, StreamBuilder},
    transcode::Transcoder,
};

/// The implementation tier this build selected.
///
/// Informational only. This implementation is the portable scalar tier; a
/// vectorized build would report its instruction-set choice here.
pub const SELECTED_ISA: &str = "Baseline";
