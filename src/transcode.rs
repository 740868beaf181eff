//! The streaming parse+emit state machine over the BSON grammar.

use std::sync::mpsc::SyncSender;

use crate::buffer::OutputBuffer;
use crate::error::{Error, Result};
use crate::escape;
use crate::fmt;
use crate::oid::ObjectId;
use crate::populate::PopulateInfo;
use crate::reader::Reader;
use crate::scan::Scan;
use crate::spec::{self, ElementType};

/// Nesting bound for embedded documents and arrays.
pub(crate) const MAX_DEPTH: usize = 200;

/// Transcodes one BSON document (object or array) into JSON text bytes.
///
/// The walk is a single pass: string bytes are copied with escaping as they
/// are scanned, numbers are formatted straight into the output, and nothing
/// is ever materialized as a typed value in between.
///
/// ```
/// let bytes = b"\x15\x00\x00\x00\x10a\x00\x01\x00\x00\x00\x02b\x00\x03\x00\x00\x00hi\x00\x00";
/// let json = bson2json::Transcoder::new().transcode(bytes, false)?;
/// assert_eq!(json, b"{\"a\":1,\"b\":\"hi\"}");
/// # Ok::<(), bson2json::Error>(())
/// ```
///
/// With a [`PopulateInfo`] attached, 12-byte ids found at registered paths
/// are replaced inline by their pre-transcoded JSON fragments, and ids with
/// no fragment are collected for the caller to fetch.
#[derive(Default)]
pub struct Transcoder<'p> {
    populate: Option<&'p PopulateInfo>,
    chunk_size: Option<usize>,
}

impl Transcoder<'static> {
    pub fn new() -> Self {
        Transcoder {
            populate: None,
            chunk_size: None,
        }
    }
}

impl<'p> Transcoder<'p> {
    /// A transcoder that performs join substitution against `populate`.
    pub fn with_populate(populate: &'p PopulateInfo) -> Self {
        Transcoder {
            populate: Some(populate),
            chunk_size: None,
        }
    }

    /// Overrides the initial output-buffer capacity. The default is 2.5x
    /// the input length, which absorbs typical mixed workloads without a
    /// reallocation.
    pub fn chunk_size(mut self, bytes: usize) -> Self {
        self.chunk_size = Some(bytes);
        self
    }

    /// Transcodes `input` to JSON, growing the output as needed.
    pub fn transcode(&self, input: &[u8], is_array: bool) -> Result<Vec<u8>> {
        let (json, _) = self.transcode_inner(input, is_array)?;
        Ok(json)
    }

    /// Like [`transcode`](Self::transcode), also returning the `_id`
    /// recorded at the document root, if any.
    pub(crate) fn transcode_inner(
        &self,
        input: &[u8],
        is_array: bool,
    ) -> Result<(Vec<u8>, Option<ObjectId>)> {
        let initial = self.chunk_size.unwrap_or((input.len() * 10) >> 2);
        let out = OutputBuffer::grow(initial)?;
        let (out, root_id) = self.drive(input, is_array, out)?;
        Ok((out.into_vec(), root_id))
    }

    /// Runs the walk against a caller-built output buffer (the streaming
    /// controller passes a pause-mode buffer here).
    pub(crate) fn drive(
        &self,
        input: &[u8],
        is_array: bool,
        out: OutputBuffer,
    ) -> Result<(OutputBuffer, Option<ObjectId>)> {
        if input.len() < 5 {
            return Err(Error::InputTooShort);
        }
        let mut walk = Walk {
            input: Reader::new(input),
            out,
            populate: self.populate,
            path: Vec::new(),
            root_id: None,
        };
        walk.document(is_array, 0)?;
        Ok((walk.out, walk.root_id))
    }

    pub(crate) fn transcode_paused(
        &self,
        input: &[u8],
        is_array: bool,
        tx: SyncSender<Vec<u8>>,
        chunk: usize,
    ) -> Result<()> {
        let out = OutputBuffer::pause(tx, chunk)?;
        let (out, _) = self.drive(input, is_array, out)?;
        out.finish_stream()
    }

    /// Walks `input` without emitting anything, recording into the attached
    /// populate index every id found at a joined path whose fragment map
    /// does not contain it. A no-op when no populate index is attached.
    pub fn scan_missing_ids(&self, input: &[u8], is_array: bool) -> Result<()> {
        let Some(populate) = self.populate else {
            return Ok(());
        };
        Scan::new(input, populate).run(is_array)
    }
}

struct Walk<'a, 'p> {
    input: Reader<'a>,
    out: OutputBuffer,
    populate: Option<&'p PopulateInfo>,
    /// Dotted path of the element currently being processed; only
    /// maintained when a populate index is attached.
    path: Vec<u8>,
    root_id: Option<ObjectId>,
}

impl Walk<'_, '_> {
    fn document(&mut self, is_array: bool, depth: usize) -> Result<()> {
        if depth > MAX_DEPTH {
            return Err(Error::DepthLimitExceeded);
        }

        let size = self.input.read_i32("document header")?;
        if size < 5 || (size as usize) - 4 > self.input.remaining() {
            return Err(Error::BadDocumentSize { size });
        }

        let parent_len = self.path.len();
        // Two counters: `index` advances for every element encountered and
        // sizes the skipped array keys; `emitted` counts elements that
        // produced output and drives the lazy comma, so omitted undefined
        // elements leave no artifacts.
        let mut index: u32 = 0;
        let mut emitted: u32 = 0;

        self.out.ensure_space(1)?;
        self.out.push(if is_array { b'[' } else { b'{' });

        loop {
            let tag = self.input.read_u8("element type")?;
            if tag == 0 {
                break;
            }

            if tag == spec::ELEMENT_TYPE_UNDEFINED {
                // Consumes its key, emits nothing.
                if is_array {
                    self.input.skip(fmt::decimal_width(index) + 1, "array key")?;
                } else {
                    self.input.read_cstr()?;
                }
                index += 1;
                continue;
            }

            if emitted > 0 {
                self.out.ensure_space(1)?;
                self.out.push(b',');
            }

            // Array keys are ASCII decimal indexes; their width is implied
            // by the running element index, so they are skipped unparsed.
            let key: &[u8] = if is_array {
                self.input.skip(fmt::decimal_width(index) + 1, "array key")?;
                if self.populate.is_some() {
                    self.path.truncate(parent_len);
                }
                b""
            } else {
                let key = self.input.read_cstr()?;
                self.out.ensure_space(1)?;
                self.out.push(b'"');
                escape::write_escaped(&mut self.out, key)?;
                self.out.ensure_space(2)?;
                self.out.extend(b"\":");
                if self.populate.is_some() {
                    self.path.truncate(parent_len);
                    if parent_len > 0 {
                        self.path.push(b'.');
                    }
                    self.path.extend_from_slice(key);
                }
                key
            };

            match tag {
                spec::ELEMENT_TYPE_STRING => {
                    let len = self.input.read_i32("string header")?;
                    if len <= 0 || len as usize > self.input.remaining() {
                        return Err(Error::BadStringLength { len });
                    }
                    let bytes = self.input.take(len as usize, "string")?;
                    // The declared length includes the trailing NUL.
                    escape::write_escaped_quoted(&mut self.out, &bytes[..len as usize - 1])?;
                }
                spec::ELEMENT_TYPE_OBJECT_ID => {
                    let bytes = self.input.take(12, "ObjectId")?;
                    let id: [u8; 12] = bytes.try_into().unwrap(); // 12 bytes by construction
                    if depth == 0 && !is_array && key == b"_id".as_slice() {
                        self.root_id = Some(ObjectId::from_bytes(id));
                    }
                    self.object_id_value(&id)?;
                }
                spec::ELEMENT_TYPE_INT32 => {
                    let value = self.input.read_i32("Int")?;
                    fmt::write_i32(&mut self.out, value)?;
                }
                spec::ELEMENT_TYPE_INT64 => {
                    let value = self.input.read_i64("Long")?;
                    fmt::write_i64(&mut self.out, value)?;
                }
                spec::ELEMENT_TYPE_DOUBLE => {
                    let value = self.input.read_f64("Number")?;
                    fmt::write_f64(&mut self.out, value)?;
                }
                spec::ELEMENT_TYPE_DATETIME => {
                    let millis = self.input.read_i64("Date")?;
                    fmt::write_datetime(&mut self.out, millis)?;
                }
                spec::ELEMENT_TYPE_BOOLEAN => {
                    let value = self.input.read_u8("Boolean")?;
                    self.out.ensure_space(5)?;
                    self.out
                        .extend(if value == 1 { b"true".as_slice() } else { b"false".as_slice() });
                }
                spec::ELEMENT_TYPE_NULL => {
                    self.out.ensure_space(4)?;
                    self.out.extend(b"null");
                }
                spec::ELEMENT_TYPE_EMBEDDED_DOCUMENT => {
                    self.document(false, depth + 1)?;
                }
                spec::ELEMENT_TYPE_ARRAY => {
                    self.document(true, depth + 1)?;
                    // The recursion leaves the read index one past the
                    // terminator it consumed.
                    if self.input.prev_byte() != 0 {
                        return Err(Error::BadArrayTerminator);
                    }
                }
                _ => return Err(unsupported(tag)),
            }

            index += 1;
            emitted += 1;
        }

        self.out.ensure_space(1)?;
        self.out.push(if is_array { b']' } else { b'}' });
        self.path.truncate(parent_len);
        Ok(())
    }

    /// Emits an ObjectId value: the joined fragment when the current path
    /// has one registered for this id, quoted hex otherwise. Unknown ids at
    /// joined paths are recorded as missing.
    fn object_id_value(&mut self, id: &[u8; 12]) -> Result<()> {
        if let Some(populate) = self.populate {
            if let Some(fragments) = populate.fragments(&self.path) {
                let oid = ObjectId::from_bytes(*id);
                let map = fragments.read().unwrap_or_else(|e| e.into_inner());
                if let Some(fragment) = map.get(&oid) {
                    self.out.ensure_space(fragment.len())?;
                    self.out.extend(fragment);
                    return Ok(());
                }
                drop(map);
                populate.record_missing(&self.path, oid);
            }
        }
        fmt::write_object_id(&mut self.out, id)
    }
}

pub(crate) fn unsupported(tag: u8) -> Error {
    match ElementType::from(tag) {
        Some(_) => Error::UnsupportedType { tag },
        None => Error::UnknownType { tag },
    }
}
