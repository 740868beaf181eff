//! The pre-scan pass: the transcode walk with the output elided.
//!
//! Traversal, framing validation and path bookkeeping are identical to the
//! emitting walk; values are skipped by their wire width. The only product
//! is the set of ids at joined paths that have no fragment yet.

use crate::error::{Error, Result};
use crate::fmt;
use crate::oid::ObjectId;
use crate::populate::PopulateInfo;
use crate::reader::Reader;
use crate::spec;
use crate::transcode::{unsupported, MAX_DEPTH};

pub(crate) struct Scan<'a, 'p> {
    input: Reader<'a>,
    populate: &'p PopulateInfo,
    path: Vec<u8>,
}

impl<'a, 'p> Scan<'a, 'p> {
    pub fn new(input: &'a [u8], populate: &'p PopulateInfo) -> Self {
        Scan {
            input: Reader::new(input),
            populate,
            path: Vec::new(),
        }
    }

    pub fn run(mut self, is_array: bool) -> Result<()> {
        if self.input.len() < 5 {
            return Err(Error::InputTooShort);
        }
        self.document(is_array, 0)
    }

    fn document(&mut self, is_array: bool, depth: usize) -> Result<()> {
        if depth > MAX_DEPTH {
            return Err(Error::DepthLimitExceeded);
        }

        let size = self.input.read_i32("document header")?;
        if size < 5 || (size as usize) - 4 > self.input.remaining() {
            return Err(Error::BadDocumentSize { size });
        }

        let parent_len = self.path.len();
        let mut index: u32 = 0;

        loop {
            let tag = self.input.read_u8("element type")?;
            if tag == 0 {
                break;
            }

            if is_array {
                self.input.skip(fmt::decimal_width(index) + 1, "array key")?;
                self.path.truncate(parent_len);
            } else {
                let key = self.input.read_cstr()?;
                self.path.truncate(parent_len);
                if parent_len > 0 {
                    self.path.push(b'.');
                }
                self.path.extend_from_slice(key);
            }

            match tag {
                spec::ELEMENT_TYPE_STRING => {
                    let len = self.input.read_i32("string header")?;
                    if len <= 0 || len as usize > self.input.remaining() {
                        return Err(Error::BadStringLength { len });
                    }
                    self.input.skip(len as usize, "string")?;
                }
                spec::ELEMENT_TYPE_OBJECT_ID => {
                    let bytes = self.input.take(12, "ObjectId")?;
                    if let Some(fragments) = self.populate.fragments(&self.path) {
                        let id = ObjectId::from_bytes(bytes.try_into().unwrap());
                        let known = fragments
                            .read()
                            .unwrap_or_else(|e| e.into_inner())
                            .contains_key(&id);
                        if !known {
                            self.populate.record_missing(&self.path, id);
                        }
                    }
                }
                spec::ELEMENT_TYPE_INT32 => self.input.skip(4, "Int")?,
                spec::ELEMENT_TYPE_INT64 => self.input.skip(8, "Long")?,
                spec::ELEMENT_TYPE_DOUBLE => self.input.skip(8, "Number")?,
                spec::ELEMENT_TYPE_DATETIME => self.input.skip(8, "Date")?,
                spec::ELEMENT_TYPE_BOOLEAN => self.input.skip(1, "Boolean")?,
                spec::ELEMENT_TYPE_NULL | spec::ELEMENT_TYPE_UNDEFINED => {}
                spec::ELEMENT_TYPE_EMBEDDED_DOCUMENT => {
                    self.document(false, depth + 1)?;
                }
                spec::ELEMENT_TYPE_ARRAY => {
                    self.document(true, depth + 1)?;
                    if self.input.prev_byte() != 0 {
                        return Err(Error::BadArrayTerminator);
                    }
                }
                _ => return Err(unsupported(tag)),
            }

            index += 1;
        }

        self.path.truncate(parent_len);
        Ok(())
    }
}
