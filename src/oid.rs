//! ObjectId

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};

/// A wrapper around a raw 12-byte ObjectId representation:
///
/// a 4-byte timestamp, a 5-byte random value and a 3-byte incrementing
/// counter. This crate never generates ids; they only ever arrive inside
/// input documents or as 24-character hex strings.
///
/// Equality compares all 12 bytes. Hashing uses only the trailing 8 bytes:
/// those carry the random component and the counter, which is sufficient
/// for uniform distribution, and it keeps the hash a single 64-bit load.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ObjectId {
    id: [u8; 12],
}

impl ObjectId {
    /// Constructs an ObjectId from its raw byte representation.
    pub const fn from_bytes(bytes: [u8; 12]) -> ObjectId {
        ObjectId { id: bytes }
    }

    /// Parses an ObjectId from a 24-character hexadecimal string.
    pub fn parse_str(s: &str) -> Result<ObjectId> {
        let bytes = hex::decode(s.as_bytes()).map_err(|e| Error::InvalidObjectId {
            message: e.to_string(),
        })?;
        let id: [u8; 12] = bytes.try_into().map_err(|_| Error::InvalidObjectId {
            message: "expected a 12-byte (24-character) hex string".to_string(),
        })?;
        Ok(ObjectId { id })
    }

    /// Returns the raw byte representation.
    pub const fn bytes(&self) -> [u8; 12] {
        self.id
    }

    /// Converts the id to its lowercase hex representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.id)
    }
}

impl Hash for ObjectId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut tail = [0u8; 8];
        tail.copy_from_slice(&self.id[4..12]);
        state.write_u64(u64::from_le_bytes(tail));
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}
