//! Client-side join ("populate") support.
//!
//! A [`PopulateInfo`] maps dotted field paths to fragment maps: for each
//! registered path, ids found there during a transcode are replaced inline
//! by the pre-transcoded JSON fragment stored under that id. Ids with no
//! fragment are collected per path so the caller knows which documents to
//! fetch before the next pass.
//!
//! Fragment maps are reference counted so [`PopulateInfo::repeat_path`] can
//! alias one map under two paths; inserting items through either path is
//! visible through both. The missing-id side lives behind a mutex so the
//! read-only transcode and scan walks can record into it through a shared
//! reference; an index shared across threads needs no further
//! synchronization for those walks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use indexmap::IndexSet;

use crate::error::{Error, Result};
use crate::oid::ObjectId;
use crate::transcode::Transcoder;

pub(crate) type SharedFragments = Arc<RwLock<HashMap<ObjectId, Box<[u8]>>>>;

/// Join state shared across transcode operations.
#[derive(Default)]
pub struct PopulateInfo {
    /// Path -> id -> pre-rendered JSON fragment. Presence of a path marks
    /// it as joined.
    paths: HashMap<Vec<u8>, SharedFragments>,
    /// Path -> ids observed in input but absent from the fragment map, in
    /// encounter order.
    missing: Mutex<HashMap<Vec<u8>, IndexSet<ObjectId>>>,
}

impl PopulateInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transcodes each BSON document in `items` and stores the result in
    /// `path`'s fragment map under the document's `_id`, removing that id
    /// from the path's missing set.
    ///
    /// Registers `path` as joined if it was not already; an empty `items`
    /// registers the path without adding fragments.
    pub fn add_items<I>(&mut self, path: &str, items: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let fragments = self.paths.entry(path.as_bytes().to_vec()).or_default();
        for item in items {
            let (json, root_id) = Transcoder::new().transcode_inner(item.as_ref(), false)?;
            let id = root_id.ok_or(Error::MissingId)?;
            fragments
                .write()
                .unwrap_or_else(|e| e.into_inner())
                .insert(id, json.into_boxed_slice());
            let mut missing = self.missing.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(set) = missing.get_mut(path.as_bytes()) {
                set.shift_remove(&id);
            }
        }
        Ok(())
    }

    /// Makes `dst` share `src`'s fragment map. Items added later through
    /// either path are seen by both.
    pub fn repeat_path(&mut self, src: &str, dst: &str) -> Result<()> {
        let fragments = self
            .paths
            .get(src.as_bytes())
            .cloned()
            .ok_or_else(|| Error::UnknownPath {
                path: src.to_string(),
            })?;
        self.paths.insert(dst.as_bytes().to_vec(), fragments);
        Ok(())
    }

    /// The ids recorded as missing for `path`, in encounter order.
    pub fn missing_ids(&self, path: &str) -> Vec<ObjectId> {
        self.missing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(path.as_bytes())
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    pub(crate) fn fragments<'s>(&'s self, path: &[u8]) -> Option<&'s SharedFragments> {
        self.paths.get(path)
    }

    pub(crate) fn record_missing(&self, path: &[u8], id: ObjectId) {
        self.missing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(path.to_vec())
            .or_default()
            .insert(id);
    }
}
