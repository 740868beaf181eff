//! Streaming transcode: a producer task paired with a pulling consumer.
//!
//! The producer runs the ordinary walk against a fixed-capacity pause-mode
//! buffer; every time the buffer fills, the chunk crosses a rendezvous
//! channel to the consumer. A rendezvous (zero-capacity) channel gives the
//! pause protocol directly: the producer blocks in `send` until the
//! consumer pulls, so at most one chunk is ever in flight and nothing is
//! produced before the first [`JsonStream::next`] call.

use std::sync::mpsc::{sync_channel, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use bytes::Bytes;

use crate::error::Result;
use crate::populate::PopulateInfo;
use crate::transcode::Transcoder;

/// Configuration for a [`JsonStream`].
pub struct StreamBuilder {
    input: Bytes,
    is_array: bool,
    chunk_size: Option<usize>,
    populate: Option<Arc<PopulateInfo>>,
}

impl StreamBuilder {
    /// Fixed capacity of each output chunk. Defaults to 2.5x the input
    /// length.
    pub fn chunk_size(mut self, bytes: usize) -> Self {
        self.chunk_size = Some(bytes);
        self
    }

    /// Join substitution state for the walk.
    pub fn populate(mut self, populate: Arc<PopulateInfo>) -> Self {
        self.populate = Some(populate);
        self
    }

    /// Spawns the producer and returns the consuming end.
    pub fn build(self) -> JsonStream {
        let StreamBuilder {
            input,
            is_array,
            chunk_size,
            populate,
        } = self;
        let chunk = chunk_size.unwrap_or((input.len() * 10) >> 2).max(1);
        let (tx, rx) = sync_channel::<Vec<u8>>(0);

        let handle = thread::spawn(move || -> Result<()> {
            let transcoder = match populate.as_deref() {
                Some(populate) => Transcoder::with_populate(populate),
                None => Transcoder::new(),
            };
            transcoder.transcode_paused(&input, is_array, tx, chunk)
        });

        JsonStream {
            rx: Some(rx),
            handle: Some(handle),
            done: false,
        }
    }
}

/// An iterator over JSON output chunks produced on a background thread.
///
/// Chunks concatenate to exactly the bytes a one-shot
/// [`Transcoder::transcode`] call would return. A transcoding error ends
/// iteration: it is yielded on the pull after the last good chunk, and the
/// next pull returns `None`. Dropping the stream early disconnects the
/// producer, which then winds down and is joined.
pub struct JsonStream {
    rx: Option<Receiver<Vec<u8>>>,
    handle: Option<JoinHandle<Result<()>>>,
    done: bool,
}

impl JsonStream {
    /// Starts building a stream over one BSON document.
    pub fn builder(input: impl Into<Bytes>, is_array: bool) -> StreamBuilder {
        StreamBuilder {
            input: input.into(),
            is_array,
            chunk_size: None,
            populate: None,
        }
    }

    /// A stream with default options.
    pub fn new(input: impl Into<Bytes>, is_array: bool) -> JsonStream {
        JsonStream::builder(input, is_array).build()
    }

    fn join_producer(&mut self) -> Option<Result<Vec<u8>>> {
        match self.handle.take() {
            Some(handle) => match handle.join() {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(Err(e)),
                Err(panic) => std::panic::resume_unwind(panic),
            },
            None => None,
        }
    }
}

impl Iterator for JsonStream {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let rx = self.rx.as_ref()?;
        match rx.recv() {
            Ok(chunk) => Some(Ok(chunk)),
            Err(_) => {
                // Channel disconnected: the producer finished or failed.
                self.done = true;
                self.join_producer()
            }
        }
    }
}

impl Drop for JsonStream {
    fn drop(&mut self) {
        // Disconnect first so a producer blocked in `send` unwinds with
        // `StreamClosed` instead of deadlocking the join.
        self.rx = None;
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
