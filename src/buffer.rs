//! Output-buffer management.
//!
//! All writes into the JSON output funnel through [`OutputBuffer`]. Space is
//! negotiated once per value (or per clean run of string bytes) through
//! [`OutputBuffer::ensure_space`]; the subsequent writes are plain appends.
//!
//! Two modes exist. *Grow* reallocates at 1.5x (with a floor of the
//! request) and keeps everything in one buffer that the caller takes on
//! success. *Pause* holds capacity fixed: a full buffer is handed to the
//! consumer over a rendezvous channel and a fresh one takes its place, so
//! the producer can never run more than one chunk ahead.

use std::mem;
use std::sync::mpsc::SyncSender;

use crate::error::{Error, Result};

enum Sink {
    Grow,
    Pause { tx: SyncSender<Vec<u8>>, chunk: usize },
}

pub(crate) struct OutputBuffer {
    buf: Vec<u8>,
    sink: Sink,
}

impl OutputBuffer {
    /// A growable buffer with the given initial capacity.
    pub fn grow(initial: usize) -> Result<OutputBuffer> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(initial)
            .map_err(|_| Error::AllocationFailure)?;
        Ok(OutputBuffer {
            buf,
            sink: Sink::Grow,
        })
    }

    /// A fixed-capacity buffer that ships filled chunks through `tx`.
    pub fn pause(tx: SyncSender<Vec<u8>>, chunk: usize) -> Result<OutputBuffer> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(chunk)
            .map_err(|_| Error::AllocationFailure)?;
        Ok(OutputBuffer {
            buf,
            sink: Sink::Pause { tx, chunk },
        })
    }

    /// Guarantees that `n` bytes can be appended without reallocation.
    #[inline]
    pub fn ensure_space(&mut self, n: usize) -> Result<()> {
        if self.buf.len() + n <= self.buf.capacity() {
            return Ok(());
        }
        self.make_space(n)
    }

    #[cold]
    fn make_space(&mut self, n: usize) -> Result<()> {
        match &self.sink {
            Sink::Grow => {
                let want = usize::max(
                    self.buf.len() + n,
                    self.buf.capacity() + self.buf.capacity() / 2,
                );
                self.buf
                    .try_reserve_exact(want - self.buf.len())
                    .map_err(|_| Error::AllocationFailure)
            }
            Sink::Pause { tx, chunk } => {
                // A value wider than the chunk gets a one-off larger buffer
                // rather than stalling the handshake.
                let capacity = usize::max(*chunk, n);
                let tx = tx.clone();
                if !self.buf.is_empty() {
                    let full = mem::take(&mut self.buf);
                    tx.send(full).map_err(|_| Error::StreamClosed)?;
                }
                let mut fresh = Vec::new();
                fresh
                    .try_reserve_exact(capacity)
                    .map_err(|_| Error::AllocationFailure)?;
                self.buf = fresh;
                Ok(())
            }
        }
    }

    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    #[inline]
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Takes the accumulated output (grow mode).
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    /// Ships the final partial chunk (pause mode). Dropping the buffer
    /// afterwards disconnects the channel, which is the completion signal.
    pub fn finish_stream(self) -> Result<()> {
        if let Sink::Pause { tx, .. } = &self.sink {
            if !self.buf.is_empty() {
                let tx = tx.clone();
                tx.send(self.buf).map_err(|_| Error::StreamClosed)?;
            }
        }
        Ok(())
    }
}
