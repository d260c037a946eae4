//! An opened filter owned by one playback session
//!
//! `FilterSession` is the only way callers outside this crate drive a
//! filter: it exists only after a successful `open()` and closes the
//! filter exactly once, either through `close()` or when dropped on an
//! error path.

use crate::filter::Filter;
use resound_core::{AudioFormat, ResoundError, Result};
use std::io::{ErrorKind, Read, Write};
use thiserror::Error;

/// Bytes read from the input per `filter()` call in [`FilterSession::pump`]
pub const PUMP_CHUNK_SIZE: usize = 4096;

/// Failure while streaming through a session
#[derive(Error, Debug)]
pub enum PumpError {
    #[error("Failed to read: {0}")]
    Read(std::io::Error),

    #[error("Filter failed: {0}")]
    Filter(ResoundError),

    #[error("Failed to write: {0}")]
    Write(std::io::Error),
}

impl From<PumpError> for ResoundError {
    fn from(err: PumpError) -> Self {
        match err {
            PumpError::Read(e) | PumpError::Write(e) => ResoundError::Io(e),
            PumpError::Filter(e) => e,
        }
    }
}

/// An open filter together with its negotiated formats
///
/// Closing is idempotent; dropping an open session closes it.
pub struct FilterSession {
    filter: Box<dyn Filter>,
    in_format: AudioFormat,
    out_format: AudioFormat,
    open: bool,
}

impl FilterSession {
    /// Open `filter` for `in_format`
    ///
    /// On failure the filter is dropped without being closed.
    pub fn open(mut filter: Box<dyn Filter>, in_format: AudioFormat) -> Result<Self> {
        let out_format = filter.open(in_format)?;
        tracing::debug!(
            filter = filter.name(),
            input = %in_format,
            output = %out_format,
            "Filter session opened"
        );

        Ok(Self {
            filter,
            in_format,
            out_format,
            open: true,
        })
    }

    pub fn in_format(&self) -> AudioFormat {
        self.in_format
    }

    /// Format of the bytes returned by `filter()`
    pub fn out_format(&self) -> AudioFormat {
        self.out_format
    }

    pub fn name(&self) -> &str {
        self.filter.name()
    }

    /// Transform one block; the result borrows the session until the next call
    pub fn filter<'a>(&'a mut self, src: &'a [u8]) -> Result<&'a [u8]> {
        self.filter.filter(src)
    }

    /// Stream `input` through the filter into `output` until end of input
    ///
    /// Reads `PUMP_CHUNK_SIZE` bytes at a time; a zero-length read ends the
    /// stream. Returns the number of bytes written. Stops at the first error.
    pub fn pump<R: Read, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> std::result::Result<u64, PumpError> {
        let mut buffer = [0u8; PUMP_CHUNK_SIZE];
        let mut written = 0u64;

        loop {
            let nbytes = match input.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(PumpError::Read(e)),
            };

            let dest = self
                .filter
                .filter(&buffer[..nbytes])
                .map_err(PumpError::Filter)?;
            output.write_all(dest).map_err(PumpError::Write)?;
            written += dest.len() as u64;
        }

        output.flush().map_err(PumpError::Write)?;
        Ok(written)
    }

    /// Close the filter
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if self.open {
            self.open = false;
            tracing::debug!(filter = self.filter.name(), "Filter session closed");
            self.filter.close();
        }
    }
}

impl Drop for FilterSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
