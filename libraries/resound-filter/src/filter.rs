/// The filter capability
use resound_core::{AudioFormat, Result};

/// A pluggable PCM transform stage
///
/// # Lifecycle
/// 1. `open()` exactly once, negotiating the output format
/// 2. `filter()` any number of times
/// 3. `close()` exactly once, and only if `open()` succeeded
///
/// Opening twice is a contract violation, not a runtime error.
/// [`FilterSession`](crate::FilterSession) and [`FilterChain`](crate::FilterChain)
/// enforce this ordering for their callers.
pub trait Filter: Send {
    /// Validate `in_format` and return the format `filter()` will emit
    fn open(&mut self, in_format: AudioFormat) -> Result<AudioFormat>;

    /// Transform a block of bytes in the input format
    ///
    /// The returned slice stays valid until the next call on this filter.
    /// It may be shorter or longer than `src`, and may be empty while the
    /// filter buffers input. `src` need not be aligned to whole frames.
    fn filter<'a>(&'a mut self, src: &'a [u8]) -> Result<&'a [u8]>;

    /// Release resources acquired by `open()`
    fn close(&mut self);

    /// Plugin name (for diagnostics)
    fn name(&self) -> &str;
}
