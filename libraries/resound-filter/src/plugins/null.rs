/// Identity filter
use crate::filter::Filter;
use resound_core::{AudioFormat, ConfigBlock, Result};

/// Passes every block through unchanged
#[derive(Debug, Default)]
pub struct NullFilter {
    opened: bool,
}

impl NullFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_config(_block: &ConfigBlock) -> Result<Box<dyn Filter>> {
        Ok(Box::new(Self::new()))
    }
}

impl Filter for NullFilter {
    fn open(&mut self, in_format: AudioFormat) -> Result<AudioFormat> {
        debug_assert!(!self.opened, "null filter opened twice");
        self.opened = true;
        Ok(in_format)
    }

    fn filter<'a>(&'a mut self, src: &'a [u8]) -> Result<&'a [u8]> {
        Ok(src)
    }

    fn close(&mut self) {
        self.opened = false;
    }

    fn name(&self) -> &str {
        "null"
    }
}
