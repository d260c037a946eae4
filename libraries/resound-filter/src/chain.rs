//! Filter chain for processing PCM blocks
//!
//! Stages run in the order they were added. Opening negotiates formats
//! stage by stage: each stage's output format is the next stage's input.
//! Any failure closes the stages opened so far, newest first, and
//! returns the first error.
use crate::filter::Filter;
use resound_core::{AudioFormat, ResoundError, Result};

/// Ordered composition of filters, itself a filter
pub struct FilterChain {
    stages: Vec<Box<dyn Filter>>,
    /// Negotiated (input, output) format of each opened stage
    formats: Vec<(AudioFormat, AudioFormat)>,
    /// Copy of the last stage's output, valid until the next call
    output: Vec<u8>,
    /// Set once every stage opened, cleared on close or failure
    opened: bool,
}

impl FilterChain {
    /// Create a new empty chain
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            formats: Vec::new(),
            output: Vec::new(),
            opened: false,
        }
    }

    /// Add a filter to the end of the chain
    ///
    /// Must not be called while the chain is open.
    pub fn push(&mut self, filter: Box<dyn Filter>) {
        debug_assert!(!self.opened, "filter added to an open chain");
        self.stages.push(filter);
    }

    /// Get number of stages in chain
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Check if chain is empty
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Whether the chain was opened and has not been closed since
    pub fn is_open(&self) -> bool {
        self.opened
    }

    /// The (input, output) format of each opened stage
    pub fn negotiated_formats(&self) -> &[(AudioFormat, AudioFormat)] {
        &self.formats
    }

    /// Get the stage names, in processing order
    pub fn stage_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.stages.iter().map(|stage| stage.name())
    }

    /// Close opened stages in reverse order
    fn close_opened(&mut self) {
        self.opened = false;
        while self.formats.pop().is_some() {
            let stage = &mut self.stages[self.formats.len()];
            tracing::debug!(stage = stage.name(), "Closing filter stage");
            stage.close();
        }
    }

    fn run_stages(
        stages: &mut [Box<dyn Filter>],
        src: &[u8],
        output: &mut Vec<u8>,
    ) -> Result<()> {
        let mut data = src;
        for stage in stages.iter_mut() {
            data = stage.filter(data)?;
        }

        output.clear();
        output.extend_from_slice(data);
        Ok(())
    }
}

impl Filter for FilterChain {
    fn open(&mut self, in_format: AudioFormat) -> Result<AudioFormat> {
        debug_assert!(!self.opened, "filter chain opened twice");

        let mut format = in_format;
        for index in 0..self.stages.len() {
            let stage = &mut self.stages[index];
            match stage.open(format) {
                Ok(out_format) => {
                    self.formats.push((format, out_format));

                    if !out_format.is_valid() {
                        let err = ResoundError::format_negotiation(format!(
                            "filter '{}' produced invalid audio format {}",
                            self.stages[index].name(),
                            out_format
                        ));
                        self.close_opened();
                        return Err(err);
                    }

                    tracing::debug!(
                        stage = self.stages[index].name(),
                        input = %format,
                        output = %out_format,
                        "Opened filter stage"
                    );
                    format = out_format;
                }
                Err(err) => {
                    tracing::debug!(
                        stage = self.stages[index].name(),
                        input = %format,
                        error = %err,
                        "Filter stage rejected format"
                    );
                    self.close_opened();
                    return Err(err);
                }
            }
        }

        self.opened = true;
        Ok(format)
    }

    fn filter<'a>(&'a mut self, src: &'a [u8]) -> Result<&'a [u8]> {
        if !self.opened {
            return Err(ResoundError::processing("filter chain is not open"));
        }

        match Self::run_stages(&mut self.stages, src, &mut self.output) {
            Ok(()) => Ok(&self.output),
            Err(err) => {
                self.close_opened();
                Err(err)
            }
        }
    }

    fn close(&mut self) {
        self.close_opened();
        self.output = Vec::new();
    }

    fn name(&self) -> &str {
        "chain"
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::new()
    }
}
