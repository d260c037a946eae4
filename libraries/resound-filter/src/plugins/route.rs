//! Channel routing filter
//!
//! `routes = "0>1, 1>0"` copies input channel 0 to output channel 1 and
//! input channel 1 to output channel 0. The output has one channel per
//! destination up to the highest one named; destinations without a route
//! are silent. When two routes name the same destination, the later wins.

use crate::filter::Filter;
use crate::pcm::Carry;
use resound_core::types::MAX_CHANNELS;
use resound_core::{AudioFormat, ConfigBlock, ResoundError, Result};

#[derive(Debug)]
struct Opened {
    in_format: AudioFormat,
    carry: Carry,
    frames: Vec<u8>,
    buffer: Vec<u8>,
}

#[derive(Debug)]
pub struct RouteFilter {
    /// Source channel for each output channel
    sources: Vec<Option<u8>>,
    /// Input must carry at least this many channels
    min_input_channels: u8,
    state: Option<Opened>,
}

impl RouteFilter {
    /// Parse a route list such as `"0>1, 1>0"`
    pub fn parse(routes: &str) -> Result<Self> {
        let mut pairs = Vec::new();
        for route in routes.split(',').map(str::trim).filter(|r| !r.is_empty()) {
            let (source, dest) = route.split_once('>').ok_or_else(|| {
                ResoundError::config(format!("Malformed route {route:?}, expected source>dest"))
            })?;
            pairs.push((parse_channel(source)?, parse_channel(dest)?));
        }

        if pairs.is_empty() {
            return Err(ResoundError::config("route filter needs at least one route"));
        }

        let out_channels = pairs.iter().map(|&(_, dest)| dest).max().unwrap_or(0) + 1;
        let min_input_channels = pairs.iter().map(|&(source, _)| source).max().unwrap_or(0) + 1;

        let mut sources = vec![None; usize::from(out_channels)];
        for (source, dest) in pairs {
            sources[usize::from(dest)] = Some(source);
        }

        Ok(Self {
            sources,
            min_input_channels,
            state: None,
        })
    }

    pub(crate) fn from_config(block: &ConfigBlock) -> Result<Box<dyn Filter>> {
        Ok(Box::new(Self::parse(block.require("routes")?)?))
    }

    pub fn out_channels(&self) -> u8 {
        self.sources.len() as u8
    }
}

fn parse_channel(text: &str) -> Result<u8> {
    let channel: u8 = text
        .trim()
        .parse()
        .map_err(|_| ResoundError::config(format!("Invalid channel number {text:?}")))?;
    if channel >= MAX_CHANNELS {
        return Err(ResoundError::config(format!(
            "Channel {channel} is out of range (max {})",
            MAX_CHANNELS - 1
        )));
    }
    Ok(channel)
}

impl Filter for RouteFilter {
    fn open(&mut self, in_format: AudioFormat) -> Result<AudioFormat> {
        debug_assert!(self.state.is_none(), "route filter opened twice");

        if in_format.channels < self.min_input_channels {
            return Err(ResoundError::format_negotiation(format!(
                "route filter needs at least {} input channels, got {}",
                self.min_input_channels, in_format.channels
            )));
        }

        self.state = Some(Opened {
            in_format,
            carry: Carry::new(in_format.frame_size()),
            frames: Vec::new(),
            buffer: Vec::new(),
        });

        Ok(AudioFormat {
            channels: self.out_channels(),
            ..in_format
        })
    }

    fn filter<'a>(&'a mut self, src: &'a [u8]) -> Result<&'a [u8]> {
        let opened = self
            .state
            .as_mut()
            .ok_or_else(|| ResoundError::processing("route filter is not open"))?;

        let sample_size = opened.in_format.sample_size();
        let silence = [0u8; 4];

        opened.carry.feed(src, &mut opened.frames);
        opened.buffer.clear();
        for frame in opened.frames.chunks_exact(opened.in_format.frame_size()) {
            for source in &self.sources {
                let sample = match source {
                    Some(channel) => {
                        let start = usize::from(*channel) * sample_size;
                        &frame[start..start + sample_size]
                    }
                    None => &silence[..sample_size],
                };
                opened.buffer.extend_from_slice(sample);
            }
        }

        Ok(&opened.buffer)
    }

    fn close(&mut self) {
        self.state = None;
    }

    fn name(&self) -> &str {
        "route"
    }
}
