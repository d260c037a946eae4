/// Audio-related types
use crate::error::{ResoundError, Result};
use std::fmt;
use std::str::FromStr;

/// Highest sample rate accepted anywhere in the pipeline
pub const MAX_SAMPLE_RATE: u32 = 768_000;

/// Highest channel count accepted anywhere in the pipeline
pub const MAX_CHANNELS: u8 = 8;

/// PCM sample encoding
///
/// All encodings are signed and stored in host byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleFormat {
    /// 8-bit integer
    S8,
    /// 16-bit integer
    S16,
    /// 24-bit integer stored in the low bits of a 32-bit container
    S24P32,
    /// 32-bit integer
    S32,
    /// 32-bit IEEE float in [-1.0, 1.0]
    Float,
}

impl SampleFormat {
    /// Size of one sample in bytes
    pub fn sample_size(self) -> usize {
        match self {
            Self::S8 => 1,
            Self::S16 => 2,
            Self::S24P32 | Self::S32 | Self::Float => 4,
        }
    }

    /// Bit-depth name used in the `rate:bits:channels` notation
    pub fn as_str(self) -> &'static str {
        match self {
            Self::S8 => "8",
            Self::S16 => "16",
            Self::S24P32 => "24",
            Self::S32 => "32",
            Self::Float => "f",
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SampleFormat {
    type Err = ResoundError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "8" => Ok(Self::S8),
            "16" => Ok(Self::S16),
            "24" => Ok(Self::S24P32),
            "32" => Ok(Self::S32),
            "f" => Ok(Self::Float),
            _ => Err(ResoundError::config(format!(
                "Invalid sample format: {s:?}"
            ))),
        }
    }
}

/// Audio format information
///
/// Produced by format negotiation and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AudioFormat {
    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Sample encoding
    pub format: SampleFormat,

    /// Number of channels (1 = mono, 2 = stereo, etc.)
    pub channels: u8,
}

impl AudioFormat {
    /// Create a new audio format
    pub const fn new(sample_rate: u32, format: SampleFormat, channels: u8) -> Self {
        Self {
            sample_rate,
            format,
            channels,
        }
    }

    /// Create CD quality stereo format (44.1kHz, 16-bit, stereo)
    pub const fn cd_quality() -> Self {
        Self::new(44_100, SampleFormat::S16, 2)
    }

    /// Check rate and channel count against the supported ranges
    pub fn is_valid(&self) -> bool {
        (1..=MAX_SAMPLE_RATE).contains(&self.sample_rate)
            && (1..=MAX_CHANNELS).contains(&self.channels)
    }

    /// Size of one sample in bytes
    pub fn sample_size(&self) -> usize {
        self.format.sample_size()
    }

    /// Size of one frame (one sample per channel) in bytes
    pub fn frame_size(&self) -> usize {
        self.sample_size() * usize::from(self.channels)
    }

    /// Calculate the byte rate (bytes per second)
    pub fn byte_rate(&self) -> u64 {
        u64::from(self.sample_rate) * self.frame_size() as u64
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self::cd_quality()
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.sample_rate, self.format, self.channels)
    }
}

impl FromStr for AudioFormat {
    type Err = ResoundError;

    /// Parse `rate:bits:channels`; wildcards are rejected
    fn from_str(s: &str) -> Result<Self> {
        let mask: AudioFormatMask = s.parse()?;
        match (mask.sample_rate, mask.format, mask.channels) {
            (Some(sample_rate), Some(format), Some(channels)) => {
                Ok(Self::new(sample_rate, format, channels))
            }
            _ => Err(ResoundError::config(format!(
                "Wildcards are not allowed in audio format {s:?}"
            ))),
        }
    }
}

/// An audio format where each field may be left open with `*`
///
/// Used by plugins that are configured with a target format and keep
/// whatever the input provides for the unspecified fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AudioFormatMask {
    pub sample_rate: Option<u32>,
    pub format: Option<SampleFormat>,
    pub channels: Option<u8>,
}

impl AudioFormatMask {
    /// Fill the open fields from `input`
    pub fn apply(&self, input: AudioFormat) -> AudioFormat {
        AudioFormat {
            sample_rate: self.sample_rate.unwrap_or(input.sample_rate),
            format: self.format.unwrap_or(input.format),
            channels: self.channels.unwrap_or(input.channels),
        }
    }
}

impl FromStr for AudioFormatMask {
    type Err = ResoundError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split(':');
        let (Some(rate), Some(bits), Some(channels), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ResoundError::config(format!(
                "Audio format must be rate:bits:channels, got {s:?}"
            )));
        };

        let sample_rate = match rate {
            "*" => None,
            _ => {
                let rate: u32 = rate.parse().map_err(|_| {
                    ResoundError::config(format!("Failed to parse sample rate: {rate:?}"))
                })?;
                if !(1..=MAX_SAMPLE_RATE).contains(&rate) {
                    return Err(ResoundError::config(format!(
                        "Invalid sample rate: {rate}"
                    )));
                }
                Some(rate)
            }
        };

        let format = match bits {
            "*" => None,
            _ => Some(bits.parse()?),
        };

        let channels = match channels {
            "*" => None,
            _ => {
                let count: u8 = channels.parse().map_err(|_| {
                    ResoundError::config(format!(
                        "Failed to parse channel count: {channels:?}"
                    ))
                })?;
                if !(1..=MAX_CHANNELS).contains(&count) {
                    return Err(ResoundError::config(format!(
                        "Invalid channel count: {count}"
                    )));
                }
                Some(count)
            }
        };

        Ok(Self {
            sample_rate,
            format,
            channels,
        })
    }
}
