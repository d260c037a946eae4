//! Rubato resampler backend
//!
//! Streaming sample rate conversion for the convert filter. Input is
//! buffered until a full rubato chunk is available, so a block may produce
//! no output at all; that latency is part of the filter contract.

use resound_core::{ResoundError, Result};
use rubato::{
    FastFixedIn, PolynomialDegree, Resampler as RubatoResamplerTrait, SincFixedIn,
    SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use std::collections::VecDeque;
use std::str::FromStr;

/// Frames handed to rubato per process call
const CHUNK_SIZE: usize = 1024;

/// Largest supported ratio between output and input rate, either way
const MAX_RATE_RATIO: u64 = 64;

/// Resampling quality presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResamplingQuality {
    /// Linear polynomial interpolation, low CPU
    #[default]
    Fast,
    /// Windowed sinc interpolation
    High,
}

impl FromStr for ResamplingQuality {
    type Err = ResoundError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fast" => Ok(Self::Fast),
            "high" => Ok(Self::High),
            _ => Err(ResoundError::config(format!(
                "Unknown resampling quality {s:?} (expected \"fast\" or \"high\")"
            ))),
        }
    }
}

/// Enum to hold different rubato resampler types
enum RubatoResamplerType {
    Fast(FastFixedIn<f32>),
    Sinc(SincFixedIn<f32>),
}

/// Rubato-based resampler over interleaved f32 samples
pub struct RubatoResampler {
    resampler: RubatoResamplerType,
    channels: usize,
    /// Buffer for accumulating input samples when they don't fill a complete chunk
    input_buffer: VecDeque<f32>,
}

impl RubatoResampler {
    /// Create a new rubato resampler
    pub fn new(
        input_rate: u32,
        output_rate: u32,
        channels: usize,
        quality: ResamplingQuality,
    ) -> Result<Self> {
        let (input, output) = (u64::from(input_rate), u64::from(output_rate));
        if input == 0
            || output == 0
            || output > input * MAX_RATE_RATIO
            || input > output * MAX_RATE_RATIO
        {
            return Err(ResoundError::format_negotiation(format!(
                "Cannot resample {input_rate} Hz to {output_rate} Hz: \
                 ratio exceeds {MAX_RATE_RATIO}"
            )));
        }

        let ratio = f64::from(output_rate) / f64::from(input_rate);

        let resampler = match quality {
            ResamplingQuality::Fast => RubatoResamplerType::Fast(
                FastFixedIn::new(ratio, 1.0, PolynomialDegree::Linear, CHUNK_SIZE, channels)
                    .map_err(|e| {
                        ResoundError::format_negotiation(format!(
                            "Cannot resample {input_rate} Hz to {output_rate} Hz: {e}"
                        ))
                    })?,
            ),
            ResamplingQuality::High => {
                let params = SincInterpolationParameters {
                    sinc_len: 128,
                    f_cutoff: 0.95,
                    interpolation: SincInterpolationType::Cubic,
                    oversampling_factor: 256,
                    window: WindowFunction::BlackmanHarris2,
                };
                RubatoResamplerType::Sinc(
                    SincFixedIn::new(ratio, 1.0, params, CHUNK_SIZE, channels).map_err(|e| {
                        ResoundError::format_negotiation(format!(
                            "Cannot resample {input_rate} Hz to {output_rate} Hz: {e}"
                        ))
                    })?,
                )
            }
        };

        Ok(Self {
            resampler,
            channels,
            input_buffer: VecDeque::new(),
        })
    }

    /// Get expected input frame count for the next process call
    fn input_frames_next(&self) -> usize {
        match &self.resampler {
            RubatoResamplerType::Fast(r) => r.input_frames_next(),
            RubatoResamplerType::Sinc(r) => r.input_frames_next(),
        }
    }

    /// Get the latency in output frames
    pub fn latency(&self) -> usize {
        match &self.resampler {
            RubatoResamplerType::Fast(r) => r.output_delay(),
            RubatoResamplerType::Sinc(r) => r.output_delay(),
        }
    }

    /// Deinterleave samples from [L, R, L, R, ...] to [[L, L, ...], [R, R, ...]]
    fn deinterleave(&self, interleaved: &[f32]) -> Vec<Vec<f32>> {
        let frames = interleaved.len() / self.channels;
        let mut channels = vec![Vec::with_capacity(frames); self.channels];

        for frame in interleaved.chunks_exact(self.channels) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }

        channels
    }

    /// Interleave samples from [[L, L, ...], [R, R, ...]] onto `dest`
    fn interleave(&self, channels: &[Vec<f32>], dest: &mut Vec<f32>) {
        let frames = channels.first().map_or(0, Vec::len);
        dest.reserve(frames * self.channels);

        for frame_idx in 0..frames {
            for channel in channels {
                dest.push(channel[frame_idx]);
            }
        }
    }

    /// Resample whole frames from `input`, appending finished output to `dest`
    pub fn process(&mut self, input: &[f32], dest: &mut Vec<f32>) -> Result<()> {
        if input.len() % self.channels != 0 {
            return Err(ResoundError::processing(format!(
                "Input buffer size {} is not a multiple of channel count {}",
                input.len(),
                self.channels
            )));
        }

        self.input_buffer.extend(input.iter().copied());

        // Only hand rubato exactly the number of frames it asks for
        loop {
            let needed_samples = self.input_frames_next() * self.channels;
            if self.input_buffer.len() < needed_samples {
                break;
            }

            let chunk: Vec<f32> = self.input_buffer.drain(..needed_samples).collect();
            let input_channels = self.deinterleave(&chunk);

            let output_channels = match &mut self.resampler {
                RubatoResamplerType::Fast(r) => r.process(&input_channels, None),
                RubatoResamplerType::Sinc(r) => r.process(&input_channels, None),
            }
            .map_err(|e| ResoundError::processing(format!("Resampling failed: {e}")))?;

            self.interleave(&output_channels, dest);
        }

        Ok(())
    }
}
