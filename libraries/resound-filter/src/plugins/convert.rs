//! Format conversion filter
//!
//! Configured with a target `format` mask, e.g. `"48000:f:*"`; fields left
//! as `*` keep the input's value. Converts sample encoding, channel count
//! (to mono by averaging, from mono by duplication) and sample rate. An
//! optional `quality` of `fast` (default) or `high` picks the resampler.

use crate::filter::Filter;
use crate::pcm::{decode_to_f32, encode_from_f32, Carry};
use crate::resampling::{ResamplingQuality, RubatoResampler};
use resound_core::{AudioFormat, AudioFormatMask, ConfigBlock, ResoundError, Result};

struct Opened {
    in_format: AudioFormat,
    out_format: AudioFormat,
    carry: Carry,
    resampler: Option<RubatoResampler>,
    frames: Vec<u8>,
    samples: Vec<f32>,
    remapped: Vec<f32>,
    resampled: Vec<f32>,
    buffer: Vec<u8>,
}

pub struct ConvertFilter {
    target: AudioFormatMask,
    quality: ResamplingQuality,
    state: Option<Opened>,
}

impl ConvertFilter {
    pub fn new(target: AudioFormatMask, quality: ResamplingQuality) -> Self {
        Self {
            target,
            quality,
            state: None,
        }
    }

    pub(crate) fn from_config(block: &ConfigBlock) -> Result<Box<dyn Filter>> {
        let target = block.require("format")?.parse()?;
        let quality = block.get_str_or("quality", "fast").parse()?;
        Ok(Box::new(Self::new(target, quality)))
    }
}

/// Map interleaved frames from `from` channels to `to` channels
fn remap_channels(src: &[f32], from: u8, to: u8, dest: &mut Vec<f32>) {
    dest.clear();
    let from = usize::from(from);
    let to = usize::from(to);

    if from == to {
        dest.extend_from_slice(src);
    } else if to == 1 {
        dest.extend(
            src.chunks_exact(from)
                .map(|frame| frame.iter().sum::<f32>() / from as f32),
        );
    } else {
        // from == 1, checked at open
        for &sample in src {
            dest.extend(std::iter::repeat(sample).take(to));
        }
    }
}

impl Filter for ConvertFilter {
    fn open(&mut self, in_format: AudioFormat) -> Result<AudioFormat> {
        debug_assert!(self.state.is_none(), "convert filter opened twice");

        let out_format = self.target.apply(in_format);
        let (from, to) = (in_format.channels, out_format.channels);
        if from != to && from != 1 && to != 1 {
            return Err(ResoundError::format_negotiation(format!(
                "Cannot convert {from} channels to {to}"
            )));
        }

        let resampler = if in_format.sample_rate == out_format.sample_rate {
            None
        } else {
            let resampler = RubatoResampler::new(
                in_format.sample_rate,
                out_format.sample_rate,
                usize::from(to),
                self.quality,
            )?;
            tracing::debug!(
                latency_frames = resampler.latency(),
                "Resampling {} Hz to {} Hz",
                in_format.sample_rate,
                out_format.sample_rate
            );
            Some(resampler)
        };

        self.state = Some(Opened {
            in_format,
            out_format,
            carry: Carry::new(in_format.frame_size()),
            resampler,
            frames: Vec::new(),
            samples: Vec::new(),
            remapped: Vec::new(),
            resampled: Vec::new(),
            buffer: Vec::new(),
        });

        Ok(out_format)
    }

    fn filter<'a>(&'a mut self, src: &'a [u8]) -> Result<&'a [u8]> {
        let opened = self
            .state
            .as_mut()
            .ok_or_else(|| ResoundError::processing("convert filter is not open"))?;

        if opened.in_format == opened.out_format {
            return Ok(src);
        }

        opened.carry.feed(src, &mut opened.frames);

        opened.samples.clear();
        decode_to_f32(opened.in_format.format, &opened.frames, &mut opened.samples);
        remap_channels(
            &opened.samples,
            opened.in_format.channels,
            opened.out_format.channels,
            &mut opened.remapped,
        );

        let converted = match opened.resampler.as_mut() {
            Some(resampler) => {
                opened.resampled.clear();
                resampler.process(&opened.remapped, &mut opened.resampled)?;
                &opened.resampled
            }
            None => &opened.remapped,
        };

        opened.buffer.clear();
        encode_from_f32(opened.out_format.format, converted, &mut opened.buffer);
        Ok(&opened.buffer)
    }

    fn close(&mut self) {
        self.state = None;
    }

    fn name(&self) -> &str {
        "convert"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcm::tests::{s16_bytes, s16_samples};
    use resound_core::{ConfigOption, SampleFormat};

    fn convert(target: &str) -> ConvertFilter {
        ConvertFilter::new(target.parse().unwrap(), ResamplingQuality::Fast)
    }

    #[test]
    fn identical_format_is_passthrough() {
        let mut filter = convert("*:*:*");
        assert_eq!(
            filter.open(AudioFormat::cd_quality()).unwrap(),
            AudioFormat::cd_quality()
        );
        let input = [1u8, 2, 3];
        assert_eq!(filter.filter(&input).unwrap(), &input);
    }

    #[test]
    fn s16_to_float() {
        let mut filter = convert("*:f:*");
        let out = filter.open(AudioFormat::cd_quality()).unwrap();
        assert_eq!(out, AudioFormat::new(44_100, SampleFormat::Float, 2));

        let input = s16_bytes(&[16_384, -32_768]);
        let result = filter.filter(&input).unwrap();
        let floats: Vec<f32> = result
            .chunks_exact(4)
            .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        assert_eq!(floats, vec![0.5, -1.0]);
    }

    #[test]
    fn stereo_to_mono_averages() {
        let mut filter = convert("*:*:1");
        filter.open(AudioFormat::cd_quality()).unwrap();
        let input = s16_bytes(&[100, 300, -50, -150]);
        let result = filter.filter(&input).unwrap();
        assert_eq!(s16_samples(result), vec![200, -100]);
    }

    #[test]
    fn mono_to_stereo_duplicates() {
        let mut filter = convert("*:*:2");
        filter.open("44100:16:1".parse().unwrap()).unwrap();
        let input = s16_bytes(&[5, -6]);
        let result = filter.filter(&input).unwrap();
        assert_eq!(s16_samples(result), vec![5, 5, -6, -6]);
    }

    #[test]
    fn unsupported_channel_mapping_fails_at_open() {
        let mut filter = convert("*:*:2");
        let err = filter.open("44100:16:6".parse().unwrap()).unwrap_err();
        assert!(matches!(err, ResoundError::FormatNegotiation(_)));
    }

    #[test]
    fn extreme_rate_ratio_fails_at_open() {
        let mut filter = convert("768000:*:*");
        let err = filter.open("1:16:1".parse().unwrap()).unwrap_err();
        assert!(matches!(err, ResoundError::FormatNegotiation(_)));
        assert!(filter.filter(&[0, 0]).is_err());
    }

    #[test]
    fn resampling_may_delay_output() {
        let mut filter = convert("48000:*:*");
        let out = filter.open(AudioFormat::cd_quality()).unwrap();
        assert_eq!(out.sample_rate, 48_000);

        // 10 frames are far less than one resampler chunk
        let short = s16_bytes(&[0; 20]);
        assert!(filter.filter(&short).unwrap().is_empty());

        // A second of audio must come out roughly rescaled
        let second = s16_bytes(&vec![0; 44_100 * 2]);
        let produced = filter.filter(&second).unwrap().len() / out.frame_size();
        assert!(produced > 40_000 && produced <= 48_000, "produced {produced}");
    }

    #[test]
    fn config_requires_format() {
        let block = ConfigBlock::new(ConfigOption::AudioFilter).with_param("plugin", "convert");
        assert!(matches!(
            ConvertFilter::from_config(&block),
            Err(ResoundError::Config(_))
        ));

        let block = block.with_param("format", "48000:24:*").with_param("quality", "high");
        assert!(ConvertFilter::from_config(&block).is_ok());
    }
}
