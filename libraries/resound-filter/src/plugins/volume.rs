//! Software volume filter
//!
//! Configured with an optional `volume` percentage (0-100, default 100).
//! The gain can be changed while the filter is open, which is how a
//! software mixer drives it.

use crate::filter::Filter;
use crate::pcm::volume::{apply_volume, volume_from_percent, PCM_VOLUME_1};
use crate::pcm::Carry;
use resound_core::{AudioFormat, ConfigBlock, ResoundError, Result};

#[derive(Debug)]
struct Opened {
    format: AudioFormat,
    carry: Carry,
    buffer: Vec<u8>,
}

#[derive(Debug)]
pub struct VolumeFilter {
    /// Gain in units of `PCM_VOLUME_1`
    volume: u32,
    state: Option<Opened>,
}

impl VolumeFilter {
    /// Create a filter with gain in units of `PCM_VOLUME_1`
    pub fn new(volume: u32) -> Self {
        Self {
            volume: volume.min(PCM_VOLUME_1),
            state: None,
        }
    }

    pub(crate) fn from_config(block: &ConfigBlock) -> Result<Box<dyn Filter>> {
        let percent = block.get_unsigned("volume", 100)?;
        if percent > 100 {
            return Err(ResoundError::config(format!(
                "volume must be between 0 and 100, got {percent}"
            )));
        }
        Ok(Box::new(Self::new(volume_from_percent(percent))))
    }

    pub fn volume(&self) -> u32 {
        self.volume
    }

    /// Change the gain; values above unity are clamped
    pub fn set_volume(&mut self, volume: u32) {
        self.volume = volume.min(PCM_VOLUME_1);
    }
}

impl Default for VolumeFilter {
    fn default() -> Self {
        Self::new(PCM_VOLUME_1)
    }
}

impl Filter for VolumeFilter {
    fn open(&mut self, in_format: AudioFormat) -> Result<AudioFormat> {
        debug_assert!(self.state.is_none(), "volume filter opened twice");
        self.state = Some(Opened {
            format: in_format,
            carry: Carry::new(in_format.sample_size()),
            buffer: Vec::new(),
        });
        Ok(in_format)
    }

    fn filter<'a>(&'a mut self, src: &'a [u8]) -> Result<&'a [u8]> {
        let volume = self.volume;
        let opened = self
            .state
            .as_mut()
            .ok_or_else(|| ResoundError::processing("volume filter is not open"))?;

        let sample_size = opened.format.sample_size();
        if volume == PCM_VOLUME_1 && opened.carry.pending() == 0 && src.len() % sample_size == 0 {
            return Ok(src);
        }

        opened.carry.feed(src, &mut opened.buffer);
        apply_volume(opened.format.format, &mut opened.buffer, volume);
        Ok(&opened.buffer)
    }

    fn close(&mut self) {
        self.state = None;
    }

    fn name(&self) -> &str {
        "volume"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcm::tests::{s16_bytes, s16_samples};
    use proptest::prelude::*;
    use resound_core::ConfigOption;

    fn opened(volume: u32) -> VolumeFilter {
        let mut filter = VolumeFilter::new(volume);
        filter.open(AudioFormat::cd_quality()).unwrap();
        filter
    }

    #[test]
    fn config_percent() {
        let block = ConfigBlock::new(ConfigOption::AudioFilter).with_param("volume", "50");
        assert!(VolumeFilter::from_config(&block).is_ok());

        let block = ConfigBlock::new(ConfigOption::AudioFilter).with_param("volume", "101");
        assert!(matches!(
            VolumeFilter::from_config(&block),
            Err(ResoundError::Config(_))
        ));

        let block = ConfigBlock::new(ConfigOption::AudioFilter).with_param("volume", "loud");
        assert!(VolumeFilter::from_config(&block).is_err());
    }

    #[test]
    fn zero_volume_is_silence() {
        let mut filter = opened(0);
        let input = s16_bytes(&[i16::MAX, -5, 1234, i16::MIN]);
        let out = filter.filter(&input).unwrap();
        assert_eq!(s16_samples(out), vec![0, 0, 0, 0]);
    }

    #[test]
    fn partial_samples_carry_over() {
        let mut filter = opened(512);
        let input = s16_bytes(&[1000, 2000]);

        assert!(filter.filter(&input[..1]).unwrap().is_empty());
        let out = filter.filter(&input[1..]).unwrap().to_vec();
        assert_eq!(s16_samples(&out), vec![500, 1000]);
    }

    #[test]
    fn runtime_volume_change() {
        let mut filter = opened(PCM_VOLUME_1);
        let input = s16_bytes(&[100]);
        assert_eq!(s16_samples(filter.filter(&input).unwrap()), vec![100]);

        filter.set_volume(256);
        assert_eq!(filter.volume(), 256);
        assert_eq!(s16_samples(filter.filter(&input).unwrap()), vec![25]);

        filter.set_volume(5000);
        assert_eq!(filter.volume(), PCM_VOLUME_1);
    }

    #[test]
    fn filter_before_open_fails() {
        let mut filter = VolumeFilter::default();
        assert!(filter.filter(&[0, 0]).is_err());
    }

    proptest! {
        #[test]
        fn full_volume_within_one_lsb(samples in prop::collection::vec(any::<i16>(), 0..512)) {
            let mut filter = opened(volume_from_percent(100));
            let input = s16_bytes(&samples);
            let out = s16_samples(filter.filter(&input).unwrap());
            prop_assert_eq!(out.len(), samples.len());
            for (a, b) in out.iter().zip(&samples) {
                prop_assert!((i32::from(*a) - i32::from(*b)).abs() <= 1);
            }
        }

        #[test]
        fn louder_never_quieter(
            samples in prop::collection::vec(any::<i16>(), 1..64),
            p1 in 0u32..=100,
            p2 in 0u32..=100,
        ) {
            let (low, high) = if p1 <= p2 { (p1, p2) } else { (p2, p1) };
            let input = s16_bytes(&samples);

            let mut quiet = opened(volume_from_percent(low));
            let mut loud = opened(volume_from_percent(high));
            let quiet_out = s16_samples(quiet.filter(&input).unwrap());
            let loud_out = s16_samples(loud.filter(&input).unwrap());

            for (q, l) in quiet_out.iter().zip(&loud_out) {
                prop_assert!(i32::from(*q).abs() <= i32::from(*l).abs());
            }
        }
    }
}
