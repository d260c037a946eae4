//! Software volume
//!
//! Volume is an integer gain where `PCM_VOLUME_1` is unity. Integer
//! samples are scaled with round-half-up and clamped, so unity is
//! bit-exact, zero is silence, and the output magnitude never decreases
//! when the volume increases.

use resound_core::SampleFormat;

/// Unity gain
pub const PCM_VOLUME_1: u32 = 1024;

/// Convert a 0-100 percentage to a volume; larger values clamp to 100
pub fn volume_from_percent(percent: u32) -> u32 {
    percent.min(100) * PCM_VOLUME_1 / 100
}

fn scale_int(sample: i64, volume: u32, min: i64, max: i64) -> i64 {
    let volume = i64::from(volume);
    let unity = i64::from(PCM_VOLUME_1);
    (sample * volume + unity / 2).div_euclid(unity).clamp(min, max)
}

/// Apply `volume` to whole samples of `format` in place
///
/// Trailing bytes that do not form a whole sample are left untouched.
pub fn apply_volume(format: SampleFormat, buffer: &mut [u8], volume: u32) {
    if volume == PCM_VOLUME_1 {
        return;
    }

    if volume == 0 {
        // Zero bytes are silence for every supported encoding
        let whole = buffer.len() - buffer.len() % format.sample_size();
        buffer[..whole].fill(0);
        return;
    }

    match format {
        SampleFormat::S8 => {
            for byte in buffer.iter_mut() {
                let sample = i64::from(i8::from_ne_bytes([*byte]));
                *byte = (scale_int(sample, volume, -128, 127) as i8).to_ne_bytes()[0];
            }
        }
        SampleFormat::S16 => {
            for bytes in buffer.chunks_exact_mut(2) {
                let sample = i64::from(i16::from_ne_bytes([bytes[0], bytes[1]]));
                let scaled = scale_int(sample, volume, -32_768, 32_767) as i16;
                bytes.copy_from_slice(&scaled.to_ne_bytes());
            }
        }
        SampleFormat::S24P32 => {
            for bytes in buffer.chunks_exact_mut(4) {
                let sample = i64::from(i32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]));
                let scaled = scale_int(sample, volume, -8_388_608, 8_388_607) as i32;
                bytes.copy_from_slice(&scaled.to_ne_bytes());
            }
        }
        SampleFormat::S32 => {
            for bytes in buffer.chunks_exact_mut(4) {
                let sample = i64::from(i32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]));
                let scaled =
                    scale_int(sample, volume, i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
                bytes.copy_from_slice(&scaled.to_ne_bytes());
            }
        }
        SampleFormat::Float => {
            let gain = volume as f32 / PCM_VOLUME_1 as f32;
            for bytes in buffer.chunks_exact_mut(4) {
                let sample = f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                bytes.copy_from_slice(&(sample * gain).to_ne_bytes());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcm::tests::{s16_bytes, s16_samples};
    use proptest::prelude::*;

    #[test]
    fn percent_mapping() {
        assert_eq!(volume_from_percent(0), 0);
        assert_eq!(volume_from_percent(50), 512);
        assert_eq!(volume_from_percent(100), PCM_VOLUME_1);
        assert_eq!(volume_from_percent(250), PCM_VOLUME_1);
    }

    #[test]
    fn half_volume_s16() {
        let mut buffer = s16_bytes(&[1000, -1000, 3, -3, i16::MIN]);
        apply_volume(SampleFormat::S16, &mut buffer, 512);
        assert_eq!(s16_samples(&buffer), vec![500, -500, 2, -1, -16_384]);
    }

    #[test]
    fn silence_leaves_partial_sample() {
        let mut buffer = vec![0x7f, 0x7f, 0x11];
        apply_volume(SampleFormat::S16, &mut buffer, 0);
        assert_eq!(buffer, vec![0, 0, 0x11]);
    }

    #[test]
    fn float_gain() {
        let mut buffer: Vec<u8> = [0.5f32, -1.0].iter().flat_map(|s| s.to_ne_bytes()).collect();
        apply_volume(SampleFormat::Float, &mut buffer, 256);
        let samples: Vec<f32> = buffer
            .chunks_exact(4)
            .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        assert_eq!(samples, vec![0.125, -0.25]);
    }

    proptest! {
        #[test]
        fn unity_is_bit_exact(samples in prop::collection::vec(any::<i16>(), 0..256)) {
            let mut buffer = s16_bytes(&samples);
            apply_volume(SampleFormat::S16, &mut buffer, PCM_VOLUME_1);
            prop_assert_eq!(s16_samples(&buffer), samples);
        }

        #[test]
        fn magnitude_is_monotonic_in_volume(
            sample in any::<i32>(),
            v1 in 0u32..=PCM_VOLUME_1,
            v2 in 0u32..=PCM_VOLUME_1,
        ) {
            let (low, high) = if v1 <= v2 { (v1, v2) } else { (v2, v1) };

            let mut quiet = sample.to_ne_bytes().to_vec();
            let mut loud = quiet.clone();
            apply_volume(SampleFormat::S32, &mut quiet, low);
            apply_volume(SampleFormat::S32, &mut loud, high);

            let quiet = i32::from_ne_bytes([quiet[0], quiet[1], quiet[2], quiet[3]]);
            let loud = i32::from_ne_bytes([loud[0], loud[1], loud[2], loud[3]]);
            prop_assert!(i64::from(quiet).abs() <= i64::from(loud).abs());
        }
    }
}
