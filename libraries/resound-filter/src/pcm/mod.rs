//! Raw PCM helpers shared by the filter plugins
//!
//! Samples are interleaved and stored in host byte order. Float conversion
//! scales integers by 2^(bits-1) in both directions so that an integer
//! sample survives a round trip through `f32` unchanged (up to 24 bits).

pub mod volume;

use resound_core::SampleFormat;

/// Carries bytes that do not fill a whole unit (sample or frame) over to
/// the next block
#[derive(Debug)]
pub(crate) struct Carry {
    unit: usize,
    tail: Vec<u8>,
}

impl Carry {
    pub(crate) fn new(unit: usize) -> Self {
        debug_assert!(unit > 0);
        Self {
            unit,
            tail: Vec::with_capacity(unit),
        }
    }

    /// Bytes waiting for the rest of their unit
    pub(crate) fn pending(&self) -> usize {
        self.tail.len()
    }

    /// Write the whole units of `pending ++ src` into `dest` and keep the rest
    pub(crate) fn feed(&mut self, src: &[u8], dest: &mut Vec<u8>) {
        dest.clear();
        dest.extend_from_slice(&self.tail);
        dest.extend_from_slice(src);

        let whole = dest.len() - dest.len() % self.unit;
        self.tail.clear();
        self.tail.extend_from_slice(&dest[whole..]);
        dest.truncate(whole);
    }
}

fn int_scale(format: SampleFormat) -> f64 {
    match format {
        SampleFormat::S8 => 128.0,
        SampleFormat::S16 => 32_768.0,
        SampleFormat::S24P32 => 8_388_608.0,
        SampleFormat::S32 => 2_147_483_648.0,
        SampleFormat::Float => 1.0,
    }
}

/// Decode whole samples from `src` and append them to `dest` as f32
pub fn decode_to_f32(format: SampleFormat, src: &[u8], dest: &mut Vec<f32>) {
    let size = format.sample_size();
    let scale = int_scale(format);
    dest.reserve(src.len() / size);

    for bytes in src.chunks_exact(size) {
        let sample = match format {
            SampleFormat::S8 => f64::from(i8::from_ne_bytes([bytes[0]])) / scale,
            SampleFormat::S16 => f64::from(i16::from_ne_bytes([bytes[0], bytes[1]])) / scale,
            SampleFormat::S24P32 | SampleFormat::S32 => {
                f64::from(i32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])) / scale
            }
            SampleFormat::Float => {
                f64::from(f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
        };
        dest.push(sample as f32);
    }
}

/// Encode f32 samples into `format` and append them to `dest`
///
/// Integer targets clamp to their representable range.
pub fn encode_from_f32(format: SampleFormat, src: &[f32], dest: &mut Vec<u8>) {
    let scale = int_scale(format);
    dest.reserve(src.len() * format.sample_size());

    for &sample in src {
        let scaled = (f64::from(sample) * scale).round();
        match format {
            SampleFormat::S8 => {
                dest.extend_from_slice(&(scaled.clamp(-128.0, 127.0) as i8).to_ne_bytes());
            }
            SampleFormat::S16 => {
                dest.extend_from_slice(&(scaled.clamp(-32_768.0, 32_767.0) as i16).to_ne_bytes());
            }
            SampleFormat::S24P32 => {
                let clamped = scaled.clamp(-8_388_608.0, 8_388_607.0) as i32;
                dest.extend_from_slice(&clamped.to_ne_bytes());
            }
            SampleFormat::S32 => {
                let clamped = scaled.clamp(-2_147_483_648.0, 2_147_483_647.0) as i32;
                dest.extend_from_slice(&clamped.to_ne_bytes());
            }
            SampleFormat::Float => dest.extend_from_slice(&sample.to_ne_bytes()),
        }
    }
}
