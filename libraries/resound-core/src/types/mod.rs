/// Domain types for Resound
mod audio;
mod song;
mod tag;

pub use audio::{AudioFormat, AudioFormatMask, SampleFormat, MAX_CHANNELS, MAX_SAMPLE_RATE};
pub use song::Song;
pub use tag::{Tag, TagItem, TagType};
