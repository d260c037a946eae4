//! Resound Core
//!
//! Shared building blocks for the Resound audio server backend.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Error Handling**: one `ResoundError` taxonomy and `Result` alias used by
//!   every fallible operation in the filter pipeline and the database engine
//! - **Configuration**: ordered `ConfigBlock` lookup used by plugin factories
//! - **Domain Types**: `AudioFormat`, `Song`, `Tag`
//! - **Client Surface**: the `Response` trait results and errors are written to
//!
//! # Example
//!
//! ```rust
//! use resound_core::{AudioFormat, ConfigOption, ConfigStore};
//!
//! let store = ConfigStore::from_toml_str(r#"
//!     [[filter]]
//!     name = "identity"
//!     plugin = "null"
//! "#).unwrap();
//!
//! let block = store.find_named_block(ConfigOption::AudioFilter, "identity").unwrap();
//! assert_eq!(block.get("plugin"), Some("null"));
//!
//! let format: AudioFormat = "44100:16:2".parse().unwrap();
//! assert_eq!(format.frame_size(), 4);
//! ```

#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use client::{print_error, Ack, CommandReturn, Response, TextResponse};
pub use config::{ConfigBlock, ConfigOption, ConfigStore};
pub use error::{ResoundError, Result};
pub use types::{AudioFormat, AudioFormatMask, SampleFormat, Song, Tag, TagItem, TagType};
