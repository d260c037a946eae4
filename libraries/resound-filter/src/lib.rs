//! Resound Filter
//!
//! Pluggable PCM transforms for the audio output path.
//!
//! # Architecture
//!
//! - **Filter**: the `open`/`filter`/`close` capability every stage implements
//! - **FilterChain**: ordered stages composed into one filter
//! - **FilterRegistry**: builds filters from `[[filter]]` configuration blocks
//! - **FilterSession**: an opened filter that is closed exactly once
//! - **Plugins**: `null`, `volume`, `convert`, `route`
//!
//! # Example
//!
//! ```rust
//! use resound_core::{AudioFormat, ConfigStore};
//! use resound_filter::{FilterRegistry, FilterSession};
//!
//! let store = ConfigStore::from_toml_str(r#"
//!     [[filter]]
//!     name = "identity"
//!     plugin = "null"
//! "#).unwrap();
//!
//! let filter = FilterRegistry::with_builtin_plugins()
//!     .load_named(&store, "identity")
//!     .unwrap();
//! let mut session = FilterSession::open(filter, AudioFormat::cd_quality()).unwrap();
//!
//! let mut output = Vec::new();
//! session.pump(&mut &[1u8, 2, 3, 4][..], &mut output).unwrap();
//! assert_eq!(output, [1, 2, 3, 4]);
//! ```

#![forbid(unsafe_code)]

mod chain;
mod filter;
pub mod pcm;
mod plugins;
mod registry;
pub mod resampling;
mod session;

pub use chain::FilterChain;
pub use filter::Filter;
pub use plugins::{ConvertFilter, NullFilter, RouteFilter, VolumeFilter};
pub use registry::{FilterInitFn, FilterPlugin, FilterRegistry};
pub use resampling::{ResamplingQuality, RubatoResampler};
pub use session::{FilterSession, PumpError, PUMP_CHUNK_SIZE};
