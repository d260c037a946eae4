//! Built-in filter plugins
//!
//! - **null**: identity
//! - **volume**: software gain
//! - **convert**: sample format, channel count and sample rate conversion
//! - **route**: channel routing

mod convert;
mod null;
mod route;
mod volume;

pub use convert::ConvertFilter;
pub use null::NullFilter;
pub use route::RouteFilter;
pub use volume::VolumeFilter;

use crate::registry::FilterPlugin;

/// Plugins every registry created with `with_builtin_plugins` knows about
pub(crate) fn builtin() -> [FilterPlugin; 4] {
    [
        FilterPlugin::new("null", NullFilter::from_config),
        FilterPlugin::new("volume", VolumeFilter::from_config),
        FilterPlugin::new("convert", ConvertFilter::from_config),
        FilterPlugin::new("route", RouteFilter::from_config),
    ]
}
