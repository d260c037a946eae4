//! Filter Registry - factory lookup for configured filters
//!
//! Maps the `plugin` parameter of a `[[filter]]` block to a constructor, so
//! callers build filters from configuration without knowing concrete types.

use crate::chain::FilterChain;
use crate::filter::Filter;
use crate::plugins;
use resound_core::{ConfigBlock, ConfigOption, ConfigStore, ResoundError, Result};
use std::collections::HashMap;
use std::fmt;

/// Constructor receiving the whole configuration block
pub type FilterInitFn = fn(&ConfigBlock) -> Result<Box<dyn Filter>>;

/// A named filter constructor
#[derive(Clone, Copy)]
pub struct FilterPlugin {
    /// Value of the `plugin` parameter selecting this plugin
    pub name: &'static str,
    pub init: FilterInitFn,
}

impl fmt::Debug for FilterPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterPlugin")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl FilterPlugin {
    pub const fn new(name: &'static str, init: FilterInitFn) -> Self {
        Self { name, init }
    }
}

/// Registry of available filter plugins
///
/// # Example
///
/// ```rust
/// use resound_core::ConfigStore;
/// use resound_filter::FilterRegistry;
///
/// let store = ConfigStore::from_toml_str(r#"
///     [[filter]]
///     name = "quiet"
///     plugin = "volume"
///     volume = 40
/// "#).unwrap();
///
/// let registry = FilterRegistry::with_builtin_plugins();
/// let filter = registry.load_named(&store, "quiet").unwrap();
/// assert_eq!(filter.name(), "volume");
/// ```
#[derive(Debug, Default)]
pub struct FilterRegistry {
    plugins: HashMap<&'static str, FilterPlugin>,
}

impl FilterRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with all built-in plugins registered
    pub fn with_builtin_plugins() -> Self {
        let mut registry = Self::new();
        for plugin in plugins::builtin() {
            registry.register(plugin);
        }
        registry
    }

    /// Register a plugin, replacing any previous one with the same name
    pub fn register(&mut self, plugin: FilterPlugin) {
        self.plugins.insert(plugin.name, plugin);
    }

    pub fn get(&self, name: &str) -> Option<&FilterPlugin> {
        self.plugins.get(name)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// Registered plugin names, sorted
    pub fn registered_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.plugins.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Instantiate the plugin named by the block's `plugin` parameter
    pub fn configured_new(&self, block: &ConfigBlock) -> Result<Box<dyn Filter>> {
        let plugin_name = block
            .get("plugin")
            .ok_or_else(|| ResoundError::config("No filter plugin specified"))?;

        let plugin = self
            .get(plugin_name)
            .ok_or_else(|| ResoundError::plugin(format!("No such filter plugin: {plugin_name}")))?;

        tracing::debug!(
            plugin = plugin_name,
            name = block.name().unwrap_or_default(),
            "Creating filter"
        );
        (plugin.init)(block)
    }

    /// Find the `[[filter]]` block called `name` and instantiate it
    pub fn load_named(&self, store: &ConfigStore, name: &str) -> Result<Box<dyn Filter>> {
        let block = store
            .find_named_block(ConfigOption::AudioFilter, name)
            .ok_or_else(|| ResoundError::not_found("No such configured filter", name))?;
        self.configured_new(block)
    }

    /// Build a chain from a comma-separated list of filter block names
    ///
    /// Whitespace around names is trimmed and empty entries are skipped.
    pub fn parse_chain(&self, store: &ConfigStore, names: &str) -> Result<FilterChain> {
        let mut chain = FilterChain::new();
        for name in names.split(',').map(str::trim).filter(|name| !name.is_empty()) {
            let block = store
                .find_named_block(ConfigOption::AudioFilter, name)
                .ok_or_else(|| {
                    ResoundError::config(format!("Filter template not found: {name}"))
                })?;
            chain.push(self.configured_new(block)?);
        }
        Ok(chain)
    }
}
