//! Configuration blocks
//!
//! A configuration source is a list of named parameter groups ("blocks"),
//! each tagged with the kind of plugin it configures. Blocks are kept in
//! declaration order: lookups scan linearly and the first match wins, so
//! reordering a file changes which duplicate is used.
//!
//! Files are TOML, one array of tables per block kind:
//!
//! ```toml
//! [[filter]]
//! name = "quiet"
//! plugin = "volume"
//! volume = 40
//! ```

use crate::error::{ResoundError, Result};
use std::fmt;
use std::path::Path;

/// Kind of a configuration block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigOption {
    AudioFilter,
    AudioOutput,
    Decoder,
    Input,
    PlaylistPlugin,
    Database,
}

impl ConfigOption {
    const ALL: [ConfigOption; 6] = [
        Self::AudioFilter,
        Self::AudioOutput,
        Self::Decoder,
        Self::Input,
        Self::PlaylistPlugin,
        Self::Database,
    ];

    /// Section name in the configuration file
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AudioFilter => "filter",
            Self::AudioOutput => "audio_output",
            Self::Decoder => "decoder",
            Self::Input => "input",
            Self::PlaylistPlugin => "playlist_plugin",
            Self::Database => "database",
        }
    }

    fn from_section(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.as_str() == name)
    }
}

impl fmt::Display for ConfigOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `key = value` pair inside a block
#[derive(Debug, Clone, PartialEq, Eq)]
struct BlockParam {
    name: String,
    value: String,
}

/// A named group of string parameters describing one plugin instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigBlock {
    option: ConfigOption,
    params: Vec<BlockParam>,
}

impl ConfigBlock {
    /// Create an empty block
    pub fn new(option: ConfigOption) -> Self {
        Self {
            option,
            params: Vec::new(),
        }
    }

    /// Builder: append a parameter
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_param(name, value);
        self
    }

    /// Append a parameter; an earlier parameter with the same name shadows it
    pub fn add_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.push(BlockParam {
            name: name.into(),
            value: value.into(),
        });
    }

    pub fn option(&self) -> ConfigOption {
        self.option
    }

    /// The block's `name` parameter
    pub fn name(&self) -> Option<&str> {
        self.get("name")
    }

    /// Look up a parameter by exact key; first occurrence wins
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|param| param.name == name)
            .map(|param| param.value.as_str())
    }

    pub fn get_str_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    /// Look up a parameter that must be present
    pub fn require(&self, name: &str) -> Result<&str> {
        self.get(name).ok_or_else(|| {
            ResoundError::config(format!(
                "Missing parameter '{name}' in {} block{}",
                self.option,
                self.describe_name()
            ))
        })
    }

    pub fn get_unsigned(&self, name: &str, default: u32) -> Result<u32> {
        match self.get(name) {
            None => Ok(default),
            Some(value) => value.trim().parse().map_err(|_| {
                ResoundError::config(format!(
                    "Not a valid non-negative number for '{name}': {value:?}"
                ))
            }),
        }
    }

    fn describe_name(&self) -> String {
        self.name()
            .map(|name| format!(" \"{name}\""))
            .unwrap_or_default()
    }
}

/// Ordered collection of configuration blocks
///
/// Read-only once loaded; share it by reference across threads.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    blocks: Vec<ConfigBlock>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse a TOML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Parse TOML configuration text
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let table: toml::Table = source
            .parse()
            .map_err(|e: toml::de::Error| ResoundError::config(e.to_string()))?;

        let mut store = Self::new();
        for (section, value) in &table {
            let Some(option) = ConfigOption::from_section(section) else {
                tracing::warn!(section = %section, "Ignoring unknown configuration section");
                continue;
            };

            let toml::Value::Array(entries) = value else {
                return Err(ResoundError::config(format!(
                    "'{section}' must be declared as [[{section}]] blocks"
                )));
            };

            for entry in entries {
                let toml::Value::Table(params) = entry else {
                    return Err(ResoundError::config(format!(
                        "'{section}' entries must be tables"
                    )));
                };

                let mut block = ConfigBlock::new(option);
                for (name, value) in params {
                    block.add_param(name.as_str(), param_text(section, name, value)?);
                }
                store.add_block(block);
            }
        }

        tracing::debug!(blocks = store.blocks.len(), "Loaded configuration");
        Ok(store)
    }

    /// Append a block after all existing ones
    pub fn add_block(&mut self, block: ConfigBlock) {
        self.blocks.push(block);
    }

    /// All blocks of one kind, in declaration order
    pub fn blocks(&self, option: ConfigOption) -> impl Iterator<Item = &ConfigBlock> + '_ {
        self.blocks
            .iter()
            .filter(move |block| block.option == option)
    }

    /// First block of `option` whose `name` parameter equals `name` exactly
    pub fn find_named_block(&self, option: ConfigOption, name: &str) -> Option<&ConfigBlock> {
        self.blocks(option).find(|block| block.name() == Some(name))
    }
}

fn param_text(section: &str, name: &str, value: &toml::Value) -> Result<String> {
    match value {
        toml::Value::String(s) => Ok(s.clone()),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Float(f) => Ok(f.to_string()),
        toml::Value::Boolean(b) => Ok(b.to_string()),
        toml::Value::Datetime(d) => Ok(d.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => Err(ResoundError::config(format!(
            "Parameter '{name}' in [[{section}]] must be a scalar value"
        ))),
    }
}
