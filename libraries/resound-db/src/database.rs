//! Database capability and song selection

use resound_core::{Result, Song, TagType};

/// Read-only song enumeration
///
/// Implementations must be deterministic: visiting the same selection
/// twice yields the same songs in the same order.
pub trait Database: Send + Sync {
    /// Call `visit_song` for every song matching `selection`
    ///
    /// Stops at, and returns, the first error from `visit_song`. Errors
    /// from the backend itself (e.g. an unknown URI) are returned as-is.
    fn visit(
        &self,
        selection: &DatabaseSelection,
        visit_song: &mut dyn FnMut(&Song) -> Result<()>,
    ) -> Result<()>;
}

/// Which songs a query covers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseSelection {
    /// Base URI; empty selects the whole library
    pub uri: String,

    /// Include songs in subdirectories of `uri`
    pub recursive: bool,

    pub filter: Option<SongFilter>,
}

impl DatabaseSelection {
    pub fn new(uri: impl Into<String>, recursive: bool) -> Self {
        Self {
            uri: uri.into(),
            recursive,
            filter: None,
        }
    }

    /// Every song in the library
    pub fn all() -> Self {
        Self::new("", true)
    }

    #[must_use]
    pub fn with_filter(mut self, filter: SongFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Whether `song` passes the filter (always true without one)
    pub fn matches(&self, song: &Song) -> bool {
        match &self.filter {
            Some(filter) => filter.matches(song),
            None => true,
        }
    }
}

/// One condition of a [`SongFilter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterItem {
    /// Tag to compare; `None` matches against any tag item
    pub tag: Option<TagType>,
    pub value: String,
    /// Case-insensitive substring match instead of exact equality
    pub fold_case: bool,
}

impl FilterItem {
    pub fn new(tag: Option<TagType>, value: impl Into<String>, fold_case: bool) -> Self {
        let value = value.into();
        Self {
            tag,
            value: if fold_case { value.to_lowercase() } else { value },
            fold_case,
        }
    }

    fn matches_value(&self, candidate: &str) -> bool {
        if self.fold_case {
            candidate.to_lowercase().contains(&self.value)
        } else {
            candidate == self.value
        }
    }

    pub fn matches(&self, song: &Song) -> bool {
        let Some(tag) = &song.tag else {
            return false;
        };

        tag.items
            .iter()
            .filter(|item| self.tag.is_none() || self.tag == Some(item.tag_type))
            .any(|item| self.matches_value(&item.value))
    }
}

/// Conjunction of [`FilterItem`]s
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongFilter {
    items: Vec<FilterItem>,
}

impl SongFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_item(mut self, item: FilterItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn items(&self) -> &[FilterItem] {
        &self.items
    }

    /// True when every item matches; an empty filter matches everything
    pub fn matches(&self, song: &Song) -> bool {
        self.items.iter().all(|item| item.matches(song))
    }
}
