/// Song type
use super::tag::Tag;

/// A song in the library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    /// Slash-separated path relative to the music root
    pub uri: String,

    pub tag: Option<Tag>,
}

impl Song {
    /// Create a song without tags
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            tag: None,
        }
    }

    /// Builder: attach a tag
    #[must_use]
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Parent directory URI; empty for songs in the root
    pub fn parent_uri(&self) -> &str {
        self.uri.rsplit_once('/').map_or("", |(parent, _)| parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_uri() {
        assert_eq!(Song::new("a/b/c.flac").parent_uri(), "a/b");
        assert_eq!(Song::new("c.flac").parent_uri(), "");
    }
}
