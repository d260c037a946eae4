/// Song metadata tags
use crate::error::{ResoundError, Result};
use std::fmt;
use std::str::FromStr;

/// Typed metadata field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagType {
    Artist,
    ArtistSort,
    Album,
    AlbumArtist,
    AlbumArtistSort,
    Title,
    Track,
    Name,
    Genre,
    Date,
    Composer,
    Performer,
    Comment,
    Disc,
}

impl TagType {
    /// All tag types, in protocol order
    pub const ALL: [TagType; 14] = [
        Self::Artist,
        Self::ArtistSort,
        Self::Album,
        Self::AlbumArtist,
        Self::AlbumArtistSort,
        Self::Title,
        Self::Track,
        Self::Name,
        Self::Genre,
        Self::Date,
        Self::Composer,
        Self::Performer,
        Self::Comment,
        Self::Disc,
    ];

    /// Name used on the wire, e.g. `AlbumArtist`
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Artist => "Artist",
            Self::ArtistSort => "ArtistSort",
            Self::Album => "Album",
            Self::AlbumArtist => "AlbumArtist",
            Self::AlbumArtistSort => "AlbumArtistSort",
            Self::Title => "Title",
            Self::Track => "Track",
            Self::Name => "Name",
            Self::Genre => "Genre",
            Self::Date => "Date",
            Self::Composer => "Composer",
            Self::Performer => "Performer",
            Self::Comment => "Comment",
            Self::Disc => "Disc",
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagType {
    type Err = ResoundError;

    /// Case-insensitive lookup by wire name
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ResoundError::not_found("Unknown tag type", s))
    }
}

/// One tag value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagItem {
    pub tag_type: TagType,
    pub value: String,
}

impl TagItem {
    pub fn new(tag_type: TagType, value: impl Into<String>) -> Self {
        Self {
            tag_type,
            value: value.into(),
        }
    }
}

/// Ordered tag items plus the song duration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tag {
    /// Duration in seconds; zero or negative means unknown
    pub time: i32,

    pub items: Vec<TagItem>,
}

impl Tag {
    /// Create an empty tag with unknown duration
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the duration in seconds
    #[must_use]
    pub fn with_time(mut self, time: i32) -> Self {
        self.time = time;
        self
    }

    /// Builder: append an item
    #[must_use]
    pub fn with_item(mut self, tag_type: TagType, value: impl Into<String>) -> Self {
        self.add_item(tag_type, value);
        self
    }

    /// Append an item, keeping declaration order
    pub fn add_item(&mut self, tag_type: TagType, value: impl Into<String>) {
        self.items.push(TagItem::new(tag_type, value));
    }

    /// Iterate over the values of one tag type
    pub fn values(&self, tag_type: TagType) -> impl Iterator<Item = &str> + '_ {
        self.items
            .iter()
            .filter(move |item| item.tag_type == tag_type)
            .map(|item| item.value.as_str())
    }

    /// First value of one tag type
    pub fn get(&self, tag_type: TagType) -> Option<&str> {
        self.values(tag_type).next()
    }

    /// Duration if known
    pub fn duration(&self) -> Option<u32> {
        u32::try_from(self.time).ok().filter(|&t| t > 0)
    }
}
