//! Aggregation queries over a [`Database`]
//!
//! Both queries make one pass over the selection, collecting owned strings
//! into sets that live only for the duration of the call.

use crate::database::{Database, DatabaseSelection};
use resound_core::{Result, Song, TagType};
use std::collections::BTreeSet;

/// Deduplicated strings in byte order
pub type StringSet = BTreeSet<String>;

/// Library statistics for a selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatabaseStats {
    /// Every visited song, with or without a known duration
    pub song_count: u32,

    /// Distinct `Artist` values
    pub artist_count: u32,

    /// Distinct `Album` values
    pub album_count: u32,

    /// Sum of positive durations, in seconds
    pub total_duration: u64,
}

impl DatabaseStats {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn collect_tags(set: &mut StringSet, tag_type: TagType, song: &Song) {
    let mut found = false;
    if let Some(tag) = &song.tag {
        for value in tag.values(tag_type) {
            set.insert(value.to_owned());
            found = true;
        }
    }

    if !found {
        set.insert(String::new());
    }
}

/// Emit every distinct value of `tag_type` in the selection, in byte order
///
/// A song without a `tag_type` item contributes the empty string. `emit` is
/// only called after enumeration finished; its first error stops the walk.
pub fn visit_unique_tags(
    db: &dyn Database,
    selection: &DatabaseSelection,
    tag_type: TagType,
    mut emit: impl FnMut(&str) -> Result<()>,
) -> Result<()> {
    let mut set = StringSet::new();
    db.visit(selection, &mut |song| {
        collect_tags(&mut set, tag_type, song);
        Ok(())
    })?;

    tracing::debug!(
        tag = %tag_type,
        uri = %selection.uri,
        values = set.len(),
        "Collected unique tags"
    );

    set.iter().try_for_each(|value| emit(value))
}

fn to_count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// Count songs, distinct artists and albums, and total known playtime
pub fn get_stats(db: &dyn Database, selection: &DatabaseSelection) -> Result<DatabaseStats> {
    let mut stats = DatabaseStats::default();
    let mut artists = StringSet::new();
    let mut albums = StringSet::new();

    db.visit(selection, &mut |song| {
        stats.song_count += 1;

        if let Some(tag) = &song.tag {
            if let Some(duration) = tag.duration() {
                stats.total_duration += u64::from(duration);
            }

            for item in &tag.items {
                match item.tag_type {
                    TagType::Artist => {
                        artists.insert(item.value.clone());
                    }
                    TagType::Album => {
                        albums.insert(item.value.clone());
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    })?;

    stats.artist_count = to_count(artists.len());
    stats.album_count = to_count(albums.len());

    tracing::debug!(
        uri = %selection.uri,
        songs = stats.song_count,
        artists = stats.artist_count,
        albums = stats.album_count,
        "Computed database stats"
    );
    Ok(stats)
}
