//! In-memory database backend

use crate::database::{Database, DatabaseSelection};
use resound_core::{ResoundError, Result, Song};
use std::collections::BTreeMap;
use std::ops::Bound;

/// Songs keyed by URI, visited in URI byte order
#[derive(Debug, Clone, Default)]
pub struct SimpleDatabase {
    songs: BTreeMap<String, Song>,
}

impl SimpleDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a song, returning the one it replaced
    pub fn add(&mut self, song: Song) -> Option<Song> {
        self.songs.insert(song.uri.clone(), song)
    }

    pub fn remove(&mut self, uri: &str) -> Option<Song> {
        self.songs.remove(uri)
    }

    pub fn get(&self, uri: &str) -> Option<&Song> {
        self.songs.get(uri)
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    fn visit_each<'a>(
        songs: impl Iterator<Item = &'a Song>,
        directory: &str,
        selection: &DatabaseSelection,
        visit_song: &mut dyn FnMut(&Song) -> Result<()>,
    ) -> Result<()> {
        for song in songs {
            if (selection.recursive || song.parent_uri() == directory) && selection.matches(song) {
                visit_song(song)?;
            }
        }
        Ok(())
    }
}

impl FromIterator<Song> for SimpleDatabase {
    fn from_iter<I: IntoIterator<Item = Song>>(iter: I) -> Self {
        let mut db = Self::new();
        for song in iter {
            db.add(song);
        }
        db
    }
}

impl Database for SimpleDatabase {
    fn visit(
        &self,
        selection: &DatabaseSelection,
        visit_song: &mut dyn FnMut(&Song) -> Result<()>,
    ) -> Result<()> {
        let uri = selection.uri.trim_end_matches('/');

        if uri.is_empty() {
            return Self::visit_each(self.songs.values(), "", selection, visit_song);
        }

        if let Some(song) = self.songs.get(uri) {
            if selection.matches(song) {
                visit_song(song)?;
            }
            return Ok(());
        }

        let prefix = format!("{uri}/");
        let mut below = self
            .songs
            .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(&prefix))
            .map(|(_, song)| song)
            .peekable();

        if below.peek().is_none() {
            return Err(ResoundError::not_found("No such directory", uri));
        }

        Self::visit_each(below, uri, selection, visit_song)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> SimpleDatabase {
        [
            "rock/a.flac",
            "rock/live/b.flac",
            "jazz/c.flac",
            "d.flac",
            "rockabilly/e.flac",
        ]
        .into_iter()
        .map(Song::new)
        .collect()
    }

    fn uris(db: &SimpleDatabase, selection: &DatabaseSelection) -> Result<Vec<String>> {
        let mut uris = Vec::new();
        db.visit(selection, &mut |song| {
            uris.push(song.uri.clone());
            Ok(())
        })?;
        Ok(uris)
    }

    #[test]
    fn whole_library_in_uri_order() {
        let uris = uris(&library(), &DatabaseSelection::all()).unwrap();
        assert_eq!(
            uris,
            vec![
                "d.flac",
                "jazz/c.flac",
                "rock/a.flac",
                "rock/live/b.flac",
                "rockabilly/e.flac"
            ]
        );
    }

    #[test]
    fn directory_selection() {
        let db = library();
        assert_eq!(
            uris(&db, &DatabaseSelection::new("rock", true)).unwrap(),
            vec!["rock/a.flac", "rock/live/b.flac"]
        );
        assert_eq!(
            uris(&db, &DatabaseSelection::new("rock/", false)).unwrap(),
            vec!["rock/a.flac"]
        );
        assert_eq!(
            uris(&db, &DatabaseSelection::new("", false)).unwrap(),
            vec!["d.flac"]
        );
    }

    #[test]
    fn song_selection() {
        assert_eq!(
            uris(&library(), &DatabaseSelection::new("jazz/c.flac", false)).unwrap(),
            vec!["jazz/c.flac"]
        );
    }

    #[test]
    fn unknown_directory() {
        let err = uris(&library(), &DatabaseSelection::new("roc", true)).unwrap_err();
        assert!(matches!(err, ResoundError::NotFound { .. }));
        assert_eq!(err.to_string(), "No such directory: roc");
    }

    #[test]
    fn add_replaces_by_uri() {
        let mut db = library();
        assert!(db.add(Song::new("d.flac")).is_some());
        assert_eq!(db.len(), 5);
        assert!(db.remove("d.flac").is_some());
        assert!(db.get("d.flac").is_none());
    }
}
