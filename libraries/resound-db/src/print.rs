//! Client responses for database queries

use crate::database::{Database, DatabaseSelection};
use crate::helpers::{get_stats, visit_unique_tags, DatabaseStats};
use resound_core::{Response, Result, TagType};

/// Send one `<TagName>: <value>` line per distinct value
pub fn print_unique_tags(
    client: &mut dyn Response,
    db: &dyn Database,
    selection: &DatabaseSelection,
    tag_type: TagType,
) -> Result<()> {
    let name = tag_type.as_str();
    visit_unique_tags(db, selection, tag_type, |value| {
        client.write_line(&format!("{name}: {value}"))
    })
}

/// Format statistics as protocol lines
pub fn stats_lines(stats: &DatabaseStats) -> [String; 4] {
    [
        format!("artists: {}", stats.artist_count),
        format!("albums: {}", stats.album_count),
        format!("songs: {}", stats.song_count),
        format!("db_playtime: {}", stats.total_duration),
    ]
}

/// Send the statistics of `selection`
pub fn print_stats(
    client: &mut dyn Response,
    db: &dyn Database,
    selection: &DatabaseSelection,
) -> Result<()> {
    let stats = get_stats(db, selection)?;
    for line in stats_lines(&stats) {
        client.write_line(&line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimpleDatabase;
    use resound_core::{ResoundError, Song, Tag, TextResponse};

    fn library() -> SimpleDatabase {
        [
            Song::new("a.flac").with_tag(
                Tag::new()
                    .with_time(200)
                    .with_item(TagType::Artist, "Nina Simone")
                    .with_item(TagType::Album, "Pastel Blues"),
            ),
            Song::new("b.flac").with_tag(
                Tag::new()
                    .with_time(-1)
                    .with_item(TagType::Artist, "Nina Simone"),
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn stats_lines_in_protocol_order() {
        let mut client = TextResponse::new();
        print_stats(&mut client, &library(), &DatabaseSelection::all()).unwrap();
        assert_eq!(
            client.lines,
            vec!["artists: 1", "albums: 1", "songs: 2", "db_playtime: 200"]
        );
    }

    #[test]
    fn unique_tag_lines() {
        let mut client = TextResponse::new();
        print_unique_tags(&mut client, &library(), &DatabaseSelection::all(), TagType::Album)
            .unwrap();
        assert_eq!(client.lines, vec!["Album: ", "Album: Pastel Blues"]);
    }

    #[test]
    fn unknown_directory_reports_nothing() {
        let mut client = TextResponse::new();
        let err = print_stats(
            &mut client,
            &library(),
            &DatabaseSelection::new("nowhere", true),
        )
        .unwrap_err();
        assert!(matches!(err, ResoundError::NotFound { .. }));
        assert!(client.lines.is_empty());
    }
}
