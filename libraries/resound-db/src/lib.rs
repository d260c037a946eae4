//! Resound Database
//!
//! Song enumeration and the aggregation queries built on it.
//!
//! # Architecture
//!
//! - **Database**: read-only `visit` over a `DatabaseSelection`
//! - **SimpleDatabase**: in-memory backend ordered by URI
//! - **Helpers**: `visit_unique_tags` and `get_stats`, one pass each
//! - **Print**: the client lines those queries produce
//! - **Worker**: the same queries off the async runtime
//!
//! # Example
//!
//! ```rust
//! use resound_core::{Song, Tag, TagType};
//! use resound_db::{get_stats, DatabaseSelection, SimpleDatabase};
//!
//! let db: SimpleDatabase = [
//!     Song::new("a.flac").with_tag(Tag::new().with_time(180).with_item(TagType::Artist, "X")),
//!     Song::new("b.flac"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let stats = get_stats(&db, &DatabaseSelection::all()).unwrap();
//! assert_eq!(stats.song_count, 2);
//! assert_eq!(stats.artist_count, 1);
//! assert_eq!(stats.total_duration, 180);
//! ```

#![forbid(unsafe_code)]

mod database;
mod helpers;
mod print;
mod simple;
mod worker;

pub use database::{Database, DatabaseSelection, FilterItem, SongFilter};
pub use helpers::{get_stats, visit_unique_tags, DatabaseStats, StringSet};
pub use print::{print_stats, print_unique_tags, stats_lines};
pub use simple::SimpleDatabase;
pub use worker::{get_stats_on_worker, unique_tags_on_worker};
