//! Run aggregation queries on tokio's blocking pool
//!
//! Database visits are synchronous and may touch every song in the
//! library, so async callers hand them off instead of stalling a runtime
//! worker. Queries run to completion; there is no cancellation.

use crate::database::{Database, DatabaseSelection};
use crate::helpers::{get_stats, visit_unique_tags, DatabaseStats};
use resound_core::{ResoundError, Result, TagType};
use std::sync::Arc;
use tokio::task::JoinError;

fn join_error(err: JoinError) -> ResoundError {
    ResoundError::database(format!("Database worker failed: {err}"))
}

/// [`get_stats`] on a blocking worker thread
pub async fn get_stats_on_worker(
    db: Arc<dyn Database>,
    selection: DatabaseSelection,
) -> Result<DatabaseStats> {
    tokio::task::spawn_blocking(move || get_stats(db.as_ref(), &selection))
        .await
        .map_err(join_error)?
}

/// Distinct values of `tag_type`, collected on a blocking worker thread
pub async fn unique_tags_on_worker(
    db: Arc<dyn Database>,
    selection: DatabaseSelection,
    tag_type: TagType,
) -> Result<Vec<String>> {
    tokio::task::spawn_blocking(move || -> Result<Vec<String>> {
        let mut values = Vec::new();
        visit_unique_tags(db.as_ref(), &selection, tag_type, |value| {
            values.push(value.to_owned());
            Ok(())
        })?;
        Ok(values)
    })
    .await
    .map_err(join_error)?
}
