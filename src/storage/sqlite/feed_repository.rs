use rusqlite::{params, Row};

use crate::domain::{Feed, FeedUpdate};
use crate::errors::{DirectoryError, DirectoryResult};
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::{FeedDirectory, FeedRepository};

const FEED_COLUMNS: &str =
    "id, user_id, title, url, site_url, description, last_fetched_at, created_at, updated_at";

pub struct SqliteFeedRepository {
    storage: SqliteStorage,
}

impl SqliteFeedRepository {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }
}

fn feed_from_row(row: &Row<'_>) -> rusqlite::Result<Feed> {
    Ok(Feed {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        url: row.get(3)?,
        site_url: row.get(4)?,
        description: row.get(5)?,
        last_fetched_at: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

impl FeedDirectory for SqliteFeedRepository {
    fn get_feed(&self, user_id: i64, feed_id: i64) -> DirectoryResult<Feed> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {FEED_COLUMNS} FROM feeds WHERE id = ?1 AND user_id = ?2"
        ))?;

        match stmt.query_row([feed_id, user_id], feed_from_row) {
            Ok(feed) => Ok(feed),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(DirectoryError::NotFound(feed_id)),
            Err(e) => Err(DirectoryError::from(e)),
        }
    }

    fn list_feeds(&self, user_id: i64) -> DirectoryResult<Vec<Feed>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {FEED_COLUMNS} FROM feeds WHERE user_id = ?1 ORDER BY created_at, id"
        ))?;

        let feeds = stmt.query_map([user_id], feed_from_row)?;
        feeds.collect::<Result<Vec<_>, _>>().map_err(DirectoryError::from)
    }
}

impl FeedRepository for SqliteFeedRepository {
    fn add(&self, feed: &Feed) -> DirectoryResult<i64> {
        let conn = self.storage.connection()?;

        // Check within the same connection to avoid deadlock
        let mut stmt =
            conn.prepare("SELECT EXISTS(SELECT 1 FROM feeds WHERE user_id = ?1 AND url = ?2)")?;
        let exists: bool = stmt.query_row(params![feed.user_id, feed.url], |row| row.get(0))?;
        drop(stmt);

        if exists {
            return Err(DirectoryError::AlreadyExists(feed.url.clone()));
        }

        conn.execute(
            "INSERT INTO feeds (user_id, title, url, site_url, description)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                feed.user_id,
                feed.title,
                feed.url,
                feed.site_url,
                feed.description,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn update(&self, user_id: i64, feed_id: i64, update: &FeedUpdate) -> DirectoryResult<()> {
        let conn = self.storage.connection()?;
        let changed = conn.execute(
            "UPDATE feeds SET
                title = COALESCE(?3, title),
                url = COALESCE(?4, url),
                site_url = COALESCE(?5, site_url),
                description = COALESCE(?6, description),
                updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now')
             WHERE id = ?1 AND user_id = ?2",
            params![
                feed_id,
                user_id,
                update.title,
                update.url,
                update.site_url,
                update.description,
            ],
        )?;

        if changed < 1 {
            return Err(DirectoryError::NotFound(feed_id));
        }
        Ok(())
    }

    fn remove(&self, user_id: i64, feed_id: i64) -> DirectoryResult<()> {
        let conn = self.storage.connection()?;
        let changed = conn.execute(
            "DELETE FROM feeds WHERE id = ?1 AND user_id = ?2",
            [feed_id, user_id],
        )?;

        if changed < 1 {
            return Err(DirectoryError::NotFound(feed_id));
        }
        Ok(())
    }

    fn exists(&self, user_id: i64, url: &str) -> DirectoryResult<bool> {
        let conn = self.storage.connection()?;
        let mut stmt =
            conn.prepare("SELECT EXISTS(SELECT 1 FROM feeds WHERE user_id = ?1 AND url = ?2)")?;
        let exists: bool = stmt.query_row(params![user_id, url], |row| row.get(0))?;
        Ok(exists)
    }
}
