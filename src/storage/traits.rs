use crate::domain::{Feed, FeedUpdate};
use crate::errors::DirectoryResult;

/// Read side of the feed directory, scoped by owner.
#[cfg_attr(test, mockall::automock)]
pub trait FeedDirectory: Send + Sync {
    /// Fails with `NotFound` when the feed is missing or owned by someone else.
    fn get_feed(&self, user_id: i64, feed_id: i64) -> DirectoryResult<Feed>;
    fn list_feeds(&self, user_id: i64) -> DirectoryResult<Vec<Feed>>;
}

#[cfg_attr(test, mockall::automock)]
pub trait FeedRepository: Send + Sync {
    fn add(&self, feed: &Feed) -> DirectoryResult<i64>;
    fn update(&self, user_id: i64, feed_id: i64, update: &FeedUpdate) -> DirectoryResult<()>;
    fn remove(&self, user_id: i64, feed_id: i64) -> DirectoryResult<()>;
    fn exists(&self, user_id: i64, url: &str) -> DirectoryResult<bool>;
}
