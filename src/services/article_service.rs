use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::domain::{Feed, FeedArticle};
use crate::errors::{ArticleError, ArticleResult, DirectoryError};
use crate::sources::{rss_atom, HttpFeedFetcher};
use crate::storage::traits::FeedDirectory;

pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 8;

/// Result of reading one listed feed, held in that feed's listing slot.
#[derive(Debug)]
enum FeedOutcome {
    Pending,
    Read(Vec<FeedArticle>),
    Failed(ArticleError),
}

/// Reads articles straight from feed origins. Nothing is cached: every call
/// goes back to the directory and to the network.
pub struct ArticleService<D: FeedDirectory> {
    directory: D,
    fetcher: HttpFeedFetcher,
    max_concurrent_fetches: usize,
}

impl<D: FeedDirectory> ArticleService<D> {
    pub fn new(directory: D, fetcher: HttpFeedFetcher) -> Self {
        Self {
            directory,
            fetcher,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
        }
    }

    pub fn with_max_concurrent_fetches(mut self, limit: usize) -> Self {
        self.max_concurrent_fetches = limit.max(1);
        self
    }

    /// All articles of one feed owned by `user_id`, in document order.
    pub async fn read_feed_articles(
        &self,
        user_id: i64,
        feed_id: i64,
    ) -> ArticleResult<Vec<FeedArticle>> {
        let feed = self
            .directory
            .get_feed(user_id, feed_id)
            .map_err(|source| match source {
                DirectoryError::NotFound(_) => ArticleError::Ownership {
                    user_id,
                    feed_id,
                    source,
                },
                source => ArticleError::Lookup {
                    user_id,
                    feed_id,
                    source,
                },
            })?;

        self.read_feed(&feed).await
    }

    async fn read_feed(&self, feed: &Feed) -> ArticleResult<Vec<FeedArticle>> {
        let body = self
            .fetcher
            .fetch(&feed.url)
            .await
            .map_err(|source| ArticleError::Fetch {
                feed_id: feed.id,
                source,
            })?;

        let articles =
            rss_atom::parse_articles(&body, feed.id).map_err(|source| ArticleError::Parse {
                feed_id: feed.id,
                source,
            })?;

        debug!(feed_id = feed.id, count = articles.len(), "read feed articles");
        Ok(articles)
    }

    /// Articles of every feed the user owns, concatenated in listing order.
    /// Only a failed listing is an error; unreadable feeds contribute nothing.
    pub async fn read_all_user_articles(&self, user_id: i64) -> ArticleResult<Vec<FeedArticle>> {
        self.aggregate(user_id, None).await
    }

    /// Same as [`Self::read_all_user_articles`], but stops waiting after
    /// `limit` and returns what the finished feeds produced.
    pub async fn read_all_user_articles_within(
        &self,
        user_id: i64,
        limit: Duration,
    ) -> ArticleResult<Vec<FeedArticle>> {
        self.aggregate(user_id, Some(Instant::now() + limit)).await
    }

    async fn aggregate(
        &self,
        user_id: i64,
        deadline: Option<Instant>,
    ) -> ArticleResult<Vec<FeedArticle>> {
        let feeds = self
            .directory
            .list_feeds(user_id)
            .map_err(|source| ArticleError::FeedList { user_id, source })?;

        let slots = self.read_into_slots(&feeds, deadline).await;

        let mut articles = Vec::new();
        let mut failed = 0usize;
        let mut unfinished = 0usize;

        for (feed, outcome) in feeds.iter().zip(slots) {
            match outcome {
                FeedOutcome::Read(read) => articles.extend(read),
                FeedOutcome::Failed(err) => {
                    failed += 1;
                    warn!(
                        user_id,
                        feed_id = feed.id,
                        url = %feed.url,
                        error = %err,
                        "skipping feed that could not be read"
                    );
                }
                FeedOutcome::Pending => {
                    unfinished += 1;
                    warn!(
                        user_id,
                        feed_id = feed.id,
                        "feed did not finish before the deadline"
                    );
                }
            }
        }

        info!(
            user_id,
            feeds = feeds.len(),
            failed,
            unfinished,
            articles = articles.len(),
            "aggregated user articles"
        );
        Ok(articles)
    }

    /// Reads feeds concurrently, bounded by `max_concurrent_fetches`. Each
    /// result lands in the slot of its feed's position, so completion order
    /// never leaks into the output.
    async fn read_into_slots(
        &self,
        feeds: &[Feed],
        deadline: Option<Instant>,
    ) -> Vec<FeedOutcome> {
        let mut slots: Vec<FeedOutcome> = feeds.iter().map(|_| FeedOutcome::Pending).collect();

        let mut reads = stream::iter(feeds.iter().enumerate())
            .map(move |(index, feed)| async move { (index, self.read_feed(feed).await) })
            .buffer_unordered(self.max_concurrent_fetches);

        loop {
            let next = match deadline {
                Some(deadline) => match tokio::time::timeout_at(deadline, reads.next()).await {
                    Ok(next) => next,
                    Err(_) => break,
                },
                None => reads.next().await,
            };

            let Some((index, result)) = next else {
                break;
            };

            slots[index] = match result {
                Ok(articles) => FeedOutcome::Read(articles),
                Err(err) => FeedOutcome::Failed(err),
            };
        }

        slots
    }

    /// One article of one feed, found by exact id in the feed's current
    /// document.
    pub async fn read_one_article(
        &self,
        user_id: i64,
        feed_id: i64,
        article_id: &str,
    ) -> ArticleResult<FeedArticle> {
        let articles = self.read_feed_articles(user_id, feed_id).await?;

        articles
            .into_iter()
            .find(|article| article.id == article_id)
            .ok_or_else(|| ArticleError::ArticleNotFound {
                feed_id,
                article_id: article_id.to_string(),
            })
    }
}
