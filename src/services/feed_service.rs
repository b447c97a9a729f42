use url::Url;

use crate::domain::{Feed, FeedUpdate};
use crate::errors::{DirectoryError, FeederError, FeederResult};
use crate::storage::traits::{FeedDirectory, FeedRepository};

/// Subscription management for one user's feeds.
pub struct FeedService<R: FeedRepository + FeedDirectory> {
    repository: R,
}

impl<R: FeedRepository + FeedDirectory> FeedService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Add a new feed by URL
    /// Validates title and URL, then stores it for the user
    pub fn add(
        &self,
        user_id: i64,
        url: &str,
        title: &str,
        site_url: Option<String>,
        description: Option<String>,
    ) -> FeederResult<Feed> {
        validate_title(title)?;
        validate_url(url)?;

        if self.repository.exists(user_id, url)? {
            return Err(DirectoryError::AlreadyExists(url.to_string()).into());
        }

        let feed = Feed::new(user_id, url.to_string(), title.trim().to_string())
            .with_site_url(site_url)
            .with_description(description);

        let id = self.repository.add(&feed)?;

        Ok(self.repository.get_feed(user_id, id)?)
    }

    pub fn update(&self, user_id: i64, feed_id: i64, update: FeedUpdate) -> FeederResult<Feed> {
        if update.is_empty() {
            return Err(FeederError::InvalidInput(
                "Nothing to update".to_string(),
            ));
        }
        if let Some(title) = &update.title {
            validate_title(title)?;
        }
        if let Some(url) = &update.url {
            validate_url(url)?;
        }

        self.repository.update(user_id, feed_id, &update)?;
        Ok(self.repository.get_feed(user_id, feed_id)?)
    }

    /// Remove a feed by ID
    pub fn remove(&self, user_id: i64, feed_id: i64) -> FeederResult<()> {
        Ok(self.repository.remove(user_id, feed_id)?)
    }

    /// List all feeds of the user, oldest first
    pub fn list(&self, user_id: i64) -> FeederResult<Vec<Feed>> {
        Ok(self.repository.list_feeds(user_id)?)
    }

    pub fn get(&self, user_id: i64, feed_id: i64) -> FeederResult<Feed> {
        Ok(self.repository.get_feed(user_id, feed_id)?)
    }
}

fn validate_title(title: &str) -> FeederResult<()> {
    if title.trim().is_empty() {
        return Err(FeederError::FeedValidation("title is required".to_string()));
    }
    Ok(())
}

fn validate_url(url: &str) -> FeederResult<()> {
    let parsed = Url::parse(url).map_err(|e| FeederError::InvalidUrl(format!("{}: {}", url, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(FeederError::InvalidUrl(format!(
            "unsupported URL scheme: {}",
            scheme
        ))),
    }
}
