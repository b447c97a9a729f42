use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of a feed document, normalized. Built fresh on every read and
/// never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedArticle {
    pub id: String,
    pub feed_id: i64,
    pub title: String,
    pub url: String,
    pub content: String,
    pub summary: String,
    pub categories: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub author: String,
}

/// List view of an article: drops the full content and the update stamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedArticleResponse {
    pub id: String,
    pub feed_id: i64,
    pub title: String,
    pub url: String,
    pub summary: String,
    pub categories: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub author: String,
}

impl From<&FeedArticle> for FeedArticleResponse {
    fn from(article: &FeedArticle) -> Self {
        Self {
            id: article.id.clone(),
            feed_id: article.feed_id,
            title: article.title.clone(),
            url: article.url.clone(),
            summary: article.summary.clone(),
            categories: article.categories.clone(),
            published_at: article.published_at,
            author: article.author.clone(),
        }
    }
}

impl From<FeedArticle> for FeedArticleResponse {
    fn from(article: FeedArticle) -> Self {
        Self {
            id: article.id,
            feed_id: article.feed_id,
            title: article.title,
            url: article.url,
            summary: article.summary,
            categories: article.categories,
            published_at: article.published_at,
            author: article.author,
        }
    }
}
