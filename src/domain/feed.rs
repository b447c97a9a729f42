use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    /// Zero until the directory has stored the feed.
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub url: String,
    pub site_url: Option<String>,
    pub description: Option<String>,
    pub last_fetched_at: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Feed {
    pub fn new(user_id: i64, url: String, title: String) -> Self {
        Self {
            id: 0,
            user_id,
            title,
            url,
            site_url: None,
            description: None,
            last_fetched_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_site_url(mut self, site_url: Option<String>) -> Self {
        self.site_url = site_url;
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

/// Partial edit of a stored feed. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedUpdate {
    pub title: Option<String>,
    pub url: Option<String>,
    pub site_url: Option<String>,
    pub description: Option<String>,
}

impl FeedUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.url.is_none()
            && self.site_url.is_none()
            && self.description.is_none()
    }
}
