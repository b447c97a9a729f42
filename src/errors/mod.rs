use thiserror::Error;

/// Failure of the single HTTP GET issued for a feed.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// The body was not a feed document we can read.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("feed document could not be parsed: {0}")]
    Document(#[from] feed_rs::parser::ParseFeedError),

    #[error("feed entries could not be read: {0}")]
    Entries(#[from] quick_xml::Error),
}

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Feed not found: {0}")]
    NotFound(i64),

    #[error("Feed already exists: {0}")]
    AlreadyExists(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

#[derive(Error, Debug)]
pub enum ArticleError {
    // Missing and foreign feeds collapse into this one kind
    #[error("feed {feed_id} not found for user {user_id}")]
    Ownership {
        user_id: i64,
        feed_id: i64,
        #[source]
        source: DirectoryError,
    },

    // Directory failure while resolving the feed, not a missing feed
    #[error("failed to look up feed {feed_id} for user {user_id}: {source}")]
    Lookup {
        user_id: i64,
        feed_id: i64,
        #[source]
        source: DirectoryError,
    },

    #[error("failed to retrieve feed {feed_id}: {source}")]
    Fetch {
        feed_id: i64,
        #[source]
        source: FetchError,
    },

    #[error("failed to parse feed {feed_id}: {source}")]
    Parse {
        feed_id: i64,
        #[source]
        source: ParseError,
    },

    #[error("article {article_id} not found in feed {feed_id}")]
    ArticleNotFound { feed_id: i64, article_id: String },

    #[error("failed to list feeds for user {user_id}: {source}")]
    FeedList {
        user_id: i64,
        #[source]
        source: DirectoryError,
    },
}

/// How a caller above the article services should present a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    NotFound,
    Upstream,
    Internal,
}

impl ArticleError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ArticleError::Ownership { .. } | ArticleError::ArticleNotFound { .. } => {
                ErrorClass::NotFound
            }
            ArticleError::Fetch { .. } | ArticleError::Parse { .. } => ErrorClass::Upstream,
            ArticleError::Lookup { .. } | ArticleError::FeedList { .. } => ErrorClass::Internal,
        }
    }
}

#[derive(Error, Debug)]
pub enum FeederError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Feed errors
    #[error("Invalid feed URL: {0}")]
    InvalidUrl(String),

    #[error("Feed validation failed: {0}")]
    FeedValidation(String),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Articles(#[from] ArticleError),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // User input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl FeederError {
    pub fn class(&self) -> ErrorClass {
        match self {
            FeederError::Articles(err) => err.class(),
            FeederError::Directory(DirectoryError::NotFound(_)) => ErrorClass::NotFound,
            _ => ErrorClass::Internal,
        }
    }
}

pub type FeederResult<T> = Result<T, FeederError>;
pub type DirectoryResult<T> = Result<T, DirectoryError>;
pub type ArticleResult<T> = Result<T, ArticleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_kinds_share_a_class() {
        let ownership = ArticleError::Ownership {
            user_id: 1,
            feed_id: 7,
            source: DirectoryError::NotFound(7),
        };
        let missing = ArticleError::ArticleNotFound {
            feed_id: 7,
            article_id: "gone".to_string(),
        };

        assert_eq!(ownership.class(), ErrorClass::NotFound);
        assert_eq!(missing.class(), ErrorClass::NotFound);
    }

    #[test]
    fn test_status_failure_is_upstream() {
        let err = ArticleError::Fetch {
            feed_id: 2,
            source: FetchError::Status {
                url: "https://example.com/feed".to_string(),
                status: reqwest::StatusCode::FORBIDDEN,
            },
        };

        assert_eq!(err.class(), ErrorClass::Upstream);
        assert!(err.to_string().contains("failed to retrieve feed 2"));
        assert!(err.to_string().contains("403"));
    }

    #[test]
    fn test_listing_failure_is_internal() {
        let err = FeederError::from(ArticleError::FeedList {
            user_id: 1,
            source: DirectoryError::Database(rusqlite::Error::InvalidQuery),
        });

        assert_eq!(err.class(), ErrorClass::Internal);
    }

    #[test]
    fn test_lookup_failure_is_internal() {
        let err = FeederError::from(ArticleError::Lookup {
            user_id: 1,
            feed_id: 3,
            source: DirectoryError::Database(rusqlite::Error::InvalidQuery),
        });

        assert_eq!(err.class(), ErrorClass::Internal);
        assert!(err.to_string().contains("failed to look up feed 3"));
    }

    #[test]
    fn test_directory_not_found_message() {
        let err = FeederError::from(DirectoryError::NotFound(42));
        assert_eq!(err.to_string(), "Feed not found: 42");
        assert_eq!(err.class(), ErrorClass::NotFound);
    }
}
