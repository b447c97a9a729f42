pub mod feed_service;
pub mod article_service;

pub use feed_service::FeedService;
pub use article_service::{ArticleService, DEFAULT_MAX_CONCURRENT_FETCHES};
