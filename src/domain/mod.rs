pub mod feed;
pub mod article;

pub use feed::{Feed, FeedUpdate};
pub use article::{FeedArticle, FeedArticleResponse};
