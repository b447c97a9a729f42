pub mod atom;
pub mod fetcher;
pub mod rss_atom;

pub use fetcher::HttpFeedFetcher;
pub use rss_atom::{
    parse_articles, parse_document, select_article_url, DocumentEntry, EntryLink,
};
