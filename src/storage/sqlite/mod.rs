mod connection;
mod feed_repository;

pub use connection::SqliteStorage;
pub use feed_repository::SqliteFeedRepository;
