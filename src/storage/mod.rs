pub mod traits;
pub mod sqlite;

pub use traits::{FeedDirectory, FeedRepository};
pub use sqlite::{SqliteStorage, SqliteFeedRepository};
