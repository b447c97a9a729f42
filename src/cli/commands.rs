use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "feedline")]
#[command(about = "Read articles from your subscribed Atom/RSS feeds")]
#[command(version)]
pub struct Cli {
    /// User whose feeds are read and managed
    #[arg(short, long, env = "FEEDLINE_USER_ID")]
    pub user: Option<i64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Subscribe to a feed
    Add {
        /// Feed URL to add
        url: String,

        /// Display name of the feed
        #[arg(short, long)]
        title: String,

        /// Home page of the site behind the feed
        #[arg(long)]
        site_url: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// List all feeds
    List,

    /// Change a feed's details
    Update {
        feed_id: i64,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        site_url: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Unsubscribe from a feed
    Remove { feed_id: i64 },

    /// Read articles of one feed, or of every feed when --feed is omitted
    Articles {
        /// Only read this feed
        #[arg(short, long)]
        feed: Option<i64>,

        /// Stop waiting for slow feeds after this many seconds (all feeds only)
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show one article of a feed
    Show {
        feed_id: i64,

        article_id: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}
