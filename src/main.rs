use std::time::Duration;

use clap::Parser;

use feedline::cli::{Cli, Commands};
use feedline::config::Config;
use feedline::domain::{FeedArticle, FeedArticleResponse, FeedUpdate};
use feedline::errors::{ErrorClass, FeederError, FeederResult};
use feedline::services::{ArticleService, FeedService};
use feedline::sources::HttpFeedFetcher;
use feedline::storage::sqlite::{SqliteFeedRepository, SqliteStorage};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        let code = match e.class() {
            ErrorClass::NotFound => 2,
            ErrorClass::Upstream => 3,
            ErrorClass::Internal => 1,
        };
        std::process::exit(code);
    }
}

async fn run() -> FeederResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;
    feedline::logging::init(&config.log_level);

    let user_id = cli.user.ok_or_else(|| {
        FeederError::InvalidInput(
            "No user given; pass --user or set FEEDLINE_USER_ID".to_string(),
        )
    })?;

    // Initialize storage
    let storage = SqliteStorage::new(&config.db_path)?;

    match cli.command {
        Commands::Add {
            url,
            title,
            site_url,
            description,
        } => cmd_add(&storage, user_id, &url, &title, site_url, description),
        Commands::List => cmd_list(&storage, user_id),
        Commands::Update {
            feed_id,
            title,
            url,
            site_url,
            description,
        } => {
            let update = FeedUpdate {
                title,
                url,
                site_url,
                description,
            };
            cmd_update(&storage, user_id, feed_id, update)
        }
        Commands::Remove { feed_id } => cmd_remove(&storage, user_id, feed_id),
        Commands::Articles {
            feed,
            timeout_secs,
            json,
        } => {
            let service = article_service(&storage, &config);
            let timeout = timeout_secs
                .map(Duration::from_secs)
                .or(config.aggregate_timeout);
            cmd_articles(&service, user_id, feed, timeout, json).await
        }
        Commands::Show {
            feed_id,
            article_id,
            json,
        } => {
            let service = article_service(&storage, &config);
            cmd_show(&service, user_id, feed_id, &article_id, json).await
        }
    }
}

fn article_service(
    storage: &SqliteStorage,
    config: &Config,
) -> ArticleService<SqliteFeedRepository> {
    ArticleService::new(
        SqliteFeedRepository::new(storage.clone()),
        HttpFeedFetcher::new(),
    )
    .with_max_concurrent_fetches(config.max_concurrent_fetches)
}

fn cmd_add(
    storage: &SqliteStorage,
    user_id: i64,
    url: &str,
    title: &str,
    site_url: Option<String>,
    description: Option<String>,
) -> FeederResult<()> {
    let service = FeedService::new(SqliteFeedRepository::new(storage.clone()));
    let feed = service.add(user_id, url, title, site_url, description)?;

    println!("Feed added successfully!");
    println!("  ID: {}", feed.id);
    println!("  Title: {}", feed.title);
    println!("  URL: {}", feed.url);

    Ok(())
}

fn cmd_list(storage: &SqliteStorage, user_id: i64) -> FeederResult<()> {
    let service = FeedService::new(SqliteFeedRepository::new(storage.clone()));
    let feeds = service.list(user_id)?;

    if feeds.is_empty() {
        println!("No feeds configured.");
        return Ok(());
    }

    println!("Configured feeds:\n");
    for feed in feeds {
        println!("  {}. {}", feed.id, feed.title);
        println!("    URL: {}", feed.url);
        if let Some(site_url) = &feed.site_url {
            println!("    Site: {}", site_url);
        }
        println!();
    }

    Ok(())
}

fn cmd_update(
    storage: &SqliteStorage,
    user_id: i64,
    feed_id: i64,
    update: FeedUpdate,
) -> FeederResult<()> {
    let service = FeedService::new(SqliteFeedRepository::new(storage.clone()));
    let feed = service.update(user_id, feed_id, update)?;

    println!("Updated: {} ({})", feed.title, feed.url);
    Ok(())
}

fn cmd_remove(storage: &SqliteStorage, user_id: i64, feed_id: i64) -> FeederResult<()> {
    let service = FeedService::new(SqliteFeedRepository::new(storage.clone()));
    let feed = service.get(user_id, feed_id)?;

    service.remove(user_id, feed_id)?;
    println!("Removed: {}", feed.title);

    Ok(())
}

async fn cmd_articles(
    service: &ArticleService<SqliteFeedRepository>,
    user_id: i64,
    feed: Option<i64>,
    timeout: Option<Duration>,
    json: bool,
) -> FeederResult<()> {
    let articles = match (feed, timeout) {
        (Some(feed_id), _) => service.read_feed_articles(user_id, feed_id).await?,
        (None, Some(limit)) => service.read_all_user_articles_within(user_id, limit).await?,
        (None, None) => service.read_all_user_articles(user_id).await?,
    };

    if json {
        let responses: Vec<FeedArticleResponse> = articles
            .into_iter()
            .map(FeedArticleResponse::from)
            .collect();
        println!("{}", serde_json::to_string_pretty(&responses)?);
        return Ok(());
    }

    if articles.is_empty() {
        println!("No articles.");
        return Ok(());
    }

    for article in &articles {
        print_article_line(article);
    }
    println!("\n{} articles.", articles.len());

    Ok(())
}

async fn cmd_show(
    service: &ArticleService<SqliteFeedRepository>,
    user_id: i64,
    feed_id: i64,
    article_id: &str,
    json: bool,
) -> FeederResult<()> {
    let article = service.read_one_article(user_id, feed_id, article_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&article)?);
        return Ok(());
    }

    println!("{}", article.title);
    if !article.author.is_empty() {
        println!("By {}", article.author);
    }
    if let Some(published) = article.published_at {
        println!("Published {}", published.to_rfc3339());
    }
    if !article.url.is_empty() {
        println!("{}", article.url);
    }
    if !article.categories.is_empty() {
        println!("Tags: {}", article.categories.join(", "));
    }
    println!();

    let body = if article.content.is_empty() {
        &article.summary
    } else {
        &article.content
    };
    println!("{}", body);

    Ok(())
}

fn print_article_line(article: &FeedArticle) {
    let published = article
        .published_at
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "----------".to_string());

    println!("[{}] {} {}", article.feed_id, published, article.title);
    if !article.url.is_empty() {
        println!("    {}", article.url);
    }
}
