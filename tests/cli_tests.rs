use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TWO_ENTRY_ATOM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Test Feed</title>
  <entry>
    <id>article1</id>
    <title>Test Article 1</title>
    <link href="https://example.com/article1" rel="alternate"/>
    <summary type="html"><![CDATA[Summary of article 1]]></summary>
    <published>2023-01-01T00:00:00Z</published>
    <content type="html"><![CDATA[Content of article 1]]></content>
  </entry>
  <entry>
    <id>article2</id>
    <title>Test Article 2</title>
    <link href="https://example.com/article2" rel="alternate"/>
    <summary type="html"><![CDATA[Summary of article 2]]></summary>
    <published>2023-01-03T00:00:00Z</published>
    <content type="html"><![CDATA[Content of article 2]]></content>
  </entry>
</feed>"#;

fn feedline_cmd(db: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("feedline").unwrap();
    cmd.env("FEEDLINE_DB_PATH", db.path().join("test.db"))
        .env_remove("FEEDLINE_USER_ID")
        .env_remove("FEEDLINE_AGGREGATE_TIMEOUT_SECS")
        .env_remove("FEEDLINE_MAX_CONCURRENT_FETCHES");
    cmd
}

fn add_feed(db: &TempDir, user: &str, url: &str, title: &str) {
    feedline_cmd(db)
        .args(["--user", user, "add", url, "--title", title])
        .assert()
        .success()
        .stdout(predicate::str::contains("Feed added successfully!"));
}

async fn origin() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/good"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TWO_ENTRY_ATOM))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forbidden"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Error response"))
        .mount(&server)
        .await;
    server
}

#[test]
fn test_help_lists_article_commands() {
    Command::cargo_bin("feedline")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("articles"))
        .stdout(predicate::str::contains("show"));
}

#[test]
fn test_articles_help_shows_timeout_flag() {
    Command::cargo_bin("feedline")
        .unwrap()
        .args(["articles", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--timeout-secs"))
        .stdout(predicate::str::contains("--feed"));
}

#[test]
fn test_missing_user_is_rejected() {
    let db = TempDir::new().unwrap();

    feedline_cmd(&db)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No user given"));
}

#[test]
fn test_list_without_feeds() {
    let db = TempDir::new().unwrap();

    feedline_cmd(&db)
        .args(["--user", "1", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No feeds configured."));
}

#[test]
fn test_user_from_environment() {
    let db = TempDir::new().unwrap();

    feedline_cmd(&db)
        .env("FEEDLINE_USER_ID", "1")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No feeds configured."));
}

#[test]
fn test_feeds_are_listed_per_user() {
    let db = TempDir::new().unwrap();
    add_feed(&db, "1", "https://example.com/atom.xml", "Example");

    feedline_cmd(&db)
        .args(["--user", "1", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Example"))
        .stdout(predicate::str::contains("https://example.com/atom.xml"));

    feedline_cmd(&db)
        .args(["--user", "2", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No feeds configured."));
}

#[test]
fn test_add_without_title_fails() {
    let db = TempDir::new().unwrap();

    feedline_cmd(&db)
        .args(["--user", "1", "add", "https://example.com/atom.xml", "--title", " "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("title is required"));
}

#[test]
fn test_articles_of_foreign_feed_is_not_found() {
    let db = TempDir::new().unwrap();
    add_feed(&db, "1", "http://127.0.0.1:1/feed", "Owned by one");

    feedline_cmd(&db)
        .args(["--user", "2", "articles", "--feed", "1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not found for user 2"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_articles_of_one_feed_as_json() {
    let server = origin().await;
    let db = TempDir::new().unwrap();
    add_feed(&db, "1", &format!("{}/good", server.uri()), "Good");

    feedline_cmd(&db)
        .args(["--user", "1", "articles", "--feed", "1", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": \"article1\""))
        .stdout(predicate::str::contains("\"feed_id\": 1"))
        .stdout(predicate::str::contains("Content of article 1").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_forbidden_feed_is_upstream_failure() {
    let server = origin().await;
    let db = TempDir::new().unwrap();
    add_feed(&db, "1", &format!("{}/forbidden", server.uri()), "Forbidden");

    feedline_cmd(&db)
        .args(["--user", "1", "articles", "--feed", "1"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("failed to retrieve feed 1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_all_articles_tolerate_broken_feed() {
    let server = origin().await;
    let db = TempDir::new().unwrap();
    add_feed(&db, "1", &format!("{}/good", server.uri()), "Good");
    add_feed(&db, "1", &format!("{}/forbidden", server.uri()), "Forbidden");

    feedline_cmd(&db)
        .args(["--user", "1", "articles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Test Article 1"))
        .stdout(predicate::str::contains("Test Article 2"))
        .stdout(predicate::str::contains("2 articles."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_show_article() {
    let server = origin().await;
    let db = TempDir::new().unwrap();
    add_feed(&db, "1", &format!("{}/good", server.uri()), "Good");

    feedline_cmd(&db)
        .args(["--user", "1", "show", "1", "article2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Test Article 2"))
        .stdout(predicate::str::contains("https://example.com/article2"))
        .stdout(predicate::str::contains("Content of article 2"));

    feedline_cmd(&db)
        .args(["--user", "1", "show", "1", "does-not-exist"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("article does-not-exist not found in feed 1"));
}
