use chrono::{DateTime, Utc};
use feed_rs::model;
use feed_rs::parser;

use crate::domain::FeedArticle;
use crate::errors::ParseError;
use crate::sources::atom;

/// Relation values that mark a link as the entry's own page.
const ARTICLE_LINK_RELS: &[&str] = &["", "alternate"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryLink {
    pub href: String,
    pub rel: Option<String>,
}

/// An entry as found in the document. Every sub-element is optional, links
/// keep their document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentEntry {
    pub id: String,
    pub title: Option<String>,
    pub links: Vec<EntryLink>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub categories: Vec<String>,
    pub author: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

impl DocumentEntry {
    fn from_model(entry: model::Entry) -> Self {
        Self {
            id: entry.id,
            title: entry.title.map(|t| t.content),
            links: entry
                .links
                .into_iter()
                .map(|link| EntryLink {
                    href: link.href,
                    rel: link.rel,
                })
                .collect(),
            summary: entry.summary.map(|t| t.content),
            content: entry.content.and_then(|c| c.body),
            categories: entry.categories.into_iter().map(|c| c.term).collect(),
            author: entry.authors.into_iter().next().map(|p| p.name),
            published: entry.published,
            updated: entry.updated,
        }
    }

    pub fn article_url(&self) -> &str {
        select_article_url(&self.links)
    }

    pub fn into_article(self, feed_id: i64) -> FeedArticle {
        let url = self.article_url().to_string();

        FeedArticle {
            id: self.id,
            feed_id,
            title: self.title.unwrap_or_default(),
            url,
            content: self.content.unwrap_or_default(),
            summary: self.summary.unwrap_or_default(),
            categories: self.categories,
            published_at: self.published,
            updated_at: self.updated,
            author: self.author.unwrap_or_default(),
        }
    }
}

/// First link, in document order, whose rel is absent, empty or
/// `alternate`. Links with any other rel are never picked.
pub fn select_article_url(links: &[EntryLink]) -> &str {
    links
        .iter()
        .find(|link| ARTICLE_LINK_RELS.contains(&link.rel.as_deref().unwrap_or("")))
        .map(|link| link.href.as_str())
        .unwrap_or("")
}

/// Decode a feed document into its entries. Anything that is not a readable
/// feed fails as a whole.
///
/// Atom entries are read again from the raw XML so their text survives
/// untouched. RSS and JSON Feed entries come from feed-rs as is. Entries
/// without an id get an empty one.
pub fn parse_document(bytes: &[u8]) -> Result<Vec<DocumentEntry>, ParseError> {
    let feed = parser::Builder::new()
        .id_generator(|_, _, _| String::new())
        .build()
        .parse(bytes)?;

    if feed.feed_type == model::FeedType::Atom {
        return Ok(atom::read_entries(bytes)?);
    }

    Ok(feed
        .entries
        .into_iter()
        .map(DocumentEntry::from_model)
        .collect())
}

pub fn parse_articles(bytes: &[u8], feed_id: i64) -> Result<Vec<FeedArticle>, ParseError> {
    Ok(parse_document(bytes)?
        .into_iter()
        .map(|entry| entry.into_article(feed_id))
        .collect())
}
