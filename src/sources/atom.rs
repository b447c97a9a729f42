//! Atom entries read straight from the XML events.
//!
//! Character data of `<id>`, `<title>`, `<summary>`, `<content>` and the
//! author's `<name>` is kept exactly as written, CDATA payloads and
//! surrounding whitespace included. Only text directly inside those elements
//! is taken; markup nested in them is skipped.

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Decoder, Reader};

use crate::sources::rss_atom::{DocumentEntry, EntryLink};

/// Entry child elements whose text is collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    Title,
    Summary,
    Content,
    Published,
    Updated,
    AuthorName,
}

impl Field {
    fn at(path: &[Vec<u8>]) -> Option<Self> {
        match path {
            [root, entry, child] if is_entry(root, entry) => match child.as_slice() {
                b"id" => Some(Field::Id),
                b"title" => Some(Field::Title),
                b"summary" => Some(Field::Summary),
                b"content" => Some(Field::Content),
                b"published" => Some(Field::Published),
                b"updated" => Some(Field::Updated),
                _ => None,
            },
            [root, entry, author, name] if is_entry(root, entry) => {
                (author.as_slice() == b"author" && name.as_slice() == b"name")
                    .then_some(Field::AuthorName)
            }
            _ => None,
        }
    }
}

fn is_entry(root: &[u8], entry: &[u8]) -> bool {
    root == b"feed" && entry == b"entry"
}

/// Entry being assembled, with its raw timestamps.
#[derive(Default)]
struct PendingEntry {
    entry: DocumentEntry,
    published: Option<String>,
    updated: Option<String>,
}

impl PendingEntry {
    fn set(&mut self, field: Field, text: String) {
        match field {
            Field::Id => self.entry.id = text,
            Field::Title => self.entry.title = Some(text),
            Field::Summary => self.entry.summary = Some(text),
            Field::Content => self.entry.content = Some(text),
            Field::Published => self.published = Some(text),
            Field::Updated => self.updated = Some(text),
            Field::AuthorName => {
                // First author only
                if self.entry.author.is_none() {
                    self.entry.author = Some(text);
                }
            }
        }
    }

    fn finish(self) -> DocumentEntry {
        DocumentEntry {
            published: self.published.as_deref().and_then(parse_timestamp),
            updated: self.updated.as_deref().and_then(parse_timestamp),
            ..self.entry
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn attribute(
    start: &BytesStart<'_>,
    name: &str,
    decoder: Decoder,
) -> Result<Option<String>, quick_xml::Error> {
    match start.try_get_attribute(name)? {
        Some(attr) => {
            let raw = decoder.decode(&attr.value)?;
            Ok(Some(quick_xml::escape::unescape(&raw)?.into_owned()))
        }
        None => Ok(None),
    }
}

/// Entries of an Atom document, in document order.
pub fn read_entries(bytes: &[u8]) -> Result<Vec<DocumentEntry>, quick_xml::Error> {
    let mut reader = Reader::from_reader(bytes);
    let config = reader.config_mut();
    config.expand_empty_elements = true;
    config.trim_text(false);

    let mut buf = Vec::new();
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut entries = Vec::new();
    let mut pending: Option<PendingEntry> = None;
    let mut text = String::new();

    loop {
        let decoder = reader.decoder();

        match reader.read_event_into(&mut buf)? {
            Event::Start(start) => {
                path.push(start.local_name().as_ref().to_vec());

                match path.as_slice() {
                    [root, entry] if is_entry(root, entry) => {
                        pending = Some(PendingEntry::default());
                    }
                    [root, entry, child] if is_entry(root, entry) => {
                        if let Some(current) = pending.as_mut() {
                            match child.as_slice() {
                                b"link" => {
                                    if let Some(href) = attribute(&start, "href", decoder)? {
                                        let rel = attribute(&start, "rel", decoder)?;
                                        current.entry.links.push(EntryLink { href, rel });
                                    }
                                }
                                b"category" => {
                                    if let Some(term) = attribute(&start, "term", decoder)? {
                                        current.entry.categories.push(term);
                                    }
                                }
                                _ => {}
                            }
                        }
                    }
                    _ => {}
                }

                if Field::at(&path).is_some() {
                    text.clear();
                }
            }

            Event::Text(chars) => {
                if Field::at(&path).is_some() {
                    text.push_str(&decoder.decode(&chars)?);
                }
            }

            Event::CData(chars) => {
                if Field::at(&path).is_some() {
                    text.push_str(&decoder.decode(&chars)?);
                }
            }

            Event::GeneralRef(reference) => {
                if Field::at(&path).is_some() {
                    if let Some(ch) = reference.resolve_char_ref()? {
                        text.push(ch);
                    } else {
                        let name = decoder.decode(&reference)?;
                        match quick_xml::escape::resolve_predefined_entity(&name) {
                            Some(resolved) => text.push_str(resolved),
                            // Unknown entities stay escaped
                            None => {
                                text.push('&');
                                text.push_str(&name);
                                text.push(';');
                            }
                        }
                    }
                }
            }

            Event::End(_) => {
                if let (Some(field), Some(current)) = (Field::at(&path), pending.as_mut()) {
                    current.set(field, std::mem::take(&mut text));
                }

                if let [root, entry] = path.as_slice() {
                    if is_entry(root, entry) {
                        if let Some(finished) = pending.take() {
                            entries.push(finished.finish());
                        }
                    }
                }
                path.pop();
            }

            Event::Eof => break,

            _ => {}
        }

        buf.clear();
    }

    Ok(entries)
}
