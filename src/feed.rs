//! RSS 2.0 / Atom feed parsing into ordered [`FeedEntry`] values.
//!
//! The parser is a single `quick-xml` event pass over already-fetched bytes.
//! It keeps the source order and never re-sorts; entries whose publish date
//! cannot be parsed are skipped with a warning rather than failing the feed.

use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::fmt;

/// One news entry in feed order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedEntry {
    /// Publish timestamp, normalized to UTC.
    pub published: DateTime<Utc>,
    /// Entry title, whitespace-normalized.
    pub title: String,
    /// Entry body/description, whitespace-normalized.
    pub body: String,
}

/// Feed parsing error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedError {
    message: String,
}

impl FeedError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "feed parse error: {}", self.message)
    }
}

impl std::error::Error for FeedError {}

/// Text field currently being accumulated inside an item/entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    None,
    Title,
    Body,
    Date,
}

#[derive(Clone, Debug, Default)]
struct EntryDraft {
    title: String,
    body: String,
    date_raw: String,
}

impl EntryDraft {
    fn clear(&mut self) {
        self.title.clear();
        self.body.clear();
        self.date_raw.clear();
    }

    fn finish(&self) -> Option<FeedEntry> {
        let date_raw = self.date_raw.trim();
        let published = parse_feed_date(date_raw)?;
        Some(FeedEntry {
            published,
            title: normalize_whitespace(&self.title),
            body: normalize_whitespace(&self.body),
        })
    }
}

/// Parse RSS 2.0 `<item>` or Atom `<entry>` elements from feed bytes.
///
/// Returns entries in source order. An empty feed yields an empty vector.
pub fn parse_feed(feed_bytes: &[u8]) -> Result<Vec<FeedEntry>, FeedError> {
    let mut reader = Reader::from_reader(feed_bytes);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::with_capacity(64);
    let mut entity_buf = String::with_capacity(16);

    let mut entries = Vec::new();
    let mut in_entry = false;
    let mut field = Field::None;
    let mut draft = EntryDraft::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let tag = decode_tag_name(&reader, e.name().as_ref())?;
                match tag.as_str() {
                    "item" | "entry" => {
                        in_entry = true;
                        field = Field::None;
                        draft.clear();
                    }
                    _ if in_entry => field = field_for_tag(&tag, &draft),
                    _ => {}
                }
            }
            Ok(Event::End(e)) => {
                let tag = decode_tag_name(&reader, e.name().as_ref())?;
                match tag.as_str() {
                    "item" | "entry" => {
                        if in_entry {
                            match draft.finish() {
                                Some(entry) => entries.push(entry),
                                None => log::warn!(
                                    "skipping feed entry with unparsable date: {:?}",
                                    draft.date_raw.trim()
                                ),
                            }
                        }
                        in_entry = false;
                        field = Field::None;
                    }
                    _ => field = Field::None,
                }
            }
            Ok(Event::Text(e)) => {
                if in_entry && field != Field::None {
                    let text = e
                        .decode()
                        .map_err(|err| FeedError::new(format!("text decode: {:?}", err)))?;
                    push_field_text(&mut draft, field, text.as_ref());
                }
            }
            Ok(Event::CData(e)) => {
                if in_entry && field != Field::None {
                    let text = reader
                        .decoder()
                        .decode(&e)
                        .map_err(|err| FeedError::new(format!("cdata decode: {:?}", err)))?;
                    push_field_text(&mut draft, field, text.as_ref());
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if in_entry && field != Field::None {
                    let entity_name = e
                        .decode()
                        .map_err(|err| FeedError::new(format!("entity decode: {:?}", err)))?;
                    entity_buf.clear();
                    entity_buf.push('&');
                    entity_buf.push_str(entity_name.as_ref());
                    entity_buf.push(';');
                    let resolved = quick_xml::escape::unescape(&entity_buf)
                        .map_err(|err| FeedError::new(format!("entity unescape: {:?}", err)))?;
                    push_field_text(&mut draft, field, resolved.as_ref());
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(FeedError::new(format!("xml error: {:?}", err))),
        }
        buf.clear();
    }

    Ok(entries)
}

fn field_for_tag(tag: &str, draft: &EntryDraft) -> Field {
    match tag {
        "title" => Field::Title,
        "description" | "summary" => Field::Body,
        // Atom <content> is a fallback when no <summary> was seen.
        "content" if draft.body.is_empty() => Field::Body,
        "pubdate" | "published" | "updated" => {
            // First date tag wins; RSS items rarely carry more than one,
            // Atom entries carry both <published> and <updated>.
            if draft.date_raw.trim().is_empty() {
                Field::Date
            } else {
                Field::None
            }
        }
        _ => Field::None,
    }
}

fn push_field_text(draft: &mut EntryDraft, field: Field, text: &str) {
    let target = match field {
        Field::Title => &mut draft.title,
        Field::Body => &mut draft.body,
        Field::Date => &mut draft.date_raw,
        Field::None => return,
    };
    target.push_str(text);
}

fn decode_tag_name(reader: &Reader<&[u8]>, raw: &[u8]) -> Result<String, FeedError> {
    let name = reader
        .decoder()
        .decode(raw)
        .map_err(|err| FeedError::new(format!("tag decode: {:?}", err)))?;
    // Drop a namespace prefix such as `atom:` so prefixed feeds still match.
    let local = name.rsplit(':').next().unwrap_or(name.as_ref());
    Ok(local.to_ascii_lowercase())
}

fn parse_feed_date(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const RSS_SAMPLE: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Example</title>
    <item>
      <title><![CDATA[First   headline]]></title>
      <description>Body one &amp; detail.</description>
      <pubDate>Mon, 24 Aug 2026 07:15:00 +0300</pubDate>
    </item>
    <item>
      <title>Second headline</title>
      <description>Body two.</description>
      <pubDate>not a date</pubDate>
    </item>
  </channel>
</rss>"#;

    const ATOM_SAMPLE: &[u8] = br#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <title>Atom headline</title>
    <summary>Atom body.</summary>
    <published>2026-08-24T06:00:00Z</published>
    <updated>2026-08-24T06:30:00Z</updated>
  </entry>
</feed>"#;

    #[test]
    fn parses_rss_items_in_source_order() {
        let entries = parse_feed(RSS_SAMPLE).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "First headline");
        assert_eq!(entries[0].body, "Body one & detail.");
        let expected = Utc.with_ymd_and_hms(2026, 8, 24, 4, 15, 0).unwrap();
        assert_eq!(entries[0].published, expected);
    }

    #[test]
    fn skips_entries_with_unparsable_dates() {
        let entries = parse_feed(RSS_SAMPLE).unwrap();
        assert!(entries.iter().all(|e| e.title != "Second headline"));
    }

    #[test]
    fn parses_atom_entries_preferring_published_date() {
        let entries = parse_feed(ATOM_SAMPLE).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Atom headline");
        assert_eq!(entries[0].body, "Atom body.");
        let expected = Utc.with_ymd_and_hms(2026, 8, 24, 6, 0, 0).unwrap();
        assert_eq!(entries[0].published, expected);
    }

    #[test]
    fn empty_feed_yields_no_entries() {
        let entries = parse_feed(b"<rss><channel></channel></rss>").unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(parse_feed(b"<rss><channel><item></rss>").is_err());
    }
}
