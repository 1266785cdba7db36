// src/infrastructure/feed/mod.rs
// News feed retrieval and parsing

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::domain::errors::{FeedError, FeedResult};
use crate::domain::models::NewsItem;

/// Fetches the configured RSS feed and maps its entries to news items.
pub struct FeedFetcher {
    client: reqwest::Client,
}

impl FeedFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Retrieve the feed and parse it. No retry; zero items is an error.
    pub async fn fetch(&self, url: &str) -> FeedResult<Vec<NewsItem>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FeedError::Network(format!(
                "statut HTTP {}",
                response.status().as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        parse_feed(&body)
    }
}

/// Sub-fields of an `<item>` element the application consumes.
enum ItemField {
    Title,
    Description,
    PubDate,
    Link,
}

/// Parse an RSS document into news items. Missing sub-fields default to the
/// empty string; a document with zero `<item>` elements fails explicitly
/// rather than producing an empty list.
pub fn parse_feed(xml: &str) -> FeedResult<Vec<NewsItem>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut current: Option<NewsItem> = None;
    let mut field: Option<ItemField> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"item" => current = Some(NewsItem::default()),
                b"title" if current.is_some() => field = Some(ItemField::Title),
                b"description" if current.is_some() => field = Some(ItemField::Description),
                b"pubDate" if current.is_some() => field = Some(ItemField::PubDate),
                b"link" if current.is_some() => field = Some(ItemField::Link),
                _ => field = None,
            },
            Ok(Event::Text(t)) => {
                if let (Some(item), Some(field)) = (current.as_mut(), field.as_ref()) {
                    let text = t.unescape().map_err(|e| FeedError::Parse(e.to_string()))?;
                    append(item, field, text.as_ref());
                }
            }
            Ok(Event::CData(t)) => {
                if let (Some(item), Some(field)) = (current.as_mut(), field.as_ref()) {
                    let text = String::from_utf8_lossy(&t.into_inner()).into_owned();
                    append(item, field, &text);
                }
            }
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"item" {
                    if let Some(item) = current.take() {
                        items.push(item);
                    }
                }
                field = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FeedError::Parse(e.to_string())),
            _ => {}
        }
    }

    if items.is_empty() {
        return Err(FeedError::Empty);
    }

    Ok(items)
}

fn append(item: &mut NewsItem, field: &ItemField, text: &str) {
    let slot = match field {
        ItemField::Title => &mut item.title,
        ItemField::Description => &mut item.description,
        ItemField::PubDate => &mut item.pub_date,
        ItemField::Link => &mut item.link,
    };
    slot.push_str(text);
}
