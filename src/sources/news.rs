use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;

use super::{ensure_success, NewsSource, SourceError};
use crate::models::NewsItem;

const FEED_URL: &str = "https://news.google.com/rss/search";
/// Items kept per feed.
pub const MAX_NEWS_ITEMS: usize = 6;

lazy_static! {
    static ref ITEM: Regex = Regex::new(r"(?s)<item>.*?</item>").unwrap();
    static ref TITLE: Regex = Regex::new(r"(?is)<title>(.*?)</title>").unwrap();
    static ref LINK: Regex = Regex::new(r"(?is)<link>(.*?)</link>").unwrap();
    static ref PUB_DATE: Regex = Regex::new(r"(?is)<pubDate>(.*?)</pubDate>").unwrap();
    static ref SOURCE: Regex = Regex::new(r"(?is)<source[^>]*>(.*?)</source>").unwrap();
    static ref CDATA: Regex = Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").unwrap();
}

/// Google News RSS search.
pub struct GoogleNewsClient {
    client: Client,
}

impl GoogleNewsClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// Unwraps CDATA sections and decodes the entities feeds actually use.
/// `&amp;` goes last so `&amp;lt;` stays a literal `&lt;`.
fn decode_xml(text: &str) -> String {
    CDATA
        .replace_all(text, "$1")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn first_match(re: &Regex, source: &str) -> Option<String> {
    re.captures(source)
        .and_then(|c| c.get(1))
        .map(|m| decode_xml(m.as_str()).trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parses up to `max_items` `<item>` blocks from an RSS document.
pub fn parse_news_rss(xml: &str, max_items: usize) -> Vec<NewsItem> {
    ITEM.find_iter(xml)
        .take(max_items)
        .map(|item| {
            let item = item.as_str();
            NewsItem {
                title: first_match(&TITLE, item).unwrap_or_default(),
                url: first_match(&LINK, item).unwrap_or_default(),
                published_at: first_match(&PUB_DATE, item),
                source: first_match(&SOURCE, item).unwrap_or_else(|| "Unknown".to_string()),
            }
        })
        .collect()
}

/// Search terms for a token: its name (or symbol, or address) followed by the symbol.
pub fn token_query(name: Option<&str>, symbol: Option<&str>, address: &str) -> String {
    let lead = name.or(symbol).unwrap_or(address);
    format!("{} {}", lead, symbol.unwrap_or("")).trim().to_string()
}

#[async_trait]
impl NewsSource for GoogleNewsClient {
    async fn fetch_news(&self, query: &str) -> Result<Vec<NewsItem>, SourceError> {
        let q = format!("{} crypto token when:7d", query);

        let resp = self.client.get(FEED_URL)
            .query(&[("q", q.as_str()), ("hl", "en-US"), ("gl", "US"), ("ceid", "US:en")])
            .header("Accept", "application/rss+xml")
            .send()
            .await
            .map_err(SourceError::network)?;
        let resp = ensure_success("Google News", resp)?;

        let xml = resp.text().await.map_err(SourceError::parse)?;
        Ok(parse_news_rss(&xml, MAX_NEWS_ITEMS))
    }
}
