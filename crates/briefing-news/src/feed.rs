use briefing_core::Headline;
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::error::{NewsError, Result};

// ─── RSS 2.0 ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RssDocument {
    channel: RssChannel,
}

#[derive(Debug, Deserialize)]
struct RssChannel {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    title: Option<String>,
    link: Option<String>,
    source: Option<RssSource>,
}

#[derive(Debug, Deserialize)]
struct RssSource {
    #[serde(rename = "$text", default)]
    name: String,
}

// ─── Atom ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct AtomDocument {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<AtomText>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    source: Option<AtomSource>,
    #[serde(rename = "author", default)]
    authors: Vec<AtomAuthor>,
}

#[derive(Debug, Deserialize)]
struct AtomText {
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomSource {
    title: Option<AtomText>,
}

#[derive(Debug, Deserialize)]
struct AtomAuthor {
    name: Option<String>,
}

/// One feed item, format-independent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    /// Publisher as named by the feed itself.
    pub source: Option<String>,
}

/// Build a feed search URL; the query is form-encoded (spaces become `+`).
pub fn feed_search_url(base: &str, query: &str, hl: &str, gl: &str, ceid: &str) -> Result<String> {
    let params = serde_urlencoded::to_string([
        ("q", query),
        ("hl", hl),
        ("gl", gl),
        ("ceid", ceid),
    ])
    .map_err(|e| NewsError::InvalidUrl(format!("{base}: {e}")))?;

    let sep = if base.contains('?') { '&' } else { '?' };
    Ok(format!("{base}{sep}{params}"))
}

/// Parse an RSS 2.0 document, falling back to Atom.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>> {
    match from_str::<RssDocument>(xml) {
        Ok(doc) => Ok(doc.channel.items.into_iter().map(rss_entry).collect()),
        Err(rss_err) => {
            let doc: AtomDocument = from_str(xml).map_err(|atom_err| {
                NewsError::Parse(format!(
                    "not an RSS or Atom feed (rss: {rss_err}; atom: {atom_err})"
                ))
            })?;
            Ok(doc.entries.into_iter().map(atom_entry).collect())
        }
    }
}

fn rss_entry(item: RssItem) -> FeedEntry {
    FeedEntry {
        title: item.title.unwrap_or_default(),
        link: item.link.unwrap_or_default(),
        source: item.source.map(|s| s.name),
    }
}

fn atom_entry(entry: AtomEntry) -> FeedEntry {
    let link = entry
        .links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .or_else(|| entry.links.first())
        .and_then(|l| l.href.clone())
        .unwrap_or_default();

    let source = entry
        .source
        .and_then(|s| s.title)
        .map(|t| t.value)
        .or_else(|| entry.authors.into_iter().find_map(|a| a.name));

    FeedEntry {
        title: entry.title.map(|t| t.value).unwrap_or_default(),
        link,
        source,
    }
}

pub fn to_headline(entry: FeedEntry) -> Headline {
    let title = entry.title.trim().to_string();
    let url = entry.link.trim().to_string();

    let src = entry
        .source
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| host_of(&url))
        .unwrap_or_default();

    Headline { title, url, src }
}

/// Authority part of `link` exactly as written, minus any `www.`.
///
/// No normalization: case, ports and non-ASCII hosts are kept.
fn host_of(link: &str) -> Option<String> {
    let rest = match link.split_once("://") {
        Some((scheme, rest)) if is_scheme(scheme) => rest,
        _ => link.strip_prefix("//")?,
    };
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let netloc = &rest[..end];
    (!netloc.is_empty()).then(|| netloc.replace("www.", ""))
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
