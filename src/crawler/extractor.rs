//! Link extraction collaborator
//!
//! Given a fetched page body, an [`Extractor`] produces the absolute link
//! URLs found on it. The production implementation parses HTML anchor tags;
//! validation and deduplication of the result happen in the crawl core.

use scraper::{Html, Selector};
use url::Url;

/// Collaborator that pulls candidate links out of a page body
pub trait Extractor: Send + Sync {
    /// Returns the absolute form of every candidate link on the page
    ///
    /// The result is finite and consumed eagerly; entries are raw strings
    /// that still go through normalization before they are offered to the
    /// frontier.
    fn extract_links(&self, body: &str, base: &Url) -> Vec<String>;
}

/// Extractor for `<a href>` tags in HTML documents
///
/// Skips links that can never be crawled: `javascript:`, `mailto:`, `tel:`
/// and `data:` schemes, fragment-only anchors, and anchors carrying the
/// `download` attribute.
#[derive(Debug, Default)]
pub struct HtmlExtractor;

impl Extractor for HtmlExtractor {
    fn extract_links(&self, body: &str, base: &Url) -> Vec<String> {
        let document = Html::parse_document(body);
        let mut links = Vec::new();

        let Ok(selector) = Selector::parse("a[href]") else {
            return links;
        };

        for element in document.select(&selector) {
            if element.value().attr("download").is_some() {
                continue;
            }
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            if let Some(absolute) = resolve_href(href, base) {
                links.push(absolute);
            }
        }

        links
    }
}

/// Resolves an href to an absolute URL string, or drops it
fn resolve_href(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    base.join(href).ok().map(|url| url.to_string())
}
