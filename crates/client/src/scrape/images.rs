//! Image URL harvesting from search result pages.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

use crate::http::{host_matches, parse_http_url};

/// Longer URLs are tracking redirects or inline payloads.
pub const MAX_URL_LEN: usize = 500;

/// Substrings that make a URL more likely to be a book cover.
pub const COVER_HINTS: &[&str] = &["cover", "book", "amazon", "goodreads", "openlibrary"];

static QUOTED_IMAGE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"["'](https?://[^"'\s<>]+?\.(?:jpe?g|png|webp)(?:\?[^"'\s<>]*)?)["']"#).unwrap()
});

static ESCAPED_MEDIA_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"murl&quot;:&quot;(https?://.+?)&quot;"#).unwrap());

static SRC_ATTR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"src\s*=\s*["'](https?://[^"']+)["']"#).unwrap());

/// Collect absolute image URLs from an HTML page, in document order, deduplicated.
///
/// Looks at `<img src|data-src>` plus quoted URLs anywhere in the markup
/// (inline JSON, escaped attributes), since result pages often load real
/// thumbnails from script data.
pub fn extract_image_urls(html: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    let mut push = |url: &str| {
        let url = url.replace("&amp;", "&");
        if !found.contains(&url) {
            found.push(url);
        }
    };

    let document = Html::parse_document(html);
    let selector = Selector::parse("img").expect("invalid selector");
    for element in document.select(&selector) {
        for attr in ["src", "data-src"] {
            if let Some(value) = element.value().attr(attr) {
                push(value);
            }
        }
    }

    for re in [&*ESCAPED_MEDIA_URL, &*QUOTED_IMAGE_URL, &*SRC_ATTR] {
        for caps in re.captures_iter(html) {
            if let Some(m) = caps.get(1) {
                push(m.as_str());
            }
        }
    }

    found
}

/// Drop URLs that cannot be covers: non-http(s) (`data:` etc.), overlong,
/// or served from one of `ignored_hosts`.
pub fn filter_candidates(urls: Vec<String>, ignored_hosts: &[String]) -> Vec<String> {
    urls.into_iter()
        .filter(|url| url.len() <= MAX_URL_LEN)
        .filter(|url| match parse_http_url(url) {
            Ok(parsed) => {
                let host = parsed.host_str().unwrap_or_default();
                !ignored_hosts.iter().any(|ignored| host_matches(host, ignored))
            }
            Err(_) => false,
        })
        .collect()
}

/// Stable reorder: URLs containing a cover hint first.
pub fn rank_candidates(urls: Vec<String>) -> Vec<String> {
    let (mut preferred, rest): (Vec<String>, Vec<String>) = urls.into_iter().partition(|url| {
        let lower = url.to_lowercase();
        COVER_HINTS.iter().any(|hint| lower.contains(hint))
    });
    preferred.extend(rest);
    preferred
}
