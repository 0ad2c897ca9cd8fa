//! The cover source cascade.
//!
//! Each [`Strategy`] is one source plus one query shape. `find` returns
//! `Ok(None)` for "no match"; errors are the resolver's to log and skip.
//! Strategies with several internal attempts (ISBN probes, variant and
//! image sweeps) skip failed attempts themselves and keep going.

use std::sync::Arc;

use crate::catalog::{CatalogClient, CatalogConfig, CatalogQuery, ISBN_FIELDS};
use crate::http::HttpTransport;
use crate::scrape::{self, ImageSearch};
use crate::text;
use crate::volumes::{VolumesClient, VolumesConfig};
use coverfind_core::{AppConfig, CoverRequest, Error};

/// ISBNs probed by the ISBN-assisted lookup.
const MAX_ISBN_PROBES: usize = 10;

/// Candidates validated per image search query.
const MAX_IMAGE_PROBES: usize = 8;

/// Clients shared by every strategy.
#[derive(Clone)]
pub struct Sources {
    pub http: Arc<dyn HttpTransport>,
    pub catalog: CatalogClient,
    pub volumes: VolumesClient,
    pub images: ImageSearch,
}

impl Sources {
    pub fn from_config(http: Arc<dyn HttpTransport>, config: &AppConfig) -> Self {
        Self {
            catalog: CatalogClient::new(http.clone(), CatalogConfig::from_app_config(config)),
            volumes: VolumesClient::new(http.clone(), VolumesConfig::from_app_config(config)),
            images: ImageSearch::from_config(http.clone(), config),
            http,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    CatalogTitleAuthor,
    CatalogTitle,
    CatalogSimplified,
    CatalogSimplifiedLastName,
    Volumes,
    Isbn,
    VariantSweep,
    AuthorSweep,
    ImageSearch,
}

/// Evaluation order.
pub const CASCADE: [Strategy; 9] = [
    Strategy::CatalogTitleAuthor,
    Strategy::CatalogTitle,
    Strategy::CatalogSimplified,
    Strategy::CatalogSimplifiedLastName,
    Strategy::Volumes,
    Strategy::Isbn,
    Strategy::VariantSweep,
    Strategy::AuthorSweep,
    Strategy::ImageSearch,
];

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Strategy::CatalogTitleAuthor => "catalog_title_author",
            Strategy::CatalogTitle => "catalog_title",
            Strategy::CatalogSimplified => "catalog_simplified",
            Strategy::CatalogSimplifiedLastName => "catalog_simplified_last_name",
            Strategy::Volumes => "volumes",
            Strategy::Isbn => "isbn",
            Strategy::VariantSweep => "variant_sweep",
            Strategy::AuthorSweep => "author_sweep",
            Strategy::ImageSearch => "image_search",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        CASCADE.into_iter().find(|s| s.name() == name)
    }

    /// Look for a cover URL with this strategy.
    pub async fn find(self, request: &CoverRequest, sources: &Sources) -> Result<Option<String>, Error> {
        let title = request.title.trim();
        let author = request.primary_author();

        match self {
            Strategy::CatalogTitleAuthor => match author {
                Some(author) => sources.catalog.find_cover(&CatalogQuery::title_author(title, author)).await,
                None => Ok(None),
            },
            Strategy::CatalogTitle => sources.catalog.find_cover(&CatalogQuery::title(title)).await,
            Strategy::CatalogSimplified => {
                let simplified = text::simplify(title);
                if simplified == title {
                    return Ok(None);
                }
                sources.catalog.find_cover(&CatalogQuery::title(&simplified)).await
            }
            Strategy::CatalogSimplifiedLastName => {
                let Some(author) = author else { return Ok(None) };
                let simplified = text::simplify(title);
                let last = text::last_name(author);
                if simplified == title && last == author {
                    return Ok(None);
                }
                sources.catalog.find_cover(&CatalogQuery::title_author(&simplified, &last)).await
            }
            Strategy::Volumes => sources.volumes.find_cover(title, author).await,
            Strategy::Isbn => isbn_lookup(title, author, sources).await,
            Strategy::VariantSweep => variant_sweep(title, author, sources).await,
            Strategy::AuthorSweep => match author {
                Some(author) => author_sweep(title, author, sources).await,
                None => Ok(None),
            },
            Strategy::ImageSearch => image_search(title, author, sources).await,
        }
    }
}

async fn isbn_lookup(title: &str, author: Option<&str>, sources: &Sources) -> Result<Option<String>, Error> {
    let query = CatalogQuery::title_maybe_author(title, author).with_fields(ISBN_FIELDS);
    let isbns = sources.catalog.search(&query).await?.isbns(MAX_ISBN_PROBES);

    for isbn in isbns {
        let url = sources.catalog.isbn_cover_url(&isbn);
        match sources.http.validate(&url).await {
            Ok(()) => return Ok(Some(url)),
            Err(e) => tracing::debug!(%isbn, error = %e, "isbn cover probe failed"),
        }
    }

    Ok(None)
}

async fn variant_sweep(title: &str, author: Option<&str>, sources: &Sources) -> Result<Option<String>, Error> {
    for variant in text::variants(title).into_iter().filter(|v| v != title) {
        match sources.catalog.find_cover(&CatalogQuery::title_maybe_author(&variant, author)).await {
            Ok(Some(url)) => return Ok(Some(url)),
            Ok(None) => {}
            Err(e) => tracing::debug!(%variant, error = %e, "catalog variant query failed"),
        }

        match sources.volumes.find_cover(&variant, author).await {
            Ok(Some(url)) => return Ok(Some(url)),
            Ok(None) => {}
            Err(e) => tracing::debug!(%variant, error = %e, "volumes variant query failed"),
        }
    }

    Ok(None)
}

/// Titles must share `min(2, n)` content words with the simplified target.
fn shares_enough_words(target: &[String], candidate_title: &str) -> bool {
    let candidate = text::content_words(candidate_title);
    let shared = target.iter().filter(|w| candidate.contains(w)).count();
    shared >= target.len().min(2)
}

/// Content words of `title`, each kept once in first-seen order.
fn distinct_words(title: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for word in text::content_words(title) {
        if !out.contains(&word) {
            out.push(word);
        }
    }
    out
}

async fn author_sweep(title: &str, author: &str, sources: &Sources) -> Result<Option<String>, Error> {
    let target = distinct_words(&text::simplify(title));
    if target.is_empty() {
        return Ok(None);
    }

    let response = sources.catalog.search(&CatalogQuery::author(author)).await?;
    let hit = response.docs.iter().find_map(|doc| {
        let cover_id = doc.cover_i.filter(|id| *id > 0)?;
        let doc_title = doc.title.as_deref()?;
        shares_enough_words(&target, doc_title).then_some(cover_id)
    });

    Ok(hit.map(|id| sources.catalog.cover_url(id)))
}

async fn image_search(title: &str, author: Option<&str>, sources: &Sources) -> Result<Option<String>, Error> {
    for query in scrape::queries(title, author) {
        let candidates = match sources.images.candidates(&query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::debug!(%query, error = %e, "image search query failed");
                continue;
            }
        };

        for candidate in candidates.into_iter().take(MAX_IMAGE_PROBES) {
            if sources.http.validate(&candidate).await.is_ok() {
                return Ok(Some(candidate));
            }
        }
    }

    Ok(None)
}
