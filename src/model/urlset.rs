//! The `<urlset>` document: a flat list of up to 50,000 url entries.

use crate::model::Url;

/// A sitemap file listing individual pages.
///
/// The 50,000-entry, 1,000-news, and 50MB ceilings are checked by the writer,
/// not here, so oversized or out-of-range documents can still be held and
/// inspected in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlSetSitemap {
    /// Filename used when the writer saves this document.
    pub filename: String,
    pub urls: Vec<Url>,
}

impl Default for UrlSetSitemap {
    fn default() -> Self {
        Self {
            filename: "sitemap.xml".to_string(),
            urls: Vec::new(),
        }
    }
}

impl UrlSetSitemap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a url-set from any iterator of entries.
    pub fn from_urls(urls: impl IntoIterator<Item = Url>) -> Self {
        Self {
            urls: urls.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn with_filename(mut self, filename: &str) -> Self {
        self.filename = filename.to_string();
        self
    }

    pub fn add_url(mut self, url: Url) -> Self {
        self.urls.push(url);
        self
    }
}
