//! The `<sitemapindex>` document: references to sitemap shards.

use chrono::{DateTime, FixedOffset};

use crate::batch::batch_stream;
use crate::codec::parse_loc;
use crate::error::{Error, Result};
use crate::model::{Url, UrlSetSitemap, MAX_URLS_PER_SET};

/// One `<sitemap>` entry of an index.
///
/// A reference may be linked to an in-memory url-set for in-process
/// round-tripping; the link is a key into the index's side table and is never
/// serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapReference {
    /// Absolute URL of the shard file.
    pub location: String,
    /// When the shard file was last modified.
    pub last_modified: Option<DateTime<FixedOffset>>,
    pub(crate) url_set: Option<usize>,
}

impl SitemapReference {
    pub fn new(location: &str) -> Result<Self> {
        Ok(Self {
            location: parse_loc(location)?,
            last_modified: None,
            url_set: None,
        })
    }

    pub fn with_last_modified(mut self, date: DateTime<FixedOffset>) -> Self {
        self.last_modified = Some(date);
        self
    }
}

/// A sitemap index file. The protocol imposes no reference-count ceiling;
/// callers normally keep it proportional to shard count.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSitemap {
    /// Filename used when the writer saves this document.
    pub filename: String,
    pub references: Vec<SitemapReference>,
    /// Side table of shards linked to references. Not serialized.
    url_sets: Vec<UrlSetSitemap>,
}

impl Default for IndexSitemap {
    fn default() -> Self {
        Self {
            filename: "sitemap-index.xml".to_string(),
            references: Vec::new(),
            url_sets: Vec::new(),
        }
    }
}

impl IndexSitemap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shard an arbitrarily long sequence of urls into linked url-sets.
    ///
    /// Entries are split into batches of 50,000 without materializing the
    /// whole input; each batch becomes a shard named `sitemap-{n}.xml`
    /// (1-based) whose reference points at that filename under
    /// `directory_url`.
    pub fn from_urls(directory_url: &str, urls: impl IntoIterator<Item = Url>) -> Result<Self> {
        let base = url::Url::parse(directory_url).map_err(|source| Error::MalformedUrl {
            url: directory_url.to_string(),
            source,
        })?;

        let mut index = Self::new();
        for (n, batch) in batch_stream(urls, MAX_URLS_PER_SET).enumerate() {
            let filename = format!("sitemap-{}.xml", n + 1);
            let location = base.join(&filename).map_err(|source| Error::MalformedUrl {
                url: format!("{directory_url}/{filename}"),
                source,
            })?;

            let mut shard = UrlSetSitemap::new().with_filename(&filename);
            shard.urls = batch;
            index = index.add_url_set(shard, location.as_str(), None)?;
        }
        Ok(index)
    }

    pub fn with_filename(mut self, filename: &str) -> Self {
        self.filename = filename.to_string();
        self
    }

    /// Append an unlinked reference.
    pub fn add_reference(mut self, reference: SitemapReference) -> Self {
        self.references.push(reference);
        self
    }

    /// Append a url-set with a reference linked to it.
    pub fn add_url_set(
        mut self,
        url_set: UrlSetSitemap,
        location: &str,
        last_modified: Option<DateTime<FixedOffset>>,
    ) -> Result<Self> {
        let mut reference = SitemapReference::new(location)?;
        reference.last_modified = last_modified;
        reference.url_set = Some(self.url_sets.len());
        self.url_sets.push(url_set);
        self.references.push(reference);
        Ok(self)
    }

    /// The url-set a reference is linked to, if any.
    pub fn url_set_for(&self, reference: &SitemapReference) -> Option<&UrlSetSitemap> {
        reference.url_set.and_then(|key| self.url_sets.get(key))
    }

    /// All linked url-sets in reference order. Unlinked references are
    /// dropped.
    pub fn all_url_sets(&self) -> Vec<&UrlSetSitemap> {
        self.references
            .iter()
            .filter_map(|r| self.url_set_for(r))
            .collect()
    }
}
