//! Fetch and parse sitemaps over HTTP.

use std::io::Read;
use std::time::Duration;

use flate2::read::GzDecoder;
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{IndexSitemap, Sitemap, UrlSetSitemap};
use crate::robots::Robots;
use crate::xml::parse_sitemap;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Downloads sitemap documents, transparently inflating gzip payloads.
#[derive(Debug, Clone)]
pub struct SitemapReader {
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl Default for SitemapReader {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(3),
            read_timeout: Duration::from_secs(30),
        }
    }
}

impl SitemapReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Fetch a sitemap, dispatching on the root tag.
    pub async fn read(&self, url: &str) -> Result<Sitemap> {
        let xml = self.fetch(url).await?;
        parse_sitemap(&xml)
    }

    /// Fetch a sitemap that must be a url-set.
    pub async fn read_url_set(&self, url: &str) -> Result<UrlSetSitemap> {
        match self.read(url).await? {
            Sitemap::UrlSet(url_set) => Ok(url_set),
            Sitemap::Index(_) => Err(Error::invalid_format("urlset document", url)),
        }
    }

    /// Fetch a sitemap that must be an index.
    pub async fn read_index(&self, url: &str) -> Result<IndexSitemap> {
        match self.read(url).await? {
            Sitemap::Index(index) => Ok(index),
            Sitemap::UrlSet(_) => Err(Error::invalid_format("sitemapindex document", url)),
        }
    }

    /// Fetch every url-set an index references, in reference order.
    pub async fn read_url_sets(&self, index: &IndexSitemap) -> Result<Vec<UrlSetSitemap>> {
        let mut url_sets = Vec::with_capacity(index.references.len());
        for reference in &index.references {
            url_sets.push(self.read_url_set(&reference.location).await?);
        }
        Ok(url_sets)
    }

    /// Fetch every sitemap advertised in a robots.txt, in directive order.
    pub async fn read_sitemaps(&self, robots: &Robots) -> Result<Vec<Sitemap>> {
        let mut sitemaps = Vec::with_capacity(robots.sitemap_urls.len());
        for url in &robots.sitemap_urls {
            sitemaps.push(self.read(url).await?);
        }
        Ok(sitemaps)
    }

    /// Parse an already-fetched document.
    pub fn parse_str(&self, xml: &str) -> Result<Sitemap> {
        parse_sitemap(xml)
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        debug!(url, "fetching sitemap");
        let client = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.read_timeout)
            .build()?;

        let response = client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let payload = response.bytes().await?;
        decode_payload(&payload)
    }
}

/// Some sitemaps are served gzip-compressed with a plain content type; sniff
/// the magic bytes instead of trusting headers.
fn decode_payload(payload: &[u8]) -> Result<String> {
    if payload.starts_with(&GZIP_MAGIC) {
        let mut decoder = GzDecoder::new(payload);
        let mut xml = String::new();
        decoder.read_to_string(&mut xml)?;
        Ok(xml)
    } else {
        String::from_utf8(payload.to_vec()).map_err(|e| {
            Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }
}
