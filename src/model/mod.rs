//! Typed sitemap document model: url-sets, sitemap indexes, and the Google
//! image/news/video and xhtml link extensions.
//!
//! The model is a plain data holder. Range and count limits are only enforced
//! when writing (see `validate`); a sitemap read from the wild keeps whatever
//! values it carried so a pipeline can inspect or repair them.

mod image;
mod index;
mod link;
mod news;
mod url;
mod urlset;
mod video;

pub use image::Image;
pub use index::{IndexSitemap, SitemapReference};
pub use link::Link;
pub use news::{News, Publication};
pub use url::Url;
pub use urlset::UrlSetSitemap;
pub use video::{Platform, PlatformType, Relationship, Restriction, Uploader, Video};

use crate::error::Error;

/// Protocol ceilings, fixed by sitemaps.org and the Google extensions.
pub const MAX_URLS_PER_SET: usize = 50_000;
/// Maximum news-bearing entries per url-set.
pub const MAX_NEWS_PER_SET: usize = 1_000;
/// Maximum uncompressed serialized size of one sitemap file, in bytes.
pub const MAX_FILE_BYTES: u64 = 50 * 1024 * 1024;
/// Maximum length of a `<loc>` after ASCII encoding.
pub const MAX_LOC_CHARS: usize = 2_048;
/// Maximum images per url entry.
pub const MAX_IMAGES_PER_URL: usize = 1_000;
/// Maximum tags per video.
pub const MAX_TAGS_PER_VIDEO: usize = 32;

/// A parsed sitemap document: either a url-set or an index of shards.
#[derive(Debug, Clone)]
pub enum Sitemap {
    UrlSet(UrlSetSitemap),
    Index(IndexSitemap),
}

impl Sitemap {
    /// The filename this document will be saved as.
    pub fn filename(&self) -> &str {
        match self {
            Sitemap::UrlSet(s) => &s.filename,
            Sitemap::Index(s) => &s.filename,
        }
    }
}

/// How frequently a page is likely to change. A hint to crawlers, not a
/// command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

impl std::str::FromStr for ChangeFrequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(ChangeFrequency::Always),
            "hourly" => Ok(ChangeFrequency::Hourly),
            "daily" => Ok(ChangeFrequency::Daily),
            "weekly" => Ok(ChangeFrequency::Weekly),
            "monthly" => Ok(ChangeFrequency::Monthly),
            "yearly" => Ok(ChangeFrequency::Yearly),
            "never" => Ok(ChangeFrequency::Never),
            other => Err(Error::invalid_format("changefreq", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_frequency_round_trips() {
        for token in ["always", "hourly", "daily", "weekly", "monthly", "yearly", "never"] {
            let freq: ChangeFrequency = token.parse().unwrap();
            assert_eq!(freq.as_str(), token);
        }
    }

    #[test]
    fn test_change_frequency_rejects_unknown_token() {
        assert!("fortnightly".parse::<ChangeFrequency>().is_err());
        assert!("Daily".parse::<ChangeFrequency>().is_err());
    }
}
