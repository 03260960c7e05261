//! Sitemap document model, serialization, and discovery.
//!
//! Builds, validates, writes, and reads XML sitemaps per the sitemaps.org
//! protocol with the Google news, image, video, and xhtml link extensions.
//! Arbitrarily long URL streams are sharded into linked index/url-set
//! structures, files over the protocol limits are rejected before any bytes
//! reach their destination, and sitemap URLs can be discovered from a site's
//! robots.txt.

pub mod batch;
pub mod codec;
pub mod error;
pub mod model;
pub mod reader;
pub mod robots;
pub mod validate;
pub mod writer;
pub mod xml;

pub use error::{Error, Result};
pub use model::{
    ChangeFrequency, Image, IndexSitemap, Link, News, Platform, PlatformType, Publication,
    Relationship, Restriction, Sitemap, SitemapReference, Uploader, Url, UrlSetSitemap, Video,
};
pub use reader::SitemapReader;
pub use robots::{Robots, RobotsTxtReader};
pub use writer::SitemapWriter;
