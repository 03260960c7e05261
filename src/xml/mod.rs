//! Event-based XML marshalling for sitemap documents.
//!
//! Both directions are hand-rolled `quick-xml` event loops. The writer binds
//! the full protocol namespace set on the root element once per document,
//! whether or not the extensions are used; the reader dispatches on the root
//! tag and skips elements it does not know.

mod read;
mod write;

pub use read::parse_sitemap;
pub use write::{write_index_to, write_url_set_to};

/// Default sitemaps.org namespace.
pub const NS_SITEMAP: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
pub const NS_NEWS: &str = "http://www.google.com/schemas/sitemap-news/0.9";
pub const NS_IMAGE: &str = "http://www.google.com/schemas/sitemap-image/1.1";
pub const NS_VIDEO: &str = "http://www.google.com/schemas/sitemap-video/1.1";
pub const NS_XHTML: &str = "http://www.w3.org/1999/xhtml";
