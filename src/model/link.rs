//! XHTML alternate-language link extension.

use crate::codec::parse_loc;
use crate::error::Result;

/// An `<xhtml:link>` pointing at an alternate version of the page, usually a
/// translation identified by its `hreflang`.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    /// Link relationship. The sitemap use case is always `alternate`.
    pub rel: String,
    /// Language of the alternate page (BCP 47 tag).
    pub hreflang: Option<String>,
    /// Absolute URL of the alternate page.
    pub href: String,
}

impl Link {
    /// An `alternate` link for the given language.
    pub fn new(hreflang: &str, href: &str) -> Result<Self> {
        Ok(Self {
            rel: "alternate".to_string(),
            hreflang: Some(hreflang.to_string()),
            href: parse_loc(href)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_defaults_to_alternate() {
        let link = Link::new("de", "https://example.com/de/seite").unwrap();
        assert_eq!(link.rel, "alternate");
        assert_eq!(link.hreflang.as_deref(), Some("de"));
    }

    #[test]
    fn test_link_rejects_relative_href() {
        assert!(Link::new("de", "/de/seite").is_err());
    }
}
