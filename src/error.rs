//! Crate-wide error type and result alias.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while building, writing, or reading a sitemap.
#[derive(Debug, Error)]
pub enum Error {
    /// A location string could not be parsed as an absolute URL.
    #[error("malformed url '{url}': {source}")]
    MalformedUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A text value could not be decoded into its typed form
    /// (bad yes/no token, unknown enum value, unparsable date, ...).
    #[error("invalid {what} value '{value}'")]
    InvalidFormat { what: &'static str, value: String },

    /// Write-time structural validation failed. Carries every violation
    /// found, not just the first.
    #[error("sitemap failed validation: {}", violations.join("; "))]
    Validation { violations: Vec<String> },

    /// The serialized url-set exceeds the 50MB uncompressed protocol ceiling.
    #[error("urlset is too big: serialized size is {size_mb:.2}MB, maximum is 50MB uncompressed")]
    TooLarge { size_mb: f64 },

    /// The final HTTP response for a fetch was not 2xx.
    #[error("request to {url} failed with status {status}")]
    Fetch { url: String, status: u16 },

    /// A robots.txt redirect chain exceeded the hop bound.
    #[error("too many redirects ({hops}) while fetching {url}")]
    TooManyRedirects { url: String, hops: u32 },

    /// XML could not be parsed or emitted.
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Transport-level HTTP failure (connect timeout, read timeout, DNS, ...).
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid_format(what: &'static str, value: impl Into<String>) -> Self {
        Error::InvalidFormat {
            what,
            value: value.into(),
        }
    }
}
