//! Google news extension entry.

use chrono::{DateTime, FixedOffset};

/// News metadata for a url entry. Google only indexes articles published in
/// the last two days, so `publication_date` should be recent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct News {
    pub publication: Option<Publication>,
    pub publication_date: Option<DateTime<FixedOffset>>,
    pub title: Option<String>,
}

impl News {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_publication(mut self, publication: Publication) -> Self {
        self.publication = Some(publication);
        self
    }

    pub fn with_publication_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.publication_date = Some(date);
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }
}

/// The publishing organ and its language.
#[derive(Debug, Clone, PartialEq)]
pub struct Publication {
    pub name: String,
    /// ISO 639 language code, with `zh-cn`/`zh-tw` as the two exceptions.
    pub language: String,
}

impl Publication {
    pub fn new(name: &str, language: &str) -> Self {
        Self {
            name: name.to_string(),
            language: language.to_string(),
        }
    }
}
