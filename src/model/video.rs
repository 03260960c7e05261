//! Google video extension entry and its sub-entities.

use chrono::{DateTime, FixedOffset};

use crate::codec::parse_loc;
use crate::error::{Error, Result};

/// A video available on the parent page.
///
/// All fields are optional in the model; the write-time validator enforces
/// the protocol's range limits (duration, rating, tag count, ...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Video {
    pub thumbnail_url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub content_url: Option<String>,
    pub player_url: Option<String>,
    /// Duration in seconds, 1..=28800.
    pub duration: Option<u32>,
    pub expiration_date: Option<DateTime<FixedOffset>>,
    /// Rating, 0.0..=5.0.
    pub rating: Option<f64>,
    pub view_count: Option<u64>,
    pub publication_date: Option<DateTime<FixedOffset>>,
    pub family_friendly: Option<bool>,
    pub restriction: Option<Restriction>,
    pub platform: Option<Platform>,
    pub requires_subscription: Option<bool>,
    pub uploader: Option<Uploader>,
    pub live: Option<bool>,
    pub tags: Vec<String>,
}

impl Video {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thumbnail_url(mut self, url: &str) -> Result<Self> {
        self.thumbnail_url = Some(parse_loc(url)?);
        Ok(self)
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_content_url(mut self, url: &str) -> Result<Self> {
        self.content_url = Some(parse_loc(url)?);
        Ok(self)
    }

    pub fn with_player_url(mut self, url: &str) -> Result<Self> {
        self.player_url = Some(parse_loc(url)?);
        Ok(self)
    }

    pub fn with_duration(mut self, seconds: u32) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn with_expiration_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.expiration_date = Some(date);
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_view_count(mut self, count: u64) -> Self {
        self.view_count = Some(count);
        self
    }

    pub fn with_publication_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.publication_date = Some(date);
        self
    }

    pub fn with_family_friendly(mut self, value: bool) -> Self {
        self.family_friendly = Some(value);
        self
    }

    pub fn with_restriction(mut self, restriction: Restriction) -> Self {
        self.restriction = Some(restriction);
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn with_requires_subscription(mut self, value: bool) -> Self {
        self.requires_subscription = Some(value);
        self
    }

    pub fn with_uploader(mut self, uploader: Uploader) -> Self {
        self.uploader = Some(uploader);
        self
    }

    pub fn with_live(mut self, value: bool) -> Self {
        self.live = Some(value);
        self
    }

    pub fn add_tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    pub fn with_tags<S: AsRef<str>>(mut self, tags: &[S]) -> Self {
        self.tags = tags.iter().map(|t| t.as_ref().to_string()).collect();
        self
    }
}

/// Whether a platform/restriction list is an allowlist or a denylist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    Allow,
    Deny,
}

impl Relationship {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::Allow => "allow",
            Relationship::Deny => "deny",
        }
    }
}

impl std::str::FromStr for Relationship {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("allow") {
            Ok(Relationship::Allow)
        } else if s.eq_ignore_ascii_case("deny") {
            Ok(Relationship::Deny)
        } else {
            Err(Error::invalid_format("relationship", s))
        }
    }
}

/// A platform class the video is allowed or denied on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformType {
    Web,
    Mobile,
    Tv,
}

impl PlatformType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformType::Web => "web",
            PlatformType::Mobile => "mobile",
            PlatformType::Tv => "tv",
        }
    }
}

impl std::str::FromStr for PlatformType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("web") {
            Ok(PlatformType::Web)
        } else if s.eq_ignore_ascii_case("mobile") {
            Ok(PlatformType::Mobile)
        } else if s.eq_ignore_ascii_case("tv") {
            Ok(PlatformType::Tv)
        } else {
            Err(Error::invalid_format("platform type", s))
        }
    }
}

/// Platform allow/deny list, serialized as space-delimited tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    pub relationship: Relationship,
    pub types: Vec<PlatformType>,
}

impl Platform {
    /// Duplicate types are coalesced, keeping first-seen order.
    pub fn new(relationship: Relationship, types: &[PlatformType]) -> Self {
        let mut unique = Vec::with_capacity(types.len());
        for t in types {
            if !unique.contains(t) {
                unique.push(*t);
            }
        }
        Self {
            relationship,
            types: unique,
        }
    }
}

/// Country allow/deny list (ISO 3166 codes), serialized as space-delimited
/// tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct Restriction {
    pub relationship: Relationship,
    pub countries: Vec<String>,
}

impl Restriction {
    /// Duplicate country codes are coalesced, keeping first-seen order.
    pub fn new(relationship: Relationship, countries: &[&str]) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(countries.len());
        for c in countries {
            if !unique.iter().any(|u| u == c) {
                unique.push((*c).to_string());
            }
        }
        Self {
            relationship,
            countries: unique,
        }
    }
}

/// Who uploaded the video.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Uploader {
    /// Display name, up to 255 characters.
    pub name: Option<String>,
    /// URL with more information about the uploader; must be on the same
    /// domain as the parent page per the extension spec.
    pub info_url: Option<String>,
}

impl Uploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_info_url(mut self, url: &str) -> Result<Self> {
        self.info_url = Some(parse_loc(url)?);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_coalesces_duplicates_in_order() {
        let platform = Platform::new(
            Relationship::Allow,
            &[
                PlatformType::Tv,
                PlatformType::Web,
                PlatformType::Tv,
                PlatformType::Mobile,
                PlatformType::Web,
            ],
        );
        assert_eq!(
            platform.types,
            vec![PlatformType::Tv, PlatformType::Web, PlatformType::Mobile]
        );
    }

    #[test]
    fn test_restriction_coalesces_duplicates_in_order() {
        let restriction = Restriction::new(Relationship::Deny, &["GB", "US", "GB"]);
        assert_eq!(restriction.countries, vec!["GB", "US"]);
    }

    #[test]
    fn test_relationship_parse_is_case_insensitive() {
        assert_eq!("ALLOW".parse::<Relationship>().unwrap(), Relationship::Allow);
        assert_eq!("deny".parse::<Relationship>().unwrap(), Relationship::Deny);
        assert!("block".parse::<Relationship>().is_err());
    }

    #[test]
    fn test_fluent_video_construction() {
        let video = Video::new()
            .with_title("Grilling steaks for summer")
            .with_duration(600)
            .with_rating(4.2)
            .with_family_friendly(true)
            .add_tag("steak")
            .add_tag("grilling");
        assert_eq!(video.tags.len(), 2);
        assert_eq!(video.duration, Some(600));
    }
}
