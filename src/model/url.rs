//! One `<url>` entry of a url-set.

use chrono::{DateTime, FixedOffset};

use crate::codec::parse_loc;
use crate::error::Result;
use crate::model::{ChangeFrequency, Image, Link, News, Video};

/// A single page entry. Only `location` is required; everything else is a
/// hint or an extension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Url {
    /// Absolute URL of the page, in its original (possibly non-ASCII) form.
    /// Must be under 2048 characters once percent-encoded.
    pub location: String,
    /// When the page itself was last modified, not when the sitemap was
    /// generated.
    pub last_modified: Option<DateTime<FixedOffset>>,
    pub change_frequency: Option<ChangeFrequency>,
    /// Relative importance on this site, 0.0..=1.0. Crawlers default to 0.5.
    pub priority: Option<f64>,
    pub images: Vec<Image>,
    pub links: Vec<Link>,
    pub news: Option<News>,
    pub videos: Vec<Video>,
}

impl Url {
    /// Create an entry for the given absolute URL.
    pub fn new(location: &str) -> Result<Self> {
        Ok(Self {
            location: parse_loc(location)?,
            ..Self::default()
        })
    }

    pub fn with_last_modified(mut self, date: DateTime<FixedOffset>) -> Self {
        self.last_modified = Some(date);
        self
    }

    pub fn with_change_frequency(mut self, frequency: ChangeFrequency) -> Self {
        self.change_frequency = Some(frequency);
        self
    }

    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_news(mut self, news: News) -> Self {
        self.news = Some(news);
        self
    }

    pub fn add_image(mut self, image: Image) -> Self {
        self.images.push(image);
        self
    }

    pub fn add_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    pub fn add_video(mut self, video: Video) -> Self {
        self.videos.push(video);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Image;

    #[test]
    fn test_location_keeps_original_unicode() {
        let url = Url::new("http://www.example.com/ümlat.php&q=name").unwrap();
        assert_eq!(url.location, "http://www.example.com/ümlat.php&q=name");
    }

    #[test]
    fn test_relative_location_is_rejected() {
        assert!(Url::new("pages/about.html").is_err());
    }

    #[test]
    fn test_fluent_construction() {
        let url = Url::new("https://example.com/sample1.html")
            .unwrap()
            .with_priority(0.8)
            .with_change_frequency(ChangeFrequency::Weekly)
            .add_image(Image::new("https://example.com/image.jpg").unwrap())
            .add_image(Image::new("https://example.com/photo.jpg").unwrap());
        assert_eq!(url.images.len(), 2);
        assert_eq!(url.priority, Some(0.8));
    }
}
