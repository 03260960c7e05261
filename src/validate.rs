//! Write-time structural validation.
//!
//! Violations are collected, never fail-fast, so one pass reports everything
//! that would make a document rejected by search engines. Reading never runs
//! these checks.

use std::sync::OnceLock;

use regex::Regex;

use crate::codec::encode_loc;
use crate::model::{
    IndexSitemap, Url, UrlSetSitemap, Video, MAX_IMAGES_PER_URL, MAX_LOC_CHARS, MAX_NEWS_PER_SET,
    MAX_TAGS_PER_VIDEO, MAX_URLS_PER_SET,
};

/// Maximum video description length.
const MAX_DESCRIPTION_CHARS: usize = 2_048;
/// Maximum uploader display-name length.
const MAX_UPLOADER_NAME_CHARS: usize = 255;
/// Video duration bounds in seconds (eight hours).
const DURATION_RANGE: std::ops::RangeInclusive<u32> = 1..=28_800;

fn news_language_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(zh-cn|zh-tw|[a-z]{2,3})$").expect("news language regex is valid")
    })
}

/// Check a url-set against every protocol ceiling except the serialized file
/// size (that one needs a real serialization; see the writer).
pub fn validate_url_set(url_set: &UrlSetSitemap) -> Vec<String> {
    let mut violations = Vec::new();

    if url_set.urls.len() > MAX_URLS_PER_SET {
        violations.push(format!(
            "urls: {} entries exceeds the maximum of {MAX_URLS_PER_SET} per urlset; \
             use a sitemap index for more",
            url_set.urls.len()
        ));
    }

    // A url "has news" when a news object is attached, even an empty one.
    let news_count = url_set.urls.iter().filter(|u| u.news.is_some()).count();
    if news_count > MAX_NEWS_PER_SET {
        violations.push(format!(
            "urls: {news_count} news entries exceeds the maximum of {MAX_NEWS_PER_SET} per urlset"
        ));
    }

    for (i, url) in url_set.urls.iter().enumerate() {
        validate_url(url, &format!("urls[{i}]"), &mut violations);
    }

    violations
}

/// Check an index's references.
pub fn validate_index(index: &IndexSitemap) -> Vec<String> {
    let mut violations = Vec::new();
    for (i, reference) in index.references.iter().enumerate() {
        check_loc(
            &format!("references[{i}].location"),
            &reference.location,
            &mut violations,
        );
    }
    violations
}

fn validate_url(url: &Url, field: &str, violations: &mut Vec<String>) {
    check_loc(&format!("{field}.location"), &url.location, violations);

    if let Some(priority) = url.priority {
        if !(0.0..=1.0).contains(&priority) {
            violations.push(format!(
                "{field}.priority: {priority} is outside the valid range 0.0..=1.0"
            ));
        }
    }

    if url.images.len() > MAX_IMAGES_PER_URL {
        violations.push(format!(
            "{field}.images: {} images exceeds the maximum of {MAX_IMAGES_PER_URL} per url",
            url.images.len()
        ));
    }
    for (i, image) in url.images.iter().enumerate() {
        check_loc(
            &format!("{field}.images[{i}].location"),
            &image.location,
            violations,
        );
    }

    for (i, link) in url.links.iter().enumerate() {
        check_loc(&format!("{field}.links[{i}].href"), &link.href, violations);
    }

    if let Some(news) = &url.news {
        if let Some(publication) = &news.publication {
            if !news_language_re().is_match(&publication.language) {
                violations.push(format!(
                    "{field}.news.publication.language: '{}' is not an ISO 639 code",
                    publication.language
                ));
            }
        }
    }

    for (i, video) in url.videos.iter().enumerate() {
        validate_video(video, &format!("{field}.videos[{i}]"), violations);
    }
}

fn validate_video(video: &Video, field: &str, violations: &mut Vec<String>) {
    for (name, loc) in [
        ("thumbnail_url", &video.thumbnail_url),
        ("content_url", &video.content_url),
        ("player_url", &video.player_url),
    ] {
        if let Some(loc) = loc {
            check_loc(&format!("{field}.{name}"), loc, violations);
        }
    }

    if let Some(description) = &video.description {
        if description.chars().count() > MAX_DESCRIPTION_CHARS {
            violations.push(format!(
                "{field}.description: longer than {MAX_DESCRIPTION_CHARS} characters"
            ));
        }
    }

    if let Some(duration) = video.duration {
        if !DURATION_RANGE.contains(&duration) {
            violations.push(format!(
                "{field}.duration: {duration}s is outside the valid range 1..=28800"
            ));
        }
    }

    if let Some(rating) = video.rating {
        if !(0.0..=5.0).contains(&rating) {
            violations.push(format!(
                "{field}.rating: {rating} is outside the valid range 0.0..=5.0"
            ));
        }
    }

    if video.tags.len() > MAX_TAGS_PER_VIDEO {
        violations.push(format!(
            "{field}.tags: {} tags exceeds the maximum of {MAX_TAGS_PER_VIDEO}",
            video.tags.len()
        ));
    }

    if let Some(platform) = &video.platform {
        if platform.types.is_empty() {
            violations.push(format!("{field}.platform: platform type list is empty"));
        }
    }

    if let Some(restriction) = &video.restriction {
        if restriction.countries.is_empty() {
            violations.push(format!("{field}.restriction: country list is empty"));
        }
    }

    if let Some(uploader) = &video.uploader {
        if let Some(name) = &uploader.name {
            if name.chars().count() > MAX_UPLOADER_NAME_CHARS {
                violations.push(format!(
                    "{field}.uploader.name: longer than {MAX_UPLOADER_NAME_CHARS} characters"
                ));
            }
        }
        if let Some(info_url) = &uploader.info_url {
            check_loc(&format!("{field}.uploader.info_url"), info_url, violations);
        }
    }
}

/// The 2048-character ceiling applies to the percent-encoded ASCII form that
/// actually gets persisted, not the in-memory text.
fn check_loc(field: &str, location: &str, violations: &mut Vec<String>) {
    if encode_loc(location).len() > MAX_LOC_CHARS {
        violations.push(format!(
            "{field}: encoded url is longer than {MAX_LOC_CHARS} characters"
        ));
    }
}
