//! Marshal the document model to sitemap XML.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::codec::{encode_loc, format_priority, format_w3c_datetime, format_yes_no, join_tokens};
use crate::error::Result;
use crate::model::{IndexSitemap, Link, News, Url, UrlSetSitemap, Video};
use crate::xml::{NS_IMAGE, NS_NEWS, NS_SITEMAP, NS_VIDEO, NS_XHTML};

/// Serialize a url-set to `out` with an XML declaration and the fixed
/// namespace set.
pub fn write_url_set_to<W: Write>(url_set: &UrlSetSitemap, out: W, pretty: bool) -> Result<()> {
    let mut writer = new_writer(out, pretty);
    write_preamble(&mut writer, "urlset")?;
    for url in &url_set.urls {
        write_url(&mut writer, url)?;
    }
    writer.write_event(Event::End(BytesEnd::new("urlset")))?;
    Ok(())
}

/// Serialize a sitemap index to `out`.
pub fn write_index_to<W: Write>(index: &IndexSitemap, out: W, pretty: bool) -> Result<()> {
    let mut writer = new_writer(out, pretty);
    write_preamble(&mut writer, "sitemapindex")?;
    for reference in &index.references {
        writer.write_event(Event::Start(BytesStart::new("sitemap")))?;
        text_element(&mut writer, "loc", &encode_loc(&reference.location))?;
        if let Some(date) = &reference.last_modified {
            text_element(&mut writer, "lastmod", &format_w3c_datetime(date))?;
        }
        writer.write_event(Event::End(BytesEnd::new("sitemap")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("sitemapindex")))?;
    Ok(())
}

fn new_writer<W: Write>(out: W, pretty: bool) -> Writer<W> {
    if pretty {
        Writer::new_with_indent(out, b' ', 2)
    } else {
        Writer::new(out)
    }
}

/// XML declaration plus the root element with every protocol namespace bound,
/// regardless of which extensions the document actually uses.
fn write_preamble<W: Write>(writer: &mut Writer<W>, root: &str) -> Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    let mut start = BytesStart::new(root);
    start.push_attribute(("xmlns", NS_SITEMAP));
    start.push_attribute(("xmlns:news", NS_NEWS));
    start.push_attribute(("xmlns:image", NS_IMAGE));
    start.push_attribute(("xmlns:video", NS_VIDEO));
    start.push_attribute(("xmlns:xhtml", NS_XHTML));
    writer.write_event(Event::Start(start))?;
    Ok(())
}

fn write_url<W: Write>(writer: &mut Writer<W>, url: &Url) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("url")))?;

    text_element(writer, "loc", &encode_loc(&url.location))?;
    if let Some(date) = &url.last_modified {
        text_element(writer, "lastmod", &format_w3c_datetime(date))?;
    }
    if let Some(frequency) = url.change_frequency {
        text_element(writer, "changefreq", frequency.as_str())?;
    }
    if let Some(priority) = url.priority {
        text_element(writer, "priority", &format_priority(priority))?;
    }

    for image in &url.images {
        writer.write_event(Event::Start(BytesStart::new("image:image")))?;
        text_element(writer, "image:loc", &encode_loc(&image.location))?;
        writer.write_event(Event::End(BytesEnd::new("image:image")))?;
    }
    for link in &url.links {
        write_link(writer, link)?;
    }
    if let Some(news) = &url.news {
        write_news(writer, news)?;
    }
    for video in &url.videos {
        write_video(writer, video)?;
    }

    writer.write_event(Event::End(BytesEnd::new("url")))?;
    Ok(())
}

fn write_link<W: Write>(writer: &mut Writer<W>, link: &Link) -> Result<()> {
    let mut element = BytesStart::new("xhtml:link");
    element.push_attribute(("rel", link.rel.as_str()));
    if let Some(hreflang) = &link.hreflang {
        element.push_attribute(("hreflang", hreflang.as_str()));
    }
    element.push_attribute(("href", encode_loc(&link.href).as_str()));
    writer.write_event(Event::Empty(element))?;
    Ok(())
}

fn write_news<W: Write>(writer: &mut Writer<W>, news: &News) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("news:news")))?;
    if let Some(publication) = &news.publication {
        writer.write_event(Event::Start(BytesStart::new("news:publication")))?;
        text_element(writer, "news:name", &publication.name)?;
        text_element(writer, "news:language", &publication.language)?;
        writer.write_event(Event::End(BytesEnd::new("news:publication")))?;
    }
    if let Some(date) = &news.publication_date {
        text_element(writer, "news:publication_date", &format_w3c_datetime(date))?;
    }
    if let Some(title) = &news.title {
        text_element(writer, "news:title", title)?;
    }
    writer.write_event(Event::End(BytesEnd::new("news:news")))?;
    Ok(())
}

fn write_video<W: Write>(writer: &mut Writer<W>, video: &Video) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("video:video")))?;

    if let Some(loc) = &video.thumbnail_url {
        text_element(writer, "video:thumbnail_loc", &encode_loc(loc))?;
    }
    if let Some(title) = &video.title {
        text_element(writer, "video:title", title)?;
    }
    if let Some(description) = &video.description {
        text_element(writer, "video:description", description)?;
    }
    if let Some(loc) = &video.content_url {
        text_element(writer, "video:content_loc", &encode_loc(loc))?;
    }
    if let Some(loc) = &video.player_url {
        text_element(writer, "video:player_loc", &encode_loc(loc))?;
    }
    if let Some(duration) = video.duration {
        text_element(writer, "video:duration", &duration.to_string())?;
    }
    if let Some(date) = &video.expiration_date {
        text_element(writer, "video:expiration_date", &format_w3c_datetime(date))?;
    }
    if let Some(rating) = video.rating {
        text_element(writer, "video:rating", &rating.to_string())?;
    }
    if let Some(count) = video.view_count {
        text_element(writer, "video:view_count", &count.to_string())?;
    }
    if let Some(date) = &video.publication_date {
        text_element(writer, "video:publication_date", &format_w3c_datetime(date))?;
    }
    if let Some(value) = video.family_friendly {
        text_element(writer, "video:family_friendly", format_yes_no(value))?;
    }
    if let Some(restriction) = &video.restriction {
        let mut element = BytesStart::new("video:restriction");
        element.push_attribute(("relationship", restriction.relationship.as_str()));
        writer.write_event(Event::Start(element))?;
        writer.write_event(Event::Text(BytesText::new(&join_tokens(
            &restriction.countries,
        ))))?;
        writer.write_event(Event::End(BytesEnd::new("video:restriction")))?;
    }
    if let Some(platform) = &video.platform {
        let mut element = BytesStart::new("video:platform");
        element.push_attribute(("relationship", platform.relationship.as_str()));
        writer.write_event(Event::Start(element))?;
        let tokens: Vec<&str> = platform.types.iter().map(|t| t.as_str()).collect();
        writer.write_event(Event::Text(BytesText::new(&join_tokens(&tokens))))?;
        writer.write_event(Event::End(BytesEnd::new("video:platform")))?;
    }
    if let Some(value) = video.requires_subscription {
        text_element(writer, "video:requires_subscription", format_yes_no(value))?;
    }
    if let Some(uploader) = &video.uploader {
        let mut element = BytesStart::new("video:uploader");
        if let Some(info_url) = &uploader.info_url {
            element.push_attribute(("info", encode_loc(info_url).as_str()));
        }
        writer.write_event(Event::Start(element))?;
        if let Some(name) = &uploader.name {
            writer.write_event(Event::Text(BytesText::new(name)))?;
        }
        writer.write_event(Event::End(BytesEnd::new("video:uploader")))?;
    }
    if let Some(value) = video.live {
        text_element(writer, "video:live", format_yes_no(value))?;
    }
    for tag in &video.tags {
        text_element(writer, "video:tag", tag)?;
    }

    writer.write_event(Event::End(BytesEnd::new("video:video")))?;
    Ok(())
}

fn text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::parse_w3c_datetime;
    use crate::model::{ChangeFrequency, Image, SitemapReference};

    const XMLNS: &str = "xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\" \
         xmlns:news=\"http://www.google.com/schemas/sitemap-news/0.9\" \
         xmlns:image=\"http://www.google.com/schemas/sitemap-image/1.1\" \
         xmlns:video=\"http://www.google.com/schemas/sitemap-video/1.1\" \
         xmlns:xhtml=\"http://www.w3.org/1999/xhtml\"";

    fn to_string(url_set: &UrlSetSitemap) -> String {
        let mut buf = Vec::new();
        write_url_set_to(url_set, &mut buf, false).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_loc_is_percent_and_xml_escaped() {
        let url_set = UrlSetSitemap::from_urls(vec![
            Url::new("http://www.example.com/ümlat.php&q=name").unwrap(),
        ]);
        let expected = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><urlset {XMLNS}>\
             <url><loc>http://www.example.com/%C3%BCmlat.php&amp;q=name</loc></url></urlset>"
        );
        assert_eq!(to_string(&url_set), expected);
    }

    #[test]
    fn test_url_child_order() {
        let url = Url::new("https://example.com/a")
            .unwrap()
            .with_priority(0.8)
            .with_change_frequency(ChangeFrequency::Daily)
            .with_last_modified(parse_w3c_datetime("2024-06-15").unwrap())
            .add_image(Image::new("https://example.com/i.jpg").unwrap());
        let xml = to_string(&UrlSetSitemap::from_urls(vec![url]));

        let loc = xml.find("<loc>").unwrap();
        let lastmod = xml.find("<lastmod>").unwrap();
        let changefreq = xml.find("<changefreq>").unwrap();
        let priority = xml.find("<priority>").unwrap();
        let image = xml.find("<image:image>").unwrap();
        assert!(loc < lastmod && lastmod < changefreq && changefreq < priority);
        assert!(priority < image);
        assert!(xml.contains("<lastmod>2024-06-15</lastmod>"));
        assert!(xml.contains("<priority>0.8</priority>"));
    }

    #[test]
    fn test_namespaces_bound_even_without_extensions() {
        let xml = to_string(&UrlSetSitemap::from_urls(vec![
            Url::new("https://example.com/plain").unwrap(),
        ]));
        assert!(xml.contains("xmlns:video="));
        assert!(xml.contains("xmlns:news="));
        assert!(xml.contains("xmlns:image="));
        assert!(xml.contains("xmlns:xhtml="));
    }

    #[test]
    fn test_link_is_an_empty_element_with_attributes() {
        let url = Url::new("https://example.com/page")
            .unwrap()
            .add_link(crate::model::Link::new("de", "https://example.com/de/page").unwrap());
        let xml = to_string(&UrlSetSitemap::from_urls(vec![url]));
        assert!(xml.contains(
            "<xhtml:link rel=\"alternate\" hreflang=\"de\" href=\"https://example.com/de/page\"/>"
        ));
    }

    #[test]
    fn test_platform_and_restriction_are_space_delimited() {
        use crate::model::{Platform, PlatformType, Relationship, Restriction, Video};
        let url = Url::new("https://example.com/v").unwrap().add_video(
            Video::new()
                .with_platform(Platform::new(
                    Relationship::Allow,
                    &[PlatformType::Web, PlatformType::Tv],
                ))
                .with_restriction(Restriction::new(Relationship::Deny, &["GB", "US"])),
        );
        let xml = to_string(&UrlSetSitemap::from_urls(vec![url]));
        assert!(xml.contains("<video:restriction relationship=\"deny\">GB US</video:restriction>"));
        assert!(xml.contains("<video:platform relationship=\"allow\">web tv</video:platform>"));
    }

    #[test]
    fn test_index_marshals_references() {
        let index = IndexSitemap::new()
            .add_reference(
                SitemapReference::new("https://example.com/sitemap-1.xml")
                    .unwrap()
                    .with_last_modified(parse_w3c_datetime("2024-01-02").unwrap()),
            )
            .add_reference(SitemapReference::new("https://example.com/sitemap-2.xml").unwrap());
        let mut buf = Vec::new();
        write_index_to(&index, &mut buf, false).unwrap();
        let xml = String::from_utf8(buf).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?><sitemapindex"));
        assert!(xml.contains(
            "<sitemap><loc>https://example.com/sitemap-1.xml</loc>\
             <lastmod>2024-01-02</lastmod></sitemap>"
        ));
        assert!(xml.contains("<sitemap><loc>https://example.com/sitemap-2.xml</loc></sitemap>"));
    }
}
