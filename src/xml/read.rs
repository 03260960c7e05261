//! Unmarshal sitemap XML into the document model.
//!
//! Reading is permissive about ranges (an out-of-range priority is kept
//! as-is) but strict about formats: an unparsable date, boolean, enum token,
//! or URL aborts the whole parse.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::codec::{parse_loc, parse_w3c_datetime, parse_yes_no, split_tokens};
use crate::error::{Error, Result};
use crate::model::{
    IndexSitemap, Image, Link, News, Platform, Publication, Relationship, Restriction, Sitemap,
    SitemapReference, Uploader, Url, UrlSetSitemap, Video,
};

/// Parse a sitemap document, dispatching on the root tag.
pub fn parse_sitemap(xml: &str) -> Result<Sitemap> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                return match e.local_name().as_ref() {
                    b"urlset" => Ok(Sitemap::UrlSet(parse_url_set(&mut reader)?)),
                    b"sitemapindex" => Ok(Sitemap::Index(parse_index(&mut reader)?)),
                    other => Err(Error::invalid_format(
                        "sitemap root tag",
                        String::from_utf8_lossy(other),
                    )),
                };
            }
            Event::Empty(e) => {
                return match e.local_name().as_ref() {
                    b"urlset" => Ok(Sitemap::UrlSet(UrlSetSitemap::new())),
                    b"sitemapindex" => Ok(Sitemap::Index(IndexSitemap::new())),
                    other => Err(Error::invalid_format(
                        "sitemap root tag",
                        String::from_utf8_lossy(other),
                    )),
                };
            }
            Event::Eof => return Err(truncated()),
            _ => {}
        }
    }
}

fn truncated() -> Error {
    Error::invalid_format("sitemap document", "unexpected end of input")
}

fn parse_url_set(reader: &mut Reader<&[u8]>) -> Result<UrlSetSitemap> {
    let mut url_set = UrlSetSitemap::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"url" => url_set.urls.push(parse_url(reader)?),
                _ => skip(reader, &e)?,
            },
            Event::End(e) if e.local_name().as_ref() == b"urlset" => return Ok(url_set),
            Event::Eof => return Err(truncated()),
            _ => {}
        }
    }
}

fn parse_index(reader: &mut Reader<&[u8]>) -> Result<IndexSitemap> {
    let mut index = IndexSitemap::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"sitemap" => {
                    let reference = parse_reference(reader)?;
                    index = index.add_reference(reference);
                }
                _ => skip(reader, &e)?,
            },
            Event::End(e) if e.local_name().as_ref() == b"sitemapindex" => return Ok(index),
            Event::Eof => return Err(truncated()),
            _ => {}
        }
    }
}

fn parse_reference(reader: &mut Reader<&[u8]>) -> Result<SitemapReference> {
    let mut location = String::new();
    let mut last_modified = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"loc" => location = parse_loc(&read_text(reader, b"loc")?)?,
                b"lastmod" => {
                    last_modified = Some(parse_w3c_datetime(&read_text(reader, b"lastmod")?)?)
                }
                _ => skip(reader, &e)?,
            },
            Event::End(e) if e.local_name().as_ref() == b"sitemap" => {
                let mut reference = SitemapReference::new(&location)?;
                reference.last_modified = last_modified;
                return Ok(reference);
            }
            Event::Eof => return Err(truncated()),
            _ => {}
        }
    }
}

fn parse_url(reader: &mut Reader<&[u8]>) -> Result<Url> {
    let mut url = Url::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"loc" => url.location = parse_loc(&read_text(reader, b"loc")?)?,
                b"lastmod" => {
                    url.last_modified =
                        Some(parse_w3c_datetime(&read_text(reader, b"lastmod")?)?)
                }
                b"changefreq" => {
                    url.change_frequency = Some(read_text(reader, b"changefreq")?.parse()?)
                }
                b"priority" => {
                    let text = read_text(reader, b"priority")?;
                    url.priority = Some(
                        text.parse()
                            .map_err(|_| Error::invalid_format("priority", text.clone()))?,
                    );
                }
                b"image" => url.images.push(parse_image(reader)?),
                b"link" => {
                    url.links.push(parse_link(&e)?);
                    skip(reader, &e)?;
                }
                b"news" => url.news = Some(parse_news(reader)?),
                b"video" => url.videos.push(parse_video(reader)?),
                _ => skip(reader, &e)?,
            },
            Event::Empty(e) => {
                if e.local_name().as_ref() == b"link" {
                    url.links.push(parse_link(&e)?);
                }
            }
            Event::End(e) if e.local_name().as_ref() == b"url" => return Ok(url),
            Event::Eof => return Err(truncated()),
            _ => {}
        }
    }
}

fn parse_image(reader: &mut Reader<&[u8]>) -> Result<Image> {
    let mut location = String::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"loc" => location = parse_loc(&read_text(reader, b"loc")?)?,
                _ => skip(reader, &e)?,
            },
            Event::End(e) if e.local_name().as_ref() == b"image" => {
                return Ok(Image { location })
            }
            Event::Eof => return Err(truncated()),
            _ => {}
        }
    }
}

/// `<xhtml:link>` carries everything in attributes.
fn parse_link(element: &BytesStart) -> Result<Link> {
    let mut link = Link {
        rel: "alternate".to_string(),
        hreflang: None,
        href: String::new(),
    };
    for attr in element.attributes().flatten() {
        let value = attr.unescape_value()?.to_string();
        match attr.key.local_name().as_ref() {
            b"rel" => link.rel = value,
            b"hreflang" => link.hreflang = Some(value),
            b"href" => link.href = parse_loc(&value)?,
            _ => {}
        }
    }
    Ok(link)
}

fn parse_news(reader: &mut Reader<&[u8]>) -> Result<News> {
    let mut news = News::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"publication" => news.publication = Some(parse_publication(reader)?),
                b"publication_date" => {
                    news.publication_date =
                        Some(parse_w3c_datetime(&read_text(reader, b"publication_date")?)?)
                }
                b"title" => news.title = Some(read_text(reader, b"title")?),
                _ => skip(reader, &e)?,
            },
            Event::End(e) if e.local_name().as_ref() == b"news" => return Ok(news),
            Event::Eof => return Err(truncated()),
            _ => {}
        }
    }
}

fn parse_publication(reader: &mut Reader<&[u8]>) -> Result<Publication> {
    let mut name = String::new();
    let mut language = String::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"name" => name = read_text(reader, b"name")?,
                b"language" => language = read_text(reader, b"language")?,
                _ => skip(reader, &e)?,
            },
            Event::End(e) if e.local_name().as_ref() == b"publication" => {
                return Ok(Publication { name, language })
            }
            Event::Eof => return Err(truncated()),
            _ => {}
        }
    }
}

fn parse_video(reader: &mut Reader<&[u8]>) -> Result<Video> {
    let mut video = Video::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"thumbnail_loc" => {
                    video.thumbnail_url = Some(parse_loc(&read_text(reader, b"thumbnail_loc")?)?)
                }
                b"title" => video.title = Some(read_text(reader, b"title")?),
                b"description" => video.description = Some(read_text(reader, b"description")?),
                b"content_loc" => {
                    video.content_url = Some(parse_loc(&read_text(reader, b"content_loc")?)?)
                }
                b"player_loc" => {
                    video.player_url = Some(parse_loc(&read_text(reader, b"player_loc")?)?)
                }
                b"duration" => {
                    let text = read_text(reader, b"duration")?;
                    video.duration = Some(
                        text.parse()
                            .map_err(|_| Error::invalid_format("video duration", text.clone()))?,
                    );
                }
                b"expiration_date" => {
                    video.expiration_date =
                        Some(parse_w3c_datetime(&read_text(reader, b"expiration_date")?)?)
                }
                b"rating" => {
                    let text = read_text(reader, b"rating")?;
                    video.rating = Some(
                        text.parse()
                            .map_err(|_| Error::invalid_format("video rating", text.clone()))?,
                    );
                }
                b"view_count" => {
                    let text = read_text(reader, b"view_count")?;
                    video.view_count = Some(
                        text.parse()
                            .map_err(|_| Error::invalid_format("video view count", text.clone()))?,
                    );
                }
                b"publication_date" => {
                    video.publication_date =
                        Some(parse_w3c_datetime(&read_text(reader, b"publication_date")?)?)
                }
                b"family_friendly" => {
                    video.family_friendly =
                        Some(parse_yes_no(&read_text(reader, b"family_friendly")?)?)
                }
                b"restriction" => {
                    let relationship = parse_relationship(&e)?;
                    let countries = split_tokens(&read_text(reader, b"restriction")?);
                    video.restriction = Some(Restriction {
                        relationship,
                        countries,
                    });
                }
                b"platform" => {
                    let relationship = parse_relationship(&e)?;
                    let types = split_tokens(&read_text(reader, b"platform")?)
                        .iter()
                        .map(|t| t.parse())
                        .collect::<Result<Vec<_>>>()?;
                    video.platform = Some(Platform {
                        relationship,
                        types,
                    });
                }
                b"requires_subscription" => {
                    video.requires_subscription =
                        Some(parse_yes_no(&read_text(reader, b"requires_subscription")?)?)
                }
                b"uploader" => {
                    let mut uploader = Uploader::new();
                    for attr in e.attributes().flatten() {
                        if attr.key.local_name().as_ref() == b"info" {
                            uploader.info_url = Some(parse_loc(&attr.unescape_value()?)?);
                        }
                    }
                    let name = read_text(reader, b"uploader")?;
                    if !name.is_empty() {
                        uploader.name = Some(name);
                    }
                    video.uploader = Some(uploader);
                }
                b"live" => video.live = Some(parse_yes_no(&read_text(reader, b"live")?)?),
                b"tag" => video.tags.push(read_text(reader, b"tag")?),
                _ => skip(reader, &e)?,
            },
            Event::End(e) if e.local_name().as_ref() == b"video" => return Ok(video),
            Event::Eof => return Err(truncated()),
            _ => {}
        }
    }
}

/// The relationship attribute is required by the extension schema; a missing
/// one is treated as a format failure rather than silently defaulted.
fn parse_relationship(element: &BytesStart) -> Result<Relationship> {
    for attr in element.attributes().flatten() {
        if attr.key.local_name().as_ref() == b"relationship" {
            return attr.unescape_value()?.parse();
        }
    }
    Err(Error::invalid_format("relationship", "<missing attribute>"))
}

/// Accumulate text content up to the closing tag with the given local name.
fn read_text(reader: &mut Reader<&[u8]>, end: &[u8]) -> Result<String> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(t) => text.push_str(&t.unescape()?),
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
            Event::End(e) if e.local_name().as_ref() == end => return Ok(text),
            Event::Eof => return Err(truncated()),
            _ => {}
        }
    }
}

/// Skip an element we do not model, including all of its children.
fn skip(reader: &mut Reader<&[u8]>, element: &BytesStart) -> Result<()> {
    reader.read_to_end(element.name())?;
    Ok(())
}
