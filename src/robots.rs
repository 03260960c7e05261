//! Sitemap discovery through robots.txt.

use std::time::Duration;

use tracing::{debug, warn};

use crate::codec::parse_loc;
use crate::error::{Error, Result};

/// Redirect hop bound for a robots.txt fetch.
const MAX_REDIRECTS: u32 = 20;

/// Sitemap URLs a site advertises in its robots.txt.
#[derive(Debug, Clone, PartialEq)]
pub struct Robots {
    /// The robots.txt URL the discovery started from.
    pub url: String,
    /// Absolute sitemap URLs, in file order.
    pub sitemap_urls: Vec<String>,
}

/// Fetches robots.txt and extracts its `Sitemap:` directives.
///
/// Redirects are followed manually so the hop count can be bounded; a chain
/// longer than 20 hops is reported as [`Error::TooManyRedirects`].
#[derive(Debug, Clone)]
pub struct RobotsTxtReader {
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl Default for RobotsTxtReader {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(3),
            read_timeout: Duration::from_secs(30),
        }
    }
}

impl RobotsTxtReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Fetch `url` and collect its sitemap directives.
    pub async fn load(&self, url: &str) -> Result<Robots> {
        let client = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.read_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        let mut current = parse_loc(url)?;
        let mut hops = 0u32;
        loop {
            debug!(url = %current, hops, "fetching robots.txt");
            let response = client.get(&current).send().await?;
            let status = response.status();

            if status.is_redirection() {
                hops += 1;
                if hops > MAX_REDIRECTS {
                    return Err(Error::TooManyRedirects {
                        url: url.to_string(),
                        hops,
                    });
                }
                let location = response
                    .headers()
                    .get(reqwest::header::LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .ok_or_else(|| {
                        Error::invalid_format("redirect location", current.clone())
                    })?;
                current = resolve_redirect(&current, location)?;
                continue;
            }
            if !status.is_success() {
                return Err(Error::Fetch {
                    url: current,
                    status: status.as_u16(),
                });
            }

            let body = response.text().await?;
            let sitemap_urls = extract_sitemap_urls(&body);
            debug!(url, count = sitemap_urls.len(), "discovered sitemap urls");
            return Ok(Robots {
                url: url.to_string(),
                sitemap_urls,
            });
        }
    }
}

/// A Location header may be relative; resolve it against the request URL.
fn resolve_redirect(current: &str, location: &str) -> Result<String> {
    let base = url::Url::parse(current).map_err(|source| Error::MalformedUrl {
        url: current.to_string(),
        source,
    })?;
    let next = base.join(location).map_err(|source| Error::MalformedUrl {
        url: location.to_string(),
        source,
    })?;
    Ok(next.to_string())
}

/// Scan for `Sitemap:` directives. The prefix match is case-sensitive, per
/// the de-facto convention; malformed candidates are dropped with a warning
/// rather than failing the whole load.
fn extract_sitemap_urls(body: &str) -> Vec<String> {
    let mut urls = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        if let Some(candidate) = line.strip_prefix("Sitemap:") {
            let candidate = candidate.trim();
            match parse_loc(candidate) {
                Ok(url) => urls.push(url),
                Err(error) => {
                    warn!(candidate, %error, "dropping malformed sitemap url in robots.txt")
                }
            }
        }
    }
    urls
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_extract_sitemap_urls() {
        let body = "User-agent: *\n\
                    Disallow: /private/\n\
                    Sitemap: https://example.com/sitemap.xml\n\
                    Sitemap:   https://example.com/news-sitemap.xml\n\
                    sitemap: https://example.com/lowercase-ignored.xml\n\
                    Sitemap: not a url\n";
        assert_eq!(
            extract_sitemap_urls(body),
            vec![
                "https://example.com/sitemap.xml",
                "https://example.com/news-sitemap.xml",
            ]
        );
    }

    #[tokio::test]
    async fn test_load_collects_directives() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "Sitemap: https://example.com/sitemap.xml\n",
            ))
            .mount(&server)
            .await;

        let url = format!("{}/robots.txt", server.uri());
        let robots = RobotsTxtReader::new().load(&url).await.unwrap();
        assert_eq!(robots.url, url);
        assert_eq!(robots.sitemap_urls, vec!["https://example.com/sitemap.xml"]);
    }

    #[tokio::test]
    async fn test_load_follows_one_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("Location", "/moved/robots.txt"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/moved/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "Sitemap: https://example.com/moved.xml\n",
            ))
            .mount(&server)
            .await;

        let url = format!("{}/robots.txt", server.uri());
        let robots = RobotsTxtReader::new().load(&url).await.unwrap();
        assert_eq!(robots.sitemap_urls, vec!["https://example.com/moved.xml"]);
    }

    #[tokio::test]
    async fn test_load_gives_up_after_twenty_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/robots.txt"))
            .mount(&server)
            .await;

        let url = format!("{}/robots.txt", server.uri());
        let err = RobotsTxtReader::new().load(&url).await.unwrap_err();
        assert!(matches!(err, Error::TooManyRedirects { hops: 21, .. }));
    }

    #[tokio::test]
    async fn test_load_reports_http_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = format!("{}/robots.txt", server.uri());
        let err = RobotsTxtReader::new().load(&url).await.unwrap_err();
        assert!(matches!(err, Error::Fetch { status: 404, .. }));
    }
}
