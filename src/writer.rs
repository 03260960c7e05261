//! Validated sitemap output to strings or files.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{IndexSitemap, Sitemap, UrlSetSitemap, MAX_FILE_BYTES};
use crate::validate::{validate_index, validate_url_set};
use crate::xml::{write_index_to, write_url_set_to};

/// Serializes sitemaps, enforcing the protocol limits before any output
/// reaches its destination.
#[derive(Debug, Clone, Default)]
pub struct SitemapWriter {
    pretty_print: bool,
    use_gzip: bool,
}

impl SitemapWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indent output with two spaces per level.
    pub fn with_pretty_print(mut self, pretty_print: bool) -> Self {
        self.pretty_print = pretty_print;
        self
    }

    /// Gzip the file output. The destination filename gains a `.gz` suffix
    /// unless it already ends in `.gz` or `.gzip`.
    pub fn with_gzip(mut self, use_gzip: bool) -> Self {
        self.use_gzip = use_gzip;
        self
    }

    /// Validate and marshal to an in-memory string. No size probe; the
    /// 50 MiB ceiling applies to file output only.
    pub fn write_to_string(&self, sitemap: &Sitemap) -> Result<String> {
        let violations = validate(sitemap);
        if !violations.is_empty() {
            return Err(Error::Validation { violations });
        }
        let mut buf = Vec::new();
        self.marshal(sitemap, &mut buf)?;
        String::from_utf8(buf)
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }

    /// Validate and write into `directory`, returning the destination path.
    ///
    /// Url-sets are first marshalled uncompressed into a temp file to check
    /// the 50 MiB ceiling; an oversized document reports [`Error::TooLarge`]
    /// even when structural violations exist too. Nothing is written to the
    /// destination unless validation passes.
    pub fn write(&self, sitemap: &Sitemap, directory: &Path) -> Result<PathBuf> {
        let violations = validate(sitemap);

        if let Sitemap::UrlSet(url_set) = sitemap {
            let size = self.probe_size(url_set)?;
            if size > MAX_FILE_BYTES {
                return Err(Error::TooLarge {
                    size_mb: size as f64 / (1024.0 * 1024.0),
                });
            }
        }
        if !violations.is_empty() {
            return Err(Error::Validation { violations });
        }

        let path = directory.join(self.output_filename(sitemap.filename()));
        let file = BufWriter::new(File::create(&path)?);
        if self.use_gzip {
            let mut encoder = GzEncoder::new(file, Compression::default());
            self.marshal(sitemap, &mut encoder)?;
            encoder.finish()?.flush()?;
        } else {
            let mut file = file;
            self.marshal(sitemap, &mut file)?;
            file.flush()?;
        }
        debug!(path = %path.display(), "wrote sitemap");
        Ok(path)
    }

    /// Write an index and every url-set linked to one of its references.
    ///
    /// The index file is written last so a reader following it never sees a
    /// reference to a shard that does not exist yet.
    pub fn write_all(&self, index: &IndexSitemap, directory: &Path) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for url_set in index.all_url_sets() {
            paths.push(self.write(&Sitemap::UrlSet(UrlSetSitemap::clone(url_set)), directory)?);
        }
        paths.push(self.write(&Sitemap::Index(index.clone()), directory)?);
        Ok(paths)
    }

    /// Uncompressed serialized size in bytes, measured through a real file.
    fn probe_size(&self, url_set: &UrlSetSitemap) -> Result<u64> {
        let mut probe = NamedTempFile::new()?;
        {
            let mut out = BufWriter::new(probe.as_file_mut());
            write_url_set_to(url_set, &mut out, self.pretty_print)?;
            out.flush()?;
        }
        let size = probe.as_file().metadata()?.len();
        if let Err(e) = probe.close() {
            warn!(error = %e, "failed to remove size-probe temp file");
        }
        Ok(size)
    }

    fn marshal<W: Write>(&self, sitemap: &Sitemap, out: W) -> Result<()> {
        match sitemap {
            Sitemap::UrlSet(s) => write_url_set_to(s, out, self.pretty_print),
            Sitemap::Index(s) => write_index_to(s, out, self.pretty_print),
        }
    }

    fn output_filename(&self, base: &str) -> String {
        if self.use_gzip && !base.ends_with(".gz") && !base.ends_with(".gzip") {
            format!("{base}.gz")
        } else {
            base.to_string()
        }
    }
}

fn validate(sitemap: &Sitemap) -> Vec<String> {
    match sitemap {
        Sitemap::UrlSet(s) => validate_url_set(s),
        Sitemap::Index(s) => validate_index(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Url;
    use crate::xml::parse_sitemap;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn small_url_set() -> Sitemap {
        Sitemap::UrlSet(UrlSetSitemap::from_urls(vec![
            Url::new("https://example.com/a").unwrap(),
            Url::new("https://example.com/b").unwrap(),
        ]))
    }

    #[test]
    fn test_write_to_string_round_trips() {
        let out = SitemapWriter::new().write_to_string(&small_url_set()).unwrap();
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        match parse_sitemap(&out).unwrap() {
            Sitemap::UrlSet(s) => assert_eq!(s.urls.len(), 2),
            Sitemap::Index(_) => panic!("expected urlset"),
        }
    }

    #[test]
    fn test_write_to_string_rejects_invalid() {
        let mut url_set = UrlSetSitemap::new();
        url_set.urls.push(Url::new("https://example.com/a").unwrap().with_priority(9.0));
        let err = SitemapWriter::new()
            .write_to_string(&Sitemap::UrlSet(url_set))
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_write_creates_file_named_after_sitemap() {
        let dir = tempfile::tempdir().unwrap();
        let path = SitemapWriter::new().write(&small_url_set(), dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "sitemap.xml");
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("<loc>https://example.com/a</loc>"));
    }

    #[test]
    fn test_gzip_write_appends_suffix_and_compresses() {
        let dir = tempfile::tempdir().unwrap();
        let path = SitemapWriter::new()
            .with_gzip(true)
            .write(&small_url_set(), dir.path())
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "sitemap.xml.gz");

        let mut decoder = GzDecoder::new(File::open(&path).unwrap());
        let mut xml = String::new();
        decoder.read_to_string(&mut xml).unwrap();
        assert!(xml.contains("<loc>https://example.com/b</loc>"));
    }

    #[test]
    fn test_gzip_suffix_not_doubled() {
        let writer = SitemapWriter::new().with_gzip(true);
        assert_eq!(writer.output_filename("sitemap.xml.gz"), "sitemap.xml.gz");
        assert_eq!(writer.output_filename("sitemap.xml.gzip"), "sitemap.xml.gzip");
        assert_eq!(writer.output_filename("sitemap.xml"), "sitemap.xml.gz");
    }

    #[test]
    fn test_too_large_outranks_structural_violations() {
        use crate::model::Video;

        // ~13k urls with ~4KB of video text each serialize past 50 MiB.
        let filler = "x".repeat(2_000);
        let urls: Vec<Url> = (0..13_000)
            .map(|i| {
                let mut url = Url::new(&format!("https://example.com/{i}"))
                    .unwrap()
                    .add_video(
                        Video::new()
                            .with_title(&filler)
                            .with_description(&filler),
                    );
                if i == 0 {
                    // Also structurally invalid; the size ceiling must win.
                    url = url.with_priority(9.0);
                }
                url
            })
            .collect();

        let dir = tempfile::tempdir().unwrap();
        let err = SitemapWriter::new()
            .write(&Sitemap::UrlSet(UrlSetSitemap::from_urls(urls)), dir.path())
            .unwrap_err();
        match err {
            Error::TooLarge { size_mb } => assert!(size_mb > 50.0),
            other => panic!("expected TooLarge, got {other}"),
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_validation_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut url_set = UrlSetSitemap::new();
        url_set.urls.push(Url::new("https://example.com/a").unwrap().with_priority(9.0));
        let err = SitemapWriter::new()
            .write(&Sitemap::UrlSet(url_set), dir.path())
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_pretty_print_indents() {
        let out = SitemapWriter::new()
            .with_pretty_print(true)
            .write_to_string(&small_url_set())
            .unwrap();
        assert!(out.contains("\n  <url>"));
        assert!(out.contains("\n    <loc>"));
    }

    #[test]
    fn test_write_all_emits_shards_then_index() {
        let dir = tempfile::tempdir().unwrap();
        let urls = (0..3).map(|i| Url::new(&format!("https://example.com/{i}")).unwrap());
        let index = IndexSitemap::from_urls("https://example.com/", urls).unwrap();
        let paths = SitemapWriter::new().write_all(&index, dir.path()).unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].file_name().unwrap(), "sitemap-1.xml");
        assert_eq!(paths[1].file_name().unwrap(), "sitemap-index.xml");
    }
}
