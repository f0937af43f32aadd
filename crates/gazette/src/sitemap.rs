//! Sitemap generation for static exports.
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::BuildError;

/// Options for sitemap generation.
#[derive(Debug, Clone)]
pub struct SitemapOptions {
    /// Whether to generate a sitemap. Requires a base URL. Default: `false`
    pub enabled: bool,
    /// The filename of the sitemap, or of the sitemap index when split. Default: `"sitemap.xml"`
    pub filename: String,
    /// Maximum number of URLs per sitemap file. Default: `10000`
    ///
    /// When exceeded, sitemaps are written as `sitemap-1.xml`, `sitemap-2.xml`, etc. and `filename` becomes an index.
    pub max_urls_per_sitemap: usize,
}

impl Default for SitemapOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            filename: "sitemap.xml".to_string(),
            max_urls_per_sitemap: 10000,
        }
    }
}

/// A single URL of the sitemap.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    /// `YYYY-MM-DD`
    pub lastmod: Option<String>,
    pub priority: Option<f32>,
}

impl SitemapEntry {
    fn to_xml(&self) -> String {
        let mut xml = String::from("<url>");
        xml.push_str(&format!("<loc>{}</loc>", escape_xml(&self.loc)));

        if let Some(ref lastmod) = self.lastmod {
            xml.push_str(&format!("<lastmod>{}</lastmod>", lastmod));
        }

        if let Some(priority) = self.priority {
            xml.push_str(&format!("<priority>{:.1}</priority>", priority));
        }

        xml.push_str("</url>");
        xml
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Writes the sitemap for `entries` into `output_dir` and returns the files written.
pub fn generate_sitemap(
    mut entries: Vec<SitemapEntry>,
    base_url: &str,
    output_dir: &Path,
    options: &SitemapOptions,
) -> Result<Vec<PathBuf>, BuildError> {
    if !options.enabled || entries.is_empty() {
        return Ok(vec![]);
    }

    entries.sort_by(|a, b| a.loc.cmp(&b.loc));
    let total_entries = entries.len();

    if total_entries <= options.max_urls_per_sitemap {
        let path = write_xml(output_dir, &options.filename, &urlset(&entries))?;

        log::info!(
            target: "sitemap",
            "Generated sitemap with {} URLs at {}",
            total_entries,
            path.display()
        );

        return Ok(vec![path]);
    }

    let mut written = vec![];
    let mut index = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">",
    );

    for (i, chunk) in entries.chunks(options.max_urls_per_sitemap.max(1)).enumerate() {
        let filename = format!("sitemap-{}.xml", i + 1);
        written.push(write_xml(output_dir, &filename, &urlset(chunk))?);

        let loc = format!("{}/{}", base_url.trim_end_matches('/'), filename);
        index.push_str(&format!("<sitemap><loc>{}</loc></sitemap>", escape_xml(&loc)));
    }

    index.push_str("</sitemapindex>");
    let index_path = write_xml(output_dir, &options.filename, &index)?;

    log::info!(
        target: "sitemap",
        "Generated sitemap index with {} sitemaps ({} total URLs) at {}",
        written.len(),
        total_entries,
        index_path.display()
    );

    written.push(index_path);
    Ok(written)
}

fn urlset(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">",
    );

    for entry in entries {
        xml.push_str(&entry.to_xml());
    }

    xml.push_str("</urlset>");
    xml
}

fn write_xml(output_dir: &Path, filename: &str, xml: &str) -> Result<PathBuf, BuildError> {
    let path = output_dir.join(filename);
    fs::write(&path, xml).map_err(|source| BuildError::WriteFailed {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(loc: &str) -> SitemapEntry {
        SitemapEntry {
            loc: loc.to_string(),
            lastmod: None,
            priority: None,
        }
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a&b"), "a&amp;b");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
    }

    #[test]
    fn test_entry_to_xml() {
        let xml = SitemapEntry {
            loc: "https://example.com/blog/1".to_string(),
            lastmod: Some("2024-01-01".to_string()),
            priority: Some(0.8),
        }
        .to_xml();

        assert_eq!(
            xml,
            "<url><loc>https://example.com/blog/1</loc><lastmod>2024-01-01</lastmod><priority>0.8</priority></url>"
        );
        assert!(!entry("https://example.com/").to_xml().contains("<lastmod>"));
    }

    #[test]
    fn test_disabled_sitemap_writes_nothing() {
        let dir = tempdir().unwrap();
        let written = generate_sitemap(
            vec![entry("https://example.com/")],
            "https://example.com",
            dir.path(),
            &SitemapOptions::default(),
        )
        .unwrap();

        assert!(written.is_empty());
        assert!(!dir.path().join("sitemap.xml").exists());
    }

    #[test]
    fn test_single_sitemap_is_sorted() {
        let dir = tempdir().unwrap();
        let options = SitemapOptions {
            enabled: true,
            ..Default::default()
        };

        generate_sitemap(
            vec![entry("https://example.com/blog/2"), entry("https://example.com/")],
            "https://example.com",
            dir.path(),
            &options,
        )
        .unwrap();

        let xml = fs::read_to_string(dir.path().join("sitemap.xml")).unwrap();
        let home = xml.find("<loc>https://example.com/</loc>").unwrap();
        let blog = xml.find("<loc>https://example.com/blog/2</loc>").unwrap();
        assert!(home < blog);
        assert!(xml.starts_with("<?xml"));
    }

    #[test]
    fn test_split_sitemaps() {
        let dir = tempdir().unwrap();
        let options = SitemapOptions {
            enabled: true,
            max_urls_per_sitemap: 2,
            ..Default::default()
        };

        let entries = (1..=5)
            .map(|i| entry(&format!("https://example.com/blog/{}", i)))
            .collect();
        let written = generate_sitemap(entries, "https://example.com/", dir.path(), &options).unwrap();

        assert_eq!(written.len(), 4);
        assert!(dir.path().join("sitemap-3.xml").exists());

        let index = fs::read_to_string(dir.path().join("sitemap.xml")).unwrap();
        assert!(index.contains("<sitemapindex"));
        assert!(index.contains("<loc>https://example.com/sitemap-3.xml</loc>"));
    }
}
