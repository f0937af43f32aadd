//! Static export of the reader.
//!
//! [`build_site`] fetches every blog once through a [`BlogStore`] and writes the same pages the server renders, minus
//! search and favorites, as plain HTML files that any static file host can serve.
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Instant,
};

use colored::{ColoredString, Colorize};
use log::{info, warn};
use rayon::prelude::*;

use crate::{
    GazetteOptions,
    blog::{Blog, Category},
    dates::format_iso_date,
    errors::{BuildError, GazetteError},
    logging::{FormatElapsedTimeOptions, SKIP_FORMAT, format_elapsed_time, print_title},
    pages::{
        ARTICLES_URL, PageContext, RenderMode, STYLESHEET, STYLESHEET_PATH, article_list_page, article_page,
        blog_url, category_page, category_url, home_page, listing_page_url, not_found_page,
    },
    query::{BlogFilter, Pagination},
    sitemap::{SitemapEntry, generate_sitemap},
    store::BlogStore,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PageOutput {
    pub url: String,
    pub file_path: PathBuf,
}

/// What a static export produced.
#[derive(Debug)]
pub struct BuildOutput {
    pub start_time: Instant,
    pub pages: Vec<PageOutput>,
    pub sitemaps: Vec<PathBuf>,
}

impl BuildOutput {
    fn new(start_time: Instant) -> Self {
        Self {
            start_time,
            pages: Vec::new(),
            sitemaps: Vec::new(),
        }
    }

    pub fn page(&self, url: &str) -> Option<&PageOutput> {
        self.pages.iter().find(|page| page.url == url)
    }
}

/// Exports every page of the reader into `options.output_dir`.
///
/// Every article is fetched before the output directory is touched, so an API error leaves the previous export in
/// place. A write error may leave it half written.
pub fn build_site(store: &BlogStore, options: &GazetteOptions) -> Result<BuildOutput, GazetteError> {
    let build_start = Instant::now();
    let mut output = BuildOutput::new(build_start);
    let output_dir = options.output_dir.as_path();

    print_title("fetching articles");
    let fetch_start = Instant::now();

    let blogs = store.all_blogs(false)?;
    let mut categories = Vec::with_capacity(Category::ALL.len());
    for category in Category::ALL {
        categories.push((category, store.blogs_in(category, false)?));
    }

    info!(target: "build", "{}", format!("Fetched {} articles in {}", blogs.len(), format_elapsed_time(fetch_start.elapsed(), &FormatElapsedTimeOptions::default())).bold());

    if options.clean_output_dir {
        match fs::remove_dir_all(output_dir) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => return Err(err.into()),
            _ => {}
        }
    }
    fs::create_dir_all(output_dir)?;

    info!(target: "build", "Output directory: {}", output_dir.display());

    print_title("generating pages");
    let pages_start = Instant::now();
    let ctx = PageContext::static_export(options);

    let page_format_options = FormatElapsedTimeOptions {
        additional_fn: Some(&|msg: ColoredString| {
            let formatted_msg = format!("(+{})", msg);
            if msg.fgcolor.is_none() {
                formatted_msg.dimmed()
            } else {
                formatted_msg.into()
            }
        }),
        ..Default::default()
    };

    let write = |url: String, file_path: PathBuf, html: String| -> Result<PageOutput, BuildError> {
        let page_start = Instant::now();
        write_page_file(&file_path, &html)?;
        info!(target: "pages", "{} -> {} {}", url, file_path.to_string_lossy().dimmed(), format_elapsed_time(page_start.elapsed(), &page_format_options));
        Ok(PageOutput { url, file_path })
    };

    output.pages.push(write(
        "/".to_string(),
        output_dir.join("index.html"),
        home_page(&ctx, &blogs).into_string(),
    )?);

    for page in 1..=page_count(blogs.len(), options.items_per_page) {
        let url = listing_page_url(RenderMode::Static, ARTICLES_URL, page);
        let html = article_list_page(&ctx, &blogs, &BlogFilter::default(), page).into_string();
        output.pages.push(write(url.clone(), page_file_path(output_dir, &url), html)?);
    }

    for (category, category_blogs) in &categories {
        let base = category_url(*category);
        for page in 1..=page_count(category_blogs.len(), options.items_per_page) {
            let url = listing_page_url(RenderMode::Static, &base, page);
            let html = category_page(&ctx, *category, category_blogs, page).into_string();
            output.pages.push(write(url.clone(), page_file_path(output_dir, &url), html)?);
        }
    }

    let exportable: Vec<&Blog> = blogs
        .iter()
        .filter(|blog| {
            let exportable = is_exportable_id(&blog.id);
            if !exportable {
                warn!(target: "build", "Skipping article with id {:?}, it cannot be used as a directory name", blog.id);
            }
            exportable
        })
        .collect();

    let article_pages = exportable
        .par_iter()
        .map(|blog| {
            let file_path = output_dir.join("blog").join(&blog.id).join("index.html");
            write(blog_url(&blog.id), file_path, article_page(&ctx, blog).into_string())
        })
        .collect::<Result<Vec<_>, BuildError>>()?;
    output.pages.extend(article_pages);

    output.pages.push(write(
        "/404".to_string(),
        output_dir.join("404.html"),
        not_found_page(&ctx).into_string(),
    )?);

    let stylesheet_path = output_dir.join(STYLESHEET_PATH.trim_start_matches('/'));
    write_page_file(&stylesheet_path, STYLESHEET)?;

    let section_format_options = FormatElapsedTimeOptions::section();
    info!(target: "pages", "{}", format!("generated {} pages in {}", output.pages.len(), format_elapsed_time(pages_start.elapsed(), &section_format_options)).bold());

    if options.sitemap.enabled {
        match &options.base_url {
            Some(base_url) => {
                print_title("generating sitemap");
                let entries = sitemap_entries(options, &output.pages, &exportable);
                output.sitemaps = generate_sitemap(entries, base_url, output_dir, &options.sitemap)?;
            }
            None => {
                warn!(target: "sitemap", "Sitemap generation is enabled but no base URL is set, skipping")
            }
        }
    }

    info!(target: SKIP_FORMAT, "{}", "");
    info!(target: "build", "{}", format!("Build completed in {}", format_elapsed_time(build_start.elapsed(), &section_format_options)).bold());

    Ok(output)
}

/// Listings always have at least one page, showing the empty state when there is nothing to list.
fn page_count(total_items: usize, per_page: usize) -> usize {
    Pagination::new(total_items, per_page).total_pages().max(1)
}

fn page_file_path(output_dir: &Path, url: &str) -> PathBuf {
    let mut path = output_dir.to_path_buf();
    for segment in url.split('/').filter(|segment| !segment.is_empty()) {
        path.push(segment);
    }
    path.join("index.html")
}

fn is_exportable_id(id: &str) -> bool {
    !id.trim().is_empty() && id != "." && id != ".." && !id.contains(['/', '\\'])
}

fn write_page_file(file_path: &Path, content: &str) -> Result<(), BuildError> {
    let write = || -> io::Result<()> {
        if let Some(parent_dir) = file_path.parent() {
            fs::create_dir_all(parent_dir)?;
        }
        fs::write(file_path, content)
    };

    write().map_err(|source| BuildError::WriteFailed {
        path: file_path.to_path_buf(),
        source,
    })
}

fn sitemap_entries(options: &GazetteOptions, pages: &[PageOutput], blogs: &[&Blog]) -> Vec<SitemapEntry> {
    let mut entries: Vec<SitemapEntry> = pages
        .iter()
        .filter(|page| page.url != "/404" && !page.url.starts_with("/blog/"))
        .map(|page| SitemapEntry {
            loc: options.absolute_url(&page.url),
            lastmod: None,
            priority: Some(if page.url == "/" { 1.0 } else { 0.5 }),
        })
        .collect();

    entries.extend(blogs.iter().map(|blog| SitemapEntry {
        loc: options.absolute_url(&blog_url(&blog.id)),
        lastmod: format_iso_date(blog.last_modified()),
        priority: Some(0.8),
    }));

    entries
}
