//! Search, filtering, sorting and pagination over lists of blogs.
use std::{cmp::Ordering, str::FromStr};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::blog::{Blog, Category};
use crate::dates::parse_date;

/// Blogs whose title, content or category contain `term`, ignoring case. A blank term matches nothing.
pub fn search<'a>(blogs: &'a [Blog], term: &str) -> Vec<&'a Blog> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return vec![];
    }

    blogs
        .iter()
        .filter(|blog| {
            blog.display_title().to_lowercase().contains(&term)
                || blog.content.to_lowercase().contains(&term)
                || blog.category.as_str().to_lowercase().contains(&term)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    PublishDate,
    UpdatedDate,
    Title,
    Category,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::PublishDate => "publishDate",
            SortKey::UpdatedDate => "updatedDate",
            SortKey::Title => "title",
            SortKey::Category => "category",
        }
    }

    fn compare(&self, a: &Blog, b: &Blog) -> Ordering {
        match self {
            SortKey::PublishDate => parse_date(&a.publish_date).cmp(&parse_date(&b.publish_date)),
            SortKey::UpdatedDate => {
                let updated = |blog: &Blog| blog.updated_date.as_deref().and_then(parse_date);
                updated(a).cmp(&updated(b))
            }
            SortKey::Title => a
                .display_title()
                .to_lowercase()
                .cmp(&b.display_title().to_lowercase()),
            SortKey::Category => a.category.as_str().cmp(b.category.as_str()),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "publishDate" => Ok(SortKey::PublishDate),
            "updatedDate" => Ok(SortKey::UpdatedDate),
            "title" => Ok(SortKey::Title),
            "category" => Ok(SortKey::Category),
            other => Err(format!("Unknown sort key `{}`", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("Unknown sort order `{}`", other)),
        }
    }
}

/// Which blogs to show and in what order. Defaults to every category, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlogFilter {
    pub category: Option<Category>,
    pub sort_by: SortKey,
    pub order: SortOrder,
}

impl BlogFilter {
    /// Parses the `category`, `sort` and `order` query parameters. Anything unrecognized keeps its default.
    pub fn from_params(category: Option<&str>, sort: Option<&str>, order: Option<&str>) -> Self {
        Self {
            category: category.and_then(|c| c.parse().ok()),
            sort_by: sort.and_then(|s| s.parse().ok()).unwrap_or_default(),
            order: order.and_then(|o| o.parse().ok()).unwrap_or_default(),
        }
    }

    pub fn apply(&self, blogs: &[Blog]) -> Vec<Blog> {
        let mut result: Vec<Blog> = blogs
            .iter()
            .filter(|blog| self.category.is_none_or(|category| blog.category == category))
            .cloned()
            .collect();

        result.sort_by(|a, b| {
            let ordering = self.sort_by.compare(a, b);
            match self.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        result
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// Splits a list into fixed-size pages. Pages are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    per_page: usize,
    current_page: usize,
    total_items: usize,
}

impl Pagination {
    pub fn new(total_items: usize, per_page: usize) -> Self {
        Self {
            per_page: per_page.max(1),
            current_page: 1,
            total_items,
        }
    }

    /// Starts at `page`, clamped into the valid range.
    pub fn at(total_items: usize, per_page: usize, page: usize) -> Self {
        let mut pagination = Self::new(total_items, per_page);
        pagination.go_to(page);
        pagination
    }

    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.per_page)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    // An empty list still has a page 1 to show the empty state on.
    fn last_page(&self) -> usize {
        self.total_pages().max(1)
    }

    pub fn go_to(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.last_page());
    }

    pub fn next(&mut self) {
        self.go_to(self.current_page + 1);
    }

    pub fn prev(&mut self) {
        self.go_to(self.current_page.saturating_sub(1));
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    /// The items on the current page.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = ((self.current_page - 1) * self.per_page).min(items.len());
        let end = (start + self.per_page).min(items.len());
        &items[start..end]
    }
}

pub fn group_by_category(blogs: &[Blog]) -> FxHashMap<Category, Vec<&Blog>> {
    let mut groups: FxHashMap<Category, Vec<&Blog>> = FxHashMap::default();
    for blog in blogs {
        groups.entry(blog.category).or_default().push(blog);
    }
    groups
}

/// Drops every blog whose id was already seen, keeping the first occurrence.
pub fn unique_by_id(blogs: Vec<Blog>) -> Vec<Blog> {
    let mut seen = FxHashSet::default();
    blogs
        .into_iter()
        .filter(|blog| seen.insert(blog.id.clone()))
        .collect()
}
