//! Cached access to blogs.
//!
//! [`BlogStore`] memoizes every successful API response by the shape of the query that produced it: all blogs,
//! blogs of one category, or a single blog. Entries never expire and are never evicted, callers refresh them
//! explicitly through `force_refresh` or [`BlogStore::invalidate`].
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, info, warn};
use rustc_hash::FxHashMap;

use crate::{
    api::BlogSource,
    blog::{Blog, Category},
    errors::StoreError,
};

/// The shape of a query, used to key cached responses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    All,
    Category(Category),
    Single(String),
}

/// Responses fetched so far, one map per query shape.
#[derive(Debug, Default)]
pub struct ResponseCache {
    all: Option<Vec<Blog>>,
    categories: FxHashMap<Category, Vec<Blog>>,
    single: FxHashMap<String, Blog>,
}

impl ResponseCache {
    pub fn contains(&self, key: &CacheKey) -> bool {
        match key {
            CacheKey::All => self.all.is_some(),
            CacheKey::Category(category) => self.categories.contains_key(category),
            CacheKey::Single(id) => self.single.contains_key(id),
        }
    }

    pub fn all(&self) -> Option<&Vec<Blog>> {
        self.all.as_ref()
    }

    pub fn category(&self, category: Category) -> Option<&Vec<Blog>> {
        self.categories.get(&category)
    }

    pub fn single(&self, id: &str) -> Option<&Blog> {
        self.single.get(id)
    }

    pub fn remove(&mut self, key: &CacheKey) {
        match key {
            CacheKey::All => self.all = None,
            CacheKey::Category(category) => {
                self.categories.remove(category);
            }
            CacheKey::Single(id) => {
                self.single.remove(id);
            }
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn len(&self) -> usize {
        usize::from(self.all.is_some()) + self.categories.len() + self.single.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A [`BlogSource`] with a response cache in front of it.
///
/// ## Example
/// ```
/// use gazette::api::StaticSource;
/// use gazette::store::BlogStore;
///
/// let store = BlogStore::new(StaticSource::default());
/// let blogs = store.all_blogs(false)?; // fetched
/// let blogs = store.all_blogs(false)?; // served from the cache
/// let blogs = store.all_blogs(true)?; // fetched again
/// # Ok::<(), gazette::errors::StoreError>(())
/// ```
pub struct BlogStore {
    source: Box<dyn BlogSource>,
    cache: RwLock<ResponseCache>,
    last_error: RwLock<Option<String>>,
}

impl BlogStore {
    pub fn new(source: impl BlogSource + 'static) -> Self {
        Self::from_boxed(Box::new(source))
    }

    pub fn from_boxed(source: Box<dyn BlogSource>) -> Self {
        Self {
            source,
            cache: RwLock::new(ResponseCache::default()),
            last_error: RwLock::new(None),
        }
    }

    /// Every blog the API knows about.
    pub fn all_blogs(&self, force_refresh: bool) -> Result<Vec<Blog>, StoreError> {
        if !force_refresh {
            if let Some(blogs) = self.read_cache().all() {
                debug!(target: "store", "Cache hit for all blogs");
                return Ok(blogs.clone());
            }
        }

        let blogs = self.record(self.source.all_blogs())?;
        info!(target: "store", "Fetched {} blogs", blogs.len());
        self.write_cache().all = Some(blogs.clone());

        Ok(blogs)
    }

    /// A single blog. A blank id is not a query and returns `None` without touching the API.
    pub fn blog(&self, id: &str, force_refresh: bool) -> Result<Option<Blog>, StoreError> {
        let id = id.trim();
        if id.is_empty() {
            return Ok(None);
        }

        if !force_refresh {
            if let Some(blog) = self.read_cache().single(id) {
                debug!(target: "store", "Cache hit for blog {}", id);
                return Ok(Some(blog.clone()));
            }
        }

        let blog = self.record(self.source.blog(id))?;
        info!(target: "store", "Fetched blog {}", id);
        self.write_cache()
            .single
            .insert(id.to_string(), blog.clone());

        Ok(Some(blog))
    }

    /// Blogs of the category named `name`, matched case-insensitively. A blank name returns an empty list without
    /// touching the API.
    pub fn category_blogs(&self, name: &str, force_refresh: bool) -> Result<Vec<Blog>, StoreError> {
        if name.trim().is_empty() {
            return Ok(vec![]);
        }

        let category = match name.parse::<Category>() {
            Ok(category) => category,
            Err(err) => {
                warn!(target: "store", "{}", err);
                self.set_last_error(Some(err.to_string()));
                return Err(err.into());
            }
        };

        self.blogs_in(category, force_refresh)
    }

    pub fn blogs_in(&self, category: Category, force_refresh: bool) -> Result<Vec<Blog>, StoreError> {
        if !force_refresh {
            if let Some(blogs) = self.read_cache().category(category) {
                debug!(target: "store", "Cache hit for category {}", category);
                return Ok(blogs.clone());
            }
        }

        let blogs = self.record(self.source.blogs_by_category(category))?;
        info!(target: "store", "Fetched {} blogs in {}", blogs.len(), category);
        self.write_cache()
            .categories
            .insert(category, blogs.clone());

        Ok(blogs)
    }

    pub fn is_cached(&self, key: &CacheKey) -> bool {
        self.read_cache().contains(key)
    }

    pub fn invalidate(&self, key: &CacheKey) {
        self.write_cache().remove(key);
    }

    pub fn clear(&self) {
        self.write_cache().clear();
    }

    /// Message of the most recent failed fetch, cleared by the next successful one.
    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn record<T>(&self, result: Result<T, crate::errors::ApiError>) -> Result<T, StoreError> {
        match result {
            Ok(value) => {
                self.set_last_error(None);
                Ok(value)
            }
            Err(err) => {
                self.set_last_error(Some(err.message.clone()));
                Err(err.into())
            }
        }
    }

    fn set_last_error(&self, message: Option<String>) {
        *self
            .last_error
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = message;
    }

    // A panic while holding the lock cannot leave the maps half-written, so poisoning is ignored.
    fn read_cache(&self) -> RwLockReadGuard<'_, ResponseCache> {
        self.cache
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_cache(&self) -> RwLockWriteGuard<'_, ResponseCache> {
        self.cache
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
