//! Access to the remote blog API.
//!
//! Pages never talk to the API directly, they go through a [`BlogSource`], usually wrapped in a
//! [`BlogStore`](crate::store::BlogStore) which caches its responses.
use std::{fs, path::Path, time::Duration};

use log::{debug, error};
use serde::de::DeserializeOwned;
use ureq::Agent;

use crate::{
    blog::{Blog, Category},
    errors::{ApiError, BuildError},
};

/// Where the blog API lives when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api/blogs/v1";

/// The three queries the blog API answers.
pub trait BlogSource: Send + Sync {
    fn all_blogs(&self) -> Result<Vec<Blog>, ApiError>;

    fn blog(&self, id: &str) -> Result<Blog, ApiError>;

    /// `category` is sent to the API as its upper-case name.
    fn blogs_by_category(&self, category: Category) -> Result<Vec<Blog>, ApiError>;
}

/// Fetches blogs over HTTP.
///
/// ## Example
/// ```no_run
/// use gazette::api::{BlogSource, HttpSource, DEFAULT_API_BASE_URL};
/// use std::time::Duration;
///
/// let source = HttpSource::new(DEFAULT_API_BASE_URL, Duration::from_secs(10));
/// let blogs = source.all_blogs()?;
/// # Ok::<(), gazette::errors::ApiError>(())
/// ```
pub struct HttpSource {
    base_url: String,
    agent: Agent,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(target: "api", "GET {}", url);

        let mut response = self.agent.get(&url).call().map_err(|err| {
            error!(target: "api", "API call to {} failed: {}", url, err);
            ApiError::network()
        })?;

        let status = response.status();
        if !status.is_success() {
            let err = ApiError::from_status(status.as_u16());
            error!(target: "api", "API call to {} failed: {}", url, err);
            return Err(err);
        }

        response.body_mut().read_json::<T>().map_err(|err| {
            error!(target: "api", "API call to {} returned an unreadable body: {}", url, err);
            ApiError::decode(err)
        })
    }
}

impl BlogSource for HttpSource {
    fn all_blogs(&self) -> Result<Vec<Blog>, ApiError> {
        self.get("/blogs")
    }

    fn blog(&self, id: &str) -> Result<Blog, ApiError> {
        self.get(&format!("/blog/{}", urlencoding::encode(id)))
    }

    fn blogs_by_category(&self, category: Category) -> Result<Vec<Blog>, ApiError> {
        self.get(&format!("/category/{}", category.as_str()))
    }
}

/// Serves blogs from memory, e.g. fixtures loaded from a JSON file when working offline.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    blogs: Vec<Blog>,
}

impl StaticSource {
    pub fn new(blogs: Vec<Blog>) -> Self {
        Self { blogs }
    }

    /// Loads a JSON array of blogs, in the same shape the API returns from `/blogs`.
    pub fn from_json_file(path: &Path) -> Result<Self, BuildError> {
        let raw = fs::read_to_string(path).map_err(|source| BuildError::FixturesFailed {
            path: path.to_path_buf(),
            source,
        })?;

        let blogs =
            serde_json::from_str::<Vec<Blog>>(&raw).map_err(|err| BuildError::InvalidFixtures {
                path: path.to_path_buf(),
                details: err.to_string(),
            })?;

        Ok(Self::new(blogs))
    }
}

impl BlogSource for StaticSource {
    fn all_blogs(&self) -> Result<Vec<Blog>, ApiError> {
        Ok(self.blogs.clone())
    }

    fn blog(&self, id: &str) -> Result<Blog, ApiError> {
        self.blogs
            .iter()
            .find(|blog| blog.id == id)
            .cloned()
            .ok_or_else(ApiError::not_found)
    }

    fn blogs_by_category(&self, category: Category) -> Result<Vec<Blog>, ApiError> {
        Ok(self
            .blogs
            .iter()
            .filter(|blog| blog.category == category)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    pub(crate) fn blog(id: &str, category: Category, publish_date: &str, content: &str) -> Blog {
        Blog {
            id: id.to_string(),
            category,
            publish_date: publish_date.to_string(),
            updated_date: None,
            content: content.to_string(),
            title: None,
            excerpt: None,
        }
    }

    pub(crate) fn sample_blogs() -> Vec<Blog> {
        vec![
            blog(
                "1",
                Category::Science,
                "2024-01-10T08:00:00",
                "# Fusion breakthrough\n\nScientists report net energy gain.",
            ),
            blog(
                "2",
                Category::World,
                "2024-02-01T12:00:00",
                "# Summit ends\n\nLeaders agree on a **climate** plan.",
            ),
            blog(
                "3",
                Category::Science,
                "2023-12-24T18:30:00",
                "## Comet visible\n\nLook north after sunset.",
            ),
            blog(
                "4",
                Category::Economy,
                "2024-01-20T07:45:00",
                "# Markets rally\n\nStocks closed higher on Friday.",
            ),
        ]
    }

    #[test]
    fn test_static_source_queries() {
        let source = StaticSource::new(sample_blogs());

        assert_eq!(source.all_blogs().unwrap().len(), 4);
        assert_eq!(source.blog("2").unwrap().category, Category::World);
        assert!(source.blog("99").unwrap_err().is_not_found());

        let science = source.blogs_by_category(Category::Science).unwrap();
        assert_eq!(
            science.iter().map(|b| b.id.as_str()).collect::<Vec<_>>(),
            ["1", "3"]
        );
        assert!(source.blogs_by_category(Category::Health).unwrap().is_empty());
    }

    #[test]
    fn test_load_fixtures() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": 1, "category": "HEALTH", "publishDate": "2024-05-01", "content": "Sleep more."}}]"#
        )
        .unwrap();

        let source = StaticSource::from_json_file(file.path()).unwrap();
        let blogs = source.all_blogs().unwrap();
        assert_eq!(blogs.len(), 1);
        assert_eq!(blogs[0].id, "1");
        assert_eq!(blogs[0].category, Category::Health);
    }

    #[test]
    fn test_load_invalid_fixtures() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = StaticSource::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, BuildError::InvalidFixtures { .. }));

        let missing = StaticSource::from_json_file(Path::new("/definitely/not/here.json"));
        assert!(matches!(missing, Err(BuildError::FixturesFailed { .. })));
    }

    #[test]
    fn test_http_source_trims_base_url() {
        let source = HttpSource::new("http://localhost:8080/api/blogs/v1/", Duration::from_secs(1));
        assert_eq!(source.base_url(), "http://localhost:8080/api/blogs/v1");
    }

    #[test]
    fn test_http_source_network_error() {
        // Nothing listens on port 9 (discard) on test machines.
        let source = HttpSource::new("http://127.0.0.1:9", Duration::from_millis(500));
        let err = source.all_blogs().unwrap_err();
        assert_eq!(err.code, crate::errors::ApiErrorCode::NetworkError);
    }
}
