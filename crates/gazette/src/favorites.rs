//! Per-browser list of favorite blogs.
//!
//! Favorites never reach the blog API: the list lives in a cookie, as a percent-encoded JSON array of blog ids.
use log::warn;

pub const FAVORITES_COOKIE: &str = "blogFavorites";

const ONE_YEAR_SECONDS: u64 = 60 * 60 * 24 * 365;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    ids: Vec<String>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut favorites = Self::new();
        for id in ids {
            favorites.add(id);
        }
        favorites
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|favorite| favorite == id)
    }

    /// Appends `id` unless it is already a favorite.
    pub fn add(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !self.contains(&id) {
            self.ids.push(id);
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.ids.retain(|favorite| favorite != id);
    }

    /// Flips membership of `id` and returns whether it is a favorite afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.contains(id) {
            self.remove(id);
            false
        } else {
            self.add(id);
            true
        }
    }

    /// Reads favorites from a `Cookie` request header. A missing or unreadable cookie yields an empty list.
    pub fn from_cookie_header(header: Option<&str>) -> Self {
        let Some(raw) = header.and_then(find_cookie) else {
            return Self::new();
        };

        let decoded = match urlencoding::decode(raw) {
            Ok(decoded) => decoded,
            Err(err) => {
                warn!(target: "favorites", "Ignoring undecodable favorites cookie: {}", err);
                return Self::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&decoded) {
            Ok(ids) => Self::from_ids(ids),
            Err(err) => {
                warn!(target: "favorites", "Ignoring corrupt favorites cookie: {}", err);
                Self::new()
            }
        }
    }

    /// Value for a `Set-Cookie` response header persisting this list.
    pub fn to_cookie(&self) -> String {
        let json = serde_json::to_string(&self.ids).unwrap_or_else(|_| "[]".to_string());
        format!(
            "{}={}; Path=/; Max-Age={}; SameSite=Lax",
            FAVORITES_COOKIE,
            urlencoding::encode(&json),
            ONE_YEAR_SECONDS
        )
    }
}

fn find_cookie(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name.trim() == FAVORITES_COOKIE).then_some(value.trim())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut favorites = Favorites::new();

        assert!(favorites.toggle("1"));
        assert!(favorites.toggle("2"));
        assert!(favorites.contains("1"));

        assert!(!favorites.toggle("1"));
        assert!(!favorites.contains("1"));
        assert_eq!(favorites.ids(), ["2".to_string()]);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut favorites = Favorites::from_ids(["a", "b", "a"]);
        favorites.add("b");
        assert_eq!(favorites.len(), 2);

        favorites.remove("missing");
        assert_eq!(favorites.len(), 2);
    }

    #[test]
    fn test_cookie_round_trip() {
        let favorites = Favorites::from_ids(["7", "12"]);
        let set_cookie = favorites.to_cookie();

        assert!(set_cookie.starts_with("blogFavorites=%5B%227%22%2C%2212%22%5D;"));
        assert!(set_cookie.contains("Path=/"));

        let cookie_value = set_cookie.split(';').next().unwrap();
        let header = format!("theme=dark; {}", cookie_value);
        assert_eq!(Favorites::from_cookie_header(Some(&header)), favorites);
    }

    #[test]
    fn test_bad_cookies_are_ignored() {
        assert!(Favorites::from_cookie_header(None).is_empty());
        assert!(Favorites::from_cookie_header(Some("theme=dark")).is_empty());
        assert!(Favorites::from_cookie_header(Some("blogFavorites=not-json")).is_empty());
        assert!(Favorites::from_cookie_header(Some("blogFavorites=%FF%FE")).is_empty());
    }
}
