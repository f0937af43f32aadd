//! The blog records served by the API and the fixed set of categories they belong to.
use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    errors::UnknownCategory,
    text::{calculate_reading_time, extract_excerpt, extract_title},
};

/// One of the content tags used for filtering and navigation.
///
/// Categories travel over the wire as their upper-case name (`"SCIENCE"`), and appear in URLs in lower-case (`/category/science`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Polity,
    World,
    Economy,
    Science,
    Health,
    Society,
    Top,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Polity,
        Category::World,
        Category::Economy,
        Category::Science,
        Category::Health,
        Category::Society,
        Category::Top,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Polity => "POLITY",
            Category::World => "WORLD",
            Category::Economy => "ECONOMY",
            Category::Science => "SCIENCE",
            Category::Health => "HEALTH",
            Category::Society => "SOCIETY",
            Category::Top => "TOP",
        }
    }

    /// Human-readable name, e.g. "Top Stories".
    pub fn label(&self) -> &'static str {
        match self {
            Category::Polity => "Polity",
            Category::World => "World",
            Category::Economy => "Economy",
            Category::Science => "Science",
            Category::Health => "Health",
            Category::Society => "Society",
            Category::Top => "Top Stories",
        }
    }

    pub fn slug(&self) -> String {
        self.as_str().to_ascii_lowercase()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == upper)
            .ok_or_else(|| UnknownCategory(s.trim().to_string()))
    }
}

/// A single article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub category: Category,
    pub publish_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

impl Blog {
    /// The explicit title if the API sent one, otherwise the first heading of the content.
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) if !title.trim().is_empty() => title.trim().to_string(),
            _ => extract_title(&self.content),
        }
    }

    pub fn summary(&self, max_length: usize) -> String {
        match &self.excerpt {
            Some(excerpt) if !excerpt.trim().is_empty() => excerpt.trim().to_string(),
            _ => extract_excerpt(&self.content, max_length),
        }
    }

    pub fn reading_time(&self) -> u32 {
        calculate_reading_time(&self.content)
    }

    pub fn was_updated(&self) -> bool {
        self.updated_date
            .as_deref()
            .is_some_and(|updated| !updated.is_empty() && updated != self.publish_date)
    }

    /// Date used for "last modified" metadata: the update date when there is one.
    pub fn last_modified(&self) -> &str {
        match self.updated_date.as_deref() {
            Some(updated) if !updated.is_empty() => updated,
            _ => &self.publish_date,
        }
    }
}

// The API serializes ids as numbers, fixtures sometimes use strings.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

fn deserialize_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
