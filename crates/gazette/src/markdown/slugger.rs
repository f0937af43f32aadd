use rustc_hash::FxHashSet;

use crate::text::slugify;

/// Hands out heading ids, suffixing repeated ones so every id in a document stays unique.
#[derive(Default)]
pub struct Slugger {
    generated_slugs: FxHashSet<String>,
}

impl Slugger {
    pub fn new() -> Self {
        Self {
            generated_slugs: FxHashSet::default(),
        }
    }

    pub fn slugify(&mut self, text: &str) -> String {
        let base = match slugify(text) {
            slug if slug.is_empty() => "section".to_string(),
            slug => slug,
        };

        let mut slug = base.clone();
        let mut counter = 1;
        while self.generated_slugs.contains(&slug) {
            slug = format!("{}-{}", base, counter);
            counter += 1;
        }
        self.generated_slugs.insert(slug.clone());
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_slugs() {
        let mut slugger = Slugger::new();
        assert_eq!(slugger.slugify("Overview"), "overview");
        assert_eq!(slugger.slugify("Overview"), "overview-1");
        assert_eq!(slugger.slugify("Overview"), "overview-2");
        assert_eq!(slugger.slugify("!!!"), "section");
    }
}
