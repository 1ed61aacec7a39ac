//! Insertion-ordered page map.
//!
//! Pages are stored in a flat `Vec<Page>` with an O(1) `path_index` lookup.
//! Replacing a page keeps its original position.

use std::collections::HashMap;

use crate::page::{Page, PageMeta};

/// Immutable map from canonical path to [`Page`] once built.
#[derive(Clone, Debug, Default)]
pub struct PageMap {
    pages: Vec<Page>,
    path_index: HashMap<String, usize>,
}

impl PageMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// True if the map holds no pages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Exact lookup by canonical path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Page> {
        self.path_index.get(path).map(|&idx| &self.pages[idx])
    }

    /// Iterate pages in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }

    /// Iterate canonical paths in insertion order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(Page::path)
    }

    /// Resolve a request path to a page.
    ///
    /// A trailing `.md` is stripped and an empty path means `index`. The
    /// path is tried as is, then as a directory holding an `index` page.
    #[must_use]
    pub fn resolve(&self, requested: &str) -> Option<&Page> {
        let mut path = requested;
        while let Some(stripped) = path.strip_suffix(".md") {
            path = stripped;
        }
        if path.is_empty() {
            path = "index";
        }

        self.get(path).or_else(|| {
            let separator = if path.ends_with('/') { "" } else { "/" };
            self.get(&format!("{path}{separator}index"))
        })
    }

    /// Metadata of every page whose path, name, description or text
    /// contains `query`, in insertion order.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<PageMeta> {
        self.pages
            .iter()
            .filter(|page| page.matches(query))
            .map(|page| page.meta.clone())
            .collect()
    }

    /// Insert a page keyed by its canonical path.
    ///
    /// An existing page with the same path is replaced in place and returned.
    pub(crate) fn insert(&mut self, page: Page) -> Option<Page> {
        match self.path_index.get(page.path()) {
            Some(&idx) => Some(std::mem::replace(&mut self.pages[idx], page)),
            None => {
                self.path_index.insert(page.path().to_owned(), self.pages.len());
                self.pages.push(page);
                None
            }
        }
    }

    /// Mutable iteration for in-place child linking.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Page> {
        self.pages.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn page(path: &str, text: &str) -> Page {
        Page {
            meta: PageMeta {
                canonical_name: path.to_owned(),
                ..PageMeta::default()
            },
            text: text.to_owned(),
            children: Vec::new(),
        }
    }

    fn map(pages: &[(&str, &str)]) -> PageMap {
        let mut map = PageMap::new();
        for (path, text) in pages {
            map.insert(page(path, text));
        }
        map
    }

    #[test]
    fn test_insert_preserves_order() {
        let map = map(&[("b", ""), ("a", ""), ("c", "")]);
        assert_eq!(map.paths().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut map = map(&[("a", "first"), ("b", "")]);

        let old = map.insert(page("a", "second"));

        assert_eq!(old.map(|p| p.text), Some("first".to_owned()));
        assert_eq!(map.paths().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.get("a").unwrap().text, "second");
    }

    #[test]
    fn test_resolve_exact_and_suffix() {
        let map = map(&[("docs/setup", "setup")]);

        assert_eq!(map.resolve("docs/setup").unwrap().text, "setup");
        assert_eq!(map.resolve("docs/setup.md").unwrap().text, "setup");
        assert!(map.resolve("docs/missing").is_none());
    }

    #[test]
    fn test_resolve_empty_is_index() {
        let map = map(&[("index", "home")]);
        assert_eq!(map.resolve("").unwrap().text, "home");
        assert_eq!(map.resolve("index").unwrap().text, "home");
    }

    #[test]
    fn test_resolve_directory_index_fallback() {
        let map = map(&[("docs/index", "docs home")]);

        assert_eq!(map.resolve("docs").unwrap().text, "docs home");
        assert_eq!(map.resolve("docs/").unwrap().text, "docs home");
    }

    #[test]
    fn test_resolve_prefers_exact_page_over_index() {
        let map = map(&[("docs/index", "index"), ("docs", "exact")]);
        assert_eq!(map.resolve("docs").unwrap().text, "exact");
    }

    #[test]
    fn test_search_matches_text_and_meta() {
        let map = map(&[("alpha", "nothing"), ("beta", "mentions alpha"), ("gamma", "")]);

        let hits: Vec<String> = map
            .search("alpha")
            .into_iter()
            .map(|meta| meta.canonical_name)
            .collect();
        assert_eq!(hits, vec!["alpha", "beta"]);
    }
}
