//! Page data types.
//!
//! A [`Page`] is one Markdown document from the snapshot. Its [`PageMeta`]
//! holds the canonical path plus every front matter field, and is what
//! parents list as children and what search results return.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Page metadata: canonical path plus front matter fields.
///
/// `name` and `description` are lifted out of the front matter when they
/// are strings. All other fields are kept verbatim in `extra` and flattened
/// back into the same JSON object when serialized.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Path of the page inside the repository, without the `.md` suffix.
    ///
    /// Always derived from the archive path; a front matter field with the
    /// same key is discarded.
    #[serde(rename = "canonicalName")]
    pub canonical_name: String,
    /// Display name from front matter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Short description from front matter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Remaining front matter fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Remove `key` from `data` if it holds a string.
fn take_string(data: &mut Map<String, Value>, key: &str) -> Option<String> {
    match data.get(key) {
        Some(Value::String(_)) => match data.remove(key) {
            Some(Value::String(value)) => Some(value),
            _ => None,
        },
        _ => None,
    }
}

impl PageMeta {
    /// Build metadata for `canonical_name` from a decoded front matter mapping.
    #[must_use]
    pub fn from_front_matter(canonical_name: String, mut data: Map<String, Value>) -> Self {
        data.remove("canonicalName");
        let name = take_string(&mut data, "name");
        let description = take_string(&mut data, "description");

        Self {
            canonical_name,
            name,
            description,
            extra: data,
        }
    }

    /// True if `query` occurs in the canonical name, name or description.
    ///
    /// Matching is case-sensitive.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        self.canonical_name.contains(query)
            || self.name.as_deref().is_some_and(|name| name.contains(query))
            || self
                .description
                .as_deref()
                .is_some_and(|description| description.contains(query))
    }
}

/// A wiki page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page metadata.
    pub meta: PageMeta,
    /// Markdown body with the front matter block removed.
    pub text: String,
    /// Metadata of pages nested under this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PageMeta>,
}

impl Page {
    /// Canonical path of the page.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.meta.canonical_name
    }

    /// True if `query` occurs in the metadata or the body text.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        self.meta.matches(query) || self.text.contains(query)
    }

    /// Insert `meta` into the children, replacing an entry with the same
    /// canonical name.
    pub(crate) fn upsert_child(&mut self, meta: &PageMeta) {
        match self
            .children
            .iter_mut()
            .find(|child| child.canonical_name == meta.canonical_name)
        {
            Some(existing) => existing.clone_from(meta),
            None => self.children.push(meta.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn front_matter(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_from_front_matter_lifts_known_fields() {
        let meta = PageMeta::from_front_matter(
            "docs/setup".to_owned(),
            front_matter(json!({"name": "Setup", "description": "Get going", "order": 2})),
        );

        assert_eq!(meta.canonical_name, "docs/setup");
        assert_eq!(meta.name.as_deref(), Some("Setup"));
        assert_eq!(meta.description.as_deref(), Some("Get going"));
        assert_eq!(meta.extra.get("order"), Some(&json!(2)));
        assert!(!meta.extra.contains_key("name"));
    }

    #[test]
    fn test_from_front_matter_discards_author_canonical_name() {
        let meta = PageMeta::from_front_matter(
            "docs/setup".to_owned(),
            front_matter(json!({"canonicalName": "hijacked"})),
        );

        assert_eq!(meta.canonical_name, "docs/setup");
        assert!(meta.extra.is_empty());
    }

    #[test]
    fn test_from_front_matter_keeps_non_string_name_in_extra() {
        let meta =
            PageMeta::from_front_matter("a".to_owned(), front_matter(json!({"name": 42})));

        assert_eq!(meta.name, None);
        assert_eq!(meta.extra.get("name"), Some(&json!(42)));
    }

    #[test]
    fn test_meta_serializes_flat() {
        let meta = PageMeta::from_front_matter(
            "docs/setup".to_owned(),
            front_matter(json!({"name": "Setup", "tags": ["a"]})),
        );

        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(
            value,
            json!({"canonicalName": "docs/setup", "name": "Setup", "tags": ["a"]})
        );
    }

    #[test]
    fn test_page_serialization_omits_empty_children() {
        let page = Page {
            meta: PageMeta {
                canonical_name: "a".to_owned(),
                ..PageMeta::default()
            },
            text: "body".to_owned(),
            children: Vec::new(),
        };

        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value, json!({"meta": {"canonicalName": "a"}, "text": "body"}));
    }

    #[test]
    fn test_meta_matches_is_case_sensitive() {
        let meta = PageMeta {
            canonical_name: "docs/setup".to_owned(),
            name: Some("Workstation".to_owned()),
            description: Some("Install tooling".to_owned()),
            extra: Map::new(),
        };

        assert!(meta.matches("setup"));
        assert!(meta.matches("Workst"));
        assert!(meta.matches("tooling"));
        assert!(!meta.matches("workst"));
    }

    #[test]
    fn test_upsert_child_replaces_same_path() {
        let mut page = Page {
            meta: PageMeta::default(),
            text: String::new(),
            children: Vec::new(),
        };
        let mut child = PageMeta {
            canonical_name: "a/b".to_owned(),
            ..PageMeta::default()
        };

        page.upsert_child(&child);
        child.name = Some("B".to_owned());
        page.upsert_child(&child);

        assert_eq!(page.children, vec![child]);
    }
}
