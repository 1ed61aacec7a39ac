//! Page index construction.
//!
//! [`PageIndexBuilder`] ingests documents one at a time, in whatever order the
//! archive yields them, and links every page into its ancestors' `children`.
//!
//! # Linkage
//!
//! Page B is a child of page A when either:
//! - A is B's directory parent ([`parent_path`]): `a/b` and `a/index/…`
//!   belong to `a/index`, `a/index` belongs to `index`
//! - B's canonical path starts with `A/` (`docs/setup` under a `docs` page)
//!
//! Both directions are checked on every ingest, so a parent arriving after
//! its children collects them and a child arriving after its parent is added
//! to it. The result does not depend on ingestion order.

use crate::error::PageError;
use crate::front_matter;
use crate::page::{Page, PageMeta};
use crate::page_map::PageMap;

/// Canonical path for archive path segments.
///
/// Segments are joined with `/` (empty segments dropped) and the `.md`
/// suffix is stripped.
#[must_use]
pub fn canonical_path<S: AsRef<str>>(segments: &[S]) -> String {
    let joined = segments
        .iter()
        .map(|segment| segment.as_ref())
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<&str>>()
        .join("/");

    let mut path = joined.as_str();
    while let Some(stripped) = path.strip_suffix(".md") {
        path = stripped;
    }
    path.to_owned()
}

/// Directory parent of a canonical path.
///
/// Top-level pages have no parent. `a/b` and `a/b/index` both belong to
/// `a/index`, and `a/index` belongs to `index`.
#[must_use]
pub fn parent_path(canonical: &str) -> Option<String> {
    let (head, last) = canonical.rsplit_once('/')?;
    let base = if last == "index" {
        head.rsplit_once('/').map_or("", |(base, _)| base)
    } else {
        head
    };

    Some(if base.is_empty() {
        "index".to_owned()
    } else {
        format!("{base}/index")
    })
}

/// True if `path` lies strictly below `ancestor`.
fn is_descendant(path: &str, ancestor: &str) -> bool {
    path.strip_prefix(ancestor)
        .and_then(|rest| rest.strip_prefix('/'))
        .is_some_and(|rest| !rest.is_empty())
}

/// True if the page at `child` (with directory parent `child_parent`)
/// belongs in the `children` of the page at `parent`.
fn is_child_of(child: &str, child_parent: Option<&str>, parent: &str) -> bool {
    child_parent == Some(parent) || is_descendant(child, parent)
}

/// Builds a [`PageMap`] from Markdown documents.
#[derive(Debug, Default)]
pub struct PageIndexBuilder {
    map: PageMap,
}

impl PageIndexBuilder {
    /// Create a builder with an empty working map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages ingested so far (duplicates counted once).
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True if nothing has been ingested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Add one document at archive `path` with content `raw`.
    ///
    /// A page with the same canonical path replaces the earlier one in place.
    ///
    /// # Errors
    ///
    /// Returns `PageError::Parse` if the front matter is malformed. The
    /// working map is left untouched in that case.
    pub fn ingest<S: AsRef<str>>(&mut self, path: &[S], raw: &str) -> Result<(), PageError> {
        let canonical = canonical_path(path);
        if canonical.is_empty() {
            tracing::warn!("Ignoring document with empty path");
            return Ok(());
        }

        let (data, body) = front_matter::parse(raw).map_err(|e| PageError::Parse {
            path: path
                .iter()
                .map(|segment| segment.as_ref())
                .collect::<Vec<&str>>()
                .join("/"),
            message: e.to_string(),
        })?;

        let meta = PageMeta::from_front_matter(canonical, data);
        let children = self.link(&meta);

        let page = Page {
            meta,
            text: body.to_owned(),
            children,
        };

        if let Some(replaced) = self.map.insert(page) {
            tracing::warn!(
                path = %replaced.meta.canonical_name,
                "Duplicate page path, replacing earlier page"
            );
        }

        Ok(())
    }

    /// Finish ingestion and return the working map.
    #[must_use]
    pub fn build(self) -> PageMap {
        self.map
    }

    /// Link `meta` into every page it belongs under and collect its own
    /// children from the pages already ingested.
    fn link(&mut self, meta: &PageMeta) -> Vec<PageMeta> {
        let path = meta.canonical_name.as_str();
        let parent = parent_path(path);
        let mut children = Vec::new();

        for page in self.map.iter_mut() {
            if page.path() == path {
                continue;
            }

            if is_child_of(path, parent.as_deref(), page.path()) {
                page.upsert_child(meta);
            }

            if is_child_of(page.path(), parent_path(page.path()).as_deref(), path) {
                children.push(page.meta.clone());
            }
        }

        children
    }
}
