//! Navigation tree and flat slug index built from a PIM menu.
//!
//! The tree and the slug map are always produced by the same call to
//! [`build_navigation_index`], so they cannot drift apart. Slugs live in a
//! single namespace across the whole tree; two nodes that would share a slug
//! fail the build with [`NavigationError::SlugCollision`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A menu as returned by the taxonomy source, before slugs are assigned.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Taxonomy {
    pub title: Option<String>,
    pub items: Vec<TaxonomyItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyItem {
    pub label: String,
    /// Storefront path or URL the item points at, e.g. `/collections/panels`.
    pub path: Option<String>,
    pub category_id: Option<String>,
    pub children: Vec<TaxonomyItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavNode {
    pub label: String,
    pub slug: String,
    pub children: Vec<NavNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

impl NavNode {
    /// Visits this node and every descendant in pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a NavNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// Slug → node. Ordered so that serialization is stable across rebuilds.
pub type SlugMap = BTreeMap<String, NavNode>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationIndex {
    pub updated_at: DateTime<Utc>,
    pub tree: NavNode,
    pub slug_map: SlugMap,
}

impl NavigationIndex {
    #[must_use]
    pub fn lookup(&self, slug: &str) -> Option<&NavNode> {
        self.slug_map.get(slug)
    }

    /// Number of nodes in the tree, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slug_map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slug_map.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("slug \"{slug}\" is produced by both \"{first}\" and \"{second}\"")]
    SlugCollision {
        slug: String,
        first: String,
        second: String,
    },

    #[error("navigation item \"{label}\" does not produce a usable slug")]
    EmptySlug { label: String },
}

/// Lowercases and reduces `input` to ASCII alphanumerics joined by single
/// hyphens. `"Wall Panels & Trims"` becomes `"wall-panels-trims"`.
#[must_use]
pub fn slugify(input: &str) -> String {
    input
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Last non-empty path segment of a URL or path, without query or fragment.
fn last_path_segment(path: &str) -> Option<&str> {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let path = path.split_once("://").map_or(path, |(_, rest)| {
        rest.split_once('/').map_or("", |(_, p)| p)
    });
    path.split('/').rev().find(|s| !s.is_empty())
}

fn item_slug(item: &TaxonomyItem) -> Result<String, NavigationError> {
    let from_path = item
        .path
        .as_deref()
        .and_then(last_path_segment)
        .map(slugify)
        .filter(|s| !s.is_empty());

    let slug = from_path.unwrap_or_else(|| slugify(&item.label));
    if slug.is_empty() {
        return Err(NavigationError::EmptySlug {
            label: item.label.clone(),
        });
    }
    Ok(slug)
}

fn build_node(item: &TaxonomyItem) -> Result<NavNode, NavigationError> {
    let children = item
        .children
        .iter()
        .map(build_node)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NavNode {
        label: item.label.trim().to_owned(),
        slug: item_slug(item)?,
        children,
        category_id: item.category_id.clone(),
    })
}

/// Builds the rooted tree for `menu_key`. Sibling order follows the source.
///
/// # Errors
///
/// Returns [`NavigationError::EmptySlug`] if the menu key or any item yields
/// an empty slug.
pub fn build_tree(menu_key: &str, taxonomy: &Taxonomy) -> Result<NavNode, NavigationError> {
    let root_slug = slugify(menu_key);
    if root_slug.is_empty() {
        return Err(NavigationError::EmptySlug {
            label: menu_key.to_owned(),
        });
    }

    let label = taxonomy
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(menu_key)
        .to_owned();

    let children = taxonomy
        .items
        .iter()
        .map(build_node)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NavNode {
        label,
        slug: root_slug,
        children,
        category_id: None,
    })
}

/// Records every node of `root` once, keyed by slug.
///
/// # Errors
///
/// Returns [`NavigationError::SlugCollision`] on the first duplicate slug.
pub fn build_slug_map(root: &NavNode) -> Result<SlugMap, NavigationError> {
    let mut map = SlugMap::new();
    let mut collision = None;

    root.walk(&mut |node| {
        if collision.is_some() {
            return;
        }
        if let Some(existing) = map.get(&node.slug) {
            collision = Some(NavigationError::SlugCollision {
                slug: node.slug.clone(),
                first: existing.label.clone(),
                second: node.label.clone(),
            });
            return;
        }
        map.insert(node.slug.clone(), node.clone());
    });

    match collision {
        Some(err) => Err(err),
        None => Ok(map),
    }
}

/// Builds the tree and its slug map together.
///
/// # Errors
///
/// Propagates [`NavigationError`] from tree or map construction; nothing is
/// returned on failure, so a partial index can never be published.
pub fn build_navigation_index(
    menu_key: &str,
    taxonomy: &Taxonomy,
    updated_at: DateTime<Utc>,
) -> Result<NavigationIndex, NavigationError> {
    let tree = build_tree(menu_key, taxonomy)?;
    let slug_map = build_slug_map(&tree)?;
    Ok(NavigationIndex {
        updated_at,
        tree,
        slug_map,
    })
}

#[cfg(test)]
#[path = "navigation_test.rs"]
mod tests;
