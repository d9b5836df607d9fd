//! Sidebar tree construction from the article index.
//!
//! A [`SidebarTree`] maps URL path prefixes to ordered lists of
//! [`SidebarGroup`]s. The site framework picks the first prefix matching the
//! current page, so insertion order is kept and serialized as-is.
//!
//! Two construction policies exist:
//! - [`build_flat_sidebar`]: every article in one group, plus a truncated
//!   "recent articles" view under a second prefix
//! - [`build_grouped_sidebar`]: one group per source account

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use wxdocs_index::ArticleIndexEntry;

/// Leaf link in a sidebar group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SidebarItem {
    /// Display title.
    pub text: String,
    /// Link target path.
    pub link: String,
}

impl From<&ArticleIndexEntry> for SidebarItem {
    fn from(entry: &ArticleIndexEntry) -> Self {
        Self {
            text: entry.text.clone(),
            link: entry.link.clone(),
        }
    }
}

/// Labelled group of sidebar links.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SidebarGroup {
    /// Group label.
    pub text: String,
    /// Whether the group can be collapsed.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub collapsible: bool,
    /// Links in display order.
    pub children: Vec<SidebarItem>,
}

impl SidebarGroup {
    fn from_entries<'a>(
        text: &str,
        entries: impl IntoIterator<Item = &'a ArticleIndexEntry>,
        collapsible: bool,
    ) -> Self {
        Self {
            text: text.to_owned(),
            collapsible,
            children: entries.into_iter().map(SidebarItem::from).collect(),
        }
    }
}

/// Ordered mapping from URL path prefix to sidebar groups.
///
/// Serializes as a JSON object with keys in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SidebarTree {
    scopes: Vec<(String, Vec<SidebarGroup>)>,
}

impl SidebarTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the groups for `prefix`.
    ///
    /// Replaces the groups in place if the prefix already exists, otherwise
    /// appends it.
    pub fn insert(&mut self, prefix: impl Into<String>, groups: Vec<SidebarGroup>) {
        let prefix = prefix.into();
        if let Some(slot) = self.scopes.iter_mut().find(|(p, _)| *p == prefix) {
            slot.1 = groups;
        } else {
            self.scopes.push((prefix, groups));
        }
    }

    /// Groups registered for exactly `prefix`.
    #[must_use]
    pub fn get(&self, prefix: &str) -> Option<&[SidebarGroup]> {
        self.scopes
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, groups)| groups.as_slice())
    }

    /// Prefixes in insertion order.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.scopes.iter().map(|(p, _)| p.as_str())
    }

    /// Longest prefix under which `path` falls, if any.
    #[must_use]
    pub fn scope_for(&self, path: &str) -> Option<&str> {
        self.prefixes()
            .filter(|prefix| path.starts_with(prefix))
            .max_by_key(|prefix| prefix.len())
    }

    /// Number of prefixes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Whether the tree has no prefixes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl Serialize for SidebarTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.scopes.len()))?;
        for (prefix, groups) in &self.scopes {
            map.serialize_entry(prefix, groups)?;
        }
        map.end()
    }
}

/// Options for [`build_flat_sidebar`].
#[derive(Clone, Debug)]
pub struct FlatSidebarOptions {
    /// Prefix for the full article list.
    pub all_prefix: String,
    /// Label of the full article list group.
    pub all_text: String,
    /// Prefix for the recent-articles view.
    pub recent_prefix: String,
    /// Label of the recent-articles group.
    pub recent_text: String,
    /// Maximum entries in the recent-articles view.
    pub recent_limit: usize,
}

impl Default for FlatSidebarOptions {
    fn default() -> Self {
        Self {
            all_prefix: "/articles/".to_owned(),
            all_text: "所有文章".to_owned(),
            recent_prefix: "/".to_owned(),
            recent_text: "最新文章".to_owned(),
            recent_limit: 20,
        }
    }
}

/// Options for [`build_grouped_sidebar`].
#[derive(Clone, Debug)]
pub struct GroupedSidebarOptions {
    /// Prefix all account groups are registered under.
    pub prefix: String,
    /// Render account groups as collapsible.
    pub collapsible: bool,
}

impl Default for GroupedSidebarOptions {
    fn default() -> Self {
        Self {
            prefix: "/".to_owned(),
            collapsible: false,
        }
    }
}

/// Build the flat sidebar: all entries under `all_prefix`, and the first
/// `min(len, recent_limit)` entries under `recent_prefix`.
///
/// Entry order is kept as-is in both views.
#[must_use]
pub fn build_flat_sidebar(
    entries: &[ArticleIndexEntry],
    options: &FlatSidebarOptions,
) -> SidebarTree {
    let recent = &entries[..entries.len().min(options.recent_limit)];

    let mut tree = SidebarTree::new();
    tree.insert(
        options.all_prefix.clone(),
        vec![SidebarGroup::from_entries(&options.all_text, entries, false)],
    );
    tree.insert(
        options.recent_prefix.clone(),
        vec![SidebarGroup::from_entries(&options.recent_text, recent, false)],
    );
    tree
}

/// Build the grouped sidebar: one group per key in `group_keys`, in that
/// order, each holding exactly that key's bucket.
///
/// Keys absent from `buckets` are omitted with a warning.
#[must_use]
pub fn build_grouped_sidebar(
    buckets: &BTreeMap<String, Vec<ArticleIndexEntry>>,
    group_keys: &[String],
    options: &GroupedSidebarOptions,
) -> SidebarTree {
    let groups = group_keys
        .iter()
        .filter_map(|key| {
            let Some(bucket) = buckets.get(key) else {
                tracing::warn!(group = %key, "Group key not found in article index, omitting");
                return None;
            };
            Some(SidebarGroup::from_entries(key, bucket, options.collapsible))
        })
        .collect();

    let mut tree = SidebarTree::new();
    tree.insert(options.prefix.clone(), groups);
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entries(n: usize) -> Vec<ArticleIndexEntry> {
        (0..n)
            .map(|i| ArticleIndexEntry::new(format!("Article {i}"), format!("/articles/{i}.md")))
            .collect()
    }

    fn item(text: &str, link: &str) -> SidebarItem {
        SidebarItem {
            text: text.to_owned(),
            link: link.to_owned(),
        }
    }

    #[test]
    fn test_flat_sidebar_small_index() {
        let index = vec![
            ArticleIndexEntry::new("A", "/a"),
            ArticleIndexEntry::new("B", "/b"),
        ];

        let tree = build_flat_sidebar(&index, &FlatSidebarOptions::default());

        let all = tree.get("/articles/").unwrap();
        let recent = tree.get("/").unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].text, "所有文章");
        assert_eq!(all[0].children, vec![item("A", "/a"), item("B", "/b")]);
        assert_eq!(recent[0].text, "最新文章");
        assert_eq!(recent[0].children, all[0].children);
    }

    #[test]
    fn test_flat_sidebar_recent_is_min_of_len_and_limit() {
        for k in [0, 1, 19, 20, 21, 57] {
            let index = entries(k);

            let tree = build_flat_sidebar(&index, &FlatSidebarOptions::default());

            let all = &tree.get("/articles/").unwrap()[0].children;
            let recent = &tree.get("/").unwrap()[0].children;
            assert_eq!(all.len(), k);
            assert_eq!(recent.len(), k.min(20), "K = {k}");
            assert_eq!(recent.as_slice(), &all[..recent.len()]);
        }
    }

    #[test]
    fn test_flat_sidebar_custom_limit_and_labels() {
        let options = FlatSidebarOptions {
            all_prefix: "/posts/".to_owned(),
            all_text: "All".to_owned(),
            recent_prefix: "/".to_owned(),
            recent_text: "Recent".to_owned(),
            recent_limit: 3,
        };

        let tree = build_flat_sidebar(&entries(5), &options);

        assert_eq!(tree.prefixes().collect::<Vec<_>>(), vec!["/posts/", "/"]);
        assert_eq!(tree.get("/").unwrap()[0].text, "Recent");
        assert_eq!(tree.get("/").unwrap()[0].children.len(), 3);
    }

    #[test]
    fn test_grouped_sidebar_example() {
        let mut buckets = BTreeMap::new();
        buckets.insert("X".to_owned(), vec![ArticleIndexEntry::new("A", "/a")]);
        buckets.insert("Y".to_owned(), Vec::new());
        let keys = vec!["X".to_owned(), "Y".to_owned(), "Z".to_owned()];

        let tree = build_grouped_sidebar(&buckets, &keys, &GroupedSidebarOptions::default());

        let groups = tree.get("/").unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].text, "X");
        assert_eq!(groups[0].children, vec![item("A", "/a")]);
        assert_eq!(groups[1].text, "Y");
        assert!(groups[1].children.is_empty());
    }

    #[test]
    fn test_grouped_sidebar_follows_key_order_not_index_order() {
        let mut buckets = BTreeMap::new();
        buckets.insert("A".to_owned(), entries(2));
        buckets.insert("B".to_owned(), entries(3));
        let keys = vec!["B".to_owned(), "A".to_owned()];

        let tree = build_grouped_sidebar(&buckets, &keys, &GroupedSidebarOptions::default());

        let groups = tree.get("/").unwrap();
        assert_eq!(groups[0].text, "B");
        assert_eq!(groups[1].text, "A");
        let expected: Vec<SidebarItem> = buckets["B"].iter().map(SidebarItem::from).collect();
        assert_eq!(groups[0].children, expected);
    }

    #[test]
    fn test_grouped_sidebar_all_keys_missing() {
        let keys = vec!["Z".to_owned()];

        let tree = build_grouped_sidebar(&BTreeMap::new(), &keys, &GroupedSidebarOptions::default());

        assert_eq!(tree.len(), 1);
        assert!(tree.get("/").unwrap().is_empty());
    }

    #[test]
    fn test_grouped_sidebar_collapsible() {
        let mut buckets = BTreeMap::new();
        buckets.insert("X".to_owned(), entries(1));
        let options = GroupedSidebarOptions {
            prefix: "/accounts/".to_owned(),
            collapsible: true,
        };

        let tree = build_grouped_sidebar(&buckets, &["X".to_owned()], &options);

        assert!(tree.get("/accounts/").unwrap()[0].collapsible);
    }

    #[test]
    fn test_tree_insert_replaces_existing_prefix_in_place() {
        let mut tree = SidebarTree::new();
        tree.insert("/a/", Vec::new());
        tree.insert("/", Vec::new());
        tree.insert(
            "/a/",
            vec![SidebarGroup::from_entries("G", &entries(1), false)],
        );

        assert_eq!(tree.prefixes().collect::<Vec<_>>(), vec!["/a/", "/"]);
        assert_eq!(tree.get("/a/").unwrap().len(), 1);
    }

    #[test]
    fn test_tree_scope_for_picks_longest_prefix() {
        let tree = build_flat_sidebar(&entries(1), &FlatSidebarOptions::default());

        assert_eq!(tree.scope_for("/articles/1.md"), Some("/articles/"));
        assert_eq!(tree.scope_for("/about"), Some("/"));
        assert_eq!(SidebarTree::new().scope_for("/"), None);
    }

    #[test]
    fn test_tree_serializes_in_insertion_order() {
        let index = vec![ArticleIndexEntry::new("A", "/a")];
        let tree = build_flat_sidebar(&index, &FlatSidebarOptions::default());

        let json = serde_json::to_string(&tree).unwrap();

        assert_eq!(
            json,
            r#"{"/articles/":[{"text":"所有文章","children":[{"text":"A","link":"/a"}]}],"/":[{"text":"最新文章","children":[{"text":"A","link":"/a"}]}]}"#
        );
    }

    #[test]
    fn test_group_serializes_collapsible_only_when_set() {
        let group = SidebarGroup::from_entries("X", &entries(0), true);

        let json = serde_json::to_value(&group).unwrap();

        assert_eq!(json["collapsible"], true);
        assert!(json["children"].as_array().unwrap().is_empty());
    }
}
