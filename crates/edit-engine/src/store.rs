//! The content-store seam.
//!
//! Hosts own a store of named documents ("items") with a text body, optional
//! named fields, and tags. The engine consumes a narrow interface: plugin
//! configuration lookups, excised-content creation, and register/selection
//! persistence. [`MemoryStore`] is the in-memory implementation used by
//! headless hosts and tests.

use std::collections::BTreeMap;

/// A named document in the host's store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreItem {
    /// Unique title.
    pub title: String,
    /// Text body.
    pub text: String,
    /// Tags.
    pub tags: Vec<String>,
    /// Named fields beyond the body.
    pub fields: BTreeMap<String, String>,
}

impl StoreItem {
    /// Create an item with just a title and body.
    pub fn new(title: &str, text: &str) -> Self {
        Self {
            title: title.to_string(),
            text: text.to_string(),
            ..Self::default()
        }
    }
}

/// Read/write access to the host's named-document store.
pub trait ContentStore {
    /// The text body of `title`, if the item exists.
    fn text(&self, title: &str) -> Option<String>;

    /// Write `value` into `title`'s body (`field` `None`) or a named field.
    /// Creates the item when absent.
    fn set_text(&mut self, title: &str, field: Option<&str>, value: &str);

    /// Add (or replace) a whole item.
    fn add_item(&mut self, item: StoreItem);

    /// Whether `title` exists.
    fn exists(&self, title: &str) -> bool;

    /// Titles of items carrying `tag`.
    fn with_tag(&self, tag: &str) -> Vec<String>;

    /// Titles matching a host-defined filter expression. Hosts without a
    /// filter language return an empty list.
    fn filter(&self, expression: &str) -> Vec<String> {
        let _ = expression;
        Vec::new()
    }

    /// A title not present in the store, derived from `base`
    /// (`base`, `base 1`, `base 2`, ...).
    fn unique_title(&self, base: &str) -> String {
        if !self.exists(base) {
            return base.to_string();
        }
        let mut counter = 1usize;
        loop {
            let candidate = format!("{base} {counter}");
            if !self.exists(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }
}

/// An in-memory [`ContentStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: BTreeMap<String, StoreItem>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct access to an item, for host/test assertions.
    pub fn item(&self, title: &str) -> Option<&StoreItem> {
        self.items.get(title)
    }
}

impl ContentStore for MemoryStore {
    fn text(&self, title: &str) -> Option<String> {
        self.items.get(title).map(|item| item.text.clone())
    }

    fn set_text(&mut self, title: &str, field: Option<&str>, value: &str) {
        let item = self
            .items
            .entry(title.to_string())
            .or_insert_with(|| StoreItem::new(title, ""));
        match field {
            None | Some("text") => item.text = value.to_string(),
            Some(field) => {
                item.fields.insert(field.to_string(), value.to_string());
            }
        }
    }

    fn add_item(&mut self, item: StoreItem) {
        self.items.insert(item.title.clone(), item);
    }

    fn exists(&self, title: &str) -> bool {
        self.items.contains_key(title)
    }

    fn with_tag(&self, tag: &str) -> Vec<String> {
        self.items
            .values()
            .filter(|item| item.tags.iter().any(|t| t == tag))
            .map(|item| item.title.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_text_creates_and_updates() {
        let mut store = MemoryStore::new();
        store.set_text("note", None, "body");
        assert_eq!(store.text("note").as_deref(), Some("body"));
        store.set_text("note", Some("caption"), "c");
        assert_eq!(store.item("note").unwrap().fields["caption"], "c");
    }

    #[test]
    fn unique_title_counts_up() {
        let mut store = MemoryStore::new();
        assert_eq!(store.unique_title("snippet"), "snippet");
        store.add_item(StoreItem::new("snippet", ""));
        store.add_item(StoreItem::new("snippet 1", ""));
        assert_eq!(store.unique_title("snippet"), "snippet 2");
    }

    #[test]
    fn with_tag_filters() {
        let mut store = MemoryStore::new();
        let mut item = StoreItem::new("a", "");
        item.tags.push("draft".to_string());
        store.add_item(item);
        store.add_item(StoreItem::new("b", ""));
        assert_eq!(store.with_tag("draft"), vec!["a".to_string()]);
    }
}
