//! Leaf data records.

use crate::component::Component;
use crate::geometry::{size_format, zero_size, Size};
use cgmath::{Vector2, Zero};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Item kind for rows/cells that host nested components.
pub const COMPOSITE_KIND: &str = "composite";

/// A single row or cell of a spot.
///
/// Identity is positional: an item is addressed by its index in the owning spot. `kind` selects
/// the registered view used to render it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub subtitle: String,

    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub image: String,

    #[serde(default)]
    pub kind: String,

    #[serde(default)]
    pub action: Option<String>,

    /// Layout size. Zero until measured, unless given explicitly.
    #[serde(default = "zero_size", with = "size_format")]
    pub size: Size,

    #[serde(default)]
    pub meta: Map<String, Value>,

    /// Nested components; only meaningful for composite items.
    #[serde(default)]
    pub children: Vec<Component>,
}

impl Default for Item {
    fn default() -> Self {
        Item {
            title: String::new(),
            subtitle: String::new(),
            text: String::new(),
            image: String::new(),
            kind: String::new(),
            action: None,
            size: Vector2::zero(),
            meta: Map::new(),
            children: Vec::new(),
        }
    }
}

impl Item {
    pub fn new(title: impl Into<String>) -> Item {
        Item {
            title: title.into(),
            ..Item::default()
        }
    }

    /// Creates a composite item hosting the given components.
    pub fn composite(children: Vec<Component>) -> Item {
        Item {
            kind: COMPOSITE_KIND.to_string(),
            children,
            ..Item::default()
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Item {
        self.kind = kind.into();
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Item {
        self.subtitle = subtitle.into();
        self
    }

    pub fn with_size(mut self, size: Size) -> Item {
        self.size = size;
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Item {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// True if this item hosts nested components.
    pub fn is_composite(&self) -> bool {
        self.kind == COMPOSITE_KIND && !self.children.is_empty()
    }
}

/// Compares by value. `size` is layout state and does not take part.
impl PartialEq for Item {
    fn eq(&self, other: &Item) -> bool {
        self.title == other.title
            && self.subtitle == other.subtitle
            && self.text == other.text
            && self.image == other.image
            && self.kind == other.kind
            && self.action == other.action
            && self.meta == other.meta
            && self.children == other.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_size() {
        let a = Item::new("foo");
        let b = Item::new("foo").with_size(Vector2::new(100., 44.));
        assert_eq!(a, b);
        assert_ne!(a, Item::new("bar"));
    }

    #[test]
    fn composite_needs_children() {
        assert!(!Item::new("foo").with_kind(COMPOSITE_KIND).is_composite());
        assert!(Item::composite(vec![Component::new("list")]).is_composite());
    }

    #[test]
    fn deserializes_camel_case() {
        let item: Item = serde_json::from_str(
            r#"{ "title": "foo", "kind": "cell", "size": { "height": 120 }, "meta": { "id": 1 } }"#,
        )
        .unwrap();
        assert_eq!(item.title, "foo");
        assert_eq!(item.kind, "cell");
        assert_eq!(item.size, Vector2::new(0., 120.));
        assert_eq!(item.meta["id"], 1);
        assert!(item.children.is_empty());
    }
}
