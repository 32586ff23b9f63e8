//! Component descriptors.

use crate::error::Result;
use crate::geometry::{size_format, zero_size, Size};
use crate::item::Item;
use cgmath::{Vector2, Zero};
use core::fmt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata key for a list header height.
pub const HEADER_HEIGHT_KEY: &str = "headerHeight";

/// Built-in spot variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    List,
    Grid,
    Carousel,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::List, Kind::Grid, Kind::Carousel];

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::List => "list",
            Kind::Grid => "grid",
            Kind::Carousel => "carousel",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declarative description of one list/grid region.
///
/// Composite items (see [`Item::composite`]) carry nested components, which makes this a tree.
/// Item order is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    #[serde(default)]
    pub identifier: Option<String>,

    #[serde(default)]
    pub title: String,

    /// Registered header view kind; empty for none.
    #[serde(default)]
    pub header: String,

    /// Spot variant kind, e.g. `"list"`.
    pub kind: String,

    /// Layout weight; the number of columns for grids.
    #[serde(default)]
    pub span: f64,

    #[serde(default)]
    pub items: Vec<Item>,

    #[serde(default)]
    pub meta: Map<String, Value>,

    /// Fixed size of the spot's view; zero lets the spot size itself to its content.
    #[serde(default = "zero_size", with = "size_format")]
    pub size: Size,
}

impl Component {
    pub fn new(kind: impl Into<String>) -> Component {
        Component {
            identifier: None,
            title: String::new(),
            header: String::new(),
            kind: kind.into(),
            span: 0.,
            items: Vec::new(),
            meta: Map::new(),
            size: Vector2::zero(),
        }
    }

    /// Parses a single component from JSON.
    pub fn from_json(json: &str) -> Result<Component> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a list of components from JSON.
    pub fn list_from_json(json: &str) -> Result<Vec<Component>> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_span(mut self, span: f64) -> Component {
        self.span = span;
        self
    }

    pub fn with_items(mut self, items: Vec<Item>) -> Component {
        self.items = items;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Component {
        self.title = title.into();
        self
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Component {
        self.header = header.into();
        self
    }

    pub fn with_size(mut self, size: Size) -> Component {
        self.size = size;
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Component {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Appends a composite item hosting `child`.
    pub fn add_child(&mut self, child: Component) {
        self.items.push(Item::composite(vec![child]));
    }

    /// Appends one composite item per child.
    pub fn add_children<I: IntoIterator<Item = Component>>(&mut self, children: I) {
        for child in children {
            self.add_child(child);
        }
    }

    /// Looks up a typed metadata value, falling back to `default` when it is missing or has
    /// the wrong type.
    pub fn meta_value<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.meta
            .get(key)
            .and_then(|value| T::deserialize(value).ok())
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_child_creates_composite_items() {
        let mut component = Component::new(Kind::Grid.as_str());
        component.add_child(Component::new(Kind::List.as_str()));
        assert_eq!(component.items.len(), 1);

        component.add_children(vec![
            Component::new(Kind::List.as_str()),
            Component::new(Kind::List.as_str()),
        ]);
        assert_eq!(component.items.len(), 3);
        assert!(component.items.iter().all(Item::is_composite));
    }

    #[test]
    fn typed_meta() {
        let component = Component::new("list").with_meta(HEADER_HEIGHT_KEY, 44.0);
        assert_eq!(component.meta_value(HEADER_HEIGHT_KEY, 0.0), 44.0);
        assert_eq!(component.meta_value("missing", 3.0), 3.0);
        assert_eq!(component.meta_value(HEADER_HEIGHT_KEY, String::new()), "");
    }

    #[test]
    fn parses_nested_json() {
        let components = Component::list_from_json(
            r#"[
                {
                    "kind": "grid",
                    "span": 2,
                    "items": [
                        { "kind": "composite", "children": [
                            { "kind": "list", "items": [{ "title": "foo" }, { "title": "bar" }] }
                        ] }
                    ]
                },
                { "kind": "list", "title": "Settings", "size": { "width": 320, "height": 200 } }
            ]"#,
        )
        .unwrap();

        assert_eq!(components.len(), 2);
        assert_eq!(components[0].span, 2.);
        assert!(components[0].items[0].is_composite());
        assert_eq!(components[0].items[0].children[0].items[1].title, "bar");
        assert_eq!(components[1].size, Vector2::new(320., 200.));
    }

    #[test]
    fn kind_is_required() {
        assert!(Component::from_json(r#"{ "title": "no kind" }"#).is_err());
    }
}
