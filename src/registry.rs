//! Registration of spot variants and views by kind.

use crate::component::Kind;
use crate::error::{Error, Result};
use crate::item::COMPOSITE_KIND;
use crate::view::{CompositeView, HeaderView, ItemView};
use std::collections::HashMap;

/// Creates a row/cell view.
pub type ViewConstructor = fn() -> Box<dyn ItemView>;

/// Creates a header view.
pub type HeaderConstructor = fn() -> Box<dyn HeaderView>;

/// Maps kind strings to spot variants, item views and header views.
///
/// [`Registry::default`] registers the built-in variants under their own names (`"list"`,
/// `"grid"`, `"carousel"`) and no views.
#[derive(Debug, Clone)]
pub struct Registry {
    spots: HashMap<String, Kind>,
    views: HashMap<String, ViewConstructor>,
    default_view: Option<ViewConstructor>,
    headers: HashMap<String, HeaderConstructor>,
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Registry::new();
        for &kind in Kind::ALL.iter() {
            registry.register_spot(kind.as_str(), kind);
        }
        registry
    }
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Registry {
        Registry {
            spots: HashMap::new(),
            views: HashMap::new(),
            default_view: None,
            headers: HashMap::new(),
        }
    }

    /// Registers `name` as an alias for a spot variant.
    pub fn register_spot(&mut self, name: impl Into<String>, kind: Kind) -> &mut Self {
        self.spots.insert(name.into(), kind);
        self
    }

    /// Registers the view for items of the given kind.
    pub fn register_view(&mut self, kind: impl Into<String>, constructor: ViewConstructor) -> &mut Self {
        self.views.insert(kind.into(), constructor);
        self
    }

    /// Registers the view used for item kinds without a registered view.
    pub fn register_default_view(&mut self, constructor: ViewConstructor) -> &mut Self {
        self.default_view = Some(constructor);
        self
    }

    pub fn register_header(&mut self, kind: impl Into<String>, constructor: HeaderConstructor) -> &mut Self {
        self.headers.insert(kind.into(), constructor);
        self
    }

    /// Resolves a component kind to a spot variant.
    pub fn spot_kind(&self, kind: &str) -> Result<Kind> {
        self.spots
            .get(kind)
            .copied()
            .ok_or_else(|| Error::unknown_kind(kind))
    }

    pub fn is_spot_registered(&self, kind: &str) -> bool {
        self.spots.contains_key(kind)
    }

    /// Instantiates the view for an item kind.
    ///
    /// Composite items fall back to [`CompositeView`] instead of the default view.
    pub fn make_view(&self, kind: &str) -> Result<Box<dyn ItemView>> {
        if let Some(constructor) = self.views.get(kind) {
            return Ok(constructor());
        }
        if kind == COMPOSITE_KIND {
            return Ok(Box::new(CompositeView));
        }
        match self.default_view {
            Some(constructor) => Ok(constructor()),
            None => Err(Error::unknown_kind(kind)),
        }
    }

    /// Instantiates a header view; `None` for an empty or unregistered header kind.
    pub fn make_header(&self, kind: &str) -> Option<Box<dyn HeaderView>> {
        if kind.is_empty() {
            return None;
        }
        self.headers.get(kind).map(|constructor| constructor())
    }
}
