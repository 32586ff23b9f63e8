//! The callback surface consumed by the embedding toolkit.

use crate::component::{Kind, HEADER_HEIGHT_KEY};
use crate::geometry::Size;
use crate::item::Item;
use crate::spot::{Spot, SpotId};
use crate::tree::SpotTree;
use core::fmt;
use parking_lot::Mutex;
use std::sync::Arc;

/// Called when the user selects an item.
pub struct SelectionHandler(Arc<Mutex<dyn FnMut(&Item, SpotId) + Send>>);

impl Clone for SelectionHandler {
    fn clone(&self) -> Self {
        SelectionHandler(Arc::clone(&self.0))
    }
}

impl SelectionHandler {
    pub fn new<F: 'static + FnMut(&Item, SpotId) + Send>(handler: F) -> Self {
        SelectionHandler(Arc::new(Mutex::new(handler)))
    }

    pub fn call(&self, item: &Item, spot: SpotId) {
        (&mut *self.0.lock())(item, spot)
    }
}

impl fmt::Debug for SelectionHandler {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SelectionHandler")
    }
}

/// Answers the toolkit's delegate queries for one spot.
///
/// Everything forwards to the spot's items, cached sizes and component metadata.
#[derive(Debug)]
pub struct Delegate<'a> {
    tree: &'a SpotTree,
    spot: &'a Spot,
    handler: Option<&'a SelectionHandler>,
}

impl<'a> Delegate<'a> {
    /// `None` if the spot does not exist.
    pub fn new(
        tree: &'a SpotTree,
        id: SpotId,
        handler: Option<&'a SelectionHandler>,
    ) -> Option<Delegate<'a>> {
        tree.spot(id).map(|spot| Delegate {
            tree,
            spot,
            handler,
        })
    }

    pub fn spot(&self) -> &'a Spot {
        self.spot
    }

    /// Forwards a selection to the handler.
    ///
    /// Returns false if there is no item at `index` or no handler.
    pub fn did_select_item(&self, index: usize) -> bool {
        match (self.spot.item(index), self.handler) {
            (Some(item), Some(handler)) => {
                handler.call(item, self.spot.id());
                true
            }
            _ => false,
        }
    }

    pub fn size_for_item(&self, index: usize) -> Size {
        self.spot.size_for_item(index)
    }

    /// The cached height of a row; zero if out of range.
    pub fn height_for_row(&self, index: usize) -> f64 {
        self.spot.item(index).map_or(0., |item| item.size.y)
    }

    /// Height of the section header.
    ///
    /// A registered header view decides; otherwise lists read `headerHeight` from the component
    /// metadata.
    pub fn header_height(&self) -> f64 {
        let component = self.spot.component();
        if let Some(header) = self.tree.registry().make_header(&component.header) {
            return header.preferred_header_height();
        }
        match self.spot.kind() {
            Kind::List => component.meta_value(HEADER_HEIGHT_KEY, 0.),
            _ => 0.,
        }
    }

    /// The plain section title, used when no header view is registered.
    pub fn title_for_header(&self) -> Option<&'a str> {
        let component = self.spot.component();
        if self.tree.registry().make_header(&component.header).is_some() || component.title.is_empty()
        {
            None
        } else {
            Some(&component.title)
        }
    }
}
