use crate::component::Component;
use crate::geometry::{Rect, Size};
use crate::item::Item;
use crate::spot::SpotId;
use cgmath::{Vector2, Zero};
use core::any::Any;
use core::fmt;

/// A row/cell view: the render target for a single item.
///
/// Implementors are supplied by the embedding UI toolkit and registered per item kind in a
/// [`Registry`](crate::Registry). The core only ever measures and configures them; drawing is
/// entirely up to the implementation.
///
/// Views are created lazily: once to measure an item, and again when the item scrolls into the
/// visible range of its spot.
pub trait ItemView: Any + fmt::Debug + Send {
    /// The size this view would like to have; used when the item has no explicit size.
    fn preferred_view_size(&self) -> Size;

    /// Customizes the view for an item.
    ///
    /// The item may be modified, e.g. to record a measured size.
    fn configure(&mut self, item: &mut Item);

    /// For downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// A section header view.
pub trait HeaderView: Any + fmt::Debug + Send {
    fn preferred_header_height(&self) -> f64;

    fn configure(&mut self, _component: &Component) {}
}

/// The cell view used for composite items when no view is registered for them.
#[derive(Debug, Default)]
pub struct CompositeView;

impl ItemView for CompositeView {
    fn preferred_view_size(&self) -> Size {
        Vector2::zero()
    }

    fn configure(&mut self, _item: &mut Item) {}

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The container inside a cell that hosts the scroll views of composite child spots.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ContentView {
    subviews: Vec<SpotId>,
}

impl ContentView {
    /// Child spots mounted in this container, in order.
    pub fn subviews(&self) -> &[SpotId] {
        &self.subviews
    }

    pub(crate) fn mount(&mut self, subviews: Vec<SpotId>) {
        self.subviews = subviews;
    }
}

/// A materialized cell: an [`ItemView`] placed in its spot.
#[derive(Debug)]
pub struct RenderedView {
    frame: Rect,
    view: Box<dyn ItemView>,
    content_view: ContentView,
}

impl RenderedView {
    pub(crate) fn new(view: Box<dyn ItemView>, frame: Rect) -> RenderedView {
        RenderedView {
            frame,
            view,
            content_view: ContentView::default(),
        }
    }

    /// Frame in the owning spot's coordinate space.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub(crate) fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
    }

    pub fn view(&self) -> &dyn ItemView {
        &*self.view
    }

    pub fn preferred_view_size(&self) -> Size {
        self.view.preferred_view_size()
    }

    /// Downcasts the item view.
    pub fn downcast_ref<T: ItemView>(&self) -> Option<&T> {
        self.view.as_any().downcast_ref::<T>()
    }

    pub fn content_view(&self) -> &ContentView {
        &self.content_view
    }

    pub(crate) fn content_view_mut(&mut self) -> &mut ContentView {
        &mut self.content_view
    }

    pub(crate) fn configure(&mut self, item: &mut Item) {
        self.view.configure(item);
    }
}
