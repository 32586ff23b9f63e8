use crate::component::{Component, Kind};
use crate::geometry::{Rect, Size};
use crate::item::Item;
use crate::patch::NativeView;
use crate::view::RenderedView;
use cgmath::{Vector2, Zero};
use core::fmt;
use std::collections::BTreeMap;
use uuid::Uuid;

/// A unique identifier for a spot.
///
/// (this is just a UUID)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpotId(Uuid);

impl SpotId {
    pub(crate) fn new() -> SpotId {
        SpotId(Uuid::new_v4())
    }
}

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A child spot mounted in a composite item of its parent.
///
/// `parent` is a non-owning back-reference; the child is owned by the [`SpotTree`] through the
/// parent's composite list and is released together with it.
///
/// [`SpotTree`]: crate::SpotTree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeSpot {
    pub(crate) spot: SpotId,
    pub(crate) parent: SpotId,
    pub(crate) index: usize,
}

impl CompositeSpot {
    /// The child spot.
    pub fn spot(&self) -> SpotId {
        self.spot
    }

    /// The spot this composite is mounted in.
    pub fn parent(&self) -> SpotId {
        self.parent
    }

    /// Index of the hosting item in the parent.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// The backing scrollable view of a spot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollView {
    pub frame: Rect,
    pub content_size: Size,
}

/// A runtime controller bound to one [`Component`].
///
/// Spots live in a [`SpotTree`](crate::SpotTree) and are addressed by [`SpotId`]. The items
/// are the component's items; there is no second copy to keep in sync.
#[derive(Debug)]
pub struct Spot {
    id: SpotId,
    kind: Kind,
    pub(crate) component: Component,
    pub(crate) composite_spots: Vec<CompositeSpot>,
    pub(crate) view: Option<ScrollView>,
    /// The view state last sent to the physical hierarchy.
    pub(crate) presented: Option<ScrollView>,
    /// Materialized cells by item index.
    pub(crate) cells: BTreeMap<usize, RenderedView>,
    /// Laid-out item frames, in spot coordinates.
    pub(crate) frames: Vec<Rect>,
    fallback_height: f64,
}

impl Spot {
    pub(crate) fn new(id: SpotId, kind: Kind, component: Component, fallback_height: f64) -> Spot {
        Spot {
            id,
            kind,
            component,
            composite_spots: Vec::new(),
            view: None,
            presented: None,
            cells: BTreeMap::new(),
            frames: Vec::new(),
            fallback_height,
        }
    }

    pub fn id(&self) -> SpotId {
        self.id
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn component(&self) -> &Component {
        &self.component
    }

    pub fn items(&self) -> &[Item] {
        &self.component.items
    }

    pub fn item(&self, index: usize) -> Option<&Item> {
        self.component.items.get(index)
    }

    /// Returns the materialized cell at `index`.
    ///
    /// `None` if the index is out of range or the cell is not in the visible range.
    pub fn ui(&self, index: usize) -> Option<&RenderedView> {
        self.cells.get(&index)
    }

    pub fn composite_spots(&self) -> &[CompositeSpot] {
        &self.composite_spots
    }

    /// Composite spots mounted at the item `index`.
    pub fn composite_spots_at(&self, index: usize) -> impl Iterator<Item = &CompositeSpot> + '_ {
        self.composite_spots
            .iter()
            .filter(move |composite| composite.index == index)
    }

    /// Returns the backing scroll view, creating it on first call.
    ///
    /// A new view takes its frame size from the component size.
    pub fn render(&mut self) -> &ScrollView {
        let size = self.component.size;
        self.view.get_or_insert_with(|| ScrollView {
            frame: Rect::zero().with_size(size),
            content_size: Vector2::zero(),
        })
    }

    /// The backing scroll view, if it has been created.
    pub fn view(&self) -> Option<&ScrollView> {
        self.view.as_ref()
    }

    pub(crate) fn native_view(&self) -> Option<NativeView> {
        self.view.map(|view| NativeView::ScrollView {
            kind: self.kind,
            frame: view.frame,
            content_size: view.content_size,
        })
    }

    /// Number of grid columns.
    pub(crate) fn columns(&self) -> usize {
        match self.kind {
            Kind::Grid => self.component.span.round().max(1.) as usize,
            _ => 1,
        }
    }

    /// Width of an item without an explicit width, for a spot of the given width.
    pub(crate) fn item_width(&self, width: f64) -> f64 {
        match self.kind {
            Kind::List => width,
            Kind::Grid => width / self.columns() as f64,
            Kind::Carousel => width / self.component.span.max(1.),
        }
    }

    /// Size of the item at `index`: its cached size, with the variant defaults filling in
    /// whatever is unset. Zero if out of range.
    pub fn size_for_item(&self, index: usize) -> Size {
        let item = match self.item(index) {
            Some(item) => item,
            None => return Vector2::zero(),
        };
        let spot_width = self.view.map_or(self.component.size.x, |view| view.frame.size.x);
        let width = if item.size.x > 0. {
            item.size.x
        } else {
            self.item_width(spot_width)
        };
        let height = if item.size.y > 0. {
            item.size.y
        } else {
            self.fallback_height
        };
        Vector2::new(width, height)
    }

    /// Computes item frames and the content size for a spot of the given width.
    pub(crate) fn compute_frames(&self, width: f64) -> (Vec<Rect>, Size) {
        let items = &self.component.items;
        let mut frames = Vec::with_capacity(items.len());
        let height_of = |item: &Item| {
            if item.size.y > 0. || item.is_composite() {
                item.size.y
            } else {
                self.fallback_height
            }
        };

        match self.kind {
            Kind::List => {
                let mut y = 0.;
                for item in items {
                    let height = height_of(item);
                    frames.push(Rect::new((0., y).into(), Vector2::new(width, height)));
                    y += height;
                }
                (frames, Vector2::new(width, y))
            }
            Kind::Grid => {
                let columns = self.columns();
                let cell_width = self.item_width(width);
                let mut y = 0.;
                for row in items.chunks(columns) {
                    let row_height = row.iter().map(height_of).fold(0., f64::max);
                    for (column, _) in row.iter().enumerate() {
                        frames.push(Rect::new(
                            (column as f64 * cell_width, y).into(),
                            Vector2::new(cell_width, row_height),
                        ));
                    }
                    y += row_height;
                }
                (frames, Vector2::new(width, y))
            }
            Kind::Carousel => {
                let mut x = 0.;
                let mut height: f64 = 0.;
                for item in items {
                    let item_width = if item.size.x > 0. {
                        item.size.x
                    } else {
                        self.item_width(width)
                    };
                    let item_height = height_of(item);
                    frames.push(Rect::new((x, 0.).into(), Vector2::new(item_width, item_height)));
                    x += item_width;
                    height = height.max(item_height);
                }
                (frames, Vector2::new(x, height))
            }
        }
    }

    /// Frame size of the spot's view for the given width and content size: the component size
    /// where set, the content otherwise.
    pub(crate) fn frame_size(&self, width: f64, content_size: Size) -> Size {
        let size = self.component.size;
        Vector2::new(
            if size.x > 0. { size.x } else { width },
            if size.y > 0. { size.y } else { content_size.y },
        )
    }

    /// Copies the non-structural component properties.
    pub(crate) fn apply_properties(&mut self, component: &Component) {
        self.component.kind = component.kind.clone();
        self.component.identifier = component.identifier.clone();
        self.component.title = component.title.clone();
        self.component.header = component.header.clone();
        self.component.span = component.span;
        self.component.meta = component.meta.clone();
        self.component.size = component.size;
    }
}
