//! Layout and lazy cell materialization.
//!
//! Layout runs in two phases. `measure` works bottom-up: composite items take the height of
//! their child spots, then every spot computes its item frames and view size. `place` works
//! top-down: it positions views, materializes the cells in the visible range, drops the others
//! and mounts composite children in their host cells.

use crate::error::{Error, Result};
use crate::geometry::{Rect, Size};
use crate::patch::Patch;
use crate::spot::SpotId;
use crate::tree::SpotTree;
use crate::view::RenderedView;
use cgmath::Point2;
use std::collections::BTreeMap;
use tracing::trace;

/// A vertical span `[start, end)` in spot coordinates.
pub(crate) type Span = (f64, f64);

impl SpotTree {
    /// Lays out a single spot (and its composite subtree) for the available size.
    ///
    /// Only cells within `available.y` are materialized; a zero height materializes everything.
    /// Returns the spot's frame size.
    pub fn layout(&mut self, id: SpotId, available: Size) -> Result<Size> {
        let size = self.measure(id, available.x)?;
        let clip = if available.y > 0. {
            Some((0., available.y))
        } else {
            None
        };
        self.place(id, Point2::new(0., 0.), clip)?;
        Ok(size)
    }

    /// Composite children grouped by host item index.
    fn hosts(&self, id: SpotId) -> Result<BTreeMap<usize, Vec<SpotId>>> {
        let spot = self.spot(id).ok_or(Error::NoSuchSpot(id))?;
        let mut hosts: BTreeMap<usize, Vec<SpotId>> = BTreeMap::new();
        for composite in spot.composite_spots() {
            hosts
                .entry(composite.index())
                .or_insert_with(Vec::new)
                .push(composite.spot());
        }
        Ok(hosts)
    }

    /// Sizes the spot for `width`; returns its frame size.
    pub(crate) fn measure(&mut self, id: SpotId, width: f64) -> Result<Size> {
        let spot = self.spot(id).ok_or(Error::NoSuchSpot(id))?;
        let frame_width = if spot.component.size.x > 0. {
            spot.component.size.x
        } else {
            width
        };

        for (index, children) in self.hosts(id)? {
            let child_width = {
                let spot = self.spot(id).ok_or(Error::NoSuchSpot(id))?;
                match spot.item(index) {
                    Some(item) if item.size.x > 0. => item.size.x,
                    _ => spot.item_width(frame_width),
                }
            };
            let mut height = 0.;
            for child in children {
                height += self.measure(child, child_width)?.y;
            }
            if let Some(item) = self.spot_mut(id)?.component.items.get_mut(index) {
                item.size.y = height;
            }
        }

        let spot = self.spot_mut(id)?;
        let (frames, content_size) = spot.compute_frames(frame_width);
        let frame_size = spot.frame_size(width, content_size);
        spot.frames = frames;
        spot.render();
        if let Some(view) = spot.view.as_mut() {
            view.frame.size = frame_size;
            view.content_size = content_size;
        }
        Ok(frame_size)
    }

    /// Positions a measured spot at `origin` and materializes the cells inside `clip`.
    pub(crate) fn place(&mut self, id: SpotId, origin: Point2<f64>, clip: Option<Span>) -> Result<()> {
        let spot = self.spot_mut(id)?;
        spot.render();
        let mut height = 0.;
        if let Some(view) = spot.view.as_mut() {
            view.frame.origin = origin;
            height = view.frame.size.y;
        }
        let visible = match clip {
            Some((start, end)) => (start.max(0.), end.min(height)),
            None => (0., height),
        };

        let changed = spot.view != spot.presented;
        spot.presented = spot.view;
        let native = spot.native_view();
        let frames = spot.frames.clone();
        if changed {
            if let Some(native) = native {
                self.push_patch(Patch::Update(id, native));
            }
        }

        let hosts = self.hosts(id)?;
        for (index, frame) in frames.into_iter().enumerate() {
            let is_visible = visible.0 < visible.1 && frame.intersects_span(visible.0, visible.1);
            if is_visible {
                self.materialize(id, index, frame)?;
            } else if self.spot_mut(id)?.cells.remove(&index).is_some() {
                trace!(spot = %id, index, "dropped cell");
            }

            let children = match hosts.get(&index) {
                Some(children) => children,
                None => continue,
            };
            let mut y = 0.;
            for &child in children {
                let child_clip = if is_visible {
                    let top = frame.origin.y + y;
                    (visible.0 - top, visible.1 - top)
                } else {
                    (0., 0.)
                };
                self.place(child, Point2::new(0., y), Some(child_clip))?;
                y += self
                    .spot(child)
                    .and_then(|spot| spot.view())
                    .map_or(0., |view| view.frame.size.y);
            }
            if is_visible {
                self.mount(id, index, children)?;
            }
        }
        Ok(())
    }

    /// Creates the cell at `index` if needed and places it at `frame`.
    fn materialize(&mut self, id: SpotId, index: usize, frame: Rect) -> Result<()> {
        let spot = self.spot_mut(id)?;
        if let Some(cell) = spot.cells.get_mut(&index) {
            cell.set_frame(frame);
            return Ok(());
        }

        let kind = match spot.item(index) {
            Some(item) => item.kind.clone(),
            None => return Ok(()),
        };
        let view = match self.registry().make_view(&kind) {
            Ok(view) => view,
            Err(err) => {
                trace!(spot = %id, index, "no cell: {}", err);
                return Ok(());
            }
        };

        let spot = self.spot_mut(id)?;
        let mut cell = RenderedView::new(view, frame);
        cell.configure(&mut spot.component.items[index]);
        spot.cells.insert(index, cell);
        trace!(spot = %id, index, "materialized cell");
        Ok(())
    }

    /// Mounts composite children in the content view of the cell at `index`.
    fn mount(&mut self, id: SpotId, index: usize, children: &[SpotId]) -> Result<()> {
        let spot = self.spot_mut(id)?;
        let cell = match spot.cells.get_mut(&index) {
            Some(cell) => cell,
            None => return Ok(()),
        };
        if cell.content_view().subviews() == children {
            return Ok(());
        }
        cell.content_view_mut().mount(children.to_vec());
        self.push_patch(Patch::Mount(id, index, children.to_vec()));
        Ok(())
    }
}
