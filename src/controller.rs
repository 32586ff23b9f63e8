//! Top-level spots and reload orchestration.

use crate::backend::Backend;
use crate::component::Component;
use crate::config::ReloadPolicy;
use crate::delegate::{Delegate, SelectionHandler};
use crate::error::{Error, Result};
use crate::geometry::Size;
use crate::hierarchy::ViewHierarchy;
use crate::item::Item;
use crate::parser::Parser;
use crate::patch::Patch;
use crate::spot::{Spot, SpotId};
use crate::tree::SpotTree;
use cgmath::{Point2, Vector2};
use crossbeam::channel::{self, Receiver, Sender};
use tracing::{debug, trace, warn};

/// Called once a reload has been laid out and flushed to the backend.
pub type Completion<B> = Box<dyn FnOnce(&Controller<B>)>;

type PendingReload<B> = (Vec<Component>, Completion<B>);

/// Owns the top-level spots, stacked vertically in a scrolling viewport.
///
/// Reloads reconcile the spot tree immediately; the physical layout pass, the patch flush and
/// the completion callback happen in [`layout_if_needed`](Controller::layout_if_needed), which
/// the embedder calls once per display refresh. Until then the reload is *in flight* and further
/// reloads are queued or rejected according to [`ReloadPolicy`].
pub struct Controller<B: Backend> {
    tree: SpotTree,
    /// One slot per top-level component; `None` where the component was skipped.
    slots: Vec<Option<SpotId>>,
    spots: Vec<SpotId>,
    hierarchy: ViewHierarchy<B>,
    viewport: Size,
    content_offset: f64,
    content_height: f64,
    in_flight: Option<Completion<B>>,
    pending_sender: Sender<PendingReload<B>>,
    pending: Receiver<PendingReload<B>>,
    selection: Option<SelectionHandler>,
    roots_dirty: bool,
}

impl<B: Backend> Controller<B> {
    /// Creates a controller for already parsed top-level spots.
    pub fn new(tree: SpotTree, spots: Vec<SpotId>, backend: B) -> Controller<B> {
        let slots = spots.into_iter().map(Some).collect();
        Controller::from_slots(tree, slots, backend)
    }

    /// Parses components into a new controller.
    pub fn with_components(mut tree: SpotTree, components: &[Component], backend: B) -> Controller<B> {
        let slots = Parser::parse_slots(&mut tree, components);
        Controller::from_slots(tree, slots, backend)
    }

    fn from_slots(mut tree: SpotTree, slots: Vec<Option<SpotId>>, backend: B) -> Controller<B> {
        let (pending_sender, pending) = channel::unbounded();
        let spots = slots.iter().flatten().copied().collect();
        let viewport = tree.config().viewport;
        tree.set_needs_layout(true);
        Controller {
            tree,
            slots,
            spots,
            hierarchy: ViewHierarchy::new(backend),
            viewport,
            content_offset: 0.,
            content_height: 0.,
            in_flight: None,
            pending_sender,
            pending,
            selection: None,
            roots_dirty: true,
        }
    }

    /// Top-level spots in order.
    pub fn spots(&self) -> &[SpotId] {
        &self.spots
    }

    pub fn spot(&self, index: usize) -> Option<&Spot> {
        self.spots.get(index).and_then(|&id| self.tree.spot(id))
    }

    pub fn tree(&self) -> &SpotTree {
        &self.tree
    }

    /// For item mutations; changes show up in the next layout pass.
    pub fn tree_mut(&mut self) -> &mut SpotTree {
        &mut self.tree
    }

    pub fn hierarchy(&self) -> &ViewHierarchy<B> {
        &self.hierarchy
    }

    pub fn hierarchy_mut(&mut self) -> &mut ViewHierarchy<B> {
        &mut self.hierarchy
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        if self.viewport != viewport {
            self.viewport = viewport;
            self.tree.set_needs_layout(true);
        }
    }

    pub fn content_offset(&self) -> f64 {
        self.content_offset
    }

    /// Scrolls the viewport; cells entering the visible range are materialized on the next pass.
    pub fn scroll_to(&mut self, offset: f64) {
        let offset = offset.max(0.);
        if self.content_offset != offset {
            self.content_offset = offset;
            self.tree.set_needs_layout(true);
        }
    }

    /// Size of the stacked spots as of the last layout pass.
    pub fn content_size(&self) -> Size {
        Vector2::new(self.viewport.x, self.content_height)
    }

    /// True while a reload waits for its layout pass.
    pub fn is_reloading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn set_selection_handler<F: 'static + FnMut(&Item, SpotId) + Send>(&mut self, handler: F) {
        self.selection = Some(SelectionHandler::new(handler));
    }

    pub fn delegate(&self, spot: SpotId) -> Option<Delegate> {
        Delegate::new(&self.tree, spot, self.selection.as_ref())
    }

    /// Reconciles the top-level spots against new components.
    ///
    /// `completion` is called exactly once, after the layout pass that follows this reload.
    /// A reload issued while another one is in flight is queued behind it, or fails with
    /// [`Error::ReentrantReload`] under [`ReloadPolicy::Reject`].
    pub fn reload_if_needed<F>(&mut self, components: Vec<Component>, completion: F) -> Result<()>
    where
        F: 'static + FnOnce(&Controller<B>),
    {
        let completion: Completion<B> = Box::new(completion);
        if self.in_flight.is_some() {
            return match self.tree.config().reload_policy {
                ReloadPolicy::Queue => {
                    debug!("reload in flight, queueing");
                    if self.pending_sender.send((components, completion)).is_err() {
                        warn!("reload queue disconnected");
                    }
                    Ok(())
                }
                ReloadPolicy::Reject => {
                    warn!("rejecting reentrant reload");
                    Err(Error::ReentrantReload)
                }
            };
        }

        self.reconcile(&components);
        self.in_flight = Some(completion);
        Ok(())
    }

    /// Reconciles slot by slot, so a skipped component never shifts its siblings.
    fn reconcile(&mut self, components: &[Component]) {
        let count = self.slots.len();
        if components.len() > count {
            let added = Parser::parse_slots(&mut self.tree, &components[count..]);
            debug!(count = added.len(), "appending top-level spots");
            self.slots.extend(added);
        } else if components.len() < count {
            let released = self.slots.split_off(components.len());
            debug!(count = released.len(), "releasing top-level spots");
            for id in released.into_iter().flatten() {
                self.tree.release(id);
            }
        }

        let shared = count.min(components.len());
        for (slot, component) in self.slots.iter_mut().zip(components).take(shared) {
            let id = match *slot {
                Some(id) => id,
                None => {
                    match self.tree.add_spot(component) {
                        Ok(id) => *slot = Some(id),
                        Err(err) => trace!("still skipping component: {}", err),
                    }
                    continue;
                }
            };
            if !self.tree.registry().is_spot_registered(&component.kind) {
                warn!(spot = %id, kind = %component.kind, "releasing spot with unknown kind");
                self.tree.release(id);
                *slot = None;
                continue;
            }
            match self.tree.reload(id, component) {
                Ok(outcome) => {
                    trace!(spot = %id, updated = outcome.updated, replaced = outcome.replaced, "reloaded")
                }
                Err(err) => warn!(spot = %id, "keeping spot: {}", err),
            }
        }

        let spots: Vec<SpotId> = self.slots.iter().flatten().copied().collect();
        if spots != self.spots {
            self.spots = spots;
            self.roots_dirty = true;
        }
        self.tree.set_needs_layout(true);
    }

    /// Runs the display-refresh turn.
    ///
    /// Lays out and flushes pending changes, fires the in-flight completion, then processes
    /// queued reloads the same way until the queue is empty.
    pub fn layout_if_needed(&mut self) {
        loop {
            if self.tree.needs_layout() || self.roots_dirty || self.in_flight.is_some() {
                self.layout();
            }
            if let Some(completion) = self.in_flight.take() {
                completion(self);
            }
            match self.pending.try_recv() {
                Ok((components, completion)) => {
                    self.reconcile(&components);
                    self.in_flight = Some(completion);
                }
                Err(_) => break,
            }
        }
    }

    fn layout(&mut self) {
        let width = self.viewport.x;
        let visible = (self.content_offset, self.content_offset + self.viewport.y);
        let mut y = 0.;
        for &id in &self.spots {
            let size = match self.tree.measure(id, width) {
                Ok(size) => size,
                Err(err) => {
                    warn!(spot = %id, "layout failed: {}", err);
                    continue;
                }
            };
            let clip = if self.viewport.y > 0. {
                Some((visible.0 - y, visible.1 - y))
            } else {
                None
            };
            if let Err(err) = self.tree.place(id, Point2::new(0., y), clip) {
                warn!(spot = %id, "layout failed: {}", err);
            }
            y += size.y;
        }
        self.content_height = y;

        if self.roots_dirty {
            self.tree.push_patch(Patch::SetRoots(self.spots.clone()));
            self.roots_dirty = false;
        }
        for patch in self.tree.patches() {
            if let Err(err) = self.hierarchy.patch(patch) {
                warn!("failed to apply patch: {:?}", err);
            }
        }
        self.tree.set_needs_layout(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::headless::{HeadlessBackend, Op};
    use crate::test_utils::{list, registry, tree, ROW_HEIGHT};
    use std::cell::Cell;
    use std::rc::Rc;

    fn controller(components: &[Component]) -> Controller<HeadlessBackend> {
        let mut controller = Controller::with_components(tree(), components, HeadlessBackend::new());
        controller.set_viewport(Vector2::new(320., 400.));
        controller.layout_if_needed();
        controller
    }

    fn counter() -> (Rc<Cell<usize>>, impl FnOnce(&Controller<HeadlessBackend>)) {
        let calls = Rc::new(Cell::new(0));
        let inner = Rc::clone(&calls);
        (calls, move |_: &Controller<HeadlessBackend>| inner.set(inner.get() + 1))
    }

    #[test]
    fn spots_are_stacked() {
        let controller = controller(&[list(2), list(3)]);
        let first = controller.spot(0).unwrap().view().unwrap();
        let second = controller.spot(1).unwrap().view().unwrap();
        assert_eq!(first.frame.origin.y, 0.);
        assert_eq!(second.frame.origin.y, ROW_HEIGHT * 2.);
        assert_eq!(controller.content_size(), Vector2::new(320., ROW_HEIGHT * 5.));
        assert_eq!(controller.hierarchy().roots(), controller.spots());
    }

    #[test]
    fn completion_fires_after_layout() {
        let mut controller = controller(&[list(2)]);
        let (calls, completion) = counter();
        controller.reload_if_needed(vec![list(4)], completion).unwrap();
        assert!(controller.is_reloading());
        assert_eq!(calls.get(), 0);

        controller.layout_if_needed();
        assert!(!controller.is_reloading());
        assert_eq!(calls.get(), 1);
        assert_eq!(controller.spot(0).unwrap().items().len(), 4);

        controller.layout_if_needed();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn completion_sees_settled_tree() {
        let mut controller = controller(&[list(1)]);
        let seen = Rc::new(Cell::new(0.));
        let inner = Rc::clone(&seen);
        controller
            .reload_if_needed(vec![list(3)], move |controller: &Controller<HeadlessBackend>| {
                assert!(!controller.is_reloading());
                inner.set(controller.spot(0).unwrap().view().unwrap().frame.size.y);
            })
            .unwrap();
        controller.layout_if_needed();
        assert_eq!(seen.get(), ROW_HEIGHT * 3.);
    }

    #[test]
    fn reloads_are_queued() {
        let mut controller = controller(&[list(1)]);
        let (first, first_completion) = counter();
        let (second, second_completion) = counter();
        controller.reload_if_needed(vec![list(2)], first_completion).unwrap();
        controller.reload_if_needed(vec![list(5)], second_completion).unwrap();
        assert_eq!(controller.spot(0).unwrap().items().len(), 2);

        controller.layout_if_needed();
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 1);
        assert_eq!(controller.spot(0).unwrap().items().len(), 5);
        assert!(!controller.is_reloading());
    }

    #[test]
    fn reloads_can_be_rejected() {
        let config = Config {
            reload_policy: ReloadPolicy::Reject,
            ..Config::default()
        };
        let tree = SpotTree::new(registry(), config);
        let mut controller = Controller::with_components(tree, &[list(1)], HeadlessBackend::new());
        controller.reload_if_needed(vec![list(2)], |_| {}).unwrap();
        match controller.reload_if_needed(vec![list(3)], |_| {}) {
            Err(Error::ReentrantReload) => {}
            other => panic!("expected ReentrantReload, got {:?}", other),
        }
        controller.layout_if_needed();
        assert_eq!(controller.spot(0).unwrap().items().len(), 2);
        controller.reload_if_needed(vec![list(3)], |_| {}).unwrap();
    }

    #[test]
    fn count_changes_append_and_release() {
        let mut controller = controller(&[list(1), list(1)]);
        let first = controller.spots()[0];
        let second = controller.spots()[1];

        controller.reload_if_needed(vec![list(1), list(1), list(2)], |_| {}).unwrap();
        controller.layout_if_needed();
        assert_eq!(controller.spots().len(), 3);
        assert_eq!(&controller.spots()[..2], &[first, second]);
        assert_eq!(controller.hierarchy().roots(), controller.spots());

        controller.reload_if_needed(vec![list(3)], |_| {}).unwrap();
        controller.layout_if_needed();
        assert_eq!(controller.spots(), &[first]);
        assert!(!controller.tree().contains(second));
        assert!(!controller.hierarchy().contains(second));
        assert_eq!(controller.hierarchy().roots(), &[first]);
        assert_eq!(controller.spot(0).unwrap().items().len(), 3);
    }

    fn titled(title: &str) -> Component {
        Component::new("list").with_items(vec![Item::new(title)])
    }

    fn titles(controller: &Controller<HeadlessBackend>) -> Vec<String> {
        (0..controller.spots().len())
            .map(|index| controller.spot(index).unwrap().items()[0].title.clone())
            .collect()
    }

    #[test]
    fn unknown_kinds_stay_local_across_reloads() {
        let components = vec![titled("A"), Component::new("table"), titled("B")];
        let mut controller = controller(&components);
        let ids = controller.spots().to_vec();
        assert_eq!(titles(&controller), vec!["A", "B"]);

        controller.reload_if_needed(components.clone(), |_| {}).unwrap();
        controller.layout_if_needed();
        assert_eq!(titles(&controller), vec!["A", "B"]);
        assert_eq!(controller.spots(), &ids[..]);
        assert_eq!(controller.tree().len(), 2);

        // the skipped slot becomes known
        controller
            .reload_if_needed(vec![titled("A"), titled("C"), titled("B")], |_| {})
            .unwrap();
        controller.layout_if_needed();
        assert_eq!(titles(&controller), vec!["A", "C", "B"]);
        assert_eq!(controller.spots()[0], ids[0]);
        assert_eq!(controller.spots()[2], ids[1]);
        assert_eq!(controller.hierarchy().roots(), controller.spots());

        // and a known one becomes unknown
        controller
            .reload_if_needed(vec![Component::new("table"), titled("C"), titled("B")], |_| {})
            .unwrap();
        controller.layout_if_needed();
        assert_eq!(titles(&controller), vec!["C", "B"]);
        assert!(!controller.tree().contains(ids[0]));
        assert!(!controller.hierarchy().contains(ids[0]));
        assert_eq!(controller.hierarchy().roots(), controller.spots());
    }

    #[test]
    fn shrinking_past_a_skipped_slot() {
        let mut controller = controller(&[titled("A"), Component::new("table"), titled("B")]);
        controller.reload_if_needed(vec![titled("A"), Component::new("table")], |_| {}).unwrap();
        controller.layout_if_needed();
        assert_eq!(titles(&controller), vec!["A"]);
        assert_eq!(controller.tree().len(), 1);
    }

    #[test]
    fn unchanged_reload_is_silent() {
        let mut controller = controller(&[list(2)]);
        controller.hierarchy_mut().backend_mut().take_ops();
        controller.reload_if_needed(vec![list(2)], |_| {}).unwrap();
        controller.layout_if_needed();
        assert_eq!(controller.hierarchy().backend().ops(), &[][..] as &[Op]);
    }

    #[test]
    fn scrolling_materializes_cells() {
        let mut controller = controller(&[list(10)]);
        assert!(controller.spot(0).unwrap().ui(5).is_none());
        controller.scroll_to(ROW_HEIGHT * 5.);
        controller.layout_if_needed();
        let spot = controller.spot(0).unwrap();
        assert!(spot.ui(0).is_none());
        assert!(spot.ui(5).is_some());
    }

    #[test]
    fn delegates_forward_selection() {
        let mut controller = controller(&[list(2)]);
        let selected = std::sync::Arc::new(parking_lot::Mutex::new(None));
        let inner = std::sync::Arc::clone(&selected);
        controller.set_selection_handler(move |item: &Item, _| *inner.lock() = Some(item.title.clone()));
        let id = controller.spots()[0];
        assert!(controller.delegate(id).unwrap().did_select_item(0));
        assert_eq!(selected.lock().as_deref(), Some("Item 1"));
    }
}
