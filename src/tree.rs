use crate::component::{Component, Kind};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::geometry::is_unset;
use crate::item::Item;
use crate::patch::Patch;
use crate::registry::Registry;
use crate::spot::{CompositeSpot, Spot, SpotId};
use std::collections::HashMap;
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Owns every spot, top-level and composite, and manages their lifecycle.
///
/// Spots are stored flat and addressed by [`SpotId`]. A spot owns its composite children
/// through its composite list; the reverse relation (child → parent) is a lookup table that
/// never keeps anything alive.
#[derive(Debug)]
pub struct SpotTree {
    spots: HashMap<SpotId, Spot>,
    /// Parent lookup for composite children.
    pub(crate) parents: HashMap<SpotId, SpotId>,
    registry: Registry,
    config: Config,
    pub(crate) patches: VecDeque<Patch>,
    needs_layout: bool,
}

impl Default for SpotTree {
    fn default() -> Self {
        SpotTree::new(Registry::default(), Config::default())
    }
}

impl SpotTree {
    pub fn new(registry: Registry, config: Config) -> SpotTree {
        SpotTree {
            spots: HashMap::new(),
            parents: HashMap::new(),
            registry,
            config,
            patches: VecDeque::new(),
            needs_layout: false,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn spot(&self, id: SpotId) -> Option<&Spot> {
        self.spots.get(&id)
    }

    pub(crate) fn spot_mut(&mut self, id: SpotId) -> Result<&mut Spot> {
        self.spots.get_mut(&id).ok_or(Error::NoSuchSpot(id))
    }

    pub fn contains(&self, id: SpotId) -> bool {
        self.spots.contains_key(&id)
    }

    /// Number of spots, composite children included.
    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    /// The spot a composite child is mounted in.
    pub fn parent_of(&self, id: SpotId) -> Option<SpotId> {
        self.parents.get(&id).copied()
    }

    /// Resolves the back-reference of a composite spot.
    pub fn parent_spot(&self, composite: &CompositeSpot) -> Option<&Spot> {
        self.parent_of(composite.spot).and_then(|parent| self.spot(parent))
    }

    /// Returns an iterator over queued patches.
    ///
    /// Does not drain the queue immediately.
    /// Calling `next` will always remove a patch from the queue.
    pub fn patches(&mut self) -> impl Iterator<Item = Patch> + '_ {
        struct PatchIterator<'a>(&'a mut SpotTree);
        impl<'a> Iterator for PatchIterator<'a> {
            type Item = Patch;
            fn next(&mut self) -> Option<Patch> {
                self.0.patches.pop_front()
            }
        }

        PatchIterator(self)
    }

    pub(crate) fn push_patch(&mut self, patch: Patch) {
        self.patches.push_back(patch);
    }

    /// True if spots changed since the last layout pass.
    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    pub(crate) fn set_needs_layout(&mut self, needs_layout: bool) {
        self.needs_layout = needs_layout;
    }

    /// Creates a spot for a component, including its composite subtree.
    pub(crate) fn add_spot(&mut self, component: &Component) -> Result<SpotId> {
        let kind = self.registry.spot_kind(&component.kind)?;
        let id = SpotId::new();
        let spot = self.build_spot(id, kind, component.clone());
        self.spots.insert(id, spot);
        self.resolve_composites(id)?;
        self.needs_layout = true;
        trace!(spot = %id, kind = %kind, "added spot");
        Ok(id)
    }

    pub(crate) fn build_spot(&self, id: SpotId, kind: Kind, mut component: Component) -> Spot {
        for item in &mut component.items {
            self.measure_item(kind, item);
        }
        Spot::new(id, kind, component, self.config.item_height(kind))
    }

    pub(crate) fn insert_spot(&mut self, spot: Spot) {
        self.spots.insert(spot.id(), spot);
    }

    /// Removes a spot and its composite subtree.
    ///
    /// Does *not* remove the spot from its parent's composite list.
    pub(crate) fn remove_spot(&mut self, id: SpotId) {
        let spot = match self.spots.remove(&id) {
            Some(spot) => spot,
            None => return,
        };
        self.parents.remove(&id);
        if spot.presented.is_some() {
            self.patches.push_back(Patch::Remove(id));
        }
        for composite in spot.composite_spots {
            self.remove_spot(composite.spot);
        }
        self.needs_layout = true;
        trace!(spot = %id, "removed spot");
    }

    /// Removes a top-level spot.
    pub fn release(&mut self, id: SpotId) {
        self.remove_spot(id);
    }

    /// Measures the height of an item that has no explicit size.
    ///
    /// Composite items are sized during layout, from their child spots.
    pub(crate) fn measure_item(&self, kind: Kind, item: &mut Item) {
        if item.is_composite() || !is_unset(item.size) {
            return;
        }
        let preferred = match self.registry.make_view(&item.kind) {
            Ok(mut view) => {
                view.configure(item);
                view.preferred_view_size()
            }
            Err(err) => {
                trace!(kind = %item.kind, "measuring with fallback height: {}", err);
                (0., 0.).into()
            }
        };
        let mut height = if preferred.y > 0. {
            preferred.y
        } else {
            self.config.item_height(kind)
        };
        if kind == Kind::List {
            height += self.config.height_offset;
        }
        item.size = (preferred.x.max(0.), height).into();
    }

    /// Appends an item.
    pub fn append(&mut self, id: SpotId, item: Item) -> Result<()> {
        let len = self.spot(id).ok_or(Error::NoSuchSpot(id))?.items().len();
        self.insert(id, item, len)
    }

    /// Prepends an item.
    pub fn prepend(&mut self, id: SpotId, item: Item) -> Result<()> {
        self.insert(id, item, 0)
    }

    /// Inserts an item at `index`; `index == len` appends.
    pub fn insert(&mut self, id: SpotId, item: Item, index: usize) -> Result<()> {
        self.insert_item(id, item, index)?;
        self.resolve_composites(id)?;
        Ok(())
    }

    /// Removes the item at `index`.
    pub fn remove(&mut self, id: SpotId, index: usize) -> Result<Item> {
        let item = self.remove_item(id, index)?;
        self.resolve_composites(id)?;
        Ok(item)
    }

    /// Replaces the item at `index`.
    pub fn update(&mut self, id: SpotId, item: Item, index: usize) -> Result<()> {
        self.update_item(id, item, index)?;
        self.resolve_composites(id)?;
        Ok(())
    }

    pub(crate) fn insert_item(&mut self, id: SpotId, mut item: Item, index: usize) -> Result<()> {
        let kind = self.spot(id).ok_or(Error::NoSuchSpot(id))?.kind();
        self.measure_item(kind, &mut item);

        let spot = self.spot_mut(id)?;
        let len = spot.component.items.len();
        if index > len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        spot.component.items.insert(index, item);
        // cells from the insertion point on now show other items
        drop(spot.cells.split_off(&index));
        self.needs_layout = true;
        debug!(spot = %id, index, "inserted item");
        Ok(())
    }

    pub(crate) fn remove_item(&mut self, id: SpotId, index: usize) -> Result<Item> {
        let spot = self.spot_mut(id)?;
        let len = spot.component.items.len();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        let item = spot.component.items.remove(index);
        drop(spot.cells.split_off(&index));
        self.needs_layout = true;
        debug!(spot = %id, index, "removed item");
        Ok(item)
    }

    pub(crate) fn update_item(&mut self, id: SpotId, mut item: Item, index: usize) -> Result<()> {
        let kind = self.spot(id).ok_or(Error::NoSuchSpot(id))?.kind();
        self.measure_item(kind, &mut item);

        let spot = self.spot_mut(id)?;
        let len = spot.component.items.len();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        spot.component.items[index] = item;
        spot.cells.remove(&index);
        self.needs_layout = true;
        trace!(spot = %id, index, "updated item");
        Ok(())
    }

    /// Drops the items from `len` on.
    pub(crate) fn truncate_items(&mut self, id: SpotId, len: usize) -> Result<()> {
        let spot = self.spot_mut(id)?;
        spot.component.items.truncate(len);
        drop(spot.cells.split_off(&len));
        self.needs_layout = true;
        Ok(())
    }
}
