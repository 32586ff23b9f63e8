//! Reconciliation of spots against new components.

use crate::component::{Component, Kind};
use crate::error::{Error, Result};
use crate::geometry::is_unset;
use crate::item::Item;
use crate::patch::Patch;
use crate::spot::{CompositeSpot, SpotId};
use crate::tree::SpotTree;
use std::mem;
use tracing::{debug, trace, warn};

/// What a reload did to a spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReloadOutcome {
    /// Items (or composite children) were mutated in place.
    pub updated: bool,
    /// The spot was discarded and rebuilt because its kind changed.
    pub replaced: bool,
}

impl SpotTree {
    /// Reconciles a spot with a new component.
    ///
    /// - Different variant: the spot is rebuilt from scratch in the same slot (same id).
    /// - Same variant: items are compared index by index; differing items are updated, trailing
    ///   items removed or appended. This is a positional diff: a moved item counts as updated.
    ///
    /// Either way composite children are resolved again, recursively, and the component's
    /// remaining properties (kind, span, size, header, title, meta) are taken over. Kinds are
    /// compared by the variant they are registered for, so two names registered for the same
    /// variant reload in place.
    ///
    /// Reloading to an unregistered kind fails with [`Error::UnknownKind`] and leaves the spot
    /// as it was.
    pub fn reload(&mut self, id: SpotId, component: &Component) -> Result<ReloadOutcome> {
        let current = self.spot(id).ok_or(Error::NoSuchSpot(id))?.kind();
        if !self.is_variant(&component.kind, current) {
            self.replace_spot(id, component)?;
            return Ok(ReloadOutcome {
                updated: false,
                replaced: true,
            });
        }

        let mut updated = self.diff_items(id, &component.items)?;
        updated |= self.resolve_composites(id)?;
        self.spot_mut(id)?.apply_properties(component);

        trace!(spot = %id, updated, "reloaded spot");
        Ok(ReloadOutcome {
            updated,
            replaced: false,
        })
    }

    /// Replaces a spot with a new one of another kind, keeping its id.
    ///
    /// The spot must exist.
    fn replace_spot(&mut self, id: SpotId, component: &Component) -> Result<()> {
        let kind = self.registry().spot_kind(&component.kind)?;
        let spot = self.spot(id).ok_or(Error::NoSuchSpot(id))?;
        let old_kind = spot.kind();
        let presented = spot.presented.is_some();
        let children: Vec<SpotId> = spot.composite_spots().iter().map(|c| c.spot()).collect();

        for child in children {
            self.remove_spot(child);
        }

        let mut spot = self.build_spot(id, kind, component.clone());
        if presented {
            spot.render();
            spot.presented = spot.view;
            if let Some(native) = spot.native_view() {
                self.push_patch(Patch::Replace(id, native));
            }
        }
        self.insert_spot(spot);
        self.resolve_composites(id)?;
        self.set_needs_layout(true);

        debug!(spot = %id, from = %old_kind, to = %kind, "replaced spot");
        Ok(())
    }

    /// True if `kind` is registered for `variant`.
    fn is_variant(&self, kind: &str, variant: Kind) -> bool {
        self.registry().spot_kind(kind).ok() == Some(variant)
    }

    /// Positional item diff. Returns true if anything changed.
    ///
    /// Measured sizes do not count as changes, sizes given by the new items do.
    fn diff_items(&mut self, id: SpotId, items: &[Item]) -> Result<bool> {
        let old_len = self.spot(id).ok_or(Error::NoSuchSpot(id))?.items().len();
        let shared = old_len.min(items.len());
        let mut updated = false;

        for (index, item) in items.iter().enumerate().take(shared) {
            let changed = match self.spot(id).and_then(|spot| spot.item(index)) {
                Some(current) => current != item || (!is_unset(item.size) && current.size != item.size),
                None => true,
            };
            if changed {
                self.update_item(id, item.clone(), index)?;
                updated = true;
            }
        }

        if items.len() < old_len {
            self.truncate_items(id, items.len())?;
            updated = true;
        } else {
            for (index, item) in items.iter().enumerate().skip(old_len) {
                self.insert_item(id, item.clone(), index)?;
                updated = true;
            }
        }

        Ok(updated)
    }

    /// Maps every component nested in the spot's composite items to a composite spot, in item
    /// order.
    ///
    /// Existing composite spots are matched by relative order; one whose kind still matches is
    /// reloaded in place, anything else is rebuilt. Leftovers are released. Returns true if the
    /// composite list or any child changed.
    pub(crate) fn resolve_composites(&mut self, id: SpotId) -> Result<bool> {
        let spot = self.spot_mut(id)?;
        let wanted: Vec<(usize, Component)> = spot
            .component
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.is_composite())
            .flat_map(|(index, item)| item.children.iter().map(move |child| (index, child.clone())))
            .collect();
        let existing = mem::take(&mut spot.composite_spots);

        let mut existing = existing.into_iter();
        let mut resolved = Vec::with_capacity(wanted.len());
        let mut changed = false;

        for (index, child) in wanted {
            let kind = match self.registry().spot_kind(&child.kind) {
                Ok(kind) => kind,
                Err(err) => {
                    warn!(spot = %id, index, "skipping composite child: {}", err);
                    continue;
                }
            };
            let reused = match existing.next() {
                Some(composite) => {
                    let same_kind = self
                        .spot(composite.spot)
                        .map_or(false, |spot| spot.kind() == kind);
                    if same_kind {
                        match self.reload(composite.spot, &child) {
                            Ok(outcome) => changed |= outcome.updated || composite.index != index,
                            Err(err) => warn!(spot = %composite.spot, "keeping composite child: {}", err),
                        }
                        Some(composite.spot)
                    } else {
                        self.remove_spot(composite.spot);
                        changed = true;
                        None
                    }
                }
                None => None,
            };

            let child_id = match reused {
                Some(child_id) => child_id,
                None => match self.add_spot(&child) {
                    Ok(child_id) => {
                        changed = true;
                        child_id
                    }
                    Err(err) => {
                        warn!(spot = %id, index, "skipping composite child: {}", err);
                        continue;
                    }
                },
            };

            self.parents.insert(child_id, id);
            resolved.push(CompositeSpot {
                spot: child_id,
                parent: id,
                index,
            });
        }

        for composite in existing {
            self.remove_spot(composite.spot);
            changed = true;
        }

        self.spot_mut(id)?.composite_spots = resolved;
        Ok(changed)
    }
}
