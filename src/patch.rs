use crate::component::Kind;
use crate::geometry::{Rect, Size};
use crate::spot::SpotId;

/// The physical view state of a spot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NativeView {
    ScrollView {
        kind: Kind,
        frame: Rect,
        content_size: Size,
    },
}

/// Changes to the physical view hierarchy.
///
/// Queued by the [`SpotTree`](crate::SpotTree) while reconciling and laying out, and applied to
/// a backend by a [`ViewHierarchy`](crate::ViewHierarchy).
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    /// Sets the ordered top-level views.
    SetRoots(Vec<SpotId>),
    /// Updates or creates a view.
    Update(SpotId, NativeView),
    /// Deletes and re-creates a view; the spot was replaced by one of another kind.
    Replace(SpotId, NativeView),
    /// Mounts child spot views in the content view of a cell.
    ///
    /// `(spot, item index, children)`
    Mount(SpotId, usize, Vec<SpotId>),
    /// Removes a view.
    Remove(SpotId),
}
