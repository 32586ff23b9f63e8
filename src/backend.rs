//! Traits for backends.

use crate::patch::NativeView;
use core::fmt;

/// A backend implementation: the platform toolkit that owns the physical scroll views.
pub trait Backend {
    /// A reference to a view in the backend.
    type ViewRef;

    /// Error type.
    type Error: fmt::Debug;

    /// Creates a new view.
    fn new_view(&mut self, view: NativeView) -> Result<Self::ViewRef, Self::Error>;

    /// Updates the view.
    fn update(&mut self, view: &mut Self::ViewRef, native: NativeView) -> Result<(), Self::Error>;

    /// Sets the subviews of the content view of the cell at `index`.
    fn set_subviews<'a>(
        &mut self,
        view: &mut Self::ViewRef,
        index: usize,
        subviews: Vec<&'a Self::ViewRef>,
    ) -> Result<(), Self::Error>;

    /// Sets the ordered top-level views.
    fn set_roots<'a>(&mut self, roots: Vec<&'a Self::ViewRef>) -> Result<(), Self::Error>;

    /// Destroys a view.
    fn remove_view(&mut self, view: Self::ViewRef) -> Result<(), Self::Error>;
}
