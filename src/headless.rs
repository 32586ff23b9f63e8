//! An in-memory backend.

use crate::backend::Backend;
use crate::patch::NativeView;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Reference to a [`HeadlessBackend`] view.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct HeadlessRef(usize);

impl HeadlessRef {
    pub fn id(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeadlessError {
    #[error("view {0} has been removed")]
    Removed(usize),
}

/// A view held by a [`HeadlessBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessView {
    pub native: NativeView,
    /// Mounted subviews by cell index.
    pub subviews: BTreeMap<usize, Vec<usize>>,
}

/// Calls received by a [`HeadlessBackend`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    New(usize),
    Update(usize),
    SetSubviews(usize, usize, Vec<usize>),
    SetRoots(Vec<usize>),
    Remove(usize),
}

/// A backend that keeps views in memory and records every call.
///
/// Useful for tests and for running the composition core offscreen.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    views: HashMap<usize, HeadlessView>,
    roots: Vec<usize>,
    next_id: usize,
    ops: Vec<Op>,
}

impl HeadlessBackend {
    pub fn new() -> HeadlessBackend {
        HeadlessBackend::default()
    }

    pub fn view(&self, id: usize) -> Option<&HeadlessView> {
        self.views.get(&id)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Takes the recorded calls.
    pub fn take_ops(&mut self) -> Vec<Op> {
        std::mem::take(&mut self.ops)
    }

    fn view_mut(&mut self, id: usize) -> Result<&mut HeadlessView, HeadlessError> {
        self.views.get_mut(&id).ok_or(HeadlessError::Removed(id))
    }
}

impl Backend for HeadlessBackend {
    type ViewRef = HeadlessRef;
    type Error = HeadlessError;

    fn new_view(&mut self, native: NativeView) -> Result<HeadlessRef, HeadlessError> {
        let id = self.next_id;
        self.next_id += 1;
        self.views.insert(
            id,
            HeadlessView {
                native,
                subviews: BTreeMap::new(),
            },
        );
        self.ops.push(Op::New(id));
        Ok(HeadlessRef(id))
    }

    fn update(&mut self, view: &mut HeadlessRef, native: NativeView) -> Result<(), HeadlessError> {
        self.view_mut(view.0)?.native = native;
        self.ops.push(Op::Update(view.0));
        Ok(())
    }

    fn set_subviews<'a>(
        &mut self,
        view: &mut HeadlessRef,
        index: usize,
        subviews: Vec<&'a HeadlessRef>,
    ) -> Result<(), HeadlessError> {
        let ids: Vec<usize> = subviews.iter().map(|subview| subview.0).collect();
        self.view_mut(view.0)?.subviews.insert(index, ids.clone());
        self.ops.push(Op::SetSubviews(view.0, index, ids));
        Ok(())
    }

    fn set_roots<'a>(&mut self, roots: Vec<&'a HeadlessRef>) -> Result<(), HeadlessError> {
        self.roots = roots.iter().map(|root| root.0).collect();
        self.ops.push(Op::SetRoots(self.roots.clone()));
        Ok(())
    }

    fn remove_view(&mut self, view: HeadlessRef) -> Result<(), HeadlessError> {
        self.views.remove(&view.0).ok_or(HeadlessError::Removed(view.0))?;
        self.roots.retain(|&root| root != view.0);
        for other in self.views.values_mut() {
            for subviews in other.subviews.values_mut() {
                subviews.retain(|&subview| subview != view.0);
            }
        }
        self.ops.push(Op::Remove(view.0));
        Ok(())
    }
}
