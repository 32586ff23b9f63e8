use crate::backend::Backend;
use crate::error::PatchError;
use crate::patch::{NativeView, Patch};
use crate::spot::SpotId;
use std::collections::{BTreeMap, HashMap};

struct Node<R> {
    view: NativeView,
    backing_ref: R,
    superview: Option<SpotId>,
    /// Mounted child spots by cell index.
    mounts: BTreeMap<usize, Vec<SpotId>>,
}

/// The physical view hierarchy; keeps a backend in sync with the spot tree.
pub struct ViewHierarchy<B: Backend> {
    nodes: HashMap<SpotId, Node<B::ViewRef>>,
    roots: Vec<SpotId>,
    backend: B,
}

impl<B: Backend> ViewHierarchy<B> {
    pub fn new(backend: B) -> ViewHierarchy<B> {
        ViewHierarchy {
            nodes: HashMap::new(),
            roots: Vec::new(),
            backend,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn contains(&self, id: SpotId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[SpotId] {
        &self.roots
    }

    /// The last native view state applied for a spot.
    pub fn native_view(&self, id: SpotId) -> Option<&NativeView> {
        self.nodes.get(&id).map(|node| &node.view)
    }

    pub fn backing_ref(&self, id: SpotId) -> Option<&B::ViewRef> {
        self.nodes.get(&id).map(|node| &node.backing_ref)
    }

    /// The spot whose cell hosts this view.
    pub fn superview(&self, id: SpotId) -> Option<SpotId> {
        self.nodes.get(&id).and_then(|node| node.superview)
    }

    pub fn mounted(&self, id: SpotId, index: usize) -> Option<&[SpotId]> {
        self.nodes
            .get(&id)
            .and_then(|node| node.mounts.get(&index))
            .map(|mounted| &mounted[..])
    }

    /// Applies a patch.
    pub fn patch(&mut self, patch: Patch) -> Result<(), PatchError<B::Error>> {
        match patch {
            Patch::SetRoots(roots) => self.set_roots(roots),
            Patch::Update(id, view) => self.update_view(id, view),
            Patch::Replace(id, view) => self.replace_view(id, view),
            Patch::Mount(id, index, subviews) => self.mount(id, index, subviews),
            Patch::Remove(id) => self.remove_view(id),
        }
    }

    fn set_roots(&mut self, roots: Vec<SpotId>) -> Result<(), PatchError<B::Error>> {
        let mut root_refs = Vec::with_capacity(roots.len());
        for id in &roots {
            match self.nodes.get(id) {
                Some(node) => root_refs.push(&node.backing_ref),
                None => return Err(PatchError::NoSuchView(*id)),
            }
        }
        self.backend
            .set_roots(root_refs)
            .map_err(PatchError::Backend)?;
        self.roots = roots;
        Ok(())
    }

    /// Updates or adds a view.
    fn update_view(&mut self, id: SpotId, view: NativeView) -> Result<(), PatchError<B::Error>> {
        if let Some(node) = self.nodes.get_mut(&id) {
            self.backend
                .update(&mut node.backing_ref, view)
                .map_err(PatchError::Backend)?;
            node.view = view;
        } else {
            let backing_ref = self.backend.new_view(view).map_err(PatchError::Backend)?;
            self.nodes.insert(
                id,
                Node {
                    view,
                    backing_ref,
                    superview: None,
                    mounts: BTreeMap::new(),
                },
            );
        }
        Ok(())
    }

    /// Destroys the backing view and creates a new one; the spot keeps its place.
    fn replace_view(&mut self, id: SpotId, view: NativeView) -> Result<(), PatchError<B::Error>> {
        let superview = match self.nodes.remove(&id) {
            Some(node) => {
                self.backend
                    .remove_view(node.backing_ref)
                    .map_err(PatchError::Backend)?;
                node.superview
            }
            None => None,
        };
        let backing_ref = self.backend.new_view(view).map_err(PatchError::Backend)?;
        self.nodes.insert(
            id,
            Node {
                view,
                backing_ref,
                superview,
                mounts: BTreeMap::new(),
            },
        );

        // the new backing view has to be mounted again wherever the old one was
        if let Some(superview) = superview {
            let index = self.nodes.get(&superview).and_then(|node| {
                node.mounts
                    .iter()
                    .find(|(_, subviews)| subviews.contains(&id))
                    .map(|(index, subviews)| (*index, subviews.clone()))
            });
            if let Some((index, subviews)) = index {
                self.mount(superview, index, subviews)?;
            }
        } else if self.roots.contains(&id) {
            let roots = self.roots.clone();
            self.set_roots(roots)?;
        }
        Ok(())
    }

    /// Removes a single view. Subviews are removed by their own patches.
    fn remove_view(&mut self, id: SpotId) -> Result<(), PatchError<B::Error>> {
        let node = match self.nodes.remove(&id) {
            Some(node) => node,
            None => return Err(PatchError::NoSuchView(id)),
        };
        if let Some(superview) = node.superview.and_then(|id| self.nodes.get_mut(&id)) {
            for subviews in superview.mounts.values_mut() {
                subviews.retain(|subview| *subview != id);
            }
        }
        self.roots.retain(|root| *root != id);
        self.backend
            .remove_view(node.backing_ref)
            .map_err(PatchError::Backend)
    }

    fn mount(
        &mut self,
        id: SpotId,
        index: usize,
        subviews: Vec<SpotId>,
    ) -> Result<(), PatchError<B::Error>> {
        // set the superview property of all subviews
        for subview in &subviews {
            match self.nodes.get_mut(subview) {
                Some(node) => node.superview = Some(id),
                None => return Err(PatchError::NoSuchView(*subview)),
            }
        }

        // remove the superview node because we need to alias self.nodes when sending a message to
        // the backend
        let mut superview_node = match self.nodes.remove(&id) {
            Some(node) => node,
            None => return Err(PatchError::NoSuchView(id)),
        };

        let result = {
            let mut subview_refs = Vec::with_capacity(subviews.len());
            for subview in &subviews {
                if let Some(node) = self.nodes.get(subview) {
                    subview_refs.push(&node.backing_ref);
                }
            }
            self.backend
                .set_subviews(&mut superview_node.backing_ref, index, subview_refs)
                .map_err(PatchError::Backend)
        };

        if result.is_ok() {
            superview_node.mounts.insert(index, subviews);
        }
        self.nodes.insert(id, superview_node);
        result
    }
}
