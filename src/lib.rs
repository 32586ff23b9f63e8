//! Data-driven composition of list, grid and carousel views.
//!
//! Component descriptors are parsed into a [`SpotTree`] of spots; a [`Controller`] reconciles
//! the tree against new components and lays it out, and a [`ViewHierarchy`] applies the
//! resulting patches to a platform [`Backend`].

pub mod backend;
mod component;
mod config;
mod controller;
mod delegate;
mod error;
mod geometry;
pub mod headless;
mod hierarchy;
mod item;
mod layout;
mod parser;
mod patch;
mod reconcile;
mod registry;
mod spot;
#[cfg(test)]
mod test_utils;
mod tree;
mod view;

pub use backend::Backend;
pub use component::{Component, Kind, HEADER_HEIGHT_KEY};
pub use config::{Config, ReloadPolicy};
pub use controller::{Completion, Controller};
pub use delegate::{Delegate, SelectionHandler};
pub use error::{Error, PatchError, Result};
pub use geometry::{Rect, Size};
pub use headless::HeadlessBackend;
pub use hierarchy::ViewHierarchy;
pub use item::{Item, COMPOSITE_KIND};
pub use parser::Parser;
pub use patch::{NativeView, Patch};
pub use reconcile::ReloadOutcome;
pub use registry::{HeaderConstructor, Registry, ViewConstructor};
pub use spot::{CompositeSpot, ScrollView, Spot, SpotId};
pub use tree::SpotTree;
pub use view::{CompositeView, ContentView, HeaderView, ItemView, RenderedView};
