//! Fixtures shared by unit tests.

use crate::component::{Component, Kind};
use crate::config::Config;
use crate::geometry::Size;
use crate::item::Item;
use crate::registry::Registry;
use crate::tree::SpotTree;
use crate::view::ItemView;
use cgmath::Vector2;
use core::any::Any;

pub(crate) const ROW_HEIGHT: f64 = 120.;

/// A row view with a fixed preferred height.
#[derive(Debug, Default)]
pub(crate) struct RowView {
    pub(crate) configured: Vec<String>,
}

impl ItemView for RowView {
    fn preferred_view_size(&self) -> Size {
        Vector2::new(0., ROW_HEIGHT)
    }

    fn configure(&mut self, item: &mut Item) {
        self.configured.push(item.title.clone());
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub(crate) fn row_view() -> Box<dyn ItemView> {
    Box::new(RowView::default())
}

pub(crate) fn registry() -> Registry {
    let mut registry = Registry::default();
    registry.register_default_view(row_view);
    registry
}

pub(crate) fn tree() -> SpotTree {
    SpotTree::new(registry(), Config::default())
}

pub(crate) fn tree_with_offset(height_offset: f64) -> SpotTree {
    let config = Config {
        height_offset,
        ..Config::default()
    };
    SpotTree::new(registry(), config)
}

/// `Item 1` ..= `Item n`
pub(crate) fn items(n: usize) -> Vec<Item> {
    (1..=n).map(|i| Item::new(format!("Item {}", i))).collect()
}

pub(crate) fn list(n: usize) -> Component {
    Component::new(Kind::List.as_str()).with_items(items(n))
}

/// A grid with one composite item per entry of `lists`, each hosting a list of that many items.
pub(crate) fn composite_grid(span: f64, lists: &[usize]) -> Component {
    let mut grid = Component::new(Kind::Grid.as_str()).with_span(span);
    grid.add_children(lists.iter().map(|&n| list(n)));
    grid
}
