use crate::component::Component;
use crate::spot::SpotId;
use crate::tree::SpotTree;
use tracing::warn;

/// Builds spots from component descriptors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser;

impl Parser {
    /// Creates one top-level spot per component, with its composite subtree.
    ///
    /// Components of an unregistered kind are skipped (and logged); their siblings are still
    /// parsed. Nothing is rendered.
    pub fn parse(tree: &mut SpotTree, components: &[Component]) -> Vec<SpotId> {
        Parser::parse_slots(tree, components)
            .into_iter()
            .flatten()
            .collect()
    }

    /// Like [`parse`](Parser::parse), but keeps one slot per component; skipped components
    /// leave `None`.
    pub fn parse_slots(tree: &mut SpotTree, components: &[Component]) -> Vec<Option<SpotId>> {
        components
            .iter()
            .enumerate()
            .map(|(index, component)| match tree.add_spot(component) {
                Ok(id) => Some(id),
                Err(err) => {
                    warn!(index, "skipping component: {}", err);
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Kind;
    use crate::test_utils::{composite_grid, list, tree};

    #[test]
    fn preserves_arity() {
        let mut tree = tree();
        let components = vec![list(2), composite_grid(2., &[2, 2]), list(0)];
        let spots = Parser::parse(&mut tree, &components);
        assert_eq!(spots.len(), components.len());
        for (id, component) in spots.iter().zip(components.iter()) {
            assert_eq!(tree.spot(*id).unwrap().component().kind, component.kind);
        }
    }

    #[test]
    fn skips_unknown_kinds() {
        let mut tree = tree();
        let components = vec![list(1), Component::new("table"), list(3)];
        let spots = Parser::parse(&mut tree, &components);
        assert_eq!(spots.len(), 2);
        assert_eq!(tree.spot(spots[1]).unwrap().items().len(), 3);

        let slots = Parser::parse_slots(&mut tree, &components);
        assert_eq!(slots.len(), 3);
        assert!(slots[0].is_some());
        assert!(slots[1].is_none());
        assert_eq!(tree.spot(slots[2].unwrap()).unwrap().items().len(), 3);
    }

    #[test]
    fn composite_children_become_spots() {
        let mut tree = tree();
        let mut grid = Component::new(Kind::Grid.as_str()).with_span(2.);
        grid.add_children(vec![
            Component::new(Kind::List.as_str()).with_items(vec![
                crate::Item::new("foo"),
                crate::Item::new("bar"),
            ]),
            Component::new(Kind::List.as_str()).with_items(vec![
                crate::Item::new("baz"),
                crate::Item::new("bal"),
            ]),
        ]);
        let spots = Parser::parse(&mut tree, &[grid]);
        let spot = tree.spot(spots[0]).unwrap();

        assert_eq!(spot.items().len(), 2);
        assert_eq!(spot.composite_spots().len(), 2);
        assert_eq!(tree.len(), 3);

        let titles = |index: usize| -> Vec<String> {
            let child = tree.spot(spot.composite_spots()[index].spot()).unwrap();
            assert_eq!(child.kind(), Kind::List);
            child.items().iter().map(|item| item.title.clone()).collect()
        };
        assert_eq!(titles(0), vec!["foo", "bar"]);
        assert_eq!(titles(1), vec!["baz", "bal"]);

        for (index, composite) in spot.composite_spots().iter().enumerate() {
            assert_eq!(composite.index(), index);
            assert_eq!(composite.parent(), spot.id());
            assert_eq!(
                tree.parent_spot(composite).unwrap().component(),
                spot.component()
            );
        }
    }

    #[test]
    fn unknown_composite_child_is_skipped() {
        let mut tree = tree();
        let mut grid = Component::new(Kind::Grid.as_str());
        grid.add_children(vec![list(1), Component::new("table"), list(2)]);
        let spots = Parser::parse(&mut tree, &[grid]);
        let spot = tree.spot(spots[0]).unwrap();

        assert_eq!(spot.items().len(), 3);
        let indices: Vec<usize> = spot.composite_spots().iter().map(|c| c.index()).collect();
        assert_eq!(indices, vec![0, 2]);
    }
}
