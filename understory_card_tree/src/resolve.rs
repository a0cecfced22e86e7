// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate resolution and ancestry walks over a [`CardMap`].
//!
//! Every walk is iterative and bounded by the number of cards in the map: an
//! acyclic parent chain can never be longer than that, so exceeding the bound
//! means the chain loops and the walk reports [`CanvasError::CycleDetected`].

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::error::CanvasError;
use crate::types::{Card, CardId, CardMap, Placement};

/// Ancestor list returned by [`ancestors`]; most trees are shallow.
pub type AncestorPath = SmallVec<[CardId; 8]>;

/// Absolute canvas position of `card`'s top-left corner.
///
/// Roots are returned unchanged. Nested cards add their offset to the parent's
/// absolute position, all the way up the chain. A parent missing from `cards`
/// ends the walk early, and the dangling card's offset is read as absolute.
///
/// `card` does not need to be stored in `cards`, which lets callers resolve a
/// hypothetical card (for example one mid-drag).
pub fn absolute_position(card: &Card, cards: &CardMap) -> Result<Point, CanvasError> {
    let mut acc = Vec2::ZERO;
    let mut current = card;
    for _ in 0..=cards.len() {
        match current.placement {
            Placement::Root { origin } => return Ok(origin + acc),
            Placement::Nested { parent, offset } => {
                acc += offset;
                match cards.get(&parent) {
                    Some(p) => current = p,
                    None => return Ok(acc.to_point()),
                }
            }
        }
    }
    tracing::warn!(card = %card.id, "cycle while resolving absolute position");
    Err(CanvasError::CycleDetected(card.id))
}

/// Parents of `id`, nearest first. Stops at the first missing parent.
pub fn ancestors(id: CardId, cards: &CardMap) -> Result<AncestorPath, CanvasError> {
    let mut path = AncestorPath::new();
    let mut current = cards.get(&id).and_then(Card::parent_id);
    while let Some(parent) = current {
        if path.len() >= cards.len() {
            tracing::warn!(card = %id, "cycle while walking ancestors");
            return Err(CanvasError::CycleDetected(id));
        }
        path.push(parent);
        current = cards.get(&parent).and_then(Card::parent_id);
    }
    Ok(path)
}

/// Returns true if `ancestor` appears on the parent chain of `node`.
///
/// A card is not its own ancestor.
pub fn is_ancestor_of(ancestor: CardId, node: CardId, cards: &CardMap) -> Result<bool, CanvasError> {
    let mut current = cards.get(&node).and_then(Card::parent_id);
    let mut hops = 0;
    while let Some(parent) = current {
        if parent == ancestor {
            return Ok(true);
        }
        hops += 1;
        if hops > cards.len() {
            tracing::warn!(card = %node, "cycle while checking ancestry");
            return Err(CanvasError::CycleDetected(node));
        }
        current = cards.get(&parent).and_then(Card::parent_id);
    }
    Ok(false)
}

/// Nesting depth of `id`: zero for roots.
pub fn depth(id: CardId, cards: &CardMap) -> Result<usize, CanvasError> {
    ancestors(id, cards).map(|path| path.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{string::String, vec::Vec};
    use kurbo::Size;

    fn card(id: u64, placement: Placement) -> Card {
        Card {
            id: CardId::new(id),
            title: String::new(),
            placement,
            size: Size::new(200.0, 120.0),
            child_ids: Vec::new(),
            z_index: 0,
            is_editing: false,
        }
    }

    fn nested(id: u64, parent: u64, x: f64, y: f64) -> Card {
        card(
            id,
            Placement::Nested {
                parent: CardId::new(parent),
                offset: Vec2::new(x, y),
            },
        )
    }

    fn map(cards: impl IntoIterator<Item = Card>) -> CardMap {
        cards.into_iter().map(|c| (c.id, c)).collect()
    }

    #[test]
    fn root_position_is_absolute() {
        let root = card(
            1,
            Placement::Root {
                origin: Point::new(42.0, -7.0),
            },
        );
        let cards = map([root.clone()]);
        assert_eq!(absolute_position(&root, &cards), Ok(Point::new(42.0, -7.0)));
    }

    #[test]
    fn composes_through_two_levels() {
        let cards = map([
            card(
                1,
                Placement::Root {
                    origin: Point::new(10.0, 10.0),
                },
            ),
            nested(2, 1, 5.0, 5.0),
            nested(3, 2, 3.0, 3.0),
        ]);
        let child = &cards[&CardId::new(3)];
        assert_eq!(absolute_position(child, &cards), Ok(Point::new(18.0, 18.0)));
    }

    #[test]
    fn dangling_parent_reads_offset_as_absolute() {
        let orphan = nested(2, 99, 12.0, 34.0);
        let cards = map([orphan.clone()]);
        assert_eq!(absolute_position(&orphan, &cards), Ok(Point::new(12.0, 34.0)));
    }

    #[test]
    fn cycle_is_reported_not_looped() {
        let cards = map([nested(1, 2, 1.0, 1.0), nested(2, 1, 1.0, 1.0)]);
        let a = &cards[&CardId::new(1)];
        assert_eq!(
            absolute_position(a, &cards),
            Err(CanvasError::CycleDetected(CardId::new(1)))
        );
        assert_eq!(
            ancestors(CardId::new(1), &cards),
            Err(CanvasError::CycleDetected(CardId::new(1)))
        );
        assert_eq!(
            is_ancestor_of(CardId::new(7), CardId::new(1), &cards),
            Err(CanvasError::CycleDetected(CardId::new(1)))
        );
    }

    #[test]
    fn ancestry_queries() {
        let cards = map([
            card(1, Placement::Root { origin: Point::ZERO }),
            nested(2, 1, 0.0, 0.0),
            nested(3, 2, 0.0, 0.0),
        ]);
        let path = ancestors(CardId::new(3), &cards).unwrap();
        assert_eq!(path.as_slice(), &[CardId::new(2), CardId::new(1)]);
        assert_eq!(depth(CardId::new(1), &cards), Ok(0));
        assert_eq!(is_ancestor_of(CardId::new(1), CardId::new(3), &cards), Ok(true));
        assert_eq!(is_ancestor_of(CardId::new(3), CardId::new(1), &cards), Ok(false));
        assert_eq!(
            is_ancestor_of(CardId::new(3), CardId::new(3), &cards),
            Ok(false),
            "a card is not its own ancestor"
        );
    }
}
