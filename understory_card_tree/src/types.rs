// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the card tree: identifiers, placements, cards, and patches.

use alloc::{string::String, vec::Vec};
use core::fmt;

use hashbrown::HashMap;
use kurbo::{Point, Size, Vec2};

/// Map from identifier to card; the forest backing a [`CanvasState`](crate::CanvasState).
pub type CardMap = HashMap<CardId, Card>;

/// Identifier for a card.
///
/// Identifiers are minted from a per-tree serial that only ever increases, so an
/// identifier is never handed out twice, even after the card it named is deleted.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardId(pub(crate) u64);

impl CardId {
    pub(crate) const fn new(serial: u64) -> Self {
        Self(serial)
    }

    /// Returns the serial this identifier was minted from.
    pub const fn serial(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card-{}", self.0)
    }
}

/// Where a card sits, and in which coordinate frame its position is expressed.
///
/// A root card stores an absolute canvas origin. A nested card stores an offset
/// from its parent's origin. Keeping the two frames in separate variants means a
/// coordinate can never be read in the wrong frame.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Placement {
    /// Top-level card positioned in absolute canvas coordinates.
    Root {
        /// Absolute top-left corner.
        origin: Point,
    },
    /// Card owned by `parent`, positioned relative to the parent's origin.
    Nested {
        /// The owning card.
        parent: CardId,
        /// Offset of the top-left corner from the parent's top-left corner.
        offset: Vec2,
    },
}

impl Placement {
    /// The parent of a nested placement, `None` for roots.
    pub fn parent(&self) -> Option<CardId> {
        match *self {
            Self::Root { .. } => None,
            Self::Nested { parent, .. } => Some(parent),
        }
    }

    /// Raw coordinates, in whichever frame this placement uses.
    pub fn coords(&self) -> Point {
        match *self {
            Self::Root { origin } => origin,
            Self::Nested { offset, .. } => offset.to_point(),
        }
    }

    /// Same frame, new raw coordinates.
    #[must_use]
    pub fn with_coords(self, coords: Point) -> Self {
        match self {
            Self::Root { .. } => Self::Root { origin: coords },
            Self::Nested { parent, .. } => Self::Nested {
                parent,
                offset: coords.to_vec2(),
            },
        }
    }

    /// Same frame, coordinates shifted by `delta`.
    #[must_use]
    pub fn translated(self, delta: Vec2) -> Self {
        self.with_coords(self.coords() + delta)
    }
}

/// A node of the card forest.
///
/// Structural fields (identifier, placement, children) are only changed through
/// [`CardTree`](crate::CardTree) so the parent and child links stay symmetric.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Card {
    pub(crate) id: CardId,
    /// Display text.
    pub title: String,
    pub(crate) placement: Placement,
    /// Width and height, used for containment checks and hit testing.
    pub size: Size,
    pub(crate) child_ids: Vec<CardId>,
    /// Paint-order hint. Higher is drawn on top.
    pub z_index: i32,
    /// Whether the title is currently being edited.
    pub is_editing: bool,
}

impl Card {
    /// The card's identifier.
    pub fn id(&self) -> CardId {
        self.id
    }

    /// The card's placement.
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// The owning card, `None` for roots.
    pub fn parent_id(&self) -> Option<CardId> {
        self.placement.parent()
    }

    /// Raw position: absolute for roots, parent-relative for nested cards.
    pub fn position(&self) -> Point {
        self.placement.coords()
    }

    /// Children in insertion order.
    pub fn child_ids(&self) -> &[CardId] {
        &self.child_ids
    }

    /// Returns true if this card has no parent.
    pub fn is_root(&self) -> bool {
        matches!(self.placement, Placement::Root { .. })
    }
}

/// A partial update applied by [`CardTree::update_card`](crate::CardTree::update_card).
///
/// Fields left as `None` are not touched. The parent link cannot be changed
/// through a patch; use [`CardTree::set_parent`](crate::CardTree::set_parent) or
/// [`CardTree::relocate`](crate::CardTree::relocate).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardPatch {
    /// New title.
    pub title: Option<String>,
    /// New raw position, interpreted in the card's current frame.
    pub position: Option<Point>,
    /// New size.
    pub size: Option<Size>,
    /// New paint order.
    pub z_index: Option<i32>,
    /// New editing flag.
    pub is_editing: Option<bool>,
}

impl CardPatch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the raw position.
    pub fn position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    /// Set the size.
    pub fn size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the paint order.
    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    /// Set the editing flag.
    pub fn editing(mut self, is_editing: bool) -> Self {
        self.is_editing = Some(is_editing);
        self
    }

    pub(crate) fn apply(self, card: &mut Card) {
        if let Some(title) = self.title {
            card.title = title;
        }
        if let Some(position) = self.position {
            card.placement = card.placement.with_coords(position);
        }
        if let Some(size) = self.size {
            card.size = size;
        }
        if let Some(z_index) = self.z_index {
            card.z_index = z_index;
        }
        if let Some(is_editing) = self.is_editing {
            card.is_editing = is_editing;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_keeps_frame_when_translated() {
        let root = Placement::Root {
            origin: Point::new(10.0, 20.0),
        };
        assert_eq!(
            root.translated(Vec2::new(5.0, -5.0)),
            Placement::Root {
                origin: Point::new(15.0, 15.0)
            }
        );

        let nested = Placement::Nested {
            parent: CardId::new(3),
            offset: Vec2::new(1.0, 2.0),
        };
        let moved = nested.translated(Vec2::new(4.0, 4.0));
        assert_eq!(moved.parent(), Some(CardId::new(3)));
        assert_eq!(moved.coords(), Point::new(5.0, 6.0));
    }

    #[test]
    fn card_id_display() {
        assert_eq!(alloc::format!("{}", CardId::new(42)), "card-42");
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let mut card = Card {
            id: CardId::new(1),
            title: String::from("Before"),
            placement: Placement::Nested {
                parent: CardId::new(0),
                offset: Vec2::new(1.0, 1.0),
            },
            size: Size::new(200.0, 120.0),
            child_ids: Vec::new(),
            z_index: 2,
            is_editing: true,
        };
        CardPatch::new()
            .title("After")
            .position(Point::new(7.0, 8.0))
            .apply(&mut card);
        assert_eq!(card.title, "After");
        assert_eq!(card.parent_id(), Some(CardId::new(0)), "frame must survive");
        assert_eq!(card.position(), Point::new(7.0, 8.0));
        assert_eq!(card.size, Size::new(200.0, 120.0));
        assert_eq!(card.z_index, 2);
        assert!(card.is_editing);
    }
}
