// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The card forest plus selection and viewport, and read-only queries over it.

use alloc::vec::Vec;

use kurbo::{Affine, Point, Rect, Vec2};

use crate::containment::contains_inclusive;
use crate::error::CanvasError;
use crate::resolve::{self, AncestorPath};
use crate::types::{Card, CardId, CardMap, Placement};

/// Snapshot of a canvas: every card, the selection, and the viewport.
///
/// A `CanvasState` is only mutated through [`CardTree`](crate::CardTree); all
/// other code reads it. Cloning yields an independent snapshot that compares
/// equal to the original until either is changed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CanvasState {
    pub(crate) cards: CardMap,
    pub(crate) selected: Option<CardId>,
    pub(crate) zoom: f64,
    pub(crate) pan: Vec2,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            cards: CardMap::default(),
            selected: None,
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl CanvasState {
    /// Look up a card.
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    /// Returns true if `id` refers to a stored card.
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// All cards, in unspecified order.
    pub fn cards(&self) -> &CardMap {
        &self.cards
    }

    /// Number of cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns true if the canvas has no cards.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The selected card, if any.
    pub fn selected(&self) -> Option<CardId> {
        self.selected
    }

    /// Current zoom factor.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Current viewport offset.
    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    /// Root cards sorted by paint order.
    pub fn roots(&self) -> Vec<CardId> {
        let mut roots: Vec<&Card> = self.cards.values().filter(|c| c.is_root()).collect();
        roots.sort_by_key(|c| (c.z_index, c.id));
        roots.into_iter().map(|c| c.id).collect()
    }

    /// Absolute position of a stored card.
    pub fn absolute_position(&self, id: CardId) -> Result<Point, CanvasError> {
        let card = self.card(id).ok_or(CanvasError::NotFound(id))?;
        resolve::absolute_position(card, &self.cards)
    }

    /// Absolute rectangle covered by a stored card.
    pub fn absolute_rect(&self, id: CardId) -> Result<Rect, CanvasError> {
        let card = self.card(id).ok_or(CanvasError::NotFound(id))?;
        let origin = resolve::absolute_position(card, &self.cards)?;
        Ok(Rect::from_origin_size(origin, card.size))
    }

    /// Parents of `id`, nearest first.
    pub fn ancestors(&self, id: CardId) -> Result<AncestorPath, CanvasError> {
        resolve::ancestors(id, &self.cards)
    }

    /// Every card below `id`, parents before their children. Excludes `id`.
    pub fn descendants(&self, id: CardId) -> Vec<CardId> {
        let mut out = Vec::new();
        let mut stack: Vec<CardId> = match self.card(id) {
            Some(card) => card.child_ids.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(next) = stack.pop() {
            // A corrupted graph could revisit a card; never emit one twice.
            if next == id || out.contains(&next) {
                continue;
            }
            if let Some(card) = self.card(next) {
                out.push(next);
                stack.extend(card.child_ids.iter().rev().copied());
            }
        }
        out
    }

    /// Returns true if a card dragged as `source` may be nested into `target`.
    ///
    /// The target must exist, differ from the source, and not lie in the
    /// source's subtree.
    pub fn is_valid_drop_target(&self, target: CardId, source: CardId) -> Result<bool, CanvasError> {
        if target == source || !self.contains(target) {
            return Ok(false);
        }
        resolve::is_ancestor_of(source, target, &self.cards).map(|inside| !inside)
    }

    /// Topmost card whose absolute rectangle contains `point`, skipping
    /// `dragged` and its subtree.
    ///
    /// Higher `z_index` wins; on a tie the deeper card wins, then the newer id.
    pub fn drop_target_at(
        &self,
        point: Point,
        dragged: Option<CardId>,
    ) -> Result<Option<CardId>, CanvasError> {
        let mut best: Option<(i32, usize, CardId)> = None;
        for card in self.cards.values() {
            if let Some(source) = dragged
                && (card.id == source || resolve::is_ancestor_of(source, card.id, &self.cards)?)
            {
                continue;
            }
            let origin = resolve::absolute_position(card, &self.cards)?;
            if !contains_inclusive(Rect::from_origin_size(origin, card.size), point) {
                continue;
            }
            let rank = (card.z_index, resolve::depth(card.id, &self.cards)?, card.id);
            if best.is_none_or(|b| rank > b) {
                best = Some(rank);
            }
        }
        Ok(best.map(|(_, _, id)| id))
    }

    /// Transform from canvas coordinates to screen coordinates.
    pub fn view_transform(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.zoom)
    }

    /// Convert a screen point (relative to the viewport) into canvas coordinates.
    pub fn screen_to_canvas(&self, point: Point) -> Point {
        self.view_transform().inverse() * point
    }

    /// Convert a canvas point into screen coordinates.
    pub fn canvas_to_screen(&self, point: Point) -> Point {
        self.view_transform() * point
    }

    /// Check every structural invariant, returning the first violation found.
    ///
    /// - Each nested card's parent exists and lists it as a child.
    /// - Each listed child exists, names this card as parent, and appears once.
    /// - No parent chain loops.
    /// - The selection, if any, refers to a stored card.
    pub fn validate(&self) -> Result<(), CanvasError> {
        for card in self.cards.values() {
            if let Placement::Nested { parent, .. } = card.placement {
                let Some(p) = self.card(parent) else {
                    return Err(inconsistent(card.id, "parent does not exist"));
                };
                if !p.child_ids.contains(&card.id) {
                    return Err(inconsistent(card.id, "missing from parent's children"));
                }
            }
            for (i, child) in card.child_ids.iter().enumerate() {
                if card.child_ids[..i].contains(child) {
                    return Err(inconsistent(card.id, "child listed twice"));
                }
                match self.card(*child) {
                    Some(c) if c.parent_id() == Some(card.id) => {}
                    Some(_) => return Err(inconsistent(card.id, "child names another parent")),
                    None => return Err(inconsistent(card.id, "child does not exist")),
                }
            }
            resolve::ancestors(card.id, &self.cards)?;
        }
        if let Some(selected) = self.selected
            && !self.contains(selected)
        {
            return Err(inconsistent(selected, "selected card does not exist"));
        }
        Ok(())
    }
}

fn inconsistent(card: CardId, reason: &'static str) -> CanvasError {
    CanvasError::Inconsistent { card, reason }
}
