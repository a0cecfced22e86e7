// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The mutation interface handed to input handlers, and its action form.

use alloc::string::String;

use kurbo::{Point, Vec2};

use crate::drag::DragEnd;
use crate::error::CanvasError;
use crate::state::CanvasState;
use crate::types::{CardId, CardPatch, Placement};

/// Commands accepted by the owner of a card tree.
///
/// Handlers take `&mut impl CardCommands` rather than reaching for shared
/// state, so tests can substitute a recording implementation.
pub trait CardCommands {
    /// Read-only view of the current state.
    fn state(&self) -> &CanvasState;

    /// Add a card and return its identifier.
    ///
    /// With an existing `parent` the position is parent-relative; otherwise
    /// the card becomes a root and the position is absolute.
    fn add_card(&mut self, parent: Option<CardId>, position: Option<Point>) -> CardId;

    /// Delete a card and its whole subtree.
    fn delete_card(&mut self, id: CardId) -> Result<(), CanvasError>;

    /// Apply a partial update.
    fn update_card(&mut self, id: CardId, patch: CardPatch) -> Result<(), CanvasError>;

    /// Overwrite a card's raw position in its current frame.
    fn move_card(&mut self, id: CardId, position: Point) -> Result<(), CanvasError>;

    /// Change a card's parent, keeping its raw coordinates.
    fn set_parent(&mut self, id: CardId, parent: Option<CardId>) -> Result<(), CanvasError>;

    /// Change a card's parent and coordinates in one step.
    fn relocate(&mut self, id: CardId, placement: Placement) -> Result<(), CanvasError>;

    /// Change the selection.
    fn select_card(&mut self, id: Option<CardId>) -> Result<(), CanvasError>;
}

/// A single user-level mutation, applied with [`CardTree::dispatch`](crate::CardTree::dispatch).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardAction {
    /// See [`CardCommands::add_card`].
    AddCard {
        /// Optional owner.
        parent: Option<CardId>,
        /// Optional position; the configured default otherwise.
        position: Option<Point>,
    },
    /// Spawn a child at the configured offset inside `parent`.
    AddChild {
        /// The owner.
        parent: CardId,
    },
    /// See [`CardCommands::delete_card`].
    DeleteCard {
        /// Root of the subtree to delete.
        card: CardId,
    },
    /// See [`CardCommands::update_card`].
    UpdateCard {
        /// Target card.
        card: CardId,
        /// Fields to change.
        patch: CardPatch,
    },
    /// See [`CardCommands::move_card`].
    MoveCard {
        /// Target card.
        card: CardId,
        /// New raw position.
        position: Point,
    },
    /// See [`CardCommands::set_parent`].
    SetParent {
        /// Target card.
        card: CardId,
        /// New owner, or `None` to make it a root.
        parent: Option<CardId>,
    },
    /// See [`CardCommands::relocate`].
    Relocate {
        /// Target card.
        card: CardId,
        /// New placement.
        placement: Placement,
    },
    /// See [`CardCommands::select_card`].
    SelectCard {
        /// New selection.
        card: Option<CardId>,
    },
    /// Enter title editing.
    StartEditing {
        /// Target card.
        card: CardId,
    },
    /// Leave title editing without changing the title.
    StopEditing {
        /// Target card.
        card: CardId,
    },
    /// Store an edited title and leave editing.
    CommitTitle {
        /// Target card.
        card: CardId,
        /// Raw text as typed.
        title: String,
    },
    /// A drag gesture started on `card`.
    BeginDrag {
        /// Dragged card.
        card: CardId,
    },
    /// A drag gesture finished.
    EndDrag(DragEnd),
    /// Set the zoom factor.
    SetZoom {
        /// New zoom, clamped to the configured range.
        zoom: f64,
    },
    /// Set the viewport offset.
    SetPan {
        /// New offset.
        pan: Vec2,
    },
    /// Restore zoom 1 and zero pan.
    ResetView,
}
