// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structural mutations over a [`CanvasState`].

use alloc::{string::String, vec::Vec};

use kurbo::{Point, Size, Vec2};

use crate::commands::{CardAction, CardCommands};
use crate::config::CanvasConfig;
use crate::drag::{DragEnd, DragPolicy, DragResolution};
use crate::error::CanvasError;
use crate::layout;
use crate::resolve::is_ancestor_of;
use crate::state::CanvasState;
use crate::types::{Card, CardId, CardPatch, Placement};

/// Owner of a card forest.
///
/// Every mutation either applies completely or returns an error and leaves the
/// state untouched. Missing identifiers are reported as
/// [`CanvasError::NotFound`] and are otherwise harmless, so an input layer
/// holding stale identifiers can ignore those errors.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Point, Vec2};
/// use understory_card_tree::{CardTree, DragEnd};
///
/// let mut tree = CardTree::new();
/// let parent = tree.add_card(None, Some(Point::new(20.0, 20.0)));
/// let card = tree.add_card(None, Some(Point::new(50.0, 50.0)));
///
/// // Drop `card` onto `parent` without moving it.
/// tree.resolve_drag_end(&DragEnd::new(card, Vec2::new(0.0, 1.0)).dropped_on(parent))
///     .unwrap();
///
/// let nested = tree.state().card(card).unwrap();
/// assert_eq!(nested.parent_id(), Some(parent));
/// assert_eq!(nested.position(), Point::new(30.0, 31.0));
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardTree {
    state: CanvasState,
    config: CanvasConfig,
    /// Next serial to mint; only ever increases.
    next_serial: u64,
}

impl CardTree {
    /// Create an empty tree with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty tree with a specific configuration.
    pub fn with_config(config: CanvasConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Read-only view of the current state.
    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    /// An independent copy of the current state.
    pub fn snapshot(&self) -> CanvasState {
        self.state.clone()
    }

    /// Consume the tree, keeping its state.
    pub fn into_state(self) -> CanvasState {
        self.state
    }

    /// Check every structural invariant; see [`CanvasState::validate`].
    pub fn validate(&self) -> Result<(), CanvasError> {
        self.state.validate()
    }

    /// The drag policy implied by the configuration.
    pub fn drag_policy(&self) -> DragPolicy {
        DragPolicy::new(self.config.containment_buffer)
    }

    /// Size `id` would need to enclose its children; see [`fitted_size`](crate::fitted_size).
    pub fn fitted_size(&self, id: CardId) -> Option<Size> {
        let card = self.state.card(id)?;
        Some(layout::fitted_size(card, &self.state.cards, &self.config))
    }

    /// Add a card and select it.
    ///
    /// With an existing `parent` the card is appended to the parent's children
    /// and `position` is parent-relative. A missing `parent` falls back to a
    /// root card at the absolute `position`. The configured default position is
    /// used when none is given.
    pub fn add_card(&mut self, parent: Option<CardId>, position: Option<Point>) -> CardId {
        let id = CardId::new(self.next_serial);
        self.next_serial += 1;
        let coords = position.unwrap_or(self.config.default_position);
        let placement = match parent {
            Some(p) if self.state.contains(p) => Placement::Nested {
                parent: p,
                offset: coords.to_vec2(),
            },
            _ => Placement::Root { origin: coords },
        };
        let card = Card {
            id,
            title: self.config.default_title.clone(),
            placement,
            size: self.config.default_card_size,
            child_ids: Vec::new(),
            z_index: i32::try_from(self.state.cards.len() + 1).unwrap_or(i32::MAX),
            is_editing: true,
        };
        if let Some(p) = placement.parent() {
            self.link(id, p);
        }
        self.state.cards.insert(id, card);
        self.state.selected = Some(id);
        tracing::debug!(card = %id, parent = ?placement.parent(), "added card");
        id
    }

    /// Add a child of `parent` at the configured spawn offset.
    pub fn add_child(&mut self, parent: CardId) -> Result<CardId, CanvasError> {
        if !self.state.contains(parent) {
            return Err(not_found(parent));
        }
        let offset = self.config.child_spawn_offset.to_point();
        Ok(self.add_card(Some(parent), Some(offset)))
    }

    /// Delete `id` and its whole subtree.
    ///
    /// The card is removed from its parent's children. The selection is
    /// cleared if it pointed anywhere inside the deleted subtree.
    pub fn delete_card(&mut self, id: CardId) -> Result<(), CanvasError> {
        let Some(card) = self.state.card(id) else {
            return Err(not_found(id));
        };
        if let Some(parent) = card.parent_id() {
            self.unlink(id, parent);
        }
        // Collect from the current snapshot before removing anything.
        let mut doomed = self.state.descendants(id);
        doomed.push(id);
        for gone in &doomed {
            self.state.cards.remove(gone);
        }
        if let Some(selected) = self.state.selected
            && doomed.contains(&selected)
        {
            self.state.selected = None;
        }
        tracing::debug!(card = %id, removed = doomed.len(), "deleted subtree");
        Ok(())
    }

    /// Apply a partial update to `id`.
    pub fn update_card(&mut self, id: CardId, patch: CardPatch) -> Result<(), CanvasError> {
        let card = self.card_mut(id)?;
        patch.apply(card);
        tracing::trace!(card = %id, "updated card");
        Ok(())
    }

    /// Overwrite the raw position of `id` in its current frame.
    ///
    /// By convention this is used for root cards, whose position is absolute.
    pub fn move_card(&mut self, id: CardId, position: Point) -> Result<(), CanvasError> {
        let card = self.card_mut(id)?;
        card.placement = card.placement.with_coords(position);
        tracing::trace!(card = %id, ?position, "moved card");
        Ok(())
    }

    /// Change the parent of `id`, keeping its raw coordinates.
    ///
    /// The coordinates are reinterpreted in the new frame: call
    /// [`CardTree::update_card`] afterwards, or use [`CardTree::relocate`] to
    /// change both at once. Rejects self-parenting, missing parents, and
    /// parents inside the card's own subtree.
    pub fn set_parent(&mut self, id: CardId, parent: Option<CardId>) -> Result<(), CanvasError> {
        let card = self.state.card(id).ok_or(CanvasError::NotFound(id))?;
        let coords = card.position();
        let placement = match parent {
            Some(parent) => Placement::Nested {
                parent,
                offset: coords.to_vec2(),
            },
            None => Placement::Root { origin: coords },
        };
        self.relocate(id, placement)
    }

    /// Change the parent and coordinates of `id` in one step.
    ///
    /// Moving within the same parent keeps the card's slot in the parent's
    /// children.
    pub fn relocate(&mut self, id: CardId, placement: Placement) -> Result<(), CanvasError> {
        let old = self.state.card(id).ok_or(CanvasError::NotFound(id))?.placement;
        if let Some(parent) = placement.parent() {
            self.check_parent(id, parent)?;
        }
        if old.parent() != placement.parent() {
            if let Some(from) = old.parent() {
                self.unlink(id, from);
            }
            if let Some(to) = placement.parent() {
                self.link(id, to);
            }
            tracing::debug!(card = %id, from = ?old.parent(), to = ?placement.parent(), "reparented card");
        }
        self.card_mut(id)?.placement = placement;
        Ok(())
    }

    /// Change the selection. Selecting a missing card is rejected.
    pub fn select_card(&mut self, id: Option<CardId>) -> Result<(), CanvasError> {
        if let Some(id) = id
            && !self.state.contains(id)
        {
            return Err(not_found(id));
        }
        self.state.selected = id;
        Ok(())
    }

    /// Enter title editing on `id`.
    pub fn start_editing(&mut self, id: CardId) -> Result<(), CanvasError> {
        self.card_mut(id)?.is_editing = true;
        Ok(())
    }

    /// Leave title editing on `id`.
    pub fn stop_editing(&mut self, id: CardId) -> Result<(), CanvasError> {
        self.card_mut(id)?.is_editing = false;
        Ok(())
    }

    /// Store an edited title and leave editing.
    ///
    /// Surrounding whitespace is trimmed; blank text stores the configured
    /// untitled title.
    pub fn commit_title(&mut self, id: CardId, text: &str) -> Result<(), CanvasError> {
        let trimmed = text.trim();
        let title = if trimmed.is_empty() {
            self.config.untitled_title.clone()
        } else {
            String::from(trimmed)
        };
        let card = self.card_mut(id)?;
        card.title = title;
        card.is_editing = false;
        Ok(())
    }

    /// A drag gesture started on `id`: select it.
    pub fn begin_drag(&mut self, id: CardId) -> Result<(), CanvasError> {
        self.select_card(Some(id))
    }

    /// Resolve a finished drag gesture and apply the result.
    ///
    /// See [`DragPolicy::resolve`] for the decision rules.
    pub fn resolve_drag_end(&mut self, drag: &DragEnd) -> Result<DragResolution, CanvasError> {
        let resolution = self.drag_policy().resolve(&self.state, drag)?;
        resolution.apply(self)?;
        tracing::debug!(card = %drag.card, ?resolution, "resolved drag");
        Ok(resolution)
    }

    /// Set the zoom factor, clamped to the configured range.
    pub fn set_zoom(&mut self, zoom: f64) -> Result<(), CanvasError> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(CanvasError::InvalidZoom(zoom));
        }
        self.state.zoom = zoom.clamp(self.config.min_zoom, self.config.max_zoom);
        Ok(())
    }

    /// Set the viewport offset.
    pub fn set_pan(&mut self, pan: Vec2) {
        self.state.pan = pan;
    }

    /// Restore zoom 1 and zero pan.
    pub fn reset_view(&mut self) {
        self.state.zoom = 1.0;
        self.state.pan = Vec2::ZERO;
    }

    /// Apply a single action.
    pub fn dispatch(&mut self, action: CardAction) -> Result<(), CanvasError> {
        match action {
            CardAction::AddCard { parent, position } => {
                self.add_card(parent, position);
                Ok(())
            }
            CardAction::AddChild { parent } => self.add_child(parent).map(drop),
            CardAction::DeleteCard { card } => self.delete_card(card),
            CardAction::UpdateCard { card, patch } => self.update_card(card, patch),
            CardAction::MoveCard { card, position } => self.move_card(card, position),
            CardAction::SetParent { card, parent } => self.set_parent(card, parent),
            CardAction::Relocate { card, placement } => self.relocate(card, placement),
            CardAction::SelectCard { card } => self.select_card(card),
            CardAction::StartEditing { card } => self.start_editing(card),
            CardAction::StopEditing { card } => self.stop_editing(card),
            CardAction::CommitTitle { card, title } => self.commit_title(card, &title),
            CardAction::BeginDrag { card } => self.begin_drag(card),
            CardAction::EndDrag(drag) => self.resolve_drag_end(&drag).map(drop),
            CardAction::SetZoom { zoom } => self.set_zoom(zoom),
            CardAction::SetPan { pan } => {
                self.set_pan(pan);
                Ok(())
            }
            CardAction::ResetView => {
                self.reset_view();
                Ok(())
            }
        }
    }
}

impl CardTree {
    // --- internals ---

    fn card_mut(&mut self, id: CardId) -> Result<&mut Card, CanvasError> {
        self.state.cards.get_mut(&id).ok_or(CanvasError::NotFound(id))
    }

    fn check_parent(&self, id: CardId, parent: CardId) -> Result<(), CanvasError> {
        if parent == id {
            tracing::trace!(card = %id, "rejected self-parenting");
            return Err(CanvasError::SelfParent(id));
        }
        if !self.state.contains(parent) {
            return Err(not_found(parent));
        }
        if is_ancestor_of(id, parent, &self.state.cards)? {
            tracing::trace!(card = %id, target = %parent, "rejected cyclic parent");
            return Err(CanvasError::WouldCycle {
                card: id,
                target: parent,
            });
        }
        Ok(())
    }

    fn link(&mut self, id: CardId, parent: CardId) {
        if let Some(p) = self.state.cards.get_mut(&parent)
            && !p.child_ids.contains(&id)
        {
            p.child_ids.push(id);
        }
    }

    fn unlink(&mut self, id: CardId, parent: CardId) {
        if let Some(p) = self.state.cards.get_mut(&parent) {
            p.child_ids.retain(|c| *c != id);
        }
    }
}

fn not_found(id: CardId) -> CanvasError {
    tracing::trace!(card = %id, "card not found");
    CanvasError::NotFound(id)
}

impl CardCommands for CardTree {
    fn state(&self) -> &CanvasState {
        Self::state(self)
    }

    fn add_card(&mut self, parent: Option<CardId>, position: Option<Point>) -> CardId {
        Self::add_card(self, parent, position)
    }

    fn delete_card(&mut self, id: CardId) -> Result<(), CanvasError> {
        Self::delete_card(self, id)
    }

    fn update_card(&mut self, id: CardId, patch: CardPatch) -> Result<(), CanvasError> {
        Self::update_card(self, id, patch)
    }

    fn move_card(&mut self, id: CardId, position: Point) -> Result<(), CanvasError> {
        Self::move_card(self, id, position)
    }

    fn set_parent(&mut self, id: CardId, parent: Option<CardId>) -> Result<(), CanvasError> {
        Self::set_parent(self, id, parent)
    }

    fn relocate(&mut self, id: CardId, placement: Placement) -> Result<(), CanvasError> {
        Self::relocate(self, id, placement)
    }

    fn select_card(&mut self, id: Option<CardId>) -> Result<(), CanvasError> {
        Self::select_card(self, id)
    }
}
