// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Card Tree: the hierarchy and coordinate model behind an infinite canvas of nestable cards.
//!
//! Cards are note-like boxes that can be nested inside each other by dragging. This crate owns the
//! card forest and answers the questions an input layer needs while the user drags things around:
//!
//! - Where is this card on the canvas? Nested cards store offsets from their parent, so absolute
//!   positions are resolved by walking the parent chain.
//! - Has this child been dragged out of its parent? Only the top-left corner is tested against the
//!   parent's bounds grown by a small buffer.
//! - May this card be dropped into that one? A card can never be nested inside its own subtree.
//! - What does a finished drag mean? Orphan the card, nest it into the drop target, or just move it.
//!
//! Rendering, pan and zoom gestures, theming, and text editing live elsewhere. The view layer
//! reads a [`CanvasState`] snapshot and sends mutations back through [`CardTree`] (or any
//! [`CardCommands`] implementation).
//!
//! ## Coordinate frames
//!
//! A card's [`Placement`] is either [`Placement::Root`] with an absolute origin or
//! [`Placement::Nested`] with an offset from its parent's origin. Every transition between the two
//! ([`CardTree::relocate`], and the orphan and nest outcomes of [`CardTree::resolve_drag_end`])
//! changes the parent link and re-bases the coordinates in a single mutation.
//!
//! ## Failure model
//!
//! Mutations return [`CanvasError`] and leave the state untouched when they fail. Missing cards
//! are reported as [`CanvasError::NotFound`], which an input layer racing against stale ids can
//! ignore. Ancestry walks are iterative and bounded by the number of cards, so a corrupted parent
//! graph surfaces as [`CanvasError::CycleDetected`] rather than a hang.
//!
//! ## API overview
//!
//! - [`CardTree`]: owner of the forest; all mutations.
//! - [`CanvasState`]: snapshot with queries ([`CanvasState::absolute_position`],
//!   [`CanvasState::drop_target_at`], [`CanvasState::screen_to_canvas`], ...).
//! - [`DragPolicy`] / [`DragEnd`] / [`DragResolution`]: drag-end decision and application.
//! - [`absolute_position`], [`is_outside`], [`fitted_size`]: the pure functions underneath.
//! - [`CanvasConfig`]: default sizes, tolerances, and zoom bounds.
//!
//! ## Logging
//!
//! Structural mutations and drag resolutions emit `tracing` events at `debug` level; rejected
//! operations log at `trace`, and detected cycles at `warn`. No subscriber is installed.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod commands;
mod config;
mod containment;
mod drag;
mod error;
mod layout;
mod resolve;
mod state;
mod tree;
mod types;

pub use commands::{CardAction, CardCommands};
pub use config::CanvasConfig;
pub use containment::{DEFAULT_BUFFER, is_outside, offset_is_outside, padded_bounds};
pub use drag::{DragEnd, DragPolicy, DragResolution};
pub use error::CanvasError;
pub use layout::fitted_size;
pub use resolve::{AncestorPath, absolute_position, ancestors, depth, is_ancestor_of};
pub use state::CanvasState;
pub use tree::CardTree;
pub use types::{Card, CardId, CardMap, CardPatch, Placement};
