// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunable constants for card creation, containment, and the viewport.

use alloc::string::String;

use kurbo::{Point, Size, Vec2};

/// Configuration for a [`CardTree`](crate::CardTree).
///
/// The defaults match a canvas of 200 × 120 cards with a 20 unit drag-out
/// tolerance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CanvasConfig {
    /// Size given to newly added cards, and the minimum fitted size.
    pub default_card_size: Size,
    /// Position used when a card is added without one.
    pub default_position: Point,
    /// Title of newly added cards.
    pub default_title: String,
    /// Title stored when an edit is committed with blank text.
    pub untitled_title: String,
    /// Offset of a child spawned with [`CardTree::add_child`](crate::CardTree::add_child).
    pub child_spawn_offset: Vec2,
    /// Padding around a parent's bounds before a dragged child counts as outside.
    pub containment_buffer: f64,
    /// Space kept between the furthest child and a parent's edge when fitting.
    pub child_padding: f64,
    /// Lower zoom bound.
    pub min_zoom: f64,
    /// Upper zoom bound.
    pub max_zoom: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            default_card_size: Size::new(200.0, 120.0),
            default_position: Point::new(100.0, 100.0),
            default_title: String::from("New Card"),
            untitled_title: String::from("Untitled"),
            child_spawn_offset: Vec2::new(20.0, 60.0),
            containment_buffer: crate::containment::DEFAULT_BUFFER,
            child_padding: 20.0,
            min_zoom: 0.1,
            max_zoom: 5.0,
        }
    }
}
