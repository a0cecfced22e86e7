// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Derived sizing for cards that contain children.
//!
//! Nothing here writes back into the tree. A view layer that wants parents to
//! grow around their children can read [`fitted_size`] and issue an update.

use kurbo::Size;

use crate::config::CanvasConfig;
use crate::types::{Card, CardMap, Placement};

/// Smallest size that keeps every child of `card` inside it, plus padding.
///
/// Never smaller than the configured default card size.
pub fn fitted_size(card: &Card, cards: &CardMap, config: &CanvasConfig) -> Size {
    let mut right: f64 = 0.0;
    let mut bottom: f64 = 0.0;
    for child in card.child_ids.iter().filter_map(|id| cards.get(id)) {
        if let Placement::Nested { offset, .. } = child.placement {
            right = right.max(offset.x + child.size.width);
            bottom = bottom.max(offset.y + child.size.height);
        }
    }
    let min = config.default_card_size;
    Size::new(
        min.width.max(right + config.child_padding),
        min.height.max(bottom + config.child_padding),
    )
}
