// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Detects nested cards that have been dragged out of their parent.
//!
//! Only the child's top-left corner is tested against the parent's bounds grown
//! by a buffer on every side. This is a drag-out signal, not a collision test.

use kurbo::{Point, Rect, Size, Vec2};

use crate::error::CanvasError;
use crate::resolve::absolute_position;
use crate::types::{Card, CardMap, Placement};

/// Default tolerance around a parent's bounds.
pub const DEFAULT_BUFFER: f64 = 20.0;

/// Returns true if `child`'s top-left corner lies outside `parent`'s bounds
/// grown by `buffer`.
///
/// Always false unless `parent` is `child`'s actual parent.
pub fn is_outside(
    child: &Card,
    parent: &Card,
    cards: &CardMap,
    buffer: f64,
) -> Result<bool, CanvasError> {
    match child.placement {
        Placement::Nested {
            parent: parent_id,
            offset,
        } if parent_id == parent.id => offset_is_outside(parent, cards, offset, buffer),
        _ => Ok(false),
    }
}

/// Returns true if a child placed at `offset` inside `parent` would have its
/// top-left corner outside the parent's bounds grown by `buffer`.
pub fn offset_is_outside(
    parent: &Card,
    cards: &CardMap,
    offset: Vec2,
    buffer: f64,
) -> Result<bool, CanvasError> {
    let parent_abs = absolute_position(parent, cards)?;
    let bounds = padded_bounds(parent_abs, parent.size, buffer);
    Ok(!contains_inclusive(bounds, parent_abs + offset))
}

/// The rectangle at `origin` with `size`, grown by `buffer` on every side.
pub fn padded_bounds(origin: Point, size: Size, buffer: f64) -> Rect {
    Rect::from_origin_size(origin, size).inflate(buffer, buffer)
}

/// Closed containment: points on any edge count as inside.
pub(crate) fn contains_inclusive(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}
