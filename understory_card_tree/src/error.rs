// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by queries and mutations.

use crate::types::CardId;

/// Why a query failed or a mutation was rejected.
///
/// A mutation that returns an error has left the tree exactly as it was, so
/// callers that race against stale identifiers may simply ignore the error.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CanvasError {
    /// The referenced card does not exist.
    #[error("card {0} not found")]
    NotFound(CardId),
    /// A card cannot be its own parent.
    #[error("card {0} cannot be its own parent")]
    SelfParent(CardId),
    /// Nesting `card` under `target` would make `card` its own ancestor.
    #[error("nesting {card} under {target} would create a cycle")]
    WouldCycle {
        /// The card being moved.
        card: CardId,
        /// The rejected parent, a descendant of `card`.
        target: CardId,
    },
    /// The parent chain starting at this card loops back on itself.
    #[error("parent chain of {0} contains a cycle")]
    CycleDetected(CardId),
    /// Zoom must be finite and strictly positive.
    #[error("invalid zoom factor {0}")]
    InvalidZoom(f64),
    /// A structural invariant does not hold.
    #[error("inconsistent card {card}: {reason}")]
    Inconsistent {
        /// The card where the violation was found.
        card: CardId,
        /// Which invariant is broken.
        reason: &'static str,
    },
}
