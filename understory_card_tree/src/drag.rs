// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turning a finished drag gesture into tree mutations.
//!
//! [`DragPolicy::resolve`] inspects a snapshot and decides what the gesture
//! means. The first rule that applies wins:
//!
//! 1. A nested card whose new corner escapes its parent's padded bounds is
//!    orphaned: it becomes a root at its true absolute position.
//! 2. A card released over a valid drop target is nested into it, with its
//!    position re-expressed relative to the target.
//! 3. Otherwise the card is translated within its current frame.
//!
//! [`DragResolution::apply`] then issues the matching commands. Orphaning and
//! nesting are applied through [`CardCommands::relocate`] so the parent link
//! and the coordinate frame change together.

use kurbo::{Point, Vec2};

use crate::commands::CardCommands;
use crate::containment::{DEFAULT_BUFFER, offset_is_outside};
use crate::error::CanvasError;
use crate::resolve::absolute_position;
use crate::state::CanvasState;
use crate::types::{CardId, CardPatch, Placement};

/// A completed drag gesture as reported by the input layer.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DragEnd {
    /// The dragged card.
    pub card: CardId,
    /// Pointer movement over the whole gesture, in canvas units.
    pub delta: Vec2,
    /// Card the pointer was released over, if any.
    pub drop_target: Option<CardId>,
}

impl DragEnd {
    /// A drag of `card` by `delta` that was not released over another card.
    pub fn new(card: CardId, delta: Vec2) -> Self {
        Self {
            card,
            delta,
            drop_target: None,
        }
    }

    /// Set the card the pointer was released over.
    #[must_use]
    pub fn dropped_on(mut self, target: CardId) -> Self {
        self.drop_target = Some(target);
        self
    }
}

/// What a drag gesture resolved to.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DragResolution {
    /// The gesture had no effect.
    Abandoned,
    /// The card left its parent and is now a root at `origin`.
    Orphaned {
        /// Dragged card.
        card: CardId,
        /// Its former parent.
        from: CardId,
        /// New absolute position.
        origin: Point,
    },
    /// The card was nested into `parent` at `offset`.
    Reparented {
        /// Dragged card.
        card: CardId,
        /// New owner.
        parent: CardId,
        /// Position relative to the new owner.
        offset: Vec2,
    },
    /// The card kept its parent and was translated in its frame.
    Moved {
        /// Dragged card.
        card: CardId,
        /// Placement after translation.
        placement: Placement,
    },
}

impl DragResolution {
    /// Issue the commands that carry out this resolution.
    pub fn apply(&self, commands: &mut impl CardCommands) -> Result<(), CanvasError> {
        match *self {
            Self::Abandoned => Ok(()),
            Self::Orphaned { card, origin, .. } => {
                commands.relocate(card, Placement::Root { origin })
            }
            Self::Reparented {
                card,
                parent,
                offset,
            } => commands.relocate(card, Placement::Nested { parent, offset }),
            Self::Moved {
                card,
                placement: Placement::Root { origin },
            } => commands.move_card(card, origin),
            Self::Moved {
                card,
                placement: Placement::Nested { offset, .. },
            } => commands.update_card(card, CardPatch::new().position(offset.to_point())),
        }
    }
}

/// Decides what a finished drag gesture means.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragPolicy {
    /// Padding around a parent's bounds before a child counts as dragged out.
    pub containment_buffer: f64,
}

impl Default for DragPolicy {
    fn default() -> Self {
        Self {
            containment_buffer: DEFAULT_BUFFER,
        }
    }
}

impl DragPolicy {
    /// Create a policy with the given drag-out tolerance.
    pub fn new(containment_buffer: f64) -> Self {
        Self { containment_buffer }
    }

    /// Resolve `drag` against `state` without mutating anything.
    ///
    /// A gesture with a zero delta is abandoned. A missing dragged card is
    /// [`CanvasError::NotFound`].
    pub fn resolve(&self, state: &CanvasState, drag: &DragEnd) -> Result<DragResolution, CanvasError> {
        let card = state.card(drag.card).ok_or(CanvasError::NotFound(drag.card))?;
        if drag.delta == Vec2::ZERO {
            return Ok(DragResolution::Abandoned);
        }

        if let Placement::Nested { parent, offset } = card.placement
            && let Some(parent_card) = state.card(parent)
        {
            let moved = offset + drag.delta;
            if offset_is_outside(parent_card, &state.cards, moved, self.containment_buffer)? {
                let parent_abs = absolute_position(parent_card, &state.cards)?;
                return Ok(DragResolution::Orphaned {
                    card: card.id,
                    from: parent,
                    origin: parent_abs + moved,
                });
            }
        }

        if let Some(target) = drag.drop_target
            && state.is_valid_drop_target(target, card.id)?
        {
            let current = absolute_position(card, &state.cards)? + drag.delta;
            let target_abs = state.absolute_position(target)?;
            return Ok(DragResolution::Reparented {
                card: card.id,
                parent: target,
                offset: current - target_abs,
            });
        }

        Ok(DragResolution::Moved {
            card: card.id,
            placement: card.placement.translated(drag.delta),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CardTree;
    use alloc::vec::Vec;

    /// Records commands instead of applying them.
    #[derive(Default)]
    struct Recorder {
        state: CanvasState,
        relocated: Vec<(CardId, Placement)>,
        moved: Vec<(CardId, Point)>,
        updated: Vec<(CardId, CardPatch)>,
    }

    impl CardCommands for Recorder {
        fn state(&self) -> &CanvasState {
            &self.state
        }
        fn add_card(&mut self, _: Option<CardId>, _: Option<Point>) -> CardId {
            unreachable!("drag resolution never adds cards")
        }
        fn delete_card(&mut self, _: CardId) -> Result<(), CanvasError> {
            unreachable!("drag resolution never deletes cards")
        }
        fn update_card(&mut self, id: CardId, patch: CardPatch) -> Result<(), CanvasError> {
            self.updated.push((id, patch));
            Ok(())
        }
        fn move_card(&mut self, id: CardId, position: Point) -> Result<(), CanvasError> {
            self.moved.push((id, position));
            Ok(())
        }
        fn set_parent(&mut self, _: CardId, _: Option<CardId>) -> Result<(), CanvasError> {
            unreachable!("drag resolution re-bases through relocate")
        }
        fn relocate(&mut self, id: CardId, placement: Placement) -> Result<(), CanvasError> {
            self.relocated.push((id, placement));
            Ok(())
        }
        fn select_card(&mut self, _: Option<CardId>) -> Result<(), CanvasError> {
            Ok(())
        }
    }

    #[test]
    fn dragging_out_orphans_at_absolute_position() {
        let mut tree = CardTree::new();
        let parent = tree.add_card(None, Some(Point::new(100.0, 100.0)));
        let child = tree.add_card(Some(parent), Some(Point::ZERO));

        let outcome = tree
            .resolve_drag_end(&DragEnd::new(child, Vec2::new(300.0, 0.0)))
            .unwrap();
        assert_eq!(
            outcome,
            DragResolution::Orphaned {
                card: child,
                from: parent,
                origin: Point::new(400.0, 100.0),
            }
        );
        let card = tree.state().card(child).unwrap();
        assert!(card.is_root());
        assert_eq!(card.position(), Point::new(400.0, 100.0));
        assert!(tree.state().card(parent).unwrap().child_ids().is_empty());
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn orphaning_wins_over_drop_target() {
        let mut tree = CardTree::new();
        let parent = tree.add_card(None, Some(Point::ZERO));
        let child = tree.add_card(Some(parent), Some(Point::ZERO));
        let target = tree.add_card(None, Some(Point::new(1000.0, 0.0)));

        let outcome = tree
            .resolve_drag_end(&DragEnd::new(child, Vec2::new(1000.0, 0.0)).dropped_on(target))
            .unwrap();
        assert!(matches!(outcome, DragResolution::Orphaned { .. }));
        assert!(tree.state().card(child).unwrap().is_root());
    }

    #[test]
    fn drop_rebases_into_target_frame() {
        let mut tree = CardTree::new();
        let target = tree.add_card(None, Some(Point::new(20.0, 20.0)));
        let card = tree.add_card(None, Some(Point::new(40.0, 40.0)));

        tree.resolve_drag_end(&DragEnd::new(card, Vec2::new(10.0, 10.0)).dropped_on(target))
            .unwrap();
        let moved = tree.state().card(card).unwrap();
        assert_eq!(moved.parent_id(), Some(target));
        assert_eq!(moved.position(), Point::new(30.0, 30.0));
        assert_eq!(tree.state().card(target).unwrap().child_ids(), &[card]);
        assert_eq!(tree.state().absolute_position(card), Ok(Point::new(50.0, 50.0)));
    }

    #[test]
    fn drop_from_nested_parent_keeps_absolute_position() {
        let mut tree = CardTree::new();
        let old_parent = tree.add_card(None, Some(Point::new(0.0, 0.0)));
        let card = tree.add_card(Some(old_parent), Some(Point::new(10.0, 10.0)));
        let target = tree.add_card(None, Some(Point::new(0.0, 0.0)));
        let target_child = tree.add_card(Some(target), Some(Point::new(5.0, 5.0)));

        tree.resolve_drag_end(&DragEnd::new(card, Vec2::new(2.0, 3.0)).dropped_on(target_child))
            .unwrap();
        assert_eq!(tree.state().absolute_position(card), Ok(Point::new(12.0, 13.0)));
        assert_eq!(tree.state().card(card).unwrap().position(), Point::new(7.0, 8.0));
        assert!(tree.state().card(old_parent).unwrap().child_ids().is_empty());
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn drop_on_descendant_falls_back_to_move() {
        let mut tree = CardTree::new();
        let a = tree.add_card(None, Some(Point::new(0.0, 0.0)));
        let b = tree.add_card(Some(a), Some(Point::new(10.0, 10.0)));
        let c = tree.add_card(Some(b), Some(Point::new(10.0, 10.0)));

        let outcome = tree
            .resolve_drag_end(&DragEnd::new(a, Vec2::new(5.0, 5.0)).dropped_on(c))
            .unwrap();
        assert_eq!(
            outcome,
            DragResolution::Moved {
                card: a,
                placement: Placement::Root {
                    origin: Point::new(5.0, 5.0)
                },
            }
        );
        assert!(tree.state().card(a).unwrap().is_root());
        assert_eq!(tree.state().card(c).unwrap().parent_id(), Some(b));
    }

    #[test]
    fn small_drag_inside_parent_moves_relative() {
        let mut tree = CardTree::new();
        let parent = tree.add_card(None, Some(Point::new(100.0, 100.0)));
        let child = tree.add_card(Some(parent), Some(Point::new(20.0, 60.0)));

        tree.resolve_drag_end(&DragEnd::new(child, Vec2::new(15.0, -10.0)))
            .unwrap();
        let card = tree.state().card(child).unwrap();
        assert_eq!(card.parent_id(), Some(parent));
        assert_eq!(card.position(), Point::new(35.0, 50.0));
    }

    #[test]
    fn zero_delta_is_abandoned() {
        let mut tree = CardTree::new();
        let target = tree.add_card(None, Some(Point::ZERO));
        let card = tree.add_card(None, Some(Point::new(10.0, 10.0)));
        let before = tree.snapshot();
        let outcome = tree
            .resolve_drag_end(&DragEnd::new(card, Vec2::ZERO).dropped_on(target))
            .unwrap();
        assert_eq!(outcome, DragResolution::Abandoned);
        assert_eq!(tree.snapshot(), before);
    }

    #[test]
    fn missing_card_is_not_found() {
        let mut tree = CardTree::new();
        let ghost = tree.add_card(None, None);
        tree.delete_card(ghost).unwrap();
        assert_eq!(
            tree.resolve_drag_end(&DragEnd::new(ghost, Vec2::new(1.0, 1.0))),
            Err(CanvasError::NotFound(ghost))
        );
    }

    #[test]
    fn resolutions_issue_matching_commands() {
        let mut tree = CardTree::new();
        let parent = tree.add_card(None, Some(Point::ZERO));
        let child = tree.add_card(Some(parent), Some(Point::ZERO));
        let mut recorder = Recorder {
            state: tree.snapshot(),
            ..Recorder::default()
        };
        let policy = DragPolicy::default();

        let nudge = policy
            .resolve(recorder.state(), &DragEnd::new(child, Vec2::new(1.0, 2.0)))
            .unwrap();
        nudge.apply(&mut recorder).unwrap();
        assert_eq!(
            recorder.updated,
            [(child, CardPatch::new().position(Point::new(1.0, 2.0)))]
        );

        let slide = policy
            .resolve(recorder.state(), &DragEnd::new(parent, Vec2::new(4.0, 4.0)))
            .unwrap();
        slide.apply(&mut recorder).unwrap();
        assert_eq!(recorder.moved, [(parent, Point::new(4.0, 4.0))]);

        let escape = policy
            .resolve(recorder.state(), &DragEnd::new(child, Vec2::new(-500.0, 0.0)))
            .unwrap();
        escape.apply(&mut recorder).unwrap();
        assert_eq!(
            recorder.relocated,
            [(
                child,
                Placement::Root {
                    origin: Point::new(-500.0, 0.0)
                }
            )]
        );
    }

    #[test]
    fn buffer_comes_from_policy() {
        let mut tree = CardTree::new();
        let parent = tree.add_card(None, Some(Point::ZERO));
        let child = tree.add_card(Some(parent), Some(Point::ZERO));
        let drag = DragEnd::new(child, Vec2::new(230.0, 0.0));

        let strict = DragPolicy::new(0.0).resolve(tree.state(), &drag).unwrap();
        assert!(matches!(strict, DragResolution::Orphaned { .. }));
        let loose = DragPolicy::new(50.0).resolve(tree.state(), &drag).unwrap();
        assert!(matches!(loose, DragResolution::Moved { .. }));
    }
}
