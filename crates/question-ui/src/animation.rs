//! Height-transition conventions.
//!
//! Sections and the button bar animate by toggling a "visible" class and the
//! inline `max-height` style; the stylesheet transitions `max-height`. An
//! enter transition adds the class and snapshots the natural height, a
//! collapse removes the class and sets the height to zero. Elements are only
//! detached once the collapse window has elapsed.

use question_core::{ElementId, ElementTree, MaxHeight};

use crate::measure::LayoutMeasure;

/// Animation phase of a section that enters and leaves the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationPhase {
    /// Not in the document.
    #[default]
    Idle,
    /// Attached; the enter transition commits on the next tick.
    Entering,
    /// Attached with the visible class and a height snapshot.
    Visible,
    /// Collapsing; detached once the transition window elapses.
    Leaving,
}

impl AnimationPhase {
    /// Whether the section is (or is about to be) shown.
    #[inline]
    pub fn is_showing(&self) -> bool {
        matches!(self, AnimationPhase::Entering | AnimationPhase::Visible)
    }
}

/// Snapshot an element's natural height into its `max-height`.
///
/// Elements that are not rendered get an unconstrained height instead, since
/// there is nothing to animate.
pub(crate) fn snapshot_height(
    tree: &mut ElementTree,
    measure: &dyn LayoutMeasure,
    element: ElementId,
) -> question_core::Result<()> {
    let max_height = if tree.is_rendered(element) {
        MaxHeight::Px(measure.natural_height(tree, element))
    } else {
        MaxHeight::Unbounded
    };
    tree.set_max_height(element, max_height)
}

/// Commit an enter transition.
pub(crate) fn reveal(
    tree: &mut ElementTree,
    measure: &dyn LayoutMeasure,
    element: ElementId,
    visible_class: &str,
) -> question_core::Result<()> {
    tree.add_class(element, visible_class)?;
    snapshot_height(tree, measure, element)
}

/// Start a collapse transition.
pub(crate) fn collapse(
    tree: &mut ElementTree,
    element: ElementId,
    visible_class: &str,
) -> question_core::Result<()> {
    tree.remove_class(element, visible_class)?;
    tree.set_max_height(element, MaxHeight::Px(0.0))
}
