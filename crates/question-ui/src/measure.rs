//! Layout measurement.
//!
//! The question never lays elements out itself. Heights for the enter
//! transition and widths for button label fitting come from a
//! [`LayoutMeasure`] implementation supplied by the host renderer, which
//! measures an unconstrained off-screen copy of the element in whatever way
//! its layout engine allows.
//!
//! [`FixedMetrics`] is a headless implementation that derives sizes from
//! label length and child count. It is what tests and non-visual hosts use.

use std::collections::HashMap;

use parking_lot::Mutex;
use question_core::{ElementId, ElementTree};

/// Measures elements for transitions and button fitting.
pub trait LayoutMeasure: Send + Sync {
    /// Natural (unconstrained) height of an element.
    fn natural_height(&self, tree: &ElementTree, element: ElementId) -> f32;

    /// Inner width available inside a container.
    fn available_width(&self, tree: &ElementTree, container: ElementId) -> f32;

    /// Outer width of a button rendered without width constraints.
    ///
    /// `label` is the text the button would show; `None` measures the
    /// icon-only (truncated) form.
    fn button_width(&self, tree: &ElementTree, button: ElementId, label: Option<&str>) -> f32;
}

#[derive(Debug)]
struct Metrics {
    container_width: f32,
    overrides: HashMap<ElementId, (f32, f32)>,
}

/// Headless measurement from fixed font metrics.
///
/// A button measures `padding + icon_width + chars * char_width`, or just
/// `padding + icon_width` when truncated, unless an explicit
/// full/truncated width pair was set for it. Every container reports the same
/// available width, which can be changed at runtime to simulate a resize.
/// An element is one line tall per markup line in its subtree, at least one.
#[derive(Debug)]
pub struct FixedMetrics {
    char_width: f32,
    icon_width: f32,
    padding: f32,
    line_height: f32,
    inner: Mutex<Metrics>,
}

impl FixedMetrics {
    /// Create metrics for containers `container_width` pixels wide.
    pub fn new(container_width: f32) -> Self {
        Self {
            char_width: 8.0,
            icon_width: 16.0,
            padding: 16.0,
            line_height: 20.0,
            inner: Mutex::new(Metrics {
                container_width,
                overrides: HashMap::new(),
            }),
        }
    }

    /// Set the width of one label character.
    pub fn with_char_width(mut self, width: f32) -> Self {
        self.char_width = width;
        self
    }

    /// Set the width of a button's icon.
    pub fn with_icon_width(mut self, width: f32) -> Self {
        self.icon_width = width;
        self
    }

    /// Set the horizontal padding of a button.
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    /// Set the height of one line of content.
    pub fn with_line_height(mut self, height: f32) -> Self {
        self.line_height = height;
        self
    }

    /// Change the available container width.
    pub fn set_container_width(&self, width: f32) {
        self.inner.lock().container_width = width;
    }

    /// Get the available container width.
    pub fn container_width(&self) -> f32 {
        self.inner.lock().container_width
    }

    /// Pin a button's full and truncated widths.
    pub fn set_button_widths(&self, button: ElementId, full: f32, truncated: f32) {
        self.inner.lock().overrides.insert(button, (full, truncated));
    }
}

/// Markup lines of an element and all of its descendants.
fn text_lines(tree: &ElementTree, element: ElementId) -> usize {
    let own = tree.markup(element).map_or(0, |m| m.lines().count());
    let nested: usize = tree
        .children(element)
        .map(|children| children.iter().map(|&child| text_lines(tree, child)).sum())
        .unwrap_or(0);
    own + nested
}

impl LayoutMeasure for FixedMetrics {
    fn natural_height(&self, tree: &ElementTree, element: ElementId) -> f32 {
        text_lines(tree, element).max(1) as f32 * self.line_height
    }

    fn available_width(&self, _tree: &ElementTree, _container: ElementId) -> f32 {
        self.container_width()
    }

    fn button_width(&self, _tree: &ElementTree, button: ElementId, label: Option<&str>) -> f32 {
        if let Some(&(full, truncated)) = self.inner.lock().overrides.get(&button) {
            return if label.is_some_and(|l| !l.is_empty()) {
                full
            } else {
                truncated
            };
        }
        let chars = label.map_or(0, |l| l.chars().count());
        self.padding + self.icon_width + chars as f32 * self.char_width
    }
}
