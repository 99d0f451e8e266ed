//! Retained element tree.
//!
//! [`ElementTree`] is the document the question component renders into. It is
//! an arena of elements keyed by [`ElementId`], each with a tag, classes,
//! attributes, inner markup, an inline `max-height` style and an ordered list
//! of children.
//!
//! # Rendering
//!
//! Elements are created detached. An element counts as *rendered* once its
//! ancestor chain reaches a document root created with
//! [`ElementTree::create_root`]. Detaching an element (or any ancestor)
//! removes it from the rendered document without destroying it, so it can be
//! attached again later.
//!
//! # Focus
//!
//! The tree tracks a single focused element. Only rendered elements can take
//! focus, and detaching the focused element (or one of its ancestors) clears
//! focus.
//!
//! # Example
//!
//! ```
//! use question_core::ElementTree;
//!
//! let mut tree = ElementTree::new();
//! let body = tree.create_root("body");
//! let panel = tree.create("div");
//! tree.add_class(panel, "panel").unwrap();
//!
//! assert!(!tree.is_rendered(panel));
//! tree.append(body, panel).unwrap();
//! assert!(tree.is_rendered(panel));
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use slotmap::{SlotMap, new_key_type};

use crate::error::{CoreError, Result};

new_key_type! {
    /// A unique identifier for an element in an [`ElementTree`].
    pub struct ElementId;
}

/// The inline `max-height` style of an element.
///
/// Height transitions are driven by toggling this between zero and the
/// element's natural height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MaxHeight {
    /// No inline style; the stylesheet decides.
    #[default]
    Auto,
    /// Explicitly unconstrained (`max-height: none`).
    Unbounded,
    /// A fixed pixel height. `Px(0.0)` collapses the element.
    Px(f32),
}

impl MaxHeight {
    /// Whether this style collapses the element to zero height.
    #[inline]
    pub fn is_collapsed(&self) -> bool {
        matches!(self, MaxHeight::Px(h) if *h <= 0.0)
    }
}

/// Internal data stored for each element.
#[derive(Debug)]
struct ElementData {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    markup: String,
    max_height: MaxHeight,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    /// Document roots are always rendered.
    root: bool,
}

impl ElementData {
    fn new(tag: &str, root: bool) -> Self {
        Self {
            tag: tag.to_string(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            markup: String::new(),
            max_height: MaxHeight::Auto,
            parent: None,
            children: Vec::new(),
            root,
        }
    }
}

/// Arena-backed element tree with focus tracking.
#[derive(Debug, Default)]
pub struct ElementTree {
    elements: SlotMap<ElementId, ElementData>,
    focused: Option<ElementId>,
}

impl ElementTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            elements: SlotMap::with_key(),
            focused: None,
        }
    }

    /// Create a detached element with the given tag.
    pub fn create(&mut self, tag: &str) -> ElementId {
        let id = self.elements.insert(ElementData::new(tag, false));
        tracing::trace!(target: "question_core::element", ?id, tag, "created element");
        id
    }

    /// Create a document root. Everything attached below it is rendered.
    pub fn create_root(&mut self, tag: &str) -> ElementId {
        let id = self.elements.insert(ElementData::new(tag, true));
        tracing::trace!(target: "question_core::element", ?id, tag, "created document root");
        id
    }

    /// Check if an element exists.
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    /// Get the number of elements in the tree.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    fn data(&self, id: ElementId) -> Result<&ElementData> {
        self.elements.get(id).ok_or(CoreError::InvalidElementId)
    }

    fn data_mut(&mut self, id: ElementId) -> Result<&mut ElementData> {
        self.elements.get_mut(id).ok_or(CoreError::InvalidElementId)
    }

    /// Get the element's tag.
    pub fn tag(&self, id: ElementId) -> Result<&str> {
        self.data(id).map(|d| d.tag.as_str())
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Get the parent of an element.
    pub fn parent(&self, id: ElementId) -> Result<Option<ElementId>> {
        self.data(id).map(|d| d.parent)
    }

    /// Get the children of an element, in document order.
    pub fn children(&self, id: ElementId) -> Result<&[ElementId]> {
        self.data(id).map(|d| d.children.as_slice())
    }

    /// Check if `potential_ancestor` is `id` or one of its ancestors.
    fn is_ancestor_of(&self, potential_ancestor: ElementId, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            if current_id == potential_ancestor {
                return true;
            }
            current = self.elements.get(current_id).and_then(|d| d.parent);
        }
        false
    }

    /// Validate that `child` may be placed under `parent` and unlink it from
    /// its current position.
    fn take_for_insert(&mut self, parent: ElementId, child: ElementId) -> Result<()> {
        if !self.elements.contains_key(parent) || !self.elements.contains_key(child) {
            return Err(CoreError::InvalidElementId);
        }
        if self.is_ancestor_of(child, parent) {
            return Err(CoreError::CircularParentage);
        }
        self.unlink(child);
        Ok(())
    }

    /// Remove the element from its parent's child list without touching focus.
    fn unlink(&mut self, id: ElementId) {
        let old_parent = self.elements.get(id).and_then(|d| d.parent);
        if let Some(parent_id) = old_parent {
            if let Some(parent_data) = self.elements.get_mut(parent_id) {
                parent_data.children.retain(|&child| child != id);
            }
        }
        if let Some(data) = self.elements.get_mut(id) {
            data.parent = None;
        }
    }

    /// Append `child` as the last child of `parent`, moving it if needed.
    pub fn append(&mut self, parent: ElementId, child: ElementId) -> Result<()> {
        self.take_for_insert(parent, child)?;
        self.data_mut(child)?.parent = Some(parent);
        self.data_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Insert `child` as the first child of `parent`, moving it if needed.
    pub fn prepend(&mut self, parent: ElementId, child: ElementId) -> Result<()> {
        self.take_for_insert(parent, child)?;
        self.data_mut(child)?.parent = Some(parent);
        self.data_mut(parent)?.children.insert(0, child);
        Ok(())
    }

    /// Insert `child` directly after `reference` in the reference's parent.
    pub fn insert_after(&mut self, reference: ElementId, child: ElementId) -> Result<()> {
        if reference == child {
            return Ok(());
        }
        let parent = self.parent(reference)?.ok_or(CoreError::NotAttached)?;
        self.take_for_insert(parent, child)?;

        let parent_data = self.data_mut(parent)?;
        let position = parent_data
            .children
            .iter()
            .position(|&c| c == reference)
            .map_or(parent_data.children.len(), |pos| pos + 1);
        parent_data.children.insert(position, child);
        self.data_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Detach an element (and its subtree) from its parent.
    ///
    /// Clears focus if the focused element was inside the detached subtree.
    /// Detaching an already detached element is a no-op.
    pub fn detach(&mut self, id: ElementId) -> Result<()> {
        self.data(id)?;
        if let Some(focused) = self.focused {
            if self.is_ancestor_of(id, focused) {
                tracing::trace!(target: "question_core::element", ?focused, "focused element detached");
                self.focused = None;
            }
        }
        self.unlink(id);
        Ok(())
    }

    /// Destroy an element and its whole subtree.
    ///
    /// The element is detached first, so focus is cleared if it was inside
    /// the subtree. Every id in the subtree becomes invalid.
    pub fn remove(&mut self, id: ElementId) -> Result<()> {
        self.detach(id)?;
        let mut pending = vec![id];
        let mut removed = 0usize;
        while let Some(current) = pending.pop() {
            if let Some(data) = self.elements.remove(current) {
                pending.extend(data.children);
                removed += 1;
            }
        }
        tracing::trace!(target: "question_core::element", ?id, removed, "removed subtree");
        Ok(())
    }

    /// Detach all children of an element.
    pub fn clear_children(&mut self, id: ElementId) -> Result<()> {
        let children = self.data(id)?.children.clone();
        for child in children {
            self.detach(child)?;
        }
        Ok(())
    }

    /// Replace the element's inner markup, detaching any child elements.
    pub fn set_markup(&mut self, id: ElementId, markup: impl Into<String>) -> Result<()> {
        self.clear_children(id)?;
        self.data_mut(id)?.markup = markup.into();
        Ok(())
    }

    /// Get the element's inner markup.
    pub fn markup(&self, id: ElementId) -> Result<&str> {
        self.data(id).map(|d| d.markup.as_str())
    }

    /// Whether the element has neither children nor markup.
    pub fn is_empty(&self, id: ElementId) -> Result<bool> {
        self.data(id)
            .map(|d| d.children.is_empty() && d.markup.is_empty())
    }

    /// Whether the element is part of a rendered document.
    ///
    /// Returns `false` for unknown ids.
    pub fn is_rendered(&self, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            let Some(data) = self.elements.get(current_id) else {
                return false;
            };
            if data.root {
                return true;
            }
            current = data.parent;
        }
        false
    }

    // =========================================================================
    // Classes, attributes, style
    // =========================================================================

    /// Add a class if not already present.
    pub fn add_class(&mut self, id: ElementId, class: &str) -> Result<()> {
        let data = self.data_mut(id)?;
        if !data.classes.iter().any(|c| c == class) {
            data.classes.push(class.to_string());
        }
        Ok(())
    }

    /// Remove a class if present.
    pub fn remove_class(&mut self, id: ElementId, class: &str) -> Result<()> {
        self.data_mut(id)?.classes.retain(|c| c != class);
        Ok(())
    }

    /// Check whether the element carries a class. Unknown ids have no classes.
    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.elements
            .get(id)
            .is_some_and(|d| d.classes.iter().any(|c| c == class))
    }

    /// Get the element's classes in insertion order.
    pub fn classes(&self, id: ElementId) -> Result<&[String]> {
        self.data(id).map(|d| d.classes.as_slice())
    }

    /// Set an attribute value.
    pub fn set_attribute(
        &mut self,
        id: ElementId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        self.data_mut(id)?
            .attributes
            .insert(name.into(), value.into());
        Ok(())
    }

    /// Get an attribute value.
    pub fn attribute(&self, id: ElementId, name: &str) -> Result<Option<&str>> {
        self.data(id)
            .map(|d| d.attributes.get(name).map(String::as_str))
    }

    /// Set the inline `max-height` style.
    pub fn set_max_height(&mut self, id: ElementId, max_height: MaxHeight) -> Result<()> {
        self.data_mut(id)?.max_height = max_height;
        Ok(())
    }

    /// Get the inline `max-height` style.
    pub fn max_height(&self, id: ElementId) -> Result<MaxHeight> {
        self.data(id).map(|d| d.max_height)
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Move focus to an element.
    ///
    /// Returns `false` (and leaves focus unchanged) if the element is not
    /// rendered.
    pub fn focus(&mut self, id: ElementId) -> bool {
        if !self.is_rendered(id) {
            return false;
        }
        self.focused = Some(id);
        true
    }

    /// Get the focused element.
    #[inline]
    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    /// Check if a specific element has focus.
    #[inline]
    pub fn has_focus(&self, id: ElementId) -> bool {
        self.focused == Some(id)
    }

    /// Clear focus.
    pub fn blur(&mut self) {
        self.focused = None;
    }

    // =========================================================================
    // Debug / Diagnostics
    // =========================================================================

    /// Debug dump of the subtree rooted at `id`.
    pub fn dump_tree(&self, id: ElementId) -> Result<String> {
        let mut output = String::new();
        self.dump_tree_recursive(id, 0, &mut output)?;
        Ok(output)
    }

    fn dump_tree_recursive(&self, id: ElementId, depth: usize, output: &mut String) -> Result<()> {
        let data = self.data(id)?;
        let indent = "  ".repeat(depth);
        let _ = write!(output, "{indent}<{}", data.tag);
        if !data.classes.is_empty() {
            let _ = write!(output, " class=\"{}\"", data.classes.join(" "));
        }
        let _ = write!(output, ">");
        if !data.markup.is_empty() {
            let _ = write!(output, " {}", data.markup);
        }
        output.push('\n');
        for &child_id in &data.children {
            self.dump_tree_recursive(child_id, depth + 1, output)?;
        }
        Ok(())
    }
}
