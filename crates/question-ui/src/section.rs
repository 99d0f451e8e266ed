//! Section registry.
//!
//! A question is made of a fixed set of [`Slot`]s. Each registered slot owns
//! one wrapper element carrying the `<prefix>-<slot>` class; the registry maps
//! slots to those elements and applies section content to them.

use std::fmt;

use question_core::{ElementId, ElementTree};

/// One of the fixed regions of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Slot {
    /// Task image.
    Image,
    /// Introduction text.
    Introduction,
    /// The interactive content of the exercise.
    Content,
    /// Feedback shown after checking an answer.
    Feedback,
    /// The action button bar.
    Buttons,
}

impl Slot {
    /// All slots in their default display order.
    pub const ALL: [Slot; 5] = [
        Slot::Image,
        Slot::Introduction,
        Slot::Content,
        Slot::Feedback,
        Slot::Buttons,
    ];

    /// The slot name used in class names.
    pub fn name(&self) -> &'static str {
        match self {
            Slot::Image => "image",
            Slot::Introduction => "introduction",
            Slot::Content => "content",
            Slot::Feedback => "feedback",
            Slot::Buttons => "buttons",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Content placed into a section.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionContent {
    /// Raw markup; replaces the section's inner markup entirely.
    Markup(String),
    /// A pre-built element; appended to the section.
    Element(ElementId),
}

impl SectionContent {
    /// Whether this content would render nothing.
    pub fn is_empty(&self) -> bool {
        matches!(self, SectionContent::Markup(m) if m.is_empty())
    }
}

impl From<&str> for SectionContent {
    fn from(markup: &str) -> Self {
        SectionContent::Markup(markup.to_string())
    }
}

impl From<String> for SectionContent {
    fn from(markup: String) -> Self {
        SectionContent::Markup(markup)
    }
}

impl From<ElementId> for SectionContent {
    fn from(element: ElementId) -> Self {
        SectionContent::Element(element)
    }
}

/// Maps slots to their wrapper elements.
#[derive(Debug, Default)]
pub struct SectionRegistry {
    sections: [Option<ElementId>; Slot::ALL.len()],
}

fn index(slot: Slot) -> usize {
    slot as usize
}

impl SectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the wrapper element of a registered slot.
    pub fn element(&self, slot: Slot) -> Option<ElementId> {
        self.sections[index(slot)]
    }

    /// Check if a slot has been registered.
    pub fn contains(&self, slot: Slot) -> bool {
        self.element(slot).is_some()
    }

    /// Register a slot, creating its wrapper element on first use.
    ///
    /// Content, if given, is applied as by [`update`](Self::update); markup
    /// replaces the inner markup while an element is appended after it.
    /// Registering an existing slot reuses its wrapper.
    pub fn register(
        &mut self,
        tree: &mut ElementTree,
        slot: Slot,
        class_prefix: &str,
        content: Option<SectionContent>,
    ) -> question_core::Result<ElementId> {
        let element = match self.element(slot) {
            Some(element) => element,
            None => {
                let element = tree.create("div");
                tree.add_class(element, &format!("{class_prefix}-{slot}"))?;
                self.sections[index(slot)] = Some(element);
                tracing::trace!(target: "question_ui::attach", %slot, "registered section");
                element
            }
        };
        if let Some(content) = content {
            self.update(tree, slot, content)?;
        }
        Ok(element)
    }

    /// Replace the content of an existing slot.
    ///
    /// Returns `Ok(false)` without touching the tree if the slot has not been
    /// registered.
    pub fn update(
        &mut self,
        tree: &mut ElementTree,
        slot: Slot,
        content: SectionContent,
    ) -> question_core::Result<bool> {
        let Some(element) = self.element(slot) else {
            return Ok(false);
        };
        apply(tree, element, content)?;
        Ok(true)
    }

    /// Install a caller-built wrapper for a slot, replacing any previous one.
    ///
    /// Returns the replaced wrapper so the caller can remove it.
    pub fn replace(&mut self, slot: Slot, element: ElementId) -> Option<ElementId> {
        self.sections[index(slot)].replace(element)
    }

    /// Iterate over registered slots in the given order.
    pub fn in_order<'a>(
        &'a self,
        order: &'a [Slot],
    ) -> impl Iterator<Item = (Slot, ElementId)> + 'a {
        order
            .iter()
            .filter_map(|&slot| self.element(slot).map(|element| (slot, element)))
    }
}

/// Replace the content of `element`.
///
/// Child elements the new content replaces are destroyed; the section owns
/// whatever was placed into it. Passing the element that is already the
/// content keeps it.
pub(crate) fn apply(
    tree: &mut ElementTree,
    element: ElementId,
    content: SectionContent,
) -> question_core::Result<()> {
    let keep = match &content {
        SectionContent::Element(child) => Some(*child),
        SectionContent::Markup(_) => None,
    };
    let replaced: Vec<ElementId> = tree
        .children(element)?
        .iter()
        .copied()
        .filter(|&child| Some(child) != keep)
        .collect();
    for child in replaced {
        tree.remove(child)?;
    }

    match content {
        SectionContent::Markup(markup) => tree.set_markup(element, markup),
        SectionContent::Element(child) => {
            tree.set_markup(element, "")?;
            tree.append(element, child)
        }
    }
}
