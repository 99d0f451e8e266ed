//! Ordered insertion.
//!
//! Sections and buttons are declared in a logical order but only a subset is
//! present in their container at any time. [`insert_ordered`] places a newly
//! shown element right after its nearest present predecessor, so the
//! container's children always follow the declared order restricted to what
//! is currently shown.

use question_core::{ElementId, ElementTree};

/// Where an element ended up after [`insert_ordered`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Inserted as the first child of the container.
    First,
    /// Inserted directly after the given sibling.
    After(ElementId),
}

/// Insert the element for `id` into `container` according to `order`.
///
/// Walks backward from `id`'s position in `order`, skipping predecessors whose
/// element is not currently a child of `container`. With no present
/// predecessor the element is prepended, otherwise it is inserted directly
/// after the nearest one.
///
/// Returns `Ok(None)` and leaves the tree untouched if `id` is not part of
/// `order` or has no element.
pub fn insert_ordered<K, F>(
    tree: &mut ElementTree,
    order: &[K],
    id: &K,
    element_of: F,
    container: ElementId,
) -> question_core::Result<Option<Placement>>
where
    K: PartialEq,
    F: Fn(&K) -> Option<ElementId>,
{
    let Some(position) = order.iter().position(|k| k == id) else {
        return Ok(None);
    };
    let Some(element) = element_of(id) else {
        return Ok(None);
    };

    let predecessor = order[..position]
        .iter()
        .rev()
        .filter_map(&element_of)
        .find(|&candidate| {
            candidate != element && tree.parent(candidate).ok().flatten() == Some(container)
        });

    match predecessor {
        Some(sibling) => {
            tree.insert_after(sibling, element)?;
            Ok(Some(Placement::After(sibling)))
        }
        None => {
            tree.prepend(container, element)?;
            Ok(Some(Placement::First))
        }
    }
}
