//! Button width fitting.
//!
//! When the visible buttons no longer fit the bar, labels are dropped from the
//! end of the button order (keeping the icon) until they do. When space frees
//! up, labels are restored greedily from the start of the order, stopping at
//! the first button whose label would not fit.
//!
//! Widths are measured in the button's current state, so the running total
//! always reflects what is actually rendered.

use question_core::{ElementId, ElementTree};

use crate::button::ButtonBar;
use crate::measure::LayoutMeasure;

/// What a fitting pass changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitReport {
    /// Summed outer width of the visible buttons after the pass.
    pub total_width: f32,
    /// Width the buttons had to stay below.
    pub available_width: f32,
    /// Buttons whose label was removed, in the order it happened.
    pub truncated: Vec<String>,
    /// Buttons whose label was restored, in the order it happened.
    pub restored: Vec<String>,
}

/// Measure the visible buttons and truncate or restore labels to fit `container`.
pub(crate) fn fit_buttons(
    bar: &mut ButtonBar,
    tree: &mut ElementTree,
    measure: &dyn LayoutMeasure,
    container: ElementId,
    margin: f32,
    truncated_class: &str,
) -> question_core::Result<FitReport> {
    let mut total = margin;
    for id in &bar.order {
        let Some(button) = bar.get(id) else { continue };
        if button.visible {
            let label = (!button.truncated).then_some(button.label.as_str());
            total += measure.button_width(tree, button.element, label) + margin;
        }
    }
    let available = measure.available_width(tree, container) - margin;

    let mut report = FitReport {
        available_width: available,
        ..FitReport::default()
    };

    let order = bar.order.clone();
    if total >= available {
        for id in order.iter().rev() {
            let Some(button) = bar.get_mut(id) else { continue };
            if !button.visible || button.truncated {
                continue;
            }

            let full = measure.button_width(tree, button.element, Some(&button.label));
            let icon_only = measure.button_width(tree, button.element, None);
            total += icon_only - full;

            tree.set_markup(button.element, "")?;
            tree.add_class(button.element, truncated_class)?;
            button.truncated = true;
            report.truncated.push(id.clone());

            if total < available {
                break;
            }
        }
    } else {
        for id in &order {
            let Some(button) = bar.get_mut(id) else { continue };
            if !button.visible || !button.truncated {
                continue;
            }

            let icon_only = measure.button_width(tree, button.element, None);
            let full = measure.button_width(tree, button.element, Some(&button.label));
            let candidate = total - icon_only + full;
            if candidate >= available {
                break;
            }

            tree.set_markup(button.element, button.label.clone())?;
            tree.remove_class(button.element, truncated_class)?;
            button.truncated = false;
            total = candidate;
            report.restored.push(id.clone());
        }
    }

    report.total_width = total;
    if !report.truncated.is_empty() || !report.restored.is_empty() {
        tracing::debug!(
            target: "question_ui::fit",
            total_width = total,
            available_width = available,
            truncated = ?report.truncated,
            restored = ?report.restored,
            "refitted button labels"
        );
    }
    Ok(report)
}
