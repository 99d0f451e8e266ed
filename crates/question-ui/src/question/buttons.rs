//! Action buttons and their visibility scheduler.

use std::time::Duration;

use question_core::{ElementId, Signal};

use super::{Deferred, Question, log_failure};
use crate::animation;
use crate::button::{Button, RequestOutcome, Visibility};
use crate::fit::{self, FitReport};
use crate::insert::insert_ordered;
use crate::section::Slot;

impl Question {
    /// Register an action button.
    ///
    /// Ids are unique; adding an id twice keeps the first button. A button
    /// added as `visible` is appended to the bar right away, without going
    /// through the scheduler.
    pub fn add_button<F>(&mut self, id: &str, label: &str, on_click: F, visible: bool)
    where
        F: Fn() + Send + Sync + 'static,
    {
        if self.buttons.contains(id) {
            tracing::trace!(target: "question_ui::buttons", id, "button already registered");
            return;
        }
        let result = self.try_add_button(id, label, on_click, visible);
        log_failure(result, "add_button");
    }

    fn try_add_button<F>(
        &mut self,
        id: &str,
        label: &str,
        on_click: F,
        visible: bool,
    ) -> question_core::Result<()>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let newly_registered = !self.sections.contains(Slot::Buttons);
        let Some(container) = self.register(Slot::Buttons, None) else {
            return Ok(());
        };
        if newly_registered {
            self.place_section(Slot::Buttons)?;
        }

        let element = self.tree.create("button");
        self.tree.add_class(element, &self.config.class("button"))?;
        self.tree.add_class(element, &self.config.class(id))?;
        self.tree.set_markup(element, label)?;

        let clicked = Signal::new();
        clicked.connect(move |_: &()| on_click());

        self.buttons.insert(
            id,
            Button {
                label: label.to_string(),
                element,
                clicked,
                truncated: false,
                visible,
                desired_visible: visible,
            },
        );

        if visible {
            self.tree.append(container, element)?;
            let visible_class = self.config.visible_class();
            if !self.tree.has_class(container, &visible_class) {
                self.reopen_button_bar(container, &visible_class);
            }
        }
        tracing::debug!(target: "question_ui::buttons", id, visible, "added button");
        Ok(())
    }

    /// Request that a button be shown on the next tick.
    pub fn show_button(&mut self, id: &str) -> RequestOutcome {
        self.request_button(id, Visibility::Show)
    }

    /// Request that a button be hidden on the next tick.
    pub fn hide_button(&mut self, id: &str) -> RequestOutcome {
        self.request_button(id, Visibility::Hide)
    }

    fn request_button(&mut self, id: &str, visibility: Visibility) -> RequestOutcome {
        let outcome = self.buttons.request(id, visibility);
        tracing::trace!(target: "question_ui::buttons", id, ?visibility, ?outcome, "visibility request");
        if outcome == RequestOutcome::Queued && self.buttons.flush_timer.is_none() {
            self.buttons.flush_timer = Some(self.schedule(Duration::ZERO, Deferred::FlushButtons));
        }
        outcome
    }

    /// Apply every pending show and hide request.
    pub(super) fn flush_buttons(&mut self) {
        self.buttons.flush_timer = None;
        if self.buttons.pending_show.is_empty() && self.buttons.pending_hide.is_empty() {
            return;
        }
        let Some(container) = self.sections.element(Slot::Buttons) else {
            return;
        };

        let focused_hiding = self.buttons.pending_hide.iter().any(|id| {
            self.buttons
                .element(id)
                .is_some_and(|element| self.tree.has_focus(element))
        });

        let shows = std::mem::take(&mut self.buttons.pending_show);
        tracing::debug!(
            target: "question_ui::buttons",
            ?shows,
            hides = ?self.buttons.pending_hide,
            "flushing buttons"
        );

        for id in &shows {
            let buttons = &self.buttons;
            let result = insert_ordered(
                &mut self.tree,
                &buttons.order,
                id,
                |key| buttons.element(key),
                container,
            );
            if let Err(err) = result {
                tracing::warn!(target: "question_ui::buttons", id = %id, %err, "failed to insert button");
                continue;
            }
            self.buttons.collapsing.retain(|c| c != id);
            if let Some(button) = self.buttons.get_mut(id) {
                button.visible = true;
            }
        }

        // Shown buttons are attached now and can take focus; hiding ones still count as hiding.
        if focused_hiding {
            self.focus_button(None);
        }
        let hides = std::mem::take(&mut self.buttons.pending_hide);

        let visible = self.buttons.visible_ids();
        let hides_everything = !hides.is_empty()
            && visible.len() == hides.len()
            && visible.iter().all(|id| hides.contains(id));

        if hides_everything {
            self.collapse_button_bar(container, hides);
        } else {
            for id in &hides {
                let Some(button) = self.buttons.get_mut(id) else { continue };
                button.visible = false;
                let element = button.element;
                log_failure(self.tree.detach(element), "flush_buttons");
            }
        }

        let visible_class = self.config.visible_class();
        if !self.buttons.visible_ids().is_empty() && !self.tree.has_class(container, &visible_class) {
            self.reopen_button_bar(container, &visible_class);
        }

        self.fit_buttons();
    }

    /// Collapse the whole bar and detach the buttons once the transition ends.
    fn collapse_button_bar(&mut self, container: ElementId, hides: Vec<String>) {
        for id in &hides {
            if let Some(button) = self.buttons.get_mut(id) {
                button.visible = false;
            }
        }
        self.buttons.collapsing.extend(hides);

        let result = animation::collapse(&mut self.tree, container, &self.config.visible_class());
        log_failure(result, "collapse_button_bar");

        if let Some(timer) = self.buttons.collapse_timer.take() {
            let _ = self.timers.cancel(timer);
        }
        let delay = self.config.transition_duration;
        self.buttons.collapse_timer = Some(self.schedule(delay, Deferred::DetachCollapsedButtons));
        tracing::debug!(target: "question_ui::buttons", ?delay, "collapsing button bar");
    }

    /// Bring the bar back after it was empty or collapsed.
    fn reopen_button_bar(&mut self, container: ElementId, visible_class: &str) {
        // Buttons left over from an interrupted collapse must not reappear.
        if let Some(timer) = self.buttons.collapse_timer.take() {
            let _ = self.timers.cancel(timer);
        }
        for id in std::mem::take(&mut self.buttons.collapsing) {
            if let Some(element) = self.buttons.element(&id) {
                log_failure(self.tree.detach(element), "reopen_button_bar");
            }
        }

        let result = animation::reveal(&mut self.tree, self.measure.as_ref(), container, visible_class);
        log_failure(result, "reopen_button_bar");
        tracing::debug!(target: "question_ui::buttons", "button bar visible");
    }

    pub(super) fn detach_collapsed_buttons(&mut self) {
        self.buttons.collapse_timer = None;
        for id in std::mem::take(&mut self.buttons.collapsing) {
            let Some(button) = self.buttons.get(&id) else { continue };
            if button.desired_visible {
                continue;
            }
            let element = button.element;
            log_failure(self.tree.detach(element), "detach_collapsed_buttons");
        }
        tracing::trace!(target: "question_ui::buttons", "collapsed buttons detached");
    }

    /// Refit button labels to the bar's current width.
    pub(super) fn fit_buttons(&mut self) -> Option<FitReport> {
        let container = self.sections.element(Slot::Buttons)?;
        if !self.tree.is_rendered(container) {
            return None;
        }
        match fit::fit_buttons(
            &mut self.buttons,
            &mut self.tree,
            self.measure.as_ref(),
            container,
            self.config.button_margin,
            &self.config.class("truncated"),
        ) {
            Ok(report) => Some(report),
            Err(err) => {
                tracing::warn!(target: "question_ui::fit", %err, "button fitting failed");
                None
            }
        }
    }

    /// Invoke a button's click handler. Unknown ids are ignored.
    pub fn click_button(&self, id: &str) {
        if let Some(button) = self.buttons.get(id) {
            button.clicked.emit(());
        }
    }

    /// Check if a button has been registered.
    pub fn has_button(&self, id: &str) -> bool {
        self.buttons.contains(id)
    }

    /// Whether the button is committed visible.
    ///
    /// Pending requests are not reflected until the next tick.
    pub fn is_button_visible(&self, id: &str) -> bool {
        self.buttons.get(id).is_some_and(|b| b.visible)
    }

    /// Whether the button's label is currently dropped to save space.
    pub fn is_button_truncated(&self, id: &str) -> bool {
        self.buttons.get(id).is_some_and(|b| b.truncated)
    }

    /// Get a button's element.
    pub fn button_element(&self, id: &str) -> Option<ElementId> {
        self.buttons.element(id)
    }

    /// Ids of the committed-visible buttons, in display order.
    pub fn visible_buttons(&self) -> Vec<String> {
        self.buttons.visible_ids()
    }
}
