//! Keyboard focus across the button bar.

use super::Question;

impl Question {
    /// Move keyboard focus to a button.
    ///
    /// With an id, focuses that button if it is visible. Without one, focuses
    /// the first button in registration order that is not being hidden.
    /// Returns whether focus moved; nothing happens when no candidate exists.
    pub fn focus_button(&mut self, id: Option<&str>) -> bool {
        match id {
            Some(id) => {
                let Some(button) = self.buttons.get(id) else {
                    return false;
                };
                button.visible && self.tree.focus(button.element)
            }
            None => {
                for id in &self.buttons.order {
                    if self.buttons.is_hiding(id) {
                        continue;
                    }
                    let Some(element) = self.buttons.element(id) else {
                        continue;
                    };
                    if self.tree.focus(element) {
                        tracing::trace!(target: "question_ui::buttons", id = %id, "focused button");
                        return true;
                    }
                }
                false
            }
        }
    }
}
