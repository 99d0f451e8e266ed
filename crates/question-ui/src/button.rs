//! Button records and pending visibility requests.
//!
//! [`ButtonBar`] holds every registered button together with the requests
//! waiting for the next flush. A button id is never in both pending sets: a
//! request in the opposite direction cancels the pending one instead, so a
//! show/hide pair issued within one tick has no effect at all.

use std::collections::HashMap;

use question_core::{ElementId, Signal, TimerId};

/// Direction of a visibility request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Make the button visible.
    Show,
    /// Hide the button.
    Hide,
}

/// What a visibility request did to the pending sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// No button with that id.
    UnknownButton,
    /// The same request is already pending.
    AlreadyPending,
    /// The opposite request was pending and has been withdrawn.
    CancelledOpposite,
    /// The button is already in the requested state.
    Unchanged,
    /// The request was queued for the next flush.
    Queued,
}

/// A registered action button.
#[derive(Debug)]
pub(crate) struct Button {
    pub(crate) label: String,
    pub(crate) element: ElementId,
    pub(crate) clicked: Signal<()>,
    /// Label removed to save horizontal space.
    pub(crate) truncated: bool,
    /// Committed state: attached to the bar and not on its way out.
    pub(crate) visible: bool,
    /// Last requested state, possibly not yet flushed.
    pub(crate) desired_visible: bool,
}

/// Registered buttons plus the scheduler's pending state.
#[derive(Debug, Default)]
pub(crate) struct ButtonBar {
    buttons: HashMap<String, Button>,
    /// Registration order; also the display order.
    pub(crate) order: Vec<String>,
    pub(crate) pending_show: Vec<String>,
    pub(crate) pending_hide: Vec<String>,
    /// Buttons waiting for the whole-bar collapse to finish before detaching.
    pub(crate) collapsing: Vec<String>,
    pub(crate) flush_timer: Option<TimerId>,
    pub(crate) collapse_timer: Option<TimerId>,
}

impl ButtonBar {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.buttons.contains_key(id)
    }

    pub(crate) fn get(&self, id: &str) -> Option<&Button> {
        self.buttons.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Button> {
        self.buttons.get_mut(id)
    }

    pub(crate) fn element(&self, id: &str) -> Option<ElementId> {
        self.buttons.get(id).map(|b| b.element)
    }

    /// Register a button. Returns `false` if the id is already taken.
    pub(crate) fn insert(&mut self, id: &str, button: Button) -> bool {
        if self.buttons.contains_key(id) {
            return false;
        }
        self.buttons.insert(id.to_string(), button);
        self.order.push(id.to_string());
        true
    }

    /// Whether a hide is pending or in progress for the button.
    pub(crate) fn is_hiding(&self, id: &str) -> bool {
        self.pending_hide.iter().any(|h| h == id) || self.collapsing.iter().any(|c| c == id)
    }

    /// Ids of committed-visible buttons, in display order.
    pub(crate) fn visible_ids(&self) -> Vec<String> {
        self.order
            .iter()
            .filter(|id| self.buttons.get(id.as_str()).is_some_and(|b| b.visible))
            .cloned()
            .collect()
    }

    /// Resolve a show/hide request against the pending sets.
    pub(crate) fn request(&mut self, id: &str, visibility: Visibility) -> RequestOutcome {
        let Some(button) = self.buttons.get_mut(id) else {
            return RequestOutcome::UnknownButton;
        };

        let (same, opposite) = match visibility {
            Visibility::Show => (&mut self.pending_show, &mut self.pending_hide),
            Visibility::Hide => (&mut self.pending_hide, &mut self.pending_show),
        };

        if same.iter().any(|p| p == id) {
            return RequestOutcome::AlreadyPending;
        }

        button.desired_visible = visibility == Visibility::Show;

        if let Some(pos) = opposite.iter().position(|p| p == id) {
            opposite.remove(pos);
            return RequestOutcome::CancelledOpposite;
        }

        if button.visible == button.desired_visible {
            return RequestOutcome::Unchanged;
        }

        same.push(id.to_string());
        RequestOutcome::Queued
    }
}
