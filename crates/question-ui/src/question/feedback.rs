//! Feedback section lifecycle.
//!
//! The feedback section moves through `Idle -> Entering -> Visible -> Leaving
//! -> Idle`. Showing inserts the section right away but commits the enter
//! transition on the next tick. Hiding collapses it right away and detaches
//! it once the transition window has elapsed, unless it was shown again in
//! the meantime.

use std::time::Duration;

use question_core::ElementId;

use super::{Deferred, Question, log_failure};
use crate::animation::{self, AnimationPhase};
use crate::section::{self, SectionContent, Slot};

impl Question {
    /// Show, update or hide the feedback section.
    ///
    /// Non-empty content shows the section (or updates it in place if it is
    /// already shown). A score bar is added above the content when both
    /// `score` and `max_score` are given. Empty content hides the section;
    /// hiding feedback that is not shown does nothing.
    pub fn set_feedback(
        &mut self,
        content: impl Into<SectionContent>,
        score: Option<u32>,
        max_score: Option<u32>,
    ) {
        let content = content.into();
        if content.is_empty() {
            self.hide_feedback();
            return;
        }

        let result = self.fill_feedback(content, score.zip(max_score));
        log_failure(result, "set_feedback");

        self.feedback.shown = true;
        match self.feedback.phase {
            AnimationPhase::Entering | AnimationPhase::Visible => {
                // An entering section is measured when it reveals.
                self.resize_sections();
                tracing::trace!(target: "question_ui::feedback", "updated feedback in place");
            }
            AnimationPhase::Idle | AnimationPhase::Leaving => {
                let result = self.place_section(Slot::Feedback);
                log_failure(result, "set_feedback");
                self.feedback.phase = AnimationPhase::Entering;
                self.schedule_feedback_reveal();
                self.resize_animation(self.config.transition_duration);
                tracing::debug!(target: "question_ui::feedback", "showing feedback");
            }
        }
    }

    /// Register the feedback section on first use and write the new content.
    fn fill_feedback(
        &mut self,
        content: SectionContent,
        score: Option<(u32, u32)>,
    ) -> question_core::Result<()> {
        let (container, content_element) = match (self.feedback.container, self.feedback.content) {
            (Some(container), Some(content_element)) => (container, content_element),
            _ => {
                let Some(section) = self.register(Slot::Feedback, None) else {
                    return Ok(());
                };
                let container = self.tree.create("div");
                self.tree
                    .add_class(container, &self.config.class("feedback-container"))?;
                let content_element = self.tree.create("div");
                self.tree
                    .add_class(content_element, &self.config.class("feedback-content"))?;
                self.tree.append(container, content_element)?;
                self.tree.append(section, container)?;

                self.feedback.container = Some(container);
                self.feedback.content = Some(content_element);
                (container, content_element)
            }
        };

        section::apply(&mut self.tree, content_element, content)?;

        if let Some((score, max_score)) = score {
            let score_bar = self.score_bar(container)?;
            self.tree
                .set_attribute(score_bar, "data-score", score.to_string())?;
            self.tree
                .set_attribute(score_bar, "data-max-score", max_score.to_string())?;
            self.tree
                .set_markup(score_bar, format!("{score}/{max_score}"))?;
        }
        Ok(())
    }

    /// The score bar, created above the feedback content on first use.
    fn score_bar(&mut self, container: ElementId) -> question_core::Result<ElementId> {
        if let Some(score_bar) = self.feedback.score_bar {
            return Ok(score_bar);
        }
        let score_bar = self.tree.create("div");
        self.tree.add_class(score_bar, &self.config.class("scorebar"))?;
        self.tree.prepend(container, score_bar)?;
        self.feedback.score_bar = Some(score_bar);
        Ok(score_bar)
    }

    fn hide_feedback(&mut self) {
        if !self.feedback.shown {
            return;
        }
        self.feedback.shown = false;
        self.feedback.phase = AnimationPhase::Leaving;

        if let Some(section) = self.sections.element(Slot::Feedback) {
            let result = animation::collapse(&mut self.tree, section, &self.config.visible_class());
            log_failure(result, "hide_feedback");
        }

        // Restart the window so an earlier detach cannot cut this collapse short.
        if let Some(timer) = self.feedback.detach_timer.take() {
            let _ = self.timers.cancel(timer);
        }
        let delay = self.config.transition_duration;
        self.feedback.detach_timer = Some(self.schedule(delay, Deferred::DetachFeedback));
        self.resize_animation(delay);
        tracing::debug!(target: "question_ui::feedback", ?delay, "hiding feedback");
    }

    pub(super) fn schedule_feedback_reveal(&mut self) {
        if self.feedback.reveal_timer.is_some() {
            return;
        }
        self.feedback.reveal_timer = Some(self.schedule(Duration::ZERO, Deferred::RevealFeedback));
    }

    pub(super) fn reveal_feedback(&mut self) {
        self.feedback.reveal_timer = None;
        if !self.feedback.shown || self.feedback.phase != AnimationPhase::Entering {
            return;
        }
        let Some(section) = self.sections.element(Slot::Feedback) else {
            return;
        };
        let result = animation::reveal(
            &mut self.tree,
            self.measure.as_ref(),
            section,
            &self.config.visible_class(),
        );
        log_failure(result, "reveal_feedback");
        self.feedback.phase = AnimationPhase::Visible;
        tracing::trace!(target: "question_ui::feedback", "feedback visible");
    }

    pub(super) fn detach_feedback(&mut self) {
        self.feedback.detach_timer = None;
        if self.feedback.shown {
            tracing::trace!(target: "question_ui::feedback", "feedback shown again, keeping it");
            return;
        }
        if let Some(section) = self.sections.element(Slot::Feedback) {
            log_failure(self.tree.detach(section), "detach_feedback");
        }
        self.feedback.phase = AnimationPhase::Idle;
        tracing::debug!(target: "question_ui::feedback", "feedback detached");
    }

    /// Current phase of the feedback section.
    pub fn feedback_phase(&self) -> AnimationPhase {
        self.feedback.phase
    }

    /// Whether feedback is meant to be shown.
    pub fn is_feedback_shown(&self) -> bool {
        self.feedback.shown
    }
}
