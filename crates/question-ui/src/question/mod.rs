//! The question component.
//!
//! [`Question`] owns the element tree of one rendered exercise: its sections,
//! its action buttons and the deferred work that animates them. Exercise
//! implementations register their sections when first attached (see
//! [`QuestionType`]) and drive feedback and buttons at runtime.
//!
//! # Ticks
//!
//! Visibility changes are never applied inside the call that requests them.
//! They are queued as deferred tasks and applied by
//! [`Question::process_timers`], which the host calls from its event loop
//! whenever [`Question::time_until_next_timer`] says work is due. Zero-delay
//! tasks batch everything requested within one tick; delayed tasks wait out
//! the collapse transition before detaching elements.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use question_core::ManualClock;
//! use question_ui::{FixedMetrics, Question, QuestionType};
//!
//! struct Quiz;
//!
//! impl QuestionType for Quiz {
//!     fn register_dom_elements(&mut self, question: &mut Question) {
//!         question.set_introduction("Which planet is largest?");
//!         question.add_button("check", "Check", || {}, true);
//!         question.add_button("retry", "Retry", || {}, false);
//!     }
//! }
//!
//! let clock = ManualClock::new();
//! let mut question = Question::new("quiz", Arc::new(FixedMetrics::new(400.0)))
//!     .with_clock(Arc::new(clock.clone()));
//!
//! let body = question.document_mut().create_root("body");
//! question.attach(&mut Quiz, body);
//!
//! question.hide_button("check");
//! question.show_button("retry");
//! question.process_timers();
//!
//! assert!(question.is_button_visible("retry"));
//! assert!(!question.is_button_visible("check"));
//!
//! question.set_feedback("Jupiter, well done!", Some(1), Some(1));
//! clock.advance(Duration::from_millis(150));
//! question.process_timers();
//! ```

mod buttons;
mod feedback;
mod focus;

use std::sync::Arc;
use std::time::Duration;

use question_core::{
    Clock, ElementId, ElementTree, Signal, SystemClock, TimerId, TimerQueue,
};

use crate::animation::{self, AnimationPhase};
use crate::button::ButtonBar;
use crate::config::QuestionConfig;
use crate::insert::insert_ordered;
use crate::measure::LayoutMeasure;
use crate::section::{SectionContent, SectionRegistry, Slot};

/// Implemented by exercises built on top of a [`Question`].
pub trait QuestionType {
    /// Register sections and buttons. Called once, on the first attach.
    fn register_dom_elements(&mut self, question: &mut Question);
}

/// Options for [`Question::set_content`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentOptions {
    /// Extra class added to the content section.
    pub class: Option<String>,
}

/// Deferred work, dispatched by [`Question::process_timers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    /// Apply all pending button show/hide requests.
    FlushButtons,
    /// Commit the feedback enter transition.
    RevealFeedback,
    /// Detach the feedback section if it is still meant to be hidden.
    DetachFeedback,
    /// Detach buttons hidden by a whole-bar collapse.
    DetachCollapsedButtons,
    /// One step of a resize animation.
    ResizeStep,
}

/// Feedback section state.
#[derive(Debug, Default)]
struct FeedbackState {
    /// Whether feedback is meant to be shown; re-checked by deferred detaches.
    shown: bool,
    phase: AnimationPhase,
    container: Option<ElementId>,
    content: Option<ElementId>,
    score_bar: Option<ElementId>,
    reveal_timer: Option<TimerId>,
    detach_timer: Option<TimerId>,
}

/// Repeating resize passes while a section animates.
#[derive(Debug, Default)]
struct ResizeAnimation {
    steps_left: u32,
    timer: Option<TimerId>,
}

/// Log an element tree failure and carry on.
///
/// Public operations never fail; a failure here means internal bookkeeping and
/// the tree disagree, and aborting half-way through a flush would only make
/// that worse.
pub(crate) fn log_failure(result: question_core::Result<()>, operation: &'static str) {
    if let Err(err) = result {
        tracing::warn!(target: "question_ui", operation, %err, "element tree operation failed");
    }
}

/// Base component for interactive exercises.
pub struct Question {
    type_name: String,
    config: QuestionConfig,
    tree: ElementTree,
    sections: SectionRegistry,
    buttons: ButtonBar,
    feedback: FeedbackState,
    resize: ResizeAnimation,
    /// Host container, set on first attach.
    wrapper: Option<ElementId>,
    registered: bool,
    timers: TimerQueue<Deferred>,
    clock: Arc<dyn Clock>,
    measure: Arc<dyn LayoutMeasure>,
    resized: Signal<()>,
    dom_elements_registered: Signal<()>,
}

impl Question {
    /// Create a question of the given type with the default configuration.
    pub fn new(type_name: impl Into<String>, measure: Arc<dyn LayoutMeasure>) -> Self {
        Self {
            type_name: type_name.into(),
            config: QuestionConfig::default(),
            tree: ElementTree::new(),
            sections: SectionRegistry::new(),
            buttons: ButtonBar::new(),
            feedback: FeedbackState::default(),
            resize: ResizeAnimation::default(),
            wrapper: None,
            registered: false,
            timers: TimerQueue::new(),
            clock: Arc::new(SystemClock),
            measure,
            resized: Signal::new(),
            dom_elements_registered: Signal::new(),
        }
    }

    /// Use a custom configuration.
    pub fn with_config(mut self, config: QuestionConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The question type, used for the `<prefix>-<type>` container class.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The active configuration.
    pub fn config(&self) -> &QuestionConfig {
        &self.config
    }

    /// The element tree the question renders into.
    pub fn document(&self) -> &ElementTree {
        &self.tree
    }

    /// Mutable access to the element tree, e.g. to create host containers or
    /// pre-built section content.
    pub fn document_mut(&mut self) -> &mut ElementTree {
        &mut self.tree
    }

    /// Emitted on every step of a resize animation.
    pub fn resized(&self) -> &Signal<()> {
        &self.resized
    }

    /// Emitted once, after the exercise registered its sections on first attach.
    pub fn dom_elements_registered(&self) -> &Signal<()> {
        &self.dom_elements_registered
    }

    // =========================================================================
    // Section registration
    // =========================================================================

    /// Check if a section has been registered.
    pub fn has_section(&self, slot: Slot) -> bool {
        self.sections.contains(slot)
    }

    /// Get the wrapper element of a registered section.
    pub fn section_element(&self, slot: Slot) -> Option<ElementId> {
        self.sections.element(slot)
    }

    fn register(&mut self, slot: Slot, content: Option<SectionContent>) -> Option<ElementId> {
        match self
            .sections
            .register(&mut self.tree, slot, &self.config.class_prefix, content)
        {
            Ok(element) => Some(element),
            Err(err) => {
                tracing::warn!(target: "question_ui::attach", %slot, %err, "section registration failed");
                None
            }
        }
    }

    /// Set the task image.
    ///
    /// Relative paths are resolved against the configured content base.
    /// Calling this again replaces the image section.
    pub fn set_image(&mut self, path: &str, alt: Option<&str>) {
        let result = self.try_set_image(path, alt);
        log_failure(result, "set_image");
    }

    fn try_set_image(&mut self, path: &str, alt: Option<&str>) -> question_core::Result<()> {
        let section = self.tree.create("div");
        self.tree.add_class(section, &self.config.class("image"))?;

        let wrap = self.tree.create("div");
        self.tree.add_class(wrap, &self.config.class("image-wrap"))?;
        self.tree.append(section, wrap)?;

        let img = self.tree.create("img");
        self.tree
            .set_attribute(img, "src", self.config.resolve_path(path))?;
        self.tree.set_attribute(img, "alt", alt.unwrap_or(""))?;
        self.tree.append(wrap, img)?;

        if let Some(previous) = self.sections.replace(Slot::Image, section) {
            let was_shown = self
                .wrapper
                .is_some_and(|wrapper| self.tree.parent(previous).ok().flatten() == Some(wrapper));
            self.tree.remove(previous)?;
            if was_shown {
                self.place_section(Slot::Image)?;
            }
        }
        Ok(())
    }

    /// Set the introduction section.
    pub fn set_introduction(&mut self, content: impl Into<SectionContent>) {
        self.register(Slot::Introduction, Some(content.into()));
    }

    /// Set the content section.
    pub fn set_content(&mut self, content: impl Into<SectionContent>, options: ContentOptions) {
        let Some(element) = self.register(Slot::Content, Some(content.into())) else {
            return;
        };
        if let Some(class) = options.class {
            log_failure(self.tree.add_class(element, &class), "set_content");
        }
    }

    /// Insert a registered section into the host container at its ordered position.
    fn place_section(&mut self, slot: Slot) -> question_core::Result<()> {
        let Some(wrapper) = self.wrapper else {
            return Ok(());
        };
        let sections = &self.sections;
        insert_ordered(
            &mut self.tree,
            &self.config.section_order,
            &slot,
            |s| sections.element(*s),
            wrapper,
        )?;
        Ok(())
    }

    // =========================================================================
    // Attach
    // =========================================================================

    /// Render the question into `container`.
    ///
    /// The first call asks `exercise` to register its sections. Every call
    /// clears the container and appends the registered sections in display
    /// order; hidden feedback is left out.
    pub fn attach<E: QuestionType + ?Sized>(&mut self, exercise: &mut E, container: ElementId) {
        if !self.registered {
            self.registered = true;
            exercise.register_dom_elements(self);
            self.dom_elements_registered.emit(());
        }
        let result = self.compose(container);
        log_failure(result, "attach");
        self.fit_buttons();
    }

    fn compose(&mut self, container: ElementId) -> question_core::Result<()> {
        self.wrapper = Some(container);
        self.tree.clear_children(container)?;
        self.tree.add_class(container, &self.config.class_prefix)?;
        self.tree
            .add_class(container, &self.config.class(&self.type_name))?;

        let feedback_shown = self.feedback.shown;
        let sections: Vec<(Slot, ElementId)> = self
            .sections
            .in_order(&self.config.section_order)
            .filter(|&(slot, _)| slot != Slot::Feedback || feedback_shown)
            .collect();
        for &(_, element) in &sections {
            self.tree.append(container, element)?;
        }
        tracing::debug!(
            target: "question_ui::attach",
            type_name = %self.type_name,
            section_count = sections.len(),
            "attached question"
        );

        if feedback_shown && self.feedback.phase != AnimationPhase::Visible {
            self.feedback.phase = AnimationPhase::Entering;
            self.schedule_feedback_reveal();
        }
        Ok(())
    }

    // =========================================================================
    // Timers
    // =========================================================================

    fn schedule(&mut self, delay: Duration, task: Deferred) -> TimerId {
        self.timers.schedule_once(self.clock.now(), delay, task)
    }

    /// Run every deferred task that is due. Returns how many ran.
    pub fn process_timers(&mut self) -> usize {
        let now = self.clock.now();
        let mut executed = 0;
        while let Some((id, task)) = self.timers.pop_expired(now) {
            tracing::trace!(target: "question_ui", ?task, "running deferred task");
            self.dispatch(id, task);
            executed += 1;
        }
        executed
    }

    /// Time until the next deferred task is due, if any is pending.
    pub fn time_until_next_timer(&mut self) -> Option<Duration> {
        let now = self.clock.now();
        self.timers.time_until_next(now)
    }

    /// Number of deferred tasks still pending.
    pub fn pending_timer_count(&self) -> usize {
        self.timers.active_count()
    }

    fn dispatch(&mut self, id: TimerId, task: Deferred) {
        match task {
            Deferred::FlushButtons => self.flush_buttons(),
            Deferred::RevealFeedback => self.reveal_feedback(),
            Deferred::DetachFeedback => self.detach_feedback(),
            Deferred::DetachCollapsedButtons => self.detach_collapsed_buttons(),
            Deferred::ResizeStep => self.resize_step(id),
        }
    }

    // =========================================================================
    // Resize
    // =========================================================================

    /// Re-measure the question after its container changed size.
    ///
    /// Re-snapshots the feedback height and refits the button labels.
    pub fn resize(&mut self) {
        self.resize_sections();
        self.fit_buttons();
    }

    fn resize_sections(&mut self) {
        if self.feedback.phase != AnimationPhase::Visible {
            return;
        }
        if let Some(element) = self.sections.element(Slot::Feedback) {
            let result = animation::snapshot_height(&mut self.tree, self.measure.as_ref(), element);
            log_failure(result, "resize_sections");
        }
    }

    /// Keep resizing every resize interval for the length of an animation.
    ///
    /// A longer request extends a running animation; a shorter one never
    /// cuts it short.
    pub fn resize_animation(&mut self, duration: Duration) {
        let interval = self.config.resize_interval.max(Duration::from_millis(1));
        let steps = duration.as_nanos().div_ceil(interval.as_nanos());
        let steps = u32::try_from(steps).unwrap_or(u32::MAX);
        if steps <= self.resize.steps_left {
            return;
        }
        self.resize.steps_left = steps;
        if self.resize.timer.is_none() {
            let now = self.clock.now();
            self.resize.timer = Some(self.timers.schedule_repeating(now, interval, Deferred::ResizeStep));
        }
    }

    fn resize_step(&mut self, id: TimerId) {
        self.resize.steps_left = self.resize.steps_left.saturating_sub(1);
        if self.resize.steps_left == 0 {
            let _ = self.timers.cancel(id);
            self.resize.timer = None;
        }
        self.resized.emit(());
        self.resize();
    }
}

impl std::fmt::Debug for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Question")
            .field("type_name", &self.type_name)
            .field("attached", &self.wrapper.is_some())
            .field("buttons", &self.buttons.order)
            .field("feedback_phase", &self.feedback.phase)
            .field("pending_timers", &self.timers.active_count())
            .finish()
    }
}

#[cfg(test)]
mod tests;
