//! Tests for the question component.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use question_core::{ElementId, ManualClock, MaxHeight};

use super::*;
use crate::button::RequestOutcome;
use crate::measure::FixedMetrics;

/// Exercise that registers whatever the closure registers.
struct TestExercise<F: FnMut(&mut Question)>(F);

impl<F: FnMut(&mut Question)> QuestionType for TestExercise<F> {
    fn register_dom_elements(&mut self, question: &mut Question) {
        (self.0)(question)
    }
}

struct Fixture {
    clock: ManualClock,
    question: Question,
    body: ElementId,
}

impl Fixture {
    fn new() -> Self {
        Self::with_config(QuestionConfig::default())
    }

    fn with_config(config: QuestionConfig) -> Self {
        let clock = ManualClock::new();
        let mut question = Question::new("quiz", Arc::new(FixedMetrics::new(400.0)))
            .with_config(config)
            .with_clock(Arc::new(clock.clone()));
        let body = question.document_mut().create_root("body");
        Self {
            clock,
            question,
            body,
        }
    }

    fn attach(&mut self, register: impl FnMut(&mut Question)) {
        self.question.attach(&mut TestExercise(register), self.body);
    }

    fn advance(&mut self, millis: u64) -> usize {
        self.clock.advance(Duration::from_millis(millis));
        self.question.process_timers()
    }

    fn tick(&mut self) -> usize {
        self.question.process_timers()
    }

    fn body_children(&self) -> Vec<ElementId> {
        self.question.document().children(self.body).unwrap().to_vec()
    }

    fn section(&self, slot: Slot) -> ElementId {
        self.question.section_element(slot).unwrap()
    }

    fn bar_children(&self) -> Vec<ElementId> {
        let bar = self.section(Slot::Buttons);
        self.question.document().children(bar).unwrap().to_vec()
    }
}

#[test]
fn test_attach_registers_once() {
    let mut fx = Fixture::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let registered = Arc::new(AtomicUsize::new(0));

    let counter = registered.clone();
    fx.question.dom_elements_registered().connect(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    for _ in 0..2 {
        let calls = calls.clone();
        fx.attach(move |q| {
            calls.fetch_add(1, Ordering::SeqCst);
            q.set_introduction("Intro");
        });
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(registered.load(Ordering::SeqCst), 1);
    assert_eq!(fx.body_children(), vec![fx.section(Slot::Introduction)]);

    let tree = fx.question.document();
    assert!(tree.has_class(fx.body, "question"));
    assert!(tree.has_class(fx.body, "question-quiz"));
}

#[test]
fn test_attach_clears_container() {
    let mut fx = Fixture::new();
    let stray = fx.question.document_mut().create("p");
    fx.question.document_mut().append(fx.body, stray).unwrap();

    fx.attach(|q| q.set_introduction("Intro"));
    assert!(!fx.body_children().contains(&stray));
}

#[test]
fn test_attach_orders_sections() {
    let mut fx = Fixture::new();
    fx.attach(|q| {
        q.add_button("check", "Check", || {}, true);
        q.set_content("Body", ContentOptions::default());
        q.set_introduction("Intro");
        q.set_image("task.png", Some("A task"));
    });

    assert_eq!(
        fx.body_children(),
        vec![
            fx.section(Slot::Image),
            fx.section(Slot::Introduction),
            fx.section(Slot::Content),
            fx.section(Slot::Buttons),
        ]
    );
}

#[test]
fn test_custom_section_order() {
    let config = QuestionConfig::builder()
        .section_order([Slot::Content, Slot::Introduction])
        .build();
    let mut fx = Fixture::with_config(config);
    fx.attach(|q| {
        q.set_introduction("Intro");
        q.set_content("Body", ContentOptions::default());
    });

    assert_eq!(
        fx.body_children(),
        vec![fx.section(Slot::Content), fx.section(Slot::Introduction)]
    );
}

#[test]
fn test_set_content_class_and_update() {
    let mut fx = Fixture::new();
    fx.attach(|q| {
        q.set_content(
            "First",
            ContentOptions {
                class: Some("wide".into()),
            },
        )
    });
    fx.question.set_content("Second", ContentOptions::default());

    let content = fx.section(Slot::Content);
    let tree = fx.question.document();
    assert!(tree.has_class(content, "question-content"));
    assert!(tree.has_class(content, "wide"));
    assert_eq!(tree.markup(content).unwrap(), "Second");
}

#[test]
fn test_set_content_with_element() {
    let mut fx = Fixture::new();
    let list = fx.question.document_mut().create("ul");
    fx.attach(move |q| q.set_content(list, ContentOptions::default()));

    let content = fx.section(Slot::Content);
    assert_eq!(fx.question.document().children(content).unwrap(), &[list]);
}

#[test]
fn test_set_image_resolves_path() {
    let config = QuestionConfig::builder().content_base("content/42").build();
    let mut fx = Fixture::with_config(config);
    fx.attach(|q| q.set_image("images/cat.png", None));

    let tree = fx.question.document();
    let image = fx.section(Slot::Image);
    let wrap = tree.children(image).unwrap()[0];
    let img = tree.children(wrap).unwrap()[0];

    assert!(tree.has_class(image, "question-image"));
    assert!(tree.has_class(wrap, "question-image-wrap"));
    assert_eq!(tree.tag(img).unwrap(), "img");
    assert_eq!(tree.attribute(img, "src").unwrap(), Some("content/42/images/cat.png"));
    assert_eq!(tree.attribute(img, "alt").unwrap(), Some(""));
}

#[test]
fn test_set_image_again_replaces_in_place() {
    let mut fx = Fixture::new();
    fx.attach(|q| {
        q.set_image("a.png", Some("A"));
        q.set_introduction("Intro");
    });
    let old = fx.section(Slot::Image);

    fx.question.set_image("https://example.com/b.png", Some("B"));
    let new = fx.section(Slot::Image);

    assert_ne!(old, new);
    assert_eq!(fx.body_children(), vec![new, fx.section(Slot::Introduction)]);
    assert!(!fx.question.document().is_rendered(old));
    assert!(!fx.question.document().contains(old));
}

#[test]
fn test_set_image_does_not_grow_the_document() {
    let mut fx = Fixture::new();
    fx.attach(|q| {
        q.set_image("a.png", Some("A"));
        q.set_introduction("Intro");
    });
    let count = fx.question.document().element_count();

    for i in 0..50 {
        fx.question.set_image(&format!("img/{i}.png"), None);
    }

    assert_eq!(fx.question.document().element_count(), count);
    assert_eq!(fx.body_children()[0], fx.section(Slot::Image));
}

// =========================================================================
// Feedback
// =========================================================================

#[test]
fn test_feedback_reveals_on_next_tick() {
    let mut fx = Fixture::new();
    fx.attach(|q| {
        q.set_introduction("Intro");
        q.add_button("check", "Check", || {}, true);
    });

    fx.question.set_feedback("Well done", None, None);
    let feedback = fx.section(Slot::Feedback);

    assert_eq!(fx.question.feedback_phase(), AnimationPhase::Entering);
    assert_eq!(
        fx.body_children(),
        vec![fx.section(Slot::Introduction), feedback, fx.section(Slot::Buttons)]
    );
    assert!(!fx.question.document().has_class(feedback, "question-visible"));

    fx.tick();
    assert_eq!(fx.question.feedback_phase(), AnimationPhase::Visible);
    let tree = fx.question.document();
    assert!(tree.has_class(feedback, "question-visible"));
    assert_eq!(tree.max_height(feedback).unwrap(), MaxHeight::Px(20.0));
}

#[test]
fn test_feedback_hide_detaches_after_transition() {
    let mut fx = Fixture::new();
    fx.attach(|q| q.set_introduction("Intro"));
    fx.question.set_feedback("Well done", None, None);
    fx.tick();
    let feedback = fx.section(Slot::Feedback);

    fx.question.set_feedback("", None, None);
    assert_eq!(fx.question.feedback_phase(), AnimationPhase::Leaving);
    let tree = fx.question.document();
    assert!(!tree.has_class(feedback, "question-visible"));
    assert!(tree.max_height(feedback).unwrap().is_collapsed());

    fx.advance(149);
    assert!(fx.body_children().contains(&feedback));
    assert!(fx.question.document().max_height(feedback).unwrap().is_collapsed());

    fx.advance(1);
    assert!(!fx.body_children().contains(&feedback));
    assert_eq!(fx.question.feedback_phase(), AnimationPhase::Idle);
}

#[test]
fn test_hiding_absent_feedback_is_noop() {
    let mut fx = Fixture::new();
    fx.attach(|q| q.set_introduction("Intro"));

    fx.question.set_feedback("", None, None);
    assert!(!fx.question.has_section(Slot::Feedback));
    assert_eq!(fx.question.pending_timer_count(), 0);
}

#[test]
fn test_feedback_update_does_not_reanimate() {
    let mut fx = Fixture::new();
    fx.attach(|q| q.set_introduction("Intro"));
    fx.question.set_feedback("First", None, None);
    fx.tick();
    fx.advance(200);
    assert_eq!(fx.question.pending_timer_count(), 0);

    fx.question.set_feedback("Second", None, None);
    assert_eq!(fx.question.feedback_phase(), AnimationPhase::Visible);
    assert_eq!(fx.question.pending_timer_count(), 0);

    let content = fx.question.feedback.content.unwrap();
    assert_eq!(fx.question.document().markup(content).unwrap(), "Second");
}

#[test]
fn test_feedback_update_remeasures_visible_section() {
    let mut fx = Fixture::new();
    fx.attach(|q| q.set_introduction("Intro"));
    fx.question.set_feedback("Short", None, None);
    fx.tick();
    let feedback = fx.section(Slot::Feedback);
    assert_eq!(fx.question.document().max_height(feedback).unwrap(), MaxHeight::Px(20.0));

    fx.question.set_feedback("one\ntwo\nthree", None, None);

    assert_eq!(fx.question.feedback_phase(), AnimationPhase::Visible);
    assert_eq!(fx.question.pending_timer_count(), 0);
    assert_eq!(fx.question.document().max_height(feedback).unwrap(), MaxHeight::Px(60.0));
}

#[test]
fn test_feedback_update_while_entering_waits_for_reveal() {
    let mut fx = Fixture::new();
    fx.attach(|q| q.set_introduction("Intro"));
    fx.question.set_feedback("Short", None, None);
    fx.question.set_feedback("one\ntwo", None, None);
    let feedback = fx.section(Slot::Feedback);
    assert_eq!(fx.question.feedback_phase(), AnimationPhase::Entering);
    assert!(!fx.question.document().has_class(feedback, "question-visible"));

    fx.tick();
    assert_eq!(fx.question.document().max_height(feedback).unwrap(), MaxHeight::Px(40.0));
}

#[test]
fn test_reshow_during_collapse_keeps_feedback() {
    let mut fx = Fixture::new();
    fx.attach(|q| q.set_introduction("Intro"));
    fx.question.set_feedback("x", None, None);
    fx.question.set_feedback("", None, None);
    fx.question.set_feedback("y", None, None);

    fx.advance(1000);
    let feedback = fx.section(Slot::Feedback);
    let content = fx.question.feedback.content.unwrap();
    let tree = fx.question.document();

    assert_eq!(fx.question.feedback_phase(), AnimationPhase::Visible);
    assert!(tree.is_rendered(feedback));
    assert!(tree.has_class(feedback, "question-visible"));
    assert_eq!(tree.markup(content).unwrap(), "y");
}

#[test]
fn test_second_hide_restarts_detach_window() {
    let mut fx = Fixture::new();
    fx.attach(|q| q.set_introduction("Intro"));
    fx.question.set_feedback("x", None, None);
    fx.tick();

    fx.question.set_feedback("", None, None);
    fx.advance(100);
    fx.question.set_feedback("y", None, None);
    fx.tick();
    fx.question.set_feedback("", None, None);

    // The first detach would have fired at 150.
    fx.advance(50);
    let feedback = fx.section(Slot::Feedback);
    assert!(fx.body_children().contains(&feedback));

    fx.advance(100);
    assert!(!fx.body_children().contains(&feedback));
}

#[test]
fn test_score_bar_created_once() {
    let mut fx = Fixture::new();
    fx.attach(|q| q.set_introduction("Intro"));
    fx.question.set_feedback("Try again", Some(1), Some(3));
    fx.question.set_feedback("Better", Some(2), Some(3));

    let container = fx.question.feedback.container.unwrap();
    let tree = fx.question.document();
    let children = tree.children(container).unwrap();
    assert_eq!(children.len(), 2);

    let score_bar = children[0];
    assert!(tree.has_class(score_bar, "question-scorebar"));
    assert_eq!(tree.markup(score_bar).unwrap(), "2/3");
    assert_eq!(tree.attribute(score_bar, "data-score").unwrap(), Some("2"));
    assert_eq!(tree.attribute(score_bar, "data-max-score").unwrap(), Some("3"));
    assert!(tree.has_class(children[1], "question-feedback-content"));
}

#[test]
fn test_feedback_set_before_attach() {
    let mut fx = Fixture::new();
    fx.question.set_feedback("Early", None, None);
    fx.tick();

    fx.attach(|q| q.set_introduction("Intro"));
    let feedback = fx.section(Slot::Feedback);
    assert_eq!(fx.body_children(), vec![fx.section(Slot::Introduction), feedback]);
    assert!(fx.question.document().has_class(feedback, "question-visible"));
}

#[test]
fn test_hidden_feedback_left_out_of_attach() {
    let mut fx = Fixture::new();
    fx.attach(|q| q.set_introduction("Intro"));
    fx.question.set_feedback("x", None, None);
    fx.tick();
    fx.question.set_feedback("", None, None);

    fx.attach(|_| {});
    assert!(!fx.body_children().contains(&fx.section(Slot::Feedback)));
}

// =========================================================================
// Buttons
// =========================================================================

#[test]
fn test_button_markup_and_classes() {
    let mut fx = Fixture::new();
    fx.attach(|q| q.add_button("check", "Check", || {}, true));

    let check = fx.question.button_element("check").unwrap();
    let tree = fx.question.document();
    assert_eq!(tree.tag(check).unwrap(), "button");
    assert!(tree.has_class(check, "question-button"));
    assert!(tree.has_class(check, "question-check"));
    assert_eq!(tree.markup(check).unwrap(), "Check");
    assert!(tree.has_class(fx.section(Slot::Buttons), "question-visible"));
}

#[test]
fn test_flush_is_scheduled_once() {
    let mut fx = Fixture::new();
    fx.attach(|q| {
        q.add_button("a", "A", || {}, false);
        q.add_button("b", "B", || {}, false);
        q.add_button("c", "C", || {}, true);
    });

    assert_eq!(fx.question.show_button("a"), RequestOutcome::Queued);
    assert_eq!(fx.question.show_button("b"), RequestOutcome::Queued);
    assert_eq!(fx.question.hide_button("c"), RequestOutcome::Queued);
    assert_eq!(fx.question.pending_timer_count(), 1);

    assert_eq!(fx.tick(), 1);
    assert_eq!(fx.question.visible_buttons(), vec!["a", "b"]);
}

#[test]
fn test_show_is_ordered() {
    let mut fx = Fixture::new();
    fx.attach(|q| {
        q.add_button("a", "A", || {}, true);
        q.add_button("b", "B", || {}, false);
        q.add_button("c", "C", || {}, true);
    });

    fx.question.show_button("b");
    fx.tick();

    let ids: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|id| fx.question.button_element(id).unwrap())
        .collect();
    assert_eq!(fx.bar_children(), ids);
}

#[test]
fn test_hiding_every_button_collapses_the_bar() {
    let mut fx = Fixture::new();
    fx.attach(|q| {
        q.add_button("a", "A", || {}, true);
        q.add_button("b", "B", || {}, true);
    });
    let bar = fx.section(Slot::Buttons);

    fx.question.hide_button("a");
    fx.question.hide_button("b");
    fx.tick();

    // Still attached while the bar collapses.
    assert_eq!(fx.bar_children().len(), 2);
    assert_eq!(fx.question.buttons.collapsing, vec!["a", "b"]);
    assert!(!fx.question.is_button_visible("a"));
    let tree = fx.question.document();
    assert!(!tree.has_class(bar, "question-visible"));
    assert!(tree.max_height(bar).unwrap().is_collapsed());

    fx.advance(150);
    assert!(fx.bar_children().is_empty());
    assert!(fx.question.buttons.collapsing.is_empty());
}

#[test]
fn test_partial_hide_detaches_immediately() {
    let mut fx = Fixture::new();
    fx.attach(|q| {
        q.add_button("a", "A", || {}, true);
        q.add_button("b", "B", || {}, true);
    });

    fx.question.hide_button("a");
    fx.tick();

    let b = fx.question.button_element("b").unwrap();
    assert_eq!(fx.bar_children(), vec![b]);
    assert_eq!(fx.question.pending_timer_count(), 0);
    assert!(fx.question.document().has_class(fx.section(Slot::Buttons), "question-visible"));
}

#[test]
fn test_show_during_bar_collapse_reopens_bar() {
    let mut fx = Fixture::new();
    fx.attach(|q| {
        q.add_button("a", "A", || {}, true);
        q.add_button("b", "B", || {}, true);
    });
    let bar = fx.section(Slot::Buttons);

    fx.question.hide_button("a");
    fx.question.hide_button("b");
    fx.tick();
    assert_eq!(fx.question.hide_button("b"), RequestOutcome::Unchanged);

    fx.advance(50);
    assert_eq!(fx.question.show_button("a"), RequestOutcome::Queued);
    fx.tick();

    let a = fx.question.button_element("a").unwrap();
    assert_eq!(fx.bar_children(), vec![a]);
    assert_eq!(fx.question.visible_buttons(), vec!["a"]);
    assert!(fx.question.document().has_class(bar, "question-visible"));
    assert_eq!(fx.question.pending_timer_count(), 0);

    fx.advance(500);
    assert_eq!(fx.bar_children(), vec![a]);
}

#[test]
fn test_first_shown_button_opens_empty_bar() {
    let mut fx = Fixture::new();
    fx.attach(|q| q.add_button("retry", "Retry", || {}, false));
    let bar = fx.section(Slot::Buttons);
    assert!(!fx.question.document().has_class(bar, "question-visible"));

    fx.question.show_button("retry");
    fx.tick();
    let tree = fx.question.document();
    assert!(tree.has_class(bar, "question-visible"));
    assert_eq!(tree.max_height(bar).unwrap(), MaxHeight::Px(20.0));
}

#[test]
fn test_add_button_after_attach_places_bar() {
    let mut fx = Fixture::new();
    fx.attach(|q| {
        q.set_introduction("Intro");
        q.set_content("Body", ContentOptions::default());
    });
    fx.question.add_button("check", "Check", || {}, true);

    assert_eq!(
        fx.body_children(),
        vec![
            fx.section(Slot::Introduction),
            fx.section(Slot::Content),
            fx.section(Slot::Buttons),
        ]
    );
}

#[test]
fn test_click_button() {
    let mut fx = Fixture::new();
    let clicks = Arc::new(AtomicUsize::new(0));
    let counter = clicks.clone();
    fx.attach(move |q| {
        let counter = counter.clone();
        q.add_button(
            "check",
            "Check",
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            true,
        );
    });

    fx.question.click_button("check");
    fx.question.click_button("missing");
    assert_eq!(clicks.load(Ordering::SeqCst), 1);
}

// =========================================================================
// Resize animation
// =========================================================================

fn count_resizes(question: &Question) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();
    question.resized().connect(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    count
}

#[test]
fn test_resize_animation_step_count() {
    let mut fx = Fixture::new();
    fx.attach(|q| q.set_introduction("Intro"));
    let resizes = count_resizes(&fx.question);

    fx.question.resize_animation(Duration::from_millis(100));
    for _ in 0..5 {
        fx.advance(40);
    }

    assert_eq!(resizes.load(Ordering::SeqCst), 3);
    assert_eq!(fx.question.pending_timer_count(), 0);
}

#[test]
fn test_resize_animation_extends_but_never_shortens() {
    let mut fx = Fixture::new();
    fx.attach(|q| q.set_introduction("Intro"));
    let resizes = count_resizes(&fx.question);

    fx.question.resize_animation(Duration::from_millis(80));
    fx.advance(40);
    assert_eq!(resizes.load(Ordering::SeqCst), 1);

    fx.question.resize_animation(Duration::from_millis(200));
    fx.question.resize_animation(Duration::from_millis(40));
    assert_eq!(fx.question.pending_timer_count(), 1);

    for _ in 0..10 {
        fx.advance(40);
    }
    assert_eq!(resizes.load(Ordering::SeqCst), 6);

    // A fresh animation after the last one stopped schedules a new timer.
    fx.question.resize_animation(Duration::from_millis(40));
    fx.advance(40);
    assert_eq!(resizes.load(Ordering::SeqCst), 7);
    assert_eq!(fx.question.pending_timer_count(), 0);
}
