//! Base component for interactive exercises.
//!
//! A [`Question`] renders the standard sections of an exercise (image,
//! introduction, content, feedback and an action button bar) into an
//! [`ElementTree`](question_core::ElementTree) and schedules their visibility:
//!
//! - **Sections**: registered once by the exercise, composed into the host
//!   container in a configurable order
//! - **Feedback**: shown and hidden with a height transition; a hide is only
//!   committed once the transition window has passed
//! - **Buttons**: show/hide requests are batched per tick, opposite requests
//!   cancel out, and the whole bar collapses at once when every button goes
//! - **Label fitting**: button labels are dropped from the end of the bar when
//!   it runs out of width and restored from the start when space frees up
//!
//! Layout is never computed here. Heights and widths come from a
//! [`LayoutMeasure`] supplied by the host; [`FixedMetrics`] is a headless
//! implementation.
//!
//! # Logging
//!
//! Events are emitted under the `question_ui::attach`,
//! `question_ui::feedback`, `question_ui::buttons` and `question_ui::fit`
//! targets. See [`question_core::logging`].

mod animation;
mod button;
pub mod config;
mod fit;
pub mod insert;
mod measure;
mod question;
pub mod section;

pub use animation::AnimationPhase;
pub use button::{RequestOutcome, Visibility};
pub use config::{QuestionConfig, QuestionConfigBuilder};
pub use fit::FitReport;
pub use insert::{Placement, insert_ordered};
pub use measure::{FixedMetrics, LayoutMeasure};
pub use question::{ContentOptions, Question, QuestionType};
pub use section::{SectionContent, SectionRegistry, Slot};

/// Commonly used types.
///
/// ```
/// use question_ui::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        AnimationPhase, ContentOptions, FixedMetrics, LayoutMeasure, Question, QuestionConfig,
        QuestionType, SectionContent, Slot,
    };
    pub use question_core::{Clock, ElementId, ElementTree, ManualClock};
}
