//! Question configuration.

use std::time::Duration;

use crate::section::Slot;

/// Default duration of the CSS height transition used for show/hide.
pub const DEFAULT_TRANSITION_DURATION: Duration = Duration::from_millis(150);

/// Default interval between resize passes during a resize animation.
pub const DEFAULT_RESIZE_INTERVAL: Duration = Duration::from_millis(40);

/// Default per-button margin used by the width fitter, in pixels.
pub const DEFAULT_BUTTON_MARGIN: f32 = 3.0;

/// Configuration for a [`Question`](crate::Question).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QuestionConfig {
    /// How long a collapse transition runs before the element is detached.
    pub transition_duration: Duration,
    /// Interval between resize passes while a section animates.
    pub resize_interval: Duration,
    /// Margin added per button (and once for the bar) when fitting labels.
    pub button_margin: f32,
    /// Prefix of every generated class name, e.g. `question-feedback`.
    pub class_prefix: String,
    /// Base path relative image paths are resolved against.
    pub content_base: Option<String>,
    /// Display order of the sections.
    pub section_order: Vec<Slot>,
}

impl Default for QuestionConfig {
    fn default() -> Self {
        Self {
            transition_duration: DEFAULT_TRANSITION_DURATION,
            resize_interval: DEFAULT_RESIZE_INTERVAL,
            button_margin: DEFAULT_BUTTON_MARGIN,
            class_prefix: "question".to_string(),
            content_base: None,
            section_order: Slot::ALL.to_vec(),
        }
    }
}

impl QuestionConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> QuestionConfigBuilder {
        QuestionConfigBuilder::default()
    }

    /// Build a class name under the configured prefix.
    pub(crate) fn class(&self, suffix: &str) -> String {
        format!("{}-{}", self.class_prefix, suffix)
    }

    /// Class marking an element as shown (target of the height transition).
    pub(crate) fn visible_class(&self) -> String {
        self.class("visible")
    }

    /// Resolve an image path against the content base.
    ///
    /// URLs, absolute paths and paths without a configured base are kept as-is.
    pub fn resolve_path(&self, path: &str) -> String {
        match &self.content_base {
            Some(base) if !path.contains("://") && !path.starts_with('/') => {
                format!("{}/{}", base.trim_end_matches('/'), path)
            }
            _ => path.to_string(),
        }
    }
}

/// Builder for [`QuestionConfig`].
#[derive(Debug, Default)]
pub struct QuestionConfigBuilder {
    config: QuestionConfig,
}

impl QuestionConfigBuilder {
    /// Set the collapse transition duration.
    pub fn transition_duration(mut self, duration: Duration) -> Self {
        self.config.transition_duration = duration;
        self
    }

    /// Set the resize animation interval.
    pub fn resize_interval(mut self, interval: Duration) -> Self {
        self.config.resize_interval = interval;
        self
    }

    /// Set the per-button fitting margin.
    pub fn button_margin(mut self, margin: f32) -> Self {
        self.config.button_margin = margin;
        self
    }

    /// Set the class name prefix.
    pub fn class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.class_prefix = prefix.into();
        self
    }

    /// Set the base path for relative image paths.
    pub fn content_base(mut self, base: impl Into<String>) -> Self {
        self.config.content_base = Some(base.into());
        self
    }

    /// Set the section display order.
    ///
    /// Slots left out of `order` are appended in their default position so
    /// every registered section still has a place.
    pub fn section_order(mut self, order: impl IntoIterator<Item = Slot>) -> Self {
        let mut slots: Vec<Slot> = Vec::with_capacity(Slot::ALL.len());
        for slot in order {
            if !slots.contains(&slot) {
                slots.push(slot);
            }
        }
        for slot in Slot::ALL {
            if !slots.contains(&slot) {
                slots.push(slot);
            }
        }
        self.config.section_order = slots;
        self
    }

    /// Finish building.
    pub fn build(self) -> QuestionConfig {
        self.config
    }
}
