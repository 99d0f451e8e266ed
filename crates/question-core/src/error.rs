//! Error types for the question core.

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the element tree and the timer queue.
///
/// Both only fail on programming errors (stale ids, impossible tree shapes);
/// callers higher up are expected to guard or log rather than propagate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// The element id is invalid or the element has been removed.
    #[error("Invalid or removed element ID")]
    InvalidElementId,

    /// Attaching the element would make it its own ancestor.
    #[error("Circular parent-child relationship detected")]
    CircularParentage,

    /// The reference element has no parent to insert next to.
    #[error("Reference element is not attached to a parent")]
    NotAttached,

    /// The timer id is invalid or the timer has already fired or been cancelled.
    #[error("Invalid or expired timer ID")]
    InvalidTimerId,
}
