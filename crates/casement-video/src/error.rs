//! Error types for the video subsystem.

use std::fmt;

use casement_core::properties::PropertyError;

use crate::display::DisplayId;
use crate::window::WindowId;

/// Errors surfaced by display, mode and window operations.
///
/// A platform silently declining a request is not an error; see
/// [`RequestOutcome`](crate::state::RequestOutcome).
#[derive(Debug, Clone, PartialEq)]
pub enum VideoError {
    /// A window or its storage could not be allocated.
    AllocationFailure {
        /// What was being allocated.
        what: &'static str,
    },

    /// The id does not name a live window.
    InvalidWindow {
        /// Raw id that was passed in.
        id: u32,
    },

    /// The id does not name a connected display.
    InvalidDisplay {
        /// Raw id that was passed in.
        id: u32,
    },

    /// No display mode is at least as large as the request.
    NoMatchingMode {
        display: DisplayId,
        width: u32,
        height: u32,
    },

    /// The mode belongs to a disconnected display or is no longer offered.
    ModeUnavailable {
        display: DisplayId,
        width: u32,
        height: u32,
    },

    /// The platform cannot perform this operation. Prior state is unchanged.
    UnsupportedOperation {
        /// Operation name.
        operation: &'static str,
    },

    /// An argument was out of range or inconsistent.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the problem.
        reason: String,
    },

    /// The window role requires a parent and none was given.
    MissingParent {
        /// Role requiring the parent (tooltip, menu, modal).
        role: &'static str,
    },

    /// A modal window cannot be reparented; clear modal first.
    ModalWindow { window: WindowId },

    /// The new parent is the window itself or one of its descendants.
    ParentCycle { window: WindowId, parent: WindowId },

    /// The platform reported a failure.
    Platform {
        /// Error message from the platform.
        message: String,
    },
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::AllocationFailure { what } => write!(f, "Failed to allocate {}", what),
            VideoError::InvalidWindow { id } => write!(f, "Invalid window id: {}", id),
            VideoError::InvalidDisplay { id } => write!(f, "Invalid display id: {}", id),
            VideoError::NoMatchingMode {
                display,
                width,
                height,
            } => write!(
                f,
                "No fullscreen mode of at least {}x{} on display {}",
                width, height, display
            ),
            VideoError::ModeUnavailable {
                display,
                width,
                height,
            } => write!(
                f,
                "Display mode {}x{} is not available on display {}",
                width, height, display
            ),
            VideoError::UnsupportedOperation { operation } => {
                write!(f, "Operation not supported by this platform: {}", operation)
            }
            VideoError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            VideoError::MissingParent { role } => {
                write!(f, "A {} window requires a parent window", role)
            }
            VideoError::ModalWindow { window } => {
                write!(f, "Window {} is modal and cannot be reparented", window)
            }
            VideoError::ParentCycle { window, parent } => write!(
                f,
                "Window {} cannot be parented to {}: it would form a cycle",
                window, parent
            ),
            VideoError::Platform { message } => write!(f, "Platform error: {}", message),
        }
    }
}

impl std::error::Error for VideoError {}

impl From<PropertyError> for VideoError {
    fn from(_: PropertyError) -> Self {
        VideoError::AllocationFailure { what: "property group" }
    }
}

/// Result type alias for video operations.
pub type VideoResult<T> = Result<T, VideoError>;
