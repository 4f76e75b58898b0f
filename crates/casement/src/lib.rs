//! Casement - window and display management
//!
//! Casement keeps track of displays, their video modes and a tree of
//! windows. Everything the platform may refuse or delay is a *request*;
//! what the platform actually did arrives later as a *notification* and is
//! only then committed to window state.
//!
//! # Quick Start
//!
//! ```
//! use casement::prelude::*;
//!
//! let mut video = VideoSubsystem::headless()?;
//! let window = video.create_window("Hello", 800, 600, WindowFlags::RESIZABLE)?;
//!
//! video.maximize_window(window)?;
//! video.sync_window(window)?;
//! assert_eq!(video.window_state(window)?, WindowState::Maximized);
//! # Ok::<(), VideoError>(())
//! ```
//!
//! # Crates
//!
//! - `casement-core` - property store, geometry, logging and profiling
//! - `casement-video` - displays, modes, windows and the platform trait
//! - `casement-winit` - winit integration (feature `winit`)

pub use casement_core as core;
pub use casement_video as video;

#[cfg(feature = "winit")]
pub use casement_winit as winit;

pub use casement_core::logging;
pub use casement_core::{PropertyGroup, PropertyType, PropertyValue};
pub use casement_video::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use casement_core::geometry::{Point, Rect, Size};
    pub use casement_core::{PropertyGroup, PropertyValue};
    pub use casement_video::{
        Display, DisplayId, DisplayMode, HandleStatus, Notification, Platform, RequestOutcome, VideoConfig,
        VideoError, VideoResult, VideoSubsystem, WindowConfig, WindowFlags, WindowId, WindowPosition, WindowState,
    };

    #[cfg(feature = "winit")]
    pub use casement_winit::{WinitBridge, window_attributes};
}
