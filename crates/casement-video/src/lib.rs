//! Casement Video
//!
//! Window lifecycle, display enumeration and fullscreen mode negotiation
//! on top of a pluggable [`Platform`].
//!
//! Windows are owned by the [`VideoSubsystem`] and addressed by
//! [`WindowId`]. State-changing calls are requests: the platform answers
//! them asynchronously, and the committed state only moves once those
//! answers are processed by [`VideoSubsystem::pump_events`] or
//! [`VideoSubsystem::sync_window`].
//!
//! ```
//! use casement_video::{VideoSubsystem, WindowFlags};
//!
//! let mut video = VideoSubsystem::headless()?;
//! let window = video.create_window("Hello", 800, 600, WindowFlags::RESIZABLE)?;
//! let _ = video.maximize_window(window)?;
//! video.sync_window(window)?;
//! # Ok::<(), casement_video::VideoError>(())
//! ```

pub mod config;
pub mod display;
pub mod error;
pub mod grab;
pub mod mode;
pub mod notification;
pub mod pixel_format;
pub mod platform;
pub mod state;
pub mod video;
pub mod window;

pub use config::VideoConfig;
pub use display::{Display, DisplayChange, DisplayId, DisplayMode, DisplayRegistry, Orientation};
pub use error::{VideoError, VideoResult};
pub use grab::GrabKind;
pub use notification::{HandleStatus, Notification, NotificationBatch, NotificationStats, WindowNotification};
pub use pixel_format::PixelFormat;
pub use platform::{FlashOperation, HeadlessDisplay, HeadlessPlatform, ModeSpec, Platform, PlatformCapabilities, PlatformEvent};
pub use state::{DenyReason, FullscreenKind, FullscreenTarget, Request, RequestOutcome, RequestTicket, Resolution, WindowState};
pub use video::VideoSubsystem;
pub use window::{ForeignWindow, Window, WindowConfig, WindowFlags, WindowId, WindowPosition};
