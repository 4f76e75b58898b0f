//! Glue between winit and the Casement video subsystem.
//!
//! winit owns the native windows and the event loop; this crate converts
//! what it reports (window events, monitors, video modes) into Casement
//! types and derives winit window attributes from a [`WindowConfig`].
//!
//! [`WindowConfig`]: casement_video::WindowConfig

pub mod event;
pub mod monitor;
pub mod window;

pub use event::{WindowIdMap, WinitBridge, translate_event};
pub use monitor::{MonitorInfo, VideoModeInfo, available_monitors};
pub use window::window_attributes;

// Re-export the winit id for convenience
pub use winit::window::WindowId as WinitWindowId;
