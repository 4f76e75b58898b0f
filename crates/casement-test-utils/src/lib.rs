//! Test utilities for Casement.
//!
//! - [`fixtures`] - display and mode sets shared by tests and benches
//! - [`RecordingPlatform`] - a headless platform that logs every call the
//!   video subsystem makes
//!
//! # Example
//!
//! ```rust
//! use casement_test_utils::{fixtures, PlatformCall, RecordingPlatform};
//! use casement_video::{VideoConfig, VideoSubsystem, WindowFlags};
//!
//! let platform = RecordingPlatform::new(fixtures::desktop_platform());
//! let log = platform.log();
//! let mut video = VideoSubsystem::new(platform, VideoConfig::default()).unwrap();
//!
//! video.create_window("test", 320, 240, WindowFlags::empty()).unwrap();
//! assert_eq!(log.count(|call| matches!(call, PlatformCall::CreateWindow { .. })), 1);
//! ```

pub mod fixtures;
pub mod recording;

pub use recording::{CallLog, PlatformCall, RecordingPlatform};
