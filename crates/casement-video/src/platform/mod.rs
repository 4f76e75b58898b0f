//! The seam between the subsystem and a native windowing backend.

pub mod headless;

use std::time::Duration;

use casement_core::geometry::{Point, Size};
use casement_core::properties::PropertyGroup;

use crate::display::{Display, DisplayId};
use crate::error::{VideoError, VideoResult};
use crate::grab::GrabKind;
use crate::notification::WindowNotification;
use crate::state::{Request, RequestTicket, Resolution};
use crate::window::{ForeignWindow, WindowFlags, WindowId};

pub use headless::{HeadlessDisplay, HeadlessPlatform, ModeSpec};

bitflags::bitflags! {
    /// Optional features a platform implements.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PlatformCapabilities: u32 {
        const OPENGL = 1 << 0;
        const VULKAN = 1 << 1;
        const METAL = 1 << 2;
        const OPACITY = 1 << 3;
        const MODAL = 1 << 4;
        const MODE_SWITCHING = 1 << 5;
        const FOREIGN_WINDOWS = 1 << 6;
        const TRANSPARENT = 1 << 7;
        const FLASH = 1 << 8;
    }
}

/// What the platform is asked to create.
#[derive(Debug, Clone)]
pub struct NativeWindowSpec {
    pub title: String,
    /// Desktop position, or parent-relative for popups.
    pub position: Point<i32>,
    pub size: Size<u32>,
    /// Requested flags, including initial state and role.
    pub flags: WindowFlags,
    pub parent: Option<WindowId>,
    pub display: Option<DisplayId>,
    pub foreign: Option<ForeignWindow>,
}

/// Committed state of a freshly created window.
#[derive(Debug, Clone)]
pub struct WindowSnapshot {
    pub position: Point<i32>,
    pub size: Size<u32>,
    pub pixel_size: Size<u32>,
    pub flags: WindowFlags,
    pub display: Option<DisplayId>,
    /// Platform-specific values such as native handles.
    pub properties: PropertyGroup,
}

/// Something the platform reports back.
#[derive(Debug, Clone)]
pub enum PlatformEvent {
    Notification(WindowNotification),
    Resolved {
        window: WindowId,
        ticket: RequestTicket,
        resolution: Resolution,
    },
    /// Displays were connected, disconnected or reconfigured.
    DisplaysChanged,
}

/// How to draw attention to a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlashOperation {
    Cancel,
    Briefly,
    UntilFocused,
}

/// A native windowing backend.
///
/// State-changing requests are asynchronous: [`submit`](Platform::submit)
/// queues work and the outcome arrives later as [`PlatformEvent`]s from
/// [`pump`](Platform::pump) or [`sync`](Platform::sync). Every submitted
/// ticket is eventually answered with exactly one `Resolved` event, unless
/// the window is destroyed first.
pub trait Platform {
    fn name(&self) -> &str;

    fn capabilities(&self) -> PlatformCapabilities;

    /// Current displays, primary first.
    fn enumerate_displays(&mut self) -> VideoResult<Vec<Display>>;

    fn create_window(&mut self, id: WindowId, spec: &NativeWindowSpec) -> VideoResult<WindowSnapshot>;

    /// Drop native resources. Unresolved requests for the window are discarded.
    fn destroy_window(&mut self, id: WindowId);

    fn submit(&mut self, id: WindowId, ticket: RequestTicket, request: &Request) -> VideoResult<()>;

    /// Collect whatever happened since the last call without blocking.
    fn pump(&mut self) -> Vec<PlatformEvent>;

    /// Wait up to `timeout` for the window's outstanding requests.
    fn sync(&mut self, id: WindowId, timeout: Duration) -> Vec<PlatformEvent>;

    fn set_title(&mut self, _id: WindowId, _title: &str) -> VideoResult<()> {
        Ok(())
    }

    fn set_opacity(&mut self, _id: WindowId, _opacity: f32) -> VideoResult<()> {
        Err(VideoError::UnsupportedOperation {
            operation: "set_window_opacity",
        })
    }

    /// Zero components mean no limit.
    fn set_size_limits(&mut self, _id: WindowId, _min: Size<u32>, _max: Size<u32>) -> VideoResult<()> {
        Ok(())
    }

    fn set_parent(&mut self, _id: WindowId, _parent: Option<WindowId>) -> VideoResult<()> {
        Ok(())
    }

    fn set_modal(&mut self, _id: WindowId, _modal: bool) -> VideoResult<()> {
        Err(VideoError::UnsupportedOperation {
            operation: "set_window_modal",
        })
    }

    fn set_grab(&mut self, _id: WindowId, _kind: GrabKind, _grabbed: bool) -> VideoResult<()> {
        Ok(())
    }

    fn flash(&mut self, _id: WindowId, _operation: FlashOperation) -> VideoResult<()> {
        Err(VideoError::UnsupportedOperation {
            operation: "flash_window",
        })
    }

    fn set_screen_saver_enabled(&mut self, _enabled: bool) -> VideoResult<()> {
        Ok(())
    }
}
