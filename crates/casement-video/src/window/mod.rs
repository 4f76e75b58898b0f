//! Window records kept by the [`VideoSubsystem`](crate::VideoSubsystem).

pub mod config;

use std::fmt;
use std::num::NonZeroU32;

use casement_core::geometry::{Point, Rect, Size};
use casement_core::properties::PropertyGroup;

use crate::display::{DisplayId, DisplayMode};
use crate::state::{FullscreenKind, PendingRequests, Request, WindowState};

pub use config::{ForeignWindow, WindowConfig, WindowPosition};

/// State requests held back while a window is hidden.
///
/// Each slot keeps only the latest intent, so a later request supersedes an
/// earlier contradictory one.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct DeferredState {
    /// Last of minimize, maximize or restore.
    pub(crate) size_state: Option<Request>,
    /// Whether fullscreen was last entered or left. The target is resolved
    /// on show, so a fullscreen mode chosen meanwhile is honoured.
    pub(crate) fullscreen: Option<bool>,
}

/// Stable window identifier. Ids are never reused within a subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(NonZeroU32);

impl WindowId {
    /// `None` for the reserved value 0.
    pub fn from_raw(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(WindowId)
    }

    pub fn raw(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static_assertions::assert_eq_size!(WindowId, Option<WindowId>);
static_assertions::assert_eq_size!(WindowId, u32);

bitflags::bitflags! {
    /// Committed window state and attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WindowFlags: u64 {
        const FULLSCREEN = 1 << 0;
        const OPENGL = 1 << 1;
        const OCCLUDED = 1 << 2;
        const HIDDEN = 1 << 3;
        const BORDERLESS = 1 << 4;
        const RESIZABLE = 1 << 5;
        const MINIMIZED = 1 << 6;
        const MAXIMIZED = 1 << 7;
        const MOUSE_GRABBED = 1 << 8;
        const INPUT_FOCUS = 1 << 9;
        const MOUSE_FOCUS = 1 << 10;
        const EXTERNAL = 1 << 11;
        const MODAL = 1 << 12;
        const HIGH_PIXEL_DENSITY = 1 << 13;
        const ALWAYS_ON_TOP = 1 << 16;
        const UTILITY = 1 << 17;
        const TOOLTIP = 1 << 18;
        const POPUP_MENU = 1 << 19;
        const KEYBOARD_GRABBED = 1 << 20;
        const VULKAN = 1 << 28;
        const METAL = 1 << 29;
        const TRANSPARENT = 1 << 30;
        const NOT_FOCUSABLE = 1 << 31;
    }
}

impl WindowFlags {
    /// Tooltip or popup menu.
    pub const POPUP: WindowFlags = WindowFlags::TOOLTIP.union(WindowFlags::POPUP_MENU);

    /// Graphics API a window was created for.
    pub const GRAPHICS: WindowFlags = WindowFlags::OPENGL.union(WindowFlags::VULKAN).union(WindowFlags::METAL);

    pub const fn is_popup(self) -> bool {
        self.intersects(Self::POPUP)
    }
}

/// A window owned by the subsystem.
///
/// Geometry and flags are the committed state: they change only when the
/// platform reports a transition.
#[derive(Debug)]
pub struct Window {
    pub(crate) id: WindowId,
    pub(crate) title: String,
    pub(crate) flags: WindowFlags,
    pub(crate) position: Point<i32>,
    pub(crate) size: Size<u32>,
    pub(crate) pixel_size: Size<u32>,
    /// Geometry to return to when leaving maximized or fullscreen.
    pub(crate) floating: Rect,
    pub(crate) min_size: Size<u32>,
    pub(crate) max_size: Size<u32>,
    pub(crate) opacity: f32,
    /// Mode used by `set_fullscreen(true)`; `None` means desktop fullscreen.
    pub(crate) requested_fullscreen_mode: Option<DisplayMode>,
    /// Exclusive mode currently applied, if any.
    pub(crate) fullscreen_mode: Option<DisplayMode>,
    pub(crate) display: Option<DisplayId>,
    pub(crate) parent: Option<WindowId>,
    pub(crate) children: Vec<WindowId>,
    pub(crate) hidden_explicit: bool,
    pub(crate) hidden_inherited: bool,
    pub(crate) deferred: DeferredState,
    pub(crate) pending: PendingRequests,
    pub(crate) properties: PropertyGroup,
}

impl Window {
    pub(crate) fn new(id: WindowId, title: String, flags: WindowFlags, position: Point<i32>, size: Size<u32>) -> Self {
        Self {
            id,
            title,
            flags,
            position,
            size,
            pixel_size: size,
            floating: Rect::from_origin_size(position, size),
            min_size: Size::new(0, 0),
            max_size: Size::new(0, 0),
            opacity: 1.0,
            requested_fullscreen_mode: None,
            fullscreen_mode: None,
            display: None,
            parent: None,
            children: Vec::new(),
            hidden_explicit: false,
            hidden_inherited: false,
            deferred: DeferredState::default(),
            pending: PendingRequests::default(),
            properties: PropertyGroup::new(),
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn flags(&self) -> WindowFlags {
        self.flags
    }

    /// Top-left corner. Popups report an offset from their parent.
    pub fn position(&self) -> Point<i32> {
        self.position
    }

    /// Client area in logical units.
    pub fn size(&self) -> Size<u32> {
        self.size
    }

    /// Client area in pixels.
    pub fn size_in_pixels(&self) -> Size<u32> {
        self.pixel_size
    }

    pub fn pixel_density(&self) -> f32 {
        if self.size.width == 0 {
            return 1.0;
        }
        self.pixel_size.width as f32 / self.size.width as f32
    }

    /// Geometry restored when leaving maximized or fullscreen.
    pub fn floating_rect(&self) -> Rect {
        self.floating
    }

    /// Zero means no limit.
    pub fn minimum_size(&self) -> Size<u32> {
        self.min_size
    }

    /// Zero means no limit.
    pub fn maximum_size(&self) -> Size<u32> {
        self.max_size
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn requested_fullscreen_mode(&self) -> Option<&DisplayMode> {
        self.requested_fullscreen_mode.as_ref()
    }

    pub fn display(&self) -> Option<DisplayId> {
        self.display
    }

    pub fn parent(&self) -> Option<WindowId> {
        self.parent
    }

    pub fn children(&self) -> &[WindowId] {
        &self.children
    }

    pub fn properties(&self) -> &PropertyGroup {
        &self.properties
    }

    pub fn is_popup(&self) -> bool {
        self.flags.is_popup()
    }

    /// Hidden by request or because an ancestor is hidden.
    pub fn is_hidden(&self) -> bool {
        self.hidden_explicit || self.hidden_inherited
    }

    pub fn is_explicitly_hidden(&self) -> bool {
        self.hidden_explicit
    }

    /// Requests submitted and not yet resolved by the platform.
    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }

    /// Committed window state. Minimized takes precedence over fullscreen,
    /// fullscreen over maximized.
    pub fn state(&self) -> WindowState {
        if self.flags.contains(WindowFlags::MINIMIZED) {
            WindowState::Minimized
        } else if self.flags.contains(WindowFlags::FULLSCREEN) {
            if self.fullscreen_mode.is_some() {
                WindowState::Fullscreen(FullscreenKind::Exclusive)
            } else {
                WindowState::Fullscreen(FullscreenKind::Desktop)
            }
        } else if self.flags.contains(WindowFlags::MAXIMIZED) {
            WindowState::Maximized
        } else {
            WindowState::Normal
        }
    }

    pub(crate) fn is_exclusive_fullscreen(&self) -> bool {
        self.state() == WindowState::Fullscreen(FullscreenKind::Exclusive)
    }

    pub(crate) fn clamp_size(&self, size: Size<u32>) -> Size<u32> {
        let mut width = size.width.max(self.min_size.width);
        let mut height = size.height.max(self.min_size.height);
        if self.max_size.width > 0 {
            width = width.min(self.max_size.width);
        }
        if self.max_size.height > 0 {
            height = height.min(self.max_size.height);
        }
        Size::new(width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(flags: WindowFlags) -> Window {
        Window::new(
            WindowId::from_raw(1).unwrap(),
            "test".into(),
            flags,
            Point::new(0, 0),
            Size::new(800, 600),
        )
    }

    #[test]
    fn test_window_id_zero_is_invalid() {
        assert!(WindowId::from_raw(0).is_none());
        assert_eq!(WindowId::from_raw(42).unwrap().raw(), 42);
    }

    #[test]
    fn test_state_precedence() {
        let mut w = window(WindowFlags::MAXIMIZED | WindowFlags::FULLSCREEN);
        assert_eq!(w.state(), WindowState::Fullscreen(FullscreenKind::Desktop));

        w.flags.insert(WindowFlags::MINIMIZED);
        assert_eq!(w.state(), WindowState::Minimized);

        w.flags = WindowFlags::MAXIMIZED;
        assert_eq!(w.state(), WindowState::Maximized);
    }

    #[test]
    fn test_clamp_size_respects_limits() {
        let mut w = window(WindowFlags::RESIZABLE);
        w.min_size = Size::new(200, 100);
        w.max_size = Size::new(1000, 0);
        assert_eq!(w.clamp_size(Size::new(50, 5000)), Size::new(200, 5000));
        assert_eq!(w.clamp_size(Size::new(4000, 50)), Size::new(1000, 100));
    }

    #[test]
    fn test_pixel_density() {
        let mut w = window(WindowFlags::HIGH_PIXEL_DENSITY);
        w.pixel_size = Size::new(1600, 1200);
        assert_eq!(w.pixel_density(), 2.0);
    }
}
