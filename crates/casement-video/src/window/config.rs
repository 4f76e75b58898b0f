//! Typed window-creation intent and its property-group encoding.

use std::ffi::c_void;

use casement_core::properties::PropertyGroup;

use crate::display::DisplayId;
use crate::window::WindowId;

/// Property keys understood by
/// [`create_window_with_properties`](crate::VideoSubsystem::create_window_with_properties).
pub mod keys {
    pub const TITLE: &str = "window.create.title";
    pub const X: &str = "window.create.x";
    pub const Y: &str = "window.create.y";
    pub const WIDTH: &str = "window.create.width";
    pub const HEIGHT: &str = "window.create.height";
    pub const FULLSCREEN: &str = "window.create.fullscreen";
    pub const HIDDEN: &str = "window.create.hidden";
    pub const MAXIMIZED: &str = "window.create.maximized";
    pub const MINIMIZED: &str = "window.create.minimized";
    pub const BORDERLESS: &str = "window.create.borderless";
    pub const RESIZABLE: &str = "window.create.resizable";
    pub const ALWAYS_ON_TOP: &str = "window.create.always_on_top";
    pub const TRANSPARENT: &str = "window.create.transparent";
    pub const MODAL: &str = "window.create.modal";
    pub const TOOLTIP: &str = "window.create.tooltip";
    pub const MENU: &str = "window.create.menu";
    pub const UTILITY: &str = "window.create.utility";
    pub const FOCUSABLE: &str = "window.create.focusable";
    pub const HIGH_PIXEL_DENSITY: &str = "window.create.high_pixel_density";
    pub const PARENT: &str = "window.create.parent";
    pub const OPENGL: &str = "window.create.opengl";
    pub const VULKAN: &str = "window.create.vulkan";
    pub const METAL: &str = "window.create.metal";
    pub const EXTERNAL_GRAPHICS_CONTEXT: &str = "window.create.external_graphics_context";
    pub const X11_WINDOW: &str = "window.create.x11.window";
    pub const WAYLAND_SURFACE: &str = "window.create.wayland.surface";
    pub const WIN32_HWND: &str = "window.create.win32.hwnd";
    pub const COCOA_WINDOW: &str = "window.create.cocoa.window";
}

const POSITION_UNDEFINED_MASK: i64 = 0x1FFF_0000;
const POSITION_CENTERED_MASK: i64 = 0x2FFF_0000;
const POSITION_DISPLAY_BITS: i64 = 0xFFFF;

/// One axis of a requested window position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPosition {
    /// Desktop coordinate, or an offset from the parent for popups.
    Absolute(i32),
    /// Centered on the given display, or the primary one.
    Centered(Option<DisplayId>),
    /// Let the platform choose, optionally on a given display.
    Undefined(Option<DisplayId>),
}

impl Default for WindowPosition {
    fn default() -> Self {
        WindowPosition::Undefined(None)
    }
}

impl WindowPosition {
    /// Integer form stored in property groups.
    pub fn encode(self) -> i64 {
        match self {
            WindowPosition::Absolute(value) => value as i64,
            WindowPosition::Centered(display) => POSITION_CENTERED_MASK | display.map_or(0, |d| d.raw() as i64),
            WindowPosition::Undefined(display) => POSITION_UNDEFINED_MASK | display.map_or(0, |d| d.raw() as i64),
        }
    }

    pub fn decode(value: i64) -> WindowPosition {
        let display = || DisplayId::from_raw((value & POSITION_DISPLAY_BITS) as u32);
        match value & !POSITION_DISPLAY_BITS {
            POSITION_CENTERED_MASK => WindowPosition::Centered(display()),
            POSITION_UNDEFINED_MASK => WindowPosition::Undefined(display()),
            _ => WindowPosition::Absolute(value.clamp(i32::MIN as i64, i32::MAX as i64) as i32),
        }
    }

    pub fn display(self) -> Option<DisplayId> {
        match self {
            WindowPosition::Absolute(_) => None,
            WindowPosition::Centered(display) | WindowPosition::Undefined(display) => display,
        }
    }
}

/// Native window to wrap instead of creating a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignWindow {
    X11(u64),
    Wayland(*mut c_void),
    Win32(*mut c_void),
    Cocoa(*mut c_void),
}

/// Describes a window to create.
///
/// Every field has a neutral default; [`to_properties`](Self::to_properties)
/// only writes fields that differ from it.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    /// Empty means the subsystem's default title.
    pub title: String,
    /// Zero means the subsystem's default width.
    pub width: u32,
    /// Zero means the subsystem's default height.
    pub height: u32,
    pub x: WindowPosition,
    pub y: WindowPosition,
    pub fullscreen: bool,
    pub hidden: bool,
    pub maximized: bool,
    pub minimized: bool,
    pub borderless: bool,
    pub resizable: bool,
    pub always_on_top: bool,
    pub transparent: bool,
    pub modal: bool,
    pub tooltip: bool,
    pub menu: bool,
    pub utility: bool,
    pub focusable: bool,
    pub high_pixel_density: bool,
    pub parent: Option<WindowId>,
    pub opengl: bool,
    pub vulkan: bool,
    pub metal: bool,
    pub external_graphics_context: bool,
    pub foreign: Option<ForeignWindow>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            width: 0,
            height: 0,
            x: WindowPosition::default(),
            y: WindowPosition::default(),
            fullscreen: false,
            hidden: false,
            maximized: false,
            minimized: false,
            borderless: false,
            resizable: false,
            always_on_top: false,
            transparent: false,
            modal: false,
            tooltip: false,
            menu: false,
            utility: false,
            focusable: true,
            high_pixel_density: false,
            parent: None,
            opengl: false,
            vulkan: false,
            metal: false,
            external_graphics_context: false,
            foreign: None,
        }
    }
}

impl WindowConfig {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            ..Default::default()
        }
    }

    /// A tooltip or menu anchored to `parent` at a parent-relative offset.
    pub fn popup(parent: WindowId, x: i32, y: i32, width: u32, height: u32, menu: bool) -> Self {
        Self {
            width,
            height,
            x: WindowPosition::Absolute(x),
            y: WindowPosition::Absolute(y),
            tooltip: !menu,
            menu,
            parent: Some(parent),
            ..Default::default()
        }
    }

    pub fn with_position(mut self, x: WindowPosition, y: WindowPosition) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    pub fn with_borderless(mut self, borderless: bool) -> Self {
        self.borderless = borderless;
        self
    }

    pub fn with_parent(mut self, parent: WindowId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_modal(mut self, modal: bool) -> Self {
        self.modal = modal;
        self
    }

    pub fn with_foreign(mut self, foreign: ForeignWindow) -> Self {
        self.foreign = Some(foreign);
        self
    }

    pub fn is_popup(&self) -> bool {
        self.tooltip || self.menu
    }

    /// Encode into creation properties.
    pub fn to_properties(&self) -> PropertyGroup {
        let defaults = WindowConfig::default();
        let mut props = PropertyGroup::new();

        if !self.title.is_empty() {
            props.set_string(keys::TITLE, self.title.as_str());
        }
        if self.width != 0 {
            props.set_int(keys::WIDTH, self.width as i64);
        }
        if self.height != 0 {
            props.set_int(keys::HEIGHT, self.height as i64);
        }
        if self.x != defaults.x {
            props.set_int(keys::X, self.x.encode());
        }
        if self.y != defaults.y {
            props.set_int(keys::Y, self.y.encode());
        }

        let flags = [
            (keys::FULLSCREEN, self.fullscreen, defaults.fullscreen),
            (keys::HIDDEN, self.hidden, defaults.hidden),
            (keys::MAXIMIZED, self.maximized, defaults.maximized),
            (keys::MINIMIZED, self.minimized, defaults.minimized),
            (keys::BORDERLESS, self.borderless, defaults.borderless),
            (keys::RESIZABLE, self.resizable, defaults.resizable),
            (keys::ALWAYS_ON_TOP, self.always_on_top, defaults.always_on_top),
            (keys::TRANSPARENT, self.transparent, defaults.transparent),
            (keys::MODAL, self.modal, defaults.modal),
            (keys::TOOLTIP, self.tooltip, defaults.tooltip),
            (keys::MENU, self.menu, defaults.menu),
            (keys::UTILITY, self.utility, defaults.utility),
            (keys::FOCUSABLE, self.focusable, defaults.focusable),
            (keys::HIGH_PIXEL_DENSITY, self.high_pixel_density, defaults.high_pixel_density),
            (keys::OPENGL, self.opengl, defaults.opengl),
            (keys::VULKAN, self.vulkan, defaults.vulkan),
            (keys::METAL, self.metal, defaults.metal),
            (
                keys::EXTERNAL_GRAPHICS_CONTEXT,
                self.external_graphics_context,
                defaults.external_graphics_context,
            ),
        ];
        for (key, value, default) in flags {
            if value != default {
                props.set_bool(key, value);
            }
        }

        if let Some(parent) = self.parent {
            props.set_int(keys::PARENT, parent.raw() as i64);
        }

        match self.foreign {
            Some(ForeignWindow::X11(window)) => props.set_int(keys::X11_WINDOW, window as i64),
            Some(ForeignWindow::Wayland(surface)) => props.set_pointer(keys::WAYLAND_SURFACE, surface),
            Some(ForeignWindow::Win32(hwnd)) => props.set_pointer(keys::WIN32_HWND, hwnd),
            Some(ForeignWindow::Cocoa(window)) => props.set_pointer(keys::COCOA_WINDOW, window),
            None => {}
        }

        props
    }

    /// Decode creation properties. Missing keys keep their defaults.
    pub fn from_properties(props: &PropertyGroup) -> Self {
        let d = WindowConfig::default();
        let dimension = |key: &str| props.get_int(key, 0).clamp(0, u32::MAX as i64) as u32;
        let position = |key: &str, default: WindowPosition| {
            if props.has(key) {
                WindowPosition::decode(props.get_int(key, 0))
            } else {
                default
            }
        };

        let foreign = if let Some(hwnd) = props.get_pointer(keys::WIN32_HWND) {
            Some(ForeignWindow::Win32(hwnd))
        } else if let Some(window) = props.get_pointer(keys::COCOA_WINDOW) {
            Some(ForeignWindow::Cocoa(window))
        } else if let Some(surface) = props.get_pointer(keys::WAYLAND_SURFACE) {
            Some(ForeignWindow::Wayland(surface))
        } else if props.has(keys::X11_WINDOW) {
            Some(ForeignWindow::X11(props.get_int(keys::X11_WINDOW, 0) as u64))
        } else {
            None
        };

        WindowConfig {
            title: props.get_string(keys::TITLE, "").into_owned(),
            width: dimension(keys::WIDTH),
            height: dimension(keys::HEIGHT),
            x: position(keys::X, d.x),
            y: position(keys::Y, d.y),
            fullscreen: props.get_bool(keys::FULLSCREEN, d.fullscreen),
            hidden: props.get_bool(keys::HIDDEN, d.hidden),
            maximized: props.get_bool(keys::MAXIMIZED, d.maximized),
            minimized: props.get_bool(keys::MINIMIZED, d.minimized),
            borderless: props.get_bool(keys::BORDERLESS, d.borderless),
            resizable: props.get_bool(keys::RESIZABLE, d.resizable),
            always_on_top: props.get_bool(keys::ALWAYS_ON_TOP, d.always_on_top),
            transparent: props.get_bool(keys::TRANSPARENT, d.transparent),
            modal: props.get_bool(keys::MODAL, d.modal),
            tooltip: props.get_bool(keys::TOOLTIP, d.tooltip),
            menu: props.get_bool(keys::MENU, d.menu),
            utility: props.get_bool(keys::UTILITY, d.utility),
            focusable: props.get_bool(keys::FOCUSABLE, d.focusable),
            high_pixel_density: props.get_bool(keys::HIGH_PIXEL_DENSITY, d.high_pixel_density),
            parent: u32::try_from(props.get_int(keys::PARENT, 0))
                .ok()
                .and_then(WindowId::from_raw),
            opengl: props.get_bool(keys::OPENGL, d.opengl),
            vulkan: props.get_bool(keys::VULKAN, d.vulkan),
            metal: props.get_bool(keys::METAL, d.metal),
            external_graphics_context: props.get_bool(keys::EXTERNAL_GRAPHICS_CONTEXT, d.external_graphics_context),
            foreign,
        }
    }
}
