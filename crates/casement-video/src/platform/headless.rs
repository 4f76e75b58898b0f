//! Offscreen platform.
//!
//! Keeps every window in memory and answers requests when pumped, the way a
//! compositor would, including refusals (maximizing a fixed-size window),
//! display mode switches for exclusive fullscreen, and windows that never
//! answer. Useful for tests and for running without a display server.

use std::collections::VecDeque;
use std::num::NonZeroU32;
use std::time::Duration;

use casement_core::alloc::HashMap;
use casement_core::geometry::{Point, Rect, Size};
use casement_core::properties::PropertyGroup;

use crate::display::{Display, DisplayId, DisplayMode, Orientation, display_props};
use crate::error::{VideoError, VideoResult};
use crate::grab::GrabKind;
use crate::notification::{Notification, WindowNotification};
use crate::pixel_format::PixelFormat;
use crate::platform::{FlashOperation, NativeWindowSpec, Platform, PlatformCapabilities, PlatformEvent, WindowSnapshot};
use crate::state::{FullscreenTarget, Request, RequestTicket, Resolution};
use crate::window::{WindowFlags, WindowId};

/// One mode offered by a [`HeadlessDisplay`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeSpec {
    pub width: u32,
    pub height: u32,
    pub refresh_rate: f32,
    pub format: PixelFormat,
    pub pixel_density: f32,
}

impl ModeSpec {
    pub fn new(width: u32, height: u32, refresh_rate: f32) -> Self {
        Self {
            width,
            height,
            refresh_rate,
            format: PixelFormat::Xrgb8888,
            pixel_density: 1.0,
        }
    }

    pub fn with_format(mut self, format: PixelFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_pixel_density(mut self, density: f32) -> Self {
        self.pixel_density = density;
        self
    }

    fn to_mode(self, display: DisplayId) -> DisplayMode {
        DisplayMode::new(display, self.format, self.width, self.height, self.refresh_rate)
            .with_pixel_density(self.pixel_density)
    }
}

/// Description of a simulated display.
#[derive(Debug, Clone)]
pub struct HeadlessDisplay {
    name: String,
    origin: Point<i32>,
    desktop: ModeSpec,
    modes: Vec<ModeSpec>,
    usable_bounds: Option<Rect>,
    content_scale: f32,
    orientation: Orientation,
    hdr_headroom: Option<f32>,
}

impl HeadlessDisplay {
    /// A display whose desktop mode is `width`x`height` at 60 Hz.
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            origin: Point::new(0, 0),
            desktop: ModeSpec::new(width, height, 60.0),
            modes: Vec::new(),
            usable_bounds: None,
            content_scale: 1.0,
            orientation: Orientation::Landscape,
            hdr_headroom: None,
        }
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.origin = Point::new(x, y);
        self
    }

    pub fn with_refresh_rate(mut self, rate: f32) -> Self {
        self.desktop.refresh_rate = rate;
        self
    }

    pub fn with_desktop_mode(mut self, mode: ModeSpec) -> Self {
        self.desktop = mode;
        self
    }

    /// Extra fullscreen mode. The desktop mode is always offered.
    pub fn with_mode(mut self, mode: ModeSpec) -> Self {
        self.modes.push(mode);
        self
    }

    pub fn with_modes(mut self, modes: impl IntoIterator<Item = ModeSpec>) -> Self {
        self.modes.extend(modes);
        self
    }

    pub fn with_usable_bounds(mut self, bounds: Rect) -> Self {
        self.usable_bounds = Some(bounds);
        self
    }

    pub fn with_content_scale(mut self, scale: f32) -> Self {
        self.content_scale = scale;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_hdr(mut self, headroom: f32) -> Self {
        self.hdr_headroom = Some(headroom);
        self
    }

    fn build(&self, id: DisplayId) -> Display {
        let desktop = self.desktop.to_mode(id);
        let mut modes = vec![desktop];
        modes.extend(self.modes.iter().map(|spec| spec.to_mode(id)));

        let bounds = Rect::from_origin_size(self.origin, desktop.size());
        let mut properties = PropertyGroup::new();
        if let Some(headroom) = self.hdr_headroom {
            properties.set_bool(display_props::HDR_ENABLED, true);
            properties.set_float(display_props::SDR_WHITE_POINT, 1.0);
            properties.set_float(display_props::HDR_HEADROOM, headroom);
        }

        Display {
            id,
            name: self.name.clone(),
            bounds,
            usable_bounds: self.usable_bounds.unwrap_or(bounds),
            natural_orientation: self.orientation,
            current_orientation: self.orientation,
            content_scale: self.content_scale,
            desktop_mode: desktop,
            current_mode: desktop,
            modes,
            properties,
        }
    }
}

impl Default for HeadlessDisplay {
    fn default() -> Self {
        HeadlessDisplay::new("Headless Display", 1920, 1080).with_modes([
            ModeSpec::new(1600, 900, 60.0),
            ModeSpec::new(1280, 720, 60.0),
            ModeSpec::new(800, 600, 60.0),
        ])
    }
}

#[derive(Debug)]
struct HeadlessWindow {
    flags: WindowFlags,
    position: Point<i32>,
    size: Size<u32>,
    floating: Rect,
    display: DisplayId,
    exclusive: Option<DisplayMode>,
    unresponsive: bool,
}

impl HeadlessWindow {
    fn is_normal(&self) -> bool {
        !self
            .flags
            .intersects(WindowFlags::MINIMIZED | WindowFlags::MAXIMIZED | WindowFlags::FULLSCREEN)
    }

    fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }
}

#[derive(Debug, Clone, Copy)]
struct Queued {
    window: WindowId,
    ticket: RequestTicket,
    request: Request,
}

enum FocusChange {
    None,
    Take,
    Drop,
}

/// Offscreen [`Platform`].
#[derive(Debug)]
pub struct HeadlessPlatform {
    capabilities: PlatformCapabilities,
    displays: Vec<Display>,
    next_display_id: NonZeroU32,
    windows: HashMap<WindowId, HeadlessWindow>,
    queue: VecDeque<Queued>,
    /// Events not caused by a request, delivered on the next pump.
    spontaneous: Vec<PlatformEvent>,
    focused: Option<WindowId>,
    screen_saver_enabled: bool,
}

impl HeadlessPlatform {
    /// One 1920x1080 display.
    pub fn new() -> Self {
        Self::with_displays([HeadlessDisplay::default()])
    }

    /// Displays in order; the first is primary.
    pub fn with_displays(displays: impl IntoIterator<Item = HeadlessDisplay>) -> Self {
        let mut platform = Self {
            capabilities: PlatformCapabilities::OPACITY
                | PlatformCapabilities::MODAL
                | PlatformCapabilities::MODE_SWITCHING
                | PlatformCapabilities::TRANSPARENT
                | PlatformCapabilities::FLASH,
            displays: Vec::new(),
            next_display_id: NonZeroU32::MIN,
            windows: HashMap::default(),
            queue: VecDeque::new(),
            spontaneous: Vec::new(),
            focused: None,
            screen_saver_enabled: true,
        };
        for display in displays {
            let id = platform.allocate_display_id();
            platform.displays.push(display.build(id));
        }
        platform
    }

    pub fn with_capabilities(mut self, capabilities: PlatformCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    fn allocate_display_id(&mut self) -> DisplayId {
        let id = DisplayId::from_nonzero(self.next_display_id);
        self.next_display_id = self.next_display_id.saturating_add(1);
        id
    }

    /// Plug in a display; observers learn about it on the next pump.
    pub fn connect_display(&mut self, display: HeadlessDisplay) -> DisplayId {
        let id = self.allocate_display_id();
        self.displays.push(display.build(id));
        self.spontaneous.push(PlatformEvent::DisplaysChanged);
        id
    }

    /// Unplug a display. Windows on it move to the primary display.
    pub fn disconnect_display(&mut self, id: DisplayId) -> bool {
        let Some(index) = self.displays.iter().position(|d| d.id == id) else {
            return false;
        };
        self.displays.remove(index);

        if let Some(primary) = self.displays.first() {
            let primary = primary.id;
            for (window_id, window) in self.windows.iter_mut() {
                if window.display == id {
                    window.display = primary;
                    window.exclusive = None;
                    self.spontaneous.push(notification(*window_id, Notification::DisplayChanged(primary)));
                }
            }
        }
        self.spontaneous.push(PlatformEvent::DisplaysChanged);
        true
    }

    /// Stop (or resume) answering requests for `id`.
    pub fn set_unresponsive(&mut self, id: WindowId, unresponsive: bool) {
        if let Some(window) = self.windows.get_mut(&id) {
            window.unresponsive = unresponsive;
        }
    }

    /// Simulate the user clicking the close button.
    pub fn request_close(&mut self, id: WindowId) {
        if self.windows.contains_key(&id) {
            self.spontaneous.push(notification(id, Notification::CloseRequested));
        }
    }

    pub fn focused_window(&self) -> Option<WindowId> {
        self.focused
    }

    pub fn screen_saver_enabled(&self) -> bool {
        self.screen_saver_enabled
    }

    /// Requests submitted and not yet answered.
    pub fn queued_requests(&self) -> usize {
        self.queue.len()
    }

    fn ensure_window(&self, id: WindowId) -> VideoResult<()> {
        if self.windows.contains_key(&id) {
            Ok(())
        } else {
            Err(VideoError::InvalidWindow { id: id.raw() })
        }
    }

    fn process_queue(&mut self, out: &mut Vec<PlatformEvent>) {
        let queued = std::mem::take(&mut self.queue);
        for item in queued {
            match self.windows.get(&item.window) {
                Some(window) if window.unresponsive => self.queue.push_back(item),
                Some(_) => self.process(item, out),
                None => {}
            }
        }
    }

    fn process(&mut self, item: Queued, out: &mut Vec<PlatformEvent>) {
        let id = item.window;
        let capabilities = self.capabilities;
        let displays = &mut self.displays;
        let Some(window) = self.windows.get_mut(&id) else {
            return;
        };

        let mut focus = FocusChange::None;
        let mut displays_changed = false;
        let mut notes = Vec::new();

        let resolution = match item.request {
            Request::Show => {
                if window.flags.contains(WindowFlags::HIDDEN) {
                    window.flags.remove(WindowFlags::HIDDEN);
                    notes.push(Notification::Shown);
                    if takes_focus(window.flags) {
                        focus = FocusChange::Take;
                    }
                }
                Resolution::Accepted
            }
            Request::Hide => {
                if !window.flags.contains(WindowFlags::HIDDEN) {
                    window.flags.insert(WindowFlags::HIDDEN);
                    notes.push(Notification::Hidden);
                    focus = FocusChange::Drop;
                }
                Resolution::Accepted
            }
            Request::Raise => {
                if takes_focus(window.flags) && !window.flags.contains(WindowFlags::HIDDEN) {
                    focus = FocusChange::Take;
                }
                Resolution::Accepted
            }
            Request::Minimize => {
                if !window.flags.contains(WindowFlags::MINIMIZED) {
                    window.flags.remove(WindowFlags::MAXIMIZED);
                    window.flags.insert(WindowFlags::MINIMIZED);
                    notes.push(Notification::Minimized);
                    focus = FocusChange::Drop;
                }
                Resolution::Accepted
            }
            Request::Maximize => {
                if !window.flags.contains(WindowFlags::RESIZABLE) {
                    Resolution::Denied
                } else {
                    if !window.flags.contains(WindowFlags::MAXIMIZED) || window.flags.contains(WindowFlags::MINIMIZED) {
                        if window.is_normal() {
                            window.floating = window.rect();
                        }
                        window.flags.remove(WindowFlags::MINIMIZED);
                        window.flags.insert(WindowFlags::MAXIMIZED);
                        notes.push(Notification::Maximized);
                        if !window.flags.contains(WindowFlags::FULLSCREEN) {
                            if let Some(display) = find(displays, window.display) {
                                set_geometry(window, display.usable_bounds, display.content_scale, &mut notes);
                            }
                        }
                    }
                    Resolution::Accepted
                }
            }
            Request::Restore => {
                if window.flags.intersects(WindowFlags::MINIMIZED | WindowFlags::MAXIMIZED) {
                    let was_maximized = window.flags.contains(WindowFlags::MAXIMIZED);
                    window.flags.remove(WindowFlags::MINIMIZED | WindowFlags::MAXIMIZED);
                    notes.push(Notification::Restored);
                    if was_maximized && !window.flags.contains(WindowFlags::FULLSCREEN) {
                        let floating = window.floating;
                        let scale = find(displays, window.display).map_or(1.0, |d| d.content_scale);
                        set_geometry(window, floating, scale, &mut notes);
                    }
                }
                Resolution::Accepted
            }
            Request::SetPosition(position) => {
                window.floating.x = position.x;
                window.floating.y = position.y;
                if window.is_normal() {
                    let target = Rect::from_origin_size(position, window.size);
                    let scale = find(displays, window.display).map_or(1.0, |d| d.content_scale);
                    set_geometry(window, target, scale, &mut notes);
                }
                Resolution::Accepted
            }
            Request::SetSize(size) => {
                window.floating.width = size.width;
                window.floating.height = size.height;
                if window.is_normal() {
                    let target = Rect::from_origin_size(window.position, size);
                    let scale = find(displays, window.display).map_or(1.0, |d| d.content_scale);
                    set_geometry(window, target, scale, &mut notes);
                }
                Resolution::Accepted
            }
            Request::SetFullscreen(Some(FullscreenTarget::Desktop(display_id))) => {
                if find(displays, display_id).is_none() {
                    Resolution::Denied
                } else {
                    if let Some(previous) = window.exclusive.take() {
                        displays_changed |= restore_desktop_mode(displays, previous.display);
                    }
                    enter_fullscreen(window, displays, display_id, &mut notes);
                    Resolution::Accepted
                }
            }
            Request::SetFullscreen(Some(FullscreenTarget::Exclusive(mode))) => {
                let offered = find(displays, mode.display).is_some_and(|d| d.modes.iter().any(|m| m.same_mode(&mode)));
                if !capabilities.contains(PlatformCapabilities::MODE_SWITCHING) || !offered {
                    Resolution::Denied
                } else {
                    if let Some(previous) = window.exclusive.take() {
                        if previous.display != mode.display {
                            displays_changed |= restore_desktop_mode(displays, previous.display);
                        }
                    }
                    if let Some(display) = displays.iter_mut().find(|d| d.id == mode.display) {
                        if !display.current_mode.same_mode(&mode) {
                            display.current_mode = mode;
                            display.bounds = Rect::from_origin_size(display.bounds.origin(), mode.size());
                            display.usable_bounds = display.bounds;
                            displays_changed = true;
                        }
                    }
                    window.exclusive = Some(mode);
                    enter_fullscreen(window, displays, mode.display, &mut notes);
                    Resolution::Accepted
                }
            }
            Request::SetFullscreen(None) => {
                if window.flags.contains(WindowFlags::FULLSCREEN) {
                    window.flags.remove(WindowFlags::FULLSCREEN);
                    if let Some(previous) = window.exclusive.take() {
                        displays_changed |= restore_desktop_mode(displays, previous.display);
                    }
                    notes.push(Notification::LeftFullscreen);
                    if let Some(display) = find(displays, window.display) {
                        let target = if window.flags.contains(WindowFlags::MAXIMIZED) {
                            display.usable_bounds
                        } else {
                            window.floating
                        };
                        set_geometry(window, target, display.content_scale, &mut notes);
                    }
                }
                Resolution::Accepted
            }
            Request::SetBordered(bordered) => {
                window.flags.set(WindowFlags::BORDERLESS, !bordered);
                Resolution::Accepted
            }
            Request::SetResizable(resizable) => {
                window.flags.set(WindowFlags::RESIZABLE, resizable);
                Resolution::Accepted
            }
            Request::SetAlwaysOnTop(on_top) => {
                window.flags.set(WindowFlags::ALWAYS_ON_TOP, on_top);
                Resolution::Accepted
            }
            Request::SetFocusable(focusable) => {
                window.flags.set(WindowFlags::NOT_FOCUSABLE, !focusable);
                if !focusable {
                    focus = FocusChange::Drop;
                }
                Resolution::Accepted
            }
        };

        out.extend(notes.into_iter().map(|n| notification(id, n)));
        match focus {
            FocusChange::Take => self.focus(id, out),
            FocusChange::Drop => self.unfocus(id, out),
            FocusChange::None => {}
        }
        if displays_changed {
            out.push(PlatformEvent::DisplaysChanged);
        }
        out.push(PlatformEvent::Resolved {
            window: id,
            ticket: item.ticket,
            resolution,
        });
    }

    fn focus(&mut self, id: WindowId, out: &mut Vec<PlatformEvent>) {
        if self.focused == Some(id) {
            return;
        }
        if let Some(previous) = self.focused.take() {
            self.unfocus(previous, out);
        }
        if let Some(window) = self.windows.get_mut(&id) {
            window.flags.insert(WindowFlags::INPUT_FOCUS);
            self.focused = Some(id);
            out.push(notification(id, Notification::FocusGained));
        }
    }

    fn unfocus(&mut self, id: WindowId, out: &mut Vec<PlatformEvent>) {
        if let Some(window) = self.windows.get_mut(&id) {
            if window.flags.contains(WindowFlags::INPUT_FOCUS) {
                window.flags.remove(WindowFlags::INPUT_FOCUS);
                out.push(notification(id, Notification::FocusLost));
            }
        }
        if self.focused == Some(id) {
            self.focused = None;
        }
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

fn notification(window: WindowId, notification: Notification) -> PlatformEvent {
    PlatformEvent::Notification(WindowNotification { window, notification })
}

fn takes_focus(flags: WindowFlags) -> bool {
    !flags.intersects(WindowFlags::NOT_FOCUSABLE | WindowFlags::TOOLTIP)
}

fn find(displays: &[Display], id: DisplayId) -> Option<&Display> {
    displays.iter().find(|d| d.id == id)
}

fn pixel_size(flags: WindowFlags, size: Size<u32>, content_scale: f32) -> Size<u32> {
    if flags.contains(WindowFlags::HIGH_PIXEL_DENSITY) {
        size.scale(content_scale)
    } else {
        size
    }
}

fn set_geometry(window: &mut HeadlessWindow, target: Rect, content_scale: f32, notes: &mut Vec<Notification>) {
    if window.position != target.origin() {
        window.position = target.origin();
        notes.push(Notification::Moved(window.position));
    }
    if window.size != target.size() {
        window.size = target.size();
        notes.push(Notification::Resized(window.size));
        notes.push(Notification::PixelSizeChanged(pixel_size(
            window.flags,
            window.size,
            content_scale,
        )));
    }
}

fn enter_fullscreen(window: &mut HeadlessWindow, displays: &[Display], display_id: DisplayId, notes: &mut Vec<Notification>) {
    let Some(display) = find(displays, display_id) else {
        return;
    };
    if !window.flags.contains(WindowFlags::FULLSCREEN) {
        if window.is_normal() {
            window.floating = window.rect();
        }
        window.flags.insert(WindowFlags::FULLSCREEN);
        notes.push(Notification::EnteredFullscreen);
    }
    if window.display != display_id {
        window.display = display_id;
        notes.push(Notification::DisplayChanged(display_id));
    }
    set_geometry(window, display.bounds, display.content_scale, notes);
}

/// Switch a display back to its desktop mode. Returns whether it changed.
fn restore_desktop_mode(displays: &mut [Display], id: DisplayId) -> bool {
    let Some(display) = displays.iter_mut().find(|d| d.id == id) else {
        return false;
    };
    if display.current_mode.same_mode(&display.desktop_mode) {
        return false;
    }
    display.current_mode = display.desktop_mode;
    display.bounds = Rect::from_origin_size(display.bounds.origin(), display.desktop_mode.size());
    display.usable_bounds = display.bounds;
    true
}

impl Platform for HeadlessPlatform {
    fn name(&self) -> &str {
        "headless"
    }

    fn capabilities(&self) -> PlatformCapabilities {
        self.capabilities
    }

    fn enumerate_displays(&mut self) -> VideoResult<Vec<Display>> {
        Ok(self.displays.clone())
    }

    fn create_window(&mut self, id: WindowId, spec: &NativeWindowSpec) -> VideoResult<WindowSnapshot> {
        if self.windows.contains_key(&id) {
            return Err(VideoError::Platform {
                message: format!("window {} already exists", id),
            });
        }
        let display = spec
            .display
            .and_then(|d| find(&self.displays, d))
            .or_else(|| self.displays.first())
            .ok_or_else(|| VideoError::Platform {
                message: "no display connected".to_string(),
            })?;

        let mut flags = spec.flags;
        let mut window = HeadlessWindow {
            flags,
            position: spec.position,
            size: spec.size,
            floating: Rect::from_origin_size(spec.position, spec.size),
            display: display.id,
            exclusive: None,
            unresponsive: false,
        };

        if flags.contains(WindowFlags::FULLSCREEN) {
            window.position = display.bounds.origin();
            window.size = display.bounds.size();
        } else if flags.contains(WindowFlags::MAXIMIZED) {
            if flags.contains(WindowFlags::RESIZABLE) {
                window.position = display.usable_bounds.origin();
                window.size = display.usable_bounds.size();
            } else {
                flags.remove(WindowFlags::MAXIMIZED);
                window.flags = flags;
            }
        }

        let snapshot = WindowSnapshot {
            position: window.position,
            size: window.size,
            pixel_size: pixel_size(flags, window.size, display.content_scale),
            flags: flags - WindowFlags::INPUT_FOCUS,
            display: Some(display.id),
            properties: PropertyGroup::new(),
        };
        self.windows.insert(id, window);

        let visible = !flags.intersects(WindowFlags::HIDDEN | WindowFlags::MINIMIZED);
        if visible && takes_focus(flags) && !flags.is_popup() {
            let mut events = Vec::new();
            self.focus(id, &mut events);
            self.spontaneous.extend(events);
        }

        Ok(snapshot)
    }

    fn destroy_window(&mut self, id: WindowId) {
        let Some(window) = self.windows.remove(&id) else {
            return;
        };
        self.queue.retain(|q| q.window != id);
        if self.focused == Some(id) {
            self.focused = None;
        }
        if let Some(mode) = window.exclusive {
            if restore_desktop_mode(&mut self.displays, mode.display) {
                self.spontaneous.push(PlatformEvent::DisplaysChanged);
            }
        }
        self.spontaneous.retain(|event| match event {
            PlatformEvent::Notification(n) => n.window != id,
            PlatformEvent::Resolved { window, .. } => *window != id,
            PlatformEvent::DisplaysChanged => true,
        });
    }

    fn submit(&mut self, id: WindowId, ticket: RequestTicket, request: &Request) -> VideoResult<()> {
        if !self.windows.contains_key(&id) {
            return Err(VideoError::InvalidWindow { id: id.raw() });
        }
        self.queue.push_back(Queued {
            window: id,
            ticket,
            request: *request,
        });
        Ok(())
    }

    fn pump(&mut self) -> Vec<PlatformEvent> {
        let mut out = std::mem::take(&mut self.spontaneous);
        self.process_queue(&mut out);
        out
    }

    fn sync(&mut self, id: WindowId, timeout: Duration) -> Vec<PlatformEvent> {
        if self.windows.get(&id).is_some_and(|w| w.unresponsive) {
            std::thread::sleep(timeout);
        }
        self.pump()
    }

    fn set_title(&mut self, id: WindowId, _title: &str) -> VideoResult<()> {
        self.ensure_window(id)
    }

    fn set_opacity(&mut self, id: WindowId, _opacity: f32) -> VideoResult<()> {
        if !self.capabilities.contains(PlatformCapabilities::OPACITY) {
            return Err(VideoError::UnsupportedOperation {
                operation: "set_window_opacity",
            });
        }
        self.ensure_window(id)
    }

    fn set_parent(&mut self, id: WindowId, parent: Option<WindowId>) -> VideoResult<()> {
        if let Some(parent) = parent {
            let display = self
                .windows
                .get(&parent)
                .map(|p| p.display)
                .ok_or(VideoError::InvalidWindow { id: parent.raw() })?;
            if let Some(window) = self.windows.get_mut(&id) {
                window.display = display;
            }
        }
        Ok(())
    }

    fn set_modal(&mut self, _id: WindowId, _modal: bool) -> VideoResult<()> {
        if self.capabilities.contains(PlatformCapabilities::MODAL) {
            Ok(())
        } else {
            Err(VideoError::UnsupportedOperation {
                operation: "set_window_modal",
            })
        }
    }

    fn set_grab(&mut self, id: WindowId, kind: GrabKind, grabbed: bool) -> VideoResult<()> {
        let window = self
            .windows
            .get_mut(&id)
            .ok_or(VideoError::InvalidWindow { id: id.raw() })?;
        window.flags.set(kind.flag(), grabbed);
        Ok(())
    }

    fn flash(&mut self, _id: WindowId, _operation: FlashOperation) -> VideoResult<()> {
        if self.capabilities.contains(PlatformCapabilities::FLASH) {
            Ok(())
        } else {
            Err(VideoError::UnsupportedOperation {
                operation: "flash_window",
            })
        }
    }

    fn set_screen_saver_enabled(&mut self, enabled: bool) -> VideoResult<()> {
        self.screen_saver_enabled = enabled;
        Ok(())
    }
}
