//! The video subsystem: window arena, request routing and notification
//! processing on top of a [`Platform`].

use std::collections::VecDeque;

use casement_core::alloc::HashMap;
use casement_core::geometry::{Point, Rect, Size};
use casement_core::profiling::profile_function;
use casement_core::properties::PropertyGroup;
use tracing::{debug, info, trace, warn};

use crate::config::VideoConfig;
use crate::display::{DisplayChange, DisplayId, DisplayMode, DisplayRegistry};
use crate::error::{VideoError, VideoResult};
use crate::grab::{GrabKind, GrabRegistry};
use crate::notification::{Notification, NotificationBatch, NotificationQueue, NotificationStats};
use crate::pixel_format::PixelFormat;
use crate::platform::{FlashOperation, HeadlessPlatform, NativeWindowSpec, Platform, PlatformCapabilities, PlatformEvent};
use crate::state::{self, FullscreenTarget, Request, RequestOutcome, RequestTicket, Resolution, WindowState};
use crate::window::{Window, WindowConfig, WindowFlags, WindowId, WindowPosition};

/// Owns every window and the cached display list.
///
/// Confined to the thread that created it. State-changing calls return a
/// [`RequestOutcome`]; committed state moves when [`pump_events`] or
/// [`sync_window`] process the platform's answers.
///
/// [`pump_events`]: VideoSubsystem::pump_events
/// [`sync_window`]: VideoSubsystem::sync_window
pub struct VideoSubsystem<P: Platform> {
    platform: P,
    config: VideoConfig,
    registry: DisplayRegistry,
    windows: HashMap<WindowId, Window>,
    /// Live windows in creation order.
    order: Vec<WindowId>,
    next_window_id: u32,
    next_ticket: u64,
    grabs: GrabRegistry,
    notifications: NotificationQueue,
    screen_saver_enabled: bool,
}

impl VideoSubsystem<HeadlessPlatform> {
    /// Subsystem on the offscreen platform with one 1920x1080 display.
    pub fn headless() -> VideoResult<Self> {
        Self::new(HeadlessPlatform::new(), VideoConfig::default())
    }
}

impl<P: Platform> VideoSubsystem<P> {
    pub fn new(platform: P, config: VideoConfig) -> VideoResult<Self> {
        let mut video = Self {
            platform,
            config,
            registry: DisplayRegistry::new(),
            windows: HashMap::default(),
            order: Vec::new(),
            next_window_id: 1,
            next_ticket: 1,
            grabs: GrabRegistry::new(),
            notifications: NotificationQueue::new(),
            screen_saver_enabled: true,
        };
        video.refresh_displays()?;
        video.set_screen_saver(video.config.allow_screensaver)?;

        info!(
            "Video subsystem initialized on '{}' with {} display(s)",
            video.platform.name(),
            video.registry.len()
        );
        Ok(video)
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn config(&self) -> &VideoConfig {
        &self.config
    }

    pub fn capabilities(&self) -> PlatformCapabilities {
        self.platform.capabilities()
    }

    // ---- displays ----

    pub fn display_registry(&self) -> &DisplayRegistry {
        &self.registry
    }

    /// Connected displays, primary first.
    pub fn displays(&self) -> Vec<DisplayId> {
        self.registry.displays()
    }

    pub fn primary_display(&self) -> Option<DisplayId> {
        self.registry.primary_display()
    }

    pub fn display_name(&self, id: DisplayId) -> VideoResult<&str> {
        self.registry.name(id)
    }

    pub fn display_bounds(&self, id: DisplayId) -> VideoResult<Rect> {
        self.registry.bounds(id)
    }

    pub fn display_usable_bounds(&self, id: DisplayId) -> VideoResult<Rect> {
        self.registry.usable_bounds(id)
    }

    pub fn display_content_scale(&self, id: DisplayId) -> VideoResult<f32> {
        self.registry.content_scale(id)
    }

    pub fn fullscreen_display_modes(&self, id: DisplayId) -> VideoResult<&[DisplayMode]> {
        self.registry.fullscreen_modes(id)
    }

    pub fn desktop_display_mode(&self, id: DisplayId) -> VideoResult<DisplayMode> {
        self.registry.desktop_mode(id)
    }

    pub fn current_display_mode(&self, id: DisplayId) -> VideoResult<DisplayMode> {
        self.registry.current_mode(id)
    }

    pub fn closest_fullscreen_mode(
        &self,
        id: DisplayId,
        width: u32,
        height: u32,
        refresh_rate: f32,
        include_high_density: bool,
    ) -> VideoResult<DisplayMode> {
        self.registry
            .closest_fullscreen_mode(id, width, height, refresh_rate, include_high_density)
    }

    pub fn display_for_point(&self, point: Point<i32>) -> Option<DisplayId> {
        self.registry.display_for_point(point)
    }

    pub fn display_for_rect(&self, rect: Rect) -> Option<DisplayId> {
        self.registry.display_for_rect(rect)
    }

    /// The display a window is on, falling back to the one it overlaps most.
    pub fn display_for_window(&self, id: WindowId) -> VideoResult<DisplayId> {
        let window = self.window(id)?;
        if let Some(display) = window.display.filter(|d| self.registry.is_connected(*d)) {
            return Ok(display);
        }
        self.registry
            .display_for_rect(Rect::from_origin_size(window.position, window.size))
            .ok_or_else(|| VideoError::Platform {
                message: "no display connected".to_string(),
            })
    }

    /// Re-enumerate displays and move windows off disconnected ones.
    pub fn refresh_displays(&mut self) -> VideoResult<Vec<DisplayChange>> {
        profile_function!();
        let displays = self.platform.enumerate_displays()?;
        let changes = self.registry.refresh(displays);

        for change in &changes {
            match *change {
                DisplayChange::Added(id) => info!("Display {} connected", id),
                DisplayChange::Removed(id) => {
                    info!("Display {} disconnected", id);
                    self.evacuate_display(id);
                }
                DisplayChange::Changed(id) => debug!("Display {} reconfigured", id),
            }
        }
        Ok(changes)
    }

    fn evacuate_display(&mut self, removed: DisplayId) {
        let Some(primary) = self.registry.primary_display() else {
            return;
        };
        for id in &self.order {
            let Some(window) = self.windows.get_mut(id) else {
                continue;
            };
            if window.fullscreen_mode.is_some_and(|m| m.display == removed) {
                window.fullscreen_mode = None;
            }
            if window.requested_fullscreen_mode.is_some_and(|m| m.display == removed) {
                window.requested_fullscreen_mode = None;
            }
            if window.display == Some(removed) {
                window.display = Some(primary);
                self.notifications.push(*id, Notification::DisplayChanged(primary));
            }
        }
    }

    // ---- creation and destruction ----

    /// Create a top-level window from a flag set.
    pub fn create_window(&mut self, title: &str, width: u32, height: u32, flags: WindowFlags) -> VideoResult<WindowId> {
        let config = config_from_flags(title, width, height, flags);
        self.create_window_from_config(&config)
    }

    /// Create a tooltip or menu at an offset from `parent`.
    pub fn create_popup_window(
        &mut self,
        parent: WindowId,
        offset_x: i32,
        offset_y: i32,
        width: u32,
        height: u32,
        flags: WindowFlags,
    ) -> VideoResult<WindowId> {
        if !flags.is_popup() {
            return Err(VideoError::InvalidParameter {
                name: "flags",
                reason: "popup windows need TOOLTIP or POPUP_MENU".to_string(),
            });
        }
        let mut config = config_from_flags("", width, height, flags);
        config.parent = Some(parent);
        config.x = WindowPosition::Absolute(offset_x);
        config.y = WindowPosition::Absolute(offset_y);
        self.create_window_from_config(&config)
    }

    pub fn create_window_from_config(&mut self, config: &WindowConfig) -> VideoResult<WindowId> {
        self.create_window_with_properties(&config.to_properties())
    }

    /// Create a window from creation properties (see [`crate::window::config::keys`]).
    ///
    /// The window keeps its own copy of `props`.
    pub fn create_window_with_properties(&mut self, props: &PropertyGroup) -> VideoResult<WindowId> {
        profile_function!();
        let config = WindowConfig::from_properties(props);
        self.validate_config(&config)?;
        let mut flags = flags_from_config(&config);

        let mut parent_hidden = false;
        let mut parent_display = None;
        let mut parent_size = None;
        if let Some(parent_id) = config.parent {
            let parent = self.window(parent_id)?;
            if parent.is_popup() && !flags.is_popup() {
                return Err(VideoError::InvalidParameter {
                    name: "parent",
                    reason: "a popup window cannot parent a top-level window".to_string(),
                });
            }
            parent_hidden = parent.is_hidden();
            parent_display = parent.display;
            parent_size = Some(parent.size);
        }

        let explicit_display = config.x.display().or(config.y.display());
        if let Some(display) = explicit_display {
            self.registry.display(display)?;
        }
        let display = explicit_display
            .or(parent_display)
            .or(self.registry.primary_display());

        let title = if config.title.is_empty() {
            self.config.default_title.clone()
        } else {
            config.title.clone()
        };
        let default_size = self.config.default_window_size;
        let size = Size::new(
            if config.width == 0 { default_size.width } else { config.width },
            if config.height == 0 { default_size.height } else { config.height },
        );

        let area = match parent_size {
            Some(parent_size) if flags.is_popup() => Rect::from_origin_size(Point::new(0, 0), parent_size),
            _ => match display {
                Some(display) => self.registry.bounds(display)?,
                None => Rect::from_origin_size(Point::new(0, 0), size),
            },
        };
        let position = resolve_position(config.x, config.y, size, area);

        if parent_hidden {
            flags.insert(WindowFlags::HIDDEN);
        }

        self.windows
            .try_reserve(1)
            .map_err(|_| VideoError::AllocationFailure { what: "window" })?;
        let id = self.allocate_window_id()?;

        let spec = NativeWindowSpec {
            title: title.clone(),
            position,
            size,
            flags,
            parent: config.parent,
            display,
            foreign: config.foreign,
        };
        let snapshot = self.platform.create_window(id, &spec)?;

        let mut window = Window::new(id, title, snapshot.flags, snapshot.position, snapshot.size);
        window.pixel_size = snapshot.pixel_size;
        window.floating = Rect::from_origin_size(position, size);
        window.display = snapshot.display.or(display);
        window.parent = config.parent;
        window.hidden_explicit = config.hidden;
        window.hidden_inherited = parent_hidden;
        window.properties.try_reserve(props.len() + snapshot.properties.len())?;
        props.copy_into(&mut window.properties);
        snapshot.properties.copy_into(&mut window.properties);

        if let Some(parent) = config.parent.and_then(|p| self.windows.get_mut(&p)) {
            parent.children.push(id);
        }

        info!(
            "Created window {} '{}' ({}x{}, {:?})",
            id,
            window.title,
            window.size.width,
            window.size.height,
            window.state()
        );
        self.windows.insert(id, window);
        self.order.push(id);
        Ok(id)
    }

    fn validate_config(&self, config: &WindowConfig) -> VideoResult<()> {
        if config.tooltip && config.menu {
            return Err(VideoError::InvalidParameter {
                name: "flags",
                reason: "a window cannot be both a tooltip and a menu".to_string(),
            });
        }
        if config.is_popup() && config.parent.is_none() {
            let role = if config.tooltip { "tooltip" } else { "menu" };
            return Err(VideoError::MissingParent { role });
        }
        if config.modal && config.parent.is_none() {
            return Err(VideoError::MissingParent { role: "modal" });
        }

        let apis = [config.opengl, config.vulkan, config.metal];
        if apis.iter().filter(|requested| **requested).count() > 1 {
            return Err(VideoError::InvalidParameter {
                name: "flags",
                reason: "only one graphics API may be requested".to_string(),
            });
        }

        let capabilities = self.platform.capabilities();
        let required = [
            (config.opengl, PlatformCapabilities::OPENGL, "opengl"),
            (config.vulkan, PlatformCapabilities::VULKAN, "vulkan"),
            (config.metal, PlatformCapabilities::METAL, "metal"),
            (config.transparent, PlatformCapabilities::TRANSPARENT, "transparent"),
            (config.modal, PlatformCapabilities::MODAL, "modal"),
            (config.foreign.is_some(), PlatformCapabilities::FOREIGN_WINDOWS, "foreign window"),
        ];
        for (requested, capability, operation) in required {
            if requested && !capabilities.contains(capability) {
                return Err(VideoError::UnsupportedOperation { operation });
            }
        }
        Ok(())
    }

    fn allocate_window_id(&mut self) -> VideoResult<WindowId> {
        let id = WindowId::from_raw(self.next_window_id).ok_or(VideoError::AllocationFailure { what: "window id" })?;
        // Wraps to the reserved 0, after which allocation keeps failing.
        self.next_window_id = self.next_window_id.wrapping_add(1);
        Ok(id)
    }

    /// Destroy a window and, children first, all of its descendants.
    pub fn destroy_window(&mut self, id: WindowId) -> VideoResult<()> {
        self.window(id)?;
        for window_id in self.descendants(id).into_iter().rev() {
            self.destroy_single(window_id);
        }
        self.destroy_single(id);
        Ok(())
    }

    fn destroy_single(&mut self, id: WindowId) {
        let Some(window) = self.windows.remove(&id) else {
            return;
        };
        self.grabs.release_all(id);
        self.platform.destroy_window(id);

        if let Some(parent) = window.parent.and_then(|p| self.windows.get_mut(&p)) {
            parent.children.retain(|child| *child != id);
        }
        self.order.retain(|w| *w != id);
        self.notifications.push(id, Notification::Destroyed);
        info!("Destroyed window {}", id);
    }

    /// Descendants of `root` in breadth-first order, `root` excluded.
    fn descendants(&self, root: WindowId) -> Vec<WindowId> {
        let mut found = Vec::new();
        let mut queue: VecDeque<WindowId> = self
            .windows
            .get(&root)
            .map(|w| w.children.iter().copied().collect())
            .unwrap_or_default();
        while let Some(id) = queue.pop_front() {
            if let Some(window) = self.windows.get(&id) {
                queue.extend(window.children.iter().copied());
            }
            found.push(id);
        }
        found
    }

    fn is_descendant(&self, candidate: WindowId, ancestor: WindowId) -> bool {
        let mut current = self.windows.get(&candidate).and_then(|w| w.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.windows.get(&id).and_then(|w| w.parent);
        }
        false
    }

    // ---- window queries ----

    pub fn window(&self, id: WindowId) -> VideoResult<&Window> {
        self.windows.get(&id).ok_or(VideoError::InvalidWindow { id: id.raw() })
    }

    fn window_mut(&mut self, id: WindowId) -> VideoResult<&mut Window> {
        self.windows.get_mut(&id).ok_or(VideoError::InvalidWindow { id: id.raw() })
    }

    /// Live windows in creation order.
    pub fn windows(&self) -> &[WindowId] {
        &self.order
    }

    /// Look up a live window by its raw id.
    pub fn window_from_raw_id(&self, raw: u32) -> Option<WindowId> {
        WindowId::from_raw(raw).filter(|id| self.windows.contains_key(id))
    }

    pub fn window_flags(&self, id: WindowId) -> VideoResult<WindowFlags> {
        Ok(self.window(id)?.flags)
    }

    pub fn window_state(&self, id: WindowId) -> VideoResult<WindowState> {
        Ok(self.window(id)?.state())
    }

    pub fn window_title(&self, id: WindowId) -> VideoResult<&str> {
        Ok(self.window(id)?.title())
    }

    pub fn window_position(&self, id: WindowId) -> VideoResult<Point<i32>> {
        Ok(self.window(id)?.position)
    }

    pub fn window_size(&self, id: WindowId) -> VideoResult<Size<u32>> {
        Ok(self.window(id)?.size)
    }

    pub fn window_size_in_pixels(&self, id: WindowId) -> VideoResult<Size<u32>> {
        Ok(self.window(id)?.pixel_size)
    }

    pub fn window_pixel_density(&self, id: WindowId) -> VideoResult<f32> {
        Ok(self.window(id)?.pixel_density())
    }

    /// Content scale of the window's display.
    pub fn window_display_scale(&self, id: WindowId) -> VideoResult<f32> {
        self.registry.content_scale(self.display_for_window(id)?)
    }

    /// Pixel format of the display mode the window is shown on.
    pub fn window_pixel_format(&self, id: WindowId) -> VideoResult<PixelFormat> {
        let display = self.display_for_window(id)?;
        Ok(self.registry.current_mode(display)?.format)
    }

    pub fn window_parent(&self, id: WindowId) -> VideoResult<Option<WindowId>> {
        Ok(self.window(id)?.parent)
    }

    pub fn window_children(&self, id: WindowId) -> VideoResult<&[WindowId]> {
        Ok(self.window(id)?.children())
    }

    pub fn window_opacity(&self, id: WindowId) -> VideoResult<f32> {
        Ok(self.window(id)?.opacity)
    }

    pub fn window_minimum_size(&self, id: WindowId) -> VideoResult<Size<u32>> {
        Ok(self.window(id)?.min_size)
    }

    pub fn window_maximum_size(&self, id: WindowId) -> VideoResult<Size<u32>> {
        Ok(self.window(id)?.max_size)
    }

    /// Mode used by [`set_fullscreen`](Self::set_fullscreen); `None` means
    /// desktop fullscreen.
    pub fn window_fullscreen_mode(&self, id: WindowId) -> VideoResult<Option<DisplayMode>> {
        Ok(self.window(id)?.requested_fullscreen_mode)
    }

    pub fn window_properties(&self, id: WindowId) -> VideoResult<&PropertyGroup> {
        Ok(&self.window(id)?.properties)
    }

    pub fn window_properties_mut(&mut self, id: WindowId) -> VideoResult<&mut PropertyGroup> {
        Ok(&mut self.window_mut(id)?.properties)
    }

    // ---- requests ----

    fn submit(&mut self, id: WindowId, request: Request) -> VideoResult<RequestOutcome> {
        let ticket = RequestTicket(self.next_ticket);
        self.platform.submit(id, ticket, &request)?;
        self.next_ticket += 1;
        self.window_mut(id)?.pending.push(ticket, request);
        debug!("Submitted {} for window {} (ticket {})", request.name(), id, ticket.raw());
        Ok(RequestOutcome::Submitted(ticket))
    }

    /// Submit a request issued by the subsystem itself rather than the caller.
    fn send(&mut self, id: WindowId, request: Request) -> VideoResult<()> {
        self.submit(id, request).map(|_| ())
    }

    /// Route a request through the policy gate, the hidden-window deferral
    /// and the no-op check before submitting it.
    fn request(&mut self, id: WindowId, request: Request) -> VideoResult<RequestOutcome> {
        let window = self.window_mut(id)?;
        if let Some(reason) = state::check_request(window, &request) {
            debug!("Denied {} for window {}: {:?}", request.name(), id, reason);
            return Ok(RequestOutcome::Denied(reason));
        }

        if window.is_hidden() {
            let deferred = &mut window.deferred;
            let recorded = match request {
                Request::Minimize | Request::Maximize | Request::Restore => {
                    deferred.size_state = Some(request);
                    true
                }
                Request::SetFullscreen(target) => {
                    deferred.fullscreen = Some(target.is_some());
                    true
                }
                _ => false,
            };
            if recorded {
                debug!("Deferred {} for hidden window {}", request.name(), id);
                return Ok(RequestOutcome::Deferred);
            }
        }

        if state::is_unchanged(window, &request) {
            return Ok(RequestOutcome::Unchanged);
        }
        self.submit(id, request)
    }

    /// Submit state requests recorded while the window was hidden, skipping
    /// those the committed state already satisfies.
    fn flush_deferred(&mut self, id: WindowId) -> VideoResult<()> {
        let deferred = std::mem::take(&mut self.window_mut(id)?.deferred);
        if let Some(fullscreen) = deferred.fullscreen {
            let target = if fullscreen {
                Some(self.fullscreen_target(id)?)
            } else {
                None
            };
            self.send_if_changed(id, Request::SetFullscreen(target))?;
        }
        if let Some(request) = deferred.size_state {
            self.send_if_changed(id, request)?;
        }
        Ok(())
    }

    fn send_if_changed(&mut self, id: WindowId, request: Request) -> VideoResult<()> {
        if state::matches_committed(self.window(id)?, &request) {
            return Ok(());
        }
        self.send(id, request)
    }

    /// Show a window. Children hidden only because of it are shown too.
    pub fn show_window(&mut self, id: WindowId) -> VideoResult<RequestOutcome> {
        let window = self.window_mut(id)?;
        if window.hidden_inherited {
            window.hidden_explicit = false;
            debug!("Deferred show for window {}: an ancestor is hidden", id);
            return Ok(RequestOutcome::Deferred);
        }
        if !window.hidden_explicit && state::is_unchanged(window, &Request::Show) {
            return Ok(RequestOutcome::Unchanged);
        }

        let outcome = self.submit(id, Request::Show)?;
        self.window_mut(id)?.hidden_explicit = false;
        self.flush_deferred(id)?;
        self.propagate_visibility(id, true)?;
        Ok(outcome)
    }

    /// Hide a window and all of its descendants.
    pub fn hide_window(&mut self, id: WindowId) -> VideoResult<RequestOutcome> {
        let window = self.window_mut(id)?;
        if window.is_hidden() {
            window.hidden_explicit = true;
            return Ok(RequestOutcome::Unchanged);
        }

        let outcome = self.submit(id, Request::Hide)?;
        self.window_mut(id)?.hidden_explicit = true;
        self.propagate_visibility(id, false)?;
        Ok(outcome)
    }

    /// Walk the subtree under `root` breadth-first, updating inherited
    /// visibility. Explicitly hidden windows keep their subtree hidden.
    fn propagate_visibility(&mut self, root: WindowId, visible: bool) -> VideoResult<()> {
        let mut queue: VecDeque<WindowId> = self.window(root)?.children.iter().copied().collect();
        while let Some(id) = queue.pop_front() {
            let Some(child) = self.windows.get_mut(&id) else {
                continue;
            };

            if visible {
                let was_inherited = child.hidden_inherited;
                child.hidden_inherited = false;
                if child.hidden_explicit {
                    continue;
                }
                queue.extend(child.children.iter().copied());
                if was_inherited {
                    self.send(id, Request::Show)?;
                    self.flush_deferred(id)?;
                }
            } else {
                let was_visible = !child.is_hidden();
                child.hidden_inherited = true;
                queue.extend(child.children.iter().copied());
                if was_visible {
                    self.send(id, Request::Hide)?;
                }
            }
        }
        Ok(())
    }

    pub fn raise_window(&mut self, id: WindowId) -> VideoResult<RequestOutcome> {
        self.request(id, Request::Raise)
    }

    pub fn minimize_window(&mut self, id: WindowId) -> VideoResult<RequestOutcome> {
        self.request(id, Request::Minimize)
    }

    pub fn maximize_window(&mut self, id: WindowId) -> VideoResult<RequestOutcome> {
        self.request(id, Request::Maximize)
    }

    pub fn restore_window(&mut self, id: WindowId) -> VideoResult<RequestOutcome> {
        self.request(id, Request::Restore)
    }

    /// Enter or leave fullscreen.
    ///
    /// Uses the mode set by [`set_fullscreen_mode`](Self::set_fullscreen_mode),
    /// or desktop fullscreen on the window's display when none is set.
    pub fn set_fullscreen(&mut self, id: WindowId, fullscreen: bool) -> VideoResult<RequestOutcome> {
        if fullscreen && self.window(id)?.is_popup() {
            debug!("Denied fullscreen for popup window {}", id);
            return Ok(RequestOutcome::Denied(state::DenyReason::PopupWindow));
        }
        let target = if fullscreen {
            Some(self.fullscreen_target(id)?)
        } else {
            None
        };
        self.request(id, Request::SetFullscreen(target))
    }

    fn fullscreen_target(&self, id: WindowId) -> VideoResult<FullscreenTarget> {
        match self.window(id)?.requested_fullscreen_mode {
            Some(mode) => {
                if !self.capabilities().contains(PlatformCapabilities::MODE_SWITCHING) {
                    return Err(VideoError::UnsupportedOperation {
                        operation: "exclusive fullscreen",
                    });
                }
                Ok(FullscreenTarget::Exclusive(self.registry.validate_mode(&mode)?))
            }
            None => Ok(FullscreenTarget::Desktop(self.display_for_window(id)?)),
        }
    }

    /// Choose the mode used for fullscreen; `None` selects desktop
    /// fullscreen. Applied right away if the window is already fullscreen,
    /// otherwise on the next [`set_fullscreen`](Self::set_fullscreen).
    pub fn set_fullscreen_mode(&mut self, id: WindowId, mode: Option<DisplayMode>) -> VideoResult<RequestOutcome> {
        self.window(id)?;
        let mode = mode.map(|m| self.registry.validate_mode(&m)).transpose()?;
        let window = self.window_mut(id)?;
        window.requested_fullscreen_mode = mode;
        let fullscreen = window.flags.contains(WindowFlags::FULLSCREEN);

        if window.is_hidden() {
            // Re-enter with the new mode on show unless leaving was requested.
            if window.deferred.fullscreen.unwrap_or(fullscreen) {
                window.deferred.fullscreen = Some(true);
                debug!("Deferred fullscreen mode change for hidden window {}", id);
                return Ok(RequestOutcome::Deferred);
            }
            return Ok(RequestOutcome::Unchanged);
        }
        if fullscreen {
            self.set_fullscreen(id, true)
        } else {
            Ok(RequestOutcome::Unchanged)
        }
    }

    /// Negotiate the closest mode on the window's display and go exclusive
    /// fullscreen with it.
    pub fn request_exclusive_fullscreen(
        &mut self,
        id: WindowId,
        width: u32,
        height: u32,
        refresh_rate: f32,
        include_high_density: bool,
    ) -> VideoResult<RequestOutcome> {
        let display_id = self.display_for_window(id)?;
        let mode = self
            .registry
            .closest_fullscreen_mode(display_id, width, height, refresh_rate, include_high_density)?;
        debug!(
            "Negotiated {}x{}@{} for window {} on display {}",
            mode.width, mode.height, mode.refresh_rate, id, display_id
        );
        self.window_mut(id)?.requested_fullscreen_mode = Some(mode);
        self.set_fullscreen(id, true)
    }

    /// Move a window. Popup positions are offsets from the parent.
    pub fn set_window_position(&mut self, id: WindowId, x: WindowPosition, y: WindowPosition) -> VideoResult<RequestOutcome> {
        let window = self.window(id)?;
        let area = match window.parent.and_then(|p| self.windows.get(&p)) {
            Some(parent) if window.is_popup() => Rect::from_origin_size(Point::new(0, 0), parent.size),
            _ => {
                let display = match x.display().or(y.display()) {
                    Some(display) => display,
                    None => self.display_for_window(id)?,
                };
                self.registry.bounds(display)?
            }
        };
        let position = resolve_position(x, y, window.size, area);
        self.request(id, Request::SetPosition(position))
    }

    /// Resize the client area, clamped to the window's size limits.
    pub fn set_window_size(&mut self, id: WindowId, width: u32, height: u32) -> VideoResult<RequestOutcome> {
        if width == 0 || height == 0 {
            return Err(VideoError::InvalidParameter {
                name: "size",
                reason: format!("{}x{} has a zero dimension", width, height),
            });
        }
        let size = self.window(id)?.clamp_size(Size::new(width, height));
        self.request(id, Request::SetSize(size))
    }

    pub fn set_window_bordered(&mut self, id: WindowId, bordered: bool) -> VideoResult<RequestOutcome> {
        self.request(id, Request::SetBordered(bordered))
    }

    pub fn set_window_resizable(&mut self, id: WindowId, resizable: bool) -> VideoResult<RequestOutcome> {
        self.request(id, Request::SetResizable(resizable))
    }

    pub fn set_window_always_on_top(&mut self, id: WindowId, on_top: bool) -> VideoResult<RequestOutcome> {
        self.request(id, Request::SetAlwaysOnTop(on_top))
    }

    pub fn set_window_focusable(&mut self, id: WindowId, focusable: bool) -> VideoResult<RequestOutcome> {
        self.request(id, Request::SetFocusable(focusable))
    }

    // ---- immediate attributes ----

    pub fn set_window_title(&mut self, id: WindowId, title: &str) -> VideoResult<()> {
        self.window(id)?;
        self.platform.set_title(id, title)?;
        self.window_mut(id)?.title = title.to_string();
        Ok(())
    }

    /// Opacity in `0.0..=1.0`; out-of-range values are clamped.
    pub fn set_window_opacity(&mut self, id: WindowId, opacity: f32) -> VideoResult<()> {
        self.window(id)?;
        if opacity.is_nan() {
            return Err(VideoError::InvalidParameter {
                name: "opacity",
                reason: "opacity is NaN".to_string(),
            });
        }
        if !self.capabilities().contains(PlatformCapabilities::OPACITY) {
            return Err(VideoError::UnsupportedOperation {
                operation: "set_window_opacity",
            });
        }
        let opacity = opacity.clamp(0.0, 1.0);
        self.platform.set_opacity(id, opacity)?;
        self.window_mut(id)?.opacity = opacity;
        Ok(())
    }

    /// Zero components remove the limit on that axis.
    pub fn set_window_minimum_size(&mut self, id: WindowId, width: u32, height: u32) -> VideoResult<()> {
        let max = self.window(id)?.max_size;
        let min = Size::new(width, height);
        check_size_limits(min, max)?;
        self.apply_size_limits(id, min, max)
    }

    /// Zero components remove the limit on that axis.
    pub fn set_window_maximum_size(&mut self, id: WindowId, width: u32, height: u32) -> VideoResult<()> {
        let min = self.window(id)?.min_size;
        let max = Size::new(width, height);
        check_size_limits(min, max)?;
        self.apply_size_limits(id, min, max)
    }

    fn apply_size_limits(&mut self, id: WindowId, min: Size<u32>, max: Size<u32>) -> VideoResult<()> {
        self.platform.set_size_limits(id, min, max)?;
        let window = self.window_mut(id)?;
        window.min_size = min;
        window.max_size = max;

        let clamped = window.clamp_size(window.size);
        if clamped != window.size && window.state() == WindowState::Normal {
            let _ = self.request(id, Request::SetSize(clamped))?;
        }
        Ok(())
    }

    /// Make a window modal to its parent, or release it.
    pub fn set_window_modal(&mut self, id: WindowId, modal: bool) -> VideoResult<RequestOutcome> {
        let window = self.window(id)?;
        if modal {
            if window.is_popup() {
                return Ok(RequestOutcome::Denied(state::DenyReason::PopupWindow));
            }
            if window.parent.is_none() {
                return Err(VideoError::MissingParent { role: "modal" });
            }
        }
        if window.flags.contains(WindowFlags::MODAL) == modal {
            return Ok(RequestOutcome::Unchanged);
        }

        self.platform.set_modal(id, modal)?;
        self.window_mut(id)?.flags.set(WindowFlags::MODAL, modal);
        debug!("Window {} modal: {}", id, modal);
        Ok(RequestOutcome::Applied)
    }

    /// Attach a window to a new parent, or detach it with `None`.
    pub fn set_window_parent(&mut self, id: WindowId, parent: Option<WindowId>) -> VideoResult<RequestOutcome> {
        let window = self.window(id)?;
        if window.flags.contains(WindowFlags::MODAL) {
            return Err(VideoError::ModalWindow { window: id });
        }
        if window.parent == parent {
            return Ok(RequestOutcome::Unchanged);
        }
        let is_popup = window.is_popup();
        let old_parent = window.parent;

        match parent {
            None if is_popup => {
                let role = if window.flags.contains(WindowFlags::TOOLTIP) {
                    "tooltip"
                } else {
                    "menu"
                };
                return Err(VideoError::MissingParent { role });
            }
            None => {}
            Some(new_parent) => {
                if new_parent == id || self.is_descendant(new_parent, id) {
                    return Err(VideoError::ParentCycle {
                        window: id,
                        parent: new_parent,
                    });
                }
                if self.window(new_parent)?.is_popup() && !is_popup {
                    debug!("Denied reparenting top-level window {} under popup {}", id, new_parent);
                    return Ok(RequestOutcome::Denied(state::DenyReason::PopupWindow));
                }
            }
        }

        self.platform.set_parent(id, parent)?;
        if let Some(old) = old_parent.and_then(|p| self.windows.get_mut(&p)) {
            old.children.retain(|child| *child != id);
        }
        let mut parent_hidden = false;
        if let Some(new_parent) = parent.and_then(|p| self.windows.get_mut(&p)) {
            new_parent.children.push(id);
            parent_hidden = new_parent.is_hidden();
        }

        let window = self.window_mut(id)?;
        window.parent = parent;
        let was_inherited = window.hidden_inherited;
        window.hidden_inherited = parent_hidden;
        let explicit = window.hidden_explicit;

        if was_inherited != parent_hidden && !explicit {
            if parent_hidden {
                self.send(id, Request::Hide)?;
                self.propagate_visibility(id, false)?;
            } else {
                self.send(id, Request::Show)?;
                self.flush_deferred(id)?;
                self.propagate_visibility(id, true)?;
            }
        }
        Ok(RequestOutcome::Applied)
    }

    pub fn flash_window(&mut self, id: WindowId, operation: FlashOperation) -> VideoResult<RequestOutcome> {
        if self.window(id)?.is_popup() {
            return Ok(RequestOutcome::Denied(state::DenyReason::PopupWindow));
        }
        self.platform.flash(id, operation)?;
        Ok(RequestOutcome::Applied)
    }

    // ---- grabs ----

    pub fn set_window_keyboard_grab(&mut self, id: WindowId, grabbed: bool) -> VideoResult<RequestOutcome> {
        self.set_grab(id, GrabKind::Keyboard, grabbed)
    }

    pub fn set_window_mouse_grab(&mut self, id: WindowId, grabbed: bool) -> VideoResult<RequestOutcome> {
        self.set_grab(id, GrabKind::Mouse, grabbed)
    }

    pub fn window_keyboard_grab(&self, id: WindowId) -> VideoResult<bool> {
        self.window(id)?;
        Ok(self.grabs.holds(GrabKind::Keyboard, id))
    }

    pub fn window_mouse_grab(&self, id: WindowId) -> VideoResult<bool> {
        self.window(id)?;
        Ok(self.grabs.holds(GrabKind::Mouse, id))
    }

    /// Window currently holding the grab of `kind`.
    pub fn grab_holder(&self, kind: GrabKind) -> Option<WindowId> {
        self.grabs.holder(kind)
    }

    fn set_grab(&mut self, id: WindowId, kind: GrabKind, grabbed: bool) -> VideoResult<RequestOutcome> {
        let window = self.window(id)?;
        if grabbed && window.is_popup() {
            debug!("Denied {:?} grab for popup window {}", kind, id);
            return Ok(RequestOutcome::Denied(state::DenyReason::PopupWindow));
        }
        if self.grabs.holds(kind, id) == grabbed {
            return Ok(RequestOutcome::Unchanged);
        }

        if grabbed {
            let previous = self.grabs.holder(kind);
            self.platform.set_grab(id, kind, true)?;
            if let Some(previous) = previous {
                if let Err(err) = self.platform.set_grab(previous, kind, false) {
                    // Leave the platform with the holder the registry still names.
                    if let Err(rollback) = self.platform.set_grab(id, kind, false) {
                        warn!("Failed to roll back {:?} grab on window {}: {}", kind, id, rollback);
                    }
                    return Err(err);
                }
            }
            if let Some(previous) = self.grabs.grant(kind, id) {
                if let Some(previous) = self.windows.get_mut(&previous) {
                    previous.flags.remove(kind.flag());
                }
            }
            self.window_mut(id)?.flags.insert(kind.flag());
        } else {
            self.platform.set_grab(id, kind, false)?;
            self.grabs.release(kind, id);
            self.window_mut(id)?.flags.remove(kind.flag());
        }
        Ok(RequestOutcome::Applied)
    }

    // ---- event processing ----

    /// Process everything the platform reported since the last call.
    /// Returns the number of platform events handled.
    pub fn pump_events(&mut self) -> VideoResult<usize> {
        profile_function!();
        let events = self.platform.pump();
        let count = events.len();
        for event in events {
            self.handle_platform_event(event)?;
        }
        Ok(count)
    }

    /// Wait, bounded by [`VideoConfig::sync_timeout`], until every request
    /// of `id` is resolved.
    ///
    /// Returns `false` on timeout; the outstanding requests are then dropped.
    pub fn sync_window(&mut self, id: WindowId) -> VideoResult<bool> {
        if self.window(id)?.pending.is_empty() {
            return Ok(true);
        }
        let events = self.platform.sync(id, self.config.sync_timeout);
        for event in events {
            self.handle_platform_event(event)?;
        }

        let timeout = self.config.sync_timeout;
        let Some(window) = self.windows.get_mut(&id) else {
            return Ok(true);
        };
        if window.pending.is_empty() {
            return Ok(true);
        }
        warn!(
            "Timed out after {:?} waiting for {} request(s) on window {}",
            timeout,
            window.pending.len(),
            id
        );
        window.pending.clear();
        Ok(false)
    }

    pub fn handle_platform_event(&mut self, event: PlatformEvent) -> VideoResult<()> {
        match event {
            PlatformEvent::Notification(n) => self.handle_notification(n.window, n.notification),
            PlatformEvent::Resolved {
                window,
                ticket,
                resolution,
            } => {
                let Some(target) = self.windows.get_mut(&window) else {
                    trace!("Resolution for destroyed window {}", window);
                    return Ok(());
                };
                match (target.pending.resolve(ticket), resolution) {
                    (Some(request), Resolution::Accepted) => state::commit_accepted(target, &request),
                    (Some(request), Resolution::Denied) => {
                        debug!("Platform denied {} for window {}", request.name(), window)
                    }
                    (None, _) => trace!("Resolution for unknown ticket {} on window {}", ticket.raw(), window),
                }
            }
            PlatformEvent::DisplaysChanged => {
                self.refresh_displays()?;
            }
        }
        Ok(())
    }

    /// Commit a notification and queue it for observers if it changed
    /// anything.
    pub fn handle_notification(&mut self, id: WindowId, notification: Notification) {
        profile_function!();
        let Some(window) = self.windows.get_mut(&id) else {
            trace!("Dropping {:?} for unknown window {}", notification, id);
            return;
        };
        trace!("Window {}: {:?}", id, notification);

        if state::commit(window, &notification) || notification.always_delivered() {
            self.notifications.push(id, notification);
        } else {
            self.notifications.record_redundant();
        }
    }

    /// Take the notifications committed so far.
    pub fn poll_notifications(&mut self) -> NotificationBatch {
        self.notifications.drain()
    }

    pub fn notification_stats(&self) -> &NotificationStats {
        self.notifications.stats()
    }

    // ---- screen saver ----

    pub fn screen_saver_enabled(&self) -> bool {
        self.screen_saver_enabled
    }

    pub fn enable_screen_saver(&mut self) -> VideoResult<()> {
        self.set_screen_saver(true)
    }

    pub fn disable_screen_saver(&mut self) -> VideoResult<()> {
        self.set_screen_saver(false)
    }

    fn set_screen_saver(&mut self, enabled: bool) -> VideoResult<()> {
        if self.screen_saver_enabled == enabled {
            return Ok(());
        }
        self.platform.set_screen_saver_enabled(enabled)?;
        self.screen_saver_enabled = enabled;
        debug!("Screen saver enabled: {}", enabled);
        Ok(())
    }
}

impl<P: Platform> Drop for VideoSubsystem<P> {
    fn drop(&mut self) {
        let roots: Vec<WindowId> = self
            .order
            .iter()
            .copied()
            .filter(|id| self.windows.get(id).is_some_and(|w| w.parent.is_none()))
            .collect();
        for id in roots {
            let _ = self.destroy_window(id);
        }
        if !self.screen_saver_enabled {
            let _ = self.platform.set_screen_saver_enabled(true);
        }
        info!("Video subsystem shut down");
    }
}

fn config_from_flags(title: &str, width: u32, height: u32, flags: WindowFlags) -> WindowConfig {
    WindowConfig {
        title: title.to_string(),
        width,
        height,
        fullscreen: flags.contains(WindowFlags::FULLSCREEN),
        hidden: flags.contains(WindowFlags::HIDDEN),
        maximized: flags.contains(WindowFlags::MAXIMIZED),
        minimized: flags.contains(WindowFlags::MINIMIZED),
        borderless: flags.contains(WindowFlags::BORDERLESS),
        resizable: flags.contains(WindowFlags::RESIZABLE),
        always_on_top: flags.contains(WindowFlags::ALWAYS_ON_TOP),
        transparent: flags.contains(WindowFlags::TRANSPARENT),
        modal: flags.contains(WindowFlags::MODAL),
        tooltip: flags.contains(WindowFlags::TOOLTIP),
        menu: flags.contains(WindowFlags::POPUP_MENU),
        utility: flags.contains(WindowFlags::UTILITY),
        focusable: !flags.contains(WindowFlags::NOT_FOCUSABLE),
        high_pixel_density: flags.contains(WindowFlags::HIGH_PIXEL_DENSITY),
        opengl: flags.contains(WindowFlags::OPENGL),
        vulkan: flags.contains(WindowFlags::VULKAN),
        metal: flags.contains(WindowFlags::METAL),
        ..Default::default()
    }
}

fn flags_from_config(config: &WindowConfig) -> WindowFlags {
    let mut flags = WindowFlags::empty();
    flags.set(WindowFlags::FULLSCREEN, config.fullscreen);
    flags.set(WindowFlags::HIDDEN, config.hidden);
    flags.set(WindowFlags::MAXIMIZED, config.maximized);
    flags.set(WindowFlags::MINIMIZED, config.minimized);
    flags.set(WindowFlags::BORDERLESS, config.borderless);
    flags.set(WindowFlags::RESIZABLE, config.resizable);
    flags.set(WindowFlags::ALWAYS_ON_TOP, config.always_on_top);
    flags.set(WindowFlags::TRANSPARENT, config.transparent);
    flags.set(WindowFlags::MODAL, config.modal);
    flags.set(WindowFlags::TOOLTIP, config.tooltip);
    flags.set(WindowFlags::POPUP_MENU, config.menu);
    flags.set(WindowFlags::UTILITY, config.utility);
    flags.set(WindowFlags::NOT_FOCUSABLE, !config.focusable);
    flags.set(WindowFlags::HIGH_PIXEL_DENSITY, config.high_pixel_density);
    flags.set(WindowFlags::OPENGL, config.opengl);
    flags.set(WindowFlags::VULKAN, config.vulkan);
    flags.set(WindowFlags::METAL, config.metal);
    flags.set(WindowFlags::EXTERNAL, config.foreign.is_some());

    if flags.is_popup() {
        flags.remove(
            WindowFlags::FULLSCREEN
                | WindowFlags::MAXIMIZED
                | WindowFlags::MINIMIZED
                | WindowFlags::RESIZABLE
                | WindowFlags::MODAL,
        );
        flags.insert(WindowFlags::BORDERLESS);
        if flags.contains(WindowFlags::TOOLTIP) {
            flags.insert(WindowFlags::NOT_FOCUSABLE | WindowFlags::ALWAYS_ON_TOP);
        }
    }
    flags
}

fn resolve_position(x: WindowPosition, y: WindowPosition, size: Size<u32>, area: Rect) -> Point<i32> {
    let centered = area.centered(size);
    let axis = |position: WindowPosition, center: i32| match position {
        WindowPosition::Absolute(value) => value,
        WindowPosition::Centered(_) | WindowPosition::Undefined(_) => center,
    };
    Point::new(axis(x, centered.x), axis(y, centered.y))
}

fn check_size_limits(min: Size<u32>, max: Size<u32>) -> VideoResult<()> {
    let too_wide = max.width > 0 && min.width > max.width;
    let too_tall = max.height > 0 && min.height > max.height;
    if too_wide || too_tall {
        return Err(VideoError::InvalidParameter {
            name: "size_limits",
            reason: format!(
                "minimum {}x{} exceeds maximum {}x{}",
                min.width, min.height, max.width, max.height
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{DenyReason, FullscreenKind};

    fn video() -> VideoSubsystem<HeadlessPlatform> {
        VideoSubsystem::headless().unwrap()
    }

    fn settle(video: &mut VideoSubsystem<HeadlessPlatform>) {
        video.pump_events().unwrap();
    }

    #[test]
    fn test_create_window_defaults() {
        let mut video = video();
        let id = video.create_window("", 0, 0, WindowFlags::empty()).unwrap();

        assert_eq!(video.window_title(id).unwrap(), "Casement Window");
        assert_eq!(video.window_size(id).unwrap(), Size::new(640, 480));
        // Centered on the primary display.
        assert_eq!(video.window_position(id).unwrap(), Point::new(640, 300));
        assert_eq!(video.window_state(id).unwrap(), WindowState::Normal);
        assert_eq!(video.display_for_window(id).unwrap(), video.primary_display().unwrap());
        assert_eq!(video.window_pixel_format(id).unwrap(), PixelFormat::Xrgb8888);
    }

    #[test]
    fn test_window_ids_never_reused() {
        let mut video = video();
        let first = video.create_window("a", 100, 100, WindowFlags::empty()).unwrap();
        video.destroy_window(first).unwrap();
        let second = video.create_window("b", 100, 100, WindowFlags::empty()).unwrap();

        assert_ne!(first, second);
        assert!(video.window_from_raw_id(first.raw()).is_none());
        assert_eq!(video.window_from_raw_id(second.raw()), Some(second));
        assert!(video.window_from_raw_id(0).is_none());
    }

    #[test]
    fn test_window_keeps_creation_properties() {
        let mut video = video();
        let mut props = WindowConfig::new("Props", 320, 240).to_properties();
        props.set_string("app.tag", "inspector");

        let id = video.create_window_with_properties(&props).unwrap();
        props.clear();
        assert_eq!(video.window_properties(id).unwrap().get_string("app.tag", ""), "inspector");
    }

    #[test]
    fn test_requests_commit_after_pump() {
        let mut video = video();
        let id = video.create_window("w", 800, 600, WindowFlags::RESIZABLE).unwrap();

        let outcome = video.maximize_window(id).unwrap();
        assert!(outcome.is_submitted());
        assert_eq!(video.window_state(id).unwrap(), WindowState::Normal);

        settle(&mut video);
        assert_eq!(video.window_state(id).unwrap(), WindowState::Maximized);
        assert_eq!(video.window(id).unwrap().pending_requests(), 0);
        assert_eq!(video.maximize_window(id).unwrap(), RequestOutcome::Unchanged);

        video.restore_window(id).unwrap();
        settle(&mut video);
        assert_eq!(video.window_size(id).unwrap(), Size::new(800, 600));
    }

    #[test]
    fn test_platform_denial_leaves_state() {
        let mut video = video();
        let id = video.create_window("fixed", 800, 600, WindowFlags::empty()).unwrap();
        assert!(video.maximize_window(id).unwrap().is_submitted());
        assert!(video.sync_window(id).unwrap());
        assert_eq!(video.window_state(id).unwrap(), WindowState::Normal);
    }

    #[test]
    fn test_hidden_window_defers_state_requests() {
        let mut video = video();
        let id = video
            .create_window("later", 800, 600, WindowFlags::HIDDEN | WindowFlags::RESIZABLE)
            .unwrap();

        assert_eq!(video.maximize_window(id).unwrap(), RequestOutcome::Deferred);
        settle(&mut video);
        assert_eq!(video.window_state(id).unwrap(), WindowState::Normal);

        assert!(video.show_window(id).unwrap().is_submitted());
        assert!(video.sync_window(id).unwrap());
        assert_eq!(video.window_state(id).unwrap(), WindowState::Maximized);
        assert!(!video.window_flags(id).unwrap().contains(WindowFlags::HIDDEN));
    }

    #[test]
    fn test_desktop_fullscreen_keeps_display_mode() {
        let mut video = video();
        let id = video.create_window("game", 800, 600, WindowFlags::empty()).unwrap();
        let display = video.primary_display().unwrap();

        video.set_fullscreen(id, true).unwrap();
        assert!(video.sync_window(id).unwrap());
        assert_eq!(
            video.window_state(id).unwrap(),
            WindowState::Fullscreen(FullscreenKind::Desktop)
        );
        assert_eq!(video.window_size(id).unwrap(), Size::new(1920, 1080));
        assert_eq!(
            video.current_display_mode(display).unwrap(),
            video.desktop_display_mode(display).unwrap()
        );

        video.set_fullscreen(id, false).unwrap();
        assert!(video.sync_window(id).unwrap());
        assert_eq!(video.window_size(id).unwrap(), Size::new(800, 600));
    }

    #[test]
    fn test_exclusive_fullscreen_switches_current_mode() {
        let mut video = video();
        let id = video.create_window("game", 800, 600, WindowFlags::empty()).unwrap();
        let display = video.primary_display().unwrap();

        let outcome = video.request_exclusive_fullscreen(id, 1200, 700, 0.0, false).unwrap();
        assert!(outcome.is_submitted());
        assert!(video.sync_window(id).unwrap());

        assert_eq!(
            video.window_state(id).unwrap(),
            WindowState::Fullscreen(FullscreenKind::Exclusive)
        );
        let current = video.current_display_mode(display).unwrap();
        assert_eq!((current.width, current.height), (1280, 720));
        assert_eq!(video.desktop_display_mode(display).unwrap().width, 1920);

        assert_eq!(
            video.set_window_size(id, 640, 480).unwrap(),
            RequestOutcome::Denied(DenyReason::ExclusiveFullscreen)
        );

        video.set_fullscreen(id, false).unwrap();
        assert!(video.sync_window(id).unwrap());
        assert_eq!(
            video.current_display_mode(display).unwrap(),
            video.desktop_display_mode(display).unwrap()
        );
    }

    #[test]
    fn test_sync_timeout_clears_pending() {
        let config = VideoConfig::default().with_sync_timeout(std::time::Duration::from_millis(5));
        let mut video = VideoSubsystem::new(HeadlessPlatform::new(), config).unwrap();
        let id = video.create_window("stuck", 800, 600, WindowFlags::empty()).unwrap();
        video.platform_mut().set_unresponsive(id, true);

        assert!(video.minimize_window(id).unwrap().is_submitted());
        assert!(!video.sync_window(id).unwrap());
        assert_eq!(video.window(id).unwrap().pending_requests(), 0);
        assert_eq!(video.window_state(id).unwrap(), WindowState::Normal);
    }

    #[test]
    fn test_parent_cycle_rejected() {
        let mut video = video();
        let root = video.create_window("root", 400, 400, WindowFlags::empty()).unwrap();
        let child = video.create_window("child", 200, 200, WindowFlags::empty()).unwrap();
        video.set_window_parent(child, Some(root)).unwrap();

        assert_eq!(
            video.set_window_parent(root, Some(child)),
            Err(VideoError::ParentCycle {
                window: root,
                parent: child
            })
        );
        assert_eq!(
            video.set_window_parent(root, Some(root)),
            Err(VideoError::ParentCycle {
                window: root,
                parent: root
            })
        );
    }

    #[test]
    fn test_modal_rules() {
        let mut video = video();
        let root = video.create_window("root", 400, 400, WindowFlags::empty()).unwrap();
        let dialog = video.create_window("dialog", 200, 200, WindowFlags::empty()).unwrap();

        assert_eq!(
            video.set_window_modal(dialog, true),
            Err(VideoError::MissingParent { role: "modal" })
        );
        video.set_window_parent(dialog, Some(root)).unwrap();
        assert_eq!(video.set_window_modal(dialog, true).unwrap(), RequestOutcome::Applied);
        assert_eq!(
            video.set_window_parent(dialog, None),
            Err(VideoError::ModalWindow { window: dialog })
        );

        assert_eq!(video.set_window_modal(dialog, false).unwrap(), RequestOutcome::Applied);
        assert_eq!(video.set_window_parent(dialog, None).unwrap(), RequestOutcome::Applied);
        assert!(video.window_children(root).unwrap().is_empty());
    }

    #[test]
    fn test_size_limits_validated() {
        let mut video = video();
        let id = video.create_window("limits", 800, 600, WindowFlags::RESIZABLE).unwrap();

        video.set_window_maximum_size(id, 1000, 700).unwrap();
        assert!(matches!(
            video.set_window_minimum_size(id, 1200, 100),
            Err(VideoError::InvalidParameter { .. })
        ));
        assert_eq!(video.window_minimum_size(id).unwrap(), Size::new(0, 0));

        video.set_window_minimum_size(id, 900, 0).unwrap();
        settle(&mut video);
        assert_eq!(video.window_size(id).unwrap(), Size::new(900, 600));

        video.set_window_size(id, 5000, 5000).unwrap();
        settle(&mut video);
        assert_eq!(video.window_size(id).unwrap(), Size::new(1000, 700));
    }

    #[test]
    fn test_opacity_requires_capability() {
        let platform = HeadlessPlatform::new().with_capabilities(PlatformCapabilities::empty());
        let mut video = VideoSubsystem::new(platform, VideoConfig::default()).unwrap();
        let id = video.create_window("plain", 100, 100, WindowFlags::empty()).unwrap();

        assert_eq!(
            video.set_window_opacity(id, 0.5),
            Err(VideoError::UnsupportedOperation {
                operation: "set_window_opacity"
            })
        );
        assert_eq!(video.window_opacity(id).unwrap(), 1.0);
    }

    #[test]
    fn test_opacity_clamped() {
        let mut video = video();
        let id = video.create_window("glass", 100, 100, WindowFlags::empty()).unwrap();
        video.set_window_opacity(id, 1.5).unwrap();
        assert_eq!(video.window_opacity(id).unwrap(), 1.0);
        video.set_window_opacity(id, 0.25).unwrap();
        assert_eq!(video.window_opacity(id).unwrap(), 0.25);
    }

    #[test]
    fn test_invalid_window_errors() {
        let mut video = video();
        let ghost = WindowId::from_raw(99).unwrap();
        assert_eq!(video.show_window(ghost), Err(VideoError::InvalidWindow { id: 99 }));
        assert_eq!(video.window_size(ghost), Err(VideoError::InvalidWindow { id: 99 }));
        assert_eq!(video.destroy_window(ghost), Err(VideoError::InvalidWindow { id: 99 }));
    }

    #[test]
    fn test_screen_saver_policy() {
        let mut video = video();
        assert!(!video.screen_saver_enabled());
        assert!(!video.platform().screen_saver_enabled());

        video.enable_screen_saver().unwrap();
        assert!(video.platform().screen_saver_enabled());
    }

    #[test]
    fn test_title_update() {
        let mut video = video();
        let id = video.create_window("before", 100, 100, WindowFlags::empty()).unwrap();
        video.set_window_title(id, "after").unwrap();
        assert_eq!(video.window_title(id).unwrap(), "after");
    }

    #[test]
    fn test_close_request_reaches_observers() {
        let mut video = video();
        let id = video.create_window("closable", 100, 100, WindowFlags::empty()).unwrap();
        video.poll_notifications();

        video.platform_mut().request_close(id);
        settle(&mut video);
        let batch = video.poll_notifications();
        assert!(batch.for_window(id).any(|n| *n == Notification::CloseRequested));
    }
}
