//! Request/commit rules of the window state machine.
//!
//! A state-changing call becomes a [`Request`] handed to the platform. The
//! window's committed state only moves when the platform answers with a
//! [`Notification`] (applied by [`commit`]) or resolves the request as
//! accepted (applied by [`commit_accepted`]).

use casement_core::geometry::{Point, Rect, Size};

use crate::display::{DisplayId, DisplayMode};
use crate::notification::Notification;
use crate::window::{Window, WindowFlags};

/// Identifies one submitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(pub(crate) u64);

impl RequestTicket {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// What fullscreen should look like.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FullscreenTarget {
    /// Borderless window covering the display at its desktop mode.
    Desktop(DisplayId),
    /// Switch the display to this mode.
    Exclusive(DisplayMode),
}

/// A state change submitted to the platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Request {
    Show,
    Hide,
    Raise,
    Minimize,
    Maximize,
    Restore,
    SetPosition(Point<i32>),
    SetSize(Size<u32>),
    /// `None` leaves fullscreen.
    SetFullscreen(Option<FullscreenTarget>),
    SetBordered(bool),
    SetResizable(bool),
    SetAlwaysOnTop(bool),
    SetFocusable(bool),
}

impl Request {
    pub const fn name(&self) -> &'static str {
        match self {
            Request::Show => "show",
            Request::Hide => "hide",
            Request::Raise => "raise",
            Request::Minimize => "minimize",
            Request::Maximize => "maximize",
            Request::Restore => "restore",
            Request::SetPosition(_) => "set_position",
            Request::SetSize(_) => "set_size",
            Request::SetFullscreen(_) => "set_fullscreen",
            Request::SetBordered(_) => "set_bordered",
            Request::SetResizable(_) => "set_resizable",
            Request::SetAlwaysOnTop(_) => "set_always_on_top",
            Request::SetFocusable(_) => "set_focusable",
        }
    }
}

/// Why a request was turned down without asking the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenyReason {
    /// Tooltips and menus cannot change state, grab input or parent
    /// top-level windows.
    PopupWindow,
    /// Geometry and decorations are fixed while a display mode is applied.
    ExclusiveFullscreen,
}

/// Result of a state-changing call.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Sent to the platform; the state commits when it answers.
    Submitted(RequestTicket),
    /// Took effect immediately without a platform round-trip.
    Applied,
    /// Already in the requested state.
    Unchanged,
    /// Recorded, applied once the window is visible.
    Deferred,
    /// Rejected by policy, state untouched.
    Denied(DenyReason),
}

impl RequestOutcome {
    pub fn ticket(&self) -> Option<RequestTicket> {
        match self {
            RequestOutcome::Submitted(ticket) => Some(*ticket),
            _ => None,
        }
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self, RequestOutcome::Submitted(_))
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, RequestOutcome::Denied(_))
    }
}

/// How the platform answered a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Accepted,
    Denied,
}

/// Requests awaiting a resolution, in submission order.
#[derive(Debug, Default)]
pub struct PendingRequests {
    entries: Vec<(RequestTicket, Request)>,
}

impl PendingRequests {
    pub fn push(&mut self, ticket: RequestTicket, request: Request) {
        self.entries.push((ticket, request));
    }

    /// Remove and return the request for `ticket`.
    pub fn resolve(&mut self, ticket: RequestTicket) -> Option<Request> {
        let index = self.entries.iter().position(|(t, _)| *t == ticket)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains(&self, ticket: RequestTicket) -> bool {
        self.entries.iter().any(|(t, _)| *t == ticket)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(RequestTicket, Request)> {
        self.entries.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FullscreenKind {
    Desktop,
    Exclusive,
}

/// Primary window state derived from committed flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowState {
    Normal,
    Minimized,
    Maximized,
    Fullscreen(FullscreenKind),
}

/// Policy gate run before anything reaches the platform.
pub fn check_request(window: &Window, request: &Request) -> Option<DenyReason> {
    let popup_restricted = matches!(
        request,
        Request::Minimize | Request::Maximize | Request::Raise | Request::SetFullscreen(Some(_))
    );
    if window.is_popup() && popup_restricted {
        return Some(DenyReason::PopupWindow);
    }

    let geometry = matches!(
        request,
        Request::SetPosition(_) | Request::SetSize(_) | Request::SetBordered(_) | Request::SetResizable(_)
    );
    if geometry && window.is_exclusive_fullscreen() {
        return Some(DenyReason::ExclusiveFullscreen);
    }

    None
}

/// Whether the committed state already matches `request`.
///
/// Only meaningful with nothing pending; an in-flight request may be about to
/// move the state away.
pub fn is_unchanged(window: &Window, request: &Request) -> bool {
    window.pending.is_empty() && matches_committed(window, request)
}

/// Whether the committed state is the one `request` asks for, regardless of
/// what is still in flight.
pub fn matches_committed(window: &Window, request: &Request) -> bool {
    let flags = window.flags;
    match request {
        Request::Show => !flags.contains(WindowFlags::HIDDEN),
        Request::Hide => flags.contains(WindowFlags::HIDDEN),
        Request::Raise => false,
        Request::Minimize => flags.contains(WindowFlags::MINIMIZED),
        Request::Maximize => {
            flags.contains(WindowFlags::MAXIMIZED) && !flags.contains(WindowFlags::MINIMIZED)
        }
        Request::Restore => !flags.intersects(WindowFlags::MINIMIZED | WindowFlags::MAXIMIZED),
        Request::SetPosition(position) => window.position == *position,
        Request::SetSize(size) => window.size == *size,
        Request::SetFullscreen(None) => !flags.contains(WindowFlags::FULLSCREEN),
        Request::SetFullscreen(Some(FullscreenTarget::Desktop(_))) => {
            flags.contains(WindowFlags::FULLSCREEN) && window.fullscreen_mode.is_none()
        }
        Request::SetFullscreen(Some(FullscreenTarget::Exclusive(mode))) => {
            flags.contains(WindowFlags::FULLSCREEN)
                && window.fullscreen_mode.is_some_and(|current| current.same_mode(mode))
        }
        Request::SetBordered(bordered) => flags.contains(WindowFlags::BORDERLESS) != *bordered,
        Request::SetResizable(resizable) => flags.contains(WindowFlags::RESIZABLE) == *resizable,
        Request::SetAlwaysOnTop(on_top) => flags.contains(WindowFlags::ALWAYS_ON_TOP) == *on_top,
        Request::SetFocusable(focusable) => flags.contains(WindowFlags::NOT_FOCUSABLE) != *focusable,
    }
}

/// Apply a platform notification to the committed state.
///
/// Returns `false` when the window was already in the reported state.
pub fn commit(window: &mut Window, notification: &Notification) -> bool {
    let before = window.flags;
    match *notification {
        Notification::Shown => window.flags.remove(WindowFlags::HIDDEN),
        Notification::Hidden => {
            window.flags.insert(WindowFlags::HIDDEN);
        }
        Notification::Moved(position) => {
            if window.position == position {
                return false;
            }
            window.position = position;
            if window.state() == WindowState::Normal {
                window.floating.x = position.x;
                window.floating.y = position.y;
            }
            return true;
        }
        Notification::Resized(size) => {
            if window.size == size {
                return false;
            }
            window.size = size;
            if window.state() == WindowState::Normal {
                window.floating = Rect::from_origin_size(window.floating.origin(), size);
            }
            return true;
        }
        Notification::PixelSizeChanged(size) => {
            if window.pixel_size == size {
                return false;
            }
            window.pixel_size = size;
            return true;
        }
        Notification::Minimized => {
            window.flags.remove(WindowFlags::MAXIMIZED);
            window.flags.insert(WindowFlags::MINIMIZED);
        }
        Notification::Maximized => {
            window.flags.remove(WindowFlags::MINIMIZED);
            window.flags.insert(WindowFlags::MAXIMIZED);
        }
        Notification::Restored => window.flags.remove(WindowFlags::MINIMIZED | WindowFlags::MAXIMIZED),
        Notification::EnteredFullscreen => window.flags.insert(WindowFlags::FULLSCREEN),
        Notification::LeftFullscreen => {
            window.flags.remove(WindowFlags::FULLSCREEN);
            window.fullscreen_mode = None;
        }
        Notification::FocusGained => window.flags.insert(WindowFlags::INPUT_FOCUS),
        Notification::FocusLost => window.flags.remove(WindowFlags::INPUT_FOCUS),
        Notification::DisplayChanged(display) => {
            if window.display == Some(display) {
                return false;
            }
            window.display = Some(display);
            return true;
        }
        Notification::CloseRequested | Notification::Destroyed => return true,
    }
    window.flags != before
}

/// Apply an accepted request whose effect has no notification of its own.
pub fn commit_accepted(window: &mut Window, request: &Request) {
    match *request {
        Request::SetBordered(bordered) => window.flags.set(WindowFlags::BORDERLESS, !bordered),
        Request::SetResizable(resizable) => window.flags.set(WindowFlags::RESIZABLE, resizable),
        Request::SetAlwaysOnTop(on_top) => window.flags.set(WindowFlags::ALWAYS_ON_TOP, on_top),
        Request::SetFocusable(focusable) => window.flags.set(WindowFlags::NOT_FOCUSABLE, !focusable),
        Request::SetFullscreen(target) => {
            window.fullscreen_mode = match target {
                Some(FullscreenTarget::Exclusive(mode)) => Some(mode),
                _ => None,
            };
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel_format::PixelFormat;
    use crate::window::WindowId;

    fn window(flags: WindowFlags) -> Window {
        Window::new(
            WindowId::from_raw(1).unwrap(),
            "state".into(),
            flags,
            Point::new(10, 20),
            Size::new(640, 480),
        )
    }

    fn exclusive_mode() -> DisplayMode {
        DisplayMode::new(DisplayId::from_raw(1).unwrap(), PixelFormat::Xrgb8888, 1280, 720, 60.0)
    }

    #[test]
    fn test_popup_requests_denied() {
        let tooltip = window(WindowFlags::TOOLTIP);
        for request in [Request::Minimize, Request::Maximize, Request::Raise] {
            assert_eq!(check_request(&tooltip, &request), Some(DenyReason::PopupWindow));
        }
        assert_eq!(check_request(&tooltip, &Request::Hide), None);
        assert_eq!(check_request(&tooltip, &Request::SetFullscreen(None)), None);
    }

    #[test]
    fn test_exclusive_fullscreen_locks_geometry() {
        let mut w = window(WindowFlags::FULLSCREEN);
        assert_eq!(check_request(&w, &Request::SetSize(Size::new(1, 1))), None);

        commit_accepted(&mut w, &Request::SetFullscreen(Some(FullscreenTarget::Exclusive(exclusive_mode()))));
        assert_eq!(w.state(), WindowState::Fullscreen(FullscreenKind::Exclusive));
        assert_eq!(
            check_request(&w, &Request::SetPosition(Point::new(0, 0))),
            Some(DenyReason::ExclusiveFullscreen)
        );
        assert_eq!(check_request(&w, &Request::Minimize), None);
    }

    #[test]
    fn test_commit_tracks_floating_geometry() {
        let mut w = window(WindowFlags::RESIZABLE);
        assert!(commit(&mut w, &Notification::Resized(Size::new(800, 600))));
        assert_eq!(w.floating_rect(), Rect::new(10, 20, 800, 600));

        assert!(commit(&mut w, &Notification::Maximized));
        assert!(commit(&mut w, &Notification::Resized(Size::new(1920, 1040))));
        assert_eq!(w.floating_rect(), Rect::new(10, 20, 800, 600));

        assert!(commit(&mut w, &Notification::Restored));
        assert_eq!(w.state(), WindowState::Normal);
    }

    #[test]
    fn test_commit_reports_redundant() {
        let mut w = window(WindowFlags::empty());
        assert!(!commit(&mut w, &Notification::Shown));
        assert!(commit(&mut w, &Notification::Hidden));
        assert!(!commit(&mut w, &Notification::Hidden));
        assert!(commit(&mut w, &Notification::CloseRequested));
    }

    #[test]
    fn test_minimize_clears_maximize() {
        let mut w = window(WindowFlags::MAXIMIZED);
        commit(&mut w, &Notification::Minimized);
        assert!(!w.flags().contains(WindowFlags::MAXIMIZED));
        assert_eq!(w.state(), WindowState::Minimized);
    }

    #[test]
    fn test_left_fullscreen_drops_mode() {
        let mut w = window(WindowFlags::FULLSCREEN);
        commit_accepted(&mut w, &Request::SetFullscreen(Some(FullscreenTarget::Exclusive(exclusive_mode()))));
        commit(&mut w, &Notification::LeftFullscreen);
        assert_eq!(w.state(), WindowState::Normal);
        assert!(w.fullscreen_mode.is_none());
    }

    #[test]
    fn test_unchanged_requires_idle_window() {
        let mut w = window(WindowFlags::empty());
        assert!(is_unchanged(&w, &Request::Restore));
        assert!(is_unchanged(&w, &Request::SetBordered(true)));
        assert!(!is_unchanged(&w, &Request::SetBordered(false)));

        w.pending.push(RequestTicket(1), Request::Maximize);
        assert!(!is_unchanged(&w, &Request::Restore));
    }

    #[test]
    fn test_pending_resolve() {
        let mut pending = PendingRequests::default();
        pending.push(RequestTicket(1), Request::Show);
        pending.push(RequestTicket(2), Request::Raise);

        assert_eq!(pending.resolve(RequestTicket(2)), Some(Request::Raise));
        assert_eq!(pending.resolve(RequestTicket(2)), None);
        assert_eq!(pending.len(), 1);
    }
}
