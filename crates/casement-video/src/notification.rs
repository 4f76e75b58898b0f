//! Committed window transitions and the queue observers drain them from.

use std::collections::VecDeque;

use casement_core::geometry::{Point, Size};

use crate::display::DisplayId;
use crate::window::WindowId;

/// A committed change reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notification {
    Shown,
    Hidden,
    /// New top-left corner.
    Moved(Point<i32>),
    /// New client size in logical units.
    Resized(Size<u32>),
    /// New client size in pixels.
    PixelSizeChanged(Size<u32>),
    Minimized,
    Maximized,
    Restored,
    EnteredFullscreen,
    LeftFullscreen,
    FocusGained,
    FocusLost,
    CloseRequested,
    /// The window moved to another display.
    DisplayChanged(DisplayId),
    Destroyed,
}

impl Notification {
    /// Whether observers see this even when it changes no state.
    pub const fn always_delivered(&self) -> bool {
        matches!(self, Notification::CloseRequested | Notification::Destroyed)
    }
}

/// A notification addressed to one window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowNotification {
    pub window: WindowId,
    pub notification: Notification,
}

/// FIFO of committed notifications.
pub struct NotificationQueue {
    pending: VecDeque<WindowNotification>,
    stats: NotificationStats,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::with_capacity(64),
            stats: NotificationStats::default(),
        }
    }

    pub fn push(&mut self, window: WindowId, notification: Notification) {
        self.stats.received += 1;
        self.pending.push_back(WindowNotification { window, notification });
    }

    /// Record a notification that changed nothing and was not queued.
    pub(crate) fn record_redundant(&mut self) {
        self.stats.redundant += 1;
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take everything queued so far, oldest first.
    pub fn drain(&mut self) -> NotificationBatch {
        let notifications: Vec<_> = self.pending.drain(..).collect();
        self.stats.delivered += notifications.len();
        NotificationBatch { notifications }
    }

    pub fn stats(&self) -> &NotificationStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = NotificationStats::default();
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}

pub struct NotificationBatch {
    notifications: Vec<WindowNotification>,
}

impl NotificationBatch {
    pub fn iter(&self) -> impl Iterator<Item = &WindowNotification> {
        self.notifications.iter()
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    /// Notifications for one window, in order.
    pub fn for_window(&self, window: WindowId) -> impl Iterator<Item = &Notification> {
        self.notifications
            .iter()
            .filter(move |n| n.window == window)
            .map(|n| &n.notification)
    }

    /// Offer each notification to `handler`; consumed ones leave the batch.
    pub fn dispatch<H>(&mut self, mut handler: H)
    where
        H: FnMut(&WindowNotification) -> HandleStatus,
    {
        self.notifications.retain(|notification| {
            let status = handler(notification);
            !status.is_consumed()
        });
    }
}

impl IntoIterator for NotificationBatch {
    type Item = WindowNotification;
    type IntoIter = std::vec::IntoIter<WindowNotification>;

    fn into_iter(self) -> Self::IntoIter {
        self.notifications.into_iter()
    }
}

#[derive(Default, Debug, Clone)]
pub struct NotificationStats {
    /// Notifications queued.
    pub received: usize,
    /// Notifications handed out by [`NotificationQueue::drain`].
    pub delivered: usize,
    /// Notifications dropped because the state already matched.
    pub redundant: usize,
}

/// What an observer did with a notification during
/// [`NotificationBatch::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleStatus {
    /// Left in the batch for whoever looks next.
    Ignored,
    /// Removed from the batch.
    Consumed,
}

impl HandleStatus {
    pub const fn is_consumed(&self) -> bool {
        matches!(self, HandleStatus::Consumed)
    }
}
