use std::time::Duration;

use casement_core::geometry::Size;

/// Configuration for a [`VideoSubsystem`](crate::VideoSubsystem).
#[derive(Debug, Clone)]
pub struct VideoConfig {
    /// Upper bound for [`sync_window`](crate::VideoSubsystem::sync_window).
    pub sync_timeout: Duration,
    /// Size used when a creation request leaves width or height unset.
    pub default_window_size: Size<u32>,
    /// Title used when a creation request leaves the title empty.
    pub default_title: String,
    /// Whether the screen saver may run while the subsystem is alive.
    pub allow_screensaver: bool,
}

impl Default for VideoConfig {
    fn default() -> Self {
        VideoConfig {
            sync_timeout: Duration::from_secs(1),
            default_window_size: Size::new(640, 480),
            default_title: "Casement Window".to_string(),
            allow_screensaver: false,
        }
    }
}

impl VideoConfig {
    pub fn with_sync_timeout(mut self, timeout: Duration) -> Self {
        self.sync_timeout = timeout;
        self
    }

    pub fn with_default_window_size(mut self, width: u32, height: u32) -> Self {
        self.default_window_size = Size::new(width.max(1), height.max(1));
        self
    }

    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = title.into();
        self
    }

    pub fn with_screensaver(mut self, allow: bool) -> Self {
        self.allow_screensaver = allow;
        self
    }
}
