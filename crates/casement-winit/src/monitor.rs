//! Conversion of winit monitors and video modes into Casement displays.

use casement_core::geometry::{Point, Rect, Size};
use casement_core::properties::PropertyGroup;
use casement_video::{Display, DisplayId, DisplayMode, Orientation, PixelFormat};
use winit::event_loop::ActiveEventLoop;
use winit::monitor::{MonitorHandle, VideoModeHandle};

/// A fullscreen video mode as winit reports it, in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoModeInfo {
    pub size: Size<u32>,
    pub bit_depth: u16,
    pub refresh_millihertz: u32,
}

impl VideoModeInfo {
    pub fn from_handle(mode: &VideoModeHandle) -> Self {
        let size = mode.size();
        Self {
            size: Size::new(size.width, size.height),
            bit_depth: mode.bit_depth(),
            refresh_millihertz: mode.refresh_rate_millihertz(),
        }
    }

    pub fn to_mode(&self, display: DisplayId) -> DisplayMode {
        let mode = DisplayMode::new(
            display,
            PixelFormat::from_bit_depth(self.bit_depth),
            self.size.width,
            self.size.height,
            0.0,
        );
        if self.refresh_millihertz > 0 {
            mode.with_refresh_rational(self.refresh_millihertz, 1000)
        } else {
            mode
        }
    }
}

/// Snapshot of a winit monitor. Position and size are physical.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorInfo {
    pub name: String,
    pub position: Point<i32>,
    pub size: Size<u32>,
    pub scale_factor: f64,
    pub refresh_millihertz: Option<u32>,
    pub modes: Vec<VideoModeInfo>,
}

impl MonitorInfo {
    pub fn from_handle(monitor: &MonitorHandle) -> Self {
        let position = monitor.position();
        let size = monitor.size();
        Self {
            name: monitor.name().unwrap_or_else(|| "Unknown Display".to_string()),
            position: Point::new(position.x, position.y),
            size: Size::new(size.width, size.height),
            scale_factor: monitor.scale_factor(),
            refresh_millihertz: monitor.refresh_rate_millihertz(),
            modes: monitor.video_modes().map(|mode| VideoModeInfo::from_handle(&mode)).collect(),
        }
    }

    /// Build the display record. Bounds and the desktop mode are logical,
    /// with the scale factor as the desktop mode's pixel density; fullscreen
    /// modes stay physical.
    pub fn to_display(&self, id: DisplayId) -> Display {
        let scale = if self.scale_factor > 0.0 { self.scale_factor } else { 1.0 };
        let logical = Size::new(
            (self.size.width as f64 / scale).round() as u32,
            (self.size.height as f64 / scale).round() as u32,
        );
        let origin = Point::new(
            (self.position.x as f64 / scale).round() as i32,
            (self.position.y as f64 / scale).round() as i32,
        );

        // The desktop runs at the native resolution; take the deepest mode
        // offered at that size for its format.
        let format = self
            .modes
            .iter()
            .filter(|mode| mode.size == self.size)
            .map(|mode| PixelFormat::from_bit_depth(mode.bit_depth))
            .max_by_key(|format| format.bits_per_pixel())
            .unwrap_or(PixelFormat::Xrgb8888);
        let mut desktop =
            DisplayMode::new(id, format, logical.width, logical.height, 0.0).with_pixel_density(scale as f32);
        if let Some(millihertz) = self.refresh_millihertz.filter(|mhz| *mhz > 0) {
            desktop = desktop.with_refresh_rational(millihertz, 1000);
        }

        let orientation = if self.size.width >= self.size.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        };
        let bounds = Rect::from_origin_size(origin, logical);

        Display {
            id,
            name: self.name.clone(),
            bounds,
            usable_bounds: bounds,
            natural_orientation: orientation,
            current_orientation: orientation,
            content_scale: scale as f32,
            desktop_mode: desktop,
            current_mode: desktop,
            modes: self.modes.iter().map(|mode| mode.to_mode(id)).collect(),
            properties: PropertyGroup::new(),
        }
    }
}

/// Every monitor the event loop knows about, primary first.
pub fn available_monitors(event_loop: &ActiveEventLoop) -> Vec<MonitorInfo> {
    let mut monitors: Vec<MonitorHandle> = event_loop.available_monitors().collect();
    if let Some(primary) = event_loop.primary_monitor() {
        if let Some(index) = monitors.iter().position(|m| *m == primary) {
            let primary = monitors.remove(index);
            monitors.insert(0, primary);
        }
    }
    tracing::info!("Found {} monitor(s)", monitors.len());
    monitors.iter().map(MonitorInfo::from_handle).collect()
}
