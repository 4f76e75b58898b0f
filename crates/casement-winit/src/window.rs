use casement_video::{VideoConfig, WindowConfig, WindowPosition};
pub use winit::window::Fullscreen;
use winit::dpi::{LogicalPosition, LogicalSize};
use winit::window::{WindowAttributes, WindowLevel};

/// winit attributes for a window described by `config`.
///
/// Empty titles and zero sizes fall back to `defaults`. Only absolute
/// positions are forwarded; centering needs the target monitor and is left
/// to the caller. Fullscreen maps to borderless fullscreen on the current
/// monitor.
pub fn window_attributes(config: &WindowConfig, defaults: &VideoConfig) -> WindowAttributes {
    let title = if config.title.is_empty() {
        defaults.default_title.clone()
    } else {
        config.title.clone()
    };
    let width = if config.width == 0 {
        defaults.default_window_size.width
    } else {
        config.width
    };
    let height = if config.height == 0 {
        defaults.default_window_size.height
    } else {
        config.height
    };

    let mut attributes = winit::window::Window::default_attributes()
        .with_title(title)
        .with_inner_size(LogicalSize::new(width as f64, height as f64))
        .with_resizable(config.resizable)
        .with_decorations(!config.borderless)
        .with_visible(!config.hidden)
        .with_maximized(config.maximized)
        .with_transparent(config.transparent)
        .with_active(config.focusable);

    if config.always_on_top {
        attributes = attributes.with_window_level(WindowLevel::AlwaysOnTop);
    }
    if config.fullscreen {
        attributes = attributes.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }
    if let (WindowPosition::Absolute(x), WindowPosition::Absolute(y)) = (config.x, config.y) {
        attributes = attributes.with_position(LogicalPosition::new(x as f64, y as f64));
    }
    attributes
}
