//! Canned displays and mode sets.

use casement_video::{DisplayId, DisplayMode, HeadlessDisplay, HeadlessPlatform, ModeSpec, PixelFormat};

/// Modes a typical 4K desktop monitor offers, desktop mode excluded.
pub fn desktop_modes() -> Vec<ModeSpec> {
    vec![
        ModeSpec::new(3840, 2160, 30.0),
        ModeSpec::new(2560, 1440, 144.0),
        ModeSpec::new(2560, 1440, 60.0),
        ModeSpec::new(1920, 1080, 144.0),
        ModeSpec::new(1920, 1080, 120.0),
        ModeSpec::new(1920, 1080, 60.0),
        ModeSpec::new(1920, 1080, 60.0).with_format(PixelFormat::Rgb565),
        ModeSpec::new(1280, 720, 60.0),
        ModeSpec::new(800, 600, 60.0),
    ]
}

/// 3840x2160 at 60 Hz with [`desktop_modes`].
pub fn uhd_display(name: &str) -> HeadlessDisplay {
    HeadlessDisplay::new(name, 3840, 2160).with_modes(desktop_modes())
}

/// 1440x900 panel at 2x content scale with one high-density mode.
pub fn laptop_display(name: &str) -> HeadlessDisplay {
    HeadlessDisplay::new(name, 1440, 900)
        .with_content_scale(2.0)
        .with_mode(ModeSpec::new(1440, 900, 60.0).with_pixel_density(2.0))
        .with_mode(ModeSpec::new(1024, 640, 60.0))
}

/// One 4K display.
pub fn desktop_platform() -> HeadlessPlatform {
    HeadlessPlatform::with_displays([uhd_display("Primary")])
}

/// A 1920x1080 primary with a 4K display to its right.
pub fn dual_display_platform() -> HeadlessPlatform {
    HeadlessPlatform::with_displays([
        HeadlessDisplay::new("Left", 1920, 1080).with_modes([ModeSpec::new(1280, 720, 60.0)]),
        uhd_display("Right").at(1920, 0),
    ])
}

/// `count` modes on display 1, largest first, for benchmarks.
pub fn mode_ladder(count: usize) -> Vec<DisplayMode> {
    let Some(display) = DisplayId::from_raw(1) else {
        return Vec::new();
    };
    let rates = [240.0, 165.0, 144.0, 120.0, 75.0, 60.0, 50.0, 30.0];
    (0..count)
        .map(|i| {
            let step = (i / rates.len()) as u32;
            let width = 7680u32.saturating_sub(step * 64).max(320);
            let height = width * 9 / 16;
            DisplayMode::new(display, PixelFormat::Xrgb8888, width, height, rates[i % rates.len()])
        })
        .collect()
}
