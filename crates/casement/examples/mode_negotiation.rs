//! Display mode negotiation
//!
//! Lists the displays of a headless desktop, picks the closest fullscreen
//! mode for a few requested sizes and switches a window into exclusive
//! fullscreen and back.
//!
//! Run with: cargo run --example mode_negotiation

use casement::prelude::*;
use casement::{HeadlessDisplay, HeadlessPlatform, ModeSpec};

fn main() -> VideoResult<()> {
    casement::logging::init();

    let platform = HeadlessPlatform::with_displays([
        HeadlessDisplay::new("Main", 2560, 1440).with_modes([
            ModeSpec::new(1280, 720, 60.0),
            ModeSpec::new(1920, 1080, 60.0),
            ModeSpec::new(1920, 1080, 144.0),
            ModeSpec::new(2560, 1440, 144.0),
        ]),
        HeadlessDisplay::new("Side", 1920, 1080).with_modes([ModeSpec::new(1920, 1080, 60.0)]),
    ]);
    let mut video = VideoSubsystem::new(platform, VideoConfig::default())?;

    for display_id in video.displays() {
        tracing::info!(
            "{} '{}' bounds {:?}",
            display_id,
            video.display_name(display_id)?,
            video.display_bounds(display_id)?
        );
        for mode in video.fullscreen_display_modes(display_id)? {
            tracing::info!("  {}x{} @ {} Hz ({})", mode.width, mode.height, mode.refresh_rate, mode.format);
        }
    }

    let primary = video.primary_display().ok_or(VideoError::Platform {
        message: "no displays connected".into(),
    })?;
    for (width, height, rate) in [(1600, 900, 0.0), (1920, 1080, 144.0), (4000, 3000, 0.0)] {
        match video.closest_fullscreen_mode(primary, width, height, rate, false) {
            Ok(mode) => tracing::info!("{}x{}@{} -> {}x{}@{}", width, height, rate, mode.width, mode.height, mode.refresh_rate),
            Err(err) => tracing::warn!("{}x{}@{} -> {}", width, height, rate, err),
        }
    }

    let window = video.create_window("Game", 1280, 720, WindowFlags::empty())?;
    let outcome = video.request_exclusive_fullscreen(window, 1920, 1080, 144.0, false)?;
    tracing::info!("exclusive fullscreen request -> {:?}", outcome);
    if video.sync_window(window)? {
        let mode = video.current_display_mode(primary)?;
        tracing::info!("exclusive fullscreen at {}x{}@{}", mode.width, mode.height, mode.refresh_rate);
    }

    if video.set_fullscreen(window, false)?.is_denied() {
        tracing::warn!("leaving fullscreen was denied");
    }
    video.sync_window(window)?;
    tracing::info!("desktop mode restored: {:?}", video.current_display_mode(primary)?);
    Ok(())
}
