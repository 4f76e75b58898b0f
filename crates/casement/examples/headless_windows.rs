//! Headless window tree
//!
//! Creates a small window tree on the headless platform and walks through
//! the request/notification cycle: requests are submitted, the platform
//! answers on the next pump, and notifications are dispatched afterwards.
//!
//! Run with: cargo run --example headless_windows

use casement::prelude::*;

fn main() -> VideoResult<()> {
    casement::logging::init();

    let mut video = VideoSubsystem::headless()?;
    let main = video.create_window("Editor", 1280, 720, WindowFlags::RESIZABLE)?;
    let palette = video.create_window_from_config(&WindowConfig::new("Palette", 240, 480).with_parent(main))?;
    let menu = video.create_popup_window(main, 16, 32, 180, 120, WindowFlags::POPUP_MENU)?;

    tracing::info!("created {} windows", video.windows().len());

    // Requests are only submitted here; state changes once the platform answers.
    let outcome = video.maximize_window(main)?;
    tracing::info!("maximize -> {:?}, state still {:?}", outcome, video.window_state(main)?);
    video.pump_events()?;
    tracing::info!("after pump: {:?}", video.window_state(main)?);

    // Popups refuse window-manager state changes.
    tracing::info!("minimize menu -> {:?}", video.minimize_window(menu)?);

    // Hiding the parent hides its whole subtree.
    let hidden = video.hide_window(main)?;
    video.pump_events()?;
    tracing::info!("hide editor -> {:?}", hidden);
    tracing::info!("palette hidden with parent: {}", video.window(palette)?.is_hidden());
    let shown = video.show_window(main)?;
    video.pump_events()?;
    tracing::info!("show editor -> {:?}", shown);

    let mut batch = video.poll_notifications();
    batch.dispatch(|event| {
        tracing::info!("{:?}: {:?}", event.window, event.notification);
        HandleStatus::Ignored
    });

    video.destroy_window(main)?;
    tracing::info!("windows left: {}", video.windows().len());
    Ok(())
}
