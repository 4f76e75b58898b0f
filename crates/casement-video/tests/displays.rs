use std::time::Duration;

use casement_core::geometry::{Point, Rect, Size};
use casement_test_utils::{fixtures, PlatformCall, RecordingPlatform};
use casement_video::{
    DisplayChange, DisplayMode, FullscreenKind, HeadlessDisplay, HeadlessPlatform, ModeSpec, Notification,
    PixelFormat, RequestOutcome, VideoConfig, VideoError, VideoSubsystem, WindowConfig, WindowFlags, WindowPosition,
    WindowState,
};

fn video_on(platform: HeadlessPlatform) -> VideoSubsystem<HeadlessPlatform> {
    VideoSubsystem::new(platform, VideoConfig::default()).unwrap()
}

#[test]
fn test_closest_mode_is_the_smallest_that_fits() {
    let platform = HeadlessPlatform::with_displays([HeadlessDisplay::new("Panel", 1920, 1080)
        .with_modes([ModeSpec::new(1280, 720, 60.0), ModeSpec::new(3840, 2160, 60.0)])]);
    let video = video_on(platform);
    let display = video.primary_display().unwrap();

    let mode = video.closest_fullscreen_mode(display, 2000, 1100, 0.0, false).unwrap();
    assert_eq!((mode.width, mode.height), (3840, 2160));

    assert_eq!(
        video.closest_fullscreen_mode(display, 4000, 3000, 0.0, false),
        Err(VideoError::NoMatchingMode {
            display,
            width: 4000,
            height: 3000
        })
    );
}

#[test]
fn test_fullscreen_modes_are_ordered_and_unique() {
    let video = video_on(fixtures::desktop_platform());
    let display = video.primary_display().unwrap();
    let modes = video.fullscreen_display_modes(display).unwrap();

    assert_eq!((modes[0].width, modes[0].height, modes[0].refresh_rate), (3840, 2160, 60.0));
    for pair in modes.windows(2) {
        assert!(pair[0].width >= pair[1].width);
        assert!(!pair[0].same_mode(&pair[1]));
    }
    let full_hd_60: Vec<_> = modes
        .iter()
        .filter(|m| m.width == 1920 && m.refresh_rate == 60.0)
        .collect();
    assert_eq!(full_hd_60.len(), 2);
    assert_eq!(full_hd_60[0].format, PixelFormat::Xrgb8888);
}

#[test]
fn test_refresh_rate_defaults_to_desktop_rate() {
    let video = video_on(fixtures::desktop_platform());
    let display = video.primary_display().unwrap();

    let desktop_rate = video.closest_fullscreen_mode(display, 2560, 1440, 0.0, false).unwrap();
    assert_eq!(desktop_rate.refresh_rate, 60.0);

    let fast = video.closest_fullscreen_mode(display, 2560, 1440, 144.0, false).unwrap();
    assert_eq!(fast.refresh_rate, 144.0);
}

#[test]
fn test_exclusive_fullscreen_changes_current_but_not_desktop_mode() {
    let mut video = video_on(fixtures::desktop_platform());
    let display = video.primary_display().unwrap();
    let desktop = video.desktop_display_mode(display).unwrap();
    let window = video.create_window("game", 1280, 720, WindowFlags::empty()).unwrap();

    assert!(
        video
            .request_exclusive_fullscreen(window, 1920, 1080, 144.0, false)
            .unwrap()
            .is_submitted()
    );
    assert!(video.sync_window(window).unwrap());

    let current = video.current_display_mode(display).unwrap();
    assert_eq!((current.width, current.height, current.refresh_rate), (1920, 1080, 144.0));
    assert_eq!(video.desktop_display_mode(display).unwrap(), desktop);
    assert_eq!(video.display_bounds(display).unwrap(), Rect::new(0, 0, 1920, 1080));
    assert_eq!(video.window_size(window).unwrap(), Size::new(1920, 1080));
    assert_eq!(
        video.window_state(window).unwrap(),
        WindowState::Fullscreen(FullscreenKind::Exclusive)
    );

    // Destroying the window hands the display back.
    video.destroy_window(window).unwrap();
    video.pump_events().unwrap();
    assert_eq!(video.current_display_mode(display).unwrap(), desktop);
}

#[test]
fn test_unavailable_modes_are_rejected() {
    let mut video = video_on(fixtures::desktop_platform());
    let display = video.primary_display().unwrap();
    let window = video.create_window("game", 1280, 720, WindowFlags::empty()).unwrap();

    let invented = DisplayMode::new(display, PixelFormat::Xrgb8888, 1234, 567, 60.0);
    assert_eq!(
        video.set_fullscreen_mode(window, Some(invented)),
        Err(VideoError::ModeUnavailable {
            display,
            width: 1234,
            height: 567
        })
    );
    assert_eq!(video.window_fullscreen_mode(window).unwrap(), None);
}

#[test]
fn test_fullscreen_mode_applies_on_next_fullscreen() {
    let mut video = video_on(fixtures::desktop_platform());
    let display = video.primary_display().unwrap();
    let window = video.create_window("game", 1280, 720, WindowFlags::empty()).unwrap();
    let mode = video.closest_fullscreen_mode(display, 1280, 720, 0.0, false).unwrap();

    assert_eq!(video.set_fullscreen_mode(window, Some(mode)).unwrap(), RequestOutcome::Unchanged);
    video.set_fullscreen(window, true).unwrap();
    assert!(video.sync_window(window).unwrap());
    assert_eq!(video.current_display_mode(display).unwrap().width, 1280);

    // Back to desktop fullscreen while staying fullscreen.
    assert!(video.set_fullscreen_mode(window, None).unwrap().is_submitted());
    assert!(video.sync_window(window).unwrap());
    assert_eq!(
        video.window_state(window).unwrap(),
        WindowState::Fullscreen(FullscreenKind::Desktop)
    );
    assert_eq!(video.current_display_mode(display).unwrap().width, 3840);
}

#[test]
fn test_windows_follow_disconnected_displays_to_primary() {
    let mut video = video_on(fixtures::dual_display_platform());
    let displays = video.displays();
    let (left, right) = (displays[0], displays[1]);

    let config = WindowConfig::new("right", 800, 600)
        .with_position(WindowPosition::Centered(Some(right)), WindowPosition::Centered(Some(right)));
    let window = video.create_window_from_config(&config).unwrap();
    assert_eq!(video.display_for_window(window).unwrap(), right);
    assert_eq!(video.window_position(window).unwrap(), Point::new(1920 + 1520, 780));
    video.pump_events().unwrap();
    video.poll_notifications();

    assert!(video.platform_mut().disconnect_display(right));
    video.pump_events().unwrap();

    assert_eq!(video.displays(), vec![left]);
    assert_eq!(video.display_for_window(window).unwrap(), left);
    let batch = video.poll_notifications();
    assert_eq!(
        batch.for_window(window).copied().collect::<Vec<_>>(),
        vec![Notification::DisplayChanged(left)]
    );
    assert_eq!(
        video.display_bounds(right),
        Err(VideoError::InvalidDisplay { id: right.raw() })
    );
}

#[test]
fn test_refresh_reports_hotplug_changes() {
    let mut video = video_on(HeadlessPlatform::new());
    let added = video.platform_mut().connect_display(fixtures::laptop_display("Built-in"));

    let changes = video.refresh_displays().unwrap();
    assert_eq!(changes, vec![DisplayChange::Added(added)]);
    assert_eq!(video.display_name(added).unwrap(), "Built-in");
    assert_eq!(video.display_content_scale(added).unwrap(), 2.0);

    // Nothing changed since.
    assert!(video.refresh_displays().unwrap().is_empty());
}

#[test]
fn test_high_density_windows_scale_their_pixels() {
    let mut video = video_on(HeadlessPlatform::with_displays([fixtures::laptop_display("Built-in")]));
    let dense = video
        .create_window("dense", 400, 300, WindowFlags::HIGH_PIXEL_DENSITY)
        .unwrap();
    let plain = video.create_window("plain", 400, 300, WindowFlags::empty()).unwrap();

    assert_eq!(video.window_size_in_pixels(dense).unwrap(), Size::new(800, 600));
    assert_eq!(video.window_pixel_density(dense).unwrap(), 2.0);
    assert_eq!(video.window_size_in_pixels(plain).unwrap(), Size::new(400, 300));
    assert_eq!(video.window_pixel_density(plain).unwrap(), 1.0);
    assert_eq!(video.window_display_scale(plain).unwrap(), 2.0);

    let display = video.primary_display().unwrap();
    let modes = video.fullscreen_display_modes(display).unwrap();
    assert!(modes.iter().any(|m| m.pixel_density == 2.0));
    for width in [1024, 1440] {
        let mode = video.closest_fullscreen_mode(display, width, 0, 0.0, false).unwrap();
        assert_eq!(mode.pixel_density, 1.0);
    }
}

#[test]
fn test_unresponsive_window_times_out() {
    let config = VideoConfig::default().with_sync_timeout(Duration::from_millis(10));
    let platform = RecordingPlatform::new(fixtures::desktop_platform());
    let log = platform.log();
    let mut video = VideoSubsystem::new(platform, config).unwrap();
    let window = video.create_window("stuck", 640, 480, WindowFlags::RESIZABLE).unwrap();

    video.platform_mut().inner_mut().set_unresponsive(window, true);
    assert!(video.maximize_window(window).unwrap().is_submitted());
    assert!(!video.sync_window(window).unwrap());
    assert_eq!(video.window_state(window).unwrap(), WindowState::Normal);
    assert_eq!(log.count(|call| matches!(call, PlatformCall::Sync { .. })), 1);

    // Nothing outstanding: no wait at all.
    assert!(video.sync_window(window).unwrap());
    assert_eq!(log.count(|call| matches!(call, PlatformCall::Sync { .. })), 1);
}

#[test]
fn test_unchanged_requests_never_reach_the_platform() {
    let platform = RecordingPlatform::new(fixtures::desktop_platform());
    let log = platform.log();
    let mut video = VideoSubsystem::new(platform, VideoConfig::default()).unwrap();
    let window = video.create_window("calm", 640, 480, WindowFlags::empty()).unwrap();
    video.pump_events().unwrap();
    log.clear();

    assert_eq!(video.restore_window(window).unwrap(), RequestOutcome::Unchanged);
    assert_eq!(video.show_window(window).unwrap(), RequestOutcome::Unchanged);
    assert_eq!(video.set_window_bordered(window, true).unwrap(), RequestOutcome::Unchanged);
    assert_eq!(video.set_fullscreen(window, false).unwrap(), RequestOutcome::Unchanged);
    assert!(log.is_empty());
}
