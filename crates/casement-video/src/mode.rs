//! Fullscreen mode negotiation.
//!
//! Pure functions over mode lists; the registry feeds them the cached modes
//! of one display.

use std::cmp::Ordering;

use casement_core::profiling::profile_function;

use crate::display::DisplayMode;
use crate::error::{VideoError, VideoResult};

/// A rate or density in hundredths, the precision modes are compared at.
pub fn hundredths(value: f32) -> i64 {
    (value as f64 * 100.0).round() as i64
}

/// Pick the smallest mode that fits `width`x`height`.
///
/// Zero dimensions mean the desktop dimension; a zero refresh rate targets
/// the desktop rate. Among fitting modes the order is: width, height,
/// deeper colour, larger packed pixel, exact refresh match, higher refresh,
/// lower density. Ties keep the order of `modes`.
pub fn closest_fullscreen_mode(
    modes: &[DisplayMode],
    desktop: &DisplayMode,
    width: u32,
    height: u32,
    refresh_rate: f32,
    include_high_density: bool,
) -> VideoResult<DisplayMode> {
    profile_function!();

    let width = if width == 0 { desktop.width } else { width };
    let height = if height == 0 { desktop.height } else { height };
    let target_rate = if refresh_rate > 0.0 {
        hundredths(refresh_rate)
    } else {
        desktop.refresh_key()
    };

    modes
        .iter()
        .filter(|mode| include_high_density || mode.pixel_density <= 1.0)
        .filter(|mode| mode.width >= width && mode.height >= height)
        .min_by(|a, b| rank(a, b, target_rate))
        .copied()
        .ok_or(VideoError::NoMatchingMode {
            display: desktop.display,
            width,
            height,
        })
}

fn rank(a: &DisplayMode, b: &DisplayMode, target_rate: i64) -> Ordering {
    a.width
        .cmp(&b.width)
        .then(a.height.cmp(&b.height))
        .then(b.format.bits_per_pixel().cmp(&a.format.bits_per_pixel()))
        .then(b.format.bytes_per_pixel().cmp(&a.format.bytes_per_pixel()))
        .then_with(|| {
            let a_exact = a.refresh_key() == target_rate;
            let b_exact = b.refresh_key() == target_rate;
            b_exact.cmp(&a_exact)
        })
        .then(b.refresh_key().cmp(&a.refresh_key()))
        .then(a.pixel_density.total_cmp(&b.pixel_density))
}

/// Order a display's modes largest first.
pub fn sort_modes(modes: &mut [DisplayMode]) {
    modes.sort_by(|a, b| {
        b.width
            .cmp(&a.width)
            .then(b.height.cmp(&a.height))
            .then(b.format.bits_per_pixel().cmp(&a.format.bits_per_pixel()))
            .then(b.format.bytes_per_pixel().cmp(&a.format.bytes_per_pixel()))
            .then(b.refresh_key().cmp(&a.refresh_key()))
            .then(a.pixel_density.total_cmp(&b.pixel_density))
    });
}

/// Drop modes identical to an earlier entry, keeping the first.
pub fn dedup_modes(modes: &mut Vec<DisplayMode>) {
    let mut kept: Vec<DisplayMode> = Vec::with_capacity(modes.len());
    for mode in modes.drain(..) {
        if !kept.iter().any(|k| k.same_mode(&mode)) {
            kept.push(mode);
        }
    }
    *modes = kept;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DisplayId;
    use crate::pixel_format::PixelFormat;

    fn display() -> DisplayId {
        DisplayId::from_raw(1).unwrap()
    }

    fn mode(width: u32, height: u32, rate: f32) -> DisplayMode {
        DisplayMode::new(display(), PixelFormat::Xrgb8888, width, height, rate)
    }

    fn standard() -> (Vec<DisplayMode>, DisplayMode) {
        let mut modes = vec![mode(1280, 720, 60.0), mode(1920, 1080, 60.0), mode(3840, 2160, 60.0)];
        sort_modes(&mut modes);
        (modes, mode(1920, 1080, 60.0))
    }

    #[test]
    fn test_picks_smallest_fitting_mode() {
        let (modes, desktop) = standard();
        let best = closest_fullscreen_mode(&modes, &desktop, 2000, 1100, 0.0, false).unwrap();
        assert_eq!((best.width, best.height), (3840, 2160));

        let exact = closest_fullscreen_mode(&modes, &desktop, 1280, 720, 0.0, false).unwrap();
        assert_eq!((exact.width, exact.height), (1280, 720));
    }

    #[test]
    fn test_no_mode_large_enough() {
        let (modes, desktop) = standard();
        let err = closest_fullscreen_mode(&modes, &desktop, 4000, 3000, 0.0, false).unwrap_err();
        assert_eq!(
            err,
            VideoError::NoMatchingMode {
                display: display(),
                width: 4000,
                height: 3000
            }
        );
    }

    #[test]
    fn test_zero_size_means_desktop() {
        let (modes, desktop) = standard();
        let best = closest_fullscreen_mode(&modes, &desktop, 0, 0, 0.0, false).unwrap();
        assert_eq!((best.width, best.height), (1920, 1080));
    }

    #[test]
    fn test_refresh_prefers_exact_then_higher() {
        let mut modes = vec![mode(1920, 1080, 60.0), mode(1920, 1080, 144.0), mode(1920, 1080, 120.0)];
        sort_modes(&mut modes);
        let desktop = mode(1920, 1080, 60.0);

        let exact = closest_fullscreen_mode(&modes, &desktop, 1920, 1080, 120.0, false).unwrap();
        assert_eq!(exact.refresh_rate, 120.0);

        // Unspecified rate targets the desktop rate.
        let desktop_rate = closest_fullscreen_mode(&modes, &desktop, 1920, 1080, 0.0, false).unwrap();
        assert_eq!(desktop_rate.refresh_rate, 60.0);

        let fallback = closest_fullscreen_mode(&modes, &desktop, 1920, 1080, 75.0, false).unwrap();
        assert_eq!(fallback.refresh_rate, 144.0);
    }

    #[test]
    fn test_deeper_format_wins() {
        let shallow = DisplayMode::new(display(), PixelFormat::Rgb565, 1920, 1080, 60.0);
        let deep = DisplayMode::new(display(), PixelFormat::Xrgb8888, 1920, 1080, 60.0);
        let packed = DisplayMode::new(display(), PixelFormat::Rgb24, 1920, 1080, 60.0);
        let modes = vec![shallow, packed, deep];

        let best = closest_fullscreen_mode(&modes, &deep, 1920, 1080, 60.0, false).unwrap();
        assert_eq!(best.format, PixelFormat::Xrgb8888);
    }

    #[test]
    fn test_high_density_filtered_unless_requested() {
        let retina = mode(1440, 900, 60.0).with_pixel_density(2.0);
        let modes = vec![retina];
        let desktop = mode(1440, 900, 60.0);

        assert!(closest_fullscreen_mode(&modes, &desktop, 1440, 900, 0.0, false).is_err());
        let best = closest_fullscreen_mode(&modes, &desktop, 1440, 900, 0.0, true).unwrap();
        assert_eq!(best.pixel_density, 2.0);
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let (modes, desktop) = standard();
        let first = closest_fullscreen_mode(&modes, &desktop, 1600, 900, 59.0, false).unwrap();
        for _ in 0..16 {
            let again = closest_fullscreen_mode(&modes, &desktop, 1600, 900, 59.0, false).unwrap();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_sort_and_dedup() {
        let mut modes = vec![
            mode(1280, 720, 60.0),
            mode(3840, 2160, 30.0),
            mode(1280, 720, 60.0),
            mode(3840, 2160, 60.0),
        ];
        sort_modes(&mut modes);
        dedup_modes(&mut modes);

        let summary: Vec<_> = modes.iter().map(|m| (m.width, m.refresh_rate as u32)).collect();
        assert_eq!(summary, vec![(3840, 60), (3840, 30), (1280, 60)]);
    }
}
