//! Display registry.
//!
//! Displays belong to the platform. The registry only caches what the last
//! enumeration reported, normalizes mode lists, and answers queries against
//! that snapshot until the next [`DisplayRegistry::refresh`].

use std::fmt;
use std::num::NonZeroU32;

use casement_core::geometry::{Point, Rect, Size};
use casement_core::properties::PropertyGroup;
use casement_core::profiling::profile_function;

use crate::error::{VideoError, VideoResult};
use crate::mode;
use crate::pixel_format::PixelFormat;

/// Stable identifier of a connected display.
///
/// Unique for the lifetime of the connection and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DisplayId(NonZeroU32);

impl DisplayId {
    /// `None` for the reserved value 0.
    pub fn from_raw(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(DisplayId)
    }

    pub(crate) const fn from_nonzero(raw: NonZeroU32) -> Self {
        DisplayId(raw)
    }

    pub fn raw(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

static_assertions::assert_eq_size!(DisplayId, Option<DisplayId>);

/// Physical orientation of a display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    Unknown,
    Landscape,
    LandscapeFlipped,
    Portrait,
    PortraitFlipped,
}

/// One configuration a display can present.
///
/// A snapshot taken at enumeration time, not a live handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMode {
    pub display: DisplayId,
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
    /// Pixels per logical unit.
    pub pixel_density: f32,
    /// Refresh rate in Hz, 0 when unspecified.
    pub refresh_rate: f32,
    /// Exact refresh rate numerator, 0 when unspecified.
    pub refresh_rate_numerator: u32,
    /// Exact refresh rate denominator, 0 when unspecified.
    pub refresh_rate_denominator: u32,
}

impl DisplayMode {
    pub fn new(display: DisplayId, format: PixelFormat, width: u32, height: u32, refresh_rate: f32) -> Self {
        let mut mode = DisplayMode {
            display,
            format,
            width,
            height,
            pixel_density: 1.0,
            refresh_rate,
            refresh_rate_numerator: 0,
            refresh_rate_denominator: 0,
        };
        mode.finalize();
        mode
    }

    /// Use an exact rational refresh rate, e.g. 60000/1001.
    pub fn with_refresh_rational(mut self, numerator: u32, denominator: u32) -> Self {
        self.refresh_rate_numerator = numerator;
        self.refresh_rate_denominator = denominator;
        self.refresh_rate = 0.0;
        self.finalize();
        self
    }

    pub fn with_pixel_density(mut self, density: f32) -> Self {
        self.pixel_density = density;
        self.finalize();
        self
    }

    /// Reconcile the float and rational refresh rates and clamp density.
    ///
    /// A rational rate wins over the float; a float-only rate is truncated to
    /// hundredths and given a rational in thousandths.
    pub fn finalize(&mut self) {
        if self.refresh_rate_numerator > 0 {
            if self.refresh_rate_denominator == 0 {
                self.refresh_rate_denominator = 1;
            }
            self.refresh_rate = self.refresh_rate_numerator as f32 / self.refresh_rate_denominator as f32;
        } else if self.refresh_rate > 0.0 {
            let millihertz = (self.refresh_rate as f64 * 1000.0).round() as u64;
            let divisor = gcd(millihertz, 1000);
            self.refresh_rate_numerator = (millihertz / divisor) as u32;
            self.refresh_rate_denominator = (1000 / divisor) as u32;
            self.refresh_rate = (self.refresh_rate * 100.0).trunc() / 100.0;
        } else {
            self.refresh_rate = 0.0;
            self.refresh_rate_denominator = 0;
        }

        if !(self.pixel_density > 0.0) {
            self.pixel_density = 1.0;
        }
    }

    /// Size in logical units.
    pub fn size(&self) -> Size<u32> {
        Size::new(self.width, self.height)
    }

    /// Refresh rate in hundredths of a hertz, the precision modes are
    /// compared at.
    pub fn refresh_key(&self) -> i64 {
        mode::hundredths(self.refresh_rate)
    }

    /// Whether two snapshots describe the same mode on the same display.
    pub fn same_mode(&self, other: &DisplayMode) -> bool {
        self.display == other.display
            && self.format == other.format
            && self.width == other.width
            && self.height == other.height
            && self.refresh_key() == other.refresh_key()
            && mode::hundredths(self.pixel_density) == mode::hundredths(other.pixel_density)
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a.max(1)
}

/// Keys of capability properties reported on [`Display::properties`].
pub mod display_props {
    pub const HDR_ENABLED: &str = "display.hdr_enabled";
    pub const SDR_WHITE_POINT: &str = "display.sdr_white_point";
    pub const HDR_HEADROOM: &str = "display.hdr_headroom";
}

/// A connected display as reported by the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct Display {
    pub id: DisplayId,
    pub name: String,
    pub bounds: Rect,
    /// Bounds minus regions reserved by the OS (task bars, docks, menus).
    pub usable_bounds: Rect,
    pub natural_orientation: Orientation,
    pub current_orientation: Orientation,
    pub content_scale: f32,
    /// The native mode, regardless of any mode the application switched to.
    pub desktop_mode: DisplayMode,
    /// The mode active right now.
    pub current_mode: DisplayMode,
    /// Modes usable for exclusive fullscreen, largest first after refresh.
    pub modes: Vec<DisplayMode>,
    pub properties: PropertyGroup,
}

impl Display {
    fn normalize(&mut self) {
        for mode in [&mut self.desktop_mode, &mut self.current_mode] {
            mode.display = self.id;
            mode.finalize();
        }
        for mode in &mut self.modes {
            mode.display = self.id;
            mode.finalize();
        }
        if self.modes.is_empty() {
            self.modes.push(self.desktop_mode);
        }
        mode::sort_modes(&mut self.modes);
        mode::dedup_modes(&mut self.modes);

        if !(self.content_scale > 0.0) {
            self.content_scale = 1.0;
        }
        if self.usable_bounds.is_empty() {
            self.usable_bounds = self.bounds;
        }
    }
}

/// Difference between two enumerations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayChange {
    Added(DisplayId),
    Removed(DisplayId),
    Changed(DisplayId),
}

/// Cached view of the connected displays.
#[derive(Debug, Default)]
pub struct DisplayRegistry {
    displays: Vec<Display>,
}

impl DisplayRegistry {
    pub fn new() -> Self {
        Self { displays: Vec::new() }
    }

    /// Replace the cache with a new enumeration and report what changed.
    ///
    /// The first reported display is the primary one.
    pub fn refresh(&mut self, reported: Vec<Display>) -> Vec<DisplayChange> {
        profile_function!();
        let mut changes = Vec::new();
        let mut next: Vec<Display> = Vec::with_capacity(reported.len());

        for mut entry in reported {
            if next.iter().any(|d| d.id == entry.id) {
                tracing::warn!("platform reported display {} twice, keeping the first", entry.id);
                continue;
            }
            entry.normalize();

            match self.displays.iter().find(|d| d.id == entry.id) {
                None => changes.push(DisplayChange::Added(entry.id)),
                Some(previous) if *previous != entry => changes.push(DisplayChange::Changed(entry.id)),
                Some(_) => {}
            }
            next.push(entry);
        }

        for previous in &self.displays {
            if !next.iter().any(|d| d.id == previous.id) {
                changes.push(DisplayChange::Removed(previous.id));
            }
        }

        self.displays = next;
        changes
    }

    pub fn len(&self) -> usize {
        self.displays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.displays.is_empty()
    }

    /// Ids of all connected displays, primary first.
    pub fn displays(&self) -> Vec<DisplayId> {
        self.displays.iter().map(|d| d.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Display> {
        self.displays.iter()
    }

    pub fn primary_display(&self) -> Option<DisplayId> {
        self.displays.first().map(|d| d.id)
    }

    pub fn index_of(&self, id: DisplayId) -> Option<usize> {
        self.displays.iter().position(|d| d.id == id)
    }

    pub fn is_connected(&self, id: DisplayId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn display(&self, id: DisplayId) -> VideoResult<&Display> {
        self.displays
            .iter()
            .find(|d| d.id == id)
            .ok_or(VideoError::InvalidDisplay { id: id.raw() })
    }

    pub fn name(&self, id: DisplayId) -> VideoResult<&str> {
        Ok(self.display(id)?.name.as_str())
    }

    pub fn bounds(&self, id: DisplayId) -> VideoResult<Rect> {
        Ok(self.display(id)?.bounds)
    }

    pub fn usable_bounds(&self, id: DisplayId) -> VideoResult<Rect> {
        Ok(self.display(id)?.usable_bounds)
    }

    pub fn content_scale(&self, id: DisplayId) -> VideoResult<f32> {
        Ok(self.display(id)?.content_scale)
    }

    pub fn natural_orientation(&self, id: DisplayId) -> VideoResult<Orientation> {
        Ok(self.display(id)?.natural_orientation)
    }

    pub fn current_orientation(&self, id: DisplayId) -> VideoResult<Orientation> {
        Ok(self.display(id)?.current_orientation)
    }

    /// The native mode, unaffected by exclusive fullscreen switches.
    pub fn desktop_mode(&self, id: DisplayId) -> VideoResult<DisplayMode> {
        Ok(self.display(id)?.desktop_mode)
    }

    /// The mode active right now.
    pub fn current_mode(&self, id: DisplayId) -> VideoResult<DisplayMode> {
        Ok(self.display(id)?.current_mode)
    }

    /// Fullscreen modes, largest first.
    pub fn fullscreen_modes(&self, id: DisplayId) -> VideoResult<&[DisplayMode]> {
        Ok(self.display(id)?.modes.as_slice())
    }

    pub fn properties(&self, id: DisplayId) -> VideoResult<&PropertyGroup> {
        Ok(&self.display(id)?.properties)
    }

    /// Best fullscreen mode on `id` for the requested size and rate.
    ///
    /// See [`mode::closest_fullscreen_mode`] for the ranking rules.
    pub fn closest_fullscreen_mode(
        &self,
        id: DisplayId,
        width: u32,
        height: u32,
        refresh_rate: f32,
        include_high_density: bool,
    ) -> VideoResult<DisplayMode> {
        let display = self.display(id)?;
        mode::closest_fullscreen_mode(
            &display.modes,
            &display.desktop_mode,
            width,
            height,
            refresh_rate,
            include_high_density,
        )
    }

    /// The registry's copy of `mode`, if its display is still connected and
    /// still offers it.
    pub fn validate_mode(&self, mode: &DisplayMode) -> VideoResult<DisplayMode> {
        let unavailable = VideoError::ModeUnavailable {
            display: mode.display,
            width: mode.width,
            height: mode.height,
        };
        let display = self.display(mode.display).map_err(|_| unavailable.clone())?;
        display
            .modes
            .iter()
            .find(|candidate| candidate.same_mode(mode))
            .copied()
            .ok_or(unavailable)
    }

    /// The display whose bounds contain `point`.
    pub fn display_for_point(&self, point: Point<i32>) -> Option<DisplayId> {
        self.displays
            .iter()
            .find(|d| d.bounds.contains(point))
            .map(|d| d.id)
    }

    /// The display overlapping `rect` the most, or the one whose center is
    /// nearest when nothing overlaps.
    pub fn display_for_rect(&self, rect: Rect) -> Option<DisplayId> {
        let overlapping = self
            .displays
            .iter()
            .filter_map(|d| d.bounds.intersection(&rect).map(|i| (d.id, i.area())))
            .fold(None, |best: Option<(DisplayId, u64)>, (id, area)| match best {
                Some((_, best_area)) if best_area >= area => best,
                _ => Some((id, area)),
            });
        if let Some((id, _)) = overlapping {
            return Some(id);
        }

        let center = rect.center();
        self.displays
            .iter()
            .min_by_key(|d| {
                let c = d.bounds.center();
                let dx = c.x as i64 - center.x as i64;
                let dy = c.y as i64 - center.y as i64;
                dx * dx + dy * dy
            })
            .map(|d| d.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u32) -> DisplayId {
        DisplayId::from_raw(raw).unwrap()
    }

    fn display(raw: u32, origin: Point<i32>, width: u32, height: u32) -> Display {
        let desktop = DisplayMode::new(id(raw), PixelFormat::Xrgb8888, width, height, 60.0);
        Display {
            id: id(raw),
            name: format!("Display {}", raw),
            bounds: Rect::from_origin_size(origin, Size::new(width, height)),
            usable_bounds: Rect::default(),
            natural_orientation: Orientation::Landscape,
            current_orientation: Orientation::Landscape,
            content_scale: 0.0,
            desktop_mode: desktop,
            current_mode: desktop,
            modes: vec![
                DisplayMode::new(id(raw), PixelFormat::Xrgb8888, 1280, 720, 60.0),
                desktop,
                desktop,
            ],
            properties: PropertyGroup::new(),
        }
    }

    #[test]
    fn test_display_id_zero_is_invalid() {
        assert!(DisplayId::from_raw(0).is_none());
        assert_eq!(DisplayId::from_raw(3).unwrap().raw(), 3);
    }

    #[test]
    fn test_mode_finalize_rational() {
        let mode = DisplayMode::new(id(1), PixelFormat::Xrgb8888, 1920, 1080, 0.0).with_refresh_rational(60000, 1001);
        assert!((mode.refresh_rate - 59.94).abs() < 0.01);
        assert_eq!(mode.refresh_rate_denominator, 1001);
    }

    #[test]
    fn test_mode_finalize_float() {
        let mode = DisplayMode::new(id(1), PixelFormat::Xrgb8888, 1920, 1080, 144.0);
        assert_eq!(mode.refresh_rate_numerator, 144);
        assert_eq!(mode.refresh_rate_denominator, 1);
        assert_eq!(mode.pixel_density, 1.0);

        let unspecified = DisplayMode::new(id(1), PixelFormat::Xrgb8888, 1920, 1080, 0.0);
        assert_eq!(unspecified.refresh_rate_numerator, 0);
        assert_eq!(unspecified.refresh_rate_denominator, 0);
    }

    #[test]
    fn test_refresh_normalizes_and_diffs() {
        let mut registry = DisplayRegistry::new();
        let changes = registry.refresh(vec![display(1, Point::new(0, 0), 1920, 1080)]);
        assert_eq!(changes, vec![DisplayChange::Added(id(1))]);

        let cached = registry.display(id(1)).unwrap();
        assert_eq!(cached.modes.len(), 2, "duplicate desktop mode removed");
        assert_eq!(cached.modes[0].width, 1920, "largest mode first");
        assert_eq!(cached.usable_bounds, cached.bounds);
        assert_eq!(cached.content_scale, 1.0);

        let changes = registry.refresh(vec![display(2, Point::new(1920, 0), 2560, 1440)]);
        assert_eq!(changes, vec![DisplayChange::Added(id(2)), DisplayChange::Removed(id(1))]);
        assert_eq!(registry.primary_display(), Some(id(2)));

        let mut rotated = display(2, Point::new(1920, 0), 2560, 1440);
        rotated.current_orientation = Orientation::Portrait;
        assert_eq!(registry.refresh(vec![rotated]), vec![DisplayChange::Changed(id(2))]);
    }

    #[test]
    fn test_display_for_point_and_rect() {
        let mut registry = DisplayRegistry::new();
        registry.refresh(vec![
            display(1, Point::new(0, 0), 1920, 1080),
            display(2, Point::new(1920, 0), 2560, 1440),
        ]);

        assert_eq!(registry.display_for_point(Point::new(100, 100)), Some(id(1)));
        assert_eq!(registry.display_for_point(Point::new(2000, 100)), Some(id(2)));
        assert_eq!(registry.display_for_point(Point::new(-5, 0)), None);

        // Mostly on the second display.
        assert_eq!(registry.display_for_rect(Rect::new(1800, 0, 800, 600)), Some(id(2)));
        // Off-screen, nearest to the first display.
        assert_eq!(registry.display_for_rect(Rect::new(-3000, 0, 100, 100)), Some(id(1)));
    }

    #[test]
    fn test_validate_mode_rejects_stale() {
        let mut registry = DisplayRegistry::new();
        registry.refresh(vec![display(1, Point::new(0, 0), 1920, 1080)]);
        let mode = registry.fullscreen_modes(id(1)).unwrap()[0];
        assert!(registry.validate_mode(&mode).is_ok());

        registry.refresh(vec![display(2, Point::new(0, 0), 1920, 1080)]);
        assert!(matches!(
            registry.validate_mode(&mode),
            Err(VideoError::ModeUnavailable { .. })
        ));
    }
}
