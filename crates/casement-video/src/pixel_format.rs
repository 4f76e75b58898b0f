use std::fmt;

/// Pixel layouts a display mode can present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    #[default]
    Unknown,
    Index8,
    Rgb332,
    Xrgb4444,
    Rgb565,
    Bgr565,
    Rgb24,
    Bgr24,
    Xrgb8888,
    Xbgr8888,
    Argb8888,
    Abgr8888,
    Rgba8888,
    Bgra8888,
    Xrgb2101010,
    Argb2101010,
    Rgba64Float,
}

impl PixelFormat {
    /// Significant bits per pixel.
    pub const fn bits_per_pixel(self) -> u8 {
        match self {
            PixelFormat::Unknown => 0,
            PixelFormat::Index8 | PixelFormat::Rgb332 => 8,
            PixelFormat::Xrgb4444 => 12,
            PixelFormat::Rgb565 | PixelFormat::Bgr565 => 16,
            PixelFormat::Rgb24
            | PixelFormat::Bgr24
            | PixelFormat::Xrgb8888
            | PixelFormat::Xbgr8888 => 24,
            PixelFormat::Argb8888
            | PixelFormat::Abgr8888
            | PixelFormat::Rgba8888
            | PixelFormat::Bgra8888
            | PixelFormat::Xrgb2101010
            | PixelFormat::Argb2101010 => 32,
            PixelFormat::Rgba64Float => 64,
        }
    }

    /// Storage size of one pixel in its packed layout.
    pub const fn bytes_per_pixel(self) -> u8 {
        match self {
            PixelFormat::Unknown => 0,
            PixelFormat::Index8 | PixelFormat::Rgb332 => 1,
            PixelFormat::Xrgb4444 | PixelFormat::Rgb565 | PixelFormat::Bgr565 => 2,
            PixelFormat::Rgb24 | PixelFormat::Bgr24 => 3,
            PixelFormat::Xrgb8888
            | PixelFormat::Xbgr8888
            | PixelFormat::Argb8888
            | PixelFormat::Abgr8888
            | PixelFormat::Rgba8888
            | PixelFormat::Bgra8888
            | PixelFormat::Xrgb2101010
            | PixelFormat::Argb2101010 => 4,
            PixelFormat::Rgba64Float => 8,
        }
    }

    pub const fn has_alpha(self) -> bool {
        matches!(
            self,
            PixelFormat::Argb8888
                | PixelFormat::Abgr8888
                | PixelFormat::Rgba8888
                | PixelFormat::Bgra8888
                | PixelFormat::Argb2101010
                | PixelFormat::Rgba64Float
        )
    }

    /// Best guess for a platform that only reports a colour depth.
    pub fn from_bit_depth(bits: u16) -> PixelFormat {
        match bits {
            8 => PixelFormat::Index8,
            15 | 16 => PixelFormat::Rgb565,
            24 => PixelFormat::Rgb24,
            30 => PixelFormat::Xrgb2101010,
            32 => PixelFormat::Xrgb8888,
            64 => PixelFormat::Rgba64Float,
            _ => PixelFormat::Unknown,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            PixelFormat::Unknown => "UNKNOWN",
            PixelFormat::Index8 => "INDEX8",
            PixelFormat::Rgb332 => "RGB332",
            PixelFormat::Xrgb4444 => "XRGB4444",
            PixelFormat::Rgb565 => "RGB565",
            PixelFormat::Bgr565 => "BGR565",
            PixelFormat::Rgb24 => "RGB24",
            PixelFormat::Bgr24 => "BGR24",
            PixelFormat::Xrgb8888 => "XRGB8888",
            PixelFormat::Xbgr8888 => "XBGR8888",
            PixelFormat::Argb8888 => "ARGB8888",
            PixelFormat::Abgr8888 => "ABGR8888",
            PixelFormat::Rgba8888 => "RGBA8888",
            PixelFormat::Bgra8888 => "BGRA8888",
            PixelFormat::Xrgb2101010 => "XRGB2101010",
            PixelFormat::Argb2101010 => "ARGB2101010",
            PixelFormat::Rgba64Float => "RGBA64_FLOAT",
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_size_differs_from_depth() {
        assert_eq!(PixelFormat::Xrgb8888.bits_per_pixel(), 24);
        assert_eq!(PixelFormat::Xrgb8888.bytes_per_pixel(), 4);
        assert_eq!(PixelFormat::Rgb24.bits_per_pixel(), 24);
        assert_eq!(PixelFormat::Rgb24.bytes_per_pixel(), 3);
    }

    #[test]
    fn test_from_bit_depth() {
        assert_eq!(PixelFormat::from_bit_depth(32), PixelFormat::Xrgb8888);
        assert_eq!(PixelFormat::from_bit_depth(30), PixelFormat::Xrgb2101010);
        assert_eq!(PixelFormat::from_bit_depth(7), PixelFormat::Unknown);
    }
}
