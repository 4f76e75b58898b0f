//! Integer screen-space geometry shared by displays and windows.

use std::ops::{Add, Mul, Sub};

/// A position in desktop coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    pub const fn new(x: T, y: T) -> Self {
        Point { x, y }
    }
}

impl<T: Add<Output = T>> Add for Point<T> {
    type Output = Point<T>;

    fn add(self, rhs: Self) -> Self::Output {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T: Sub<Output = T>> Sub for Point<T> {
    type Output = Point<T>;

    fn sub(self, rhs: Self) -> Self::Output {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl<T> Size<T> {
    pub const fn new(width: T, height: T) -> Self {
        Size { width, height }
    }

    pub fn cast<U: From<T>>(self) -> Size<U> {
        Size {
            width: U::from(self.width),
            height: U::from(self.height),
        }
    }
}

impl Size<u32> {
    /// Scale by a pixel density, rounding to the nearest pixel.
    pub fn scale(self, factor: f32) -> Size<u32> {
        Size::new(
            (self.width as f32 * factor).round() as u32,
            (self.height as f32 * factor).round() as u32,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl<T: Mul + Copy> Mul<T> for Size<T> {
    type Output = Size<<T as Mul>::Output>;

    fn mul(self, rhs: T) -> Self::Output {
        Size {
            width: self.width * rhs,
            height: self.height * rhs,
        }
    }
}

/// An axis-aligned rectangle in desktop coordinates.
///
/// `x`/`y` is the top-left corner; the right and bottom edges are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Rect { x, y, width, height }
    }

    pub fn from_origin_size(origin: Point<i32>, size: Size<u32>) -> Self {
        Rect::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point<i32> {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size<u32> {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn center(&self) -> Point<i32> {
        Point::new(
            (self.x as i64 + self.width as i64 / 2) as i32,
            (self.y as i64 + self.height as i64 / 2) as i32,
        )
    }

    pub fn contains(&self, point: Point<i32>) -> bool {
        let (px, py) = (point.x as i64, point.y as i64);
        px >= self.x as i64 && py >= self.y as i64 && px < self.right() && py < self.bottom()
    }

    /// Overlapping region of two rectangles, `None` when they do not overlap.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = (self.x as i64).max(other.x as i64);
        let top = (self.y as i64).max(other.y as i64);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right <= left || bottom <= top {
            return None;
        }

        Some(Rect::new(
            left as i32,
            top as i32,
            (right - left) as u32,
            (bottom - top) as u32,
        ))
    }

    /// Origin that centers a rectangle of `size` inside this one.
    pub fn centered(&self, size: Size<u32>) -> Point<i32> {
        let dx = (self.width as i64 - size.width as i64) / 2;
        let dy = (self.height as i64 - size.height as i64) / 2;
        Point::new((self.x as i64 + dx) as i32, (self.y as i64 + dy) as i32)
    }
}

impl<T> From<Point<T>> for mint::Point2<T> {
    fn from(point: Point<T>) -> Self {
        mint::Point2 { x: point.x, y: point.y }
    }
}

impl<T> From<mint::Point2<T>> for Point<T> {
    fn from(point: mint::Point2<T>) -> Self {
        Point::new(point.x, point.y)
    }
}

impl<T> From<Size<T>> for mint::Vector2<T> {
    fn from(size: Size<T>) -> Self {
        mint::Vector2 { x: size.width, y: size.height }
    }
}

impl<T> From<mint::Vector2<T>> for Size<T> {
    fn from(size: mint::Vector2<T>) -> Self {
        Size::new(size.x, size.y)
    }
}
