//! Pixel-space helpers shared by landmarks, masks and the viewport.

use std::fmt;
use std::str::FromStr;

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Dimensions of a bound image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn contains(&self, p: IVec2) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as u32) < self.width && (p.y as u32) < self.height
    }

    /// Clamps `p` into `[0, width-1] x [0, height-1]`.
    #[inline]
    pub fn clamp(&self, p: IVec2) -> IVec2 {
        let max_x = self.width.saturating_sub(1) as i32;
        let max_y = self.height.saturating_sub(1) as i32;
        IVec2::new(p.x.clamp(0, max_x), p.y.clamp(0, max_y))
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected WIDTHxHEIGHT, got '{0}'")]
pub struct ParseSizeError(String);

impl FromStr for ImageSize {
    type Err = ParseSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSizeError(s.to_string());
        let (w, h) = s.trim().split_once(|c: char| c == 'x' || c == 'X').ok_or_else(err)?;
        let width = w.trim().parse().map_err(|_| err())?;
        let height = h.trim().parse().map_err(|_| err())?;
        Ok(Self { width, height })
    }
}

/// Maps a pixel of an image of size `from` onto the proportional pixel of
/// an image of size `to`. Integer division truncates.
#[inline]
pub fn rescale_between(p: IVec2, from: ImageSize, to: ImageSize) -> IVec2 {
    if from.is_empty() {
        return p;
    }
    let x = p.x as i64 * to.width as i64 / from.width as i64;
    let y = p.y as i64 * to.height as i64 / from.height as i64;
    IVec2::new(x as i32, y as i32)
}

#[inline]
pub fn squared_distance(a: IVec2, b: IVec2) -> f64 {
    let dx = (a.x - b.x) as f64;
    let dy = (a.y - b.y) as f64;
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_into_bounds() {
        let size = ImageSize::new(100, 50);
        assert_eq!(size.clamp(IVec2::new(150, -5)), IVec2::new(99, 0));
        assert_eq!(size.clamp(IVec2::new(-1, 80)), IVec2::new(0, 49));
        assert_eq!(size.clamp(IVec2::new(10, 10)), IVec2::new(10, 10));
    }

    #[test]
    fn rescale_truncates() {
        let from = ImageSize::new(256, 256);
        let to = ImageSize::new(100, 200);
        assert_eq!(rescale_between(IVec2::new(200, 6), from, to), IVec2::new(78, 4));
        assert_eq!(rescale_between(IVec2::new(11, 11), from, from), IVec2::new(11, 11));
    }

    #[test]
    fn parse_size() {
        assert_eq!("640x480".parse::<ImageSize>().unwrap(), ImageSize::new(640, 480));
        assert_eq!(" 12 X 7 ".parse::<ImageSize>().unwrap(), ImageSize::new(12, 7));
        assert!("640".parse::<ImageSize>().is_err());
        assert!("ax3".parse::<ImageSize>().is_err());
        assert_eq!(ImageSize::new(3, 4).to_string(), "3x4");
    }

    #[test]
    fn contains_checks_both_axes() {
        let size = ImageSize::new(4, 2);
        assert!(size.contains(IVec2::new(3, 1)));
        assert!(!size.contains(IVec2::new(4, 1)));
        assert!(!size.contains(IVec2::new(0, -1)));
    }
}
