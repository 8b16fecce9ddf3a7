//! Ordered landmark lists for one image, and the paired source/target view.
//!
//! Insertion order is the correspondence key: index `i` of the source set
//! matches index `i` of the target set.

mod color;
pub mod file;
mod pairs;

#[cfg(test)]
mod tests;

use glam::IVec2;

use crate::geometry::{squared_distance, ImageSize};

pub use color::{ColorCycle, LandmarkColor, GOLDEN_ANGLE};
pub use pairs::{
    add_linked_point, next_linked, remove_current_linked, remove_linked, select_linked,
    LandmarkPairs, Side,
};

/// A user-placed point in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub position: IVec2,
    pub color: LandmarkColor,
}

/// Landmarks placed on one image.
#[derive(Debug, Clone)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
    current: Option<usize>,
    colors: ColorCycle,
    size: ImageSize,
}

impl LandmarkSet {
    pub fn new(size: ImageSize) -> Self {
        Self::with_colors(size, ColorCycle::default())
    }

    pub fn with_colors(size: ImageSize, colors: ColorCycle) -> Self {
        Self {
            points: Vec::new(),
            current: None,
            colors,
            size,
        }
    }

    /// Size of the bound image, used for clamping moves.
    #[inline]
    pub fn size(&self) -> ImageSize {
        self.size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Landmark> {
        self.current.and_then(|idx| self.points.get(idx))
    }

    pub fn get(&self, idx: usize) -> Option<&Landmark> {
        self.points.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Landmark> {
        self.points.iter()
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    pub fn colors(&self) -> impl Iterator<Item = LandmarkColor> + '_ {
        self.points.iter().map(|l| l.color)
    }

    pub fn positions(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.points.iter().map(|l| l.position)
    }

    /// Indices past the end make the current point absent.
    pub fn set_current(&mut self, idx: Option<usize>) {
        self.current = idx.filter(|&i| i < self.points.len());
    }

    /// Appends a landmark and makes it current. Never fails.
    pub fn add_point(&mut self, position: IVec2) -> usize {
        let color = self.colors.next_color();
        self.points.push(Landmark { position, color });
        let idx = self.points.len() - 1;
        self.current = Some(idx);
        idx
    }

    /// Removes the current landmark. Without one, nothing changes.
    pub fn remove_current(&mut self) -> Option<Landmark> {
        let idx = self.current?;
        self.remove_point(idx)
    }

    /// Removes the landmark at `idx`; the last landmark becomes current.
    /// An index past the end changes nothing.
    pub fn remove_point(&mut self, idx: usize) -> Option<Landmark> {
        if idx >= self.points.len() {
            return None;
        }
        let removed = self.points.remove(idx);
        self.reset_current();
        Some(removed)
    }

    pub fn remove_all(&mut self) {
        self.points.clear();
        self.current = None;
    }

    /// Moves the current landmark, clamped to the image.
    pub fn move_current(&mut self, position: IVec2) -> bool {
        let size = self.size;
        match self.current_mut() {
            Some(landmark) => {
                landmark.position = size.clamp(position);
                true
            }
            None => false,
        }
    }

    /// Moves the current landmark by `delta`, clamped to the image.
    pub fn nudge_current(&mut self, delta: IVec2) -> bool {
        match self.current() {
            Some(landmark) => {
                let target = landmark.position + delta;
                self.move_current(target)
            }
            None => false,
        }
    }

    /// Advances the current index circularly.
    pub fn next_point(&mut self) {
        if self.points.is_empty() {
            return;
        }
        self.current = match self.current {
            Some(idx) if idx + 1 < self.points.len() => Some(idx + 1),
            _ => Some(0),
        };
    }

    /// Index of the landmark nearest to `p`, lowest index on ties.
    /// The current index when the set is empty.
    pub fn find_closest(&self, p: IVec2) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, landmark) in self.points.iter().enumerate() {
            let distance = squared_distance(landmark.position, p);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((idx, distance));
            }
        }
        best.map(|(idx, _)| idx).or(self.current)
    }

    /// Makes the landmark nearest to `p` current.
    pub fn select_closest(&mut self, p: IVec2) -> Option<usize> {
        let closest = self.find_closest(p);
        self.current = closest;
        closest
    }

    fn current_mut(&mut self) -> Option<&mut Landmark> {
        self.current.and_then(|idx| self.points.get_mut(idx))
    }

    fn reset_current(&mut self) {
        self.current = self.points.len().checked_sub(1);
    }
}
