use glam::IVec2;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use super::{ColorCycle, Landmark, LandmarkSet};
use crate::error::{Error, Result};
use crate::geometry::{rescale_between, ImageSize};

/// Which image of the registration pair.
#[derive(Debug, Display, EnumIter, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Source,
    Target,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::Source => Side::Target,
            Side::Target => Side::Source,
        }
    }
}

/// Adds `p` to `main` and its proportional counterpart to `paired`.
pub fn add_linked_point(main: &mut LandmarkSet, paired: &mut LandmarkSet, p: IVec2) -> usize {
    let idx = main.add_point(p);
    let mirrored = rescale_between(p, main.size(), paired.size());
    let paired_idx = paired.add_point(mirrored);
    debug_assert_eq!(idx, paired_idx);
    idx
}

/// Removes index `idx` from both sets.
pub fn remove_linked(
    main: &mut LandmarkSet,
    paired: &mut LandmarkSet,
    idx: usize,
) -> Option<(Landmark, Landmark)> {
    let a = main.remove_point(idx);
    let b = paired.remove_point(idx);
    a.zip(b)
}

/// Removes the current landmark of `main` and the same index of `paired`.
pub fn remove_current_linked(
    main: &mut LandmarkSet,
    paired: &mut LandmarkSet,
) -> Option<(Landmark, Landmark)> {
    let idx = main.current_index()?;
    remove_linked(main, paired, idx)
}

/// Makes `idx` current in both sets.
pub fn select_linked(main: &mut LandmarkSet, paired: &mut LandmarkSet, idx: Option<usize>) {
    main.set_current(idx);
    paired.set_current(main.current_index());
}

pub fn next_linked(main: &mut LandmarkSet, paired: &mut LandmarkSet) {
    main.next_point();
    paired.next_point();
}

/// The source and target landmark sets, kept the same length.
#[derive(Debug, Clone)]
pub struct LandmarkPairs {
    source: LandmarkSet,
    target: LandmarkSet,
}

impl LandmarkPairs {
    pub fn new(source_size: ImageSize, target_size: ImageSize) -> Self {
        Self::with_colors(source_size, target_size, ColorCycle::default())
    }

    pub fn with_colors(source_size: ImageSize, target_size: ImageSize, colors: ColorCycle) -> Self {
        Self {
            source: LandmarkSet::with_colors(source_size, colors),
            target: LandmarkSet::with_colors(target_size, colors),
        }
    }

    pub fn source(&self) -> &LandmarkSet {
        &self.source
    }

    pub fn target(&self) -> &LandmarkSet {
        &self.target
    }

    pub fn set(&self, side: Side) -> &LandmarkSet {
        match side {
            Side::Source => &self.source,
            Side::Target => &self.target,
        }
    }

    /// Mutable access to the set on `side` and the one paired with it.
    pub fn split_mut(&mut self, side: Side) -> (&mut LandmarkSet, &mut LandmarkSet) {
        match side {
            Side::Source => (&mut self.source, &mut self.target),
            Side::Target => (&mut self.target, &mut self.source),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.source.len(), self.target.len());
        self.source.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Landmark positions as `(source, target)` pairs, in order.
    pub fn iter_pairs(&self) -> impl Iterator<Item = (IVec2, IVec2)> + '_ {
        self.source.positions().zip(self.target.positions())
    }

    /// Adds a landmark clicked on `side`, mirrored onto the other image.
    pub fn add(&mut self, side: Side, p: IVec2) -> usize {
        let (main, paired) = self.split_mut(side);
        let idx = add_linked_point(main, paired, p);
        tracing::debug!(
            "Landmark {idx} added on {side} at ({}, {}), {} pairs",
            p.x,
            p.y,
            self.len()
        );
        idx
    }

    /// Adds a pair with both positions given explicitly.
    pub fn push_pair(&mut self, source: IVec2, target: IVec2) -> usize {
        let idx = self.source.add_point(source);
        self.target.add_point(target);
        idx
    }

    pub fn remove(&mut self, idx: usize) -> Option<(Landmark, Landmark)> {
        let removed = remove_linked(&mut self.source, &mut self.target, idx);
        if removed.is_some() {
            tracing::debug!("Landmark {idx} removed, {} pairs", self.len());
        }
        removed
    }

    /// Removes the current pair of `side`.
    pub fn remove_current(&mut self, side: Side) -> Option<(Landmark, Landmark)> {
        let (main, paired) = self.split_mut(side);
        let removed = remove_current_linked(main, paired);
        if removed.is_some() {
            tracing::debug!("Current landmark removed on {side}, {} pairs", self.len());
        }
        removed
    }

    /// Selects the landmark nearest to `p` on `side` and mirrors the index.
    pub fn select_closest(&mut self, side: Side, p: IVec2) -> Option<usize> {
        let (main, paired) = self.split_mut(side);
        let idx = main.find_closest(p);
        select_linked(main, paired, idx);
        idx
    }

    /// Removes the pair whose landmark on `side` is nearest to `p`.
    pub fn remove_closest(&mut self, side: Side, p: IVec2) -> Option<(Landmark, Landmark)> {
        let idx = self.set(side).find_closest(p)?;
        self.remove(idx)
    }

    pub fn next(&mut self) {
        next_linked(&mut self.source, &mut self.target);
    }

    pub fn move_current(&mut self, side: Side, p: IVec2) -> bool {
        self.split_mut(side).0.move_current(p)
    }

    pub fn nudge_current(&mut self, side: Side, delta: IVec2) -> bool {
        self.split_mut(side).0.nudge_current(delta)
    }

    pub fn remove_all(&mut self) {
        self.source.remove_all();
        self.target.remove_all();
        tracing::info!("All landmarks cleared");
    }

    /// Replaces both sets with the given lists, in order.
    ///
    /// Mismatched lengths fail and leave the current landmarks untouched.
    pub fn replace(&mut self, source: &[IVec2], target: &[IVec2]) -> Result<()> {
        if source.len() != target.len() {
            return Err(Error::CountMismatch {
                source_count: source.len(),
                target_count: target.len(),
            });
        }
        self.remove_all();
        for (&s, &t) in source.iter().zip(target) {
            self.push_pair(s, t);
        }
        Ok(())
    }

    /// Builds pairs from two independent point lists, e.g. point selections
    /// made on each image before the session started.
    pub fn from_point_lists(
        source_size: ImageSize,
        target_size: ImageSize,
        source: &[IVec2],
        target: &[IVec2],
    ) -> Result<Self> {
        let mut pairs = Self::new(source_size, target_size);
        pairs.replace(source, target)?;
        Ok(pairs)
    }

    /// Exchanges the roles of source and target.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.source, &mut self.target);
    }
}
