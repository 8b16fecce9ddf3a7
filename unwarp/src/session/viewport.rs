use glam::{DVec2, IVec2};

/// Magnifications reachable with the zoom tool, ascending.
pub const ZOOM_LEVELS: [f64; 23] = [
    1.0 / 72.0,
    1.0 / 48.0,
    1.0 / 32.0,
    1.0 / 24.0,
    1.0 / 16.0,
    1.0 / 12.0,
    1.0 / 8.0,
    1.0 / 6.0,
    1.0 / 4.0,
    1.0 / 3.0,
    1.0 / 2.0,
    0.75,
    1.0,
    1.5,
    2.0,
    3.0,
    4.0,
    6.0,
    8.0,
    12.0,
    16.0,
    24.0,
    32.0,
];

/// Maps canvas (screen) pixels to image pixels for one image.
///
/// `origin` is the image pixel shown at the canvas top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    level: usize,
    origin: IVec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Viewport {
    /// A viewport at the zoom level nearest to `magnification`.
    pub fn new(magnification: f64) -> Self {
        let level = ZOOM_LEVELS
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (*a - magnification)
                    .abs()
                    .total_cmp(&(*b - magnification).abs())
            })
            .map_or(0, |(i, _)| i);
        Self {
            level,
            origin: IVec2::ZERO,
        }
    }

    #[inline]
    pub fn magnification(&self) -> f64 {
        ZOOM_LEVELS[self.level]
    }

    #[inline]
    pub fn origin(&self) -> IVec2 {
        self.origin
    }

    pub fn set_origin(&mut self, origin: IVec2) {
        self.origin = origin.max(IVec2::ZERO);
    }

    pub fn to_image(&self, screen: IVec2) -> IVec2 {
        let offset = (screen.as_dvec2() / self.magnification()).floor();
        self.origin + offset.as_ivec2()
    }

    pub fn to_screen(&self, image: IVec2) -> IVec2 {
        ((image - self.origin).as_dvec2() * self.magnification())
            .floor()
            .as_ivec2()
    }

    /// One step up the ladder around the cursor. False at the top.
    pub fn zoom_in(&mut self, screen: IVec2) -> bool {
        if self.level + 1 >= ZOOM_LEVELS.len() {
            return false;
        }
        self.zoom_to(self.level + 1, screen);
        true
    }

    /// One step down the ladder around the cursor. False at the bottom.
    pub fn zoom_out(&mut self, screen: IVec2) -> bool {
        if self.level == 0 {
            return false;
        }
        self.zoom_to(self.level - 1, screen);
        true
    }

    fn zoom_to(&mut self, level: usize, screen: IVec2) {
        let screen = screen.as_dvec2();
        let anchor: DVec2 = self.origin.as_dvec2() + screen / self.magnification();
        self.level = level;
        let origin = (anchor - screen / self.magnification()).floor();
        self.origin = origin.as_ivec2().max(IVec2::ZERO);
    }

    /// Keyboard nudge distance in image pixels: one screen pixel, rounded up.
    pub fn nudge_step(&self) -> i32 {
        (1.0 / self.magnification()).ceil().max(1.0) as i32
    }
}
