use serde::{Deserialize, Serialize};

/// Golden-angle fraction used to step hue and saturation.
pub const GOLDEN_ANGLE: f32 = 0.38197;

/// Display colour of a landmark, full brightness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkColor {
    pub hue: f32,
    pub saturation: f32,
}

impl LandmarkColor {
    pub fn new(hue: f32, saturation: f32) -> Self {
        Self { hue, saturation }
    }

    /// HSB (brightness 1) to 8-bit RGB.
    pub fn to_rgb(&self) -> [u8; 3] {
        let brightness = 1.0f32;
        if self.saturation <= 0.0 {
            let v = (brightness * 255.0 + 0.5) as u8;
            return [v, v, v];
        }

        let h = (self.hue - self.hue.floor()) * 6.0;
        let sector = h.floor();
        let f = h - sector;
        let p = brightness * (1.0 - self.saturation);
        let q = brightness * (1.0 - self.saturation * f);
        let t = brightness * (1.0 - self.saturation * (1.0 - f));

        let (r, g, b) = match sector as u32 {
            0 => (brightness, t, p),
            1 => (q, brightness, p),
            2 => (p, brightness, t),
            3 => (p, q, brightness),
            4 => (t, p, brightness),
            _ => (brightness, p, q),
        };

        let to_u8 = |c: f32| (c * 255.0 + 0.5) as u8;
        [to_u8(r), to_u8(g), to_u8(b)]
    }
}

/// Running hue/saturation state handing out well separated colours
/// without a fixed palette.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorCycle {
    hue: f32,
    saturation: f32,
}

impl Default for ColorCycle {
    fn default() -> Self {
        Self::starting_at(0.0, 0.5)
    }
}

impl ColorCycle {
    pub fn starting_at(hue: f32, saturation: f32) -> Self {
        Self { hue, saturation }
    }

    /// Returns the current colour and advances the state.
    pub fn next_color(&mut self) -> LandmarkColor {
        let color = LandmarkColor::new(self.hue, self.saturation);

        self.hue += GOLDEN_ANGLE;
        if self.hue > 1.0 {
            self.hue -= 1.0;
        }
        self.saturation += GOLDEN_ANGLE;
        if self.saturation > 1.0 {
            self.saturation -= 1.0;
        }
        self.saturation = 0.5 * self.saturation + 0.5;

        color
    }

    pub fn peek(&self) -> LandmarkColor {
        LandmarkColor::new(self.hue, self.saturation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hue_steps_by_golden_angle() {
        let mut cycle = ColorCycle::default();
        let colors: Vec<_> = (0..8).map(|_| cycle.next_color()).collect();
        for pair in colors.windows(2) {
            let step = (pair[1].hue - pair[0].hue).rem_euclid(1.0);
            assert!((step - GOLDEN_ANGLE).abs() < 1e-5, "step {step}");
        }
    }

    #[test]
    fn saturation_stays_in_upper_half() {
        let mut cycle = ColorCycle::default();
        for _ in 0..100 {
            let c = cycle.next_color();
            assert!((0.5..=1.0).contains(&c.saturation), "{}", c.saturation);
            assert!((0.0..=1.0).contains(&c.hue), "{}", c.hue);
        }
    }

    #[test]
    fn primary_hues() {
        assert_eq!(LandmarkColor::new(0.0, 1.0).to_rgb(), [255, 0, 0]);
        assert_eq!(LandmarkColor::new(1.0 / 3.0, 1.0).to_rgb(), [0, 255, 0]);
        assert_eq!(LandmarkColor::new(2.0 / 3.0, 1.0).to_rgb(), [0, 0, 255]);
        assert_eq!(LandmarkColor::new(0.0, 0.5).to_rgb(), [255, 128, 128]);
    }
}
