//! Color palettes
//!
//! Fixed gradients sampled by progress in `[0, 1]`.

use crate::renderer::Rgba;

/// 8-bit RGB palette entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Color with the given opacity
    pub fn alpha(self, alpha: f32) -> Rgba {
        Rgba::from_rgb8(self.r, self.g, self.b, alpha)
    }
}

/// Flame gradient, hottest (center, white) to coolest (dark red)
pub const FLAME: [Rgb8; 11] = [
    Rgb8::new(255, 255, 255),
    Rgb8::new(255, 255, 180),
    Rgb8::new(255, 240, 120),
    Rgb8::new(255, 210, 70),
    Rgb8::new(255, 180, 40),
    Rgb8::new(255, 160, 20),
    Rgb8::new(255, 140, 10),
    Rgb8::new(255, 100, 0),
    Rgb8::new(255, 70, 0),
    Rgb8::new(255, 40, 0),
    Rgb8::new(200, 20, 0),
];

/// Smoke grays
pub const SMOKE: [Rgb8; 5] = [
    Rgb8::new(50, 50, 50),
    Rgb8::new(70, 70, 70),
    Rgb8::new(90, 90, 90),
    Rgb8::new(100, 100, 100),
    Rgb8::new(30, 30, 30),
];

/// First flame index used for embers (orange to red)
pub const EMBER_FIRST: usize = 7;
/// Number of flame entries embers and sparks pick from
pub const EMBER_SPAN: usize = 3;
pub const SPARK_SPAN: usize = 3;

/// `floor(progress * len)` clamped to `[0, len - 1]`
pub fn index_for(progress: f32, len: usize) -> usize {
    if len == 0 || progress.is_nan() {
        return 0;
    }
    let scaled = (progress * len as f32).floor();
    if scaled <= 0.0 {
        0
    } else {
        (scaled as usize).min(len - 1)
    }
}

/// Flame color at `progress` (0 = white hot, 1 = dark red)
pub fn flame_at(progress: f32) -> (usize, Rgb8) {
    let index = index_for(progress, FLAME.len());
    (index, FLAME[index])
}

/// Smoke color at `progress`
pub fn smoke_at(progress: f32) -> Rgb8 {
    SMOKE[index_for(progress, SMOKE.len())]
}
