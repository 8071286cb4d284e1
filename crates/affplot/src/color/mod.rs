//! Colours, palettes, and the ledgers that assign colours to leaves.

pub mod ledger;
pub mod palette;

pub use ledger::{
    Bucketing, ColorLedger, ContinuousCfg, ContinuousLedger, DiscreteCfg, DiscreteLedger, Mapping,
    MAX_ABSOLUTE_KEY,
};
pub use palette::Colormap;

use serde::{Deserialize, Serialize};

/// Opaque RGB colour with components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    #[inline]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// From `0xRRGGBB`.
    pub fn from_hex(hex: u32) -> Self {
        let c = |shift: u32| ((hex >> shift) & 0xFF) as f64 / 255.0;
        Self::new(c(16), c(8), c(0))
    }

    /// `#rrggbb`, rounding each channel.
    pub fn to_hex_string(self) -> String {
        let q = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", q(self.r), q(self.g), q(self.b))
    }

    /// Linear blend; exact at `t = 0` and `t = 1`.
    #[inline]
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let s = 1.0 - t;
        Rgb::new(
            self.r * s + other.r * t,
            self.g * s + other.g * t,
            self.b * s + other.b * t,
        )
    }

    #[inline]
    pub fn channels(self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }
}
