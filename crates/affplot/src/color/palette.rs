//! Named palettes (qualitative) and colormaps (continuous).
//!
//! - Qualitative palettes cycle when more slots are requested than they hold.
//! - Colormaps interpolate linearly between evenly spaced anchors; used as a
//!   discrete palette they are sampled at interior points `(i+1)/(n+1)`.

use super::Rgb;
use crate::error::LedgerError;

const TAB10: [u32; 10] = [
    0x1f77b4, 0xff7f0e, 0x2ca02c, 0xd62728, 0x9467bd, 0x8c564b, 0xe377c2, 0x7f7f7f, 0xbcbd22,
    0x17becf,
];
const SET2: [u32; 8] = [
    0x66c2a5, 0xfc8d62, 0x8da0cb, 0xe78ac3, 0xa6d854, 0xffd92f, 0xe5c494, 0xb3b3b3,
];
const PASTEL: [u32; 10] = [
    0xa1c9f4, 0xffb482, 0x8de5a1, 0xff9f9b, 0xd0bbff, 0xdebb9b, 0xfab0e4, 0xcfcfcf, 0xfffea3,
    0xb9f2f0,
];

// Anchors sampled from the reference maps at 0, 1/6, ..., 1.
const FLARE: [u32; 7] = [
    0xedb081, 0xe98d6b, 0xe3685c, 0xd14a61, 0xb13c6c, 0x8f3371, 0x6c2b6d,
];
const CREST: [u32; 7] = [
    0xa5cd90, 0x79b791, 0x55a193, 0x358a93, 0x1f7090, 0x225488, 0x2c3172,
];
const VIRIDIS: [u32; 7] = [
    0x440154, 0x443983, 0x31688e, 0x21918c, 0x35b779, 0x90d743, 0xfde725,
];
const GRAY: [u32; 2] = [0x000000, 0xffffff];

fn lookup_qualitative(name: &str) -> Option<&'static [u32]> {
    match name {
        "tab10" => Some(&TAB10),
        "set2" | "Set2" => Some(&SET2),
        "pastel" => Some(&PASTEL),
        _ => None,
    }
}

fn lookup_colormap(name: &str) -> Option<&'static [u32]> {
    match name {
        "flare" => Some(&FLARE),
        "crest" => Some(&CREST),
        "viridis" => Some(&VIRIDIS),
        "gray" | "grey" => Some(&GRAY),
        _ => None,
    }
}

/// Continuous colormap over `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Colormap {
    anchors: Vec<Rgb>,
}

impl Colormap {
    pub fn named(name: &str) -> Result<Self, LedgerError> {
        let hex = lookup_colormap(name).ok_or_else(|| LedgerError::UnknownPalette(name.to_string()))?;
        Ok(Self::from_anchors(hex.iter().map(|&h| Rgb::from_hex(h)).collect()))
    }

    /// Panics with fewer than two anchors.
    pub fn from_anchors(anchors: Vec<Rgb>) -> Self {
        assert!(anchors.len() >= 2, "a colormap needs at least two anchors");
        Self { anchors }
    }

    /// Colour at `t`, clamped to `[0, 1]`. NaN maps to the lower endpoint.
    pub fn eval(&self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let segments = (self.anchors.len() - 1) as f64;
        let x = t * segments;
        let k = (x.floor() as usize).min(self.anchors.len() - 2);
        self.anchors[k].lerp(self.anchors[k + 1], x - k as f64)
    }

    #[inline]
    pub fn low(&self) -> Rgb {
        self.anchors[0]
    }

    #[inline]
    pub fn high(&self) -> Rgb {
        self.anchors[self.anchors.len() - 1]
    }
}

/// `n` discrete colours from a named palette or colormap.
pub fn discrete(name: &str, n: usize) -> Result<Vec<Rgb>, LedgerError> {
    if let Some(hex) = lookup_qualitative(name) {
        return Ok((0..n).map(|i| Rgb::from_hex(hex[i % hex.len()])).collect());
    }
    let cmap = Colormap::named(name)?;
    Ok((0..n)
        .map(|i| cmap.eval((i + 1) as f64 / (n + 1) as f64))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualitative_palettes_cycle() {
        let p = discrete("tab10", 12).unwrap();
        assert_eq!(p.len(), 12);
        assert_eq!(p[0], Rgb::from_hex(0x1f77b4));
        assert_eq!(p[10], p[0]);
        assert_eq!(p[11], p[1]);
    }

    #[test]
    fn colormap_sampling_avoids_endpoints() {
        let cmap = Colormap::named("gray").unwrap();
        let p = discrete("gray", 3).unwrap();
        assert_eq!(p[1], cmap.eval(0.5));
        assert!(p[0].r > 0.0 && p[2].r < 1.0);
    }

    #[test]
    fn eval_hits_anchors_and_clamps() {
        let cmap = Colormap::named("viridis").unwrap();
        assert_eq!(cmap.eval(0.0), cmap.low());
        assert_eq!(cmap.eval(1.0), cmap.high());
        assert_eq!(cmap.eval(-3.0), cmap.low());
        assert_eq!(cmap.eval(7.0), cmap.high());
        let mid = Colormap::named("gray").unwrap().eval(0.25);
        assert!((mid.r - 0.25).abs() < 1e-12);
    }

    #[test]
    fn unknown_names_are_errors() {
        assert_eq!(
            discrete("nope", 3).unwrap_err(),
            LedgerError::UnknownPalette("nope".into())
        );
        assert!(Colormap::named("tab10").is_err());
    }
}
