//! Colour ledgers: fit a colour scale over a tree's leaves, then colour leaves.
//!
//! Lifecycle
//! - `fit` derives the scale from all terminals (overwrites a previous fit).
//! - `map_color` and `create_legend` only read the fitted state; using them
//!   before `fit` is `LedgerError::NotFitted`.
//!
//! Variants
//! - `DiscreteLedger`: category per leaf, keyed by the bucketed bias sum.
//! - `ContinuousLedger`: intensity per leaf, `||M||_F + w·||bias||_2`.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::palette::{self, Colormap};
use super::Rgb;
use crate::error::LedgerError;
use crate::surface::{Legend, LegendEntry, LegendPosition, Placement, Surface};
use crate::tree::{AffFunc, Partition};

/// The capability set the renderer relies on.
pub trait ColorLedger {
    fn fit(&mut self, tree: &dyn Partition) -> Result<(), LedgerError>;
    fn is_fitted(&self) -> bool;
    fn map_color(&self, func: &AffFunc) -> Result<Rgb, LedgerError>;
    fn create_legend(&self, surface: &mut dyn Surface) -> Result<(), LedgerError>;
}

fn terminal_funcs(tree: &dyn Partition) -> Result<Vec<&AffFunc>, LedgerError> {
    let funcs: Vec<&AffFunc> = tree.terminals().into_iter().filter_map(|n| n.func()).collect();
    if funcs.is_empty() {
        return Err(LedgerError::NoLeaves);
    }
    Ok(funcs)
}

/// How a palette slot is derived from the set of observed keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mapping {
    /// Key `k` always uses slot `k`; stable across trees.
    #[default]
    Absolute,
    /// Keys are packed densely in ascending order.
    Relative,
}

/// Real bias sum to integer key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Bucketing {
    #[default]
    Round,
    Truncate,
}

impl Bucketing {
    /// NaN and infinite sums have no bucket.
    #[inline]
    pub fn key(self, value: f64) -> Result<i64, LedgerError> {
        if !value.is_finite() {
            return Err(LedgerError::NonFiniteKey(value));
        }
        Ok(match self {
            Bucketing::Round => value.round() as i64,
            Bucketing::Truncate => value.trunc() as i64,
        })
    }
}

/// Largest key absolute mapping will allocate a palette slot for.
pub const MAX_ABSOLUTE_KEY: i64 = 1 << 12;

#[derive(Clone, Debug)]
pub struct DiscreteCfg {
    pub palette: String,
    /// Legend labels per key; missing keys are labelled with the number.
    pub names: BTreeMap<i64, String>,
    pub mapping: Mapping,
    /// Explicit palette size.
    pub num: Option<usize>,
    pub title: Option<String>,
    pub position: LegendPosition,
    pub bucketing: Bucketing,
}

impl Default for DiscreteCfg {
    fn default() -> Self {
        Self {
            palette: "tab10".to_string(),
            names: BTreeMap::new(),
            mapping: Mapping::Absolute,
            num: None,
            title: None,
            position: LegendPosition::Right,
            bucketing: Bucketing::Round,
        }
    }
}

#[derive(Clone, Debug)]
struct DiscreteFit {
    palette: Vec<Rgb>,
    keys: BTreeSet<i64>,
}

#[derive(Clone, Debug, Default)]
pub struct DiscreteLedger {
    cfg: DiscreteCfg,
    fitted: Option<DiscreteFit>,
}

impl DiscreteLedger {
    pub fn new(cfg: DiscreteCfg) -> Self {
        Self { cfg, fitted: None }
    }

    #[inline]
    pub fn cfg(&self) -> &DiscreteCfg {
        &self.cfg
    }

    /// Bucket key of a leaf.
    #[inline]
    pub fn key(&self, func: &AffFunc) -> Result<i64, LedgerError> {
        self.cfg.bucketing.key(func.bias.sum())
    }

    pub fn palette(&self) -> Option<&[Rgb]> {
        self.fitted.as_ref().map(|f| f.palette.as_slice())
    }

    /// Distinct keys observed during fit, ascending.
    pub fn keys(&self) -> Option<impl Iterator<Item = i64> + '_> {
        self.fitted.as_ref().map(|f| f.keys.iter().copied())
    }

    fn slot(&self, fit: &DiscreteFit, key: i64) -> Result<usize, LedgerError> {
        if !fit.keys.contains(&key) {
            return Err(LedgerError::UnknownKey(key));
        }
        Ok(match self.cfg.mapping {
            Mapping::Absolute => key as usize,
            Mapping::Relative => fit.keys.range(..key).count(),
        })
    }
}

impl ColorLedger for DiscreteLedger {
    fn fit(&mut self, tree: &dyn Partition) -> Result<(), LedgerError> {
        let funcs = terminal_funcs(tree)?;
        let keys = funcs
            .iter()
            .map(|f| self.key(f))
            .collect::<Result<BTreeSet<i64>, _>>()?;
        let (min, max) = match (keys.first(), keys.last()) {
            (Some(&lo), Some(&hi)) => (lo, hi),
            _ => return Err(LedgerError::NoLeaves),
        };
        let required = match self.cfg.mapping {
            Mapping::Absolute => {
                if min < 0 {
                    return Err(LedgerError::NegativeKey(min));
                }
                if max > MAX_ABSOLUTE_KEY {
                    return Err(LedgerError::KeyTooLarge {
                        key: max,
                        max: MAX_ABSOLUTE_KEY,
                    });
                }
                max as usize + 1
            }
            Mapping::Relative => keys.len(),
        };
        let size = self.cfg.num.unwrap_or(required);
        if size < required {
            return Err(LedgerError::PaletteTooSmall {
                size,
                slot: required - 1,
            });
        }
        let palette = palette::discrete(&self.cfg.palette, size)?;
        debug!(
            leaves = funcs.len(),
            distinct = keys.len(),
            max_key = max,
            palette = size,
            "discrete ledger fitted"
        );
        self.fitted = Some(DiscreteFit { palette, keys });
        Ok(())
    }

    fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    fn map_color(&self, func: &AffFunc) -> Result<Rgb, LedgerError> {
        let fit = self.fitted.as_ref().ok_or(LedgerError::NotFitted)?;
        let slot = self.slot(fit, self.key(func)?)?;
        Ok(fit.palette[slot])
    }

    fn create_legend(&self, surface: &mut dyn Surface) -> Result<(), LedgerError> {
        let fit = self.fitted.as_ref().ok_or(LedgerError::NotFitted)?;
        let mut entries = Vec::with_capacity(fit.keys.len());
        for &key in &fit.keys {
            let label = self
                .cfg
                .names
                .get(&key)
                .cloned()
                .unwrap_or_else(|| key.to_string());
            entries.push(LegendEntry {
                label,
                color: fit.palette[self.slot(fit, key)?],
            });
        }
        let placement = Placement::for_position(self.cfg.position, entries.len());
        surface.set_legend(Legend {
            title: self.cfg.title.clone(),
            entries,
            placement,
        });
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct ContinuousCfg {
    pub colormap: String,
    /// Weight of the bias norm in the leaf score.
    pub bias_weight: f64,
    pub title: Option<String>,
    pub position: LegendPosition,
}

impl Default for ContinuousCfg {
    fn default() -> Self {
        Self {
            colormap: "flare".to_string(),
            bias_weight: 0.2,
            title: None,
            position: LegendPosition::Right,
        }
    }
}

#[derive(Clone, Debug)]
struct ContinuousFit {
    cmap: Colormap,
    vmin: f64,
    vmax: f64,
}

#[derive(Clone, Debug, Default)]
pub struct ContinuousLedger {
    cfg: ContinuousCfg,
    fitted: Option<ContinuousFit>,
}

impl ContinuousLedger {
    pub fn new(cfg: ContinuousCfg) -> Self {
        Self { cfg, fitted: None }
    }

    #[inline]
    pub fn cfg(&self) -> &ContinuousCfg {
        &self.cfg
    }

    /// `||M||_F + bias_weight · ||bias||_2`.
    #[inline]
    pub fn score(&self, func: &AffFunc) -> f64 {
        func.mat.norm() + self.cfg.bias_weight * func.bias.norm()
    }

    /// Fitted `(min, max)` score.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.fitted.as_ref().map(|f| (f.vmin, f.vmax))
    }

    pub fn colormap(&self) -> Option<&Colormap> {
        self.fitted.as_ref().map(|f| &f.cmap)
    }
}

impl ColorLedger for ContinuousLedger {
    fn fit(&mut self, tree: &dyn Partition) -> Result<(), LedgerError> {
        let funcs = terminal_funcs(tree)?;
        let cmap = Colormap::named(&self.cfg.colormap)?;
        let (vmin, vmax) = funcs
            .iter()
            .map(|f| self.score(f))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
                (lo.min(s), hi.max(s))
            });
        debug!(leaves = funcs.len(), vmin, vmax, "continuous ledger fitted");
        self.fitted = Some(ContinuousFit { cmap, vmin, vmax });
        Ok(())
    }

    fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    fn map_color(&self, func: &AffFunc) -> Result<Rgb, LedgerError> {
        let fit = self.fitted.as_ref().ok_or(LedgerError::NotFitted)?;
        let span = fit.vmax - fit.vmin;
        let t = if span > 0.0 {
            (self.score(func) - fit.vmin) / span
        } else {
            0.0
        };
        Ok(fit.cmap.eval(t))
    }

    /// No legend: a continuous scale is shown with a colourbar by the caller.
    fn create_legend(&self, _surface: &mut dyn Surface) -> Result<(), LedgerError> {
        if self.fitted.is_none() {
            return Err(LedgerError::NotFitted);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Interval;
    use crate::surface::Axes2;
    use crate::testutil::{leaf, tree_with_leaves};
    use nalgebra::{dmatrix, dvector};

    fn axes() -> Axes2 {
        Axes2::new(Interval::new(0.0, 1.0), Interval::new(0.0, 1.0))
    }

    #[test]
    fn absolute_mapping_indexes_palette_by_key() {
        let tree = tree_with_leaves(vec![leaf(3.0), leaf(0.0), leaf(1.2), leaf(3.0)]);
        let mut ledger = DiscreteLedger::default();
        ledger.fit(&tree).unwrap();
        let palette = ledger.palette().unwrap().to_vec();
        assert_eq!(palette.len(), 4);
        assert_eq!(ledger.map_color(&leaf(0.0)).unwrap(), palette[0]);
        assert_eq!(ledger.map_color(&leaf(1.2)).unwrap(), palette[1]);
        assert_eq!(ledger.map_color(&leaf(2.9)).unwrap(), palette[3]);
        // key 2 lies inside the palette but was never observed
        assert_eq!(
            ledger.map_color(&leaf(2.0)).unwrap_err(),
            LedgerError::UnknownKey(2)
        );
    }

    #[test]
    fn relative_mapping_packs_distinct_keys() {
        let tree = tree_with_leaves(vec![leaf(7.0), leaf(2.0), leaf(7.0), leaf(-4.0)]);
        let mut ledger = DiscreteLedger::new(DiscreteCfg {
            mapping: Mapping::Relative,
            ..DiscreteCfg::default()
        });
        ledger.fit(&tree).unwrap();
        let palette = ledger.palette().unwrap().to_vec();
        assert_eq!(palette.len(), 3);
        assert_eq!(ledger.map_color(&leaf(-4.0)).unwrap(), palette[0]);
        assert_eq!(ledger.map_color(&leaf(2.0)).unwrap(), palette[1]);
        assert_eq!(ledger.map_color(&leaf(7.0)).unwrap(), palette[2]);
        assert_eq!(ledger.keys().unwrap().collect::<Vec<_>>(), vec![-4, 2, 7]);
    }

    #[test]
    fn bucketing_is_configurable() {
        let round = DiscreteLedger::default();
        let trunc = DiscreteLedger::new(DiscreteCfg {
            bucketing: Bucketing::Truncate,
            ..DiscreteCfg::default()
        });
        assert_eq!(round.key(&leaf(1.7)), Ok(2));
        assert_eq!(trunc.key(&leaf(1.7)), Ok(1));
        assert_eq!(trunc.key(&leaf(-0.5)), Ok(0));
    }

    #[test]
    fn fit_rejects_what_absolute_mode_cannot_index() {
        let mut ledger = DiscreteLedger::default();
        let tree = tree_with_leaves(vec![leaf(-1.0), leaf(1.0)]);
        assert_eq!(ledger.fit(&tree).unwrap_err(), LedgerError::NegativeKey(-1));
        let mut small = DiscreteLedger::new(DiscreteCfg {
            num: Some(2),
            ..DiscreteCfg::default()
        });
        let tree = tree_with_leaves(vec![leaf(0.0), leaf(5.0)]);
        assert_eq!(
            small.fit(&tree).unwrap_err(),
            LedgerError::PaletteTooSmall { size: 2, slot: 5 }
        );
        let mut unknown = DiscreteLedger::new(DiscreteCfg {
            palette: "nope".into(),
            ..DiscreteCfg::default()
        });
        assert!(matches!(
            unknown.fit(&tree),
            Err(LedgerError::UnknownPalette(_))
        ));
    }

    #[test]
    fn fit_rejects_unbucketable_sums() {
        let mut ledger = DiscreteLedger::default();
        let tree = tree_with_leaves(vec![leaf(0.0), leaf(f64::NAN)]);
        assert!(matches!(
            ledger.fit(&tree),
            Err(LedgerError::NonFiniteKey(v)) if v.is_nan()
        ));
        let tree = tree_with_leaves(vec![leaf(0.0), leaf(f64::INFINITY)]);
        assert_eq!(
            ledger.fit(&tree).unwrap_err(),
            LedgerError::NonFiniteKey(f64::INFINITY)
        );
        // a huge sum must not size the palette
        let tree = tree_with_leaves(vec![leaf(0.0), leaf(1e12)]);
        assert_eq!(
            ledger.fit(&tree).unwrap_err(),
            LedgerError::KeyTooLarge {
                key: 1_000_000_000_000,
                max: MAX_ABSOLUTE_KEY
            }
        );
        assert!(!ledger.is_fitted());
        // relative mode packs densely, so large keys are fine
        let mut relative = DiscreteLedger::new(DiscreteCfg {
            mapping: Mapping::Relative,
            ..DiscreteCfg::default()
        });
        relative.fit(&tree).unwrap();
        assert_eq!(relative.palette().unwrap().len(), 2);
        // a NaN leaf seen after fit is reported, not bucketed as 0
        assert!(matches!(
            relative.map_color(&leaf(f64::NAN)),
            Err(LedgerError::NonFiniteKey(_))
        ));
    }

    #[test]
    fn use_before_fit_is_an_error() {
        let ledger = DiscreteLedger::default();
        assert!(!ledger.is_fitted());
        assert_eq!(
            ledger.map_color(&leaf(0.0)).unwrap_err(),
            LedgerError::NotFitted
        );
        let mut ax = axes();
        assert_eq!(
            ledger.create_legend(&mut ax).unwrap_err(),
            LedgerError::NotFitted
        );
        let cont = ContinuousLedger::default();
        assert_eq!(
            cont.map_color(&leaf(0.0)).unwrap_err(),
            LedgerError::NotFitted
        );
    }

    #[test]
    fn legend_lists_observed_keys_with_names() {
        let tree = tree_with_leaves(vec![leaf(0.0), leaf(2.0)]);
        let mut names = BTreeMap::new();
        names.insert(0, "reject".to_string());
        let mut ledger = DiscreteLedger::new(DiscreteCfg {
            names,
            title: Some("class".into()),
            ..DiscreteCfg::default()
        });
        ledger.fit(&tree).unwrap();
        let mut ax = axes();
        ledger.create_legend(&mut ax).unwrap();
        let legend = ax.legend().unwrap();
        assert_eq!(legend.title.as_deref(), Some("class"));
        let labels: Vec<&str> = legend.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["reject", "2"]);
        assert_eq!(legend.entries[1].color, ledger.palette().unwrap()[2]);
        assert_eq!(legend.placement.columns, 1);
        assert_eq!(legend.placement.anchor, (1.0, 1.0));
    }

    #[test]
    fn top_legend_tiles_one_row() {
        let tree = tree_with_leaves(vec![leaf(0.0), leaf(1.0), leaf(2.0)]);
        let mut ledger = DiscreteLedger::new(DiscreteCfg {
            position: LegendPosition::Top,
            ..DiscreteCfg::default()
        });
        ledger.fit(&tree).unwrap();
        let mut ax = axes();
        ledger.create_legend(&mut ax).unwrap();
        let legend = ax.legend().unwrap();
        assert_eq!(legend.placement.columns, 3);
        assert_eq!(legend.placement.anchor, (0.0, 1.0));
    }

    #[test]
    fn continuous_extremes_hit_colormap_endpoints() {
        let small = AffFunc::new(dmatrix![0.0, 0.0], dvector![1.0]);
        let mid = AffFunc::new(dmatrix![1.0, 0.0], dvector![0.0]);
        let big = AffFunc::new(dmatrix![3.0, 4.0], dvector![-2.0]);
        let tree = tree_with_leaves(vec![small.clone(), mid.clone(), big.clone()]);
        let mut ledger = ContinuousLedger::default();
        ledger.fit(&tree).unwrap();
        let (lo, hi) = ledger.range().unwrap();
        assert!((lo - 0.2).abs() < 1e-12);
        assert!((hi - 5.4).abs() < 1e-12);
        let cmap = ledger.colormap().unwrap().clone();
        assert_eq!(ledger.map_color(&small).unwrap(), cmap.low());
        assert_eq!(ledger.map_color(&big).unwrap(), cmap.high());
        let m = ledger.map_color(&mid).unwrap();
        assert!(m.channels().iter().all(|c| (0.0..=1.0).contains(c)));
        assert_ne!(m, cmap.low());
        assert_ne!(m, cmap.high());
        // legend is a no-op once fitted
        let mut ax = axes();
        ledger.create_legend(&mut ax).unwrap();
        assert!(ax.legend().is_none());
    }

    #[test]
    fn continuous_single_score_maps_to_low_end() {
        let tree = tree_with_leaves(vec![leaf(1.0), leaf(-1.0)]);
        let mut ledger = ContinuousLedger::new(ContinuousCfg {
            colormap: "viridis".into(),
            ..ContinuousCfg::default()
        });
        ledger.fit(&tree).unwrap();
        let low = ledger.colormap().unwrap().low();
        assert_eq!(ledger.map_color(&leaf(1.0)).unwrap(), low);
    }
}
