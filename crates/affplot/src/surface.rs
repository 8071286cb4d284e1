//! In-memory drawing surfaces: axes with patch collections and a legend.
//!
//! These are plain data, serializable with serde, so callers can hand them to
//! whatever backend draws or stores them. Axis labels, titles, and output
//! formats live with the caller.

use serde::Serialize;

use crate::color::Rgb;
use crate::geom::Interval;

/// Anything a ledger can attach a legend to.
pub trait Surface {
    fn set_legend(&mut self, legend: Legend);
    fn legend(&self) -> Option<&Legend>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendPosition {
    /// Stacked in the upper-right corner.
    #[default]
    Right,
    /// One row tiled along the top edge.
    Top,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb,
}

/// Legend placement in axes coordinates (`(0,0)` bottom-left, `(1,1)` top-right).
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Placement {
    pub anchor: (f64, f64),
    pub columns: usize,
}

impl Placement {
    pub fn for_position(position: LegendPosition, entries: usize) -> Self {
        match position {
            LegendPosition::Right => Self {
                anchor: (1.0, 1.0),
                columns: 1,
            },
            LegendPosition::Top => Self {
                anchor: (0.0, 1.0),
                columns: entries.max(1),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Legend {
    pub title: Option<String>,
    pub entries: Vec<LegendEntry>,
    pub placement: Placement,
}

/// Polygons sharing one edge style, each with its own face colour.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PatchCollection<P> {
    pub polygons: Vec<Vec<P>>,
    pub face_colors: Vec<Rgb>,
    pub edge_color: Rgb,
    pub linewidth: f64,
}

impl<P> PatchCollection<P> {
    #[inline]
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

/// Flat axes for the preimage view (equal aspect).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Axes2 {
    pub xlim: Interval,
    pub ylim: Interval,
    pub aspect_equal: bool,
    pub legend: Option<Legend>,
    pub collections: Vec<PatchCollection<[f64; 2]>>,
}

impl Axes2 {
    pub fn new(xlim: Interval, ylim: Interval) -> Self {
        Self {
            xlim,
            ylim,
            aspect_equal: true,
            legend: None,
            collections: Vec::new(),
        }
    }

    pub fn add_collection(&mut self, c: PatchCollection<[f64; 2]>) {
        self.collections.push(c);
    }
}

impl Surface for Axes2 {
    fn set_legend(&mut self, legend: Legend) {
        self.legend = Some(legend);
    }
    fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }
}

/// 3D axes for the image view.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Axes3 {
    pub xlim: Interval,
    pub ylim: Interval,
    pub zlim: Interval,
    pub legend: Option<Legend>,
    pub collections: Vec<PatchCollection<[f64; 3]>>,
}

impl Axes3 {
    pub fn new(xlim: Interval, ylim: Interval, zlim: Interval) -> Self {
        Self {
            xlim,
            ylim,
            zlim,
            legend: None,
            collections: Vec::new(),
        }
    }

    pub fn add_collection(&mut self, c: PatchCollection<[f64; 3]>) {
        self.collections.push(c);
    }
}

impl Surface for Axes3 {
    fn set_legend(&mut self, legend: Legend) {
        self.legend = Some(legend);
    }
    fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }
}
