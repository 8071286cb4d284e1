//! Partition rendering: leaf regions → coloured patch collections.
//!
//! Pass (both views)
//! - Validate the configuration and build the working domain
//!   `box(bounds) ∩ precondition`.
//! - Walk the region decomposition, skip decision nodes, clip each leaf region
//!   to the domain, optionally project it, and extract its polygon.
//! - Per-leaf geometry failures become `LeafOutcome::Skipped` values; colour
//!   lookups and configuration problems abort before the surface is touched.
//! - Attach the legend, then one patch collection in traversal order, either
//!   on a fresh surface (`render_*`) or on a borrowed one (`render_*_onto`).
//!
//! Each call is a fresh pass: nothing is cached between renders.

use nalgebra::{DVector, Vector2};
use tracing::{debug, warn};

use crate::color::{ColorLedger, Rgb};
use crate::error::{ConfigError, GeometryError, LedgerError, RenderError};
use crate::geom::{extreme_points, GeomCfg, Interval, Polytope};
use crate::surface::{Axes2, Axes3, PatchCollection};
use crate::tree::{AffFunc, Partition};

pub const DEFAULT_EDGE_COLOR: Rgb = Rgb::new(0.15, 0.15, 0.33);
pub const DEFAULT_LINEWIDTH: f64 = 0.5;

/// Maps a clipped input-space region to the 2D region that is drawn.
pub type InputProjection<'a> = &'a dyn Fn(&Polytope) -> Polytope;
/// Reduces a multi-output evaluation to the height of the lifted surface.
pub type OutputProjection<'a> = &'a dyn Fn(&DVector<f64>) -> f64;

#[derive(Clone)]
pub struct PreimageOptions<'a> {
    /// One interval per input dimension of the tree.
    pub bounds: Vec<Interval>,
    pub precondition: Option<Polytope>,
    pub edge_color: Option<Rgb>,
    pub linewidth: Option<f64>,
    /// Required when the tree's input dimension is not 2.
    pub projection: Option<InputProjection<'a>>,
    pub geom: GeomCfg,
}

impl<'a> PreimageOptions<'a> {
    pub fn new(bounds: Vec<Interval>) -> Self {
        Self {
            bounds,
            precondition: None,
            edge_color: None,
            linewidth: None,
            projection: None,
            geom: GeomCfg::default(),
        }
    }
}

#[derive(Clone)]
pub struct ImageOptions<'a> {
    pub base: PreimageOptions<'a>,
    /// Required when any leaf has more than one output.
    pub projection_out: Option<OutputProjection<'a>>,
    /// Height limits of a freshly created surface; derived from the data when absent.
    pub z_limits: Option<Interval>,
}

impl<'a> ImageOptions<'a> {
    pub fn new(bounds: Vec<Interval>) -> Self {
        Self {
            base: PreimageOptions::new(bounds),
            projection_out: None,
            z_limits: None,
        }
    }
}

/// Result of one leaf in a rendering pass.
#[derive(Clone, Debug, PartialEq)]
pub enum LeafOutcome<P> {
    Drawn {
        node: usize,
        polygon: Vec<P>,
        color: Rgb,
    },
    Skipped {
        node: usize,
        reason: GeometryError,
    },
}

impl<P> LeafOutcome<P> {
    #[inline]
    pub fn node(&self) -> usize {
        match self {
            LeafOutcome::Drawn { node, .. } | LeafOutcome::Skipped { node, .. } => *node,
        }
    }
}

fn working_domain(input_dim: usize, opts: &PreimageOptions<'_>) -> Result<Polytope, ConfigError> {
    if opts.bounds.len() != input_dim {
        return Err(ConfigError::BoundsCount {
            expected: input_dim,
            got: opts.bounds.len(),
        });
    }
    if input_dim < 2 {
        // axis limits come from the first two intervals
        return Err(ConfigError::BoundsCount {
            expected: 2,
            got: input_dim,
        });
    }
    for (i, iv) in opts.bounds.iter().enumerate() {
        iv.validate(i)?;
    }
    if input_dim != 2 && opts.projection.is_none() {
        return Err(ConfigError::NeedsProjection(input_dim));
    }
    let domain = Polytope::hyperrectangle(&opts.bounds);
    match &opts.precondition {
        Some(pre) if pre.dim() != input_dim => Err(ConfigError::PreconditionDim {
            expected: input_dim,
            got: pre.dim(),
        }),
        Some(pre) => Ok(domain.intersection(pre)),
        None => Ok(domain),
    }
}

/// Shared traversal: `lift` turns a leaf's 2D polygon into the drawn points.
fn collect<T, L, P, F>(
    tree: &T,
    ledger: &L,
    opts: &PreimageOptions<'_>,
    mut lift: F,
) -> Result<Vec<LeafOutcome<P>>, RenderError>
where
    T: Partition + ?Sized,
    L: ColorLedger + ?Sized,
    F: FnMut(&AffFunc, &[Vector2<f64>]) -> Vec<P>,
{
    let domain = working_domain(tree.input_dim(), opts)?;
    if !ledger.is_fitted() {
        return Err(LedgerError::NotFitted.into());
    }
    let mut out = Vec::new();
    for region in tree.polyhedra() {
        let Some(func) = region.node.func() else {
            continue;
        };
        let node = region.node.id;
        let mut poly = domain.intersection(&region.polytope);
        if let Some(project) = opts.projection {
            poly = project(&poly);
        }
        match extreme_points(&poly, &opts.geom) {
            Ok(verts) => {
                let color = ledger.map_color(func)?;
                out.push(LeafOutcome::Drawn {
                    node,
                    polygon: lift(func, &verts),
                    color,
                });
            }
            Err(reason) => out.push(LeafOutcome::Skipped { node, reason }),
        }
    }
    Ok(out)
}

/// Preimage pass without side effects: one outcome per leaf, in traversal order.
pub fn collect_preimage<T, L>(
    tree: &T,
    ledger: &L,
    opts: &PreimageOptions<'_>,
) -> Result<Vec<LeafOutcome<[f64; 2]>>, RenderError>
where
    T: Partition + ?Sized,
    L: ColorLedger + ?Sized,
{
    collect(tree, ledger, opts, |_, verts| {
        verts.iter().map(|v| [v.x, v.y]).collect()
    })
}

/// Image pass without side effects: polygons lifted by each leaf's affine map.
pub fn collect_image<T, L>(
    tree: &T,
    ledger: &L,
    opts: &ImageOptions<'_>,
) -> Result<Vec<LeafOutcome<[f64; 3]>>, RenderError>
where
    T: Partition + ?Sized,
    L: ColorLedger + ?Sized,
{
    for node in tree.terminals() {
        let Some(func) = node.func() else {
            continue;
        };
        if func.outdim() != 1 && opts.projection_out.is_none() {
            return Err(ConfigError::MultiOutput {
                node: node.id,
                outdim: func.outdim(),
            }
            .into());
        }
        if func.indim() != 2 {
            return Err(ConfigError::InputDim {
                node: node.id,
                indim: func.indim(),
            }
            .into());
        }
    }
    let project_out = opts.projection_out;
    collect(tree, ledger, &opts.base, |func, verts| {
        verts
            .iter()
            .map(|v| {
                let y = func.apply(&DVector::from_column_slice(&[v.x, v.y]));
                let z = match project_out {
                    Some(p) => p(&y),
                    None => y[0],
                };
                [v.x, v.y, z]
            })
            .collect()
    })
}

/// Split outcomes into drawable polygons and colours, warning about each skip.
fn drawable<P>(outcomes: Vec<LeafOutcome<P>>) -> (Vec<Vec<P>>, Vec<Rgb>) {
    let mut polygons = Vec::with_capacity(outcomes.len());
    let mut colors = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            LeafOutcome::Drawn { polygon, color, .. } => {
                polygons.push(polygon);
                colors.push(color);
            }
            LeafOutcome::Skipped { node, reason } => {
                warn!(node, %reason, "could not determine extreme points; skipping region");
            }
        }
    }
    (polygons, colors)
}

fn patches<P>(
    outcomes: Vec<LeafOutcome<P>>,
    opts: &PreimageOptions<'_>,
    what: &'static str,
) -> PatchCollection<P> {
    let total = outcomes.len();
    let (polygons, face_colors) = drawable(outcomes);
    debug!(leaves = total, drawn = polygons.len(), "{what} rendered");
    PatchCollection {
        polygons,
        face_colors,
        edge_color: opts.edge_color.unwrap_or(DEFAULT_EDGE_COLOR),
        linewidth: opts.linewidth.unwrap_or(DEFAULT_LINEWIDTH),
    }
}

/// Render the preimage partition onto a fresh surface.
///
/// Limits come from the first two bounds; the aspect is equal.
pub fn render_preimage<T, L>(
    tree: &T,
    ledger: &L,
    opts: &PreimageOptions<'_>,
) -> Result<Axes2, RenderError>
where
    T: Partition + ?Sized,
    L: ColorLedger + ?Sized,
{
    let outcomes = collect_preimage(tree, ledger, opts)?;
    let mut ax = Axes2::new(opts.bounds[0], opts.bounds[1]);
    ledger.create_legend(&mut ax)?;
    ax.add_collection(patches(outcomes, opts, "preimage"));
    Ok(ax)
}

/// Render the preimage partition onto an existing surface.
///
/// The legend is replaced, then one collection is appended. On error the
/// surface is left untouched.
pub fn render_preimage_onto<T, L>(
    tree: &T,
    ledger: &L,
    opts: &PreimageOptions<'_>,
    ax: &mut Axes2,
) -> Result<(), RenderError>
where
    T: Partition + ?Sized,
    L: ColorLedger + ?Sized,
{
    let outcomes = collect_preimage(tree, ledger, opts)?;
    ledger.create_legend(ax)?;
    ax.add_collection(patches(outcomes, opts, "preimage"));
    Ok(())
}

/// Render the image, each region lifted to `(x, y, f(x, y))`, onto a fresh surface.
///
/// z limits come from `opts.z_limits`, else from the lifted vertices.
pub fn render_image<T, L>(
    tree: &T,
    ledger: &L,
    opts: &ImageOptions<'_>,
) -> Result<Axes3, RenderError>
where
    T: Partition + ?Sized,
    L: ColorLedger + ?Sized,
{
    let outcomes = collect_image(tree, ledger, opts)?;
    let zlim = opts.z_limits.unwrap_or_else(|| data_zlim(&outcomes));
    let mut ax = Axes3::new(opts.base.bounds[0], opts.base.bounds[1], zlim);
    ledger.create_legend(&mut ax)?;
    ax.add_collection(patches(outcomes, &opts.base, "image"));
    Ok(ax)
}

/// Render the image onto an existing surface; untouched on error.
pub fn render_image_onto<T, L>(
    tree: &T,
    ledger: &L,
    opts: &ImageOptions<'_>,
    ax: &mut Axes3,
) -> Result<(), RenderError>
where
    T: Partition + ?Sized,
    L: ColorLedger + ?Sized,
{
    let outcomes = collect_image(tree, ledger, opts)?;
    ledger.create_legend(ax)?;
    ax.add_collection(patches(outcomes, &opts.base, "image"));
    Ok(())
}

fn data_zlim(outcomes: &[LeafOutcome<[f64; 3]>]) -> Interval {
    let zs = outcomes.iter().flat_map(|o| match o {
        LeafOutcome::Drawn { polygon, .. } => polygon.as_slice(),
        LeafOutcome::Skipped { .. } => &[][..],
    });
    match Interval::hull_of(zs.map(|p| p[2])) {
        Some(iv) if iv.width() > 0.0 => iv,
        Some(iv) => Interval::new(iv.lo - 0.5, iv.hi + 0.5),
        None => Interval::new(0.0, 1.0),
    }
}
