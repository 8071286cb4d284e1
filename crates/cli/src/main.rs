use affplot::color::{ColorLedger, ContinuousCfg, ContinuousLedger, DiscreteCfg, DiscreteLedger, Mapping};
use affplot::geom::Interval;
use affplot::render::{render_image, render_preimage, ImageOptions, PreimageOptions};
use affplot::tree::AffTree;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use nalgebra::DVector;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod io;
mod provenance;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Render affine-tree partitions to JSON surfaces")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    Preimage,
    Image,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LedgerKind {
    Discrete,
    Continuous,
}

/// Reduction of a multi-output leaf to one height in image mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Reduce {
    Norm,
    Sum,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// JSON tree document
    #[arg(long)]
    tree: PathBuf,
    #[arg(long, value_enum, default_value_t = Mode::Preimage)]
    mode: Mode,
    /// One `lo,hi` per input dimension
    #[arg(long = "bounds", value_parser = parse_interval, required = true)]
    bounds: Vec<Interval>,
    #[arg(long, value_enum, default_value_t = LedgerKind::Discrete)]
    ledger: LedgerKind,
    /// Pack discrete keys densely instead of indexing the palette by key
    #[arg(long)]
    relative: bool,
    /// Palette (discrete) or colormap (continuous) name
    #[arg(long)]
    palette: Option<String>,
    /// Height reduction for multi-output leaves (image mode)
    #[arg(long, value_enum)]
    reduce: Option<Reduce>,
    /// Height limits `lo,hi` (image mode); derived from the data when absent
    #[arg(long, value_parser = parse_interval)]
    zlim: Option<Interval>,
    #[arg(long)]
    out: PathBuf,
}

#[derive(Subcommand)]
enum Action {
    /// Render a tree and write the surface plus a provenance sidecar
    Render(RenderArgs),
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Render(args) => render(&args).map(|_| ()),
        Action::Report => report(),
    }
}

fn parse_interval(s: &str) -> Result<Interval, String> {
    let (lo, hi) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `lo,hi`, got `{s}`"))?;
    let lo: f64 = lo.trim().parse().map_err(|e| format!("bad lower bound: {e}"))?;
    let hi: f64 = hi.trim().parse().map_err(|e| format!("bad upper bound: {e}"))?;
    Ok(Interval::new(lo, hi))
}

fn ledger_for(args: &RenderArgs, tree: &AffTree) -> Result<Box<dyn ColorLedger>> {
    let mut ledger: Box<dyn ColorLedger> = match args.ledger {
        LedgerKind::Discrete => {
            let mut cfg = DiscreteCfg::default();
            if args.relative {
                cfg.mapping = Mapping::Relative;
            }
            if let Some(p) = &args.palette {
                cfg.palette = p.clone();
            }
            Box::new(DiscreteLedger::new(cfg))
        }
        LedgerKind::Continuous => {
            let mut cfg = ContinuousCfg::default();
            if let Some(p) = &args.palette {
                cfg.colormap = p.clone();
            }
            Box::new(ContinuousLedger::new(cfg))
        }
    };
    ledger.fit(tree).context("fitting colour ledger")?;
    Ok(ledger)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    fs::write(path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))
}

/// Returns the path of the provenance sidecar.
fn render(args: &RenderArgs) -> Result<PathBuf> {
    tracing::info!(tree = %args.tree.display(), mode = ?args.mode, out = %args.out.display(), "render");
    let tree = io::read_tree(&args.tree)?;
    let ledger = ledger_for(args, &tree)?;
    match args.mode {
        Mode::Preimage => {
            let opts = PreimageOptions::new(args.bounds.clone());
            let ax = render_preimage(&tree, ledger.as_ref(), &opts)
                .context("rendering preimage")?;
            tracing::info!(patches = ax.collections[0].len(), "preimage done");
            write_json(&args.out, &ax)?;
        }
        Mode::Image => {
            let norm: &dyn Fn(&DVector<f64>) -> f64 = &|y| y.norm();
            let sum: &dyn Fn(&DVector<f64>) -> f64 = &|y| y.sum();
            let mut opts = ImageOptions::new(args.bounds.clone());
            opts.z_limits = args.zlim;
            opts.projection_out = match args.reduce {
                Some(Reduce::Norm) => Some(norm),
                Some(Reduce::Sum) => Some(sum),
                None => None,
            };
            let ax = render_image(&tree, ledger.as_ref(), &opts)
                .context("rendering image")?;
            tracing::info!(patches = ax.collections[0].len(), "image done");
            write_json(&args.out, &ax)?;
        }
    }
    let params = json!({
        "tree": args.tree.to_string_lossy(),
        "mode": format!("{:?}", args.mode).to_lowercase(),
        "bounds": args.bounds,
        "ledger": format!("{:?}", args.ledger).to_lowercase(),
        "relative": args.relative,
        "palette": args.palette,
    });
    provenance::write_sidecar(&args.out, params)
}

fn report() -> Result<()> {
    let obj = provenance::block(json!({}), &[]);
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
