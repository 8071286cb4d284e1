//! Render a small affine tree and print what landed on the surface.
//!
//! Usage:
//!   cargo run -p affplot --example partition_demo -- preimage
//!   cargo run -p affplot --example partition_demo -- image
//!
//! The tree splits [-1,1]² along the diagonal and then along a second line,
//! giving three leaves with different slopes.

use affplot::prelude::*;
use nalgebra::{dmatrix, dvector};

fn demo_tree() -> AffTree {
    let mut tree = AffTree::from_leaf(AffFunc::constant(2, dvector![0.0]));
    let (_, upper) = tree.split(
        0,
        Predicate::new(dvector![1.0, -1.0], 0.0),
        AffFunc::new(dmatrix![0.5, 0.0], dvector![0.0]),
        AffFunc::constant(2, dvector![1.0]),
    );
    tree.split(
        upper,
        Predicate::new(dvector![1.0, 1.0], 0.5),
        AffFunc::new(dmatrix![0.0, -1.0], dvector![1.0]),
        AffFunc::new(dmatrix![1.0, 1.0], dvector![2.0]),
    );
    tree
}

fn main() {
    let mode = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "preimage".to_string());
    let tree = demo_tree();
    let bounds = vec![Interval::new(-1.0, 1.0), Interval::new(-1.0, 1.0)];
    match mode.as_str() {
        "preimage" => {
            let mut ledger = DiscreteLedger::default();
            ledger.fit(&tree).expect("fit");
            let opts = PreimageOptions::new(bounds);
            let ax = render_preimage(&tree, &ledger, &opts).expect("render");
            for (k, (poly, color)) in ax.collections[0]
                .polygons
                .iter()
                .zip(&ax.collections[0].face_colors)
                .enumerate()
            {
                println!("region {k}: {} vertices, color {}", poly.len(), color.to_hex_string());
            }
            if let Some(legend) = ax.legend() {
                let labels: Vec<&str> = legend.entries.iter().map(|e| e.label.as_str()).collect();
                println!("legend: {labels:?}");
            }
        }
        "image" => {
            let mut ledger = ContinuousLedger::default();
            ledger.fit(&tree).expect("fit");
            let opts = ImageOptions::new(bounds);
            let ax = render_image(&tree, &ledger, &opts).expect("render");
            println!("z range: [{:.3}, {:.3}]", ax.zlim.lo, ax.zlim.hi);
            for (k, poly) in ax.collections[0].polygons.iter().enumerate() {
                let zs: Vec<String> = poly.iter().map(|p| format!("{:.2}", p[2])).collect();
                println!("region {k}: heights {}", zs.join(" "));
            }
        }
        _ => {
            eprintln!("usage: partition_demo [preimage|image]");
        }
    }
}
