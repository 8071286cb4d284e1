//! Tree fixtures shared by unit tests.

use nalgebra::{dvector, DVector};

use crate::tree::{AffFunc, AffTree, Predicate};

/// Constant 2D → 1D leaf with the given bias.
pub(crate) fn leaf(bias: f64) -> AffFunc {
    AffFunc::constant(2, dvector![bias])
}

/// Vertical strips: leaf `k` owns `k-1 < x <= k` (the first `x <= 1`, the last `x > n-1`).
pub(crate) fn tree_with_leaves(leaves: Vec<AffFunc>) -> AffTree {
    let mut it = leaves.into_iter();
    let first = it.next().expect("at least one leaf");
    let indim = first.indim();
    let mut tree = AffTree::from_leaf(first);
    let mut tail = 0;
    for (k, next) in it.enumerate() {
        let current = tree.node(tail).func().cloned().expect("tail is a terminal");
        let mut normal = DVector::zeros(indim);
        normal[0] = 1.0;
        let (_, f) = tree.split(tail, Predicate::new(normal, (k + 1) as f64), current, next);
        tail = f;
    }
    tree
}
