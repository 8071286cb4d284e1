//! JSON tree documents.
//!
//! ```json
//! { "root": { "split": { "normal": [1, 0], "offset": 1,
//!     "true":  { "leaf": { "mat": [[0, 0]], "bias": [0] } },
//!     "false": { "leaf": { "mat": [[0, 0]], "bias": [1] } } } } }
//! ```

use affplot::tree::{AffFunc, AffTree, Predicate};
use anyhow::{bail, ensure, Context, Result};
use nalgebra::{DMatrix, DVector};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct TreeDoc {
    pub root: NodeDoc,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeDoc {
    Leaf(LeafDoc),
    Split(SplitDoc),
}

#[derive(Debug, Deserialize)]
pub struct LeafDoc {
    /// Row-major, one inner array per output.
    pub mat: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

#[derive(Debug, Deserialize)]
pub struct SplitDoc {
    pub normal: Vec<f64>,
    pub offset: f64,
    #[serde(rename = "true")]
    pub on_true: Box<NodeDoc>,
    #[serde(rename = "false")]
    pub on_false: Box<NodeDoc>,
}

impl NodeDoc {
    /// Some leaf below this node; seeds a fresh terminal before it is split further.
    fn first_leaf(&self) -> &LeafDoc {
        match self {
            NodeDoc::Leaf(l) => l,
            NodeDoc::Split(s) => s.on_true.first_leaf(),
        }
    }
}

impl LeafDoc {
    fn to_func(&self, indim: Option<usize>) -> Result<AffFunc> {
        ensure!(!self.mat.is_empty(), "leaf matrix has no rows");
        let cols = self.mat[0].len();
        ensure!(
            self.mat.iter().all(|r| r.len() == cols),
            "leaf matrix rows have different lengths"
        );
        if let Some(d) = indim {
            ensure!(cols == d, "leaf input dimension {cols}, tree has {d}");
        }
        ensure!(
            self.bias.len() == self.mat.len(),
            "bias length {} does not match {} matrix rows",
            self.bias.len(),
            self.mat.len()
        );
        let mat = DMatrix::from_row_iterator(self.mat.len(), cols, self.mat.iter().flatten().copied());
        Ok(AffFunc::new(mat, DVector::from_vec(self.bias.clone())))
    }
}

impl TreeDoc {
    pub fn into_tree(self) -> Result<AffTree> {
        let root = self.root.first_leaf().to_func(None)?;
        let indim = root.indim();
        let mut tree = AffTree::from_leaf(root);
        grow(&mut tree, 0, &self.root, indim)?;
        Ok(tree)
    }
}

fn grow(tree: &mut AffTree, id: usize, doc: &NodeDoc, indim: usize) -> Result<()> {
    let NodeDoc::Split(split) = doc else {
        return Ok(());
    };
    if split.normal.len() != indim {
        bail!(
            "split normal has dimension {}, tree has {indim}",
            split.normal.len()
        );
    }
    let predicate = Predicate::new(DVector::from_vec(split.normal.clone()), split.offset);
    let on_true = split.on_true.first_leaf().to_func(Some(indim))?;
    let on_false = split.on_false.first_leaf().to_func(Some(indim))?;
    let (t, f) = tree.split(id, predicate, on_true, on_false);
    grow(tree, t, &split.on_true, indim)?;
    grow(tree, f, &split.on_false, indim)
}

pub fn read_tree(path: &Path) -> Result<AffTree> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let doc: TreeDoc =
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))?;
    doc.into_tree()
        .with_context(|| format!("building tree from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use affplot::tree::Partition;
    use serde_json::json;

    fn parse(v: serde_json::Value) -> Result<AffTree> {
        serde_json::from_value::<TreeDoc>(v)?.into_tree()
    }

    #[test]
    fn nested_splits_build_in_order() {
        let tree = parse(json!({"root": {"split": {
            "normal": [1.0, 0.0], "offset": 1.0,
            "true": {"leaf": {"mat": [[0.0, 0.0]], "bias": [0.0]}},
            "false": {"split": {
                "normal": [0.0, 1.0], "offset": 0.5,
                "true": {"leaf": {"mat": [[1.0, 0.0]], "bias": [1.0]}},
                "false": {"leaf": {"mat": [[0.0, 1.0]], "bias": [2.0]}}
            }}
        }}}))
        .unwrap();
        assert_eq!(tree.input_dim(), 2);
        assert_eq!(tree.len(), 5);
        let biases: Vec<f64> = tree
            .terminals()
            .iter()
            .filter_map(|n| n.func())
            .map(|f| f.bias[0])
            .collect();
        assert_eq!(biases, vec![0.0, 1.0, 2.0]);
        assert_eq!(tree.node(3).func().unwrap().mat[(0, 0)], 1.0);
    }

    #[test]
    fn single_leaf_tree() {
        let tree = parse(json!({"root": {"leaf": {"mat": [[1.0, 2.0], [3.0, 4.0]], "bias": [0.0, 1.0]}}}))
            .unwrap();
        let f = tree.node(0).func().unwrap();
        assert_eq!(f.outdim(), 2);
        assert_eq!(f.mat[(1, 0)], 3.0);
    }

    #[test]
    fn shape_mismatches_are_rejected() {
        assert!(parse(json!({"root": {"leaf": {"mat": [[1.0, 2.0]], "bias": [0.0, 1.0]}}})).is_err());
        assert!(parse(json!({"root": {"split": {
            "normal": [1.0], "offset": 0.0,
            "true": {"leaf": {"mat": [[0.0, 0.0]], "bias": [0.0]}},
            "false": {"leaf": {"mat": [[0.0, 0.0]], "bias": [1.0]}}
        }}}))
        .is_err());
        assert!(parse(json!({"root": {"split": {
            "normal": [1.0, 0.0], "offset": 0.0,
            "true": {"leaf": {"mat": [[0.0, 0.0]], "bias": [0.0]}},
            "false": {"leaf": {"mat": [[0.0, 0.0, 0.0]], "bias": [1.0]}}
        }}}))
        .is_err());
    }
}
