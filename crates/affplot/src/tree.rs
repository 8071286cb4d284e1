//! Affine decision trees: the partition the renderer draws.
//!
//! Model
//! - Decision nodes carry a predicate `a·x <= b`; the true child owns that
//!   half-space, the false child its complement `-a·x <= -b`.
//! - Terminal nodes carry an affine function valid on their region.
//! - `Partition` is the boundary the ledger and renderer consume; `AffTree` is
//!   the arena-backed implementation shipped with the crate.

use nalgebra::{DMatrix, DVector};

use crate::geom::Polytope;

/// Affine function `x ↦ M x + bias`.
#[derive(Clone, Debug, PartialEq)]
pub struct AffFunc {
    pub mat: DMatrix<f64>,
    pub bias: DVector<f64>,
}

impl AffFunc {
    /// Panics if `mat.nrows() != bias.len()`.
    pub fn new(mat: DMatrix<f64>, bias: DVector<f64>) -> Self {
        assert_eq!(mat.nrows(), bias.len(), "matrix rows must match bias length");
        Self { mat, bias }
    }

    /// Constant function `R^indim → R^k` with value `bias`.
    pub fn constant(indim: usize, bias: DVector<f64>) -> Self {
        Self::new(DMatrix::zeros(bias.len(), indim), bias)
    }

    #[inline]
    pub fn indim(&self) -> usize {
        self.mat.ncols()
    }

    #[inline]
    pub fn outdim(&self) -> usize {
        self.mat.nrows()
    }

    #[inline]
    pub fn apply(&self, x: &DVector<f64>) -> DVector<f64> {
        &self.mat * x + &self.bias
    }
}

/// Half-space predicate `normal·x <= offset`.
#[derive(Clone, Debug, PartialEq)]
pub struct Predicate {
    pub normal: DVector<f64>,
    pub offset: f64,
}

impl Predicate {
    pub fn new(normal: DVector<f64>, offset: f64) -> Self {
        Self { normal, offset }
    }

    /// The closed half-space of the given branch.
    fn halfspace(&self, branch: bool) -> (DVector<f64>, f64) {
        if branch {
            (self.normal.clone(), self.offset)
        } else {
            (-&self.normal, -self.offset)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Decision {
        predicate: Predicate,
        on_true: usize,
        on_false: usize,
    },
    Terminal(AffFunc),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: usize,
    pub kind: NodeKind,
}

impl Node {
    #[inline]
    pub fn is_decision(&self) -> bool {
        matches!(self.kind, NodeKind::Decision { .. })
    }

    /// The affine function of a terminal node.
    #[inline]
    pub fn func(&self) -> Option<&AffFunc> {
        match &self.kind {
            NodeKind::Terminal(f) => Some(f),
            NodeKind::Decision { .. } => None,
        }
    }
}

/// One entry of the region decomposition: `location` is the depth-first index.
#[derive(Clone, Debug)]
pub struct Region<'a> {
    pub location: usize,
    pub node: &'a Node,
    pub polytope: Polytope,
}

/// What the ledger and renderer need from a tree.
pub trait Partition {
    fn input_dim(&self) -> usize;
    /// Nodes that carry an affine function.
    fn terminals(&self) -> Vec<&Node>;
    /// Every node with the region it governs, decision nodes included.
    fn polyhedra(&self) -> Vec<Region<'_>>;
}

/// Arena-backed affine tree. Node 0 is the root.
#[derive(Clone, Debug)]
pub struct AffTree {
    indim: usize,
    nodes: Vec<Node>,
}

impl AffTree {
    /// Tree consisting of a single terminal.
    pub fn from_leaf(func: AffFunc) -> Self {
        Self {
            indim: func.indim(),
            nodes: vec![Node {
                id: 0,
                kind: NodeKind::Terminal(func),
            }],
        }
    }

    /// Replace terminal `leaf` by a decision on `predicate` with two new terminals.
    ///
    /// Returns the ids `(on_true, on_false)`. Panics if `leaf` is not a terminal
    /// or the dimensions disagree with the tree.
    pub fn split(
        &mut self,
        leaf: usize,
        predicate: Predicate,
        on_true: AffFunc,
        on_false: AffFunc,
    ) -> (usize, usize) {
        assert!(!self.nodes[leaf].is_decision(), "node {leaf} is not a terminal");
        assert_eq!(predicate.normal.len(), self.indim, "predicate dimension");
        assert_eq!(on_true.indim(), self.indim, "true branch input dimension");
        assert_eq!(on_false.indim(), self.indim, "false branch input dimension");
        let t = self.nodes.len();
        let f = t + 1;
        self.nodes.push(Node {
            id: t,
            kind: NodeKind::Terminal(on_true),
        });
        self.nodes.push(Node {
            id: f,
            kind: NodeKind::Terminal(on_false),
        });
        self.nodes[leaf].kind = NodeKind::Decision {
            predicate,
            on_true: t,
            on_false: f,
        };
        (t, f)
    }

    #[inline]
    pub fn node(&self, id: usize) -> &Node {
        &self.nodes[id]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Partition for AffTree {
    fn input_dim(&self) -> usize {
        self.indim
    }

    fn terminals(&self) -> Vec<&Node> {
        self.nodes.iter().filter(|n| !n.is_decision()).collect()
    }

    fn polyhedra(&self) -> Vec<Region<'_>> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(usize, Vec<(DVector<f64>, f64)>)> = vec![(0, Vec::new())];
        while let Some((id, hs)) = stack.pop() {
            let node = &self.nodes[id];
            out.push(Region {
                location: out.len(),
                node,
                polytope: Polytope::from_halfspaces(self.indim, &hs),
            });
            if let NodeKind::Decision {
                predicate,
                on_true,
                on_false,
            } = &node.kind
            {
                let mut hs_false = hs.clone();
                hs_false.push(predicate.halfspace(false));
                let mut hs_true = hs;
                hs_true.push(predicate.halfspace(true));
                // true branch is visited first
                stack.push((*on_false, hs_false));
                stack.push((*on_true, hs_true));
            }
        }
        out
    }
}
