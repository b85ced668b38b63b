//! Tree topology: a heap-indexed arb-ary tree tensor network.
//!
//! Site `0` is the root; the children of site `i` are
//! `arb·i + 1 … arb·i + arb` (those below `n`), and the parent of `i > 0`
//! is `⌊(i − 1) / arb⌋`. Site tensors carry axes (physical, one bond per
//! existing child in child order, then a parent bond for non-root sites).

use ndarray::Axis;
use num_complex::Complex64;
use rustc_hash::FxHashSet;

use crate::error::{NetError, NetResult};
use crate::network::{Network, Topology, default_runtime};
use crate::task::Runtime;
use crate::tensor::{TensorStore, tensordot};

/// Qubits arranged as a heap-indexed arb-ary tree.
#[derive(Debug, Clone)]
pub struct TreeLattice {
    n: usize,
    chi: usize,
    arb: usize,
}

impl TreeLattice {
    /// Create a tree of `n` qubits with bond dimension `chi` and
    /// branching factor `arb`.
    pub fn new(n: usize, chi: usize, arb: usize) -> NetResult<Self> {
        if n == 0 {
            return Err(NetError::ZeroWidth);
        }
        if chi <= 2 {
            return Err(NetError::BondTooSmall { chi });
        }
        if arb < 2 {
            return Err(NetError::ArityTooSmall { arb });
        }
        Ok(Self { n, chi, arb })
    }

    /// Depth of the whole tree: ⌊log_arb(n)⌋.
    pub fn depth(&self) -> usize {
        self.at_depth(self.n - 1)
    }

    /// Depth of a node: ⌊log_arb(node + 1)⌋.
    pub fn at_depth(&self, node: usize) -> usize {
        let mut v = node + 1;
        let mut depth = 0;
        while v >= self.arb {
            v /= self.arb;
            depth += 1;
        }
        depth
    }

    /// Parent of a node, `None` for the root.
    pub fn parent(&self, node: usize) -> Option<usize> {
        (node > 0).then(|| (node - 1) / self.arb)
    }

    /// Children of a node, in child order.
    pub fn children(&self, node: usize) -> Vec<usize> {
        (1..=self.arb)
            .map(|j| self.arb * node + j)
            .filter(|&c| c < self.n)
            .collect()
    }

    /// Nearest common ancestor: walk both nodes upward and pick the
    /// deepest node the walks share.
    pub fn nca(&self, a: usize, b: usize) -> usize {
        let mut seen = FxHashSet::default();
        let mut p = Some(a);
        while let Some(node) = p {
            seen.insert(node);
            p = self.parent(node);
        }
        let mut q = b;
        loop {
            if seen.contains(&q) {
                return q;
            }
            q = self.parent(q).expect("walks meet at the root at latest");
        }
    }

    fn num_children(&self, node: usize) -> usize {
        let first = self.arb * node + 1;
        if first >= self.n {
            0
        } else {
            self.arb.min(self.n - first)
        }
    }

    /// Axis carrying the parent bond of a non-root node.
    fn parent_axis(&self, node: usize) -> usize {
        1 + self.num_children(node)
    }
}

impl Topology for TreeLattice {
    fn len(&self) -> usize {
        self.n
    }

    fn distance(&self, a: usize, b: usize) -> usize {
        let nca = self.nca(a, b);
        self.at_depth(a) + self.at_depth(b) - 2 * self.at_depth(nca)
    }

    fn path(&self, a: usize, b: usize) -> Vec<usize> {
        let nca = self.nca(a, b);
        let mut walk = Vec::new();

        // Climb from a to the common ancestor.
        if a != nca {
            let mut p = self.parent(a).expect("a lies below its ancestor");
            while p != nca {
                walk.push(p);
                p = self.parent(p).expect("climb ends at the ancestor");
            }
            walk.push(nca);
        }

        // Descend from the common ancestor to b.
        let mut down = Vec::new();
        let mut q = b;
        while q != nca {
            down.push(q);
            q = self.parent(q).expect("b lies below its ancestor");
        }
        down.reverse();
        walk.extend(down);
        walk
    }

    fn common_idx(&self, a: usize, b: usize) -> NetResult<(usize, usize)> {
        if self.parent(b) == Some(a) {
            let slot = b - (self.arb * a + 1);
            Ok((1 + slot, self.parent_axis(b)))
        } else if self.parent(a) == Some(b) {
            let slot = a - (self.arb * b + 1);
            Ok((self.parent_axis(a), 1 + slot))
        } else {
            Err(NetError::NotAdjacent { a, b })
        }
    }

    fn site_shape(&self, site: usize) -> Vec<usize> {
        let mut shape = vec![2];
        shape.extend(std::iter::repeat_n(self.chi, self.num_children(site)));
        if site > 0 {
            shape.push(self.chi);
        }
        shape
    }

    fn amplitude(&self, store: &TensorStore, bits: &[u8]) -> NetResult<Complex64> {
        // Contract bottom-up: every site is projected on its bit, its
        // children's contractions are absorbed over the child bonds, and
        // the result (a vector over the parent bond) is passed upward.
        let mut upward = vec![None; self.n];
        for site in (0..self.n).rev() {
            let mut t = store
                .get(site)
                .index_axis(Axis(0), bits[site] as usize)
                .to_owned();
            for (axis, child) in self.children(site).iter().enumerate().rev() {
                let v = upward[*child]
                    .take()
                    .expect("children are contracted before their parent");
                t = tensordot(&t, &[axis], &v, &[0])?;
            }
            if site == 0 {
                return Ok(t.sum());
            }
            upward[site] = Some(t);
        }
        unreachable!("the loop terminates at the root");
    }
}

/// A tree-shaped tensor network.
pub type Tree = Network<TreeLattice>;

impl Network<TreeLattice> {
    /// Create a tree network in the |0…0⟩ state.
    pub fn new(n: usize, chi: usize, arb: usize) -> NetResult<Self> {
        Self::assemble(TreeLattice::new(n, chi, arb)?, chi, default_runtime())
    }

    /// Create a tree network with a caller-supplied task runtime.
    pub fn with_runtime(
        n: usize,
        chi: usize,
        arb: usize,
        runtime: Box<dyn Runtime>,
    ) -> NetResult<Self> {
        Self::assemble(TreeLattice::new(n, chi, arb)?, chi, runtime)
    }
}
