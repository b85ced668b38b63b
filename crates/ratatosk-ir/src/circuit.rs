//! DAG-based circuit representation.
//!
//! A circuit is a directed acyclic graph of gate nodes. Edges encode only
//! causal dependency on the same qubit line; gates on disjoint qubits stay
//! unordered so a scheduler may run them in parallel. Nodes are appended,
//! never removed, so node indices stay stable for the circuit's lifetime.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;

use crate::error::{CircuitError, CircuitResult};
use crate::gate::Gate;
use crate::target::Target;

/// Node index type for the circuit DAG.
pub type NodeIndex = PetNodeIndex<u32>;

/// A gate node in the circuit DAG.
#[derive(Debug, Clone, PartialEq)]
pub struct GateNode {
    /// The qubit operand(s).
    pub target: Target,
    /// The operator applied at this node.
    pub gate: Gate,
}

/// A quantum circuit on a fixed number of qubits.
///
/// Each qubit line keeps a `head` pointer to its most recently appended
/// gate, giving O(1) edge insertion. Edges carry the qubit index of the
/// causal chain they belong to; a two-qubit gate fuses two chains at a
/// node, which is the only cross-qubit ordering the DAG encodes.
#[derive(Debug, Clone)]
pub struct Circuit {
    /// Number of qubits.
    width: usize,
    /// The underlying graph; edge weights are qubit line indices.
    graph: DiGraph<GateNode, usize>,
    /// Most recently appended gate per qubit, if any.
    head: Vec<Option<NodeIndex>>,
}

impl Circuit {
    /// Create an empty circuit on `n` qubits.
    pub fn new(n: usize) -> CircuitResult<Self> {
        if n == 0 {
            return Err(CircuitError::ZeroWidth);
        }
        Ok(Self {
            width: n,
            graph: DiGraph::default(),
            head: vec![None; n],
        })
    }

    /// Append a gate to the circuit.
    ///
    /// Single-qubit targets take a 2×2 operator, pair targets a 4×4 one;
    /// anything else is rejected, as are out-of-range or duplicated qubit
    /// indices. The new node receives a causal edge from the current head
    /// of every qubit line it touches.
    pub fn add_gate(&mut self, target: impl Into<Target>, gate: Gate) -> CircuitResult<NodeIndex> {
        let target = target.into();

        if gate.num_qubits() != target.arity() {
            return Err(CircuitError::GateArity {
                gate: gate.name(),
                expected: gate.num_qubits(),
                got: target.arity(),
            });
        }
        for &qubit in &target.qubits() {
            if qubit >= self.width {
                return Err(CircuitError::QubitOutOfRange {
                    qubit,
                    width: self.width,
                });
            }
        }
        if let Target::Pair(a, b) = target {
            if a == b {
                return Err(CircuitError::DuplicateQubit {
                    gate: gate.name(),
                    qubit: a,
                });
            }
        }

        let node = self.graph.add_node(GateNode { target, gate });
        for qubit in target.qubits() {
            if let Some(prev) = self.head[qubit] {
                self.graph.add_edge(prev, node, qubit);
            }
            self.head[qubit] = Some(node);
        }
        Ok(node)
    }

    /// Number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.width
    }

    /// Number of gates appended so far.
    #[inline]
    pub fn num_gates(&self) -> usize {
        self.graph.node_count()
    }

    /// Longest path in the DAG, measured in edges.
    pub fn depth(&self) -> usize {
        let mut depths: FxHashMap<NodeIndex, usize> =
            FxHashMap::with_capacity_and_hasher(self.graph.node_count(), Default::default());

        let mut max_depth = 0usize;
        for node in self.topo_order() {
            let depth = self
                .graph
                .edges_directed(node, Direction::Incoming)
                .map(|e| depths[&e.source()] + 1)
                .max()
                .unwrap_or(0);
            max_depth = max_depth.max(depth);
            depths.insert(node, depth);
        }
        max_depth
    }

    /// Iterate over gates in a topological order of the DAG.
    ///
    /// The order is deterministic for a given construction sequence and
    /// respects per-qubit insertion order. The traversal is single-pass;
    /// nothing is cached on the circuit.
    pub fn gates(&self) -> impl Iterator<Item = (Target, &Gate)> + '_ {
        self.topo_order().into_iter().map(|idx| {
            let node = &self.graph[idx];
            (node.target, &node.gate)
        })
    }

    /// Append every gate of `other`, in its topological order.
    pub fn join(&mut self, other: &Circuit) -> CircuitResult<()> {
        if other.width != self.width {
            return Err(CircuitError::WidthMismatch {
                left: self.width,
                right: other.width,
            });
        }
        for (target, gate) in other.gates() {
            self.add_gate(target, gate.clone())?;
        }
        Ok(())
    }

    fn topo_order(&self) -> Vec<NodeIndex> {
        petgraph::algo::toposort(&self.graph, None)
            .expect("circuit DAG is acyclic by construction")
    }
}
