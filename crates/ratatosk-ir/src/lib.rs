//! Ratatosk circuit intermediate representation.
//!
//! This crate provides the gate catalogue and the circuit DAG consumed by
//! the tensor-network evolution engine in `ratatosk-net`.
//!
//! # Overview
//!
//! A [`Circuit`] is a directed acyclic graph of gate nodes with one causal
//! chain per qubit line. Two-qubit gates fuse two chains at a node; gates
//! on disjoint qubits stay unordered, so a scheduler may run them in
//! parallel and [`Circuit::depth`] (the longest path, in edges) is a
//! meaningful cost metric.
//!
//! # Core components
//!
//! - **Gates**: [`Gate`] value objects with a display name and an
//!   on-demand 2×2 or 4×4 complex matrix
//! - **Targets**: [`Target`] tagging the one- or two-qubit operand form
//! - **Circuit**: [`Circuit`] append-only DAG with per-qubit head pointers
//!
//! # Example: Bell pair
//!
//! ```rust
//! use ratatosk_ir::{Circuit, Gate};
//!
//! let mut circuit = Circuit::new(2).unwrap();
//! circuit.add_gate(0, Gate::h()).unwrap();
//! circuit.add_gate((0, 1), Gate::cx()).unwrap();
//!
//! assert_eq!(circuit.num_gates(), 2);
//! assert_eq!(circuit.depth(), 1); // one causal edge: h → cx
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod target;

pub use circuit::{Circuit, GateNode, NodeIndex};
pub use error::{CircuitError, CircuitResult};
pub use gate::Gate;
pub use target::Target;
