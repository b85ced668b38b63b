//! Ratatosk tensor-network evolution engine.
//!
//! Evolves an approximate wavefunction stored as a network of small
//! rank-3 site tensors, one per qubit, whose virtual bonds are truncated
//! to a fixed maximum dimension χ by singular value decomposition. Gates
//! come from a `ratatosk-ir` circuit; non-adjacent two-qubit gates are
//! routed through SWAP chains over the topology and un-routed afterwards.
//!
//! Every tensor mutation is a typed task with direction-tagged arguments
//! submitted to a [`Runtime`], so an external distributed scheduler can
//! parallelise kernels on disjoint sites. The bundled backends run
//! kernels synchronously ([`InlineRuntime`]) or replay them from the
//! recorded dependency graph at the drain barrier ([`DeferredRuntime`]).
//!
//! # Example: Bell pair on a ring
//!
//! ```rust
//! use ratatosk_ir::{Circuit, Gate};
//! use ratatosk_net::Ring;
//!
//! let mut circuit = Circuit::new(2).unwrap();
//! circuit.add_gate(0, Gate::h()).unwrap();
//! circuit.add_gate((0, 1), Gate::cx()).unwrap();
//!
//! let mut ring = Ring::new(2, 4).unwrap();
//! ring.run(&circuit).unwrap();
//!
//! let amp = ring.amplitude("11").unwrap();
//! assert!((amp.norm() - 1.0 / 2.0_f64.sqrt()).abs() < 1e-10);
//! ```

pub mod error;
pub mod kernel;
pub mod network;
pub mod ring;
pub mod task;
pub mod tensor;
pub mod tree;

pub use error::{NetError, NetResult};
pub use network::{Network, Topology};
pub use ring::{Ring, RingLattice};
pub use task::{DeferredRuntime, Direction, InlineRuntime, KernelCall, Runtime, SlotId, TaskGraph, TaskId};
pub use tensor::{Tensor, TensorStore};
pub use tree::{Tree, TreeLattice};
