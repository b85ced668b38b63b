//! Network base: topology contract, gate application and circuit runs.

use num_complex::Complex64;
use ratatosk_ir::{Circuit, CircuitError, Gate, Target};
use tracing::debug;

use crate::error::{NetError, NetResult};
use crate::task::{InlineRuntime, KernelCall, Runtime};
use crate::tensor::TensorStore;

/// The capability set a concrete topology supplies.
///
/// Implementations fix the axis layout of their site tensors; the axis
/// order is part of each tensor's contract and is never permuted
/// silently.
pub trait Topology {
    /// Number of qubits.
    fn len(&self) -> usize;

    /// Whether the topology holds no qubits.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Topological distance between two qubits, in edges.
    fn distance(&self, a: usize, b: usize) -> usize;

    /// A shortest walk from `a` towards `b`, starting at `a`'s first
    /// neighbour on the walk and ending with `b`.
    ///
    /// Only called when `distance(a, b) > 1`.
    fn path(&self, a: usize, b: usize) -> Vec<usize>;

    /// Axis indices of the shared virtual bond between two neighbouring
    /// qubits: `(axis on a, axis on b)`.
    fn common_idx(&self, a: usize, b: usize) -> NetResult<(usize, usize)>;

    /// Shape of the site tensor at `site` in the initial state.
    fn site_shape(&self, site: usize) -> Vec<usize>;

    /// Inner product of the stored state with a computational-basis
    /// state, by fully contracting the network against the projector.
    fn amplitude(&self, store: &TensorStore, bits: &[u8]) -> NetResult<Complex64>;
}

/// A tensor network holding one site tensor per qubit.
///
/// The network owns the tensor slots and a task runtime; every kernel
/// invocation goes through the runtime so an external scheduler can
/// parallelise independent sites.
pub struct Network<T: Topology> {
    topology: T,
    store: TensorStore,
    runtime: Box<dyn Runtime>,
    chi: usize,
}

impl<T: Topology> Network<T> {
    /// Build a network in the |0…0⟩ state over the given topology,
    /// submitting one init kernel per site.
    pub(crate) fn assemble(
        topology: T,
        chi: usize,
        mut runtime: Box<dyn Runtime>,
    ) -> NetResult<Self> {
        let n = topology.len();
        let mut store = TensorStore::with_width(n);
        for site in 0..n {
            runtime.submit(
                &mut store,
                KernelCall::InitZero {
                    slot: site,
                    shape: topology.site_shape(site),
                },
            )?;
        }
        Ok(Self {
            topology,
            store,
            runtime,
            chi,
        })
    }

    /// Number of qubits.
    #[inline]
    pub fn len(&self) -> usize {
        self.topology.len()
    }

    /// Whether the network holds no qubits.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.topology.is_empty()
    }

    /// The bond dimension bound χ.
    #[inline]
    pub fn chi(&self) -> usize {
        self.chi
    }

    /// The underlying topology.
    pub fn topology(&self) -> &T {
        &self.topology
    }

    /// Apply a gate to the network.
    ///
    /// Single-qubit targets go straight to an `apply1` task. Adjacent
    /// pairs go to one `apply2` task; non-adjacent pairs are routed with
    /// a SWAP chain along the topology's shortest walk and unrouted in
    /// strict reverse order afterwards, so logical qubit positions are
    /// restored. The first target always meets the operator's first
    /// physical axis.
    pub fn apply(&mut self, target: impl Into<Target>, gate: &Gate) -> NetResult<()> {
        let target = target.into();
        if gate.num_qubits() != target.arity() {
            return Err(NetError::Ir(CircuitError::GateArity {
                gate: gate.name(),
                expected: gate.num_qubits(),
                got: target.arity(),
            }));
        }
        for &qubit in &target.qubits() {
            if qubit >= self.len() {
                return Err(NetError::QubitOutOfRange {
                    qubit,
                    width: self.len(),
                });
            }
        }

        match target {
            Target::Single(qubit) => {
                debug!(gate = %gate, qubit, "apply1");
                self.runtime.submit(
                    &mut self.store,
                    KernelCall::Apply1 {
                        slot: qubit,
                        op: gate.mat(),
                    },
                )?;
            }
            Target::Pair(a, b) => {
                if a == b {
                    return Err(NetError::Ir(CircuitError::DuplicateQubit {
                        gate: gate.name(),
                        qubit: a,
                    }));
                }
                self.apply_pair(a, b, gate)?;
            }
        }
        Ok(())
    }

    /// Run a circuit by applying its gates in topological order.
    pub fn run(&mut self, circuit: &Circuit) -> NetResult<()> {
        if circuit.num_qubits() != self.len() {
            return Err(NetError::WidthMismatch {
                circuit: circuit.num_qubits(),
                network: self.len(),
            });
        }
        debug!(gates = circuit.num_gates(), depth = circuit.depth(), "run");
        for (target, gate) in circuit.gates() {
            self.apply(target, gate)?;
        }
        Ok(())
    }

    /// Amplitude of the computational-basis state named by `bitstring`.
    ///
    /// The string must have length `n` with characters '0' or '1'; index
    /// 0 corresponds to qubit 0. This is a user-observable boundary, so
    /// the runtime is drained first.
    pub fn amplitude(&mut self, bitstring: &str) -> NetResult<Complex64> {
        let bits = parse_bitstring(bitstring, self.len())?;
        self.runtime.drain(&mut self.store)?;
        self.topology.amplitude(&self.store, &bits)
    }

    /// Route and apply a two-qubit gate.
    fn apply_pair(&mut self, a: usize, b: usize, gate: &Gate) -> NetResult<()> {
        if self.topology.distance(a, b) == 1 {
            debug!(gate = %gate, a, b, "apply2 direct");
            return self.submit_pair(a, b, gate.mat());
        }

        // Swap the logical qubit at `a` along the walk until it sits
        // next to `b`.
        let walk = self.topology.path(a, b);
        debug!(gate = %gate, a, b, ?walk, "apply2 routed");
        let swap = Gate::swap().mat();
        let mut forward = Vec::with_capacity(walk.len() - 1);
        let mut cursor = a;
        for &step in &walk[..walk.len() - 1] {
            self.submit_pair(cursor, step, swap.clone())?;
            forward.push((cursor, step));
            cursor = step;
        }

        self.submit_pair(cursor, b, gate.mat())?;

        // Undo the SWAP chain in strict reverse order so every logical
        // qubit returns to its home position.
        for &(lhs, rhs) in forward.iter().rev() {
            self.submit_pair(lhs, rhs, swap.clone())?;
        }
        Ok(())
    }

    /// Submit one `apply2` task across the bond shared by two
    /// neighbouring sites.
    fn submit_pair(
        &mut self,
        a: usize,
        b: usize,
        op: ndarray::Array2<Complex64>,
    ) -> NetResult<()> {
        let (idx_a, idx_b) = self.topology.common_idx(a, b)?;
        self.runtime.submit(
            &mut self.store,
            KernelCall::Apply2 {
                a,
                idx_a,
                b,
                idx_b,
                op,
            },
        )?;
        Ok(())
    }
}

/// Parse an `n`-character {0,1} string into bits.
fn parse_bitstring(bitstring: &str, n: usize) -> NetResult<Vec<u8>> {
    if bitstring.len() != n {
        return Err(NetError::BitstringLength {
            expected: n,
            got: bitstring.len(),
        });
    }
    bitstring
        .chars()
        .enumerate()
        .map(|(position, symbol)| match symbol {
            '0' => Ok(0),
            '1' => Ok(1),
            _ => Err(NetError::BitstringSymbol { symbol, position }),
        })
        .collect()
}

/// Default runtime used by the concrete network constructors.
pub(crate) fn default_runtime() -> Box<dyn Runtime> {
    Box::new(InlineRuntime::default())
}
