//! Error types for the tensor-network engine.

use ratatosk_ir::CircuitError;
use thiserror::Error;

/// Errors raised by network construction, topology queries and kernels.
///
/// Everything here is a programming error by contract: the engine fails
/// fast at the call site and nothing is retried.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NetError {
    /// Network created with zero qubits.
    #[error("network width must be positive")]
    ZeroWidth,

    /// Bond dimension too small to hold the virtual bonds.
    #[error("bond dimension chi = {chi} must be greater than 2")]
    BondTooSmall {
        /// The offending bond dimension.
        chi: usize,
    },

    /// Tree arity too small for heap indexing.
    #[error("tree arity arb = {arb} must be at least 2")]
    ArityTooSmall {
        /// The offending arity.
        arb: usize,
    },

    /// Qubit index outside the network.
    #[error("qubit {qubit} out of range for width {width}")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: usize,
        /// The network width.
        width: usize,
    },

    /// `common_idx` asked for the shared bond of non-neighbouring qubits.
    #[error("qubits {a} and {b} are not topological neighbours")]
    NotAdjacent {
        /// First qubit.
        a: usize,
        /// Second qubit.
        b: usize,
    },

    /// Circuit and network widths differ in `run`.
    #[error("cannot run a {circuit}-qubit circuit on a {network}-qubit network")]
    WidthMismatch {
        /// Width of the circuit.
        circuit: usize,
        /// Width of the network.
        network: usize,
    },

    /// Bitstring length does not match the network width.
    #[error("bitstring length {got} does not match network width {expected}")]
    BitstringLength {
        /// Expected length (network width).
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Bitstring contains a character other than '0' or '1'.
    #[error("invalid bitstring symbol '{symbol}' at position {position}")]
    BitstringSymbol {
        /// The offending character.
        symbol: char,
        /// Its position in the string.
        position: usize,
    },

    /// Tensor shapes do not line up at a contraction or reshape.
    #[error("shape mismatch in {context}: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Which kernel or helper detected the mismatch.
        context: &'static str,
        /// The expected extents.
        expected: Vec<usize>,
        /// The extents actually seen.
        got: Vec<usize>,
    },

    /// Invalid gate/target combination forwarded from the IR layer.
    #[error(transparent)]
    Ir(#[from] CircuitError),
}

/// Result type for network operations.
pub type NetResult<T> = Result<T, NetError>;
