//! Error types for the IR crate.

use thiserror::Error;

/// Errors that can occur while constructing gates or circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CircuitError {
    /// Circuit created with zero qubits.
    #[error("circuit width must be positive")]
    ZeroWidth,

    /// Qubit index outside the circuit.
    #[error("qubit {qubit} out of range for width {width}")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: usize,
        /// The circuit width.
        width: usize,
    },

    /// Two-qubit target names the same qubit twice.
    #[error("gate '{gate}' targets qubit {qubit} twice")]
    DuplicateQubit {
        /// Name of the gate.
        gate: String,
        /// The duplicated qubit index.
        qubit: usize,
    },

    /// Gate arity does not match the target.
    #[error("gate '{gate}' acts on {expected} qubit(s), got a {got}-qubit target")]
    GateArity {
        /// Name of the gate.
        gate: String,
        /// Number of qubits the gate acts on.
        expected: usize,
        /// Number of qubits in the target.
        got: usize,
    },

    /// Circuits of different widths cannot be joined.
    #[error("cannot join a {right}-qubit circuit onto a {left}-qubit circuit")]
    WidthMismatch {
        /// Width of the receiving circuit.
        left: usize,
        /// Width of the appended circuit.
        right: usize,
    },

    /// Gate parameter outside its allowed range.
    #[error("{gate}: {angle} = {value} outside its allowed range")]
    AngleOutOfRange {
        /// Name of the gate.
        gate: &'static str,
        /// Name of the angle parameter.
        angle: &'static str,
        /// The offending value.
        value: f64,
    },
}

/// Result type for IR operations.
pub type CircuitResult<T> = Result<T, CircuitError>;
