//! Gate targets: one qubit or an ordered pair of qubits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The qubit operand(s) of a gate.
///
/// A two-qubit target is ordered: the first qubit corresponds to the
/// operator's first physical axis (the control slot for controlled gates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    /// A single-qubit target.
    Single(usize),
    /// An ordered pair of distinct qubits.
    Pair(usize, usize),
}

impl Target {
    /// Number of qubits this target names.
    #[inline]
    pub fn arity(&self) -> usize {
        match self {
            Target::Single(_) => 1,
            Target::Pair(_, _) => 2,
        }
    }

    /// The qubit indices, first operand first.
    pub fn qubits(&self) -> Vec<usize> {
        match *self {
            Target::Single(q) => vec![q],
            Target::Pair(a, b) => vec![a, b],
        }
    }
}

impl From<usize> for Target {
    fn from(q: usize) -> Self {
        Target::Single(q)
    }
}

impl From<(usize, usize)> for Target {
    fn from((a, b): (usize, usize)) -> Self {
        Target::Pair(a, b)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Single(q) => write!(f, "q{q}"),
            Target::Pair(a, b) => write!(f, "(q{a}, q{b})"),
        }
    }
}
