//! Quantum gate catalogue.
//!
//! Gates are immutable value objects exposing a display name and a dense
//! complex matrix: 2×2 for single-qubit gates, 4×4 for two-qubit gates.
//! Parameterised gates store their angles and recompute the matrix on
//! demand.

use std::f64::consts::PI;
use std::fmt;

use ndarray::{Array2, array};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{CircuitError, CircuitResult};

/// The concrete gate kinds backing [`Gate`].
///
/// Kept private so that the range checks in [`Gate::u3`] and
/// [`Gate::controlled`] cannot be bypassed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Kind {
    // Single-qubit Pauli gates
    I,
    X,
    Y,
    Z,

    // Single-qubit Clifford / phase gates
    H,
    S,
    Sdg,
    T,
    Tdg,

    // Single-qubit rotations
    Rx(f64),
    Ry(f64),
    Rz(f64),
    U3 { theta: f64, phi: f64, lambda: f64 },

    // Two-qubit gates
    Controlled(Box<Gate>),
    Cx,
    Cy,
    Cz,
    Swap,
}

/// A quantum gate acting on one or two qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    kind: Kind,
}

impl Gate {
    /// Identity gate.
    pub fn i() -> Self {
        Self { kind: Kind::I }
    }

    /// Pauli-X gate.
    pub fn x() -> Self {
        Self { kind: Kind::X }
    }

    /// Pauli-Y gate.
    pub fn y() -> Self {
        Self { kind: Kind::Y }
    }

    /// Pauli-Z gate.
    pub fn z() -> Self {
        Self { kind: Kind::Z }
    }

    /// Hadamard gate.
    pub fn h() -> Self {
        Self { kind: Kind::H }
    }

    /// S gate (sqrt(Z)).
    pub fn s() -> Self {
        Self { kind: Kind::S }
    }

    /// S-dagger gate.
    pub fn sdg() -> Self {
        Self { kind: Kind::Sdg }
    }

    /// T gate (fourth root of Z).
    pub fn t() -> Self {
        Self { kind: Kind::T }
    }

    /// T-dagger gate.
    pub fn tdg() -> Self {
        Self { kind: Kind::Tdg }
    }

    /// Rotation around the X axis.
    pub fn rx(theta: f64) -> Self {
        Self {
            kind: Kind::Rx(theta),
        }
    }

    /// Rotation around the Y axis.
    pub fn ry(theta: f64) -> Self {
        Self {
            kind: Kind::Ry(theta),
        }
    }

    /// Rotation around the Z axis.
    pub fn rz(theta: f64) -> Self {
        Self {
            kind: Kind::Rz(theta),
        }
    }

    /// Universal single-qubit gate U3(θ, φ, λ).
    ///
    /// Angles are restricted to θ ∈ [0, π], φ ∈ [0, 2π], λ ∈ [0, 2π].
    pub fn u3(theta: f64, phi: f64, lambda: f64) -> CircuitResult<Self> {
        if !(0.0..=PI).contains(&theta) {
            return Err(CircuitError::AngleOutOfRange {
                gate: "u3",
                angle: "theta",
                value: theta,
            });
        }
        if !(0.0..=2.0 * PI).contains(&phi) {
            return Err(CircuitError::AngleOutOfRange {
                gate: "u3",
                angle: "phi",
                value: phi,
            });
        }
        if !(0.0..=2.0 * PI).contains(&lambda) {
            return Err(CircuitError::AngleOutOfRange {
                gate: "u3",
                angle: "lambda",
                value: lambda,
            });
        }
        Ok(Self {
            kind: Kind::U3 { theta, phi, lambda },
        })
    }

    /// Controlled version of a single-qubit gate.
    ///
    /// Embeds `gate` into the lower-right 2×2 block of a 4×4 matrix, with
    /// the identity on the control-0 subspace. The control qubit is the
    /// first operand.
    pub fn controlled(gate: Gate) -> CircuitResult<Self> {
        if gate.num_qubits() != 1 {
            return Err(CircuitError::GateArity {
                gate: gate.name(),
                expected: 1,
                got: gate.num_qubits(),
            });
        }
        Ok(Self {
            kind: Kind::Controlled(Box::new(gate)),
        })
    }

    /// Controlled-X (CNOT) gate.
    pub fn cx() -> Self {
        Self { kind: Kind::Cx }
    }

    /// Controlled-Y gate.
    pub fn cy() -> Self {
        Self { kind: Kind::Cy }
    }

    /// Controlled-Z gate.
    pub fn cz() -> Self {
        Self { kind: Kind::Cz }
    }

    /// SWAP gate: permutes |01⟩ ↔ |10⟩.
    pub fn swap() -> Self {
        Self { kind: Kind::Swap }
    }

    /// Get the display name of this gate.
    pub fn name(&self) -> String {
        match &self.kind {
            Kind::I => "id".into(),
            Kind::X => "x".into(),
            Kind::Y => "y".into(),
            Kind::Z => "z".into(),
            Kind::H => "h".into(),
            Kind::S => "s".into(),
            Kind::Sdg => "sdg".into(),
            Kind::T => "t".into(),
            Kind::Tdg => "tdg".into(),
            Kind::Rx(_) => "rx".into(),
            Kind::Ry(_) => "ry".into(),
            Kind::Rz(_) => "rz".into(),
            Kind::U3 { .. } => "u3".into(),
            Kind::Controlled(inner) => format!("c{}", inner.name()),
            Kind::Cx => "cx".into(),
            Kind::Cy => "cy".into(),
            Kind::Cz => "cz".into(),
            Kind::Swap => "swap".into(),
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        match &self.kind {
            Kind::I
            | Kind::X
            | Kind::Y
            | Kind::Z
            | Kind::H
            | Kind::S
            | Kind::Sdg
            | Kind::T
            | Kind::Tdg
            | Kind::Rx(_)
            | Kind::Ry(_)
            | Kind::Rz(_)
            | Kind::U3 { .. } => 1,

            Kind::Controlled(_) | Kind::Cx | Kind::Cy | Kind::Cz | Kind::Swap => 2,
        }
    }

    /// The matrix representation of this gate.
    ///
    /// Recomputed from stored parameters on every call; 2×2 for
    /// single-qubit gates, 4×4 for two-qubit gates.
    #[allow(clippy::many_single_char_names)]
    pub fn mat(&self) -> Array2<Complex64> {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        match &self.kind {
            Kind::I => array![[one, zero], [zero, one]],
            Kind::X => array![[zero, one], [one, zero]],
            Kind::Y => array![
                [zero, Complex64::new(0.0, -1.0)],
                [Complex64::new(0.0, 1.0), zero]
            ],
            Kind::Z => array![[one, zero], [zero, -one]],
            Kind::H => {
                let s = Complex64::new(1.0 / 2.0_f64.sqrt(), 0.0);
                array![[s, s], [s, -s]]
            }
            Kind::S => array![[one, zero], [zero, Complex64::new(0.0, 1.0)]],
            Kind::Sdg => array![[one, zero], [zero, Complex64::new(0.0, -1.0)]],
            Kind::T => array![[one, zero], [zero, Complex64::from_polar(1.0, PI / 4.0)]],
            Kind::Tdg => array![[one, zero], [zero, Complex64::from_polar(1.0, -PI / 4.0)]],
            Kind::Rx(theta) => {
                let c = Complex64::new((theta / 2.0).cos(), 0.0);
                let s = Complex64::new(0.0, -(theta / 2.0).sin());
                array![[c, s], [s, c]]
            }
            Kind::Ry(theta) => {
                let c = Complex64::new((theta / 2.0).cos(), 0.0);
                let s = Complex64::new((theta / 2.0).sin(), 0.0);
                array![[c, -s], [s, c]]
            }
            Kind::Rz(theta) => array![
                [Complex64::from_polar(1.0, -theta / 2.0), zero],
                [zero, Complex64::from_polar(1.0, theta / 2.0)]
            ],
            Kind::U3 { theta, phi, lambda } => {
                let c = (theta / 2.0).cos();
                let s = (theta / 2.0).sin();
                array![
                    [
                        Complex64::new(c, 0.0),
                        -Complex64::from_polar(s, *lambda)
                    ],
                    [
                        Complex64::from_polar(s, *phi),
                        Complex64::from_polar(c, phi + lambda)
                    ]
                ]
            }
            Kind::Controlled(inner) => embed_controlled(&inner.mat()),
            Kind::Cx => embed_controlled(&Gate::x().mat()),
            Kind::Cy => embed_controlled(&Gate::y().mat()),
            Kind::Cz => embed_controlled(&Gate::z().mat()),
            Kind::Swap => array![
                [one, zero, zero, zero],
                [zero, zero, one, zero],
                [zero, one, zero, zero],
                [zero, zero, zero, one]
            ],
        }
    }
}

/// Embed a 2×2 matrix into the lower-right block of a 4×4 identity.
fn embed_controlled(u: &Array2<Complex64>) -> Array2<Complex64> {
    let mut m = Array2::zeros((4, 4));
    m[[0, 0]] = Complex64::new(1.0, 0.0);
    m[[1, 1]] = Complex64::new(1.0, 0.0);
    m[[2, 2]] = u[[0, 0]];
    m[[2, 3]] = u[[0, 1]];
    m[[3, 2]] = u[[1, 0]];
    m[[3, 3]] = u[[1, 1]];
    m
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
