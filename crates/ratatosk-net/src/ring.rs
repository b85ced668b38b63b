//! Ring topology: a matrix product state closed into a ring.
//!
//! Site tensors carry axes (physical, counterclockwise bond,
//! clockwise bond). Stepping from site `i` to `(i + 1) mod n` exits
//! through `i`'s clockwise axis and enters the neighbour's
//! counterclockwise axis.

use ndarray::{Array2, Axis, Ix2};
use num_complex::Complex64;

use crate::error::{NetError, NetResult};
use crate::network::{Network, Topology, default_runtime};
use crate::task::Runtime;
use crate::tensor::TensorStore;

/// Qubits 0…n−1 arranged on a ring.
#[derive(Debug, Clone)]
pub struct RingLattice {
    n: usize,
    chi: usize,
}

impl RingLattice {
    /// Create a ring of `n` qubits with bond dimension `chi`.
    pub fn new(n: usize, chi: usize) -> NetResult<Self> {
        if n == 0 {
            return Err(NetError::ZeroWidth);
        }
        if chi <= 2 {
            return Err(NetError::BondTooSmall { chi });
        }
        Ok(Self { n, chi })
    }
}

impl Topology for RingLattice {
    fn len(&self) -> usize {
        self.n
    }

    fn distance(&self, a: usize, b: usize) -> usize {
        let d = a.abs_diff(b);
        d.min(self.n - d)
    }

    fn path(&self, a: usize, b: usize) -> Vec<usize> {
        let n = self.n;
        let clockwise_steps = (b + n - a) % n;
        let counter_steps = (a + n - b) % n;
        // Shorter direction wins; ties go counterclockwise.
        let clockwise = clockwise_steps < counter_steps;

        let mut walk = Vec::with_capacity(clockwise_steps.min(counter_steps));
        let mut cursor = a;
        while cursor != b {
            cursor = if clockwise {
                (cursor + 1) % n
            } else {
                (cursor + n - 1) % n
            };
            walk.push(cursor);
        }
        walk
    }

    fn common_idx(&self, a: usize, b: usize) -> NetResult<(usize, usize)> {
        if self.distance(a, b) != 1 {
            return Err(NetError::NotAdjacent { a, b });
        }
        // b sits clockwise of a: a's clockwise axis meets b's
        // counterclockwise axis.
        if (a + 1) % self.n == b {
            Ok((2, 1))
        } else {
            Ok((1, 2))
        }
    }

    fn site_shape(&self, _site: usize) -> Vec<usize> {
        vec![2, self.chi, self.chi]
    }

    fn amplitude(&self, store: &TensorStore, bits: &[u8]) -> NetResult<Complex64> {
        // Project every site on its bit, then close the ring: multiply
        // the bond matrices in site order and take the trace.
        let mut transfer: Option<Array2<Complex64>> = None;
        for (site, &bit) in bits.iter().enumerate() {
            let projected = store
                .get(site)
                .index_axis(Axis(0), bit as usize)
                .to_owned()
                .into_dimensionality::<Ix2>()
                .map_err(|_| NetError::ShapeMismatch {
                    context: "ring amplitude",
                    expected: vec![2, self.chi, self.chi],
                    got: store.get(site).shape().to_vec(),
                })?;
            transfer = Some(match transfer {
                None => projected,
                Some(acc) => acc.dot(&projected),
            });
        }
        let closed = transfer.expect("ring has at least one site");
        Ok(closed.diag().sum())
    }
}

/// A ring-shaped tensor network (closed MPS).
pub type Ring = Network<RingLattice>;

impl Network<RingLattice> {
    /// Create a ring network in the |0…0⟩ state.
    pub fn new(n: usize, chi: usize) -> NetResult<Self> {
        Self::assemble(RingLattice::new(n, chi)?, chi, default_runtime())
    }

    /// Create a ring network with a caller-supplied task runtime.
    pub fn with_runtime(n: usize, chi: usize, runtime: Box<dyn Runtime>) -> NetResult<Self> {
        Self::assemble(RingLattice::new(n, chi)?, chi, runtime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_guards() {
        assert!(matches!(RingLattice::new(0, 8), Err(NetError::ZeroWidth)));
        assert!(matches!(
            RingLattice::new(4, 2),
            Err(NetError::BondTooSmall { chi: 2 })
        ));
        assert!(RingLattice::new(4, 3).is_ok());
    }

    #[test]
    fn test_distance() {
        let ring = RingLattice::new(6, 4).unwrap();
        assert_eq!(ring.distance(0, 0), 0);
        assert_eq!(ring.distance(0, 1), 1);
        assert_eq!(ring.distance(0, 5), 1);
        assert_eq!(ring.distance(0, 3), 3);
        assert_eq!(ring.distance(1, 4), 3);
        // Symmetry and the ⌊n/2⌋ bound.
        for a in 0..6 {
            for b in 0..6 {
                assert_eq!(ring.distance(a, b), ring.distance(b, a));
                assert!(ring.distance(a, b) <= 3);
            }
        }
    }

    #[test]
    fn test_path_takes_shorter_direction() {
        let ring = RingLattice::new(5, 4).unwrap();
        // 0 → 3 is shorter counterclockwise: 0, 4, 3.
        assert_eq!(ring.path(0, 3), vec![4, 3]);
        // 0 → 2 is shorter clockwise: 0, 1, 2.
        assert_eq!(ring.path(0, 2), vec![1, 2]);
    }

    #[test]
    fn test_path_tie_goes_counterclockwise() {
        let ring = RingLattice::new(6, 4).unwrap();
        assert_eq!(ring.path(0, 3), vec![5, 4, 3]);
    }

    #[test]
    fn test_common_idx() {
        let ring = RingLattice::new(5, 4).unwrap();
        assert_eq!(ring.common_idx(0, 1).unwrap(), (2, 1));
        assert_eq!(ring.common_idx(1, 0).unwrap(), (1, 2));
        assert_eq!(ring.common_idx(4, 0).unwrap(), (2, 1));
        assert_eq!(ring.common_idx(0, 4).unwrap(), (1, 2));
        assert!(matches!(
            ring.common_idx(0, 2),
            Err(NetError::NotAdjacent { a: 0, b: 2 })
        ));
    }

    #[test]
    fn test_wraparound_pair_on_two_ring() {
        // On a 2-ring both conventions apply; the clockwise rule wins.
        let ring = RingLattice::new(2, 4).unwrap();
        assert_eq!(ring.common_idx(0, 1).unwrap(), (2, 1));
        assert_eq!(ring.common_idx(1, 0).unwrap(), (2, 1));
    }

    #[test]
    fn test_initial_amplitude() {
        let mut ring = Ring::new(3, 4).unwrap();
        let amp = ring.amplitude("000").unwrap();
        assert!((amp.re - 1.0).abs() < 1e-12);
        let amp = ring.amplitude("010").unwrap();
        assert!(amp.norm() < 1e-12);
    }

    #[test]
    fn test_amplitude_validates_bitstring() {
        let mut ring = Ring::new(3, 4).unwrap();
        assert!(matches!(
            ring.amplitude("00"),
            Err(NetError::BitstringLength { .. })
        ));
        assert!(matches!(
            ring.amplitude("0a0"),
            Err(NetError::BitstringSymbol { .. })
        ));
    }
}
