//! End-to-end tests for circuit evolution on the ring topology.

use num_complex::Complex64;
use ratatosk_ir::{Circuit, Gate};
use ratatosk_net::{NetError, Ring};

const EPSILON: f64 = 1e-9;

fn assert_close(amp: Complex64, expected: f64) {
    assert!(
        (amp.re - expected).abs() < EPSILON && amp.im.abs() < EPSILON,
        "expected {expected}, got {amp}"
    );
}

// ---------------------------------------------------------------------------
// Basic scenarios
// ---------------------------------------------------------------------------

#[test]
fn empty_circuit_leaves_ground_state() {
    let mut ring = Ring::new(2, 8).unwrap();
    let circuit = Circuit::new(2).unwrap();
    ring.run(&circuit).unwrap();

    assert_close(ring.amplitude("00").unwrap(), 1.0);
    assert_close(ring.amplitude("01").unwrap(), 0.0);
    assert_close(ring.amplitude("10").unwrap(), 0.0);
    assert_close(ring.amplitude("11").unwrap(), 0.0);
}

#[test]
fn single_hadamard_splits_amplitude() {
    let mut ring = Ring::new(1, 4).unwrap();
    let mut circuit = Circuit::new(1).unwrap();
    circuit.add_gate(0, Gate::h()).unwrap();
    ring.run(&circuit).unwrap();

    let h = 1.0 / 2.0_f64.sqrt();
    assert_close(ring.amplitude("0").unwrap(), h);
    assert_close(ring.amplitude("1").unwrap(), h);
}

#[test]
fn bell_pair() {
    let mut ring = Ring::new(2, 4).unwrap();
    let mut circuit = Circuit::new(2).unwrap();
    circuit.add_gate(0, Gate::h()).unwrap();
    circuit.add_gate((0, 1), Gate::cx()).unwrap();
    ring.run(&circuit).unwrap();

    let h = 1.0 / 2.0_f64.sqrt();
    assert_close(ring.amplitude("00").unwrap(), h);
    assert_close(ring.amplitude("11").unwrap(), h);
    assert_close(ring.amplitude("01").unwrap(), 0.0);
    assert_close(ring.amplitude("10").unwrap(), 0.0);
}

#[test]
fn run_rejects_width_mismatch() {
    let mut ring = Ring::new(3, 4).unwrap();
    let circuit = Circuit::new(2).unwrap();
    assert!(matches!(
        ring.run(&circuit),
        Err(NetError::WidthMismatch {
            circuit: 2,
            network: 3
        })
    ));
}

// ---------------------------------------------------------------------------
// Hadamard–CX–Hadamard parity layer (n = 20, χ = 64)
// ---------------------------------------------------------------------------

/// Conjugating the target of every CX with Hadamards turns the layer into
/// CZ gates on the same pairs; both evolutions must agree amplitude by
/// amplitude with the closed form 2⁻¹⁰·(−1)^Σ b₂ᵢ·b₂ᵢ₊₁ on |+…+⟩.
#[test]
fn hadamard_conjugated_cx_layer_equals_cz_layer() {
    const N: usize = 20;
    const CHI: usize = 64;

    let mut conjugated = Circuit::new(N).unwrap();
    for q in 0..N {
        conjugated.add_gate(q, Gate::h()).unwrap();
    }
    for i in 0..N / 2 {
        conjugated.add_gate(2 * i + 1, Gate::h()).unwrap();
        conjugated.add_gate((2 * i, 2 * i + 1), Gate::cx()).unwrap();
        conjugated.add_gate(2 * i + 1, Gate::h()).unwrap();
    }

    let mut plain = Circuit::new(N).unwrap();
    for q in 0..N {
        plain.add_gate(q, Gate::h()).unwrap();
    }
    for i in 0..N / 2 {
        plain.add_gate((2 * i, 2 * i + 1), Gate::cz()).unwrap();
    }

    let mut lhs = Ring::new(N, CHI).unwrap();
    lhs.run(&conjugated).unwrap();
    let mut rhs = Ring::new(N, CHI).unwrap();
    rhs.run(&plain).unwrap();

    let probe = [
        "00000000000000000000",
        "11111111111111111111",
        "10101010101010101010",
        "11000011110000111100",
        "01100110011001100110",
    ];
    let scale = 0.5_f64.powi(10);
    for bitstring in probe {
        let bits: Vec<u32> = bitstring.chars().map(|c| c.to_digit(2).unwrap()).collect();
        let pair_parity: u32 = (0..N / 2).map(|i| bits[2 * i] * bits[2 * i + 1]).sum();
        let expected = if pair_parity % 2 == 0 { scale } else { -scale };

        let a = lhs.amplitude(bitstring).unwrap();
        let b = rhs.amplitude(bitstring).unwrap();
        assert!((a - b).norm() < EPSILON, "{bitstring}: {a} vs {b}");
        assert_close(a, expected);
    }
}

// ---------------------------------------------------------------------------
// SWAP routing of non-adjacent gates (n = 5)
// ---------------------------------------------------------------------------

#[test]
fn non_adjacent_cx_routes_through_swaps() {
    let mut ring = Ring::new(5, 8).unwrap();
    let mut circuit = Circuit::new(5).unwrap();
    circuit.add_gate(0, Gate::h()).unwrap();
    circuit.add_gate((0, 3), Gate::cx()).unwrap();
    ring.run(&circuit).unwrap();

    let h = 1.0 / 2.0_f64.sqrt();
    assert_close(ring.amplitude("00000").unwrap(), h);
    assert_close(ring.amplitude("10010").unwrap(), h);
    assert_close(ring.amplitude("10000").unwrap(), 0.0);
    assert_close(ring.amplitude("00010").unwrap(), 0.0);
}

/// After the un-SWAP phase every logical qubit sits at its home site
/// again: identity gates on every site must not move any amplitude.
#[test]
fn unswap_restores_qubit_positions() {
    let mut ring = Ring::new(5, 8).unwrap();
    ring.apply(0, &Gate::h()).unwrap();
    ring.apply((0, 3), &Gate::cx()).unwrap();

    let before: Vec<Complex64> = ["00000", "10010", "01000", "00001"]
        .iter()
        .map(|s| ring.amplitude(s).unwrap())
        .collect();

    for q in 0..5 {
        ring.apply(q, &Gate::i()).unwrap();
    }

    for (s, &b) in ["00000", "10010", "01000", "00001"].iter().zip(&before) {
        let after = ring.amplitude(s).unwrap();
        assert!((after - b).norm() < EPSILON, "drift at {s}");
    }
}

/// Routing in the other ring direction: (0, 2) on a 5-ring walks
/// clockwise through 1.
#[test]
fn non_adjacent_cx_clockwise_route() {
    let mut ring = Ring::new(5, 8).unwrap();
    ring.apply(0, &Gate::h()).unwrap();
    ring.apply((0, 2), &Gate::cx()).unwrap();

    let h = 1.0 / 2.0_f64.sqrt();
    assert_close(ring.amplitude("00000").unwrap(), h);
    assert_close(ring.amplitude("10100").unwrap(), h);
}

// ---------------------------------------------------------------------------
// Round-trip laws
// ---------------------------------------------------------------------------

fn assert_ground_state(ring: &mut Ring, n: usize) {
    let zeros = "0".repeat(n);
    assert_close(ring.amplitude(&zeros).unwrap(), 1.0);
    let mut one = vec![b'0'; n];
    one[1] = b'1';
    assert_close(
        ring.amplitude(std::str::from_utf8(&one).unwrap()).unwrap(),
        0.0,
    );
}

#[test]
fn involutions_cancel() {
    for (first, second) in [(Gate::h(), Gate::h()), (Gate::x(), Gate::x())] {
        let mut ring = Ring::new(3, 4).unwrap();
        ring.apply(1, &first).unwrap();
        ring.apply(1, &second).unwrap();
        assert_ground_state(&mut ring, 3);
    }

    // Phase inverses are only visible on a superposition: sandwich them
    // between Hadamards so a leftover phase would leak into |1⟩.
    for (first, second) in [(Gate::s(), Gate::sdg()), (Gate::t(), Gate::tdg())] {
        let mut ring = Ring::new(3, 4).unwrap();
        ring.apply(1, &Gate::h()).unwrap();
        ring.apply(1, &first).unwrap();
        ring.apply(1, &second).unwrap();
        ring.apply(1, &Gate::h()).unwrap();
        assert_ground_state(&mut ring, 3);
    }
}

#[test]
fn double_swap_is_identity() {
    let mut ring = Ring::new(4, 4).unwrap();
    ring.apply(1, &Gate::x()).unwrap();
    ring.apply((1, 2), &Gate::swap()).unwrap();
    ring.apply((1, 2), &Gate::swap()).unwrap();

    assert_close(ring.amplitude("0100").unwrap(), 1.0);
    assert_close(ring.amplitude("0010").unwrap(), 0.0);
}

#[test]
fn swap_moves_excitation() {
    let mut ring = Ring::new(4, 4).unwrap();
    ring.apply(1, &Gate::x()).unwrap();
    ring.apply((1, 2), &Gate::swap()).unwrap();

    assert_close(ring.amplitude("0010").unwrap(), 1.0);
    assert_close(ring.amplitude("0100").unwrap(), 0.0);
}

// ---------------------------------------------------------------------------
// Direct apply checks
// ---------------------------------------------------------------------------

#[test]
fn apply_validates_targets() {
    let mut ring = Ring::new(3, 4).unwrap();
    assert!(matches!(
        ring.apply(7, &Gate::h()),
        Err(NetError::QubitOutOfRange { qubit: 7, width: 3 })
    ));
    assert!(ring.apply(0, &Gate::cx()).is_err());
    assert!(ring.apply((1, 1), &Gate::cx()).is_err());
}

#[test]
fn controlled_phase_from_catalogue_matches_cz() {
    let mut lhs = Ring::new(2, 4).unwrap();
    lhs.apply(0, &Gate::h()).unwrap();
    lhs.apply(1, &Gate::h()).unwrap();
    lhs.apply((0, 1), &Gate::cz()).unwrap();

    let mut rhs = Ring::new(2, 4).unwrap();
    rhs.apply(0, &Gate::h()).unwrap();
    rhs.apply(1, &Gate::h()).unwrap();
    rhs.apply((0, 1), &Gate::controlled(Gate::z()).unwrap())
        .unwrap();

    for s in ["00", "01", "10", "11"] {
        let a = lhs.amplitude(s).unwrap();
        let b = rhs.amplitude(s).unwrap();
        assert!((a - b).norm() < EPSILON);
    }
    assert_close(lhs.amplitude("11").unwrap(), -0.5);
}
