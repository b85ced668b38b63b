//! Tensor kernels.
//!
//! The four side-effecting primitives the task layer schedules:
//! initialisation of basis-state tensors, single-qubit application, and
//! the two-qubit contract + SVD-truncate step that keeps every virtual
//! bond at or below the network's bond dimension.
//!
//! By convention the physical axis of a site tensor is axis 0 and has
//! extent 2; all remaining axes are virtual bonds.

use nalgebra::DMatrix;
use ndarray::{Array, Array2, IxDyn};
use num_complex::Complex64;
use tracing::debug;

use crate::error::{NetError, NetResult};
use crate::tensor::{Tensor, tensordot};

/// A fresh tensor of the given shape holding the all-zeros basis state:
/// zero everywhere except a 1 at flat index 0.
pub fn init_zero(shape: &[usize]) -> Tensor {
    debug!(?shape, "init_zero");
    let mut tensor = Tensor::zeros(IxDyn(shape));
    if let Some(first) = tensor.iter_mut().next() {
        *first = Complex64::new(1.0, 0.0);
    }
    tensor
}

/// A fresh tensor of the given shape with a 1 at flat index 1, the
/// |…01⟩ basis element in row-major flattening.
pub fn init_one(shape: &[usize]) -> Tensor {
    debug!(?shape, "init_one");
    let mut tensor = Tensor::zeros(IxDyn(shape));
    if let Some(second) = tensor.iter_mut().nth(1) {
        *second = Complex64::new(1.0, 0.0);
    }
    tensor
}

/// Apply a 2×2 operator to a site tensor in place.
///
/// The tensor is viewed as a matrix with the physical axis first and all
/// virtual axes flattened; the operator premultiplies it and the result
/// is written back in the original shape.
pub fn apply1(psi: &mut Tensor, op: &Array2<Complex64>) -> NetResult<()> {
    debug!(shape = ?psi.shape(), "apply1");
    if op.dim() != (2, 2) {
        return Err(NetError::ShapeMismatch {
            context: "apply1 operator",
            expected: vec![2, 2],
            got: op.shape().to_vec(),
        });
    }
    if psi.shape().first() != Some(&2) {
        return Err(NetError::ShapeMismatch {
            context: "apply1 physical axis",
            expected: vec![2],
            got: psi.shape().to_vec(),
        });
    }

    let dim = psi.raw_dim();
    let cols = psi.len() / 2;
    let flat = Array::from_shape_vec((2, cols), psi.iter().copied().collect())
        .expect("site tensor flattens to (2, rest)");
    *psi = op
        .dot(&flat)
        .into_shape_with_order(dim)
        .expect("matrix product restores the original site shape");
    Ok(())
}

/// Apply a 4×4 operator across the shared bond of two site tensors.
///
/// `idx_a` and `idx_b` name the virtual axes carrying the bond between
/// `a` and `b`. The pair is contracted over that bond, the operator is
/// applied to the two physical axes (first target ↔ first physical axis),
/// and the pair is split again by SVD. Singular values beyond the bond
/// extent are discarded and S is absorbed into the `a`-side factor; both
/// tensors come back in their original shape and index order.
pub fn apply2(
    a: &mut Tensor,
    idx_a: usize,
    b: &mut Tensor,
    idx_b: usize,
    op: &Array2<Complex64>,
) -> NetResult<()> {
    debug!(
        a_shape = ?a.shape(),
        b_shape = ?b.shape(),
        idx_a,
        idx_b,
        "apply2"
    );
    if op.dim() != (4, 4) {
        return Err(NetError::ShapeMismatch {
            context: "apply2 operator",
            expected: vec![4, 4],
            got: op.shape().to_vec(),
        });
    }
    for (tensor, idx, context) in [(&*a, idx_a, "apply2 lhs"), (&*b, idx_b, "apply2 rhs")] {
        if tensor.shape().first() != Some(&2) || idx == 0 || idx >= tensor.ndim() {
            return Err(NetError::ShapeMismatch {
                context,
                expected: vec![2],
                got: tensor.shape().to_vec(),
            });
        }
    }
    let bond = a.shape()[idx_a];
    if bond != b.shape()[idx_b] {
        return Err(NetError::ShapeMismatch {
            context: "apply2 bond",
            expected: vec![bond],
            got: vec![b.shape()[idx_b]],
        });
    }

    let shape_a = a.shape().to_vec();
    let shape_b = b.shape().to_vec();
    let rank_a = a.ndim();
    let rank_b = b.ndim();

    // Contract the pair over the shared bond. Axes of `pair`:
    // (a-physical, a-other-virtuals…, b-physical, b-other-virtuals…).
    let pair = tensordot(a, &[idx_a], b, &[idx_b])?;
    let b_phys = rank_a - 1;

    // Contract the operator's input indices against the two physical
    // axes, so the update is U·ψ. Remaining axes:
    // (a-virtuals…, b-virtuals…, a-physical', b-physical').
    let u4 = op
        .to_owned()
        .into_shape_with_order(IxDyn(&[2, 2, 2, 2]))
        .expect("a 4×4 operator reshapes to (2, 2, 2, 2)");
    let evolved = tensordot(&pair, &[0, b_phys], &u4, &[2, 3])?;

    // Bring the a-side axes to the front and the b-side axes to the back:
    // (a-physical', a-virtuals…, b-physical', b-virtuals…).
    let free_a = rank_a - 2;
    let free_b = rank_b - 2;
    let mut perm = Vec::with_capacity(evolved.ndim());
    perm.push(free_a + free_b);
    perm.extend(0..free_a);
    perm.push(free_a + free_b + 1);
    perm.extend(free_a..free_a + free_b);
    let split_ready = evolved.view().permuted_axes(perm);

    // Flatten into (a-side, b-side) and factor by SVD.
    let rows = 2 * shape_a
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != 0 && i != idx_a)
        .map(|(_, &d)| d)
        .product::<usize>();
    let cols = 2 * shape_b
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != 0 && i != idx_b)
        .map(|(_, &d)| d)
        .product::<usize>();
    let merged: Vec<Complex64> = split_ready.iter().copied().collect();
    let matrix = DMatrix::from_row_slice(rows, cols, &merged);

    let svd = matrix.svd(true, true);
    let u = svd.u.expect("SVD was asked for U");
    let v_t = svd.v_t.expect("SVD was asked for Vᵀ");
    let s = svd.singular_values;

    // Keep the leading singular values up to the bond extent and absorb
    // them into the a-side factor. Ranks below the bond extent are
    // zero-padded so both tensors keep their exact original shape.
    let keep = bond.min(s.len());
    let mut new_a = Array2::<Complex64>::zeros((rows, bond));
    for j in 0..keep {
        let weight = Complex64::new(s[j], 0.0);
        for i in 0..rows {
            new_a[[i, j]] = u[(i, j)] * weight;
        }
    }
    let mut new_b = Array2::<Complex64>::zeros((bond, cols));
    for i in 0..keep {
        for j in 0..cols {
            new_b[[i, j]] = v_t[(i, j)];
        }
    }

    *a = restore_lhs(new_a, &shape_a, idx_a);
    *b = restore_rhs(new_b, &shape_b, idx_b);
    Ok(())
}

/// Reshape the a-side factor (rows × bond) back into the original site
/// shape, reinserting the bond axis at `idx_a`.
fn restore_lhs(factor: Array2<Complex64>, shape: &[usize], idx_a: usize) -> Tensor {
    // Natural axis order after reshape: physical, other virtuals, bond.
    let mut dims: Vec<usize> = vec![2];
    dims.extend(
        shape
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != 0 && i != idx_a)
            .map(|(_, &d)| d),
    );
    dims.push(shape[idx_a]);
    let natural = factor
        .into_shape_with_order(IxDyn(&dims))
        .expect("a-side factor reshapes to the site extents");

    // Move the bond axis from the back to its original position.
    let rank = shape.len();
    let mut perm = Vec::with_capacity(rank);
    let mut next_other = 1;
    for axis in 0..rank {
        if axis == 0 {
            perm.push(0);
        } else if axis == idx_a {
            perm.push(rank - 1);
        } else {
            perm.push(next_other);
            next_other += 1;
        }
    }
    let view = natural.view().permuted_axes(perm);
    Array::from_shape_vec(IxDyn(shape), view.iter().copied().collect())
        .expect("a-side factor matches the original site shape")
}

/// Reshape the b-side factor (bond × cols) back into the original site
/// shape, moving the physical axis to the front and the bond axis to
/// `idx_b`.
fn restore_rhs(factor: Array2<Complex64>, shape: &[usize], idx_b: usize) -> Tensor {
    // Natural axis order after reshape: bond, physical, other virtuals.
    let mut dims: Vec<usize> = vec![shape[idx_b], 2];
    dims.extend(
        shape
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != 0 && i != idx_b)
            .map(|(_, &d)| d),
    );
    let natural = factor
        .into_shape_with_order(IxDyn(&dims))
        .expect("b-side factor reshapes to the site extents");

    let rank = shape.len();
    let mut perm = Vec::with_capacity(rank);
    let mut next_other = 2;
    for axis in 0..rank {
        if axis == 0 {
            perm.push(1);
        } else if axis == idx_b {
            perm.push(0);
        } else {
            perm.push(next_other);
            next_other += 1;
        }
    }
    let view = natural.view().permuted_axes(perm);
    Array::from_shape_vec(IxDyn(shape), view.iter().copied().collect())
        .expect("b-side factor matches the original site shape")
}
