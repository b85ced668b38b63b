//! Tensor storage and contraction glue.
//!
//! Site tensors are dynamic-rank complex arrays. The store owns one slot
//! per qubit; kernels mutate slots in place through exclusive borrows.

use ndarray::{Array, Array2, ArrayD, IxDyn};
use num_complex::Complex64;

use crate::error::{NetError, NetResult};

/// A complex tensor of dynamic rank.
pub type Tensor = ArrayD<Complex64>;

/// The network's tensor slots, one per qubit.
///
/// Slots are exclusively owned here; the task layer hands kernels
/// `&mut Tensor` borrows, so two tasks can never hold the same slot at
/// once.
#[derive(Debug, Clone)]
pub struct TensorStore {
    slots: Vec<Tensor>,
}

impl TensorStore {
    /// Create a store with one placeholder slot per qubit.
    ///
    /// Slots hold empty tensors until an init kernel fills them.
    pub fn with_width(n: usize) -> Self {
        Self {
            slots: vec![Array::zeros(IxDyn(&[0])); n],
        }
    }

    /// Number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the store has no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Borrow the tensor in slot `i`.
    #[inline]
    pub fn get(&self, i: usize) -> &Tensor {
        &self.slots[i]
    }

    /// Exclusively borrow the tensor in slot `i`.
    #[inline]
    pub fn get_mut(&mut self, i: usize) -> &mut Tensor {
        &mut self.slots[i]
    }

    /// Replace the tensor in slot `i`.
    pub fn replace(&mut self, i: usize, tensor: Tensor) {
        self.slots[i] = tensor;
    }

    /// Exclusively borrow two distinct slots at once.
    ///
    /// # Panics
    ///
    /// Panics if `a == b`; the caller guarantees distinct slots.
    pub fn pair_mut(&mut self, a: usize, b: usize) -> (&mut Tensor, &mut Tensor) {
        assert_ne!(a, b, "pair_mut requires distinct slots");
        if a < b {
            let (lo, hi) = self.slots.split_at_mut(b);
            (&mut lo[a], &mut hi[0])
        } else {
            let (lo, hi) = self.slots.split_at_mut(a);
            (&mut hi[0], &mut lo[b])
        }
    }
}

/// Contract `a` and `b` over the given axis lists.
///
/// The result's axes are `a`'s free axes in order, then `b`'s free axes
/// in order. This is permutation + reshape glue over the numeric
/// library's matrix product; extents on paired axes must match.
pub(crate) fn tensordot(
    a: &Tensor,
    axes_a: &[usize],
    b: &Tensor,
    axes_b: &[usize],
) -> NetResult<Tensor> {
    if axes_a.len() != axes_b.len() {
        return Err(NetError::ShapeMismatch {
            context: "tensordot axes",
            expected: axes_a.to_vec(),
            got: axes_b.to_vec(),
        });
    }
    for (&i, &j) in axes_a.iter().zip(axes_b) {
        if a.shape()[i] != b.shape()[j] {
            return Err(NetError::ShapeMismatch {
                context: "tensordot",
                expected: vec![a.shape()[i]],
                got: vec![b.shape()[j]],
            });
        }
    }

    let free_a: Vec<usize> = (0..a.ndim()).filter(|i| !axes_a.contains(i)).collect();
    let free_b: Vec<usize> = (0..b.ndim()).filter(|i| !axes_b.contains(i)).collect();

    let m: usize = free_a.iter().map(|&i| a.shape()[i]).product();
    let k: usize = axes_a.iter().map(|&i| a.shape()[i]).product();
    let n: usize = free_b.iter().map(|&i| b.shape()[i]).product();

    // Move contracted axes of `a` to the back, of `b` to the front, then
    // flatten both to matrices and multiply.
    let perm_a: Vec<usize> = free_a.iter().chain(axes_a).copied().collect();
    let perm_b: Vec<usize> = axes_b.iter().chain(&free_b).copied().collect();

    let lhs = flatten(a.view().permuted_axes(perm_a), m, k);
    let rhs = flatten(b.view().permuted_axes(perm_b), k, n);
    let product = lhs.dot(&rhs);

    let mut out_dims: Vec<usize> = free_a.iter().map(|&i| a.shape()[i]).collect();
    out_dims.extend(free_b.iter().map(|&i| b.shape()[i]));
    Ok(product
        .into_shape_with_order(IxDyn(&out_dims))
        .expect("tensordot output extents multiply to the matrix product size"))
}

/// Copy a (possibly strided) view into a freshly laid-out matrix.
fn flatten(view: ndarray::ArrayViewD<'_, Complex64>, rows: usize, cols: usize) -> Array2<Complex64> {
    Array::from_shape_vec((rows, cols), view.iter().copied().collect())
        .expect("flatten target extents multiply to the view's length")
}
