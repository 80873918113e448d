use super::{MatrixRead, MatrixWrite, assert_transposed_shapes};

/// Row-wise scan transpose: dst = src^T
///
/// This is the textbook double loop. It walks the source sequentially but
/// writes the destination with stride `rows`, so every write in a column
/// of the destination lands on a different cache line. On the graded
/// direct-mapped cache it misses on nearly every destination access.
///
/// Use this as a correctness baseline, not for performance.
///
/// # Example
///
/// ```
/// use cachetrans::matrix::transpose::transpose_row_wise;
/// use cachetrans::matrix::{MatrixMut, MatrixRef};
///
/// let src = vec![1, 2, 3,   // 2×3 matrix
///                4, 5, 6];
/// let mut dst = vec![0; 6]; // will be 3×2
///
/// transpose_row_wise(&MatrixRef::new(&src, 2, 3), &mut MatrixMut::new(&mut dst, 3, 2));
///
/// assert_eq!(dst, vec![1, 4,   // 3×2 matrix
///                      2, 5,
///                      3, 6]);
/// ```
///
/// # Panics
///
/// Panics if `dst` is not `cols × rows`.
pub fn transpose_row_wise<S, D>(src: &S, dst: &mut D)
where
    S: MatrixRead + ?Sized,
    D: MatrixWrite + ?Sized,
{
    assert_transposed_shapes(src, &*dst);

    for i in 0..src.rows() {
        for j in 0..src.cols() {
            dst.set(j, i, src.get(i, j));
        }
    }
}
