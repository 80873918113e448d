use super::MatrixRead;

/// Checks that `b` is the transpose of `a`.
///
/// Returns `false` on a shape mismatch instead of panicking, so it can be
/// used on arbitrary pairs. Reads every element of both matrices, so run it
/// on plain views when you are counting cache misses.
pub fn is_transpose<A, B>(a: &A, b: &B) -> bool
where
    A: MatrixRead + ?Sized,
    B: MatrixRead + ?Sized,
{
    if b.shape() != a.shape().transposed() {
        return false;
    }

    for i in 0..a.rows() {
        for j in 0..a.cols() {
            if a.get(i, j) != b.get(j, i) {
                return false;
            }
        }
    }
    true
}

/// First position `(i, j)` of `a` whose transposed counterpart in `b`
/// disagrees, if any. Used for failure messages.
///
/// # Panics
///
/// Panics if `b` is smaller than the transpose of `a`.
pub fn first_mismatch<A, B>(a: &A, b: &B) -> Option<(usize, usize)>
where
    A: MatrixRead + ?Sized,
    B: MatrixRead + ?Sized,
{
    (0..a.rows())
        .flat_map(|i| (0..a.cols()).map(move |j| (i, j)))
        .find(|&(i, j)| a.get(i, j) != b.get(j, i))
}
