//! Square-tile blocked transpose with diagonal deferral.

use crate::matrix::{MatrixRead, MatrixWrite, assert_transposed_shapes};

/// Cache-blocked transpose using `block × block` tiles.
///
/// Tiles are visited in row-major tile order. Within a tile each source
/// row is read left to right and scattered down one destination column.
/// Edge tiles are clipped, so any `rows`, `cols` and `block >= 1` works:
/// `block == 1` is the row-wise scan, `block >= max(rows, cols)` is a
/// single tile.
///
/// On tiles that sit on the main diagonal the source tile and destination
/// tile map to the same cache sets. Writing `dst[i][i]` in the middle of
/// row `i` would evict the line holding `src[i][..]`, which is still being
/// read, so the diagonal element is written after the rest of its row.
///
/// # Panics
///
/// Panics if `block == 0` or if `dst` is not `cols × rows`.
pub fn transpose_blocked<S, D>(src: &S, dst: &mut D, block: usize)
where
    S: MatrixRead + ?Sized,
    D: MatrixWrite + ?Sized,
{
    assert!(block > 0, "block size must be at least 1");
    assert_transposed_shapes(src, &*dst);

    let rows = src.rows();
    let cols = src.cols();

    for ii in (0..rows).step_by(block) {
        let i_end = (ii + block).min(rows);

        for jj in (0..cols).step_by(block) {
            let j_end = (jj + block).min(cols);
            let diagonal = ii == jj;

            for i in ii..i_end {
                for j in jj..j_end {
                    if diagonal && i == j {
                        continue;
                    }
                    dst.set(j, i, src.get(i, j));
                }

                // Past the last column there is no diagonal element to write
                if diagonal && i < cols {
                    dst.set(i, i, src.get(i, i));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::verify::is_transpose;
    use crate::matrix::{MatrixMut, MatrixRef};

    #[test]
    fn test_tall_diagonal_tile_stops_at_last_column() {
        // 67×61 with 21-wide tiles: the diagonal tile starting at 42 has
        // rows 42..63 but only columns 42..61.
        let (rows, cols) = (67, 61);
        let a: Vec<i32> = (0..(rows * cols) as i32).collect();
        let mut b = vec![0; rows * cols];

        let src = MatrixRef::new(&a, rows, cols);
        let mut dst = MatrixMut::new(&mut b, cols, rows);
        transpose_blocked(&src, &mut dst, 21);

        assert!(is_transpose(&src, &dst.view()));
    }

    #[test]
    #[should_panic(expected = "block size must be at least 1")]
    fn test_zero_block_panics() {
        let a = vec![1, 2, 3, 4];
        let mut b = vec![0; 4];
        transpose_blocked(
            &MatrixRef::new(&a, 2, 2),
            &mut MatrixMut::new(&mut b, 2, 2),
            0,
        );
    }

    #[test]
    #[should_panic(expected = "destination must be 3x2")]
    fn test_wrong_destination_shape_panics() {
        let a = vec![1, 2, 3, 4, 5, 6];
        let mut b = vec![0; 6];
        transpose_blocked(
            &MatrixRef::new(&a, 2, 3),
            &mut MatrixMut::new(&mut b, 2, 3),
            2,
        );
    }
}
