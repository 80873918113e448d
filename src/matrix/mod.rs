//! Row-major matrix views and the access traits every kernel is written
//! against.
//!
//! Kernels never index raw slices directly. They go through [`MatrixRead`]
//! and [`MatrixWrite`], which lets the cache model in [`crate::cache`] wrap
//! a view and observe every access a kernel makes without the kernel
//! knowing about it.

pub mod shape;
pub mod transpose;
pub mod verify;

pub use shape::Shape;

/// Read access to a row-major `i32` matrix.
pub trait MatrixRead {
    fn rows(&self) -> usize;
    fn cols(&self) -> usize;

    /// Element at (`row`, `col`).
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the matrix.
    fn get(&self, row: usize, col: usize) -> i32;

    fn shape(&self) -> Shape {
        Shape::new(self.rows(), self.cols())
    }
}

/// Write access on top of [`MatrixRead`].
///
/// Destinations are readable because the 64×64 kernel shuffles values
/// around inside its own output block.
pub trait MatrixWrite: MatrixRead {
    /// # Panics
    ///
    /// Panics if the position is outside the matrix.
    fn set(&mut self, row: usize, col: usize, value: i32);
}

/// Shared view over a caller-owned row-major buffer.
#[derive(Debug, Clone, Copy)]
pub struct MatrixRef<'a> {
    data: &'a [i32],
    rows: usize,
    cols: usize,
}

impl<'a> MatrixRef<'a> {
    /// # Panics
    ///
    /// Panics if `data.len() != rows * cols`.
    pub fn new(data: &'a [i32], rows: usize, cols: usize) -> Self {
        assert_eq!(
            data.len(),
            rows * cols,
            "expected {}x{}={} elements",
            rows,
            cols,
            rows * cols
        );
        Self { data, rows, cols }
    }

    pub fn as_slice(&self) -> &'a [i32] {
        self.data
    }
}

impl MatrixRead for MatrixRef<'_> {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> i32 {
        self.data[offset(row, col, self.rows, self.cols)]
    }
}

/// Exclusive view over a caller-owned row-major buffer.
#[derive(Debug)]
pub struct MatrixMut<'a> {
    data: &'a mut [i32],
    rows: usize,
    cols: usize,
}

impl<'a> MatrixMut<'a> {
    /// # Panics
    ///
    /// Panics if `data.len() != rows * cols`.
    pub fn new(data: &'a mut [i32], rows: usize, cols: usize) -> Self {
        assert_eq!(
            data.len(),
            rows * cols,
            "expected {}x{}={} elements",
            rows,
            cols,
            rows * cols
        );
        Self { data, rows, cols }
    }

    pub fn as_slice(&self) -> &[i32] {
        self.data
    }

    /// Read-only view of the same buffer.
    pub fn view(&self) -> MatrixRef<'_> {
        MatrixRef {
            data: self.data,
            rows: self.rows,
            cols: self.cols,
        }
    }
}

impl MatrixRead for MatrixMut<'_> {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> i32 {
        self.data[offset(row, col, self.rows, self.cols)]
    }
}

impl MatrixWrite for MatrixMut<'_> {
    #[inline]
    fn set(&mut self, row: usize, col: usize, value: i32) {
        self.data[offset(row, col, self.rows, self.cols)] = value;
    }
}

/// Row-major element offset, bounds-checked on both axes.
///
/// Checking only the flat index would let `(0, cols)` silently alias
/// `(1, 0)`.
#[inline]
pub(crate) fn offset(row: usize, col: usize, rows: usize, cols: usize) -> usize {
    assert!(
        row < rows && col < cols,
        "({}, {}) out of bounds for {}x{} matrix",
        row,
        col,
        rows,
        cols
    );
    row * cols + col
}

/// Panics unless `dst` has the swapped shape of `src`.
pub(crate) fn assert_transposed_shapes<S, D>(src: &S, dst: &D)
where
    S: MatrixRead + ?Sized,
    D: MatrixRead + ?Sized,
{
    assert_eq!(
        dst.shape(),
        src.shape().transposed(),
        "destination must be {} to hold the transpose of a {} source",
        src.shape().transposed(),
        src.shape()
    );
}
