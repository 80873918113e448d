//! Errors for the fallible surfaces: parsing, cache configuration and
//! evaluation inputs. The transpose kernels themselves never fail; a bad
//! shape handed to a kernel is a bug in the caller and panics.

use thiserror::Error;

use crate::matrix::Shape;
use crate::strategy::Strategy;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid shape {0:?}: expected <rows>x<cols> with both sides > 0")]
    InvalidShape(String),

    #[error("invalid strategy {0:?}: expected row-wise, blocked:<n>, specialized64 or fallback:<n>")]
    InvalidStrategy(String),

    #[error("block size must be at least 1, got {0:?}")]
    InvalidBlockSize(String),

    #[error("strategy {strategy} cannot transpose a {shape} matrix")]
    UnsupportedShape { strategy: Strategy, shape: Shape },

    #[error("invalid cache config (s={set_bits}, b={block_bits}): {reason}")]
    InvalidCacheConfig {
        set_bits: u32,
        block_bits: u32,
        reason: &'static str,
    },

    #[error("source has {actual} elements, shape {rows}x{cols} needs {expected}")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
