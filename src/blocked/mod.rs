//! Cache-blocked transpose kernels.
//!
//! Both kernels break the matrix into tiles small enough that a source
//! tile and its destination tile fit in the cache together, and order
//! the accesses inside a tile so lines that are still needed are not
//! evicted by the tile's own writes.
//!
//! Available kernels:
//! - `tiled`: square tiles of any size, diagonal deferral on diagonal tiles
//! - `quadrant_64`: 8×8 tiles split into 4×4 quadrants, for 64×64

pub mod quadrant_64;
pub mod tiled;

pub use quadrant_64::transpose_quadrant_swap;
pub use tiled::transpose_blocked;
