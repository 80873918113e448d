//! Tagged strategy selection over the source shape.

use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::blocked::quadrant_64::BLOCK as QUADRANT_BLOCK;
use crate::blocked::{transpose_blocked, transpose_quadrant_swap};
use crate::error::Error;
use crate::matrix::transpose::transpose_row_wise;
use crate::matrix::{MatrixRead, MatrixWrite, Shape};

/// Tile size used for shapes without a tuned strategy. Eight `i32`s fill
/// one 32-byte line.
pub const DEFAULT_FALLBACK_BLOCK: usize = 8;

/// How to transpose a given shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Row-wise scan, no blocking.
    RowWise,
    /// Blocked transpose tuned for a known shape.
    Blocked(usize),
    /// Quadrant-swap kernel for 64×64.
    Specialized64,
    /// Blocked transpose for shapes nobody tuned for.
    GenericFallback(usize),
}

impl Strategy {
    /// Picks the strategy for a source of the given shape.
    ///
    /// | Source shape        | Strategy            |
    /// |---------------------|---------------------|
    /// | 32×32               | `Blocked(8)`        |
    /// | 64×64               | `Specialized64`     |
    /// | 67×61 or 61×67      | `Blocked(21)`       |
    /// | anything else       | `GenericFallback(8)`|
    pub fn select(shape: Shape) -> Strategy {
        let strategy = match (shape.rows, shape.cols) {
            (32, 32) => Strategy::Blocked(8),
            (64, 64) => Strategy::Specialized64,
            (67, 61) | (61, 67) => Strategy::Blocked(21),
            _ => Strategy::GenericFallback(DEFAULT_FALLBACK_BLOCK),
        };
        debug!("shape {}: selected {}", shape, strategy);
        strategy
    }

    /// Whether [`apply`](Strategy::apply) accepts a source of `shape`.
    /// Only `Specialized64` is restricted.
    pub fn supports(&self, shape: Shape) -> bool {
        match self {
            Strategy::Specialized64 => {
                shape.is_square() && shape.rows % QUADRANT_BLOCK == 0
            }
            _ => true,
        }
    }

    /// Runs the strategy.
    ///
    /// # Panics
    ///
    /// Panics if `dst` is not the transposed shape of `src`, if a block size
    /// is zero, or if `Specialized64` is applied to a matrix that is not
    /// square with a side divisible by 8.
    pub fn apply<S, D>(&self, src: &S, dst: &mut D)
    where
        S: MatrixRead + ?Sized,
        D: MatrixWrite + ?Sized,
    {
        match *self {
            Strategy::RowWise => transpose_row_wise(src, dst),
            Strategy::Blocked(block) | Strategy::GenericFallback(block) => {
                transpose_blocked(src, dst, block)
            }
            Strategy::Specialized64 => transpose_quadrant_swap(src, dst),
        }
    }

    /// Human-readable description, as shown in evaluation reports.
    pub fn description(&self) -> String {
        match self {
            Strategy::RowWise => "Simple row-wise scan transpose".to_string(),
            Strategy::Blocked(block) => {
                format!("{block}x{block} blocking with diagonal deferral")
            }
            Strategy::Specialized64 => "8x8 blocks with 4x4 quadrant swaps".to_string(),
            Strategy::GenericFallback(block) => {
                format!("Generic {block}x{block} blocked fallback")
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::RowWise => write!(f, "row-wise"),
            Strategy::Blocked(block) => write!(f, "blocked:{block}"),
            Strategy::Specialized64 => write!(f, "specialized64"),
            Strategy::GenericFallback(block) => write!(f, "fallback:{block}"),
        }
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once(':') {
            None => match s {
                "row-wise" => Ok(Strategy::RowWise),
                "specialized64" => Ok(Strategy::Specialized64),
                _ => Err(Error::InvalidStrategy(s.to_string())),
            },
            Some((kind, block)) => {
                let block = parse_block(block)?;
                match kind {
                    "blocked" => Ok(Strategy::Blocked(block)),
                    "fallback" => Ok(Strategy::GenericFallback(block)),
                    _ => Err(Error::InvalidStrategy(s.to_string())),
                }
            }
        }
    }
}

fn parse_block(s: &str) -> Result<usize, Error> {
    match s.trim().parse::<usize>() {
        Ok(block) if block > 0 => Ok(block),
        _ => Err(Error::InvalidBlockSize(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_graded_shapes() {
        assert_eq!(Strategy::select(Shape::new(32, 32)), Strategy::Blocked(8));
        assert_eq!(Strategy::select(Shape::new(64, 64)), Strategy::Specialized64);
        assert_eq!(Strategy::select(Shape::new(67, 61)), Strategy::Blocked(21));
        assert_eq!(Strategy::select(Shape::new(61, 67)), Strategy::Blocked(21));
    }

    #[test]
    fn test_select_everything_else_falls_back() {
        for (rows, cols) in [(1, 1), (2, 2), (3, 2), (32, 64), (64, 32), (128, 128), (61, 61)] {
            assert_eq!(
                Strategy::select(Shape::new(rows, cols)),
                Strategy::GenericFallback(DEFAULT_FALLBACK_BLOCK),
                "{}x{}",
                rows,
                cols
            );
        }
    }

    #[test]
    fn test_parse_round_trip() {
        for strategy in [
            Strategy::RowWise,
            Strategy::Blocked(8),
            Strategy::Specialized64,
            Strategy::GenericFallback(21),
        ] {
            assert_eq!(strategy.to_string().parse::<Strategy>(), Ok(strategy));
        }
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "diagonal".parse::<Strategy>(),
            Err(Error::InvalidStrategy("diagonal".to_string()))
        );
        assert_eq!(
            "tiles:4".parse::<Strategy>(),
            Err(Error::InvalidStrategy("tiles:4".to_string()))
        );
        assert_eq!(
            "blocked:0".parse::<Strategy>(),
            Err(Error::InvalidBlockSize("0".to_string()))
        );
        assert_eq!(
            "fallback:x".parse::<Strategy>(),
            Err(Error::InvalidBlockSize("x".to_string()))
        );
    }

    #[test]
    fn test_supports() {
        assert!(Strategy::Specialized64.supports(Shape::new(64, 64)));
        assert!(Strategy::Specialized64.supports(Shape::new(16, 16)));
        assert!(!Strategy::Specialized64.supports(Shape::new(32, 64)));
        assert!(!Strategy::Specialized64.supports(Shape::new(67, 61)));
        assert!(!Strategy::Specialized64.supports(Shape::new(12, 12)));
        for strategy in [Strategy::RowWise, Strategy::Blocked(21), Strategy::GenericFallback(8)] {
            assert!(strategy.supports(Shape::new(67, 61)));
        }
    }

    #[test]
    fn test_descriptions_are_distinct() {
        let descriptions = [
            Strategy::RowWise.description(),
            Strategy::Blocked(8).description(),
            Strategy::Specialized64.description(),
            Strategy::GenericFallback(8).description(),
        ];
        for (i, a) in descriptions.iter().enumerate() {
            for b in &descriptions[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
