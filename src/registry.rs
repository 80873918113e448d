//! Registration and miss-count evaluation of transpose functions.
//!
//! A [`Registry`] holds transpose functions next to their descriptions.
//! [`Registry::evaluate`] runs each one on the same source through traced
//! views, then checks the result with plain views so the check itself is
//! not counted.

use std::cell::RefCell;

use log::{info, warn};

use crate::cache::{CacheConfig, CacheStats, DirectMappedCache, TraceLayout, TracedMut, TracedRef};
use crate::error::{Error, Result};
use crate::matrix::verify::is_transpose;
use crate::matrix::{MatrixMut, MatrixRead, MatrixRef, MatrixWrite, Shape};
use crate::strategy::Strategy;

/// Description the submission is registered under.
pub const SUBMISSION_DESC: &str = "Transpose submission";
/// Description of the row-wise baseline.
pub const ROW_WISE_DESC: &str = "Simple row-wise scan transpose";

type TransposeFn = Box<dyn Fn(&dyn MatrixRead, &mut dyn MatrixWrite)>;

/// Shape-dispatched transpose: what the submission runs.
pub fn transpose_submit(src: &dyn MatrixRead, dst: &mut dyn MatrixWrite) {
    Strategy::select(src.shape()).apply(src, dst);
}

fn transpose_baseline(src: &dyn MatrixRead, dst: &mut dyn MatrixWrite) {
    Strategy::RowWise.apply(src, dst);
}

/// Miss-count regression baselines for the graded shapes.
pub struct MissBudget;

impl MissBudget {
    /// Maximum misses a correct submission may take on `shape` under
    /// [`CacheConfig::GRADER`] and [`TraceLayout::GRADER`], if the shape
    /// is graded.
    pub fn for_shape(shape: Shape) -> Option<usize> {
        match (shape.rows, shape.cols) {
            (32, 32) => Some(300),
            (64, 64) => Some(1500),
            (67, 61) | (61, 67) => Some(2000),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub description: String,
    pub shape: Shape,
    pub stats: CacheStats,
    pub correct: bool,
}

struct Entry {
    description: String,
    func: TransposeFn,
}

/// Ordered collection of transpose functions to evaluate.
#[derive(Default)]
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The submission followed by the row-wise baseline.
    pub fn graded() -> Self {
        let mut registry = Registry::new();
        registry.register(SUBMISSION_DESC, transpose_submit);
        registry.register(ROW_WISE_DESC, transpose_baseline);
        registry
    }

    /// Like [`Registry::graded`], but the submission always runs `strategy`
    /// instead of dispatching on shape.
    pub fn graded_with(strategy: Strategy) -> Self {
        let mut registry = Registry::new();
        registry.register(SUBMISSION_DESC, move |src, dst| strategy.apply(src, dst));
        registry.register(ROW_WISE_DESC, transpose_baseline);
        registry
    }

    pub fn register<F>(&mut self, description: impl Into<String>, func: F)
    where
        F: Fn(&dyn MatrixRead, &mut dyn MatrixWrite) + 'static,
    {
        self.entries.push(Entry {
            description: description.into(),
            func: Box::new(func),
        });
    }

    /// Registers a fixed strategy under its own description, bypassing
    /// shape dispatch.
    pub fn register_strategy(&mut self, strategy: Strategy) {
        self.register(strategy.description(), move |src, dst| {
            strategy.apply(src, dst)
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn descriptions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.description.as_str())
    }

    /// Runs every registered function on `src` (row-major, `shape`) against
    /// a cold cache and reports its misses and correctness, in
    /// registration order.
    pub fn evaluate(
        &self,
        shape: Shape,
        src: &[i32],
        config: CacheConfig,
        layout: TraceLayout,
    ) -> Result<Vec<Evaluation>> {
        if src.len() != shape.len() {
            return Err(Error::ShapeMismatch {
                rows: shape.rows,
                cols: shape.cols,
                expected: shape.len(),
                actual: src.len(),
            });
        }
        config.validate()?;

        let dst_shape = shape.transposed();
        let cache = RefCell::new(DirectMappedCache::new(config));
        let mut results = Vec::with_capacity(self.entries.len());

        for entry in &self.entries {
            cache.borrow_mut().reset();
            let mut dst = vec![0; dst_shape.len()];

            {
                let traced_src = TracedRef::new(
                    MatrixRef::new(src, shape.rows, shape.cols),
                    layout.src_base,
                    &cache,
                );
                let mut traced_dst = TracedMut::new(
                    MatrixMut::new(&mut dst, dst_shape.rows, dst_shape.cols),
                    layout.dst_base,
                    &cache,
                );
                (entry.func)(&traced_src, &mut traced_dst);
            }

            let stats = cache.borrow().stats();
            let correct = is_transpose(
                &MatrixRef::new(src, shape.rows, shape.cols),
                &MatrixRef::new(&dst, dst_shape.rows, dst_shape.cols),
            );

            if correct {
                info!("{} [{}]: {}", entry.description, shape, stats);
            } else {
                warn!("{} [{}]: incorrect transpose", entry.description, shape);
            }

            results.push(Evaluation {
                description: entry.description.clone(),
                shape,
                stats,
                correct,
            });
        }

        Ok(results)
    }
}
