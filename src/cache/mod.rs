//! Direct-mapped cache model used to score transpose kernels.
//!
//! The model is the one the kernels are tuned for: one line per set, no
//! distinction between reads and writes, every access either hits the
//! resident line or replaces it. Kernels do not depend on this module;
//! the traced views in [`trace`] feed it their accesses.

pub mod trace;

use std::fmt;

use crate::error::{Error, Result};

pub use trace::{TraceLayout, TracedMut, TracedRef};

/// Bytes per matrix element.
pub const ELEMENT_BYTES: u64 = std::mem::size_of::<i32>() as u64;

/// Largest accepted `set_bits`: a million sets is already far past any
/// cache worth modelling here.
pub const MAX_SET_BITS: u32 = 20;
/// Largest accepted `block_bits` (4 KiB lines).
pub const MAX_BLOCK_BITS: u32 = 12;

/// Geometry of a direct-mapped cache: `2^set_bits` sets of one
/// `2^block_bits`-byte line each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub set_bits: u32,
    pub block_bits: u32,
}

impl CacheConfig {
    /// 32 sets of 32-byte lines, 1 KiB total. This is the cache the
    /// transpose strategies are graded against.
    pub const GRADER: CacheConfig = CacheConfig {
        set_bits: 5,
        block_bits: 5,
    };

    pub fn new(set_bits: u32, block_bits: u32) -> Result<Self> {
        let config = CacheConfig {
            set_bits,
            block_bits,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason| Error::InvalidCacheConfig {
            set_bits: self.set_bits,
            block_bits: self.block_bits,
            reason,
        };
        if self.block_bits < 2 {
            return Err(invalid("line must hold at least one 4-byte element"));
        }
        if self.set_bits > MAX_SET_BITS {
            return Err(invalid("more than 2^20 sets"));
        }
        if self.block_bits > MAX_BLOCK_BITS {
            return Err(invalid("lines larger than 4 KiB"));
        }
        // Bounded above, but the flags come straight from the command line
        match self.set_bits.checked_add(self.block_bits) {
            Some(total) if total <= 32 => Ok(()),
            _ => Err(invalid("cache larger than 4 GiB")),
        }
    }

    pub fn sets(&self) -> usize {
        1 << self.set_bits
    }

    pub fn line_bytes(&self) -> usize {
        1 << self.block_bits
    }

    pub fn capacity(&self) -> usize {
        self.sets() * self.line_bytes()
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig::GRADER
    }
}

/// Outcome of a single access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Hit,
    /// Cold miss into an empty set.
    Miss,
    /// Miss that replaced another resident line.
    MissEviction,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub evictions: usize,
}

impl CacheStats {
    pub fn accesses(&self) -> usize {
        self.hits + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits:{} misses:{} evictions:{}",
            self.hits, self.misses, self.evictions
        )
    }
}

#[derive(Debug, Clone)]
pub struct DirectMappedCache {
    config: CacheConfig,
    /// Resident tag per set, `None` while the set is cold.
    tags: Vec<Option<u64>>,
    stats: CacheStats,
}

impl DirectMappedCache {
    /// # Panics
    ///
    /// Panics if `config` does not validate. Use [`CacheConfig::new`] to
    /// check user-supplied geometry first.
    pub fn new(config: CacheConfig) -> Self {
        if let Err(err) = config.validate() {
            panic!("{}", err);
        }
        DirectMappedCache {
            config,
            tags: vec![None; config.sets()],
            stats: CacheStats::default(),
        }
    }

    /// Records an access to byte address `addr`.
    pub fn access(&mut self, addr: u64) -> Access {
        let block = addr >> self.config.block_bits;
        let set = (block & (self.config.sets() as u64 - 1)) as usize;
        let tag = block >> self.config.set_bits;

        let outcome = match self.tags[set] {
            Some(resident) if resident == tag => Access::Hit,
            Some(_) => Access::MissEviction,
            None => Access::Miss,
        };

        match outcome {
            Access::Hit => self.stats.hits += 1,
            Access::Miss => self.stats.misses += 1,
            Access::MissEviction => {
                self.stats.misses += 1;
                self.stats.evictions += 1;
            }
        }
        if outcome != Access::Hit {
            self.tags[set] = Some(tag);
        }
        outcome
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Empties every set and zeroes the counters.
    pub fn reset(&mut self) {
        self.tags.fill(None);
        self.stats = CacheStats::default();
    }
}
