//! Intrinsic sizing cache for grid track sizing.
//!
//! Track sizing asks for the same item's min-content and max-content sizes
//! many times during one pass: once per track function that reads them, again
//! for spanning-item distribution, and again for minimum contributions. The
//! measurements come from the opaque [`ChildLayout`](crate::ChildLayout)
//! capability and can be expensive (a nested grid is laid out to answer them).
//!
//! # Design
//!
//! The cache is owned by a single layout pass and dropped with it, so entries
//! never outlive the style and box tree they were computed from.
//!
//! Cache keys are composed of:
//! - Child index (position in the grid container's child list)
//! - Axis (column measurements are widths, row measurements are heights)
//! - Sizing mode (MinContent or MaxContent)
//! - Available width for heights (bit pattern, `None` for widths)

use std::collections::HashMap;

use tracing::trace;

use crate::{AvailableSize, GridDimension};

/// Intrinsic sizing mode for cache lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntrinsicSizingMode {
    /// Minimum content size - the smallest size that doesn't cause overflow.
    MinContent,
    /// Maximum content size - the size needed to fit all content without wrapping.
    MaxContent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum WidthKey {
    Definite(u32),
    MinContent,
    MaxContent,
}

impl From<AvailableSize> for WidthKey {
    fn from(size: AvailableSize) -> Self {
        match size {
            AvailableSize::Definite(px) => WidthKey::Definite(px.to_bits()),
            AvailableSize::MinContent => WidthKey::MinContent,
            AvailableSize::MaxContent => WidthKey::MaxContent,
        }
    }
}

/// Cache key for intrinsic size lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    child_index: usize,
    dimension: GridDimension,
    mode: IntrinsicSizingMode,
    available_width: Option<WidthKey>,
}

impl CacheKey {
    /// Key for a width measurement.
    pub fn width(child_index: usize, mode: IntrinsicSizingMode) -> Self {
        Self {
            child_index,
            dimension: GridDimension::Column,
            mode,
            available_width: None,
        }
    }

    /// Key for a height measurement under a given available width.
    pub fn height(child_index: usize, mode: IntrinsicSizingMode, available_width: AvailableSize) -> Self {
        Self {
            child_index,
            dimension: GridDimension::Row,
            mode,
            available_width: Some(available_width.into()),
        }
    }
}

/// Cache statistics for debugging and profiling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub lookups: usize,
    pub hits: usize,
    pub stores: usize,
}

/// Pass-scoped memo of intrinsic measurements.
#[derive(Debug, Default)]
pub struct IntrinsicCache {
    entries: HashMap<CacheKey, f32>,
    stats: CacheStats,
}

impl IntrinsicCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached measurement.
    pub fn lookup(&mut self, key: &CacheKey) -> Option<f32> {
        self.stats.lookups += 1;
        let hit = self.entries.get(key).copied();
        if hit.is_some() {
            self.stats.hits += 1;
        }
        hit
    }

    /// Store a measurement. Non-finite values are not cached.
    pub fn store(&mut self, key: CacheKey, value: f32) {
        if !value.is_finite() {
            trace!(?key, value, "not caching non-finite intrinsic size");
            return;
        }
        self.entries.insert(key, value);
        self.stats.stores += 1;
    }

    /// Return the cached value or compute and store it.
    pub fn get_or_measure(&mut self, key: CacheKey, measure: impl FnOnce() -> f32) -> f32 {
        if let Some(value) = self.lookup(&key) {
            return value;
        }
        let value = measure();
        self.store(key, value);
        value
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
