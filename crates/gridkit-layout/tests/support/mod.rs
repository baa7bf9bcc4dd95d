//! Test support utilities for GridKit layout tests
//!
//! - TestGrid: builder for grid containers and their children
//! - Assertions: approximate comparisons and layout invariants

mod assertions;
mod test_grid;

pub use assertions::*;
pub use test_grid::{leaf, placed, TestGrid};

use tracing_subscriber::EnvFilter;

/// Install a test subscriber honouring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
