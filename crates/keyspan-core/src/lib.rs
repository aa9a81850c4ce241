//! keyspan core library: extraction and analysis of solved-puzzle reports.
//!
//! The crate turns a free-form report of solved key-range puzzles into
//! structured records, computes where each key sits in its (256-bit scale)
//! range, and folds everything into a summary. It builds as a plain Rust
//! library and `keyspan` binary; with the `python` feature it is also a
//! Python extension module (`_keyspan_core`) exposing the same operations.

pub mod aggregator;
pub mod config;
pub mod errors;
pub mod extractor;
pub mod interval;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod projection;
pub mod render;

#[cfg(feature = "python")]
mod python;

#[cfg(feature = "python")]
use pyo3::prelude::*;

// ---------------------------------------------------------------------------
// Top-level Python module: _keyspan_core
// ---------------------------------------------------------------------------

#[cfg(feature = "python")]
#[pymodule]
fn _keyspan_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    python::register(m)
}
