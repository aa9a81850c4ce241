//! PyO3 bindings exposing the interval math, extraction, and analysis.
//!
//! Structured results cross the boundary as the same JSON the pipeline
//! writes, decoded with Python's `json` module.

use num_bigint::BigUint;
use pyo3::prelude::*;

use crate::config::{DEFAULT_KEY_WIDTH, DEFAULT_TOP_N, DEFAULT_WINDOW_PERCENT};
use crate::{aggregator, extractor, interval, pipeline, projection};

fn json_to_py(py: Python<'_>, payload: String) -> PyResult<PyObject> {
    let json_module = py.import("json")?;
    Ok(json_module.call_method1("loads", (payload,))?.unbind())
}

#[pyfunction]
pub fn hex_to_int(text: &str) -> PyResult<BigUint> {
    Ok(interval::hex_to_int(text)?)
}

#[pyfunction]
#[pyo3(signature = (value, min_width=DEFAULT_KEY_WIDTH))]
pub fn int_to_hex(value: BigUint, min_width: usize) -> String {
    interval::int_to_hex(&value, min_width)
}

#[pyfunction]
pub fn position_percent(key: BigUint, start: BigUint, end: BigUint) -> PyResult<f64> {
    Ok(interval::position_percent(&key, &start, &end)?)
}

#[pyfunction]
pub fn key_at_percent(start: BigUint, end: BigUint, percent: f64) -> PyResult<BigUint> {
    Ok(interval::key_at_percent(&start, &end, percent)?)
}

#[pyfunction]
pub fn search_window(
    start: BigUint,
    end: BigUint,
    center: BigUint,
    width_percent: f64,
) -> PyResult<(BigUint, BigUint)> {
    let window = interval::search_window(&start, &end, &center, width_percent)?;
    Ok((window.start().clone(), window.end().clone()))
}

#[pyfunction]
pub fn extract_records(py: Python<'_>, text: &str) -> PyResult<PyObject> {
    let records = extractor::extract_records(text);
    json_to_py(py, pipeline::records_json(&records)?)
}

#[pyfunction]
#[pyo3(signature = (text, top_n=DEFAULT_TOP_N))]
pub fn analyze_report(py: Python<'_>, text: &str, top_n: usize) -> PyResult<PyObject> {
    let records = extractor::extract_records(text);
    let analysis = aggregator::analyze_with(&records, top_n);
    json_to_py(py, pipeline::summary_json(&analysis.summary)?)
}

#[pyfunction]
#[pyo3(signature = (range_start, range_end, position, window_percent=DEFAULT_WINDOW_PERCENT))]
pub fn project_key(
    py: Python<'_>,
    range_start: &str,
    range_end: &str,
    position: f64,
    window_percent: f64,
) -> PyResult<PyObject> {
    let projected = projection::project_key(
        range_start,
        range_end,
        position,
        window_percent,
        DEFAULT_KEY_WIDTH,
    )?;
    json_to_py(py, pipeline::to_sorted_json(&projected)?)
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // -- Interval math -------------------------------------------------------
    m.add_function(wrap_pyfunction!(hex_to_int, m)?)?;
    m.add_function(wrap_pyfunction!(int_to_hex, m)?)?;
    m.add_function(wrap_pyfunction!(position_percent, m)?)?;
    m.add_function(wrap_pyfunction!(key_at_percent, m)?)?;
    m.add_function(wrap_pyfunction!(search_window, m)?)?;

    // -- Extraction and analysis --------------------------------------------
    m.add_function(wrap_pyfunction!(extract_records, m)?)?;
    m.add_function(wrap_pyfunction!(analyze_report, m)?)?;
    m.add_function(wrap_pyfunction!(project_key, m)?)?;

    m.add("DEFAULT_TOP_N", DEFAULT_TOP_N)?;
    m.add("DEFAULT_KEY_WIDTH", DEFAULT_KEY_WIDTH)?;
    Ok(())
}
