//! Conversion helpers for the Python bindings.
#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

#[cfg(feature = "python-bindings")]
use crate::{cfr::options::CfrOptions, inference::interval::IntervalMethod};

/// Borrow a contiguous `float64` view of a numpy array, a pandas Series
/// (through `to_numpy`) or any float sequence.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Owned copy of an array-like as `Array1<f64>`; `name` labels errors.
#[cfg(feature = "python-bindings")]
pub fn extract_array1<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>, name: &str,
) -> PyResult<Array1<f64>> {
    let arr = extract_f64_array(py, raw_data)?;
    let slice = arr.as_slice().map_err(|_| {
        PyValueError::new_err(format!("{name} must be a 1-D contiguous float64 array or sequence"))
    })?;
    Ok(Array1::from(slice.to_vec()))
}

/// Estimator options from Python keyword arguments.
#[cfg(feature = "python-bindings")]
pub fn build_cfr_options(level: Option<f64>, method: Option<&str>) -> PyResult<CfrOptions> {
    let defaults = CfrOptions::default();
    let method = match method {
        Some(name) => name.parse::<IntervalMethod>().map_err(PyValueError::new_err)?,
        None => defaults.method,
    };
    Ok(CfrOptions::new(level.unwrap_or(defaults.level), method, defaults.search)?)
}
