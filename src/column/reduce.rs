//! Numeric reductions over column storage.

use ndarray::ArrayD;
use num_traits::ToPrimitive;

use crate::column::Array;
use crate::core::Value;
use crate::error::{Error, Result};
use crate::na::NaNAware;

fn widen<T: ToPrimitive + Copy>(data: &ArrayD<T>) -> Vec<f64> {
    data.iter().map(|v| v.to_f64().unwrap_or(f64::NAN)).collect()
}

/// Numeric elements of `array` as `f64`. Non-numeric cells of a value array
/// are left out.
pub(crate) fn numeric_values(array: &Array) -> Result<Vec<f64>> {
    match array {
        Array::Int32(data) => Ok(widen(data)),
        Array::Int64(data) => Ok(widen(data)),
        Array::UInt64(data) => Ok(widen(data)),
        Array::Float64(data) => Ok(data.iter().copied().collect()),
        Array::Value(data) => Ok(data
            .iter()
            .filter(|v| v.is_number())
            .filter_map(|v| v.as_f64().ok())
            .collect()),
        other => Err(Error::Type(format!(
            "cannot calculate mean of a non-number array ({})",
            other.dtype()
        ))),
    }
}

fn retained(values: &[f64], skipna: bool) -> Vec<f64> {
    if skipna {
        values.iter().copied().filter(|v| !v.is_nan_value()).collect()
    } else {
        values.to_vec()
    }
}

/// Arithmetic mean; NaN for an empty input.
pub(crate) fn mean(values: &[f64], skipna: bool) -> f64 {
    let kept = retained(values, skipna);
    if kept.is_empty() {
        return f64::NAN;
    }
    kept.iter().sum::<f64>() / kept.len() as f64
}

/// Population variance: mean of squared absolute deviations.
pub(crate) fn var(values: &[f64], skipna: bool) -> f64 {
    let kept = retained(values, skipna);
    let center = mean(&kept, false);
    let deviations: Vec<f64> = kept.iter().map(|v| (v - center).abs().powi(2)).collect();
    mean(&deviations, false)
}

pub(crate) fn std(values: &[f64], skipna: bool) -> f64 {
    var(values, skipna).sqrt()
}

fn dot_typed<T>(a: &ArrayD<T>, b: &ArrayD<T>, zero: Value) -> Result<Value>
where
    T: Clone + Into<Value>,
{
    let mut acc = zero;
    for (x, y) in a.iter().zip(b.iter()) {
        let product = Into::<Value>::into(x.clone()).checked_mul(&y.clone().into())?;
        acc.try_add_assign(&product)?;
    }
    Ok(acc)
}

impl Array {
    pub fn mean(&self, skipna: bool) -> Result<f64> {
        Ok(mean(&numeric_values(self)?, skipna))
    }

    pub fn var(&self, skipna: bool) -> Result<f64> {
        Ok(var(&numeric_values(self)?, skipna))
    }

    pub fn std(&self, skipna: bool) -> Result<f64> {
        Ok(std(&numeric_values(self)?, skipna))
    }

    /// Sum of elementwise products. Both arrays must share shape and numeric
    /// element type; the result keeps that type.
    pub fn dot(&self, other: &Array) -> Result<Value> {
        if self.shape() != other.shape() {
            return Err(Error::DimensionMismatch(format!(
                "shapes {:?} and {:?} are not aligned",
                self.shape(),
                other.shape()
            )));
        }
        match (self, other) {
            (Array::Int32(a), Array::Int32(b)) => dot_typed(a, b, Value::Int32(0)),
            (Array::Int64(a), Array::Int64(b)) => dot_typed(a, b, Value::Int64(0)),
            (Array::UInt64(a), Array::UInt64(b)) => dot_typed(a, b, Value::UInt64(0)),
            (Array::Float64(a), Array::Float64(b)) => dot_typed(a, b, Value::Float64(0.0)),
            _ => Err(Error::Type(format!(
                "cannot take the dot product of {} and {} arrays",
                self.dtype(),
                other.dtype()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_nanmean() {
        let a = Array::from(vec![1.0_f64, 2.0, f64::NAN, 5.0]);
        assert!(a.mean(false).unwrap().is_nan());
        assert_eq!(a.mean(true).unwrap(), 8.0 / 3.0);
        assert!(Array::from(Vec::<f64>::new()).mean(true).unwrap().is_nan());
    }

    #[test]
    fn population_variance() {
        let a = Array::from(vec![2_i64, 4, 4, 4, 5, 5, 7, 9]);
        assert_eq!(a.var(false).unwrap(), 4.0);
        assert_eq!(a.std(false).unwrap(), 2.0);
    }

    #[test]
    fn value_arrays_skip_non_numbers() {
        let a = Array::from(vec![
            Value::Int64(1),
            Value::Str("x".into()),
            Value::Float64(3.0),
        ]);
        assert_eq!(a.mean(false).unwrap(), 2.0);
    }

    #[test]
    fn strings_are_not_numbers() {
        assert!(Array::from(vec!["a"]).mean(true).is_err());
        assert!(Array::from(vec![true]).var(true).is_err());
    }

    #[test]
    fn dot_requires_same_kind() {
        let a = Array::from(vec![1_i64, 2, 3]);
        let b = Array::from(vec![4_i64, 5, 6]);
        assert_eq!(a.dot(&b).unwrap(), Value::Int64(32));
        assert!(a.dot(&Array::from(vec![1.0_f64, 2.0, 3.0])).is_err());
        assert!(a.dot(&Array::from(vec![1_i64])).is_err());
    }
}
