use std::ops::{Add, Div, Mul, Sub};

use crate::column::Array;
use crate::core::{ArithOp, DType, Value};
use crate::error::{Error, Result};
use crate::series::Series;

/// 置換後の格納型を決める
fn replacement_dtype(storage: DType, to_replace: &Value, value: &Value) -> Result<DType> {
    let kind = |v: &Value| v.dtype().ok_or_else(|| Error::InvalidValue("Invalid value type".into()));
    let (from, to) = (kind(to_replace)?, kind(value)?);
    match storage {
        DType::Int32 | DType::Int64 | DType::UInt64 => {
            if !to_replace.is_integer() {
                return Err(Error::Type(format!(
                    "cannot replace a {} value in an integer array",
                    from
                )));
            }
            match to {
                DType::Float64 => Ok(DType::Float64),
                DType::UInt64 if storage != DType::UInt64 => Err(Error::Type(format!(
                    "cannot replace a value with uint64 in a {} array",
                    storage
                ))),
                DType::Int32 | DType::Int64 if storage == DType::UInt64 => {
                    value.as_u64()?;
                    Ok(DType::UInt64)
                }
                DType::Int32 | DType::Int64 | DType::UInt64 => Ok(storage.max(to)),
                _ => Err(Error::Type(format!(
                    "cannot replace a value with {} in an integer array",
                    to
                ))),
            }
        }
        DType::Float64 => {
            if !to_replace.is_number() {
                return Err(Error::Type(format!(
                    "cannot replace a {} value in a float array",
                    from
                )));
            }
            if !value.is_number() {
                return Err(Error::Type(format!(
                    "cannot replace a value with {} in a float array",
                    to
                )));
            }
            Ok(DType::Float64)
        }
        DType::Bool => {
            if from != DType::Bool || to != DType::Bool {
                return Err(Error::Type("bool arrays only accept bool replacements".into()));
            }
            Ok(DType::Bool)
        }
        DType::Str | DType::Unicode => {
            if from != storage {
                return Err(Error::Type(format!(
                    "cannot replace a {} value in a {} array",
                    from, storage
                )));
            }
            match to {
                DType::Str | DType::Unicode => Ok(to),
                _ => Err(Error::Type(format!(
                    "cannot replace a value with {} in a {} array",
                    to, storage
                ))),
            }
        }
        DType::Value => Ok(DType::Value),
    }
}

/// 要素ごとの演算結果の格納型
///
/// bool は int32 として扱い、数値同士は広い方の型になる。
fn arithmetic_dtype(left: DType, right: DType) -> DType {
    let operand = |d: DType| if d == DType::Bool { DType::Int32 } else { d };
    let (left, right) = (operand(left), operand(right));
    if left.is_numeric() && right.is_numeric() {
        left.max(right)
    } else {
        DType::Value
    }
}

impl Series {
    /// `to_replace` と等しい要素を `value` に置き換えた新しいSeriesを返す
    ///
    /// 整数列に浮動小数点を書き込むと float64 に、文字列列に別幅の文字列を
    /// 書き込むと列全体がその幅に変換される。
    pub fn replace(&self, to_replace: impl Into<Value>, value: impl Into<Value>) -> Result<Series> {
        let (to_replace, value) = (to_replace.into(), value.into());
        let dtype = replacement_dtype(self.dtype(), &to_replace, &value)?;
        let replaced: Vec<Value> = self
            .values()
            .to_values()
            .into_iter()
            .map(|v| if v == to_replace { value.clone() } else { v })
            .collect();
        let values = Array::from_values_as(&replaced, dtype)?;
        Series::from_parts(values, self.index().clone(), self.name().clone())
    }

    /// 内積
    ///
    /// 形状と数値型が一致している必要がある。
    pub fn dot(&self, other: &Series) -> Result<Value> {
        self.values().dot(other.values())
    }

    fn elementwise(&self, other: &Series, op: ArithOp) -> Result<Series> {
        if self.shape() != other.shape() {
            return Err(Error::LengthMismatch {
                expected: self.len(),
                actual: other.len(),
            });
        }
        if self.name() != other.name() {
            return Err(Error::InvalidOperation(format!(
                "cannot combine series '{}' and '{}'",
                self.name(),
                other.name()
            )));
        }
        let combined = self
            .values()
            .to_values()
            .iter()
            .zip(other.values().to_values().iter())
            .map(|(a, b)| a.arithmetic(b, op))
            .collect::<Result<Vec<Value>>>()?;
        let values = if combined.is_empty() {
            Array::from_values_as(&combined, arithmetic_dtype(self.dtype(), other.dtype()))?
        } else {
            Array::from_values(combined)
        };
        Series::from_parts(values, self.index().clone(), self.name().clone())
    }

    pub fn add(&self, other: &Series) -> Result<Series> {
        self.elementwise(other, ArithOp::Add)
    }

    pub fn subtract(&self, other: &Series) -> Result<Series> {
        self.elementwise(other, ArithOp::Sub)
    }

    pub fn multiply(&self, other: &Series) -> Result<Series> {
        self.elementwise(other, ArithOp::Mul)
    }

    pub fn divide(&self, other: &Series) -> Result<Series> {
        self.elementwise(other, ArithOp::Div)
    }
}

macro_rules! impl_series_op {
    ($trait:ident, $method:ident, $op:expr) => {
        impl $trait<&Series> for &Series {
            type Output = Result<Series>;

            fn $method(self, rhs: &Series) -> Self::Output {
                self.elementwise(rhs, $op)
            }
        }
    };
}

impl_series_op!(Add, add, ArithOp::Add);
impl_series_op!(Sub, sub, ArithOp::Sub);
impl_series_op!(Mul, mul, ArithOp::Mul);
impl_series_op!(Div, div, ArithOp::Div);
