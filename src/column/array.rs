use ndarray::{Array1, ArrayD, IxDyn};

use crate::column::Element;
use crate::core::{DType, Value, WideString};
use crate::error::{Error, Result};
use crate::na::element_equal;

/// 型付きの列データ
///
/// 要素型ごとに `ndarray` の動的次元配列を保持する。`Value` バリアントは
/// 異種の値を混在させる場合に使う。
#[derive(Debug, Clone)]
pub enum Array {
    Bool(ArrayD<bool>),
    Int32(ArrayD<i32>),
    Int64(ArrayD<i64>),
    UInt64(ArrayD<u64>),
    Float64(ArrayD<f64>),
    Str(ArrayD<String>),
    Unicode(ArrayD<WideString>),
    Value(ArrayD<Value>),
}

/// 全バリアントに同じ処理を適用する
macro_rules! dispatch_array {
    ($array:expr, $data:ident => $body:expr) => {
        match $array {
            $crate::column::Array::Bool($data) => $body,
            $crate::column::Array::Int32($data) => $body,
            $crate::column::Array::Int64($data) => $body,
            $crate::column::Array::UInt64($data) => $body,
            $crate::column::Array::Float64($data) => $body,
            $crate::column::Array::Str($data) => $body,
            $crate::column::Array::Unicode($data) => $body,
            $crate::column::Array::Value($data) => $body,
        }
    };
}

/// 行優先の平坦な位置で要素を参照
pub(crate) fn flat_get<T>(data: &ArrayD<T>, i: usize) -> Option<&T> {
    match data.as_slice() {
        Some(slice) => slice.get(i),
        None => data.iter().nth(i),
    }
}

pub(crate) fn flat_get_mut<T>(data: &mut ArrayD<T>, i: usize) -> Option<&mut T> {
    if data.is_standard_layout() {
        data.as_slice_mut().and_then(|slice| slice.get_mut(i))
    } else {
        data.iter_mut().nth(i)
    }
}

/// 位置の列で要素を取り出して 1 次元配列にする
fn take<T: Clone>(data: &ArrayD<T>, positions: &[usize]) -> Result<ArrayD<T>> {
    let size = data.len();
    let mut out = Vec::with_capacity(positions.len());
    for &p in positions {
        let item = flat_get(data, p).ok_or(Error::IndexOutOfBounds { index: p, size })?;
        out.push(item.clone());
    }
    Ok(Array1::from_vec(out).into_dyn())
}

impl Array {
    /// 1 次元配列を作成
    pub fn from_vec<T: Element>(values: Vec<T>) -> Array {
        T::wrap(Array1::from_vec(values).into_dyn())
    }

    /// 形状を指定して作成
    pub fn from_shape_vec<T: Element>(shape: &[usize], values: Vec<T>) -> Result<Array> {
        Ok(T::wrap(ArrayD::from_shape_vec(IxDyn(shape), values)?))
    }

    /// セル値の列から、共通の要素型を持つ 1 次元配列を作る
    ///
    /// 全て同じ型ならその型、数値だけなら最も広い数値型、それ以外は
    /// `Value` 配列になる。
    pub fn from_values(values: Vec<Value>) -> Array {
        let dtypes: Vec<Option<DType>> = values.iter().map(Value::dtype).collect();
        let first = match dtypes.first() {
            Some(Some(d)) => *d,
            _ => return Array::from_vec(values),
        };
        let target = if dtypes.iter().all(|d| *d == Some(first)) {
            first
        } else if dtypes.iter().all(|d| d.map_or(false, |d| d.is_numeric())) {
            dtypes.iter().flatten().copied().max().unwrap_or(DType::Float64)
        } else {
            return Array::from_vec(values);
        };
        match Array::from_values_as(&values, target) {
            Ok(array) => array,
            Err(_) => Array::from_vec(values),
        }
    }

    /// セル値を指定の要素型へ変換して 1 次元配列を作る
    pub fn from_values_as(values: &[Value], dtype: DType) -> Result<Array> {
        fn collect<T: Element>(values: &[Value], dtype: DType) -> Result<Array> {
            let items = values
                .iter()
                .map(|v| v.astype(dtype).and_then(|v| T::from_value(&v)))
                .collect::<Result<Vec<T>>>()?;
            Ok(Array::from_vec(items))
        }
        match dtype {
            DType::Bool => collect::<bool>(values, dtype),
            DType::Int32 => collect::<i32>(values, dtype),
            DType::Int64 => collect::<i64>(values, dtype),
            DType::UInt64 => collect::<u64>(values, dtype),
            DType::Float64 => collect::<f64>(values, dtype),
            DType::Str => collect::<String>(values, dtype),
            DType::Unicode => collect::<WideString>(values, dtype),
            DType::Value => Ok(Array::from_vec(values.to_vec())),
        }
    }

    pub fn dtype(&self) -> DType {
        match self {
            Array::Bool(_) => DType::Bool,
            Array::Int32(_) => DType::Int32,
            Array::Int64(_) => DType::Int64,
            Array::UInt64(_) => DType::UInt64,
            Array::Float64(_) => DType::Float64,
            Array::Str(_) => DType::Str,
            Array::Unicode(_) => DType::Unicode,
            Array::Value(_) => DType::Value,
        }
    }

    pub fn shape(&self) -> &[usize] {
        dispatch_array!(self, data => data.shape())
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// 全要素数
    pub fn len(&self) -> usize {
        dispatch_array!(self, data => data.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_bool_array(&self) -> bool {
        matches!(self, Array::Bool(_))
    }

    pub fn is_int_array(&self) -> bool {
        matches!(self, Array::Int32(_) | Array::Int64(_))
    }

    pub fn is_size_array(&self) -> bool {
        matches!(self, Array::UInt64(_))
    }

    pub fn is_float_array(&self) -> bool {
        matches!(self, Array::Float64(_))
    }

    pub fn is_string_array(&self) -> bool {
        matches!(self, Array::Str(_))
    }

    pub fn is_unicode_array(&self) -> bool {
        matches!(self, Array::Unicode(_))
    }

    pub fn is_value_array(&self) -> bool {
        matches!(self, Array::Value(_))
    }

    /// 要素型が一致すればその配列を参照
    pub fn as_view<T: Element>(&self) -> Option<&ArrayD<T>> {
        T::view(self)
    }

    /// 平坦な位置の要素を取得
    pub fn get(&self, i: usize) -> Result<Value> {
        let size = self.len();
        dispatch_array!(self, data => flat_get(data, i)
            .map(|item| item.clone().into_value())
            .ok_or(Error::IndexOutOfBounds { index: i, size }))
    }

    /// 平坦な位置へ値を書き込む
    ///
    /// 値は格納型へ厳密に変換される。浮動小数点の列には整数も書き込める。
    pub fn set(&mut self, i: usize, value: &Value) -> Result<()> {
        fn write<T: Element>(data: &mut ArrayD<T>, i: usize, value: &Value) -> Result<()> {
            let size = data.len();
            let item = T::from_value(value)?;
            let slot = flat_get_mut(data, i).ok_or(Error::IndexOutOfBounds { index: i, size })?;
            *slot = item;
            Ok(())
        }
        dispatch_array!(self, data => write(data, i, value))
    }

    /// 全要素をセル値として取得
    pub fn to_values(&self) -> Vec<Value> {
        dispatch_array!(self, data => data.iter().map(|item| item.clone().into_value()).collect())
    }

    /// 指定位置の要素を同じ型の 1 次元配列として取り出す
    pub fn select(&self, positions: &[usize]) -> Result<Array> {
        dispatch_array!(self, data => Ok(Array::from(take(data, positions)?)))
    }

    /// `[start, stop)` の範囲を取り出す
    pub fn slice(&self, start: usize, stop: usize) -> Result<Array> {
        if start > stop || stop > self.len() {
            return Err(Error::InvalidRange(format!(
                "incorrect range {}:{} for length {}",
                start,
                stop,
                self.len()
            )));
        }
        let positions: Vec<usize> = (start..stop).collect();
        self.select(&positions)
    }

    /// 2 次元配列の列 `j` を取り出す
    pub fn column(&self, j: usize) -> Result<Array> {
        let shape = self.shape().to_vec();
        if shape.len() != 2 {
            return Err(Error::DimensionMismatch(format!(
                "expected a 2-D array, found {} dimensions",
                shape.len()
            )));
        }
        let (rows, cols) = (shape[0], shape[1]);
        if j >= cols {
            return Err(Error::IndexOutOfBounds { index: j, size: cols });
        }
        let positions: Vec<usize> = (0..rows).map(|i| i * cols + j).collect();
        self.select(&positions)
    }

    /// 推定メモリ使用量（バイト）
    pub fn memory_usage(&self) -> usize {
        self.len() * self.dtype().item_size()
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        if self.shape() != other.shape() {
            return false;
        }
        match (self, other) {
            (Array::Bool(a), Array::Bool(b)) => a == b,
            (Array::Int32(a), Array::Int32(b)) => a == b,
            (Array::Int64(a), Array::Int64(b)) => a == b,
            (Array::UInt64(a), Array::UInt64(b)) => a == b,
            (Array::Float64(a), Array::Float64(b)) => {
                a.iter().zip(b.iter()).all(|(x, y)| element_equal(*x, *y))
            }
            (Array::Str(a), Array::Str(b)) => a == b,
            (Array::Unicode(a), Array::Unicode(b)) => a == b,
            (Array::Value(_), _) | (_, Array::Value(_)) => self.to_values() == other.to_values(),
            _ => false,
        }
    }
}

impl<T: Element> From<Vec<T>> for Array {
    fn from(values: Vec<T>) -> Self {
        Array::from_vec(values)
    }
}

impl<T: Element> From<Array1<T>> for Array {
    fn from(data: Array1<T>) -> Self {
        T::wrap(data.into_dyn())
    }
}

impl<T: Element> From<ndarray::Array2<T>> for Array {
    fn from(data: ndarray::Array2<T>) -> Self {
        T::wrap(data.into_dyn())
    }
}

impl<T: Element> From<ArrayD<T>> for Array {
    fn from(data: ArrayD<T>) -> Self {
        T::wrap(data)
    }
}

impl From<Vec<&str>> for Array {
    fn from(values: Vec<&str>) -> Self {
        Array::from_vec(values.into_iter().map(str::to_string).collect::<Vec<String>>())
    }
}
