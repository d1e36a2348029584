// DataFrame implementations module
mod arithmetic;
mod display;
mod indexing;

use std::collections::HashMap;

use crate::column::Array;
use crate::core::{DType, Value};
use crate::error::{Error, Result};
use crate::index::Index;
use crate::series::Series;

/// Explicit labels supplied when building a frame from an array.
#[derive(Debug, Clone, Default)]
pub struct DataFrameOptions {
    /// Row labels; empty means `0..rows`.
    pub index: Vec<Value>,
    /// Column labels; empty means `0..columns`.
    pub columns: Vec<Value>,
}

/// Two-dimensional labeled table of named columns.
///
/// Columns are stored by label; their order comes from the column index.
#[derive(Debug, Clone)]
pub struct DataFrame {
    columns_data: HashMap<Value, Series>,
    columns: Index,
    index: Index,
    shape: Vec<usize>,
}

impl Default for DataFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl DataFrame {
    /// Empty frame with shape `[0, 0]`.
    pub fn new() -> Self {
        DataFrame {
            columns_data: HashMap::new(),
            columns: Index::default(),
            index: Index::default(),
            shape: vec![0, 0],
        }
    }

    /// Builds a frame from a 1-D (single column) or 2-D (row-major) array.
    pub fn from_array(data: impl Into<Array>) -> Result<Self> {
        Self::with_options(data, DataFrameOptions::default())
    }

    pub fn with_options(data: impl Into<Array>, options: DataFrameOptions) -> Result<Self> {
        let data = data.into();
        let (rows, columns, shape) = match data.ndim() {
            1 => (data.len(), vec![data.clone()], vec![data.len()]),
            2 => {
                let (rows, cols) = (data.shape()[0], data.shape()[1]);
                let columns = (0..cols)
                    .map(|j| data.column(j))
                    .collect::<Result<Vec<_>>>()?;
                (rows, columns, vec![rows, cols])
            }
            n => {
                return Err(Error::DimensionMismatch(format!(
                    "only 1-D and 2-D arrays are supported, found {} dimensions",
                    n
                )))
            }
        };
        let label_index = |labels: Vec<Value>, count: usize| -> Result<Index> {
            if labels.is_empty() {
                return Ok(Index::range(count));
            }
            if labels.len() != count {
                return Err(Error::LengthMismatch {
                    expected: count,
                    actual: labels.len(),
                });
            }
            Ok(Index::from_labels(labels))
        };
        let index = label_index(options.index, rows)?;
        let column_index = label_index(options.columns, columns.len())?;

        let mut columns_data = HashMap::with_capacity(columns.len());
        for (j, values) in columns.into_iter().enumerate() {
            let label = column_index.label(j)?;
            let series = Series::from_parts(values, index.clone(), label.clone())?;
            if columns_data.insert(label.clone(), series).is_some() {
                return Err(Error::DuplicateColumnName(label.to_string()));
            }
        }
        log::debug!("built DataFrame with shape {:?}", shape);
        Ok(DataFrame {
            columns_data,
            columns: column_index,
            index,
            shape,
        })
    }

    /// Builds a frame from columns in order.
    pub fn from_series(columns: Vec<Series>) -> Result<Self> {
        let mut df = DataFrame::new();
        for series in columns {
            df.append_series(series)?;
        }
        Ok(df)
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn nrows(&self) -> usize {
        self.index.len()
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// Number of cells.
    pub fn size(&self) -> usize {
        self.nrows() * self.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.ncols() == 0
    }

    /// Column labels.
    pub fn columns(&self) -> &Index {
        &self.columns
    }

    /// Row labels.
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Element types in column order.
    pub fn dtypes(&self) -> Vec<DType> {
        self.iter_columns().map(Series::dtype).collect()
    }

    /// Columns in order.
    pub fn iter_columns(&self) -> impl Iterator<Item = &Series> + '_ {
        self.columns
            .labels()
            .into_iter()
            .filter_map(move |label| self.columns_data.get(&label))
    }

    /// Column by label, or by position when no label matches.
    pub fn column(&self, key: impl Into<Value>) -> Result<&Series> {
        let key = key.into();
        let label = self.columns.resolve(&key);
        self.columns_data
            .get(&label)
            .ok_or_else(|| Error::ColumnNotFound(key.to_string()))
    }

    /// Column by position.
    pub fn column_at(&self, j: usize) -> Result<&Series> {
        let label = self.columns.label(j)?;
        self.columns_data
            .get(&label)
            .ok_or_else(|| Error::ColumnNotFound(label.to_string()))
    }

    fn column_mut(&mut self, key: &Value) -> Result<&mut Series> {
        let label = self.columns.resolve(key);
        self.columns_data
            .get_mut(&label)
            .ok_or_else(|| Error::ColumnNotFound(key.to_string()))
    }

    pub fn has_column(&self, key: impl Into<Value>) -> bool {
        self.column(key).is_ok()
    }

    /// Cell by row position and column key.
    pub fn at(&self, row: usize, column: impl Into<Value>) -> Result<Value> {
        self.column(column)?.iloc(row)
    }

    /// Writes a cell; the value is coerced into the column's element type.
    pub fn set(&mut self, row: usize, column: impl Into<Value>, value: impl Into<Value>) -> Result<()> {
        self.column_mut(&column.into())?.set(row, value)
    }

    /// Replaces the column at `key` in place, keeping its label and position.
    pub fn set_column(&mut self, key: impl Into<Value>, series: Series) -> Result<()> {
        let key = key.into();
        if series.len() != self.nrows() {
            return Err(Error::InconsistentRowCount {
                expected: self.nrows(),
                found: series.len(),
            });
        }
        let index = self.index.clone();
        let slot = self.column_mut(&key)?;
        let name = slot.name().clone();
        let mut series = series.rename(name);
        series.set_index(index)?;
        *slot = series;
        Ok(())
    }

    fn refresh_shape(&mut self) {
        let (rows, cols) = (self.nrows(), self.ncols());
        self.shape = if self.shape.len() == 1 && cols == 1 {
            vec![rows]
        } else {
            vec![rows, cols]
        };
    }

    fn insert_column(&mut self, label: Value, mut series: Series, anonymous: bool) -> Result<()> {
        if self.columns_data.contains_key(&label) {
            return Err(Error::DuplicateColumnName(label.to_string()));
        }
        if anonymous && !self.columns.is_named() {
            self.columns.push_anonymous();
        } else {
            self.columns.push(label.clone());
        }
        series.set_name(label.clone());
        series.set_index(self.index.clone())?;
        self.columns_data.insert(label, series);
        self.refresh_shape();
        Ok(())
    }

    /// 最初の未使用の整数ラベル（列数から数え始める）
    fn next_unused_label(&self) -> Value {
        let mut n = self.ncols() as i64;
        while self.columns_data.contains_key(&Value::Int64(n)) {
            n += 1;
        }
        Value::Int64(n)
    }

    fn check_rows(&self, rows: usize) -> Result<()> {
        if self.ncols() > 0 && rows != self.nrows() {
            return Err(Error::InconsistentRowCount {
                expected: self.nrows(),
                found: rows,
            });
        }
        Ok(())
    }

    /// Adds a column named after the series; an unnamed series gets the next
    /// position as its label.
    pub fn append_series(&mut self, series: Series) -> Result<()> {
        self.check_rows(series.len())?;
        if self.ncols() == 0 {
            self.index = series.index().clone();
        }
        let (label, anonymous) = if series.name().is_empty() {
            (self.next_unused_label(), true)
        } else {
            (series.name().clone(), false)
        };
        log::trace!("appending column {}", label);
        self.insert_column(label, series, anonymous)
    }

    /// Adds every column of `other`. Unlabeled columns are renumbered after
    /// the existing ones.
    pub fn append(&mut self, other: &DataFrame) -> Result<()> {
        if other.ncols() == 0 {
            return Ok(());
        }
        self.check_rows(other.nrows())?;
        for label in other.columns.labels() {
            if other.columns.is_named() && self.columns_data.contains_key(&label) {
                return Err(Error::DuplicateColumnName(label.to_string()));
            }
        }
        if self.ncols() == 0 {
            self.index = other.index.clone();
        }
        for j in 0..other.ncols() {
            let series = other.column_at(j)?.clone();
            if other.columns.is_named() {
                self.insert_column(other.columns.label(j)?, series, false)?;
            } else {
                let label = self.next_unused_label();
                self.insert_column(label, series, true)?;
            }
        }
        Ok(())
    }

    /// Removes a column and returns it.
    pub fn drop(&mut self, column: impl Into<Value>) -> Result<Series> {
        let key = column.into();
        let pos = self
            .columns
            .position(&key)
            .ok_or_else(|| Error::ColumnNotFound(key.to_string()))?;
        let label = self.columns.remove(pos)?;
        let series = self
            .columns_data
            .remove(&label)
            .ok_or_else(|| Error::ColumnNotFound(label.to_string()))?;
        self.refresh_shape();
        Ok(series)
    }
}

impl PartialEq for DataFrame {
    fn eq(&self, other: &Self) -> bool {
        self.nrows() == other.nrows()
            && self.columns == other.columns
            && self.index == other.index
            && self
                .iter_columns()
                .zip(other.iter_columns())
                .all(|(a, b)| a.values() == b.values())
    }
}
