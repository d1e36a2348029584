use std::collections::HashMap;

use crate::column::Array;
use crate::core::{DType, Value};
use crate::dataframe::DataFrame;
use crate::error::{Error, Result};
use crate::indexing::parse_slice;
use crate::series::Series;

/// Element type chosen for a row whose cells differ in type.
const ROW_DTYPE_PRECEDENCE: [DType; 7] = [
    DType::Unicode,
    DType::Str,
    DType::Float64,
    DType::Int32,
    DType::Int64,
    DType::UInt64,
    DType::Bool,
];

fn row_dtype(cells: &[Value]) -> DType {
    let kinds: Vec<DType> = cells.iter().filter_map(Value::dtype).collect();
    ROW_DTYPE_PRECEDENCE
        .iter()
        .copied()
        .find(|d| kinds.contains(d))
        .unwrap_or(DType::Int64)
}

impl DataFrame {
    /// Frame holding the rows at `positions`, in that order.
    pub(crate) fn take_rows(&self, positions: &[usize]) -> Result<DataFrame> {
        let index = self.index.take(positions)?;
        let mut columns_data = HashMap::with_capacity(self.columns_data.len());
        for (label, series) in &self.columns_data {
            columns_data.insert(label.clone(), series.take(positions)?);
        }
        let mut df = DataFrame {
            columns_data,
            columns: self.columns.clone(),
            index,
            shape: self.shape.clone(),
        };
        df.refresh_shape();
        Ok(df)
    }

    /// Frame holding the columns at `positions`, in that order.
    pub(crate) fn take_columns(&self, positions: &[usize]) -> Result<DataFrame> {
        let columns = self.columns.take(positions)?;
        let mut columns_data = HashMap::with_capacity(positions.len());
        for (j, &p) in positions.iter().enumerate() {
            let label = columns.label(j)?;
            let series = self.column_at(p)?.rename(label.clone());
            if columns_data.insert(label.clone(), series).is_some() {
                return Err(Error::DuplicateColumnName(label.to_string()));
            }
        }
        Ok(DataFrame {
            columns_data,
            shape: vec![self.nrows(), columns.len()],
            columns,
            index: self.index.clone(),
        })
    }

    /// Position of the column labelled `p`, falling back to `p` itself.
    fn column_position(&self, p: usize) -> usize {
        if self.columns.is_named() {
            for key in [Value::Int64(p as i64), Value::Str(p.to_string())] {
                if self.columns.contains(&key) {
                    if let Some(pos) = self.columns.position(&key) {
                        return pos;
                    }
                }
            }
        }
        p
    }

    /// One-row frame for row `row`.
    pub fn row(&self, row: usize) -> Result<DataFrame> {
        if row >= self.nrows() {
            return Err(Error::IndexOutOfBounds {
                index: row,
                size: self.nrows(),
            });
        }
        self.take_rows(&[row])
    }

    /// Row `row` as a Series indexed by the column labels and named by the
    /// row label. Mixed rows are converted to a single element type, picked
    /// as unicode, str, float64, int32, int64, uint64, bool in that order.
    pub fn iloc_row(&self, row: usize) -> Result<Series> {
        if row >= self.nrows() {
            return Err(Error::IndexOutOfBounds {
                index: row,
                size: self.nrows(),
            });
        }
        let cells = self
            .iter_columns()
            .map(|series| series.iloc(row))
            .collect::<Result<Vec<_>>>()?;
        let dtype = row_dtype(&cells);
        let values = Array::from_values_as(&cells, dtype)?;
        Series::from_parts(values, self.columns.clone(), self.index.label(row)?)
    }

    /// Cell at row `row`, column position `column`.
    pub fn iloc_cell(&self, row: usize, column: usize) -> Result<Value> {
        self.column_at(column)?.iloc(row)
    }

    /// Rows selected by a slicing expression (`"1:3"`, `":2"`, `"4"`).
    pub fn iloc_expr(&self, rows: &str) -> Result<DataFrame> {
        let positions = parse_slice(rows)?.resolve(self.nrows())?;
        self.take_rows(&positions)
    }

    /// Rows and columns selected by slicing expressions. Column bounds match a
    /// column label first and fall back to positions.
    pub fn iloc_expr2(&self, rows: &str, columns: &str) -> Result<DataFrame> {
        let row_positions = parse_slice(rows)?.resolve(self.nrows())?;
        let column_positions =
            parse_slice(columns)?.resolve_with(self.ncols(), |p| self.column_position(p))?;
        self.take_columns(&column_positions)?.take_rows(&row_positions)
    }
}
