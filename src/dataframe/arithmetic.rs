use crate::column::{Array, Element};
use crate::core::{ArithOp, DType, Value};
use crate::dataframe::DataFrame;
use crate::error::{Error, Result};
use crate::series::Series;

impl DataFrame {
    /// Combines column `j` with `scalars[j]`; results keep the column type.
    fn broadcast_columns(&self, scalars: &[Value], op: ArithOp) -> Result<DataFrame> {
        if scalars.len() != self.ncols() {
            return Err(Error::LengthMismatch {
                expected: self.ncols(),
                actual: scalars.len(),
            });
        }
        let mut out = self.clone();
        for (j, scalar) in scalars.iter().enumerate() {
            let label = self.columns.label(j)?;
            let series = self.column_at(j)?;
            let dtype = series.dtype();
            if !matches!(dtype, DType::Int32 | DType::Float64) {
                return Err(Error::Type(format!(
                    "unknown series type {} in column {}",
                    dtype, label
                )));
            }
            let cells = series
                .values()
                .to_values()
                .iter()
                .map(|cell| cell.arithmetic(scalar, op).and_then(|v| v.astype(dtype)))
                .collect::<Result<Vec<_>>>()?;
            let values = Array::from_values_as(&cells, dtype)?;
            let combined =
                Series::from_parts(values, series.index().clone(), series.name().clone())?;
            out.columns_data.insert(label, combined);
        }
        log::trace!("broadcast '{}' over {} columns", op, scalars.len());
        Ok(out)
    }

    /// Broadcasts the single row of `other` over every row.
    fn broadcast_row(&self, other: &DataFrame, op: ArithOp) -> Result<DataFrame> {
        if other.nrows() != 1 {
            return Err(Error::DimensionMismatch(format!(
                "right operand must have exactly one row, found {}",
                other.nrows()
            )));
        }
        let scalars = (0..other.ncols())
            .map(|j| other.iloc_cell(0, j))
            .collect::<Result<Vec<_>>>()?;
        self.broadcast_columns(&scalars, op)
    }

    pub fn add(&self, other: &DataFrame) -> Result<DataFrame> {
        self.broadcast_row(other, ArithOp::Add)
    }

    pub fn subtract(&self, other: &DataFrame) -> Result<DataFrame> {
        self.broadcast_row(other, ArithOp::Sub)
    }

    pub fn multiply(&self, other: &DataFrame) -> Result<DataFrame> {
        self.broadcast_row(other, ArithOp::Mul)
    }

    pub fn divide(&self, other: &DataFrame) -> Result<DataFrame> {
        self.broadcast_row(other, ArithOp::Div)
    }

    fn broadcast_vector<T: Element>(&self, vector: &[T], op: ArithOp) -> Result<DataFrame> {
        let scalars: Vec<Value> = vector.iter().cloned().map(T::into_value).collect();
        self.broadcast_columns(&scalars, op)
    }

    /// Adds `vector[j]` to every cell of column `j`.
    pub fn add_vector<T: Element>(&self, vector: &[T]) -> Result<DataFrame> {
        self.broadcast_vector(vector, ArithOp::Add)
    }

    pub fn subtract_vector<T: Element>(&self, vector: &[T]) -> Result<DataFrame> {
        self.broadcast_vector(vector, ArithOp::Sub)
    }

    pub fn multiply_vector<T: Element>(&self, vector: &[T]) -> Result<DataFrame> {
        self.broadcast_vector(vector, ArithOp::Mul)
    }

    pub fn divide_vector<T: Element>(&self, vector: &[T]) -> Result<DataFrame> {
        self.broadcast_vector(vector, ArithOp::Div)
    }

    /// Dot product of two one-row frames with matching column types,
    /// computed in float64.
    pub fn dot(&self, other: &DataFrame) -> Result<Value> {
        if self.nrows() != 1 || other.nrows() != 1 {
            return Err(Error::DimensionMismatch(format!(
                "dot needs one-row frames, found {} and {} rows",
                self.nrows(),
                other.nrows()
            )));
        }
        if self.ncols() != other.ncols() {
            return Err(Error::LengthMismatch {
                expected: self.ncols(),
                actual: other.ncols(),
            });
        }
        if self.dtypes() != other.dtypes() {
            return Err(Error::Type(format!(
                "column types differ: {:?} and {:?}",
                self.dtypes(),
                other.dtypes()
            )));
        }
        let as_float = |df: &DataFrame| -> Result<Series> {
            let cells = (0..df.ncols())
                .map(|j| df.iloc_cell(0, j))
                .collect::<Result<Vec<_>>>()?;
            Series::new(Array::from_values_as(&cells, DType::Float64)?)
        };
        as_float(self)?.dot(&as_float(other)?)
    }
}
