//! Property tests for construction, slicing, broadcasting, value equality and
//! replacement.

use ndarray::Array2;
use proptest::prelude::*;

use pdframe::{DataFrame, Index, Series, Value};

/// Row-major matrix with 1..8 rows and 1..5 columns.
fn arb_matrix() -> impl Strategy<Value = Array2<i64>> {
    (1usize..8, 1usize..5).prop_flat_map(|(rows, cols)| {
        proptest::collection::vec(-1_000i64..1_000, rows * cols).prop_map(move |values| {
            Array2::from_shape_vec((rows, cols), values).expect("shape matches length")
        })
    })
}

fn arb_float_matrix() -> impl Strategy<Value = Array2<f64>> {
    (1usize..6, 1usize..4).prop_flat_map(|(rows, cols)| {
        proptest::collection::vec(-1e6_f64..1e6, rows * cols).prop_map(move |values| {
            Array2::from_shape_vec((rows, cols), values).expect("shape matches length")
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Shape, size and every cell survive construction from a dense array.
    #[test]
    fn prop_round_trip_construction(matrix in arb_matrix()) {
        let (rows, cols) = matrix.dim();
        let df = DataFrame::from_array(matrix.clone()).unwrap();
        prop_assert_eq!(df.shape(), &[rows, cols]);
        prop_assert_eq!(df.size(), rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                prop_assert_eq!(df.iloc_cell(r, c).unwrap(), Value::Int64(matrix[[r, c]]));
            }
        }
    }

    /// A row range holds the same rows as extracting them one at a time.
    #[test]
    fn prop_slice_composition(matrix in arb_matrix(), a in 0usize..8, len in 1usize..8) {
        let rows = matrix.nrows();
        let a = a % rows;
        let b = (a + len).min(rows);
        let df = DataFrame::from_array(matrix).unwrap();
        let sliced = df.iloc_expr(&format!("{}:{}", a, b)).unwrap();
        prop_assert_eq!(sliced.nrows(), b - a);
        prop_assert_eq!(sliced.index(), &Index::range(b - a));
        for (i, r) in (a..b).enumerate() {
            let piece = sliced.iloc_row(i).unwrap();
            let whole = df.iloc_row(r).unwrap();
            prop_assert_eq!(piece.values(), whole.values());
        }
    }

    /// Adding zeros and dividing by ones leave a float frame unchanged.
    #[test]
    fn prop_broadcast_identity(matrix in arb_float_matrix()) {
        let cols = matrix.ncols();
        let df = DataFrame::from_array(matrix).unwrap();
        let zeros = DataFrame::from_array(Array2::<f64>::zeros((1, cols))).unwrap();
        let ones = DataFrame::from_array(Array2::<f64>::ones((1, cols))).unwrap();
        prop_assert_eq!(df.add(&zeros).unwrap(), df.clone());
        prop_assert_eq!(df.divide(&ones).unwrap(), df);
    }

    /// The same number stored as different kinds compares equal; its text
    /// never does.
    #[test]
    fn prop_cross_kind_equality(n in -100_000i32..100_000) {
        let kinds = [
            Value::Int32(n),
            Value::Int64(n as i64),
            Value::Float64(n as f64),
        ];
        for a in &kinds {
            for b in &kinds {
                prop_assert_eq!(a, b);
            }
            prop_assert_ne!(a, &Value::Str(n.to_string()));
        }
        if n >= 0 {
            prop_assert_eq!(Value::UInt64(n as u64), Value::Int32(n));
        }
        if n == 0 || n == 1 {
            prop_assert_eq!(Value::Bool(n == 1), Value::Float64(n as f64));
        }
    }

    /// Replacing a value with itself is the identity.
    #[test]
    fn prop_replace_idempotence(
        values in proptest::collection::vec(-50i64..50, 0..20),
        x in -60i64..60,
    ) {
        let s = Series::with_name(values, "s").unwrap();
        prop_assert_eq!(s.replace(x, x).unwrap(), s);
    }

    /// Label lookup returns the first position carrying the label.
    #[test]
    fn prop_index_first_occurrence(labels in proptest::collection::vec(0i64..5, 1..12)) {
        let index = Index::from_labels(labels.iter().copied().map(Value::Int64).collect());
        for label in &labels {
            let first = labels.iter().position(|l| l == label);
            prop_assert_eq!(index.position(&Value::Int64(*label)), first);
        }
    }
}
