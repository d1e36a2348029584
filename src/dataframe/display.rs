use std::fmt;

use crate::dataframe::DataFrame;

impl fmt::Display for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for label in self.columns.labels() {
            write!(f, "\t{}", label)?;
        }
        writeln!(f)?;
        let columns: Vec<_> = self.iter_columns().collect();
        for (i, label) in self.index.labels().iter().enumerate() {
            write!(f, "{}", label)?;
            for series in &columns {
                match series.get(i) {
                    Some(value) => write!(f, "\t{}", value)?,
                    None => write!(f, "\t")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "{} rows x {} columns", self.nrows(), self.ncols())
    }
}

#[cfg(test)]
mod tests {
    use crate::dataframe::DataFrame;
    use ndarray::array;

    #[test]
    fn tab_separated_layout() {
        let df = DataFrame::from_array(array![[6_i64, 148], [1, 85]]).unwrap();
        assert_eq!(
            df.to_string(),
            "\t0\t1\n0\t6\t148\n1\t1\t85\n2 rows x 2 columns\n"
        );
    }
}
