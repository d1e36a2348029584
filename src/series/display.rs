use std::fmt;

use crate::core::Value;
use crate::series::Series;

const KB: f64 = 1024.0;
const MB: f64 = KB * 1024.0;
const GB: f64 = MB * 1024.0;
const TB: f64 = GB * 1024.0;

/// メモリ量を読みやすい単位で表す
pub(crate) fn format_memory(bytes: usize) -> String {
    let b = bytes as f64;
    if b >= TB {
        format!("{} TB", Value::Float64(b / TB))
    } else if b >= GB {
        format!("{} GB", Value::Float64(b / GB))
    } else if b >= MB {
        format!("{} MB", Value::Float64(b / MB))
    } else if b >= KB {
        format!("{} KB", Value::Float64(b / KB))
    } else {
        format!("{} bytes", bytes)
    }
}

impl Series {
    /// pandas の `Series.info()` 相当の概要
    pub fn info(&self) -> String {
        let mut out = String::new();
        out.push_str("<class 'pandas.core.series.Series'>\n");
        out.push_str(&format!("RangeIndex: {} entries", self.len()));
        if !self.is_empty() {
            out.push_str(&format!(", 0 to {}", self.len() - 1));
        }
        out.push('\n');
        let name = if self.name().is_empty() {
            "None".to_string()
        } else {
            self.name().to_string()
        };
        let non_null = self
            .values()
            .to_values()
            .iter()
            .filter(|v| !v.is_empty() && !v.is_nan())
            .count();
        out.push_str(&format!("Series name: {}\n", name));
        out.push_str("Non-Null Count\tDtype\n");
        out.push_str("--------------\t-----\n");
        out.push_str(&format!("{} non-null\t{}\n", non_null, self.dtype()));
        out.push_str(&format!("dtypes: {}(1)\n", self.dtype()));
        let usage = std::mem::size_of::<Series>() + self.values().memory_usage();
        out.push_str(&format!("memory usage: {}\n", format_memory(usage)));
        out
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value) in self.index().labels().iter().zip(self.values().to_values()) {
            writeln!(f, "{} {}", label, value)?;
        }
        writeln!(
            f,
            "Name: {}, Length: {}, dtype: {}",
            self.name(),
            self.len(),
            self.dtype()
        )
    }
}
