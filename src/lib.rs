// 特定の警告を無効化
#![allow(clippy::needless_return)]
#![allow(clippy::let_and_return)]

pub mod column;
pub mod core;
pub mod dataframe;
pub mod error;
pub mod index;
pub mod indexing;
pub mod io;
pub mod na;
pub mod series;

// Re-export commonly used types
pub use column::Array;
pub use crate::core::{DType, Value, WideString};
pub use dataframe::{DataFrame, DataFrameOptions};
pub use error::{Error, Result};
pub use index::Index;
pub use io::{read_csv, ReadCsvSettings};
pub use series::Series;

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
