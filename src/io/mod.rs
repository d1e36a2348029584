pub mod csv;
mod ftp;
pub mod settings;
pub mod transport;

// Re-export commonly used functions
pub use csv::{parse_csv, read_csv};
pub use settings::{Header, ReadCsvSettings, Separator};
pub use transport::{fetch, Source};
