//! Settings for `read_csv`, loadable from TOML.

use serde::Deserialize;
use std::path::Path;

use crate::error::Result;

/// How the first line of a CSV source is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Header {
    /// The first line is a header when it holds no digit and no '.'.
    #[default]
    Infer,
    /// Every line is data; columns are numbered.
    No,
}

/// Field separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Separator {
    #[default]
    Comma,
    Tab,
}

impl Separator {
    pub fn byte(&self) -> u8 {
        match self {
            Separator::Comma => b',',
            Separator::Tab => b'\t',
        }
    }
}

/// Options for parsing and fetching a CSV source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReadCsvSettings {
    pub header: Header,
    pub separator: Separator,
    /// Redirects followed before an HTTP fetch fails.
    pub max_redirects: usize,
    /// Connect and read timeout for remote sources.
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Upper bound for a fetched body.
    pub max_body_bytes: usize,
    /// Upper bound for response headers and FTP reply lines.
    pub max_header_bytes: usize,
}

impl Default for ReadCsvSettings {
    fn default() -> Self {
        ReadCsvSettings {
            header: Header::Infer,
            separator: Separator::Comma,
            max_redirects: 5,
            timeout_secs: 30,
            user_agent: format!("pdframe/{}", crate::VERSION),
            max_body_bytes: 256 * 1024 * 1024,
            max_header_bytes: 64 * 1024,
        }
    }
}

impl ReadCsvSettings {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn with_header(mut self, header: Header) -> Self {
        self.header = header;
        self
    }

    pub fn with_separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = ReadCsvSettings::default();
        assert_eq!(s.header, Header::Infer);
        assert_eq!(s.separator.byte(), b',');
        assert_eq!(s.max_redirects, 5);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let s = ReadCsvSettings::from_toml_str("separator = \"tab\"\nheader = \"no\"\n").unwrap();
        assert_eq!(s.separator, Separator::Tab);
        assert_eq!(s.header, Header::No);
        assert_eq!(s.timeout_secs, 30);
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let err = ReadCsvSettings::from_toml_str("separator = \"pipe\"").unwrap_err();
        assert!(matches!(err, crate::error::Error::Config(_)));
    }
}
