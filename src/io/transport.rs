//! Fetching raw CSV bytes from local files, HTTP(S) and FTP.

use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};
use crate::io::ftp;
use crate::io::settings::ReadCsvSettings;

/// Where CSV bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Local(PathBuf),
    Http(Url),
    Ftp(Url),
}

impl Source {
    /// Classifies `text`; anything that is not an http, https, ftp or file URL
    /// is taken as a local path.
    pub fn parse(text: &str) -> Source {
        match Url::parse(text) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Source::Http(url),
                "ftp" => Source::Ftp(url),
                "file" => match url.to_file_path() {
                    Ok(path) => Source::Local(path),
                    Err(_) => Source::Local(PathBuf::from(text)),
                },
                _ => Source::Local(PathBuf::from(text)),
            },
            Err(_) => Source::Local(PathBuf::from(text)),
        }
    }

    pub fn is_remote(&self) -> bool {
        !matches!(self, Source::Local(_))
    }
}

/// Reads at most `limit` bytes; more than that is an error.
pub(crate) fn read_bounded<R: Read>(reader: R, limit: usize) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    reader
        .take(limit as u64 + 1)
        .read_to_end(&mut buffer)?;
    if buffer.len() > limit {
        return Err(Error::MessageTooLarge { limit });
    }
    Ok(buffer)
}

fn fetch_http(url: &Url, settings: &ReadCsvSettings) -> Result<Vec<u8>> {
    let client = reqwest::blocking::Client::builder()
        .redirect(reqwest::redirect::Policy::limited(settings.max_redirects))
        .timeout(Duration::from_secs(settings.timeout_secs))
        .user_agent(settings.user_agent.clone())
        .build()?;

    let mut request = client.get(url.clone());
    if !url.username().is_empty() {
        request = request.basic_auth(url.username(), url.password());
    }
    let response = request.send().map_err(|err| {
        if err.is_redirect() {
            Error::Http(format!(
                "too many redirects (limit {})",
                settings.max_redirects
            ))
        } else {
            Error::from(err)
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Http(format!(
            "HTTP {}: {}",
            status,
            status.canonical_reason().unwrap_or("Unknown")
        )));
    }
    if response.url() != url {
        log::debug!("redirected to {}", response.url());
    }

    let header_bytes: usize = response
        .headers()
        .iter()
        .map(|(name, value)| name.as_str().len() + value.len())
        .sum();
    if header_bytes > settings.max_header_bytes {
        return Err(Error::MessageTooLarge {
            limit: settings.max_header_bytes,
        });
    }
    if let Some(length) = response.content_length() {
        if length > settings.max_body_bytes as u64 {
            return Err(Error::MessageTooLarge {
                limit: settings.max_body_bytes,
            });
        }
    }
    read_bounded(response, settings.max_body_bytes)
}

/// Fetches the whole content of `source`.
pub fn fetch(source: &Source, settings: &ReadCsvSettings) -> Result<Vec<u8>> {
    let bytes = match source {
        Source::Local(path) => {
            let file = std::fs::File::open(path)?;
            read_bounded(file, settings.max_body_bytes)?
        }
        Source::Http(url) => fetch_http(url, settings)?,
        Source::Ftp(url) => ftp::retrieve(url, settings)?,
    };
    log::debug!("fetched {} bytes from {:?}", bytes.len(), source);
    Ok(bytes)
}
