//! Passive-mode FTP download (`RETR`) over plain TCP.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use regex::Regex;
use url::Url;

use crate::error::{Error, Result};
use crate::io::settings::ReadCsvSettings;
use crate::io::transport::read_bounded;

lazy_static::lazy_static! {
    /// h1,h2,h3,h4,p1,p2 of a 227 reply
    static ref PASV_ADDRESS: std::result::Result<Regex, regex::Error> =
        Regex::new(r"(\d{1,3}),(\d{1,3}),(\d{1,3}),(\d{1,3}),(\d{1,3}),(\d{1,3})");
}

fn read_line<R: BufRead>(reader: &mut R, max_line: usize) -> Result<String> {
    let mut line = Vec::new();
    let n = reader
        .take(max_line as u64 + 1)
        .read_until(b'\n', &mut line)?;
    if n == 0 {
        return Err(Error::Ftp("connection closed by server".into()));
    }
    if line.len() > max_line {
        return Err(Error::MessageTooLarge { limit: max_line });
    }
    Ok(String::from_utf8_lossy(&line).trim_end().to_string())
}

/// Reads one reply, following `123-` continuation lines up to the closing
/// `123 ` line.
pub(crate) fn read_reply<R: BufRead>(reader: &mut R, max_line: usize) -> Result<(u16, String)> {
    let first = read_line(reader, max_line)?;
    let code = first
        .get(..3)
        .and_then(|c| c.parse::<u16>().ok())
        .ok_or_else(|| Error::Ftp(format!("malformed reply '{}'", first)))?;
    let mut text = first.clone();
    if first.as_bytes().get(3) == Some(&b'-') {
        let terminator = format!("{} ", &first[..3]);
        loop {
            let line = read_line(reader, max_line)?;
            text.push('\n');
            text.push_str(&line);
            if line.starts_with(&terminator) {
                break;
            }
        }
    }
    Ok((code, text))
}

/// Data connection address from a 227 reply. An unspecified host means the
/// control connection's host.
pub(crate) fn parse_pasv(text: &str, control_host: IpAddr) -> Result<SocketAddr> {
    let pattern = PASV_ADDRESS.as_ref().map_err(|e| Error::from(e.clone()))?;
    let caps = pattern
        .captures(text)
        .ok_or_else(|| Error::Ftp(format!("malformed PASV reply '{}'", text)))?;
    let mut parts = [0u8; 6];
    for (i, part) in parts.iter_mut().enumerate() {
        *part = caps[i + 1]
            .parse::<u8>()
            .map_err(|_| Error::Ftp(format!("malformed PASV reply '{}'", text)))?;
    }
    let ip = Ipv4Addr::new(parts[0], parts[1], parts[2], parts[3]);
    let port = u16::from(parts[4]) * 256 + u16::from(parts[5]);
    let host = if ip.is_unspecified() {
        control_host
    } else {
        IpAddr::V4(ip)
    };
    Ok(SocketAddr::new(host, port))
}

struct Control {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    max_line: usize,
}

impl Control {
    fn connect(addr: &SocketAddr, timeout: Duration, max_line: usize) -> Result<Self> {
        let stream = TcpStream::connect_timeout(addr, timeout)?;
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;
        let writer = stream.try_clone()?;
        Ok(Control {
            reader: BufReader::new(stream),
            writer,
            max_line,
        })
    }

    fn reply(&mut self, accepted: &[u16]) -> Result<String> {
        let (code, text) = read_reply(&mut self.reader, self.max_line)?;
        log::trace!("ftp< {}", text);
        if accepted.contains(&code) {
            Ok(text)
        } else {
            Err(Error::Ftp(text))
        }
    }

    fn send(&mut self, command: &str) -> Result<()> {
        if command.starts_with("PASS ") {
            log::trace!("ftp> PASS ****");
        } else {
            log::trace!("ftp> {}", command);
        }
        self.writer.write_all(format!("{}\r\n", command).as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    fn command(&mut self, command: &str, accepted: &[u16]) -> Result<String> {
        self.send(command)?;
        self.reply(accepted)
    }
}

/// Downloads the file named by an `ftp://` URL.
pub(crate) fn retrieve(url: &Url, settings: &ReadCsvSettings) -> Result<Vec<u8>> {
    let host = url
        .host_str()
        .ok_or_else(|| Error::InvalidInput(format!("FTP URL without host: {}", url)))?;
    let port = url.port_or_known_default().unwrap_or(21);
    let path = url.path().trim_start_matches('/');
    if path.is_empty() {
        return Err(Error::InvalidInput(format!("FTP URL without path: {}", url)));
    }
    let timeout = Duration::from_secs(settings.timeout_secs);
    let addr = (host, port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| Error::Ftp(format!("cannot resolve {}", host)))?;

    let mut control = Control::connect(&addr, timeout, settings.max_header_bytes)?;
    control.reply(&[220])?;

    let user = if url.username().is_empty() {
        "anonymous"
    } else {
        url.username()
    };
    control.send(&format!("USER {}", user))?;
    let (code, text) = read_reply(&mut control.reader, control.max_line)?;
    match code {
        230 => {}
        331 | 332 => {
            let password = url.password().unwrap_or("anonymous@");
            control.command(&format!("PASS {}", password), &[230, 202])?;
        }
        _ => return Err(Error::Ftp(text)),
    }

    control.command("TYPE I", &[200])?;
    let pasv = control.command("PASV", &[227])?;
    let data_addr = parse_pasv(&pasv, addr.ip())?;
    let data = TcpStream::connect_timeout(&data_addr, timeout)?;
    data.set_read_timeout(Some(timeout))?;

    control.command(&format!("RETR {}", path), &[125, 150])?;
    let bytes = read_bounded(data, settings.max_body_bytes)?;
    control.reply(&[226, 250])?;
    if let Err(err) = control.command("QUIT", &[221]) {
        log::warn!("FTP QUIT failed: {}", err);
    }
    log::debug!("retrieved {} bytes over FTP from {}", bytes.len(), host);
    Ok(bytes)
}
