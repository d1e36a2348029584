use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use pdframe::io::{parse_csv, Header, Separator};
use pdframe::{read_csv, DType, Error, ReadCsvSettings, Value};

const DIABETES: &str = "\
Pregnancies,Glucose,BloodPressure,BMI,Outcome
6,148,72,33.6,1
1,85,66,26.6,0
8,183,64,23.3,1
1,89,66,28.1,0
";

fn temp_csv(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_csv_header_inference() {
    let file = temp_csv(DIABETES);
    let df = read_csv(file.path().to_str().unwrap(), &ReadCsvSettings::default()).unwrap();

    // ヘッダー行を除いた行数
    assert_eq!(df.shape(), &[4, 5]);
    assert_eq!(
        df.columns().labels(),
        ["Pregnancies", "Glucose", "BloodPressure", "BMI", "Outcome"]
            .iter()
            .map(|s| Value::from(*s))
            .collect::<Vec<_>>()
    );
    assert_eq!(
        df.dtypes(),
        vec![DType::Int64, DType::Int64, DType::Int64, DType::Float64, DType::Int64]
    );
    assert_eq!(df.at(2, "Glucose").unwrap(), Value::Int64(183));
    assert_eq!(df.at(0, "BMI").unwrap(), Value::Float64(33.6));
}

#[test]
fn test_csv_without_header() {
    let file = temp_csv("6,148\n1,85\n8,183\n");
    let df = read_csv(file.path().to_str().unwrap(), &ReadCsvSettings::default()).unwrap();
    assert_eq!(df.shape(), &[3, 2]);
    assert_eq!(df.columns().labels(), vec![Value::Int64(0), Value::Int64(1)]);
}

#[test]
fn test_file_url_source() {
    let file = temp_csv(DIABETES);
    let url = url::Url::from_file_path(file.path()).unwrap();
    let df = read_csv(url.as_str(), &ReadCsvSettings::default()).unwrap();
    assert_eq!(df.nrows(), 4);
}

#[test]
fn test_settings_from_toml_file() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    config
        .write_all(b"header = \"no\"\nseparator = \"tab\"\n")
        .unwrap();
    let settings = ReadCsvSettings::from_toml_file(config.path()).unwrap();
    assert_eq!(settings.header, Header::No);
    assert_eq!(settings.separator, Separator::Tab);

    let df = parse_csv(b"a\tb\n1\t2\n", &settings).unwrap();
    assert_eq!(df.shape(), &[2, 2]);
    assert_eq!(df.dtypes(), vec![DType::Str, DType::Str]);
}

#[test]
fn test_missing_file() {
    let result = read_csv("/no/such/dir/data.csv", &ReadCsvSettings::default());
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_body_limit() {
    let file = temp_csv(DIABETES);
    let settings = ReadCsvSettings {
        max_body_bytes: 16,
        ..ReadCsvSettings::default()
    };
    let result = read_csv(file.path().to_str().unwrap(), &settings);
    assert!(matches!(result, Err(Error::MessageTooLarge { limit: 16 })));
}

/// 1ファイルだけを返す最小限のFTPサーバー
fn serve_ftp_once(content: &'static str) -> u16 {
    let control = TcpListener::bind("127.0.0.1:0").unwrap();
    let data = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = control.local_addr().unwrap().port();
    let data_port = data.local_addr().unwrap().port();

    thread::spawn(move || {
        let (mut stream, _) = control.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        stream.write_all(b"220 ready\r\n").unwrap();
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap() == 0 {
                break;
            }
            let command = line.trim_end();
            let reply = if command.starts_with("USER") {
                "331 password please\r\n".to_string()
            } else if command.starts_with("PASS") {
                "230 logged in\r\n".to_string()
            } else if command.starts_with("TYPE") {
                "200 binary\r\n".to_string()
            } else if command == "PASV" {
                format!(
                    "227 Entering Passive Mode (127,0,0,1,{},{})\r\n",
                    data_port / 256,
                    data_port % 256
                )
            } else if command == "RETR pima/diabetes.csv" {
                stream.write_all(b"150 opening data connection\r\n").unwrap();
                let (mut transfer, _) = data.accept().unwrap();
                transfer.write_all(content.as_bytes()).unwrap();
                drop(transfer);
                "226 transfer complete\r\n".to_string()
            } else if command == "QUIT" {
                stream.write_all(b"221 bye\r\n").unwrap();
                break;
            } else {
                "550 no such file\r\n".to_string()
            };
            stream.write_all(reply.as_bytes()).unwrap();
        }
    });
    port
}

#[test]
fn test_csv_over_ftp() {
    let port = serve_ftp_once(DIABETES);
    let url = format!("ftp://127.0.0.1:{}/pima/diabetes.csv", port);
    let df = read_csv(&url, &ReadCsvSettings::default()).unwrap();
    assert_eq!(df.shape(), &[4, 5]);
    assert_eq!(df.at(3, "Glucose").unwrap(), Value::Int64(89));
}

#[test]
fn test_ftp_missing_file() {
    let port = serve_ftp_once(DIABETES);
    let url = format!("ftp://127.0.0.1:{}/other.csv", port);
    let result = read_csv(&url, &ReadCsvSettings::default());
    assert!(matches!(result, Err(Error::Ftp(_))));
}

/// 全ての接続に同じ応答を返す最小限のHTTPサーバー
fn serve_http(response: String, hits: Arc<AtomicUsize>) -> u16 {
    // ローカルサーバーへの接続がプロキシを経由しないようにする
    std::env::set_var("NO_PROXY", "127.0.0.1");
    std::env::set_var("no_proxy", "127.0.0.1");
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
                    break;
                }
            }
            hits.fetch_add(1, Ordering::SeqCst);
            let _ = stream.write_all(response.as_bytes());
        }
    });
    port
}

fn http_response(status: &str, headers: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        headers,
        body.len(),
        body
    )
}

#[test]
fn test_csv_over_http() {
    let hits = Arc::new(AtomicUsize::new(0));
    let port = serve_http(http_response("200 OK", "", DIABETES), hits.clone());
    let url = format!("http://127.0.0.1:{}/pima/diabetes.csv", port);
    let df = read_csv(&url, &ReadCsvSettings::default()).unwrap();
    assert_eq!(df.shape(), &[4, 5]);
    assert_eq!(df.at(0, "BMI").unwrap(), Value::Float64(33.6));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_http_redirect_loop_stops() {
    let hits = Arc::new(AtomicUsize::new(0));
    let response = http_response("302 Found", "Location: /loop\r\n", "");
    let port = serve_http(response, hits.clone());
    let settings = ReadCsvSettings {
        max_redirects: 3,
        ..ReadCsvSettings::default()
    };
    let url = format!("http://127.0.0.1:{}/start.csv", port);
    let result = read_csv(&url, &settings);
    assert!(matches!(result, Err(Error::Http(_))));
    // 上限を超えてリダイレクトを追わない
    let requests = hits.load(Ordering::SeqCst);
    assert!(requests >= 3 && requests <= 5, "requests: {}", requests);
}

#[test]
fn test_http_error_status() {
    let hits = Arc::new(AtomicUsize::new(0));
    let port = serve_http(http_response("404 Not Found", "", ""), hits);
    let url = format!("http://127.0.0.1:{}/missing.csv", port);
    let result = read_csv(&url, &ReadCsvSettings::default());
    assert!(matches!(result, Err(Error::Http(_))));
}

#[test]
fn test_http_content_length_limit() {
    let hits = Arc::new(AtomicUsize::new(0));
    let port = serve_http(http_response("200 OK", "", DIABETES), hits);
    let settings = ReadCsvSettings {
        max_body_bytes: 16,
        ..ReadCsvSettings::default()
    };
    let url = format!("http://127.0.0.1:{}/pima/diabetes.csv", port);
    let result = read_csv(&url, &settings);
    assert!(matches!(result, Err(Error::MessageTooLarge { limit: 16 })));
}
