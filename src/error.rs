use thiserror::Error;

/// エラー型の定義
#[derive(Error, Debug)]
pub enum Error {
    #[error("インデックスが範囲外です: インデックス {index}, サイズ {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    #[error("列が見つかりません: {0}")]
    ColumnNotFound(String),

    #[error("列名が重複しています: {0}")]
    DuplicateColumnName(String),

    #[error("行数が一致しません: 期待値 {expected}, 実際 {found}")]
    InconsistentRowCount { expected: usize, found: usize },

    #[error("長さが一致しません: 期待値 {expected}, 実際 {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("次元不一致エラー: {0}")]
    DimensionMismatch(String),

    #[error("型が一致しません: {0}")]
    Type(String),

    #[error("無効な値です: {0}")]
    InvalidValue(String),

    #[error("インデックスエラー: {0}")]
    Index(String),

    #[error("範囲が不正です: {0}")]
    InvalidRange(String),

    #[error("サポートされていない型です: {0}")]
    UnsupportedType(String),

    #[error("未実装機能です: {0}")]
    NotImplemented(String),

    #[error("無効な操作です: {0}")]
    InvalidOperation(String),

    #[error("無効な入力です: {0}")]
    InvalidInput(String),

    #[error("データ形式エラー: {0}")]
    Format(String),

    #[error("HTTPエラー: {0}")]
    Http(String),

    #[error("FTPエラー: {0}")]
    Ftp(String),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("メッセージが大きすぎます: 上限 {limit} バイト")]
    MessageTooLarge { limit: usize },

    #[error("入出力エラー")]
    Io(#[source] std::io::Error),

    #[error("CSVエラー")]
    Csv(#[source] csv::Error),

    #[error("ネットワークエラー")]
    Network(#[source] reqwest::Error),
}

/// Resultの型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::InvalidInput(format!("URLの解析に失敗しました: {}", err))
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::InvalidInput(format!("正規表現が不正です: {}", err))
    }
}

impl From<ndarray::ShapeError> for Error {
    fn from(err: ndarray::ShapeError) -> Self {
        Error::DimensionMismatch(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}
