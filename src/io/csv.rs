use csv::{ReaderBuilder, StringRecord};

use crate::core::Value;
use crate::dataframe::DataFrame;
use crate::error::{Error, Result};
use crate::io::settings::{Header, ReadCsvSettings};
use crate::io::transport::{fetch, Source};
use crate::na::NAN;
use crate::series::Series;

/// フィールドの推定型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sniffed {
    Missing,
    Int,
    Float,
    Text,
}

/// 数字と小数点の有無でフィールドの型を推定する
fn sniff(field: &str) -> Sniffed {
    if field.is_empty() {
        return Sniffed::Missing;
    }
    if !field.bytes().any(|b| b.is_ascii_digit()) {
        return Sniffed::Text;
    }
    if field.contains('.') {
        match field.parse::<f64>() {
            Ok(_) => Sniffed::Float,
            Err(_) => Sniffed::Text,
        }
    } else {
        match field.parse::<i64>() {
            Ok(_) => Sniffed::Int,
            Err(_) => Sniffed::Text,
        }
    }
}

/// 数字も小数点も含まない行ならヘッダーとみなす
fn looks_like_header(record: &StringRecord) -> bool {
    record
        .iter()
        .all(|field| !field.bytes().any(|b| b.is_ascii_digit() || b == b'.'))
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

/// 生の文字列列を型付きの Series に変換する
fn build_column(cells: Vec<String>, name: Value) -> Result<Series> {
    let kinds: Vec<Sniffed> = cells.iter().map(|c| sniff(c)).collect();
    if kinds.contains(&Sniffed::Text) {
        return Series::with_name(cells, name);
    }
    if kinds.iter().all(|k| *k == Sniffed::Int) {
        let values = cells
            .iter()
            .map(|c| c.parse::<i64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::Format(e.to_string()))?;
        return Series::with_name(values, name);
    }
    // 整数と小数の混在、または欠損あり
    let values = cells
        .iter()
        .zip(&kinds)
        .map(|(c, kind)| match kind {
            Sniffed::Missing => Ok(NAN),
            _ => c.parse::<f64>().map_err(|e| Error::Format(e.to_string())),
        })
        .collect::<Result<Vec<_>>>()?;
    Series::with_name(values, name)
}

/// メモリ上のCSVテキストから DataFrame を作成
pub fn parse_csv(bytes: &[u8], settings: &ReadCsvSettings) -> Result<DataFrame> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(settings.separator.byte())
        .from_reader(bytes);

    let mut records = Vec::new();
    let mut blank = 0usize;
    for result in rdr.records() {
        let record = result?;
        if is_blank(&record) {
            blank += 1;
            continue;
        }
        records.push(record);
    }
    if blank > 0 {
        log::warn!("skipped {} blank lines", blank);
    }

    let Some(first) = records.first() else {
        return Ok(DataFrame::new());
    };
    let has_header = settings.header == Header::Infer && looks_like_header(first);
    let names: Option<Vec<String>> =
        has_header.then(|| first.iter().map(str::to_string).collect());
    let width = first.len();
    let body = if has_header { &records[1..] } else { &records[..] };

    // 列ごとに収集
    let mut columns: Vec<Vec<String>> = vec![Vec::with_capacity(body.len()); width];
    for (line, record) in body.iter().enumerate() {
        if record.len() > width {
            return Err(Error::Format(format!(
                "row {} has {} fields, expected at most {}",
                line + usize::from(has_header),
                record.len(),
                width
            )));
        }
        for (j, column) in columns.iter_mut().enumerate() {
            // 足りないフィールドは欠損
            column.push(record.get(j).unwrap_or("").to_string());
        }
    }

    let mut df = DataFrame::new();
    for (j, cells) in columns.into_iter().enumerate() {
        let name = match &names {
            Some(names) => Value::Str(names[j].clone()),
            None => Value::Empty,
        };
        df.append_series(build_column(cells, name)?)?;
    }
    log::debug!(
        "parsed CSV into {:?} (header: {})",
        df.shape(),
        has_header
    );
    Ok(df)
}

/// ファイル、HTTP(S)、FTP のCSVを DataFrame として読み込む
///
/// 空文字列のソースは空の DataFrame になる。
pub fn read_csv(source: &str, settings: &ReadCsvSettings) -> Result<DataFrame> {
    if source.is_empty() {
        return Ok(DataFrame::new());
    }
    let source = Source::parse(source);
    let bytes = fetch(&source, settings)?;
    parse_csv(&bytes, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DType;
    use crate::io::settings::Separator;

    fn parse(text: &str) -> DataFrame {
        parse_csv(text.as_bytes(), &ReadCsvSettings::default()).unwrap()
    }

    #[test]
    fn sniffs_fields() {
        assert_eq!(sniff("12"), Sniffed::Int);
        assert_eq!(sniff("-3"), Sniffed::Int);
        assert_eq!(sniff("1.5"), Sniffed::Float);
        assert_eq!(sniff(""), Sniffed::Missing);
        assert_eq!(sniff("abc"), Sniffed::Text);
        assert_eq!(sniff("1.2.3"), Sniffed::Text);
        assert_eq!(sniff("2020-01-01"), Sniffed::Text);
    }

    #[test]
    fn infers_header() {
        let df = parse("Pregnancies,Glucose\n6,148\n1,85\n");
        assert_eq!(df.shape(), &[2, 2]);
        assert_eq!(
            df.columns().labels(),
            vec![Value::from("Pregnancies"), Value::from("Glucose")]
        );
        assert_eq!(df.at(1, "Glucose").unwrap(), Value::Int64(85));
    }

    #[test]
    fn numeric_first_line_is_data() {
        let df = parse("6,148\n1,85\n");
        assert_eq!(df.shape(), &[2, 2]);
        assert!(!df.columns().is_named());
        assert_eq!(df.at(0, 0_i64).unwrap(), Value::Int64(6));
    }

    #[test]
    fn forced_headerless() {
        let settings = ReadCsvSettings::default().with_header(Header::No);
        let df = parse_csv(b"a,b\nc,d\n", &settings).unwrap();
        assert_eq!(df.shape(), &[2, 2]);
        assert_eq!(df.at(0, 1_i64).unwrap(), Value::from("b"));
    }

    #[test]
    fn column_types() {
        let df = parse("i,f,s,m\n1,1.5,x,3\n2,2,y,\n");
        assert_eq!(
            df.dtypes(),
            vec![DType::Int64, DType::Float64, DType::Str, DType::Float64]
        );
        assert_eq!(df.at(1, "f").unwrap(), Value::Float64(2.0));
        assert!(df.at(1, "m").unwrap().is_nan());
    }

    #[test]
    fn short_rows_are_padded_long_rows_fail() {
        let df = parse("a,b\n1,2\n3\n");
        assert!(df.at(1, "b").unwrap().is_nan());
        assert!(matches!(
            parse_csv(b"a,b\n1,2,3\n", &ReadCsvSettings::default()),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let df = parse("a,b\n1,2\n   \n3,4\n");
        assert_eq!(df.nrows(), 2);
    }

    #[test]
    fn tab_separated() {
        let settings = ReadCsvSettings::default().with_separator(Separator::Tab);
        let df = parse_csv(b"x\ty\n1\t2\n", &settings).unwrap();
        assert_eq!(df.at(0, "y").unwrap(), Value::Int64(2));
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(parse("").shape(), &[0, 0]);
        let settings = ReadCsvSettings::default();
        assert_eq!(read_csv("", &settings).unwrap().shape(), &[0, 0]);
        let header_only = parse("a,b\n");
        assert_eq!(header_only.shape(), &[0, 2]);
    }
}
