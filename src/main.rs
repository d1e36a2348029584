use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use pdframe::io::{Header, Separator};
use pdframe::{read_csv, DataFrame, ReadCsvSettings, Result, Value};

/// CSVを読み込み、0を欠損とみなして列平均で補完し、特徴量と目的変数に分ける
#[derive(Parser)]
#[command(version, about = "Load a CSV, impute zeros with column means and split features from the target.")]
struct Args {
    /// Local path or http(s)/ftp URL.
    source: String,

    /// Columns in which 0 means "missing" (repeatable).
    #[arg(long = "zero-as-missing", value_name = "COLUMN")]
    zero_as_missing: Vec<String>,

    /// TOML file with read_csv settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Treat the first line as data.
    #[arg(long)]
    no_header: bool,

    /// Fields are separated by tabs.
    #[arg(long)]
    tab: bool,
}

fn settings(args: &Args) -> Result<ReadCsvSettings> {
    let mut settings = match &args.config {
        Some(path) => ReadCsvSettings::from_toml_file(path)?,
        None => ReadCsvSettings::default(),
    };
    if args.no_header {
        settings = settings.with_header(Header::No);
    }
    if args.tab {
        settings = settings.with_separator(Separator::Tab);
    }
    Ok(settings)
}

/// 0 を NaN に置き換え、その NaN を列平均で埋める
fn impute_zeros(df: &mut DataFrame, column: &str) -> Result<()> {
    let with_nan = df.column(column)?.replace(0_i64, f64::NAN)?;
    let mean = with_nan.mean(true)?;
    log::debug!("column {} mean without zeros: {}", column, mean);
    let filled = with_nan.replace(f64::NAN, mean)?;
    df.set_column(column, filled)
}

fn run(args: Args) -> Result<()> {
    let settings = settings(&args)?;
    let mut df = read_csv(&args.source, &settings)?;
    println!("df.shape={:?}", df.shape());

    for column in &args.zero_as_missing {
        impute_zeros(&mut df, column)?;
    }

    let ncols = df.ncols();
    if ncols < 2 {
        println!("{}", df);
        return Ok(());
    }
    let x = df.iloc_expr2(":", &format!("0:{}", ncols - 1))?;
    let y = df.iloc_expr2(":", &(ncols - 1).to_string())?;
    println!("X=\n{}", x);
    println!("y=\n{}", y);
    if let Ok(target) = y.column_at(0) {
        if target.dtype().is_numeric() {
            println!("mean(y)={}", Value::Float64(target.mean(true)?));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
