use std::io::{self, Read};

use clap::{ArgAction, Args, Parser, Subcommand};
use itertools::Itertools;
use serde_json::json;
use shelfdate::{extract_dual_at, extract_single_at, DateError, ExtractionResult, ReferenceDate};
use tracing_subscriber::EnvFilter;

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Date(#[from] DateError),

    #[error("Could not read text from stdin: {0}")]
    Stdin(#[from] io::Error),

    #[error("Could not encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Chooses the "today" used for dates written without a year, and for `--check-expiry`.
#[derive(Args, Debug)]
#[group(required = false, multiple = false)]
struct DateArg {
    /// [DATE PROVIDER] Use the current UTC date. Exclusive with other date providers.
    #[arg(long)]
    utc: bool,

    /// [DATE PROVIDER] Use the current local date (the default). Exclusive with other date
    /// providers.
    #[arg(long)]
    local: bool,

    /// [DATE PROVIDER] Use a date in format `YYYY-MM-DD`. Exclusive with other date providers.
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: Option<String>,
}

impl DateArg {
    fn to_reference_date(&self) -> Result<ReferenceDate, CliError> {
        // this struct acts like an enumeration since multiple is false, with local as the fallback
        if self.utc {
            return Ok(ReferenceDate::utc_now());
        }
        if self.local {
            return Ok(ReferenceDate::local_now());
        }
        if let Some(date) = &self.date {
            return Ok(date.parse()?);
        }
        Ok(ReferenceDate::local_now())
    }
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// The OCR text to read. Use `-` to read it from stdin; lines are joined with spaces.
    text: String,

    #[command(flatten)]
    date: DateArg,

    /// Add an `expired` field telling whether the expiration date is before the reference date.
    #[arg(long)]
    check_expiry: bool,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log more about how the text was read. Repeat for more detail. `RUST_LOG` overrides this.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reads a single date and reports it as the expiration date.
    Single(ExtractArgs),

    /// Reads a production date and an expiration date.
    ///
    /// Dates are found after their labels (`PD`, `MFG`, `製造` for production; `BB`, `EXP`, `有效`
    /// for expiration). Without any label, the earlier of the first two dates found is the
    /// production date, and a lone date is the expiration date.
    Dual(ExtractArgs),
}

type Output = (String, i32);

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match do_work(cli) {
        Ok((output, exit_code)) => {
            println!("{output}");
            std::process::exit(exit_code);
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_directive = match verbose {
        0 => "warn",
        1 => "shelfdate=debug",
        _ => "shelfdate=trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_text(text: String) -> Result<String, CliError> {
    if text != "-" {
        return Ok(text);
    }
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    Ok(input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .join(" "))
}

fn do_work(cli: Cli) -> Result<Output, CliError> {
    match cli.command {
        Commands::Single(args) => run_extraction(args, extract_single_at),
        Commands::Dual(args) => run_extraction(args, extract_dual_at),
    }
}

fn run_extraction(
    args: ExtractArgs,
    extract: fn(&str, &ReferenceDate) -> ExtractionResult,
) -> Result<Output, CliError> {
    let today = args.date.to_reference_date()?;
    let text = read_text(args.text)?;
    let result = extract(&text, &today);
    render(&result, &today, args.check_expiry, args.pretty)
}

fn render(
    result: &ExtractionResult,
    today: &ReferenceDate,
    check_expiry: bool,
    pretty: bool,
) -> Result<Output, CliError> {
    let mut value = serde_json::to_value(result)?;
    if check_expiry {
        value["expired"] = json!(result.expiration().map(|date| date.is_expired_on(today)));
    }

    let output = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    let exit_code = if result.is_empty() { 1 } else { 0 };
    Ok((output, exit_code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn run(args: &[&str]) -> Output {
        let cli = Cli::try_parse_from(args).unwrap();
        do_work(cli).unwrap()
    }

    #[test]
    fn test_single() {
        let (output, code) = run(&["shelfdate", "single", "2026-05-02"]);
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            json!({
                "count": 1,
                "production": null,
                "expiration": {"year": 2026, "month": 5, "day": 2},
            }),
            value
        );
        assert_eq!(0, code);
    }

    #[test]
    fn test_dual_no_date() {
        let (output, code) = run(&["shelfdate", "dual", "hello world"]);
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json!(0), value["count"]);
        assert_eq!(Value::Null, value["production"]);
        assert_eq!(1, code);
    }

    #[test]
    fn test_month_day_uses_explicit_date() {
        let (output, _) = run(&["shelfdate", "single", "05/02", "--date", "2031-01-01"]);
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json!(2031), value["expiration"]["year"]);
    }

    #[test]
    fn test_check_expiry() {
        let args = [
            "shelfdate",
            "dual",
            ".PD: 14/08/2025 .BB: 14/08/2026",
            "--date",
            "2026-10-18",
            "--check-expiry",
        ];
        let (output, code) = run(&args);
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json!(2), value["count"]);
        assert_eq!(Value::Bool(true), value["expired"]);
        assert_eq!(0, code);
    }

    #[test]
    fn test_date_providers_are_exclusive() {
        let res = Cli::try_parse_from(["shelfdate", "single", "05/02", "--utc", "--local"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_bad_date() {
        let cli =
            Cli::try_parse_from(["shelfdate", "single", "05/02", "--date", "02/05/2026"]).unwrap();
        assert!(matches!(do_work(cli), Err(CliError::Date(DateError::Unparseable(_)))));
    }
}
