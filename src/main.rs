//! `admission-calendar`: prints the calendar payload of an admission results workbook.

use admission_calendar::click_detail;
use admission_calendar::Config;
use admission_calendar::Session;
use admission_calendar::Upload;
use anyhow::Context;
use anyhow::Result;
use clap::ArgAction;
use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "admission-calendar")]
#[command(about = "Build month calendars of admission screenings and result announcements")]
#[command(version)]
struct Cli {
    /// Workbook to read (.xlsx, .xlsm or .xls)
    #[arg(required_unless_present = "click")]
    file: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Year of the events to show (inferred from the workbook when omitted)
    #[arg(long)]
    year: Option<i32>,

    /// 1-based row holding the column headers
    #[arg(long)]
    header_row: Option<usize>,

    /// Decode a widget click state and print its detail line
    #[arg(long, value_name = "JSON")]
    click: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(state) = &cli.click {
        if let Some(detail) = click_detail(state) {
            println!("{detail}");
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(year) = cli.year {
        config.target_year = Some(year);
    }
    if let Some(header_row) = cli.header_row {
        config.header_row = header_row;
    }
    config.validate()?;

    let path = cli.file.context("No workbook given")?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let file = File::open(&path).with_context(|| format!("Failed to open '{}'", path.display()))?;
    let upload = Upload::read_from(file, name)?;
    log::info!("read {} bytes from '{}'", upload.bytes().len(), upload.name());

    let mut session = Session::new(config);
    let page = session.open(&upload)?;
    let mut stdout = std::io::stdout().lock();
    if cli.pretty {
        serde_json::to_writer_pretty(&mut stdout, &page)?;
    } else {
        serde_json::to_writer(&mut stdout, &page)?;
    }
    writeln!(stdout)?;
    Ok(())
}
