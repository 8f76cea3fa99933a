use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use errata::{ErrorPresenter, FailureEvent, Outcome, Page, PresenterConfig};
use log::{LevelFilter, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

/// Replay a failed fragment request against a page and print the result.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Page markup to show the error on.
    #[arg(long)]
    page: PathBuf,

    /// Body of the failed response.
    #[arg(long)]
    response: PathBuf,

    /// Id of the element the request was issued for.
    #[arg(long)]
    target: Option<String>,

    /// Content-Type of the failed response.
    #[arg(long, default_value = "text/html; charset=utf-8")]
    content_type: String,

    /// TOML presenter config.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Wait for auto-dismiss and print the page again.
    #[arg(long)]
    wait: bool,

    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => PresenterConfig::load(path)?,
        None => PresenterConfig::default(),
    };
    let page = Page::from_markup(&std::fs::read_to_string(&args.page)?);
    let response_body = std::fs::read_to_string(&args.response)?;

    let presenter = ErrorPresenter::with_config(page.clone(), config);
    let outcome = presenter.handle(FailureEvent {
        target: args.target,
        response_body,
        content_type: args.content_type,
    });

    match &outcome {
        Outcome::Shown {
            element_id, mode, ..
        } => info!("shown {element_id} ({mode})"),
        Outcome::Skipped(reason) => info!("nothing shown: {reason}"),
    }
    println!("{}", page.render());

    if let Outcome::Shown {
        dismiss_after: Some(delay),
        ..
    } = outcome
    {
        if args.wait {
            tokio::time::sleep(delay + Duration::from_millis(10)).await;
            println!("{}", page.render());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    TermLogger::init(
        args.log_level.into(),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .expect("Failed to initialize logger");

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
