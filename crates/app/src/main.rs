use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::config::parse_mapping_url;
use services::{
    AppServices, Clock, ConfigError, PracticeService, ReportService, SessionBase, TutorConfig,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{APP_NAME, App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidConfig(ConfigError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidConfig(err) => write!(f, "invalid configuration: {err}"),
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<ConfigError> for ArgsError {
    fn from(err: ConfigError) -> Self {
        ArgsError::InvalidConfig(err)
    }
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
    launch_code: Option<String>,
}

impl UiApp for DesktopApp {
    fn asset_base(&self) -> String {
        self.services.asset_base().to_string()
    }

    fn launch_code(&self) -> Option<String> {
        self.launch_code.clone()
    }

    fn practice(&self) -> Arc<PracticeService> {
        self.services.practice()
    }

    fn reports(&self) -> Arc<ReportService> {
        self.services.reports()
    }
}

struct Args {
    config: TutorConfig,
    launch_code: Option<String>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- [--base <dir|url>] [--mapping-url <url>] [--report-dir <dir>] [--code <session>]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --base sessions");
    eprintln!("  --report-dir reports");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TUTOR_SESSION_BASE, TUTOR_SESSION_MAPPING_URL, TUTOR_REPORT_DIR, RUST_LOG");
}

impl Args {
    /// Command-line flags override the environment.
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut config = TutorConfig::from_env()?;
        let mut launch_code = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--base" => {
                    let value = require_value(args, "--base")?;
                    config.session_base = SessionBase::parse(&value)?;
                }
                "--mapping-url" => {
                    let value = require_value(args, "--mapping-url")?;
                    config.mapping_url = Some(parse_mapping_url(&value)?);
                }
                "--report-dir" => {
                    let value = require_value(args, "--report-dir")?;
                    config.report_dir = PathBuf::from(value);
                }
                "--code" => {
                    let value = require_value(args, "--code")?;
                    launch_code = Some(value).filter(|code| !code.trim().is_empty());
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            config,
            launch_code,
        })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let services = AppServices::from_config(&parsed.config, Clock::system());
    info!(
        session_base = ?parsed.config.session_base,
        mapping_url = parsed.config.mapping_url.as_ref().map(|url| url.as_str()),
        report_dir = %parsed.config.report_dir.display(),
        "starting tutor"
    );

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        services,
        launch_code: parsed.launch_code,
    });
    let context = build_app_context(&app);

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title(APP_NAME)
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
