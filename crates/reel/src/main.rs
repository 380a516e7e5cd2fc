use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use reel_cdp::CdpBackend;
use reel_engine::backend::Backend;
use reel_engine::bridge::BrowserBridge;
use reel_engine::cli;
use reel_engine::codegen;
use reel_engine::config::ConfigLoader;
use reel_engine::config::schema::SecurityConfig;
use reel_engine::error::RecorderError;
use reel_engine::formatter::format_action;
use reel_engine::input::{self, Hotkeys};
use reel_engine::recorder::{Recorder, RecordingOutcome};
use reel_engine::storage::SessionStore;
use reel_webdriver::WebDriverBackend;
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "reel",
    version,
    about = "Record browser interactions and generate Selenium replay scripts"
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Record a session in a live browser
    Record {
        /// Page to start from (prompted for when omitted)
        #[arg(long)]
        url: Option<String>,
        /// Config file (defaults to ./reel.yaml, then ~/.reel/config.yaml)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Directory for screenshots, session records and scripts
        #[arg(long)]
        output: Option<PathBuf>,
        #[command(subcommand)]
        backend: BackendKind,
    },
    /// Regenerate the replay script of a stored session record
    Generate {
        /// session_<id>.json written by a recording
        #[arg(long)]
        session: PathBuf,
        /// Script path (defaults to generated_automation_<id>.py next to the record)
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum BackendKind {
    /// Launch a local Chromium over CDP
    Chromium {
        #[arg(long)]
        headless: bool,
    },
    /// Drive a browser through a running WebDriver server
    Webdriver {
        #[arg(long)]
        driver_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries operator prompts.
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Record {
            url,
            config,
            output,
            backend,
        } => record(url, config, output, backend).await,
        Command::Generate {
            session,
            output,
            config,
        } => generate(session, output, config).await,
    }
}

async fn record(
    url: Option<String>,
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
    backend: BackendKind,
) -> Result<()> {
    let mut config = ConfigLoader::load(config_path.as_deref())
        .await
        .context("Failed to load configuration")?;
    if let Some(dir) = output {
        config.recording.output_dir = dir;
    }
    let hotkeys = Hotkeys::from_config(&config.recording.hotkeys)?;

    let raw_url = match url {
        Some(url) => url,
        None => cli::prompt_line("URL to record: ")
            .await?
            .ok_or_else(|| anyhow!("No URL given"))?,
    };
    let url = cli::normalize_url(&raw_url)?;

    println!();
    for line in cli::controls_banner(&config.recording.hotkeys) {
        println!("{}", line);
    }
    println!();
    if cli::prompt_line("Press ENTER to start recording...")
        .await?
        .is_none()
    {
        println!("Aborted");
        return Ok(());
    }

    let backend: Box<dyn Backend> = match backend {
        BackendKind::Chromium { headless } => Box::new(CdpBackend::with_headless(headless)),
        BackendKind::Webdriver { driver_url } => Box::new(WebDriverBackend::with_url(driver_url)),
    };
    let bridge = BrowserBridge::new(backend, &config.bridge);
    let security = config.security.clone();
    let mut recorder = Recorder::new(config, bridge);

    if let Err(e) = recorder.start(&url).await {
        if let RecorderError::Backend(backend_error) = &e {
            eprintln!("Hint: {}", backend_error.recovery_hint());
        }
        return Err(e).context("Failed to start recording");
    }

    let signals = match input::spawn_listener(hotkeys) {
        Ok(signals) => signals,
        Err(e) => {
            if let Err(finish_err) = recorder.finish().await {
                warn!("Failed to save session: {}", finish_err);
            }
            return Err(e).context("Failed to start input capture");
        }
    };

    println!("Recording {}", url);
    let outcome = recorder.run(signals).await?;
    print_summary(&outcome, &security);
    Ok(())
}

async fn generate(
    session: PathBuf,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = ConfigLoader::load(config_path.as_deref())
        .await
        .context("Failed to load configuration")?;
    let record = SessionStore::load_record(&session)
        .await
        .with_context(|| format!("Failed to read session record {}", session.display()))?;

    let script = codegen::generate(&record, &config.replay)?;

    let path = match output {
        Some(path) => {
            tokio::fs::write(&path, script).await?;
            path
        }
        None => {
            let dir = session
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            SessionStore::new(dir)
                .save_script(&record.session_id, &script)
                .await?
        }
    };
    println!("Script written to {}", path.display());
    Ok(())
}

fn print_summary(outcome: &RecordingOutcome, security: &SecurityConfig) {
    let record = &outcome.record;
    println!();
    println!("Session {} complete", record.session_id);
    println!("  actions: {}", record.total_actions);
    println!("  popups:  {}", record.detected_popups.len());
    for action in &record.actions {
        println!("  {}", format_action(action, security));
    }
    println!("  record:  {}", outcome.record_path.display());
    match &outcome.script_path {
        Some(path) => println!("  script:  {}", path.display()),
        None => println!("  script:  not generated (no navigation recorded)"),
    }
}
