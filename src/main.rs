use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use iocraft::prelude::*;

use pr_sidebar::api::CodeClient;
use pr_sidebar::app::App;
use pr_sidebar::color::ColorDepth;
use pr_sidebar::config::keybindings::MergedBindings;
use pr_sidebar::config::loader;
use pr_sidebar::engine::{CodeEngine, Engine};
use pr_sidebar::icons::ResolvedIcons;
use pr_sidebar::theme::{Background, ResolvedTheme};
use pr_sidebar::types::PullReqTarget;

#[derive(Parser)]
#[command(
    name = "pr-sidebar",
    version,
    about = "Reviewers and labels of a Harness Code pull request"
)]
struct Cli {
    /// Path to config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging to debug.log.
    #[arg(long)]
    debug: bool,

    /// Repository path on the server, e.g. `space/repo`.
    repo_path: String,

    /// Pull request number.
    number: u64,
}

fn main() -> Result<()> {
    // Install a panic hook that writes to a file, since the fullscreen TUI
    // swallows stderr.
    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        let msg = format!("{info}\n\n{backtrace}");
        let _ = std::fs::write("panic.log", &msg);
        eprintln!("{msg}");
    }));

    let cli = Cli::parse();

    // Set up tracing.
    if cli.debug {
        let file = std::fs::File::create("debug.log").context("creating debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(file)
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
    }

    // Load config.
    let config = loader::load_config(cli.config.as_deref())?;

    // Detect terminal capabilities.
    let color_depth = ColorDepth::detect();
    let background = Background::detect();
    let theme = ResolvedTheme::resolve(&config.theme, background);
    let icons = ResolvedIcons::resolve(&config.theme.icons);
    let keybindings = MergedBindings::from_config(&config.keybindings);

    let target = PullReqTarget::new(cli.repo_path.trim_matches('/'), cli.number);
    let client = CodeClient::new(&config.api).context("building API client")?;

    // The engine owns its own Tokio runtime on a dedicated OS thread.
    // Dropping `engine_handle` at the end of `main` closes the channel and
    // stops it.
    let engine_handle = CodeEngine::new(client).start();

    tracing::info!("pr-sidebar starting for {target} against {}", config.api.base_url);

    // Enter fullscreen TUI (iocraft uses smol internally).
    smol::block_on(
        element! {
            App(
                config: &config,
                engine: &engine_handle,
                target: &target,
                theme: &theme,
                icons: &icons,
                keybindings: &keybindings,
                color_depth,
            )
        }
        .fullscreen(),
    )?;

    Ok(())
}
