//! Haven studio: runs a host page and its preview frame in one process.
//!
//! The shopper's clicks are given on the command line; the studio waits for
//! each to land in the preview and logs the resulting shareable link and
//! scene state.

use anyhow::{Context, bail};
use clap::Parser;
use haven::Session;
use haven::domain::config::LogConfig;
use haven::host::{CopyIcon, History, HostInput, MemoryClipboard};
use haven::kernel::config::load_studio_config;
use haven::kernel::location::Location;
use haven::kernel::registry::ModelRegistry;
use haven::preview::{FrameRecorder, ManifestSource, PreviewHandle, PreviewPhase, PreviewStatus};
use haven_logger::Logger;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "haven-studio")]
#[command(about = "Run the configurator host page and preview frame in one process", long_about = None)]
struct Cli {
    /// Host page URL, absolute or a path under the configured origin
    #[arg(long, default_value = "/models/solo-haven")]
    url: String,

    /// Option to click once the preview is ready, as `category=value` (repeatable)
    #[arg(long = "select", value_parser = parse_selection)]
    select: Vec<(String, String)>,

    /// Directory holding `<model>.json` scene manifests
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Configuration file (defaults to `haven.*` in the working directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Turn designer mode on after the selections
    #[arg(long)]
    designer: bool,

    /// Seconds to wait for each step before giving up
    #[arg(long, default_value = "10")]
    timeout: u64,
}

fn parse_selection(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((category, value)) if !category.trim().is_empty() => {
            Ok((category.trim().to_owned(), value.trim().to_owned()))
        },
        _ => Err(format!("expected category=value, got '{input}'")),
    }
}

fn init_logger(log: &LogConfig) -> anyhow::Result<Logger> {
    let mut builder =
        Logger::builder().name(env!("CARGO_PKG_NAME")).console(true).level_str(&log.level)?;
    if let Some(filter) = &log.filter {
        builder = builder.env_filter(filter.clone());
    }
    let logger = match &log.directory {
        Some(directory) => builder.path(directory).json(log.json).init()?,
        None => builder.init()?,
    };
    Ok(logger)
}

async fn wait_preview(
    preview: &mut PreviewHandle,
    timeout: Duration,
    predicate: impl FnMut(&PreviewStatus) -> bool,
) -> Option<PreviewStatus> {
    tokio::time::timeout(timeout, preview.wait_for(predicate)).await.ok().flatten()
}

#[haven_runtime::main(single_context)]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_studio_config(cli.config.as_deref())?;
    if let Some(assets) = cli.assets {
        config.preview.asset_root = assets;
    }
    let _logger = init_logger(&config.log)?;

    let location = Location::parse_with_origin(&cli.url, &config.host.origin)?;
    let clipboard = MemoryClipboard::new();
    let recorder = FrameRecorder::new();
    let session = Session::start(
        config.preview.clone(),
        Arc::new(ModelRegistry::builtin()),
        History::new(location),
        ManifestSource::new(config.preview.asset_root.clone()),
        recorder.clone(),
        clipboard.clone(),
    )?;

    let timeout = Duration::from_secs(cli.timeout.max(1));
    let mut preview = session.preview().clone();
    let settled = wait_preview(&mut preview, timeout, |s| {
        s.phase == PreviewPhase::Ready
            || (s.generation > 0 && s.phase == PreviewPhase::Uninitialized)
    })
    .await;
    match settled {
        Some(status) if status.phase == PreviewPhase::Ready => {},
        _ => {
            session.close().await?;
            bail!("Preview did not become ready; check the asset directory and model name");
        },
    }

    for (category, value) in cli.select {
        session.host().select(category.as_str(), value.as_str()).await;
        let landed = wait_preview(&mut preview, timeout, |s| {
            s.selection.get(&category).is_some_and(|current| current.as_str() == value)
        })
        .await;
        if landed.is_none() {
            warn!(%category, %value, "Option did not take effect in the preview");
        }
    }

    if cli.designer {
        session.host().send(HostInput::ToggleDesigner).await;
        if wait_preview(&mut preview, timeout, |s| s.designer).await.is_none() {
            warn!("Preview did not enter designer mode");
        }
    }

    session.host().send(HostInput::CopyLink).await;
    let mut host = session.host().clone();
    let checkmark = host.wait_for(|s| s.view.copy_icon == CopyIcon::Checkmark);
    let copied = tokio::time::timeout(timeout, checkmark)
        .await
        .ok()
        .flatten()
        .is_some();

    let closed = session.close().await.context("Session did not shut down cleanly")?;
    let stats = recorder.stats();
    let link = clipboard
        .contents()
        .filter(|_| copied)
        .unwrap_or_else(|| closed.host.location().shareable_link());
    info!(%link, "Shareable link");
    if let Some(selection) = closed.preview.selection() {
        for (category, value) in selection {
            info!(%category, %value, "Applied option");
        }
    }
    info!(
        frames = stats.frames,
        forced = stats.forced,
        meshes = stats.meshes,
        hotspots = stats.visible_hotspots,
        "Preview summary"
    );
    Ok(())
}
