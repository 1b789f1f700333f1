// src/main.rs

use pixel_editor::{
    bitmap,
    config::{Config, CONFIG},
    framebuffer::Framebuffer,
    platform::{FsPlatform, Platform},
    replay::{self, ReplayScript},
    session::EditorSession,
};

use anyhow::Context;
use clap::Parser;
use log::info;
use std::path::PathBuf;

/// Headless pixel editor: replays scripted input frames and writes exports.
#[derive(Parser, Debug)]
#[command(name = "pixel-editor", about = "Headless pixel grid editor")]
struct Args {
    /// JSON replay script of input frames. Without one a single idle frame runs.
    #[arg(short, long, value_name = "SCRIPT.json")]
    script: Option<PathBuf>,

    /// JSON config file. Missing fields keep their defaults.
    #[arg(short, long, value_name = "CONFIG.json")]
    config: Option<PathBuf>,

    /// Directory exports and screenshots are written to.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Framebuffer width in pixels.
    #[arg(long, default_value_t = 860)]
    width: usize,

    /// Framebuffer height in pixels.
    #[arg(long, default_value_t = 860)]
    height: usize,

    /// Also write the final rendered frame as a BMP with this name.
    #[arg(long, value_name = "FILE.bmp")]
    screenshot: Option<String>,
}

fn main() -> anyhow::Result<()> {
    // Initialize the logger. Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let args = Args::parse();
    info!("Starting pixel-editor...");

    let config = match &args.config {
        Some(path) => Config::load(path).with_context(|| format!("Failed to load config {}", path.display()))?,
        None => {
            info!("Configuration loaded (using default).");
            CONFIG.clone()
        }
    };

    let script = match &args.script {
        Some(path) => ReplayScript::load(path).with_context(|| format!("Failed to load script {}", path.display()))?,
        None => replay::idle_script(),
    };

    let platform = FsPlatform::new(&args.out_dir);
    let mut session = EditorSession::with_config(platform, config);
    let mut fb = Framebuffer::new(args.width, args.height);
    info!("Framebuffer {}x{}", fb.width(), fb.height());

    let summary = script
        .run(&mut session, &mut fb)
        .context("Editor frame failed")?;
    info!(
        "Replayed {} frames: {} exports written, {} failed, {} color dialogs",
        summary.frames, summary.exports_written, summary.exports_failed, summary.dialogs_opened
    );

    if let Some(name) = &args.screenshot {
        let bytes = bitmap::encode_framebuffer(&fb);
        session
            .platform_mut()
            .write_file(name, &bytes)
            .with_context(|| format!("Failed to write screenshot {}", name))?;
    }

    if summary.exports_failed > 0 {
        anyhow::bail!("{} export(s) failed", summary.exports_failed);
    }
    info!("pixel-editor exited successfully.");
    Ok(())
}
