// src/main.rs

//! Headless entry point: runs command scripts through the pipeline and writes
//! each delivered frame as a PNG.

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use log::{info, warn};
use painter::canvas::FramebufferFactory;
use painter::config::{Config, CONFIG};
use painter::lang::Parser;
use painter::output::PngFrameWriter;
use painter::pipeline::{EventLoop, Poster};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

/// Render painter command scripts to PNG frames.
#[derive(ClapParser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Script files, each parsed as its own session. Reads stdin if none are given.
    scripts: Vec<PathBuf>,

    /// Directory that receives frame-NNNN.png files
    #[arg(short, long, default_value = "frames")]
    out_dir: PathBuf,

    /// JSON config file (overrides $PAINTER_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Treat stdin as a live stream: post a session at every `update` line
    #[arg(short, long)]
    follow: bool,
}

fn main() -> Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let args = Args::parse();
    info!("Starting painter...");

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => CONFIG.clone(),
    };
    if let Some(width) = args.width {
        config.canvas.width = width;
    }
    if let Some(height) = args.height {
        config.canvas.height = height;
    }

    let writer = PngFrameWriter::new(&args.out_dir)?;
    let mut event_loop = EventLoop::start(FramebufferFactory, writer, &config)
        .context("Failed to start event loop")?;
    let poster = event_loop.poster();

    if args.scripts.is_empty() {
        let stdin = io::stdin();
        if args.follow {
            follow_stream(stdin.lock(), &poster)?;
        } else {
            let ops = Parser::new()
                .parse(stdin.lock())
                .context("Failed to parse stdin")?;
            info!("stdin: {} operations", ops.len());
            poster.post_all(ops);
        }
    } else {
        if args.follow {
            warn!("--follow only applies to stdin; reading script files as whole sessions");
        }
        for path in &args.scripts {
            let file = File::open(path)
                .with_context(|| format!("Failed to open script {}", path.display()))?;
            let ops = Parser::new()
                .parse(BufReader::new(file))
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            info!("{}: {} operations", path.display(), ops.len());
            poster.post_all(ops);
        }
    }

    let stats = event_loop.stop_and_wait()?;
    info!(
        "painter exited successfully: {} operations applied, {} frames written to {}",
        stats.operations_applied,
        stats.frames_delivered,
        args.out_dir.display()
    );
    Ok(())
}

/// Posts a session each time an `update` line arrives, and whatever is left
/// at end of input.
fn follow_stream<R: BufRead>(input: R, poster: &Poster) -> Result<()> {
    let mut parser = Parser::new();
    for line in input.lines() {
        let line = line.context("Failed to read stdin")?;
        parser.feed_line(&line).context("Failed to parse stdin")?;
        if line.split_whitespace().next() == Some("update") {
            poster.post_all(parser.finish());
        }
    }
    let rest = parser.finish();
    if !rest.is_empty() {
        poster.post_all(rest);
    }
    Ok(())
}
