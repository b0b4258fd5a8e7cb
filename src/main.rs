// src/main.rs

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{error, info, warn};

use painter::config::Config;
use painter::display::{spawn_display_thread, PngSink};
use painter::painter::{FramebufferFactory, OpSender, PainterLoop, QueueCapacity};
use painter::script::{parse_script, ParsedScript};

/// Paint frames from command scripts.
#[derive(Parser, Debug)]
#[command(name = "painter", version, about)]
struct Args {
    /// Script files, one command per line. Each file is submitted from its
    /// own producer thread. Reads stdin when none are given.
    scripts: Vec<PathBuf>,

    /// JSON configuration file.
    #[arg(long, env = "PAINTER_CONFIG")]
    config: Option<PathBuf>,

    /// Write every committed frame as a PNG into this directory.
    #[arg(long)]
    dump_dir: Option<PathBuf>,

    /// Queue capacity; 0 makes every submit wait for the painter.
    #[arg(long)]
    capacity: Option<usize>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_micros()
        .init();

    info!("Starting painter...");

    // --- Configuration ---
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => {
            info!("Configuration loaded (using default).");
            Config::default()
        }
    };
    if let Some(capacity) = args.capacity {
        config.queue.capacity = capacity;
    }
    info!(
        "Frames are {}x{}, queue is {:?}",
        config.surface.width,
        config.surface.height,
        QueueCapacity::from(config.queue.capacity)
    );

    // --- Display and painter threads ---
    let sink = args.dump_dir.clone().map(PngSink::new).transpose()?;
    let (receiver, display_thread) = spawn_display_thread(sink)?;

    let factory = FramebufferFactory::new(config.surface.max_pixels);
    let painter = PainterLoop::new(&config, factory, receiver).spawn()?;

    // --- Producers ---
    let mut failures = 0usize;
    if args.scripts.is_empty() {
        let sender = painter.sender()?;
        if !submit_script("<stdin>", parse_script(io::stdin().lock()), &sender) {
            failures += 1;
        }
    } else {
        let mut producers = Vec::with_capacity(args.scripts.len());
        for path in &args.scripts {
            let sender = painter.sender()?;
            let path = path.clone();
            let producer = thread::Builder::new()
                .name(format!("producer:{}", path.display()))
                .spawn(move || run_producer(&path, &sender))
                .context("Failed to spawn producer thread")?;
            producers.push(producer);
        }
        for producer in producers {
            match producer.join() {
                Ok(true) => {}
                Ok(false) => failures += 1,
                Err(_) => {
                    error!("A producer thread panicked");
                    failures += 1;
                }
            }
        }
    }

    // --- Cleanup ---
    let report = painter.finish()?;
    info!(
        "Painter finished: {} operations, {} frames, {} failed commits",
        report.processed, report.frames_delivered, report.failed_commits
    );

    let display = display_thread
        .join()
        .map_err(|_| anyhow::anyhow!("Display thread panicked"))?;
    for path in &display.written {
        info!("Wrote {}", path.display());
    }

    if failures > 0 {
        bail!("{} script(s) did not decode cleanly", failures);
    }
    info!("painter exited successfully.");
    Ok(())
}

/// Reads and submits one script file. Returns false if anything went wrong.
fn run_producer(path: &Path, sender: &OpSender) -> bool {
    let name = path.display().to_string();
    match File::open(path) {
        Ok(file) => submit_script(&name, parse_script(BufReader::new(file)), sender),
        Err(e) => {
            error!("{}: cannot open script: {}", name, e);
            false
        }
    }
}

/// Submits whatever decoded, including the operations before a bad line.
fn submit_script(name: &str, script: ParsedScript, sender: &OpSender) -> bool {
    let clean = match &script.error {
        None => true,
        Some(e) => {
            error!("{}: {}", name, e);
            warn!(
                "{}: submitting the {} operations decoded before the error",
                name,
                script.operations.len()
            );
            false
        }
    };

    match sender.submit_all(script.operations) {
        Ok(count) => {
            info!("{}: submitted {} operations", name, count);
            clean
        }
        Err(e) => {
            error!("{}: {}", name, e);
            false
        }
    }
}
