//! Live Speech-to-Text CLI Application

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::RecvTimeoutError;
use crossterm::terminal::size as terminal_size;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

use livecap::{
    AudioCapture, ChunkPacker, Config, DisplayConfig, PresentationMode, ResultRouter,
    StreamingSession, TextNormalizer, TranscriptStore, ViewportRenderer,
};

/// Live Speech-to-Text Terminal Client
#[derive(Parser)]
#[command(name = "livecap")]
#[command(about = "Live speech-to-text captions in your terminal", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Language tag sent to the recognition backend (e.g. en-US, de-DE)
    #[arg(short, long)]
    language: Option<String>,

    /// Recognition backend WebSocket endpoint
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Audio input device name (uses default if not specified)
    #[arg(short, long)]
    device: Option<String>,

    /// Viewport mode (wrap, tail)
    #[arg(short, long)]
    mode: Option<String>,

    /// Keep filler words ("um", "uh") in the transcript
    #[arg(long)]
    keep_fillers: bool,

    /// Disable the live viewport (print only the final transcript)
    #[arg(long)]
    no_live: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging - quiet by default, use -v for more. Logs go to stderr
    // so the live viewport owns stdout.
    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let mut config = if let Some(ref config_path) = cli.config {
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        Config::default()
    };

    // Apply CLI overrides
    if let Some(language) = cli.language {
        config.session.language = language;
    }
    if let Some(endpoint) = cli.endpoint {
        config.session.endpoint = endpoint;
    }
    if let Some(device) = cli.device {
        config.audio.device = Some(device);
    }
    if let Some(mode) = cli.mode {
        config.display.mode = mode.parse::<PresentationMode>()?;
    }
    if cli.keep_fillers {
        config.transcript.remove_fillers = false;
    }
    if cli.no_live {
        config.display.live = false;
    }

    run(config)
}

/// Run a capture-and-transcribe session until the stream ends or the user
/// interrupts.
fn run(config: Config) -> Result<()> {
    // Open the recognition session first (most likely to fail), then the
    // audio device; both are fatal before any processing begins.
    let session = StreamingSession::connect(&config.session, &config.audio)
        .context("Failed to open recognition session")?;

    let mut capture =
        AudioCapture::new(config.audio.clone()).context("Failed to create audio capture")?;
    capture.init().context("Failed to initialize audio capture")?;

    // Graceful shutdown: stop intake, push the sentinel into the hand-off
    // queue, let in-flight results finish.
    let shutdown = capture.shutdown_handle();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        shutdown.signal();
    })?;

    let frames = capture.receiver();
    let (chunk_tx, chunk_rx) = crossbeam_channel::bounded(32);
    let (results, session_handle) = session.spawn(chunk_rx);

    capture.start().context("Failed to start audio capture")?;

    // Chunk-forwarding loop: capture frames -> fixed LINEAR16 chunks ->
    // session outbound lane. Terminates on the sentinel (or when capture
    // has stopped and the queue ran dry) and closes the outbound stream
    // behind it.
    let running = capture.running_flag();
    let chunk_samples = config.audio.chunk_samples();
    let forwarder = thread::spawn(move || {
        let mut packer = ChunkPacker::new(chunk_samples);
        loop {
            match frames.recv_timeout(Duration::from_millis(200)) {
                Ok(Some(samples)) => {
                    for chunk in packer.push(&samples) {
                        if chunk_tx.send(Some(chunk)).is_err() {
                            return;
                        }
                    }
                }
                Ok(None) => break,
                Err(RecvTimeoutError::Timeout) => {
                    if !running.load(Ordering::Relaxed) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        let _ = chunk_tx.send(None);
    });

    println!("Listening... press Ctrl+C to stop.");

    let normalizer = TextNormalizer::new(&config.transcript);
    let store = TranscriptStore::new(normalizer.clone());
    let renderer = ViewportRenderer::new(
        std::io::stdout(),
        config.display.mode,
        config.display.live,
    );
    let mut router = ResultRouter::new(normalizer, store, renderer, viewport_width(&config.display));

    // One result at a time, strictly in delivery order, until the result
    // channel closes with the session.
    for result in results.iter() {
        router.handle(&result)?;
    }

    capture.stop();

    let transcript = router.finish()?;

    if forwarder.join().is_err() {
        warn!("Chunk forwarding thread panicked");
    }
    if session_handle.join().is_err() {
        warn!("Recognition session thread panicked");
    }

    if transcript.is_empty() {
        println!("(no final transcript captured)");
    } else {
        println!("{}", transcript);
    }

    Ok(())
}

/// Viewport width in columns: configured override, else the terminal's,
/// else 80 when stdout is not a terminal.
fn viewport_width(display: &DisplayConfig) -> usize {
    if let Some(width) = display.width {
        return width as usize;
    }
    terminal_size().map(|(w, _)| w as usize).unwrap_or(80)
}
