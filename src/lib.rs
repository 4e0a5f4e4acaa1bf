//! Live Speech-to-Text Terminal Client
//!
//! Captures microphone audio, streams it to a cloud recognition backend,
//! and renders partial/final transcripts into the terminal in real time,
//! printing a cleaned final transcript on exit.
//!
//! # Architecture
//!
//! The system is organized into the following modules:
//!
//! - `audio`: Audio capture and LINEAR16 chunk packing
//! - `session`: Streaming recognition session (WebSocket collaborator)
//! - `transcript`: Text normalization, committed storage, result routing
//! - `view`: Live terminal viewport rendering
//! - `config`: Configuration structures
//! - `error`: Error types
//!
//! # Example
//!
//! ```no_run
//! use livecap::{Config, ResultRouter, TextNormalizer, TranscriptStore, ViewportRenderer};
//! use livecap::session::RecognitionResult;
//!
//! let config = Config::default();
//! let normalizer = TextNormalizer::new(&config.transcript);
//! let store = TranscriptStore::new(normalizer.clone());
//! let renderer = ViewportRenderer::new(std::io::stdout(), config.display.mode, true);
//! let mut router = ResultRouter::new(normalizer, store, renderer, 80);
//!
//! router.handle(&RecognitionResult {
//!     text: "hello world".to_string(),
//!     is_final: true,
//! }).unwrap();
//! ```

pub mod audio;
pub mod config;
pub mod error;
pub mod session;
pub mod transcript;
pub mod view;

// Re-exports for convenience
pub use audio::{AudioCapture, ChunkPacker, ShutdownHandle};
pub use config::{AudioConfig, Config, DisplayConfig, PresentationMode, SessionConfig, TranscriptConfig};
pub use error::{AudioError, CaptionError, ConfigError, Result, SessionError};
pub use session::{RecognitionResult, StreamingSession};
pub use transcript::{ResultRouter, TextNormalizer, TranscriptStore};
pub use view::ViewportRenderer;
