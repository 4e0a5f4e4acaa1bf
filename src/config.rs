//! Configuration structures for livecap

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub audio: AudioConfig,
    pub session: SessionConfig,
    pub transcript: TranscriptConfig,
    pub display: DisplayConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self, crate::error::ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| {
            crate::error::ConfigError::FileNotFound(path.display().to_string())
        })?;

        toml::from_str(&content)
            .map_err(|e| crate::error::ConfigError::Parse(e.to_string()))
    }
}

/// Audio capture configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Capture sample rate (Hz)
    pub sample_rate: u32,
    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u16,
    /// Chunks handed to the recognizer per second (10 = 100 ms chunks)
    pub chunks_per_second: u32,
    /// Audio device name (None = default device)
    pub device: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
            chunks_per_second: 10,
            device: None,
        }
    }
}

impl AudioConfig {
    /// Samples per outbound chunk at the configured cadence
    pub fn chunk_samples(&self) -> usize {
        (self.sample_rate / self.chunks_per_second.max(1)) as usize
    }
}

/// Streaming recognition session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// WebSocket endpoint of the recognition backend
    pub endpoint: String,
    /// API key (None = read LIVECAP_API_KEY from the environment)
    pub api_key: Option<String>,
    /// BCP-47 language tag sent to the backend
    pub language: String,
    /// Request automatic punctuation
    pub punctuation: bool,
    /// Request interim (provisional) results
    pub interim_results: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            endpoint: "wss://api.livecap.dev/v1/listen".to_string(),
            api_key: None,
            language: "en-US".to_string(),
            punctuation: true,
            interim_results: true,
        }
    }
}

/// Transcript normalization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    /// Remove small fillers ("um", "uh", "hmm") from recognized text
    pub remove_fillers: bool,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            remove_fillers: true,
        }
    }
}

/// Live viewport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Presentation mode for the live viewport
    pub mode: PresentationMode,
    /// Render interim/final updates live (false = silent until the final print)
    pub live: bool,
    /// Fixed viewport width in columns (None = detect from the terminal)
    pub width: Option<u16>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mode: PresentationMode::MultiLineWrap,
            live: true,
            width: None,
        }
    }
}

/// Live viewport presentation modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationMode {
    /// Wrap the whole transcript into as many lines as it needs
    MultiLineWrap,
    /// Keep a single line showing the most recent words
    SingleLineTail,
}

impl Default for PresentationMode {
    fn default() -> Self {
        PresentationMode::MultiLineWrap
    }
}

impl std::fmt::Display for PresentationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PresentationMode::MultiLineWrap => write!(f, "multi_line_wrap"),
            PresentationMode::SingleLineTail => write!(f, "single_line_tail"),
        }
    }
}

impl std::str::FromStr for PresentationMode {
    type Err = crate::error::ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multi_line_wrap" | "wrap" => Ok(PresentationMode::MultiLineWrap),
            "single_line_tail" | "tail" => Ok(PresentationMode::SingleLineTail),
            other => Err(crate::error::ConfigError::InvalidValue {
                field: "display.mode".to_string(),
                value: other.to_string(),
            }),
        }
    }
}
