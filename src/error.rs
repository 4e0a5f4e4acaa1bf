//! Custom error types for livecap

use thiserror::Error;

/// Main error type for livecap
#[derive(Error, Debug)]
pub enum CaptionError {
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("Recognition session error: {0}")]
    Session(#[from] SessionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Channel error: {0}")]
    Channel(String),
}

/// Audio-related errors
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("No audio input device available")]
    NoInputDevice,

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Failed to get device configuration: {0}")]
    DeviceConfig(String),

    #[error("Device does not support {rate} Hz mono capture")]
    UnsupportedRate { rate: u32 },

    #[error("Failed to build audio stream: {0}")]
    StreamBuild(String),

    #[error("Stream playback error: {0}")]
    StreamPlay(String),
}

/// Streaming recognition session errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid endpoint URL: {0}")]
    Endpoint(String),

    #[error("Failed to connect to recognition backend: {0}")]
    Connect(String),

    #[error("Failed to send audio to recognition backend: {0}")]
    Send(String),

    #[error("Recognition stream error: {0}")]
    Stream(String),

    #[error("Backend reported error: {0}")]
    Backend(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration value: {field} = {value}")]
    InvalidValue { field: String, value: String },
}

pub type Result<T> = std::result::Result<T, CaptionError>;
