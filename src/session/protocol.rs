//! Wire messages for the streaming recognition session

use serde::{Deserialize, Serialize};

use super::RecognitionResult;
use crate::config::{AudioConfig, SessionConfig};

/// Messages sent to the backend
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Opens the stream; must be the first message on the socket
    Start { config: StreamStart },
    /// No more audio will follow; the backend finalizes and ends the stream
    Stop,
}

/// Stream configuration carried by the start message
#[derive(Debug, Clone, Serialize)]
pub struct StreamStart {
    pub language: String,
    pub sample_rate: u32,
    pub encoding: String,
    pub punctuation: bool,
    pub interim_results: bool,
    /// Always false: the session runs continuously until stopped
    pub single_utterance: bool,
}

impl StreamStart {
    pub fn new(session: &SessionConfig, audio: &AudioConfig) -> Self {
        Self {
            language: session.language.clone(),
            sample_rate: audio.sample_rate,
            encoding: "linear16".to_string(),
            punctuation: session.punctuation,
            interim_results: session.interim_results,
            single_utterance: false,
        }
    }
}

/// Messages received from the backend
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// One recognition update; alternatives ordered best-first
    Result {
        alternatives: Vec<Alternative>,
        is_final: bool,
    },
    /// Non-fatal backend diagnostic
    Error { message: String },
    /// The backend finished the stream
    End,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Alternative {
    pub transcript: String,
    #[serde(default)]
    pub confidence: Option<f32>,
}

impl ServerMessage {
    /// Extract the top-alternative recognition result, if any.
    ///
    /// A result message with no alternatives yields `None` and is skipped
    /// by the consumer.
    pub fn into_result(self) -> Option<RecognitionResult> {
        match self {
            ServerMessage::Result {
                alternatives,
                is_final,
            } => alternatives.into_iter().next().map(|alt| RecognitionResult {
                text: alt.transcript,
                is_final,
            }),
            _ => None,
        }
    }
}
