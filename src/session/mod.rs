//! Streaming recognition session (external collaborator)

pub mod protocol;
pub mod stream;

pub use stream::StreamingSession;

/// One incremental recognition update from the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionResult {
    /// Top-alternative transcript for this update
    pub text: String,
    /// Final results are committed; interim results replace the live tail
    pub is_final: bool,
}
