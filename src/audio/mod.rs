//! Audio capture and chunk packing

pub mod capture;
pub mod chunk;

pub use capture::{AudioCapture, AudioSample, CaptureFrame, ShutdownHandle};
pub use chunk::{encode_linear16, ChunkPacker};
