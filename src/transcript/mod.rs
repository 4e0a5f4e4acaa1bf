//! Transcript reconciliation: normalization, committed storage, routing

pub mod normalize;
pub mod router;
pub mod store;

pub use normalize::TextNormalizer;
pub use router::ResultRouter;
pub use store::TranscriptStore;
