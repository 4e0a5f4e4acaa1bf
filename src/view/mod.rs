//! Terminal viewport rendering

pub mod renderer;

pub use renderer::ViewportRenderer;
