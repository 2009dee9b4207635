//! Rendering module
//!
//! Turns a decoded RAW image into a displayable 8-bit RGB raster.

mod renderer;
mod develop_renderer;
pub mod types;

pub use renderer::ImageRenderer;
pub use develop_renderer::DevelopRenderer;
pub use types::{RenderMode, RgbImage8};
