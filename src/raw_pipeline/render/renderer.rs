use crate::raw_pipeline::common::error::Result;
use crate::raw_pipeline::raw::types::DecodedRaw;
use crate::raw_pipeline::render::types::{RenderMode, RgbImage8};

pub trait ImageRenderer: Send + Sync {
    fn render(&self, raw: &DecodedRaw, mode: RenderMode) -> Result<RgbImage8>;
}
