use crate::raw_pipeline::common::error::Result;
use crate::raw_pipeline::raw::types::DecodedRaw;

/// Decodes the bytes of a RAW container into a [`DecodedRaw`].
///
/// Implementations are shared across batch workers, hence the `Send + Sync` bound.
pub trait RawImageReader: Send + Sync {
    fn read_raw(&self, data: &[u8]) -> Result<DecodedRaw>;
}
