//! Wire codec for the transport header: compact JSON, brotli-compressed,
//! base64-encoded into a single opaque header value.

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use brotli::enc::BrotliEncoderParams;

use crate::error::NotaryError;

/// Brotli quality tier, fixed for speed/ratio balance. Both sides of the
/// wire must use the same tier for serialized headers to round-trip
/// byte-identically.
const QUALITY: i32 = 4;

pub(crate) fn encode(json: &[u8]) -> Result<String, NotaryError> {
    let params = BrotliEncoderParams {
        quality: QUALITY,
        ..BrotliEncoderParams::default()
    };
    let mut compressed = Vec::new();
    brotli::BrotliCompress(&mut Cursor::new(json), &mut compressed, &params)
        .map_err(|e| NotaryError::Codec(format!("brotli compression failed: {e}")))?;
    Ok(STANDARD.encode(compressed))
}

pub(crate) fn decode(header: &str) -> Result<Vec<u8>, NotaryError> {
    let compressed = STANDARD
        .decode(header)
        .map_err(|e| NotaryError::Codec(format!("base64 decoding failed: {e}")))?;
    let mut json = Vec::new();
    brotli::BrotliDecompress(&mut Cursor::new(compressed), &mut json)
        .map_err(|e| NotaryError::Codec(format!("brotli decompression failed: {e}")))?;
    Ok(json)
}
