/// Errors raised while building, signing, encoding or decoding signature
/// records.
///
/// Verification *decisions* are not errors: tampering and signer mismatches
/// are reported through [`crate::VerifyResult`]. This enum covers malformed
/// inputs only.
#[derive(Debug, thiserror::Error)]
pub enum NotaryError {
    #[error("JSON (de)serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("header transport codec failed: {0}")]
    Codec(String),
    #[error("invalid private key: {0}")]
    Key(String),
    #[error("malformed signature: {0}")]
    Signature(String),
    #[error("malformed signatory address: {0}")]
    Address(String),
    #[error("invalid field path: {0}")]
    Path(String),
}
