//! The trusted signing primitives behind the notary: keccak-256 hashing,
//! Ethereum personal-message (EIP-191) signing over secp256k1, signer
//! recovery and EIP-55 address normalization.
//!
//! Signatures are recoverable: 65 bytes `r ‖ s ‖ v` serialized as a
//! 130-hex-character string, `v ∈ {27, 28}`. The personal-message prefix is
//! applied to the UTF-8 bytes of whatever string is signed — for the notary
//! that is the `0x`-prefixed hash hex string, not the raw digest.

use alloy_primitives::{Address, eip191_hash_message, keccak256};
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use sha2::{Digest, Sha256};

use crate::error::NotaryError;

/// Parses a `0x`-prefixed (or bare) 32-byte hex private key.
pub fn signing_key_from_hex(private_key: &str) -> Result<SigningKey, NotaryError> {
    let bytes = hex::decode(private_key.trim_start_matches("0x"))
        .map_err(|e| NotaryError::Key(e.to_string()))?;
    SigningKey::from_slice(&bytes).map_err(|e| NotaryError::Key(e.to_string()))
}

/// Derives a private key hex string from an arbitrary seed string.
/// Convenience for tests and tooling, not a key-management scheme.
pub fn private_key_from_seed(seed: &str) -> String {
    format!("0x{}", hex::encode(Sha256::digest(seed.as_bytes())))
}

/// The 20-byte address belonging to a signing key: keccak-256 of the
/// uncompressed public key, last 20 bytes.
pub fn address_of(key: &SigningKey) -> Address {
    address_of_verifying_key(key.verifying_key())
}

fn address_of_verifying_key(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    // skip the 0x04 SEC1 tag byte
    let digest = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&digest[12..])
}

/// EIP-55 checksummed string form of an address.
pub fn checksum(address: Address) -> String {
    address.to_checksum(None)
}

/// `0x`-prefixed keccak-256 digest of a message's UTF-8 bytes.
pub fn message_hash(message: &str) -> String {
    format!("0x{}", hex::encode(keccak256(message.as_bytes())))
}

/// Signs a message string under the personal-message convention and returns
/// the signature as a 130-hex-character `r ‖ s ‖ v` string.
pub fn sign_message(message: &str, key: &SigningKey) -> Result<String, NotaryError> {
    let digest = eip191_hash_message(message.as_bytes());
    let (signature, recovery_id): (Signature, RecoveryId) = key
        .sign_prehash(digest.as_slice())
        .map_err(|e| NotaryError::Signature(e.to_string()))?;
    Ok(format!(
        "0x{}{:02x}",
        hex::encode(signature.to_bytes()),
        27 + recovery_id.to_byte()
    ))
}

/// Recovers the address that produced `rsv` over a personal-message-signed
/// string. Accepts `v` as 27/28 or as a bare recovery id.
pub fn signer_of_message(message: &str, rsv: &str) -> Result<Address, NotaryError> {
    let bytes = hex::decode(rsv.trim_start_matches("0x"))
        .map_err(|e| NotaryError::Signature(e.to_string()))?;
    if bytes.len() != 65 {
        return Err(NotaryError::Signature(format!(
            "expected 65 signature bytes, got {}",
            bytes.len()
        )));
    }

    let signature = Signature::from_slice(&bytes[..64])
        .map_err(|e| NotaryError::Signature(e.to_string()))?;
    let v = bytes[64];
    let recovery_id = RecoveryId::from_byte(if v >= 27 { v - 27 } else { v })
        .ok_or_else(|| NotaryError::Signature(format!("invalid recovery id {v}")))?;

    let digest = eip191_hash_message(message.as_bytes());
    let recovered = VerifyingKey::recover_from_prehash(digest.as_slice(), &signature, recovery_id)
        .map_err(|e| NotaryError::Signature(e.to_string()))?;
    Ok(address_of_verifying_key(&recovered))
}
