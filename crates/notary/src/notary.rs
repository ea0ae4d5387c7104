use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::canonical;
use crate::codec;
use crate::error::NotaryError;
use crate::rewrite::{Rewrite, RewriteOutcome};
use crate::signing;

/// A detached signature over a canonicalized request, carried next to the
/// request as a single opaque header value.
///
/// The record is an append-only custody log. [`sign`](Notary::sign) replaces
/// the current fields/hash/signature/signatory atomically and never touches
/// `rewrites`; [`stash`](Notary::stash) appends the pre-mutation state to
/// `rewrites` and touches nothing else. A relay that must overwrite a field
/// stashes first, mutates the request, then re-signs with its own key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Notary {
    /// Ordered field paths covered by the signature. The order determines
    /// the message that was hashed; verification replays this stored list,
    /// never a fresh walk of the presented values.
    pub fields: Vec<String>,
    /// `0x`-prefixed keccak-256 digest of the canonical message.
    pub hash: String,
    /// 65-byte recoverable ECDSA signature as 130 hex characters (r ‖ s ‖ v).
    pub rsv: String,
    /// EIP-55 checksummed address of the most recent signer.
    pub signatory: String,
    /// Oldest-first log of overwritten-field snapshots.
    #[serde(default)]
    pub rewrites: Vec<Rewrite>,
}

/// Outcome of a verification pass. Tampering and signer mismatches are
/// decisions, not errors; `error` names the failed check.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifyResult {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl VerifyResult {
    fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    fn invalid(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(error.into()),
        }
    }
}

impl Notary {
    /// An empty record: no fields, no signature, no rewrites.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a transport header value (base64 over brotli over JSON) back
    /// into a record. Exact inverse of [`serialize`](Notary::serialize).
    pub fn deserialize(header: &str) -> Result<Self, NotaryError> {
        let json = codec::decode(header)?;
        Ok(serde_json::from_slice(&json)?)
    }

    /// Encodes the record into a single transport header value.
    pub fn serialize(&self) -> Result<String, NotaryError> {
        let json = serde_json::to_vec(self)?;
        codec::encode(&json)
    }

    /// Canonicalizes `values` and signs the result, replacing the record's
    /// fields, hash, signature and signatory. Existing rewrites are kept.
    ///
    /// `values` is structurally normalized through its `Serialize` impl
    /// before traversal, so custom composite types flatten the same way the
    /// equivalent plain JSON tree would.
    pub fn sign<T: Serialize>(&mut self, values: &T, private_key: &str) -> Result<(), NotaryError> {
        let key = signing::signing_key_from_hex(private_key)?;
        let tree = serde_json::to_value(values)?;

        let mut fields = Vec::new();
        let mut message = String::new();
        canonical::walk("$", &tree, &mut fields, &mut message);

        self.fields = fields;
        self.hash = signing::message_hash(&message);
        self.rsv = signing::sign_message(&self.hash, &key)?;
        self.signatory = signing::checksum(signing::address_of(&key));
        Ok(())
    }

    /// Verifies the record against the presented values: the stored field
    /// list must reproduce the stored hash, the signature must recover the
    /// stored signatory, and every stashed rewrite must re-validate,
    /// newest first, each step unwinding one overwrite.
    ///
    /// Any broken link invalidates the whole chain; there is no partial
    /// validity. `Err` is reserved for malformed records.
    pub fn verify<T: Serialize>(&self, values: &T) -> Result<VerifyResult, NotaryError> {
        let tree = serde_json::to_value(values)?;

        // 1. replay the stored field list over the presented values
        let message = canonical::rebuild_message(&self.fields, &tree);
        if self.hash != signing::message_hash(&message) {
            return Ok(VerifyResult::invalid("Request has been modified"));
        }

        // 2. the signature must recover the stored signatory
        let recovered = signing::signer_of_message(&self.hash, &self.rsv)?;
        let stored: Address = self
            .signatory
            .parse()
            .map_err(|_| NotaryError::Address(self.signatory.clone()))?;
        if recovered != stored {
            return Ok(VerifyResult::invalid("Signatories do not match"));
        }

        // 3. unwind rewrites newest-first, re-validating each prior state
        let mut current = tree;
        for (index, rewrite) in self.rewrites.iter().rev().enumerate() {
            match rewrite.verify(&self.fields, &current)? {
                RewriteOutcome::Valid { previous } => current = previous,
                RewriteOutcome::Invalid { error } => {
                    return Ok(VerifyResult::invalid(format!("Rewrite {index}: {error}")));
                }
            }
        }

        Ok(VerifyResult::valid())
    }

    /// Appends a rewrite snapshotting the record's current hash, signature
    /// and signatory together with the paths about to be overwritten and
    /// their original values.
    ///
    /// Must be called strictly *before* the next [`sign`](Notary::sign);
    /// stashing after re-signing produces a self-referential chain link that
    /// can never verify.
    pub fn stash(&mut self, rewritten_fields: Map<String, Value>) {
        self.rewrites.push(Rewrite::new(
            rewritten_fields,
            self.hash.clone(),
            self.rsv.clone(),
            self.signatory.clone(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_record_is_empty() {
        let notary = Notary::new();
        assert!(notary.fields.is_empty());
        assert_eq!(notary.hash, "");
        assert_eq!(notary.rsv, "");
        assert_eq!(notary.signatory, "");
        assert!(notary.rewrites.is_empty());
    }

    #[test]
    fn stash_snapshots_current_state() {
        let mut notary = Notary::new();
        notary.hash = "0x123".into();
        notary.rsv = "0x456".into();
        notary.signatory = "0x00001".into();

        let mut rewritten = Map::new();
        rewritten.insert("$['body']['id']".to_owned(), json!("2"));
        notary.stash(rewritten.clone());

        assert_eq!(notary.rewrites.len(), 1);
        assert_eq!(notary.rewrites[0].rewritten_fields, rewritten);
        assert_eq!(notary.rewrites[0].hash, "0x123");
        assert_eq!(notary.rewrites[0].rsv, "0x456");
        assert_eq!(notary.rewrites[0].signatory, "0x00001");
        // stash leaves the current signature state alone
        assert_eq!(notary.hash, "0x123");
    }

    #[test]
    fn wire_json_shape_is_stable() {
        let notary = Notary::new();
        assert_eq!(
            serde_json::to_string(&notary).unwrap(),
            r#"{"fields":[],"hash":"","rsv":"","signatory":"","rewrites":[]}"#
        );
    }

    #[test]
    fn missing_rewrites_member_defaults_to_empty() {
        let notary: Notary = serde_json::from_str(
            r#"{"fields":["$['body']['id']"],"hash":"0x1","rsv":"0x2","signatory":"0x3"}"#,
        )
        .unwrap();
        assert!(notary.rewrites.is_empty());
    }

    #[test]
    fn sign_rejects_malformed_private_key() {
        let mut notary = Notary::new();
        let result = notary.sign(&json!({"body": {"id": "1"}}), "0xzz");
        assert!(matches!(result, Err(NotaryError::Key(_))));
    }

    #[test]
    fn verify_rejects_malformed_stored_signature() {
        let notary = Notary {
            fields: vec![],
            hash: signing::message_hash(""),
            rsv: "0x1234".into(),
            signatory: "0x0000000000000000000000000000000000000000".into(),
            rewrites: vec![],
        };
        assert!(matches!(
            notary.verify(&json!({})),
            Err(NotaryError::Signature(_))
        ));
    }
}
