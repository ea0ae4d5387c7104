use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::canonical;
use crate::error::NotaryError;
use crate::path;
use crate::signing;

/// Snapshot of a signature record taken just before a relaying party
/// overwrote some field values and re-signed the request.
///
/// `rewritten_fields` maps each overwritten path to the value it held at the
/// time of the previous signing — enough to reconstruct the exact prior
/// request from the next-newer one. The hash, signature and signatory are
/// the previous holder's, frozen by [`crate::Notary::stash`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rewrite {
    #[serde(rename = "rewrittenFields")]
    pub rewritten_fields: Map<String, Value>,
    pub hash: String,
    pub rsv: String,
    pub signatory: String,
}

/// Outcome of verifying a single link of the rewrite chain. A valid outcome
/// always carries the reconstructed previous request, so "valid but no
/// previous value" is not a representable state.
#[derive(Debug, Clone, PartialEq)]
pub enum RewriteOutcome {
    Valid { previous: Value },
    Invalid { error: String },
}

impl Rewrite {
    pub(crate) fn new(
        rewritten_fields: Map<String, Value>,
        hash: String,
        rsv: String,
        signatory: String,
    ) -> Self {
        Self {
            rewritten_fields,
            hash,
            rsv,
            signatory,
        }
    }

    /// Checks this link against the request as it looked *after* the
    /// overwrite: restores the stashed values onto an owned copy, then
    /// requires the restored request to hash to the stashed hash and to
    /// recover the stashed signatory.
    ///
    /// `fields` is the field list stored in the signature record — the same
    /// list covers every historical version of the request.
    pub fn verify(
        &self,
        fields: &[String],
        modified: &Value,
    ) -> Result<RewriteOutcome, NotaryError> {
        // 1. rebuild the previous request; the caller's tree stays untouched
        let mut previous = modified.clone();
        for (field, original) in &self.rewritten_fields {
            let Ok(segments) = path::parse(field) else {
                continue;
            };
            path::write(&mut previous, &segments, original.clone());
        }

        // 2. the restored request must hash to the stashed hash
        let message = canonical::rebuild_message(fields, &previous);
        if self.hash != signing::message_hash(&message) {
            return Ok(RewriteOutcome::Invalid {
                error: "Rewritten request hash does not match".to_owned(),
            });
        }

        // 3. and must have been signed by the stashed signatory
        let recovered = signing::signer_of_message(&self.hash, &self.rsv)?;
        let stored: Address = self
            .signatory
            .parse()
            .map_err(|_| NotaryError::Address(self.signatory.clone()))?;
        if recovered != stored {
            return Ok(RewriteOutcome::Invalid {
                error: "Rewritten signatory incorrect".to_owned(),
            });
        }

        Ok(RewriteOutcome::Valid { previous })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::Notary;
    use crate::signing::private_key_from_seed;

    fn signed_record(values: &Value, seed: &str) -> Notary {
        let mut notary = Notary::new();
        notary.sign(values, &private_key_from_seed(seed)).unwrap();
        notary
    }

    #[test]
    fn reconstructs_previous_request() {
        let original = json!({"body": {"id": "LOC1", "city": "Essen"}});
        let notary = signed_record(&original, "owner");

        let mut modified = original.clone();
        modified["body"]["id"] = json!("LOC2");

        let mut stashed = Map::new();
        stashed.insert("$['body']['id']".to_owned(), json!("LOC1"));
        let rewrite = Rewrite::new(
            stashed,
            notary.hash.clone(),
            notary.rsv.clone(),
            notary.signatory.clone(),
        );

        match rewrite.verify(&notary.fields, &modified).unwrap() {
            RewriteOutcome::Valid { previous } => assert_eq!(previous, original),
            RewriteOutcome::Invalid { error } => panic!("expected valid rewrite: {error}"),
        }
        // caller's tree was not mutated
        assert_eq!(modified["body"]["id"], json!("LOC2"));
    }

    #[test]
    fn wrong_stashed_value_fails_hash_check() {
        let original = json!({"body": {"id": "LOC1"}});
        let notary = signed_record(&original, "owner");

        let mut modified = original.clone();
        modified["body"]["id"] = json!("LOC2");

        // stashing the *new* value instead of the original one
        let mut stashed = Map::new();
        stashed.insert("$['body']['id']".to_owned(), json!("LOC2"));
        let rewrite = Rewrite::new(
            stashed,
            notary.hash.clone(),
            notary.rsv.clone(),
            notary.signatory.clone(),
        );

        match rewrite.verify(&notary.fields, &modified).unwrap() {
            RewriteOutcome::Invalid { error } => {
                assert_eq!(error, "Rewritten request hash does not match");
            }
            RewriteOutcome::Valid { .. } => panic!("expected invalid rewrite"),
        }
    }

    #[test]
    fn wrong_stashed_signatory_fails() {
        let original = json!({"body": {"id": "LOC1"}});
        let notary = signed_record(&original, "owner");
        let other = signed_record(&original, "someone-else");

        let mut modified = original.clone();
        modified["body"]["id"] = json!("LOC2");

        let mut stashed = Map::new();
        stashed.insert("$['body']['id']".to_owned(), json!("LOC1"));
        let rewrite = Rewrite::new(
            stashed,
            notary.hash.clone(),
            notary.rsv.clone(),
            other.signatory.clone(),
        );

        match rewrite.verify(&notary.fields, &modified).unwrap() {
            RewriteOutcome::Invalid { error } => {
                assert_eq!(error, "Rewritten signatory incorrect");
            }
            RewriteOutcome::Valid { .. } => panic!("expected invalid rewrite"),
        }
    }

    #[test]
    fn serde_uses_camel_case_member_name() {
        let mut stashed = Map::new();
        stashed.insert("$['body']['id']".to_owned(), json!("LOC1"));
        let rewrite = Rewrite::new(stashed, "0x1".into(), "0x2".into(), "0x3".into());
        let json = serde_json::to_string(&rewrite).unwrap();
        assert_eq!(
            json,
            r#"{"rewrittenFields":{"$['body']['id']":"LOC1"},"hash":"0x1","rsv":"0x2","signatory":"0x3"}"#
        );
        let back: Rewrite = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rewrite);
    }
}
