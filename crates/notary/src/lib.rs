//! Detached signing and verification for relayed structured requests.
//!
//! A request (headers, query parameters, body) is canonicalized into an
//! ordered list of field paths and a delimiter-free message, hashed with
//! keccak-256 and signed with a recoverable secp256k1 signature under the
//! Ethereum personal-message convention. When a relaying node legitimately
//! overwrites a field before forwarding, it stashes the prior
//! hash/signature/signatory together with the overwritten values, so the
//! final recipient can unwind the whole custody chain and re-validate every
//! historical version of the request.
//!
//! ```
//! use relay_notary::Notary;
//! use serde_json::json;
//!
//! let key = relay_notary::signing::private_key_from_seed("example");
//! let request = json!({"body": {"id": "1973", "city": "Essen"}});
//!
//! let mut notary = Notary::new();
//! notary.sign(&request, &key).unwrap();
//! assert!(notary.verify(&request).unwrap().is_valid);
//!
//! let header = notary.serialize().unwrap();
//! let restored = Notary::deserialize(&header).unwrap();
//! assert_eq!(restored, notary);
//! ```

mod canonical;
mod codec;
mod error;
mod notary;
mod path;
mod request;
mod rewrite;
pub mod signing;

pub use error::NotaryError;
pub use notary::{Notary, VerifyResult};
pub use request::{SignableHeaders, ValuesToSign};
pub use rewrite::{Rewrite, RewriteOutcome};
