use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request/response headers covered by a relay signature.
///
/// Canonicalization follows object insertion order, so the declaration
/// order here *is* the signing contract: every party must enumerate header
/// keys in this order for hashes to agree. `None` members are omitted from
/// serialization and therefore from the signature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignableHeaders {
    #[serde(rename = "x-correlation-id", skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(rename = "ocpi-from-country-code", skip_serializing_if = "Option::is_none")]
    pub from_country_code: Option<String>,
    #[serde(rename = "ocpi-from-party-id", skip_serializing_if = "Option::is_none")]
    pub from_party_id: Option<String>,
    #[serde(rename = "ocpi-to-country-code", skip_serializing_if = "Option::is_none")]
    pub to_country_code: Option<String>,
    #[serde(rename = "ocpi-to-party-id", skip_serializing_if = "Option::is_none")]
    pub to_party_id: Option<String>,
    #[serde(rename = "x-limit", skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    #[serde(rename = "x-total-count", skip_serializing_if = "Option::is_none")]
    pub total_count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// The composite tree that gets signed: headers, url-encoded parameters and
/// a generic body, headers enumerated first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuesToSign<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<SignableHeaders>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<T>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn none_members_are_omitted() {
        let headers = SignableHeaders {
            correlation_id: Some("456".into()),
            ..SignableHeaders::default()
        };
        assert_eq!(
            serde_json::to_value(&headers).unwrap(),
            json!({"x-correlation-id": "456"})
        );
    }

    #[test]
    fn header_keys_serialize_in_declaration_order() {
        let headers = SignableHeaders {
            correlation_id: Some("456".into()),
            from_country_code: Some("DE".into()),
            from_party_id: Some("ABC".into()),
            to_country_code: Some("DE".into()),
            to_party_id: Some("XYZ".into()),
            ..SignableHeaders::default()
        };
        let keys: Vec<String> = serde_json::to_value(&headers)
            .unwrap()
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(
            keys,
            vec![
                "x-correlation-id",
                "ocpi-from-country-code",
                "ocpi-from-party-id",
                "ocpi-to-country-code",
                "ocpi-to-party-id",
            ]
        );
    }

    #[test]
    fn values_to_sign_enumerates_headers_first() {
        let values = ValuesToSign {
            headers: Some(SignableHeaders {
                correlation_id: Some("456".into()),
                ..SignableHeaders::default()
            }),
            params: None,
            body: Some(json!({"id": "1"})),
        };
        let tree = serde_json::to_value(&values).unwrap();
        let keys: Vec<String> = tree.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["headers", "body"]);
    }
}
