use base64::Engine;
use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use crate::signing::{RequestSigner, SigningContext, signing_applies};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn test_signature_is_deterministic(
        key_id in "[0-9]{0,12}",
        secret in "[a-zA-Z0-9~_]{0,40}",
        version in "v1[2-9]",
        secs in 0_i64..4_102_444_800,
        payload in any::<Vec<u8>>(),
    ) {
        let timestamp = Utc.timestamp_opt(secs, 0).unwrap();
        let ctx = SigningContext { api_version: &version, timestamp, payload: &payload };

        let first = RequestSigner::new(&key_id, &secret).sign(&ctx);
        let second = RequestSigner::new(&key_id, &secret).sign(&ctx);

        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_content_header_matches_payload_digest(
        secs in 0_i64..4_102_444_800,
        payload in any::<Vec<u8>>(),
    ) {
        let timestamp = Utc.timestamp_opt(secs, 0).unwrap();
        let headers = RequestSigner::new("1", "k")
            .sign(&SigningContext { api_version: "v12", timestamp, payload: &payload });

        prop_assert_eq!(headers.content_digest.len(), 40);
        prop_assert_eq!(&headers.content_digest, &RequestSigner::content_digest(&payload));
        prop_assert_eq!(headers.content_length, payload.len());
    }

    #[test]
    fn test_authorization_carries_twenty_byte_mac(
        key_id in "[0-9]{1,12}",
        secret in "[a-zA-Z0-9]{1,40}",
        payload in any::<Vec<u8>>(),
    ) {
        let headers = RequestSigner::new(&key_id, &secret).sign_now("v12", &payload);

        let prefix = format!("GGE4_API {key_id}:");
        prop_assert!(headers.authorization.starts_with(&prefix));

        let mac = base64::engine::general_purpose::STANDARD
            .decode(&headers.authorization[prefix.len()..])
            .unwrap();
        prop_assert_eq!(mac.len(), 20);
    }

    #[test]
    fn test_versions_below_v12_never_sign(version in "v1([01][0-9]{0,2})?") {
        prop_assert!(!signing_applies(&version));
    }

    #[test]
    fn test_versions_from_v12_always_sign(version in "v1[2-9][0-9]{0,2}|v[2-9][0-9]{0,2}") {
        prop_assert!(signing_applies(&version));
    }
}
