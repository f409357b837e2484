//! Compact HS256 token codec.
//!
//! Wire format: `base64url(header) "." base64url(payload) "." base64url(hmac)`,
//! all segments without padding. The header is the fixed object
//! `{"alg":"HS256","typ":"JWT"}`; the signature is HMAC-SHA256 over the ASCII
//! bytes of the first two segments joined by `.`.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde_json::{Map, Value};
use sha2::Sha256;

use crate::claims::EXP;
use crate::{ClaimSet, Secret, TokenError, Ttl};

type HmacSha256 = Hmac<Sha256>;

/// The only supported signing algorithm.
pub const ALGORITHM: &str = "HS256";

/// Exact header bytes emitted by [`TokenCodec::encode`].
pub const HEADER_JSON: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// How [`TokenCodec::decode`] treats a payload without an `exp` claim.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ExpiryPolicy {
    /// Reject tokens without `exp` as malformed.
    #[default]
    Required,
    /// Accept tokens without `exp`; they never expire.
    Optional,
}

/// Stateless token encoder/verifier bound to one secret.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    secret: Secret,
    expiry: ExpiryPolicy,
}

impl TokenCodec {
    pub fn new(secret: Secret) -> Self {
        Self {
            secret,
            expiry: ExpiryPolicy::default(),
        }
    }

    pub fn with_expiry_policy(mut self, expiry: ExpiryPolicy) -> Self {
        self.expiry = expiry;
        self
    }

    pub fn expiry_policy(&self) -> ExpiryPolicy {
        self.expiry
    }

    /// Mint a token for `claims`, expiring `ttl` (e.g. `"1h"`) from now.
    ///
    /// Any `exp` already present in `claims` is overwritten.
    pub fn encode(&self, claims: &ClaimSet, ttl: &str) -> Result<String, TokenError> {
        let ttl: Ttl = ttl.parse()?;
        self.encode_for(claims, ttl)
    }

    pub fn encode_for(&self, claims: &ClaimSet, ttl: Ttl) -> Result<String, TokenError> {
        self.encode_at(claims, ttl, Utc::now().timestamp())
    }

    /// Like [`encode_for`](Self::encode_for) with an explicit clock reading
    /// (seconds since the epoch).
    pub fn encode_at(&self, claims: &ClaimSet, ttl: Ttl, now: i64) -> Result<String, TokenError> {
        let exp = now
            .checked_add(ttl.as_secs())
            .ok_or_else(|| TokenError::invalid_duration(format!("{ttl} overflows the expiry timestamp")))?;

        let mut payload = claims.as_map().clone();
        payload.insert(EXP.to_string(), Value::from(exp));

        let payload_json = serde_json::to_vec(&payload)
            .map_err(|e| TokenError::malformed(format!("claims are not serializable: {e}")))?;

        let header = URL_SAFE_NO_PAD.encode(HEADER_JSON);
        let payload = URL_SAFE_NO_PAD.encode(payload_json);
        let signature = URL_SAFE_NO_PAD.encode(self.mac(&header, &payload).finalize().into_bytes());

        Ok(format!("{header}.{payload}.{signature}"))
    }

    /// Verify `token` and return its claims (including `exp`).
    pub fn decode(&self, token: &str) -> Result<ClaimSet, TokenError> {
        self.decode_at(token, Utc::now().timestamp())
    }

    /// Like [`decode`](Self::decode) with an explicit clock reading.
    pub fn decode_at(&self, token: &str, now: i64) -> Result<ClaimSet, TokenError> {
        let result = self.verify(token, now);
        if let Err(err) = &result {
            tracing::debug!(kind = err.kind(), error = %err, "token rejected");
        }
        result
    }

    fn verify(&self, token: &str, now: i64) -> Result<ClaimSet, TokenError> {
        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenError::malformed("expected three dot-separated segments"));
        };

        if header.is_empty() || payload.is_empty() || signature.is_empty() {
            return Err(TokenError::malformed("empty segment"));
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::InvalidSignature)?;

        // verify_slice compares in constant time.
        self.mac(header, payload)
            .verify_slice(&signature)
            .map_err(|_| TokenError::InvalidSignature)?;

        let header = decode_object(header, "header")?;
        if header.get("alg").and_then(Value::as_str) != Some(ALGORITHM) {
            return Err(TokenError::malformed("unsupported algorithm"));
        }

        let claims = ClaimSet::from(decode_object(payload, "payload")?);

        match claims.get(EXP) {
            Some(exp) => {
                let exp = exp
                    .as_i64()
                    .ok_or_else(|| TokenError::malformed("exp is not an integer"))?;
                if exp < now {
                    return Err(TokenError::TokenExpired);
                }
            }
            None if self.expiry == ExpiryPolicy::Required => {
                return Err(TokenError::malformed("missing exp claim"));
            }
            None => {}
        }

        Ok(claims)
    }

    fn mac(&self, header: &str, payload: &str) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC-SHA256 accepts keys of any length");
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        mac
    }
}

fn decode_object(segment: &str, what: &str) -> Result<Map<String, Value>, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| TokenError::malformed(format!("{what} is not base64url: {e}")))?;

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(TokenError::malformed(format!("{what} is not a JSON object"))),
        Err(e) => Err(TokenError::malformed(format!("{what} is not valid JSON: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::{ID, ROLE};
    use serde_json::json;

    const SECRET: &str = "test-secret";
    const NOW: i64 = 1_700_000_000;

    fn codec() -> TokenCodec {
        TokenCodec::new(Secret::from(SECRET))
    }

    fn admin_claims() -> ClaimSet {
        ClaimSet::new().with(ID, "u1").with(ROLE, "admin")
    }

    /// Sign an arbitrary header/payload pair the way the codec does.
    fn forge(header: &str, payload: &Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(header);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(payload).unwrap());
        let sig = URL_SAFE_NO_PAD.encode(codec().mac(&header, &payload).finalize().into_bytes());
        format!("{header}.{payload}.{sig}")
    }

    #[test]
    fn concrete_admin_scenario() {
        let token = codec().encode(&admin_claims(), "1h").unwrap();
        assert_eq!(token.split('.').count(), 3);

        let now = Utc::now().timestamp();
        let decoded = codec().decode(&token).unwrap();
        assert_eq!(decoded.id(), Some("u1"));
        assert_eq!(decoded.role(), Some(crate::Role::ADMIN));

        let exp = decoded.exp().unwrap();
        assert!((exp - (now + 3_600)).abs() <= 2, "exp {exp} not ~now+1h");
    }

    #[test]
    fn round_trip_preserves_claims_and_sets_exp() {
        let claims = admin_claims().with("squad", "bravo").with("rank", 3);
        let token = codec().encode_at(&claims, Ttl::minutes(15).unwrap(), NOW).unwrap();

        let decoded = codec().decode_at(&token, NOW).unwrap();
        let mut expected = claims.clone();
        expected.insert(EXP, NOW + 15 * 60);
        assert_eq!(decoded, expected);
    }

    #[test]
    fn caller_supplied_exp_is_overwritten() {
        let claims = admin_claims().with(EXP, 1);
        let token = codec().encode_at(&claims, Ttl::hours(1).unwrap(), NOW).unwrap();

        let decoded = codec().decode_at(&token, NOW).unwrap();
        assert_eq!(decoded.exp(), Some(NOW + 3_600));
    }

    #[test]
    fn encoding_is_deterministic() {
        let ttl = Ttl::days(1).unwrap();
        let a = codec().encode_at(&admin_claims(), ttl, NOW).unwrap();
        let b = codec().encode_at(&admin_claims(), ttl, NOW).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn header_segment_is_the_fixed_constant() {
        let token = codec().encode_at(&admin_claims(), Ttl::seconds(5).unwrap(), NOW).unwrap();
        let header = token.split('.').next().unwrap();
        assert_eq!(URL_SAFE_NO_PAD.decode(header).unwrap(), HEADER_JSON.as_bytes());
        assert_eq!(header, "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9");
    }

    #[test]
    fn segments_carry_no_padding() {
        let token = codec().encode_at(&ClaimSet::new().with("a", "b"), Ttl::seconds(1).unwrap(), NOW).unwrap();
        assert!(!token.contains('='));
        assert!(!token.contains('+'));
        assert!(!token.contains('/'));
    }

    #[test]
    fn invalid_ttl_is_rejected_at_encode() {
        let err = codec().encode(&admin_claims(), "1y").unwrap_err();
        assert!(matches!(err, TokenError::InvalidDuration(_)));

        let err = codec().encode(&admin_claims(), "soonh").unwrap_err();
        assert!(matches!(err, TokenError::InvalidDuration(_)));
    }

    #[test]
    fn wrong_segment_count_is_malformed() {
        for token in ["", "abc", "a.b", "a.b.c.d", "a..c", ".b.c", "a.b.", "...."] {
            let err = codec().decode_at(token, NOW).unwrap_err();
            assert!(matches!(err, TokenError::MalformedToken(_)), "token {token:?} gave {err:?}");
        }
    }

    #[test]
    fn flipped_signature_byte_is_invalid_signature() {
        let token = codec().encode_at(&admin_claims(), Ttl::hours(1).unwrap(), NOW).unwrap();
        let (body, sig) = token.rsplit_once('.').unwrap();
        let first = if sig.starts_with('A') { 'B' } else { 'A' };
        let tampered = format!("{body}.{first}{}", &sig[1..]);

        assert_eq!(codec().decode_at(&tampered, NOW), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn tampered_payload_fails_signature_check() {
        let token = codec().encode_at(&ClaimSet::new().with(ROLE, "soldier"), Ttl::hours(1).unwrap(), NOW).unwrap();
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();

        let forged = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&json!({ "role": "admin", "exp": NOW + 3_600 })).unwrap(),
        );
        parts[1] = forged;

        assert_eq!(codec().decode_at(&parts.join("."), NOW), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn different_secret_is_invalid_signature() {
        let token = codec().encode_at(&admin_claims(), Ttl::hours(1).unwrap(), NOW).unwrap();
        let other = TokenCodec::new(Secret::from("another-secret"));
        assert_eq!(other.decode_at(&token, NOW), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn non_base64_signature_is_invalid_signature() {
        let token = codec().encode_at(&admin_claims(), Ttl::hours(1).unwrap(), NOW).unwrap();
        let (body, _) = token.rsplit_once('.').unwrap();
        assert_eq!(
            codec().decode_at(&format!("{body}.not*base64"), NOW),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn signed_garbage_payload_is_malformed() {
        let header = URL_SAFE_NO_PAD.encode(HEADER_JSON);
        let payload = URL_SAFE_NO_PAD.encode("not json");
        let sig = URL_SAFE_NO_PAD.encode(codec().mac(&header, &payload).finalize().into_bytes());

        let err = codec().decode_at(&format!("{header}.{payload}.{sig}"), NOW).unwrap_err();
        assert!(matches!(err, TokenError::MalformedToken(_)));
    }

    #[test]
    fn signed_non_object_payload_is_malformed() {
        let token = forge(HEADER_JSON, &json!(["id", "u1"]));
        let err = codec().decode_at(&token, NOW).unwrap_err();
        assert!(matches!(err, TokenError::MalformedToken(_)));
    }

    #[test]
    fn foreign_algorithm_is_malformed() {
        let token = forge(r#"{"alg":"none","typ":"JWT"}"#, &json!({ "exp": NOW + 10 }));
        let err = codec().decode_at(&token, NOW).unwrap_err();
        assert!(matches!(err, TokenError::MalformedToken(_)));
    }

    #[test]
    fn expiry_boundary() {
        let token = codec().encode_at(&admin_claims(), Ttl::seconds(1).unwrap(), NOW).unwrap();

        assert!(codec().decode_at(&token, NOW).is_ok());
        assert!(codec().decode_at(&token, NOW + 1).is_ok());
        assert_eq!(codec().decode_at(&token, NOW + 2), Err(TokenError::TokenExpired));
    }

    #[test]
    fn one_second_token_expires_in_real_time() {
        let token = codec().encode(&admin_claims(), "1s").unwrap();
        assert!(codec().decode(&token).is_ok());

        std::thread::sleep(std::time::Duration::from_millis(2_100));
        assert_eq!(codec().decode(&token), Err(TokenError::TokenExpired));
    }

    #[test]
    fn missing_exp_is_rejected_by_default() {
        let token = forge(HEADER_JSON, &json!({ "id": "u1", "role": "admin" }));
        let err = codec().decode_at(&token, NOW).unwrap_err();
        assert!(matches!(err, TokenError::MalformedToken(_)));
    }

    #[test]
    fn missing_exp_never_expires_when_optional() {
        let token = forge(HEADER_JSON, &json!({ "id": "u1", "role": "admin" }));
        let codec = codec().with_expiry_policy(ExpiryPolicy::Optional);

        let decoded = codec.decode_at(&token, i64::MAX).unwrap();
        assert_eq!(decoded.id(), Some("u1"));
        assert_eq!(decoded.exp(), None);
    }

    #[test]
    fn non_integer_exp_is_malformed() {
        let token = forge(HEADER_JSON, &json!({ "exp": "never" }));
        let err = codec().decode_at(&token, NOW).unwrap_err();
        assert!(matches!(err, TokenError::MalformedToken(_)));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

        fn replace_at(token: &str, index: usize, replacement: u8) -> Option<String> {
            let mut bytes = token.as_bytes().to_vec();
            if bytes[index] == replacement {
                return None;
            }
            bytes[index] = replacement;
            String::from_utf8(bytes).ok()
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Any claim set survives encode/decode with exp = now + ttl.
            #[test]
            fn round_trip(
                id in "[a-f0-9]{1,24}",
                role in "[a-z]{1,12}",
                ttl_secs in 0u64..1_000_000,
            ) {
                let claims = ClaimSet::new().with(ID, id.clone()).with(ROLE, role.clone());
                let token = codec().encode_at(&claims, Ttl::seconds(ttl_secs).unwrap(), NOW).unwrap();

                let decoded = codec().decode_at(&token, NOW).unwrap();
                prop_assert_eq!(decoded.id(), Some(id.as_str()));
                prop_assert_eq!(decoded.role().map(|r| r.to_string()), Some(role));
                prop_assert_eq!(decoded.exp(), Some(NOW + ttl_secs as i64));
            }

            /// Changing one character of the payload or signature never verifies.
            #[test]
            fn single_character_tamper_is_detected(
                pick in any::<prop::sample::Index>(),
                replacement in prop::sample::select(ALPHABET),
            ) {
                let token = codec().encode_at(&admin_claims(), Ttl::hours(1).unwrap(), NOW).unwrap();
                let payload_start = token.find('.').unwrap() + 1;
                let index = payload_start + pick.index(token.len() - payload_start);
                prop_assume!(token.as_bytes()[index] != b'.');

                if let Some(tampered) = replace_at(&token, index, replacement) {
                    let err = codec().decode_at(&tampered, NOW).unwrap_err();
                    prop_assert!(
                        matches!(err, TokenError::InvalidSignature | TokenError::MalformedToken(_)),
                        "unexpected error {:?}", err
                    );
                }
            }
        }
    }
}
