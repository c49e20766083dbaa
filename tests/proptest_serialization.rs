//! Property-based tests for cache serialization.
//!
//! Verifies the codec laws hold for randomly generated inputs, not just the
//! hand-picked cases in the unit tests:
//!
//! 1. **Roundtrip**: decode(encode(x)) == x for ANY x
//! 2. **Determinism**: encode(x) == encode(x) always
//! 3. **Envelope**: every default-codec entry carries the magic + version

use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use tierkit::serialization::{
    deserialize_from_cache, serialize_for_cache, CacheEnvelope, Codec, JsonCodec, CACHE_MAGIC,
    CURRENT_SCHEMA_VERSION,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct User {
    id: u64,
    name: String,
    email: String,
    active: bool,
}

fn arb_user() -> impl Strategy<Value = User> {
    (any::<u64>(), ".*", "[a-z]{0,12}@[a-z]{0,8}", any::<bool>()).prop_map(
        |(id, name, email, active)| User {
            id,
            name,
            email,
            active,
        },
    )
}

proptest! {
    #[test]
    fn roundtrip_envelope(user in arb_user()) {
        let bytes = serialize_for_cache(&user).unwrap();
        let decoded: User = deserialize_from_cache(&bytes).unwrap();
        prop_assert_eq!(user, decoded);
    }

    #[test]
    fn roundtrip_json_codec(user in arb_user()) {
        let codec = JsonCodec;
        let bytes = Codec::<User>::encode(&codec, &user).unwrap();
        let decoded: User = codec.decode(&bytes).unwrap();
        prop_assert_eq!(user, decoded);
    }

    #[test]
    fn deterministic_encoding(user in arb_user()) {
        let bytes1 = serialize_for_cache(&user).unwrap();
        let bytes2 = serialize_for_cache(&user).unwrap();
        prop_assert_eq!(bytes1, bytes2);
    }

    #[test]
    fn envelope_carries_magic_and_version(user in arb_user()) {
        let bytes = serialize_for_cache(&user).unwrap();
        let envelope: CacheEnvelope<User> = postcard::from_bytes(&bytes).unwrap();
        prop_assert_eq!(envelope.magic, CACHE_MAGIC);
        prop_assert_eq!(envelope.version, CURRENT_SCHEMA_VERSION);
    }
}
