use core_types::ItemId;
use sha1::{Digest, Sha1};

/// Derives a stable item id from a library relative key. Uses the first eight
/// bytes of the SHA-1 digest with the sign bit cleared.
pub fn item_id_for_key(key: &str) -> ItemId {
    let digest = Sha1::digest(key.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    ItemId::new(i64::from_be_bytes(bytes) & i64::MAX)
}

/// Hex encoded SHA-1 of the given value, used as a file name in caches.
pub fn cache_key(value: &str) -> String {
    hex::encode(Sha1::digest(value.as_bytes()))
}

pub fn generate_random_uuid() -> String {
    use uuid::Uuid;
    Uuid::new_v4().to_string()
}
