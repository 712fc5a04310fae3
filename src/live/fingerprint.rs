use sha2::{Digest, Sha256};

/// Hex SHA-256 over raw payloads, each length-prefixed so that moving bytes
/// between payloads changes the digest.
pub fn fingerprint(payloads: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for payload in payloads {
        hasher.update((payload.len() as u64).to_le_bytes());
        hasher.update(payload.as_bytes());
    }
    hex::encode(hasher.finalize())
}
