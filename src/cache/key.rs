//! Cache key generation using SHA-256 hashes

use sha2::{Digest, Sha256};

/// Derive the cache key for a credential.
///
/// The key is the hex SHA-256 of the exact credential string, so two keys are
/// equal only when the credentials are byte-for-byte equal. The raw token is
/// never held by the cache.
pub fn credential_key(credential: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"authorized_forms|");
    hasher.update(credential.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_key_deterministic() {
        assert_eq!(credential_key("token-a"), credential_key("token-a"));
    }

    #[test]
    fn test_credential_key_exact_match_only() {
        assert_ne!(credential_key("token-a"), credential_key("token-a "));
        assert_ne!(credential_key("token-a"), credential_key("TOKEN-A"));
    }

    #[test]
    fn test_credential_key_is_hex_digest() {
        let key = credential_key("");
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
