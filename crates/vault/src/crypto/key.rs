//! [`SecretKey`]: the AES-256 key derived from the configured secret.

use sha2::{Digest, Sha256};
use zeroize::Zeroize;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Fixed-size key buffer that holds exactly [`KEY_LEN`] bytes.
///
/// Wiped with [`zeroize`] on drop, as is the intermediate digest. The
/// AES key schedule built from it is wiped by `aes-gcm`'s `zeroize` feature.
#[derive(Clone)]
pub struct SecretKey(Box<[u8; KEY_LEN]>);

impl SecretKey {
    /// Derive a key as the SHA-256 digest of `secret`'s UTF-8 bytes.
    pub fn derive(secret: &str) -> Self {
        let mut digest = Sha256::digest(secret.as_bytes());
        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(&digest);
        digest.as_mut_slice().zeroize();
        Self(buf)
    }

    /// Raw key bytes, for building a cipher.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material, not even in debug builds.
        f.write_str("SecretKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    #[test]
    fn derivation_is_sha256_of_secret() {
        let key = SecretKey::derive("test-secret-value");
        assert_eq!(
            hex(key.as_bytes()),
            "afbb9b6c7c26d7b5ce487d7eed36223352f315eadc14e39bdd30fe08fb7c8555"
        );
    }

    #[test]
    fn same_secret_same_key() {
        let a = SecretKey::derive("operator-secret");
        let b = SecretKey::derive("operator-secret");
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_ne!(a.as_bytes(), SecretKey::derive("other").as_bytes());
    }

    #[test]
    fn zeroize_clears_key_bytes() {
        let mut key = SecretKey::derive("wipe-me");
        assert!(key.as_bytes().iter().any(|b| *b != 0));
        key.0.zeroize();
        assert!(key.as_bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn secret_key_redacted_in_debug() {
        let key = SecretKey::derive("do-not-print");
        let printed = format!("{key:?}");
        assert!(printed.contains("REDACTED"));
        assert!(!printed.contains("do-not-print"));
    }
}
