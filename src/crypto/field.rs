use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use aes_gcm::aead::rand_core::RngCore;
use base64::{engine::general_purpose::STANDARD as B64, Engine as _};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The size of the AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;
/// The size of the AES-GCM nonce in bytes.
pub const NONCE_SIZE: usize = 12;
/// The size of the AES-GCM authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// A field-encryption key, zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct FieldKey([u8; KEY_SIZE]);

impl FieldKey {
    /// Derives the key from a UTF-8 secret: the secret's bytes are truncated
    /// to 32 bytes, or zero-padded on the right when shorter.
    pub fn derive(secret: &str) -> Self {
        let mut key = [0u8; KEY_SIZE];
        let bytes = secret.as_bytes();
        let len = bytes.len().min(KEY_SIZE);
        key[..len].copy_from_slice(&bytes[..len]);
        Self(key)
    }

    /// Returns a reference to the key as a byte slice.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

/// Whether field encryption is active. The mode is an explicit deployer
/// choice, never an implicit default inside the primitive.
pub enum CipherMode {
    /// Encrypt and decrypt with the given key.
    Enforced(FieldKey),
    /// Pass every value through unchanged.
    Disabled,
}

/// Why a decryption attempt was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecryptError {
    /// Not a three-segment `nonce:tag:ciphertext` envelope.
    MalformedEnvelope,
    /// A segment was not valid base64.
    InvalidEncoding,
    /// Nonce or tag had the wrong decoded length.
    BadSegmentLength,
    /// The authentication tag did not verify (tampering, corruption or a
    /// wrong key), or the plaintext was not valid UTF-8.
    Verification,
}

/// The outcome of a decryption attempt. Callers decide how a `Failed` value
/// degrades; the primitive never hides the distinction.
#[derive(Debug)]
pub enum Decryption {
    Decrypted(String),
    Failed(DecryptError),
}

/// Authenticated encryption for individual PII fields (phone numbers, fiscal
/// codes) stored in the persistence layer.
///
/// The stored form is `base64(nonce):base64(tag):base64(ciphertext)` with a
/// fresh random 96-bit nonce per call. Nonces are generated internally and
/// never accepted from callers.
pub struct FieldCipher {
    mode: CipherMode,
}

impl FieldCipher {
    /// A cipher that encrypts with a key derived from `secret`.
    pub fn enforced(secret: &str) -> Self {
        Self {
            mode: CipherMode::Enforced(FieldKey::derive(secret)),
        }
    }

    /// A pass-through cipher. Values are stored in clear.
    pub fn disabled() -> Self {
        Self {
            mode: CipherMode::Disabled,
        }
    }

    /// Selects the mode from the configured secret, alarming loudly when the
    /// deployment runs without field encryption.
    pub fn from_secret(secret: Option<&str>) -> Self {
        match secret {
            Some(s) if !s.is_empty() => {
                tracing::info!("Field encryption enabled (AES-256-GCM)");
                Self::enforced(s)
            }
            _ => {
                tracing::error!(
                    "SECURITY DEGRADED: FIELD_ENCRYPTION_SECRET is not set, \
                     sensitive fields will be persisted IN CLEAR"
                );
                Self::disabled()
            }
        }
    }

    /// Whether values produced by [`encrypt`](Self::encrypt) are actually
    /// protected.
    pub fn is_enabled(&self) -> bool {
        matches!(self.mode, CipherMode::Enforced(_))
    }

    /// Encrypts a single field value.
    ///
    /// Empty input, or a disabled cipher, returns the input unchanged, so
    /// callers must not assume the output is always an envelope.
    pub fn encrypt(&self, plaintext: &str) -> String {
        let key = match &self.mode {
            CipherMode::Enforced(key) => key,
            CipherMode::Disabled => return plaintext.to_string(),
        };
        if plaintext.is_empty() {
            return plaintext.to_string();
        }

        let cipher = Aes256Gcm::new(key.as_bytes().into());

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from(nonce_bytes);

        // The RustCrypto AEAD only fails on plaintexts beyond the GCM length
        // bound, unreachable for the short fields stored here.
        let mut sealed = match cipher.encrypt(&nonce, plaintext.as_bytes()) {
            Ok(sealed) => sealed,
            Err(e) => {
                tracing::error!("Field encryption failed, storing value in clear: {}", e);
                return plaintext.to_string();
            }
        };

        let tag = sealed.split_off(sealed.len() - TAG_SIZE);
        format!(
            "{}:{}:{}",
            B64.encode(nonce_bytes),
            B64.encode(&tag),
            B64.encode(&sealed)
        )
    }

    /// Attempts to decrypt an envelope, reporting failure as a value rather
    /// than choosing a degradation policy here.
    pub fn try_decrypt(&self, envelope: &str) -> Decryption {
        let key = match &self.mode {
            CipherMode::Enforced(key) => key,
            CipherMode::Disabled => return Decryption::Decrypted(envelope.to_string()),
        };

        let mut segments = envelope.split(':');
        let (Some(nonce_b64), Some(tag_b64), Some(ct_b64), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Decryption::Failed(DecryptError::MalformedEnvelope);
        };

        let (Ok(nonce_bytes), Ok(tag), Ok(ciphertext)) = (
            B64.decode(nonce_b64),
            B64.decode(tag_b64),
            B64.decode(ct_b64),
        ) else {
            return Decryption::Failed(DecryptError::InvalidEncoding);
        };

        if nonce_bytes.len() != NONCE_SIZE || tag.len() != TAG_SIZE {
            return Decryption::Failed(DecryptError::BadSegmentLength);
        }

        let mut nonce_arr = [0u8; NONCE_SIZE];
        nonce_arr.copy_from_slice(&nonce_bytes);
        let nonce = Nonce::from(nonce_arr);

        // The AEAD expects ciphertext || tag.
        let mut sealed = ciphertext;
        sealed.extend_from_slice(&tag);

        let cipher = Aes256Gcm::new(key.as_bytes().into());
        match cipher.decrypt(&nonce, sealed.as_slice()) {
            Ok(plaintext) => match String::from_utf8(plaintext) {
                Ok(value) => Decryption::Decrypted(value),
                Err(_) => Decryption::Failed(DecryptError::Verification),
            },
            Err(_) => Decryption::Failed(DecryptError::Verification),
        }
    }

    /// Decrypts an envelope, returning the stored value verbatim when
    /// decryption fails.
    ///
    /// A corrupted field must not take down a list view, so failure degrades
    /// to the raw envelope. The caller cannot tell a decrypted value from a
    /// failed one by shape alone; use [`try_decrypt`](Self::try_decrypt)
    /// where that distinction matters.
    pub fn decrypt(&self, envelope: &str) -> String {
        match self.try_decrypt(envelope) {
            Decryption::Decrypted(value) => value,
            Decryption::Failed(reason) => {
                tracing::warn!(?reason, "Field decryption failed, returning stored value");
                envelope.to_string()
            }
        }
    }

    /// Decrypts an optional envelope, substituting `fallback` when the value
    /// is absent, empty, or decrypts to an empty string.
    pub fn safe_decrypt(&self, envelope: Option<&str>, fallback: &str) -> String {
        match envelope {
            Some(envelope) if !envelope.is_empty() => {
                let value = self.decrypt(envelope);
                if value.is_empty() {
                    fallback.to_string()
                } else {
                    value
                }
            }
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> FieldCipher {
        FieldCipher::enforced("unit-test-secret")
    }

    fn flip_byte_in_segment(envelope: &str, segment: usize) -> String {
        let mut parts: Vec<String> = envelope.split(':').map(str::to_string).collect();
        let mut raw = B64.decode(&parts[segment]).unwrap();
        raw[0] ^= 0x01;
        parts[segment] = B64.encode(&raw);
        parts.join(":")
    }

    #[test]
    fn round_trip() {
        let cipher = cipher();
        for plaintext in ["3331234567", "RSSMRA85T10A562S", "héllo wörld", "x"] {
            let envelope = cipher.encrypt(plaintext);
            assert_ne!(envelope, plaintext);
            assert_eq!(cipher.decrypt(&envelope), plaintext);
        }
    }

    #[test]
    fn envelope_has_three_segments_and_fixed_sizes() {
        let cipher = cipher();
        let plaintext = "3331234567";
        let envelope = cipher.encrypt(plaintext);

        let parts: Vec<&str> = envelope.split(':').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(B64.decode(parts[0]).unwrap().len(), NONCE_SIZE);
        assert_eq!(B64.decode(parts[1]).unwrap().len(), TAG_SIZE);
        // Stream construction: ciphertext is exactly as long as the plaintext.
        assert_eq!(B64.decode(parts[2]).unwrap().len(), plaintext.len());
    }

    #[test]
    fn nonce_is_fresh_on_every_call() {
        let cipher = cipher();
        let mut nonces = std::collections::HashSet::new();
        for _ in 0..100 {
            let envelope = cipher.encrypt("same plaintext");
            let nonce = envelope.split(':').next().unwrap().to_string();
            assert!(nonces.insert(nonce), "nonce repeated across encryptions");
        }
    }

    #[test]
    fn identical_plaintexts_produce_distinct_envelopes() {
        let cipher = cipher();
        let a = cipher.encrypt("3331234567");
        let b = cipher.encrypt("3331234567");
        assert_ne!(a, b);
        assert_eq!(cipher.decrypt(&a), cipher.decrypt(&b));
    }

    #[test]
    fn tampered_ciphertext_fails_verification() {
        let cipher = cipher();
        let envelope = cipher.encrypt("3331234567");
        let tampered = flip_byte_in_segment(&envelope, 2);

        assert!(matches!(
            cipher.try_decrypt(&tampered),
            Decryption::Failed(DecryptError::Verification)
        ));
        // Degradation policy: the raw envelope comes back, never the plaintext.
        assert_eq!(cipher.decrypt(&tampered), tampered);
        assert_ne!(cipher.decrypt(&tampered), "3331234567");
    }

    #[test]
    fn tampered_tag_fails_verification() {
        let cipher = cipher();
        let envelope = cipher.encrypt("3331234567");
        let tampered = flip_byte_in_segment(&envelope, 1);

        assert!(matches!(
            cipher.try_decrypt(&tampered),
            Decryption::Failed(DecryptError::Verification)
        ));
        assert_eq!(cipher.decrypt(&tampered), tampered);
    }

    #[test]
    fn wrong_key_fails_verification() {
        let envelope = cipher().encrypt("3331234567");
        let other = FieldCipher::enforced("a completely different secret");
        assert!(matches!(
            other.try_decrypt(&envelope),
            Decryption::Failed(DecryptError::Verification)
        ));
    }

    #[test]
    fn malformed_envelopes_are_rejected_with_a_reason() {
        let cipher = cipher();
        assert!(matches!(
            cipher.try_decrypt("not an envelope"),
            Decryption::Failed(DecryptError::MalformedEnvelope)
        ));
        assert!(matches!(
            cipher.try_decrypt("a:b"),
            Decryption::Failed(DecryptError::MalformedEnvelope)
        ));
        assert!(matches!(
            cipher.try_decrypt("a:b:c:d"),
            Decryption::Failed(DecryptError::MalformedEnvelope)
        ));
        assert!(matches!(
            cipher.try_decrypt("!!:@@:##"),
            Decryption::Failed(DecryptError::InvalidEncoding)
        ));

        let short_nonce = format!(
            "{}:{}:{}",
            B64.encode([0u8; 4]),
            B64.encode([0u8; TAG_SIZE]),
            B64.encode(b"ct")
        );
        assert!(matches!(
            cipher.try_decrypt(&short_nonce),
            Decryption::Failed(DecryptError::BadSegmentLength)
        ));
    }

    #[test]
    fn disabled_mode_is_a_transparent_pass_through() {
        let cipher = FieldCipher::disabled();
        assert!(!cipher.is_enabled());
        for value in ["3331234567", "", "already:has:colons"] {
            assert_eq!(cipher.encrypt(value), value);
            assert_eq!(cipher.decrypt(value), value);
        }
    }

    #[test]
    fn from_secret_selects_mode() {
        assert!(FieldCipher::from_secret(Some("secret")).is_enabled());
        assert!(!FieldCipher::from_secret(Some("")).is_enabled());
        assert!(!FieldCipher::from_secret(None).is_enabled());
    }

    #[test]
    fn empty_plaintext_is_not_encrypted() {
        assert_eq!(cipher().encrypt(""), "");
    }

    #[test]
    fn safe_decrypt_substitutes_fallback() {
        let cipher = cipher();
        assert_eq!(cipher.safe_decrypt(None, ""), "");
        assert_eq!(cipher.safe_decrypt(None, "n/a"), "n/a");
        assert_eq!(cipher.safe_decrypt(Some(""), "n/a"), "n/a");

        let envelope = cipher.encrypt("3331234567");
        assert_eq!(cipher.safe_decrypt(Some(&envelope), "n/a"), "3331234567");
    }

    #[test]
    fn key_derivation_truncates_and_zero_pads() {
        let short = FieldKey::derive("abc");
        let mut expected = [0u8; KEY_SIZE];
        expected[..3].copy_from_slice(b"abc");
        assert_eq!(short.as_bytes(), &expected);

        let long = "0123456789abcdef0123456789abcdefEXTRA";
        let truncated = FieldKey::derive(long);
        assert_eq!(&truncated.as_bytes()[..], &long.as_bytes()[..KEY_SIZE]);

        // Two secrets sharing a 32-byte prefix derive the same key.
        let a = FieldCipher::enforced("0123456789abcdef0123456789abcdefXXX");
        let b = FieldCipher::enforced("0123456789abcdef0123456789abcdefYYY");
        let envelope = a.encrypt("3331234567");
        assert_eq!(b.decrypt(&envelope), "3331234567");
    }
}
