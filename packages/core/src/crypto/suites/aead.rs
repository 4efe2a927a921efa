use crate::crypto::channel::Channel;
use crate::crypto::keys::SymmetricKey;
use crate::error::{LabError, Result};
use aes_gcm::{
    aead::{Aead, KeyInit, Nonce},
    Aes256Gcm,
};
use chacha20poly1305::ChaCha20Poly1305;
use rand::rngs::OsRng;
use rand_core::RngCore;
use serde::Serialize;
use tracing::debug;

/// Длина nonce (96 бит) для обоих AEAD
pub const NONCE_LENGTH: usize = 12;

/// Длина authentication tag (128 бит)
pub const TAG_LENGTH: usize = 16;

/// Поддерживаемые AEAD алгоритмы. Оба используют 32-байтный ключ,
/// 12-байтный nonce и 16-байтный tag, так что формат envelope общий.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AeadAlgorithm {
    Aes256Gcm,
    ChaCha20Poly1305,
}

impl AeadAlgorithm {
    pub fn id(&self) -> &'static str {
        match self {
            AeadAlgorithm::Aes256Gcm => "AES-256-GCM",
            AeadAlgorithm::ChaCha20Poly1305 => "ChaCha20-Poly1305",
        }
    }

    /// Разобрать имя алгоритма (`aes-256-gcm`, `chacha20-poly1305`, без учёта регистра)
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "aes-256-gcm" | "aes256gcm" | "aes" => Some(AeadAlgorithm::Aes256Gcm),
            "chacha20-poly1305" | "chacha20poly1305" | "chacha" => {
                Some(AeadAlgorithm::ChaCha20Poly1305)
            }
            _ => None,
        }
    }
}

/// Симметричный канал: envelope = nonce ‖ ciphertext ‖ tag.
///
/// Nonce генерируется внутри каждого вызова `encrypt`; API не принимает
/// nonce снаружи, поэтому повторить его под тем же ключом нельзя.
#[derive(Debug, Clone, Copy)]
pub struct AeadChannel {
    algorithm: AeadAlgorithm,
}

impl AeadChannel {
    pub fn new(algorithm: AeadAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn aead_algorithm(&self) -> AeadAlgorithm {
        self.algorithm
    }

    fn seal<A: Aead + KeyInit>(key: &SymmetricKey, nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        let cipher = A::new_from_slice(key.as_bytes())
            .map_err(|_| LabError::invalid_input("Invalid AEAD key length"))?;
        cipher
            .encrypt(Nonce::<A>::from_slice(nonce), plaintext)
            .map_err(|e| LabError::InvalidInput(format!("Encryption failed: {}", e)))
    }

    fn open<A: Aead + KeyInit>(key: &SymmetricKey, nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        let cipher = A::new_from_slice(key.as_bytes()).map_err(|_| LabError::DecryptionFailed)?;
        cipher
            .decrypt(Nonce::<A>::from_slice(nonce), ciphertext)
            .map_err(|_| LabError::DecryptionFailed)
    }
}

impl Default for AeadChannel {
    fn default() -> Self {
        Self::new(AeadAlgorithm::Aes256Gcm)
    }
}

impl Channel for AeadChannel {
    type EncryptKey = SymmetricKey;
    type DecryptKey = SymmetricKey;

    fn algorithm(&self) -> &'static str {
        self.algorithm.id()
    }

    fn encrypt(&self, plaintext: &str, key: &SymmetricKey) -> Result<Vec<u8>> {
        if plaintext.is_empty() {
            return Err(LabError::invalid_input("Plaintext must not be empty"));
        }

        // Генерируем случайный nonce
        let mut nonce = [0u8; NONCE_LENGTH];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext = match self.algorithm {
            AeadAlgorithm::Aes256Gcm => Self::seal::<Aes256Gcm>(key, &nonce, plaintext.as_bytes())?,
            AeadAlgorithm::ChaCha20Poly1305 => {
                Self::seal::<ChaCha20Poly1305>(key, &nonce, plaintext.as_bytes())?
            }
        };

        // Комбинируем nonce + ciphertext (tag уже в конце ciphertext)
        let mut envelope = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
        envelope.extend_from_slice(&nonce);
        envelope.extend_from_slice(&ciphertext);

        debug!(
            target: "crypto::aead",
            algorithm = self.algorithm.id(),
            plaintext_len = plaintext.len(),
            envelope_len = envelope.len(),
            "Sealed envelope"
        );

        Ok(envelope)
    }

    fn decrypt(&self, envelope: &[u8], key: &SymmetricKey) -> Result<String> {
        if envelope.len() < NONCE_LENGTH {
            return Err(LabError::DecryptionFailed);
        }

        // Извлекаем nonce и ciphertext
        let (nonce, ciphertext) = envelope.split_at(NONCE_LENGTH);

        let plaintext = match self.algorithm {
            AeadAlgorithm::Aes256Gcm => Self::open::<Aes256Gcm>(key, nonce, ciphertext)?,
            AeadAlgorithm::ChaCha20Poly1305 => Self::open::<ChaCha20Poly1305>(key, nonce, ciphertext)?,
        };

        String::from_utf8(plaintext).map_err(|_| LabError::DecryptionFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn channels() -> [AeadChannel; 2] {
        [
            AeadChannel::new(AeadAlgorithm::Aes256Gcm),
            AeadChannel::new(AeadAlgorithm::ChaCha20Poly1305),
        ]
    }

    #[test]
    fn test_round_trip() {
        for channel in channels() {
            let key = SymmetricKey::generate();
            let envelope = channel.encrypt("Hello Bob!", &key).unwrap();
            assert_eq!(channel.decrypt(&envelope, &key).unwrap(), "Hello Bob!");
        }
    }

    #[test]
    fn test_envelope_layout() {
        let key = SymmetricKey::generate();
        let envelope = AeadChannel::default().encrypt("test data", &key).unwrap();
        assert_eq!(envelope.len(), NONCE_LENGTH + "test data".len() + TAG_LENGTH);
    }

    #[test]
    fn test_wrong_key_fails() {
        for channel in channels() {
            let key = SymmetricKey::generate();
            let wrong_key = SymmetricKey::generate();
            let envelope = channel.encrypt("Secret message", &key).unwrap();
            assert_eq!(channel.decrypt(&envelope, &wrong_key), Err(LabError::DecryptionFailed));
        }
    }

    #[test]
    fn test_tampered_envelope_fails() {
        let channel = AeadChannel::default();
        let key = SymmetricKey::generate();
        let mut envelope = channel.encrypt("Secret message", &key).unwrap();
        let last = envelope.len() - 1;
        envelope[last] ^= 0x01;
        assert_eq!(channel.decrypt(&envelope, &key), Err(LabError::DecryptionFailed));
    }

    #[test]
    fn test_short_envelope_fails() {
        let channel = AeadChannel::default();
        let key = SymmetricKey::generate();
        assert_eq!(channel.decrypt(&[], &key), Err(LabError::DecryptionFailed));
        assert_eq!(channel.decrypt(&[0u8; 11], &key), Err(LabError::DecryptionFailed));
        assert_eq!(channel.decrypt(&[0u8; 20], &key), Err(LabError::DecryptionFailed));
    }

    #[test]
    fn test_empty_plaintext_rejected() {
        let key = SymmetricKey::generate();
        assert!(matches!(
            AeadChannel::default().encrypt("", &key),
            Err(LabError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_cross_algorithm_decrypt_fails() {
        let key = SymmetricKey::generate();
        let envelope = AeadChannel::new(AeadAlgorithm::Aes256Gcm)
            .encrypt("hello", &key)
            .unwrap();
        assert_eq!(
            AeadChannel::new(AeadAlgorithm::ChaCha20Poly1305).decrypt(&envelope, &key),
            Err(LabError::DecryptionFailed)
        );
    }

    #[test]
    fn test_nonces_are_fresh() {
        let channel = AeadChannel::default();
        let key = SymmetricKey::generate();
        let nonces: HashSet<Vec<u8>> = (0..1000)
            .map(|_| channel.encrypt("same text", &key).unwrap()[..NONCE_LENGTH].to_vec())
            .collect();
        assert_eq!(nonces.len(), 1000);
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!(AeadAlgorithm::parse("AES-256-GCM"), Some(AeadAlgorithm::Aes256Gcm));
        assert_eq!(
            AeadAlgorithm::parse(" chacha20-poly1305 "),
            Some(AeadAlgorithm::ChaCha20Poly1305)
        );
        assert_eq!(AeadAlgorithm::parse("des"), None);
    }
}
