use crate::crypto::channel::Channel;
use crate::crypto::keys::{AsymmetricPrivateKey, AsymmetricPublicKey};
use crate::error::{LabError, Result};
use rand::rngs::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::Pkcs1v15Encrypt;
use tracing::debug;

/// PKCS#1 v1.5 padding занимает минимум 11 байт блока
pub const PKCS1_V15_OVERHEAD: usize = 11;

/// RSA канал: шифрование публичным ключом получателя,
/// расшифровка его приватным ключом.
#[derive(Debug, Clone, Copy, Default)]
pub struct RsaChannel;

impl RsaChannel {
    pub fn new() -> Self {
        Self
    }

    /// Максимальный размер plaintext в байтах для данного ключа
    pub fn max_plaintext_len(public_key: &AsymmetricPublicKey) -> usize {
        public_key.rsa().size().saturating_sub(PKCS1_V15_OVERHEAD)
    }
}

impl Channel for RsaChannel {
    type EncryptKey = AsymmetricPublicKey;
    type DecryptKey = AsymmetricPrivateKey;

    fn algorithm(&self) -> &'static str {
        "RSA (PKCS#1 v1.5 padding)"
    }

    fn encrypt(&self, plaintext: &str, recipient: &AsymmetricPublicKey) -> Result<Vec<u8>> {
        if plaintext.is_empty() {
            return Err(LabError::invalid_input("Plaintext must not be empty"));
        }

        let limit = Self::max_plaintext_len(recipient);
        if plaintext.len() > limit {
            return Err(LabError::InvalidInput(format!(
                "Message too long for RSA key: {} bytes, limit is {}",
                plaintext.len(),
                limit
            )));
        }

        let ciphertext = recipient
            .rsa()
            .encrypt(&mut OsRng, Pkcs1v15Encrypt, plaintext.as_bytes())
            .map_err(|e| LabError::InvalidInput(format!("Encryption failed: {}", e)))?;

        debug!(
            target: "crypto::rsa",
            plaintext_len = plaintext.len(),
            ciphertext_len = ciphertext.len(),
            "Encrypted with recipient public key"
        );

        Ok(ciphertext)
    }

    fn decrypt(&self, ciphertext: &[u8], own_private: &AsymmetricPrivateKey) -> Result<String> {
        let plaintext = own_private
            .rsa()
            .decrypt(Pkcs1v15Encrypt, ciphertext)
            .map_err(|_| LabError::DecryptionFailed)?;

        String::from_utf8(plaintext).map_err(|_| LabError::DecryptionFailed)
    }
}
