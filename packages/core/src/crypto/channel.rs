//! Defines the Channel trait shared by the chat demos.

use crate::error::Result;

/// One encryption scheme as seen by a chat: encrypt with one key, decrypt
/// with its counterpart.
///
/// For AEAD both keys are the same shared secret; for RSA the sender uses the
/// recipient's public key and the recipient its own private key.
pub trait Channel {
    /// Key material used by the sending side.
    type EncryptKey;

    /// Key material used by the receiving side.
    type DecryptKey;

    /// Human-readable algorithm identifier for the operation log.
    fn algorithm(&self) -> &'static str;

    /// Encrypts `plaintext`, returning an opaque ciphertext envelope.
    fn encrypt(&self, plaintext: &str, key: &Self::EncryptKey) -> Result<Vec<u8>>;

    /// Decrypts an envelope produced by [`Channel::encrypt`].
    ///
    /// Total: every failure surfaces as `LabError::DecryptionFailed` or
    /// `LabError::InvalidInput`, never a panic.
    fn decrypt(&self, ciphertext: &[u8], key: &Self::DecryptKey) -> Result<String>;
}
