// Типы ошибок

use thiserror::Error;

/// Ошибки вычислительного ядра.
///
/// Все варианты восстанавливаемые: UI получает их как обычный результат
/// команды и решает, что показать пользователю.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LabError {
    /// Пустой plaintext, битый envelope, неподходящие простые числа и т.п.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No modular inverse: gcd({value}, {modulus}) != 1")]
    NoModularInverse { value: u64, modulus: u64 },

    /// Намеренно без деталей: неверный tag, неверный ключ и битый padding
    /// неразличимы для вызывающего
    #[error("Decryption failed")]
    DecryptionFailed,

    /// Операция вызвана до генерации нужных ключей
    #[error("Key not ready: {0}")]
    KeyNotReady(String),

    #[error("Failed to generate keys: {0}")]
    KeyGenerationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl LabError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        LabError::InvalidInput(message.into())
    }

    pub fn key_not_ready(message: impl Into<String>) -> Self {
        LabError::KeyNotReady(message.into())
    }
}

impl From<serde_json::Error> for LabError {
    fn from(err: serde_json::Error) -> Self {
        LabError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LabError>;
