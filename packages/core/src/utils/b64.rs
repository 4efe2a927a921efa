// Base64 утилиты
// Ciphertext envelopes пересекают границу ядра только в виде standard base64

use crate::error::{LabError, Result};
use base64::{engine::general_purpose, Engine};

pub fn encode(data: &[u8]) -> String {
    general_purpose::STANDARD.encode(data)
}

pub fn decode(data: &str) -> Result<Vec<u8>> {
    general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|e| LabError::InvalidInput(format!("Base64 decode failed: {}", e)))
}
