// Типы сообщений
// Участники (Alice, Bob) и отправленные сообщения

use crate::utils::{b64, time::current_timestamp, uuid::generate_v4};
use serde::Serialize;
use std::fmt;

/// Сторона, владеющая ключами. Eve ключей не имеет и здесь не представлена.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Principal {
    Alice,
    Bob,
}

impl Principal {
    pub fn name(&self) -> &'static str {
        match self {
            Principal::Alice => "Alice",
            Principal::Bob => "Bob",
        }
    }

    /// Собеседник
    pub fn peer(&self) -> Principal {
        match self {
            Principal::Alice => Principal::Bob,
            Principal::Bob => Principal::Alice,
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Отправленное сообщение.
///
/// Неизменяемо после создания: поля приватные, есть только геттеры.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// UUID v4 идентификатор сообщения
    id: String,
    sender: Principal,
    recipient: Principal,
    plaintext: String,
    /// Envelope активного канала
    ciphertext: Vec<u8>,
    /// Unix timestamp в миллисекундах
    timestamp: i64,
}

impl Message {
    pub(crate) fn new(sender: Principal, plaintext: String, ciphertext: Vec<u8>) -> Self {
        Self {
            id: generate_v4(),
            sender,
            recipient: sender.peer(),
            plaintext,
            ciphertext,
            timestamp: current_timestamp(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sender(&self) -> Principal {
        self.sender
    }

    pub fn recipient(&self) -> Principal {
        self.recipient
    }

    pub fn plaintext(&self) -> &str {
        &self.plaintext
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Ciphertext в standard base64 (формат на границе с UI)
    pub fn ciphertext_b64(&self) -> String {
        b64::encode(&self.ciphertext)
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peer() {
        assert_eq!(Principal::Alice.peer(), Principal::Bob);
        assert_eq!(Principal::Bob.peer(), Principal::Alice);
    }

    #[test]
    fn test_message_recipient_is_peer() {
        let msg = Message::new(Principal::Bob, "hi".to_string(), vec![1, 2, 3]);
        assert_eq!(msg.recipient(), Principal::Alice);
        assert_eq!(msg.ciphertext_b64(), "AQID");
        assert!(crate::utils::uuid::is_valid(msg.id()));
    }
}
