//! Проекции одной отправки на трёх наблюдателей
//!
//! ```text
//!            plaintext
//!  Sender ───────────────▶ Channel::encrypt ──── envelope ────▶ Receiver
//!  (plaintext, envelope)                   │                  (envelope, decrypt)
//!                                          ▼
//!                                     Eavesdropper
//!                                 (envelope, size only)
//! ```
//!
//! `EavesdropperView` строится только из байтов ciphertext: у его
//! конструктора нет параметров для ключа или plaintext.

use crate::config::Config;
use crate::crypto::channel::Channel;
use crate::error::{LabError, Result};
use crate::protocol::messages::{Message, Principal};
use crate::state::operation_log::{preview, OperationKind, OperationLogEntry};
use crate::utils::b64;
use serde::Serialize;
use tracing::{debug, warn};

/// Роль наблюдателя
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Observer {
    Sender,
    Receiver,
    Eavesdropper,
}

/// Направление отправки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Direction {
    pub from: Principal,
    pub to: Principal,
}

impl Direction {
    pub fn from_sender(sender: Principal) -> Self {
        Self {
            from: sender,
            to: sender.peer(),
        }
    }
}

/// Что видит отправитель
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderView {
    pub direction: Direction,
    pub timestamp: i64,
    pub plaintext: String,
    pub ciphertext: String,
}

/// Результат расшифровки на стороне получателя
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Decryption {
    Plaintext(String),
    Failed,
}

impl Decryption {
    pub fn plaintext(&self) -> Option<&str> {
        match self {
            Decryption::Plaintext(text) => Some(text),
            Decryption::Failed => None,
        }
    }
}

/// Что видит получатель
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiverView {
    pub direction: Direction,
    pub timestamp: i64,
    pub ciphertext: String,
    pub decrypted: Decryption,
}

/// Что видит Eve
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EavesdropperView {
    pub direction: Direction,
    pub timestamp: i64,
    pub ciphertext: String,
    pub ciphertext_bytes: usize,
}

impl EavesdropperView {
    /// Перехват: только то, что прошло по каналу
    pub fn intercept(ciphertext: &[u8], direction: Direction, timestamp: i64) -> Self {
        Self {
            direction,
            timestamp,
            ciphertext: b64::encode(ciphertext),
            ciphertext_bytes: ciphertext.len(),
        }
    }
}

/// Три проекции одной отправки
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreePartyObservation {
    pub message_id: String,
    pub sender: SenderView,
    pub receiver: ReceiverView,
    pub eavesdropper: EavesdropperView,
}

impl ThreePartyObservation {
    /// Всё, что знает Eve, известно и получателю
    pub fn eavesdropper_is_subset_of_receiver(&self) -> bool {
        self.eavesdropper.ciphertext == self.receiver.ciphertext
            && self.eavesdropper.direction == self.receiver.direction
            && self.eavesdropper.timestamp == self.receiver.timestamp
    }

    pub fn view_for(&self, observer: Observer) -> serde_json::Value {
        let value = match observer {
            Observer::Sender => serde_json::to_value(&self.sender),
            Observer::Receiver => serde_json::to_value(&self.receiver),
            Observer::Eavesdropper => serde_json::to_value(&self.eavesdropper),
        };
        value.unwrap_or(serde_json::Value::Null)
    }
}

/// Результат одной отправки: сообщение для истории, проекции и записи журнала
#[derive(Debug, Clone)]
pub struct Exchange {
    pub message: Message,
    pub observation: ThreePartyObservation,
    pub log_entries: Vec<OperationLogEntry>,
}

/// Прогоняет отправку через любой `Channel` и строит три проекции
pub struct ThreePartyView<'a, C: Channel> {
    channel: &'a C,
    preview_chars: usize,
}

impl<'a, C: Channel> ThreePartyView<'a, C> {
    pub fn new(channel: &'a C) -> Self {
        Self {
            channel,
            preview_chars: Config::global().ciphertext_preview_chars,
        }
    }

    /// Длина превью ciphertext в записи журнала
    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    /// Зашифровать ключом отправителя и расшифровать ключом получателя.
    ///
    /// Ошибка шифрования возвращается как есть. Ошибка расшифровки не
    /// прерывает отправку: получатель видит `Decryption::Failed`.
    pub fn send(
        &self,
        sender: Principal,
        plaintext: &str,
        encrypt_key: &C::EncryptKey,
        decrypt_key: &C::DecryptKey,
    ) -> Result<Exchange> {
        let direction = Direction::from_sender(sender);
        let algorithm = self.channel.algorithm();

        let ciphertext = self.channel.encrypt(plaintext, encrypt_key)?;
        let decrypted = match self.channel.decrypt(&ciphertext, decrypt_key) {
            Ok(text) => Decryption::Plaintext(text),
            Err(LabError::DecryptionFailed) => {
                warn!(
                    target: "lab::session",
                    from = sender.name(),
                    algorithm,
                    "Receiver failed to decrypt envelope"
                );
                Decryption::Failed
            }
            Err(e) => return Err(e),
        };

        let message = Message::new(sender, plaintext.to_string(), ciphertext);
        let timestamp = message.timestamp();
        let ciphertext_b64 = message.ciphertext_b64();

        let observation = ThreePartyObservation {
            message_id: message.id().to_string(),
            sender: SenderView {
                direction,
                timestamp,
                plaintext: message.plaintext().to_string(),
                ciphertext: ciphertext_b64.clone(),
            },
            receiver: ReceiverView {
                direction,
                timestamp,
                ciphertext: ciphertext_b64,
                decrypted: decrypted.clone(),
            },
            eavesdropper: EavesdropperView::intercept(message.ciphertext(), direction, timestamp),
        };

        let mut log_entries = vec![OperationLogEntry::new(
            sender.name(),
            OperationKind::Encryption,
            format!("Encrypted message for {}", direction.to),
            algorithm,
        )
        .detail("Ciphertext", preview(&observation.eavesdropper.ciphertext, self.preview_chars))
        .sizes(Some(plaintext.len()), Some(message.ciphertext().len()))];

        let decryption_entry = OperationLogEntry::new(
            direction.to.name(),
            OperationKind::Decryption,
            match decrypted {
                Decryption::Plaintext(_) => format!("Decrypted message from {}", sender),
                Decryption::Failed => format!("Failed to decrypt message from {}", sender),
            },
            algorithm,
        )
        .sizes(decrypted.plaintext().map(str::len), Some(message.ciphertext().len()));
        log_entries.push(decryption_entry);

        debug!(
            target: "lab::session",
            from = sender.name(),
            to = direction.to.name(),
            algorithm,
            ciphertext_len = message.ciphertext().len(),
            "Three-party exchange computed"
        );

        Ok(Exchange {
            message,
            observation,
            log_entries,
        })
    }
}
