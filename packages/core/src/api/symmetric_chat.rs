// Симметричный чат
// Alice и Bob делят один AEAD ключ, Eve видит только envelope

use crate::config::Config;
use crate::crypto::channel::Channel;
use crate::crypto::keys::{generate_symmetric_key, SYMMETRIC_KEY_LENGTH};
use crate::crypto::suites::aead::{AeadChannel, NONCE_LENGTH, TAG_LENGTH};
use crate::error::{LabError, Result};
use crate::protocol::messages::{Message, Principal};
use crate::state::operation_log::{OperationKind, OperationLog, OperationLogEntry, SYSTEM_ACTOR};
use crate::state::session::{KeyMaterial, Session};
use crate::state::views::{Direction, EavesdropperView, ThreePartyObservation, ThreePartyView};
use crate::utils::b64;
use serde::Serialize;
use tracing::info;

/// Ключ для отображения владельцам (Alice и Bob)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymmetricKeyReport {
    pub algorithm: &'static str,
    pub key_hex: String,
    pub key_b64: String,
    pub key_bits: usize,
    pub nonce_bits: usize,
    pub tag_bits: usize,
}

/// Что Eve знает о симметричном чате
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymmetricEavesdropperKnowledge {
    pub algorithm: &'static str,
    pub key_bits: usize,
    pub intercepted: Vec<EavesdropperView>,
    pub last_ciphertext_bytes: Option<usize>,
}

pub struct SymmetricChat {
    channel: AeadChannel,
    config: Config,
    session: Session,
}

impl SymmetricChat {
    pub fn new() -> Self {
        Self::with_config(Config::global().clone())
    }

    pub fn with_config(config: Config) -> Self {
        let channel = AeadChannel::new(config.aead_algorithm);
        let session = Session::new("Symmetric chat", channel.algorithm());
        Self {
            channel,
            config,
            session,
        }
    }

    /// Сгенерировать общий ключ и раздать копию обеим сторонам
    pub fn generate_keys(&mut self) -> Result<SymmetricKeyReport> {
        let key = generate_symmetric_key();
        let report = SymmetricKeyReport {
            algorithm: self.channel.algorithm(),
            key_hex: key.to_hex(),
            key_b64: key.to_base64(),
            key_bits: SYMMETRIC_KEY_LENGTH * 8,
            nonce_bits: NONCE_LENGTH * 8,
            tag_bits: TAG_LENGTH * 8,
        };

        self.session
            .install_keys(Principal::Alice, KeyMaterial::Symmetric(key.clone()));
        self.session
            .install_keys(Principal::Bob, KeyMaterial::Symmetric(key));

        self.session.record(
            OperationLogEntry::new(
                SYSTEM_ACTOR,
                OperationKind::KeyGeneration,
                "Shared key generated for Alice and Bob",
                self.channel.algorithm(),
            )
            .detail("Key Size", format!("{} bits", report.key_bits))
            .detail("Nonce Size", format!("{} bits", report.nonce_bits))
            .detail("Tag Size", format!("{} bits", report.tag_bits)),
        );

        info!(
            target: "lab::session",
            algorithm = report.algorithm,
            "Shared symmetric key generated"
        );

        Ok(report)
    }

    pub fn has_keys(&self) -> bool {
        self.session.has_keys(Principal::Alice) && self.session.has_keys(Principal::Bob)
    }

    /// Отправить сообщение собеседнику
    pub fn send(&mut self, from: Principal, plaintext: &str) -> Result<ThreePartyObservation> {
        let to = from.peer();
        let exchange = {
            let sender_key = self.session.symmetric_key(from)?;
            let receiver_key = self.session.symmetric_key(to)?;

            let plaintext = plaintext.trim();
            if plaintext.is_empty() {
                return Err(LabError::invalid_input("Message must not be empty"));
            }

            ThreePartyView::new(&self.channel)
                .with_preview_chars(self.config.ciphertext_preview_chars)
                .send(from, plaintext, sender_key, receiver_key)?
        };

        self.session.record_exchange(&exchange);
        Ok(exchange.observation)
    }

    /// Попробовать расшифровать envelope (в том числе изменённый) ключом стороны
    pub fn open(&mut self, principal: Principal, envelope_b64: &str) -> Result<String> {
        let key = self.session.symmetric_key(principal)?;
        let envelope = b64::decode(envelope_b64)?;
        let result = self.channel.decrypt(&envelope, key);

        let action = match result {
            Ok(_) => "Opened envelope",
            Err(_) => "Failed to open envelope",
        };
        self.session.record(
            OperationLogEntry::new(
                principal.name(),
                OperationKind::Decryption,
                action,
                self.channel.algorithm(),
            )
            .sizes(
                result.as_ref().ok().map(String::len),
                Some(envelope.len()),
            ),
        );

        result
    }

    pub fn eavesdropper_knowledge(&self) -> SymmetricEavesdropperKnowledge {
        let intercepted: Vec<EavesdropperView> = self
            .session
            .messages()
            .iter()
            .map(|m| {
                EavesdropperView::intercept(
                    m.ciphertext(),
                    Direction::from_sender(m.sender()),
                    m.timestamp(),
                )
            })
            .collect();

        SymmetricEavesdropperKnowledge {
            algorithm: self.channel.algorithm(),
            key_bits: SYMMETRIC_KEY_LENGTH * 8,
            last_ciphertext_bytes: intercepted.last().map(|v| v.ciphertext_bytes),
            intercepted,
        }
    }

    pub fn messages(&self) -> &[Message] {
        self.session.messages()
    }

    pub fn messages_for(&self, principal: Principal) -> Vec<&Message> {
        self.session.messages_for(principal).collect()
    }

    pub fn log(&self) -> &OperationLog {
        self.session.log()
    }
}

impl Default for SymmetricChat {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::suites::aead::AeadAlgorithm;
    use crate::state::views::Decryption;

    #[test]
    fn test_send_before_keys_is_key_not_ready() {
        let mut chat = SymmetricChat::with_config(Config::default());
        assert!(matches!(chat.send(Principal::Alice, "hi"), Err(LabError::KeyNotReady(_))));
    }

    #[test]
    fn test_send_round_trip_both_directions() {
        let mut chat = SymmetricChat::with_config(Config::default());
        let report = chat.generate_keys().unwrap();
        assert_eq!(report.key_hex.len(), 64);
        assert_eq!(report.algorithm, "AES-256-GCM");

        let obs = chat.send(Principal::Alice, "  hello bob  ").unwrap();
        assert_eq!(obs.sender.plaintext, "hello bob");
        assert_eq!(obs.receiver.decrypted, Decryption::Plaintext("hello bob".to_string()));

        let obs = chat.send(Principal::Bob, "hi alice").unwrap();
        assert_eq!(obs.receiver.direction.to, Principal::Alice);
        assert_eq!(chat.messages().len(), 2);
        assert_eq!(chat.messages_for(Principal::Alice).len(), 2);
    }

    #[test]
    fn test_open_before_keys_is_key_not_ready() {
        let mut chat = SymmetricChat::with_config(Config::default());
        assert!(matches!(chat.open(Principal::Bob, "not base64!"), Err(LabError::KeyNotReady(_))));
        assert_eq!(chat.log().len(), 1);
    }

    #[test]
    fn test_blank_message_is_invalid() {
        let mut chat = SymmetricChat::with_config(Config::default());
        chat.generate_keys().unwrap();
        assert!(matches!(chat.send(Principal::Alice, "   "), Err(LabError::InvalidInput(_))));
    }

    #[test]
    fn test_open_intercepted_and_tampered() {
        let mut chat = SymmetricChat::with_config(Config::default());
        chat.generate_keys().unwrap();
        let obs = chat.send(Principal::Alice, "meet at noon").unwrap();

        assert_eq!(chat.open(Principal::Bob, &obs.eavesdropper.ciphertext).unwrap(), "meet at noon");

        let mut bytes = b64::decode(&obs.eavesdropper.ciphertext).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        assert_eq!(
            chat.open(Principal::Bob, &b64::encode(&bytes)),
            Err(LabError::DecryptionFailed)
        );
        assert!(matches!(chat.open(Principal::Bob, "not base64!"), Err(LabError::InvalidInput(_))));
    }

    #[test]
    fn test_chacha_suite_from_config() {
        let mut config = Config::default();
        config.aead_algorithm = AeadAlgorithm::ChaCha20Poly1305;
        let mut chat = SymmetricChat::with_config(config);
        chat.generate_keys().unwrap();
        let obs = chat.send(Principal::Bob, "chacha").unwrap();
        assert_eq!(obs.receiver.decrypted.plaintext(), Some("chacha"));
        assert_eq!(chat.eavesdropper_knowledge().algorithm, "ChaCha20-Poly1305");
    }

    #[test]
    fn test_log_records_lifecycle() {
        let mut chat = SymmetricChat::with_config(Config::default());
        chat.generate_keys().unwrap();
        chat.send(Principal::Alice, "one").unwrap();

        let kinds: Vec<OperationKind> = chat.log().entries().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                OperationKind::Initialization,
                OperationKind::KeyGeneration,
                OperationKind::Encryption,
                OperationKind::Decryption,
            ]
        );
        let knowledge = chat.eavesdropper_knowledge();
        assert_eq!(knowledge.intercepted.len(), 1);
        assert_eq!(knowledge.last_ciphertext_bytes, Some(12 + 3 + 16));
    }
}
