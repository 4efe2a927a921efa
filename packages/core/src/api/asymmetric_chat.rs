// Асимметричный чат
// У каждой стороны своя RSA пара; шифруем публичным ключом получателя

use crate::config::Config;
use crate::crypto::channel::Channel;
use crate::crypto::keys::{AsymmetricKeyPair, AsymmetricPublicKey};
use crate::crypto::suites::rsa::RsaChannel;
use crate::error::{LabError, Result};
use crate::protocol::messages::{Message, Principal};
use crate::state::operation_log::{OperationKind, OperationLog, OperationLogEntry};
use crate::state::session::{KeyMaterial, Session};
use crate::state::views::{Direction, EavesdropperView, ThreePartyObservation, ThreePartyView};
use crate::utils::b64;
use serde::Serialize;
use tracing::info;

/// Публичный ключ стороны (то, что видят все, включая Eve)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyReport {
    pub owner: Principal,
    pub modulus_hex: String,
    pub exponent: u64,
    pub bits: usize,
}

impl PublicKeyReport {
    fn new(owner: Principal, key: &AsymmetricPublicKey) -> Self {
        Self {
            owner,
            modulus_hex: key.modulus_hex(),
            exponent: key.exponent(),
            bits: key.bits(),
        }
    }
}

/// Пара ключей для отображения владельцу
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPairReport {
    pub public: PublicKeyReport,
    pub private_exponent_hex: String,
    pub max_plaintext_bytes: usize,
}

/// Что Eve знает об асимметричном чате
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AsymmetricEavesdropperKnowledge {
    pub algorithm: &'static str,
    pub public_keys: Vec<PublicKeyReport>,
    pub intercepted: Vec<EavesdropperView>,
    pub last_ciphertext_bytes: Option<usize>,
}

pub struct AsymmetricChat {
    channel: RsaChannel,
    config: Config,
    session: Session,
}

impl AsymmetricChat {
    pub fn new() -> Self {
        Self::with_config(Config::global().clone())
    }

    pub fn with_config(config: Config) -> Self {
        let channel = RsaChannel::new();
        let session = Session::new("Asymmetric chat", channel.algorithm());
        Self {
            channel,
            config,
            session,
        }
    }

    /// Сгенерировать (или перегенерировать) RSA пару одной стороны
    pub fn generate_keys(&mut self, principal: Principal) -> Result<KeyPairReport> {
        let pair = AsymmetricKeyPair::generate(self.config.rsa_key_bits, self.config.rsa_public_exponent)?;
        let report = KeyPairReport {
            public: PublicKeyReport::new(principal, pair.public_key()),
            private_exponent_hex: pair.private_key().private_exponent_hex(),
            max_plaintext_bytes: RsaChannel::max_plaintext_len(pair.public_key()),
        };

        self.session.record(
            OperationLogEntry::new(
                principal.name(),
                OperationKind::KeyGeneration,
                "RSA key pair generated",
                self.channel.algorithm(),
            )
            .detail("Key Size", format!("{}-bit RSA", report.public.bits))
            .detail("Public Exponent", report.public.exponent),
        );
        self.session.install_keys(principal, KeyMaterial::Asymmetric(pair));

        info!(
            target: "lab::session",
            principal = principal.name(),
            bits = report.public.bits,
            "RSA key pair generated"
        );

        Ok(report)
    }

    /// Ключи для Alice и Bob
    pub fn generate_all_keys(&mut self) -> Result<Vec<KeyPairReport>> {
        [Principal::Alice, Principal::Bob]
            .into_iter()
            .map(|principal| self.generate_keys(principal))
            .collect()
    }

    pub fn public_key(&self, principal: Principal) -> Result<PublicKeyReport> {
        Ok(PublicKeyReport::new(principal, self.session.public_key(principal)?))
    }

    /// Отправить сообщение: нужен ключ получателя
    pub fn send(&mut self, from: Principal, plaintext: &str) -> Result<ThreePartyObservation> {
        let to = from.peer();
        let exchange = {
            let recipient = self.session.key_pair(to)?;

            let plaintext = plaintext.trim();
            if plaintext.is_empty() {
                return Err(LabError::invalid_input("Message must not be empty"));
            }

            ThreePartyView::new(&self.channel)
                .with_preview_chars(self.config.ciphertext_preview_chars)
                .send(from, plaintext, recipient.public_key(), recipient.private_key())?
        };

        self.session.record_exchange(&exchange);
        Ok(exchange.observation)
    }

    /// Попробовать расшифровать envelope приватным ключом стороны
    pub fn open(&mut self, principal: Principal, envelope_b64: &str) -> Result<String> {
        let private_key = self.session.key_pair(principal)?.private_key();
        let envelope = b64::decode(envelope_b64)?;
        let result = self.channel.decrypt(&envelope, private_key);

        let action = match result {
            Ok(_) => "Opened envelope with own private key",
            Err(_) => "Failed to open envelope",
        };
        self.session.record(
            OperationLogEntry::new(
                principal.name(),
                OperationKind::Decryption,
                action,
                self.channel.algorithm(),
            )
            .sizes(result.as_ref().ok().map(String::len), Some(envelope.len())),
        );

        result
    }

    pub fn eavesdropper_knowledge(&self) -> AsymmetricEavesdropperKnowledge {
        let public_keys = [Principal::Alice, Principal::Bob]
            .into_iter()
            .filter_map(|p| self.public_key(p).ok())
            .collect();

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

        AsymmetricEavesdropperKnowledge {
            algorithm: self.channel.algorithm(),
            public_keys,
            last_ciphertext_bytes: intercepted.last().map(|v| v.ciphertext_bytes),
            intercepted,
        }
    }

    pub fn messages(&self) -> &[Message] {
        self.session.messages()
    }

    pub fn log(&self) -> &OperationLog {
        self.session.log()
    }
}

impl Default for AsymmetricChat {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::views::Decryption;

    fn small_config() -> Config {
        let mut config = Config::default();
        config.rsa_key_bits = 512;
        config
    }

    #[test]
    fn test_send_requires_recipient_keys() {
        let mut chat = AsymmetricChat::with_config(small_config());
        chat.generate_keys(Principal::Alice).unwrap();
        // У Bob ещё нет пары
        assert!(matches!(chat.send(Principal::Alice, "hi"), Err(LabError::KeyNotReady(_))));
    }

    #[test]
    fn test_open_before_keys_is_key_not_ready() {
        let mut chat = AsymmetricChat::with_config(small_config());
        assert!(matches!(chat.open(Principal::Alice, "not base64!"), Err(LabError::KeyNotReady(_))));
    }

    #[test]
    fn test_round_trip_and_eve_knowledge() {
        let mut chat = AsymmetricChat::with_config(small_config());
        let reports = chat.generate_all_keys().unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].public.exponent, 65537);
        assert_ne!(reports[0].public.modulus_hex, reports[1].public.modulus_hex);

        let obs = chat.send(Principal::Alice, "hello bob").unwrap();
        assert_eq!(obs.receiver.decrypted, Decryption::Plaintext("hello bob".to_string()));
        assert_eq!(obs.eavesdropper.ciphertext_bytes, 64);

        let eve = serde_json::to_string(&chat.eavesdropper_knowledge()).unwrap();
        assert!(!eve.contains("hello bob"));
        for report in &reports {
            assert!(!eve.contains(&report.private_exponent_hex));
            assert!(eve.contains(&report.public.modulus_hex));
        }
    }

    #[test]
    fn test_open_with_wrong_private_key_fails() {
        let mut chat = AsymmetricChat::with_config(small_config());
        chat.generate_all_keys().unwrap();
        let obs = chat.send(Principal::Alice, "for bob only").unwrap();

        assert_eq!(chat.open(Principal::Bob, &obs.eavesdropper.ciphertext).unwrap(), "for bob only");
        assert_eq!(
            chat.open(Principal::Alice, &obs.eavesdropper.ciphertext),
            Err(LabError::DecryptionFailed)
        );
    }
}
