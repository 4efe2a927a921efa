// Состояние демо-сессии
// Один владелец ключей сторон, истории сообщений и журнала операций.
// Все мутации через &mut self.

use crate::crypto::keys::{AsymmetricKeyPair, AsymmetricPublicKey, SymmetricKey, ToyRsaParameters};
use crate::error::{LabError, Result};
use crate::protocol::messages::{Message, Principal};
use crate::state::operation_log::{OperationKind, OperationLog, OperationLogEntry, SYSTEM_ACTOR};
use crate::state::views::Exchange;
use std::collections::HashMap;
use tracing::info;

/// Ключевой материал одной стороны
#[derive(Debug)]
pub enum KeyMaterial {
    /// Общий ключ (у обеих сторон одна и та же копия)
    Symmetric(SymmetricKey),
    Asymmetric(AsymmetricKeyPair),
    ToyRsa(ToyRsaParameters),
    DiffieHellman { private_exponent: u64, public_value: u64 },
}

impl KeyMaterial {
    fn kind(&self) -> &'static str {
        match self {
            KeyMaterial::Symmetric(_) => "symmetric key",
            KeyMaterial::Asymmetric(_) => "RSA key pair",
            KeyMaterial::ToyRsa(_) => "toy RSA parameters",
            KeyMaterial::DiffieHellman { .. } => "DH private exponent",
        }
    }
}

/// Сессия одного демо
#[derive(Debug)]
pub struct Session {
    demo: &'static str,
    parties: HashMap<Principal, KeyMaterial>,
    messages: Vec<Message>,
    log: OperationLog,
}

impl Session {
    /// Новая сессия с записью инициализации в журнале
    pub fn new(demo: &'static str, algorithm: &str) -> Self {
        let mut log = OperationLog::new();
        log.append(
            OperationLogEntry::new(
                SYSTEM_ACTOR,
                OperationKind::Initialization,
                format!("{} demo initialized", demo),
                algorithm,
            ),
        );

        info!(target: "lab::session", demo, algorithm, "Session initialized");

        Self {
            demo,
            parties: HashMap::new(),
            messages: Vec::new(),
            log,
        }
    }

    /// Установить (или заменить) ключи стороны
    pub fn install_keys(&mut self, principal: Principal, material: KeyMaterial) {
        info!(
            target: "lab::session",
            demo = self.demo,
            principal = principal.name(),
            kind = material.kind(),
            "Key material installed"
        );
        self.parties.insert(principal, material);
    }

    pub fn has_keys(&self, principal: Principal) -> bool {
        self.parties.contains_key(&principal)
    }

    pub fn keys(&self, principal: Principal) -> Result<&KeyMaterial> {
        self.parties.get(&principal).ok_or_else(|| {
            LabError::key_not_ready(format!("{} has no key material yet", principal))
        })
    }

    pub fn symmetric_key(&self, principal: Principal) -> Result<&SymmetricKey> {
        match self.keys(principal)? {
            KeyMaterial::Symmetric(key) => Ok(key),
            other => Err(Self::wrong_kind(principal, "symmetric key", other)),
        }
    }

    pub fn key_pair(&self, principal: Principal) -> Result<&AsymmetricKeyPair> {
        match self.keys(principal)? {
            KeyMaterial::Asymmetric(pair) => Ok(pair),
            other => Err(Self::wrong_kind(principal, "RSA key pair", other)),
        }
    }

    pub fn public_key(&self, principal: Principal) -> Result<&AsymmetricPublicKey> {
        Ok(self.key_pair(principal)?.public_key())
    }

    pub fn toy_rsa(&self, principal: Principal) -> Result<&ToyRsaParameters> {
        match self.keys(principal)? {
            KeyMaterial::ToyRsa(params) => Ok(params),
            other => Err(Self::wrong_kind(principal, "toy RSA parameters", other)),
        }
    }

    /// (private_exponent, public_value)
    pub fn dh_exponent(&self, principal: Principal) -> Result<(u64, u64)> {
        match self.keys(principal)? {
            KeyMaterial::DiffieHellman {
                private_exponent,
                public_value,
            } => Ok((*private_exponent, *public_value)),
            other => Err(Self::wrong_kind(principal, "DH private exponent", other)),
        }
    }

    /// Сбросить ключи всех сторон
    pub fn clear_keys(&mut self) {
        self.parties.clear();
    }

    pub fn record(&mut self, entry: OperationLogEntry) {
        self.log.append(entry);
    }

    /// Сохранить сообщение и его записи журнала
    pub fn record_exchange(&mut self, exchange: &Exchange) {
        self.messages.push(exchange.message.clone());
        for entry in &exchange.log_entries {
            self.log.append(entry.clone());
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Сообщения, которые видит сторона (отправленные и полученные)
    pub fn messages_for(&self, principal: Principal) -> impl Iterator<Item = &Message> {
        self.messages
            .iter()
            .filter(move |m| m.sender() == principal || m.recipient() == principal)
    }

    pub fn log(&self) -> &OperationLog {
        &self.log
    }

    fn wrong_kind(principal: Principal, expected: &str, found: &KeyMaterial) -> LabError {
        LabError::key_not_ready(format!(
            "{} has {} instead of {}",
            principal,
            found.kind(),
            expected
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::choose_toy_rsa_parameters;

    #[test]
    fn test_new_session_logs_initialization() {
        let session = Session::new("Symmetric", "AES-256-GCM");
        assert_eq!(session.log().len(), 1);
        assert_eq!(session.log().entries()[0].kind, OperationKind::Initialization);
        assert_eq!(session.log().entries()[0].actor, SYSTEM_ACTOR);
    }

    #[test]
    fn test_missing_keys_is_key_not_ready() {
        let session = Session::new("Symmetric", "AES-256-GCM");
        assert!(!session.has_keys(Principal::Alice));
        assert!(matches!(session.symmetric_key(Principal::Alice), Err(LabError::KeyNotReady(_))));
    }

    #[test]
    fn test_wrong_kind_is_key_not_ready() {
        let mut session = Session::new("Toy RSA", "RSA");
        session.install_keys(Principal::Alice, KeyMaterial::ToyRsa(choose_toy_rsa_parameters(11, 13).unwrap()));
        assert_eq!(session.toy_rsa(Principal::Alice).unwrap().n, 143);
        assert!(matches!(session.key_pair(Principal::Alice), Err(LabError::KeyNotReady(_))));
    }

    #[test]
    fn test_dh_exponent_lookup() {
        let mut session = Session::new("Diffie-Hellman", "DH");
        session.install_keys(
            Principal::Bob,
            KeyMaterial::DiffieHellman { private_exponent: 15, public_value: 19 },
        );
        assert_eq!(session.dh_exponent(Principal::Bob).unwrap(), (15, 19));
        session.clear_keys();
        assert!(!session.has_keys(Principal::Bob));
    }
}
