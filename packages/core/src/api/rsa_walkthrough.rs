// Пошаговый toy RSA
// Bob выбирает p, q, e; Alice шифрует целое m его публичным ключом (n, e).
// Все промежуточные значения видны владельцам, Eve видит только n, e, c.

use crate::config::Config;
use crate::crypto::keys::{random_prime_pair, ToyRsaParameters};
use crate::error::Result;
use crate::protocol::messages::Principal;
use crate::state::operation_log::{OperationKind, OperationLog, OperationLogEntry};
use crate::state::session::{KeyMaterial, Session};
use serde::{Deserialize, Serialize};
use tracing::info;

const ALGORITHM: &str = "Toy RSA";

/// Владелец пары в walkthrough
pub const KEY_OWNER: Principal = Principal::Bob;

/// Ввод пользователя для генерации ключей
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToyRsaConfig {
    pub p: u64,
    pub q: u64,
    /// Явная экспонента; `None` = первый взаимно простой кандидат
    pub e: Option<u64>,
}

/// Результат генерации: параметры и кандидаты для e
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToyRsaKeyReport {
    pub parameters: ToyRsaParameters,
    pub exponent_candidates: Vec<u64>,
}

/// Что видит Eve: публичный ключ и ciphertext
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToyRsaEavesdropperView {
    pub n: u64,
    pub e: u64,
    pub c: u64,
}

/// Одна зашифровка/расшифровка
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToyRsaExchange {
    pub m: u64,
    pub e: u64,
    pub d: u64,
    pub n: u64,
    pub c: u64,
    pub decrypted: u64,
    pub eavesdropper: ToyRsaEavesdropperView,
}

pub struct RsaWalkthrough {
    config: Config,
    session: Session,
}

impl RsaWalkthrough {
    pub fn new() -> Self {
        Self::with_config(Config::global().clone())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            session: Session::new("Toy RSA walkthrough", ALGORITHM),
        }
    }

    /// Два различных простых из проверенного списка
    pub fn randomize_primes(&self) -> Result<(u64, u64)> {
        random_prime_pair(&self.config.toy_primes)
    }

    /// Вычислить n, φ, e, d для выбранных p и q
    pub fn generate_keys(&mut self, input: ToyRsaConfig) -> Result<ToyRsaKeyReport> {
        let parameters = match input.e {
            Some(e) => ToyRsaParameters::with_exponent(input.p, input.q, e)?,
            None => ToyRsaParameters::choose(input.p, input.q)?,
        };
        let exponent_candidates = parameters.exponent_candidates(self.config.coprime_candidate_limit);

        self.session.record(
            OperationLogEntry::new(
                KEY_OWNER.name(),
                OperationKind::KeyGeneration,
                "Toy RSA key pair computed",
                ALGORITHM,
            )
            .detail("p", parameters.p)
            .detail("q", parameters.q)
            .detail("n", parameters.n)
            .detail("phi", parameters.phi)
            .detail("e", parameters.e),
        );
        self.session.install_keys(KEY_OWNER, KeyMaterial::ToyRsa(parameters));

        info!(
            target: "lab::session",
            n = parameters.n,
            e = parameters.e,
            "Toy RSA parameters computed"
        );

        Ok(ToyRsaKeyReport {
            parameters,
            exponent_candidates,
        })
    }

    pub fn parameters(&self) -> Result<&ToyRsaParameters> {
        self.session.toy_rsa(KEY_OWNER)
    }

    /// Кандидаты e для текущего φ
    pub fn exponent_candidates(&self) -> Result<Vec<u64>> {
        Ok(self
            .parameters()?
            .exponent_candidates(self.config.coprime_candidate_limit))
    }

    /// Alice шифрует m, Bob расшифровывает
    pub fn send(&mut self, m: u64) -> Result<ToyRsaExchange> {
        let params = *self.parameters()?;
        let c = params.encrypt(m)?;
        let decrypted = params.decrypt(c)?;

        self.session.record(
            OperationLogEntry::new(
                KEY_OWNER.peer().name(),
                OperationKind::Encryption,
                format!("Encrypted integer message for {}", KEY_OWNER),
                ALGORITHM,
            )
            .detail("n", params.n)
            .detail("e", params.e)
            .detail("c", c),
        );
        self.session.record(OperationLogEntry::new(
            KEY_OWNER.name(),
            OperationKind::Decryption,
            format!("Decrypted integer message from {}", KEY_OWNER.peer()),
            ALGORITHM,
        ));

        Ok(ToyRsaExchange {
            m,
            e: params.e,
            d: params.d,
            n: params.n,
            c,
            decrypted,
            eavesdropper: ToyRsaEavesdropperView {
                n: params.n,
                e: params.e,
                c,
            },
        })
    }

    pub fn log(&self) -> &OperationLog {
        self.session.log()
    }
}

impl Default for RsaWalkthrough {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LabError;

    #[test]
    fn test_reference_walkthrough() {
        let mut demo = RsaWalkthrough::with_config(Config::default());
        let report = demo.generate_keys(ToyRsaConfig { p: 11, q: 13, e: None }).unwrap();
        assert_eq!(report.parameters.n, 143);
        assert_eq!(report.parameters.e, 7);
        assert_eq!(report.parameters.d, 103);
        assert_eq!(report.exponent_candidates, vec![7, 11, 13, 17, 19]);

        let exchange = demo.send(4).unwrap();
        assert_eq!(exchange.c, 82);
        assert_eq!(exchange.decrypted, 4);
        assert_eq!(exchange.eavesdropper, ToyRsaEavesdropperView { n: 143, e: 7, c: 82 });
    }

    #[test]
    fn test_before_keys_is_key_not_ready() {
        let mut demo = RsaWalkthrough::with_config(Config::default());
        assert!(matches!(demo.send(4), Err(LabError::KeyNotReady(_))));
        assert!(matches!(demo.exponent_candidates(), Err(LabError::KeyNotReady(_))));
    }

    #[test]
    fn test_message_not_below_modulus() {
        let mut demo = RsaWalkthrough::with_config(Config::default());
        demo.generate_keys(ToyRsaConfig { p: 11, q: 13, e: Some(11) }).unwrap();
        assert_eq!(demo.parameters().unwrap().d, 11);
        assert!(matches!(demo.send(143), Err(LabError::InvalidInput(_))));
    }

    #[test]
    fn test_random_primes_generate_valid_keys() {
        let mut demo = RsaWalkthrough::with_config(Config::default());
        for _ in 0..20 {
            let (p, q) = demo.randomize_primes().unwrap();
            let report = demo.generate_keys(ToyRsaConfig { p, q, e: None }).unwrap();
            let params = report.parameters;
            assert_eq!((params.e * params.d) % params.phi, 1);
        }
    }

    #[test]
    fn test_log_never_contains_private_exponent() {
        let mut demo = RsaWalkthrough::with_config(Config::default());
        demo.generate_keys(ToyRsaConfig { p: 11, q: 13, e: None }).unwrap();
        demo.send(4).unwrap();
        for entry in demo.log().entries() {
            assert!(entry.get("d").is_none());
        }
    }
}
