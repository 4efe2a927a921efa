// Пошаговый Diffie-Hellman
// Публичные p, g; секретные a, b; Eve видит p, g, A, B

use crate::config::Config;
use crate::crypto::key_agreement::{random_private_exponent, DhParameters};
use crate::error::{LabError, Result};
use crate::protocol::messages::Principal;
use crate::state::operation_log::{OperationKind, OperationLog, OperationLogEntry, SYSTEM_ACTOR};
use crate::state::session::{KeyMaterial, Session};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const ALGORITHM: &str = "Diffie-Hellman";

/// Полный ввод для одного прогона
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhConfig {
    pub p: u64,
    pub g: u64,
    pub a: u64,
    pub b: u64,
}

/// Что видит Eve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DhEavesdropperView {
    pub p: u64,
    pub g: u64,
    pub alice_public: u64,
    pub bob_public: u64,
}

/// Результат согласования
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyAgreementOutcome {
    pub params: DhParameters,
    pub alice_public: u64,
    pub bob_public: u64,
    /// s = B^a mod p
    pub alice_shared: u64,
    /// s = A^b mod p
    pub bob_shared: u64,
    pub matches: bool,
    pub eavesdropper: DhEavesdropperView,
}

pub struct DiffieHellmanWalkthrough {
    /// Err, если p и g из конфигурации не прошли проверку
    params: Result<DhParameters>,
    session: Session,
}

impl DiffieHellmanWalkthrough {
    pub fn new() -> Self {
        Self::with_config(Config::global().clone())
    }

    /// Начать с p и g из конфигурации
    pub fn with_config(config: Config) -> Self {
        let params = DhParameters::new(config.dh_modulus, config.dh_generator);
        if let Err(e) = &params {
            warn!(
                target: "crypto::dh",
                p = config.dh_modulus,
                g = config.dh_generator,
                error = %e,
                "Configured DH parameters rejected"
            );
        }

        Self {
            params,
            session: Session::new("Diffie-Hellman walkthrough", ALGORITHM),
        }
    }

    /// Задать публичные параметры. Старые экспоненты сбрасываются.
    pub fn set_parameters(&mut self, p: u64, g: u64) -> Result<DhParameters> {
        let params = DhParameters::new(p, g)?;
        self.apply_parameters(params);
        Ok(params)
    }

    pub fn parameters(&self) -> Result<DhParameters> {
        self.params.clone()
    }

    /// Выбрать секретную экспоненту стороны, вернуть её публичное значение
    pub fn choose_private_exponent(&mut self, principal: Principal, private_exponent: u64) -> Result<u64> {
        let public_value = Self::public_value_for(self.parameters()?, private_exponent)?;
        self.install_exponent(principal, private_exponent, public_value);
        Ok(public_value)
    }

    fn public_value_for(params: DhParameters, private_exponent: u64) -> Result<u64> {
        if private_exponent == 0 {
            return Err(LabError::invalid_input("Private exponent must be positive"));
        }
        params.public_value(private_exponent)
    }

    fn apply_parameters(&mut self, params: DhParameters) {
        self.params = Ok(params);
        self.session.clear_keys();

        self.session.record(
            OperationLogEntry::new(
                SYSTEM_ACTOR,
                OperationKind::KeyGeneration,
                "Public parameters agreed",
                ALGORITHM,
            )
            .detail("p", params.p)
            .detail("g", params.g),
        );
    }

    fn install_exponent(&mut self, principal: Principal, private_exponent: u64, public_value: u64) {
        self.session.install_keys(
            principal,
            KeyMaterial::DiffieHellman {
                private_exponent,
                public_value,
            },
        );
        self.session.record(
            OperationLogEntry::new(
                principal.name(),
                OperationKind::KeyGeneration,
                "Public value computed",
                ALGORITHM,
            )
            .detail("public", public_value),
        );

        debug!(
            target: "crypto::dh",
            principal = principal.name(),
            public_value,
            "Public value computed"
        );
    }

    /// Случайные a и b в [2, p-1)
    pub fn randomize_private_exponents(&mut self) -> Result<(u64, u64)> {
        let params = self.parameters()?;
        let a = random_private_exponent(params.p);
        let b = random_private_exponent(params.p);
        self.choose_private_exponent(Principal::Alice, a)?;
        self.choose_private_exponent(Principal::Bob, b)?;
        Ok((a, b))
    }

    pub fn public_value(&self, principal: Principal) -> Result<u64> {
        Ok(self.session.dh_exponent(principal)?.1)
    }

    /// Общий секрет с точки зрения стороны: её экспонента и публичное значение собеседника
    pub fn derive_shared_secret(&mut self, principal: Principal) -> Result<u64> {
        let params = self.parameters()?;
        let (own_exponent, _) = self.session.dh_exponent(principal)?;
        let (_, other_public) = self.session.dh_exponent(principal.peer())?;
        let shared = params.shared_secret(other_public, own_exponent)?;

        self.session.record(
            OperationLogEntry::new(
                principal.name(),
                OperationKind::KeyAgreement,
                format!("Shared secret derived from {}'s public value", principal.peer()),
                ALGORITHM,
            )
            .detail("other public", other_public),
        );

        Ok(shared)
    }

    /// Полный прогон: параметры, обе экспоненты, обе стороны секрета
    pub fn agree_key(&mut self, input: DhConfig) -> Result<KeyAgreementOutcome> {
        // Весь ввод проверяется до изменения состояния
        let params = DhParameters::new(input.p, input.g)?;
        let alice_public = Self::public_value_for(params, input.a)?;
        let bob_public = Self::public_value_for(params, input.b)?;

        self.apply_parameters(params);
        self.install_exponent(Principal::Alice, input.a, alice_public);
        self.install_exponent(Principal::Bob, input.b, bob_public);
        let alice_shared = self.derive_shared_secret(Principal::Alice)?;
        let bob_shared = self.derive_shared_secret(Principal::Bob)?;

        let matches = alice_shared == bob_shared;
        info!(
            target: "crypto::dh",
            p = params.p,
            g = params.g,
            matches,
            "Key agreement completed"
        );

        Ok(KeyAgreementOutcome {
            params,
            alice_public,
            bob_public,
            alice_shared,
            bob_shared,
            matches,
            eavesdropper: self.eavesdropper_knowledge()?,
        })
    }

    /// Eve: p, g и оба публичных значения
    pub fn eavesdropper_knowledge(&self) -> Result<DhEavesdropperView> {
        let params = self.parameters()?;
        Ok(DhEavesdropperView {
            p: params.p,
            g: params.g,
            alice_public: self.public_value(Principal::Alice)?,
            bob_public: self.public_value(Principal::Bob)?,
        })
    }

    pub fn log(&self) -> &OperationLog {
        self.session.log()
    }
}

impl Default for DiffieHellmanWalkthrough {
    fn default() -> Self {
        Self::new()
    }
}
