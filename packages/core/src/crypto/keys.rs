// Ключевой материал
// Симметричные ключи, RSA пары и toy RSA параметры

use crate::crypto::arithmetic::{find_coprime_exponents, is_prime, mod_inverse};
use crate::error::{LabError, Result};
use crate::utils::{b64, hex};
use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{BigUint as RsaBigUint, RsaPrivateKey, RsaPublicKey};
use serde::Serialize;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Длина симметричного ключа (AES-256 / ChaCha20)
pub const SYMMETRIC_KEY_LENGTH: usize = 32;

// ============================================================================
// Symmetric
// ============================================================================

/// Общий симметричный ключ сессии.
///
/// Обнуляется при drop. `Debug` не печатает байты ключа.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey([u8; SYMMETRIC_KEY_LENGTH]);

impl SymmetricKey {
    /// Новый ключ из OS CSPRNG
    pub fn generate() -> Self {
        let mut bytes = [0u8; SYMMETRIC_KEY_LENGTH];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; SYMMETRIC_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SYMMETRIC_KEY_LENGTH] {
        &self.0
    }

    /// Lowercase hex, только для отображения владельцам
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn to_base64(&self) -> String {
        b64::encode(&self.0)
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey(<redacted>)")
    }
}

/// Сгенерировать симметричный ключ (32 байта, CSPRNG)
pub fn generate_symmetric_key() -> SymmetricKey {
    SymmetricKey::generate()
}

// ============================================================================
// Asymmetric (production scale)
// ============================================================================

/// Публичная половина RSA пары, её можно раздавать
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsymmetricPublicKey {
    inner: RsaPublicKey,
    exponent: u64,
}

impl AsymmetricPublicKey {
    pub(crate) fn rsa(&self) -> &RsaPublicKey {
        &self.inner
    }

    /// Модуль n в lowercase hex
    pub fn modulus_hex(&self) -> String {
        hex::encode(&self.inner.n().to_bytes_be())
    }

    pub fn exponent(&self) -> u64 {
        self.exponent
    }

    /// Размер модуля в битах
    pub fn bits(&self) -> usize {
        self.inner.size() * 8
    }
}

/// Приватная половина. Не `Clone`: живёт только у владельца.
pub struct AsymmetricPrivateKey {
    inner: RsaPrivateKey,
}

impl AsymmetricPrivateKey {
    pub(crate) fn rsa(&self) -> &RsaPrivateKey {
        &self.inner
    }

    /// Приватная экспонента d в lowercase hex (для отображения владельцу)
    pub fn private_exponent_hex(&self) -> String {
        hex::encode(&self.inner.d().to_bytes_be())
    }
}

impl fmt::Debug for AsymmetricPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AsymmetricPrivateKey(<redacted>)")
    }
}

/// RSA пара ключей одной стороны
#[derive(Debug)]
pub struct AsymmetricKeyPair {
    public: AsymmetricPublicKey,
    private: AsymmetricPrivateKey,
}

impl AsymmetricKeyPair {
    /// Сгенерировать пару заданного размера с заданной публичной экспонентой
    pub fn generate(bits: usize, public_exponent: u64) -> Result<Self> {
        let exponent = RsaBigUint::from(public_exponent);
        let private = RsaPrivateKey::new_with_exp(&mut OsRng, bits, &exponent)
            .map_err(|e| LabError::KeyGenerationError(e.to_string()))?;
        let public = RsaPublicKey::from(&private);

        Ok(Self {
            public: AsymmetricPublicKey {
                inner: public,
                exponent: public_exponent,
            },
            private: AsymmetricPrivateKey { inner: private },
        })
    }

    pub fn public_key(&self) -> &AsymmetricPublicKey {
        &self.public
    }

    pub fn private_key(&self) -> &AsymmetricPrivateKey {
        &self.private
    }
}

// ============================================================================
// Toy RSA
// ============================================================================

/// Параметры toy RSA на малых простых
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToyRsaParameters {
    pub p: u64,
    pub q: u64,
    pub n: u64,
    pub phi: u64,
    pub e: u64,
    pub d: u64,
}

impl ToyRsaParameters {
    /// Вычислить n, φ, e (первый взаимно простой кандидат) и d
    pub fn choose(p: u64, q: u64) -> Result<Self> {
        let (n, phi) = Self::modulus_and_totient(p, q)?;
        let e = find_coprime_exponents(phi, 1)
            .next()
            .ok_or_else(|| LabError::invalid_input(format!("No exponent candidates for phi={}", phi)))?;
        Self::assemble(p, q, n, phi, e)
    }

    /// То же, что `choose`, но с явно выбранной экспонентой e
    pub fn with_exponent(p: u64, q: u64, e: u64) -> Result<Self> {
        let (n, phi) = Self::modulus_and_totient(p, q)?;
        if e < 2 || e >= phi {
            return Err(LabError::invalid_input(format!(
                "Exponent e must be in [2, {}), got {}",
                phi, e
            )));
        }
        Self::assemble(p, q, n, phi, e)
    }

    /// Первые `limit` взаимно простых с φ кандидатов по возрастанию
    pub fn exponent_candidates(&self, limit: usize) -> Vec<u64> {
        find_coprime_exponents(self.phi, limit).collect()
    }

    fn modulus_and_totient(p: u64, q: u64) -> Result<(u64, u64)> {
        if p == q {
            return Err(LabError::invalid_input("Primes p and q must be distinct"));
        }
        for value in [p, q] {
            if !is_prime(value) {
                return Err(LabError::invalid_input(format!("{} is not prime", value)));
            }
        }

        let n = p
            .checked_mul(q)
            .ok_or_else(|| LabError::invalid_input("p·q does not fit into u64"))?;
        let phi = (p - 1) * (q - 1);
        Ok((n, phi))
    }

    fn assemble(p: u64, q: u64, n: u64, phi: u64, e: u64) -> Result<Self> {
        let d = mod_inverse(e, phi)?;
        Ok(Self { p, q, n, phi, e, d })
    }
}

/// Выбрать toy RSA параметры для (p, q)
pub fn choose_toy_rsa_parameters(p: u64, q: u64) -> Result<ToyRsaParameters> {
    ToyRsaParameters::choose(p, q)
}

/// Два различных простых из проверенного списка
pub fn random_prime_pair(primes: &[u64]) -> Result<(u64, u64)> {
    if primes.len() < 2 {
        return Err(LabError::invalid_input("Need at least two primes to choose from"));
    }

    let mut rng = OsRng;
    let p_index = rng.gen_range(0..primes.len());
    // Сдвиг на 1..len гарантирует другой индекс
    let q_index = (p_index + rng.gen_range(1..primes.len())) % primes.len();
    Ok((primes[p_index], primes[q_index]))
}
