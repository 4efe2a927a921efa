//! Diffie-Hellman key agreement на малых целых
//!
//! ## Dataflow
//! ```text
//! Alice                         public: p, g                         Bob
//! =====                                                              ===
//! a (секрет)                                                   b (секрет)
//! A = g^a mod p  ───────────────── A ─────────────────▶
//!                ◀──────────────── B ───────────────────  B = g^b mod p
//! s = B^a mod p                                            s = A^b mod p
//!
//! Eve видит только p, g, A, B
//! ```
//!
//! Корректность: `(g^b)^a ≡ (g^a)^b (mod p)`, поэтому обе стороны получают
//! одинаковый s.

use crate::crypto::arithmetic::mod_pow_u64;
use crate::error::{LabError, Result};
use rand::rngs::OsRng;
use rand::Rng;
use serde::Serialize;

/// Публичные параметры группы
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DhParameters {
    /// Модуль
    pub p: u64,
    /// Генератор
    pub g: u64,
}

impl DhParameters {
    pub fn new(p: u64, g: u64) -> Result<Self> {
        if p < 2 {
            return Err(LabError::InvalidInput(format!(
                "DH modulus must be at least 2, got {}",
                p
            )));
        }
        Ok(Self { p, g })
    }

    pub fn public_value(&self, private_exp: u64) -> Result<u64> {
        derive_public_value(self.g, private_exp, self.p)
    }

    pub fn shared_secret(&self, other_public: u64, own_private_exp: u64) -> Result<u64> {
        derive_shared_secret(other_public, own_private_exp, self.p)
    }
}

/// A = g^a mod p
pub fn derive_public_value(g: u64, private_exp: u64, p: u64) -> Result<u64> {
    mod_pow_u64(g, private_exp, p)
}

/// s = B^a mod p
pub fn derive_shared_secret(other_public: u64, own_private_exp: u64, p: u64) -> Result<u64> {
    mod_pow_u64(other_public, own_private_exp, p)
}

/// Случайная приватная экспонента в [2, p-1)
///
/// Для p <= 3 диапазон пуст, возвращается 2.
pub fn random_private_exponent(p: u64) -> u64 {
    let upper = p.saturating_sub(1);
    if upper <= 2 {
        return 2;
    }
    OsRng.gen_range(2..upper)
}
