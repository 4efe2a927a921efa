// Toy RSA на малых целых
// C = M^e mod n, M = C^d mod n

use crate::crypto::arithmetic::mod_pow_u64;
use crate::crypto::keys::ToyRsaParameters;
use crate::error::{LabError, Result};

/// Зашифровать целое сообщение: c = m^e mod n. Требует m < n.
pub fn encrypt_int(m: u64, e: u64, n: u64) -> Result<u64> {
    ensure_below_modulus("Message", m, n)?;
    mod_pow_u64(m, e, n)
}

/// Расшифровать: m' = c^d mod n. Требует c < n.
pub fn decrypt_int(c: u64, d: u64, n: u64) -> Result<u64> {
    ensure_below_modulus("Ciphertext", c, n)?;
    mod_pow_u64(c, d, n)
}

fn ensure_below_modulus(what: &str, value: u64, n: u64) -> Result<()> {
    if n == 0 || value >= n {
        return Err(LabError::InvalidInput(format!(
            "{} must be less than n={} (got {})",
            what, n, value
        )));
    }
    Ok(())
}

impl ToyRsaParameters {
    pub fn encrypt(&self, m: u64) -> Result<u64> {
        encrypt_int(m, self.e, self.n)
    }

    pub fn decrypt(&self, c: u64) -> Result<u64> {
        decrypt_int(c, self.d, self.n)
    }
}
