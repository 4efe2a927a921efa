//! Модульная арифметика для toy RSA и Diffie-Hellman
//!
//! Возведение в степень идёт через `BigUint`: уже при простых порядка сотни
//! промежуточное `n·n` не помещается в 32 бита, а в демо пользователь может
//! ввести большие экспоненты.

use crate::error::{LabError, Result};
use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

/// base^exponent mod modulus, square-and-multiply.
///
/// modulus = 0 → `InvalidInput`. exponent = 0 → `1 mod modulus`.
pub fn mod_pow(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> Result<BigUint> {
    if modulus.is_zero() {
        return Err(LabError::invalid_input("Modulus must be positive"));
    }

    // 1 % 1 == 0, поэтому modulus = 1 сразу даёт 0
    let mut result = BigUint::one() % modulus;
    let mut base = base % modulus;
    let mut exponent = exponent.clone();

    while !exponent.is_zero() {
        if exponent.bit(0) {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
        exponent >>= 1u32;
    }

    Ok(result)
}

/// `mod_pow` для toy-значений
pub fn mod_pow_u64(base: u64, exponent: u64, modulus: u64) -> Result<u64> {
    let result = mod_pow(
        &BigUint::from(base),
        &BigUint::from(exponent),
        &BigUint::from(modulus),
    )?;

    // result < modulus <= u64::MAX
    result
        .to_u64()
        .ok_or_else(|| LabError::invalid_input("Result does not fit into u64"))
}

/// Наибольший общий делитель (алгоритм Евклида)
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let remainder = a % b;
        a = b;
        b = remainder;
    }
    a
}

/// Обратный элемент e по модулю phi (расширенный алгоритм Евклида).
///
/// Возвращает d в [0, phi) такое, что e·d ≡ 1 (mod phi).
pub fn mod_inverse(e: u64, phi: u64) -> Result<u64> {
    if phi == 0 {
        return Err(LabError::invalid_input("Modulus must be positive"));
    }
    if gcd(e, phi) != 1 {
        return Err(LabError::NoModularInverse {
            value: e,
            modulus: phi,
        });
    }
    if phi == 1 {
        return Ok(0);
    }

    // Инвариант: old_r ≡ old_s·e (mod phi)
    let modulus = i128::from(phi);
    let (mut old_r, mut r) = (i128::from(e) % modulus, modulus);
    let (mut old_s, mut s) = (1i128, 0i128);

    while r != 0 {
        let quotient = old_r / r;
        (old_r, r) = (r, old_r - quotient * r);
        (old_s, s) = (s, old_s - quotient * s);
    }

    let d = old_s.rem_euclid(modulus);
    u64::try_from(d).map_err(|_| LabError::invalid_input("Inverse does not fit into u64"))
}

/// Ленивая последовательность e в [2, phi) с gcd(e, phi) = 1,
/// по возрастанию, не более `limit` элементов.
pub fn find_coprime_exponents(phi: u64, limit: usize) -> impl Iterator<Item = u64> {
    (2..phi).filter(move |e| gcd(*e, phi) == 1).take(limit)
}

/// Проверка простоты перебором делителей (достаточно для toy-значений)
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }

    let mut divisor = 3u64;
    while divisor <= n / divisor {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod_pow_known_values() {
        assert_eq!(mod_pow_u64(4, 7, 143).unwrap(), 82);
        assert_eq!(mod_pow_u64(82, 103, 143).unwrap(), 4);
        assert_eq!(mod_pow_u64(5, 6, 23).unwrap(), 8);
        assert_eq!(mod_pow_u64(5, 15, 23).unwrap(), 19);
    }

    #[test]
    fn test_mod_pow_zero_exponent() {
        assert_eq!(mod_pow_u64(42, 0, 97).unwrap(), 1);
        assert_eq!(mod_pow_u64(42, 0, 1).unwrap(), 0);
    }

    #[test]
    fn test_mod_pow_zero_modulus_is_rejected() {
        assert!(matches!(mod_pow_u64(2, 3, 0), Err(LabError::InvalidInput(_))));
    }

    #[test]
    fn test_mod_pow_large_intermediates() {
        // (2^64 - 1)^2 переполнил бы u64 без big-int промежуточных значений
        let m = u64::MAX - 58; // 18446744073709551557, простое
        assert_eq!(mod_pow_u64(m - 1, 2, m).unwrap(), 1);
    }

    #[test]
    fn test_mod_pow_biguint_matches_builtin() {
        let base = BigUint::from(123_456_789u64);
        let exponent = BigUint::from(65537u64);
        let modulus = BigUint::parse_bytes(b"340282366920938463463374607431768211297", 10).unwrap();
        assert_eq!(
            mod_pow(&base, &exponent, &modulus).unwrap(),
            base.modpow(&exponent, &modulus)
        );
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(48, 18), 6);
        assert_eq!(gcd(7, 120), 1);
        assert_eq!(gcd(0, 5), 5);
        assert_eq!(gcd(5, 0), 5);
    }

    #[test]
    fn test_mod_inverse() {
        assert_eq!(mod_inverse(7, 120).unwrap(), 103);
        assert_eq!(mod_inverse(3, 11).unwrap(), 4);
        assert_eq!(mod_inverse(5, 1).unwrap(), 0);
    }

    #[test]
    fn test_mod_inverse_reduces_large_e() {
        // e > phi тоже допустимо
        assert_eq!(mod_inverse(127, 120).unwrap(), 103);
    }

    #[test]
    fn test_mod_inverse_not_coprime() {
        assert_eq!(
            mod_inverse(4, 8),
            Err(LabError::NoModularInverse { value: 4, modulus: 8 })
        );
    }

    #[test]
    fn test_find_coprime_exponents_first_five() {
        let candidates: Vec<u64> = find_coprime_exponents(120, 5).collect();
        assert_eq!(candidates, vec![7, 11, 13, 17, 19]);
    }

    #[test]
    fn test_find_coprime_exponents_is_restartable() {
        let first: Vec<u64> = find_coprime_exponents(96, 5).collect();
        let second: Vec<u64> = find_coprime_exponents(96, 5).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![5, 7, 11, 13, 17]);
    }

    #[test]
    fn test_find_coprime_exponents_small_phi() {
        assert_eq!(find_coprime_exponents(2, 5).count(), 0);
        assert_eq!(find_coprime_exponents(4, 5).collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_is_prime() {
        assert!(is_prime(2));
        assert!(is_prime(13));
        assert!(is_prime(97));
        assert!(!is_prime(0));
        assert!(!is_prime(1));
        assert!(!is_prime(91));
        assert!(!is_prime(100));
    }
}
