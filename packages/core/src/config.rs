//! Централизованная конфигурация для Crypto Lab Core
//!
//! Все настраиваемые параметры демо определены здесь, чтобы избежать
//! хардкода по всему проекту. Размеры, зафиксированные самими алгоритмами
//! (ключ 32 байта, nonce 12, tag 16), живут как compile-time константы
//! в соответствующих модулях.

use crate::crypto::suites::aead::AeadAlgorithm;
use std::sync::OnceLock;

/// Глобальная конфигурация (синглтон)
static GLOBAL_CONFIG: OnceLock<Config> = OnceLock::new();

/// Основная структура конфигурации
#[derive(Debug, Clone)]
pub struct Config {
    // ============================================
    // СИММЕТРИЧНЫЙ ЧАТ
    // ============================================

    /// AEAD алгоритм для symmetric chat
    pub aead_algorithm: AeadAlgorithm,

    // ============================================
    // АСИММЕТРИЧНЫЙ ЧАТ
    // ============================================

    /// Размер RSA ключа в битах
    pub rsa_key_bits: usize,

    /// Публичная экспонента RSA
    pub rsa_public_exponent: u64,

    // ============================================
    // TOY RSA
    // ============================================

    /// Сколько кандидатов e показывать (первые N по возрастанию)
    pub coprime_candidate_limit: usize,

    /// Список проверенных малых простых чисел для выбора p и q
    pub toy_primes: Vec<u64>,

    // ============================================
    // DIFFIE-HELLMAN
    // ============================================

    /// Модуль p по умолчанию
    pub dh_modulus: u64,

    /// Генератор g по умолчанию
    pub dh_generator: u64,

    // ============================================
    // ЖУРНАЛ ОПЕРАЦИЙ
    // ============================================

    /// Сколько символов ciphertext сохранять в превью журнала
    pub ciphertext_preview_chars: usize,
}

impl Config {
    /// Создать конфигурацию с дефолтными значениями
    pub fn default() -> Self {
        Self {
            aead_algorithm: AeadAlgorithm::Aes256Gcm,

            rsa_key_bits: 1024,
            rsa_public_exponent: 65537,

            coprime_candidate_limit: 5,
            toy_primes: vec![
                3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79,
                83, 89, 97,
            ],

            dh_modulus: 23,
            dh_generator: 5,

            ciphertext_preview_chars: 100,
        }
    }

    /// Создать конфигурацию из переменных окружения
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Переопределяем значения из env, если они заданы
        if let Ok(val) = std::env::var("CRYPTO_LAB_AEAD") {
            if let Some(algorithm) = AeadAlgorithm::parse(&val) {
                config.aead_algorithm = algorithm;
            }
        }

        if let Ok(val) = std::env::var("CRYPTO_LAB_RSA_BITS") {
            if let Ok(parsed) = val.parse() {
                config.rsa_key_bits = parsed;
            }
        }

        if let Ok(val) = std::env::var("CRYPTO_LAB_COPRIME_LIMIT") {
            if let Ok(parsed) = val.parse() {
                config.coprime_candidate_limit = parsed;
            }
        }

        config
    }

    /// Получить глобальный экземпляр конфигурации
    ///
    /// Автоматически инициализирует конфигурацию со значениями по умолчанию при первом вызове
    pub fn global() -> &'static Config {
        GLOBAL_CONFIG.get_or_init(Config::default)
    }

    /// Инициализировать глобальную конфигурацию со значениями по умолчанию
    ///
    /// # Errors
    ///
    /// Возвращает ошибку, если конфигурация уже была инициализирована
    pub fn init() -> Result<(), &'static str> {
        GLOBAL_CONFIG
            .set(Self::default())
            .map_err(|_| "Config already initialized")
    }

    /// Инициализировать глобальную конфигурацию из переменных окружения
    ///
    /// # Errors
    ///
    /// Возвращает ошибку, если конфигурация уже была инициализирована
    pub fn init_from_env() -> Result<(), &'static str> {
        GLOBAL_CONFIG
            .set(Self::from_env())
            .map_err(|_| "Config already initialized")
    }

    /// Инициализировать глобальную конфигурацию с кастомным экземпляром
    ///
    /// # Errors
    ///
    /// Возвращает ошибку, если конфигурация уже была инициализирована
    pub fn init_with(config: Config) -> Result<(), &'static str> {
        GLOBAL_CONFIG
            .set(config)
            .map_err(|_| "Config already initialized")
    }

    /// Проверить, инициализирована ли глобальная конфигурация
    pub fn is_initialized() -> bool {
        GLOBAL_CONFIG.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.aead_algorithm, AeadAlgorithm::Aes256Gcm);
        assert_eq!(config.rsa_key_bits, 1024);
        assert_eq!(config.rsa_public_exponent, 65537);
        assert_eq!(config.coprime_candidate_limit, 5);
    }

    #[test]
    fn test_toy_primes_are_prime_and_sorted() {
        let config = Config::default();
        assert!(config
            .toy_primes
            .iter()
            .all(|p| crate::crypto::arithmetic::is_prime(*p)));
        assert!(config.toy_primes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_dh_defaults() {
        let config = Config::default();
        assert_eq!(config.dh_modulus, 23);
        assert_eq!(config.dh_generator, 5);
    }
}
