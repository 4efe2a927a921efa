//! Криптографические наборы (Crypto Suites)
//!
//! Реализации [`Channel`](crate::crypto::channel::Channel) для чатов.
//!
//! ## Доступные наборы
//!
//! ### AEAD (symmetric chat)
//! - **AES-256-GCM** (по умолчанию)
//! - **ChaCha20-Poly1305** (через `Config::aead_algorithm`)
//! - Envelope: nonce (12) ‖ ciphertext ‖ tag (16)
//!
//! ### RSA (asymmetric chat)
//! - **RSA-1024** с PKCS#1 v1.5 padding, e = 65537
//!
//! ## Пример
//!
//! ```rust
//! use crypto_lab_core::crypto::channel::Channel;
//! use crypto_lab_core::crypto::keys::SymmetricKey;
//! use crypto_lab_core::crypto::suites::aead::AeadChannel;
//!
//! let key = SymmetricKey::generate();
//! let channel = AeadChannel::default();
//! let envelope = channel.encrypt("Hello Bob!", &key)?;
//! assert_eq!(channel.decrypt(&envelope, &key)?, "Hello Bob!");
//! # Ok::<(), crypto_lab_core::error::LabError>(())
//! ```

pub mod aead;
pub mod rsa;
