//! Криптографический модуль
//!
//! # Архитектура
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              api (SymmetricChat, AsymmetricChat,            │
//! │           RsaWalkthrough, DiffieHellmanWalkthrough)         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │             state (Session, ThreePartyView, log)            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                ┌─────────────┴─────────────┐
//!                ▼                           ▼
//! ┌───────────────────────────┐  ┌──────────────────────────┐
//! │   Channel (chat demos)    │  │  Walkthroughs (toy)      │
//! │  - AeadChannel            │  │  - toy_rsa               │
//! │  - RsaChannel             │  │  - key_agreement (DH)    │
//! └───────────────────────────┘  └──────────────────────────┘
//!                │                           │
//!                └─────────────┬─────────────┘
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │        keys (KeyMaterial)  +  arithmetic (modPow, ...)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Модули
//!
//! ### Leaf
//! - [`arithmetic`]: modPow, modInverse, gcd, поиск взаимно простых экспонент
//! - [`keys`]: SymmetricKey, AsymmetricKeyPair, ToyRsaParameters
//!
//! ### Channels
//! - [`channel`]: Channel trait (encrypt / decrypt)
//! - [`suites`]: AEAD и RSA реализации Channel
//!
//! ### Walkthroughs
//! - [`toy_rsa`]: encrypt_int / decrypt_int
//! - [`key_agreement`]: Diffie-Hellman

// ============================================================================
// Leaf
// ============================================================================

pub mod arithmetic;

pub mod keys;

// ============================================================================
// Channels
// ============================================================================

/// Channel trait для чатов
pub mod channel;

/// Криптографические наборы (AEAD, RSA)
pub mod suites;

// ============================================================================
// Walkthroughs
// ============================================================================

pub mod toy_rsa;

pub mod key_agreement;

// ============================================================================
// Re-exports для удобства
// ============================================================================

pub use channel::Channel;
pub use suites::aead::{AeadAlgorithm, AeadChannel};
pub use suites::rsa::RsaChannel;
