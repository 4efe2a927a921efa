// Crypto Lab Core
// Вычислительное ядро демо Alice / Bob / Eve: ключи, ciphertext, общие секреты
// и то, что видит каждый наблюдатель

#![warn(clippy::all)]

// Модули
pub mod api;
pub mod config;
pub mod crypto;
pub mod error;
pub mod protocol;
pub mod state;
pub mod utils;

// Re-exports для удобства
pub use api::{AsymmetricChat, DiffieHellmanWalkthrough, RsaWalkthrough, SymmetricChat};
pub use config::Config;
pub use error::{LabError, Result};
pub use protocol::{Message, Principal};
pub use state::{Decryption, Observer, ThreePartyObservation};
