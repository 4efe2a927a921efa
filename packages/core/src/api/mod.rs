// Публичный API демо
// Каждое действие UI = один метод = Result<Payload>. Payload сериализуется в JSON.

pub mod asymmetric_chat;
pub mod dh_walkthrough;
pub mod rsa_walkthrough;
pub mod symmetric_chat;

pub use asymmetric_chat::{AsymmetricChat, AsymmetricEavesdropperKnowledge, KeyPairReport, PublicKeyReport};
pub use dh_walkthrough::{DhConfig, DhEavesdropperView, DiffieHellmanWalkthrough, KeyAgreementOutcome};
pub use rsa_walkthrough::{RsaWalkthrough, ToyRsaConfig, ToyRsaEavesdropperView, ToyRsaExchange, ToyRsaKeyReport};
pub use symmetric_chat::{SymmetricChat, SymmetricEavesdropperKnowledge, SymmetricKeyReport};
