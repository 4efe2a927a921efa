// Модель данных протокола
// Участники и сообщения, общие для всех демо

pub mod messages;

pub use messages::{Message, Principal};
