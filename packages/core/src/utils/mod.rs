// Вспомогательные модули

pub mod b64;
pub mod hex;
pub mod logging;
pub mod time;
pub mod uuid;
