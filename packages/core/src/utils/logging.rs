// Логирование
//
// Ядро только пишет события через `tracing`; подписчика ставит хост.
// Для тестов и простых хостов есть init_tracing().

use tracing_subscriber::EnvFilter;

/// Установить fmt-подписчик с фильтром из RUST_LOG (по умолчанию `info`).
///
/// Повторный вызов ничего не делает.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice() {
        init_tracing();
        init_tracing();
        tracing::info!(target: "lab::session", "subscriber installed");
    }
}
