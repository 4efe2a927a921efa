// Журнал операций
// Append-only записи для дидактического отображения. Логика протоколов
// журнал не читает.

use crate::error::Result;
use crate::utils::time::current_timestamp;
use serde::Serialize;

/// Актор системных записей (инициализация демо)
pub const SYSTEM_ACTOR: &str = "System";

/// Первые `max_chars` символов значения (превью ciphertext в записи)
pub fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Вид криптографической операции
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperationKind {
    Initialization,
    KeyGeneration,
    Encryption,
    Decryption,
    KeyAgreement,
}

/// Одна запись журнала. Ключи и plaintext сюда не попадают, только размеры
/// и публичные параметры.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationLogEntry {
    pub timestamp: i64,
    pub actor: String,
    pub kind: OperationKind,
    pub action: String,
    pub algorithm: String,
    /// Упорядоченные пары "параметр: значение"
    pub details: Vec<(String, String)>,
    pub plaintext_bytes: Option<usize>,
    pub ciphertext_bytes: Option<usize>,
}

impl OperationLogEntry {
    pub fn new(
        actor: impl Into<String>,
        kind: OperationKind,
        action: impl Into<String>,
        algorithm: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: current_timestamp(),
            actor: actor.into(),
            kind,
            action: action.into(),
            algorithm: algorithm.into(),
            details: Vec::new(),
            plaintext_bytes: None,
            ciphertext_bytes: None,
        }
    }

    pub fn detail(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.details.push((key.into(), value.to_string()));
        self
    }

    pub fn sizes(mut self, plaintext_bytes: Option<usize>, ciphertext_bytes: Option<usize>) -> Self {
        self.plaintext_bytes = plaintext_bytes;
        self.ciphertext_bytes = ciphertext_bytes;
        self
    }

    /// Значение параметра по имени
    pub fn get(&self, key: &str) -> Option<&str> {
        self.details
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Append-only последовательность записей
#[derive(Debug, Clone, Default)]
pub struct OperationLog {
    entries: Vec<OperationLogEntry>,
}

impl OperationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: OperationLogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[OperationLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&OperationLogEntry> {
        self.entries.last()
    }

    /// JSON для UI
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.entries)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut log = OperationLog::new();
        log.append(OperationLogEntry::new(SYSTEM_ACTOR, OperationKind::Initialization, "init", "AES-256-GCM"));
        log.append(OperationLogEntry::new("Alice", OperationKind::Encryption, "send", "AES-256-GCM"));

        let kinds: Vec<OperationKind> = log.entries().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![OperationKind::Initialization, OperationKind::Encryption]);
        assert_eq!(log.last().unwrap().actor, "Alice");
    }

    #[test]
    fn test_preview_truncates() {
        assert_eq!(preview("QUJDREVG", 3), "QUJ");
        assert_eq!(preview("QUI=", 100), "QUI=");
    }

    #[test]
    fn test_details_and_json() {
        let entry = OperationLogEntry::new("Bob", OperationKind::KeyGeneration, "Keys Generated", "RSA")
            .detail("Key Size", "1024-bit RSA")
            .sizes(None, Some(128));
        assert_eq!(entry.get("Key Size"), Some("1024-bit RSA"));
        assert_eq!(entry.get("missing"), None);

        let mut log = OperationLog::new();
        log.append(entry);
        let json = log.to_json().unwrap();
        assert!(json.contains("\"ciphertextBytes\":128"));
        assert!(json.contains("\"KeyGeneration\""));
    }
}
