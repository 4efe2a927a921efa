// Hex утилиты
// Только для отображения ключей владельцу, не транспортный формат

pub fn encode(data: &[u8]) -> String {
    hex::encode(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_is_lowercase() {
        assert_eq!(encode(&[0xAB, 0x01, 0xFF]), "ab01ff");
    }
}
