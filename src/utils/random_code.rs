//! 邀请码生成

use rand::Rng;

/// 去掉易混淆字符（0/O、1/I/L）后的字母表
const INVITE_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

pub fn generate_invite_code(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| INVITE_CODE_ALPHABET[rng.random_range(0..INVITE_CODE_ALPHABET.len())] as char)
        .collect()
}

/// 用户输入的邀请码：去空白、转大写
pub fn normalize_invite_code(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>()
        .to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_code_uses_unambiguous_alphabet() {
        let code = generate_invite_code(12);
        assert_eq!(code.len(), 12);
        assert!(code.bytes().all(|b| INVITE_CODE_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_normalize_invite_code() {
        assert_eq!(normalize_invite_code(" abcd-2345 "), "ABCD2345");
    }
}
