//! 上传文件的内容签名校验

/// 文件内容签名
#[derive(Debug, Clone, Copy)]
enum Signature {
    /// 以固定字节开头
    Prefix(&'static [u8]),
    /// 任一前缀
    AnyPrefix(&'static [&'static [u8]]),
    /// RIFF 容器，偏移 8 处为子类型
    Riff(&'static [u8; 4]),
    /// 纯文本，要求为合法 UTF-8
    Text,
}

impl Signature {
    fn matches(&self, data: &[u8]) -> bool {
        match self {
            Signature::Prefix(prefix) => data.starts_with(prefix),
            Signature::AnyPrefix(prefixes) => prefixes.iter().any(|p| data.starts_with(p)),
            Signature::Riff(kind) => {
                data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == kind.as_slice()
            }
            Signature::Text => std::str::from_utf8(data).is_ok(),
        }
    }
}

const OLE: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const ZIP: &[u8] = &[0x50, 0x4B, 0x03, 0x04];

fn signature_for(extension: &str) -> Option<Signature> {
    let signature = match extension {
        // 头像、徽章图标
        ".png" => Signature::Prefix(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
        ".jpg" | ".jpeg" => Signature::Prefix(&[0xFF, 0xD8, 0xFF]),
        ".gif" => Signature::AnyPrefix(&[b"GIF87a", b"GIF89a"]),
        ".webp" => Signature::Riff(b"WEBP"),
        ".svg" => Signature::Text,
        // 作业附件
        ".pdf" => Signature::Prefix(b"%PDF"),
        ".doc" | ".xls" | ".ppt" => Signature::Prefix(OLE),
        ".docx" | ".xlsx" | ".pptx" | ".zip" => Signature::Prefix(ZIP),
        ".txt" | ".md" | ".csv" | ".json" => Signature::Text,
        _ => return None,
    };
    Some(signature)
}

/// 校验文件开头的字节是否与扩展名（含点号）一致；未知扩展名一律拒绝
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    signature_for(&extension.to_ascii_lowercase()).is_some_and(|sig| sig.matches(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_signatures() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
        assert!(validate_magic_bytes(&png, ".png"));
        assert!(validate_magic_bytes(&png, ".PNG"));
        assert!(!validate_magic_bytes(&png, ".jpg"));

        let webp = b"RIFF\x00\x00\x00\x00WEBPVP8 ";
        assert!(validate_magic_bytes(webp, ".webp"));
        assert!(!validate_magic_bytes(b"RIFF\x00\x00\x00\x00WAVE", ".webp"));
    }

    #[test]
    fn test_document_signatures() {
        assert!(validate_magic_bytes(b"%PDF-1.7", ".pdf"));
        assert!(!validate_magic_bytes(b"%PDF-1.7", ".docx"));
        assert!(validate_magic_bytes(&[0x50, 0x4B, 0x03, 0x04, 0x14], ".docx"));
    }

    #[test]
    fn test_text_must_be_utf8() {
        assert!(validate_magic_bytes("作业答案".as_bytes(), ".md"));
        assert!(!validate_magic_bytes(&[0xFF, 0xFE, 0x00], ".txt"));
    }

    #[test]
    fn test_rejects_empty_and_unknown() {
        assert!(!validate_magic_bytes(&[], ".png"));
        assert!(!validate_magic_bytes(b"MZ\x90\x00", ".exe"));
    }
}
