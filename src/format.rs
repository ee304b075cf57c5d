//! 哈希字符串格式解析
//!
//! 所有支持的哈希都遵循 `$<标识符>$<参数段>$<其余内容>` 的前缀格式：
//!
//! - bcrypt: `$2y$05$P2ZY1eZ3oex3LZJ9bGuRnugsVeq6AXy2wlasiKmYamgDEl6w2dRMG`
//! - Argon2: `$argon2i$m=4096,t=3,p=1$<salt>$<digest>`
//! - Argon2（带版本）: `$argon2i$v=19$m=4096,t=3,p=1$<salt>$<digest>`
//!
//! 本层只负责切出标识符和原始参数段，参数段的含义由各算法解释。

use crate::error::{PasswordHashError, Result};

const DELIMITER: char = '$';

/// 哈希前缀的原始切分结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawHash<'a> {
    /// 标识符，如 `2y`、`argon2id`
    pub id: &'a str,
    /// 未解析的参数段，可以为空
    pub options: &'a str,
}

/// 解析哈希字符串前缀
///
/// 字符串必须以 `$` 开头，且标识符（非空）和参数段（可为空）之后各跟一个 `$`。
///
/// ```rust
/// use hashy::format::parse_hash;
///
/// let raw = parse_hash("$2y$05$P2ZY1eZ3oex3LZJ9bGuRnugsVeq6AXy2wlasiKmYamgDEl6w2dRMG").unwrap();
/// assert_eq!(raw.id, "2y");
/// assert_eq!(raw.options, "05");
///
/// assert!(parse_hash("not-a-hash").is_err());
/// ```
pub fn parse_hash(hash: &str) -> Result<RawHash<'_>> {
    let invalid = || PasswordHashError::InvalidFormat(hash.to_string());

    let rest = hash.strip_prefix(DELIMITER).ok_or_else(invalid)?;
    let (id, rest) = rest.split_once(DELIMITER).ok_or_else(invalid)?;
    if id.is_empty() {
        return Err(invalid().into());
    }
    let (options, _) = rest.split_once(DELIMITER).ok_or_else(invalid)?;

    Ok(RawHash { id, options })
}

/// 返回紧跟在 `field` 之后的下一个 `$` 分隔字段
///
/// 用于参数段被其他字段（如 Argon2 的 `v=19`）占位时，定位真正的参数段。
pub(crate) fn next_field<'a>(hash: &'a str, field: &str) -> Option<&'a str> {
    let start = hash.find(field)? + field.len();
    let rest = hash[start..].strip_prefix(DELIMITER)?;
    let end = rest.find(DELIMITER)?;
    Some(&rest[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bcrypt() {
        let raw = parse_hash("$2y$04$bCdlo4cUGt5.DpaorjzbN.XUX46/YNj4iKsdTvSQ3UE0pleNR2rjS")
            .unwrap();
        assert_eq!(raw, RawHash { id: "2y", options: "04" });
    }

    #[test]
    fn test_parse_argon2_with_version() {
        let raw = parse_hash("$argon2i$v=19$m=4096,t=3,p=1$c2FsdA$ZGlnZXN0").unwrap();
        assert_eq!(raw.id, "argon2i");
        assert_eq!(raw.options, "v=19");
    }

    #[test]
    fn test_empty_options_segment() {
        let raw = parse_hash("$custom$$payload").unwrap();
        assert_eq!(raw.id, "custom");
        assert_eq!(raw.options, "");
    }

    #[test]
    fn test_invalid_hashes() {
        for hash in [
            "not-a-hash",
            "",
            "$",
            "$$05$abc",
            "$2y",
            "$2y$05",
            "2y$05$abc",
        ] {
            let err = parse_hash(hash).unwrap_err();
            assert!(err.is_malformed_hash(), "{hash:?} should be malformed");
        }
    }

    #[test]
    fn test_next_field() {
        let hash = "$argon2i$v=19$m=4096,t=3,p=1$salt$digest";
        assert_eq!(next_field(hash, "v=19"), Some("m=4096,t=3,p=1"));
        assert_eq!(next_field(hash, "digest"), None);
        assert_eq!(next_field(hash, "missing"), None);
    }
}
