//! Argon2 后端
//!
//! 支持 `argon2d`、`argon2i`、`argon2id` 三种变体。哈希格式：
//!
//! ```text
//! $argon2i$m=4096,t=3,p=1$<salt>$<digest>          (Argon2 1.0，无版本号)
//! $argon2i$v=19$m=4096,t=3,p=1$<salt>$<digest>     (Argon2 1.3 起带版本号)
//! ```
//!
//! 版本号占据了参数段的位置，真正的参数段向右移动一个字段。
//! 解析结果固定为 `memoryCost`、`parallelism`、`timeCost`，有版本号时附带 `version`。

use async_trait::async_trait;
use password_hash::{PasswordHash, PasswordHasher as _, SaltString};
use subtle::ConstantTimeEq;

use ::argon2::{Argon2, Version};

use super::{Algorithm, required_u32, run_blocking};
use crate::error::{Error, PasswordHashError, Result};
use crate::format::{RawHash, next_field};
use crate::params::{ParamValue, Params};

/// 算法名称
pub const NAME: &str = "argon2";

/// 默认内存开销（KiB）
pub const DEFAULT_MEMORY_COST: u32 = 65536;
/// 默认迭代次数
pub const DEFAULT_TIME_COST: u32 = 3;
/// 默认并行度
pub const DEFAULT_PARALLELISM: u32 = 4;
/// 默认输出长度（字节）
pub const DEFAULT_HASH_LENGTH: u32 = 32;
/// 默认变体
pub const DEFAULT_VARIANT: &str = "argon2id";

const IDS: &[&str] = &["argon2d", "argon2i", "argon2id"];
const SALT_LENGTH: usize = 16;
const VERSION_PREFIX: &str = "v=";

/// Argon2 算法
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Algorithm;

impl Argon2Algorithm {
    /// 创建 Argon2 后端
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Algorithm for Argon2Algorithm {
    fn name(&self) -> &str {
        NAME
    }

    fn ids(&self) -> &[&str] {
        IDS
    }

    fn defaults(&self) -> Params {
        Params::new()
            .with("memoryCost", DEFAULT_MEMORY_COST)
            .with("timeCost", DEFAULT_TIME_COST)
            .with("parallelism", DEFAULT_PARALLELISM)
            .with("hashLength", DEFAULT_HASH_LENGTH)
            .with("variant", DEFAULT_VARIANT)
    }

    fn parse_params(&self, hash: &str, raw: &RawHash<'_>) -> Result<Params> {
        let mut segment = raw.options;
        let mut version = None;

        if let Some(value) = segment.strip_prefix(VERSION_PREFIX) {
            version = Some(parse_number(hash, "v", value)?);
            segment = next_field(hash, raw.options)
                .ok_or_else(|| PasswordHashError::InvalidFormat(hash.to_string()))?;
        }

        let tokens = tokenize(segment);
        let number = |key: &str| match tokens.get(key) {
            Some(ParamValue::Text(value)) => parse_number(hash, key, value),
            _ => Err(PasswordHashError::InvalidParams(format!(
                "missing argon2 parameter {} in {}",
                key, hash
            ))
            .into()),
        };

        let mut params = Params::new()
            .with("memoryCost", number("m")?)
            .with("parallelism", number("p")?)
            .with("timeCost", number("t")?);
        if let Some(version) = version {
            params.insert("version", version);
        }
        Ok(params)
    }

    async fn hash(&self, secret: &str, params: &Params) -> Result<String> {
        let memory_cost = required_u32(params, "memoryCost")?;
        let time_cost = required_u32(params, "timeCost")?;
        let parallelism = required_u32(params, "parallelism")?;
        let hash_length = match params.number("hashLength") {
            Some(_) => required_u32(params, "hashLength")?,
            None => DEFAULT_HASH_LENGTH,
        };
        let variant = params.text("variant").unwrap_or(DEFAULT_VARIANT);

        let algorithm: ::argon2::Algorithm = variant.parse().map_err(|e| {
            PasswordHashError::InvalidParams(format!("unknown argon2 variant {}: {}", variant, e))
        })?;
        let argon2_params = ::argon2::Params::new(
            memory_cost,
            time_cost,
            parallelism,
            Some(hash_length as usize),
        )
        .map_err(|e| PasswordHashError::InvalidParams(e.to_string()))?;
        let secret = secret.to_owned();

        run_blocking(move || {
            let mut salt_bytes = [0u8; SALT_LENGTH];
            getrandom::fill(&mut salt_bytes).map_err(|e| {
                PasswordHashError::HashFailed(format!("Failed to generate random salt: {}", e))
            })?;
            let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| {
                PasswordHashError::HashFailed(format!("Failed to encode salt: {}", e))
            })?;

            Argon2::new(algorithm, Version::V0x13, argon2_params)
                .hash_password(secret.as_bytes(), &salt)
                .map(|h| h.to_string())
                .map_err(|e| {
                    Error::from(PasswordHashError::HashFailed(format!(
                        "Argon2 hash failed: {}",
                        e
                    )))
                })
        })
        .await
    }

    async fn verify(&self, secret: &str, hash: &str) -> Result<bool> {
        let secret = secret.to_owned();
        let hash = hash.to_owned();

        run_blocking(move || verify_blocking(secret.as_bytes(), &hash)).await
    }
}

/// 按哈希中记录的变体、版本和参数重新计算摘要并做常数时间比较
///
/// 不带版本号的哈希只可能来自 Argon2 1.0（0x10）。
fn verify_blocking(secret: &[u8], hash: &str) -> Result<bool> {
    let invalid = |e: password_hash::Error| {
        PasswordHashError::InvalidFormat(format!("invalid Argon2 hash: {}", e))
    };

    let parsed = PasswordHash::new(hash).map_err(invalid)?;
    let algorithm = ::argon2::Algorithm::try_from(parsed.algorithm).map_err(invalid)?;
    let version = match parsed.version {
        Some(version) => Version::try_from(version).map_err(|e| {
            PasswordHashError::InvalidFormat(format!("unsupported Argon2 version: {}", e))
        })?,
        None => Version::V0x10,
    };
    let params = ::argon2::Params::try_from(&parsed).map_err(invalid)?;

    let (Some(salt), Some(expected)) = (parsed.salt, parsed.hash) else {
        return Err(
            PasswordHashError::InvalidFormat("Argon2 hash without salt or digest".into()).into(),
        );
    };
    let mut salt_buf = [0u8; password_hash::Salt::MAX_LENGTH];
    let salt_bytes = salt.decode_b64(&mut salt_buf).map_err(invalid)?;

    let mut computed = vec![0u8; expected.len()];
    Argon2::new(algorithm, version, params)
        .hash_password_into(secret, salt_bytes, &mut computed)
        .map_err(|e| PasswordHashError::VerifyFailed(format!("Argon2 verify failed: {}", e)))?;

    Ok(computed.ct_eq(expected.as_bytes()).into())
}

/// 拆分 `m=4096,t=3,p=1` 形式的参数段，不带 `=` 的片段视为布尔标记
fn tokenize(segment: &str) -> Params {
    segment
        .split(',')
        .filter(|token| !token.is_empty())
        .map(|token| match token.split_once('=') {
            Some((key, value)) => (key, ParamValue::from(value)),
            None => (token, ParamValue::Bool(true)),
        })
        .collect()
}

fn parse_number(hash: &str, key: &str, value: &str) -> Result<u64> {
    value.parse().map_err(|_| {
        PasswordHashError::InvalidParams(format!(
            "argon2 parameter {}={:?} is not a number in {}",
            key, value, hash
        ))
        .into()
    })
}
