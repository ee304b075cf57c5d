//! bcrypt 后端
//!
//! 参数段是十进制的 cost 因子，如 `$2y$05$...` 的 `05`。
//! 新哈希总是以 `$2b$` 生成；只有 `2a` / `2b` / `2y` 被视为当前格式，
//! 其他变体（`2`、`2x`）一律需要重哈希。

use async_trait::async_trait;

use super::{Algorithm, HashInfo, RehashDecision, required_u32, run_blocking};
use crate::error::{Error, PasswordHashError, Result};
use crate::format::RawHash;
use crate::params::Params;

/// 算法名称
pub const NAME: &str = "bcrypt";

/// 默认 cost
pub const DEFAULT_COST: u32 = 10;

const IDS: &[&str] = &["2", "2a", "2b", "2x", "2y"];
const CURRENT_IDS: &[&str] = &["2a", "2b", "2y"];

/// bcrypt 算法
#[derive(Debug, Clone, Copy, Default)]
pub struct BcryptAlgorithm;

impl BcryptAlgorithm {
    /// 创建 bcrypt 后端
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Algorithm for BcryptAlgorithm {
    fn name(&self) -> &str {
        NAME
    }

    fn ids(&self) -> &[&str] {
        IDS
    }

    fn defaults(&self) -> Params {
        Params::new().with("cost", DEFAULT_COST)
    }

    fn parse_params(&self, _hash: &str, raw: &RawHash<'_>) -> Result<Params> {
        let cost: u64 = raw.options.parse().map_err(|_| {
            PasswordHashError::InvalidParams(format!("invalid bcrypt cost {:?}", raw.options))
        })?;
        Ok(Params::new().with("cost", cost))
    }

    async fn hash(&self, secret: &str, params: &Params) -> Result<String> {
        let cost = required_u32(params, "cost")?;
        let secret = secret.to_owned();

        run_blocking(move || {
            ::bcrypt::hash(secret, cost).map_err(|e| {
                Error::from(PasswordHashError::HashFailed(format!("bcrypt hash failed: {}", e)))
            })
        })
        .await
    }

    async fn verify(&self, secret: &str, hash: &str) -> Result<bool> {
        // bcrypt crate 直接接受 2a / 2b / 2x / 2y 前缀，无需把 2y 改写为 2a
        let secret = secret.to_owned();
        let hash = hash.to_owned();

        run_blocking(move || {
            ::bcrypt::verify(secret, &hash).map_err(|e| {
                Error::from(PasswordHashError::VerifyFailed(format!(
                    "bcrypt verify failed: {}",
                    e
                )))
            })
        })
        .await
    }

    fn needs_rehash(&self, _hash: &str, info: &HashInfo) -> RehashDecision {
        if CURRENT_IDS.contains(&info.id.as_str()) {
            RehashDecision::Defer
        } else {
            RehashDecision::Required
        }
    }
}
