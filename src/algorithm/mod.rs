//! 哈希算法后端
//!
//! 每种算法实现一次 [`Algorithm`] trait，提供：
//!
//! - 参数段解析（[`Algorithm::parse_params`]）
//! - 哈希生成（[`Algorithm::hash`]，CPU 密集，必须在工作线程中执行）
//! - 密码验证（[`Algorithm::verify`]）
//! - 可选的重哈希判定钩子（[`Algorithm::needs_rehash`]）
//!
//! ## 内置算法
//!
//! - **Argon2**（需启用 `argon2` feature）: 标识符 `argon2d` / `argon2i` / `argon2id`
//! - **bcrypt**（需启用 `bcrypt` feature）: 标识符 `2` / `2a` / `2b` / `2x` / `2y`
//!
//! ## 自定义算法
//!
//! ```rust
//! use async_trait::async_trait;
//! use hashy::algorithm::Algorithm;
//! use hashy::format::RawHash;
//! use hashy::{Params, Result};
//!
//! struct Plain;
//!
//! #[async_trait]
//! impl Algorithm for Plain {
//!     fn name(&self) -> &str {
//!         "plain"
//!     }
//!
//!     fn ids(&self) -> &[&str] {
//!         &["plain"]
//!     }
//!
//!     fn defaults(&self) -> Params {
//!         Params::new()
//!     }
//!
//!     fn parse_params(&self, _hash: &str, _raw: &RawHash<'_>) -> Result<Params> {
//!         Ok(Params::new())
//!     }
//!
//!     async fn hash(&self, secret: &str, _params: &Params) -> Result<String> {
//!         Ok(format!("$plain$${}", secret))
//!     }
//!
//!     async fn verify(&self, secret: &str, hash: &str) -> Result<bool> {
//!         Ok(hash == format!("$plain$${}", secret))
//!     }
//! }
//! ```

#[cfg(feature = "argon2")]
pub mod argon2;
#[cfg(feature = "bcrypt")]
pub mod bcrypt;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::format::RawHash;
use crate::params::Params;

#[cfg(feature = "argon2")]
pub use self::argon2::Argon2Algorithm;
#[cfg(feature = "bcrypt")]
pub use self::bcrypt::BcryptAlgorithm;

/// 算法钩子对“是否需要重哈希”的判定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RehashDecision {
    /// 必须重哈希（如已废弃的格式变体）
    Required,
    /// 无需重哈希
    NotRequired,
    /// 不做判断，交由通用的数值参数比较
    #[default]
    Defer,
}

impl From<bool> for RehashDecision {
    fn from(required: bool) -> Self {
        if required {
            RehashDecision::Required
        } else {
            RehashDecision::NotRequired
        }
    }
}

/// 哈希字符串的解析结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashInfo {
    /// 标识符，如 `2y`
    pub id: String,
    /// 算法名称，如 `bcrypt`
    pub algorithm: String,
    /// 解析后的参数
    pub options: Params,
}

/// 哈希算法后端
#[async_trait]
pub trait Algorithm: Send + Sync + 'static {
    /// 算法名称，全局唯一
    fn name(&self) -> &str;

    /// 该算法认领的哈希标识符，全局唯一
    fn ids(&self) -> &[&str];

    /// 默认参数，注册时写入策略表
    fn defaults(&self) -> Params;

    /// 从哈希字符串解析参数
    ///
    /// `raw` 是 [`parse_hash`](crate::format::parse_hash) 的切分结果，
    /// 完整的 `hash` 一并传入，以便处理参数段位置偏移的格式。
    fn parse_params(&self, hash: &str, raw: &RawHash<'_>) -> Result<Params>;

    /// 使用合并后的参数生成哈希
    async fn hash(&self, secret: &str, params: &Params) -> Result<String>;

    /// 验证密码与哈希是否匹配
    ///
    /// 密码不匹配返回 `Ok(false)`，只有哈希无法处理时才返回错误。
    async fn verify(&self, secret: &str, hash: &str) -> Result<bool>;

    /// 算法特定的重哈希判定
    fn needs_rehash(&self, _hash: &str, _info: &HashInfo) -> RehashDecision {
        RehashDecision::Defer
    }
}

/// 在阻塞线程池中执行 CPU 密集的哈希计算
pub(crate) async fn run_blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| crate::error::Error::internal(format!("hashing task failed: {}", e)))?
}

/// 读取必需的数值参数并转换为 `u32`
#[cfg(any(feature = "argon2", feature = "bcrypt"))]
pub(crate) fn required_u32(params: &Params, key: &str) -> Result<u32> {
    use crate::error::PasswordHashError;

    let value = params.number(key).ok_or_else(|| {
        PasswordHashError::InvalidParams(format!("missing numeric parameter {}", key))
    })?;
    u32::try_from(value).map_err(|_| {
        PasswordHashError::InvalidParams(format!("parameter {} out of range: {}", key, value))
            .into()
    })
}
