//! 同步调用方式
//!
//! [`BlockingHasher`] 自带一个 Tokio 运行时，为不在异步上下文中的调用方
//! 提供阻塞版本的四个操作。不要在异步运行时内部使用它。
//!
//! ```rust
//! use hashy::blocking::BlockingHasher;
//! use hashy::Params;
//!
//! let hasher = BlockingHasher::with_default_algorithms().unwrap();
//! hasher.options().set("bcrypt", "cost", 4u32).unwrap();
//!
//! let hash = hasher.hash("my_password", Some("bcrypt"), None).unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.needs_rehash(&hash, Some("bcrypt"), None).unwrap());
//! ```

use tokio::runtime::{Builder, Runtime};

use crate::algorithm::HashInfo;
use crate::error::{Error, Result};
use crate::hasher::PasswordHasher;
use crate::params::Params;
use crate::policy::PolicyStore;

/// 阻塞式密码哈希器
#[derive(Debug)]
pub struct BlockingHasher {
    inner: PasswordHasher,
    runtime: Runtime,
}

impl BlockingHasher {
    /// 包装已有的哈希器
    pub fn new(inner: PasswordHasher) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("hashy-blocking")
            .build()
            .map_err(|e| Error::internal(format!("failed to start runtime: {}", e)))?;

        Ok(Self { inner, runtime })
    }

    /// 使用内置算法创建
    pub fn with_default_algorithms() -> Result<Self> {
        Self::new(PasswordHasher::with_default_algorithms()?)
    }

    /// 内部的异步哈希器
    pub fn inner(&self) -> &PasswordHasher {
        &self.inner
    }

    /// 默认算法名称
    pub fn default_algorithm(&self) -> &str {
        self.inner.default_algorithm()
    }

    /// 策略表
    pub fn options(&self) -> &PolicyStore {
        self.inner.options()
    }

    /// 哈希密码（阻塞）
    pub fn hash(
        &self,
        secret: &str,
        algorithm: Option<&str>,
        options: Option<&Params>,
    ) -> Result<String> {
        self.runtime
            .block_on(self.inner.hash(secret, algorithm, options))
    }

    /// 验证密码（阻塞）
    pub fn verify(&self, secret: &str, hash: &str) -> Result<bool> {
        self.runtime.block_on(self.inner.verify(secret, hash))
    }

    /// 解析哈希
    pub fn get_info(&self, hash: &str) -> Result<HashInfo> {
        self.inner.get_info(hash)
    }

    /// 判断是否需要重哈希
    pub fn needs_rehash(
        &self,
        hash: &str,
        algorithm: Option<&str>,
        options: Option<&Params>,
    ) -> Result<bool> {
        self.inner.needs_rehash(hash, algorithm, options)
    }

    /// 阻塞执行哈希，并以结果调用回调
    ///
    /// 回调在调用方线程上、本方法返回之前执行；需要延迟触发时使用
    /// [`PasswordHasher::hash_with_callback`](crate::hasher::PasswordHasher::hash_with_callback)。
    pub fn hash_then<F, R>(
        &self,
        secret: &str,
        algorithm: Option<&str>,
        options: Option<&Params>,
        callback: F,
    ) -> R
    where
        F: FnOnce(Result<String>) -> R,
    {
        callback(self.hash(secret, algorithm, options))
    }

    /// 阻塞执行验证，并以结果调用回调
    ///
    /// 与 [`hash_then`](Self::hash_then) 相同，回调在本方法返回之前执行。
    pub fn verify_then<F, R>(&self, secret: &str, hash: &str, callback: F) -> R
    where
        F: FnOnce(Result<bool>) -> R,
    {
        callback(self.verify(secret, hash))
    }
}
