//! 回调风格的调用方式
//!
//! 每个门面操作除了 `async` 形式外，还提供 `*_with_callback` 形式：
//! 操作在当前 Tokio 运行时上派生的任务中执行，结束后以 `Result` 调用回调。
//!
//! 回调总是在派生任务中执行，因此不会在发起调用的函数返回之前触发，
//! 即使操作本身（如 `get_info`）是同步完成的。
//!
//! ```rust
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! use hashy::{Params, PasswordHasher};
//!
//! let hasher = PasswordHasher::with_default_algorithms().unwrap();
//! let (tx, rx) = tokio::sync::oneshot::channel();
//!
//! let options = Params::new().with("cost", 4u32);
//! hasher
//!     .hash_with_callback("my_password", Some("bcrypt"), Some(options), move |result| {
//!         let _ = tx.send(result);
//!     })
//!     .unwrap();
//!
//! let hash = rx.await.unwrap().unwrap();
//! assert!(hash.starts_with("$2b$04$"));
//! # });
//! ```

use std::future::Future;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::algorithm::HashInfo;
use crate::error::{Error, Result};
use crate::hasher::PasswordHasher;
use crate::params::Params;

/// 在当前运行时上执行 `future`，完成后以结果调用 `callback`
///
/// 不在 Tokio 运行时中调用时返回 [`Error::Internal`]，回调不会被调用。
pub fn with_callback<T, Fut, F>(future: Fut, callback: F) -> Result<JoinHandle<()>>
where
    T: Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
    F: FnOnce(Result<T>) + Send + 'static,
{
    let handle = Handle::try_current()
        .map_err(|e| Error::internal(format!("no async runtime available: {}", e)))?;

    Ok(handle.spawn(async move {
        let result = future.await;
        callback(result);
    }))
}

impl PasswordHasher {
    /// [`hash`](PasswordHasher::hash) 的回调形式
    pub fn hash_with_callback<F>(
        &self,
        secret: impl Into<String>,
        algorithm: Option<&str>,
        options: Option<Params>,
        callback: F,
    ) -> Result<JoinHandle<()>>
    where
        F: FnOnce(Result<String>) + Send + 'static,
    {
        let hasher = self.clone();
        let secret = secret.into();
        let algorithm = algorithm.map(str::to_string);

        with_callback(
            async move {
                hasher
                    .hash(&secret, algorithm.as_deref(), options.as_ref())
                    .await
            },
            callback,
        )
    }

    /// [`verify`](PasswordHasher::verify) 的回调形式
    pub fn verify_with_callback<F>(
        &self,
        secret: impl Into<String>,
        hash: impl Into<String>,
        callback: F,
    ) -> Result<JoinHandle<()>>
    where
        F: FnOnce(Result<bool>) + Send + 'static,
    {
        let hasher = self.clone();
        let secret = secret.into();
        let hash = hash.into();

        with_callback(async move { hasher.verify(&secret, &hash).await }, callback)
    }

    /// [`get_info`](PasswordHasher::get_info) 的回调形式
    pub fn get_info_with_callback<F>(
        &self,
        hash: impl Into<String>,
        callback: F,
    ) -> Result<JoinHandle<()>>
    where
        F: FnOnce(Result<HashInfo>) + Send + 'static,
    {
        let hasher = self.clone();
        let hash = hash.into();

        with_callback(async move { hasher.get_info(&hash) }, callback)
    }

    /// [`needs_rehash`](PasswordHasher::needs_rehash) 的回调形式
    pub fn needs_rehash_with_callback<F>(
        &self,
        hash: impl Into<String>,
        algorithm: Option<&str>,
        options: Option<Params>,
        callback: F,
    ) -> Result<JoinHandle<()>>
    where
        F: FnOnce(Result<bool>) + Send + 'static,
    {
        let hasher = self.clone();
        let hash = hash.into();
        let algorithm = algorithm.map(str::to_string);

        with_callback(
            async move { hasher.needs_rehash(&hash, algorithm.as_deref(), options.as_ref()) },
            callback,
        )
    }
}
