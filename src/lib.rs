//! # Hashy
//!
//! 自描述的密码哈希库：哈希字符串本身记录了算法和参数，
//! 因此可以在不知道生成算法的情况下验证密码，并判断哈希是否落后于当前安全策略。
//!
//! ## 功能特性
//!
//! - **多算法**: 通过注册表接入多种哈希算法（内置 Argon2 和 bcrypt）
//! - **哈希解析**: 从 `$<id>$<params>$...` 格式中解析算法和参数
//! - **重哈希判定**: 与策略表比较，发现参数已经过时的哈希
//! - **策略表**: 进程级可修改的默认参数
//! - **多种调用方式**: `async`、回调、阻塞
//!
//! ## Features
//!
//! - `argon2` - 启用 Argon2 支持（默认启用）
//! - `bcrypt` - 启用 bcrypt 支持（默认启用）
//! - `cli` - 构建 `hashy` 命令行工具
//!
//! ## 示例
//!
//! ```rust
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! use hashy::{Params, PasswordHasher};
//!
//! let hasher = PasswordHasher::with_default_algorithms().unwrap();
//! hasher.options().set("bcrypt", "cost", 4u32).unwrap();
//!
//! // 哈希密码
//! let hash = hasher.hash("my_secure_password", Some("bcrypt"), None).await.unwrap();
//!
//! // 验证密码
//! assert!(hasher.verify("my_secure_password", &hash).await.unwrap());
//!
//! // 策略提高后，旧哈希需要重新生成
//! hasher.options().set("bcrypt", "cost", 5u32).unwrap();
//! assert!(hasher.needs_rehash(&hash, Some("bcrypt"), None).unwrap());
//! # });
//! ```
//!
//! ## 哈希信息
//!
//! ```rust
//! let info = hashy::get_info(
//!     "$argon2i$v=19$m=4096,t=3,p=1$BHBji9GuMvFc7SrpWucvcQ$7ITF2KM6dkpqGQQKvdMQrfdZ/uhOuiV0A/ZwjCuManM",
//! )
//! .unwrap();
//!
//! assert_eq!(info.algorithm, "argon2");
//! assert_eq!(info.options.number("memoryCost"), Some(4096));
//! assert_eq!(info.options.number("version"), Some(19));
//! ```

#[cfg(not(any(feature = "argon2", feature = "bcrypt")))]
compile_error!(
    "At least one password hashing algorithm (argon2 or bcrypt) must be enabled. Enable one of the password hashing features."
);

pub mod algorithm;
pub mod blocking;
pub mod callback;
pub mod error;
pub mod format;
pub mod hasher;
pub mod params;
pub mod policy;
pub mod registry;

pub use algorithm::{Algorithm, HashInfo, RehashDecision};
pub use blocking::BlockingHasher;
pub use error::{ConfigError, Error, PasswordHashError, Result};
pub use hasher::{
    PasswordHasher, PasswordHasherBuilder, default_algorithm, get_info, global, hash,
    needs_rehash, options, verify,
};
pub use params::{ParamValue, Params};
pub use policy::PolicyStore;
pub use registry::Registry;
