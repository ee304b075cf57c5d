//! 统一错误类型模块
//!
//! 提供 hashy 库中所有操作的错误类型定义。
//!
//! - [`ConfigError`]: 算法注册阶段的配置错误（名称或标识符重复等），属于启动期致命错误
//! - [`PasswordHashError`]: 哈希解析、算法查找以及底层哈希原语的失败
//!
//! 所有错误都不会在库内部重试。

use thiserror::Error;

/// hashy 库的统一结果类型
pub type Result<T> = std::result::Result<T, Error>;

/// hashy 库的错误类型
#[derive(Debug, Error)]
pub enum Error {
    /// 密码哈希错误
    #[error("Password hash error: {0}")]
    PasswordHash(#[from] PasswordHashError),

    /// 配置错误
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// 内部错误（工作线程异常、锁中毒）
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// 创建一个内部错误
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }

    /// 哈希字符串不符合 `$<id>$<params>$...` 格式
    pub fn is_malformed_hash(&self) -> bool {
        matches!(self, Error::PasswordHash(PasswordHashError::InvalidFormat(_)))
    }

    /// 哈希中的标识符没有对应的已注册算法
    pub fn is_unknown_algorithm(&self) -> bool {
        matches!(
            self,
            Error::PasswordHash(PasswordHashError::UnknownAlgorithm(_))
        )
    }

    /// 调用方指定的算法名称没有对应的已注册算法
    pub fn is_unsupported_algorithm(&self) -> bool {
        matches!(
            self,
            Error::PasswordHash(PasswordHashError::UnsupportedAlgorithm(_))
        )
    }

    /// 是否为配置错误
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

/// 密码哈希相关错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordHashError {
    /// 无效的哈希格式
    #[error("invalid hash {0}")]
    InvalidFormat(String),
    /// 哈希标识符未注册
    #[error("no available algorithm with id {0}")]
    UnknownAlgorithm(String),
    /// 算法名称未注册
    #[error("no available algorithm with name {0}")]
    UnsupportedAlgorithm(String),
    /// 参数缺失或无效
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    /// 哈希生成失败
    #[error("hash generation failed: {0}")]
    HashFailed(String),
    /// 密码验证过程失败（不同于密码不匹配）
    #[error("password verification failed: {0}")]
    VerifyFailed(String),
}

/// 配置相关错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 算法名称已被注册
    #[error("name {0} already taken")]
    DuplicateName(String),
    /// 哈希标识符已被其他算法占用
    #[error("id {id} already taken (while registering {algorithm})")]
    DuplicateId { id: String, algorithm: String },
    /// 没有注册任何算法
    #[error("no algorithm registered")]
    EmptyRegistry,
    /// 无效的配置值
    #[error("invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::PasswordHash(PasswordHashError::InvalidFormat("not-a-hash".into()));
        assert_eq!(
            err.to_string(),
            "Password hash error: invalid hash not-a-hash"
        );
    }

    #[test]
    fn test_error_from_password_hash() {
        let hash_err = PasswordHashError::HashFailed("test".to_string());
        let err: Error = hash_err.into();
        assert!(matches!(err, Error::PasswordHash(_)));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::DuplicateId {
            id: "2y".into(),
            algorithm: "bcrypt2".into(),
        };
        assert_eq!(err.to_string(), "id 2y already taken (while registering bcrypt2)");
    }

    #[test]
    fn test_predicates() {
        let err: Error = PasswordHashError::UnknownAlgorithm("scrypt".into()).into();
        assert!(err.is_unknown_algorithm());
        assert!(!err.is_unsupported_algorithm());
        assert!(!err.is_malformed_hash());

        let err: Error = ConfigError::DuplicateName("bcrypt".into()).into();
        assert!(err.is_config());
    }
}
