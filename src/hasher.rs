//! 密码哈希门面
//!
//! [`PasswordHasher`] 把注册表、策略表和各算法后端组合成四个公开操作：
//!
//! - [`hash`](PasswordHasher::hash): 生成自描述的哈希字符串
//! - [`verify`](PasswordHasher::verify): 验证密码
//! - [`get_info`](PasswordHasher::get_info): 解析哈希中的算法和参数
//! - [`needs_rehash`](PasswordHasher::needs_rehash): 判断哈希是否落后于当前策略

use std::sync::{Arc, LazyLock};

use tracing::{debug, trace};

use crate::algorithm::{Algorithm, HashInfo, RehashDecision};
use crate::error::{ConfigError, Result};
use crate::format::parse_hash;
use crate::params::Params;
use crate::policy::PolicyStore;
use crate::registry::Registry;

/// 密码哈希器
///
/// 克隆开销很小：注册表只读共享，策略表是共享句柄。
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    registry: Arc<Registry>,
    policy: PolicyStore,
    default_algorithm: String,
}

/// [`PasswordHasher`] 构建器
#[derive(Debug, Default)]
pub struct PasswordHasherBuilder {
    registry: Registry,
    policy: PolicyStore,
}

impl PasswordHasherBuilder {
    /// 注册算法，第一个注册的算法成为默认算法
    pub fn register<A: Algorithm>(self, algorithm: A) -> Result<Self> {
        self.register_shared(Arc::new(algorithm))
    }

    /// 注册已共享的算法实例
    pub fn register_shared(mut self, algorithm: Arc<dyn Algorithm>) -> Result<Self> {
        let name = algorithm.name().to_string();
        let defaults = algorithm.defaults();
        self.registry.register(algorithm)?;
        self.policy.seed(&name, defaults)?;
        Ok(self)
    }

    /// 完成构建，至少需要注册一个算法
    pub fn build(self) -> Result<PasswordHasher> {
        let default_algorithm = self
            .registry
            .default_algorithm()
            .ok_or(ConfigError::EmptyRegistry)?
            .to_string();

        Ok(PasswordHasher {
            registry: Arc::new(self.registry),
            policy: self.policy,
            default_algorithm,
        })
    }
}

impl PasswordHasher {
    /// 创建构建器
    ///
    /// ```rust
    /// use hashy::PasswordHasher;
    /// use hashy::algorithm::BcryptAlgorithm;
    ///
    /// let hasher = PasswordHasher::builder()
    ///     .register(BcryptAlgorithm::new())
    ///     .unwrap()
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(hasher.default_algorithm(), "bcrypt");
    /// ```
    pub fn builder() -> PasswordHasherBuilder {
        PasswordHasherBuilder::default()
    }

    /// 使用内置算法创建哈希器
    ///
    /// 注册顺序为 Argon2、bcrypt（取决于启用的 feature），因此默认算法是 Argon2。
    pub fn with_default_algorithms() -> Result<Self> {
        let builder = Self::builder();
        #[cfg(feature = "argon2")]
        let builder = builder.register(crate::algorithm::Argon2Algorithm::new())?;
        #[cfg(feature = "bcrypt")]
        let builder = builder.register(crate::algorithm::BcryptAlgorithm::new())?;
        builder.build()
    }

    /// 默认算法名称
    pub fn default_algorithm(&self) -> &str {
        &self.default_algorithm
    }

    /// 按注册顺序列出算法名称
    pub fn algorithms(&self) -> impl Iterator<Item = &str> {
        self.registry.names()
    }

    /// 算法注册表
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// 策略表（全局默认参数）
    pub fn options(&self) -> &PolicyStore {
        &self.policy
    }

    /// 哈希密码
    ///
    /// 参数优先级（低到高）：算法默认值 < 策略表 < `options`。
    ///
    /// # Arguments
    ///
    /// * `secret` - 明文密码
    /// * `algorithm` - 算法名称，`None` 时使用默认算法
    /// * `options` - 本次调用的显式参数
    pub async fn hash(
        &self,
        secret: &str,
        algorithm: Option<&str>,
        options: Option<&Params>,
    ) -> Result<String> {
        let algorithm = self.resolve(algorithm)?;
        trace!(algorithm = algorithm.name(), "hashing secret");

        let mut params = algorithm.defaults();
        if let Some(policy) = self.policy.get(algorithm.name())? {
            params.extend_from(&policy);
        }
        if let Some(options) = options {
            params.extend_from(options);
        }

        algorithm.hash(secret, &params).await
    }

    /// 解析哈希字符串
    ///
    /// ```rust
    /// use hashy::PasswordHasher;
    ///
    /// let hasher = PasswordHasher::with_default_algorithms().unwrap();
    /// let info = hasher
    ///     .get_info("$2y$04$bCdlo4cUGt5.DpaorjzbN.XUX46/YNj4iKsdTvSQ3UE0pleNR2rjS")
    ///     .unwrap();
    ///
    /// assert_eq!(info.id, "2y");
    /// assert_eq!(info.algorithm, "bcrypt");
    /// assert_eq!(info.options.number("cost"), Some(4));
    /// ```
    pub fn get_info(&self, hash: &str) -> Result<HashInfo> {
        let raw = parse_hash(hash)?;
        let algorithm = self.registry.by_id(raw.id)?;
        let options = algorithm.parse_params(hash, &raw)?;

        Ok(HashInfo {
            id: raw.id.to_string(),
            algorithm: algorithm.name().to_string(),
            options,
        })
    }

    /// 判断哈希是否需要按当前策略重新生成
    ///
    /// 1. 哈希的算法与 `algorithm`（或默认算法）不同时，需要重哈希；
    /// 2. 算法的判定钩子给出明确结果时，以钩子为准；
    /// 3. 否则逐个比较哈希中的数值参数，任一参数低于期望值（策略表合并 `options`）即需要重哈希。
    pub fn needs_rehash(
        &self,
        hash: &str,
        algorithm: Option<&str>,
        options: Option<&Params>,
    ) -> Result<bool> {
        let info = self.get_info(hash)?;
        let expected_algorithm = self.resolve(algorithm)?.name();

        if info.algorithm != expected_algorithm {
            debug!(
                actual = %info.algorithm,
                expected = expected_algorithm,
                "rehash needed: algorithm changed"
            );
            return Ok(true);
        }

        let backend = self.registry.by_id(&info.id)?;
        match backend.needs_rehash(hash, &info) {
            RehashDecision::Required => {
                debug!(algorithm = %info.algorithm, id = %info.id, "rehash needed: algorithm hook");
                return Ok(true);
            }
            RehashDecision::NotRequired => return Ok(false),
            RehashDecision::Defer => {}
        }

        let mut expected = self.policy.get(&info.algorithm)?.unwrap_or_default();
        if let Some(options) = options {
            expected.extend_from(options);
        }

        for (key, value) in info.options.iter() {
            let (Some(actual), Some(wanted)) = (value.as_number(), expected.number(key)) else {
                continue;
            };
            if actual < wanted {
                debug!(
                    algorithm = %info.algorithm,
                    parameter = key,
                    actual,
                    expected = wanted,
                    "rehash needed: parameter below policy"
                );
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// 验证密码是否匹配哈希
    ///
    /// 算法由哈希中的标识符决定，与默认算法无关。
    pub async fn verify(&self, secret: &str, hash: &str) -> Result<bool> {
        let raw = parse_hash(hash)?;
        let algorithm = self.registry.by_id(raw.id)?;
        trace!(algorithm = algorithm.name(), id = raw.id, "verifying secret");

        algorithm.verify(secret, hash).await
    }

    fn resolve(&self, algorithm: Option<&str>) -> Result<&Arc<dyn Algorithm>> {
        self.registry
            .by_name(algorithm.unwrap_or(self.default_algorithm.as_str()))
    }
}

// ============================================================================
// 进程级默认实例与便捷函数
// ============================================================================

static GLOBAL: LazyLock<PasswordHasher> = LazyLock::new(|| {
    PasswordHasher::with_default_algorithms()
        .unwrap_or_else(|e| panic!("failed to register built-in algorithms: {}", e))
});

/// 进程级默认哈希器（内置算法，共享策略表）
pub fn global() -> &'static PasswordHasher {
    &GLOBAL
}

/// 使用进程级哈希器哈希密码
///
/// ```rust
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// use hashy::Params;
///
/// let options = Params::new().with("cost", 4u32);
/// let hash = hashy::hash("my_password", Some("bcrypt"), Some(&options)).await.unwrap();
/// assert!(hashy::verify("my_password", &hash).await.unwrap());
/// # });
/// ```
pub async fn hash(
    secret: &str,
    algorithm: Option<&str>,
    options: Option<&Params>,
) -> Result<String> {
    global().hash(secret, algorithm, options).await
}

/// 使用进程级哈希器验证密码
pub async fn verify(secret: &str, hash: &str) -> Result<bool> {
    global().verify(secret, hash).await
}

/// 使用进程级哈希器解析哈希
pub fn get_info(hash: &str) -> Result<HashInfo> {
    global().get_info(hash)
}

/// 使用进程级哈希器判断是否需要重哈希
pub fn needs_rehash(
    hash: &str,
    algorithm: Option<&str>,
    options: Option<&Params>,
) -> Result<bool> {
    global().needs_rehash(hash, algorithm, options)
}

/// 进程级策略表
pub fn options() -> &'static PolicyStore {
    global().options()
}

/// 进程级默认算法名称
pub fn default_algorithm() -> &'static str {
    global().default_algorithm()
}
