//! 算法注册表
//!
//! 维护两张查找表：算法名称 → 后端、哈希标识符 → 后端，
//! 并记录默认算法（第一个注册的算法）。
//!
//! 注册表在启动时一次性构建，之后只读；名称或标识符冲突属于致命的配置错误。

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::algorithm::Algorithm;
use crate::error::{ConfigError, PasswordHashError, Result};

/// 算法注册表
#[derive(Clone, Default)]
pub struct Registry {
    by_name: HashMap<String, Arc<dyn Algorithm>>,
    by_id: HashMap<String, Arc<dyn Algorithm>>,
    /// 注册顺序，第一个即默认算法
    order: Vec<String>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.by_id.keys().collect();
        ids.sort();
        f.debug_struct("Registry")
            .field("algorithms", &self.order)
            .field("ids", &ids)
            .finish()
    }
}

impl Registry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册算法
    ///
    /// 名称已存在、标识符已被占用（包括同一算法内重复）时返回 [`ConfigError`]，
    /// 此时注册表保持不变。
    pub fn register(&mut self, algorithm: Arc<dyn Algorithm>) -> Result<()> {
        let name = algorithm.name().to_string();

        if self.by_name.contains_key(&name) {
            warn!(algorithm = %name, "duplicate algorithm name");
            return Err(ConfigError::DuplicateName(name).into());
        }

        let ids: Vec<String> = algorithm.ids().iter().map(|id| id.to_string()).collect();
        for (index, id) in ids.iter().enumerate() {
            if self.by_id.contains_key(id) || ids[..index].contains(id) {
                warn!(algorithm = %name, id = %id, "duplicate hash identifier");
                return Err(ConfigError::DuplicateId {
                    id: id.clone(),
                    algorithm: name,
                }
                .into());
            }
        }

        debug!(
            algorithm = %name,
            ids = ?ids,
            default = self.order.is_empty(),
            "registered hash algorithm"
        );

        for id in ids {
            self.by_id.insert(id, Arc::clone(&algorithm));
        }
        self.by_name.insert(name.clone(), algorithm);
        self.order.push(name);

        Ok(())
    }

    /// 按名称查找算法
    pub fn by_name(&self, name: &str) -> Result<&Arc<dyn Algorithm>> {
        self.by_name
            .get(name)
            .ok_or_else(|| PasswordHashError::UnsupportedAlgorithm(name.to_string()).into())
    }

    /// 按哈希标识符查找算法
    pub fn by_id(&self, id: &str) -> Result<&Arc<dyn Algorithm>> {
        self.by_id
            .get(id)
            .ok_or_else(|| PasswordHashError::UnknownAlgorithm(id.to_string()).into())
    }

    /// 默认算法名称（第一个注册的算法）
    pub fn default_algorithm(&self) -> Option<&str> {
        self.order.first().map(String::as_str)
    }

    /// 按注册顺序列出算法名称
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// 按注册顺序遍历算法
    pub fn algorithms(&self) -> impl Iterator<Item = &Arc<dyn Algorithm>> {
        self.order.iter().filter_map(|name| self.by_name.get(name))
    }

    /// 已注册算法数量
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::RawHash;
    use crate::params::Params;
    use async_trait::async_trait;

    struct Fake {
        name: &'static str,
        ids: &'static [&'static str],
    }

    #[async_trait]
    impl Algorithm for Fake {
        fn name(&self) -> &str {
            self.name
        }

        fn ids(&self) -> &[&str] {
            self.ids
        }

        fn defaults(&self) -> Params {
            Params::new()
        }

        fn parse_params(&self, _hash: &str, _raw: &RawHash<'_>) -> Result<Params> {
            Ok(Params::new())
        }

        async fn hash(&self, _secret: &str, _params: &Params) -> Result<String> {
            Ok(String::new())
        }

        async fn verify(&self, _secret: &str, _hash: &str) -> Result<bool> {
            Ok(false)
        }
    }

    fn fake(name: &'static str, ids: &'static [&'static str]) -> Arc<dyn Algorithm> {
        Arc::new(Fake { name, ids })
    }

    #[test]
    fn test_first_registered_is_default() {
        let mut registry = Registry::new();
        assert_eq!(registry.default_algorithm(), None);

        registry.register(fake("one", &["1"])).unwrap();
        registry.register(fake("two", &["2", "2b"])).unwrap();

        assert_eq!(registry.default_algorithm(), Some("one"));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["one", "two"]);
        assert_eq!(registry.by_id("2b").unwrap().name(), "two");
        assert_eq!(registry.by_name("one").unwrap().name(), "one");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_name() {
        let mut registry = Registry::new();
        registry.register(fake("one", &["1"])).unwrap();

        let err = registry.register(fake("one", &["x"])).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Config(ConfigError::DuplicateName(ref name)) if name == "one"
        ));
        // 失败的注册不会留下任何标识符
        assert!(registry.by_id("x").is_err());
    }

    #[test]
    fn test_duplicate_id_across_algorithms() {
        let mut registry = Registry::new();
        registry.register(fake("one", &["1", "shared"])).unwrap();

        let err = registry.register(fake("two", &["2", "shared"])).unwrap_err();
        assert!(err.is_config());
        assert!(registry.by_name("two").is_err());
        assert!(registry.by_id("2").is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_id_within_algorithm() {
        let mut registry = Registry::new();
        let err = registry.register(fake("one", &["1", "1"])).unwrap_err();
        assert!(err.is_config());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_lookup_errors() {
        let registry = Registry::new();
        assert!(registry.by_name("scrypt").err().unwrap().is_unsupported_algorithm());
        assert!(registry.by_id("7").err().unwrap().is_unknown_algorithm());
    }
}
