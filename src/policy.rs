//! 策略表
//!
//! 按算法名称保存当前的默认参数（如 bcrypt 的 `cost`）。
//! 未显式传入参数时，哈希生成和重哈希判定都以此为准，且每次调用都会重新读取。
//!
//! ## 示例
//!
//! ```rust
//! use hashy::PolicyStore;
//!
//! let policy = PolicyStore::new();
//! policy.seed("bcrypt", hashy::Params::new().with("cost", 10u32)).unwrap();
//!
//! // 提高 bcrypt 的 cost，之后生成的哈希和重哈希判定都会使用新值
//! policy.set("bcrypt", "cost", 12u32).unwrap();
//! assert_eq!(policy.get("bcrypt").unwrap().unwrap().number("cost"), Some(12));
//! ```

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::error::{ConfigError, Error, Result};
use crate::params::{ParamValue, Params};

/// 策略表
///
/// 克隆得到的句柄共享同一份数据。
#[derive(Debug, Clone, Default)]
pub struct PolicyStore {
    entries: Arc<RwLock<HashMap<String, Params>>>,
}

impl PolicyStore {
    /// 创建空策略表
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入算法的初始参数（注册算法时调用）
    pub fn seed(&self, algorithm: &str, defaults: Params) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| Error::internal("Failed to acquire lock"))?;
        entries.insert(algorithm.to_string(), defaults);
        Ok(())
    }

    /// 获取算法当前参数的副本
    pub fn get(&self, algorithm: &str) -> Result<Option<Params>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| Error::internal("Failed to acquire lock"))?;
        Ok(entries.get(algorithm).cloned())
    }

    /// 是否包含算法
    pub fn contains(&self, algorithm: &str) -> Result<bool> {
        let entries = self
            .entries
            .read()
            .map_err(|_| Error::internal("Failed to acquire lock"))?;
        Ok(entries.contains_key(algorithm))
    }

    /// 已配置的算法名称（按名称排序）
    pub fn names(&self) -> Result<Vec<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| Error::internal("Failed to acquire lock"))?;
        let mut names: Vec<String> = entries.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// 设置单个参数
    pub fn set(
        &self,
        algorithm: &str,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Result<()> {
        let key = key.into();
        let value = value.into();
        debug!(algorithm, key = %key, value = %value, "policy parameter updated");
        self.update(algorithm, |params| {
            params.insert(key, value);
        })
    }

    /// 原地修改算法参数
    pub fn update<F>(&self, algorithm: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut Params),
    {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| Error::internal("Failed to acquire lock"))?;
        let params = entries
            .get_mut(algorithm)
            .ok_or_else(|| unknown_algorithm(algorithm))?;
        f(params);
        Ok(())
    }

    /// 整体替换算法参数
    pub fn replace(&self, algorithm: &str, params: Params) -> Result<()> {
        self.update(algorithm, |current| *current = params)
    }

    /// 合并 JSON 形式的策略配置
    ///
    /// 格式为 `{ "<算法>": { "<参数>": 值 } }`，只能配置已存在的算法。
    /// 任何一项无效时整个文档都不会生效。
    ///
    /// ```rust
    /// use hashy::{Params, PolicyStore};
    ///
    /// let policy = PolicyStore::new();
    /// policy.seed("bcrypt", Params::new().with("cost", 10u32)).unwrap();
    /// policy.apply_json(r#"{ "bcrypt": { "cost": 12 } }"#).unwrap();
    /// assert_eq!(policy.get("bcrypt").unwrap().unwrap().number("cost"), Some(12));
    ///
    /// assert!(policy.apply_json(r#"{ "md5": {} }"#).is_err());
    /// ```
    pub fn apply_json(&self, json: &str) -> Result<()> {
        let document: HashMap<String, Params> =
            serde_json::from_str(json).map_err(|e| ConfigError::InvalidValue {
                key: "policy".to_string(),
                message: e.to_string(),
            })?;

        let mut entries = self
            .entries
            .write()
            .map_err(|_| Error::internal("Failed to acquire lock"))?;
        if let Some(name) = document.keys().find(|name| !entries.contains_key(*name)) {
            return Err(unknown_algorithm(name));
        }
        for (name, overlay) in document {
            debug!(algorithm = %name, "policy updated from json");
            if let Some(params) = entries.get_mut(&name) {
                params.extend_from(&overlay);
            }
        }
        Ok(())
    }
}

fn unknown_algorithm(algorithm: &str) -> Error {
    ConfigError::InvalidValue {
        key: algorithm.to_string(),
        message: "no such algorithm in policy".to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> PolicyStore {
        let store = PolicyStore::new();
        store.seed("bcrypt", Params::new().with("cost", 10u32)).unwrap();
        store
    }

    #[test]
    fn test_set_is_visible_through_clones() {
        let store = store();
        let handle = store.clone();

        handle.set("bcrypt", "cost", 5u32).unwrap();
        assert_eq!(store.get("bcrypt").unwrap().unwrap().number("cost"), Some(5));
    }

    #[test]
    fn test_set_unknown_algorithm() {
        let store = store();
        let err = store.set("scrypt", "n", 14u32).unwrap_err();
        assert!(err.is_config());
        assert!(!store.contains("scrypt").unwrap());
    }

    #[test]
    fn test_replace_and_update() {
        let store = store();
        store
            .replace("bcrypt", Params::new().with("cost", 11u32).with("legacy", true))
            .unwrap();
        store
            .update("bcrypt", |params| {
                params.remove("legacy");
            })
            .unwrap();

        assert_eq!(store.get("bcrypt").unwrap().unwrap(), Params::new().with("cost", 11u32));
    }

    #[test]
    fn test_apply_json_is_all_or_nothing() {
        let store = store();
        let err = store
            .apply_json(r#"{ "bcrypt": { "cost": 12 }, "md5": { "rounds": 1 } }"#)
            .unwrap_err();
        assert!(err.is_config());
        assert_eq!(store.get("bcrypt").unwrap().unwrap().number("cost"), Some(10));

        assert!(store.apply_json("not json").is_err());
    }

    #[test]
    fn test_names() {
        let store = store();
        store.seed("argon2", Params::new()).unwrap();
        assert_eq!(
            store.names().unwrap(),
            vec!["argon2".to_string(), "bcrypt".to_string()]
        );
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let store = store();
        let handle = store.clone();

        // 在持有写锁时 panic，使锁中毒
        let result = std::thread::spawn(move || {
            let _ = handle.update("bcrypt", |_| panic!("policy writer crashed"));
        })
        .join();
        assert!(result.is_err());

        assert!(matches!(store.get("bcrypt"), Err(Error::Internal(_))));
        assert!(matches!(store.contains("bcrypt"), Err(Error::Internal(_))));
        assert!(matches!(store.names(), Err(Error::Internal(_))));
        assert!(matches!(
            store.seed("argon2", Params::new()),
            Err(Error::Internal(_))
        ));
        assert!(matches!(
            store.set("bcrypt", "cost", 12u32),
            Err(Error::Internal(_))
        ));
    }
}
