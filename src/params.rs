//! 算法参数集
//!
//! [`Params`] 是从哈希字符串中解析出的（或策略中配置的）参数表，
//! 键为参数名（如 `cost`、`memoryCost`），值为数字、布尔或字符串。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 单个参数值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// 数值参数，参与通用的重哈希比较
    Number(u64),
    /// 布尔标记
    Bool(bool),
    /// 字符串参数（如 Argon2 的变体名）
    Text(String),
}

impl ParamValue {
    /// 数值，非数值参数返回 `None`
    pub fn as_number(&self) -> Option<u64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// 字符串值
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// 布尔值
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(n) => write!(f, "{}", n),
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Number(u64::from(value))
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

/// 参数集，按键名排序
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    /// 创建空参数集
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置参数（构建器风格）
    ///
    /// ```rust
    /// use hashy::Params;
    ///
    /// let params = Params::new().with("cost", 12u32);
    /// assert_eq!(params.number("cost"), Some(12));
    /// ```
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// 设置参数，返回旧值
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.0.insert(key.into(), value.into())
    }

    /// 移除参数
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.0.remove(key)
    }

    /// 获取参数
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// 获取数值参数
    pub fn number(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(ParamValue::as_number)
    }

    /// 获取字符串参数
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ParamValue::as_text)
    }

    /// 是否包含参数
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// 参数个数
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 按键名顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// 以 `overlay` 覆盖当前参数，返回新的参数集
    ///
    /// `overlay` 中的同名参数优先。
    pub fn merged(&self, overlay: &Params) -> Params {
        let mut merged = self.clone();
        merged.extend_from(overlay);
        merged
    }

    /// 原地合并 `overlay`
    pub fn extend_from(&mut self, overlay: &Params) {
        for (key, value) in &overlay.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
