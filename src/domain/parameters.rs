use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// A single scalar call parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Integer(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParamValue::Text(s) => serializer.serialize_str(s),
            ParamValue::Integer(n) => serializer.serialize_i64(*n),
        }
    }
}

/// Named parameters for one remote call, in insertion order.
///
/// Setting an existing key replaces the value in place; new keys are appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallParameters {
    entries: Vec<(String, ParamValue)>,
}

impl CallParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for CallParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.set(key, value);
        }
        params
    }
}

impl Serialize for CallParameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_in_place() {
        let mut params = CallParameters::new()
            .with("accountNumber", "1")
            .with("price", 100);
        params.set("accountNumber", "2");
        params.set("hash", "abc");

        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["accountNumber", "price", "hash"]);
        assert_eq!(params.get("accountNumber"), Some(&ParamValue::from("2")));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_display_and_serialize() {
        assert_eq!(ParamValue::Integer(-5).to_string(), "-5");
        assert_eq!(ParamValue::from("SALE").to_string(), "SALE");

        let params: CallParameters = [("orderRef", "abc")].into_iter().collect();
        let params = params.with("price", 100);
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(json, r#"{"orderRef":"abc","price":100}"#);
    }
}
