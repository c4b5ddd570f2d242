use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Value;

/// Generic tree decoded from a PxOrder XML result.
///
/// The service documents many response shapes and the client enforces none of
/// them, so callers navigate the tree by element name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayResponse {
    Scalar(String),
    List(Vec<GatewayResponse>),
    Map(Vec<(String, GatewayResponse)>),
}

impl GatewayResponse {
    pub fn empty_map() -> Self {
        Self::Map(Vec::new())
    }

    /// Looks up a key in a `Map` node.
    pub fn get(&self, key: &str) -> Option<&GatewayResponse> {
        match self {
            Self::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Follows a path of keys through nested maps.
    pub fn path(&self, keys: &[&str]) -> Option<&GatewayResponse> {
        keys.iter().try_fold(self, |node, key| node.get(key))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[GatewayResponse]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_empty_map(&self) -> bool {
        matches!(self, Self::Map(entries) if entries.is_empty())
    }

    pub fn to_json(&self) -> Value {
        Value::from(self.clone())
    }
}

impl From<GatewayResponse> for Value {
    fn from(node: GatewayResponse) -> Self {
        match node {
            GatewayResponse::Scalar(s) => Value::String(s),
            GatewayResponse::List(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            GatewayResponse::Map(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for GatewayResponse {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => GatewayResponse::empty_map(),
            Value::Bool(b) => GatewayResponse::Scalar(b.to_string()),
            Value::Number(n) => GatewayResponse::Scalar(n.to_string()),
            Value::String(s) => GatewayResponse::Scalar(s),
            Value::Array(items) => {
                GatewayResponse::List(items.into_iter().map(GatewayResponse::from).collect())
            }
            Value::Object(map) => GatewayResponse::Map(
                map.into_iter()
                    .map(|(k, v)| (k, GatewayResponse::from(v)))
                    .collect(),
            ),
        }
    }
}

// Serialized directly rather than through `Value` so map entries keep
// document order.
impl Serialize for GatewayResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GatewayResponse::Scalar(s) => serializer.serialize_str(s),
            GatewayResponse::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            GatewayResponse::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}
