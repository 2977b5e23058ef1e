use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::data::graphql::q;

/// Serializable wrapper around a parser AST value, used where variable
/// values need to appear in serialized form (e.g. query logs).
pub struct SerializableValue<'a>(pub &'a q::Value);

impl Serialize for SerializableValue<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0 {
            q::Value::Variable(name) => serializer.serialize_str(name),
            q::Value::Int(num) => serializer.serialize_i64(num.as_i64().unwrap_or_default()),
            q::Value::Float(f) => serializer.serialize_f64(*f),
            q::Value::String(s) => serializer.serialize_str(s),
            q::Value::Boolean(b) => serializer.serialize_bool(*b),
            q::Value::Null => serializer.serialize_none(),
            q::Value::Enum(name) => serializer.serialize_str(name),
            q::Value::List(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(&SerializableValue(value))?;
                }
                seq.end()
            }
            q::Value::Object(map) => {
                let mut m = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    m.serialize_entry(key, &SerializableValue(value))?;
                }
                m.end()
            }
        }
    }
}
