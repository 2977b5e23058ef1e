use anyhow::{anyhow, Error};
use std::collections::HashMap;

use crate::data::value as r;

/// Conversion of a runtime value into a plain Rust type. Implemented for
/// the types resolver arguments are extracted into.
pub trait TryFromValue: Sized {
    fn try_from_value(value: &r::Value) -> Result<Self, Error>;
}

impl TryFromValue for r::Value {
    fn try_from_value(value: &r::Value) -> Result<Self, Error> {
        Ok(value.clone())
    }
}

impl TryFromValue for bool {
    fn try_from_value(value: &r::Value) -> Result<Self, Error> {
        match value {
            r::Value::Boolean(b) => Ok(*b),
            _ => Err(anyhow!("Cannot parse value into a boolean: {:?}", value)),
        }
    }
}

impl TryFromValue for String {
    fn try_from_value(value: &r::Value) -> Result<Self, Error> {
        match value {
            r::Value::String(s) => Ok(s.clone()),
            r::Value::Enum(s) => Ok(s.clone()),
            _ => Err(anyhow!("Cannot parse value into a string: {:?}", value)),
        }
    }
}

impl TryFromValue for i64 {
    fn try_from_value(value: &r::Value) -> Result<Self, Error> {
        match value {
            r::Value::Int(n) => Ok(*n),
            _ => Err(anyhow!("Cannot parse value into an integer: {:?}", value)),
        }
    }
}

impl TryFromValue for i32 {
    fn try_from_value(value: &r::Value) -> Result<Self, Error> {
        match value {
            r::Value::Int(n) => i32::try_from(*n)
                .map_err(|_| anyhow!("Integer value does not fit into 32 bits: {}", n)),
            _ => Err(anyhow!("Cannot parse value into an integer: {:?}", value)),
        }
    }
}

impl<T> TryFromValue for Vec<T>
where
    T: TryFromValue,
{
    fn try_from_value(value: &r::Value) -> Result<Self, Error> {
        match value {
            r::Value::List(values) => values.iter().try_fold(vec![], |mut values, value| {
                values.push(T::try_from_value(value)?);
                Ok(values)
            }),
            _ => Err(anyhow!("Cannot parse value into a vector: {:?}", value)),
        }
    }
}

/// Typed lookup of keys in a value map, such as the coerced argument map a
/// resolver receives.
pub trait ValueMap {
    fn get_required<T: TryFromValue>(&self, key: &str) -> Result<T, Error>;
    fn get_optional<T: TryFromValue>(&self, key: &str) -> Result<Option<T>, Error>;
}

impl ValueMap for r::Value {
    fn get_required<T: TryFromValue>(&self, key: &str) -> Result<T, Error> {
        match self {
            r::Value::Object(map) => map
                .get(key)
                .ok_or_else(|| anyhow!("Required field `{}` not set", key))
                .and_then(T::try_from_value),
            _ => Err(anyhow!("value is not a map: {:?}", self)),
        }
    }

    fn get_optional<T>(&self, key: &str) -> Result<Option<T>, Error>
    where
        T: TryFromValue,
    {
        match self {
            r::Value::Object(map) => map.get(key).map_or(Ok(None), |value| match value {
                r::Value::Null => Ok(None),
                _ => T::try_from_value(value).map(Some),
            }),
            _ => Err(anyhow!("value is not a map: {:?}", self)),
        }
    }
}

impl ValueMap for &HashMap<String, r::Value> {
    fn get_required<T>(&self, key: &str) -> Result<T, Error>
    where
        T: TryFromValue,
    {
        self.get(key)
            .ok_or_else(|| anyhow!("Required field `{}` not set", key))
            .and_then(T::try_from_value)
    }

    fn get_optional<T>(&self, key: &str) -> Result<Option<T>, Error>
    where
        T: TryFromValue,
    {
        self.get(key).map_or(Ok(None), |value| match value {
            r::Value::Null => Ok(None),
            _ => T::try_from_value(value).map(Some),
        })
    }
}
