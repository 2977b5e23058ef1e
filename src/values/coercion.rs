use std::collections::HashMap;

use graphql_parser::Pos;

use crate::data::graphql::q;
use crate::data::query::QueryExecutionError;
use crate::data::value as r;
use crate::schema as s;
use crate::schema::ast as sast;

/// A GraphQL value that can be coerced according to a type.
pub trait MaybeCoercible<T> {
    fn coerce(&self, using_type: &T) -> Option<r::Value>;
}

impl MaybeCoercible<s::ScalarType> for q::Value {
    fn coerce(&self, using_type: &s::ScalarType) -> Option<r::Value> {
        match (using_type, self) {
            (_, q::Value::Null) => Some(r::Value::Null),
            (s::ScalarType::Boolean, q::Value::Boolean(b)) => Some(r::Value::Boolean(*b)),
            (s::ScalarType::Int, q::Value::Int(num)) => {
                let num = num.as_i64()?;
                if i32::MIN as i64 <= num && num <= i32::MAX as i64 {
                    Some(r::Value::Int(num))
                } else {
                    None
                }
            }
            (s::ScalarType::Float, q::Value::Float(f)) => Some(r::Value::Float(*f)),
            (s::ScalarType::Float, q::Value::Int(num)) => {
                Some(r::Value::Float(num.as_i64()? as f64))
            }
            (s::ScalarType::String, q::Value::String(s)) => Some(r::Value::String(s.clone())),
            (s::ScalarType::ID, q::Value::String(s)) => Some(r::Value::String(s.clone())),
            (s::ScalarType::ID, q::Value::Int(num)) => {
                Some(r::Value::String(num.as_i64()?.to_string()))
            }
            _ => None,
        }
    }
}

/// Resolves a type written in a query document, e.g. the declared type of
/// a variable, against the scalar types inputs accept.
pub(crate) fn declared_input_type(ty: &q::Type) -> Result<s::Type, QueryExecutionError> {
    match ty {
        q::Type::NamedType(name) => s::ScalarType::from_name(name)
            .map(s::Type::Scalar)
            .ok_or_else(|| QueryExecutionError::NamedTypeError(name.clone())),
        q::Type::ListType(inner) => Ok(s::Type::list(declared_input_type(inner)?)),
        q::Type::NonNullType(inner) => Ok(s::Type::non_null(declared_input_type(inner)?)),
    }
}

/// Coerces an argument into a runtime value.
///
/// `Ok(None)` happens when no value is found for a nullable argument.
pub(crate) fn coerce_input_value(
    mut value: Option<q::Value>,
    def: &s::InputValue,
    variable_values: &HashMap<String, q::Value>,
    position: Pos,
) -> Result<Option<r::Value>, QueryExecutionError> {
    if let Some(q::Value::Variable(name)) = value {
        value = variable_values.get(&name).cloned();
    };

    // Extract the value, checking for null or missing. Defaults are
    // already runtime values and need no coercion.
    let value = match value {
        Some(value) => value,
        None => {
            return match &def.default_value {
                Some(default) => Ok(Some(default.clone())),
                None if sast::is_non_null_type(&def.value_type) => Err(
                    QueryExecutionError::MissingArgumentError(position, def.name.clone()),
                ),
                None => Ok(None),
            };
        }
    };

    Ok(Some(
        coerce_value(&value, &def.value_type, variable_values).ok_or_else(|| {
            QueryExecutionError::InvalidArgumentError(position, def.name.clone(), value.clone())
        })?,
    ))
}

pub(crate) fn coerce_value(
    value: &q::Value,
    ty: &s::Type,
    variable_values: &HashMap<String, q::Value>,
) -> Option<r::Value> {
    match (ty, value) {
        (_, q::Value::Variable(name)) => {
            let value = variable_values.get(name).cloned().unwrap_or(q::Value::Null);
            coerce_value(&value, ty, variable_values)
        }

        // Null values cannot be coerced into non-null types.
        (s::Type::NonNull(_), q::Value::Null) => None,

        // Non-null values may be coercible into non-null types.
        (s::Type::NonNull(inner), _) => coerce_value(value, inner, variable_values),

        // Nullable types can be null.
        (_, q::Value::Null) => Some(r::Value::Null),

        (s::Type::Scalar(scalar_type), _) => value.coerce(scalar_type),

        // List values are coercible if their values are coercible into
        // the inner type.
        (s::Type::List(inner), q::Value::List(values)) => {
            let mut coerced_values = Vec::new();
            for value in values {
                coerced_values.push(coerce_value(value, inner, variable_values)?);
            }
            Some(r::Value::List(coerced_values))
        }

        // Otherwise the value is not coercible into a list.
        (s::Type::List(_), _) => None,

        // Object types never appear in input positions.
        (s::Type::Object(_), _) => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use graphql_parser::Pos;
    use maplit::hashmap;

    use super::{coerce_input_value, coerce_value, declared_input_type, MaybeCoercible};
    use crate::data::graphql::q;
    use crate::data::query::QueryExecutionError;
    use crate::data::value as r;
    use crate::schema as s;

    fn no_variables() -> HashMap<String, q::Value> {
        HashMap::new()
    }

    #[test]
    fn coerce_int_scalar() {
        assert_eq!(
            q::Value::Int(13289123.into()).coerce(&s::ScalarType::Int),
            Some(r::Value::Int(13289123))
        );
        assert_eq!(
            q::Value::Int((-13289123).into()).coerce(&s::ScalarType::Int),
            Some(r::Value::Int(-13289123))
        );

        // Other kinds of values are not valid ints.
        assert_eq!(
            q::Value::String("1".to_owned()).coerce(&s::ScalarType::Int),
            None
        );
        assert_eq!(q::Value::Float(1.0).coerce(&s::ScalarType::Int), None);
        assert_eq!(q::Value::Boolean(true).coerce(&s::ScalarType::Int), None);
    }

    #[test]
    fn coerce_boolean_scalar() {
        assert_eq!(
            q::Value::Boolean(true).coerce(&s::ScalarType::Boolean),
            Some(r::Value::Boolean(true))
        );
        assert_eq!(
            q::Value::Boolean(false).coerce(&s::ScalarType::Boolean),
            Some(r::Value::Boolean(false))
        );

        assert_eq!(
            q::Value::String("true".to_owned()).coerce(&s::ScalarType::Boolean),
            None
        );
    }

    #[test]
    fn coerce_float_scalar() {
        assert_eq!(
            q::Value::Float(23.7).coerce(&s::ScalarType::Float),
            Some(r::Value::Float(23.7))
        );

        // Ints widen to floats.
        assert_eq!(
            q::Value::Int(23.into()).coerce(&s::ScalarType::Float),
            Some(r::Value::Float(23.0))
        );

        assert_eq!(
            q::Value::String("23.7".to_owned()).coerce(&s::ScalarType::Float),
            None
        );
    }

    #[test]
    fn coerce_id_scalar() {
        assert_eq!(
            q::Value::String("one".to_owned()).coerce(&s::ScalarType::ID),
            Some(r::Value::String("one".to_owned()))
        );

        // Ints are turned into string ids.
        assert_eq!(
            q::Value::Int(1234.into()).coerce(&s::ScalarType::ID),
            Some(r::Value::String("1234".to_owned()))
        );

        assert_eq!(q::Value::Boolean(true).coerce(&s::ScalarType::ID), None);
    }

    #[test]
    fn null_values_coerce_into_nullable_types_only() {
        assert_eq!(
            coerce_value(&q::Value::Null, &s::Type::int(), &no_variables()),
            Some(r::Value::Null)
        );
        assert_eq!(
            coerce_value(
                &q::Value::Null,
                &s::Type::non_null(s::Type::int()),
                &no_variables()
            ),
            None
        );
    }

    #[test]
    fn list_values_coerce_element_by_element() {
        let value = q::Value::List(vec![q::Value::Int(1.into()), q::Value::Int(2.into())]);
        assert_eq!(
            coerce_value(&value, &s::Type::list(s::Type::int()), &no_variables()),
            Some(r::Value::List(vec![r::Value::Int(1), r::Value::Int(2)]))
        );

        // One bad element fails the whole list.
        let value = q::Value::List(vec![q::Value::Int(1.into()), q::Value::Boolean(true)]);
        assert_eq!(
            coerce_value(&value, &s::Type::list(s::Type::int()), &no_variables()),
            None
        );
    }

    #[test]
    fn missing_nullable_argument_coerces_to_nothing() {
        let def = s::InputValue::new("id", s::Type::int());
        assert_eq!(
            coerce_input_value(None, &def, &no_variables(), Pos::default()),
            Ok(None)
        );
    }

    #[test]
    fn missing_non_null_argument_is_an_error() {
        let def = s::InputValue::new("Title", s::Type::non_null(s::Type::string()));
        assert_eq!(
            coerce_input_value(None, &def, &no_variables(), Pos::default()),
            Err(QueryExecutionError::MissingArgumentError(
                Pos::default(),
                "Title".to_owned()
            ))
        );
    }

    #[test]
    fn missing_argument_with_default_uses_the_default() {
        let def = s::InputValue::new("first", s::Type::int()).default_value(10);
        assert_eq!(
            coerce_input_value(None, &def, &no_variables(), Pos::default()),
            Ok(Some(r::Value::Int(10)))
        );
    }

    #[test]
    fn mistyped_argument_is_an_error() {
        let def = s::InputValue::new("id", s::Type::int());
        let value = q::Value::String("one".to_owned());
        assert_eq!(
            coerce_input_value(Some(value.clone()), &def, &no_variables(), Pos::default()),
            Err(QueryExecutionError::InvalidArgumentError(
                Pos::default(),
                "id".to_owned(),
                value
            ))
        );
    }

    #[test]
    fn variables_substitute_into_arguments() {
        let def = s::InputValue::new("id", s::Type::int());
        let variables = hashmap! { "id".to_owned() => q::Value::Int(7.into()) };
        assert_eq!(
            coerce_input_value(
                Some(q::Value::Variable("id".to_owned())),
                &def,
                &variables,
                Pos::default()
            ),
            Ok(Some(r::Value::Int(7)))
        );

        // An unbound variable behaves like a missing argument.
        assert_eq!(
            coerce_input_value(
                Some(q::Value::Variable("other".to_owned())),
                &def,
                &no_variables(),
                Pos::default()
            ),
            Ok(None)
        );
    }

    #[test]
    fn declared_input_types_resolve_to_scalars() {
        assert_eq!(
            declared_input_type(&q::Type::NamedType("Int".to_owned())),
            Ok(s::Type::int())
        );
        assert_eq!(
            declared_input_type(&q::Type::NonNullType(Box::new(q::Type::NamedType(
                "String".to_owned()
            )))),
            Ok(s::Type::non_null(s::Type::string()))
        );
        assert_eq!(
            declared_input_type(&q::Type::NamedType("Tutorial".to_owned())),
            Err(QueryExecutionError::NamedTypeError("Tutorial".to_owned()))
        );
    }
}
