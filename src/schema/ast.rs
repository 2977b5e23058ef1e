use crate::schema::{Field, ObjectType, Type};

/// Looks up the field of `object_type` with the given name.
pub fn get_field<'a, C>(object_type: &'a ObjectType<C>, name: &str) -> Option<&'a Field<C>> {
    object_type.fields.iter().find(|field| field.name == name)
}

/// Returns true if the given type is a non-null type.
pub fn is_non_null_type(field_type: &Type) -> bool {
    matches!(field_type, Type::NonNull(_))
}

/// Strips at most one level of non-null from the given type.
pub fn inner_type(field_type: &Type) -> &Type {
    match field_type {
        Type::NonNull(inner) => inner,
        _ => field_type,
    }
}
