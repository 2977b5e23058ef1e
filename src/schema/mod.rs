use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::data::graphql::IntoValue;
use crate::data::value as r;

/// Utilities for working with schema types.
pub mod ast;

/// The built-in scalar types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarType {
    Int,
    Float,
    String,
    Boolean,
    ID,
}

impl ScalarType {
    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::Int => "Int",
            ScalarType::Float => "Float",
            ScalarType::String => "String",
            ScalarType::Boolean => "Boolean",
            ScalarType::ID => "ID",
        }
    }

    pub fn from_name(name: &str) -> Option<ScalarType> {
        match name {
            "Int" => Some(ScalarType::Int),
            "Float" => Some(ScalarType::Float),
            "String" => Some(ScalarType::String),
            "Boolean" => Some(ScalarType::Boolean),
            "ID" => Some(ScalarType::ID),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A type expression: what a field is declared to return or an argument
/// to accept. Object references are by name; `SchemaBuilder::build`
/// checks that every referenced name is defined, so lookups against a
/// built schema cannot dangle.
#[derive(Clone, Debug, PartialEq)]
pub enum Type {
    Scalar(ScalarType),
    Object(String),
    List(Box<Type>),
    NonNull(Box<Type>),
}

impl Type {
    pub fn int() -> Self {
        Type::Scalar(ScalarType::Int)
    }

    pub fn float() -> Self {
        Type::Scalar(ScalarType::Float)
    }

    pub fn string() -> Self {
        Type::Scalar(ScalarType::String)
    }

    pub fn boolean() -> Self {
        Type::Scalar(ScalarType::Boolean)
    }

    pub fn id() -> Self {
        Type::Scalar(ScalarType::ID)
    }

    pub fn object(name: impl Into<String>) -> Self {
        Type::Object(name.into())
    }

    pub fn list(inner: Type) -> Self {
        Type::List(Box::new(inner))
    }

    pub fn non_null(inner: Type) -> Self {
        Type::NonNull(Box::new(inner))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Type::Scalar(scalar) => write!(f, "{}", scalar),
            Type::Object(name) => write!(f, "{}", name),
            Type::List(inner) => write!(f, "[{}]", inner),
            Type::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

/// A declared argument of a field: its name, the scalar type it accepts
/// (with nullability), and an optional default applied when the query
/// provides no value.
#[derive(Clone, Debug, PartialEq)]
pub struct InputValue {
    pub name: String,
    pub value_type: Type,
    pub default_value: Option<r::Value>,
}

impl InputValue {
    pub fn new(name: impl Into<String>, value_type: Type) -> Self {
        InputValue {
            name: name.into(),
            value_type,
            default_value: None,
        }
    }

    pub fn default_value(mut self, value: impl IntoValue) -> Self {
        self.default_value = Some(value.into_value());
        self
    }
}

/// The inputs a field resolver receives.
pub struct ResolverParams<'a, C> {
    /// Value of the parent object; `Null` at the root when no root value
    /// was supplied.
    pub parent: &'a r::Value,
    /// Arguments coerced against the field's declared argument types.
    pub arguments: &'a HashMap<String, r::Value>,
    /// Per-request state, e.g. the store the schema was wired to.
    pub context: &'a C,
}

/// A field resolver: computes the field's value from the parent value,
/// the coerced arguments, and the request context.
pub type Resolver<C> =
    Arc<dyn Fn(ResolverParams<'_, C>) -> Result<r::Value, anyhow::Error> + Send + Sync>;

/// A single field of an object type. When no resolver is bound, the
/// executor falls back to reading the same-named attribute off the
/// parent value.
#[derive(Clone)]
pub struct Field<C> {
    pub name: String,
    pub description: Option<String>,
    pub field_type: Type,
    pub arguments: Vec<InputValue>,
    pub resolver: Option<Resolver<C>>,
}

impl<C> Field<C> {
    pub fn new(name: impl Into<String>, field_type: Type) -> Self {
        Field {
            name: name.into(),
            description: None,
            field_type,
            arguments: Vec::new(),
            resolver: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn argument(mut self, argument: InputValue) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn resolver(
        mut self,
        resolver: impl Fn(ResolverParams<'_, C>) -> Result<r::Value, anyhow::Error>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }
}

/// A named object type and its fields, in definition order.
#[derive(Clone)]
pub struct ObjectType<C> {
    pub name: String,
    pub fields: Vec<Field<C>>,
}

/// Errors raised while defining or building a schema. All of these are
/// fatal: the schema under construction is rejected before any query can
/// run against it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Type \"{0}\" is defined more than once")]
    DuplicateTypeName(String), // (type)
    #[error("Type \"{0}\" already has a field named \"{1}\"")]
    DuplicateFieldName(String, String), // (type, field)
    #[error(transparent)]
    Validation(#[from] SchemaValidationError),
}

/// Problems found when `build` checks the registry as a whole.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaValidationError {
    #[error("Root query type \"{0}\" is not defined")]
    RootQueryTypeUndefined(String), // (type)
    #[error("Root mutation type \"{0}\" is not defined")]
    RootMutationTypeUndefined(String), // (type)
    #[error("Type \"{0}\", field \"{1}\": referenced type \"{2}\" is not defined")]
    FieldTypeUnknown(String, String, String), // (type, field, referenced type)
    #[error("Type \"{0}\", field \"{1}\": argument \"{2}\" must have a scalar type")]
    NonScalarArgument(String, String, String), // (type, field, argument)
    #[error("Type \"{0}\", field \"{1}\": argument \"{2}\" is declared more than once")]
    DuplicateArgumentName(String, String, String), // (type, field, argument)
    #[error("Object type \"{0}\" declares no fields")]
    EmptyObjectType(String), // (type)
}

/// Handle to an object type registered with a [SchemaBuilder]. Handles
/// are only meaningful with the builder that created them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeHandle(usize);

/// Registry and validator for schemas. Object types are declared first,
/// fields are added to them through their handles, and `build` checks
/// the registry as a whole. Reference cycles between object types are
/// legal; all referenced names just have to be defined by the time
/// `build` runs.
pub struct SchemaBuilder<C> {
    types: Vec<ObjectType<C>>,
}

impl<C> SchemaBuilder<C> {
    pub fn new() -> Self {
        SchemaBuilder { types: Vec::new() }
    }

    pub fn define_object_type(&mut self, name: impl Into<String>) -> Result<TypeHandle, SchemaError> {
        let name = name.into();
        if self.types.iter().any(|t| t.name == name) {
            return Err(SchemaError::DuplicateTypeName(name));
        }
        self.types.push(ObjectType {
            name,
            fields: Vec::new(),
        });
        Ok(TypeHandle(self.types.len() - 1))
    }

    pub fn define_field(&mut self, handle: TypeHandle, field: Field<C>) -> Result<(), SchemaError> {
        let object_type = &mut self.types[handle.0];
        if object_type.fields.iter().any(|f| f.name == field.name) {
            return Err(SchemaError::DuplicateFieldName(
                object_type.name.clone(),
                field.name,
            ));
        }
        object_type.fields.push(field);
        Ok(())
    }

    pub fn build(
        self,
        query_type: &str,
        mutation_type: Option<&str>,
    ) -> Result<Schema<C>, SchemaError> {
        let defined: HashSet<&str> = self.types.iter().map(|t| t.name.as_str()).collect();

        for object_type in &self.types {
            if object_type.fields.is_empty() {
                return Err(SchemaValidationError::EmptyObjectType(object_type.name.clone()).into());
            }
            for field in &object_type.fields {
                if let Some(name) = undefined_reference(&field.field_type, &defined) {
                    return Err(SchemaValidationError::FieldTypeUnknown(
                        object_type.name.clone(),
                        field.name.clone(),
                        name.to_owned(),
                    )
                    .into());
                }
                let mut seen = HashSet::new();
                for argument in &field.arguments {
                    if !seen.insert(argument.name.as_str()) {
                        return Err(SchemaValidationError::DuplicateArgumentName(
                            object_type.name.clone(),
                            field.name.clone(),
                            argument.name.clone(),
                        )
                        .into());
                    }
                    if !is_scalar_input(&argument.value_type) {
                        return Err(SchemaValidationError::NonScalarArgument(
                            object_type.name.clone(),
                            field.name.clone(),
                            argument.name.clone(),
                        )
                        .into());
                    }
                }
            }
        }

        if !defined.contains(query_type) {
            return Err(SchemaValidationError::RootQueryTypeUndefined(query_type.to_owned()).into());
        }
        if let Some(mutation_type) = mutation_type {
            if !defined.contains(mutation_type) {
                return Err(SchemaValidationError::RootMutationTypeUndefined(
                    mutation_type.to_owned(),
                )
                .into());
            }
        }

        Ok(Schema {
            types: self
                .types
                .into_iter()
                .map(|t| (t.name.clone(), t))
                .collect(),
            query_type: query_type.to_owned(),
            mutation_type: mutation_type.map(str::to_owned),
        })
    }
}

impl<C> Default for SchemaBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the first object name in `field_type` that is not defined.
fn undefined_reference<'a>(field_type: &'a Type, defined: &HashSet<&str>) -> Option<&'a str> {
    match field_type {
        Type::Scalar(_) => None,
        Type::Object(name) => (!defined.contains(name.as_str())).then_some(name.as_str()),
        Type::List(inner) | Type::NonNull(inner) => undefined_reference(inner, defined),
    }
}

/// Arguments accept scalars, either nullable or wrapped in a single
/// non-null.
fn is_scalar_input(value_type: &Type) -> bool {
    matches!(ast::inner_type(value_type), Type::Scalar(_))
}

/// An immutable, validated schema: the unit queries execute against.
pub struct Schema<C> {
    types: BTreeMap<String, ObjectType<C>>,
    query_type: String,
    mutation_type: Option<String>,
}

impl<C> Schema<C> {
    pub fn object_type(&self, name: &str) -> Option<&ObjectType<C>> {
        self.types.get(name)
    }

    pub fn query_type(&self) -> Option<&ObjectType<C>> {
        self.types.get(&self.query_type)
    }

    pub fn mutation_type(&self) -> Option<&ObjectType<C>> {
        self.mutation_type
            .as_ref()
            .and_then(|name| self.types.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, field_type: Type) -> Field<()> {
        Field::new(name, field_type)
    }

    #[test]
    fn duplicate_type_names_are_rejected() {
        let mut builder: SchemaBuilder<()> = SchemaBuilder::new();
        builder.define_object_type("Tutorial").unwrap();
        assert_eq!(
            builder.define_object_type("Tutorial"),
            Err(SchemaError::DuplicateTypeName("Tutorial".to_owned()))
        );
    }

    #[test]
    fn duplicate_field_names_are_rejected() {
        let mut builder: SchemaBuilder<()> = SchemaBuilder::new();
        let tutorial = builder.define_object_type("Tutorial").unwrap();
        builder
            .define_field(tutorial, field("Title", Type::string()))
            .unwrap();
        assert_eq!(
            builder.define_field(tutorial, field("Title", Type::string())),
            Err(SchemaError::DuplicateFieldName(
                "Tutorial".to_owned(),
                "Title".to_owned()
            ))
        );
    }

    #[test]
    fn unknown_field_types_fail_validation() {
        let mut builder: SchemaBuilder<()> = SchemaBuilder::new();
        let query = builder.define_object_type("Query").unwrap();
        builder
            .define_field(query, field("tutorial", Type::object("Tutorial")))
            .unwrap();
        assert_eq!(
            builder.build("Query", None),
            Err(SchemaError::Validation(
                SchemaValidationError::FieldTypeUnknown(
                    "Query".to_owned(),
                    "tutorial".to_owned(),
                    "Tutorial".to_owned()
                )
            ))
        );
    }

    #[test]
    fn missing_root_query_type_fails_validation() {
        let mut builder: SchemaBuilder<()> = SchemaBuilder::new();
        let tutorial = builder.define_object_type("Tutorial").unwrap();
        builder
            .define_field(tutorial, field("Title", Type::string()))
            .unwrap();
        assert_eq!(
            builder.build("Query", None),
            Err(SchemaError::Validation(
                SchemaValidationError::RootQueryTypeUndefined("Query".to_owned())
            ))
        );
    }

    #[test]
    fn non_scalar_arguments_fail_validation() {
        let mut builder: SchemaBuilder<()> = SchemaBuilder::new();
        let query = builder.define_object_type("Query").unwrap();
        builder
            .define_field(
                query,
                field("search", Type::string())
                    .argument(InputValue::new("filter", Type::list(Type::int()))),
            )
            .unwrap();
        assert_eq!(
            builder.build("Query", None),
            Err(SchemaError::Validation(
                SchemaValidationError::NonScalarArgument(
                    "Query".to_owned(),
                    "search".to_owned(),
                    "filter".to_owned()
                )
            ))
        );
    }

    #[test]
    fn reference_cycles_are_permitted() {
        let mut builder: SchemaBuilder<()> = SchemaBuilder::new();
        let query = builder.define_object_type("Query").unwrap();
        let author = builder.define_object_type("Author").unwrap();
        let tutorial = builder.define_object_type("Tutorial").unwrap();
        builder
            .define_field(query, field("tutorial", Type::object("Tutorial")))
            .unwrap();
        builder
            .define_field(tutorial, field("Author", Type::object("Author")))
            .unwrap();
        // Cycle: Author refers back to Tutorial, and to itself.
        builder
            .define_field(author, field("Latest", Type::object("Tutorial")))
            .unwrap();
        builder
            .define_field(author, field("CoAuthor", Type::object("Author")))
            .unwrap();

        let schema = builder.build("Query", None).unwrap();
        assert!(schema.object_type("Author").is_some());
    }
}
