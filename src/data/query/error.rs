use graphql_parser::Pos;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::error::Error;
use std::fmt;
use thiserror::Error;

use crate::data::graphql::q;
use crate::data::value as r;

/// Path from the response root to the field an error is associated with,
/// as response keys and list indices.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponsePath(Vec<PathSegment>);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

impl ResponsePath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push_field(&mut self, response_key: &str) {
        self.0.push(PathSegment::Field(response_key.to_owned()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.0.push(PathSegment::Index(index));
    }

    pub fn pop(&mut self) {
        self.0.pop();
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }
}

impl fmt::Display for ResponsePath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for segment in &self.0 {
            if !first {
                write!(f, ".")?;
            }
            first = false;
            match segment {
                PathSegment::Field(name) => write!(f, "{}", name)?,
                PathSegment::Index(index) => write!(f, "{}", index)?,
            }
        }
        Ok(())
    }
}

impl Serialize for ResponsePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for segment in &self.0 {
            match segment {
                PathSegment::Field(name) => seq.serialize_element(name)?,
                PathSegment::Index(index) => seq.serialize_element(index)?,
            }
        }
        seq.end()
    }
}

impl<S: AsRef<str>> From<Vec<S>> for ResponsePath {
    fn from(segments: Vec<S>) -> Self {
        ResponsePath(
            segments
                .into_iter()
                .map(|s| PathSegment::Field(s.as_ref().to_owned()))
                .collect(),
        )
    }
}

/// Error caused while executing a [Query](struct.Query.html).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryExecutionError {
    #[error("Operation name required")]
    OperationNameRequired,
    #[error("Operation name not found: {0}")]
    OperationNotFound(String),
    #[error("Not supported: {0}")]
    NotSupported(String),
    #[error("The query is empty")]
    EmptyQuery,
    #[error("No root Query type defined in the schema")]
    NoRootQueryObjectType,
    #[error("No root Mutation type defined in the schema")]
    NoRootMutationObjectType,
    #[error("Failed to resolve named type: {0}")]
    NamedTypeError(String), // (type)
    #[error("Type \"{1}\" has no field \"{2}\"")]
    UnknownField(Pos, String, String), // (position, type, field)
    #[error("Field \"{1}\" of object type \"{2}\" must have a sub-selection")]
    EmptySelectionSet(Pos, String, String), // (position, field, type)
    #[error("Null value resolved for non-null field: {1}")]
    NonNullError(Pos, String), // (position, field)
    #[error("Non-list value resolved for list field: {1}")]
    ListValueError(Pos, String), // (position, field)
    #[error("Failed to resolve field \"{1}\": {2}")]
    ResolverError(Pos, String, String), // (position, field, message)
    #[error("Invalid value provided for argument \"{1}\": {2:?}")]
    InvalidArgumentError(Pos, String, q::Value), // (position, argument, value)
    #[error("No value provided for required argument: {1}")]
    MissingArgumentError(Pos, String), // (position, argument)
    #[error("No value provided for required variable: {1}")]
    MissingVariableError(Pos, String), // (position, variable)
    #[error("Cannot coerce value {2} into scalar type \"{3}\" for field \"{1}\"")]
    ScalarCoercionError(Pos, String, r::Value, String), // (position, field, value, type)
    #[error("Query timed out")]
    Timeout,
    #[error("{0}")]
    ParseError(String), // (parser message)
}

impl QueryExecutionError {
    /// The source position the error points at, for errors that carry one.
    pub fn position(&self) -> Option<Pos> {
        use self::QueryExecutionError::*;

        match self {
            UnknownField(pos, _, _)
            | EmptySelectionSet(pos, _, _)
            | NonNullError(pos, _)
            | ListValueError(pos, _)
            | ResolverError(pos, _, _)
            | InvalidArgumentError(pos, _, _)
            | MissingArgumentError(pos, _)
            | MissingVariableError(pos, _)
            | ScalarCoercionError(pos, _, _, _) => Some(*pos),
            _ => None,
        }
    }
}

impl From<QueryExecutionError> for Vec<QueryExecutionError> {
    fn from(e: QueryExecutionError) -> Self {
        vec![e]
    }
}

impl From<q::ParseError> for QueryExecutionError {
    fn from(e: q::ParseError) -> Self {
        QueryExecutionError::ParseError(e.to_string())
    }
}

/// An entry in the `errors` section of a query response: the underlying
/// execution error plus the response path where it occurred. The path is
/// empty for errors raised before field execution began.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryError {
    pub error: QueryExecutionError,
    pub path: ResponsePath,
}

impl QueryError {
    pub fn new(error: QueryExecutionError) -> Self {
        QueryError {
            error,
            path: ResponsePath::new(),
        }
    }

    pub fn at_path(error: QueryExecutionError, path: ResponsePath) -> Self {
        QueryError { error, path }
    }
}

impl From<QueryExecutionError> for QueryError {
    fn from(e: QueryExecutionError) -> Self {
        QueryError::new(e)
    }
}

impl From<q::ParseError> for QueryError {
    fn from(e: q::ParseError) -> Self {
        QueryError::new(e.into())
    }
}

impl Error for QueryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl Serialize for QueryError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;

        map.serialize_entry("message", &format!("{}", self))?;

        if let Some(pos) = self.error.position() {
            let mut location = std::collections::HashMap::new();
            location.insert("line", pos.line);
            location.insert("column", pos.column);
            map.serialize_entry("locations", &vec![location])?;
        }

        if !self.path.is_empty() {
            map.serialize_entry("path", &self.path)?;
        }

        map.end()
    }
}
