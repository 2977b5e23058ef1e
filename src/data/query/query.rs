use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::data::graphql::q;
use crate::data::graphql::SerializableValue;
use crate::data::query::QueryError;
use crate::schema::Schema;

/// Variable value definitions supplied with a query.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryVariables(HashMap<String, q::Value>);

impl QueryVariables {
    pub fn new(variables: HashMap<String, q::Value>) -> Self {
        QueryVariables(variables)
    }
}

impl Deref for QueryVariables {
    type Target = HashMap<String, q::Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for QueryVariables {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Serialize for QueryVariables {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, &SerializableValue(value))?;
        }
        map.end()
    }
}

/// A query ready for execution: the schema to run against, the parsed
/// document, the operation to run when the document holds several, and
/// any variable values.
#[derive(Clone)]
pub struct Query<C> {
    pub schema: Arc<Schema<C>>,
    pub document: q::Document,
    pub operation_name: Option<String>,
    pub variables: Option<QueryVariables>,
}

impl<C> Query<C> {
    pub fn new(
        schema: Arc<Schema<C>>,
        document: q::Document,
        variables: Option<QueryVariables>,
    ) -> Self {
        Query {
            schema,
            document,
            operation_name: None,
            variables,
        }
    }

    /// Parses `text` with the standard GraphQL parser. Parse failures are
    /// reported through the normal error channel so callers can surface
    /// them like any other query error.
    pub fn parse(
        schema: Arc<Schema<C>>,
        text: &str,
        variables: Option<QueryVariables>,
    ) -> Result<Self, QueryError> {
        let document = q::parse_query(text)
            .map_err(QueryError::from)?
            .into_static();
        Ok(Query::new(schema, document, variables))
    }

    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }
}
